use std::collections::HashMap;
use std::sync::Arc;

use super::row::{CustomDbRow, FromDbRow, index_columns};
use crate::error::LightbnbDbError;
use crate::types::RowValues;

/// A result set from a database query
///
/// This struct represents the result of a database query,
/// containing the rows returned by the query and metadata.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Option<Arc<Vec<String>>>,
    column_index_cache: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: None,
            column_index_cache: None,
        }
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index_cache = Some(index_columns(&column_names));
        self.column_names = Some(column_names);
    }

    /// Get the column names for this result set
    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row to the result set.
    ///
    /// # Errors
    /// Returns `LightbnbDbError::RowMapping` if column names have not been set.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) -> Result<(), LightbnbDbError> {
        let (Some(column_names), Some(cache)) = (&self.column_names, &self.column_index_cache)
        else {
            return Err(LightbnbDbError::RowMapping(
                "row added before column names were set".to_string(),
            ));
        };
        self.results.push(CustomDbRow {
            column_names: column_names.clone(),
            rows: row_values,
            column_index_cache: cache.clone(),
        });
        Ok(())
    }

    /// Add a prebuilt row to the result set
    pub fn add_row(&mut self, row: CustomDbRow) {
        if self.column_names.is_none() {
            self.column_names = Some(row.column_names.clone());
            self.column_index_cache = Some(row.column_index_cache.clone());
        }
        self.results.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Map every row onto `T`.
    ///
    /// # Errors
    /// Returns the first `LightbnbDbError::RowMapping` encountered.
    pub fn map_rows<T: FromDbRow>(&self) -> Result<Vec<T>, LightbnbDbError> {
        self.results.iter().map(T::from_db_row).collect()
    }

    /// Map the first row onto `T`, or `None` when the set is empty.
    ///
    /// # Errors
    /// Returns `LightbnbDbError::RowMapping` if the first row does not fit `T`.
    pub fn first_row<T: FromDbRow>(&self) -> Result<Option<T>, LightbnbDbError> {
        self.results.first().map(T::from_db_row).transpose()
    }
}
