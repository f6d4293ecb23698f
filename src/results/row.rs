use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::LightbnbDbError;
use crate::types::RowValues;

/// A row from a database query result
///
/// This struct represents a single row from a database query result,
/// with access to both the column names and the values.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

/// Map a returned row onto a typed record.
pub trait FromDbRow: Sized {
    /// # Errors
    /// Returns `LightbnbDbError::RowMapping` if a column is missing or holds an unexpected type.
    fn from_db_row(row: &CustomDbRow) -> Result<Self, LightbnbDbError>;
}

pub(crate) fn index_columns(column_names: &[String]) -> Arc<HashMap<String, usize>> {
    // Duplicate names resolve to the first occurrence.
    let mut index = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        index.entry(name.clone()).or_insert(i);
    }
    Arc::new(index)
}

impl CustomDbRow {
    /// Create a new database row
    ///
    /// # Arguments
    ///
    /// * `column_names` - The column names
    /// * `rows` - The values for this row
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let column_index_cache = index_columns(&column_names);
        Self {
            column_names,
            rows,
            column_index_cache,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Get a value from the row by column name, or None if the column wasn't found
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }

    fn require(&self, column_name: &str) -> Result<&RowValues, LightbnbDbError> {
        self.get(column_name)
            .ok_or_else(|| LightbnbDbError::RowMapping(format!("missing column `{column_name}`")))
    }

    fn mismatch(column_name: &str, expected: &str, found: &RowValues) -> LightbnbDbError {
        LightbnbDbError::RowMapping(format!(
            "column `{column_name}`: expected {expected}, found {found:?}"
        ))
    }

    /// # Errors
    /// Returns `LightbnbDbError::RowMapping` if the column is missing or not an integer.
    pub fn get_int(&self, column_name: &str) -> Result<i64, LightbnbDbError> {
        let value = self.require(column_name)?;
        value
            .as_int()
            .copied()
            .ok_or_else(|| Self::mismatch(column_name, "integer", value))
    }

    /// # Errors
    /// Returns `LightbnbDbError::RowMapping` if the column is missing or not text.
    pub fn get_text(&self, column_name: &str) -> Result<String, LightbnbDbError> {
        let value = self.require(column_name)?;
        value
            .as_text()
            .map(ToString::to_string)
            .ok_or_else(|| Self::mismatch(column_name, "text", value))
    }

    /// NULL maps to `None`.
    ///
    /// # Errors
    /// Returns `LightbnbDbError::RowMapping` if the column is missing or holds a non-text value.
    pub fn get_opt_text(&self, column_name: &str) -> Result<Option<String>, LightbnbDbError> {
        match self.require(column_name)? {
            RowValues::Null => Ok(None),
            RowValues::Text(s) => Ok(Some(s.clone())),
            other => Err(Self::mismatch(column_name, "text", other)),
        }
    }

    /// # Errors
    /// Returns `LightbnbDbError::RowMapping` if the column is missing or not a date.
    pub fn get_date(&self, column_name: &str) -> Result<NaiveDate, LightbnbDbError> {
        let value = self.require(column_name)?;
        value
            .as_date()
            .ok_or_else(|| Self::mismatch(column_name, "date", value))
    }

    /// NULL maps to `None`.
    ///
    /// # Errors
    /// Returns `LightbnbDbError::RowMapping` if the column is missing or not numeric.
    pub fn get_opt_float(&self, column_name: &str) -> Result<Option<f64>, LightbnbDbError> {
        let value = self.require(column_name)?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_float()
            .map(Some)
            .ok_or_else(|| Self::mismatch(column_name, "number", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> CustomDbRow {
        CustomDbRow::new(
            Arc::new(vec![
                "id".to_string(),
                "title".to_string(),
                "description".to_string(),
                "average_rating".to_string(),
                "id".to_string(),
            ]),
            vec![
                RowValues::Int(7),
                RowValues::Text("Habit mix".into()),
                RowValues::Null,
                RowValues::Float(4.5),
                RowValues::Int(99),
            ],
        )
    }

    #[test]
    fn typed_getters_read_values() {
        let row = row();
        assert_eq!(row.get_int("id").unwrap(), 7);
        assert_eq!(row.get_text("title").unwrap(), "Habit mix");
        assert_eq!(row.get_opt_text("description").unwrap(), None);
        assert_eq!(row.get_opt_float("average_rating").unwrap(), Some(4.5));
    }

    #[test]
    fn duplicate_column_names_resolve_to_first() {
        assert_eq!(row().get_column_index("id"), Some(0));
    }

    #[test]
    fn missing_and_mistyped_columns_are_mapping_errors() {
        let row = row();
        assert!(matches!(
            row.get_int("owner_id"),
            Err(LightbnbDbError::RowMapping(msg)) if msg.contains("owner_id")
        ));
        assert!(matches!(
            row.get_int("title"),
            Err(LightbnbDbError::RowMapping(_))
        ));
        assert!(row.get_text("description").is_err());
    }
}
