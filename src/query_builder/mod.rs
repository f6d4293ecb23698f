//! Parameterized SELECT assembly.
//!
//! Filters are collected as [`Predicate`] values and rendered together with
//! the parameter list in a single pass, so placeholder numbers always match
//! parameter positions. The row limit is always `$1`; predicates follow as
//! `$2..$N` in the order they were added, WHERE predicates before HAVING
//! predicates.

mod properties;

pub use properties::{DEFAULT_LIMIT, PropertySearch, build_property_query};

use std::fmt::Write as _;

use crate::types::RowValues;

/// A SQL statement and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Like,
    GtEq,
    LtEq,
}

impl Comparison {
    fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Like => "LIKE",
            Comparison::GtEq => ">=",
            Comparison::LtEq => "<=",
        }
    }
}

/// One filter condition: `<column> <comparison> $n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column or expression on the left-hand side, rendered verbatim
    pub column: &'static str,
    pub comparison: Comparison,
    pub value: RowValues,
}

impl Predicate {
    pub fn new(column: &'static str, comparison: Comparison, value: impl Into<RowValues>) -> Self {
        Self {
            column,
            comparison,
            value: value.into(),
        }
    }
}

/// A SELECT with optional WHERE/HAVING filters, fixed ordering and a limit.
#[derive(Debug, Clone)]
pub struct FilteredSelect {
    from: &'static str,
    filters: Vec<Predicate>,
    group_by: Option<&'static str>,
    having: Vec<Predicate>,
    order_by: Option<&'static str>,
    limit: i64,
}

impl FilteredSelect {
    /// `from` holds everything up to (not including) the WHERE clause:
    /// select list, `FROM` and joins.
    #[must_use]
    pub fn new(from: &'static str, limit: i64) -> Self {
        Self {
            from,
            filters: Vec::new(),
            group_by: None,
            having: Vec::new(),
            order_by: None,
            limit,
        }
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    #[must_use]
    pub fn filter_opt(self, predicate: Option<Predicate>) -> Self {
        match predicate {
            Some(p) => self.filter(p),
            None => self,
        }
    }

    #[must_use]
    pub fn group_by(mut self, columns: &'static str) -> Self {
        self.group_by = Some(columns);
        self
    }

    #[must_use]
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having.push(predicate);
        self
    }

    #[must_use]
    pub fn having_opt(self, predicate: Option<Predicate>) -> Self {
        match predicate {
            Some(p) => self.having(p),
            None => self,
        }
    }

    #[must_use]
    pub fn order_by(mut self, columns: &'static str) -> Self {
        self.order_by = Some(columns);
        self
    }

    /// Render the statement and its parameters.
    #[must_use]
    pub fn build(self) -> QueryAndParams {
        let mut params = Vec::with_capacity(1 + self.filters.len() + self.having.len());
        params.push(RowValues::Int(self.limit));

        let mut query = String::from(self.from.trim());
        render_clause(&mut query, &mut params, "WHERE", self.filters);
        if let Some(group_by) = self.group_by {
            let _ = write!(query, "\nGROUP BY {group_by}");
        }
        render_clause(&mut query, &mut params, "HAVING", self.having);
        if let Some(order_by) = self.order_by {
            let _ = write!(query, "\nORDER BY {order_by}");
        }
        query.push_str("\nLIMIT $1;");

        QueryAndParams { query, params }
    }
}

fn render_clause(
    query: &mut String,
    params: &mut Vec<RowValues>,
    keyword: &str,
    predicates: Vec<Predicate>,
) {
    for (i, predicate) in predicates.into_iter().enumerate() {
        let joiner = if i == 0 { keyword } else { "AND" };
        params.push(predicate.value);
        let _ = write!(
            query,
            "\n{joiner} {} {} ${}",
            predicate.column,
            predicate.comparison.as_sql(),
            params.len()
        );
    }
}
