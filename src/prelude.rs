//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::DbConfig;
pub use crate::db::LightbnbDb;
pub use crate::error::LightbnbDbError;
pub use crate::executor::QueryExecutor;
pub use crate::model::{
    GuestReservation, NewProperty, NewUser, Property, PropertyListing, Reservation, User,
};
pub use crate::pool::ConfigAndPool;
pub use crate::query_builder::{
    Comparison, DEFAULT_LIMIT, FilteredSelect, Predicate, PropertySearch, QueryAndParams,
    build_property_query,
};
pub use crate::results::{CustomDbRow, FromDbRow, ResultSet};
pub use crate::types::RowValues;
