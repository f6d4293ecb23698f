//! Data access for the LightBnB booking application.
//!
//! Users, properties and reservations are read from and written to
//! PostgreSQL through a `deadpool-postgres` pool. Each operation runs one
//! parameterized statement; the property listing is assembled from optional
//! search criteria by [`query_builder`].
//!
//! ```rust,no_run
//! use lightbnb_db::prelude::*;
//!
//! # async fn demo() -> Result<(), LightbnbDbError> {
//! let config = DbConfig {
//!     user: Some("vagrant".into()),
//!     password: Some("123".into()),
//!     ..DbConfig::default()
//! };
//! let db = LightbnbDb::connect(&config).await?;
//!
//! let search = PropertySearch {
//!     city: Some("Vancouver".into()),
//!     minimum_rating: Some(4.0),
//!     ..PropertySearch::default()
//! };
//! for listing in db.get_all_properties(&search, DEFAULT_LIMIT).await? {
//!     println!("{} {:?}", listing.property.title, listing.average_rating);
//! }
//! # Ok(()) }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod executor;
pub mod model;
pub mod pool;
pub mod postgres;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::DbConfig;
pub use db::LightbnbDb;
pub use error::LightbnbDbError;
pub use executor::QueryExecutor;
pub use pool::ConfigAndPool;
pub use query_builder::{DEFAULT_LIMIT, PropertySearch, QueryAndParams, build_property_query};
pub use results::{CustomDbRow, FromDbRow, ResultSet};
pub use types::RowValues;
