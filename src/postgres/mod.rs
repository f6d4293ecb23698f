// PostgreSQL backend
//
// - config: pool construction from `DbConfig`
// - params: binding `RowValues` as statement parameters
// - query: converting returned rows into a `ResultSet`
// - executor: the pooled `QueryExecutor` implementation

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use executor::execute_select;
pub use params::Params;
pub use query::build_result_set_from_statement;
