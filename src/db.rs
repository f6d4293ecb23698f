//! The LightBnB operations: one statement each, results mapped to records.
//!
//! Every operation logs its outcome. A miss is `Ok(None)` or an empty `Vec`;
//! a store failure is logged with the store's message and returned as `Err`.

use std::future::Future;

use tracing::{debug, error, info};

use crate::config::DbConfig;
use crate::error::LightbnbDbError;
use crate::executor::QueryExecutor;
use crate::model::{GuestReservation, NewProperty, NewUser, Property, PropertyListing, User};
use crate::pool::ConfigAndPool;
use crate::query_builder::{
    Comparison, FilteredSelect, Predicate, PropertySearch, QueryAndParams, build_property_query,
};
use crate::results::{FromDbRow, ResultSet};
use crate::types::RowValues;

const USER_BY_EMAIL: &str = "SELECT * FROM users WHERE email = $1;";

const USER_BY_ID: &str = "SELECT * FROM users WHERE id = $1;";

const INSERT_USER: &str = "
INSERT INTO users (name, email, password)
VALUES ($1, $2, $3)
RETURNING *;";

const GUEST_RESERVATIONS_FROM: &str = "
SELECT reservations.id AS reservation_id, reservations.guest_id, reservations.property_id,
       reservations.start_date, reservations.end_date,
       properties.*, AVG(property_reviews.rating)::float8 AS average_rating
FROM reservations
JOIN properties ON properties.id = reservations.property_id
JOIN property_reviews ON property_reviews.property_id = properties.id
";

const INSERT_PROPERTY: &str = "
INSERT INTO properties (owner_id, title, description, thumbnail_photo_url, cover_photo_url,
    cost_per_night, street, city, province, post_code, country, parking_spaces,
    number_of_bathrooms, number_of_bedrooms)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
RETURNING *;";

/// Data access for users, properties and reservations.
#[derive(Debug, Clone)]
pub struct LightbnbDb<E = ConfigAndPool> {
    executor: E,
}

impl LightbnbDb<ConfigAndPool> {
    /// Build the connection pool from `config`. No connection is opened until
    /// the first operation runs.
    ///
    /// # Errors
    /// Returns `LightbnbDbError::ConfigError` for incomplete settings or
    /// `LightbnbDbError::ConnectionError` if the pool cannot be created.
    pub async fn connect(config: &DbConfig) -> Result<Self, LightbnbDbError> {
        Ok(Self::new(ConfigAndPool::from_db_config(config).await?))
    }
}

impl<E: QueryExecutor> LightbnbDb<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Fetch a user by email. `Ok(None)` when nobody registered it.
    ///
    /// # Errors
    /// Returns the store or row-mapping failure after logging it.
    pub async fn get_user_with_email(&self, email: &str) -> Result<Option<User>, LightbnbDbError> {
        let qp = QueryAndParams::new(USER_BY_EMAIL, vec![RowValues::from(email)]);
        logged("get_user_with_email", async {
            self.select(&qp).await?.first_row()
        })
        .await
    }

    /// Fetch a user by id. `Ok(None)` when the id is unknown.
    ///
    /// # Errors
    /// Returns the store or row-mapping failure after logging it.
    pub async fn get_user_with_id(&self, id: i64) -> Result<Option<User>, LightbnbDbError> {
        let qp = QueryAndParams::new(USER_BY_ID, vec![RowValues::Int(id)]);
        logged("get_user_with_id", async {
            self.select(&qp).await?.first_row()
        })
        .await
    }

    /// Register a user and return the stored row, id included.
    ///
    /// # Errors
    /// Returns the store failure after logging it; a taken email surfaces as
    /// an error whose [`LightbnbDbError::is_unique_violation`] is true.
    pub async fn add_user(&self, user: &NewUser) -> Result<User, LightbnbDbError> {
        let qp = QueryAndParams::new(
            INSERT_USER,
            vec![
                RowValues::from(user.name.as_str()),
                RowValues::from(user.email.as_str()),
                RowValues::from(user.password.as_str()),
            ],
        );
        logged("add_user", async { returned_row(&self.select(&qp).await?) }).await
    }

    /// A guest's reservations, earliest start date first, at most `limit`
    /// rows (see [`crate::query_builder::DEFAULT_LIMIT`]).
    ///
    /// # Errors
    /// Returns the store or row-mapping failure after logging it.
    pub async fn get_all_reservations(
        &self,
        guest_id: i64,
        limit: i64,
    ) -> Result<Vec<GuestReservation>, LightbnbDbError> {
        let qp = FilteredSelect::new(GUEST_RESERVATIONS_FROM, limit)
            .filter(Predicate::new(
                "reservations.guest_id",
                Comparison::Eq,
                guest_id,
            ))
            .group_by("properties.id, reservations.id")
            .order_by("reservations.start_date")
            .build();
        logged("get_all_reservations", async {
            self.select(&qp).await?.map_rows()
        })
        .await
    }

    /// Properties matching `search`, cheapest first, at most `limit` rows.
    ///
    /// # Errors
    /// Returns the store or row-mapping failure after logging it.
    pub async fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: i64,
    ) -> Result<Vec<PropertyListing>, LightbnbDbError> {
        let qp = build_property_query(search, limit);
        debug!(query = %qp.query, params = ?qp.params, "property search");
        logged("get_all_properties", async {
            self.select(&qp).await?.map_rows()
        })
        .await
    }

    /// List a property and return the stored row, id included.
    ///
    /// # Errors
    /// Returns the store failure after logging it.
    pub async fn add_property(&self, property: &NewProperty) -> Result<Property, LightbnbDbError> {
        let qp = QueryAndParams::new(
            INSERT_PROPERTY,
            vec![
                RowValues::Int(property.owner_id),
                RowValues::from(property.title.as_str()),
                RowValues::from(property.description.clone()),
                RowValues::from(property.thumbnail_photo_url.as_str()),
                RowValues::from(property.cover_photo_url.as_str()),
                RowValues::Int(property.cost_per_night),
                RowValues::from(property.street.as_str()),
                RowValues::from(property.city.as_str()),
                RowValues::from(property.province.as_str()),
                RowValues::from(property.post_code.as_str()),
                RowValues::from(property.country.as_str()),
                RowValues::Int(property.parking_spaces),
                RowValues::Int(property.number_of_bathrooms),
                RowValues::Int(property.number_of_bedrooms),
            ],
        );
        let created: Property =
            logged("add_property", async { returned_row(&self.select(&qp).await?) }).await?;
        debug!(property = ?created, "new row inserted");
        Ok(created)
    }

    async fn select(&self, qp: &QueryAndParams) -> Result<ResultSet, LightbnbDbError> {
        let rs = self.executor.execute_select(&qp.query, &qp.params).await?;
        info!(rows = rs.len(), "query executed successfully");
        Ok(rs)
    }
}

fn returned_row<T: FromDbRow>(rs: &ResultSet) -> Result<T, LightbnbDbError> {
    rs.first_row()?
        .ok_or_else(|| LightbnbDbError::RowMapping("insert returned no row".to_string()))
}

async fn logged<T, F>(operation: &'static str, fut: F) -> Result<T, LightbnbDbError>
where
    F: Future<Output = Result<T, LightbnbDbError>>,
{
    fut.await.inspect_err(|err| {
        error!(operation, error = %err, "query failed");
    })
}
