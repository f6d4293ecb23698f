//! Records returned by and passed to the LightBnB store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LightbnbDbError;
use crate::results::{CustomDbRow, FromDbRow};

/// A registered guest or owner. `password` is an opaque hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A listed rental. `cost_per_night` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i64,
    pub number_of_bathrooms: i64,
    pub number_of_bedrooms: i64,
}

/// Payload for listing a new property. `cost_per_night` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i64,
    pub number_of_bathrooms: i64,
    pub number_of_bedrooms: i64,
}

/// A property together with the mean of its review ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub guest_id: i64,
    pub property_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One of a guest's reservations with the reserved property and its rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestReservation {
    pub reservation: Reservation,
    pub property: Property,
    pub average_rating: Option<f64>,
}

impl FromDbRow for User {
    fn from_db_row(row: &CustomDbRow) -> Result<Self, LightbnbDbError> {
        Ok(User {
            id: row.get_int("id")?,
            name: row.get_text("name")?,
            email: row.get_text("email")?,
            password: row.get_text("password")?,
        })
    }
}

impl FromDbRow for Property {
    fn from_db_row(row: &CustomDbRow) -> Result<Self, LightbnbDbError> {
        Ok(Property {
            id: row.get_int("id")?,
            owner_id: row.get_int("owner_id")?,
            title: row.get_text("title")?,
            description: row.get_opt_text("description")?,
            thumbnail_photo_url: row.get_text("thumbnail_photo_url")?,
            cover_photo_url: row.get_text("cover_photo_url")?,
            cost_per_night: row.get_int("cost_per_night")?,
            street: row.get_text("street")?,
            city: row.get_text("city")?,
            province: row.get_text("province")?,
            post_code: row.get_text("post_code")?,
            country: row.get_text("country")?,
            parking_spaces: row.get_int("parking_spaces")?,
            number_of_bathrooms: row.get_int("number_of_bathrooms")?,
            number_of_bedrooms: row.get_int("number_of_bedrooms")?,
        })
    }
}

impl FromDbRow for PropertyListing {
    fn from_db_row(row: &CustomDbRow) -> Result<Self, LightbnbDbError> {
        Ok(PropertyListing {
            property: Property::from_db_row(row)?,
            average_rating: row.get_opt_float("average_rating")?,
        })
    }
}

// Reservation rows are selected alongside `properties.*`, so the reservation
// id arrives as `reservation_id` and `id` belongs to the property.
impl FromDbRow for GuestReservation {
    fn from_db_row(row: &CustomDbRow) -> Result<Self, LightbnbDbError> {
        let property = Property::from_db_row(row)?;
        let reservation = Reservation {
            id: row.get_int("reservation_id")?,
            guest_id: row.get_int("guest_id")?,
            property_id: row.get_int("property_id")?,
            start_date: row.get_date("start_date")?,
            end_date: row.get_date("end_date")?,
        };
        Ok(GuestReservation {
            reservation,
            property,
            average_rating: row.get_opt_float("average_rating")?,
        })
    }
}
