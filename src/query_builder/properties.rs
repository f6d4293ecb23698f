use serde::{Deserialize, Deserializer, Serialize};

use super::{Comparison, FilteredSelect, Predicate, QueryAndParams};

/// Row limit used when the caller does not pick one.
pub const DEFAULT_LIMIT: i64 = 10;

const PROPERTY_LISTING_FROM: &str = "
SELECT properties.*, AVG(property_reviews.rating)::float8 AS average_rating
FROM properties
JOIN property_reviews ON properties.id = property_reviews.property_id
";

/// Optional criteria for the property listing.
///
/// Prices are whole currency units per night; the store keeps cents, so the
/// comparison divides `cost_per_night` by 100. Empty text, zero and NaN
/// count as "not supplied", matching how search forms submit empty fields.
/// Any other city text, whitespace included, is matched as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySearch {
    #[serde(deserialize_with = "empty_as_none")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub owner_id: Option<i64>,
    #[serde(deserialize_with = "lenient_number")]
    pub minimum_price_per_night: Option<i64>,
    #[serde(deserialize_with = "lenient_number")]
    pub maximum_price_per_night: Option<i64>,
    #[serde(deserialize_with = "lenient_number")]
    pub minimum_rating: Option<f64>,
}

impl PropertySearch {
    fn city_predicate(&self) -> Option<Predicate> {
        let city = self.city.as_deref().filter(|c| !c.is_empty())?;
        Some(Predicate::new("city", Comparison::Like, format!("%{city}%")))
    }

    fn owner_predicate(&self) -> Option<Predicate> {
        let owner_id = self.owner_id.filter(|id| *id != 0)?;
        Some(Predicate::new("properties.owner_id", Comparison::Eq, owner_id))
    }

    fn min_price_predicate(&self) -> Option<Predicate> {
        let price = self.minimum_price_per_night.filter(|p| *p != 0)?;
        Some(Predicate::new(
            "properties.cost_per_night / 100",
            Comparison::GtEq,
            price,
        ))
    }

    fn max_price_predicate(&self) -> Option<Predicate> {
        let price = self.maximum_price_per_night.filter(|p| *p != 0)?;
        Some(Predicate::new(
            "properties.cost_per_night / 100",
            Comparison::LtEq,
            price,
        ))
    }

    fn rating_predicate(&self) -> Option<Predicate> {
        let rating = self.minimum_rating.filter(|r| *r != 0.0 && !r.is_nan())?;
        Some(Predicate::new(
            "AVG(property_reviews.rating)::float8",
            Comparison::GtEq,
            rating,
        ))
    }
}

/// Build the property listing statement for `search`, returning at most
/// `limit` rows ordered by nightly cost.
#[must_use]
pub fn build_property_query(search: &PropertySearch, limit: i64) -> QueryAndParams {
    FilteredSelect::new(PROPERTY_LISTING_FROM, limit)
        .filter_opt(search.city_predicate())
        .filter_opt(search.owner_predicate())
        .filter_opt(search.min_price_predicate())
        .filter_opt(search.max_price_predicate())
        .group_by("properties.id")
        .having_opt(search.rating_predicate())
        .order_by("properties.cost_per_night")
        .build()
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

// Accepts `4`, `"4"`, `""` and `null`.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowValues;

    fn count_lines(query: &str, keyword: &str) -> usize {
        query
            .lines()
            .filter(|line| line.starts_with(&format!("{keyword} ")))
            .count()
    }

    #[test]
    fn no_filters_still_groups_orders_and_limits() {
        let qp = build_property_query(&PropertySearch::default(), DEFAULT_LIMIT);
        assert_eq!(count_lines(&qp.query, "WHERE"), 0);
        assert_eq!(count_lines(&qp.query, "AND"), 0);
        assert_eq!(count_lines(&qp.query, "HAVING"), 0);
        assert!(qp.query.contains("GROUP BY properties.id"));
        assert!(qp.query.contains("ORDER BY properties.cost_per_night"));
        assert!(qp.query.ends_with("LIMIT $1;"));
        assert_eq!(qp.params, vec![RowValues::Int(10)]);
    }

    #[test]
    fn city_and_rating_params_follow_the_limit() {
        let search = PropertySearch {
            city: Some("Vancouver".into()),
            minimum_rating: Some(4.0),
            ..PropertySearch::default()
        };
        let qp = build_property_query(&search, 5);
        assert_eq!(
            qp.params,
            vec![
                RowValues::Int(5),
                RowValues::Text("%Vancouver%".into()),
                RowValues::Float(4.0),
            ]
        );
        assert!(qp.query.contains("\nWHERE city LIKE $2\n"));
        assert!(qp.query.contains("\nHAVING AVG(property_reviews.rating)::float8 >= $3\n"));
    }

    #[test]
    fn every_subset_has_one_where_and_matching_ands() {
        for mask in 0u8..32 {
            let search = PropertySearch {
                city: (mask & 1 != 0).then(|| "Calgary".to_string()),
                owner_id: (mask & 2 != 0).then_some(3),
                minimum_price_per_night: (mask & 4 != 0).then_some(50),
                maximum_price_per_night: (mask & 8 != 0).then_some(500),
                minimum_rating: (mask & 16 != 0).then_some(3.5),
            };
            let where_count = (mask & 0b1111).count_ones() as usize;
            let qp = build_property_query(&search, DEFAULT_LIMIT);

            assert_eq!(count_lines(&qp.query, "WHERE"), usize::from(where_count > 0), "mask {mask}");
            assert_eq!(count_lines(&qp.query, "AND"), where_count.saturating_sub(1), "mask {mask}");
            assert_eq!(count_lines(&qp.query, "HAVING"), usize::from(mask & 16 != 0), "mask {mask}");
            assert_eq!(qp.params.len(), 1 + mask.count_ones() as usize, "mask {mask}");

            for n in 1..=qp.params.len() {
                assert!(qp.query.contains(&format!("${n}")), "mask {mask} missing ${n}");
            }
            assert!(!qp.query.contains(&format!("${}", qp.params.len() + 1)));
        }
    }

    #[test]
    fn all_filters_bind_in_fixed_order() {
        let search = PropertySearch {
            city: Some("Calgary".into()),
            owner_id: Some(3),
            minimum_price_per_night: Some(50),
            maximum_price_per_night: Some(500),
            minimum_rating: Some(3.5),
        };
        let qp = build_property_query(&search, 20);
        assert_eq!(
            qp.params,
            vec![
                RowValues::Int(20),
                RowValues::Text("%Calgary%".into()),
                RowValues::Int(3),
                RowValues::Int(50),
                RowValues::Int(500),
                RowValues::Float(3.5),
            ]
        );
        assert!(qp.query.contains("\nWHERE city LIKE $2\n"));
        assert!(qp.query.contains("\nAND properties.owner_id = $3\n"));
        assert!(qp.query.contains("\nAND properties.cost_per_night / 100 >= $4\n"));
        assert!(qp.query.contains("\nAND properties.cost_per_night / 100 <= $5\n"));
        assert!(qp.query.contains("\nHAVING AVG(property_reviews.rating)::float8 >= $6\n"));
    }

    #[test]
    fn first_present_predicate_takes_where() {
        let search = PropertySearch {
            maximum_price_per_night: Some(200),
            ..PropertySearch::default()
        };
        let qp = build_property_query(&search, DEFAULT_LIMIT);
        assert!(qp.query.contains("\nWHERE properties.cost_per_night / 100 <= $2\n"));
    }

    #[test]
    fn empty_and_zero_filters_are_ignored() {
        let search = PropertySearch {
            city: Some(String::new()),
            owner_id: Some(0),
            minimum_price_per_night: Some(0),
            maximum_price_per_night: None,
            minimum_rating: Some(0.0),
        };
        let qp = build_property_query(&search, DEFAULT_LIMIT);
        assert_eq!(qp, build_property_query(&PropertySearch::default(), DEFAULT_LIMIT));
    }

    #[test]
    fn city_is_bound_as_given() {
        let padded = PropertySearch {
            city: Some(" Vancouver".into()),
            ..PropertySearch::default()
        };
        let qp = build_property_query(&padded, DEFAULT_LIMIT);
        assert_eq!(
            qp.params,
            vec![RowValues::Int(10), RowValues::Text("% Vancouver%".into())]
        );

        let spaces = PropertySearch {
            city: Some("   ".into()),
            ..PropertySearch::default()
        };
        let qp = build_property_query(&spaces, DEFAULT_LIMIT);
        assert_eq!(
            qp.params,
            vec![RowValues::Int(10), RowValues::Text("%   %".into())]
        );
        assert_eq!(count_lines(&qp.query, "WHERE"), 1);
    }

    #[test]
    fn nan_rating_adds_no_having() {
        let search = PropertySearch {
            minimum_rating: Some(f64::NAN),
            ..PropertySearch::default()
        };
        let qp = build_property_query(&search, DEFAULT_LIMIT);
        assert_eq!(count_lines(&qp.query, "HAVING"), 0);
        assert_eq!(qp.params, vec![RowValues::Int(10)]);
    }

    #[test]
    fn form_payloads_deserialize_leniently() {
        let search: PropertySearch = serde_json::from_str(
            r#"{"city":"Vancouver","owner_id":"","minimum_price_per_night":"100","minimum_rating":4}"#,
        )
        .unwrap();
        assert_eq!(
            search,
            PropertySearch {
                city: Some("Vancouver".into()),
                owner_id: None,
                minimum_price_per_night: Some(100),
                maximum_price_per_night: None,
                minimum_rating: Some(4.0),
            }
        );

        let err = serde_json::from_str::<PropertySearch>(r#"{"owner_id":"abc"}"#);
        assert!(err.is_err());
    }
}
