use std::error::Error;

use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use bytes::BytesMut;

use crate::types::RowValues;

/// Borrowed parameter list in the shape `tokio_postgres` expects
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    /// Convert from a slice of `RowValues` to Postgres parameters
    #[must_use]
    pub fn convert(params: &'a [RowValues]) -> Params<'a> {
        let mut references = Vec::with_capacity(params.len());
        for p in params {
            references.push(p as &(dyn ToSql + Sync));
        }
        Params { references }
    }

    /// Get a reference to the underlying parameter array
    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

impl ToSql for RowValues {
    // The server infers each placeholder's type from its context, so integer
    // and float values are narrowed to whatever width it asked for.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            RowValues::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                Type::FLOAT4 => (*i as f32).to_sql(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql(ty, out),
                _ => (*i).to_sql(ty, out),
            },
            RowValues::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                _ => (*f).to_sql(ty, out),
            },
            RowValues::Text(s) => s.to_sql(ty, out),
            RowValues::Bool(b) => (*b).to_sql(ty, out),
            RowValues::Date(d) => d.to_sql(ty, out),
            RowValues::Timestamp(dt) => dt.to_sql(ty, out),
            RowValues::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::UNKNOWN
                | Type::BOOL
                | Type::DATE
                | Type::TIMESTAMP
        )
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &RowValues, ty: &Type) -> Result<Vec<u8>, Box<dyn Error + Sync + Send>> {
        let mut buf = BytesMut::new();
        value.to_sql_checked(ty, &mut buf)?;
        Ok(buf.to_vec())
    }

    #[test]
    fn integers_narrow_to_the_inferred_width() {
        assert_eq!(encode(&RowValues::Int(10), &Type::INT4).unwrap(), 10i32.to_be_bytes());
        assert_eq!(encode(&RowValues::Int(10), &Type::INT8).unwrap(), 10i64.to_be_bytes());
        assert_eq!(encode(&RowValues::Int(3), &Type::INT2).unwrap(), 3i16.to_be_bytes());
    }

    #[test]
    fn out_of_range_narrowing_is_an_error() {
        assert!(encode(&RowValues::Int(i64::from(i32::MAX) + 1), &Type::INT4).is_err());
    }

    #[test]
    fn integer_compared_against_float_column_is_widened() {
        assert_eq!(encode(&RowValues::Int(4), &Type::FLOAT8).unwrap(), 4f64.to_be_bytes());
    }

    #[test]
    fn unsupported_types_are_rejected() {
        assert!(encode(&RowValues::Int(1), &Type::JSONB).is_err());
    }

    #[test]
    fn null_writes_nothing() {
        assert!(encode(&RowValues::Null, &Type::TEXT).unwrap().is_empty());
    }

    #[test]
    fn params_keep_order() {
        let values = vec![RowValues::Int(5), RowValues::Text("%Vancouver%".into())];
        let params = Params::convert(&values);
        assert_eq!(params.as_refs().len(), 2);
    }
}
