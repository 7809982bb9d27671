//! Convert serde_json::Value to types that sqlx can bind.

use crate::error::AppError;
use crate::model::ColumnKind;
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

/// A value that can be bound to a PostgreSQL query.
///
/// The wire type is chosen from the column kind alone, never from the JSON value:
/// statements are cached per connection by SQL text, so a placeholder must always
/// receive the same parameter type (a null included).
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    I64(Option<i64>),
    F64(Option<f64>),
    Text(Option<String>),
}

impl BindValue {
    pub fn from_json(v: &Value, kind: &ColumnKind) -> Result<Self, AppError> {
        let mismatch =
            || AppError::Validation(format!("cannot bind {} as {}", v, kind.cast_type()));
        Ok(match kind {
            ColumnKind::Serial | ColumnKind::Integer => match v {
                Value::Null => BindValue::I64(None),
                _ => BindValue::I64(Some(v.as_i64().ok_or_else(mismatch)?)),
            },
            ColumnKind::Decimal { .. } => match v {
                Value::Null => BindValue::F64(None),
                _ => BindValue::F64(Some(v.as_f64().ok_or_else(mismatch)?)),
            },
            ColumnKind::Text { .. } | ColumnKind::Timestamp => match v {
                Value::Null => BindValue::Text(None),
                Value::String(s) => BindValue::Text(Some(s.clone())),
                _ => return Err(mismatch()),
            },
        })
    }

    pub fn bind<'q>(
        self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            BindValue::I64(n) => query.bind(n),
            BindValue::F64(f) => query.bind(f),
            BindValue::Text(s) => query.bind(s),
        }
    }
}
