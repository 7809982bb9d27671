//! Request validation from column definitions.

use crate::error::AppError;
use crate::model::{ColumnDef, ColumnKind, EntityDef};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body and return its writable fields. Required columns must be
    /// present and non-null; unknown keys and the primary key are dropped.
    pub fn validate_create(
        entity: &EntityDef,
        body: Map<String, Value>,
    ) -> Result<HashMap<String, Value>, AppError> {
        let mut out = HashMap::new();
        for col in entity.writable_columns() {
            match body.get(col.name) {
                None | Some(Value::Null) if col.required => {
                    return Err(AppError::Validation(format!("{} is required", col.name)));
                }
                None => {}
                Some(Value::Null) => {
                    if !col.nullable {
                        return Err(AppError::Validation(format!("{} may not be null", col.name)));
                    }
                    out.insert(col.name.to_string(), Value::Null);
                }
                Some(v) => {
                    validate_field(col, v)?;
                    out.insert(col.name.to_string(), v.clone());
                }
            }
        }
        Ok(out)
    }

    /// Validate a partial update body. Null values are treated as "not supplied".
    pub fn validate_update(
        entity: &EntityDef,
        body: Map<String, Value>,
    ) -> Result<HashMap<String, Value>, AppError> {
        let mut out = HashMap::new();
        for col in entity.writable_columns() {
            let Some(v) = body.get(col.name).filter(|v| !v.is_null()) else {
                continue;
            };
            validate_field(col, v)?;
            out.insert(col.name.to_string(), v.clone());
        }
        Ok(out)
    }
}

fn validate_field(col: &ColumnDef, v: &Value) -> Result<(), AppError> {
    let ok = match col.kind {
        ColumnKind::Serial | ColumnKind::Integer => v
            .as_i64()
            .is_some_and(|n| i32::try_from(n).is_ok()),
        ColumnKind::Decimal { .. } => v.is_number(),
        ColumnKind::Text { max_len } => match v.as_str() {
            Some(s) if s.chars().count() > max_len as usize => {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    col.name, max_len
                )));
            }
            Some(_) => true,
            None => false,
        },
        ColumnKind::Timestamp => v
            .as_str()
            .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok()),
    };
    if ok {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be {}",
            col.name,
            expected(&col.kind)
        )))
    }
}

fn expected(kind: &ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Serial | ColumnKind::Integer => "an integer",
        ColumnKind::Decimal { .. } => "a number",
        ColumnKind::Text { .. } => "a string",
        ColumnKind::Timestamp => "an RFC 3339 timestamp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ORDERS, ORDER_DETAILS, SANDWICHES};
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn create_requires_required_columns() {
        let body = obj(json!({"sandwich_name": "BLT"}));
        let err = RequestValidator::validate_create(&SANDWICHES, body).unwrap_err();
        assert_eq!(err.to_string(), "validation: price is required");

        let err = RequestValidator::validate_create(
            &SANDWICHES,
            obj(json!({"sandwich_name": null, "price": 3})),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "sandwich_name is required"));
    }

    #[test]
    fn create_drops_unknown_and_key_fields() {
        let out = RequestValidator::validate_create(
            &ORDERS,
            obj(json!({"id": 5, "customer_name": "Ada", "tip": 3, "description": null})),
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out["customer_name"], json!("Ada"));
        assert_eq!(out["description"], Value::Null);
    }

    #[test]
    fn create_rejects_null_for_non_nullable_optional() {
        let err = RequestValidator::validate_create(
            &ORDERS,
            obj(json!({"customer_name": "Ada", "order_date": null})),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn types_are_checked() {
        let bad = [
            json!({"order_id": "1", "sandwich_id": 1, "amount": 2}),
            json!({"order_id": 1, "sandwich_id": 1.5, "amount": 2}),
            json!({"order_id": 1, "sandwich_id": 1, "amount": 4_000_000_000i64}),
        ];
        for body in bad {
            assert!(RequestValidator::validate_create(&ORDER_DETAILS, obj(body)).is_err());
        }
        assert!(RequestValidator::validate_create(
            &ORDERS,
            obj(json!({"customer_name": "Ada", "order_date": "yesterday"}))
        )
        .is_err());
        assert!(RequestValidator::validate_create(
            &ORDERS,
            obj(json!({"customer_name": "Ada", "order_date": "2024-05-01T12:00:00Z"}))
        )
        .is_ok());
    }

    #[test]
    fn text_length_is_bounded() {
        let long = "x".repeat(101);
        let err = RequestValidator::validate_create(
            &SANDWICHES,
            obj(json!({"sandwich_name": long, "price": 1})),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation: sandwich_name must be at most 100 characters"
        );
    }

    #[test]
    fn update_skips_nulls_and_missing() {
        let out = RequestValidator::validate_update(
            &SANDWICHES,
            obj(json!({"sandwich_name": null, "price": 8.5})),
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out["price"], json!(8.5));

        let out = RequestValidator::validate_update(&SANDWICHES, Map::new()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn update_still_checks_types() {
        let body = obj(json!({"price": "cheap"}));
        assert!(RequestValidator::validate_update(&SANDWICHES, body).is_err());
    }
}
