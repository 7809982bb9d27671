//! Generic CRUD execution against PostgreSQL.

use crate::error::AppError;
use crate::model::{ColumnDef, ColumnKind, EntityDef};
use crate::sql::{delete, insert, select_by_id, select_list, update, BindValue, QueryBuf};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct CrudService;

impl CrudService {
    /// List rows ordered by primary key. Filters are exact match; no limit unless given.
    pub async fn list(
        pool: &PgPool,
        entity: &EntityDef,
        schema: &str,
        filters: &[(String, Value)],
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Value>, AppError> {
        let q = select_list(entity, schema, filters, limit, offset);
        let rows = Self::fetch_all(pool, q).await?;
        rows.iter().map(|r| row_to_json(r, entity)).collect()
    }

    /// Fetch one row by primary key.
    pub async fn read(
        pool: &PgPool,
        entity: &EntityDef,
        schema: &str,
        id: &Value,
    ) -> Result<Option<Value>, AppError> {
        let q = select_by_id(entity, schema, id);
        Self::fetch_optional(pool, q)
            .await?
            .map(|r| row_to_json(&r, entity))
            .transpose()
    }

    /// Insert one row. Returns the created row, including database defaults.
    pub async fn create(
        pool: &PgPool,
        entity: &EntityDef,
        schema: &str,
        body: &HashMap<String, Value>,
    ) -> Result<Value, AppError> {
        let q = insert(entity, schema, body);
        let row = Self::fetch_optional(pool, q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        let created = row_to_json(&row, entity)?;
        tracing::info!(entity = entity.name, id = %created[entity.pk], "created");
        Ok(created)
    }

    /// Update the supplied columns of one row. `None` when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        entity: &EntityDef,
        schema: &str,
        id: &Value,
        body: &HashMap<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let q = update(entity, schema, id, body);
        Self::fetch_optional(pool, q)
            .await?
            .map(|r| row_to_json(&r, entity))
            .transpose()
    }

    /// Delete one row by id. Returns whether a row was removed.
    pub async fn delete(
        pool: &PgPool,
        entity: &EntityDef,
        schema: &str,
        id: &Value,
    ) -> Result<bool, AppError> {
        let q = delete(entity, schema, id);
        let removed = Self::fetch_optional(pool, q).await?.is_some();
        if removed {
            tracing::info!(entity = entity.name, id = %id, "deleted");
        }
        Ok(removed)
    }

    async fn fetch_all(pool: &PgPool, q: QueryBuf) -> Result<Vec<PgRow>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for (value, kind) in &q.params {
            query = BindValue::from_json(value, kind)?.bind(query);
        }
        query.fetch_all(pool).await.map_err(AppError::from_db)
    }

    async fn fetch_optional(pool: &PgPool, q: QueryBuf) -> Result<Option<PgRow>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for (value, kind) in &q.params {
            query = BindValue::from_json(value, kind)?.bind(query);
        }
        query.fetch_optional(pool).await.map_err(AppError::from_db)
    }
}

fn row_to_json(row: &PgRow, entity: &EntityDef) -> Result<Value, AppError> {
    let mut map = Map::new();
    for col in entity.columns {
        map.insert(col.name.to_string(), cell_to_value(row, col)?);
    }
    Ok(Value::Object(map))
}

fn cell_to_value(row: &PgRow, col: &ColumnDef) -> Result<Value, sqlx::Error> {
    use sqlx::Row;
    let v = match col.kind {
        ColumnKind::Serial | ColumnKind::Integer => {
            row.try_get::<Option<i32>, _>(col.name)?.map(Value::from)
        }
        ColumnKind::Decimal { .. } => row
            .try_get::<Option<f64>, _>(col.name)?
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        ColumnKind::Text { .. } => row.try_get::<Option<String>, _>(col.name)?.map(Value::String),
        ColumnKind::Timestamp => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(col.name)?
            .map(|d| Value::String(d.to_rfc3339())),
    };
    Ok(v.unwrap_or(Value::Null))
}
