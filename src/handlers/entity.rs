//! Entity CRUD handlers: create, list, read, update, delete.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{ColumnKind, EntityDef};
use crate::service::{CrudService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

fn resolve_entity(state: &AppState, path_segment: &str) -> Result<&'static EntityDef, AppError> {
    state
        .catalog
        .entity_by_path(path_segment)
        .ok_or_else(|| AppError::NotFound(format!("unknown resource '{}'", path_segment)))
}

pub(crate) fn parse_id(id_str: &str) -> Result<Value, AppError> {
    let n: i32 = id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))?;
    Ok(Value::Number(n.into()))
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Query-string values arrive as text; convert numeric columns so the bind matches.
fn query_value_for_column(kind: &ColumnKind, s: &str) -> Result<Value, AppError> {
    match kind {
        ColumnKind::Serial | ColumnKind::Integer => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| AppError::BadRequest(format!("invalid integer filter '{}'", s))),
        ColumnKind::Decimal { .. } => s
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| AppError::BadRequest(format!("invalid number filter '{}'", s))),
        ColumnKind::Text { .. } | ColumnKind::Timestamp => Ok(Value::String(s.to_string())),
    }
}

fn parse_page_param(name: &str, v: &str) -> Result<u32, AppError> {
    v.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid {}", name)))
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve_entity(&state, &path_segment)?;

    let mut limit: Option<u32> = None;
    let mut offset: Option<u32> = None;
    let mut filters: Vec<(String, Value)> = Vec::new();

    for (k, v) in params {
        match k.as_str() {
            "limit" => limit = Some(parse_page_param("limit", &v)?),
            "offset" => offset = Some(parse_page_param("offset", &v)?),
            _ => {
                if let Some(col) = entity.column(&k) {
                    let val = query_value_for_column(&col.kind, &v)?;
                    filters.push((k, val));
                }
            }
        }
    }
    filters.sort_by(|a, b| a.0.cmp(&b.0));

    let rows =
        CrudService::list(&state.pool, entity, &state.schema, &filters, limit, offset).await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve_entity(&state, &path_segment)?;
    let fields = RequestValidator::validate_create(entity, body_to_map(body)?)?;
    let row = CrudService::create(&state.pool, entity, &state.schema, &fields).await?;
    Ok(Json(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve_entity(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    let row = CrudService::read(&state.pool, entity, &state.schema, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(entity.not_found.into()))?;
    Ok(Json(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve_entity(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    let fields = RequestValidator::validate_update(entity, body_to_map(body)?)?;
    let row = CrudService::update(&state.pool, entity, &state.schema, &id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound(entity.not_found.into()))?;
    Ok(Json(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve_entity(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    if !CrudService::delete(&state.pool, entity, &state.schema, &id).await? {
        return Err(AppError::NotFound(entity.not_found.into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
