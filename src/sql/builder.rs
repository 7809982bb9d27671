//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from an entity definition.

use crate::model::{ColumnDef, ColumnKind, EntityDef};
use serde_json::Value;
use std::collections::HashMap;

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Schema-qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    /// Bound values, each with the kind of the column it is compared to or written into.
    pub params: Vec<(Value, ColumnKind)>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Pushes a value and returns its cast placeholder, e.g. `$2::int4`.
    fn push_param(&mut self, v: Value, kind: &ColumnKind) -> String {
        self.params.push((v, *kind));
        format!("${}::{}", self.params.len(), kind.cast_type())
    }
}

/// Numeric columns come back as float8 so they decode into f64.
fn select_column_list(entity: &EntityDef) -> String {
    entity
        .columns
        .iter()
        .map(|c| {
            let q = quoted(c.name);
            match c.kind {
                ColumnKind::Decimal { .. } => format!("{}::float8 AS {}", q, q),
                _ => q,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn pk_kind(entity: &EntityDef) -> ColumnKind {
    entity
        .pk_column()
        .map(|c| c.kind)
        .unwrap_or(ColumnKind::Integer)
}

/// SELECT all columns with optional exact-match filters, ORDER BY pk, optional LIMIT/OFFSET.
/// Filters naming unknown columns are ignored.
pub fn select_list(
    entity: &EntityDef,
    schema: &str,
    filters: &[(String, Value)],
    limit: Option<u32>,
    offset: Option<u32>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for (col, val) in filters {
        let Some(c) = entity.column(col) else { continue };
        let ph = q.push_param(val.clone(), &c.kind);
        where_parts.push(format!("{} = {}", quoted(col), ph));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let limit_clause = limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    let offset_clause = offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}{}{}",
        select_column_list(entity),
        qualified_table(schema, entity.table),
        where_clause,
        quoted(entity.pk),
        limit_clause,
        offset_clause
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(entity: &EntityDef, schema: &str, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(id.clone(), &pk_kind(entity));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(entity),
        qualified_table(schema, entity.table),
        quoted(entity.pk),
        ph
    );
    q
}

/// INSERT the writable columns present in `body`. Absent columns that the
/// database can fill are omitted; absent columns without a default are sent as NULL
/// so the NOT NULL constraint reports them.
pub fn insert(entity: &EntityDef, schema: &str, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in entity.writable_columns() {
        let val = match body.get(c.name) {
            Some(v) => v.clone(),
            None if c.has_default() => continue,
            None => Value::Null,
        };
        placeholders.push(q.push_param(val, &c.kind));
        cols.push(quoted(c.name));
    }
    let table = qualified_table(schema, entity.table);
    let returning = select_column_list(entity);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE by id: SET only writable columns present in body, in column order.
/// With nothing to set, selects the row instead so the caller still sees 404 vs 200.
pub fn update(
    entity: &EntityDef,
    schema: &str,
    id: &Value,
    body: &HashMap<String, Value>,
) -> QueryBuf {
    let present: Vec<(&ColumnDef, &Value)> = entity
        .writable_columns()
        .filter_map(|c| body.get(c.name).map(|v| (c, v)))
        .collect();
    if present.is_empty() {
        return select_by_id(entity, schema, id);
    }
    let mut q = QueryBuf::new();
    let sets: Vec<String> = present
        .into_iter()
        .map(|(c, v)| {
            let ph = q.push_param(v.clone(), &c.kind);
            format!("{} = {}", quoted(c.name), ph)
        })
        .collect();
    let id_ph = q.push_param(id.clone(), &pk_kind(entity));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        qualified_table(schema, entity.table),
        sets.join(", "),
        quoted(entity.pk),
        id_ph,
        select_column_list(entity)
    );
    q
}

/// DELETE by id, returning the key of the removed row.
pub fn delete(entity: &EntityDef, schema: &str, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(id.clone(), &pk_kind(entity));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {} RETURNING {}",
        qualified_table(schema, entity.table),
        quoted(entity.pk),
        ph,
        quoted(entity.pk)
    );
    q
}
