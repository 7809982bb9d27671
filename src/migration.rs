//! Apply the catalog to the database: schema, then one table per entity in catalog order.

use crate::error::AppError;
use crate::model::{Catalog, ColumnDef, EntityDef};
use crate::sql::{qualified_table, quoted};
use sqlx::PgPool;

/// `CREATE SCHEMA IF NOT EXISTS` plus `CREATE TABLE IF NOT EXISTS` per entity.
/// Idempotent; existing tables are left untouched.
pub async fn apply_migrations(
    pool: &PgPool,
    catalog: &Catalog,
    schema: &str,
) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
        .execute(pool)
        .await?;
    for entity in catalog.entities() {
        let sql = create_table_sql(entity, schema);
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!(schema = %schema, tables = catalog.entities().len(), "migrations applied");
    Ok(())
}

pub fn create_table_sql(entity: &EntityDef, schema: &str) -> String {
    let mut defs: Vec<String> = entity.columns.iter().map(|c| column_sql(c, schema)).collect();
    defs.push(format!("PRIMARY KEY ({})", quoted(entity.pk)));
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        qualified_table(schema, entity.table),
        defs.join(",\n  ")
    )
}

fn column_sql(c: &ColumnDef, schema: &str) -> String {
    let mut def = format!("{} {}", quoted(c.name), c.kind.ddl_type());
    if !c.nullable {
        def.push_str(" NOT NULL");
    }
    if let Some(d) = c.default {
        def.push_str(" DEFAULT ");
        def.push_str(d);
    }
    if c.unique {
        def.push_str(" UNIQUE");
    }
    if let Some(fk) = c.references {
        def.push_str(&format!(
            " REFERENCES {} ({})",
            qualified_table(schema, fk.table),
            quoted(fk.column)
        ));
    }
    def
}
