//! Catalog validation: referential integrity and route consistency.

use crate::error::ConfigError;
use crate::model::types::EntityDef;
use std::collections::{HashMap, HashSet};

/// Checks that path segments are unique, each primary key names a column, and
/// every foreign key targets a column of an entity declared before it.
pub fn validate(entities: &[&EntityDef]) -> Result<(), ConfigError> {
    let mut path_segments = HashSet::new();
    let mut declared: HashMap<&str, &EntityDef> = HashMap::new();

    for entity in entities {
        if !path_segments.insert(entity.path_segment) {
            return Err(ConfigError::DuplicatePathSegment(entity.path_segment.to_string()));
        }
        if entity.pk_column().is_none() {
            return Err(ConfigError::InvalidPrimaryKey {
                table: entity.table.to_string(),
                column: entity.pk.to_string(),
            });
        }
        for col in entity.columns {
            let Some(fk) = col.references else { continue };
            let target = declared.get(fk.table).ok_or_else(|| ConfigError::MissingReference {
                kind: "table",
                id: fk.table.to_string(),
            })?;
            if target.column(fk.column).is_none() {
                return Err(ConfigError::MissingReference {
                    kind: "column",
                    id: format!("{}.{}", fk.table, fk.column),
                });
            }
        }
        declared.insert(entity.table, entity);
    }
    Ok(())
}
