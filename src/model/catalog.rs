//! The five shop entities and the catalog that indexes them by path segment.

use crate::error::ConfigError;
use crate::model::types::{ColumnDef, ColumnKind, EntityDef};
use crate::model::validate;
use std::collections::HashMap;

const NAME_LEN: u32 = 100;

pub static SANDWICHES: EntityDef = EntityDef {
    name: "Sandwich",
    table: "sandwiches",
    path_segment: "sandwiches",
    pk: "id",
    columns: &[
        ColumnDef::serial("id"),
        ColumnDef::new("sandwich_name", ColumnKind::Text { max_len: NAME_LEN })
            .unique()
            .required(),
        ColumnDef::new("price", ColumnKind::Decimal { precision: 4, scale: 2 }).required(),
    ],
    not_found: "Sandwich not found",
};

pub static RESOURCES: EntityDef = EntityDef {
    name: "Resource",
    table: "resources",
    path_segment: "resources",
    pk: "id",
    columns: &[
        ColumnDef::serial("id"),
        ColumnDef::new("item", ColumnKind::Text { max_len: NAME_LEN })
            .unique()
            .required(),
        ColumnDef::new("amount", ColumnKind::Integer)
            .default_expr("0")
            .required(),
    ],
    not_found: "Resource not found",
};

pub static ORDERS: EntityDef = EntityDef {
    name: "Order",
    table: "orders",
    path_segment: "orders",
    pk: "id",
    columns: &[
        ColumnDef::serial("id"),
        ColumnDef::new("customer_name", ColumnKind::Text { max_len: NAME_LEN }).required(),
        ColumnDef::new("order_date", ColumnKind::Timestamp).default_expr("NOW()"),
        ColumnDef::new("description", ColumnKind::Text { max_len: 300 }).nullable(),
    ],
    not_found: "Order not found",
};

pub static RECIPES: EntityDef = EntityDef {
    name: "Recipe",
    table: "recipes",
    path_segment: "recipes",
    pk: "id",
    columns: &[
        ColumnDef::serial("id"),
        ColumnDef::new("sandwich_id", ColumnKind::Integer)
            .references("sandwiches", "id")
            .required(),
        ColumnDef::new("resource_id", ColumnKind::Integer)
            .references("resources", "id")
            .required(),
        ColumnDef::new("amount", ColumnKind::Integer)
            .default_expr("0")
            .required(),
    ],
    not_found: "Recipe not found",
};

pub static ORDER_DETAILS: EntityDef = EntityDef {
    name: "OrderDetail",
    table: "order_details",
    path_segment: "order-details",
    pk: "id",
    columns: &[
        ColumnDef::serial("id"),
        ColumnDef::new("order_id", ColumnKind::Integer)
            .references("orders", "id")
            .required(),
        ColumnDef::new("sandwich_id", ColumnKind::Integer)
            .references("sandwiches", "id")
            .required(),
        ColumnDef::new("amount", ColumnKind::Integer).required(),
    ],
    not_found: "Order detail not found",
};

/// Validated set of entities. Order is significant: referenced tables come first.
#[derive(Debug)]
pub struct Catalog {
    entities: Vec<&'static EntityDef>,
    by_path: HashMap<&'static str, &'static EntityDef>,
}

impl Catalog {
    pub fn new(entities: Vec<&'static EntityDef>) -> Result<Self, ConfigError> {
        validate(&entities)?;
        let by_path = entities.iter().map(|e| (e.path_segment, *e)).collect();
        Ok(Catalog { entities, by_path })
    }

    /// Sandwiches, resources, orders, recipes, order details.
    pub fn standard() -> Result<Self, ConfigError> {
        Self::new(vec![&SANDWICHES, &RESOURCES, &ORDERS, &RECIPES, &ORDER_DETAILS])
    }

    pub fn entities(&self) -> &[&'static EntityDef] {
        &self.entities
    }

    pub fn entity_by_path(&self, path: &str) -> Option<&'static EntityDef> {
        self.by_path.get(path).copied()
    }
}
