//! Entity descriptors: columns, kinds, and foreign keys.

/// Storage kind of a column; drives DDL, bind casts, validation and row decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Auto-incrementing integer primary key.
    Serial,
    Integer,
    Decimal { precision: u8, scale: u8 },
    Text { max_len: u32 },
    Timestamp,
}

impl ColumnKind {
    /// Type used in CREATE TABLE.
    pub fn ddl_type(&self) -> String {
        match self {
            ColumnKind::Serial => "SERIAL".into(),
            ColumnKind::Integer => "INTEGER".into(),
            ColumnKind::Decimal { precision, scale } => {
                format!("NUMERIC({}, {})", precision, scale)
            }
            ColumnKind::Text { max_len } => format!("VARCHAR({})", max_len),
            ColumnKind::Timestamp => "TIMESTAMPTZ".into(),
        }
    }

    /// Type used to cast bound parameters (`$1::int4`).
    pub fn cast_type(&self) -> &'static str {
        match self {
            ColumnKind::Serial | ColumnKind::Integer => "int4",
            ColumnKind::Decimal { .. } => "numeric",
            ColumnKind::Text { .. } => "text",
            ColumnKind::Timestamp => "timestamptz",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub unique: bool,
    /// SQL default expression, emitted verbatim in DDL.
    pub default: Option<&'static str>,
    /// Must be present (and non-null) in a create payload.
    pub required: bool,
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        ColumnDef {
            name,
            kind,
            nullable: false,
            unique: false,
            default: None,
            required: false,
            references: None,
        }
    }

    pub const fn serial(name: &'static str) -> Self {
        Self::new(name, ColumnKind::Serial)
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn default_expr(mut self, expr: &'static str) -> Self {
        self.default = Some(expr);
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some(ForeignKey { table, column });
        self
    }

    pub fn is_serial(&self) -> bool {
        matches!(self.kind, ColumnKind::Serial)
    }

    /// Whether the database fills the column when an insert omits it.
    pub fn has_default(&self) -> bool {
        self.default.is_some() || self.nullable || self.is_serial()
    }
}

#[derive(Debug)]
pub struct EntityDef {
    /// Display name, e.g. "OrderDetail".
    pub name: &'static str,
    pub table: &'static str,
    pub path_segment: &'static str,
    pub pk: &'static str,
    pub columns: &'static [ColumnDef],
    /// Message returned with 404 for this entity.
    pub not_found: &'static str,
}

impl EntityDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn pk_column(&self) -> Option<&ColumnDef> {
        self.column(self.pk)
    }

    /// Columns a client may write: everything but the serial key.
    pub fn writable_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.name != self.pk && !c.is_serial())
    }
}
