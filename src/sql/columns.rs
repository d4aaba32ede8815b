//! Queryable columns per entity. External filter and sort keys resolve to
//! these identifiers; anything else is rejected.

use crate::error::CatalogError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Timestamp,
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnSpec {
    /// Key accepted from callers.
    pub key: &'static str,
    /// Column identifier written into SQL.
    pub column: &'static str,
    pub kind: ColumnKind,
    /// Whether bulk field updates may assign this column.
    pub writable: bool,
}

const fn col(key: &'static str, column: &'static str, kind: ColumnKind, writable: bool) -> ColumnSpec {
    ColumnSpec {
        key,
        column,
        kind,
        writable,
    }
}

#[derive(Debug)]
pub struct EntityColumns {
    pub table: &'static str,
    pub id_column: &'static str,
    columns: &'static [ColumnSpec],
}

impl EntityColumns {
    pub fn resolve(&self, key: &str) -> Result<&ColumnSpec, CatalogError> {
        let wanted = key.trim();
        self.columns
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownColumn {
                column: key.to_string(),
            })
    }

    /// Like [`resolve`](Self::resolve), but only for columns a bulk update may set.
    pub fn resolve_writable(&self, key: &str) -> Result<&ColumnSpec, CatalogError> {
        let spec = self.resolve(key)?;
        if !spec.writable {
            return Err(CatalogError::Validation(format!("column '{}' is read-only", spec.key)));
        }
        Ok(spec)
    }
}

pub static MOVIE_COLUMNS: EntityColumns = EntityColumns {
    table: "movies",
    id_column: "id",
    columns: &[
        col("id", "id", ColumnKind::Integer, false),
        col("title", "title", ColumnKind::Text, true),
        col("director", "director", ColumnKind::Text, true),
        col("year", "year", ColumnKind::Integer, true),
        col("plot", "plot", ColumnKind::Text, true),
        col("synopsis", "plot", ColumnKind::Text, true),
        col("created_at", "created_at", ColumnKind::Timestamp, false),
        col("updated_at", "updated_at", ColumnKind::Timestamp, false),
    ],
};

pub static ACTOR_COLUMNS: EntityColumns = EntityColumns {
    table: "actors",
    id_column: "id",
    columns: &[
        col("id", "id", ColumnKind::Integer, false),
        col("first_name", "first_name", ColumnKind::Text, true),
        col("last_name", "last_name", ColumnKind::Text, true),
        col("role", "role", ColumnKind::Text, true),
        col("created_at", "created_at", ColumnKind::Timestamp, false),
        col("updated_at", "updated_at", ColumnKind::Timestamp, false),
    ],
};
