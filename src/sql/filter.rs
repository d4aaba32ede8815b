//! Translates filter and order descriptors into WHERE and ORDER BY clauses on
//! a `QueryBuilder`. Entity-agnostic: callers pass the entity's column set.

use sqlx::{Postgres, QueryBuilder};

use crate::error::CatalogError;
use crate::model::{FilterDescriptor, FilterOperator, OrderDescriptor, SortDirection};
use crate::sql::columns::{ColumnKind, EntityColumns};
use crate::sql::params::BindValue;

#[derive(Clone, Debug)]
struct Predicate {
    column: &'static str,
    kind: ColumnKind,
    op: FilterOperator,
    value: BindValue,
}

/// Validated, typed filter set. Compile once, push into as many queries as
/// needed (count and page queries share it).
#[derive(Clone, Debug, Default)]
pub struct Predicates {
    items: Vec<Predicate>,
}

impl Predicates {
    pub fn compile(
        filters: &[FilterDescriptor],
        columns: &'static EntityColumns,
    ) -> Result<Self, CatalogError> {
        let mut items = Vec::with_capacity(filters.len());
        for f in filters {
            if f.op == FilterOperator::Unsupported {
                tracing::debug!(column = %f.column, "skipping filter with unsupported operator");
                continue;
            }
            let spec = columns.resolve(&f.column)?;
            let value = match f.op {
                FilterOperator::Search => BindValue::Text(format!("%{}%", escape_like(&f.value))),
                _ => BindValue::parse(spec, &f.value)?,
            };
            items.push(Predicate {
                column: spec.column,
                kind: spec.kind,
                op: f.op,
                value,
            });
        }
        Ok(Predicates { items })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Appends ` WHERE a AND b ...`; nothing when there are no predicates.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, p) in self.items.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            match p.op.sql_comparison() {
                Some(cmp) => {
                    qb.push(p.column);
                    qb.push(cmp);
                }
                None => {
                    if p.kind == ColumnKind::Text {
                        qb.push(p.column);
                    } else {
                        qb.push(format!("CAST({} AS TEXT)", p.column));
                    }
                    qb.push(" ILIKE ");
                }
            }
            p.value.clone().push_bind(qb);
            if p.op.sql_comparison().is_none() {
                qb.push(" ESCAPE '\\'");
            }
        }
    }
}

/// Search terms match literally: LIKE wildcards and the escape character are escaped.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Validated sort keys, applied in sequence with the id column as final tie-breaker.
#[derive(Clone, Debug)]
pub struct Ordering {
    keys: Vec<(&'static str, SortDirection)>,
    id_column: &'static str,
}

impl Ordering {
    pub fn compile(
        orders: &[OrderDescriptor],
        columns: &'static EntityColumns,
    ) -> Result<Self, CatalogError> {
        let mut keys = Vec::with_capacity(orders.len());
        for o in orders {
            let spec = columns.resolve(&o.column)?;
            if keys.iter().any(|(c, _)| *c == spec.column) {
                continue;
            }
            keys.push((spec.column, o.direction));
        }
        Ok(Ordering {
            keys,
            id_column: columns.id_column,
        })
    }

    pub fn push_order_by(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" ORDER BY ");
        let mut sep = qb.separated(", ");
        for (column, direction) in &self.keys {
            sep.push(format!("{} {}", column, direction.as_sql()));
        }
        if !self.keys.iter().any(|(c, _)| *c == self.id_column) {
            sep.push(format!("{} ASC", self.id_column));
        }
    }
}
