//! Page number and size to LIMIT/OFFSET.

use sqlx::{Postgres, QueryBuilder};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Bounded LIMIT/OFFSET derived from a 1-based page number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// A non-positive `limit` means the default of 10; limits above
    /// `max_limit` are clamped. Pages below 1 start at offset 0.
    pub fn new(page: i64, limit: i64, max_limit: i64) -> Self {
        let max_limit = max_limit.max(1);
        let limit = if limit <= 0 { DEFAULT_PAGE_LIMIT } else { limit }.min(max_limit);
        let offset = page.saturating_sub(1).saturating_mul(limit).max(0);
        Page { limit, offset }
    }

    pub fn push_limit_offset(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" LIMIT ");
        qb.push_bind(self.limit);
        qb.push(" OFFSET ");
        qb.push_bind(self.offset);
    }
}
