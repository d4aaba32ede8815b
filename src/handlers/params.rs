//! Path and query-string parsing shared by the resource handlers.

use crate::error::CatalogError;
use crate::model::{FilterDescriptor, FilterOperator, ListQuery, OrderDescriptor, SortDirection};

/// Positive integer id from a path segment.
pub fn parse_id(id_str: &str) -> Result<i32, CatalogError> {
    match id_str.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CatalogError::BadRequest(format!("invalid id '{}'", id_str))),
    }
}

/// Builds a [`ListQuery`] from raw query pairs, keeping their order.
///
/// - `page`, `limit`: integers; anything unparsable falls back to the store default.
/// - `order_by`: comma-separated keys, each optionally `key:asc|desc`.
/// - `sort`: direction for `order_by` keys that carry none.
/// - `key=value`: case-insensitive substring search on `key`.
/// - `key__op=value`: comparison, `op` one of eq, ne, gt, gte, lt, lte, search.
///
/// Keys are checked against the entity columns by the store, not here.
pub fn list_query_from_params(params: &[(String, String)]) -> ListQuery {
    let mut query = ListQuery::default();
    let mut order_keys: Vec<(String, Option<SortDirection>)> = Vec::new();
    let mut default_direction = SortDirection::Asc;

    for (k, v) in params {
        match k.as_str() {
            "page" => query.page = v.trim().parse().unwrap_or(0),
            "limit" => query.limit = v.trim().parse().unwrap_or(0),
            "sort" => default_direction = SortDirection::parse(v),
            "order_by" => {
                for item in v.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    match item.split_once(':') {
                        Some((col, dir)) => order_keys.push((col.to_string(), Some(SortDirection::parse(dir)))),
                        None => order_keys.push((item.to_string(), None)),
                    }
                }
            }
            _ => {
                if v.is_empty() {
                    continue;
                }
                let (column, op) = match k.rsplit_once("__") {
                    Some((col, op)) => (col, FilterOperator::parse(op)),
                    None => (k.as_str(), FilterOperator::Search),
                };
                query.filters.push(FilterDescriptor::new(column, op, v.clone()));
            }
        }
    }

    query.order_by = order_keys
        .into_iter()
        .map(|(col, dir)| OrderDescriptor::new(col, dir.unwrap_or(default_direction)))
        .collect();
    query
}
