//! Filter, order and page descriptors for list queries.

use serde::{Deserialize, Serialize};

/// Comparison applied by a filter descriptor. Operators the translator does
/// not know deserialize to `Unsupported` and are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Search,
    Unsupported,
}

impl From<String> for FilterOperator {
    fn from(s: String) -> Self {
        FilterOperator::parse(&s)
    }
}

impl FilterOperator {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "eq" => FilterOperator::Eq,
            "ne" => FilterOperator::Ne,
            "gt" => FilterOperator::Gt,
            "gte" => FilterOperator::Gte,
            "lt" => FilterOperator::Lt,
            "lte" => FilterOperator::Lte,
            "search" => FilterOperator::Search,
            _ => FilterOperator::Unsupported,
        }
    }

    /// SQL comparison token; `None` for operators that are not plain comparisons.
    pub fn sql_comparison(self) -> Option<&'static str> {
        match self {
            FilterOperator::Eq => Some(" = "),
            FilterOperator::Ne => Some(" <> "),
            FilterOperator::Gt => Some(" > "),
            FilterOperator::Gte => Some(" >= "),
            FilterOperator::Lt => Some(" < "),
            FilterOperator::Lte => Some(" <= "),
            FilterOperator::Search | FilterOperator::Unsupported => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<String> for SortDirection {
    fn from(s: String) -> Self {
        SortDirection::parse(&s)
    }
}

impl SortDirection {
    /// Anything other than `desc` sorts ascending.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub column: String,
    #[serde(rename = "type", alias = "op")]
    pub op: FilterOperator,
    pub value: String,
}

impl FilterDescriptor {
    pub fn new(column: impl Into<String>, op: FilterOperator, value: impl Into<String>) -> Self {
        FilterDescriptor {
            column: column.into(),
            op,
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDescriptor {
    pub column: String,
    #[serde(default, rename = "order", alias = "direction")]
    pub direction: SortDirection,
}

impl OrderDescriptor {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        OrderDescriptor {
            column: column.into(),
            direction,
        }
    }
}

/// Page request with conjunctive filters and ordered sort keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
    #[serde(default)]
    pub order_by: Vec<OrderDescriptor>,
}

impl ListQuery {
    pub fn page(page: i64, limit: i64) -> Self {
        ListQuery {
            page,
            limit,
            ..Default::default()
        }
    }

    pub fn filter(mut self, column: &str, op: FilterOperator, value: impl Into<String>) -> Self {
        self.filters.push(FilterDescriptor::new(column, op, value));
        self
    }

    pub fn order(mut self, column: &str, direction: SortDirection) -> Self {
        self.order_by.push(OrderDescriptor::new(column, direction));
        self
    }
}
