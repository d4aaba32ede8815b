//! HTTP handlers for the `/v1/movies` and `/v1/actors` resources.

pub mod actor;
pub mod movie;
mod params;

pub use params::{list_query_from_params, parse_id};
