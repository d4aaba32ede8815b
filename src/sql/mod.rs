//! Safe query building: identifiers from per-entity allow-lists only, values as parameters.

pub mod columns;
mod filter;
mod page;
pub mod params;

pub use columns::{ColumnKind, ColumnSpec, EntityColumns, ACTOR_COLUMNS, MOVIE_COLUMNS};
pub use filter::*;
pub use page::*;
pub use params::BindValue;
