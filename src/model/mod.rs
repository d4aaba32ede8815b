//! Typed catalog entities, write requests and list descriptors.

mod actor;
mod movie;
mod query;

pub use actor::*;
pub use movie::*;
pub use query::*;
