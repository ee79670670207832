//! Data models for the interests backend.
//!
//! JSON uses camelCase field names throughout.

mod followable;
mod interests_item;
mod revision;
mod topic;
mod user_data;

pub use followable::*;
pub use interests_item::*;
pub use revision::*;
pub use topic::*;
pub use user_data::*;
