//! Use cases combining repositories into view models.

mod get_followable_topics;

pub use get_followable_topics::*;
