//! Domain layer: resource kinds, request bodies and argument parsing
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod params;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use params::{attributes_to_query, parse_attributes, parse_key_value_map};
