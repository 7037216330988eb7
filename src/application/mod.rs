//! Application layer: API client and command implementations
//!
//! This layer turns command arguments into API calls and depends on the
//! transport boundary trait.

pub mod client;
pub mod commands;
pub mod error;
pub mod error_ext;

pub use client::NeutronClient;
pub use commands::{CommandOutput, ListOptions};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::ResultExt;
