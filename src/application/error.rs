//! Application-level errors (wraps domain and transport errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::error::TransportError;

/// Application errors wrap domain errors and add API-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Transport(#[from] TransportError),

    /// Error reported by the Neutron server.
    #[error("{message}")]
    Api {
        status: u16,
        kind: Option<String>,
        message: String,
    },

    #[error("unable to find {resource} with name or id '{name}'")]
    NotFound { resource: &'static str, name: String },

    #[error("multiple {resource} matches found for name '{name}', use an ID to be more specific")]
    NoUniqueMatch { resource: &'static str, name: String },

    #[error("unexpected response: {context}")]
    UnexpectedResponse { context: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// HTTP status of a server-reported error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApplicationError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
