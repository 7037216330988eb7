//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::{InfraError, TransportError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::HttpClient { .. } => exitcode::CONFIG,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Domain(DomainError::SortDirMismatch { .. })
        | ApplicationError::Domain(DomainError::SortingUnsupported(_))
        | ApplicationError::Domain(DomainError::EmptyUpdate(_)) => exitcode::USAGE,
        ApplicationError::Domain(_) => exitcode::DATAERR,
        ApplicationError::Transport(TransportError::Unreachable { .. }) => exitcode::UNAVAILABLE,
        ApplicationError::Transport(TransportError::Request { .. }) => exitcode::SOFTWARE,
        ApplicationError::Api { status, .. } => match status {
            401 | 403 => exitcode::NOPERM,
            404 => exitcode::NOINPUT,
            _ => exitcode::SOFTWARE,
        },
        ApplicationError::NotFound { .. } => exitcode::NOINPUT,
        ApplicationError::NoUniqueMatch { .. } => exitcode::DATAERR,
        ApplicationError::UnexpectedResponse { .. } => exitcode::SOFTWARE,
        ApplicationError::Config { .. } => exitcode::CONFIG,
        ApplicationError::OperationFailed { .. } => exitcode::SOFTWARE,
    }
}
