//! Error conversion helpers
//!
//! Provides an extension trait for attaching context to foreign errors.

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting foreign results to `ApplicationResult` with context.
pub trait ResultExt<T> {
    /// Attach a short description of what was being attempted.
    ///
    /// # Example
    /// ```ignore
    /// serde_json::from_str::<Value>(&body).context("decode tunnelzones response")?;
    /// ```
    fn context(self, action: impl Into<String>) -> ApplicationResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, action: impl Into<String>) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: action.into(),
            source: Box::new(e),
        })
    }
}
