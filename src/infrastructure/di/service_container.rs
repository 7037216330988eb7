//! Service container for dependency injection
//!
//! Wires the API client to its transport.

use std::sync::Arc;

use crate::application::NeutronClient;
use crate::config::Settings;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::traits::{HttpTransport, Transport};

/// Container holding the settings and the transport every command shares.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// HTTP transport abstraction
    pub transport: Arc<dyn Transport>,
}

impl ServiceContainer {
    /// Create a container with the real HTTP transport.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let transport = HttpTransport::new(&settings)?;
        Ok(Self::with_deps(settings, Arc::new(transport)))
    }

    /// Create a container with a custom transport (for testing).
    pub fn with_deps(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
        }
    }

    /// API client bound to this container's transport.
    pub fn client(&self) -> NeutronClient {
        NeutronClient::new(Arc::clone(&self.transport))
    }
}
