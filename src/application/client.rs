//! Neutron API client
//!
//! Owns the collection paths, decodes responses and Neutron error envelopes,
//! and resolves names to ids. One method per API call.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::error_ext::ResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{AgentAssociation, NetworkAssociation, ResourceKind};
use crate::infrastructure::traits::{ApiRequest, ApiResponse, Method, Transport};

const ROUTING_INSTANCE_NETWORKS: &str = "networks";
const ROUTING_INSTANCE_AGENTS: &str = "agents";

/// Neutron error envelope: `{"NeutronError": {...}}` or `{"NeutronError": "text"}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "NeutronError")]
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed {
        #[serde(rename = "type")]
        kind: Option<String>,
        message: String,
        #[serde(default)]
        detail: Option<String>,
    },
    Plain(String),
}

/// Client for the Neutron v2.0 API and its routing / tunnel zone extensions.
#[derive(Clone)]
pub struct NeutronClient {
    transport: Arc<dyn Transport>,
}

impl NeutronClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn collection_path(kind: ResourceKind) -> String {
        format!("/{}", kind.collection())
    }

    fn item_path(kind: ResourceKind, id: &str) -> String {
        format!("/{}/{}", kind.collection(), id)
    }

    fn routinginstance_path(routinginstance: &str, sub: &str) -> String {
        format!(
            "{}/{}",
            Self::item_path(ResourceKind::RoutingInstance, routinginstance),
            sub
        )
    }

    /// Send a request; non-2xx statuses become `ApplicationError::Api`.
    /// Empty success bodies (204) decode to `None`.
    fn execute(&self, request: ApiRequest) -> ApplicationResult<Option<Value>> {
        let response = self.transport.send(&request)?;
        if !response.is_success() {
            return Err(decode_error(&response));
        }
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        let value = serde_json::from_str(&response.body)
            .context(format!("decode response of {} {}", request.method, request.path))?;
        Ok(Some(value))
    }

    fn execute_expecting(&self, request: ApiRequest, key: &str) -> ApplicationResult<Value> {
        let context = format!("{} {}", request.method, request.path);
        let body = self.execute(request)?;
        body.and_then(|mut value| value.get_mut(key).map(Value::take))
            .ok_or_else(|| ApplicationError::UnexpectedResponse {
                context: format!("{context}: missing '{key}'"),
            })
    }

    fn execute_list(&self, request: ApiRequest, key: &str) -> ApplicationResult<Vec<Value>> {
        let context = format!("{} {}", request.method, request.path);
        match self.execute_expecting(request, key)? {
            Value::Array(items) => Ok(items),
            _ => Err(ApplicationError::UnexpectedResponse {
                context: format!("{context}: '{key}' is not a list"),
            }),
        }
    }

    /// `GET /{collection}`
    pub fn list(
        &self,
        kind: ResourceKind,
        query: Vec<(String, String)>,
    ) -> ApplicationResult<Vec<Value>> {
        let request = ApiRequest::new(Method::Get, Self::collection_path(kind)).with_query(query);
        self.execute_list(request, kind.collection())
    }

    /// `GET /{collection}/{id}`
    pub fn show(
        &self,
        kind: ResourceKind,
        id: &str,
        query: Vec<(String, String)>,
    ) -> ApplicationResult<Value> {
        let request = ApiRequest::new(Method::Get, Self::item_path(kind, id)).with_query(query);
        self.execute_expecting(request, kind.resource())
    }

    /// `POST /{collection}` with a body already wrapped under the resource key.
    pub fn create(&self, kind: ResourceKind, body: Value) -> ApplicationResult<Value> {
        let request = ApiRequest::new(Method::Post, Self::collection_path(kind)).with_body(body);
        self.execute_expecting(request, kind.resource())
    }

    /// `PUT /{collection}/{id}`
    pub fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        body: Value,
    ) -> ApplicationResult<Option<Value>> {
        let request = ApiRequest::new(Method::Put, Self::item_path(kind, id)).with_body(body);
        let response = self.execute(request)?;
        Ok(response.and_then(|mut value| value.get_mut(kind.resource()).map(Value::take)))
    }

    /// `DELETE /{collection}/{id}`
    pub fn delete(&self, kind: ResourceKind, id: &str) -> ApplicationResult<()> {
        self.execute(ApiRequest::new(Method::Delete, Self::item_path(kind, id)))?;
        Ok(())
    }

    /// `POST /routinginstances/{id}/networks`
    pub fn add_network_to_routinginstance(
        &self,
        routinginstance: &str,
        body: &NetworkAssociation,
    ) -> ApplicationResult<Option<Value>> {
        let body = serde_json::to_value(body).context("encode network association")?;
        let request = ApiRequest::new(
            Method::Post,
            Self::routinginstance_path(routinginstance, ROUTING_INSTANCE_NETWORKS),
        )
        .with_body(body);
        self.execute(request)
    }

    /// `DELETE /routinginstances/{id}/networks/{network_id}`
    pub fn remove_network_from_routinginstance(
        &self,
        routinginstance: &str,
        network_id: &str,
    ) -> ApplicationResult<()> {
        let path = format!(
            "{}/{}",
            Self::routinginstance_path(routinginstance, ROUTING_INSTANCE_NETWORKS),
            network_id
        );
        self.execute(ApiRequest::new(Method::Delete, path))?;
        Ok(())
    }

    /// `GET /routinginstances/{id}/networks`
    pub fn list_networks_on_routinginstance(
        &self,
        routinginstance: &str,
        query: Vec<(String, String)>,
    ) -> ApplicationResult<Vec<Value>> {
        let request = ApiRequest::new(
            Method::Get,
            Self::routinginstance_path(routinginstance, ROUTING_INSTANCE_NETWORKS),
        )
        .with_query(query);
        self.execute_list(request, ResourceKind::Network.collection())
    }

    /// `POST /routinginstances/{id}/agents`
    pub fn add_agent_to_routinginstance(
        &self,
        routinginstance: &str,
        body: &AgentAssociation,
    ) -> ApplicationResult<Option<Value>> {
        let body = serde_json::to_value(body).context("encode agent association")?;
        let request = ApiRequest::new(
            Method::Post,
            Self::routinginstance_path(routinginstance, ROUTING_INSTANCE_AGENTS),
        )
        .with_body(body);
        self.execute(request)
    }

    /// `DELETE /routinginstances/{id}/agents/{agent_id}`
    pub fn remove_agent_from_routinginstance(
        &self,
        routinginstance: &str,
        agent_id: &str,
    ) -> ApplicationResult<()> {
        let path = format!(
            "{}/{}",
            Self::routinginstance_path(routinginstance, ROUTING_INSTANCE_AGENTS),
            agent_id
        );
        self.execute(ApiRequest::new(Method::Delete, path))?;
        Ok(())
    }

    /// `GET /routinginstances/{id}/agents`
    pub fn list_agents_on_routinginstance(
        &self,
        routinginstance: &str,
        query: Vec<(String, String)>,
    ) -> ApplicationResult<Vec<Value>> {
        let request = ApiRequest::new(
            Method::Get,
            Self::routinginstance_path(routinginstance, ROUTING_INSTANCE_AGENTS),
        )
        .with_query(query);
        self.execute_list(request, ResourceKind::Agent.collection())
    }

    /// Resolve a name or id to an id.
    ///
    /// UUID-looking values are tried as ids first; otherwise (or on a miss)
    /// the value is looked up by name and must match exactly one resource.
    #[instrument(level = "debug", skip(self))]
    pub fn find_resourceid_by_name_or_id(
        &self,
        kind: ResourceKind,
        name_or_id: &str,
    ) -> ApplicationResult<String> {
        if Uuid::parse_str(name_or_id).is_ok() {
            let matches = self.lookup_ids(kind, "id", name_or_id)?;
            if let Some(id) = matches.into_iter().next() {
                return Ok(id);
            }
        }

        let mut matches = self.lookup_ids(kind, "name", name_or_id)?;
        match matches.len() {
            0 => Err(ApplicationError::NotFound {
                resource: kind.resource(),
                name: name_or_id.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            n => {
                debug!("{} {} matches for '{}'", n, kind, name_or_id);
                Err(ApplicationError::NoUniqueMatch {
                    resource: kind.resource(),
                    name: name_or_id.to_string(),
                })
            }
        }
    }

    fn lookup_ids(
        &self,
        kind: ResourceKind,
        filter: &str,
        value: &str,
    ) -> ApplicationResult<Vec<String>> {
        let query = vec![
            (filter.to_string(), value.to_string()),
            ("fields".to_string(), "id".to_string()),
        ];
        let records = self.list(kind, query)?;
        Ok(records
            .iter()
            .filter_map(|record| record.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

/// Turn a non-2xx response into an API error, preferring the Neutron envelope.
fn decode_error(response: &ApiResponse) -> ApplicationError {
    let (kind, message) = match serde_json::from_str::<ErrorEnvelope>(&response.body) {
        Ok(ErrorEnvelope {
            error:
                ErrorBody::Detailed {
                    kind,
                    message,
                    detail,
                },
        }) => {
            let message = match detail.filter(|d| !d.is_empty()) {
                Some(detail) => format!("{message}\n{detail}"),
                None => message,
            };
            (kind, message)
        }
        Ok(ErrorEnvelope {
            error: ErrorBody::Plain(message),
        }) => (None, message),
        Err(_) => {
            let text = response.body.trim();
            let message = if text.is_empty() {
                format!("server returned HTTP {}", response.status)
            } else {
                text.to_string()
            };
            (None, message)
        }
    };
    ApplicationError::Api {
        status: response.status,
        kind,
        message,
    }
}
