//! Domain entities: resource kinds and request bodies

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use serde::Serialize;
use serde_json::Value;

/// Remote resource types reachable through the Neutron v2.0 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    RoutingInstance,
    RoutingPeer,
    TunnelZone,
    TunnelZoneHost,
    Network,
    Agent,
}

impl ResourceKind {
    /// Singular name, used as the request/response body key.
    pub fn resource(&self) -> &'static str {
        match self {
            ResourceKind::RoutingInstance => "routinginstance",
            ResourceKind::RoutingPeer => "routingpeer",
            ResourceKind::TunnelZone => "tunnelzone",
            ResourceKind::TunnelZoneHost => "tunnelzonehost",
            ResourceKind::Network => "network",
            ResourceKind::Agent => "agent",
        }
    }

    /// Plural name, used as the URL collection and list body key.
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::RoutingInstance => "routinginstances",
            ResourceKind::RoutingPeer => "routingpeers",
            ResourceKind::TunnelZone => "tunnelzones",
            ResourceKind::TunnelZoneHost => "tunnelzonehosts",
            ResourceKind::Network => "networks",
            ResourceKind::Agent => "agents",
        }
    }

    /// Columns shown by list commands unless `--show-details` or `--field` is given.
    ///
    /// An empty slice means "every field of the first record".
    pub fn list_columns(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::RoutingInstance => &[
                "id",
                "tenant_id",
                "nexthop",
                "advertise",
                "discover",
                "networks",
                "agents",
            ],
            ResourceKind::RoutingPeer => &["id", "peer", "protocol", "configuration"],
            ResourceKind::Network => &["id", "name", "subnets"],
            ResourceKind::Agent => &["id", "host", "admin_state_up", "alive"],
            ResourceKind::TunnelZone | ResourceKind::TunnelZoneHost => &[],
        }
    }

    /// Whether the server accepts `sort_key`/`sort_dir` for this collection.
    pub fn sorting_support(&self) -> bool {
        matches!(
            self,
            ResourceKind::RoutingInstance | ResourceKind::RoutingPeer | ResourceKind::Network
        )
    }

    /// Wrap a body under this resource's key: `{"<resource>": body}`.
    pub fn envelope<T: Serialize>(&self, body: &T) -> serde_json::Result<Value> {
        let mut wrapped = serde_json::Map::new();
        wrapped.insert(self.resource().to_string(), serde_json::to_value(body)?);
        Ok(Value::Object(wrapped))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// Body of `routinginstance-create`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoutingInstanceCreate {
    pub advertise: bool,
    pub discover: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nexthop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl RoutingInstanceCreate {
    /// An empty nexthop is treated as absent.
    pub fn new(
        advertise: bool,
        discover: bool,
        nexthop: &str,
        tenant_id: Option<String>,
    ) -> Self {
        Self {
            advertise,
            discover,
            nexthop: (!nexthop.is_empty()).then(|| nexthop.to_string()),
            tenant_id,
        }
    }
}

/// Body of `routingpeer-create`.
///
/// `password` is always sent, as `null` when not given.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoutingPeerCreate {
    pub peer: String,
    pub remote_as: u32,
    pub password: Option<String>,
    pub extra_config: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Body of `tunnelzone-create`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TunnelZoneCreate {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Body of `tunnelzone-host-create`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TunnelZoneHostCreate {
    pub host_id: String,
    pub ip_address: IpAddr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnelzone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Body of `routinginstance-network-add` (sent unwrapped).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NetworkAssociation {
    pub network_id: String,
}

/// Body of `routinginstance-agent-add` (sent unwrapped).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AgentAssociation {
    pub agent_id: String,
}
