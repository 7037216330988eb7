//! Network and agent associations of a routing instance

use serde_json::Value;
use tracing::debug;

use super::{CommandOutput, ListOptions};
use crate::application::client::NeutronClient;
use crate::application::ApplicationResult;
use crate::domain::{AgentAssociation, NetworkAssociation, ResourceKind};

/// Attach a network (by name or id) to a routing instance.
pub fn add_network(
    client: &NeutronClient,
    routinginstance: &str,
    network: &str,
) -> ApplicationResult<CommandOutput> {
    let network_id = client.find_resourceid_by_name_or_id(ResourceKind::Network, network)?;
    debug!("network '{}' resolved to {}", network, network_id);
    client.add_network_to_routinginstance(routinginstance, &NetworkAssociation { network_id })?;
    Ok(CommandOutput::Message(format!(
        "Added network {} to routing instance",
        network
    )))
}

/// Detach a network (by name or id) from a routing instance.
pub fn remove_network(
    client: &NeutronClient,
    routinginstance: &str,
    network: &str,
) -> ApplicationResult<CommandOutput> {
    let network_id = client.find_resourceid_by_name_or_id(ResourceKind::Network, network)?;
    client.remove_network_from_routinginstance(routinginstance, &network_id)?;
    Ok(CommandOutput::Message(format!(
        "Removed network {} from routing instance",
        network
    )))
}

/// List networks attached to a routing instance.
pub fn list_networks(
    client: &NeutronClient,
    routinginstance: &str,
    options: &ListOptions,
) -> ApplicationResult<CommandOutput> {
    let kind = ResourceKind::Network;
    let rows = client.list_networks_on_routinginstance(routinginstance, options.to_query(kind)?)?;
    Ok(CommandOutput::Table {
        columns: options.columns(kind.list_columns(), &rows),
        rows,
    })
}

/// Attach an agent (by id) to a routing instance.
pub fn add_agent(
    client: &NeutronClient,
    routinginstance: &str,
    agent: &str,
) -> ApplicationResult<CommandOutput> {
    let body = AgentAssociation {
        agent_id: agent.to_string(),
    };
    client.add_agent_to_routinginstance(routinginstance, &body)?;
    Ok(CommandOutput::Message(format!(
        "Added agent {} to routing instance",
        agent
    )))
}

/// Detach an agent (by id) from a routing instance.
pub fn remove_agent(
    client: &NeutronClient,
    routinginstance: &str,
    agent: &str,
) -> ApplicationResult<CommandOutput> {
    client.remove_agent_from_routinginstance(routinginstance, agent)?;
    Ok(CommandOutput::Message(format!(
        "Removed agent {} from routing instance",
        agent
    )))
}

/// List agents attached to a routing instance; `alive` is shown as `:-)` or `xxx`.
pub fn list_agents(
    client: &NeutronClient,
    routinginstance: &str,
    options: &ListOptions,
) -> ApplicationResult<CommandOutput> {
    let kind = ResourceKind::Agent;
    let mut rows =
        client.list_agents_on_routinginstance(routinginstance, options.to_query(kind)?)?;
    for agent in rows.iter_mut() {
        mark_liveness(agent);
    }
    Ok(CommandOutput::Table {
        columns: options.columns(kind.list_columns(), &rows),
        rows,
    })
}

fn mark_liveness(agent: &mut Value) {
    if let Some(record) = agent.as_object_mut() {
        if let Some(alive) = record.get("alive") {
            let face = if alive.as_bool().unwrap_or(false) {
                ":-)"
            } else {
                "xxx"
            };
            record.insert("alive".to_string(), Value::String(face.to_string()));
        }
    }
}
