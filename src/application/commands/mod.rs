//! Command implementations
//!
//! Generic list/show/create/update/delete behaviour shared by every resource,
//! plus the routing-instance association commands. Commands return a
//! [`CommandOutput`]; rendering is left to the CLI layer.

mod routing_instance;

pub use routing_instance::{
    add_agent, add_network, list_agents, list_networks, remove_agent, remove_network,
};

use serde_json::{Map, Value};
use tracing::debug;

use crate::application::client::NeutronClient;
use crate::application::ApplicationResult;
use crate::domain::{attributes_to_query, parse_attributes, DomainError, ResourceKind};

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// One-line confirmation
    Message(String),
    /// A single resource, optionally introduced by a title line
    Record { title: Option<String>, record: Value },
    /// Several resources shown under the given columns
    Table { columns: Vec<String>, rows: Vec<Value> },
}

/// Options shared by list commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Show every field instead of the default columns
    pub show_details: bool,
    /// Fields requested from the server (and shown)
    pub fields: Vec<String>,
    pub sort_keys: Vec<String>,
    pub sort_dirs: Vec<String>,
    /// Free-form `--key value` filters
    pub filters: Vec<String>,
}

impl ListOptions {
    /// Query parameters for this listing of `kind`.
    pub fn to_query(&self, kind: ResourceKind) -> ApplicationResult<Vec<(String, String)>> {
        let mut query = attributes_to_query(&self.filters)?;

        for field in &self.fields {
            query.push(("fields".to_string(), field.clone()));
        }

        if !self.sort_keys.is_empty() || !self.sort_dirs.is_empty() {
            if !kind.sorting_support() {
                return Err(DomainError::SortingUnsupported(kind.resource()).into());
            }
            if self.sort_dirs.len() > self.sort_keys.len() {
                return Err(DomainError::SortDirMismatch {
                    count: self.sort_dirs.len(),
                    keys: self.sort_keys.len(),
                }
                .into());
            }
            for key in &self.sort_keys {
                query.push(("sort_key".to_string(), key.clone()));
            }
            for dir in &self.sort_dirs {
                query.push(("sort_dir".to_string(), dir.clone()));
            }
        }

        Ok(query)
    }

    /// Columns to display: explicit fields, then defaults, then the first record's keys.
    pub fn columns(&self, defaults: &[&str], rows: &[Value]) -> Vec<String> {
        if !self.fields.is_empty() {
            return self.fields.clone();
        }
        if !self.show_details && !defaults.is_empty() {
            return defaults.iter().map(|c| c.to_string()).collect();
        }
        rows.first()
            .and_then(Value::as_object)
            .map(|record| record.keys().cloned().collect())
            .unwrap_or_else(|| defaults.iter().map(|c| c.to_string()).collect())
    }
}

/// Resolve an identifier, honouring the command's `allow_names` switch.
pub fn resolve_id(
    client: &NeutronClient,
    kind: ResourceKind,
    name_or_id: &str,
    allow_names: bool,
) -> ApplicationResult<String> {
    if allow_names {
        client.find_resourceid_by_name_or_id(kind, name_or_id)
    } else {
        Ok(name_or_id.to_string())
    }
}

/// List resources of `kind`.
pub fn list(
    client: &NeutronClient,
    kind: ResourceKind,
    options: &ListOptions,
) -> ApplicationResult<CommandOutput> {
    let query = options.to_query(kind)?;
    let rows = client.list(kind, query)?;
    debug!("list {}: {} records", kind, rows.len());
    Ok(CommandOutput::Table {
        columns: options.columns(kind.list_columns(), &rows),
        rows,
    })
}

/// Show one resource of `kind`.
pub fn show(
    client: &NeutronClient,
    kind: ResourceKind,
    name_or_id: &str,
    allow_names: bool,
    fields: &[String],
) -> ApplicationResult<CommandOutput> {
    let id = resolve_id(client, kind, name_or_id, allow_names)?;
    let query = fields
        .iter()
        .map(|f| ("fields".to_string(), f.clone()))
        .collect();
    let record = client.show(kind, &id, query)?;
    Ok(CommandOutput::Record {
        title: None,
        record,
    })
}

/// Create a resource from an already enveloped body.
pub fn create(
    client: &NeutronClient,
    kind: ResourceKind,
    body: Value,
) -> ApplicationResult<CommandOutput> {
    debug!("create {}: {}", kind, body);
    let record = client.create(kind, body)?;
    Ok(CommandOutput::Record {
        title: Some(format!("Created a new {}:", kind)),
        record,
    })
}

/// Update a resource from free-form `--key value` attributes.
pub fn update(
    client: &NeutronClient,
    kind: ResourceKind,
    name_or_id: &str,
    allow_names: bool,
    attributes: &[String],
) -> ApplicationResult<CommandOutput> {
    let values = parse_attributes(attributes)?;
    if values.is_empty() {
        return Err(DomainError::EmptyUpdate(kind.resource()).into());
    }
    let id = resolve_id(client, kind, name_or_id, allow_names)?;

    let mut body = Map::new();
    body.insert(kind.resource().to_string(), Value::Object(values));
    client.update(kind, &id, Value::Object(body))?;

    Ok(CommandOutput::Message(format!(
        "Updated {}: {}",
        kind, name_or_id
    )))
}

/// Delete a resource.
pub fn delete(
    client: &NeutronClient,
    kind: ResourceKind,
    name_or_id: &str,
    allow_names: bool,
) -> ApplicationResult<CommandOutput> {
    let id = resolve_id(client, kind, name_or_id, allow_names)?;
    client.delete(kind, &id)?;
    Ok(CommandOutput::Message(format!(
        "Deleted {}: {}",
        kind, name_or_id
    )))
}
