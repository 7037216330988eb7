//! CLI argument definitions using clap
//!
//! The `Commands` enum is the command table: every variant carries the
//! external subcommand name it is dispatched under.

use std::collections::BTreeMap;
use std::net::IpAddr;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::application::ListOptions;
use crate::cli::output::OutputFormat;
use crate::domain::{
    parse_key_value_map, RoutingInstanceCreate, RoutingPeerCreate, TunnelZoneCreate,
    TunnelZoneHostCreate,
};

/// Manage MidoNet routing instances, routing peers and tunnel zones through the Neutron API
#[derive(Parser, Debug)]
#[command(name = "midoctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Neutron API endpoint, overrides the configured endpoint_url
    #[arg(long, global = true, env = "OS_URL", value_name = "URL")]
    pub os_url: Option<String>,

    /// Pre-issued authentication token
    #[arg(
        long,
        global = true,
        env = "OS_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub os_token: Option<String>,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List routing instances
    #[command(name = "routinginstance-list")]
    RoutingInstanceList(ListArgs),

    /// Show information about a given routing instance
    #[command(name = "routinginstance-show")]
    RoutingInstanceShow(ShowArgs),

    /// Create a routing instance
    #[command(name = "routinginstance-create")]
    RoutingInstanceCreate(RoutingInstanceCreateArgs),

    /// Update a routing instance
    #[command(name = "routinginstance-update")]
    RoutingInstanceUpdate(UpdateArgs),

    /// Delete a routing instance
    #[command(name = "routinginstance-delete")]
    RoutingInstanceDelete(DeleteArgs),

    /// Associate a network to a routing instance
    #[command(name = "routinginstance-network-add")]
    RoutingInstanceNetworkAdd(NetworkAssociationArgs),

    /// Disassociate a network from a routing instance
    #[command(name = "routinginstance-network-remove")]
    RoutingInstanceNetworkRemove(NetworkAssociationArgs),

    /// List the networks associated to a routing instance
    #[command(name = "routinginstance-network-list")]
    RoutingInstanceNetworkList(RoutingInstanceListArgs),

    /// Associate an agent to a routing instance
    #[command(name = "routinginstance-agent-add")]
    RoutingInstanceAgentAdd(AgentAssociationArgs),

    /// Disassociate an agent from a routing instance
    #[command(name = "routinginstance-agent-remove")]
    RoutingInstanceAgentRemove(AgentAssociationArgs),

    /// List the agents associated to a routing instance
    #[command(name = "routinginstance-agent-list")]
    RoutingInstanceAgentList(AgentListArgs),

    /// List routing peers
    #[command(name = "routingpeer-list")]
    RoutingPeerList(ListArgs),

    /// Show information about a given routing peer
    #[command(name = "routingpeer-show")]
    RoutingPeerShow(ShowArgs),

    /// Create a routing peer
    #[command(name = "routingpeer-create")]
    RoutingPeerCreate(RoutingPeerCreateArgs),

    /// Update a routing peer
    #[command(name = "routingpeer-update")]
    RoutingPeerUpdate(UpdateArgs),

    /// Delete a routing peer
    #[command(name = "routingpeer-delete")]
    RoutingPeerDelete(DeleteArgs),

    /// List tunnel zones
    #[command(name = "tunnelzone-list")]
    TunnelZoneList(ListArgs),

    /// Show information about a given tunnel zone
    #[command(name = "tunnelzone-show")]
    TunnelZoneShow(ShowArgs),

    /// Create a tunnel zone
    #[command(name = "tunnelzone-create")]
    TunnelZoneCreate(TunnelZoneCreateArgs),

    /// Update a tunnel zone
    #[command(name = "tunnelzone-update")]
    TunnelZoneUpdate(UpdateArgs),

    /// Delete a tunnel zone
    #[command(name = "tunnelzone-delete")]
    TunnelZoneDelete(DeleteArgs),

    /// List tunnel zone hosts
    #[command(name = "tunnelzone-host-list")]
    TunnelZoneHostList(ListArgs),

    /// Show information about a given tunnel zone host
    #[command(name = "tunnelzone-host-show")]
    TunnelZoneHostShow(ShowArgs),

    /// Add a host to a tunnel zone
    #[command(name = "tunnelzone-host-create")]
    TunnelZoneHostCreate(TunnelZoneHostCreateArgs),

    /// Update a tunnel zone host
    #[command(name = "tunnelzone-host-update")]
    TunnelZoneHostUpdate(UpdateArgs),

    /// Remove a host from a tunnel zone
    #[command(name = "tunnelzone-host-delete")]
    TunnelZoneHostDelete(DeleteArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Commands {
    /// Subcommand name this command is dispatched under.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::RoutingInstanceList(_) => "routinginstance-list",
            Commands::RoutingInstanceShow(_) => "routinginstance-show",
            Commands::RoutingInstanceCreate(_) => "routinginstance-create",
            Commands::RoutingInstanceUpdate(_) => "routinginstance-update",
            Commands::RoutingInstanceDelete(_) => "routinginstance-delete",
            Commands::RoutingInstanceNetworkAdd(_) => "routinginstance-network-add",
            Commands::RoutingInstanceNetworkRemove(_) => "routinginstance-network-remove",
            Commands::RoutingInstanceNetworkList(_) => "routinginstance-network-list",
            Commands::RoutingInstanceAgentAdd(_) => "routinginstance-agent-add",
            Commands::RoutingInstanceAgentRemove(_) => "routinginstance-agent-remove",
            Commands::RoutingInstanceAgentList(_) => "routinginstance-agent-list",
            Commands::RoutingPeerList(_) => "routingpeer-list",
            Commands::RoutingPeerShow(_) => "routingpeer-show",
            Commands::RoutingPeerCreate(_) => "routingpeer-create",
            Commands::RoutingPeerUpdate(_) => "routingpeer-update",
            Commands::RoutingPeerDelete(_) => "routingpeer-delete",
            Commands::TunnelZoneList(_) => "tunnelzone-list",
            Commands::TunnelZoneShow(_) => "tunnelzone-show",
            Commands::TunnelZoneCreate(_) => "tunnelzone-create",
            Commands::TunnelZoneUpdate(_) => "tunnelzone-update",
            Commands::TunnelZoneDelete(_) => "tunnelzone-delete",
            Commands::TunnelZoneHostList(_) => "tunnelzone-host-list",
            Commands::TunnelZoneHostShow(_) => "tunnelzone-host-show",
            Commands::TunnelZoneHostCreate(_) => "tunnelzone-host-create",
            Commands::TunnelZoneHostUpdate(_) => "tunnelzone-host-update",
            Commands::TunnelZoneHostDelete(_) => "tunnelzone-host-delete",
            Commands::Config { .. } => "config",
            Commands::Completion { .. } => "completion",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show config path
    Path,
}

/// Options common to list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Show detailed information
    #[arg(short = 'D', long)]
    pub show_details: bool,

    /// Specify the field(s) to be returned by server (repeatable)
    #[arg(short = 'F', long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Sort list by specified field (repeatable)
    #[arg(long = "sort-key", value_name = "FIELD")]
    pub sort_keys: Vec<String>,

    /// Sort direction, paired in order with --sort-key (repeatable)
    #[arg(long = "sort-dir", value_parser = ["asc", "desc"])]
    pub sort_dirs: Vec<String>,

    /// Filters sent as query parameters, after `--` (e.g. `-- --name foo`)
    #[arg(last = true, value_name = "FILTER")]
    pub filters: Vec<String>,
}

impl From<&ListArgs> for ListOptions {
    fn from(args: &ListArgs) -> Self {
        Self {
            show_details: args.show_details,
            fields: args.fields.clone(),
            sort_keys: args.sort_keys.clone(),
            sort_dirs: args.sort_dirs.clone(),
            filters: args.filters.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// ID or name of the resource to look up
    #[arg(value_name = "ID")]
    pub id: String,

    /// Show detailed information
    #[arg(short = 'D', long)]
    pub show_details: bool,

    /// Specify the field(s) to be returned by server (repeatable)
    #[arg(short = 'F', long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// ID or name of the resource to update
    #[arg(value_name = "ID")]
    pub id: String,

    /// New values as `--key value` pairs (hints: `type=bool|int|dict`, `list=true`)
    #[arg(value_name = "ATTRIBUTES", trailing_var_arg = true, allow_hyphen_values = true)]
    pub attributes: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// ID or name of the resource to delete
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Option common to create commands.
#[derive(Args, Debug, Clone, Default)]
pub struct TenantArgs {
    /// The owner tenant ID
    #[arg(long, value_name = "TENANT_ID")]
    pub tenant_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RoutingInstanceCreateArgs {
    #[command(flatten)]
    pub tenant: TenantArgs,

    #[arg(long, default_value = "", hide = true)]
    pub nexthop: String,

    /// Advertise routes
    #[arg(long)]
    pub advertise: bool,

    /// Discover routes
    #[arg(long)]
    pub discover: bool,
}

impl RoutingInstanceCreateArgs {
    pub fn to_body(&self) -> RoutingInstanceCreate {
        RoutingInstanceCreate::new(
            self.advertise,
            self.discover,
            &self.nexthop,
            self.tenant.tenant_id.clone(),
        )
    }
}

#[derive(Args, Debug, Clone)]
pub struct RoutingPeerCreateArgs {
    #[command(flatten)]
    pub tenant: TenantArgs,

    /// Peer address
    #[arg(value_name = "PEER")]
    pub peer: String,

    /// BGP remote-as value
    #[arg(long, required = true, value_name = "AS")]
    pub remote_as: u32,

    /// Connection password to remote peer
    #[arg(long)]
    pub password: Option<String>,

    /// Configuration of the peer, as key1=value1,key2=value2
    #[arg(long, value_name = "KEY=VALUE,...", value_parser = parse_extra_config)]
    pub extra_config: Option<BTreeMap<String, String>>,
}

fn parse_extra_config(input: &str) -> Result<BTreeMap<String, String>, String> {
    parse_key_value_map(input).map_err(|e| e.to_string())
}

impl RoutingPeerCreateArgs {
    pub fn to_body(&self) -> RoutingPeerCreate {
        RoutingPeerCreate {
            peer: self.peer.clone(),
            remote_as: self.remote_as,
            password: self.password.clone(),
            extra_config: self.extra_config.clone().unwrap_or_default(),
            tenant_id: self.tenant.tenant_id.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TunnelZoneCreateArgs {
    #[command(flatten)]
    pub tenant: TenantArgs,

    /// Name of the tunnel zone
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Tunnel type
    #[arg(long = "type", value_name = "TYPE")]
    pub zone_type: Option<String>,
}

impl TunnelZoneCreateArgs {
    pub fn to_body(&self) -> TunnelZoneCreate {
        TunnelZoneCreate {
            name: self.name.clone(),
            zone_type: self.zone_type.clone(),
            tenant_id: self.tenant.tenant_id.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TunnelZoneHostCreateArgs {
    #[command(flatten)]
    pub tenant: TenantArgs,

    /// Identifier of the host
    #[arg(value_name = "HOST_ID")]
    pub host_id: String,

    /// IP address of the host in the tunnel zone
    #[arg(value_name = "IP_ADDRESS")]
    pub ip_address: IpAddr,

    /// Tunnel zone (name or id) the host joins
    #[arg(long, value_name = "TUNNELZONE")]
    pub tunnelzone: Option<String>,
}

impl TunnelZoneHostCreateArgs {
    /// Body with an already resolved tunnel zone id.
    pub fn to_body(&self, tunnelzone_id: Option<String>) -> TunnelZoneHostCreate {
        TunnelZoneHostCreate {
            host_id: self.host_id.clone(),
            ip_address: self.ip_address,
            tunnelzone_id,
            tenant_id: self.tenant.tenant_id.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct NetworkAssociationArgs {
    /// ID of the routing instance
    #[arg(value_name = "ROUTINGINSTANCE")]
    pub routinginstance: String,

    /// Network name or id
    #[arg(value_name = "NETWORK")]
    pub network: String,
}

#[derive(Args, Debug, Clone)]
pub struct AgentAssociationArgs {
    /// ID of the routing instance
    #[arg(value_name = "ROUTINGINSTANCE")]
    pub routinginstance: String,

    /// Agent id
    #[arg(value_name = "AGENT")]
    pub agent: String,
}

#[derive(Args, Debug, Clone)]
pub struct RoutingInstanceListArgs {
    /// ID of the routing instance to query
    #[arg(value_name = "ROUTINGINSTANCE")]
    pub routinginstance: String,

    #[command(flatten)]
    pub list: ListArgs,
}

/// Agent listing takes no filters and no sorting.
#[derive(Args, Debug, Clone)]
pub struct AgentListArgs {
    /// ID of the routing instance to query
    #[arg(value_name = "ROUTINGINSTANCE")]
    pub routinginstance: String,

    /// Show detailed information
    #[arg(short = 'D', long)]
    pub show_details: bool,

    /// Specify the field(s) to be returned by server (repeatable)
    #[arg(short = 'F', long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,
}

impl From<&AgentListArgs> for ListOptions {
    fn from(args: &AgentListArgs) -> Self {
        Self {
            show_details: args.show_details,
            fields: args.fields.clone(),
            ..Default::default()
        }
    }
}
