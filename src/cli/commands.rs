//! Command dispatch: settings, container wiring and rendering

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::commands;
use crate::application::{ApplicationResult, CommandOutput, ListOptions, NeutronClient, ResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::ResourceKind;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Parse-independent entry point used by `main`.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Config { command } => config_command(cli, command, &mut out),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut out);
            Ok(())
        }
        command => {
            let settings = effective_settings(cli)?;
            info!("Using endpoint {}", settings.endpoint_url);
            if settings.insecure {
                output::warning("TLS certificate verification is disabled");
            }
            let container = ServiceContainer::new(settings)?;
            let result = run(command, &container)?;
            write_output(&mut out, &result, cli)
        }
    }
}

/// Settings after applying `--os-url` / `--os-token`.
pub fn effective_settings(cli: &Cli) -> CliResult<Settings> {
    let settings =
        Settings::load()?.with_overrides(cli.os_url.as_deref(), cli.os_token.as_deref());
    settings.validate()?;
    Ok(settings)
}

/// Render a command result to `out` in the format chosen on the command line.
pub fn write_output(out: &mut dyn Write, result: &CommandOutput, cli: &Cli) -> CliResult<()> {
    output::render(out, result, cli.format)
        .map_err(|e| CliError::from(InfraError::io("write output", e)))
}

/// Run one API command against the container's client.
#[instrument(level = "debug", skip(container))]
pub fn run(command: &Commands, container: &ServiceContainer) -> CliResult<CommandOutput> {
    debug!("run {}: {:?}", command.name(), command);
    let client = container.client();

    let result = match command {
        Commands::RoutingInstanceList(args) => {
            commands::list(&client, ResourceKind::RoutingInstance, &ListOptions::from(args))
        }
        Commands::RoutingInstanceShow(args) => commands::show(
            &client,
            ResourceKind::RoutingInstance,
            &args.id,
            false,
            &args.fields,
        ),
        Commands::RoutingInstanceCreate(args) => {
            create_from(&client, ResourceKind::RoutingInstance, &args.to_body())
        }
        Commands::RoutingInstanceUpdate(args) => commands::update(
            &client,
            ResourceKind::RoutingInstance,
            &args.id,
            false,
            &args.attributes,
        ),
        Commands::RoutingInstanceDelete(args) => {
            commands::delete(&client, ResourceKind::RoutingInstance, &args.id, false)
        }
        Commands::RoutingInstanceNetworkAdd(args) => {
            commands::add_network(&client, &args.routinginstance, &args.network)
        }
        Commands::RoutingInstanceNetworkRemove(args) => {
            commands::remove_network(&client, &args.routinginstance, &args.network)
        }
        Commands::RoutingInstanceNetworkList(args) => commands::list_networks(
            &client,
            &args.routinginstance,
            &ListOptions::from(&args.list),
        ),
        Commands::RoutingInstanceAgentAdd(args) => {
            commands::add_agent(&client, &args.routinginstance, &args.agent)
        }
        Commands::RoutingInstanceAgentRemove(args) => {
            commands::remove_agent(&client, &args.routinginstance, &args.agent)
        }
        Commands::RoutingInstanceAgentList(args) => {
            commands::list_agents(&client, &args.routinginstance, &ListOptions::from(args))
        }

        Commands::RoutingPeerList(args) => {
            commands::list(&client, ResourceKind::RoutingPeer, &ListOptions::from(args))
        }
        Commands::RoutingPeerShow(args) => commands::show(
            &client,
            ResourceKind::RoutingPeer,
            &args.id,
            true,
            &args.fields,
        ),
        Commands::RoutingPeerCreate(args) => {
            create_from(&client, ResourceKind::RoutingPeer, &args.to_body())
        }
        Commands::RoutingPeerUpdate(args) => commands::update(
            &client,
            ResourceKind::RoutingPeer,
            &args.id,
            true,
            &args.attributes,
        ),
        Commands::RoutingPeerDelete(args) => {
            commands::delete(&client, ResourceKind::RoutingPeer, &args.id, false)
        }

        Commands::TunnelZoneList(args) => {
            commands::list(&client, ResourceKind::TunnelZone, &ListOptions::from(args))
        }
        Commands::TunnelZoneShow(args) => commands::show(
            &client,
            ResourceKind::TunnelZone,
            &args.id,
            true,
            &args.fields,
        ),
        Commands::TunnelZoneCreate(args) => {
            create_from(&client, ResourceKind::TunnelZone, &args.to_body())
        }
        Commands::TunnelZoneUpdate(args) => commands::update(
            &client,
            ResourceKind::TunnelZone,
            &args.id,
            true,
            &args.attributes,
        ),
        Commands::TunnelZoneDelete(args) => {
            commands::delete(&client, ResourceKind::TunnelZone, &args.id, true)
        }

        Commands::TunnelZoneHostList(args) => commands::list(
            &client,
            ResourceKind::TunnelZoneHost,
            &ListOptions::from(args),
        ),
        Commands::TunnelZoneHostShow(args) => commands::show(
            &client,
            ResourceKind::TunnelZoneHost,
            &args.id,
            true,
            &args.fields,
        ),
        Commands::TunnelZoneHostCreate(args) => {
            let tunnelzone_id = match args.tunnelzone.as_deref() {
                Some(tunnelzone) => Some(
                    client.find_resourceid_by_name_or_id(ResourceKind::TunnelZone, tunnelzone)?,
                ),
                None => None,
            };
            create_from(
                &client,
                ResourceKind::TunnelZoneHost,
                &args.to_body(tunnelzone_id),
            )
        }
        Commands::TunnelZoneHostUpdate(args) => commands::update(
            &client,
            ResourceKind::TunnelZoneHost,
            &args.id,
            true,
            &args.attributes,
        ),
        Commands::TunnelZoneHostDelete(args) => {
            commands::delete(&client, ResourceKind::TunnelZoneHost, &args.id, true)
        }

        Commands::Config { .. } | Commands::Completion { .. } => {
            return Err(CliError::Usage(
                "config and completion do not talk to the API".to_string(),
            ))
        }
    };

    result.map_err(CliError::from)
}

fn create_from<T: Serialize>(
    client: &NeutronClient,
    kind: ResourceKind,
    body: &T,
) -> ApplicationResult<CommandOutput> {
    let body = kind
        .envelope(body)
        .context(format!("encode {} request", kind))?;
    commands::create(client, kind, body)
}

fn config_command(cli: &Cli, command: &ConfigCommands, out: &mut dyn Write) -> CliResult<()> {
    let write_err = |e| CliError::from(InfraError::io("write output", e));
    match command {
        ConfigCommands::Show => {
            let settings = effective_settings(cli)?;
            write!(out, "{}", settings.to_toml()?).map_err(write_err)
        }
        ConfigCommands::Path => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine the config directory".to_string())
            })?;
            writeln!(out, "{}", path.display()).map_err(write_err)
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine the config directory".to_string())
            })?;
            init_config(&path, *force)?;
            output::success(&format!("Created {}", path.display()));
            Ok(())
        }
    }
}

/// Write the config template to `path`, refusing to overwrite unless forced.
pub fn init_config(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
    }
    std::fs::write(path, Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}
