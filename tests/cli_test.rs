use clap::{CommandFactory, Parser};
use rstest::rstest;
use serde_json::json;

use midoctl::application::CommandOutput;
use midoctl::cli::args::{Cli, Commands, ConfigCommands, UpdateArgs};
use midoctl::cli::commands::write_output;
use midoctl::cli::output::OutputFormat;

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[rstest]
#[case("routinginstance-list")]
#[case("routinginstance-show")]
#[case("routinginstance-create")]
#[case("routinginstance-update")]
#[case("routinginstance-delete")]
#[case("routinginstance-network-add")]
#[case("routinginstance-network-remove")]
#[case("routinginstance-network-list")]
#[case("routinginstance-agent-add")]
#[case("routinginstance-agent-remove")]
#[case("routinginstance-agent-list")]
#[case("routingpeer-list")]
#[case("routingpeer-show")]
#[case("routingpeer-create")]
#[case("routingpeer-update")]
#[case("routingpeer-delete")]
#[case("tunnelzone-list")]
#[case("tunnelzone-show")]
#[case("tunnelzone-create")]
#[case("tunnelzone-update")]
#[case("tunnelzone-delete")]
#[case("tunnelzone-host-list")]
#[case("tunnelzone-host-show")]
#[case("tunnelzone-host-create")]
#[case("tunnelzone-host-update")]
#[case("tunnelzone-host-delete")]
fn given_command_table_then_registers_subcommand(#[case] name: &str) {
    assert!(
        Cli::command().find_subcommand(name).is_some(),
        "missing subcommand {name}"
    );
}

#[test]
fn given_global_options_after_subcommand_when_parsing_then_accepted() {
    let cli = Cli::try_parse_from([
        "midoctl",
        "tunnelzone-list",
        "-f",
        "json",
        "-vv",
        "--os-url",
        "http://neutron:9696",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.os_url.as_deref(), Some("http://neutron:9696"));
    assert!(matches!(cli.command, Commands::TunnelZoneList(_)));
}

#[test]
fn given_config_init_force_when_parsing_then_flag_set() {
    let cli = Cli::try_parse_from(["midoctl", "config", "init", "--force"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommands::Init { force: true }
        }
    ));
}

#[test]
fn given_invalid_sort_dir_when_parsing_then_rejected() {
    let result = Cli::try_parse_from(["midoctl", "routingpeer-list", "--sort-dir", "up"]);
    assert!(result.is_err());
}

#[test]
fn given_json_format_when_writing_message_then_wraps_in_object() {
    let cli = Cli::try_parse_from(["midoctl", "-f", "json", "tunnelzone-delete", "tz"]).unwrap();
    let mut buf = Vec::new();

    write_output(
        &mut buf,
        &CommandOutput::Message("Deleted tunnelzone: tz".into()),
        &cli,
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(value, json!({"message": "Deleted tunnelzone: tz"}));
}

#[rstest]
#[case(&["routinginstance-list"])]
#[case(&["routinginstance-show", "ri"])]
#[case(&["routinginstance-create"])]
#[case(&["routinginstance-update", "ri", "--", "--discover"])]
#[case(&["routinginstance-delete", "ri"])]
#[case(&["routinginstance-network-add", "ri", "net"])]
#[case(&["routinginstance-network-remove", "ri", "net"])]
#[case(&["routinginstance-network-list", "ri"])]
#[case(&["routinginstance-agent-add", "ri", "agent"])]
#[case(&["routinginstance-agent-remove", "ri", "agent"])]
#[case(&["routinginstance-agent-list", "ri"])]
#[case(&["routingpeer-list"])]
#[case(&["routingpeer-show", "p"])]
#[case(&["routingpeer-create", "10.0.0.1", "--remote-as", "65000"])]
#[case(&["routingpeer-update", "p", "--", "--password", "x"])]
#[case(&["routingpeer-delete", "p"])]
#[case(&["tunnelzone-list"])]
#[case(&["tunnelzone-show", "tz"])]
#[case(&["tunnelzone-create", "tz"])]
#[case(&["tunnelzone-update", "tz", "--", "--name", "n"])]
#[case(&["tunnelzone-delete", "tz"])]
#[case(&["tunnelzone-host-list"])]
#[case(&["tunnelzone-host-show", "h"])]
#[case(&["tunnelzone-host-create", "h", "10.0.0.2"])]
#[case(&["tunnelzone-host-update", "h", "--", "--ip-address", "10.0.0.3"])]
#[case(&["tunnelzone-host-delete", "h"])]
#[case(&["config", "path"])]
#[case(&["completion", "bash"])]
fn given_parsed_command_when_naming_then_matches_registered_subcommand(#[case] args: &[&str]) {
    let mut argv = vec!["midoctl"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();

    let name = cli.command.name();

    assert_eq!(name, args[0]);
    assert!(Cli::command().find_subcommand(name).is_some());
}

#[test]
fn given_update_pairs_without_separator_when_parsing_then_collected_as_attributes() {
    let cli = Cli::try_parse_from([
        "midoctl",
        "routingpeer-update",
        "p1",
        "--password",
        "x",
    ])
    .unwrap();

    match cli.command {
        Commands::RoutingPeerUpdate(UpdateArgs { id, attributes }) => {
            assert_eq!(id, "p1");
            assert_eq!(attributes, vec!["--password", "x"]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_filters_on_agent_list_when_parsing_then_rejected() {
    let result = Cli::try_parse_from([
        "midoctl",
        "routinginstance-agent-list",
        "ri",
        "--",
        "--host",
        "h1",
    ]);
    assert!(result.is_err());
}

#[test]
fn given_sort_key_on_agent_list_when_parsing_then_rejected() {
    let result = Cli::try_parse_from([
        "midoctl",
        "routinginstance-agent-list",
        "ri",
        "--sort-key",
        "host",
    ]);
    assert!(result.is_err());
}
