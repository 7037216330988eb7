use clap::Parser;
use rstest::rstest;
use serde_json::json;

use midoctl::application::CommandOutput;
use midoctl::cli::args::Cli;
use midoctl::cli::commands::run;
use midoctl::cli::CliError;
use midoctl::infrastructure::traits::Method;
use midoctl::util::testing::{init_test_setup, mock_container};

const RI_ID: &str = "7f4c1e9a-3b2d-4c5e-8f6a-1b2c3d4e5f60";

fn parse(args: &[&str]) -> Cli {
    init_test_setup();
    let mut argv = vec!["midoctl"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("arguments should parse")
}

fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================
// Create
// ============================================================

#[test]
fn given_routinginstance_create_when_run_then_posts_flags_and_titles_record() {
    let (container, mock) = mock_container();
    mock.respond_json(
        201,
        json!({"routinginstance": {"id": RI_ID, "advertise": true, "discover": false}}),
    );
    let cli = parse(&["routinginstance-create", "--advertise", "--tenant-id", "t1"]);

    let output = run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path, "/routinginstances");
    assert_eq!(
        requests[0].body,
        Some(json!({"routinginstance": {"advertise": true, "discover": false, "tenant_id": "t1"}}))
    );
    match output {
        CommandOutput::Record { title, record } => {
            assert_eq!(title.as_deref(), Some("Created a new routinginstance:"));
            assert_eq!(record["id"], json!(RI_ID));
        }
        other => panic!("unexpected output: {other:?}"),
    }
}

#[test]
fn given_routingpeer_create_when_run_then_sends_extra_config_and_null_password() {
    let (container, mock) = mock_container();
    mock.respond_json(201, json!({"routingpeer": {"id": "p1"}}));
    let cli = parse(&[
        "routingpeer-create",
        "10.0.0.1",
        "--remote-as",
        "65000",
        "--extra-config",
        "hold_time=90,keepalive=30",
    ]);

    run(&cli.command, &container).unwrap();

    assert_eq!(
        mock.requests()[0].body,
        Some(json!({"routingpeer": {
            "peer": "10.0.0.1",
            "remote_as": 65000,
            "password": null,
            "extra_config": {"hold_time": "90", "keepalive": "30"}
        }}))
    );
}

#[test]
fn given_routingpeer_create_without_remote_as_when_parsing_then_rejected() {
    let result = Cli::try_parse_from(["midoctl", "routingpeer-create", "10.0.0.1"]);
    assert!(result.is_err());
}

#[test]
fn given_malformed_extra_config_when_parsing_then_rejected() {
    let result = Cli::try_parse_from([
        "midoctl",
        "routingpeer-create",
        "10.0.0.1",
        "--remote-as",
        "65000",
        "--extra-config",
        "hold_time",
    ]);
    assert!(result.is_err());
}

#[test]
fn given_tunnelzone_create_with_type_when_run_then_posts_type() {
    let (container, mock) = mock_container();
    mock.respond_json(201, json!({"tunnelzone": {"id": "tz-1", "name": "zone", "type": "vxlan"}}));
    let cli = parse(&["tunnelzone-create", "zone", "--type", "vxlan"]);

    run(&cli.command, &container).unwrap();

    assert_eq!(mock.requests()[0].path, "/tunnelzones");
    assert_eq!(
        mock.requests()[0].body,
        Some(json!({"tunnelzone": {"name": "zone", "type": "vxlan"}}))
    );
}

#[test]
fn given_tunnelzone_host_create_with_zone_name_when_run_then_resolves_zone_first() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"tunnelzones": [{"id": "tz-1"}]}))
        .respond_json(201, json!({"tunnelzonehost": {"id": "h-1"}}));
    let cli = parse(&[
        "tunnelzone-host-create",
        "host-a",
        "192.168.1.10",
        "--tunnelzone",
        "zone",
    ]);

    run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/tunnelzones");
    assert_eq!(requests[0].query, query(&[("name", "zone"), ("fields", "id")]));
    assert_eq!(requests[1].path, "/tunnelzonehosts");
    assert_eq!(
        requests[1].body,
        Some(json!({"tunnelzonehost": {
            "host_id": "host-a",
            "ip_address": "192.168.1.10",
            "tunnelzone_id": "tz-1"
        }}))
    );
}

#[test]
fn given_invalid_ip_when_parsing_tunnelzone_host_create_then_rejected() {
    let result = Cli::try_parse_from(["midoctl", "tunnelzone-host-create", "host-a", "not-an-ip"]);
    assert!(result.is_err());
}

// ============================================================
// List / show
// ============================================================

#[test]
fn given_routingpeer_list_when_run_then_uses_default_columns() {
    let (container, mock) = mock_container();
    mock.respond_json(
        200,
        json!({"routingpeers": [{"id": "p1", "peer": "10.0.0.1", "protocol": "bgp", "configuration": {}, "password": "x"}]}),
    );
    let cli = parse(&["routingpeer-list"]);

    let output = run(&cli.command, &container).unwrap();

    assert_eq!(mock.requests()[0].path, "/routingpeers");
    assert!(mock.requests()[0].query.is_empty());
    match output {
        CommandOutput::Table { columns, rows } => {
            assert_eq!(columns, vec!["id", "peer", "protocol", "configuration"]);
            assert_eq!(rows.len(), 1);
        }
        other => panic!("unexpected output: {other:?}"),
    }
}

#[test]
fn given_list_with_fields_sorting_and_filters_when_run_then_builds_query() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"routinginstances": []}));
    let cli = parse(&[
        "routinginstance-list",
        "-F",
        "id",
        "--sort-key",
        "id",
        "--sort-dir",
        "desc",
        "--",
        "--advertise",
        "True",
    ]);

    run(&cli.command, &container).unwrap();

    assert_eq!(
        mock.requests()[0].query,
        query(&[
            ("advertise", "True"),
            ("fields", "id"),
            ("sort_key", "id"),
            ("sort_dir", "desc"),
        ])
    );
}

#[test]
fn given_sorting_on_tunnelzones_when_run_then_fails_before_request() {
    let (container, mock) = mock_container();
    let cli = parse(&["tunnelzone-list", "--sort-key", "name"]);

    let err = run(&cli.command, &container).unwrap_err();

    assert_eq!(err.exit_code(), midoctl::exitcode::USAGE);
    assert!(mock.requests().is_empty());
}

#[test]
fn given_sorted_network_list_on_routinginstance_when_run_then_sends_sort_query() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"networks": [{"id": "net-1", "name": "private"}]}));
    let cli = parse(&[
        "routinginstance-network-list",
        RI_ID,
        "--sort-key",
        "name",
        "--sort-dir",
        "asc",
    ]);

    run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].path,
        format!("/routinginstances/{RI_ID}/networks")
    );
    assert_eq!(
        requests[0].query,
        query(&[("sort_key", "name"), ("sort_dir", "asc")])
    );
}

#[test]
fn given_routinginstance_show_when_run_then_uses_id_without_lookup() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"routinginstance": {"id": "ri-1"}}));
    let cli = parse(&["routinginstance-show", "ri-1", "-F", "nexthop"]);

    let output = run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/routinginstances/ri-1");
    assert_eq!(requests[0].query, query(&[("fields", "nexthop")]));
    assert_eq!(
        output,
        CommandOutput::Record {
            title: None,
            record: json!({"id": "ri-1"})
        }
    );
}

#[test]
fn given_tunnelzone_show_by_name_when_run_then_resolves_then_fetches() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"tunnelzones": [{"id": "tz-1"}]}))
        .respond_json(200, json!({"tunnelzone": {"id": "tz-1", "name": "zone"}}));
    let cli = parse(&["tunnelzone-show", "zone"]);

    run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].query, query(&[("name", "zone"), ("fields", "id")]));
    assert_eq!(requests[1].path, "/tunnelzones/tz-1");
}

// ============================================================
// Update / delete
// ============================================================

#[test]
fn given_tunnelzone_update_when_run_then_puts_wrapped_attributes() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"tunnelzones": [{"id": "tz-1"}]}))
        .respond_json(200, json!({"tunnelzone": {"id": "tz-1", "name": "renamed"}}));
    let cli = parse(&["tunnelzone-update", "zone", "--", "--name", "renamed"]);

    let output = run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests[1].method, Method::Put);
    assert_eq!(requests[1].path, "/tunnelzones/tz-1");
    assert_eq!(requests[1].body, Some(json!({"tunnelzone": {"name": "renamed"}})));
    assert_eq!(
        output,
        CommandOutput::Message("Updated tunnelzone: zone".to_string())
    );
}

#[test]
fn given_routinginstance_update_with_hints_when_run_then_converts_values() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"routinginstance": {"id": RI_ID}}));
    let cli = parse(&[
        "routinginstance-update",
        RI_ID,
        "--",
        "--advertise",
        "type=bool",
        "false",
    ]);

    run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, format!("/routinginstances/{RI_ID}"));
    assert_eq!(
        requests[0].body,
        Some(json!({"routinginstance": {"advertise": false}}))
    );
}

#[test]
fn given_update_without_attributes_when_run_then_usage_error_and_no_request() {
    let (container, mock) = mock_container();
    let cli = parse(&["routingpeer-update", "p1"]);

    let err = run(&cli.command, &container).unwrap_err();

    assert!(err.to_string().contains("must specify new values"));
    assert_eq!(err.exit_code(), midoctl::exitcode::USAGE);
    assert!(mock.requests().is_empty());
}

#[rstest]
#[case(&["routinginstance-delete", "ri-1"], "/routinginstances/ri-1", "Deleted routinginstance: ri-1")]
#[case(&["routingpeer-delete", "p-1"], "/routingpeers/p-1", "Deleted routingpeer: p-1")]
fn given_id_only_delete_when_run_then_deletes_without_lookup(
    #[case] args: &[&str],
    #[case] path: &str,
    #[case] message: &str,
) {
    let (container, mock) = mock_container();
    let cli = parse(args);

    let output = run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Delete);
    assert_eq!(requests[0].path, path);
    assert_eq!(output, CommandOutput::Message(message.to_string()));
}

#[test]
fn given_tunnelzone_host_delete_by_name_when_run_then_resolves_and_deletes() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"tunnelzonehosts": [{"id": "h-1"}]}));
    let cli = parse(&["tunnelzone-host-delete", "host-a"]);

    let output = run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests[1].method, Method::Delete);
    assert_eq!(requests[1].path, "/tunnelzonehosts/h-1");
    assert_eq!(
        output,
        CommandOutput::Message("Deleted tunnelzonehost: host-a".to_string())
    );
}

// ============================================================
// Associations
// ============================================================

#[test]
fn given_network_add_by_name_when_run_then_posts_resolved_id() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"networks": [{"id": "net-1"}]}))
        .respond_json(200, json!({"network_id": "net-1"}));
    let cli = parse(&["routinginstance-network-add", RI_ID, "private"]);

    let output = run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].path, "/networks");
    assert_eq!(requests[1].method, Method::Post);
    assert_eq!(requests[1].path, format!("/routinginstances/{RI_ID}/networks"));
    assert_eq!(requests[1].body, Some(json!({"network_id": "net-1"})));
    assert_eq!(
        output,
        CommandOutput::Message("Added network private to routing instance".to_string())
    );
}

#[test]
fn given_network_remove_when_run_then_deletes_sub_resource() {
    let (container, mock) = mock_container();
    mock.respond_json(200, json!({"networks": [{"id": "net-1"}]}));
    let cli = parse(&["routinginstance-network-remove", RI_ID, "private"]);

    run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests[1].method, Method::Delete);
    assert_eq!(
        requests[1].path,
        format!("/routinginstances/{RI_ID}/networks/net-1")
    );
}

#[test]
fn given_agent_add_when_run_then_posts_agent_id_without_lookup() {
    let (container, mock) = mock_container();
    let cli = parse(&["routinginstance-agent-add", RI_ID, "agent-1"]);

    let output = run(&cli.command, &container).unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, format!("/routinginstances/{RI_ID}/agents"));
    assert_eq!(requests[0].body, Some(json!({"agent_id": "agent-1"})));
    assert_eq!(
        output,
        CommandOutput::Message("Added agent agent-1 to routing instance".to_string())
    );
}

#[test]
fn given_agent_list_when_run_then_marks_liveness() {
    let (container, mock) = mock_container();
    mock.respond_json(
        200,
        json!({"agents": [
            {"id": "a1", "host": "h1", "admin_state_up": true, "alive": true},
            {"id": "a2", "host": "h2", "admin_state_up": true, "alive": false}
        ]}),
    );
    let cli = parse(&["routinginstance-agent-list", RI_ID]);

    let output = run(&cli.command, &container).unwrap();

    assert_eq!(
        mock.requests()[0].path,
        format!("/routinginstances/{RI_ID}/agents")
    );
    match output {
        CommandOutput::Table { columns, rows } => {
            assert_eq!(columns, vec!["id", "host", "admin_state_up", "alive"]);
            assert_eq!(rows[0]["alive"], json!(":-)"));
            assert_eq!(rows[1]["alive"], json!("xxx"));
        }
        other => panic!("unexpected output: {other:?}"),
    }
}

// ============================================================
// Errors
// ============================================================

#[test]
fn given_server_404_when_show_then_not_found_exit_code() {
    let (container, mock) = mock_container();
    mock.respond_json(
        404,
        json!({"NeutronError": {"type": "RoutingInstanceNotFound", "message": "Routing instance ri-9 could not be found", "detail": ""}}),
    );
    let cli = parse(&["routinginstance-show", "ri-9"]);

    let err = run(&cli.command, &container).unwrap_err();

    assert_eq!(err.to_string(), "Routing instance ri-9 could not be found");
    assert_eq!(err.exit_code(), midoctl::exitcode::NOINPUT);
}

#[test]
fn given_config_command_when_run_then_usage_error() {
    let (container, _mock) = mock_container();
    let cli = parse(&["config", "path"]);

    let err = run(&cli.command, &container).unwrap_err();

    assert!(matches!(err, CliError::Usage(_)));
}
