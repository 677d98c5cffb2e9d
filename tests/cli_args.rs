//! CLI argument parsing tests.

use clap::Parser;
use dtrack::cli::{Cli, Command, Entity};

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from([
        "dtrack",
        "get",
        "project",
        "2d16089e-6d3a-437e-b334-f27eb2cbd7f4",
    ]);

    assert!(!cli.json);
    match cli.command {
        Command::Get { entity, uuid } => {
            assert_eq!(entity, Entity::Project);
            assert_eq!(uuid, "2d16089e-6d3a-437e-b334-f27eb2cbd7f4");
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_list_with_plural_alias() {
    let cli = Cli::parse_from(["dtrack", "list", "findings", "--project", "p-1"]);

    match cli.command {
        Command::List {
            entity,
            project,
            all,
            ..
        } => {
            assert_eq!(entity, Entity::Finding);
            assert_eq!(project.as_deref(), Some("p-1"));
            assert!(!all);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_delete_subcommand() {
    let cli = Cli::parse_from(["dtrack", "delete", "component", "c-1"]);

    match cli.command {
        Command::Delete { entity, uuid } => {
            assert_eq!(entity, Entity::Component);
            assert_eq!(uuid, "c-1");
        }
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn test_global_json_flag() {
    // --json before subcommand
    let cli = Cli::parse_from(["dtrack", "--json", "list", "projects"]);
    assert!(cli.json);

    // --json after subcommand (global flag)
    let cli = Cli::parse_from(["dtrack", "list", "projects", "--json"]);
    assert!(cli.json);
}

#[test]
fn test_list_paging_and_sort_args() {
    let cli = Cli::parse_from([
        "dtrack", "list", "projects", "--page", "2", "--size", "50", "--sort", "name", "--desc",
    ]);

    match cli.command {
        Command::List {
            page,
            size,
            sort,
            desc,
            ..
        } => {
            assert_eq!(page, Some(2));
            assert_eq!(size, Some(50));
            assert_eq!(sort.as_deref(), Some("name"));
            assert!(desc);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_desc_requires_sort() {
    let result = Cli::try_parse_from(["dtrack", "list", "projects", "--desc"]);
    assert!(result.is_err());
}

#[test]
fn test_page_conflicts_with_all() {
    let result = Cli::try_parse_from(["dtrack", "list", "projects", "--all", "--page", "2"]);
    assert!(result.is_err());
}

#[test]
fn test_connection_flags() {
    let cli = Cli::parse_from([
        "dtrack",
        "--api-url",
        "https://dtrack.example.com",
        "--api-key",
        "odt_secret",
        "list",
        "projects",
    ]);

    assert_eq!(cli.api_url.as_deref(), Some("https://dtrack.example.com"));
    assert_eq!(cli.api_key.as_deref(), Some("odt_secret"));
}

#[test]
fn test_invalid_entity_rejected() {
    let result = Cli::try_parse_from(["dtrack", "get", "vulnerability", "x"]);
    assert!(result.is_err());
}
