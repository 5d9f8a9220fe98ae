use std::path::PathBuf;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["rxp-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_seed_without_catalog() {
    let cli = Cli::try_parse_from(["rxp-cli", "seed"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Seed { catalog: None })
    ));
}

#[test]
fn parses_seed_with_catalog_path() {
    let cli = Cli::try_parse_from(["rxp-cli", "seed", "--catalog", "/tmp/drugs.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Seed { catalog: Some(ref p) }) if p == &PathBuf::from("/tmp/drugs.yaml")
    ));
}

#[test]
fn parses_search_arguments() {
    let cli = Cli::try_parse_from([
        "rxp-cli",
        "search",
        "--rx-cui",
        "723",
        "--strength",
        "500 mg",
        "--quantity",
        "30",
        "--zip",
        "78701",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Search {
            ref rx_cui,
            ref strength,
            quantity: 30,
            ref zip,
            offline: false,
            ..
        }) if rx_cui == "723" && strength == "500 mg" && zip == "78701"
    ));
}

#[test]
fn search_accepts_negative_quantity_for_validation_later() {
    let cli = Cli::try_parse_from([
        "rxp-cli",
        "search",
        "--rx-cui",
        "723",
        "--strength",
        "500 mg",
        "--quantity",
        "-5",
        "--zip",
        "78701",
        "--offline",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Search {
            quantity: -5,
            offline: true,
            ..
        })
    ));
}

#[test]
fn search_requires_zip() {
    let result = Cli::try_parse_from([
        "rxp-cli",
        "search",
        "--rx-cui",
        "723",
        "--strength",
        "500 mg",
        "--quantity",
        "30",
    ]);
    assert!(result.is_err());
}

#[test]
fn history_defaults_to_twenty_rows() {
    let cli = Cli::try_parse_from(["rxp-cli", "history"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::History { limit: 20 })
    ));
}

#[test]
fn parses_suggest_with_server() {
    let cli = Cli::try_parse_from(["rxp-cli", "suggest", "--server", "http://rx.local:8080"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Suggest { ref server }) if server == "http://rx.local:8080"
    ));
}

#[test]
fn history_row_shows_time_and_search_fields() {
    let row = rxp_db::SearchQueryRow {
        id: 1,
        rx_cui: "723".to_string(),
        strength: "500 mg".to_string(),
        quantity: 30,
        zip: "78701".to_string(),
        created_at: chrono::DateTime::parse_from_rfc3339("2026-03-01T12:30:00Z")
            .expect("timestamp")
            .with_timezone(&chrono::Utc),
    };
    let line = db::format_history_row(&row);
    assert!(line.starts_with("2026-03-01 12:30:00"));
    assert!(line.contains("723"));
    assert!(line.contains("x30"));
    assert!(line.ends_with("78701"));
}

#[tokio::test]
async fn offline_search_rejects_invalid_input_before_loading_catalog() {
    let input = rxp_core::SearchRequestInput {
        rx_cui: Some("723".to_string()),
        strength: Some("500 mg".to_string()),
        quantity: Some(30),
        zip: Some("123".to_string()),
    };
    let err = search::run_offline_search(std::path::Path::new("/nonexistent.yaml"), input)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("zip must be 5 digits"));
}

#[tokio::test]
async fn offline_search_runs_against_shipped_catalog() {
    let catalog = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/catalog.yaml");
    let input = rxp_core::SearchRequestInput {
        rx_cui: Some("723".to_string()),
        strength: Some("500 mg".to_string()),
        quantity: Some(30),
        zip: Some("78701".to_string()),
    };
    search::run_offline_search(&catalog, input)
        .await
        .expect("offline search");
}
