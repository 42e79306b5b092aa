//! CLI parsing and output tests

use clap::Parser;
use mbk::cli::{Cli, format_backend_list, format_selection};
use mbk::infrastructure::AppConfig;
use mbk::init_backends;

#[test]
fn test_parse_repeated_backends() {
    let cli = Cli::try_parse_from([
        "mbk",
        "--backend",
        "NONE",
        "-b",
        "SIMULATED",
        "--fallback",
        "SIMULATED",
        "--show-rewarded",
    ])
    .unwrap();

    assert_eq!(cli.backends, vec!["NONE", "SIMULATED"]);
    assert_eq!(cli.fallback.as_deref(), Some("SIMULATED"));
    assert!(cli.show_rewarded);
    assert!(!cli.list_backends);
    assert!(cli.config.is_none());
}

#[test]
fn test_overrides_replace_enabled_backends() {
    let cli = Cli {
        backends: vec!["NONE".to_owned()],
        fallback: Some("NONE".to_owned()),
        ..Cli::default()
    };
    let mut config = AppConfig::default();

    cli.apply_overrides(&mut config);

    assert_eq!(config.backends.enabled, vec!["NONE"]);
    assert_eq!(config.backends.fallback_key, "NONE");
}

#[test]
fn test_no_overrides_keep_config() {
    let mut config = AppConfig::default();

    Cli::default().apply_overrides(&mut config);

    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_backend_list_is_sorted() {
    let listing = format_backend_list();
    let keys: Vec<&str> = listing
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();

    assert_eq!(keys, vec!["NONE", "SIMULATED"]);
    assert!(listing.contains("No-op fallback backend"));
}

#[tokio::test]
async fn test_selection_lists_keys_per_capability() {
    let context = init_backends(AppConfig::default()).await.unwrap();

    let selection = format_selection(&context);

    assert!(selection.contains("auth: SIMULATED, NONE"), "{selection}");
    assert!(selection.contains("ads: SIMULATED"), "{selection}");
    assert!(context.shutdown().await);
}
