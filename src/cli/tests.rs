use crate::cli::{run_cli, Cli, Commands, OutputFormat};
use crate::testing::{CATALOG_CONTROLLERS, CATALOG_MODEL};
use clap::Parser;
use std::path::PathBuf;
use tempfile::TempDir;

fn documents() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("catalog.yaml");
    let controllers = dir.path().join("controllers.yaml");
    std::fs::write(&model, CATALOG_MODEL).unwrap();
    std::fs::write(&controllers, CATALOG_CONTROLLERS).unwrap();
    (dir, model, controllers)
}

fn run(args: &[&str]) -> (bool, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let ok = run_cli(&cli, &mut out).unwrap();
    (ok, String::from_utf8(out).unwrap())
}

#[test]
fn test_describe_command_parses() {
    let cli = Cli::try_parse_from([
        "edm-explorer",
        "describe",
        "--model",
        "m.yaml",
        "-c",
        "c.yaml",
        "--format",
        "json",
    ])
    .unwrap();
    match cli.command {
        Commands::Describe {
            model,
            controllers,
            config,
            format,
        } => {
            assert_eq!(model.to_string_lossy(), "m.yaml");
            assert_eq!(controllers.to_string_lossy(), "c.yaml");
            assert!(config.is_none());
            assert_eq!(format, OutputFormat::Json);
        }
        _ => panic!("Expected Describe command"),
    }
}

#[test]
fn test_describe_requires_controllers() {
    assert!(Cli::try_parse_from(["edm-explorer", "describe", "--model", "m.yaml"]).is_err());
}

#[test]
fn test_describe_prints_verified_routes() {
    let (_dir, model, controllers) = documents();
    let (ok, out) = run(&[
        "edm-explorer",
        "describe",
        "--model",
        model.to_str().unwrap(),
        "--controllers",
        controllers.to_str().unwrap(),
    ]);
    assert!(ok);
    assert!(out.contains("Customers({Id})"));
    assert!(out.contains("Products.calculate_tax"));
    assert!(out.contains("17 route(s)"));
    assert!(!out.contains("Discontinued"));
}

#[test]
fn test_describe_as_json() {
    let (_dir, model, controllers) = documents();
    let (_, out) = run(&[
        "edm-explorer",
        "describe",
        "-m",
        model.to_str().unwrap(),
        "-c",
        controllers.to_str().unwrap(),
        "-f",
        "json",
    ]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 17);
    assert!(items
        .iter()
        .any(|d| d["method"] == "GET" && d["relative_path"] == "Tags('{Name}')"));
}

#[test]
fn test_templates_lists_unverified_candidates() {
    let (_dir, model, _) = documents();
    let (ok, out) = run(&["edm-explorer", "templates", "--model", model.to_str().unwrap()]);
    assert!(ok);
    assert!(out.contains("/Discontinued({Id})"));
    assert!(out.contains("/Products({Id})/Default.Rate"));
}

#[test]
fn test_templates_pick_up_config_next_to_model() {
    let (dir, model, _) = documents();
    std::fs::write(dir.path().join("edm-explorer.yaml"), "route_prefix: odata\n").unwrap();
    let (_, out) = run(&[
        "edm-explorer",
        "templates",
        "--model",
        model.to_str().unwrap(),
        "--format",
        "yaml",
    ]);
    assert!(out.contains("template: /odata/Customers"));
}

#[test]
fn test_validate_reports_issues() {
    let (dir, model, controllers) = documents();
    let (ok, out) = run(&[
        "edm-explorer",
        "validate",
        "--model",
        model.to_str().unwrap(),
        "--controllers",
        controllers.to_str().unwrap(),
    ]);
    assert!(ok);
    assert!(out.contains("No issues found"));

    let broken = dir.path().join("broken.yaml");
    std::fs::write(
        &broken,
        "namespace: Default\nentity_types:\n  - name: Thing\n    keys: []\n    properties: []\nentity_sets:\n  - { name: Things, entity_type: Default.Missing }\n",
    )
    .unwrap();
    let (ok, out) = run(&["edm-explorer", "validate", "--model", broken.to_str().unwrap()]);
    assert!(!ok);
    assert!(out.contains("issue(s) found"));
}
