use std::path::PathBuf;

use pagebind::cli::commands::{cmd_describe, cmd_validate};
use pagebind::cli::config::load_config;

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("pagebind-cli-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Config loading
// ============================================================================

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let config = load_config(Some("/nonexistent/pagebind.yaml"));
    assert_eq!(config.schema.path, "pages.yaml");
    assert_eq!(config.session.document_timeout_secs, 60);
}

#[test]
fn config_file_overrides_defaults() {
    let path = temp_file(
        "config.yaml",
        "schema:\n  path: catalog/pages.yaml\nsession:\n  document_timeout_secs: 5\n",
    );
    let config = load_config(path.to_str());
    assert_eq!(config.schema.path, "catalog/pages.yaml");
    assert_eq!(config.session.document_timeout_secs, 5);
    std::fs::remove_file(&path).ok();
}

#[test]
fn partial_config_keeps_defaults_for_the_rest() {
    let path = temp_file("partial.yaml", "schema:\n  path: other.yaml\n");
    let config = load_config(path.to_str());
    assert_eq!(config.schema.path, "other.yaml");
    assert_eq!(config.session.document_timeout_secs, 60);
    std::fs::remove_file(&path).ok();
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let path = temp_file("bad.yaml", "schema: [not, a, map]");
    let config = load_config(path.to_str());
    assert_eq!(config.schema.path, "pages.yaml");
    std::fs::remove_file(&path).ok();
}

// ============================================================================
// Subcommands
// ============================================================================

const CLEAN_CATALOG: &str = r#"
pages:
  - name: SignInPage
    url: /sign/in
    shortcuts:
      - name: submit
        strategy: css
        selector: button.primary
    actions:
      - name: click_sign_in
        shortcut: submit
        operation: click
        goes_to: [SignInPage]
"#;

const BROKEN_CATALOG: &str = r#"
pages:
  - name: SignInPage
    url: /sign/in
    actions:
      - name: click_sign_in
        shortcut: submit
        operation: click
        goes_to: [GhostPage]
"#;

#[test]
fn validate_passes_a_clean_catalog() {
    let path = temp_file("clean.yaml", CLEAN_CATALOG);
    assert!(cmd_validate(path.to_str().unwrap(), 0).unwrap());
    std::fs::remove_file(&path).ok();
}

#[test]
fn validate_reports_a_broken_catalog() {
    let path = temp_file("broken.yaml", BROKEN_CATALOG);
    assert!(!cmd_validate(path.to_str().unwrap(), 0).unwrap());
    std::fs::remove_file(&path).ok();
}

#[test]
fn validate_propagates_unreadable_catalogs() {
    assert!(cmd_validate("/nonexistent/pages.yaml", 0).is_err());
}

#[test]
fn describe_renders_a_catalog() {
    let path = temp_file("describe.yaml", CLEAN_CATALOG);
    cmd_describe(path.to_str().unwrap(), None).unwrap();
    cmd_describe(path.to_str().unwrap(), Some("SignInPage")).unwrap();
    std::fs::remove_file(&path).ok();
}

#[test]
fn describe_rejects_an_unknown_page() {
    let path = temp_file("describe-unknown.yaml", CLEAN_CATALOG);
    assert!(cmd_describe(path.to_str().unwrap(), Some("GhostPage")).is_err());
    std::fs::remove_file(&path).ok();
}
