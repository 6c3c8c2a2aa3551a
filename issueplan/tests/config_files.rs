//! Loading configuration files from disk.

use std::fs;

use chrono::Month;
use issueplan::{
    Config, ConfigError, FieldDataType, FieldDefinition, ResolvedValue, SchemaIndex, issues_for_month,
    resolve_issue_fields,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const YAML_CONFIG: &str = r#"
defaults:
  project_id: PVT_main
  target_repo: octo/widgets

issues:
  - name: Monthly Report
    creation_months: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
    template_file: .github/ISSUE_TEMPLATE/report.md
    title_prefix: "[{{YearMonth}}]"
    fields:
      Status: Ready
      SP: 5
      Notes: "keep it short"
      Blocked: false

  - name: Security Review
    creation_months: [3, 9]
    template_file: .github/ISSUE_TEMPLATE/security.md
    project_id: PVT_security
    target_repo: octo/security
"#;

fn write(dir: &TempDir, file_name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(file_name);
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn loads_yaml_and_keeps_field_order() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "issues.yml", YAML_CONFIG);

    let config = Config::load(&path).unwrap();

    assert_eq!(config.defaults.project_id, "PVT_main");
    assert_eq!(config.issues.len(), 2);

    let fields: Vec<(&str, &str)> = config.issues[0].fields.iter().collect();
    assert_eq!(
        fields,
        vec![
            ("Status", "Ready"),
            ("SP", "5"),
            ("Notes", "keep it short"),
            ("Blocked", "false")
        ]
    );

    let security = &config.issues[1];
    assert!(security.fields.is_empty());
    assert_eq!(security.effective_project_id(&config.defaults), "PVT_security");

    let march: Vec<&str> = issues_for_month(&config, Month::March)
        .iter()
        .map(|issue| issue.name.as_str())
        .collect();
    assert_eq!(march, vec!["Monthly Report", "Security Review"]);
}

#[test]
fn loads_toml_by_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "issues.toml",
        r#"
        [defaults]
        project_id = "PVT_main"
        target_repo = "octo/widgets"

        [[issues]]
        name = "Retro"
        creation_months = [6]
        template_file = "retro.md"
        "#,
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.issues[0].name, "Retro");
    assert_eq!(config.issues[0].creation_months, vec![6]);
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yml");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(ref missing) if missing == &path));
    assert!(err.to_string().starts_with("config file not found"));
}

#[test]
fn duplicate_field_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "dupes.yaml",
        r#"
defaults:
  project_id: PVT_main
  target_repo: octo/widgets
issues:
  - name: Twice
    creation_months: [1]
    template_file: twice.md
    fields:
      Status: Ready
      Status: Done
"#,
    );

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { format: "YAML", .. }));
    assert!(err.to_string().contains("Status"));
}

#[test]
fn malformed_yaml_shows_expected_schema() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.yaml", "defaults: [not, a, map]\n");

    let err = Config::load(&path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("invalid YAML format in config file"));
    assert!(message.contains("Expected schema:"));
    assert!(message.contains("creation_months"));
}

#[test]
fn numeric_looking_values_reach_the_resolver_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "release.yml",
        r#"
defaults:
  project_id: PVT_main
  target_repo: octo/widgets
issues:
  - name: Release
    creation_months: [1]
    template_file: release.md
    fields:
      Version: 1.10
      Estimate: 2.0
      Budget: 12345678901234567890
"#,
    );

    let config = Config::load(&path).unwrap();
    let index = SchemaIndex::build([
        FieldDefinition::single_select("F_version", "Version", [("O_19", "1.9"), ("O_110", "1.10")]),
        FieldDefinition::new("F_estimate", "Estimate", FieldDataType::Number),
        FieldDefinition::new("F_budget", "Budget", FieldDataType::Number),
    ]);

    let updates = resolve_issue_fields(&config.issues[0], &index).unwrap();
    let values: Vec<ResolvedValue> = updates.into_iter().map(|update| update.value).collect();
    assert_eq!(
        values,
        vec![
            ResolvedValue::SingleSelect {
                option_id: "O_110".to_string()
            },
            ResolvedValue::Number("2.0".to_string()),
            ResolvedValue::Number("12345678901234567890".to_string()),
        ]
    );
}
