//! Table-driven tests for configuration loading and validation.

mod common;

use printlog::config::{load_config, load_config_from_str};

/// Represents a single config loading test case.
struct ConfigTestCase {
    name: &'static str,
    config_json: &'static str,
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

const CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "valid_minimal_page_log",
        config_json: r#"{
            "version": "1.0",
            "source": { "kind": "page_log", "path": "/var/log/cups/page_log" }
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_full_journal",
        config_json: r#"{
            "version": "1.0",
            "database_path": "/var/lib/printlog/printlog.db",
            "source": { "kind": "journal", "unit": "cups", "since": "2 hours ago", "timeout_secs": 30 },
            "spool": {
                "directory": "/var/spool/cups",
                "control_prefix": "c",
                "data_prefix": "d",
                "max_permission_warnings": 3
            },
            "page_refinement": {
                "enabled": true,
                "file_command": "file",
                "page_count_command": "pdfinfo",
                "recognized_types": ["PDF"],
                "timeout_secs": 10
            },
            "schedule": { "interval_secs": 300, "run_timeout_secs": 60 }
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "missing_version",
        config_json: r#"{
            "source": { "kind": "page_log", "path": "/logs/page_log" }
        }"#,
        should_succeed: false,
        expected_error: Some("version"),
    },
    ConfigTestCase {
        name: "page_log_without_path",
        config_json: r#"{
            "version": "1.0",
            "source": { "kind": "page_log" }
        }"#,
        should_succeed: false,
        expected_error: None,
    },
    ConfigTestCase {
        name: "unknown_top_level_field",
        config_json: r#"{
            "version": "1.0",
            "source": { "kind": "page_log", "path": "/logs/page_log" },
            "verbose": true
        }"#,
        should_succeed: false,
        expected_error: Some("verbose"),
    },
    ConfigTestCase {
        name: "zero_probe_timeout",
        config_json: r#"{
            "version": "1.0",
            "source": { "kind": "page_log", "path": "/logs/page_log" },
            "page_refinement": { "enabled": true, "timeout_secs": 0 }
        }"#,
        should_succeed: false,
        expected_error: None,
    },
    ConfigTestCase {
        name: "negative_interval",
        config_json: r#"{
            "version": "1.0",
            "source": { "kind": "page_log", "path": "/logs/page_log" },
            "schedule": { "interval_secs": -5 }
        }"#,
        should_succeed: false,
        expected_error: None,
    },
];

#[test]
fn test_config_table() {
    for case in CONFIG_TESTS {
        let result = load_config_from_str(case.config_json);
        match (case.should_succeed, &result) {
            (true, Ok(_)) => {}
            (true, Err(e)) => panic!("{}: expected success, got {}", case.name, e),
            (false, Ok(_)) => panic!("{}: expected failure", case.name),
            (false, Err(e)) => {
                if let Some(expected) = case.expected_error {
                    let message = e.to_string();
                    assert!(
                        message.contains(expected),
                        "{}: error '{}' does not mention '{}'",
                        case.name,
                        message,
                        expected
                    );
                }
            }
        }
    }
}

#[test]
fn test_load_config_from_file() {
    let harness = common::TestHarness::new();
    let path = harness.temp_path().join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&harness.config()).unwrap()).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.database_path(), Some(harness.db_path.clone()));
    assert_eq!(config.spool.directory, harness.spool_dir.display().to_string());
}
