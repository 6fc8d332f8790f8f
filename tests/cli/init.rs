use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["includes"], serde_json::json!(["."]));
    assert_eq!(parsed["extensions"], serde_json::json!(["swift"]));
    assert_eq!(parsed["commentSource"], "template");
    assert_eq!(parsed["layout"], "inline");
    assert!(
        parsed.get("ignoreTexts").is_some(),
        "Config should have 'ignoreTexts' field"
    );
    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .locwraprc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".locwraprc.json").exists());
    let content = test.read_file(".locwraprc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".locwraprc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: .locwraprc.json already exists
    ");

    assert_eq!(test.read_file(".locwraprc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("App/HomeView.swift", "Text(\"Welcome\")\n")?;

    let output = test.command().output()?;
    assert!(
        output.status.success(),
        "Wrap should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        test.read_file("App/HomeView.swift")?,
        "Text(String(localized: \"Welcome\", comment: \"Text label in HomeView\"))\n"
    );

    Ok(())
}
