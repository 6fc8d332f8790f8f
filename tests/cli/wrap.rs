use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

const SETTINGS_VIEW: &str = r#"struct SettingsView: View {
    var body: some View {
        Form {
            Section(header: Text("Preferences")) {
                Toggle("Dark mode", isOn: $dark)
            }
        }
        .navigationBarTitle("Settings")
    }
}
"#;

const SETTINGS_VIEW_WRAPPED: &str = r#"struct SettingsView: View {
    var body: some View {
        Form {
            let preferencesHeader = String(localized: "Preferences", comment: "Section header in SettingsView")
            Section(header: Text(preferencesHeader)) {
                Toggle(String(localized: "Dark mode", comment: "Control label in SettingsView"), isOn: $dark)
            }
        }
        .navigationBarTitle(Text(String(localized: "Settings", comment: "Navigation bar title in SettingsView")))
    }
}
"#;

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_wrap_writes_files() -> Result<()> {
    let test = CliTest::with_file("App/SettingsView.swift", SETTINGS_VIEW)?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("App/SettingsView.swift")?, SETTINGS_VIEW_WRAPPED);
    let stdout = stdout(&output);
    assert!(stdout.contains("Wrapped 3 literals in 1 file."), "{stdout}");
    assert!(stdout.contains("hoisted into bindings: 1"), "{stdout}");

    Ok(())
}

#[test]
fn test_wrap_twice_changes_nothing() -> Result<()> {
    let test = CliTest::with_file("App/SettingsView.swift", SETTINGS_VIEW)?;

    test.command().output()?;
    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("App/SettingsView.swift")?, SETTINGS_VIEW_WRAPPED);
    assert!(stdout(&output).contains("Checked 1 file - nothing to wrap"));

    Ok(())
}

#[test]
fn test_dry_run_leaves_files_unchanged() -> Result<()> {
    let test = CliTest::with_file("App/SettingsView.swift", SETTINGS_VIEW)?;

    let output = test.command().arg("--dry-run").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("App/SettingsView.swift")?, SETTINGS_VIEW);
    let stdout = stdout(&output);
    assert!(stdout.contains("Would wrap 3 literals in 1 file."), "{stdout}");
    assert!(stdout.contains("Run without --dry-run to write these changes."));
    assert!(stdout.contains("Text(preferencesHeader)"), "{stdout}");

    Ok(())
}

#[test]
fn test_check_reports_pending_changes() -> Result<()> {
    let test = CliTest::with_file("App/SettingsView.swift", SETTINGS_VIEW)?;

    let output = test.command().arg("--check").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(test.read_file("App/SettingsView.swift")?, SETTINGS_VIEW);
    let stdout = stdout(&output);
    assert!(stdout.contains("would change: App/SettingsView.swift"), "{stdout}");
    assert!(stdout.contains("1 file would change (3 literals to wrap)"), "{stdout}");

    test.command().output()?;
    let output = test.command().arg("--check").output()?;
    assert_eq!(output.status.code(), Some(0));

    Ok(())
}

#[test]
fn test_check_conflicts_with_dry_run() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().args(["--check", "--dry-run"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot be used with"));

    Ok(())
}

#[test]
fn test_clean_project() -> Result<()> {
    let test = CliTest::with_file(
        "App/PinView.swift",
        "Image(systemName: \"lock.fill\")\nText(verbatim: \"v1.0\")\n",
    )?;

    assert_cmd_snapshot!(test.command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 file - nothing to wrap

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_scan_error_fails_only_that_file() -> Result<()> {
    let test = CliTest::with_file("App/Broken.swift", "VStack {\n    Text(\"oops\n}\n")?;
    test.write_file("App/Good.swift", "Text(\"Hello\")\n")?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(test.read_file("App/Broken.swift")?, "VStack {\n    Text(\"oops\n}\n");
    assert_eq!(
        test.read_file("App/Good.swift")?,
        "Text(String(localized: \"Hello\", comment: \"Text label in Good\"))\n"
    );
    let stdout = stdout(&output);
    assert!(stdout.contains("error: unterminated string literal"), "{stdout}");
    assert!(stdout.contains("--> App/Broken.swift:2:10"), "{stdout}");

    Ok(())
}

#[test]
fn test_missing_path_is_an_error() -> Result<()> {
    let test = CliTest::with_file("App/Good.swift", "Text(\"Hello\")\n")?;

    let output = test.command().args(["App/Good.swift", "App/Nope.swift"]).output()?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout(&output);
    assert!(stdout.contains("error: path does not exist"), "{stdout}");
    assert!(stdout.contains("--> App/Nope.swift"), "{stdout}");
    assert!(test.read_file("App/Good.swift")?.contains("String(localized: \"Hello\""));

    Ok(())
}

#[test]
fn test_interpolation_is_a_warning() -> Result<()> {
    let test = CliTest::with_file("App/Greeting.swift", "Text(\"Hello \\(name)\")\n")?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("App/Greeting.swift")?, "Text(\"Hello \\(name)\")\n");
    let stdout = stdout(&output);
    assert!(stdout.contains("warning: \"Hello \\(name)\""), "{stdout}");
    assert!(stdout.contains("1 problem (0 errors, 1 warning)"), "{stdout}");

    Ok(())
}

#[test]
fn test_empty_comment_source_flag() -> Result<()> {
    let test = CliTest::with_file("App/HomeView.swift", "Text(\"Welcome\")\n")?;

    let output = test.command().args(["--comment-source", "empty"]).output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.read_file("App/HomeView.swift")?,
        "Text(String(localized: \"Welcome\", comment: \"\"))\n"
    );

    Ok(())
}

#[test]
fn test_config_ignore_texts_and_layout() -> Result<()> {
    let test = CliTest::with_file(
        "App/HomeView.swift",
        "VStack {\n    Text(\"OK\")\n    Text(\"Privacy Policy\")\n}\n",
    )?;
    test.write_file(
        ".locwraprc.json",
        r#"{ "ignoreTexts": ["OK"], "layout": "expanded", "commentSource": "empty" }"#,
    )?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.read_file("App/HomeView.swift")?,
        "VStack {\n    Text(\"OK\")\n    Text(String(\n        localized: \"Privacy Policy\",\n        comment: \"\"))\n}\n"
    );

    Ok(())
}

#[test]
fn test_layout_flag_overrides_config() -> Result<()> {
    let test = CliTest::with_file("App/HomeView.swift", "Text(\"Hi\")\n")?;
    test.write_file(".locwraprc.json", r#"{ "layout": "expanded" }"#)?;

    test.command().args(["--layout", "inline"]).output()?;

    assert_eq!(
        test.read_file("App/HomeView.swift")?,
        "Text(String(localized: \"Hi\", comment: \"Text label in HomeView\"))\n"
    );

    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::with_file("App/HomeView.swift", "Text(\"Hi\")\n")?;
    test.write_file(".locwraprc.json", r#"{ "concurrency": 0 }"#)?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(test.read_file("App/HomeView.swift")?, "Text(\"Hi\")\n");

    Ok(())
}

#[test]
fn test_ignored_directories_are_skipped() -> Result<()> {
    let test = CliTest::with_file("Pods/Lib/View.swift", "Text(\"Vendor\")\n")?;
    test.write_file("App/HomeView.swift", "Text(\"Mine\")\n")?;

    test.command().output()?;

    assert_eq!(test.read_file("Pods/Lib/View.swift")?, "Text(\"Vendor\")\n");
    assert!(test.read_file("App/HomeView.swift")?.contains("localized: \"Mine\""));

    Ok(())
}

#[test]
fn test_output_dir_mirrors_input_tree() -> Result<()> {
    let test = CliTest::with_file("App/SettingsView.swift", SETTINGS_VIEW)?;
    test.write_file("App/Views/HomeView.swift", "Text(\"Hi\")\n")?;

    let output = test.command().args(["App", "--output", "Localized"]).output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("App/SettingsView.swift")?, SETTINGS_VIEW);
    assert_eq!(test.read_file("App/Views/HomeView.swift")?, "Text(\"Hi\")\n");
    assert_eq!(test.read_file("Localized/SettingsView.swift")?, SETTINGS_VIEW_WRAPPED);
    assert!(
        test.read_file("Localized/Views/HomeView.swift")?
            .contains("Text(String(localized: \"Hi\", comment: \"Text label in HomeView\"))")
    );
    assert!(stdout(&output).contains("Wrapped 4 literals in 2 files."));

    Ok(())
}

#[test]
fn test_output_from_config() -> Result<()> {
    let test = CliTest::with_file("App/SettingsView.swift", SETTINGS_VIEW)?;
    test.write_file(".locwraprc.json", r#"{ "output": "Build/Localized" }"#)?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("App/SettingsView.swift")?, SETTINGS_VIEW);
    assert_eq!(
        test.read_file("Build/Localized/App/SettingsView.swift")?,
        SETTINGS_VIEW_WRAPPED
    );

    Ok(())
}

#[test]
fn test_output_is_not_written_under_check() -> Result<()> {
    let test = CliTest::with_file("App/SettingsView.swift", SETTINGS_VIEW)?;

    let output = test.command().args(["--check", "--output", "Localized"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(!test.root().join("Localized").exists());

    Ok(())
}

#[test]
fn test_output_must_be_a_directory() -> Result<()> {
    let test = CliTest::with_file("App/SettingsView.swift", SETTINGS_VIEW)?;
    test.write_file("Localized", "")?;

    let output = test.command().args(["--output", "Localized"]).output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(test.read_file("App/SettingsView.swift")?, SETTINGS_VIEW);
    assert_eq!(test.read_file("Localized")?, "");

    Ok(())
}
