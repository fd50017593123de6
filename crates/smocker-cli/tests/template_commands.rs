use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};

fn temp_project() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("smocker_cli_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp project");
    dir
}

fn smocker(project: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_smocker"))
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("SMOCKER_LOG")
        .env("SMOCKER_SF_BIN", project.join("no-such-sf"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn smocker");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for smocker")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn template_path(project: &Path, file_name: &str) -> PathBuf {
    project.join("data_gen/templates").join(file_name)
}

fn load_json(path: &Path) -> Value {
    let contents =
        fs::read_to_string(path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

/// Project with `data_gen` initialized and the default template written.
fn initialized_project() -> PathBuf {
    let project = temp_project();
    let output = smocker(&project, &["template", "init", "--default"], "");
    assert!(output.status.success(), "init failed: {}", stderr(&output));
    project
}

#[test]
fn init_creates_structure_and_numbered_default_templates() {
    let project = initialized_project();

    for dir in ["data_gen/templates", "data_gen/output", "data_gen/logs"] {
        assert!(project.join(dir).is_dir(), "{dir} missing");
    }
    assert!(project.join("data_gen/settings.toml").is_file());

    let template = load_json(&template_path(&project, "default_data_template.json"));
    assert_eq!(template["templateFileName"], "default_data_template.json");
    assert_eq!(template["outputFormat"], json!(["csv"]));
    assert_eq!(template["sObjects"][2]["lead"]["count"], 5);

    let output = smocker(&project, &["template", "init", "--default"], "");
    assert!(output.status.success());
    let second = load_json(&template_path(&project, "default_data_template_1.json"));
    assert_eq!(second["templateFileName"], "default_data_template_1.json");
}

#[test]
fn init_with_name_asks_before_overwriting() {
    let project = initialized_project();
    let args = ["template", "init", "--template-name", "accounts"];

    let output = smocker(&project, &args, "");
    assert!(output.status.success(), "{}", stderr(&output));
    let path = template_path(&project, "accounts_data_template.json");
    assert!(path.is_file());

    let output = smocker(&project, &args, "n\n");
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Do you want to overwrite?"));

    let output = smocker(&project, &["template", "init", "--template-name", "accounts", "--force"], "");
    assert!(output.status.success());
}

#[test]
fn upsert_merges_and_writes_the_template() {
    let project = initialized_project();
    let output = smocker(
        &project,
        &[
            "template",
            "upsert",
            "-t",
            "default_data_template",
            "--namespace-to-exclude",
            "NS1, ns2",
            "--output-format",
            "json",
        ],
        "",
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Updated 'namespaceToExclude' to: ns1, ns2"));
    assert!(stdout(&output).contains("Success: data template 'default_data_template.json' updated"));

    let template = load_json(&template_path(&project, "default_data_template.json"));
    assert_eq!(template["namespaceToExclude"], json!(["ns1", "ns2"]));
    assert_eq!(template["outputFormat"], json!(["csv", "json"]));
    assert_eq!(
        template["_comment_importantNote"].as_str().map(|note| note.is_empty()),
        Some(false)
    );
}

#[test]
fn failed_upsert_leaves_the_file_untouched() {
    let project = initialized_project();
    let path = template_path(&project, "default_data_template.json");
    let output = smocker(
        &project,
        &["template", "upsert", "-t", "default_data_template", "-f", "di"],
        "",
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let before = fs::read(&path).expect("read template");

    let output = smocker(
        &project,
        &["template", "upsert", "-t", "default_data_template", "-l", "jp", "-c", "300"],
        "",
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Process halted:"));
    assert_eq!(fs::read(&path).expect("read template"), before);
}

#[test]
fn unknown_object_is_added_only_when_confirmed() {
    let project = initialized_project();
    let path = template_path(&project, "default_data_template.json");
    let args = [
        "template",
        "upsert",
        "-t",
        "default_data_template",
        "-o",
        "opportunity",
        "-c",
        "4",
    ];

    let output = smocker(&project, &args, "n\n");
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(load_json(&path)["sObjects"].as_array().map(Vec::len) == Some(3));

    let output = smocker(&project, &args, "y\n");
    assert!(output.status.success(), "{}", stderr(&output));
    let template = load_json(&path);
    assert_eq!(template["sObjects"][3], json!({ "opportunity": { "count": 4 } }));
}

#[test]
fn always_add_policy_skips_the_prompt() {
    let project = initialized_project();
    fs::write(
        project.join("data_gen/settings.toml"),
        "new_object_policy = \"always_add\"\n",
    )
    .expect("write settings");

    let output = smocker(
        &project,
        &["template", "upsert", "-t", "default_data_template", "-o", "case", "-l", "jp"],
        "",
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(!stdout(&output).contains("Do you want to add?"));
    let template = load_json(&template_path(&project, "default_data_template.json"));
    assert_eq!(template["sObjects"][3], json!({ "case": { "language": "jp" } }));
}

#[test]
fn conflicting_scope_is_rejected() {
    let project = initialized_project();
    let output = smocker(
        &project,
        &["template", "upsert", "-t", "default_data_template", "-o", "contact", "-x", "ns1"],
        "",
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--namespace-to-exclude"));
}

#[test]
fn failed_remove_leaves_the_file_untouched() {
    let project = initialized_project();
    let path = template_path(&project, "default_data_template.json");
    let output = smocker(
        &project,
        &[
            "template",
            "upsert",
            "-t",
            "default_data_template",
            "-x",
            "ns1",
            "-f",
            "di,json",
        ],
        "",
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let before = fs::read(&path).expect("read template");

    let output = smocker(
        &project,
        &[
            "template",
            "remove",
            "-t",
            "default_data_template",
            "-x",
            "ns1",
            "-f",
            "di,csv,json",
        ],
        "",
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Process halted:"));
    assert_eq!(fs::read(&path).expect("read template"), before);
}

#[test]
fn remove_keeps_comments_next_to_their_fields() {
    let project = initialized_project();
    let path = template_path(&project, "default_data_template.json");
    let before = fs::read_to_string(&path).expect("read template");

    let output = smocker(
        &project,
        &["template", "remove", "-t", "default_data_template", "-o", "lead", "-l"],
        "",
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let after = fs::read_to_string(&path).expect("read template");

    let position = |text: &str, needle: &str| {
        text.find(needle)
            .unwrap_or_else(|| panic!("{needle} missing from template"))
    };
    assert!(position(&after, "\"_comment_count\"") < position(&after, "\"count\": 1"));
    assert!(position(&after, "\"_comment_sObjects\"") < position(&after, "\"sObjects\""));
    assert_eq!(
        position(&before, "\"_comment_importantNote\""),
        position(&after, "\"_comment_importantNote\"")
    );
    let lead = &load_json(&path)["sObjects"][2]["lead"];
    assert!(lead.get("language").is_none());
    assert!(lead["_comment_language"].is_string());
}

#[test]
fn remove_drops_objects_and_guards_defaults() {
    let project = initialized_project();
    let path = template_path(&project, "default_data_template.json");

    let output = smocker(
        &project,
        &["template", "remove", "-t", "default_data_template", "-o", "lead"],
        "",
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let template = load_json(&path);
    assert_eq!(template["sObjects"], json!([{ "account": {} }, { "contact": {} }]));

    let output = smocker(&project, &["template", "remove", "-t", "default_data_template", "-c"], "");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("default 'count' can not be deleted"));

    let output = smocker(&project, &["template", "remove", "-t", "default_data_template"], "");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("can not be deleted"));
}

#[test]
fn missing_directory_and_file_are_reported() {
    let project = temp_project();
    let output = smocker(&project, &["template", "upsert", "-t", "nope", "-c", "2"], "");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Please initialize the setup first"));

    let project = initialized_project();
    let output = smocker(&project, &["template", "remove", "-t", "nope", "-c"], "");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("data template file not found"));
}

#[test]
fn validate_reports_local_issues_and_tolerates_remote_failures() {
    let project = initialized_project();
    let path = template_path(&project, "default_data_template.json");
    let mut template = load_json(&path);
    template["outputFormat"] = json!(["csv", "xml"]);
    fs::write(&path, serde_json::to_string_pretty(&template).expect("serialize"))
        .expect("write template");

    let output = smocker(&project, &["template", "validate", "-t", "default_data_template"], "");
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("unknown_output_format"));
    assert!(stdout(&output).contains("skipped the object and field check"));

    let output = smocker(
        &project,
        &["template", "validate", "-t", "default_data_template", "-a", "dev"],
        "",
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Warning: failed to run"));
}

#[test]
fn validate_accepts_legacy_key_names() {
    let project = initialized_project();
    let legacy = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../smocker-core/tests/fixtures/legacy_data_template.json");
    fs::copy(&legacy, template_path(&project, "legacy_data_template.json"))
        .expect("copy legacy template");

    let output = smocker(&project, &["template", "validate", "-t", "legacy_data_template"], "");
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(!stdout(&output).contains("schema_violation"), "{}", stdout(&output));
    assert!(stdout(&output).contains("unknown_output_format"));
}

#[test]
fn validate_fails_on_unparseable_template() {
    let project = initialized_project();
    fs::write(template_path(&project, "broken.json"), "{ not json").expect("write template");

    let output = smocker(&project, &["template", "validate", "-t", "broken"], "");
    assert!(!output.status.success());
}

#[test]
fn commands_append_structured_logs() {
    let project = initialized_project();
    let output = smocker(
        &project,
        &["template", "upsert", "-t", "default_data_template", "-c", "3"],
        "",
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let log = fs::read_to_string(project.join("data_gen/logs/smocker.ndjson")).expect("read log");
    let events: Vec<Value> = log
        .lines()
        .map(|line| serde_json::from_str(line).expect("parse log line"))
        .collect();
    assert!(events.iter().any(|event| event["fields"]["event"] == "template_written"));
    assert!(
        events
            .iter()
            .any(|event| event["span"]["invocation_id"].is_string())
    );
}
