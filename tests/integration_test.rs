use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn promptbuddy_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_promptbuddy"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    promptbuddy_cmd()
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn init(dir: &Path) {
    let output = run(dir, &["init"]);
    assert!(output.status.success());
}

/// Add a prompt and return its id from the JSON output.
fn add(dir: &Path, name: &str, category: &str, content: &str) -> String {
    let output = run(
        dir,
        &["add", name, "--category", category, "--content", content, "--json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    parsed["id"].as_str().unwrap().to_string()
}

fn list_json(dir: &Path, args: &[&str]) -> Vec<serde_json::Value> {
    let output = run(dir, args);
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    parsed.as_array().unwrap().clone()
}

fn names(values: &[serde_json::Value]) -> Vec<String> {
    values
        .iter()
        .map(|v| v["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_init_creates_library_directory() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["init"]);

    assert!(output.status.success());
    assert!(tmp.path().join(".promptbuddy").exists());
    assert!(tmp.path().join(".promptbuddy/config.yaml").exists());
    assert!(tmp.path().join(".promptbuddy/library.loro").exists());
}

#[test]
fn test_init_sqlite_backend() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["init", "--backend", "sqlite"]);

    assert!(output.status.success());
    assert!(tmp.path().join(".promptbuddy/library.db").exists());
    add(tmp.path(), "Summary", "Writing", "Summarize this");
    let prompts = list_json(tmp.path(), &["list", "--json"]);
    assert_eq!(names(&prompts), vec!["Summary"]);
}

#[test]
fn test_init_twice_fails() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let output = run(tmp.path(), &["init"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Already initialized"));
}

#[test]
fn test_add_without_init_fails() {
    let tmp = TempDir::new().unwrap();

    let output = run(
        tmp.path(),
        &["add", "Test", "--category", "Misc", "--content", "x"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not in a promptbuddy library"));
}

#[test]
fn test_add_rejects_blank_content() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let output = run(
        tmp.path(),
        &["add", "Empty", "--category", "Misc", "--content", "   "],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("content must not be empty"));
}

#[test]
fn test_add_from_stdin() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let mut child = promptbuddy_cmd()
        .current_dir(tmp.path())
        .args(["add", "Piped", "--category", "Misc", "--stdin", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"Text from a pipe")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["content"], "Text from a pipe");
}

#[test]
fn test_full_prompt_workflow() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let id = add(tmp.path(), "Changelog Generator", "Code", "Write a changelog");
    add(tmp.path(), "Summary", "Writing", "Summarize this");

    // Filtered list by name
    let prompts = list_json(tmp.path(), &["list", "--search", "log", "--json"]);
    assert_eq!(names(&prompts), vec!["Changelog Generator"]);

    // Categories were registered implicitly
    let categories = list_json(tmp.path(), &["category", "list", "--json"]);
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["name"], "Code");
    assert_eq!(categories[0]["prompts"], 1);

    // Get by id prefix
    let output = run(tmp.path(), &["get", &id[..8]]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Changelog Generator"));
    assert!(stdout.contains("Write a changelog"));

    // Use prints the text and bumps the counter
    let output = run(tmp.path(), &["use", &id]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Write a changelog"));

    let most_used = list_json(tmp.path(), &["most-used", "--json"]);
    assert_eq!(most_used[0]["name"], "Changelog Generator");
    assert_eq!(most_used[0]["usageCount"], 1);

    // Update
    let output = run(
        tmp.path(),
        &["update", &id, "--name", "Release Notes", "--category", "Docs", "--json"],
    );
    assert!(output.status.success());
    let updated: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(updated["name"], "Release Notes");
    assert_eq!(updated["category"], "Docs");
    assert_eq!(updated["id"], id.as_str());

    // Delete
    let output = run(tmp.path(), &["delete", &id, "--force"]);
    assert!(output.status.success());
    let prompts = list_json(tmp.path(), &["list", "--json"]);
    assert_eq!(names(&prompts), vec!["Summary"]);
}

#[test]
fn test_most_used_defaults_to_name_order() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    for name in ["Charlie", "Alice", "Bob"] {
        add(tmp.path(), name, "Misc", "x");
    }

    let most_used = list_json(tmp.path(), &["most-used", "--json"]);

    assert_eq!(names(&most_used), vec!["Alice", "Bob", "Charlie"]);
}

#[test]
fn test_reset_usage() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    let id = add(tmp.path(), "Alpha", "Misc", "x");
    run(tmp.path(), &["use", &id]);
    run(tmp.path(), &["use", &id]);

    let output = run(tmp.path(), &["reset-usage"]);
    assert!(output.status.success());

    let output = run(tmp.path(), &["get", &id, "--json"]);
    let prompt: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(prompt["usageCount"], 0);
}

#[test]
fn test_duplicate_and_favorite() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    let id = add(tmp.path(), "Review", "Code", "Check this diff");

    let output = run(tmp.path(), &["duplicate", &id, "--json"]);
    assert!(output.status.success());
    let copy: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(copy["name"], "Review (Copy)");
    assert_eq!(copy["content"], "Check this diff");
    assert_ne!(copy["id"], id.as_str());

    let output = run(tmp.path(), &["favorite", &id]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Added to favorites"));

    let favorites = list_json(tmp.path(), &["favorites", "--json"]);
    assert_eq!(names(&favorites), vec!["Review"]);

    let sorted = list_json(tmp.path(), &["list", "--sort", "name", "--json"]);
    assert_eq!(names(&sorted), vec!["Review", "Review (Copy)"]);
}

#[test]
fn test_category_delete_cascades() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    add(tmp.path(), "One", "Code", "x");
    add(tmp.path(), "Two", "Code", "x");
    add(tmp.path(), "Three", "Writing", "x");

    let output = run(tmp.path(), &["category", "delete", "Code", "--force"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("2 prompt(s)"));

    let prompts = list_json(tmp.path(), &["list", "--json"]);
    assert_eq!(names(&prompts), vec!["Three"]);
    let categories = list_json(tmp.path(), &["category", "list", "--json"]);
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Writing");
}

#[test]
fn test_category_add_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    run(tmp.path(), &["category", "add", "  Writing  "]);
    let output = run(tmp.path(), &["category", "add", "Writing"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("already exists"));
    run(tmp.path(), &["category", "add", "Code"]);

    let categories = list_json(tmp.path(), &["category", "list", "--json"]);
    let listed: Vec<&str> = categories
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec!["Code", "Writing"]);
}

#[test]
fn test_delete_without_force_non_interactive_fails() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    let id = add(tmp.path(), "Keep", "Misc", "x");

    let output = run(tmp.path(), &["delete", &id]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--force"));
    let prompts = list_json(tmp.path(), &["list", "--json"]);
    assert_eq!(prompts.len(), 1);
}

#[test]
fn test_search_matches_content() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    add(tmp.path(), "Translate", "Language", "Into French please");
    add(tmp.path(), "Poem", "Writing", "Write a sonnet");

    let results = list_json(tmp.path(), &["search", "french", "--json"]);

    assert_eq!(names(&results), vec!["Translate"]);
}

#[test]
fn test_get_unknown_id_fails() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());

    let output = run(tmp.path(), &["get", "deadbeef"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Prompt not found"));
}

#[test]
fn test_damaged_store_is_moved_aside() {
    let tmp = TempDir::new().unwrap();
    init(tmp.path());
    add(tmp.path(), "Lost", "Misc", "x");
    let store = tmp.path().join(".promptbuddy/library.loro");
    std::fs::write(&store, b"garbage").unwrap();

    let prompts = list_json(tmp.path(), &["list", "--json"]);
    assert!(prompts.is_empty());
    let backup = tmp.path().join(".promptbuddy/library.loro.corrupt");
    assert_eq!(std::fs::read(&backup).unwrap(), b"garbage");

    add(tmp.path(), "Fresh", "Misc", "x");
    let prompts = list_json(tmp.path(), &["list", "--json"]);
    assert_eq!(names(&prompts), vec!["Fresh"]);
}
