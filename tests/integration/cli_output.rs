use lognav::tooling::{CliContext, Commands};
use lognav::NavError;
use std::fs;
use tempfile::TempDir;

fn workspace() -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    fs::create_dir_all(root.join("logs/archive")).unwrap();
    fs::write(root.join("logs/app.log"), "hello").unwrap();
    fs::write(root.join("logs/notes.txt"), "x").unwrap();
    fs::write(root.join("logs/archive/old.log"), "x").unwrap();
    fs::create_dir_all(root.join("logs/empty")).unwrap();
    (temp, root)
}

fn context(root: &std::path::Path) -> CliContext {
    let config = root.join("lognav.toml");
    fs::write(&config, "[filter]\npattern = \"*.log\"\n").unwrap();
    CliContext::new(root.to_path_buf(), Some(config)).unwrap()
}

fn tree(roots: Vec<std::path::PathBuf>, format: &str, all: bool) -> Commands {
    Commands::Tree {
        roots,
        format: format.to_string(),
        all,
    }
}

#[test]
fn tree_json_contract_has_required_fields() {
    let (_temp, root) = workspace();
    let output = context(&root)
        .execute(&tree(vec!["logs".into()], "json", false))
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["filter"], "*.log");
    let logs = &parsed["roots"][0];
    assert_eq!(logs["path"], root.join("logs").display().to_string());
    assert_eq!(logs["kind"], "Folder");
    assert!(logs["id"].as_u64().is_some());

    let names: Vec<&str> = logs["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    // The empty folder is hidden, the .txt file was never loaded.
    assert_eq!(names, vec!["app.log", "archive"]);
    assert_eq!(logs["children"][0]["size"], 5);
}

#[test]
fn tree_json_all_includes_hidden_nodes() {
    let (_temp, root) = workspace();
    let output = context(&root)
        .execute(&tree(vec![root.join("logs")], "json", true))
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let children = parsed["roots"][0]["children"].as_array().unwrap();
    assert_eq!(children.len(), 3);
    let empty = children.iter().find(|c| c["name"] == "empty").unwrap();
    assert_eq!(empty["visible"], false);
}

#[test]
fn tree_text_lists_visible_nodes() {
    let (_temp, root) = workspace();
    let output = context(&root)
        .execute(&tree(vec!["logs".into()], "text", false))
        .unwrap();

    assert!(output.contains("app.log"));
    assert!(output.contains("old.log"));
    assert!(!output.contains("notes.txt"));
    assert!(!output.contains("empty"));

    let all = context(&root)
        .execute(&tree(vec!["logs".into()], "text", true))
        .unwrap();
    assert!(all.contains("empty"));
    assert!(all.contains("(hidden)"));
}

#[test]
fn filter_override_changes_membership() {
    let (_temp, root) = workspace();
    let output = context(&root)
        .with_filter(Some("*.txt".to_string()))
        .execute(&tree(vec!["logs".into()], "json", false))
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["filter"], "*.txt");
    assert_eq!(parsed["roots"][0]["children"][0]["name"], "notes.txt");
}

#[test]
fn tree_without_roots_is_rejected() {
    let (_temp, root) = workspace();
    let err = context(&root).execute(&tree(Vec::new(), "text", false)).unwrap_err();
    assert!(matches!(err, NavError::InvalidArgument(_)));

    let err = context(&root)
        .execute(&tree(vec!["logs".into()], "yaml", false))
        .unwrap_err();
    assert!(matches!(err, NavError::InvalidArgument(_)));
}

#[test]
fn configured_roots_are_used_by_default() {
    let (_temp, root) = workspace();
    let config = root.join("lognav.toml");
    fs::write(
        &config,
        format!("roots = [{:?}]\n", root.join("logs").display().to_string()),
    )
    .unwrap();
    let context = CliContext::new(root.clone(), Some(config)).unwrap();

    let output = context.execute(&tree(Vec::new(), "json", false)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["roots"].as_array().unwrap().len(), 1);
}
