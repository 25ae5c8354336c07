use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::tempdir;

fn effigy() -> Command {
    Command::new(cargo::cargo_bin!("effigy"))
}

const TAG_JSON: &str = r#"{
  "name": "Tag",
  "fields": {"id": "int", "label": "str", "posts": "list[\"Post\"]"},
  "key": {"fields": ["id"]},
  "relationships": [
    {"navigation": "posts", "kind": "has_many", "inverse": "tags"}
  ]
}"#;

const POST_JSON: &str = r#"{
  "name": "Post",
  "fields": {"id": "int", "title": "str", "tags": "list[\"Tag\"]"},
  "key": {"fields": ["id"]},
  "relationships": [
    {"navigation": "tags", "kind": "has_many", "inverse": "posts"}
  ]
}"#;

fn project() -> tempfile::TempDir {
    let tmp = tempdir().unwrap();
    effigy().current_dir(tmp.path()).arg("init").assert().success();
    fs::create_dir_all(tmp.path().join("models")).unwrap();
    fs::write(tmp.path().join("models/post.json"), POST_JSON).unwrap();
    fs::write(tmp.path().join("models/tag.json"), TAG_JSON).unwrap();
    tmp
}

#[test]
fn test_main_with_help_flag() {
    effigy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("effigy"));
}

#[test]
fn test_init_writes_config() {
    let tmp = tempdir().unwrap();
    effigy()
        .current_dir(tmp.path())
        .args(["init", "--provider", "mysql"])
        .assert()
        .success()
        .stdout(predicate::str::contains("effigy.json"));

    let written = fs::read_to_string(tmp.path().join("effigy.json")).unwrap();
    assert!(written.contains("\"provider\": \"mysql\""), "{written}");

    effigy()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_sql_without_config_fails() {
    let tmp = tempdir().unwrap();
    effigy()
        .current_dir(tmp.path())
        .arg("sql")
        .assert()
        .failure()
        .stderr(predicate::str::contains("effigy init"));
}

#[test]
fn test_sql_emits_association_table() {
    let tmp = project();
    effigy()
        .current_dir(tmp.path())
        .env("NO_COLOR", "1")
        .arg("sql")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS \"posts_tags\""))
        .stdout(predicate::str::contains("REFERENCES \"tags\" (\"id\")"));
}

#[test]
fn test_drop_lists_association_first() {
    let tmp = project();
    effigy()
        .current_dir(tmp.path())
        .env("NO_COLOR", "1")
        .arg("drop")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. DROP TABLE IF EXISTS \"posts_tags\";"));
}

#[test]
fn test_inspect_shows_relationships() {
    let tmp = project();
    effigy()
        .current_dir(tmp.path())
        .env("NO_COLOR", "1")
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("tags -> Tag (many-to-many) via posts_tags"));
}

#[test]
fn test_verbose_logs_finalize() {
    let tmp = project();
    effigy()
        .current_dir(tmp.path())
        .env_remove("RUST_LOG")
        .args(["--verbose", "sql"])
        .assert()
        .success()
        .stderr(predicate::str::contains("schema finalized"));
}
