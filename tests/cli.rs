//
//  octane-cli
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::path::Path;

use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "OCTANE_URL",
    "OCTANE_API_KEY",
    "OCTANE_SECRET",
    "OCTANE_SPACE",
    "OCTANE_WORKSPACE",
    "OCTANE_CONFIG",
    "OCTANE_DEBUG",
];

fn octane(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("octane").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("--config").arg(config);
    cmd
}

fn write_config(dir: &TempDir, url: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[server]\nurl = \"{url}\"\napi_key = \"key\"\nsecret = \"secret\"\nspace_id = \"1001\"\nworkspace_id = \"1002\"\n"
        ),
    )
    .unwrap();
    path
}

#[test]
fn types_lists_catalog() {
    let dir = TempDir::new().unwrap();
    octane(&dir.path().join("config.toml"))
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("manual_tests"))
        .stdout(predicate::str::contains("metadata/fields"));
}

#[test]
fn get_without_config_explains_what_is_missing() {
    let dir = TempDir::new().unwrap();
    octane(&dir.path().join("config.toml"))
        .args(["get", "stories"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Octane URL configured"));
}

#[test]
fn get_rejects_unknown_entity_type() {
    let dir = TempDir::new().unwrap();
    octane(&dir.path().join("config.toml"))
        .args(["get", "bananas"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown entity type"));
}

#[test]
fn config_set_then_get() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    octane(&path)
        .args(["config", "set", "url", "https://octane.example.com"])
        .assert()
        .success();
    octane(&path)
        .args(["config", "get", "url"])
        .assert()
        .success()
        .stdout("https://octane.example.com\n");
    octane(&path)
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn get_prints_projected_json() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/shared_spaces/1001/workspaces/1002/defects")
        .match_query(Matcher::UrlEncoded("fields".into(), "id,name".into()))
        .with_status(200)
        .with_body(r#"{"total_count":1,"data":[{"type":"defect","id":"1","name":"Crash"}]}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.url());

    octane(&config)
        .args(["--format", "compact", "get", "defects"])
        .assert()
        .success()
        .stdout("{\"id\":\"1\",\"name\":\"Crash\"}\n");
    mock.assert();
}

#[test]
fn create_exits_with_partial_failure_code() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/shared_spaces/1001/workspaces/1002/stories")
        .with_status(400)
        .with_body(r#"{"description":"phase is required"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.url());
    let input = dir.path().join("stories.json");
    std::fs::write(&input, r#"[{"name":"a"},{"name":"b"}]"#).unwrap();

    octane(&config)
        .args(["create", "stories", "--input"])
        .arg(&input)
        .assert()
        .code(3)
        .stdout(predicate::str::contains("\"status\": \"failed\""))
        .stderr(predicate::str::contains("1 of 1 chunks failed"));
}
