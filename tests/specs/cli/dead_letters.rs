// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `outbox dead-letters`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

#[path = "common.rs"]
mod common;

use common::*;

fn dead_letters_json(temp: &TempDir) -> Vec<serde_json::Value> {
    let output = outbox(temp)
        .args(["dead-letters", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn exhausted_action_is_kept_when_enabled() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", "/api/shipments").with_status(503).create();

    let temp = TempDir::new().unwrap();
    point_at(&temp, &server.url(), true);
    let id = create_shipment(&temp, "TR-001");

    outbox(&temp).arg("flush").assert().success();

    let dead = dead_letters_json(&temp);
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0]["id"], id.as_str());
    assert_eq!(dead[0]["retries"], 3);
    assert!(dead[0]["lastError"].as_str().unwrap().contains("503"));

    outbox(&temp)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("pending: 0"))
        .stdout(predicate::str::contains("dead letters: 1"))
        .stdout(predicate::str::contains("503"));
}

#[test]
fn exhausted_action_is_discarded_by_default() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", "/api/shipments").with_status(503).create();

    let temp = TempDir::new().unwrap();
    point_at(&temp, &server.url(), false);
    create_shipment(&temp, "TR-001");

    outbox(&temp).arg("flush").assert().success();

    assert!(dead_letters_json(&temp).is_empty());
    outbox(&temp)
        .args(["dead-letters", "list"])
        .assert()
        .success()
        .stdout("no dead letters\n");
}

#[test]
fn replay_requeues_with_fresh_retries() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", "/api/shipments").with_status(503).create();

    let temp = TempDir::new().unwrap();
    point_at(&temp, &server.url(), true);
    let id = create_shipment(&temp, "TR-001");
    outbox(&temp).arg("flush").assert().success();

    outbox(&temp)
        .args(["dead-letters", "replay", &id])
        .assert()
        .success()
        .stdout(format!("replayed {id}\n"));

    let live = list_json(&temp);
    assert_eq!(live.len(), 1);
    assert_eq!(live[0]["retries"], 0);
    assert!(live[0]["lastError"].is_null());
    assert!(dead_letters_json(&temp).is_empty());
}

#[test]
fn replay_unknown_id_fails() {
    let temp = TempDir::new().unwrap();
    outbox(&temp)
        .args(["dead-letters", "replay", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("action not found: missing"));
}

#[test]
fn purge_removes_all() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", "/api/shipments").with_status(503).create();

    let temp = TempDir::new().unwrap();
    point_at(&temp, &server.url(), true);
    create_shipment(&temp, "TR-001");
    create_shipment(&temp, "TR-002");
    outbox(&temp).arg("flush").assert().success();

    outbox(&temp)
        .args(["dead-letters", "purge"])
        .assert()
        .success()
        .stdout("purged 2 dead letter(s)\n");
    assert!(dead_letters_json(&temp).is_empty());
}
