// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `outbox list`, `outbox stats` and `outbox clear`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

#[path = "common.rs"]
mod common;

use common::*;

#[test]
fn list_empty_queue() {
    let temp = TempDir::new().unwrap();
    outbox(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout("no pending actions\n");
}

#[test]
fn list_is_fifo() {
    let temp = TempDir::new().unwrap();
    for tracking in ["TR-003", "TR-001", "TR-002"] {
        create_shipment(&temp, tracking);
    }

    let tracking: Vec<String> = list_json(&temp)
        .iter()
        .map(|a| a["action"]["payload"]["trackingNumber"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(tracking, vec!["TR-003", "TR-001", "TR-002"]);

    let output = outbox(&temp).arg("list").output().unwrap();
    let text = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("CREATE_SHIPMENT") && lines[0].ends_with("TR-003"));
}

#[test]
fn stats_reports_pending() {
    let temp = TempDir::new().unwrap();
    create_shipment(&temp, "TR-001");
    create_shipment(&temp, "TR-002");

    outbox(&temp)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("pending: 2"))
        .stdout(predicate::str::contains("processing: no"))
        .stdout(predicate::str::contains("last error: -"));

    let output = outbox(&temp).args(["stats", "-o", "json"]).output().unwrap();
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        stats,
        serde_json::json!({
            "pending": 2,
            "processing": false,
            "lastError": null,
            "deadLetters": 0
        })
    );
}

#[test]
fn clear_empties_queue() {
    let temp = TempDir::new().unwrap();
    create_shipment(&temp, "TR-001");
    create_shipment(&temp, "TR-002");

    outbox(&temp)
        .arg("clear")
        .assert()
        .success()
        .stdout("cleared 2 pending action(s)\n");

    assert!(list_json(&temp).is_empty());
}
