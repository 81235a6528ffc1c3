// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `outbox flush` against a mock shipment service.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

#[path = "common.rs"]
mod common;

use common::*;
use mockito::Matcher;
use serde_json::json;

#[test]
fn flush_posts_create_shipment() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/shipments")
        .match_body(Matcher::Json(json!({ "trackingNumber": "TR-001" })))
        .with_status(201)
        .expect(1)
        .create();

    let temp = TempDir::new().unwrap();
    point_at(&temp, &server.url(), false);
    create_shipment(&temp, "TR-001");

    outbox(&temp)
        .arg("flush")
        .assert()
        .success()
        .stdout("delivered 1 of 1, dropped 0\n");

    mock.assert();
    assert!(list_json(&temp).is_empty());
}

#[test]
fn flush_routes_by_type() {
    let mut server = mockito::Server::new();
    let status = server
        .mock("PUT", "/api/shipments/s-1/status")
        .match_body(Matcher::Json(json!({ "status": "cleared" })))
        .with_status(200)
        .create();
    let expense = server
        .mock("POST", "/api/shipments/s-1/expenses")
        .match_body(Matcher::Json(json!({ "description": "demurrage", "amount": 120.5 })))
        .with_status(200)
        .create();

    let temp = TempDir::new().unwrap();
    point_at(&temp, &server.url(), false);
    enqueue(&temp, "UPDATE_STATUS", r#"{"shipmentId":"s-1","status":"cleared"}"#);
    enqueue(
        &temp,
        "ADD_EXPENSE",
        r#"{"shipmentId":"s-1","description":"demurrage","amount":120.5}"#,
    );

    outbox(&temp).arg("flush").assert().success();

    status.assert();
    expense.assert();
}

#[test]
fn flush_gives_up_after_three_attempts() {
    let mut server = mockito::Server::new();
    let failing = server
        .mock("PUT", "/api/shipments/s-bad/status")
        .with_status(500)
        .expect(3)
        .create();
    let ok = server
        .mock("POST", "/api/shipments")
        .with_status(201)
        .expect(1)
        .create();

    let temp = TempDir::new().unwrap();
    point_at(&temp, &server.url(), false);
    enqueue(&temp, "UPDATE_STATUS", r#"{"shipmentId":"s-bad","status":"cleared"}"#);
    create_shipment(&temp, "TR-002");

    outbox(&temp)
        .arg("flush")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("delivered 1 of 2, dropped 1\n"))
        .stdout(predicate::str::contains("last error: rejected with HTTP 500"));

    failing.assert();
    ok.assert();
    assert!(list_json(&temp).is_empty());
}

#[test]
fn flush_offline_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    // Nothing listens here; an attempted delivery would fail and drop the action.
    point_at(&temp, "http://127.0.0.1:9", false);
    create_shipment(&temp, "TR-001");

    outbox(&temp)
        .args(["flush", "--offline"])
        .assert()
        .success()
        .stdout("offline: nothing sent (1 pending)\n");

    assert_eq!(list_json(&temp).len(), 1);
}

#[test]
fn flush_empty_queue() {
    let temp = TempDir::new().unwrap();
    outbox(&temp)
        .arg("flush")
        .assert()
        .success()
        .stdout("nothing to flush\n");
}
