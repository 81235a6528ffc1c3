// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `outbox enqueue`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

#[path = "common.rs"]
mod common;

use common::*;
use yare::parameterized;

#[test]
fn enqueue_prints_new_id() {
    let temp = TempDir::new().unwrap();
    let id = create_shipment(&temp, "TR-001");

    assert_eq!(id.len(), 36, "expected a uuid, got {id:?}");
    let actions = list_json(&temp);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0]["id"], id.as_str());
}

#[test]
fn enqueue_stores_payload_verbatim() {
    let temp = TempDir::new().unwrap();
    enqueue(
        &temp,
        "CREATE_SHIPMENT",
        r#"{"trackingNumber":"TR-001","carrier":"Maersk"}"#,
    );

    let actions = list_json(&temp);
    assert_eq!(actions[0]["action"]["type"], "CREATE_SHIPMENT");
    assert_eq!(
        actions[0]["action"]["payload"],
        serde_json::json!({ "trackingNumber": "TR-001", "carrier": "Maersk" })
    );
    assert_eq!(actions[0]["retries"], 0);
}

#[parameterized(
    unknown_type = { "LAUNCH_ROCKET", "{}", "invalid action type" },
    bad_json = { "CREATE_SHIPMENT", "{oops", "invalid payload JSON" },
    missing_field = { "UPDATE_STATUS", r#"{"status":"cleared"}"#, "invalid payload" },
    empty_tracking = { "CREATE_SHIPMENT", r#"{"trackingNumber":""}"#, "invalid payload" },
)]
fn enqueue_rejects(action_type: &str, payload: &str, message: &str) {
    let temp = TempDir::new().unwrap();
    outbox(&temp)
        .arg("enqueue")
        .arg(action_type)
        .arg(payload)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: "))
        .stderr(predicate::str::contains(message));

    assert!(list_json(&temp).is_empty());
}

#[test]
fn enqueue_accepts_kebab_case_type() {
    let temp = TempDir::new().unwrap();
    enqueue(
        &temp,
        "add-expense",
        r#"{"shipmentId":"s-1","description":"demurrage","amount":120.5}"#,
    );
    assert_eq!(list_json(&temp)[0]["action"]["type"], "ADD_EXPENSE");
}
