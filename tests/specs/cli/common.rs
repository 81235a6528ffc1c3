// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `outbox` pointed at the given state directory.
pub fn outbox(state: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("outbox");
    cmd.arg("--state-dir")
        .arg(state.path())
        .env_remove("OUTBOX_STATE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Write `config.toml` into the state directory.
pub fn write_config(state: &TempDir, toml: &str) {
    std::fs::write(state.path().join("config.toml"), toml).unwrap();
}

/// Config aimed at a mock server with fast retries.
pub fn point_at(state: &TempDir, base_url: &str, dead_letter: bool) {
    write_config(
        state,
        &format!(
            "[remote]\nbase_url = \"{base_url}\"\ntimeout_secs = 5\n\n\
             [sync]\nbase_delay_ms = 1\ndead_letter = {dead_letter}\n"
        ),
    );
}

/// Enqueue an action and return the printed id.
pub fn enqueue(state: &TempDir, action_type: &str, payload: &str) -> String {
    let output = outbox(state)
        .arg("enqueue")
        .arg(action_type)
        .arg(payload)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "enqueue failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn create_shipment(state: &TempDir, tracking: &str) -> String {
    enqueue(
        state,
        "CREATE_SHIPMENT",
        &format!(r#"{{"trackingNumber":"{tracking}"}}"#),
    )
}

/// Parsed `list -o json` output.
pub fn list_json(state: &TempDir) -> Vec<serde_json::Value> {
    let output = outbox(state).args(["list", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}
