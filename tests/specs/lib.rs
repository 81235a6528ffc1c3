// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs for the `outbox` binary.
//!
//! The files under `cli/` are compiled as integration tests of the
//! `outbox` package (see its `[[test]]` entries); this crate only anchors
//! the directory in the workspace.
