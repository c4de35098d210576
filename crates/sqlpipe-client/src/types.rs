// Copyright (C) 2025 Sqlpipe Developers
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Wire types for the program manager API.

use serde::{Deserialize, Serialize};

/// One entry of the program listing (`GET /v0/programs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramDescriptor {
    /// Server-assigned opaque program identifier.
    pub program_id: String,
    /// Program name, unique on the server.
    pub name: String,
    /// Version counter, bumped by the server on every change.
    pub version: i64,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// Status lookup payload (`GET /v0/program_status?name=…`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramStatusResponse {
    /// Server-assigned opaque program identifier.
    pub program_id: String,
    /// Program name.
    pub name: String,
    /// Version at the moment of the lookup. May be stale immediately if
    /// another actor mutates the program afterwards.
    pub version: i64,
}

/// Creation request body (`POST /v0/programs`). Transient; exists only for the
/// duration of one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgramRequest {
    /// Program name, unique on the server.
    pub name: String,
    /// Delete-and-recreate an existing program of the same name (together with
    /// its dependent pipelines) instead of failing on conflict.
    pub overwrite_existing: bool,
    /// SQL source text.
    pub code: String,
    /// Human-readable description.
    pub description: String,
}

/// Creation response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgramResponse {
    /// Server-assigned opaque program identifier.
    pub program_id: String,
    /// Version of the freshly created program.
    pub version: i64,
}

/// Body of a non-2xx reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Server-reported error detail.
    pub message: String,
}
