// Copyright (C) 2025 Sqlpipe Developers
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Handle to a server-side program.

use serde::Serialize;

/// Reference to a named program managed by the server.
///
/// A handle is only ever produced by a successful round trip through a
/// [`Connection`](crate::Connection); it is a snapshot of the identifier and
/// version the server reported at that moment. The server remains the source
/// of truth: any later mutation (by this client or another actor) requires a
/// fresh round trip and yields a new handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramHandle {
    name: String,
    program_id: String,
    version: i64,
}

impl ProgramHandle {
    pub(crate) fn new(name: impl Into<String>, program_id: impl Into<String>, version: i64) -> Self {
        Self {
            name: name.into(),
            program_id: program_id.into(),
            version,
        }
    }

    /// Program name, unique on the server.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Server-assigned opaque identifier.
    pub fn program_id(&self) -> &str {
        &self.program_id
    }

    /// Version counter reported by the server when this handle was created.
    /// Monotonically increasing per program on the server side.
    pub fn version(&self) -> i64 {
        self.version
    }
}
