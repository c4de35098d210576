// Copyright (C) 2025 Sqlpipe Developers
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for sqlpipe-client.

use thiserror::Error;

/// Result type using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the client SDK.
///
/// Every failure is surfaced to the caller immediately; the SDK performs no
/// retries and no local recovery. Variants produced by server round trips carry
/// the operation description (`context`) together with the server-reported
/// detail.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The initial reachability probe failed; no connection was established.
    #[error("server unreachable: {context}: {detail}")]
    Unreachable { context: String, detail: String },

    /// Request exceeded the configured timeout.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// No program with the requested name exists on the server.
    #[error("{context}: {detail}")]
    ProgramNotFound { context: String, detail: String },

    /// A program with the requested name already exists and overwrite was
    /// disabled.
    #[error("{context}: {detail}")]
    AlreadyExists { context: String, detail: String },

    /// Server returned an error response.
    #[error("{context}: server error [{status}]: {detail}")]
    Server {
        context: String,
        status: u16,
        detail: String,
    },

    /// Transport-level failure after the connection was established.
    #[error("{context}: transport error: {detail}")]
    Transport { context: String, detail: String },

    /// Server replied with a payload the client could not decode.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Transport {
            context: "i/o error".to_string(),
            detail: err.to_string(),
        }
    }
}
