// Copyright (C) 2025 Sqlpipe Developers
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the program manager client.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default request timeout applied to every call.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Configuration for a [`Connection`](crate::Connection).
///
/// Immutable once the connection is built; the request timeout applies
/// uniformly to every call, there is no per-call override.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the program manager, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
    /// Overall timeout for each request.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given server URL with default timeouts.
    ///
    /// A trailing slash on the URL is stripped so request paths can be
    /// appended verbatim.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Create a configuration for localhost development.
    pub fn localhost() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLPIPE_URL`: Server base URL (default: "http://127.0.0.1:8080")
    /// - `SQLPIPE_REQUEST_TIMEOUT_MS`: Request timeout in milliseconds (default: 20000)
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("SQLPIPE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

        let request_timeout_ms: u64 = std::env::var("SQLPIPE_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "20000".to_string())
            .parse()
            .map_err(|e| {
                ClientError::Config(format!("invalid SQLPIPE_REQUEST_TIMEOUT_MS: {}", e))
            })?;

        Ok(Self::new(base_url).with_request_timeout(Duration::from_millis(request_timeout_ms)))
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validate the configuration.
    ///
    /// Only the URL scheme is checked here; reachability is verified by the
    /// probe issued in [`Connection::connect`](crate::Connection::connect).
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got \"{}\"",
                self.base_url
            )));
        }
        Ok(())
    }
}
