// Copyright (C) 2025 Sqlpipe Developers
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Blocking JSON-over-HTTP transport for the program manager API.
//!
//! One request, one response; the agent-level timeout configured at
//! construction applies to every call. Failures are reported as a
//! [`TransportError`] and converted into a [`ClientError`] with a
//! caller-supplied context string via [`TransportResultExt::or_fail`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::ErrorResponse;

/// Result of a single round trip, before any operation context is attached.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Failure of a single round trip.
#[derive(Debug)]
pub enum TransportError {
    /// The request exceeded the configured timeout.
    Timeout(u64),
    /// Server replied with a non-2xx status.
    Status { status: u16, detail: String },
    /// The request never completed (DNS, connect, socket errors).
    Io(String),
    /// 2xx reply whose body could not be decoded.
    Decode(String),
}

impl TransportError {
    /// Attach an operation description and lift into the public error type.
    pub fn into_client_error(self, context: &str) -> ClientError {
        match self {
            TransportError::Timeout(ms) => ClientError::Timeout(ms),
            TransportError::Status {
                status: 404,
                detail,
            } => ClientError::ProgramNotFound {
                context: context.to_string(),
                detail,
            },
            TransportError::Status {
                status: 409,
                detail,
            } => ClientError::AlreadyExists {
                context: context.to_string(),
                detail,
            },
            TransportError::Status { status, detail } => ClientError::Server {
                context: context.to_string(),
                status,
                detail,
            },
            TransportError::Io(detail) => ClientError::Transport {
                context: context.to_string(),
                detail,
            },
            TransportError::Decode(detail) => ClientError::UnexpectedResponse(detail),
        }
    }
}

/// Combinator turning a [`TransportResult`] into a [`crate::error::Result`]
/// with the operation description attached to the server-reported detail.
pub trait TransportResultExt<T> {
    fn or_fail(self, context: &str) -> Result<T>;
}

impl<T> TransportResultExt<T> for TransportResult<T> {
    fn or_fail(self, context: &str) -> Result<T> {
        self.map_err(|err| err.into_client_error(context))
    }
}

/// HTTP transport handle held by a [`Connection`](crate::Connection).
///
/// Cloning shares the underlying agent and its socket pool.
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    timeout_ms: u64,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport from the endpoint configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout)
            .build();
        Self {
            agent,
            base_url: config.base_url.clone(),
            timeout_ms: config.request_timeout.as_millis() as u64,
        }
    }

    /// Issue a GET request and decode the JSON reply.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> TransportResult<T> {
        let url = format!("{}{}", self.base_url, path);
        trace!(%url, "GET");

        let mut request = self.agent.get(&url);
        for (param, value) in query {
            request = request.query(param, value);
        }

        self.decode(request.call())
    }

    /// Issue a POST request with a JSON body and decode the JSON reply.
    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> TransportResult<T> {
        let url = format!("{}{}", self.base_url, path);
        trace!(%url, "POST");

        self.decode(self.agent.post(&url).send_json(body))
    }

    fn decode<T: DeserializeOwned>(
        &self,
        outcome: std::result::Result<ureq::Response, ureq::Error>,
    ) -> TransportResult<T> {
        match outcome {
            Ok(response) => {
                let body = response.into_string().map_err(|e| self.read_error(e))?;
                serde_json::from_str(&body).map_err(|e| {
                    TransportError::Decode(format!("failed to decode response body: {}", e))
                })
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(TransportError::Status {
                    status,
                    detail: error_detail(status, &body),
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                if is_timeout(&transport) {
                    Err(TransportError::Timeout(self.timeout_ms))
                } else {
                    Err(TransportError::Io(transport.to_string()))
                }
            }
        }
    }

    /// Classify an error raised while reading a 2xx response body. A timeout
    /// can still fire here if the server stalls after sending the status line.
    fn read_error(&self, err: std::io::Error) -> TransportError {
        if matches!(
            err.kind(),
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
        ) {
            TransportError::Timeout(self.timeout_ms)
        } else {
            TransportError::Io(err.to_string())
        }
    }
}

/// Extract the server-reported detail from an error body, falling back to the
/// raw text and then to the bare status code.
fn error_detail(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

/// Whether a transport failure was caused by the configured timeout expiring.
fn is_timeout(err: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            return matches!(
                io.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            );
        }
        source = cause.source();
    }
    false
}
