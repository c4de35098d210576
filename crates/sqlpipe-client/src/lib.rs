// Copyright (C) 2025 Sqlpipe Developers
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sqlpipe Client SDK
//!
//! Thin blocking client for the sqlpipe program manager HTTP API. A
//! [`Connection`] verifies server reachability on construction and exposes
//! the program operations: open an existing program, create a new program,
//! and create-or-replace a program. Each operation is one request/response
//! round trip bounded by the configured timeout; there is no caching, no
//! retrying, and no local persistence.
//!
//! # Example
//!
//! ```no_run
//! use sqlpipe_client::{ClientConfig, Connection};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = Connection::connect(ClientConfig::new("http://127.0.0.1:8080"))?;
//!
//! let program = conn.create_program(
//!     "wordcount",
//!     "CREATE TABLE words(word VARCHAR);",
//!     "counts words",
//! )?;
//! println!("created {} at version {}", program.program_id(), program.version());
//!
//! // Re-open later; the server is the source of truth for the version.
//! let program = conn.open_program("wordcount")?;
//! println!("current version: {}", program.version());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod program;
mod transport;
mod types;

pub use client::Connection;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use program::ProgramHandle;
pub use types::{
    ErrorResponse, NewProgramRequest, NewProgramResponse, ProgramDescriptor,
    ProgramStatusResponse,
};
