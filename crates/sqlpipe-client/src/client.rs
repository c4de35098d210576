// Copyright (C) 2025 Sqlpipe Developers
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Connection to a program manager server.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::program::ProgramHandle;
use crate::transport::{HttpTransport, TransportError, TransportResultExt};
use crate::types::{
    NewProgramRequest, NewProgramResponse, ProgramDescriptor, ProgramStatusResponse,
};

/// Connection to a program manager server.
///
/// Construction verifies reachability by listing programs once (fail-fast, no
/// retry); afterwards the connection acts as a factory for
/// [`ProgramHandle`]s. Every method is a single blocking request/response
/// bounded by the timeout configured in [`ClientConfig`].
///
/// The connection holds no mutable state. It is not documented as safe for
/// concurrent reuse; callers that need concurrency should use one connection
/// per caller or synchronize externally.
#[derive(Debug)]
pub struct Connection {
    transport: HttpTransport,
    config: ClientConfig,
}

impl Connection {
    /// Connect to the server at the configured URL.
    ///
    /// Issues a single reachability probe (program listing). If the probe
    /// cannot reach the server the constructor fails with
    /// [`ClientError::Unreachable`]; an error reply fails with
    /// [`ClientError::Server`]; either way no connection value is returned.
    #[instrument(skip(config), fields(url = %config.base_url))]
    pub fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let transport = HttpTransport::new(&config);

        let probe: Result<Vec<ProgramDescriptor>> = transport
            .get_json("/v0/programs", &[])
            .map_err(|err| match err {
                TransportError::Io(detail) => ClientError::Unreachable {
                    context: "Failed to fetch program list from the server".to_string(),
                    detail,
                },
                other => other.into_client_error("Failed to fetch program list from the server"),
            });
        probe?;

        info!("Connected to program manager");

        Ok(Self { transport, config })
    }

    /// Connect using configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::connect(ClientConfig::from_env()?)
    }

    /// Connect to a localhost server with default settings.
    pub fn localhost() -> Result<Self> {
        Self::connect(ClientConfig::localhost())
    }

    /// The configuration this connection was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// List all programs on the server.
    #[instrument(skip(self))]
    pub fn list_programs(&self) -> Result<Vec<ProgramDescriptor>> {
        debug!("Listing programs");

        self.transport
            .get_json("/v0/programs", &[])
            .or_fail("Failed to fetch program list from the server")
    }

    /// Open an existing program with the given name. Program names are unique
    /// on the server, so there is at most one.
    ///
    /// The returned handle carries the identifier and version the server
    /// reported at the moment of the call; it may become stale immediately if
    /// another actor mutates the program afterwards.
    #[instrument(skip(self), fields(name = %name))]
    pub fn open_program(&self, name: &str) -> Result<ProgramHandle> {
        debug!("Opening program");

        let status: ProgramStatusResponse = self
            .transport
            .get_json("/v0/program_status", &[("name", name)])
            .or_fail(&format!("Failed to find a program named \"{}\"", name))?;

        Ok(ProgramHandle::new(
            name,
            status.program_id,
            status.version,
        ))
    }

    /// Create a new program.
    ///
    /// Fails with [`ClientError::AlreadyExists`] if a program with the same
    /// name already exists.
    #[instrument(skip(self, sql_code), fields(name = %name))]
    pub fn create_program(
        &self,
        name: &str,
        sql_code: &str,
        description: &str,
    ) -> Result<ProgramHandle> {
        self.create_program_inner(name, sql_code, description, false)
    }

    /// Create a new program, overwriting an existing program with the same
    /// name, if any.
    ///
    /// If a program with the same name already exists, the server deletes all
    /// pipelines associated with that program and the program itself before
    /// creating the new one. The client issues one request and has no rollback
    /// if the server only partially completes.
    #[instrument(skip(self, sql_code), fields(name = %name))]
    pub fn create_or_replace_program(
        &self,
        name: &str,
        sql_code: &str,
        description: &str,
    ) -> Result<ProgramHandle> {
        self.create_program_inner(name, sql_code, description, true)
    }

    fn create_program_inner(
        &self,
        name: &str,
        sql_code: &str,
        description: &str,
        replace: bool,
    ) -> Result<ProgramHandle> {
        info!(replace, "Creating program");

        let request = NewProgramRequest {
            name: name.to_string(),
            overwrite_existing: replace,
            code: sql_code.to_string(),
            description: description.to_string(),
        };

        let created: NewProgramResponse = self
            .transport
            .post_json("/v0/programs", &request)
            .or_fail("Failed to create a program")?;

        Ok(ProgramHandle::new(
            name,
            created.program_id,
            created.version,
        ))
    }
}
