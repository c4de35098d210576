// Copyright (C) 2025 Sqlpipe Developers
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for sqlpipe-client integration tests.
//!
//! Provides an in-process mock program manager speaking just enough HTTP/1.1
//! for the client: program listing, status lookup by name, and creation with
//! the overwrite flag. State lives in an in-memory map shared with the test.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::json;

#[derive(Debug, Clone)]
struct StoredProgram {
    program_id: String,
    version: i64,
    code: String,
    description: String,
}

#[derive(Default)]
struct ServerState {
    programs: Mutex<HashMap<String, StoredProgram>>,
    next_id: AtomicI64,
    /// Reply 500 to every listing request (probe failure scenario).
    fail_listing: bool,
    /// Stall this long before writing any response.
    response_delay: Option<Duration>,
}

/// In-process mock program manager bound to an ephemeral localhost port.
///
/// The accept loop runs on a background thread for the lifetime of the test
/// process; each connection is handled on its own thread so a stalled
/// response cannot block other requests.
pub struct MockServer {
    base_url: String,
    state: Arc<ServerState>,
}

impl MockServer {
    /// Start a healthy mock server.
    pub fn start() -> Self {
        Self::start_with(ServerState::default())
    }

    /// Start a server whose program listing always fails with HTTP 500.
    pub fn start_failing() -> Self {
        Self::start_with(ServerState {
            fail_listing: true,
            ..ServerState::default()
        })
    }

    /// Start a server that stalls for `delay` before every response.
    pub fn start_with_delay(delay: Duration) -> Self {
        Self::start_with(ServerState {
            response_delay: Some(delay),
            ..ServerState::default()
        })
    }

    fn start_with(state: ServerState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().expect("mock server addr");
        let state = Arc::new(state);

        let accept_state = state.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let conn_state = accept_state.clone();
                thread::spawn(move || handle_connection(stream, conn_state));
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Base URL for client configuration.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of programs currently stored.
    pub fn program_count(&self) -> usize {
        self.state.programs.lock().unwrap().len()
    }

    /// SQL code stored for a program, if present.
    pub fn program_code(&self, name: &str) -> Option<String> {
        self.state
            .programs
            .lock()
            .unwrap()
            .get(name)
            .map(|p| p.code.clone())
    }

    /// Description stored for a program, if present.
    pub fn program_description(&self, name: &str) -> Option<String> {
        self.state
            .programs
            .lock()
            .unwrap()
            .get(name)
            .map(|p| p.description.clone())
    }
}

fn handle_connection(stream: TcpStream, state: Arc<ServerState>) {
    if let Some(request) = read_request(&stream) {
        if let Some(delay) = state.response_delay {
            thread::sleep(delay);
        }
        route(&stream, &request, &state);
    }
}

struct Request {
    method: String,
    path: String,
    query: HashMap<String, String>,
    body: Vec<u8>,
}

fn read_request(stream: &TcpStream) -> Option<Request> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?;

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), parse_query(query)),
        None => (target.to_string(), HashMap::new()),
    };

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((header, value)) = line.split_once(':') {
            if header.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).ok()?;
    }

    Some(Request {
        method,
        path,
        query,
        body,
    })
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(param, value)| (param.to_string(), value.to_string()))
        .collect()
}

fn route(stream: &TcpStream, request: &Request, state: &ServerState) {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/v0/programs") => {
            if state.fail_listing {
                respond(
                    stream,
                    500,
                    "Internal Server Error",
                    &json!({"message": "database unavailable"}).to_string(),
                );
                return;
            }
            let programs = state.programs.lock().unwrap();
            let listing: Vec<_> = programs
                .iter()
                .map(|(name, p)| {
                    json!({
                        "program_id": p.program_id,
                        "name": name,
                        "version": p.version,
                        "description": p.description,
                    })
                })
                .collect();
            respond(stream, 200, "OK", &json!(listing).to_string());
        }

        ("GET", "/v0/program_status") => {
            let name = request.query.get("name").cloned().unwrap_or_default();
            let programs = state.programs.lock().unwrap();
            match programs.get(&name) {
                Some(p) => respond(
                    stream,
                    200,
                    "OK",
                    &json!({
                        "program_id": p.program_id,
                        "name": name,
                        "version": p.version,
                    })
                    .to_string(),
                ),
                None => respond(
                    stream,
                    404,
                    "Not Found",
                    &json!({"message": format!("unknown program \"{}\"", name)}).to_string(),
                ),
            }
        }

        ("POST", "/v0/programs") => {
            let Ok(body) = serde_json::from_slice::<serde_json::Value>(&request.body) else {
                respond(
                    stream,
                    400,
                    "Bad Request",
                    &json!({"message": "malformed request body"}).to_string(),
                );
                return;
            };
            let name = body["name"].as_str().unwrap_or_default().to_string();
            let overwrite = body["overwrite_existing"].as_bool().unwrap_or(false);

            let mut programs = state.programs.lock().unwrap();
            if programs.contains_key(&name) && !overwrite {
                respond(
                    stream,
                    409,
                    "Conflict",
                    &json!({"message": format!("a program named \"{}\" already exists", name)})
                        .to_string(),
                );
                return;
            }

            // Overwrite recreates the resource: fresh identifier, version 1.
            let id = state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let program = StoredProgram {
                program_id: format!("program-{}", id),
                version: 1,
                code: body["code"].as_str().unwrap_or_default().to_string(),
                description: body["description"].as_str().unwrap_or_default().to_string(),
            };
            let response = json!({
                "program_id": program.program_id,
                "version": program.version,
            });
            programs.insert(name, program);
            respond(stream, 200, "OK", &response.to_string());
        }

        _ => respond(
            stream,
            404,
            "Not Found",
            &json!({"message": "no such endpoint"}).to_string(),
        ),
    }
}

fn respond(mut stream: &TcpStream, status: u16, reason: &str, body: &str) {
    let _ = write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.flush();
}
