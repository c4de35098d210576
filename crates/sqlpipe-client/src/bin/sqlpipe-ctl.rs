// Copyright (C) 2025 Sqlpipe Developers
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sqlpipe Control CLI
//!
//! CLI tool for managing programs on a sqlpipe server.
//!
//! Usage:
//!   sqlpipe-ctl <command> [options]
//!
//! Commands:
//!   list                          List programs on the server
//!   open <name>                   Look up a program by name
//!   create --name <name> --sql <path> [--description <text>] [--replace]

use sqlpipe_client::{ClientConfig, Connection};
use std::fs;
use std::process::ExitCode;

fn print_usage() {
    eprintln!(
        r#"Usage: sqlpipe-ctl <command> [options]

Manage programs on a sqlpipe server.

COMMANDS:
    list                            List programs
    open <name>                     Look up a program by name
    create                          Create a program from a SQL file

CREATE OPTIONS:
    --name <name>                   Program name (required)
    --sql <path>                    Path to the SQL source file (required)
    --description <text>            Program description
    --replace                       Overwrite an existing program of the same
                                    name (deletes its dependent pipelines)

ENVIRONMENT:
    SQLPIPE_URL                     Server URL (default: http://127.0.0.1:8080)
    SQLPIPE_REQUEST_TIMEOUT_MS      Request timeout in ms (default: 20000)

EXAMPLES:
    # List all programs
    sqlpipe-ctl list

    # Create a program
    sqlpipe-ctl create --name wordcount --sql ./wordcount.sql

    # Replace it with a new revision
    sqlpipe-ctl create --name wordcount --sql ./wordcount.sql --replace

    # Inspect the current version
    sqlpipe-ctl open wordcount
"#
    );
}

#[derive(Debug)]
enum Command {
    List,
    Open {
        name: String,
    },
    Create {
        name: String,
        sql_path: String,
        description: Option<String>,
        replace: bool,
    },
}

fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = std::env::args().collect();
    parse_args_from_vec(&args)
}

fn parse_args_from_vec(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    match args[1].as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            std::process::exit(0);
        }
        "list" => Ok(Command::List),
        "open" => {
            let name = args.get(2).ok_or("Program name required")?.clone();
            Ok(Command::Open { name })
        }
        "create" => {
            let mut name: Option<String> = None;
            let mut sql_path: Option<String> = None;
            let mut description: Option<String> = None;
            let mut replace = false;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--name" => {
                        i += 1;
                        name = Some(args.get(i).ok_or("--name requires a value")?.clone());
                    }
                    "--sql" => {
                        i += 1;
                        sql_path = Some(args.get(i).ok_or("--sql requires a path")?.clone());
                    }
                    "--description" => {
                        i += 1;
                        description =
                            Some(args.get(i).ok_or("--description requires a value")?.clone());
                    }
                    "--replace" => {
                        replace = true;
                    }
                    arg => return Err(format!("Unknown argument: {}", arg)),
                }
                i += 1;
            }

            Ok(Command::Create {
                name: name.ok_or("--name is required")?,
                sql_path: sql_path.ok_or("--sql is required")?,
                description,
                replace,
            })
        }
        cmd => Err(format!("Unknown command: {}", cmd)),
    }
}

fn main() -> ExitCode {
    let cmd = match parse_args() {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let config = match ClientConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let conn = match Connection::connect(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to connect to server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match execute_command(&conn, cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute_command(conn: &Connection, cmd: Command) -> Result<(), String> {
    match cmd {
        Command::List => {
            let programs = conn.list_programs().map_err(|e| e.to_string())?;
            println!(
                "{}",
                serde_json::to_string_pretty(&programs).map_err(|e| e.to_string())?
            );
        }

        Command::Open { name } => {
            let program = conn.open_program(&name).map_err(|e| e.to_string())?;
            println!(
                "{}",
                serde_json::to_string_pretty(&program).map_err(|e| e.to_string())?
            );
        }

        Command::Create {
            name,
            sql_path,
            description,
            replace,
        } => {
            let sql_code = fs::read_to_string(&sql_path)
                .map_err(|e| format!("Failed to read SQL file {}: {}", sql_path, e))?;
            let description = description.unwrap_or_default();

            let program = if replace {
                conn.create_or_replace_program(&name, &sql_code, &description)
            } else {
                conn.create_program(&name, &sql_code, &description)
            }
            .map_err(|e| e.to_string())?;

            println!(
                "{}",
                serde_json::to_string_pretty(&program).map_err(|e| e.to_string())?
            );
        }
    }

    Ok(())
}
