//! CLI command implementations
//!
//! Every command follows the same strict sequence: load and validate the
//! configuration, load and verify the snapshot, act, persist. The CLI has
//! no authority of its own; every precondition is enforced by the ledger.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{dispatch, record_to_json, OperationKind};
use crate::codec::AccountId;
use crate::ledger::{ExecContext, SwitchLedger};
use crate::observability::{log_ledger_event, Logger, Severity};
use crate::snapshot::{SnapshotErrorCode, SnapshotReader, SnapshotWriter};
use crate::storage::MemorySubstrate;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, write_error, write_json, write_response};

/// Configuration file structure per CONFIG.md
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot file holding the ledger substrate (required)
    pub ledger_path: String,

    /// Minimum log severity: "info", "warn" or "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration per CONFIG.md.
    fn validate(&self) -> CliResult<()> {
        if self.ledger_path.is_empty() {
            return Err(CliError::config_error("ledger_path must not be empty"));
        }

        match self.log_level.as_str() {
            "info" | "warn" | "error" => Ok(()),
            other => Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be 'info', 'warn' or 'error'.",
                other
            ))),
        }
    }

    /// Snapshot path as a `Path`.
    pub fn ledger_path(&self) -> &Path {
        Path::new(&self.ledger_path)
    }

    /// Push the configured log level into the logger.
    fn apply_log_level(&self) {
        let min = match self.log_level.as_str() {
            "warn" => Severity::Warn,
            "error" => Severity::Error,
            _ => Severity::Info,
        };
        Logger::set_min_severity(min);
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args.
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Exec {
            config,
            caller,
            block,
        } => exec(&config, &caller, block),
        Command::Run { config } => serve(&config),
        Command::Show { config, switch_id } => show(&config, switch_id),
    }
}

/// Activate a fresh ledger snapshot
///
/// Refuses to touch an existing snapshot: activation happens exactly once
/// per ledger, reserving identifier 0 by starting the counter at 1.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    config.apply_log_level();
    let ledger_path = config.ledger_path();

    if ledger_path.exists() {
        return Err(CliError::already_initialized());
    }

    let ledger = SwitchLedger::deploy(Box::new(MemorySubstrate::new()))
        .map_err(|e| CliError::snapshot_error(format!("Ledger activation failed: {}", e)))?;
    let records = SnapshotWriter::write(ledger_path, ledger.substrate())?;

    Logger::info(
        "LEDGER_INITIALIZED",
        &[
            ("ledger", ledger_path.display().to_string().as_str()),
            ("records", records.to_string().as_str()),
        ],
    );
    write_response(json!({"initialized": true}))?;

    Ok(())
}

/// Execute one operation read as JSON from stdin.
pub fn exec(config_path: &Path, caller: &str, block: u64) -> CliResult<()> {
    let config = Config::load(config_path)?;
    config.apply_log_level();
    let mut ledger = boot_ledger(&config)?;

    let request = read_request()?;
    let ctx = ExecContext::new(resolve_account(caller), block);
    execute_one(&mut ledger, &config, &ctx, &request)
}

/// Serve operations line-by-line from stdin until EOF.
///
/// Each request object carries its own "caller" and "block" fields; the
/// host peels them off before dispatch. A request with broken host fields
/// gets an error response and the loop continues; an unreadable stream
/// ends the session.
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    config.apply_log_level();
    let mut ledger = boot_ledger(&config)?;

    for request_result in read_requests() {
        match request_result {
            Ok(request) => match host_context(&request) {
                Ok(ctx) => execute_one(&mut ledger, &config, &ctx, &request)?,
                Err(e) => write_error(e.code_str(), e.message())?,
            },
            Err(e) => {
                write_error(e.code_str(), e.message())?;
                break;
            }
        }
    }

    Ok(())
}

/// Print one switch record.
pub fn show(config_path: &Path, switch_id: u64) -> CliResult<()> {
    let config = Config::load(config_path)?;
    config.apply_log_level();
    let ledger = boot_ledger(&config)?;

    match ledger.get_switch(switch_id) {
        Ok(record) => write_response(record_to_json(&record)),
        Err(e) => write_error(e.tag(), &e.to_string()),
    }
}

/// Load the snapshot and wrap it in a ledger.
fn boot_ledger(config: &Config) -> CliResult<SwitchLedger> {
    let substrate = SnapshotReader::read(config.ledger_path()).map_err(|e| {
        if e.code() == SnapshotErrorCode::NotFound {
            CliError::not_initialized()
        } else {
            CliError::from(e)
        }
    })?;

    Logger::info(
        "SNAPSHOT_LOADED",
        &[("records", substrate.len().to_string().as_str())],
    );
    Ok(SwitchLedger::new(Box::new(substrate)))
}

/// Dispatch one request, log the outcome, persist committed writes, and
/// write the response to stdout.
fn execute_one(
    ledger: &mut SwitchLedger,
    config: &Config,
    ctx: &ExecContext,
    request: &Value,
) -> CliResult<()> {
    let outcome = dispatch(ledger, ctx, request);

    if outcome.ok {
        Logger::info(
            "OP_EXECUTED",
            &[
                ("op", outcome.op.as_str()),
                ("caller", ctx.caller.to_hex().as_str()),
                ("block", ctx.block_height.to_string().as_str()),
            ],
        );
        for event in &outcome.events {
            log_ledger_event(event);
        }
        if outcome.kind == Some(OperationKind::Write) {
            let records = SnapshotWriter::write(config.ledger_path(), ledger.substrate())?;
            Logger::info(
                "SNAPSHOT_WRITTEN",
                &[("records", records.to_string().as_str())],
            );
        }
    } else {
        Logger::warn(
            "OP_REJECTED",
            &[
                ("op", outcome.op.as_str()),
                ("code", outcome.error_code.unwrap_or("unknown")),
            ],
        );
    }

    write_json(&outcome.response)?;
    Ok(())
}

/// Accept either a 64-hex-character account or a name to derive one from.
fn resolve_account(s: &str) -> AccountId {
    AccountId::from_hex(s).unwrap_or_else(|| AccountId::from_name(s))
}

/// Peel host fields off a request object.
fn host_context(request: &Value) -> CliResult<ExecContext> {
    let caller = request
        .get("caller")
        .and_then(Value::as_str)
        .ok_or_else(|| CliError::bad_request("request carries no 'caller' field"))?;
    let block = request
        .get("block")
        .and_then(Value::as_u64)
        .ok_or_else(|| CliError::bad_request("request carries no 'block' field"))?;
    Ok(ExecContext::new(resolve_account(caller), block))
}
