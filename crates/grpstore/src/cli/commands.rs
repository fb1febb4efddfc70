//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Decides process exit codes
//! - Handles argument parsing and logging setup
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: clap, see `setup.rs`
//! 2. **Configuration**: fixed system config, with overrides only for
//!    unprivileged runs
//! 3. **Dispatch**: route the subcommand to the API facade
//! 4. **Output**: plain data on stdout, status messages on stderr
//! 5. **Error Handling**: one exit code per error kind

use super::render::{render_json, render_message, render_text};
use super::setup::{Cli, Commands, OutputMode};
use clap::Parser;
use grpstore_core::api::{CmdResult, GroupApi};
use grpstore_core::config::{GroupStoreConfig, SYSTEM_CONFIG_PATH};
use grpstore_core::error::{GroupStoreError, Result};
use std::path::PathBuf;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolve_config(&cli, privileges_elevated())?;
    log::debug!("using store {}", config.store_path.display());

    let api = GroupApi::open(&config)?;
    let result = dispatch(&api, &cli.command)?;
    print_result(&cli, &result)
}

fn dispatch<B: grpstore_core::store::backend::StorageBackend>(
    api: &GroupApi<B>,
    command: &Commands,
) -> Result<CmdResult> {
    match command {
        Commands::Groupadd { name, exist_ok } => api.create_group(name, *exist_ok),
        Commands::Usermod { group, user } => api.add_member(group, user),
        Commands::Show { group } => api.show_group(group),
        Commands::List => api.list_groups(),
    }
}

fn print_result(cli: &Cli, result: &CmdResult) -> Result<()> {
    match cli.output {
        OutputMode::Json => {
            let json = render_json(result).map_err(std::io::Error::from)?;
            print!("{}", json);
        }
        OutputMode::Text => {
            for message in &result.messages {
                eprintln!("{}", render_message(message));
            }
            print!("{}", render_text(&cli.command, result));
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Load the configuration for this run.
///
/// The store path and config file may only be redirected when the process
/// runs with the caller's own identity. Under setuid/setgid that would let the
/// caller point a privileged writer at any file.
pub fn resolve_config(cli: &Cli, elevated: bool) -> Result<GroupStoreConfig> {
    if elevated && (cli.store.is_some() || cli.config.is_some()) {
        return Err(GroupStoreError::Config(
            "--store, --config, GRPSTORE_STORE and GRPSTORE_CONFIG are refused when running with elevated privileges"
                .to_string(),
        ));
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(SYSTEM_CONFIG_PATH));
    let mut config = GroupStoreConfig::load(&config_path)?;

    if let Some(store) = &cli.store {
        config = config.with_store_path(store);
    }
    config.validate()?;
    Ok(config)
}

#[cfg(unix)]
fn privileges_elevated() -> bool {
    // SAFETY: these calls only read the process credentials and cannot fail.
    unsafe { libc::getuid() != libc::geteuid() || libc::getgid() != libc::getegid() }
}

#[cfg(not(unix))]
fn privileges_elevated() -> bool {
    false
}

pub fn exit_code(err: &GroupStoreError) -> i32 {
    match err {
        GroupStoreError::InvalidName { .. } => 3,
        GroupStoreError::GidExhausted { .. } => 4,
        GroupStoreError::GroupNotFound(_) => 6,
        GroupStoreError::DuplicateGroup(_) => 9,
        GroupStoreError::Io(_) => 10,
        GroupStoreError::StoreCorrupt { .. } => 11,
        GroupStoreError::Config(_) => 12,
    }
}
