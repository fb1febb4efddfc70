//! # grpstore
//!
//! Privileged helper for a shared flat-file group database. The binary is
//! intentionally thin: `cli::run()` does the work and this file only turns
//! its error into a message and an exit code.
//!
//! The library (`grpstore-core`) owns all invariants: strict parsing, GID
//! allocation, `flock`-serialized load-modify-commit and atomic rename. The
//! CLI never touches the store file directly.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(cli::exit_code(&e));
    }
}
