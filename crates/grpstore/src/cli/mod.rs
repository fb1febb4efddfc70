//! # CLI Behavior
//!
//! This is **one possible UI client** for grpstore, not the application
//! itself. It is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ## Commands
//!
//! - `grpstore groupadd <name> [-f]`: create a group, print its GID.
//!   `-f/--exist-ok` reports an existing group as success.
//! - `grpstore usermod <group> <user>`: add a member. Adding an existing
//!   member succeeds without touching the file.
//! - `grpstore show <group>` / `grpstore list`: print records.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success (including idempotent no-ops) |
//! | 2 | usage error |
//! | 3 | invalid group or user name |
//! | 4 | no free GID left |
//! | 6 | group not found |
//! | 9 | group already exists |
//! | 10 | I/O error on the store or its lock |
//! | 11 | store file is corrupt |
//! | 12 | configuration error |
//!
//! ## Module Structure
//!
//! - `commands`: context setup, dispatch, exit codes
//! - `render`: stdout data and stderr messages
//! - `setup`: argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::{exit_code, run};
