//! # grpstore Architecture
//!
//! grpstore maintains a shared, flat-file group database (the
//! `/var/lib/extrausers/group` format) on behalf of unprivileged callers.
//! Two mutations are supported: creating a group and adding a member to an
//! existing group. Each invocation is its own short-lived process, so every
//! guarantee below holds across processes, not just threads.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (crates/grpstore)                                      │
//! │  - clap parsing, logging setup, rendering, exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Turns store outcomes into CmdResult + messages           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - GroupStore: lock → load → compute → commit               │
//! │  - FsBackend (flock + atomic rename), MemBackend (tests)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! After every committed mutation:
//! - group names are unique, GIDs are unique, and no member is listed twice
//!   in one group;
//! - parsing the file and serializing it again reproduces it byte for byte;
//! - lines that the mutation did not target are unchanged.
//!
//! A mutation that fails for any reason leaves the file exactly as it was.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per operation
//! - [`store`]: GroupStore and its storage backends
//! - [`model`]: `Record`, `GroupFile`, parsing and serialization
//! - [`gid`]: GID allocation policy
//! - [`validation`]: Group and member name rules
//! - [`config`]: Configuration file
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod gid;
pub mod model;
pub mod store;
pub mod validation;
