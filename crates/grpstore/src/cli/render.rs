//! Output formatting.
//!
//! Data goes to stdout and stays plain so wrapper scripts can capture it:
//! `groupadd` prints the bare GID, `show`/`list` print record lines in the
//! database format. Human-facing status messages go to stderr, styled when
//! stderr is a terminal.

use super::setup::Commands;
use console::style;
use grpstore_core::api::{CmdMessage, CmdResult, MessageLevel};
use grpstore_core::model::{Gid, Record};
use serde::Serialize;

pub fn render_text(command: &Commands, result: &CmdResult) -> String {
    match command {
        Commands::Groupadd { .. } => result
            .gid
            .map(|gid| format!("{}\n", gid))
            .unwrap_or_default(),
        Commands::Usermod { .. } => String::new(),
        Commands::Show { .. } | Commands::List => render_records(&result.groups),
    }
}

fn render_records(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_line());
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonMessage<'a> {
    level: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    gid: Option<Gid>,
    changed: bool,
    groups: &'a [Record],
    messages: Vec<JsonMessage<'a>>,
}

pub fn render_json(result: &CmdResult) -> serde_json::Result<String> {
    let output = JsonOutput {
        gid: result.gid,
        changed: result.changed,
        groups: &result.groups,
        messages: result
            .messages
            .iter()
            .map(|m| JsonMessage {
                level: level_name(m.level),
                content: &m.content,
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&output)?;
    json.push('\n');
    Ok(json)
}

fn level_name(level: MessageLevel) -> &'static str {
    match level {
        MessageLevel::Info => "info",
        MessageLevel::Success => "success",
    }
}

pub fn render_message(message: &CmdMessage) -> String {
    match message.level {
        MessageLevel::Info => style(&message.content).for_stderr().dim().to_string(),
        MessageLevel::Success => style(&message.content).for_stderr().green().to_string(),
    }
}
