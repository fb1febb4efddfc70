use crate::model::{Gid, Record};

pub mod add_member;
pub mod create_group;
pub mod list;
pub mod show;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// GID created or found by `groupadd`.
    pub gid: Option<Gid>,
    /// Whether the store file was rewritten.
    pub changed: bool,
    pub groups: Vec<Record>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_gid(mut self, gid: Gid) -> Self {
        self.gid = Some(gid);
        self
    }

    pub fn with_groups(mut self, groups: Vec<Record>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_changed(mut self, changed: bool) -> Self {
        self.changed = changed;
        self
    }
}
