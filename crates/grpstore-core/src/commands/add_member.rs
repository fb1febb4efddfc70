use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::GroupStore;

pub fn run<B: StorageBackend>(store: &GroupStore<B>, group: &str, user: &str) -> Result<CmdResult> {
    let added = store.add_member(group, user)?;

    let mut result = CmdResult::default().with_changed(added);
    if added {
        result.add_message(CmdMessage::success(format!(
            "Added {} to group {}",
            user, group
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "{} is already a member of {}",
            user, group
        )));
    }
    Ok(result)
}
