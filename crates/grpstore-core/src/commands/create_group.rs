use crate::commands::{CmdMessage, CmdResult};
use crate::error::{GroupStoreError, Result};
use crate::store::backend::StorageBackend;
use crate::store::GroupStore;

/// Create `name`. With `exist_ok`, an existing group is reported as success
/// together with its current GID, which is what idempotent provisioning
/// scripts want.
pub fn run<B: StorageBackend>(
    store: &GroupStore<B>,
    name: &str,
    exist_ok: bool,
) -> Result<CmdResult> {
    match store.create_group_record(name) {
        Ok(record) => {
            let gid = record.gid;
            let mut result = CmdResult::default()
                .with_gid(gid)
                .with_changed(true)
                .with_groups(vec![record]);
            result.add_message(CmdMessage::success(format!(
                "Group created: {} (gid {})",
                name, gid
            )));
            Ok(result)
        }
        Err(GroupStoreError::DuplicateGroup(_)) if exist_ok => {
            let record = store.get_group(name)?;
            let mut result = CmdResult::default().with_gid(record.gid);
            result.add_message(CmdMessage::info(format!(
                "Group already exists: {} (gid {})",
                name, record.gid
            )));
            Ok(result.with_groups(vec![record]))
        }
        Err(e) => Err(e),
    }
}
