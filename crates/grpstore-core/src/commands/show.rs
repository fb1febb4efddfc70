use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::GroupStore;

pub fn run<B: StorageBackend>(store: &GroupStore<B>, name: &str) -> Result<CmdResult> {
    let record = store.get_group(name)?;
    Ok(CmdResult::default()
        .with_gid(record.gid)
        .with_groups(vec![record]))
}
