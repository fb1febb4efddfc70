use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::GroupStore;

pub fn run<B: StorageBackend>(store: &GroupStore<B>) -> Result<CmdResult> {
    let groups = store.list_groups()?;
    let mut result = CmdResult::default();
    if groups.is_empty() {
        result.add_message(CmdMessage::info("No groups found."));
    }
    Ok(result.with_groups(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupStoreConfig;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn test_list_in_file_order() {
        let store = GroupStore::new(
            MemBackend::with_contents("zeta:x:1001:\nalpha:x:1000:\n"),
            &GroupStoreConfig::default(),
        );
        let result = run(&store).unwrap();
        let names: Vec<&str> = result.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn test_list_empty_store() {
        let store = GroupStore::new(MemBackend::new(), &GroupStoreConfig::default());
        let result = run(&store).unwrap();
        assert!(result.groups.is_empty());
        assert_eq!(result.messages.len(), 1);
    }
}
