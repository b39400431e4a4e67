use rustc_hash::FxHashMap;
use std::sync::RwLock;

/// Per-player visibility on the web map. The store behind it owns the state
/// and its locking; the command only reads and writes through this trait.
pub trait VisibilityGateway {
    fn get_player_visibility(&self, uuid: u128) -> bool;
    fn set_player_visibility(&self, uuid: u128, visible: bool);
}

/// Keeps visibility in memory. Players that were never changed are visible.
#[derive(Debug, Default)]
pub struct MemoryVisibility {
    visibility: RwLock<FxHashMap<u128, bool>>,
}

impl MemoryVisibility {
    pub fn new() -> Self {
        Default::default()
    }
}

impl VisibilityGateway for MemoryVisibility {
    fn get_player_visibility(&self, uuid: u128) -> bool {
        let map = self.visibility.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.get(&uuid).copied().unwrap_or(true)
    }

    fn set_player_visibility(&self, uuid: u128, visible: bool) {
        let mut map = self.visibility.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.insert(uuid, visible);
    }
}
