//! Registry of mounted players

use crate::handle::{PlayerHandle, PlayerId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug)]
struct Entry {
    handle: PlayerHandle,
    /// Bumped each time the id is mounted after being absent
    generation: u64,
}

#[derive(Debug, Default)]
struct Players {
    entries: HashMap<PlayerId, Entry>,
    next_generation: u64,
}

/// Mounted players keyed by id.
///
/// Clones share the same map, so views that mount players and the
/// coordinator that silences them see one registry.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Arc<RwLock<Players>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mounted player.
    ///
    /// Registering an id again replaces its control and keeps its generation.
    pub fn register(&self, handle: PlayerHandle) {
        debug!(id = %handle.id, kind = %handle.kind(), "Player registered");
        let mut players = self.write();
        if let Some(entry) = players.entries.get_mut(&handle.id) {
            entry.handle = handle;
            return;
        }
        players.next_generation += 1;
        let generation = players.next_generation;
        players
            .entries
            .insert(handle.id.clone(), Entry { handle, generation });
    }

    /// Deregister an unmounted player. Returns whether it was registered.
    pub fn deregister(&self, id: &PlayerId) -> bool {
        let removed = self.write().entries.remove(id).is_some();
        if removed {
            debug!(id = %id, "Player deregistered");
        }
        removed
    }

    pub fn get(&self, id: &PlayerId) -> Option<PlayerHandle> {
        self.read().entries.get(id).map(|entry| entry.handle.clone())
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.read().entries.contains_key(id)
    }

    /// Generation of the current registration of `id`.
    ///
    /// An id removed and mounted again gets a new generation.
    pub(crate) fn generation(&self, id: &PlayerId) -> Option<u64> {
        self.read().entries.get(id).map(|entry| entry.generation)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self.read().entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of every handle except `id`.
    pub(crate) fn others(&self, id: &PlayerId) -> Vec<PlayerHandle> {
        let mut others: Vec<PlayerHandle> = self
            .read()
            .entries
            .values()
            .filter(|entry| &entry.handle.id != id)
            .map(|entry| entry.handle.clone())
            .collect();
        others.sort_by(|a, b| a.id.cmp(&b.id));
        others
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Players> {
        self.players.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Players> {
        self.players.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{EmbedHandle, EmbedProtocol, MockNativeAudioControl, PlayerKind};
    use tokio::sync::mpsc;

    fn embed(id: &str) -> PlayerHandle {
        let (tx, _rx) = mpsc::unbounded_channel::<String>();
        PlayerHandle::embed(id, EmbedHandle::new(tx, EmbedProtocol::YouTubeIframe))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = PlayerRegistry::new();
        assert!(registry.is_empty());

        registry.register(embed("b"));
        registry.register(PlayerHandle::native("a", MockNativeAudioControl::new()));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&PlayerId::from("a")));
        assert_eq!(registry.ids(), vec![PlayerId::from("a"), PlayerId::from("b")]);
        assert_eq!(
            registry.get(&PlayerId::from("b")).map(|h| h.kind()),
            Some(PlayerKind::MessagePassingEmbed)
        );
    }

    #[test]
    fn test_register_same_id_replaces_control() {
        let registry = PlayerRegistry::new();
        registry.register(embed("p1"));
        registry.register(PlayerHandle::native("p1", MockNativeAudioControl::new()));

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(&PlayerId::from("p1")).map(|h| h.kind()),
            Some(PlayerKind::NativeAudio)
        );
    }

    #[test]
    fn test_deregister_is_idempotent() {
        let registry = PlayerRegistry::new();
        registry.register(embed("p1"));

        assert!(registry.deregister(&PlayerId::from("p1")));
        assert!(!registry.deregister(&PlayerId::from("p1")));
        assert!(registry.get(&PlayerId::from("p1")).is_none());
    }

    #[test]
    fn test_remount_gets_new_generation() {
        let registry = PlayerRegistry::new();
        let id = PlayerId::from("p1");
        registry.register(embed("p1"));
        let first = registry.generation(&id).unwrap();

        registry.register(embed("p1"));
        assert_eq!(registry.generation(&id), Some(first));

        registry.deregister(&id);
        assert_eq!(registry.generation(&id), None);

        registry.register(embed("p1"));
        assert!(registry.generation(&id).unwrap() > first);
    }

    #[test]
    fn test_clones_share_players() {
        let registry = PlayerRegistry::new();
        let view = registry.clone();

        view.register(embed("p1"));
        assert!(registry.contains(&PlayerId::from("p1")));
    }

    #[test]
    fn test_others_excludes_id() {
        let registry = PlayerRegistry::new();
        registry.register(embed("a"));
        registry.register(embed("b"));
        registry.register(embed("c"));

        let others: Vec<PlayerId> = registry
            .others(&PlayerId::from("b"))
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(others, vec![PlayerId::from("a"), PlayerId::from("c")]);
    }
}
