//! Connection registry
//!
//! The in-memory mapping from channel key to that channel's live member
//! connections. The registry itself is plain data; all concurrent access
//! is serialized by the `RelayServer` actor that owns it.

use std::collections::HashMap;

use crate::connection::Connection;
use crate::types::{ChannelKey, ConnectionId};

/// Channel membership map
///
/// Invariants:
/// - a connection appears at most once per channel between register and
///   unregister (duplicate register is idempotent);
/// - a channel key is present iff it has at least one member (empty
///   channels are pruned on last-member removal);
/// - `members_of` returns an owned snapshot, stable under later mutation.
#[derive(Debug)]
pub struct Registry<C: ChannelKey> {
    channels: HashMap<C, Vec<Connection>>,
}

impl<C: ChannelKey> Registry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }

    /// Insert a connection into a channel's member collection, creating
    /// the collection if absent
    ///
    /// Returns false if the connection id is already registered on this
    /// channel; the existing entry is kept and no duplicate is added.
    pub fn register(&mut self, channel: C, connection: Connection) -> bool {
        let members = self.channels.entry(channel).or_default();
        if members.iter().any(|m| m.id() == connection.id()) {
            return false;
        }
        members.push(connection);
        true
    }

    /// Remove a connection from a channel's member collection
    ///
    /// Prunes the channel key when its last member leaves. Unknown
    /// channels and unknown members are a no-op returning false, never an
    /// error: disconnects can race with broadcast-driven eviction.
    pub fn unregister(&mut self, channel: &C, id: ConnectionId) -> bool {
        let Some(members) = self.channels.get_mut(channel) else {
            return false;
        };
        let Some(pos) = members.iter().position(|m| m.id() == id) else {
            return false;
        };
        members.remove(pos);
        if members.is_empty() {
            self.channels.remove(channel);
        }
        true
    }

    /// Snapshot of a channel's current members
    ///
    /// Empty for unknown channels. The snapshot is owned, so iterating it
    /// stays valid while the registry is mutated.
    pub fn members_of(&self, channel: &C) -> Vec<Connection> {
        self.channels.get(channel).cloned().unwrap_or_default()
    }

    /// Whether the channel currently has any members
    pub fn contains(&self, channel: &C) -> bool {
        self.channels.contains_key(channel)
    }

    /// Number of channels with at least one member
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of members on one channel
    pub fn member_count(&self, channel: &C) -> usize {
        self.channels.get(channel).map_or(0, Vec::len)
    }

    /// Total number of registered connections across all channels
    pub fn connection_count(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    /// True when no connections are registered at all
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<C: ChannelKey> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn test_connection() -> Connection {
        let (tx, _rx) = mpsc::channel(8);
        Connection::new(ConnectionId::new(), tx)
    }

    #[test]
    fn test_register_makes_member_visible() {
        let mut registry = Registry::new();
        let conn = test_connection();
        let id = conn.id();

        registry.register(1u32, conn);

        assert!(registry.members_of(&1).iter().any(|m| m.id() == id));
        assert_eq!(registry.member_count(&1), 1);
    }

    #[test]
    fn test_unregister_removes_member() {
        let mut registry = Registry::new();
        let conn = test_connection();
        let id = conn.id();
        registry.register(1u32, conn);

        assert!(registry.unregister(&1, id));

        assert!(registry.members_of(&1).is_empty());
    }

    #[test]
    fn test_empty_channels_are_pruned() {
        let mut registry = Registry::new();
        let a = test_connection();
        let b = test_connection();
        let (id_a, id_b) = (a.id(), b.id());
        registry.register(1u32, a);
        registry.register(1u32, b);

        registry.unregister(&1, id_a);
        assert!(registry.contains(&1));

        registry.unregister(&1, id_b);
        assert!(!registry.contains(&1));
        assert_eq!(registry.channel_count(), 0);
    }

    #[test]
    fn test_duplicate_register_is_idempotent() {
        let mut registry = Registry::new();
        let conn = test_connection();

        assert!(registry.register(1u32, conn.clone()));
        assert!(!registry.register(1u32, conn));

        assert_eq!(registry.member_count(&1), 1);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut registry: Registry<u32> = Registry::new();

        assert!(!registry.unregister(&42, ConnectionId::new()));

        let conn = test_connection();
        registry.register(1, conn);
        assert!(!registry.unregister(&1, ConnectionId::new()));
        assert_eq!(registry.member_count(&1), 1);
    }

    #[test]
    fn test_members_of_unknown_channel_is_empty() {
        let registry: Registry<u32> = Registry::new();
        assert!(registry.members_of(&7).is_empty());
        assert_eq!(registry.member_count(&7), 0);
    }

    #[test]
    fn test_snapshot_stable_under_mutation() {
        let mut registry = Registry::new();
        let conn = test_connection();
        let id = conn.id();
        registry.register(1u32, conn);

        let snapshot = registry.members_of(&1);
        registry.unregister(&1, id);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), id);
    }

    #[test]
    fn test_string_channel_keys() {
        let mut registry = Registry::new();
        let conn = test_connection();
        let id = conn.id();

        registry.register("lobby".to_string(), conn);

        assert_eq!(registry.member_count(&"lobby".to_string()), 1);
        registry.unregister(&"lobby".to_string(), id);
        assert!(registry.is_empty());
    }
}
