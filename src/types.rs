//! Basic type definitions for the relay
//!
//! Provides:
//! - `ConnectionId`: UUID-based unique connection identifier
//! - `ChannelKey`: trait alias for the generic channel key type
//! - `FramePolicy`: per-deployment handling of inbound text frames

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use uuid::Uuid;

/// Unique connection identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe identification of one live session.
/// This is the identity used for equality and removal in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque channel key
///
/// The registry is generic over the key type; a deployment picks one
/// (the shipped binary uses `u32`, string keys work just as well).
/// `FromStr` is what lets the WebSocket handler parse the key out of
/// the request path.
pub trait ChannelKey:
    Eq + Hash + Clone + fmt::Display + fmt::Debug + FromStr + Send + Sync + 'static
{
}

impl<T> ChannelKey for T where
    T: Eq + Hash + Clone + fmt::Display + fmt::Debug + FromStr + Send + Sync + 'static
{
}

/// What to do with text frames received on a relay connection
///
/// `EchoToChannel` rebroadcasts each inbound frame to the channel's members;
/// `SinkOnly` logs inbound frames without rebroadcasting (the
/// notification-forwarding deployment, where only the publish endpoint
/// produces traffic).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FramePolicy {
    /// Rebroadcast received frames to the channel's members
    #[default]
    EchoToChannel,
    /// Receive frames but never rebroadcast them
    SinkOnly,
}

impl fmt::Display for FramePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FramePolicy::EchoToChannel => "echo-to-channel",
            FramePolicy::SinkOnly => "sink-only",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_unique() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_frame_policy_default_is_echo() {
        assert_eq!(FramePolicy::default(), FramePolicy::EchoToChannel);
    }

    #[test]
    fn test_frame_policy_display() {
        assert_eq!(FramePolicy::EchoToChannel.to_string(), "echo-to-channel");
        assert_eq!(FramePolicy::SinkOnly.to_string(), "sink-only");
    }
}
