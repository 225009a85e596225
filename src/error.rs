//! Error types for the relay
//!
//! Defines handler-level errors and per-member delivery errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Handler-level errors
///
/// These terminate a single connection handler; none of them is fatal to
/// the process, and one connection's failure never affects other channels
/// or other members of the same channel.
#[derive(Debug, Error)]
pub enum RelayError {
    /// WebSocket protocol or handshake error (fatal for this connection)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// IO error (fatal for this connection)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Relay actor channel closed (server shutting down)
    #[error("relay command channel closed")]
    ChannelSend,

    /// Handshake accepted without a parsed channel key
    #[error("handshake accepted without a channel")]
    MissingChannel,
}

/// Per-member delivery errors
///
/// Returned by `Connection::send` when a message cannot be queued on a
/// member's outbound channel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The member's write task is gone; the connection is presumed dead
    #[error("outbound channel closed")]
    Closed,

    /// The member's outbound buffer is saturated; the message is dropped
    #[error("outbound buffer full")]
    Full,
}
