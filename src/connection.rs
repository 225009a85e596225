//! Connection handle definition
//!
//! Represents one live bidirectional session: an identity plus the sender
//! half of that session's outbound message queue.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::types::ConnectionId;

/// Handle over one live relay connection
///
/// Cloning is cheap (id copy + mpsc sender clone), which is what makes
/// registry snapshots affordable. The handle does not track liveness
/// itself; a dead peer is discovered when `send` reports the outbound
/// channel closed.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    sender: mpsc::Sender<String>,
}

impl Connection {
    /// Create a new connection handle from an identity and the sender half
    /// of the session's outbound queue
    pub fn new(id: ConnectionId, sender: mpsc::Sender<String>) -> Self {
        Self { id, sender }
    }

    /// Identity used for equality and removal
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a text payload for delivery to this connection
    ///
    /// Non-blocking: the payload is handed to the session's write task.
    /// `SendError::Closed` means the write task is gone (peer presumed
    /// dead); `SendError::Full` means the outbound buffer is saturated
    /// and this payload is dropped for this member.
    pub fn send(&self, text: &str) -> Result<(), SendError> {
        self.sender
            .try_send(text.to_owned())
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => SendError::Full,
                mpsc::error::TrySendError::Closed(_) => SendError::Closed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_delivers_to_queue() {
        let (tx, mut rx) = mpsc::channel(8);
        let conn = Connection::new(ConnectionId::new(), tx);

        conn.send("hello").unwrap();

        assert_eq!(rx.try_recv().unwrap(), "hello");
    }

    #[test]
    fn test_send_closed_queue() {
        let (tx, rx) = mpsc::channel(8);
        let conn = Connection::new(ConnectionId::new(), tx);
        drop(rx);

        assert_eq!(conn.send("hello"), Err(SendError::Closed));
    }

    #[test]
    fn test_send_full_queue() {
        let (tx, _rx) = mpsc::channel(1);
        let conn = Connection::new(ConnectionId::new(), tx);

        conn.send("first").unwrap();

        assert_eq!(conn.send("second"), Err(SendError::Full));
    }
}
