//! RelayServer actor implementation
//!
//! The central actor owning the connection registry. Uses the Actor
//! pattern with mpsc channels for message passing: register, unregister
//! and broadcast all go through one command loop, so registry access is
//! serialized without locks, and fan-out only ever touches per-member
//! outbound queues (never a peer socket).

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::broadcast::broadcast;
use crate::connection::Connection;
use crate::registry::Registry;
use crate::types::{ChannelKey, ConnectionId};

/// Commands sent from handlers and the publish endpoint to the actor
#[derive(Debug)]
pub enum RelayCommand<C: ChannelKey> {
    /// New connection joined a channel
    Register {
        channel: C,
        connection: Connection,
    },
    /// Connection left a channel (disconnect or explicit close)
    Unregister {
        channel: C,
        connection_id: ConnectionId,
    },
    /// Fan a text payload out to a channel's members
    Broadcast { channel: C, message: String },
    /// Snapshot of registry counters
    Stats {
        reply: oneshot::Sender<RegistryStats>,
    },
}

/// Registry counters reported by `RelayCommand::Stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub channels: usize,
    pub connections: usize,
}

/// The relay actor
///
/// Owns the registry and processes commands from connection handlers and
/// the publish endpoint until all command senders are dropped.
pub struct RelayServer<C: ChannelKey> {
    registry: Registry<C>,
    receiver: mpsc::Receiver<RelayCommand<C>>,
}

impl<C: ChannelKey> RelayServer<C> {
    /// Create a new relay actor with the given command receiver
    pub fn new(receiver: mpsc::Receiver<RelayCommand<C>>) -> Self {
        Self {
            registry: Registry::new(),
            receiver,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        info!("relay server started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("relay server shutting down");
    }

    fn handle_command(&mut self, cmd: RelayCommand<C>) {
        match cmd {
            RelayCommand::Register {
                channel,
                connection,
            } => {
                self.handle_register(channel, connection);
            }
            RelayCommand::Unregister {
                channel,
                connection_id,
            } => {
                self.handle_unregister(channel, connection_id);
            }
            RelayCommand::Broadcast { channel, message } => {
                self.handle_broadcast(channel, message);
            }
            RelayCommand::Stats { reply } => {
                let _ = reply.send(RegistryStats {
                    channels: self.registry.channel_count(),
                    connections: self.registry.connection_count(),
                });
            }
        }
    }

    fn handle_register(&mut self, channel: C, connection: Connection) {
        let id = connection.id();
        if self.registry.register(channel.clone(), connection) {
            info!("connection {} registered on channel {}", id, channel);
        } else {
            warn!(
                "duplicate register of {} on channel {} ignored",
                id, channel
            );
        }
        debug!(
            "channels: {}, connections: {}",
            self.registry.channel_count(),
            self.registry.connection_count()
        );
    }

    fn handle_unregister(&mut self, channel: C, connection_id: ConnectionId) {
        // May be a no-op if a failed send already evicted the member.
        if self.registry.unregister(&channel, connection_id) {
            info!(
                "connection {} unregistered from channel {}",
                connection_id, channel
            );
        }
        debug!(
            "channels: {}, connections: {}",
            self.registry.channel_count(),
            self.registry.connection_count()
        );
    }

    fn handle_broadcast(&mut self, channel: C, message: String) {
        let outcome = broadcast(&mut self.registry, &channel, &message);
        debug!(
            "broadcast on channel {}: {} delivered, {} dropped, {} evicted",
            channel, outcome.delivered, outcome.dropped, outcome.evicted
        );
    }
}
