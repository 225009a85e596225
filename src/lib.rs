//! Channel-Scoped WebSocket Relay Library
//!
//! A real-time message relay built with tokio-tungstenite using the Actor
//! pattern for state management. Clients connect to `/ws/{channel}`; any
//! text frame arriving on a connection (or via the HTTP publish endpoint)
//! is fanned out to every connection currently registered on that channel.
//!
//! # Features
//! - Channel-keyed connection registry with snapshot-based fan-out
//! - Generic channel key type (integer and string deployments)
//! - Per-member send-failure tolerance with deferred eviction
//! - Configurable frame policy (rebroadcast vs. sink-only)
//! - Out-of-band `POST /publish` endpoint
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RelayServer` is the central actor owning the registry
//! - Each connection has a handler task communicating with the actor
//! - No locks needed - all registry access goes through message passing
//! - Fan-out pushes onto per-connection outbound queues, never a socket
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use channel_relay::{handle_connection, FramePolicy, RelayServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(RelayServer::<u32>::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx, FramePolicy::EchoToChannel));
//!     }
//! }
//! ```

pub mod broadcast;
pub mod config;
pub mod connection;
pub mod error;
pub mod handler;
pub mod publish;
pub mod registry;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use broadcast::BroadcastOutcome;
pub use config::Config;
pub use connection::Connection;
pub use error::{RelayError, SendError};
pub use handler::handle_connection;
pub use registry::Registry;
pub use server::{RegistryStats, RelayCommand, RelayServer};
pub use types::{ChannelKey, ConnectionId, FramePolicy};
