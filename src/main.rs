//! Channel-Scoped WebSocket Relay - Entry Point
//!
//! Starts the relay actor, the HTTP publish endpoint, and the WebSocket
//! accept loop. This deployment uses integer channel keys.

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use channel_relay::{handle_connection, publish, Config, RelayCommand, RelayServer};

/// Channel key type for this deployment
type Channel = u32;

/// Channel buffer size for relay commands
const COMMAND_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=channel_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("channel_relay=info")),
        )
        .init();

    let config = Config::parse();

    // Create relay actor channel and start
    let (cmd_tx, cmd_rx) = mpsc::channel::<RelayCommand<Channel>>(COMMAND_BUFFER_SIZE);
    tokio::spawn(RelayServer::new(cmd_rx).run());

    info!("relay actor started, frame policy: {}", config.frame_policy);

    // Publish endpoint on its own listener
    let publish_listener = TcpListener::bind(&config.publish_listen).await?;
    info!("publish endpoint listening on {}", config.publish_listen);
    let publish_router = publish::router(cmd_tx.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(publish_listener, publish_router).await {
            error!("publish server error: {}", e);
        }
    });

    // WebSocket listener
    let listener = TcpListener::bind(&config.listen).await?;
    info!("WebSocket relay listening on {}", config.listen);

    // Connection accept loop
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        info!("new connection from {}", addr);
                        let cmd_tx = cmd_tx.clone();
                        let policy = config.frame_policy;

                        // Spawn handler task for each connection
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, cmd_tx, policy).await {
                                error!("connection handler error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("failed to accept connection: {}", e);
                    }
                }
            }
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    // Final registry snapshot for the shutdown log
    let (reply_tx, reply_rx) = oneshot::channel();
    if cmd_tx
        .send(RelayCommand::Stats { reply: reply_tx })
        .await
        .is_ok()
    {
        if let Ok(stats) = reply_rx.await {
            info!(
                "shutting down with {} channels, {} connections",
                stats.channels, stats.connections
            );
        }
    }

    Ok(())
}
