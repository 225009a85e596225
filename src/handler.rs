//! WebSocket connection handler
//!
//! Handles individual relay connections: WebSocket handshake with channel
//! extraction from the request path, registration, and bidirectional
//! plumbing between the socket and the relay actor.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

use crate::connection::Connection;
use crate::error::RelayError;
use crate::server::RelayCommand;
use crate::types::{ChannelKey, ConnectionId, FramePolicy};

/// Outbound queue depth per connection
const OUTBOUND_BUFFER: usize = 32;

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, parsing the channel key out of the
/// `/ws/{channel}` request path (anything else is refused before the
/// upgrade completes). After registration, every exit path goes through
/// unregister, so a dying connection never lingers in the registry.
pub async fn handle_connection<C: ChannelKey>(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<RelayCommand<C>>,
    policy: FramePolicy,
) -> Result<(), RelayError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("new TCP connection from {}", peer_addr);

    // Handshake; the header callback is where the request path is visible.
    let mut channel: Option<C> = None;
    let ws_stream = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, resp: Response| {
        match parse_channel_path::<C>(req.uri().path()) {
            Some(parsed) => {
                channel = Some(parsed);
                Ok(resp)
            }
            None => {
                let mut refusal = ErrorResponse::new(Some("expected path /ws/{channel}".into()));
                *refusal.status_mut() = StatusCode::NOT_FOUND;
                Err(refusal)
            }
        }
    })
    .await?;
    let channel = channel.ok_or(RelayError::MissingChannel)?;

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let connection_id = ConnectionId::new();
    info!(
        "connection {} from {} joined channel {}",
        connection_id, peer_addr, channel
    );

    // Outbound queue: broadcast fan-out pushes here, the write task drains.
    let (msg_tx, mut msg_rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);

    if cmd_tx
        .send(RelayCommand::Register {
            channel: channel.clone(),
            connection: Connection::new(connection_id, msg_tx),
        })
        .await
        .is_err()
    {
        error!("failed to register {} - relay server closed", connection_id);
        return Err(RelayError::ChannelSend);
    }

    let cmd_tx_read = cmd_tx.clone();
    let read_channel = channel.clone();

    // Read task: inbound frames -> relay commands (or a log line,
    // depending on the frame policy).
    let read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    debug!(
                        "frame from {} on channel {}: {} bytes",
                        connection_id,
                        read_channel,
                        text.len()
                    );
                    match policy {
                        FramePolicy::EchoToChannel => {
                            let cmd = RelayCommand::Broadcast {
                                channel: read_channel.clone(),
                                message: text,
                            };
                            if cmd_tx_read.send(cmd).await.is_err() {
                                debug!("relay server closed, ending read task for {}", connection_id);
                                break;
                            }
                        }
                        FramePolicy::SinkOnly => {
                            info!(
                                "sink-only: frame from {} on channel {} not rebroadcast",
                                connection_id, read_channel
                            );
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("connection {} sent close frame", connection_id);
                    break;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Pong replies are handled by tungstenite itself.
                }
                Ok(_) => {
                    // Binary and other frame types are ignored.
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", connection_id, e);
                    break;
                }
            }
        }
        debug!("read task ended for {}", connection_id);
    });

    // Write task: outbound queue -> WebSocket.
    let write_task = tokio::spawn(async move {
        while let Some(text) = msg_rx.recv().await {
            if ws_sender.send(Message::Text(text)).await.is_err() {
                debug!("WebSocket send failed, ending write task");
                break;
            }
        }
        let _ = ws_sender.close().await;
        debug!("write task ended for connection");
    });

    // Either side finishing means the session is over.
    tokio::select! {
        _ = read_task => {
            debug!("read task completed for {}", connection_id);
        }
        _ = write_task => {
            debug!("write task completed for {}", connection_id);
        }
    }

    let _ = cmd_tx
        .send(RelayCommand::Unregister {
            channel,
            connection_id,
        })
        .await;

    info!("connection {} disconnected", connection_id);

    Ok(())
}

/// Parse a channel key out of a `/ws/{channel}` request path
pub(crate) fn parse_channel_path<C: ChannelKey>(path: &str) -> Option<C> {
    let segment = path.strip_prefix("/ws/")?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_channel() {
        assert_eq!(parse_channel_path::<u32>("/ws/7"), Some(7));
        assert_eq!(parse_channel_path::<u32>("/ws/0"), Some(0));
    }

    #[test]
    fn test_parse_string_channel() {
        assert_eq!(
            parse_channel_path::<String>("/ws/lobby"),
            Some("lobby".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        assert_eq!(parse_channel_path::<u32>("/"), None);
        assert_eq!(parse_channel_path::<u32>("/ws"), None);
        assert_eq!(parse_channel_path::<u32>("/ws/"), None);
        assert_eq!(parse_channel_path::<u32>("/other/7"), None);
        assert_eq!(parse_channel_path::<u32>("/ws/1/2"), None);
        assert_eq!(parse_channel_path::<u32>("/ws/not-a-number"), None);
    }
}
