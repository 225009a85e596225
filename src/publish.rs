//! HTTP publish endpoint
//!
//! Out-of-band entry point for pushing a message to a channel without
//! holding a relay connection. `POST /publish` takes a target channel and
//! an arbitrary JSON payload; the payload is serialized to its JSON text
//! and fanned out like any other frame. The acknowledgment says only that
//! the message was accepted, never that anyone received it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::server::RelayCommand;
use crate::types::ChannelKey;

/// Publish request body
///
/// Shape validation happens in the extractor; a malformed body is
/// rejected with a 4xx before the relay core ever sees it.
#[derive(Debug, Deserialize)]
pub struct PublishRequest<C> {
    pub channel: C,
    pub payload: serde_json::Value,
}

/// Acknowledgment returned for an accepted publish
#[derive(Debug, Serialize)]
pub struct PublishAck {
    pub status: &'static str,
    pub channel: String,
}

/// Build the publish router over a relay command sender
pub fn router<C>(cmd_tx: mpsc::Sender<RelayCommand<C>>) -> Router
where
    C: ChannelKey + DeserializeOwned,
{
    Router::new()
        .route("/publish", post(publish::<C>))
        .with_state(cmd_tx)
}

/// Handle `POST /publish`
async fn publish<C>(
    State(cmd_tx): State<mpsc::Sender<RelayCommand<C>>>,
    Json(request): Json<PublishRequest<C>>,
) -> Result<Json<PublishAck>, StatusCode>
where
    C: ChannelKey + DeserializeOwned,
{
    let message =
        serde_json::to_string(&request.payload).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let channel_label = request.channel.to_string();

    if cmd_tx
        .send(RelayCommand::Broadcast {
            channel: request.channel,
            message,
        })
        .await
        .is_err()
    {
        error!("publish failed - relay server closed");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    debug!("published to channel {}", channel_label);

    Ok(Json(PublishAck {
        status: "accepted",
        channel: channel_label,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_sends_broadcast_command() {
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);

        let ack = publish::<u32>(
            State(cmd_tx),
            Json(PublishRequest {
                channel: 7,
                payload: json!({"event": "update", "id": 3}),
            }),
        )
        .await
        .unwrap();

        assert_eq!(ack.status, "accepted");
        assert_eq!(ack.channel, "7");

        match cmd_rx.recv().await.unwrap() {
            RelayCommand::Broadcast { channel, message } => {
                assert_eq!(channel, 7);
                let value: serde_json::Value = serde_json::from_str(&message).unwrap();
                assert_eq!(value, json!({"event": "update", "id": 3}));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_when_server_gone() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RelayCommand<u32>>(8);
        drop(cmd_rx);

        let result = publish::<u32>(
            State(cmd_tx),
            Json(PublishRequest {
                channel: 1,
                payload: json!("hello"),
            }),
        )
        .await;

        assert!(matches!(result, Err(StatusCode::SERVICE_UNAVAILABLE)));
    }

    #[test]
    fn test_request_shape() {
        let request: PublishRequest<u32> =
            serde_json::from_str(r#"{"channel": 5, "payload": {"k": "v"}}"#).unwrap();
        assert_eq!(request.channel, 5);

        let missing: Result<PublishRequest<u32>, _> =
            serde_json::from_str(r#"{"payload": {"k": "v"}}"#);
        assert!(missing.is_err());
    }
}
