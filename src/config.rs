//! Command-line configuration

use clap::Parser;

use crate::types::FramePolicy;

/// Default WebSocket listen address
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Default HTTP publish listen address
pub const DEFAULT_PUBLISH_LISTEN: &str = "127.0.0.1:8081";

/// Relay server configuration
#[derive(Parser, Debug)]
#[command(
    name = "channel-relay",
    about = "Channel-scoped WebSocket relay with an HTTP publish endpoint"
)]
pub struct Config {
    /// WebSocket listen address (connections join via /ws/{channel})
    #[arg(long, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// HTTP listen address for POST /publish
    #[arg(long, default_value = DEFAULT_PUBLISH_LISTEN)]
    pub publish_listen: String,

    /// Handling of text frames received on relay connections
    #[arg(long, value_enum, default_value_t = FramePolicy::EchoToChannel)]
    pub frame_policy: FramePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["channel-relay"]).unwrap();
        assert_eq!(config.listen, DEFAULT_LISTEN);
        assert_eq!(config.publish_listen, DEFAULT_PUBLISH_LISTEN);
        assert_eq!(config.frame_policy, FramePolicy::EchoToChannel);
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "channel-relay",
            "--listen",
            "0.0.0.0:9000",
            "--publish-listen",
            "0.0.0.0:9001",
            "--frame-policy",
            "sink-only",
        ])
        .unwrap();
        assert_eq!(config.listen, "0.0.0.0:9000");
        assert_eq!(config.publish_listen, "0.0.0.0:9001");
        assert_eq!(config.frame_policy, FramePolicy::SinkOnly);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Config::try_parse_from(["channel-relay", "--frame-policy", "mirror"]).is_err());
    }
}
