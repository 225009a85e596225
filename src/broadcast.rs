//! Channel fan-out
//!
//! Delivers one text payload to every current member of a channel.
//! The member list is snapshotted first; sends never mutate the registry
//! mid-iteration, and members whose outbound channel turns out to be
//! closed are evicted after the loop.

use tracing::{debug, warn};

use crate::error::SendError;
use crate::registry::Registry;
use crate::types::ChannelKey;

/// Result of one fan-out pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Members whose outbound queue accepted the payload
    pub delivered: usize,
    /// Members whose outbound buffer was full (payload dropped, member kept)
    pub dropped: usize,
    /// Members found dead (outbound closed) and unregistered
    pub evicted: usize,
}

/// Fan a payload out to every member of `channel`
///
/// Unknown or empty channels are a no-op, not an error. Per-member send
/// failure never aborts the fan-out: a closed member is skipped,
/// remembered, and unregistered once iteration is done.
pub fn broadcast<C: ChannelKey>(
    registry: &mut Registry<C>,
    channel: &C,
    message: &str,
) -> BroadcastOutcome {
    let members = registry.members_of(channel);
    let mut outcome = BroadcastOutcome::default();
    let mut dead = Vec::new();

    for member in &members {
        match member.send(message) {
            Ok(()) => outcome.delivered += 1,
            Err(SendError::Full) => {
                warn!(
                    "outbound buffer full for {} on channel {}, frame dropped",
                    member.id(),
                    channel
                );
                outcome.dropped += 1;
            }
            Err(SendError::Closed) => dead.push(member.id()),
        }
    }

    for id in dead {
        if registry.unregister(channel, id) {
            debug!("evicted dead connection {} from channel {}", id, channel);
            outcome.evicted += 1;
        }
    }

    outcome
}
