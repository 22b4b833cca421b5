//! Injected capabilities for error reporting and reward delivery.
//!
//! Both are fire-and-forget from the session's point of view; failures in
//! a sink must never propagate back into the timeline.

use loot_reward::{ActorId, Reward};
use parking_lot::Mutex;
use tracing::{error, info};

/// Receives recoverable per-task failure reports.
pub trait ErrorSink: Send + Sync {
    /// Report a recoverable failure. Non-blocking.
    fn report(&self, message: &str);
}

/// Error sink that logs at error level.
#[derive(Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, message: &str) {
        error!("{message}");
    }
}

/// Error sink that records every report, for tests.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages reported so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Whether nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }
}

/// Receives the committed reward when a session stops.
pub trait DeliverySink: Send + Sync {
    /// Hand the reward to the participant. Called exactly once per session.
    fn deliver(&self, actor: ActorId, reward: Reward);
}

/// Delivery sink that logs at info level.
#[derive(Default)]
pub struct LogDelivery;

impl DeliverySink for LogDelivery {
    fn deliver(&self, actor: ActorId, reward: Reward) {
        info!(actor = actor.0, reward = %reward.name, "reward delivered");
    }
}

/// Delivery sink that records every delivery, for tests.
#[derive(Default)]
pub struct RecordingDelivery {
    delivered: Mutex<Vec<(ActorId, Reward)>>,
}

impl RecordingDelivery {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All deliveries recorded so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<(ActorId, Reward)> {
        self.delivered.lock().clone()
    }
}

impl DeliverySink for RecordingDelivery {
    fn deliver(&self, actor: ActorId, reward: Reward) {
        self.delivered.lock().push((actor, reward));
    }
}

#[cfg(test)]
mod tests {
    use loot_reward::ItemKind;

    use super::*;

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());

        sink.report("first");
        sink.report("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_recording_delivery() {
        let sink = RecordingDelivery::new();
        let reward = Reward::new("Rare", ItemKind::Diamond, 5);

        sink.deliver(ActorId(3), reward.clone());
        assert_eq!(sink.delivered(), vec![(ActorId(3), reward)]);
    }
}
