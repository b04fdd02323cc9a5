//! Single-consumer event channel between a capture session and its UI.
//!
//! The consumer side is an explicit single slot: registering a new consumer
//! atomically detaches the previous one, so a record is never delivered
//! twice and a detached consumer never observes further events.

use std::sync::{Arc, Mutex};

use packetlens_parser::PacketRecord;
use tokio::sync::mpsc;

/// An event delivered to the session's consumer.
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// One parsed packet record, delivered in capture order.
    Packet(PacketRecord),
    /// The helper process exited; carries its exit code verbatim. Terminal.
    Ended(i32),
    /// The helper could not be spawned or failed at runtime. Terminal.
    Failed(String),
}

/// Single-slot subscription channel for one capture session.
///
/// Cloning shares the slot; the supervisor task publishes through one clone
/// while the session hands receivers out through another.
#[derive(Debug, Clone, Default)]
pub struct SessionChannel {
    slot: Arc<Mutex<Option<mpsc::UnboundedSender<CaptureEvent>>>>,
}

impl SessionChannel {
    /// Creates a channel with no consumer registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a consumer, replacing any prior registration.
    ///
    /// The previous consumer's receiver closes cleanly: its sender is
    /// dropped here, so a pending `recv` yields `None` instead of events
    /// meant for the new consumer.
    #[must_use]
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<CaptureEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut slot) = self.slot.lock() {
            if slot.replace(tx).is_some() {
                tracing::debug!("replaced existing session consumer");
            }
        }
        rx
    }

    /// Removes the current consumer registration, if any.
    pub fn unsubscribe(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            let _ = slot.take();
        }
    }

    /// Delivers an event to the registered consumer.
    ///
    /// Events published with no consumer (or after the consumer dropped its
    /// receiver) are discarded; the stream is best-effort at this boundary.
    pub(crate) fn publish(&self, event: CaptureEvent) {
        let Ok(slot) = self.slot.lock() else {
            return;
        };
        if let Some(tx) = slot.as_ref() {
            if tx.send(event).is_err() {
                tracing::debug!("session consumer dropped its receiver");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_reach_the_subscriber_in_order() {
        let channel = SessionChannel::new();
        let mut rx = channel.subscribe();

        channel.publish(CaptureEvent::Packet(PacketRecord::new()));
        channel.publish(CaptureEvent::Ended(0));

        assert!(matches!(rx.recv().await, Some(CaptureEvent::Packet(_))));
        assert!(matches!(rx.recv().await, Some(CaptureEvent::Ended(0))));
    }

    #[tokio::test]
    async fn resubscribing_detaches_the_previous_consumer() {
        let channel = SessionChannel::new();
        let mut old = channel.subscribe();
        let mut new = channel.subscribe();

        channel.publish(CaptureEvent::Ended(0));

        // The old receiver closes without seeing the event.
        assert!(old.recv().await.is_none());
        assert!(matches!(new.recv().await, Some(CaptureEvent::Ended(0))));
    }

    #[tokio::test]
    async fn unsubscribe_closes_the_receiver() {
        let channel = SessionChannel::new();
        let mut rx = channel.subscribe();
        channel.unsubscribe();

        channel.publish(CaptureEvent::Ended(0));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn publish_without_subscriber_is_a_no_op() {
        let channel = SessionChannel::new();
        channel.publish(CaptureEvent::Failed("nobody listening".into()));
    }
}
