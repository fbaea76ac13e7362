//! Output → controller notifications
//!
//! The audio output runs on its own schedule (decoder threads, browser
//! callbacks, a simulated clock). It never mutates player state directly;
//! it pushes [`PlayerEvent`]s into a bounded channel and the controller
//! applies them when it pumps.
//!
//! ```text
//! AudioOutput ──EventSender::notify()──► flume (bounded) ──► PlayerController::pump_events()
//! ```
//!
//! Every event names the track it belongs to, so notifications from a load
//! that was superseded by a later `play` are recognised and dropped.

use flume::{Receiver, Sender, TrySendError};

/// Notification from the audio output
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Periodic position report
    TimeUpdate { track_id: String, position: f64 },
    /// Duration became known (metadata loaded)
    DurationChange { track_id: String, duration: f64 },
    /// Reached the end of the track
    Ended { track_id: String },
    /// Load or decode failure
    Error { track_id: String, message: String },
}

impl PlayerEvent {
    pub fn track_id(&self) -> &str {
        match self {
            Self::TimeUpdate { track_id, .. }
            | Self::DurationChange { track_id, .. }
            | Self::Ended { track_id }
            | Self::Error { track_id, .. } => track_id,
        }
    }
}

/// Sending half given to the audio output
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<PlayerEvent>,
}

impl EventSender {
    /// Push an event without blocking
    ///
    /// Returns false when the event was dropped (channel full or the
    /// controller is gone). Time updates are periodic, so a dropped one is
    /// superseded by the next.
    pub fn notify(&self, event: PlayerEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::warn!("Player: event channel full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Create the bounded event channel
pub(crate) fn event_channel(capacity: usize) -> (EventSender, Receiver<PlayerEvent>) {
    let (tx, rx) = flume::bounded(capacity.max(1));
    (EventSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_channel_drops_event() {
        let (sender, rx) = event_channel(1);
        assert!(sender.notify(PlayerEvent::Ended { track_id: "a".into() }));
        assert!(!sender.notify(PlayerEvent::Ended { track_id: "b".into() }));
        assert_eq!(rx.try_recv().unwrap().track_id(), "a");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_receiver() {
        let (sender, rx) = event_channel(4);
        drop(rx);
        assert!(!sender.notify(PlayerEvent::TimeUpdate {
            track_id: "a".into(),
            position: 1.0,
        }));
    }
}
