//! Event channel implementation using crossbeam-channel.
//!
//! Provides a thread-safe way to stream intake progress from the core
//! library to any observer (audit log, admin UI, metrics bridge).

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the intake workflow.
///
/// A thin wrapper around crossbeam's Sender that can be cloned and sent
/// across threads.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// Never blocks the workflow: if the receiver is dropped, or a
    /// bounded channel is full because the observer fell behind, the
    /// event is silently discarded. Progress reporting is best-effort.
    pub fn send(&self, event: Event) {
        let _ = self.inner.try_send(event);
    }
}

/// Receives events from the intake workflow
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Returns an iterator over received events
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for event channel endpoints
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }

    /// Create a bounded event channel.
    ///
    /// Events beyond `capacity` are dropped rather than queued, so a
    /// slow observer caps its memory footprint instead of stalling
    /// intake.
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        let (sender, receiver) = bounded(capacity);
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A no-op event sender for when progress reporting isn't needed
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{BatchEvent, IntakeEvent};
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Batch(BatchEvent::Started { total: 4 }));
        });
        handle.join().unwrap();

        match receiver.recv().unwrap() {
            Event::Batch(BatchEvent::Started { total }) => assert_eq!(total, 4),
            other => panic!("wrong event: {:?}", other),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Intake(IntakeEvent::Received {
            locator: "https://cdn.example.com/a.png".to_string(),
        }));
    }

    #[test]
    fn dropped_receiver_discards_events() {
        let (sender, receiver) = EventChannel::new();
        drop(receiver);
        sender.send(Event::Batch(BatchEvent::Started { total: 1 }));
    }

    #[test]
    fn full_bounded_channel_drops_events_without_blocking() {
        let (sender, receiver) = EventChannel::bounded(1);

        sender.send(Event::Batch(BatchEvent::Started { total: 1 }));
        // Capacity is exhausted; this send must return, not block
        sender.send(Event::Batch(BatchEvent::Started { total: 2 }));

        match receiver.recv().unwrap() {
            Event::Batch(BatchEvent::Started { total }) => assert_eq!(total, 1),
            other => panic!("wrong event: {:?}", other),
        }
        assert!(receiver.try_recv().is_none());
    }
}
