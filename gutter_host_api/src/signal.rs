use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Buffer notifications the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferSignal {
    /// The buffer text was mutated.
    Changed,
    /// The buffer was loaded from its location.
    Loaded,
    /// The buffer was written to its location.
    Saved,
}

impl BufferSignal {
    /// Every signal a tracker subscribes to on activation.
    pub const ALL: [Self; 3] = [Self::Changed, Self::Loaded, Self::Saved];

    /// Whether the signal means the backing file may have changed.
    #[must_use]
    pub const fn moves_location(self) -> bool {
        matches!(self, Self::Loaded | Self::Saved)
    }
}

/// Host-assigned identifier of a connected handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

/// Event system of the host editor.
pub trait SignalHost: Send + Sync {
    /// Start delivering `signal` to the engine.
    fn connect(&self, signal: BufferSignal) -> HandlerId;

    /// Stop delivering the signal registered under `handler`.
    fn disconnect(&self, handler: HandlerId);
}

/// Connected handler that is disconnected exactly once, when released or dropped.
pub struct Subscription {
    host: Arc<dyn SignalHost>,
    signal: BufferSignal,
    handler: Option<HandlerId>,
}

impl Subscription {
    /// Connect `signal` on `host`.
    #[must_use]
    pub fn connect(host: &Arc<dyn SignalHost>, signal: BufferSignal) -> Self {
        let handler = host.connect(signal);
        tracing::trace!(?signal, ?handler, "connected buffer signal");
        Self {
            host: Arc::clone(host),
            signal,
            handler: Some(handler),
        }
    }

    /// Signal this subscription listens to.
    #[must_use]
    pub const fn signal(&self) -> BufferSignal {
        self.signal
    }

    /// Handler id while still connected.
    #[must_use]
    pub const fn handler(&self) -> Option<HandlerId> {
        self.handler
    }

    /// Disconnect now instead of on drop.
    pub fn release(mut self) {
        self.disconnect();
    }

    fn disconnect(&mut self) {
        if let Some(handler) = self.handler.take() {
            self.host.disconnect(handler);
            tracing::trace!(signal = ?self.signal, ?handler, "disconnected buffer signal");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("signal", &self.signal)
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        next: Mutex<u64>,
        disconnected: Mutex<Vec<HandlerId>>,
    }

    impl SignalHost for RecordingHost {
        fn connect(&self, _signal: BufferSignal) -> HandlerId {
            let mut next = self.next.lock().expect("lock");
            *next += 1;
            HandlerId(*next)
        }

        fn disconnect(&self, handler: HandlerId) {
            self.disconnected.lock().expect("lock").push(handler);
        }
    }

    #[test]
    fn drop_disconnects_once() {
        let recording = Arc::new(RecordingHost::default());
        let host: Arc<dyn SignalHost> = recording.clone();

        let subscription = Subscription::connect(&host, BufferSignal::Changed);
        assert_eq!(subscription.signal(), BufferSignal::Changed);
        assert_eq!(subscription.handler(), Some(HandlerId(1)));
        drop(subscription);

        assert_eq!(*recording.disconnected.lock().expect("lock"), vec![HandlerId(1)]);
    }

    #[test]
    fn release_does_not_disconnect_twice() {
        let recording = Arc::new(RecordingHost::default());
        let host: Arc<dyn SignalHost> = recording.clone();

        let subscriptions: Vec<_> = BufferSignal::ALL
            .iter()
            .map(|signal| Subscription::connect(&host, *signal))
            .collect();
        for subscription in subscriptions {
            subscription.release();
        }

        let disconnected = recording.disconnected.lock().expect("lock").clone();
        assert_eq!(disconnected, vec![HandlerId(1), HandlerId(2), HandlerId(3)]);
    }

    #[test]
    fn location_signals() {
        assert!(!BufferSignal::Changed.moves_location());
        assert!(BufferSignal::Loaded.moves_location());
        assert!(BufferSignal::Saved.moves_location());
    }
}
