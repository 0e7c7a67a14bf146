use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::{
    config::TrackerConfig, diff::DiffClassifier, scheduler::DebounceScheduler, AnnotationSink,
    BaselineProvider, BaselineSnapshot, BufferSignal, SignalHost, Subscription, TextBuffer,
};

/// Keeps one buffer's gutter annotations in sync with its committed baseline.
///
/// Everything runs on the host's event loop: the host forwards buffer signals
/// through [`GutterTracker::handle_signal`] and calls [`GutterTracker::poll`]
/// once [`GutterTracker::next_deadline`] has passed. Each run reads the
/// baseline and buffer as they are at that moment, so a superseded run never
/// needs cancelling.
pub struct GutterTracker<P, S, B> {
    provider: P,
    sink: S,
    buffer: B,
    classifier: DiffClassifier,
    scheduler: DebounceScheduler,
    location: Option<PathBuf>,
    baseline: BaselineSnapshot,
    subscriptions: Vec<Subscription>,
}

impl<P, S, B> GutterTracker<P, S, B>
where
    P: BaselineProvider,
    S: AnnotationSink,
    B: TextBuffer,
{
    /// Tracker with the default configuration.
    pub fn new(provider: P, sink: S, buffer: B) -> Self {
        Self::with_config(provider, sink, buffer, &TrackerConfig::default())
    }

    /// Tracker with an explicit configuration.
    pub fn with_config(provider: P, sink: S, buffer: B, config: &TrackerConfig) -> Self {
        Self {
            provider,
            sink,
            buffer,
            classifier: DiffClassifier::with_algorithm(config.algorithm),
            scheduler: DebounceScheduler::new(config.debounce()),
            location: None,
            baseline: BaselineSnapshot::Unknown,
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe to the buffer's signals on `host` and resolve its baseline.
    ///
    /// Subscriptions from a previous activation are released first.
    pub fn activate(&mut self, host: &Arc<dyn SignalHost>) {
        self.subscriptions.clear();
        self.subscriptions = BufferSignal::ALL
            .iter()
            .map(|signal| Subscription::connect(host, *signal))
            .collect();
        tracing::debug!(
            signals = ?self.subscriptions.iter().map(Subscription::signal).collect::<Vec<_>>(),
            "buffer signals subscribed"
        );
        self.on_location_changed();
    }

    /// Swap in a different buffer (the view now shows another document).
    ///
    /// Returns the previous buffer.
    pub fn replace_buffer(&mut self, buffer: B, host: &Arc<dyn SignalHost>) -> B {
        let previous = std::mem::replace(&mut self.buffer, buffer);
        self.activate(host);
        previous
    }

    /// Drop every subscription and pending run, and clear the display.
    pub fn deactivate(&mut self) {
        self.scheduler.cancel();
        self.subscriptions.clear();
        self.sink.clear();
    }

    /// Whether the tracker currently holds signal subscriptions.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Route a host signal.
    pub fn handle_signal(&mut self, signal: BufferSignal, now: Instant) {
        if signal.moves_location() {
            self.on_location_changed();
        } else {
            self.on_buffer_changed(now);
        }
    }

    /// The buffer was mutated. Returns `true` if this armed a new run.
    pub fn on_buffer_changed(&mut self, now: Instant) -> bool {
        if self.location.is_none() || !self.baseline.is_known() {
            return false;
        }

        let armed = self.scheduler.notify(now);
        if armed {
            tracing::trace!(deadline = ?self.scheduler.deadline(), "classification scheduled");
        }
        armed
    }

    /// The buffer was loaded or saved: re-resolve the baseline and run now.
    pub fn on_location_changed(&mut self) {
        self.location = self.buffer.location();
        let Some(location) = self.location.as_deref() else {
            tracing::trace!("buffer has no location; gutter suspended");
            self.baseline = BaselineSnapshot::Unknown;
            self.sink.clear();
            return;
        };

        self.baseline = self.provider.resolve_baseline(location);
        tracing::debug!(
            location = %location.display(),
            known = self.baseline.is_known(),
            "baseline updated"
        );

        self.sink.clear();
        self.refresh();
    }

    /// Run the pending classification if its deadline has passed.
    ///
    /// Returns `true` when a run was due.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.scheduler.fire(now) {
            return false;
        }
        self.refresh();
        true
    }

    /// When the host should call [`GutterTracker::poll`] next.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Classify the current buffer against the current baseline and publish.
    ///
    /// Returns `true` when the sink received a new map.
    pub fn refresh(&mut self) -> bool {
        match &self.baseline {
            BaselineSnapshot::Unknown => false,
            BaselineSnapshot::Empty => {
                let line_count = self.buffer.line_count();
                if self.sink.displayed_len() == line_count {
                    tracing::debug!(line_count, "new file already fully marked; run skipped");
                    return false;
                }
                self.sink
                    .publish(DiffClassifier::classify_new_file(line_count));
                true
            }
            BaselineSnapshot::Lines(baseline) => {
                let current = self.buffer.current_lines();
                match self.classifier.classify(baseline, &current) {
                    Ok(annotations) => {
                        tracing::trace!(annotated = annotations.len(), "classification published");
                        self.sink.publish(annotations);
                        true
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "classification failed; keeping previous markers");
                        false
                    }
                }
            }
        }
    }

    /// Baseline the buffer is compared against.
    #[must_use]
    pub const fn baseline(&self) -> &BaselineSnapshot {
        &self.baseline
    }

    /// Location resolved by the last location change.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Whether a run is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// The baseline provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The sink receiving annotations.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The tracked buffer.
    #[must_use]
    pub const fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Mutable access to the tracked buffer, for hosts that push content.
    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }
}

impl<P, S, B> fmt::Debug for GutterTracker<P, S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GutterTracker")
            .field("location", &self.location)
            .field("algorithm", &self.classifier.algorithm())
            .field("baseline_known", &self.baseline.is_known())
            .field("pending", &self.scheduler.is_pending())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}
