//! Interfaces the gutter engine consumes from, and publishes to, its host editor.

mod buffer;
mod signal;
mod sink;

use std::path::Path;

pub use gutter_api::{AnnotationMap, BaselineSnapshot};

pub use buffer::{BufferSnapshot, TextBuffer};
pub use signal::{BufferSignal, HandlerId, SignalHost, Subscription};
pub use sink::SharedSink;

/// Supplies the committed content of a file.
pub trait BaselineProvider {
    /// Resolve the baseline for the file at `location`.
    ///
    /// Implementors must report [`BaselineSnapshot::Unknown`] when the file is
    /// not tracked or retrieval fails, and [`BaselineSnapshot::Empty`] when the
    /// file is tracked but was never committed.
    fn resolve_baseline(&self, location: &Path) -> BaselineSnapshot;
}

impl<F> BaselineProvider for F
where
    F: Fn(&Path) -> BaselineSnapshot,
{
    fn resolve_baseline(&self, location: &Path) -> BaselineSnapshot {
        self(location)
    }
}

/// Rendering surface that displays the annotations.
pub trait AnnotationSink {
    /// Replace everything currently displayed with `annotations`.
    fn publish(&mut self, annotations: AnnotationMap);

    /// Remove every displayed annotation.
    fn clear(&mut self) {
        self.publish(AnnotationMap::new());
    }

    /// Number of lines currently carrying a marker.
    fn displayed_len(&self) -> usize;
}
