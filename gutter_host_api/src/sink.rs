use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gutter_api::{AnnotationMap, LineAnnotation};

use crate::AnnotationSink;

/// In-memory sink whose content can be read back from another handle.
#[derive(Debug, Clone, Default)]
pub struct SharedSink {
    inner: Arc<Mutex<AnnotationMap>>,
}

impl SharedSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the currently displayed map.
    #[must_use]
    pub fn snapshot(&self) -> AnnotationMap {
        self.lock().clone()
    }

    /// Currently displayed annotations, one per line.
    #[must_use]
    pub fn annotations(&self) -> Vec<LineAnnotation> {
        self.lock().to_annotations()
    }

    fn lock(&self) -> MutexGuard<'_, AnnotationMap> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AnnotationSink for SharedSink {
    fn publish(&mut self, annotations: AnnotationMap) {
        *self.lock() = annotations;
    }

    fn displayed_len(&self) -> usize {
        self.lock().len()
    }
}
