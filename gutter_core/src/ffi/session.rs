use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::{
    config::TrackerConfig, repository::RepositoryBaseline, tracker::GutterTracker,
    BufferSnapshot, LineAnnotation, SharedSink,
};

use super::CoreError;

type Result<T> = std::result::Result<T, CoreError>;
type Tracker = GutterTracker<RepositoryBaseline, SharedSink, BufferSnapshot>;

/// What a session's document is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineStatus {
    /// No document location has been reported.
    Detached,
    /// The file lies in a repository but has no committed version.
    Uncommitted,
    /// The file has committed content.
    Committed,
}

/// Per-document handle exposed to editor hosts via `UniFFI`.
///
/// Hosts push the buffer content with every notification and read the
/// resulting markers back with [`GutterSession::annotations`].
#[derive(Debug)]
pub struct GutterSession {
    tracker: Mutex<Tracker>,
    sink: SharedSink,
}

impl GutterSession {
    /// Session with the given quiescence window in milliseconds.
    #[must_use]
    pub fn new(debounce_ms: u64) -> Self {
        Self::from_config(&TrackerConfig {
            debounce_ms,
            ..TrackerConfig::default()
        })
    }

    fn from_config(config: &TrackerConfig) -> Self {
        let provider = RepositoryBaseline::new(crate::init());
        let sink = SharedSink::new();
        let tracker =
            GutterTracker::with_config(provider, sink.clone(), BufferSnapshot::default(), config);
        Self {
            tracker: Mutex::new(tracker),
            sink,
        }
    }

    /// The document was loaded or saved.
    ///
    /// # Errors
    ///
    /// Returns an error when the session lock is poisoned.
    pub fn location_changed(&self, path: Option<String>, lines: Vec<String>) -> Result<()> {
        let mut tracker = self.tracker()?;
        *tracker.buffer_mut() = BufferSnapshot::new(path.map(PathBuf::from), lines);
        tracker.on_location_changed();
        Ok(())
    }

    /// The document text changed. Returns `true` if a run was scheduled.
    ///
    /// # Errors
    ///
    /// Returns an error when the session lock is poisoned.
    pub fn buffer_changed(&self, lines: Vec<String>) -> Result<bool> {
        let mut tracker = self.tracker()?;
        tracker.buffer_mut().set_lines(lines);
        Ok(tracker.on_buffer_changed(Instant::now()))
    }

    /// Run the scheduled classification if it is due.
    ///
    /// # Errors
    ///
    /// Returns an error when the session lock is poisoned.
    pub fn poll(&self) -> Result<bool> {
        Ok(self.tracker()?.poll(Instant::now()))
    }

    /// Milliseconds until [`GutterSession::poll`] should be called, if a run is pending.
    ///
    /// # Errors
    ///
    /// Returns an error when the session lock is poisoned.
    pub fn next_deadline_ms(&self) -> Result<Option<u64>> {
        let tracker = self.tracker()?;
        let now = Instant::now();
        Ok(tracker.next_deadline().map(|deadline| {
            let remaining = deadline.saturating_duration_since(now);
            u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX)
        }))
    }

    /// Re-resolve the baseline of the current location and report it.
    ///
    /// Unlike the tracker, which silently suspends the gutter, this surfaces
    /// why no baseline is available.
    ///
    /// # Errors
    ///
    /// Returns the repository failure (not a repository, bare repository,
    /// outside the working tree, not a blob, undecodable content, git or I/O
    /// error), or [`CoreError::Internal`] when the session lock is poisoned.
    pub fn baseline_status(&self) -> Result<BaselineStatus> {
        let tracker = self.tracker()?;
        let Some(location) = tracker.location() else {
            return Ok(BaselineStatus::Detached);
        };
        let snapshot = tracker.provider().load(location)?;
        Ok(if snapshot.lines().is_some() {
            BaselineStatus::Committed
        } else {
            BaselineStatus::Uncommitted
        })
    }

    /// Markers currently displayed, ordered by line.
    pub fn annotations(&self) -> Vec<LineAnnotation> {
        self.sink.annotations()
    }

    /// Stop tracking: drop pending work and clear the markers.
    ///
    /// # Errors
    ///
    /// Returns an error when the session lock is poisoned.
    pub fn close(&self) -> Result<()> {
        self.tracker()?.deactivate();
        Ok(())
    }

    fn tracker(&self) -> Result<MutexGuard<'_, Tracker>> {
        self.tracker.lock().map_err(CoreError::from)
    }
}

/// Open a session with the given quiescence window.
#[must_use]
pub fn open_session(debounce_ms: u64) -> Arc<GutterSession> {
    Arc::new(GutterSession::new(debounce_ms))
}

/// Open a session configured from a TOML file.
///
/// # Errors
///
/// Returns an error when the configuration cannot be read or parsed.
pub fn open_session_with_config(config_path: String) -> Result<Arc<GutterSession>> {
    let config = TrackerConfig::load(config_path).map_err(CoreError::from)?;
    Ok(Arc::new(GutterSession::from_config(&config)))
}
