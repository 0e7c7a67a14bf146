use std::path::PathBuf;

/// Read access to the live editor buffer.
pub trait TextBuffer {
    /// File backing the buffer, if it was loaded from or saved to disk.
    fn location(&self) -> Option<PathBuf>;

    /// Buffer content split into lines without terminators.
    fn current_lines(&self) -> Vec<String>;

    /// Number of lines in the buffer.
    fn line_count(&self) -> usize {
        self.current_lines().len()
    }
}

/// Owned copy of a buffer's state, pushed by hosts that cannot be queried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSnapshot {
    /// Backing file.
    pub location: Option<PathBuf>,
    /// Current lines.
    pub lines: Vec<String>,
}

impl BufferSnapshot {
    /// Snapshot of a buffer backed by `location`.
    #[must_use]
    pub fn new(location: Option<PathBuf>, lines: Vec<String>) -> Self {
        Self { location, lines }
    }

    /// Replace the buffer lines.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }
}

impl TextBuffer for BufferSnapshot {
    fn location(&self) -> Option<PathBuf> {
        self.location.clone()
    }

    fn current_lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }
}
