//! Classification of buffer lines against their committed baseline.
//!
//! libgit2 computes a zero-context line diff between the two sequences; the
//! resulting hunks are then walked record by record and folded into an
//! [`AnnotationMap`] keyed by current-buffer line number.

use git2::{DiffOptions, Patch};

use crate::{
    config::DiffAlgorithm, AnnotationMap, ChangeKind, ContextId, LineContext, Result,
};

/// One record of a zero-context line diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffRecord {
    /// Start of a block of differences, anchored at a 1-based current line.
    Hunk {
        /// Current-buffer line the block's markers start at.
        new_start: u32,
    },
    /// Baseline line missing from the buffer at this position.
    Removal(String),
    /// Buffer line missing from the baseline at this position.
    Insertion(String),
}

/// Maps a (baseline, current) pair of line sequences to gutter annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffClassifier {
    algorithm: DiffAlgorithm,
}

impl DiffClassifier {
    /// Classifier using libgit2's default diff.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier using the given diff algorithm.
    #[must_use]
    pub const fn with_algorithm(algorithm: DiffAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Algorithm used to compute hunks.
    #[must_use]
    pub const fn algorithm(&self) -> DiffAlgorithm {
        self.algorithm
    }

    /// Annotate `current` against `baseline`.
    ///
    /// Lines must not contain `\n`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Git`] if libgit2 fails to produce the patch.
    pub fn classify(&self, baseline: &[String], current: &[String]) -> Result<AnnotationMap> {
        let records = self.records(baseline, current)?;
        Ok(Self::annotate(records))
    }

    /// Annotate a buffer whose file has never been committed: every line is added.
    #[must_use]
    pub fn classify_new_file(line_count: usize) -> AnnotationMap {
        let mut map = AnnotationMap::new();
        let id = map.insert_context(LineContext::with_kind(ChangeKind::Added));
        let last = u32::try_from(line_count).unwrap_or(u32::MAX);
        for line in 1..=last {
            map.assign(line, id);
        }
        map
    }

    /// Flatten libgit2's zero-context patch into diff records.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Git`] if libgit2 fails to produce the patch.
    pub fn records(&self, baseline: &[String], current: &[String]) -> Result<Vec<DiffRecord>> {
        let old = join_lines(baseline);
        let new = join_lines(current);
        let mut options = self.options();
        let patch = Patch::from_buffers(
            old.as_bytes(),
            None,
            new.as_bytes(),
            None,
            Some(&mut options),
        )?;

        let current_len = u32::try_from(current.len()).unwrap_or(u32::MAX);
        let mut records = Vec::new();
        for hunk_idx in 0..patch.num_hunks() {
            let (hunk, line_count) = patch.hunk(hunk_idx)?;
            records.push(DiffRecord::Hunk {
                new_start: hunk_anchor(hunk.new_start(), hunk.new_lines(), current_len),
            });

            for line_idx in 0..line_count {
                let line = patch.line_in_hunk(hunk_idx, line_idx)?;
                match line.origin() {
                    '-' => records.push(DiffRecord::Removal(line_text(line.content()))),
                    '+' => records.push(DiffRecord::Insertion(line_text(line.content()))),
                    _ => {}
                }
            }
        }

        Ok(records)
    }

    /// Fold diff records into an annotation map.
    ///
    /// Every hunk gets one context shared by all the lines it marks. Removals
    /// mark the hunk pointer without advancing it; insertions advance it. A
    /// removal followed by an insertion upgrades the context to
    /// [`ChangeKind::Modified`] in place, so the line already marked by the
    /// removal is not written again.
    pub fn annotate<I>(records: I) -> AnnotationMap
    where
        I: IntoIterator<Item = DiffRecord>,
    {
        let mut map = AnnotationMap::new();
        let mut active: Option<ContextId> = None;
        let mut pointer = 0_u32;

        for record in records {
            match record {
                DiffRecord::Hunk { new_start } => {
                    active = Some(map.insert_context(LineContext::new()));
                    pointer = new_start;
                }
                DiffRecord::Removal(text) => {
                    let Some(id) = active else {
                        tracing::debug!("removal record outside of a hunk ignored");
                        continue;
                    };
                    if let Some(context) = map.context_mut(id) {
                        if !context.kind.is_change() {
                            context.kind = ChangeKind::Removed;
                        }
                        context.removed_lines.push(text);
                    }
                    map.assign(pointer, id);
                }
                DiffRecord::Insertion(_) => {
                    let Some(id) = active else {
                        tracing::debug!("insertion record outside of a hunk ignored");
                        continue;
                    };
                    match kind_of(&map, id) {
                        ChangeKind::None => {
                            set_kind(&mut map, id, ChangeKind::Added);
                            map.assign(pointer, id);
                        }
                        ChangeKind::Removed => set_kind(&mut map, id, ChangeKind::Modified),
                        ChangeKind::Added | ChangeKind::Modified => {
                            map.assign(pointer, id);
                        }
                    }
                    pointer = pointer.saturating_add(1);
                }
            }
        }

        // Everything was deleted: the hunk sits before line 1.
        if map.contains_line(0) {
            map.shift_lines_down();
        }

        map
    }

    fn options(&self) -> DiffOptions {
        let mut options = DiffOptions::new();
        options.context_lines(0).interhunk_lines(0).force_text(true);
        match self.algorithm {
            DiffAlgorithm::Myers => {}
            DiffAlgorithm::Patience => {
                options.patience(true);
            }
            DiffAlgorithm::Minimal => {
                options.minimal(true);
            }
        }
        options
    }
}

/// libgit2 anchors a removal-only hunk on the line before the removed block.
/// Its marker belongs on the line that now follows the block, or on the
/// reported line when the block was at the end (`0` once nothing is left).
const fn hunk_anchor(new_start: u32, new_lines: u32, current_len: u32) -> u32 {
    if new_lines == 0 && new_start < current_len {
        new_start + 1
    } else {
        new_start
    }
}

fn kind_of(map: &AnnotationMap, id: ContextId) -> ChangeKind {
    map.context(id).map_or(ChangeKind::None, |context| context.kind)
}

fn set_kind(map: &mut AnnotationMap, id: ContextId, kind: ChangeKind) {
    if let Some(context) = map.context_mut(id) {
        context.kind = kind;
    }
}

fn join_lines(lines: &[String]) -> String {
    let capacity = lines.iter().map(|line| line.len() + 1).sum();
    let mut joined = String::with_capacity(capacity);
    for line in lines {
        joined.push_str(line);
        joined.push('\n');
    }
    joined
}

fn line_text(content: &[u8]) -> String {
    let content = content.strip_suffix(b"\n").unwrap_or(content);
    String::from_utf8_lossy(content).into_owned()
}
