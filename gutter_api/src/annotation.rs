use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Classification of a buffer line relative to its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Scratch state for a hunk that has not seen any record yet.
    #[default]
    None,
    /// Line exists only in the buffer.
    Added,
    /// Baseline lines were deleted at this point.
    Removed,
    /// Baseline lines were replaced by buffer lines.
    Modified,
}

impl ChangeKind {
    /// Whether the kind denotes an actual change that can be displayed.
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Annotation record shared by every line of one logical change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineContext {
    /// The change classification.
    pub kind: ChangeKind,
    /// Baseline text removed at this point, without line terminators.
    #[serde(default)]
    pub removed_lines: Vec<String>,
}

impl LineContext {
    /// An empty scratch context (`ChangeKind::None`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context of the given kind with no removed text.
    #[must_use]
    pub const fn with_kind(kind: ChangeKind) -> Self {
        Self {
            kind,
            removed_lines: Vec::new(),
        }
    }
}

/// Index of a [`LineContext`] inside an [`AnnotationMap`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(usize);

impl ContextId {
    /// Position of the context in the owning arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Mapping from 1-based buffer line number to its change annotation.
///
/// Contexts live in an arena and lines refer to them by [`ContextId`], so
/// several lines can alias the same record: mutating it through
/// [`AnnotationMap::context_mut`] is visible from every aliasing line.
///
/// Equality compares what a renderer can observe (line numbers, kinds and
/// removed text), not the arena layout.
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    contexts: Vec<LineContext>,
    lines: BTreeMap<u32, ContextId>,
}

impl AnnotationMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a context in the arena without attaching it to any line.
    pub fn insert_context(&mut self, context: LineContext) -> ContextId {
        self.contexts.push(context);
        ContextId(self.contexts.len() - 1)
    }

    /// Look up an arena slot.
    #[must_use]
    pub fn context(&self, id: ContextId) -> Option<&LineContext> {
        self.contexts.get(id.0)
    }

    /// Mutable access to an arena slot.
    pub fn context_mut(&mut self, id: ContextId) -> Option<&mut LineContext> {
        self.contexts.get_mut(id.0)
    }

    /// Point `line` at the context `id`, returning the context it referenced before.
    pub fn assign(&mut self, line: u32, id: ContextId) -> Option<ContextId> {
        self.lines.insert(line, id)
    }

    /// Annotation displayed on `line`, if any.
    #[must_use]
    pub fn get(&self, line: u32) -> Option<&LineContext> {
        self.lines.get(&line).and_then(|id| self.context(*id))
    }

    /// Arena slot referenced by `line`, if any.
    #[must_use]
    pub fn context_id(&self, line: u32) -> Option<ContextId> {
        self.lines.get(&line).copied()
    }

    /// Whether `line` carries an annotation.
    #[must_use]
    pub fn contains_line(&self, line: u32) -> bool {
        self.lines.contains_key(&line)
    }

    /// Number of annotated lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no line is annotated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Annotated line numbers in ascending order.
    pub fn lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.keys().copied()
    }

    /// Annotated lines with their contexts, in ascending line order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &LineContext)> + '_ {
        self.lines
            .iter()
            .filter_map(|(line, id)| self.context(*id).map(|context| (*line, context)))
    }

    /// Move every annotation one line further down (`k` becomes `k + 1`).
    ///
    /// Keys are moved from the highest down so no entry overwrites another.
    pub fn shift_lines_down(&mut self) {
        let keys: Vec<u32> = self.lines.keys().rev().copied().collect();
        for line in keys {
            if let Some(id) = self.lines.remove(&line) {
                self.lines.insert(line.saturating_add(1), id);
            }
        }
    }

    /// Flatten the map into one owned record per annotated line.
    #[must_use]
    pub fn to_annotations(&self) -> Vec<LineAnnotation> {
        self.iter()
            .map(|(line, context)| LineAnnotation {
                line,
                kind: context.kind,
                removed_lines: context.removed_lines.clone(),
            })
            .collect()
    }
}

impl PartialEq for AnnotationMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for AnnotationMap {}

/// Owned, serializable view of a single annotated line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAnnotation {
    /// 1-based line number in the current buffer.
    pub line: u32,
    /// The change classification.
    pub kind: ChangeKind,
    /// Baseline text removed at this point.
    #[serde(default)]
    pub removed_lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_scratch_kind_is_not_a_change() {
        assert!(!ChangeKind::None.is_change());
        assert!(ChangeKind::Added.is_change());
        assert!(ChangeKind::Removed.is_change());
        assert!(ChangeKind::Modified.is_change());
    }

    #[test]
    fn aliased_lines_observe_mutation() {
        let mut map = AnnotationMap::new();
        let id = map.insert_context(LineContext::with_kind(ChangeKind::Removed));
        map.assign(4, id);
        map.assign(5, id);

        let context = map.context_mut(id).expect("context exists");
        context.kind = ChangeKind::Modified;
        context.removed_lines.push("old".into());

        for line in [4, 5] {
            let context = map.get(line).expect("annotated line");
            assert_eq!(context.kind, ChangeKind::Modified);
            assert_eq!(context.removed_lines, vec!["old".to_string()]);
        }
        assert_eq!(map.context_id(4), map.context_id(5));
    }

    #[test]
    fn unassigned_context_is_not_visible() {
        let mut map = AnnotationMap::new();
        map.insert_context(LineContext::new());
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn shift_moves_every_key_without_collisions() {
        let mut map = AnnotationMap::new();
        let removed = map.insert_context(LineContext::with_kind(ChangeKind::Removed));
        let added = map.insert_context(LineContext::with_kind(ChangeKind::Added));
        map.assign(0, removed);
        map.assign(1, added);
        map.assign(2, added);

        map.shift_lines_down();

        assert_eq!(map.lines().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(map.context_id(1), Some(removed));
        assert_eq!(map.context_id(2), Some(added));
        assert_eq!(map.context_id(3), Some(added));
    }

    #[test]
    fn equality_ignores_arena_layout() {
        let mut shared = AnnotationMap::new();
        let id = shared.insert_context(LineContext::with_kind(ChangeKind::Added));
        shared.assign(1, id);
        shared.assign(2, id);

        let mut separate = AnnotationMap::new();
        separate.insert_context(LineContext::new());
        for line in [1, 2] {
            let id = separate.insert_context(LineContext::with_kind(ChangeKind::Added));
            separate.assign(line, id);
        }

        assert_eq!(shared, separate);

        separate.assign(3, id);
        assert_ne!(shared, separate);
    }

    #[test]
    fn annotations_serialize_with_snake_case_kind() {
        let mut map = AnnotationMap::new();
        let id = map.insert_context(LineContext {
            kind: ChangeKind::Modified,
            removed_lines: vec!["before".into()],
        });
        map.assign(7, id);

        let annotations = map.to_annotations();
        let json = serde_json::to_string(&annotations).expect("serialize annotations");
        assert!(json.contains("\"kind\":\"modified\""));

        let decoded: Vec<LineAnnotation> =
            serde_json::from_str(&json).expect("deserialize annotations");
        assert_eq!(decoded, annotations);
    }

    #[test]
    fn removed_lines_default_when_missing() {
        let json = r#"{ "line": 3, "kind": "added" }"#;
        let annotation: LineAnnotation = serde_json::from_str(json).expect("deserialize");
        assert_eq!(annotation.kind, ChangeKind::Added);
        assert!(annotation.removed_lines.is_empty());
    }
}
