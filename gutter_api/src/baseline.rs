use serde::{Deserialize, Serialize};

/// Last known committed content of the tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "lines")]
pub enum BaselineSnapshot {
    /// No repository, or the content could not be retrieved. Classification is suspended.
    #[default]
    Unknown,
    /// The file is inside a repository but has no committed version yet.
    Empty,
    /// Committed content split into lines without terminators.
    Lines(Vec<String>),
}

impl BaselineSnapshot {
    /// Split decoded file content into baseline lines.
    ///
    /// Exactly one trailing `\n` is dropped so the line count matches an
    /// editor buffer, which never carries a phantom empty last line.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let body = text.strip_suffix('\n').unwrap_or(text);
        if text.is_empty() {
            return Self::Lines(Vec::new());
        }
        Self::Lines(body.split('\n').map(str::to_owned).collect())
    }

    /// False only for [`BaselineSnapshot::Unknown`].
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Baseline lines when the file has committed content.
    #[must_use]
    pub fn lines(&self) -> Option<&[String]> {
        match self {
            Self::Lines(lines) => Some(lines),
            Self::Unknown | Self::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(values: &[&str]) -> BaselineSnapshot {
        BaselineSnapshot::Lines(values.iter().map(|value| (*value).to_owned()).collect())
    }

    #[test]
    fn single_trailing_newline_is_dropped() {
        assert_eq!(BaselineSnapshot::from_text("a\nb\n"), lines(&["a", "b"]));
        assert_eq!(BaselineSnapshot::from_text("a\nb"), lines(&["a", "b"]));
    }

    #[test]
    fn only_one_terminator_is_stripped() {
        assert_eq!(BaselineSnapshot::from_text("a\n\n"), lines(&["a", ""]));
        assert_eq!(BaselineSnapshot::from_text("\n"), lines(&[""]));
    }

    #[test]
    fn carriage_returns_are_kept() {
        assert_eq!(BaselineSnapshot::from_text("a\r\nb\r\n"), lines(&["a\r", "b\r"]));
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert_eq!(BaselineSnapshot::from_text(""), lines(&[]));
        assert!(BaselineSnapshot::from_text("").is_known());
    }

    #[test]
    fn unknown_is_the_only_unknown_state() {
        assert!(!BaselineSnapshot::Unknown.is_known());
        assert!(BaselineSnapshot::Empty.is_known());
        assert!(BaselineSnapshot::Empty.lines().is_none());
        assert_eq!(lines(&["x"]).lines(), Some(&["x".to_string()][..]));
    }

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_string(&BaselineSnapshot::Empty).expect("serialize");
        assert_eq!(json, r#"{"state":"empty"}"#);

        let decoded: BaselineSnapshot =
            serde_json::from_str(r#"{"state":"lines","lines":["a"]}"#).expect("deserialize");
        assert_eq!(decoded, lines(&["a"]));
    }
}
