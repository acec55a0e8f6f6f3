//! Line tags link comment text to source lines: `[L12]` or `[L12-18]`.
//!
//! Anything that does not match the tag grammar exactly stays plain text.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::models::LineRange;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[L(\d+)(?:-(\d+))?\]").expect("line tag pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LineTagSegment {
    Text { raw: String },
    Tag { raw: String, range: LineRange },
}

impl LineTagSegment {
    pub fn raw(&self) -> &str {
        match self {
            LineTagSegment::Text { raw } | LineTagSegment::Tag { raw, .. } => raw,
        }
    }

    pub fn range(&self) -> Option<LineRange> {
        match self {
            LineTagSegment::Text { .. } => None,
            LineTagSegment::Tag { range, .. } => Some(*range),
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, LineTagSegment::Tag { .. })
    }
}

/// Splits `body` into ordered text and tag segments.
///
/// Concatenating every segment's `raw` gives back `body` exactly. A body without tags
/// (including the empty body) yields one text segment. Ranges are passed through as
/// written, so `[L9-3]` produces `start_line = 9, end_line = 3`.
pub fn parse(body: &str) -> Vec<LineTagSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in TAG_PATTERN.captures_iter(body) {
        let Some(range) = capture_range(&caps) else {
            // number too large for a line index; leave it in the surrounding text
            continue;
        };
        let Some(m) = caps.get(0) else {
            continue;
        };
        if m.start() > cursor {
            segments.push(LineTagSegment::Text {
                raw: body[cursor..m.start()].to_string(),
            });
        }
        segments.push(LineTagSegment::Tag {
            raw: m.as_str().to_string(),
            range,
        });
        cursor = m.end();
    }

    if cursor < body.len() || segments.is_empty() {
        segments.push(LineTagSegment::Text {
            raw: body[cursor..].to_string(),
        });
    }

    segments
}

/// Parses a string that is exactly one tag, e.g. the output of [`LineRange::tag`].
pub fn parse_tag(tag: &str) -> Option<LineRange> {
    let caps = TAG_PATTERN.captures(tag)?;
    let m = caps.get(0)?;
    if m.start() != 0 || m.end() != tag.len() {
        return None;
    }
    capture_range(&caps)
}

/// All tag ranges in `body`, in order of appearance.
pub fn ranges(body: &str) -> Vec<LineRange> {
    parse(body).iter().filter_map(LineTagSegment::range).collect()
}

fn capture_range(caps: &regex::Captures<'_>) -> Option<LineRange> {
    let start: u32 = caps.get(1)?.as_str().parse().ok()?;
    let end: u32 = match caps.get(2) {
        Some(end) => end.as_str().parse().ok()?,
        None => start,
    };
    Some(LineRange::new_unchecked(start, end))
}
