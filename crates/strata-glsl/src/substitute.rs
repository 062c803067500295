use std::borrow::Cow;

use crate::marker::find_markers;

/// Outcome of a substitution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub result: String,
    /// `false` when the marker was not found; `result` is then the input.
    pub replaced: bool,
}

// ── Replacement ───────────────────────────────────────────────────────────

/// Text that can be spliced in place of a marker.
///
/// Line lists are concatenated as-is; callers carry their own `\n`.
pub trait Replacement {
    fn joined(&self) -> Cow<'_, str>;
}

impl Replacement for str {
    fn joined(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Replacement for String {
    fn joined(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl Replacement for [&str] {
    fn joined(&self) -> Cow<'_, str> {
        Cow::Owned(self.concat())
    }
}

impl<const N: usize> Replacement for [&str; N] {
    fn joined(&self) -> Cow<'_, str> {
        Cow::Owned(self.concat())
    }
}

impl Replacement for [String] {
    fn joined(&self) -> Cow<'_, str> {
        Cow::Owned(self.concat())
    }
}

impl Replacement for Vec<&str> {
    fn joined(&self) -> Cow<'_, str> {
        self.as_slice().joined()
    }
}

impl Replacement for Vec<String> {
    fn joined(&self) -> Cow<'_, str> {
        self.as_slice().joined()
    }
}

// ── substitution ──────────────────────────────────────────────────────────

/// Replaces the first occurrence of `marker` in `source`.
///
/// A missing marker is not an error: layered contributors attempt their
/// substitutions unconditionally and only some configurations carry the
/// marker.
pub fn substitute<R: Replacement + ?Sized>(
    source: &str,
    marker: &str,
    replacement: &R,
) -> Substitution {
    if marker.is_empty() {
        return unchanged(source);
    }
    match source.find(marker) {
        Some(start) => {
            let text = replacement.joined();
            let mut result = String::with_capacity(source.len() + text.len());
            result.push_str(&source[..start]);
            result.push_str(&text);
            result.push_str(&source[start + marker.len()..]);
            Substitution { result, replaced: true }
        }
        None => unchanged(source),
    }
}

/// Replaces every occurrence of `marker` in `source`.
///
/// Scanning resumes after each inserted replacement, so a replacement that
/// contains the marker again is never re-expanded.
pub fn substitute_all<R: Replacement + ?Sized>(
    source: &str,
    marker: &str,
    replacement: &R,
) -> Substitution {
    if marker.is_empty() || !source.contains(marker) {
        return unchanged(source);
    }
    let text = replacement.joined();
    let mut result = String::with_capacity(source.len());
    let mut pos = 0;
    while let Some(found) = source[pos..].find(marker) {
        let start = pos + found;
        result.push_str(&source[pos..start]);
        result.push_str(&text);
        pos = start + marker.len();
    }
    result.push_str(&source[pos..]);
    Substitution { result, replaced: true }
}

/// Removes every marker still present in `source`.
///
/// Run once after all layers have contributed: leftover markers are
/// placeholders nobody claimed and become empty text.
pub fn strip_markers(source: &str) -> String {
    let spans = find_markers(source);
    if spans.is_empty() {
        return source.to_owned();
    }
    let mut result = String::with_capacity(source.len());
    let mut pos = 0;
    for span in spans {
        result.push_str(&source[pos..span.range.start]);
        pos = span.range.end;
    }
    result.push_str(&source[pos..]);
    result
}

fn unchanged(source: &str) -> Substitution {
    Substitution { result: source.to_owned(), replaced: false }
}
