use std::fmt;
use std::ops::Range;

// ── Phase ─────────────────────────────────────────────────────────────────

/// Region of the shader a marker stands for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Global declarations (uniforms, inputs, outputs).
    Dec,
    /// Statements inside `main`.
    Impl,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Dec => "Dec",
            Phase::Impl => "Impl",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Dec" => Some(Phase::Dec),
            "Impl" => Some(Phase::Impl),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Marker ────────────────────────────────────────────────────────────────

/// A placeholder token: `//Namespace::Tag::Phase`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker {
    pub namespace: String,
    pub tag: String,
    pub phase: Phase,
}

impl Marker {
    pub fn new(namespace: impl Into<String>, tag: impl Into<String>, phase: Phase) -> Self {
        Self { namespace: namespace.into(), tag: tag.into(), phase }
    }

    /// The literal text searched for in shader sources.
    pub fn token(&self) -> String {
        self.to_string()
    }

    /// Parses a complete token such as `//Strata::Camera::Dec`.
    ///
    /// The leading `//` is optional so bare `Namespace::Tag::Phase` strings
    /// parse too.
    pub fn parse(token: &str) -> Option<Self> {
        let body = token.strip_prefix("//").unwrap_or(token);
        let mut parts = body.split("::");
        let namespace = parts.next().filter(|s| is_ident(s))?;
        let tag = parts.next().filter(|s| is_ident(s))?;
        let phase = parts.next().and_then(Phase::parse)?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(namespace, tag, phase))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}::{}::{}", self.namespace, self.tag, self.phase)
    }
}

// ── scanning ──────────────────────────────────────────────────────────────

/// A marker found in a source body, with its byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpan {
    pub range: Range<usize>,
    pub marker: Marker,
}

/// Lists every well-formed marker in `source`, in order of appearance.
pub fn find_markers(source: &str) -> Vec<MarkerSpan> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(found) = source[pos..].find("//") {
        let start = pos + found;
        match match_marker_at(source, start) {
            Some(span) => {
                pos = span.range.end;
                spans.push(span);
            }
            None => pos = start + 2,
        }
    }
    spans
}

/// Tries to read a marker starting at `start`, which must point at `//`.
fn match_marker_at(source: &str, start: usize) -> Option<MarkerSpan> {
    let bytes = source.as_bytes();
    let mut i = start + 2;

    let ns_start = i;
    i = skip_ident(bytes, i);
    if i == ns_start || !source[i..].starts_with("::") {
        return None;
    }
    let ns_end = i;
    i += 2;

    let tag_start = i;
    i = skip_ident(bytes, i);
    if i == tag_start || !source[i..].starts_with("::") {
        return None;
    }
    let tag_end = i;
    i += 2;

    let phase_start = i;
    i = skip_ident(bytes, i);
    let phase = Phase::parse(&source[phase_start..i])?;

    Some(MarkerSpan {
        range: start..i,
        marker: Marker::new(&source[ns_start..ns_end], &source[tag_start..tag_end], phase),
    })
}

fn skip_ident(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    i
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_through_parse() {
        let m = Marker::new("Strata", "Camera", Phase::Dec);
        assert_eq!(m.token(), "//Strata::Camera::Dec");
        assert_eq!(Marker::parse(&m.token()), Some(m));
    }

    #[test]
    fn parse_accepts_bare_token() {
        let m = Marker::parse("X::Y::Impl").unwrap();
        assert_eq!(m.namespace, "X");
        assert_eq!(m.tag, "Y");
        assert_eq!(m.phase, Phase::Impl);
    }

    #[test]
    fn parse_rejects_unknown_phase() {
        assert!(Marker::parse("//X::Y::Body").is_none());
        assert!(Marker::parse("//X::Y").is_none());
        assert!(Marker::parse("//X::Y::Dec::Extra").is_none());
    }

    #[test]
    fn find_markers_skips_plain_comments() {
        let src = "// plain comment\n//A::B::Dec\nint x; // note\n  //A::C::Impl\n";
        let found = find_markers(src);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].marker, Marker::new("A", "B", Phase::Dec));
        assert_eq!(&src[found[1].range.clone()], "//A::C::Impl");
    }

    #[test]
    fn find_markers_requires_whole_phase_word() {
        assert!(find_markers("//A::B::Declare\n").is_empty());
    }
}
