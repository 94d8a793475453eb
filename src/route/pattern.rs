//! Route templates and path matching.
//!
//! A [`RoutePattern`] is compiled from a `/`-delimited template. Literal
//! segments must match exactly, `:name` segments capture any single non-empty
//! path segment, and segment counts must agree. There is no catch-all.

use std::collections::BTreeMap;
use std::fmt;

use super::tokenizer::{self, Token};

/// Errors from compiling a route template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid segment {text:?} at byte {offset} in route {template:?}")]
    InvalidSegment {
        template: String,
        offset: usize,
        text: String,
    },
    #[error("parameter :{name} appears more than once in route {template:?}")]
    DuplicateParam { template: String, name: String },
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One compiled template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Captures the path segment under this name.
    Param(String),
}

// ---------------------------------------------------------------------------
// Params
// ---------------------------------------------------------------------------

/// Parameters captured by a successful match, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a captured value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, name: &str, value: String) {
        self.0.insert(name.to_owned(), value);
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Params {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// RoutePattern
// ---------------------------------------------------------------------------

/// A compiled route template such as `/users/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    template: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a template. Empty segments (leading, trailing or doubled `/`)
    /// are ignored, so `/home/` and `home` compile identically.
    pub fn parse(template: &str) -> Result<Self, RouteError> {
        let tokens = tokenizer::tokenize(template).map_err(|e| RouteError::InvalidSegment {
            template: template.to_owned(),
            offset: e.offset,
            text: e.text,
        })?;

        let mut segments = Vec::new();
        for (token, text) in tokens {
            match token {
                Token::Slash => {}
                Token::Literal => segments.push(Segment::Literal(text)),
                Token::Param => {
                    let name = text[1..].to_owned();
                    let duplicate = segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(existing) if *existing == name));
                    if duplicate {
                        return Err(RouteError::DuplicateParam {
                            template: template.to_owned(),
                            name,
                        });
                    }
                    segments.push(Segment::Param(name));
                }
            }
        }

        Ok(Self {
            template: template.to_owned(),
            segments,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Compiled segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match a concrete path, returning the captured parameters.
    ///
    /// Any query string or fragment on `path` is ignored. Captured values are
    /// percent-decoded; a value that does not decode to UTF-8 fails the match.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => params.insert(name, percent_decode(part)?),
            }
        }
        Some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// The path component of a location, without query string or fragment.
pub fn path_only(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Non-empty `/`-separated segments of the path component.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path_only(path).split('/').filter(|s| !s.is_empty())
}

/// Decode `%XX` escapes. Malformed escapes are kept literally; the decoded
/// bytes must be valid UTF-8.
fn percent_decode(raw: &str) -> Option<String> {
    fn hex(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).ok()
}

// ===========================================================================
// Tests
// ===========================================================================
