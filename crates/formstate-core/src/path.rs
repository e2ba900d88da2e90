//! Path algebra for addressing form nodes
//!
//! A full path names one concrete node (`recurringGroup.1.question4`); a
//! shape path drops the array indices (`recurringGroup.question4`) and is the
//! key rules are registered under, so every instance of a recurring group
//! shares its rules.

use crate::{Error, Result, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// One step in a path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Structural key of a group field
    Key(String),
    /// Position inside a recurring group or list
    Index(usize),
}

impl Segment {
    /// Get the index if this is an index segment
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// True iff `segment` is not a base-10 integer literal
pub fn is_structural_segment(segment: &str) -> bool {
    let digits = segment.strip_prefix('-').unwrap_or(segment);
    digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
}

/// Join the structural segments with `.`, dropping indices
pub fn shape_path(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        if let Segment::Key(key) = segment {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(key);
        }
    }
    out
}

/// The rightmost index segment, i.e. the recurring instance a node sits in
///
/// `None` means the path is not inside a recurring group.
pub fn last_index(segments: &[Segment]) -> Option<usize> {
    segments.iter().rev().find_map(Segment::as_index)
}

/// Dot-joined path with indices as plain segments (`a.items.1.b`)
pub fn full_path(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Human-readable path with bracketed indices (`a.items[1].b`)
pub fn display_path(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Segment::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// Join a key onto a shape path
pub(crate) fn join_shape(shape: &str, key: &str) -> String {
    if shape.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", shape, key)
    }
}

/// A parsed full path
///
/// Parses `a.b[0].c` and `a.b.0.c` to the same segments. The empty string is
/// the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// The root path
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dot/bracket path string
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for part in path.split('.') {
            let (head, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };

            if head.is_empty() && (rest.is_empty() || segments.is_empty()) {
                return Err(Error::InvalidPath(path.to_string()));
            }
            if !head.is_empty() {
                segments.push(parse_segment(head, path)?);
            }

            while !rest.is_empty() {
                let close = rest
                    .find(']')
                    .ok_or_else(|| Error::InvalidPath(path.to_string()))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| Error::InvalidPath(path.to_string()))?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(Error::InvalidPath(path.to_string()));
                }
            }
        }
        Ok(Self(segments))
    }

    /// Build a path from segments
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Get the segments of this path
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a segment in place
    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    /// A new path with `key` appended
    pub fn join(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push(Segment::Key(key.into()));
        path
    }

    /// A new path with `index` appended
    pub fn join_index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push(Segment::Index(index));
        path
    }

    /// A new path with every segment of `other` appended
    pub fn concat(&self, other: &FieldPath) -> Self {
        let mut path = self.clone();
        path.0.extend(other.0.iter().cloned());
        path
    }

    /// The shape path (rule lookup key) of this path
    pub fn shape_path(&self) -> String {
        shape_path(&self.0)
    }

    /// The rightmost index in this path
    pub fn last_index(&self) -> Option<usize> {
        last_index(&self.0)
    }

    /// The bracketed display form of this path
    pub fn display_path(&self) -> String {
        display_path(&self.0)
    }
}

fn parse_segment(part: &str, path: &str) -> Result<Segment> {
    if is_structural_segment(part) {
        Ok(Segment::Key(part.to_string()))
    } else {
        // negative literals are indices too, but never valid ones
        part.parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| Error::InvalidPath(path.to_string()))
    }
}

impl Deref for FieldPath {
    type Target = [Segment];

    fn deref(&self) -> &[Segment] {
        &self.0
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", full_path(&self.0))
    }
}

/// Read the value at a dot/bracket path string
///
/// Unparseable paths read as absent.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let path = FieldPath::parse(path).ok()?;
    root.get_path(&path)
}

/// Write `value` at a dot/bracket path string, creating containers as needed
pub fn set(root: &mut Value, path: &str, value: impl Into<Value>) -> Result<()> {
    let path = FieldPath::parse(path)?;
    root.set_path(&path, value.into())
}
