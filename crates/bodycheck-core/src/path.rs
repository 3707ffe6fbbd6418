//! # Field Paths
//!
//! A [`Path`] locates a value inside a nested structure: a sequence of
//! field names (object traversal) and indices (array traversal). The
//! engine never mutates a path in place; each descent step produces an
//! appended copy, so sibling branches never observe each other.

use std::fmt;

use serde::{Serialize, Serializer};

/// Root segment used when no explicit path is given.
pub const DEFAULT_ROOT: &str = "body";

/// One step in a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object field access.
    Field(String),
    /// Array or tuple index.
    Index(usize),
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Field(name) => serializer.serialize_str(name),
            Self::Index(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

/// Ordered sequence of [`PathSegment`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// An empty path.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// The default root path, `["body"]`.
    pub fn body() -> Self {
        Self::root(DEFAULT_ROOT)
    }

    /// A path with a single field segment, e.g. `urlParams` or `query`.
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![PathSegment::Field(name.into())])
    }

    /// A copy of this path with one more segment appended.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment.into());
        Self(segments)
    }

    /// The segments of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
            }
        }
        Ok(())
    }
}

/// Format a path for end users.
///
/// `["body", "example_array", 8, "example_field"]` renders as
/// `body.example_array[8].example_field`. Safe to display as long as field
/// names carry no sensitive data.
pub fn pretty_path(path: &Path) -> String {
    path.to_string()
}
