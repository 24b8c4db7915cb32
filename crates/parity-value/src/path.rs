//! Locations inside a result value
//!
//! A [`DivergencePath`] names the site of a mismatch. It renders as a dotted
//! path rooted at `$`:
//! - `$.values[2]` is index 2 of the `values` attribute
//! - `$.parameters{owner}` is the `owner` key of the `parameters` mapping

use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};

/// A single step into a value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Sequence position
    Index(usize),
    /// Mapping key
    Key(String),
    /// Record attribute
    Attribute(String),
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Key(k) => write!(f, "{{{k}}}"),
            Self::Attribute(a) => write!(f, ".{a}"),
        }
    }
}

/// Path from the compared root to a mismatch site
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DivergencePath(Vec<PathSegment>);

impl DivergencePath {
    /// Root of the compared value
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path segments from root to leaf
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check for the root path
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// Step into a sequence position
    #[inline]
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// Step into a mapping key
    #[inline]
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(key.into()))
    }

    /// Step into a record attribute
    #[inline]
    #[must_use]
    pub fn attribute(&self, name: impl Into<String>) -> Self {
        self.child(PathSegment::Attribute(name.into()))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut new = self.clone();
        new.0.push(segment);
        new
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }
}

impl Display for DivergencePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for DivergencePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Vec<PathSegment>> for DivergencePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_renders_as_dollar() {
        let path = DivergencePath::root();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "$");
    }

    #[test]
    fn segments_render_in_order() {
        let path = DivergencePath::root()
            .attribute("sd")
            .attribute("cols")
            .index(2)
            .key("comment");
        assert_eq!(path.to_string(), "$.sd.cols[2]{comment}");
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&PathSegment::Key("comment".into())));
    }

    #[test]
    fn children_do_not_mutate_parent() {
        let parent = DivergencePath::root().attribute("values");
        let child = parent.index(0);
        assert_eq!(parent.len(), 1);
        assert!(parent.is_prefix_of(&child));
        assert!(!child.is_prefix_of(&parent));
    }

    #[test]
    fn serializes_as_rendered_string() {
        let path = DivergencePath::root().index(3);
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"$[3]\"");
    }
}
