//! # Document Paths
//!
//! A cursor into the document tree used for error reporting and trace
//! output. Rendered in a JSONPath-like form: `$`, `$.children[2].validator`.

use std::fmt;

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Value under a mapping key.
    Key(String),
    /// Element of a sequence.
    Index(usize),
}

/// A stack of [`PathSegment`]s from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPath {
    segments: Vec<PathSegment>,
}

impl DocumentPath {
    /// The path of the document root (`$`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Descend into a mapping value.
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Descend into a sequence element.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Return to the parent node.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_renders_as_dollar() {
        assert_eq!(DocumentPath::root().to_string(), "$");
    }

    #[test]
    fn nested_path_renders_keys_and_indices() {
        let mut path = DocumentPath::root();
        path.push_key("children");
        path.push_index(2);
        path.push_key("validator");
        assert_eq!(path.to_string(), "$.children[2].validator");
        assert_eq!(path.depth(), 3);

        assert_eq!(path.pop(), Some(PathSegment::Key("validator".into())));
        assert_eq!(path.to_string(), "$.children[2]");
    }
}
