//! Dotted scope paths used to prefix keys before lookup.

use crate::i18n::tree::{segments, SEPARATOR};
use std::fmt;

/// An ordered list of key path segments.
///
/// Empty segments are dropped on parse, so `"a..b."` and `"a.b"` are the
/// same scope. Joining two scopes concatenates their segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopePath {
    segments: Vec<String>,
}

impl ScopePath {
    /// Parse a dotted path.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: segments(path).map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// `true` when the scope names a namespace of two or more segments.
    pub fn is_namespaced(&self) -> bool {
        self.segments.len() > 1
    }

    /// This scope followed by `other`.
    pub fn join(&self, other: &ScopePath) -> ScopePath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        ScopePath { segments }
    }

    /// Full dotted path of `key` under this scope.
    pub fn qualify(&self, key: &str) -> String {
        self.join(&ScopePath::parse(key)).to_string()
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl From<&str> for ScopePath {
    fn from(path: &str) -> Self {
        ScopePath::parse(path)
    }
}

impl From<String> for ScopePath {
    fn from(path: String) -> Self {
        ScopePath::parse(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let scope = ScopePath::parse("nti-lib-locale.test.scope");
        assert_eq!(scope.segments().len(), 3);
        assert_eq!(scope.to_string(), "nti-lib-locale.test.scope");
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        assert_eq!(ScopePath::parse(".a..b."), ScopePath::parse("a.b"));
    }

    #[test]
    fn test_qualify_key() {
        let scope = ScopePath::parse("course.contact-info");
        assert_eq!(scope.qualify("link1"), "course.contact-info.link1");
        assert_eq!(ScopePath::default().qualify("bare"), "bare");
    }

    #[test]
    fn test_join_is_associative() {
        let a = ScopePath::parse("a.b");
        let b = ScopePath::parse("c");
        let c = ScopePath::parse("d.e");
        assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
        assert_eq!(a.join(&b).join(&c).to_string(), "a.b.c.d.e");
    }

    #[test]
    fn test_is_namespaced() {
        assert!(ScopePath::parse("a.b").is_namespaced());
        assert!(!ScopePath::parse("bare").is_namespaced());
        assert!(!ScopePath::default().is_namespaced());
    }
}
