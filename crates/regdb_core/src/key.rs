//! Case-insensitive registry keys.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A case-insensitive, immutable key.
///
/// Equality, ordering and hashing use a lowercase copy of the text, so
/// `"Foo"` and `"foo"` address the same entry. [`Display`](fmt::Display)
/// shows the text exactly as it was given.
#[derive(Debug, Clone)]
pub struct Key {
    text: String,
    folded: String,
}

impl Key {
    /// Creates a key from its text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let folded = text.to_lowercase();
        Self { text, folded }
    }

    /// Returns the key text as originally supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Key {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_case() {
        assert_eq!(Key::new("Foo"), Key::new("foo"));
        assert_eq!(Key::new("FOO"), Key::new("fOo"));
        assert_ne!(Key::new("foo"), Key::new("bar"));
    }

    #[test]
    fn display_preserves_case() {
        assert_eq!(Key::new("MixedCase").to_string(), "MixedCase");
        assert_eq!(Key::new("MixedCase").as_str(), "MixedCase");
    }

    #[test]
    fn hash_agrees_with_equality() {
        let mut set = HashSet::new();
        set.insert(Key::new("Foo"));
        assert!(set.contains(&Key::new("foo")));
        assert!(!set.insert(Key::new("FOO")));
        assert_eq!(set.len(), 1);
    }
}
