//! Typed node paths: ordered key/index segments into the JSON document

use std::fmt;

/// One step into an object (by key) or an array (by index).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seg {
    Key(String),
    Index(usize),
}

/// Ordered sequence of segments locating a value within the document.
///
/// Displays as an RFC 9535 JSONPath: dot notation for plain identifier keys,
/// bracket notation (with `'` escaped) for everything else. The rendered form
/// is what the store feeds to the JSONPath engine, so a path stays valid as
/// long as the tree shape above it is unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<Seg>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    pub fn child_key(&self, key: &str) -> Self {
        let mut segs = self.0.clone();
        segs.push(Seg::Key(key.to_string()));
        Self(segs)
    }

    pub fn child_index(&self, idx: usize) -> Self {
        let mut segs = self.0.clone();
        segs.push(Seg::Index(idx));
        Self(segs)
    }
}

/// Keys usable with dot notation; anything else goes through brackets.
/// Member-name shorthand must not start with a digit.
fn plain_identifier(k: &str) -> bool {
    let mut chars = k.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            match seg {
                Seg::Key(k) if plain_identifier(k) => write!(f, ".{k}")?,
                Seg::Key(k) => {
                    // Backslashes first, or the quote escapes get doubled.
                    let escaped = k.replace('\\', "\\\\").replace('\'', "\\'");
                    write!(f, "['{escaped}']")?;
                }
                Seg::Index(i) => write!(f, "[{i}]")?,
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
        assert_eq!(NodePath::root().to_string(), "$");
        assert!(NodePath::root().is_root());
    }

    #[test]
    fn plain_keys_use_dot_notation() {
        let p = NodePath::root().child_key("user").child_key("profile_1");
        assert_eq!(p.to_string(), "$.user.profile_1");
    }

    #[test]
    fn indices_and_nesting() {
        let p = NodePath::root().child_key("items").child_index(2).child_index(0);
        assert_eq!(p.to_string(), "$.items[2][0]");
    }

    #[test]
    fn special_keys_use_bracket_notation() {
        assert_eq!(
            NodePath::root().child_key("key with spaces").to_string(),
            "$['key with spaces']"
        );
        assert_eq!(
            NodePath::root().child_key("key.with.dots").to_string(),
            "$['key.with.dots']"
        );
        assert_eq!(
            NodePath::root().child_key("key'with'quotes").to_string(),
            "$['key\\'with\\'quotes']"
        );
        assert_eq!(NodePath::root().child_key("").to_string(), "$['']");
    }

    #[test]
    fn digit_leading_keys_use_bracket_notation() {
        assert_eq!(NodePath::root().child_key("2024").to_string(), "$['2024']");
        assert_eq!(NodePath::root().child_key("1a").to_string(), "$['1a']");
        // A leading underscore is still a plain identifier.
        assert_eq!(NodePath::root().child_key("_1").to_string(), "$._1");
    }

    #[test]
    fn backslashes_are_escaped_before_quotes() {
        assert_eq!(
            NodePath::root().child_key("a\\b").to_string(),
            "$['a\\\\b']"
        );
        assert_eq!(
            NodePath::root().child_key("\\'").to_string(),
            "$['\\\\\\'']"
        );
    }

    #[test]
    fn paths_compare_by_segments() {
        let a = NodePath::root().child_key("a").child_index(1);
        let b = NodePath::root().child_key("a").child_index(1);
        assert_eq!(a, b);
        assert_ne!(a, NodePath::root().child_key("a").child_index(2));
    }
}
