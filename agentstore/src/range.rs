//! Range boundary model shared by every backend.
//!
//! Callers describe a key range as a `(start_key, end_key)` pair of strings.
//! The logical ordering is byte-lexicographic over keys, and the range is the
//! standard half-open `[start, end)` - except for the reserved
//! [`END_KEY_SUFFIX`] marker, which reinterprets the upper bound as a prefix
//! match. Backends translate [`KeyRange`] into their native predicates (a SQL
//! `WHERE` clause, an ordered-map seek) instead of re-deriving the boundary
//! rules, so iteration behaves identically regardless of the engine.

/// Reserved end-key suffix marker.
///
/// Appending this sentinel to a literal prefix `p` in an iterator call (i.e.
/// passing `p + END_KEY_SUFFIX` as the end key) requests every key sharing
/// prefix `p`, regardless of what would lexicographically follow `p` as a
/// literal upper bound. Callers never need to compute a byte-incremented
/// bound themselves.
pub const END_KEY_SUFFIX: &str = "!!";

/// Upper bound of a non-empty key range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeEnd {
    /// Exclusive literal upper bound: keys strictly below it match.
    Literal(String),
    /// Prefix bound: every key sharing this prefix matches, along with any key
    /// ordered below the prefix itself.
    Prefix(String),
}

/// A normalized key range.
///
/// Built with [`KeyRange::new`] from the raw `(start_key, end_key)` pair a
/// caller hands to `iterator()`. An empty end key always normalizes to
/// [`KeyRange::Empty`]: an unbounded range request is treated as a deliberate
/// no-op, so callers wanting a full scan must pass an explicit covering range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRange {
    /// Matches nothing.
    Empty,
    /// Matches keys `>= start` and below `end`.
    Span { start: String, end: RangeEnd },
}

impl KeyRange {
    /// Normalizes a raw `(start_key, end_key)` pair.
    ///
    /// An empty `end_key` yields [`KeyRange::Empty`]; an `end_key` carrying
    /// [`END_KEY_SUFFIX`] yields a prefix bound; anything else is a literal
    /// exclusive upper bound.
    pub fn new(start_key: &str, end_key: &str) -> KeyRange {
        if end_key.is_empty() {
            return KeyRange::Empty;
        }

        let end = match end_key.strip_suffix(END_KEY_SUFFIX) {
            Some(prefix) => RangeEnd::Prefix(prefix.to_string()),
            None => RangeEnd::Literal(end_key.to_string()),
        };

        KeyRange::Span {
            start: start_key.to_string(),
            end,
        }
    }

    /// Whether `key` falls inside this range.
    pub fn contains(&self, key: &str) -> bool {
        match self {
            KeyRange::Empty => false,
            KeyRange::Span { start, end } => {
                if key < start.as_str() {
                    return false;
                }
                match end {
                    RangeEnd::Literal(bound) => key < bound.as_str(),
                    RangeEnd::Prefix(prefix) => {
                        key < prefix.as_str() || key.starts_with(prefix.as_str())
                    }
                }
            }
        }
    }

    /// Whether `key` and everything ordered after it fall outside this range.
    ///
    /// Lets an ordered traversal stop early instead of scanning to the end of
    /// the keyspace.
    pub fn is_past(&self, key: &str) -> bool {
        match self {
            KeyRange::Empty => true,
            KeyRange::Span { end, .. } => match end {
                RangeEnd::Literal(bound) => key >= bound.as_str(),
                RangeEnd::Prefix(prefix) => {
                    key > prefix.as_str() && !key.starts_with(prefix.as_str())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 6] = ["abc_123", "abc_124", "abc_125", "abc_126", "jkl_123", "mno_123"];

    fn matching(range: &KeyRange) -> Vec<&'static str> {
        KEYS.iter().copied().filter(|k| range.contains(k)).collect()
    }

    #[test]
    fn test_prefix_bound_matches_prefixed_keys_only() {
        let range = KeyRange::new("abc_", &format!("abc{}", END_KEY_SUFFIX));
        assert_eq!(
            matching(&range),
            vec!["abc_123", "abc_124", "abc_125", "abc_126"]
        );
    }

    #[test]
    fn test_empty_start_and_end_matches_nothing() {
        let range = KeyRange::new("", "");
        assert_eq!(range, KeyRange::Empty);
        assert_eq!(matching(&range), Vec::<&str>::new());
    }

    #[test]
    fn test_prefix_bound_spanning_whole_keyspace() {
        let range = KeyRange::new("abc_", &format!("mno{}", END_KEY_SUFFIX));
        assert_eq!(matching(&range).len(), 6);
    }

    #[test]
    fn test_literal_bound_is_exclusive() {
        let range = KeyRange::new("abc_", "mno_123");
        assert_eq!(matching(&range).len(), 5);
        assert!(!range.contains("mno_123"));
    }

    #[test]
    fn test_empty_end_with_nonempty_start_matches_nothing() {
        let range = KeyRange::new("abc_", "");
        assert_eq!(range, KeyRange::Empty);
    }

    #[test]
    fn test_inverted_literal_bounds_match_nothing() {
        let range = KeyRange::new("mno_123", "abc_123");
        assert_eq!(matching(&range), Vec::<&str>::new());
    }

    #[test]
    fn test_start_key_is_inclusive() {
        let range = KeyRange::new("abc_123", "abc_124");
        assert_eq!(matching(&range), vec!["abc_123"]);
    }

    #[test]
    fn test_suffix_alone_covers_everything_from_start() {
        // "" + suffix makes the empty string the prefix, so every key matches.
        let range = KeyRange::new("", END_KEY_SUFFIX);
        assert_eq!(matching(&range).len(), 6);
    }

    #[test]
    fn test_is_past_literal() {
        let range = KeyRange::new("abc_", "jkl_123");
        assert!(!range.is_past("abc_126"));
        assert!(range.is_past("jkl_123"));
        assert!(range.is_past("mno_123"));
    }

    #[test]
    fn test_is_past_prefix() {
        let range = KeyRange::new("abc_", &format!("abc{}", END_KEY_SUFFIX));
        assert!(!range.is_past("abc"));
        assert!(!range.is_past("abc_126"));
        assert!(range.is_past("abd"));
        assert!(range.is_past("jkl_123"));
    }

    #[test]
    fn test_is_past_empty_range() {
        assert!(KeyRange::Empty.is_past("anything"));
    }

    #[test]
    fn test_prefix_equal_to_key_matches() {
        let range = KeyRange::new("", &format!("abc_123{}", END_KEY_SUFFIX));
        assert!(range.contains("abc_123"));
    }

    #[test]
    fn test_ordering_is_byte_lexicographic() {
        // 'Z' (0x5a) sorts below 'a' (0x61)
        let range = KeyRange::new("A", "a");
        assert!(range.contains("Z"));
        assert!(!range.contains("a"));
        assert!(!range.contains("b"));
    }
}
