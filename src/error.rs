use core::{error, fmt};

use crate::tree::{Node, NodeKind};

/// Errors that can occur when registering a pattern.
///
/// These are all programmer errors (bad pattern syntax, a pattern that
/// conflicts with one already registered, ...): the tree is left in an
/// unspecified state once one of these is returned and must be discarded.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InsertError {
    /// The exact pattern was already registered with a value.
    Conflict {
        /// The template already registered at this endpoint.
        with: String,
    },

    /// A wildcard in the new pattern conflicts with one already registered.
    WildcardConflict {
        /// The conflicting segment of the new pattern.
        segment: String,
        /// The full new pattern being inserted.
        pattern: String,
        /// The existing wildcard token (`:name` or `*name`) it conflicts with.
        existing_wildcard: String,
        /// The full existing prefix the conflicting wildcard is registered under.
        existing_prefix: String,
    },

    /// A catch-all conflicts with a value already registered on the static
    /// prefix it would be appended to (e.g. `/src1/` then `/src1/*filepath`).
    ///
    /// This is distinct from [`WildcardConflict`](InsertError::WildcardConflict):
    /// the conflicting node here is the value-bearing prefix itself, not a
    /// sibling wildcard, so there is no `existing_wildcard` token to report.
    CatchAllConflictsWithValue {
        /// The full new pattern being inserted.
        pattern: String,
        /// The existing value-bearing prefix the catch-all would shadow.
        existing_prefix: String,
    },

    /// A `:` or `*` wildcard was given an empty name.
    EmptyWildcardName,

    /// More than one wildcard appeared in a single path segment.
    ///
    /// For example, `/foo-:bar` and `/:bar-foo` are valid patterns, but
    /// `/:foo:bar` is not.
    InvalidParamSegment,

    /// A catch-all (`*name`) was not the final segment, or was not
    /// immediately preceded by `/`.
    InvalidCatchAll,

    /// A registered pattern did not start with `/`.
    PathMustStartWithSlash,

    /// An HTTP method name is not one of the recognized verbs.
    UnknownMethod {
        /// The rejected method name.
        method: String,
    },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { with } => {
                write!(f, "insertion failed: pattern '{with}' is already registered")
            }
            Self::WildcardConflict {
                segment,
                pattern,
                existing_wildcard,
                existing_prefix,
            } => write!(
                f,
                "'{segment}' in new path '{pattern}' conflicts with existing wildcard \
                 '{existing_wildcard}' in existing prefix '{existing_prefix}'"
            ),
            Self::CatchAllConflictsWithValue { pattern, existing_prefix } => write!(
                f,
                "catch-all in new path '{pattern}' conflicts with a value already registered at \
                 existing prefix '{existing_prefix}'"
            ),
            Self::EmptyWildcardName => f.write_str("wildcards must be named, e.g. ':id' or '*filepath'"),
            Self::InvalidParamSegment => f.write_str("only one wildcard per path segment is allowed"),
            Self::InvalidCatchAll => f.write_str("catch-alls are only allowed at the end of a path, after a '/'"),
            Self::PathMustStartWithSlash => f.write_str("path must begin with '/'"),
            Self::UnknownMethod { method } => write!(f, "invalid HTTP method '{method}'"),
        }
    }
}

impl error::Error for InsertError {}

impl InsertError {
    /// Builds a [`WildcardConflict`](InsertError::WildcardConflict) by walking down
    /// `current`'s first-child chain to reconstruct the full route it conflicts with.
    pub(crate) fn wildcard_conflict<V>(full_pattern: &[u8], remaining: &[u8], current: &Node<V>) -> Self {
        let mut existing = full_pattern.to_vec();
        existing.truncate(full_pattern.len() - remaining.len());
        if !existing.ends_with(current.prefix().as_bytes()) {
            // A catch-all's immediately preceding `/` is folded into its
            // matched value rather than stored in any node's prefix; restore
            // it here so the reconstructed prefix reads as a valid pattern.
            if current.kind() == NodeKind::CatchAll && !existing.ends_with(b"/") {
                existing.push(b'/');
            }
            existing.extend_from_slice(current.prefix().as_bytes());
        }

        let mut child = current.children().first();
        while let Some(node) = child {
            existing.extend_from_slice(node.prefix().as_bytes());
            child = node.children().first();
        }

        InsertError::WildcardConflict {
            segment: String::from_utf8_lossy(remaining).into_owned(),
            pattern: String::from_utf8_lossy(full_pattern).into_owned(),
            existing_wildcard: current.prefix().trim_start_matches('/').to_owned(),
            existing_prefix: String::from_utf8(existing).unwrap_or_default(),
        }
    }

    /// Builds a [`CatchAllConflictsWithValue`](InsertError::CatchAllConflictsWithValue)
    /// directly from byte offsets: the conflicting node here is the
    /// value-bearing prefix itself, not a sibling wildcard to walk down to.
    pub(crate) fn catch_all_conflicts_with_value(full_pattern: &[u8], remaining: &[u8]) -> Self {
        let existing_prefix = full_pattern[..full_pattern.len() - remaining.len()].to_vec();
        InsertError::CatchAllConflictsWithValue {
            pattern: String::from_utf8_lossy(full_pattern).into_owned(),
            existing_prefix: String::from_utf8(existing_prefix).unwrap_or_default(),
        }
    }
}

/// A failed lookup: no registered pattern matches the queried path.
///
/// This is not a programmer error. `tsr` is set when the path would match
/// if a trailing slash were added or removed — callers can use it to decide
/// whether to issue a redirect.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MatchError {
    /// Whether adding or removing a trailing `/` would produce a match.
    pub tsr: bool,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tsr {
            f.write_str("no matching route (trailing-slash redirect available)")
        } else {
            f.write_str("no matching route")
        }
    }
}

impl error::Error for MatchError {}
