//! A plain path matcher: one tree, one pooled parameter buffer.

use crate::error::{InsertError, MatchError};
use crate::params::{Params, Pool};
use crate::path::count_params;
use crate::tree::Node;

/// A successful lookup: the value registered at the matched pattern, plus
/// the parameters captured along the way.
///
/// `params` comes from the matcher's pool of buffers; it is yours to keep,
/// but there's no need to return it anywhere — letting it drop is fine,
/// just like the pattern it's on loan from.
#[derive(Debug)]
pub struct Match<'v, V> {
    pub value: &'v V,
    /// The exact pattern string as registered, e.g. `/users/:id`.
    pub template: &'v str,
    pub params: Params,
}

/// Stores parameterized path patterns and matches query paths against them.
///
/// ```
/// use pathmatcher::PathMatcher;
///
/// let mut matcher = PathMatcher::new();
/// matcher.register("/users/:id", "user by id").unwrap();
///
/// let m = matcher.lookup("/users/42").unwrap();
/// assert_eq!(*m.value, "user by id");
/// assert_eq!(m.template, "/users/:id");
/// assert_eq!(m.params.get("id"), "42");
/// ```
#[derive(Debug, Default)]
pub struct PathMatcher<V> {
    tree: Node<V>,
    pool: Pool,
}

impl<V> PathMatcher<V> {
    /// Creates an empty matcher.
    pub fn new() -> Self {
        Self {
            tree: Node::new(),
            pool: Pool::new(),
        }
    }

    /// Registers `pattern` (which must start with `/`) to resolve to `value`.
    ///
    /// Returns an [`InsertError`] if `pattern` is malformed or conflicts
    /// with a pattern already registered.
    pub fn register(&mut self, pattern: &str, value: V) -> Result<(), InsertError> {
        if !pattern.starts_with('/') {
            return Err(InsertError::PathMustStartWithSlash);
        }

        self.tree.insert(pattern.as_bytes(), value)?;
        self.pool.observe_max_params(count_params(pattern));
        Ok(())
    }

    /// Matches `path` against the registered patterns.
    ///
    /// On a miss, the [`MatchError`] carries a trailing-slash redirect hint:
    /// `tsr` is `true` if toggling `path`'s trailing slash would match.
    pub fn lookup(&self, path: &str) -> Result<Match<'_, V>, MatchError> {
        let mut params = self.pool.acquire();
        match self.tree.lookup_with_tsr(path, &mut params) {
            Ok((value, template)) => Ok(Match { value, template, params }),
            Err(tsr) => {
                self.pool.release(params);
                Err(MatchError { tsr })
            }
        }
    }

    /// Case-insensitive variant of [`lookup`](Self::lookup).
    ///
    /// Matches `path` by Unicode case folding against the registered
    /// patterns and returns the canonically-cased path alongside the value,
    /// which a caller can use to issue a redirect to the correctly-cased
    /// URL. Parameter *values* (as opposed to the static text around them)
    /// are taken verbatim from `path`, not folded.
    ///
    /// When `fix_trailing_slash` is set and the plain case-insensitive walk
    /// misses only because of a trailing-slash mismatch between `path` and
    /// the registered pattern, retries once with the slash toggled.
    pub fn lookup_case_insensitive(
        &self,
        path: &str,
        fix_trailing_slash: bool,
    ) -> Option<(String, Match<'_, V>)> {
        let mut params = self.pool.acquire();
        let mut out = String::with_capacity(path.len());

        match self
            .tree
            .lookup_case_insensitive_with_tsr(path, fix_trailing_slash, &mut params, &mut out)
        {
            Some((value, template)) => Some((out, Match { value, template, params })),
            None => {
                self.pool.release(params);
                None
            }
        }
    }
}
