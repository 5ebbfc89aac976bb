//! An HTTP-method-indexed matcher: one tree per method, one shared pool.

use std::collections::HashMap;

use crate::error::{InsertError, MatchError};
use crate::matcher::Match;
use crate::params::{Params, Pool};
use crate::path::count_params;
use crate::tree::Node;

const METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "CONNECT", "OPTIONS", "TRACE",
];

/// Associates HTTP endpoints (a method plus a parameterized path) with
/// values, and computes `Allow` headers for paths that exist under some
/// method but not the one requested.
///
/// One tree per method keeps methods independent (a `GET` and a `POST` on
/// the same path are unrelated registrations); a single [`Pool`] is shared
/// across all of them since only one lookup is ever in flight per matcher
/// call.
///
/// ```
/// use pathmatcher::HttpMatcher;
///
/// let mut matcher = HttpMatcher::new();
/// matcher.register("GET", "/users/:id", "get user").unwrap();
/// matcher.register("POST", "/users", "create user").unwrap();
///
/// assert!(matcher.lookup("GET", "/users/42").is_ok());
/// assert_eq!(matcher.allowed("/users"), "OPTIONS, POST");
/// ```
#[derive(Debug, Default)]
pub struct HttpMatcher<V> {
    trees: HashMap<&'static str, Node<V>>,
    pool: Pool,
}

impl<V> HttpMatcher<V> {
    /// Creates an empty matcher.
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
            pool: Pool::new(),
        }
    }

    /// Registers `pattern` under `method` to resolve to `value`.
    ///
    /// `method` must be one of the nine verbs defined by RFC 9110 (`GET`,
    /// `HEAD`, `POST`, `PUT`, `PATCH`, `DELETE`, `CONNECT`, `OPTIONS`,
    /// `TRACE`); anything else is rejected with
    /// [`InsertError::UnknownMethod`].
    pub fn register(&mut self, method: &str, pattern: &str, value: V) -> Result<(), InsertError> {
        let method = METHODS
            .iter()
            .find(|&&m| m == method)
            .copied()
            .ok_or_else(|| InsertError::UnknownMethod { method: method.to_owned() })?;

        if !pattern.starts_with('/') {
            return Err(InsertError::PathMustStartWithSlash);
        }

        let tree = self.trees.entry(method).or_insert_with(Node::new);
        tree.insert(pattern.as_bytes(), value)?;
        self.pool.observe_max_params(count_params(pattern));
        Ok(())
    }

    /// Matches `path` against the patterns registered under `method`.
    pub fn lookup(&self, method: &str, path: &str) -> Result<Match<'_, V>, MatchError> {
        let Some(tree) = self.trees.get(method) else {
            return Err(MatchError { tsr: false });
        };

        let mut params = self.pool.acquire();
        match tree.lookup_with_tsr(path, &mut params) {
            Ok((value, template)) => Ok(Match { value, template, params }),
            Err(tsr) => {
                self.pool.release(params);
                Err(MatchError { tsr })
            }
        }
    }

    /// Computes the value of an `Allow` header for `path`.
    ///
    /// `path == "*"` (the `OPTIONS *` request-target form) lists every
    /// method that has at least one registered pattern, regardless of
    /// whether it matches any particular path. Otherwise, lists every
    /// method under which `path` specifically resolves. `OPTIONS` is always
    /// included. Methods are returned sorted and comma-joined.
    pub fn allowed(&self, path: &str) -> String {
        let mut allowed: Vec<&'static str> = vec!["OPTIONS"];

        if path == "*" {
            for &method in self.trees.keys() {
                if method != "OPTIONS" {
                    allowed.push(method);
                }
            }
        } else {
            for (&method, tree) in &self.trees {
                if method == "OPTIONS" {
                    continue;
                }
                let mut scratch = Params::default();
                if tree.lookup(path.as_bytes(), &mut scratch).is_some() {
                    allowed.push(method);
                }
            }
        }

        allowed.sort_unstable();
        allowed.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_method() {
        let mut m = HttpMatcher::<()>::new();
        assert_eq!(
            m.register("FETCH", "/x", ()),
            Err(InsertError::UnknownMethod { method: "FETCH".into() })
        );
    }

    #[test]
    fn methods_are_independent_trees() {
        let mut m = HttpMatcher::new();
        m.register("GET", "/users/:id", "get").unwrap();
        m.register("DELETE", "/users/:id", "delete").unwrap();

        assert_eq!(*m.lookup("GET", "/users/1").unwrap().value, "get");
        assert_eq!(*m.lookup("DELETE", "/users/1").unwrap().value, "delete");
        assert!(m.lookup("POST", "/users/1").is_err());
    }

    #[test]
    fn allowed_lists_sorted_methods_for_path() {
        let mut m = HttpMatcher::new();
        m.register("GET", "/users", "list").unwrap();
        m.register("POST", "/users", "create").unwrap();
        m.register("DELETE", "/users/:id", "delete").unwrap();

        assert_eq!(m.allowed("/users"), "GET, OPTIONS, POST");
    }

    #[test]
    fn allowed_star_lists_every_registered_method() {
        let mut m = HttpMatcher::new();
        m.register("GET", "/users", "list").unwrap();
        m.register("DELETE", "/users/:id", "delete").unwrap();
        m.register("POST", "/other", "x").unwrap();

        assert_eq!(m.allowed("*"), "DELETE, GET, OPTIONS, POST");
    }
}
