//! The compressed trie storing registered patterns.
//!
//! A [`Node`] is both a single trie node and the tree itself (the root is
//! just a [`Node`] with [`NodeKind::Root`]). Insertion walks the tree
//! splitting nodes on their longest common prefix; lookup walks it matching
//! bytes (or, for case-insensitive lookup, case-folded code points) against
//! stored prefixes, descending into a wildcard child when static dispatch via
//! `indices` doesn't apply.

use std::mem;

use crate::error::InsertError;
use crate::params::Params;
use crate::path::{find_wildcard, fold_match_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Root,
    Static,
    Param,
    CatchAll,
}

/// A single node of the path tree.
///
/// `prefix` is the bytes this node consumes from a query path before
/// descending further; `indices` holds the first byte of each static child's
/// prefix, kept in the same (priority) order as `children` so a single
/// linear scan finds the right one. A node has either a non-empty `indices`
/// table *or* a single wildcard child (`wild_child`), never both: that
/// mutual exclusivity is what lets lookup avoid backtracking.
#[derive(Debug, Clone)]
pub struct Node<V> {
    prefix: Box<str>,
    kind: NodeKind,
    wild_child: bool,
    indices: Vec<u8>,
    children: Vec<Node<V>>,
    value: Option<V>,
    template: Option<Box<str>>,
    priority: u32,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self::leaf()
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn str_from(bytes: &[u8]) -> Box<str> {
    String::from_utf8_lossy(bytes).into_owned().into_boxed_str()
}

impl<V> Node<V> {
    pub(crate) fn new() -> Self {
        Self::leaf()
    }

    fn leaf() -> Self {
        Self {
            prefix: "".into(),
            kind: NodeKind::Static,
            wild_child: false,
            indices: Vec::new(),
            children: Vec::new(),
            value: None,
            template: None,
            priority: 1,
        }
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn children(&self) -> &[Node<V>] {
        &self.children
    }

    /// The `(value, template)` pair at this node's endpoint, if any. The two
    /// are always set and cleared together (invariant 8: `template` is
    /// present iff `value` is).
    fn endpoint(&self) -> Option<(&V, &str)> {
        match (&self.value, &self.template) {
            (Some(v), Some(t)) => Some((v, t)),
            _ => None,
        }
    }

    /// Registers `full` (already validated to start with `/`) with `value`.
    pub(crate) fn insert(&mut self, full: &[u8], value: V) -> Result<(), InsertError> {
        self.priority += 1;

        if self.prefix.is_empty() && self.children.is_empty() && self.value.is_none() {
            self.kind = NodeKind::Root;
            return self.insert_child(full, full, value);
        }

        self.insert_at(full, full, value)
    }

    fn insert_at(&mut self, path: &[u8], full: &[u8], value: V) -> Result<(), InsertError> {
        let common = common_prefix_len(path, self.prefix.as_bytes());

        if common < self.prefix.len() {
            self.split(common);
        }

        if common == path.len() {
            if self.value.is_some() {
                return Err(InsertError::Conflict {
                    with: String::from_utf8_lossy(full).into_owned(),
                });
            }
            self.value = Some(value);
            self.template = Some(str_from(full));
            return Ok(());
        }

        let path = &path[common..];
        let next = path[0];

        if let Some(i) = self.indices.iter().position(|&b| b == next) {
            self.bump_child_priority(i);
            return self.children[i].insert_at(path, full, value);
        }

        if next != b':' && next != b'*' && self.kind != NodeKind::CatchAll && !self.wild_child {
            self.indices.push(next);
            self.children.push(Node::leaf());
            let i = self.children.len() - 1;
            self.bump_child_priority(i);
            return self.children[i].insert_child(path, full, value);
        }

        if self.wild_child {
            let existing = self.children[0].prefix.as_bytes();
            let compatible = self.children[0].kind != NodeKind::CatchAll
                && path.len() >= existing.len()
                && path[..existing.len()] == *existing
                && (path.len() == existing.len() || path[existing.len()] == b'/');

            if compatible {
                self.children[0].priority += 1;
                return self.children[0].insert_at(path, full, value);
            }
            return Err(InsertError::wildcard_conflict(full, path, &self.children[0]));
        }

        if !self.children.is_empty() {
            return Err(InsertError::wildcard_conflict(full, path, self));
        }

        // A catch-all can never share the segment boundary of an endpoint
        // that's already registered ending in `/` — there's nothing left
        // for it to consume that isn't already claimed.
        if next == b'*' && self.value.is_some() && self.prefix.ends_with('/') {
            return Err(InsertError::catch_all_conflicts_with_value(full, path));
        }

        self.insert_child(path, full, value)
    }

    /// Splits this node's prefix at byte offset `at`, pushing everything
    /// past it (children, indices, value) into a new child.
    fn split(&mut self, at: usize) {
        let head: Box<str> = self.prefix[..at].into();
        let tail: Box<str> = self.prefix[at..].into();

        let child = Node {
            prefix: tail,
            kind: NodeKind::Static,
            wild_child: self.wild_child,
            indices: mem::take(&mut self.indices),
            children: mem::take(&mut self.children),
            value: self.value.take(),
            template: self.template.take(),
            priority: self.priority.saturating_sub(1),
        };

        let first_byte = child.prefix.as_bytes()[0];
        self.prefix = head;
        self.indices = vec![first_byte];
        self.children = vec![child];
        self.wild_child = false;
    }

    /// Bubbles `children[i]` towards the front in proportion to how often
    /// it (and therefore everything under it) has been visited, so
    /// frequently-hit static children are checked first.
    fn bump_child_priority(&mut self, i: usize) -> usize {
        self.children[i].priority += 1;
        let priority = self.children[i].priority;

        let mut pos = i;
        while pos > 0 && self.children[pos - 1].priority < priority {
            self.children.swap(pos - 1, pos);
            self.indices.swap(pos - 1, pos);
            pos -= 1;
        }
        pos
    }

    /// Builds out the remainder of a pattern (`path`) below `self`, which is
    /// either a freshly allocated leaf (the static-prefix case) or `self`
    /// unmodified with a wildcard sigil sitting at `path[0]` (the
    /// wildcard-attach case — see the two call sites in `insert_at`).
    fn insert_child(&mut self, path: &[u8], full: &[u8], value: V) -> Result<(), InsertError> {
        let (wildcard, wi) = match find_wildcard(path)? {
            Some(w) => w,
            None => {
                self.prefix = str_from(path);
                self.value = Some(value);
                self.template = Some(str_from(full));
                return Ok(());
            }
        };

        if wildcard.len() < 2 {
            return Err(InsertError::EmptyWildcardName);
        }

        if wi > 0 {
            self.prefix = str_from(&path[..wi]);
        }

        if wildcard[0] == b'*' {
            // The slash immediately before a catch-all belongs to its match,
            // not the static prefix: `/src/*filepath` captures `filepath` as
            // `/some/file.png` for query `/src/some/file.png`, leading slash
            // included. So it's pulled back out of `self.prefix` here rather
            // than staying consumed by the node above.
            if !self.prefix.ends_with('/') {
                return Err(InsertError::InvalidCatchAll);
            }
            if wi + wildcard.len() != path.len() {
                return Err(InsertError::InvalidCatchAll);
            }
            self.prefix = self.prefix[..self.prefix.len() - 1].into();

            let mut child = Node::leaf();
            child.kind = NodeKind::CatchAll;
            child.prefix = str_from(wildcard);
            child.value = Some(value);
            child.template = Some(str_from(full));

            self.wild_child = true;
            self.children = vec![child];
            return Ok(());
        }

        let mut child = Node::leaf();
        child.kind = NodeKind::Param;
        child.prefix = str_from(wildcard);

        self.wild_child = true;
        self.children = vec![child];

        let rest = &path[wi + wildcard.len()..];
        if rest.is_empty() {
            self.children[0].value = Some(value);
            self.children[0].template = Some(str_from(full));
            return Ok(());
        }

        if rest[0] != b'/' {
            return Err(InsertError::InvalidParamSegment);
        }

        self.children[0].children = vec![Node::leaf()];
        self.children[0].indices = vec![rest[0]];
        self.children[0].children[0].insert_child(rest, full, value)
    }

    /// Exact-match lookup. On success, fills `params` (in the order the
    /// corresponding wildcards occur in the pattern) and returns the value
    /// alongside the matched template; on a miss, rolls back any partial
    /// `params` writes.
    pub(crate) fn lookup<'v>(&'v self, path: &[u8], params: &mut Params) -> Option<(&'v V, &'v str)> {
        let prefix = self.prefix.as_bytes();

        if path.len() < prefix.len() || &path[..prefix.len()] != prefix {
            return None;
        }
        let rest = &path[prefix.len()..];

        if rest.is_empty() {
            return self.endpoint();
        }

        if self.wild_child {
            return self.children[0].lookup_wildcard(rest, params);
        }

        let idx = self.indices.iter().position(|&b| b == rest[0])?;
        self.children[idx].lookup(rest, params)
    }

    /// Like [`lookup`](Self::lookup), but on a miss also checks whether
    /// toggling `path`'s trailing slash would have matched, for a
    /// trailing-slash redirect hint.
    pub(crate) fn lookup_with_tsr<'v>(&'v self, path: &str, params: &mut Params) -> Result<(&'v V, &'v str), bool> {
        if let Some(found) = self.lookup(path.as_bytes(), params) {
            return Ok(found);
        }

        let toggled = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
            Some(_) => return Err(false),
            None => format!("{path}/"),
        };

        let mut scratch = Params::default();
        Err(self.lookup(toggled.as_bytes(), &mut scratch).is_some())
    }

    fn lookup_wildcard<'v>(&'v self, rest: &[u8], params: &mut Params) -> Option<(&'v V, &'v str)> {
        match self.kind {
            NodeKind::Param => {
                let end = rest.iter().position(|&b| b == b'/').unwrap_or(rest.len());
                if end == 0 {
                    return None;
                }
                let value = std::str::from_utf8(&rest[..end]).ok()?;
                let name = self.prefix.trim_start_matches(':');

                let before = params.len();
                params.push(name, value);

                let result = if end == rest.len() {
                    self.endpoint()
                } else if !self.children.is_empty() {
                    self.children[0].lookup(&rest[end..], params)
                } else {
                    None
                };

                if result.is_none() {
                    params.truncate(before);
                }
                result
            }
            NodeKind::CatchAll => {
                let value = std::str::from_utf8(rest).ok()?;
                let name = self.prefix.trim_start_matches('*');
                let result = self.endpoint();
                if result.is_some() {
                    params.push(name, value);
                }
                result
            }
            NodeKind::Root | NodeKind::Static => unreachable!("invalid node type"),
        }
    }

    /// Case-insensitive lookup. Matches code points via Unicode case
    /// folding but writes the *registered* casing into `out`, except for a
    /// catch-all's tail, which is copied verbatim from the query.
    pub(crate) fn lookup_case_insensitive<'v>(&'v self, path: &str, params: &mut Params, out: &mut String) -> Option<(&'v V, &'v str)> {
        let consumed = fold_match_len(&self.prefix, path)?;

        out.push_str(&self.prefix);
        let rest = &path[consumed..];

        if rest.is_empty() {
            return self.endpoint();
        }

        if self.wild_child {
            return self.children[0].lookup_wildcard_ci(rest, params, out);
        }

        for (i, &b) in self.indices.iter().enumerate() {
            if b.to_ascii_lowercase() == rest.as_bytes()[0].to_ascii_lowercase() {
                return self.children[i].lookup_case_insensitive(rest, params, out);
            }
        }
        None
    }

    /// Top-level entry point for case-insensitive lookup. When the plain
    /// walk misses and `fix_trailing_slash` is set, retries once with the
    /// query's trailing slash toggled — the same toggle-and-retry
    /// simplification [`lookup_with_tsr`](Self::lookup_with_tsr) uses for
    /// the exact-match redirect hint, rather than repairing the slash
    /// inline mid-walk.
    pub(crate) fn lookup_case_insensitive_with_tsr<'v>(
        &'v self,
        path: &str,
        fix_trailing_slash: bool,
        params: &mut Params,
        out: &mut String,
    ) -> Option<(&'v V, &'v str)> {
        if let Some(found) = self.lookup_case_insensitive(path, params, out) {
            return Some(found);
        }

        if !fix_trailing_slash {
            return None;
        }

        let toggled = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
            Some(_) => return None,
            None => format!("{path}/"),
        };

        params.clear();
        out.clear();
        self.lookup_case_insensitive(&toggled, params, out)
    }

    fn lookup_wildcard_ci<'v>(&'v self, rest: &str, params: &mut Params, out: &mut String) -> Option<(&'v V, &'v str)> {
        match self.kind {
            NodeKind::Param => {
                let end = rest.find('/').unwrap_or(rest.len());
                if end == 0 {
                    return None;
                }
                let value = &rest[..end];
                let name = self.prefix.trim_start_matches(':');

                let before = params.len();
                params.push(name, value);
                out.push_str(value);

                let matched = if end == rest.len() {
                    self.endpoint()
                } else if !self.children.is_empty() {
                    self.children[0].lookup_case_insensitive(&rest[end..], params, out)
                } else {
                    None
                };

                if matched.is_none() {
                    params.truncate(before);
                    out.truncate(out.len() - value.len());
                }
                matched
            }
            NodeKind::CatchAll => {
                let result = self.endpoint();
                if result.is_some() {
                    out.push_str(rest);
                    params.push(self.prefix.trim_start_matches('*'), rest);
                }
                result
            }
            NodeKind::Root | NodeKind::Static => unreachable!("invalid node type"),
        }
    }

    /// Checks the structural invariant insertion must maintain: a node
    /// never carries both a wildcard child and indexed static children, and
    /// `indices` always has exactly one byte per child. Used by tests only.
    #[cfg(test)]
    fn check_priorities(&self) {
        if self.wild_child {
            assert_eq!(self.children.len(), 1, "wild_child node must have exactly one child");
            assert!(self.indices.is_empty(), "wild_child node must not also index static children");
        } else {
            assert_eq!(self.indices.len(), self.children.len(), "indices/children out of sync");
        }
        for child in &self.children {
            child.check_priorities();
        }
    }
}
