//! A parameterized path matcher: a compressed trie mapping URL-style
//! patterns (`:name` parameters, `*name` catch-alls) to values of any type,
//! with conflict detection at registration time, Unicode-aware
//! case-insensitive lookup, trailing-slash redirect hints, and a pooled
//! parameter buffer so repeated lookups don't pay for an allocation each
//! time.
//!
//! Two front-ends are provided: [`PathMatcher`] for a single namespace of
//! patterns, and [`HttpMatcher`] for HTTP endpoints (method + pattern),
//! which can also compute an `Allow` header.

#![forbid(unsafe_code)]

mod error;
mod http;
mod matcher;
mod params;
mod path;
mod tree;

pub use error::{InsertError, MatchError};
pub use http::HttpMatcher;
pub use matcher::{Match, PathMatcher};
pub use params::Params;
