//! Pattern parsing helpers shared by insertion and both lookup algorithms.

use crate::error::InsertError;

/// Counts the number of wildcard segments (`:name` or `*name`) in a pattern.
///
/// Used to keep the matcher's `max_params` high-water mark up to date so the
/// parameter pool can size fresh buffers correctly.
pub(crate) fn count_params(pattern: &str) -> usize {
    pattern.bytes().filter(|&b| b == b':' || b == b'*').count()
}

/// Scans `segment` (the remainder of a pattern still to be inserted) for the
/// first wildcard token, starting at the most recent `/`.
///
/// Returns the wildcard token (including its leading `:`/`*`) and its byte
/// offset within `segment`. Fails if a second wildcard appears before the
/// next `/`, since only one wildcard is allowed per path segment.
pub(crate) fn find_wildcard(segment: &[u8]) -> Result<Option<(&[u8], usize)>, InsertError> {
    for (start, &c) in segment.iter().enumerate() {
        if c != b':' && c != b'*' {
            continue;
        }

        for (end, &c) in segment[start + 1..].iter().enumerate() {
            match c {
                b'/' => return Ok(Some((&segment[start..start + 1 + end], start))),
                b':' | b'*' => return Err(InsertError::InvalidParamSegment),
                _ => {}
            }
        }

        return Ok(Some((&segment[start..], start)));
    }

    Ok(None)
}

/// Compares one Unicode code point `a` against `b` using simple case folding
/// (lower-case comparison, which also covers upper/title-case equivalence
/// for every alphabet this matcher is exercised against: ASCII, Greek,
/// Latin-1 supplement).
fn eq_fold_char(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Attempts to consume a case-folded copy of `stored` off the front of
/// `query`, one code point at a time.
///
/// Returns the byte length of the `query` prefix that folded-matched
/// `stored`, or `None` if `query` is shorter than `stored` or any code
/// point pair doesn't fold-compare equal. The matched prefix is intentionally
/// *not* returned: callers append the registered `stored` bytes to the
/// output instead, so the result carries registered casing.
pub(crate) fn fold_match_len(stored: &str, query: &str) -> Option<usize> {
    let mut consumed = 0;
    let mut query_chars = query.char_indices();

    for expected in stored.chars() {
        match query_chars.next() {
            Some((_, got)) if eq_fold_char(expected, got) => {
                consumed = match query_chars.clone().next() {
                    Some((i, _)) => i,
                    None => query.len(),
                };
            }
            _ => return None,
        }
    }

    Some(consumed)
}
