//! Duplicate resolution within a single rename batch.
//!
//! Runs over the full proposed-name sequence after transformation and before
//! validation. Logically independent of both: plain strings in, marked
//! strings out.

use std::collections::HashSet;

/// Suffix appended to disambiguate repeated proposed names.
pub const DUPLICATE_MARKER: &str = "_DUPLICATE";

/// Guarantee uniqueness within one batch, in encounter order.
///
/// The first occurrence of a name wins unmodified. Every later occurrence
/// of the same string gets `DUPLICATE_MARKER` appended; the marked result
/// is itself claimed, so triple collisions keep accumulating markers rather
/// than silently overwriting each other.
pub fn resolve_duplicates(proposed: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(proposed.len());
    let mut resolved = Vec::with_capacity(proposed.len());

    for name in proposed {
        let mut candidate = name.clone();
        while used.contains(&candidate) {
            candidate.push_str(DUPLICATE_MARKER);
        }
        used.insert(candidate.clone());
        resolved.push(candidate);
    }

    resolved
}
