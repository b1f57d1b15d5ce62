//! Text normalization for extracted values.
//!
//! Stands in for the normalization collaborator of the surrounding
//! platform: text in, text out, no document access.

/// Trim the input and collapse every whitespace run (including non-breaking
/// spaces) into a single space.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
