//! Constants for Newick tokenizing and parsing.

/// Newick label delimiters: parentheses, comma, colon, semicolon, comments
/// (whitespace is handled separately).
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"(),:;[]";

/// Separator between children in [NewickStyle::Spaced](crate::newick::NewickStyle::Spaced) output.
pub(crate) const SPACED_SEPARATOR: &str = ", ";
