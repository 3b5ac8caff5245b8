//! Mrptree prepares phylogenetic source trees for supertree analysis.
//!
//! Source trees collected from publications rarely agree on taxon names,
//! sometimes place one taxon at several candidate positions, and must
//! finally be combined into a single matrix. Core functionality provided:
//! - Labels: canonical comparison of quoted/unquoted, spaced/underscored
//!   taxon names and quoting for Newick output. See [crate::label].
//! - Newick: a multifurcating tree model ([PhyloTree]) with parser,
//!   writer, and a span-preserving tokenizer. See [crate::newick] and
//!   [crate::model].
//! - Substitution: replace one taxon by one or several others, or delete
//!   it, in one tree or in many trees in parallel. See [crate::substitution].
//! - Cleanup: collapse single-child vertices, merge duplicated sibling
//!   taxa, drop `%N` markers that are no longer ambiguous. See
//!   [crate::cleanup].
//! - Permutation: resolve taxa marked `A%1`, `A%2`, ... into the family of
//!   distinct concrete trees. See [crate::permutation].
//! - MRP: encode trees as a binary character matrix in Hennig86/TNT or
//!   NEXUS format. See [crate::mrp].
//!
//! All operations take Newick strings and return new Newick strings (or
//! matrix text); nothing is shared between calls.
//!
//! # Usage patterns
//!
//! Delete a taxon:
//! ```
//! use mrptree::substitute_taxon;
//!
//! let tree = substitute_taxon("((A,B),F,E,(G,H));", "H", None).unwrap();
//! assert_eq!(tree.as_deref(), Some("((A, B), F, E, G);"));
//! ```
//!
//! Resolve a tree with non-monophyletic taxa and encode all resolutions:
//! ```
//! use mrptree::permutation::PermutationEngine;
//! use mrptree::mrp::MatrixFormat;
//!
//! let family = PermutationEngine::new()
//!     .with_max_candidates(1_000)
//!     .permute("((A%1,B),C,(A%2,D));")?;
//! let matrix = family.to_matrix()?;
//! let hennig = matrix.write(MatrixFormat::Hennig, false)?;
//! assert!(hennig.starts_with("xread\n"));
//! # Ok::<(), mrptree::SupertreeError>(())
//! ```

pub mod cleanup;
pub mod error;
pub mod label;
pub mod model;
pub mod mrp;
pub mod newick;
pub mod parser;
pub mod permutation;
pub mod substitution;

pub use crate::error::SupertreeError;
pub use crate::model::PhyloTree;
pub use crate::parser::ParsingError;

use crate::newick::NewickParser;
use crate::parser::ByteParser;
use crate::substitution::substitute;
use std::fs;
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string, returning a [PhyloTree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    newick::parse_str(newick)
}

/// Parse a file containing a list of semicolon-terminated Newick strings.
///
/// # Errors
/// [SupertreeError::Io] if the file cannot be read,
/// [SupertreeError::Parse] for the first malformed tree.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<Vec<PhyloTree>, SupertreeError> {
    let contents = fs::read(path)?;
    let mut byte_parser = ByteParser::for_bytes(&contents);
    Ok(NewickParser::new().parse_all(&mut byte_parser)?)
}

// ============================================================================
// Quick Substitution API
// ============================================================================
/// Substitutes taxon `old` by the `new` taxa (deletes it for `None`),
/// without filtering new taxa already in the tree.
///
/// # Returns
/// The cleaned tree, or `None` if the tree became unusable.
///
/// See [`substitution::substitute`] for full documentation.
pub fn substitute_taxon(
    tree: &str,
    old: &str,
    new: Option<&[String]>,
) -> Result<Option<String>, SupertreeError> {
    Ok(substitute(tree, old, new, false)?.into_tree())
}
