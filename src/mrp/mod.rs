//! Matrix Representation with Parsimony (MRP) of source trees.
//!
//! Each clade of each source tree becomes one additive binary character.
//! Trees on different taxon sets are combined over a shared taxon superset,
//! taxa missing from a tree being coded `?`, and rooted by the synthetic
//! all-zero [MRP_OUTGROUP] row.
//!
//! # Quick API
//! * [`assemble`] - encodes trees and returns the matrix text
//!
//! # Full API
//! * [`MrpMatrix::assemble`] - encodes trees into an [`MrpMatrix`]
//! * [`MrpMatrix::write`] - serializes it as [`MatrixFormat::Hennig`] or
//!   [`MatrixFormat::Nexus`]

mod defs;
mod matrix;
mod writer;

pub use self::matrix::{CharacterBlock, DEFAULT_WEIGHT, MRP_OUTGROUP, MrpCell, MrpMatrix};
pub use self::writer::{MatrixFormat, format_weight};

use crate::error::SupertreeError;
use std::collections::HashMap;

/// Encodes the named trees over `taxa_superset` and returns the matrix in
/// the named format (`hennig`, `tnt` or `nexus`).
///
/// # Errors
/// * [SupertreeError::MatrixFormat] for an unknown format name
/// * any error of [MrpMatrix::assemble]
///
/// # Example
/// ```
/// use mrptree::mrp::{assemble, MRP_OUTGROUP};
///
/// let trees = [("t1", "((A,B),C);")];
/// let nexus = assemble(&trees, &[MRP_OUTGROUP, "A", "B", "C"], None, "nexus", false).unwrap();
/// assert!(nexus.contains("\tcharset t1 = 1-2;\n"));
/// ```
pub fn assemble<N, T, S>(
    trees: &[(N, T)],
    taxa_superset: &[S],
    weights: Option<&HashMap<String, f64>>,
    format: &str,
    quote_taxa: bool,
) -> Result<String, SupertreeError>
where
    N: AsRef<str>,
    T: AsRef<str>,
    S: AsRef<str>,
{
    let format: MatrixFormat = format.parse()?;
    MrpMatrix::assemble(trees, taxa_superset, weights)?.write(format, quote_taxa)
}
