//! Encoding of source trees as additive binary characters.

use crate::error::SupertreeError;
use crate::label;
use crate::model::{PhyloTree, Vertex};
use crate::newick::{parse_str, requote_tree};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

/// Name of the synthetic all-zero row rooting every character.
pub const MRP_OUTGROUP: &str = "MRP_Outgroup";

/// Weight of characters of trees without an explicit weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// State of one taxon for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MrpCell {
    /// Taxon is in the source tree, outside the clade (or the outgroup)
    Zero,
    /// Taxon is in the clade
    One,
    /// Taxon is not in the source tree
    Missing,
}

impl MrpCell {
    pub fn symbol(self) -> char {
        match self {
            MrpCell::Zero => '0',
            MrpCell::One => '1',
            MrpCell::Missing => '?',
        }
    }
}

impl fmt::Display for MrpCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The contiguous characters derived from one source tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterBlock {
    /// Name of the source tree
    pub name: String,
    /// First character, 1-indexed
    pub first: usize,
    /// Last character, 1-indexed and inclusive
    pub last: usize,
    pub weight: f64,
}

impl CharacterBlock {
    /// Number of characters in this block.
    pub fn len(&self) -> usize {
        self.last + 1 - self.first
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 0-indexed positions of this block's characters.
    pub fn columns(&self) -> std::ops::Range<usize> {
        self.first - 1..self.last
    }
}

// =#========================================================================#=
// MRP MATRIX
// =#========================================================================#=
/// Matrix representation of a set of source trees: one row per taxon of
/// the superset, one binary character per clade of each tree.
///
/// Every clade of a tree, including the root, becomes one character, in
/// post-order: `1` for the taxa of the clade, `0` for the other taxa of
/// the tree and for [MRP_OUTGROUP], `?` for taxa missing from the tree.
/// A fully resolved tree on `n` leaves thus yields `n - 1` characters.
///
/// # Example
/// ```
/// use mrptree::mrp::{MrpMatrix, MRP_OUTGROUP};
///
/// let trees = [("t1", "((A,B),C);"), ("t2", "(A,(C,D));")];
/// let taxa = [MRP_OUTGROUP, "A", "B", "C", "D"];
/// let matrix = MrpMatrix::assemble(&trees, &taxa, None).unwrap();
/// assert_eq!(matrix.num_characters(), 4);
/// assert_eq!(matrix.row_string(1), "1101");
/// assert_eq!(matrix.row_string(4), "??11");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MrpMatrix {
    taxa: Vec<String>,
    blocks: Vec<CharacterBlock>,
    rows: Vec<Vec<MrpCell>>,
    weighted: bool,
}

impl MrpMatrix {
    /// Encodes the named trees over the given taxa, in the given order.
    ///
    /// With `weights`, each character inherits the weight of its tree
    /// (default [DEFAULT_WEIGHT]) and the Hennig output lists the weights.
    ///
    /// # Errors
    /// * [SupertreeError::MatrixInput] if `trees` is empty, the taxa repeat,
    ///   a tree has the same taxon on several leaves, or a tree has a leaf
    ///   that is not in `taxa`
    /// * [SupertreeError::Parse] (naming the tree) for invalid Newick
    pub fn assemble<N, T, S>(
        trees: &[(N, T)],
        taxa: &[S],
        weights: Option<&HashMap<String, f64>>,
    ) -> Result<Self, SupertreeError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
        S: AsRef<str>,
    {
        if trees.is_empty() {
            return Err(SupertreeError::MatrixInput(
                "no source trees given".to_string(),
            ));
        }

        let taxa: Vec<String> = taxa.iter().map(|taxon| label::canonical(taxon.as_ref())).collect();
        let known: HashSet<&str> = taxa.iter().map(String::as_str).collect();
        if known.len() != taxa.len() {
            return Err(SupertreeError::MatrixInput(
                "taxon superset contains duplicates".to_string(),
            ));
        }

        let mut matrix = MrpMatrix {
            rows: vec![Vec::new(); taxa.len()],
            taxa: taxa.clone(),
            blocks: Vec::with_capacity(trees.len()),
            weighted: weights.is_some(),
        };

        for (name, newick) in trees {
            let name = name.as_ref();
            let tree = parse_str(requote_tree(newick.as_ref()))
                .map_err(|error| SupertreeError::from(error).in_tree(name))?;

            let leaves: HashSet<String> = tree.leaf_set().into_iter().collect();
            if leaves.len() != tree.num_leaves() {
                return Err(SupertreeError::MatrixInput(format!(
                    "tree '{name}' contains a taxon more than once, resolve it by permutation first"
                )));
            }
            let missing: Vec<&String> = leaves
                .iter()
                .filter(|leaf| !known.contains(leaf.as_str()))
                .collect();
            if !missing.is_empty() {
                return Err(SupertreeError::MatrixInput(format!(
                    "taxa {missing:?} of tree '{name}' are not in the taxon superset"
                )));
            }

            let weight = weights
                .and_then(|weights| weights.get(name).copied())
                .unwrap_or(DEFAULT_WEIGHT);
            matrix.push_tree(name, &tree, &leaves, weight);
        }

        Ok(matrix)
    }

    /// Appends the characters of one tree as a new block.
    fn push_tree(&mut self, name: &str, tree: &PhyloTree, leaves: &HashSet<String>, weight: f64) {
        let mut tree = tree.clone();
        tree.collapse_single_child_nodes();

        if tree.num_leaves() < 2 || tree.num_internal() == 0 {
            warn!(
                error = %SupertreeError::UninformativeTree(name.to_string()),
                "Encoding tree as a single all-ones character"
            );
        }

        let clades: Vec<HashSet<String>> = tree
            .post_order_iter()
            .filter(|vertex| !vertex.is_leaf())
            .map(Vertex::index)
            .map(|clade| {
                tree.descendant_leaves(clade)
                    .into_iter()
                    .map(|leaf| tree.leaf_canonical(leaf))
                    .collect()
            })
            .collect();

        let first = self.num_characters() + 1;
        for (taxon, row) in self.taxa.iter().zip(self.rows.iter_mut()) {
            for clade in &clades {
                let cell = if taxon == MRP_OUTGROUP {
                    MrpCell::Zero
                } else if !leaves.contains(taxon) {
                    MrpCell::Missing
                } else if clade.contains(taxon) {
                    MrpCell::One
                } else {
                    MrpCell::Zero
                };
                row.push(cell);
            }
        }

        debug!(tree = name, characters = clades.len(), first, "Encoded tree");
        self.blocks.push(CharacterBlock {
            name: name.to_string(),
            first,
            last: first + clades.len() - 1,
            weight,
        });
    }

    /// Returns the row taxa (canonical form), in row order.
    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    /// Returns the character blocks, one per source tree, in input order.
    pub fn blocks(&self) -> &[CharacterBlock] {
        &self.blocks
    }

    /// Returns the cells of the given row.
    pub fn row(&self, index: usize) -> &[MrpCell] {
        &self.rows[index]
    }

    /// Returns the row of a taxon, if it is part of the matrix.
    pub fn row_of(&self, taxon: &str) -> Option<&[MrpCell]> {
        let canonical = label::canonical(taxon);
        self.taxa
            .iter()
            .position(|t| *t == canonical)
            .map(|index| self.row(index))
    }

    /// Returns the given row as a string of `0`, `1` and `?`.
    pub fn row_string(&self, index: usize) -> String {
        self.rows[index].iter().map(|cell| cell.symbol()).collect()
    }

    pub fn num_taxa(&self) -> usize {
        self.taxa.len()
    }

    /// Total number of characters across all blocks.
    pub fn num_characters(&self) -> usize {
        self.blocks.last().map_or(0, |block| block.last)
    }

    /// Returns whether weights were supplied on assembly.
    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Groups the 0-indexed characters by weight, in order of first
    /// appearance of each weight.
    pub fn weight_groups(&self) -> Vec<(f64, Vec<usize>)> {
        let mut groups: Vec<(f64, Vec<usize>)> = Vec::new();
        for block in &self.blocks {
            match groups.iter_mut().find(|(weight, _)| *weight == block.weight) {
                Some((_, columns)) => columns.extend(block.columns()),
                None => groups.push((block.weight, block.columns().collect())),
            }
        }
        groups
    }
}
