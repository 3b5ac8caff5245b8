//! Collapse and polytomy cleanup of source trees.
//!
//! After every substitution or permutation step the tree is normalised:
//! * single-child vertices are spliced out,
//! * sibling leaves sharing a base name (`A`, `A%1`, `A%2`, ...) are merged
//!   into one, keeping the leftmost,
//! * a `%N` suffix is stripped once its leaf is the only numbered one left
//!   for that base name,
//! * leaves that still share a name are numbered apart (`A`, `A` becomes
//!   `A%1`, `A%2`), so they form an ambiguity group.
//!
//! Cleanup never fails: a tree that cannot be (re)parsed becomes
//! [Cleaned::Unusable] and a warning is logged.

use crate::label;
use crate::model::{PhyloTree, VertexIndex};
use crate::newick::{NewickStyle, parse_str};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Upper bound of [collapse_nodes] passes run by [collapse_to_fixpoint]
/// with default settings.
pub const MAX_COLLAPSE_ITERATIONS: usize = 10;

/// Result of a cleanup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleaned {
    /// The normalised Newick string
    Tree(String),
    /// The tree could not be parsed before or after normalisation
    Unusable,
}

impl Cleaned {
    /// Returns the cleaned Newick string, or `None` if unusable.
    pub fn into_tree(self) -> Option<String> {
        match self {
            Cleaned::Tree(newick) => Some(newick),
            Cleaned::Unusable => None,
        }
    }

    pub fn is_unusable(&self) -> bool {
        matches!(self, Cleaned::Unusable)
    }
}

/// Runs one full cleanup pass on a Newick string: collapse single-child
/// vertices, merge duplicate siblings, strip lone `%N` suffixes, number
/// repeated leaf names.
///
/// The output is written in [NewickStyle::Spaced] and is a fixpoint:
/// cleaning it again returns it unchanged.
///
/// # Example
/// ```
/// use mrptree::cleanup::{collapse_nodes, Cleaned};
///
/// let cleaned = collapse_nodes("((A%1,A%2),(B),C);");
/// assert_eq!(cleaned, Cleaned::Tree("(A, B, C);".to_string()));
/// ```
pub fn collapse_nodes(newick: &str) -> Cleaned {
    let mut tree = match parse_str(newick) {
        Ok(tree) => tree,
        Err(error) => {
            warn!(%error, "Tree cannot be parsed for cleanup, marking it unusable");
            return Cleaned::Unusable;
        }
    };

    let spliced = tree.collapse_single_child_nodes();
    let merged = merge_duplicate_siblings(&mut tree);
    let stripped = remove_single_poly_taxa(&mut tree);
    // Siblings were merged, so remaining duplicates sit in different clades
    let repaired = tree.repair_duplicate_names();
    debug!(spliced, merged, stripped, repaired, "Cleanup pass");

    let cleaned = tree.to_newick(NewickStyle::Spaced);
    match parse_str(&cleaned) {
        Ok(_) => Cleaned::Tree(cleaned),
        Err(error) => {
            warn!(%error, tree = %cleaned, "Cleaned tree does not reparse, marking it unusable");
            Cleaned::Unusable
        }
    }
}

/// Repeats [collapse_nodes] until the string no longer changes, at most
/// `max_iterations` times.
pub fn collapse_to_fixpoint(newick: &str, max_iterations: usize) -> Cleaned {
    let mut current = newick.to_string();
    for iteration in 0..max_iterations {
        match collapse_nodes(&current) {
            Cleaned::Unusable => return Cleaned::Unusable,
            Cleaned::Tree(next) if next == current => return Cleaned::Tree(next),
            Cleaned::Tree(next) => {
                debug!(iteration, "Cleanup changed tree");
                current = next;
            }
        }
    }
    Cleaned::Tree(current)
}

/// Removes sibling leaves whose base name repeats under the same parent,
/// keeping the leftmost. Removal collapses the parent if it is left with a
/// single child, which may bring new leaves together; merging repeats
/// until no parent has two leaves of one base name.
///
/// # Returns
/// Number of removed leaves.
pub fn merge_duplicate_siblings(tree: &mut PhyloTree) -> usize {
    let mut removed = 0;
    while let Some(duplicate) = find_duplicate_sibling(tree) {
        tree.remove(duplicate, true);
        removed += 1;
    }
    removed
}

fn find_duplicate_sibling(tree: &PhyloTree) -> Option<VertexIndex> {
    for vertex in tree.pre_order_iter() {
        let Some(children) = vertex.children() else {
            continue;
        };
        let mut seen = HashSet::new();
        for &child in children.iter().filter(|&&c| tree[c].is_leaf()) {
            let canonical = tree.leaf_canonical(child);
            if !seen.insert(label::base_name(&canonical).to_string()) {
                return Some(child);
            }
        }
    }
    None
}

/// Strips the `%N` suffix of every leaf that is the only `%N`-numbered
/// leaf of its base name left in the tree. Bare leaves of the same base
/// name do not count; the resulting repeat is left to
/// [PhyloTree::repair_duplicate_names].
///
/// # Returns
/// Number of renamed leaves.
pub fn remove_single_poly_taxa(tree: &mut PhyloTree) -> usize {
    let mut numbered: HashMap<String, Vec<VertexIndex>> = HashMap::new();
    for leaf in tree.leaf_indices() {
        let canonical = tree.leaf_canonical(leaf);
        if label::has_poly_suffix(&canonical) {
            numbered
                .entry(label::base_name(&canonical).to_string())
                .or_default()
                .push(leaf);
        }
    }

    let mut renamed = 0;
    for (base, leaves) in numbered {
        if let &[leaf] = leaves.as_slice() {
            tree.rename_leaf(leaf, base);
            renamed += 1;
        }
    }
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaned(newick: &str) -> String {
        collapse_nodes(newick).into_tree().unwrap()
    }

    #[test]
    fn test_single_child_chain() {
        assert_eq!(cleaned("(((A)),(B,C));"), "(A, (B, C));");
    }

    #[test]
    fn test_merge_left_and_right_siblings() {
        assert_eq!(cleaned("(B,(A%2,C,A%1),D);"), "(B, (A, C), D);");
    }

    #[test]
    fn test_merge_cascades_after_collapse() {
        // Merging A%1/A%2 collapses their clade, bringing A up next to A%3
        assert_eq!(cleaned("(A%3,(A%1,A%2),B);"), "(A, B);");
    }

    #[test]
    fn test_suffix_kept_while_ambiguous() {
        assert_eq!(cleaned("((A%1,B),(A%2,C));"), "((A%1, B), (A%2, C));");
    }

    #[test]
    fn test_lone_suffix_beside_bare_name_is_renumbered() {
        // A%1 is the only numbered A: stripped, then both A leaves numbered
        assert_eq!(cleaned("((A,B),(A%1,C));"), "((A%1, B), (A%2, C));");
    }

    #[test]
    fn test_duplicates_in_different_clades_are_numbered() {
        assert_eq!(cleaned("(B,(B,C),D);"), "(B%1, (B%2, C), D);");
        assert_eq!(cleaned("(B%1,(B%2,C),D);"), "(B%1, (B%2, C), D);");
    }

    #[test]
    fn test_malformed_is_unusable() {
        assert!(collapse_nodes("((A,B);").is_unusable());
        assert!(collapse_to_fixpoint("(A,,B);", MAX_COLLAPSE_ITERATIONS).is_unusable());
    }
}
