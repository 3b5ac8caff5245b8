//! Resolution of non-monophyletic taxa into a family of concrete trees.
//!
//! A source tree may contain several leaves `E%1`, `E%2`, ... of one taxon
//! `E` when the publication could not tell which placement is the real
//! one. The [PermutationEngine] enumerates every choice of one placement
//! per taxon, deletes the other placements, strips the `%N` markers, and
//! keeps one representative per distinct topology. A taxon found on several
//! leaves without markers is treated the same way, its leaves numbered first.

use crate::cleanup::{Cleaned, collapse_nodes};
use crate::error::SupertreeError;
use crate::label;
use crate::model::PhyloTree;
use crate::mrp::{MRP_OUTGROUP, MrpMatrix};
use crate::newick::{NewickStyle, parse_str, requote_tree, strip_poly_markers, write_newick_file};
use crate::substitution::delete_taxa;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Prefix of the names given to resolved trees (`tree_1`, `tree_2`, ...).
pub const RESOLVED_TREE_PREFIX: &str = "tree_";

// =#========================================================================#=
// AMBIGUITY GROUPS
// =#========================================================================#=
/// All leaves of one base name: its `%N` variants, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguityGroup {
    /// Base name without `%N` suffix (canonical form)
    pub base_name: String,
    /// Distinct `%N`-suffixed labels of this base name, in leaf order
    pub variants: Vec<String>,
}

impl AmbiguityGroup {
    /// Number of candidate placements; `0` for an unambiguous taxon.
    pub fn num_variants(&self) -> usize {
        self.variants.len()
    }

    pub fn is_ambiguous(&self) -> bool {
        !self.variants.is_empty()
    }
}

/// Groups the leaves of a tree by base name, in order of first appearance.
///
/// Leaves are numbered first (see [PhyloTree::number_placements]), so a
/// taxon appearing twice, or bare next to `%N` variants, forms an ambiguity
/// group like explicitly marked placements do.
///
/// # Errors
/// [SupertreeError::Parse] if the tree is not valid Newick.
///
/// # Example
/// ```
/// use mrptree::permutation::ambiguity_groups;
///
/// let groups = ambiguity_groups("((E%1,G),A,(E%2,F));").unwrap();
/// let sizes: Vec<(&str, usize)> = groups
///     .iter()
///     .map(|g| (g.base_name.as_str(), g.num_variants()))
///     .collect();
/// assert_eq!(sizes, vec![("E", 2), ("G", 0), ("A", 0), ("F", 0)]);
///
/// let groups = ambiguity_groups("(A,(A%1,C),D);").unwrap();
/// assert_eq!(groups[0].variants, vec!["A%2", "A%1"]);
/// ```
pub fn ambiguity_groups(tree: &str) -> Result<Vec<AmbiguityGroup>, SupertreeError> {
    let mut parsed = parse_str(requote_tree(tree))?;
    parsed.number_placements();
    Ok(groups_of(&parsed))
}

fn groups_of(parsed: &PhyloTree) -> Vec<AmbiguityGroup> {
    let mut groups: Vec<AmbiguityGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for leaf in parsed.leaf_indices() {
        let canonical = parsed.leaf_canonical(leaf);
        let base = label::base_name(&canonical).to_string();
        let position = *positions.entry(base.clone()).or_insert_with(|| {
            groups.push(AmbiguityGroup {
                base_name: base,
                variants: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[position];
        if label::has_poly_suffix(&canonical) && !group.variants.contains(&canonical) {
            group.variants.push(canonical);
        }
    }
    groups
}

/// Number of candidate trees the groups span: the product of the variant
/// counts of all ambiguous groups (1 if there are none).
///
/// # Returns
/// `None` if the product overflows `u128`.
pub fn count_candidates(groups: &[AmbiguityGroup]) -> Option<u128> {
    groups
        .iter()
        .filter(|group| group.is_ambiguous())
        .try_fold(1u128, |product, group| {
            product.checked_mul(group.num_variants() as u128)
        })
}

// =#========================================================================#=
// PERMUTATION ENGINE
// =#========================================================================#=
/// Enumerates the resolutions of a tree with `%N`-marked taxa.
///
/// # Configuration
/// * [`with_max_candidates(n)`](Self::with_max_candidates)
///     - Refuses trees spanning more than `n` candidates
///       (default: unbounded).
///
/// # Example
/// ```
/// use mrptree::permutation::PermutationEngine;
///
/// let family = PermutationEngine::new()
///     .permute("((E%1,G%1),A,(G%2,(E%2,F,D,H,E%3)));")
///     .unwrap();
/// assert_eq!(family.raw_candidates(), 6);
/// assert_eq!(family.len(), 4);
/// assert_eq!(family.trees()[0].0, "tree_1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PermutationEngine {
    max_candidates: Option<u128>,
}

impl PermutationEngine {
    /// Creates an engine without enumeration budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the number of candidate trees a single input may span.
    pub fn with_max_candidates(mut self, max_candidates: u128) -> Self {
        self.max_candidates = Some(max_candidates);
        self
    }

    /// Enumerates all resolutions of `tree` and deduplicates them by
    /// topology (see [PhyloTree::topology_equal]), keeping the first seen.
    ///
    /// # Errors
    /// * [SupertreeError::Parse] if the tree is not valid Newick
    /// * [SupertreeError::CombinatorialOverflow] if the tree spans more
    ///   candidates than the budget (or than fit a `u128`)
    pub fn permute(&self, tree: &str) -> Result<PermutationFamily, SupertreeError> {
        let mut parsed = parse_str(requote_tree(tree))?;
        let numbered = parsed.number_placements();
        if numbered > 0 {
            debug!(numbered, "Numbered repeated placements");
        }
        let groups = groups_of(&parsed);
        let tree = parsed.to_newick(NewickStyle::Spaced);
        let candidates = count_candidates(&groups);
        self.check_budget(candidates)?;

        let ambiguous: Vec<&AmbiguityGroup> =
            groups.iter().filter(|group| group.is_ambiguous()).collect();
        info!(
            groups = ambiguous.len(),
            candidates = ?candidates,
            "Enumerating resolutions of non-monophyletic taxa"
        );

        // (index of next group to resolve, partially resolved tree)
        let mut stack: Vec<(usize, String)> = vec![(0, tree)];
        let mut survivors: Vec<(PhyloTree, String)> = Vec::new();
        let mut raw_candidates: u128 = 0;

        while let Some((group_index, partial)) = stack.pop() {
            let Some(group) = ambiguous.get(group_index) else {
                raw_candidates += 1;
                if let Some(resolved) = resolve(&partial)? {
                    let parsed = parse_str(&resolved)?;
                    if !survivors.iter().any(|(seen, _)| seen.topology_equal(&parsed)) {
                        survivors.push((parsed, resolved));
                    }
                }
                continue;
            };

            // Reversed, so that the first variant is explored first
            for keep in (0..group.num_variants()).rev() {
                let losers: Vec<&str> = group
                    .variants
                    .iter()
                    .enumerate()
                    .filter(|&(position, _)| position != keep)
                    .map(|(_, variant)| variant.as_str())
                    .collect();
                stack.push((group_index + 1, delete_taxa(&partial, &losers, true)?));
            }
        }

        info!(
            raw = raw_candidates,
            distinct = survivors.len(),
            "Resolved non-monophyletic taxa"
        );

        let trees = survivors
            .into_iter()
            .enumerate()
            .map(|(position, (_, newick))| {
                (format!("{RESOLVED_TREE_PREFIX}{}", position + 1), newick)
            })
            .collect();
        Ok(PermutationFamily {
            trees,
            raw_candidates,
            base_names: groups.into_iter().map(|group| group.base_name).collect(),
        })
    }

    fn check_budget(&self, candidates: Option<u128>) -> Result<(), SupertreeError> {
        let budget = self.max_candidates.unwrap_or(u128::MAX);
        match candidates {
            Some(count) if count <= budget => Ok(()),
            _ => Err(SupertreeError::CombinatorialOverflow { candidates, budget }),
        }
    }
}

/// Strips the remaining `%N` markers of a fully resolved tree and cleans
/// it up; `None` if the result is unusable.
fn resolve(partial: &str) -> Result<Option<String>, SupertreeError> {
    let stripped = strip_poly_markers(partial)?;
    match collapse_nodes(&stripped) {
        Cleaned::Tree(resolved) => {
            debug!(tree = %resolved, "Resolved candidate");
            Ok(Some(resolved))
        }
        Cleaned::Unusable => {
            warn!(tree = %stripped, "Dropping unusable candidate");
            Ok(None)
        }
    }
}

// =#========================================================================#=
// PERMUTATION FAMILY
// =#========================================================================#=
/// The distinct resolutions of one source tree, named `tree_1..tree_M`.
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationFamily {
    trees: Vec<(String, String)>,
    raw_candidates: u128,
    base_names: Vec<String>,
}

impl PermutationFamily {
    /// Returns the `(name, newick)` pairs of the distinct resolutions.
    pub fn trees(&self) -> &[(String, String)] {
        &self.trees
    }

    /// Returns the number of candidates enumerated before deduplication.
    pub fn raw_candidates(&self) -> u128 {
        self.raw_candidates
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Returns the Newick strings of all resolutions, in order.
    pub fn to_newick_lines(&self) -> Vec<&str> {
        self.trees.iter().map(|(_, newick)| newick.as_str()).collect()
    }

    /// Writes all resolutions to a file, one tree per line.
    pub fn write_newick_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SupertreeError> {
        write_newick_file(path, &self.to_newick_lines())?;
        Ok(())
    }

    /// Returns the taxa of a matrix over this family: [MRP_OUTGROUP]
    /// followed by every base name of the source tree.
    pub fn taxa_superset(&self) -> Vec<String> {
        std::iter::once(MRP_OUTGROUP.to_string())
            .chain(self.base_names.iter().cloned())
            .collect()
    }

    /// Assembles the MRP matrix of all resolutions over
    /// [taxa_superset](Self::taxa_superset), with unit weights.
    pub fn to_matrix(&self) -> Result<MrpMatrix, SupertreeError> {
        MrpMatrix::assemble(&self.trees, &self.taxa_superset(), None)
    }
}
