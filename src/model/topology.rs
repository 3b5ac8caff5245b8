//! Topology comparison of [PhyloTree]s via splits.
//!
//! Each non-root internal vertex induces a split (bipartition) of the leaf
//! set. Splits are normalised to the side not containing the first leaf (in
//! sorted label order) and trivial splits are ignored, so the Robinson-Foulds
//! distance computed here treats trees as unrooted. Root placement is
//! compared separately through the root degree.

use crate::model::tree::PhyloTree;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A non-trivial split as sorted indices into the sorted leaf label set.
type Split = Vec<usize>;

impl PhyloTree {
    /// Returns the set of canonical leaf labels.
    pub fn leaf_set(&self) -> BTreeSet<String> {
        self.leaf_indices()
            .into_iter()
            .map(|leaf| self.leaf_canonical(leaf))
            .collect()
    }

    /// Computes the non-trivial splits of this tree over the given sorted
    /// label order.
    fn splits(&self, order: &HashMap<String, usize>) -> HashSet<Split> {
        let num_labels = order.len();
        let mut splits = HashSet::new();

        for vertex in self.post_order_iter().filter(|v| v.is_internal()) {
            let mut side = vec![false; num_labels];
            for leaf in self.descendant_leaves(vertex.index()) {
                if let Some(&position) = order.get(&self.leaf_canonical(leaf)) {
                    side[position] = true;
                }
            }

            // Normalise to the side without the first label
            if side.first() == Some(&true) {
                side.iter_mut().for_each(|in_side| *in_side = !*in_side);
            }

            let split: Split = side
                .iter()
                .enumerate()
                .filter_map(|(position, &in_side)| in_side.then_some(position))
                .collect();
            if split.len() >= 2 && split.len() + 2 <= num_labels {
                splits.insert(split);
            }
        }

        splits
    }

    /// Computes the (unrooted) Robinson-Foulds distance to another tree,
    /// i.e. the number of splits present in exactly one of the two trees.
    ///
    /// # Returns
    /// `None` if the trees are not on the same leaf set.
    ///
    /// # Example
    /// ```
    /// use mrptree::newick::parse_str;
    ///
    /// let a = parse_str("((A,B),(C,D),E);").unwrap();
    /// let b = parse_str("((A,C),(B,D),E);").unwrap();
    /// assert_eq!(a.robinson_foulds(&b), Some(4));
    /// assert_eq!(a.robinson_foulds(&a), Some(0));
    /// ```
    pub fn robinson_foulds(&self, other: &PhyloTree) -> Option<usize> {
        let labels = self.leaf_set();
        if labels != other.leaf_set() {
            return None;
        }

        let order: HashMap<String, usize> = labels
            .into_iter()
            .enumerate()
            .map(|(position, label)| (label, position))
            .collect();

        let own = self.splits(&order);
        let theirs = other.splits(&order);
        Some(own.symmetric_difference(&theirs).count())
    }

    /// Returns whether both trees have the same topology: same leaf set,
    /// Robinson-Foulds distance of zero, and equal root degree.
    ///
    /// # Example
    /// ```
    /// use mrptree::newick::parse_str;
    ///
    /// let rooted = parse_str("((A,B),(C,D));").unwrap();
    /// let unrooted = parse_str("(A,B,(C,D));").unwrap();
    /// assert_eq!(rooted.robinson_foulds(&unrooted), Some(0));
    /// assert!(!rooted.topology_equal(&unrooted));
    /// ```
    pub fn topology_equal(&self, other: &PhyloTree) -> bool {
        self.root_degree() == other.root_degree() && self.robinson_foulds(other) == Some(0)
    }
}
