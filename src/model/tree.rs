//! Multifurcating phylogenetic tree using the arena pattern.
//!
//! Provides [PhyloTree], the tree object behind every structural edit of
//! this crate: leaf lookup, sibling navigation, removal with collapse of
//! degenerate parents, and duplicate name repair. Topology comparison lives
//! in [topology](crate::model::topology).

use crate::label;
use crate::model::vertex::{NO_PARENT_SET, Vertex};
use crate::newick::writer::{NewickStyle, to_newick};
use std::collections::{HashMap, HashSet};

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree with arbitrary vertex degree, represented
/// using the arena pattern on [Vertex].
///
/// # Structure
/// - All vertices are stored in a contiguous vector and referenced by
///   [VertexIndex]; indices stay valid across edits.
/// - Removing a vertex detaches it (and its subtree) from the tree; the
///   arena slot remains but is no longer reachable from the root.
/// - All queries ([leaf_indices](Self::leaf_indices),
///   [num_leaves](Self::num_leaves), traversals) only see attached vertices.
///
/// # Construction
/// Bottom-up: add leaves, then internal vertices with their children,
/// and finally the root. Usually done by the
/// [NewickParser](crate::newick::NewickParser).
///
/// # Example
/// ```
/// use mrptree::model::PhyloTree;
///
/// let mut tree = PhyloTree::new();
/// let a = tree.add_leaf("A".to_string(), None);
/// let b = tree.add_leaf("B".to_string(), None);
/// let c = tree.add_leaf("C".to_string(), None);
/// let ab = tree.add_internal(vec![a, b], None, None);
/// tree.add_root(vec![ab, c], None, None);
///
/// assert_eq!(tree.leaf_names(), vec!["A", "B", "C"]);
/// assert_eq!(tree.root_degree(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PhyloTree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,

    /// Name of tree; optional, e.g. a source tree key
    name: Option<String>,
}

impl Default for PhyloTree {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction, Getters / Accessors (pub)
// ============================================================================
impl PhyloTree {
    /// Creates a new, empty tree.
    pub fn new() -> Self {
        PhyloTree {
            vertices: Vec::new(),
            root_index: NO_ROOT_SET_INDEX,
            name: None,
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Adds a leaf, returning its index.
    pub fn add_leaf(&mut self, label: String, branch_length: Option<f64>) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, label, branch_length));
        index
    }

    /// Adds an internal vertex with the given children, returning its index.
    pub fn add_internal(
        &mut self,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<f64>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self.vertices[child].set_parent(index);
        }
        self.vertices
            .push(Vertex::new_internal(index, children, label, branch_length));
        index
    }

    /// Adds the root with the given children, returning its index.
    pub fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<f64>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self.vertices[child].set_parent(index);
        }
        self.vertices
            .push(Vertex::new_root(index, children, label, branch_length));
        self.root_index = index;
        index
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the number of children of the root.
    pub fn root_degree(&self) -> usize {
        if self.is_root_set() {
            self.root().degree()
        } else {
            0
        }
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns whether the vertex is still reachable from the root.
    pub fn is_attached(&self, index: VertexIndex) -> bool {
        let mut current = index;
        loop {
            if current == self.root_index {
                return true;
            }
            match self.vertices.get(current).and_then(Vertex::parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Returns the indices of all attached leaves, left to right.
    pub fn leaf_indices(&self) -> Vec<VertexIndex> {
        self.pre_order_iter()
            .filter(|v| v.is_leaf())
            .map(Vertex::index)
            .collect()
    }

    /// Returns the labels of all attached leaves, left to right.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.pre_order_iter()
            .filter(|v| v.is_leaf())
            .filter_map(Vertex::label)
            .collect()
    }

    /// Returns the number of attached leaves.
    pub fn num_leaves(&self) -> usize {
        self.pre_order_iter().filter(|v| v.is_leaf()).count()
    }

    /// Returns the number of attached internal vertices (root excluded).
    pub fn num_internal(&self) -> usize {
        self.pre_order_iter().filter(|v| v.is_internal()).count()
    }

    /// Returns the first attached leaf whose label denotes the same taxon
    /// as `name` (see [label::same_taxon]).
    pub fn find_leaf(&self, name: &str) -> Option<VertexIndex> {
        let target = label::canonical(name);
        self.leaf_indices()
            .into_iter()
            .find(|&leaf| self.leaf_canonical(leaf) == target)
    }

    /// Returns all attached leaves whose canonical label satisfies `predicate`.
    pub fn find_leaves<F>(&self, predicate: F) -> Vec<VertexIndex>
    where
        F: Fn(&str) -> bool,
    {
        self.leaf_indices()
            .into_iter()
            .filter(|&leaf| predicate(&self.leaf_canonical(leaf)))
            .collect()
    }

    /// Returns the canonical label of a vertex (empty for unlabelled ones).
    pub fn leaf_canonical(&self, index: VertexIndex) -> String {
        self[index].label().map(label::normalize).unwrap_or_default()
    }

    /// Returns the leaves sharing the parent of `index`, on either side.
    pub fn sibling_leaves(&self, index: VertexIndex) -> Vec<VertexIndex> {
        let Some(parent) = self[index].parent() else {
            return Vec::new();
        };
        self[parent]
            .children()
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|&sibling| sibling != index && self[sibling].is_leaf())
            .collect()
    }

    /// Returns the leaves in the subtree rooted at `index`, left to right.
    pub fn descendant_leaves(&self, index: VertexIndex) -> Vec<VertexIndex> {
        PreOrderIter::from(self, index)
            .filter(|v| v.is_leaf())
            .map(Vertex::index)
            .collect()
    }

    /// Renames a leaf. Does nothing if `index` is not a leaf.
    pub fn rename_leaf(&mut self, index: VertexIndex, new_label: String) {
        self.vertices[index].set_leaf_label(new_label);
    }

    /// Returns the Newick representation of this tree in the given style.
    pub fn to_newick(&self, style: NewickStyle) -> String {
        to_newick(self, style)
    }
}

impl std::ops::Index<VertexIndex> for PhyloTree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

// ============================================================================
// Structural edits (pub)
// ============================================================================
impl PhyloTree {
    /// Removes the vertex (with its subtree) from the tree.
    ///
    /// A parent left without children is removed as well. With
    /// `collapse_parent` set, a non-root parent left with a single child is
    /// spliced out, and a root left with a single internal child absorbs
    /// that child's children; the root itself is never removed.
    ///
    /// # Returns
    /// `false` if `index` is the root or not attached, `true` otherwise.
    pub fn remove(&mut self, index: VertexIndex, collapse_parent: bool) -> bool {
        if index == self.root_index || !self.is_attached(index) {
            return false;
        }
        let Some(parent) = self.detach(index) else {
            return false;
        };

        let remaining = self[parent].degree();
        if remaining == 0 && parent != self.root_index {
            return self.remove(parent, collapse_parent);
        }

        if collapse_parent && remaining == 1 {
            if parent == self.root_index {
                self.absorb_single_root_child();
            } else {
                self.splice_out(parent);
            }
        }

        true
    }

    /// Splices out every attached vertex with exactly one child, reattaching
    /// the child to its grandparent (branch lengths are summed). A root with
    /// a single internal child absorbs the child's children.
    ///
    /// # Returns
    /// Number of vertices removed.
    pub fn collapse_single_child_nodes(&mut self) -> usize {
        let candidates: Vec<VertexIndex> = self
            .post_order_iter()
            .filter(|v| v.is_internal())
            .map(Vertex::index)
            .collect();

        let mut removed = 0;
        for index in candidates {
            if self[index].degree() == 1 && self.splice_out(index) {
                removed += 1;
            }
        }

        while self.absorb_single_root_child() {
            removed += 1;
        }

        removed
    }

    /// Makes leaf names unique by suffixing repeated names with `%1`, `%2`,
    /// ... (skipping numbers already taken by other leaves). A repeated
    /// name that already carries a `%N` suffix is renumbered on its base
    /// name, so `A%1, A%1` becomes `A%2, A%3` rather than `A%1%1, ...`.
    ///
    /// # Returns
    /// Number of renamed leaves.
    pub fn repair_duplicate_names(&mut self) -> usize {
        let leaves = self.leaf_indices();
        let names: Vec<String> = leaves.iter().map(|&l| self.leaf_canonical(l)).collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in &names {
            *counts.entry(name.as_str()).or_default() += 1;
        }

        let doomed: Vec<(VertexIndex, &str)> = leaves
            .iter()
            .zip(&names)
            .filter(|(_, name)| counts[name.as_str()] >= 2)
            .map(|(&leaf, name)| (leaf, label::base_name(name)))
            .collect();
        self.renumber(doomed, &names)
    }

    /// Gives every leaf of an ambiguous base name its own `%N` label: after
    /// [repair_duplicate_names](Self::repair_duplicate_names), a bare leaf
    /// `A` sharing its base name with other leaves (`A%1`, ...) is renamed
    /// to the next free `A%N`.
    ///
    /// # Returns
    /// Number of renamed leaves.
    ///
    /// # Example
    /// ```
    /// use mrptree::newick::parse_str;
    ///
    /// let mut tree = parse_str("(A,(A%1,C),(B,C));").unwrap();
    /// assert_eq!(tree.number_placements(), 3);
    /// assert_eq!(tree.leaf_names(), vec!["A%2", "A%1", "C%1", "B", "C%2"]);
    /// ```
    pub fn number_placements(&mut self) -> usize {
        let repaired = self.repair_duplicate_names();

        let leaves = self.leaf_indices();
        let names: Vec<String> = leaves.iter().map(|&l| self.leaf_canonical(l)).collect();
        let mut per_base: HashMap<&str, usize> = HashMap::new();
        for name in &names {
            *per_base.entry(label::base_name(name)).or_default() += 1;
        }

        let bare: Vec<(VertexIndex, &str)> = leaves
            .iter()
            .zip(&names)
            .filter(|(_, name)| !label::has_poly_suffix(name) && per_base[name.as_str()] >= 2)
            .map(|(&leaf, name)| (leaf, name.as_str()))
            .collect();
        repaired + self.renumber(bare, &names)
    }

    /// Renames each given leaf to `<base>%N` with the smallest `N` not yet
    /// taken by any leaf.
    fn renumber(&mut self, leaves: Vec<(VertexIndex, &str)>, names: &[String]) -> usize {
        let mut taken: HashSet<String> = names.iter().cloned().collect();
        let mut next_number: HashMap<&str, usize> = HashMap::new();
        let mut renames = Vec::with_capacity(leaves.len());
        for (leaf, base) in leaves {
            let number = next_number.entry(base).or_insert(1);
            let mut candidate = format!("{base}{}{number}", label::POLY_MARKER);
            while taken.contains(&candidate) {
                *number += 1;
                candidate = format!("{base}{}{number}", label::POLY_MARKER);
            }
            *number += 1;
            taken.insert(candidate.clone());
            renames.push((leaf, candidate));
        }

        let renamed = renames.len();
        for (leaf, new_name) in renames {
            self.rename_leaf(leaf, new_name);
        }
        renamed
    }
}

// ============================================================================
// Structural helpers (private)
// ============================================================================
impl PhyloTree {
    /// Detaches `index` from its parent, returning the former parent.
    fn detach(&mut self, index: VertexIndex) -> Option<VertexIndex> {
        let parent = self[index].parent()?;
        if let Some(children) = self.vertices[parent].children_mut() {
            children.retain(|&c| c != index);
        }
        self.vertices[index].set_parent(NO_PARENT_SET);
        Some(parent)
    }

    /// Replaces a non-root vertex with a single child by that child.
    fn splice_out(&mut self, index: VertexIndex) -> bool {
        let Some(grandparent) = self[index].parent() else {
            return false;
        };
        let child = match self[index].children() {
            Some([child]) => *child,
            _ => return false,
        };

        let merged_length = match (self[index].branch_length(), self[child].branch_length()) {
            (Some(outer), Some(inner)) => Some(outer + inner),
            (outer, inner) => outer.or(inner),
        };
        self.vertices[child].set_branch_length(merged_length);
        self.vertices[child].set_parent(grandparent);

        if let Some(siblings) = self.vertices[grandparent].children_mut() {
            for slot in siblings.iter_mut() {
                if *slot == index {
                    *slot = child;
                }
            }
        }

        if let Some(children) = self.vertices[index].children_mut() {
            children.clear();
        }
        self.vertices[index].set_parent(NO_PARENT_SET);
        true
    }

    /// If the root has a single internal child, moves that child's children
    /// up to the root.
    fn absorb_single_root_child(&mut self) -> bool {
        if !self.is_root_set() {
            return false;
        }
        let root = self.root_index;
        let child = match self[root].children() {
            Some([child]) if self[*child].is_internal() => *child,
            _ => return false,
        };

        let grandchildren = self
            .vertices[child]
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        for &grandchild in &grandchildren {
            self.vertices[grandchild].set_parent(root);
        }
        if let Some(children) = self.vertices[root].children_mut() {
            *children = grandchildren;
        }
        self.vertices[child].set_parent(NO_PARENT_SET);
        true
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
impl PhyloTree {
    /// Returns an iterator over the attached vertices in post-order
    /// (children before parents, left to right).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the attached vertices in pre-order
    /// (parents before children, left to right).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::from(self, self.root_index)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// Uses an explicit stack instead of recursion.
pub struct PostOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Push children in reverse, so leftmost is processed first
            if let Some(children) = vertex.children() {
                for &child in children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// Uses an explicit stack instead of recursion.
pub struct PreOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn from(tree: &'a PhyloTree, start: VertexIndex) -> Self {
        let mut stack = Vec::new();
        if start < tree.vertices.len() {
            stack.push(start);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        if let Some(children) = vertex.children() {
            self.stack.extend(children.iter().rev());
        }

        Some(vertex)
    }
}
