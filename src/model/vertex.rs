//! Vertex type for the multifurcating tree arena.

use crate::model::tree::VertexIndex;

/// During construction or after removal, Internal and Leaf vertex might not
/// have a parent set.
pub(crate) const NO_PARENT_SET: VertexIndex = usize::MAX;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex of a phylogenetic tree.
///
/// A vertex can be either:
/// - **Root**: Has children and no parent; may carry a label
///   and a branch length (some writers emit one)
/// - **Internal**: Has a parent and children, might have label and branch length
/// - **Leaf**: Has a parent and a taxon label, no children
///
/// # Invariants
/// - `index` is the position in the arena
/// - Vertices that were removed from the tree keep their index but have
///   no parent (see [PhyloTree::is_attached](crate::model::PhyloTree::is_attached))
/// - Leaf labels are stored unquoted, exactly as parsed
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex {
    /// Root vertex of the tree
    Root {
        index: VertexIndex,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<f64>,
    },
    /// Internal vertex (has parent and at least one child while attached)
    Internal {
        index: VertexIndex,
        parent: VertexIndex,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<f64>,
    },
    /// Leaf vertex (has parent and taxon label, no children)
    Leaf {
        index: VertexIndex,
        parent: VertexIndex,
        label: String,
        branch_length: Option<f64>,
    },
}

impl Vertex {
    /// Creates a new root vertex.
    pub fn new_root(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<f64>,
    ) -> Self {
        Vertex::Root {
            index,
            children,
            label,
            branch_length,
        }
    }

    /// Creates a new internal vertex; its parent is set when it gets attached.
    pub fn new_internal(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<f64>,
    ) -> Self {
        Vertex::Internal {
            index,
            parent: NO_PARENT_SET,
            children,
            label,
            branch_length,
        }
    }

    /// Creates a new leaf vertex; its parent is set when it gets attached.
    pub fn new_leaf(index: VertexIndex, label: String, branch_length: Option<f64>) -> Self {
        Vertex::Leaf {
            index,
            parent: NO_PARENT_SET,
            label,
            branch_length,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Root { index, .. }
            | Vertex::Internal { index, .. }
            | Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` if this vertex is an internal vertex.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns `true` if this vertex is the root.
    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }

    /// Returns the children if this is the root or an internal vertex, else `None`.
    pub fn children(&self) -> Option<&[VertexIndex]> {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => Some(children),
            Vertex::Leaf { .. } => None,
        }
    }

    /// Returns the children mutably if this is the root or an internal vertex.
    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<VertexIndex>> {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => Some(children),
            Vertex::Leaf { .. } => None,
        }
    }

    /// Returns the number of children (0 for leaves).
    pub fn degree(&self) -> usize {
        self.children().map_or(0, <[VertexIndex]>::len)
    }

    /// Returns the index of the parent, or `None` for the root and
    /// detached vertices.
    pub fn parent(&self) -> Option<VertexIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                (*parent != NO_PARENT_SET).then_some(*parent)
            }
            Vertex::Root { .. } => None,
        }
    }

    /// Sets a new parent for a non-root vertex; does nothing on the root.
    pub(crate) fn set_parent(&mut self, new_parent: VertexIndex) {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => *parent = new_parent,
            Vertex::Root { .. } => {}
        }
    }

    /// Returns the label: the taxon name for leaves, an optional clade
    /// label (e.g. support value) otherwise.
    pub fn label(&self) -> Option<&str> {
        match self {
            Vertex::Leaf { label, .. } => Some(label),
            Vertex::Root { label, .. } | Vertex::Internal { label, .. } => label.as_deref(),
        }
    }

    /// Replaces the taxon label of a leaf; does nothing on other vertices.
    pub(crate) fn set_leaf_label(&mut self, new_label: String) {
        if let Vertex::Leaf { label, .. } = self {
            *label = new_label;
        }
    }

    /// Returns the length of the incoming branch, if set.
    pub fn branch_length(&self) -> Option<f64> {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length,
        }
    }

    pub(crate) fn set_branch_length(&mut self, length: Option<f64>) {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length = length,
        }
    }
}
