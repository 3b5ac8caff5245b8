//! Data model for multifurcating phylogenetic trees.
//!
//! Trees are represented by [PhyloTree], which uses the arena pattern to
//! store [Vertex] values referenced by [VertexIndex]. Vertices are either
//! `Root`, `Internal`, or `Leaf`; any vertex may have any number of
//! children, so polytomies and single-child vertices (left behind by edits)
//! are representable.
//!
//! Leaf labels are matched in their canonical form (see [crate::label]).

pub mod topology;
pub mod tree;
pub mod vertex;

pub use tree::{PhyloTree, PostOrderIter, PreOrderIter, VertexIndex};
pub use vertex::Vertex;
