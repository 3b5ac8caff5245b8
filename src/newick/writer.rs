//! Newick string and file writing for [PhyloTree]s.

use crate::label;
use crate::model::tree::{PhyloTree, VertexIndex};
use crate::newick::defs::SPACED_SEPARATOR;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Style for serializing a tree to a Newick string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewickStyle {
    /// No whitespace: `((A,B),C);`
    #[default]
    Compact,
    /// A space after each comma: `((A, B), C);`
    Spaced,
    /// Compact, without branch lengths and internal labels: only the topology
    Topology,
}

/// Returns the Newick representation of the tree with closing semicolon.
///
/// Leaf labels are written in their quoted canonical form
/// (see [label::escape_name]), so labels needing quotes always reparse.
///
/// # Example
/// ```
/// use mrptree::newick::{parse_str, to_newick, NewickStyle};
///
/// let tree = parse_str("(('Gallus gallus':1.5,B),C);").unwrap();
/// assert_eq!(to_newick(&tree, NewickStyle::Compact), "((Gallus_gallus:1.5,B),C);");
/// assert_eq!(to_newick(&tree, NewickStyle::Spaced), "((Gallus_gallus:1.5, B), C);");
/// ```
pub fn to_newick(tree: &PhyloTree, style: NewickStyle) -> String {
    // Recursive helper for building the Newick string
    fn build_newick(tree: &PhyloTree, newick: &mut String, index: VertexIndex, style: NewickStyle) {
        let vertex = &tree[index];

        if let Some(children) = vertex.children() {
            newick.push('(');
            for (position, &child) in children.iter().enumerate() {
                if position > 0 {
                    newick.push_str(match style {
                        NewickStyle::Spaced => SPACED_SEPARATOR,
                        NewickStyle::Compact | NewickStyle::Topology => ",",
                    });
                }
                build_newick(tree, newick, child, style);
            }
            newick.push(')');
            if style != NewickStyle::Topology {
                if let Some(clade_label) = vertex.label() {
                    newick.push_str(&label::escape_name(clade_label));
                }
            }
        } else if let Some(leaf_label) = vertex.label() {
            newick.push_str(&label::escape_name(leaf_label));
        }

        if style != NewickStyle::Topology {
            if let Some(branch_length) = vertex.branch_length() {
                newick.push(':');
                newick.push_str(&branch_length.to_string());
            }
        }
    }

    let mut newick = String::new();
    if tree.is_root_set() {
        build_newick(tree, &mut newick, tree.root_index(), style);
    }
    newick.push(';');
    newick
}

/// Writes the given Newick strings to a file, one tree per line.
///
/// # Errors
/// Returns an I/O error if creating or writing the file fails.
pub fn write_newick_file<P: AsRef<Path>, S: AsRef<str>>(path: P, trees: &[S]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for tree in trees {
        writer.write_all(tree.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
