//! Newick format parser, tokenizer and writer for phylogenetic trees.
//!
//! Two complementary views of a Newick string are offered:
//! * A structural one: [`NewickParser`] builds an owned [`PhyloTree`] that
//!   supports edits (removal, collapse, renaming) and is written back with
//!   [`to_newick`].
//! * A textual one: the [tokenizer] yields label tokens with their byte spans,
//!   so labels can be rewritten in place ([`requote_tree`],
//!   [`strip_poly_markers`]) while leaving the rest of the string untouched.
//!
//! # Quick API
//! * [`parse_str`] - parses a single string, returns a [`PhyloTree`]
//! * [`parse_all_str`] - parses all trees of a string
//!
//! # Format
//! * `tree ::= '(' vertex {',' vertex} ')' [label] [branch_length] ';'`
//! * `vertex ::= leaf | '(' vertex {',' vertex} ')' [label] [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Vertices may have any number of children, including one
//! * Whitespace can occur between elements, just not within an unquoted
//!   label or a branch length
//! * Labels may be single-quoted, with `''` for a literal quote
//! * Comments are square brackets and are skipped, e.g. `A[&rate=1.2]:0.5`

mod defs;
pub mod parser;
pub mod tokenizer;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::tokenizer::{requote_tree, strip_poly_markers, tokenize};
pub use self::writer::{NewickStyle, to_newick, write_newick_file};

use crate::model::PhyloTree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain a [`PhyloTree`].
///
/// # Returns
/// * [`PhyloTree`] - Tree parsed from the string
/// * [`ParsingError`] - If the string is not valid Newick format
///
/// # Example
/// ```
/// use mrptree::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    NewickParser::new().parse_str(&mut byte_parser)
}

/// Parses all semicolon-terminated Newick trees of a string.
///
/// # Example
/// ```
/// use mrptree::newick::parse_all_str;
///
/// let trees = parse_all_str("(A,(B,C));\n(A,B,C);").unwrap();
/// assert_eq!(trees.len(), 2);
/// ```
pub fn parse_all_str<S: AsRef<str>>(newick: S) -> Result<Vec<PhyloTree>, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    NewickParser::new().parse_all(&mut byte_parser)
}
