//! Structs and logic to parse Newick strings into [PhyloTree]s.

use crate::model::tree::{PhyloTree, VertexIndex};
use crate::newick::defs::NEWICK_LABEL_DELIMITERS;
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser for Newick strings of rooted trees with arbitrary vertex degree.
///
/// Each call to [parse_str](Self::parse_str) returns a fresh, owned
/// [PhyloTree]; the parser keeps no state between trees.
///
/// # Configuration
/// * [`with_tree_name(name)`](Self::with_tree_name)
///     - Names the next parsed tree (e.g. with its source tree key).
///
/// # Example
/// ```
/// use mrptree::newick::NewickParser;
/// use mrptree::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((A:1,B:1):0.5,C,D);(E,F);");
/// let trees = NewickParser::new().parse_all(&mut byte_parser).unwrap();
/// assert_eq!(trees.len(), 2);
/// assert_eq!(trees[0].root_degree(), 3);
/// ```
#[derive(Debug, Default)]
pub struct NewickParser {
    tree: PhyloTree,
    tree_name: Option<String>,
}

// ============================================================================
// Construction & API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser].
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the next parsed tree.
    pub fn with_tree_name(mut self, name: impl Into<String>) -> Self {
        self.tree_name = Some(name.into());
        self
    }

    /// Parses all Newick trees until EOF.
    ///
    /// # Errors
    /// Returns the [ParsingError] of the first tree that fails to parse.
    pub fn parse_all(&mut self, parser: &mut ByteParser) -> Result<Vec<PhyloTree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            parser.skip_comment_and_whitespace()?;
            if parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Errors
    /// Returns a [ParsingError] if the string is not a well-formed,
    /// semicolon-terminated Newick tree with at least one leaf.
    pub fn parse_str(&mut self, parser: &mut ByteParser) -> Result<PhyloTree, ParsingError> {
        self.tree = match self.tree_name.take() {
            Some(name) => PhyloTree::new().with_name(name),
            None => PhyloTree::new(),
        };

        self.parse_root(parser)?;

        let tree = std::mem::take(&mut self.tree);
        if tree.num_leaves() == 0 {
            return Err(ParsingError::without_context(ParsingErrorType::EmptyTree));
        }
        Ok(tree)
    }
}

// ============================================================================
// Parsing (private)
// ============================================================================
impl NewickParser {
    /// Parses root of tree: `(children)[label][:branch_length];`
    fn parse_root(&mut self, parser: &mut ByteParser) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.peek_is(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' at start of tree but found {:?}", next_char),
            ));
        }

        let children = self.parse_children(parser)?;
        let label = self.parse_vertex_label(parser)?;
        let branch_length = self.parse_branch_length(parser)?;

        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        self.tree.add_root(children, label, branch_length);
        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index.
    fn parse_vertex(&mut self, parser: &mut ByteParser) -> Result<VertexIndex, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            let children = self.parse_children(parser)?;
            let label = self.parse_vertex_label(parser)?;
            let branch_length = self.parse_branch_length(parser)?;
            Ok(self.tree.add_internal(children, label, branch_length))
        } else {
            self.parse_leaf(parser)
        }
    }

    /// Parses a parenthesised, comma-separated list of vertices.
    /// Expects parser at opening `(`.
    fn parse_children(&mut self, parser: &mut ByteParser) -> Result<Vec<VertexIndex>, ParsingError> {
        parser.consume_if(b'(');

        let mut children = vec![self.parse_vertex(parser)?];
        loop {
            parser.skip_comment_and_whitespace()?;
            match parser.next_byte() {
                Some(b',') => children.push(self.parse_vertex(parser)?),
                Some(b')') => return Ok(children),
                Some(other) => {
                    return Err(ParsingError::invalid_newick_string(
                        parser,
                        format!(
                            "Expected ',' or ')' after child but found {:?}",
                            char::from(other)
                        ),
                    ));
                }
                None => return Err(ParsingError::unexpected_eof(parser)),
            }
        }
    }

    /// Parses leaf `label[:branch_length]` and adds it to the tree.
    fn parse_leaf(&mut self, parser: &mut ByteParser) -> Result<VertexIndex, ParsingError> {
        let quoted = parser.peek_is(b'\'');
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if label.is_empty() && !quoted {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected leaf label but found {:?}", next_char),
            ));
        }
        let branch_length = self.parse_branch_length(parser)?;
        Ok(self.tree.add_leaf(label, branch_length))
    }

    /// Parses an optional label after a closing `)`.
    fn parse_vertex_label(&mut self, parser: &mut ByteParser) -> Result<Option<String>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        Ok((!label.is_empty()).then_some(label))
    }

    /// Parses optional branch length `[:number]`.
    /// Supports scientific notation (e.g., `1.5e-10`).
    fn parse_branch_length(&mut self, parser: &mut ByteParser) -> Result<Option<f64>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                branch_length_str.push(char::from(b));
                parser.next_byte();
            } else {
                break;
            }
        }

        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Invalid branch length: {:?}", branch_length_str),
            )
        })?;
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(newick: &str) -> Result<PhyloTree, ParsingError> {
        NewickParser::new().parse_str(&mut ByteParser::for_str(newick))
    }

    #[test]
    fn test_polytomy_and_single_child() {
        let tree = parse("((A),B,C,(D,E,F));").unwrap();
        assert_eq!(tree.num_leaves(), 6);
        assert_eq!(tree.root_degree(), 4);
        let single = tree.root().children().unwrap()[0];
        assert_eq!(tree[single].degree(), 1);
    }

    #[test]
    fn test_missing_semicolon() {
        assert!(parse("(A,B)").is_err());
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse("((A,B);").is_err());
        assert!(parse("(A,B));").is_err());
    }

    #[test]
    fn test_empty_child() {
        assert!(parse("(A,,B);").is_err());
    }

    #[test]
    fn test_internal_label_and_root_length() {
        let tree = parse("((A:0.1,B:0.2)95:0.3,C)root:0.0;").unwrap();
        let ab = tree.root().children().unwrap()[0];
        assert_eq!(tree[ab].label(), Some("95"));
        assert_eq!(tree[ab].branch_length(), Some(0.3));
        assert_eq!(tree.root().label(), Some("root"));
    }
}
