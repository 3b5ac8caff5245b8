//! Span-preserving tokenizer for Newick strings.
//!
//! Text-level edits (requoting, substitution, `%N` stripping) work on the
//! byte spans of label tokens rather than on patterns over the raw string.
//! A label token is always delimited by `(`, `)`, `,`, `:`, `;`, whitespace
//! or a comment, and a quoted label is one opaque token, so a taxon can
//! never be matched as part of a longer label.

use crate::label;
use crate::newick::defs::NEWICK_LABEL_DELIMITERS;
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::ParsingError;
use std::ops::Range;

/// Kind of a Newick token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Open,
    Close,
    Comma,
    Colon,
    Semicolon,
    /// The number following a `:`
    BranchLength,
    /// A (possibly quoted) label; `name` is unquoted,
    /// `leaf` is false for labels following a `)`.
    Label { name: String, leaf: bool },
}

/// A token with its byte span in the source string.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    /// Returns the unquoted name if this is a leaf label token.
    pub fn leaf_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Label { name, leaf: true } => Some(name),
            _ => None,
        }
    }
}

/// Splits a Newick string into tokens, skipping whitespace and `[...]`
/// comments.
///
/// # Errors
/// Returns a [ParsingError] for unclosed comments or quotes, and for
/// characters that cannot start any token (e.g. a stray `]`).
///
/// # Example
/// ```
/// use mrptree::newick::tokenizer::{tokenize, TokenKind};
///
/// let newick = "('Gallus gallus':0.5,B)x;";
/// let tokens = tokenize(newick).unwrap();
/// let leaves: Vec<&str> = tokens.iter().filter_map(|t| t.leaf_name()).collect();
/// assert_eq!(leaves, vec!["Gallus gallus", "B"]);
/// assert_eq!(&newick[tokens[1].span.clone()], "'Gallus gallus'");
/// assert_eq!(tokens[3].kind, TokenKind::BranchLength);
/// ```
pub fn tokenize(newick: &str) -> Result<Vec<Token>, ParsingError> {
    let mut parser = ByteParser::for_str(newick);
    let mut tokens: Vec<Token> = Vec::new();

    loop {
        parser.skip_comment_and_whitespace()?;
        let start = parser.position();
        let Some(byte) = parser.peek() else {
            break;
        };

        let kind = match byte {
            b'(' => single(&mut parser, TokenKind::Open),
            b')' => single(&mut parser, TokenKind::Close),
            b',' => single(&mut parser, TokenKind::Comma),
            b';' => single(&mut parser, TokenKind::Semicolon),
            b':' => {
                parser.next_byte();
                tokens.push(Token {
                    kind: TokenKind::Colon,
                    span: start..parser.position(),
                });
                parser.skip_comment_and_whitespace()?;
                let length_start = parser.position();
                let length = parser.parse_unquoted_label(NEWICK_LABEL_DELIMITERS)?;
                if !length.is_empty() {
                    tokens.push(Token {
                        kind: TokenKind::BranchLength,
                        span: length_start..parser.position(),
                    });
                }
                continue;
            }
            _ => {
                let quoted = byte == b'\'';
                let name = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
                if name.is_empty() && !quoted {
                    return Err(ParsingError::invalid_newick_string(
                        &parser,
                        format!("Unexpected character {:?}", char::from(byte)),
                    ));
                }
                let leaf = !matches!(
                    tokens.last().map(|t| &t.kind),
                    Some(TokenKind::Close)
                );
                TokenKind::Label { name, leaf }
            }
        };

        tokens.push(Token {
            kind,
            span: start..parser.position(),
        });
    }

    Ok(tokens)
}

fn single(parser: &mut ByteParser, kind: TokenKind) -> TokenKind {
    parser.next_byte();
    kind
}

/// Applies replacements of byte spans to `source`.
///
/// Spans must not overlap; they may be given in any order.
pub fn splice(source: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(span, _)| span.start);

    let mut result = String::with_capacity(source.len());
    let mut cursor = 0;
    for (span, replacement) in edits {
        result.push_str(&source[cursor..span.start]);
        result.push_str(&replacement);
        cursor = span.end;
    }
    result.push_str(&source[cursor..]);
    result
}

/// Rewrites every leaf label so that one taxon is always spelled the same
/// way: the quoted form of its canonical label (see [label::requote]).
///
/// Never fails: input that cannot be tokenized is returned unchanged.
///
/// # Example
/// ```
/// use mrptree::newick::requote_tree;
///
/// let tree = "('Gallus gallus',(Gallus_varius,'taxa=2'),taxa=3);";
/// assert_eq!(
///     requote_tree(tree),
///     "(Gallus_gallus,(Gallus_varius,'taxa=2'),'taxa=3');"
/// );
/// ```
pub fn requote_tree(newick: &str) -> String {
    let Ok(tokens) = tokenize(newick) else {
        return newick.to_string();
    };

    let edits = tokens
        .iter()
        .filter(|token| token.leaf_name().is_some())
        .map(|token| {
            let span = token.span.clone();
            let replacement = label::requote(&newick[span.clone()]);
            (span, replacement)
        })
        .collect();
    splice(newick, edits)
}

/// Removes every `%N` candidate marker from the leaf labels of a tree.
///
/// # Errors
/// Returns a [ParsingError] if the string cannot be tokenized.
///
/// # Example
/// ```
/// use mrptree::newick::strip_poly_markers;
///
/// let stripped = strip_poly_markers("((E%1,G),A%12);").unwrap();
/// assert_eq!(stripped, "((E,G),A);");
/// ```
pub fn strip_poly_markers(newick: &str) -> Result<String, ParsingError> {
    let tokens = tokenize(newick)?;

    let edits = tokens
        .iter()
        .filter(|token| token.leaf_name().is_some())
        .filter_map(|token| {
            let canonical = label::canonical(&newick[token.span.clone()]);
            label::has_poly_suffix(&canonical)
                .then(|| (token.span.clone(), label::escape_name(label::base_name(&canonical))))
        })
        .collect();
    Ok(splice(newick, edits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_labels_are_not_leaves() {
        let tokens = tokenize("((A,B)90:1.0,C)root;").unwrap();
        let leaves: Vec<&str> = tokens.iter().filter_map(Token::leaf_name).collect();
        assert_eq!(leaves, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("(A[&rate=1],[x]B);").unwrap();
        let leaves: Vec<&str> = tokens.iter().filter_map(Token::leaf_name).collect();
        assert_eq!(leaves, vec!["A", "B"]);
    }

    #[test]
    fn test_stray_bracket_is_error() {
        assert!(tokenize("(A,B]);").is_err());
    }

    #[test]
    fn test_splice_out_of_order() {
        let spliced = splice("(A,B);", vec![(3..4, "Y".to_string()), (1..2, "X".to_string())]);
        assert_eq!(spliced, "(X,Y);");
    }
}
