//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser] for scanning Newick strings with support
//! for peeking, consuming, comment skipping, and quote-aware label parsing.
//! Both the tree parser and the span tokenizer are built on top of it.

use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser over an owned, in-memory ASCII buffer.
///
/// [ByteParser] keeps track of its position so that callers can record
/// byte spans of what they consumed (see
/// [tokenize](crate::newick::tokenizer::tokenize)).
///
/// # Features
/// - Whitespace and `[...]` comment skipping
/// - Quote-aware label parsing (single quotes, doubled quote as escape)
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use mrptree::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [comment] ('Gallus gallus',B);");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert!(parser.consume_if(b'('));
/// assert_eq!(parser.parse_label(b"(),:;").unwrap(), "Gallus gallus");
/// ```
pub struct ByteParser {
    input: Vec<u8>,
    pos: usize,
}

// ============================================================================
// Construction (pub)
// ============================================================================
impl ByteParser {
    /// Creates a new [ByteParser] by copying the given string.
    pub fn for_str(input: &str) -> Self {
        Self::for_bytes(input.as_bytes())
    }

    /// Creates a new [ByteParser] by copying the given byte slice.
    pub fn for_bytes(input: &[u8]) -> Self {
        Self {
            input: input.to_vec(),
            pos: 0,
        }
    }
}

// ============================================================================
// Peeking & Consuming (pub)
// ============================================================================
impl ByteParser {
    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Checks if the current byte equals `ch` (exact, case-sensitive).
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it equals `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space, tab, newline and carriage return.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) a `[...]` comment if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if !self.peek_is(b'[') {
            return Ok(false);
        }

        let start = self.pos;
        while let Some(b) = self.next_byte() {
            if b == b']' {
                return Ok(true);
            }
        }

        self.pos = start;
        Err(ParsingError::unclosed_comment(self))
    }

    /// Skips (consumes) all consecutive whitespace and `[...]` comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();
        while self.skip_comment()? {
            self.skip_whitespace();
        }
        Ok(())
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the input between `start` and the current position.
    pub fn slice_from(&self, start: usize) -> &[u8] {
        let start = start.min(self.pos);
        &self.input[start..self.pos]
    }

    /// Returns a string from up to `k` bytes from the current position for
    /// error context. Invalid UTF-8 is replaced lossily.
    pub fn get_context_as_string(&self, k: usize) -> String {
        let end = (self.pos + k).min(self.input.len());
        let start = self.pos.min(end);
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }
}

// ============================================================================
// Labels (pub)
// ============================================================================
impl ByteParser {
    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Quoted labels are returned without their enclosing quotes.
    ///
    /// # Errors
    /// Returns an error if a quoted label is not closed.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        if self.peek() == Some(b'\'') {
            self.parse_quoted_label()
        } else {
            self.parse_unquoted_label(delimiters)
        }
    }

    /// Parses a label enclosed in single quotes; a doubled quote (`''`)
    /// inside the label stands for one literal quote.
    ///
    /// Assumes the opening quote has not been consumed yet.
    ///
    /// # Errors
    /// Returns [unclosed_quote](ParsingError::unclosed_quote) if EOF is
    /// reached before the closing quote.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        let start = self.pos;
        self.pos += 1; // opening '

        let mut label = Vec::new();
        loop {
            match self.next_byte() {
                Some(b'\'') => {
                    if self.consume_if(b'\'') {
                        label.push(b'\'');
                    } else {
                        break;
                    }
                }
                Some(b) => label.push(b),
                None => {
                    self.pos = start;
                    return Err(ParsingError::unclosed_quote(self));
                }
            }
        }

        Ok(String::from_utf8_lossy(&label).into_owned())
    }

    /// Parses an unquoted label until any of the given delimiters, whitespace,
    /// or EOF is encountered.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if delimiters.contains(&b) || is_whitespace(b) {
                break;
            }
            self.pos += 1;
        }

        Ok(String::from_utf8_lossy(&self.input[start..self.pos]).into_owned())
    }
}

#[inline(always)]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
