//! Basic low-level byte parser functionality.

pub mod byte_parser;
pub mod parsing_error;

pub use byte_parser::ByteParser;
pub use parsing_error::{ParsingError, ParsingErrorType};
