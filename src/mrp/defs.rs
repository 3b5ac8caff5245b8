//! Keywords of the matrix output formats.

// Hennig86 / TNT
pub(crate) const XREAD: &[u8] = b"xread";

pub(crate) const CCODE_WEIGHT: &[u8] = b"ccode +[/";

pub(crate) const PROC_END: &[u8] = b"proc /;";

// NEXUS
pub(crate) const NEXUS_HEADER: &[u8] = b"#nexus";

pub(crate) const BLOCK_BEGIN: &[u8] = b"begin";

pub(crate) const BLOCK_END: &[u8] = b"end;";

pub(crate) const DATA: &[u8] = b"data;";

pub(crate) const SETS: &[u8] = b"sets;";

pub(crate) const DIMENSIONS: &[u8] = b"dimensions";

pub(crate) const NTAX: &[u8] = b"ntax";

pub(crate) const NCHAR: &[u8] = b"nchar";

pub(crate) const FORMAT_MISSING: &[u8] = b"format missing = ?;";

pub(crate) const MATRIX: &[u8] = b"matrix";

pub(crate) const CHARSET: &[u8] = b"charset";
