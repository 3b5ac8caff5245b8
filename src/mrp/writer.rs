//! Hennig86/TNT and NEXUS writers for [MrpMatrix].

use crate::error::SupertreeError;
use crate::label;
use crate::mrp::defs::{
    BLOCK_BEGIN, BLOCK_END, CCODE_WEIGHT, CHARSET, DATA, DIMENSIONS, FORMAT_MISSING, MATRIX,
    NCHAR, NEXUS_HEADER, NTAX, PROC_END, SETS, XREAD,
};
use crate::mrp::matrix::MrpMatrix;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Output format of an [MrpMatrix].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    /// Hennig86 `xread` format, as read by TNT
    Hennig,
    /// NEXUS `data` block plus a `sets` block with one charset per tree
    Nexus,
}

impl FromStr for MatrixFormat {
    type Err = SupertreeError;

    /// Parses `hennig`, `tnt` or `nexus` (case insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hennig" | "tnt" => Ok(MatrixFormat::Hennig),
            "nexus" => Ok(MatrixFormat::Nexus),
            _ => Err(SupertreeError::MatrixFormat(s.to_string())),
        }
    }
}

/// Formats a character weight with at most three decimals, without
/// trailing zeros and without a leading zero.
///
/// # Examples
/// ```
/// # use mrptree::mrp::format_weight;
/// assert_eq!(format_weight(0.5), ".5");
/// assert_eq!(format_weight(1.0), "1");
/// assert_eq!(format_weight(2.125), "2.125");
/// assert_eq!(format_weight(0.3333), ".333");
/// ```
pub fn format_weight(weight: f64) -> String {
    let fixed = format!("{weight:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed.strip_prefix("0.") {
        Some(fraction) => format!(".{fraction}"),
        None if trimmed.is_empty() => "0".to_string(),
        None => trimmed.to_string(),
    }
}

// ============================================================================
// Matrix output (pub)
// ============================================================================
impl MrpMatrix {
    /// Returns the matrix as text in the given format.
    ///
    /// With `quote_taxa`, taxon names are enclosed in single quotes.
    ///
    /// # Errors
    /// Only fails if writing to memory fails.
    pub fn write(&self, format: MatrixFormat, quote_taxa: bool) -> Result<String, SupertreeError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, format, quote_taxa)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Writes the matrix in the given format to a file.
    ///
    /// # Errors
    /// Returns an I/O error if creating or writing the file fails.
    pub fn write_file<P: AsRef<Path>>(
        &self,
        path: P,
        format: MatrixFormat,
        quote_taxa: bool,
    ) -> Result<(), SupertreeError> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file), format, quote_taxa)?;
        Ok(())
    }

    /// Writes the matrix in the given format to any writer.
    pub fn write_to<W: Write>(&self, writer: W, format: MatrixFormat, quote_taxa: bool) -> io::Result<()> {
        let mut matrix_writer = MatrixWriter::new(writer, quote_taxa);
        match format {
            MatrixFormat::Hennig => matrix_writer.write_hennig(self)?,
            MatrixFormat::Nexus => matrix_writer.write_nexus(self)?,
        };
        matrix_writer.flush()
    }

    /// Returns the matrix in Hennig86/TNT format.
    ///
    /// # Example
    /// ```
    /// use mrptree::mrp::{MrpMatrix, MRP_OUTGROUP};
    ///
    /// let matrix = MrpMatrix::assemble(&[("t1", "((A,B),C);")], &[MRP_OUTGROUP, "A", "B", "C"], None).unwrap();
    /// assert_eq!(
    ///     matrix.to_hennig(false).unwrap(),
    ///     "xread\n2 4\nMRP_Outgroup\t00\nA\t11\nB\t11\nC\t01\n;\nproc /;\n"
    /// );
    /// ```
    pub fn to_hennig(&self, quote_taxa: bool) -> Result<String, SupertreeError> {
        self.write(MatrixFormat::Hennig, quote_taxa)
    }

    /// Returns the matrix in NEXUS format.
    pub fn to_nexus(&self, quote_taxa: bool) -> Result<String, SupertreeError> {
        self.write(MatrixFormat::Nexus, quote_taxa)
    }
}

// =#========================================================================#=
// MATRIX WRITER
// =#========================================================================#=
/// Writer for [MrpMatrix] text formats, chaining small writes.
struct MatrixWriter<W: Write> {
    writer: W,
    quote_taxa: bool,
}

// ============================================================================
// Format writing (private)
// ============================================================================
impl<W: Write> MatrixWriter<W> {
    fn new(writer: W, quote_taxa: bool) -> Self {
        MatrixWriter { writer, quote_taxa }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Writes `xread`, dimensions, rows, weights and `proc /;`.
    fn write_hennig(&mut self, matrix: &MrpMatrix) -> io::Result<&mut Self> {
        // "xread"
        self.write_all(XREAD)?.newline()?;

        // "<nchar> <ntaxa>"
        self.write_all(matrix.num_characters().to_string().as_bytes())?
            .space()?
            .write_all(matrix.num_taxa().to_string().as_bytes())?
            .newline()?;

        self.rows(matrix)?.semicolon_ln()?;

        // "ccode +[/<weight> <columns>;"
        if matrix.is_weighted() {
            for (weight, columns) in matrix.weight_groups() {
                self.write_all(CCODE_WEIGHT)?
                    .write_all(format_weight(weight).as_bytes())?;
                for column in columns {
                    self.space()?.write_all(column.to_string().as_bytes())?;
                }
                self.semicolon_ln()?;
            }
        }

        self.write_all(PROC_END)?.newline()
    }

    /// Writes the `data` block followed by the `sets` block.
    ///
    /// Charsets are written as `charset <name> = <first>-<last>;`, with the
    /// `=` of the NEXUS `CHARSET` command rather than the shorter
    /// `charset <name> <first>-<last>;` form, which strict NEXUS readers reject.
    fn write_nexus(&mut self, matrix: &MrpMatrix) -> io::Result<&mut Self> {
        self.write_all(NEXUS_HEADER)?.newline()?.newline()?;

        // "begin data;"
        self.write_all(BLOCK_BEGIN)?.space()?.write_all(DATA)?.newline()?;

        // "\tdimensions ntax=<t> nchar=<c>;"
        self.tab()?
            .write_all(DIMENSIONS)?
            .space()?
            .write_all(NTAX)?
            .equals()?
            .write_all(matrix.num_taxa().to_string().as_bytes())?
            .space()?
            .write_all(NCHAR)?
            .equals()?
            .write_all(matrix.num_characters().to_string().as_bytes())?
            .semicolon_ln()?;

        // "\tformat missing = ?;"
        self.tab()?.write_all(FORMAT_MISSING)?.newline()?;

        // "\tmatrix", rows, ";"
        self.tab()?.write_all(MATRIX)?.newline()?;
        self.rows(matrix)?.semicolon_ln()?;
        self.write_all(BLOCK_END)?.newline()?.newline()?;

        // "begin sets;", "\tcharset <name> = <first>-<last>;", "end;"
        self.write_all(BLOCK_BEGIN)?.space()?.write_all(SETS)?.newline()?;
        for block in matrix.blocks() {
            self.tab()?
                .write_all(CHARSET)?
                .space()?
                .write_all(label::escape_name(&block.name).as_bytes())?
                .space()?
                .equals()?
                .space()?
                .write_all(format!("{}-{}", block.first, block.last).as_bytes())?
                .semicolon_ln()?;
        }
        self.write_all(BLOCK_END)?.newline()
    }

    /// Writes one `name<TAB>cells` line per taxon.
    fn rows(&mut self, matrix: &MrpMatrix) -> io::Result<&mut Self> {
        for (index, taxon) in matrix.taxa().iter().enumerate() {
            let name = if self.quote_taxa {
                format!("'{}'", taxon.replace('\'', "''"))
            } else {
                taxon.clone()
            };
            self.write_all(name.as_bytes())?
                .tab()?
                .write_all(matrix.row_string(index).as_bytes())?
                .newline()?;
        }
        Ok(self)
    }
}

// ============================================================================
// Little Helpers (private)
// ============================================================================
impl<W: Write> MatrixWriter<W> {
    /// Appends a byte slice, returning itself for chaining.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<&mut Self> {
        self.writer.write_all(buf)?;
        Ok(self)
    }

    fn space(&mut self) -> io::Result<&mut Self> {
        self.write_all(b" ")
    }

    fn tab(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"\t")
    }

    fn newline(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"\n")
    }

    fn equals(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"=")
    }

    /// Appends a semicolon followed by a newline (';\n').
    fn semicolon_ln(&mut self) -> io::Result<&mut Self> {
        self.write_all(b";\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mrp::MRP_OUTGROUP;
    use std::collections::HashMap;

    #[test]
    fn test_format_names() {
        assert_eq!("TNT".parse::<MatrixFormat>().unwrap(), MatrixFormat::Hennig);
        assert_eq!("Nexus".parse::<MatrixFormat>().unwrap(), MatrixFormat::Nexus);
        assert!(matches!(
            "phylip".parse::<MatrixFormat>(),
            Err(SupertreeError::MatrixFormat(_))
        ));
    }

    #[test]
    fn test_weight_groups_in_hennig() {
        let trees = [("t1", "((A,B),C);"), ("t2", "((A,C),B);"), ("t3", "(A,(B,C));")];
        let weights = HashMap::from([("t1".to_string(), 0.5), ("t3".to_string(), 0.5)]);
        let matrix = MrpMatrix::assemble(&trees, &[MRP_OUTGROUP, "A", "B", "C"], Some(&weights)).unwrap();
        let hennig = matrix.to_hennig(false).unwrap();
        assert!(hennig.contains("\nccode +[/.5 0 1 4 5;\nccode +[/1 2 3;\nproc /;\n"));
    }

    #[test]
    fn test_nexus_layout() {
        let matrix = MrpMatrix::assemble(&[("smith 2001", "((A,B),C);")], &[MRP_OUTGROUP, "A", "B", "C"], None)
            .unwrap();
        let nexus = matrix.to_nexus(true).unwrap();
        assert_eq!(
            nexus,
            "#nexus\n\nbegin data;\n\tdimensions ntax=4 nchar=2;\n\tformat missing = ?;\n\tmatrix\n\
             'MRP_Outgroup'\t00\n'A'\t11\n'B'\t11\n'C'\t01\n;\nend;\n\n\
             begin sets;\n\tcharset smith_2001 = 1-2;\nend;\n"
        );
    }
}
