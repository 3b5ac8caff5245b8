//! Label classification and quoting for taxon names.
//!
//! Taxon labels are compared in their *canonical* form: no enclosing single
//! quotes, doubled inner quotes undone, and spaces written as underscores.
//! Thus `'Gallus gallus'` and `Gallus_gallus` denote the same taxon.
//!
//! A trailing `%N` (N a positive integer) marks one of several candidate
//! placements of the same taxon within a tree; [base_name] strips it.

/// Punctuation that forces a label to be single-quoted.
pub const QUOTE_TRIGGERS: &[char] = &[
    '(', ')', '.', '?', '"', '=', ',', '&', '^', '$', '@', '+',
];

/// Newick structural characters that could never appear unquoted.
const STRUCTURAL_CHARS: &[char] = &[';', ':', '[', ']', '\'', '\t', '\n', '\r'];

/// Separator between a base name and its candidate number.
pub const POLY_MARKER: char = '%';

/// Checks if a label is enclosed in single quotes.
///
/// # Examples
/// ```
/// # use mrptree::label::is_single_quoted;
/// assert!(is_single_quoted("'Gallus gallus'"));
/// assert!(!is_single_quoted("Gallus_gallus"));
/// assert!(!is_single_quoted("'"));
/// ```
pub fn is_single_quoted(label: &str) -> bool {
    label.len() >= 2 && label.starts_with('\'') && label.ends_with('\'')
}

/// Normalizes an unquoted name: surrounding whitespace trimmed and spaces
/// replaced by underscores.
pub fn normalize(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Returns the canonical form of a label: enclosing quotes removed,
/// doubled inner quotes undone, then [normalize]d.
///
/// # Examples
/// ```
/// # use mrptree::label::canonical;
/// assert_eq!(canonical("'Gallus gallus'"), "Gallus_gallus");
/// assert_eq!(canonical("Gallus gallus"), "Gallus_gallus");
/// assert_eq!(canonical("'Baillon''s Crake'"), "Baillon's_Crake");
/// ```
pub fn canonical(label: &str) -> String {
    let label = label.trim();
    if is_single_quoted(label) {
        normalize(&label[1..label.len() - 1].replace("''", "'"))
    } else {
        normalize(label)
    }
}

/// Returns whether two labels denote the same taxon
/// (quoting and underscore/space insensitive, case-sensitive).
pub fn same_taxon(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

fn contains_quote_trigger(name: &str) -> bool {
    name.chars()
        .any(|c| QUOTE_TRIGGERS.contains(&c) || STRUCTURAL_CHARS.contains(&c))
}

/// Returns `true` iff the label, with underscores read as spaces, contains a
/// character that must not appear in an unquoted Newick label.
///
/// # Examples
/// ```
/// # use mrptree::label::needs_quoting;
/// assert!(!needs_quoting("Gallus_gallus"));
/// assert!(!needs_quoting("Gallus gallus"));
/// assert!(needs_quoting("taxa_n=taxa_2"));
/// assert!(needs_quoting("Cygnus sp."));
/// assert!(needs_quoting("'Anas (Mareca) strepera'"));
/// ```
pub fn needs_quoting(label: &str) -> bool {
    contains_quote_trigger(&canonical(label))
}

/// Writes an unquoted name (e.g. as stored in a tree leaf) as a Newick
/// token: [normalize]d, and wrapped in single quotes with inner quotes
/// doubled if it contains a quoting trigger.
///
/// # Examples
/// ```
/// # use mrptree::label::escape_name;
/// assert_eq!(escape_name("Gallus gallus"), "Gallus_gallus");
/// assert_eq!(escape_name("Baillon's Crake"), "'Baillon''s_Crake'");
/// ```
pub fn escape_name(name: &str) -> String {
    let normalized = normalize(name);
    if contains_quote_trigger(&normalized) {
        format!("'{}'", normalized.replace('\'', "''"))
    } else {
        normalized
    }
}

/// Quotes a label for embedding in Newick text if needed.
///
/// Already quoted labels are returned untouched, anything else goes
/// through [escape_name].
///
/// # Examples
/// ```
/// # use mrptree::label::quote;
/// assert_eq!(quote("Gallus gallus"), "Gallus_gallus");
/// assert_eq!(quote("taxa_n=taxa_2"), "'taxa_n=taxa_2'");
/// assert_eq!(quote("'Gallus gallus'"), "'Gallus gallus'");
/// ```
pub fn quote(label: &str) -> String {
    let label = label.trim();
    if is_single_quoted(label) {
        label.to_string()
    } else {
        escape_name(label)
    }
}

/// Quotes the canonical form of a label, so that every spelling of one taxon
/// ends up with the same Newick token.
///
/// # Examples
/// ```
/// # use mrptree::label::requote;
/// assert_eq!(requote("'Gallus gallus'"), "Gallus_gallus");
/// assert_eq!(requote("'taxa=2'"), "'taxa=2'");
/// ```
pub fn requote(label: &str) -> String {
    escape_name(&canonical(label))
}

/// Splits a label into base name and candidate number, if it carries a
/// `%N` suffix.
fn split_poly(label: &str) -> Option<(&str, usize)> {
    let (base, number) = label.rsplit_once(POLY_MARKER)?;
    if base.is_empty() || number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok().map(|n| (base, n))
}

/// Returns the label without a trailing `%N` suffix.
///
/// Expects an unquoted (e.g. canonical) label.
///
/// # Examples
/// ```
/// # use mrptree::label::base_name;
/// assert_eq!(base_name("Anas%12"), "Anas");
/// assert_eq!(base_name("Anas"), "Anas");
/// assert_eq!(base_name("Anas%"), "Anas%");
/// assert_eq!(base_name("50%a"), "50%a");
/// ```
pub fn base_name(label: &str) -> &str {
    split_poly(label).map_or(label, |(base, _)| base)
}

/// Returns the candidate number `N` of a `%N`-suffixed label.
///
/// # Examples
/// ```
/// # use mrptree::label::poly_index;
/// assert_eq!(poly_index("Anas%3"), Some(3));
/// assert_eq!(poly_index("Anas"), None);
/// ```
pub fn poly_index(label: &str) -> Option<usize> {
    split_poly(label).map(|(_, n)| n)
}

/// Returns whether the label carries a `%N` suffix.
pub fn has_poly_suffix(label: &str) -> bool {
    split_poly(label).is_some()
}

/// Returns the `%N` suffix of a label including the marker (`"%3"`), or an
/// empty string.
pub fn poly_suffix(label: &str) -> &str {
    match split_poly(label) {
        Some((base, _)) => &label[base.len()..],
        None => "",
    }
}
