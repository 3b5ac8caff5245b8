//! Validated list of taxon substitutions, and its text file form.

use crate::error::SupertreeError;
use crate::label;
use std::str::FromStr;

/// Character starting a comment line in a substitution file.
const COMMENT_MARKER: char = '#';

/// One substitution: the taxon to replace and its replacements
/// (`None` for deletion).
pub type Substitution = (String, Option<Vec<String>>);

/// An ordered list of substitutions, applied one after the other.
///
/// Every `old` taxon appears at most once (compared in canonical form) and
/// is never empty. An empty list of new taxa is stored as deletion.
///
/// # File format
/// One record per line, `old = new1, new2, ...`:
/// ```text
/// # Anseriformes, 2024 revision
/// Anas_crecca = Anas crecca, Anas carolinensis
/// 'Cygnus sp.' =
/// Mergus_merganser = Mergus merganser
/// ```
/// An empty right-hand side deletes `old`. Labels may be single-quoted to
/// contain `=` or `,`. Blank lines and lines starting with `#` are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubstitutionRequest {
    substitutions: Vec<Substitution>,
}

impl SubstitutionRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a request from parallel lists of old taxa and their
    /// replacements.
    ///
    /// # Errors
    /// [SupertreeError::MalformedSubstitutionRequest] if the lists differ in
    /// length, an old taxon is empty, or an old taxon is repeated.
    pub fn from_lists<S: AsRef<str>>(
        old: &[S],
        new: &[Option<Vec<String>>],
    ) -> Result<Self, SupertreeError> {
        if old.len() != new.len() {
            return Err(SupertreeError::MalformedSubstitutionRequest(format!(
                "{} old taxa but {} replacement lists",
                old.len(),
                new.len()
            )));
        }

        let mut request = Self::new();
        for (old_taxon, new_taxa) in old.iter().zip(new) {
            request.push(old_taxon.as_ref(), new_taxa.clone())?;
        }
        Ok(request)
    }

    /// Appends a substitution.
    ///
    /// # Errors
    /// [SupertreeError::MalformedSubstitutionRequest] if `old` is empty or
    /// already part of this request.
    pub fn push(&mut self, old: &str, new: Option<Vec<String>>) -> Result<(), SupertreeError> {
        let canonical = label::canonical(old);
        if canonical.is_empty() {
            return Err(SupertreeError::MalformedSubstitutionRequest(
                "empty taxon to substitute".to_string(),
            ));
        }
        if self
            .substitutions
            .iter()
            .any(|(existing, _)| label::canonical(existing) == canonical)
        {
            return Err(SupertreeError::MalformedSubstitutionRequest(format!(
                "taxon {old:?} is substituted more than once"
            )));
        }

        let new = new.filter(|taxa| !taxa.is_empty());
        self.substitutions.push((old.trim().to_string(), new));
        Ok(())
    }

    /// Parses a substitution file (see [type-level docs](Self)).
    ///
    /// # Errors
    /// [SupertreeError::MalformedSubstitutionRequest] naming the line of the
    /// first record without `=`, with an empty old taxon, or repeating an
    /// old taxon.
    ///
    /// # Example
    /// ```
    /// use mrptree::substitution::SubstitutionRequest;
    ///
    /// let request = SubstitutionRequest::parse("A = X, Y\n# dropped\nB =\n").unwrap();
    /// assert_eq!(request.len(), 2);
    /// assert_eq!(request.substitutions()[1], ("B".to_string(), None));
    /// ```
    pub fn parse(text: &str) -> Result<Self, SupertreeError> {
        let mut request = Self::new();
        for (line_number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }

            let malformed = |reason: &str| {
                SupertreeError::MalformedSubstitutionRequest(format!(
                    "line {}: {reason}: {line:?}",
                    line_number + 1
                ))
            };

            let separator = find_unquoted(line, '=').ok_or_else(|| malformed("missing '='"))?;
            let old = line[..separator].trim();
            let new: Vec<String> = split_unquoted(&line[separator + 1..], ',')
                .into_iter()
                .map(str::trim)
                .filter(|taxon| !taxon.is_empty())
                .map(str::to_string)
                .collect();

            request
                .push(old, Some(new))
                .map_err(|error| malformed(&error.to_string()))?;
        }
        Ok(request)
    }

    /// Returns the substitutions in order.
    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    pub fn len(&self) -> usize {
        self.substitutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }
}

impl FromStr for SubstitutionRequest {
    type Err = SupertreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns the byte position of the first `target` outside single quotes.
fn find_unquoted(text: &str, target: char) -> Option<usize> {
    let mut quoted = false;
    for (position, c) in text.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            c if c == target && !quoted => return Some(position),
            _ => {}
        }
    }
    None
}

/// Splits `text` at every `separator` outside single quotes.
fn split_unquoted(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(position) = find_unquoted(rest, separator) {
        parts.push(&rest[..position]);
        rest = &rest[position + separator.len_utf8()..];
    }
    parts.push(rest);
    parts
}
