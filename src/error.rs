//! Crate-wide error type.

use crate::parser::ParsingError;
use thiserror::Error;

/// Errors of substitution, permutation and matrix assembly.
///
/// Cleanup failures are not errors: they are reported as
/// [Cleaned::Unusable](crate::cleanup::Cleaned::Unusable) so that one bad
/// source tree does not abort a whole batch.
#[derive(Debug, Error)]
pub enum SupertreeError {
    #[error("Invalid Newick tree{}: {source}", tree_suffix(.tree))]
    Parse {
        tree: Option<String>,
        #[source]
        source: ParsingError,
    },
    #[error("Taxon {taxon:?} not found in tree")]
    TaxonNotFound { taxon: String },
    #[error("Malformed substitution request: {0}")]
    MalformedSubstitutionRequest(String),
    #[error("Uninformative tree: {0}")]
    UninformativeTree(String),
    #[error("Unknown matrix format {0:?}, expected 'hennig', 'tnt' or 'nexus'")]
    MatrixFormat(String),
    #[error("Invalid matrix input: {0}")]
    MatrixInput(String),
    #[error("Permutation would explore {} candidate trees, budget is {budget}", candidates_display(.candidates))]
    CombinatorialOverflow {
        /// `None` if the count does not even fit a `u128`
        candidates: Option<u128>,
        budget: u128,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SupertreeError {
    /// Attaches a tree name to a [Parse](Self::Parse) error; other errors
    /// are returned unchanged.
    pub fn in_tree(self, name: &str) -> Self {
        match self {
            SupertreeError::Parse { source, .. } => SupertreeError::Parse {
                tree: Some(name.to_string()),
                source,
            },
            other => other,
        }
    }
}

impl From<ParsingError> for SupertreeError {
    fn from(source: ParsingError) -> Self {
        SupertreeError::Parse { tree: None, source }
    }
}

fn tree_suffix(tree: &Option<String>) -> String {
    tree.as_ref()
        .map(|name| format!(" '{name}'"))
        .unwrap_or_default()
}

fn candidates_display(candidates: &Option<u128>) -> String {
    candidates.map_or_else(|| "more than 2^128".to_string(), |count| count.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick::parse_str;

    #[test]
    fn test_parse_error_mentions_tree_name() {
        let error: SupertreeError = parse_str("(A,B").unwrap_err().into();
        let message = error.in_tree("smith_2001_1").to_string();
        assert!(message.starts_with("Invalid Newick tree 'smith_2001_1'"));
    }

    #[test]
    fn test_overflow_message() {
        let error = SupertreeError::CombinatorialOverflow {
            candidates: None,
            budget: 1000,
        };
        assert!(error.to_string().contains("more than 2^128"));
    }
}
