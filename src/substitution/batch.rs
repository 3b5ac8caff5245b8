//! Applying a [SubstitutionRequest] to many source trees.

use crate::error::SupertreeError;
use crate::substitution::engine::{SubstitutionOutcome, substitute};
use crate::substitution::request::SubstitutionRequest;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Result of applying a whole request to one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOutcome {
    /// At least one substitution applied; the cleaned tree
    Modified(String),
    /// No taxon of the request occurs in the tree; the input tree
    Unchanged(String),
    /// A substitution left the tree unusable
    Unusable,
}

/// Applies every substitution of `request`, in order, to each named tree.
///
/// Trees are processed in parallel; the substitutions of one tree are
/// applied sequentially, each on the cleaned result of the previous one.
/// Taxa absent from a tree are skipped for that tree.
///
/// # Returns
/// `(tree name, outcome)` pairs in input order.
///
/// # Errors
/// The first [SupertreeError::Parse] encountered, carrying the tree name.
///
/// # Example
/// ```
/// use mrptree::substitution::{substitute_all, SubstitutionRequest, TreeOutcome};
///
/// let trees = vec![
///     ("smith_2001".to_string(), "((A,B),C,D);".to_string()),
///     ("jones_2003".to_string(), "(B,C,D);".to_string()),
/// ];
/// let request = SubstitutionRequest::parse("A = X").unwrap();
/// let results = substitute_all(&trees, &request, false).unwrap();
/// assert_eq!(results[0].1, TreeOutcome::Modified("((X, B), C, D);".to_string()));
/// assert_eq!(results[1].1, TreeOutcome::Unchanged("(B,C,D);".to_string()));
/// ```
pub fn substitute_all<N, T>(
    trees: &[(N, T)],
    request: &SubstitutionRequest,
    skip_existing: bool,
) -> Result<Vec<(String, TreeOutcome)>, SupertreeError>
where
    N: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
{
    let results: Vec<(String, TreeOutcome)> = trees
        .par_iter()
        .map(|(name, tree)| {
            let outcome = substitute_tree(name.as_ref(), tree.as_ref(), request, skip_existing)?;
            Ok((name.as_ref().to_string(), outcome))
        })
        .collect::<Result<_, SupertreeError>>()?;

    let modified = results
        .iter()
        .filter(|(_, outcome)| matches!(outcome, TreeOutcome::Modified(_)))
        .count();
    let unusable = results
        .iter()
        .filter(|(_, outcome)| matches!(outcome, TreeOutcome::Unusable))
        .count();
    info!(
        trees = results.len(),
        modified,
        unusable,
        substitutions = request.len(),
        "Applied substitutions"
    );
    Ok(results)
}

fn substitute_tree(
    name: &str,
    tree: &str,
    request: &SubstitutionRequest,
    skip_existing: bool,
) -> Result<TreeOutcome, SupertreeError> {
    let mut current = tree.to_string();
    let mut modified = false;

    for (old, new) in request.substitutions() {
        match substitute(&current, old, new.as_deref(), skip_existing) {
            Ok(SubstitutionOutcome::Replaced(next)) | Ok(SubstitutionOutcome::Deleted(next)) => {
                current = next;
                modified = true;
            }
            Ok(SubstitutionOutcome::Unusable) => {
                warn!(tree = name, taxon = %old, "Tree became unusable after substitution");
                return Ok(TreeOutcome::Unusable);
            }
            Err(SupertreeError::TaxonNotFound { .. }) => {
                debug!(tree = name, taxon = %old, "Taxon not in tree, skipping");
            }
            Err(error) => return Err(error.in_tree(name)),
        }
    }

    Ok(if modified {
        TreeOutcome::Modified(current)
    } else {
        TreeOutcome::Unchanged(tree.to_string())
    })
}
