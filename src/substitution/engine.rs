//! Single-tree taxon substitution and deletion.

use crate::cleanup::{Cleaned, MAX_COLLAPSE_ITERATIONS, collapse_to_fixpoint};
use crate::error::SupertreeError;
use crate::label;
use crate::model::VertexIndex;
use crate::newick::tokenizer::{Token, splice, tokenize};
use crate::newick::{NewickStyle, parse_str, requote_tree};
use std::collections::HashSet;
use std::ops::Range;
use tracing::debug;

/// Result of substituting or deleting a taxon in one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionOutcome {
    /// The taxon was replaced by one or more new labels
    Replaced(String),
    /// The taxon was removed
    Deleted(String),
    /// Cleanup of the edited tree failed, or nothing was left of it
    Unusable,
}

impl SubstitutionOutcome {
    /// Returns the resulting Newick string, or `None` if unusable.
    pub fn into_tree(self) -> Option<String> {
        match self {
            SubstitutionOutcome::Replaced(tree) | SubstitutionOutcome::Deleted(tree) => Some(tree),
            SubstitutionOutcome::Unusable => None,
        }
    }
}

/// Substitutes (or deletes) taxon `old` in a Newick tree.
///
/// `old` is matched against leaf labels in canonical form (quotes and
/// space/underscore spelling do not matter, case does). Unless `old`
/// carries a `%N` suffix itself, every `%N` variant of it matches too.
///
/// * `new = None` (or an empty list): all matching leaves are removed.
/// * One new label: each matching label is replaced in place; a matched
///   `%N` variant keeps its suffix.
/// * Several new labels: duplicates are dropped and, with `skip_existing`,
///   so are labels already present elsewhere in the tree. The remaining
///   labels replace each match as a polytomy `(a, b, ...)`. If none remain,
///   `old` is deleted instead.
///
/// The result is cleaned up (see [collapse_to_fixpoint]).
///
/// # Errors
/// * [SupertreeError::Parse] if the tree is not valid Newick
/// * [SupertreeError::TaxonNotFound] if no leaf matches `old`
///
/// # Example
/// ```
/// use mrptree::substitution::{substitute, SubstitutionOutcome};
///
/// let outcome = substitute("((A,B),F,E,(G,H));", "H", None, false).unwrap();
/// assert_eq!(outcome, SubstitutionOutcome::Deleted("((A, B), F, E, G);".to_string()));
///
/// let new = vec!["Anas acuta".to_string(), "Anas crecca".to_string()];
/// let outcome = substitute("(Anas,B,C);", "Anas", Some(&new), false).unwrap();
/// assert_eq!(outcome.into_tree().unwrap(), "((Anas_acuta, Anas_crecca), B, C);");
/// ```
pub fn substitute(
    tree: &str,
    old: &str,
    new: Option<&[String]>,
    skip_existing: bool,
) -> Result<SubstitutionOutcome, SupertreeError> {
    let tree = requote_tree(tree);
    parse_str(&tree)?;
    let tokens = tokenize(&tree)?;

    let target = label::canonical(old);
    let (matched, others): (Vec<&Token>, Vec<&Token>) = tokens
        .iter()
        .filter(|token| token.leaf_name().is_some())
        .partition(|token| matches_target(&token_canonical(&tree, token), &target));
    if matched.is_empty() {
        return Err(SupertreeError::TaxonNotFound {
            taxon: old.to_string(),
        });
    }

    let mut new_labels = dedup_canonical(new.unwrap_or_default());
    if skip_existing && new_labels.len() > 1 {
        let existing: HashSet<String> = others
            .iter()
            .map(|token| token_canonical(&tree, token))
            .collect();
        new_labels.retain(|new_label| !existing.contains(new_label));
    }

    if new_labels.is_empty() {
        debug!(taxon = %target, occurrences = matched.len(), "Deleting taxon");
        let labels: Vec<String> = matched
            .iter()
            .map(|token| token_canonical(&tree, token))
            .collect();
        let deleted = delete_taxa(&tree, &labels, false)?;
        return Ok(match collapse_to_fixpoint(&deleted, MAX_COLLAPSE_ITERATIONS) {
            Cleaned::Tree(cleaned) => SubstitutionOutcome::Deleted(cleaned),
            Cleaned::Unusable => SubstitutionOutcome::Unusable,
        });
    }

    debug!(taxon = %target, replacements = ?new_labels, "Replacing taxon");
    let edits: Vec<(Range<usize>, String)> = matched
        .iter()
        .map(|token| {
            let matched_label = token_canonical(&tree, token);
            let suffix = if label::has_poly_suffix(&target) {
                ""
            } else {
                label::poly_suffix(&matched_label)
            };
            (token.span.clone(), replacement_text(&new_labels, suffix))
        })
        .collect();
    let replaced = splice(&tree, edits);

    Ok(match collapse_to_fixpoint(&replaced, MAX_COLLAPSE_ITERATIONS) {
        Cleaned::Tree(cleaned) => SubstitutionOutcome::Replaced(cleaned),
        Cleaned::Unusable => SubstitutionOutcome::Unusable,
    })
}

/// Removes every leaf whose label is one of `labels` (exact canonical
/// match, no `%N` expansion), collapsing parents left with a single child.
///
/// No further cleanup is done: sibling leaves sharing a base name are kept
/// and `%N` suffixes stay untouched.
///
/// # Errors
/// * [SupertreeError::Parse] if the tree is not valid Newick
/// * [SupertreeError::TaxonNotFound] for the first label without any leaf,
///   unless `tolerate_missing` is set
///
/// # Example
/// ```
/// use mrptree::substitution::delete_taxa;
///
/// let tree = delete_taxa("((E%1,G%1),A,(G%2,E%2));", &["E%2", "G%1"], false).unwrap();
/// assert_eq!(tree, "(E%1, A, G%2);");
/// ```
pub fn delete_taxa<S: AsRef<str>>(
    tree: &str,
    labels: &[S],
    tolerate_missing: bool,
) -> Result<String, SupertreeError> {
    let mut parsed = parse_str(tree)?;

    let mut doomed: Vec<VertexIndex> = Vec::new();
    for target in labels {
        let canonical = label::canonical(target.as_ref());
        let found = parsed.find_leaves(|name| name == canonical);
        if found.is_empty() && !tolerate_missing {
            return Err(SupertreeError::TaxonNotFound {
                taxon: target.as_ref().to_string(),
            });
        }
        doomed.extend(found);
    }

    for leaf in doomed {
        parsed.remove(leaf, true);
    }
    Ok(parsed.to_newick(NewickStyle::Spaced))
}

/// Returns whether a canonical leaf label matches the canonical target,
/// either exactly or as a `%N` variant of a suffix-free target.
fn matches_target(leaf: &str, target: &str) -> bool {
    leaf == target
        || (!label::has_poly_suffix(target)
            && label::has_poly_suffix(leaf)
            && label::base_name(leaf) == target)
}

fn token_canonical(tree: &str, token: &Token) -> String {
    label::canonical(&tree[token.span.clone()])
}

/// Canonicalises labels and drops repeats, keeping first occurrences.
fn dedup_canonical(labels: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .map(|new_label| label::canonical(new_label))
        .filter(|canonical| !canonical.is_empty() && seen.insert(canonical.clone()))
        .collect()
}

fn replacement_text(new_labels: &[String], suffix: &str) -> String {
    let quoted: Vec<String> = new_labels
        .iter()
        .map(|new_label| label::escape_name(&format!("{new_label}{suffix}")))
        .collect();
    match quoted.as_slice() {
        [single] => single.clone(),
        _ => format!("({})", quoted.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_respected() {
        let outcome = substitute("('taxa_n=taxa_2',taxa_2,C);", "taxa_2", None, false).unwrap();
        assert_eq!(outcome.into_tree().unwrap(), "('taxa_n=taxa_2', C);");
    }

    #[test]
    fn test_quoted_and_underscored_match() {
        let new = vec!["Gallus varius".to_string()];
        let outcome = substitute("('Gallus gallus',B,C);", "Gallus_gallus", Some(&new), false).unwrap();
        assert_eq!(outcome, SubstitutionOutcome::Replaced("(Gallus_varius, B, C);".to_string()));
    }

    #[test]
    fn test_variant_keeps_suffix() {
        let new = vec!["X".to_string()];
        let outcome = substitute("((A%1,B),(A%2,C));", "A", Some(&new), false).unwrap();
        assert_eq!(outcome.into_tree().unwrap(), "((X%1, B), (X%2, C));");
    }

    #[test]
    fn test_suffixed_old_matches_only_itself() {
        let outcome = substitute("((A%1,B),(A%2,C));", "A%2", None, false).unwrap();
        assert_eq!(outcome.into_tree().unwrap(), "((A, B), C);");
    }

    #[test]
    fn test_skip_existing_filters_labels() {
        let new = vec!["B".to_string(), "D".to_string(), "D".to_string(), "E".to_string()];
        let outcome = substitute("(A,B,C);", "A", Some(&new), true).unwrap();
        assert_eq!(outcome.into_tree().unwrap(), "((D, E), B, C);");
    }

    #[test]
    fn test_all_filtered_degrades_to_deletion() {
        let new = vec!["B".to_string(), "C".to_string()];
        let outcome = substitute("((A,D),B,C);", "A", Some(&new), true).unwrap();
        assert_eq!(outcome, SubstitutionOutcome::Deleted("(D, B, C);".to_string()));
    }

    #[test]
    fn test_branch_length_stays_on_polytomy() {
        let new = vec!["X".to_string(), "Y".to_string()];
        let outcome = substitute("(A:0.5,B);", "A", Some(&new), false).unwrap();
        assert_eq!(outcome.into_tree().unwrap(), "((X, Y):0.5, B);");
    }

    #[test]
    fn test_missing_taxon() {
        let error = substitute("(A,B);", "C", None, false).unwrap_err();
        assert!(matches!(error, SupertreeError::TaxonNotFound { taxon } if taxon == "C"));
    }

    #[test]
    fn test_deleting_everything_is_unusable() {
        let outcome = substitute("(A%1,A%2);", "A", None, false).unwrap();
        assert_eq!(outcome, SubstitutionOutcome::Unusable);
    }
}
