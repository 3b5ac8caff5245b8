use mrptree::cleanup::{
    Cleaned, MAX_COLLAPSE_ITERATIONS, collapse_nodes, collapse_to_fixpoint,
    merge_duplicate_siblings, remove_single_poly_taxa,
};
use mrptree::newick::parse_str;
use proptest::prelude::*;

#[test]
fn test_collapse_polytomy_of_variants() {
    assert_eq!(
        collapse_nodes("((A%1,A%2),(B),C);"),
        Cleaned::Tree("(A, B, C);".to_string())
    );
}

#[test]
fn test_lengths_survive_splicing() {
    assert_eq!(
        collapse_nodes("(((A:1,B:2):0.5):0.5,C:1);"),
        Cleaned::Tree("((A:1, B:2):1, C:1);".to_string())
    );
}

#[test]
fn test_quoted_labels_stay_quoted() {
    assert_eq!(
        collapse_nodes("(('Anas (Mareca) strepera',B),(C));"),
        Cleaned::Tree("(('Anas_(Mareca)_strepera', B), C);".to_string())
    );
}

#[test]
fn test_spellings_of_one_taxon_merge() {
    assert_eq!(
        collapse_nodes("(('Gallus gallus',Gallus_gallus),B);"),
        Cleaned::Tree("(Gallus_gallus, B);".to_string())
    );
}

#[test]
fn test_single_leaf_tree_stays_usable() {
    assert_eq!(collapse_nodes("((A));"), Cleaned::Tree("(A);".to_string()));
}

#[test]
fn test_fixpoint_of_clean_tree_is_itself() {
    let clean = "((A, B), (C, D));";
    assert_eq!(
        collapse_to_fixpoint(clean, MAX_COLLAPSE_ITERATIONS),
        Cleaned::Tree(clean.to_string())
    );
}

#[test]
fn test_fixpoint_without_iterations_returns_input() {
    assert_eq!(
        collapse_to_fixpoint("((A));", 0),
        Cleaned::Tree("((A));".to_string())
    );
}

#[test]
fn test_merge_on_tree() {
    let mut tree = parse_str("(A,A%1,(B,C),A%2);").unwrap();
    assert_eq!(merge_duplicate_siblings(&mut tree), 2);
    assert_eq!(tree.leaf_names(), vec!["A", "B", "C"]);
}

#[test]
fn test_strip_on_tree() {
    let mut tree = parse_str("((E%2,B),(G%1,C),(G%2,D));").unwrap();
    assert_eq!(remove_single_poly_taxa(&mut tree), 1);
    assert_eq!(tree.leaf_names(), vec!["E", "B", "G%1", "C", "G%2", "D"]);
}

#[test]
fn test_strip_ignores_bare_leaves() {
    let mut tree = parse_str("((A,B),(A%1,C));").unwrap();
    assert_eq!(remove_single_poly_taxa(&mut tree), 1);
    assert_eq!(tree.leaf_names(), vec!["A", "B", "A", "C"]);
}

#[test]
fn test_repeated_taxon_becomes_placements() {
    assert_eq!(
        collapse_nodes("(A,(B,C),(A,D));"),
        Cleaned::Tree("(A%1, (B, C), (A%2, D));".to_string())
    );
}

#[test]
fn test_unusable_into_tree() {
    assert_eq!(collapse_nodes("(A,B").into_tree(), None);
}

// --- PROPERTIES ---
/// Random trees over few taxa, with repeats, `%N` variants and
/// single-child clades.
fn arb_messy_tree() -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(vec!["A", "B", "C", "A%1", "A%2", "B%1"]).prop_map(String::from);
    let clade = leaf.prop_recursive(3, 20, 3, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(|children| format!("({})", children.join(",")))
    });
    prop::collection::vec(clade, 1..4).prop_map(|children| format!("({});", children.join(",")))
}

proptest! {
    #[test]
    fn cleanup_is_idempotent(tree in arb_messy_tree()) {
        let Cleaned::Tree(once) = collapse_nodes(&tree) else {
            return Err(TestCaseError::fail(format!("{tree} became unusable")));
        };
        prop_assert_eq!(collapse_nodes(&once), Cleaned::Tree(once.clone()));
    }

    #[test]
    fn cleanup_leaves_no_single_child_clades(tree in arb_messy_tree()) {
        let cleaned = collapse_nodes(&tree).into_tree().unwrap();
        let parsed = parse_str(&cleaned).unwrap();
        for leaf in parsed.leaf_indices() {
            let parent = parsed[leaf].parent().unwrap();
            if parent != parsed.root_index() {
                prop_assert!(parsed[parent].degree() >= 2);
            }
        }
    }
}
