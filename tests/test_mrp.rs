use mrptree::SupertreeError;
use mrptree::mrp::{MRP_OUTGROUP, MatrixFormat, MrpCell, MrpMatrix, assemble};
use proptest::prelude::*;
use std::collections::HashMap;

const SUPERSET: [&str; 9] = [MRP_OUTGROUP, "A", "B", "C", "D", "E", "F", "G", "H"];

fn two_trees() -> MrpMatrix {
    let trees = [("t1", "((A,B),F,E,(G,H));"), ("t2", "(A,B,C,D,E,F);")];
    MrpMatrix::assemble(&trees, &SUPERSET, None).unwrap()
}

#[test]
fn test_missing_taxa_per_block() {
    let matrix = two_trees();
    // One character per clade: (A,B), (G,H) and the root; the star tree
    // only has its root
    assert_eq!(matrix.num_characters(), 4);
    assert_eq!(matrix.blocks()[0].len(), 3);
    assert_eq!(matrix.blocks()[1].len(), 1);

    assert_eq!(matrix.row_string(0), "0000");
    assert_eq!(matrix.row_string(1), "1011");
    assert_eq!(matrix.row_string(3), "???1");
    assert_eq!(matrix.row_string(4), "???1");
    assert_eq!(matrix.row_string(7), "011?");
    assert_eq!(matrix.row_string(8), "011?");
}

#[test]
fn test_every_row_is_complete() {
    let matrix = two_trees();
    for index in 0..matrix.num_taxa() {
        assert_eq!(matrix.row(index).len(), matrix.num_characters());
    }
    assert_eq!(matrix.row_of("MRP_Outgroup").unwrap()[0], MrpCell::Zero);
    assert_eq!(matrix.row_of("G").unwrap()[3], MrpCell::Missing);
    assert_eq!(matrix.row_of("Z"), None);
}

#[test]
fn test_hennig_output() {
    let hennig = two_trees().write(MatrixFormat::Hennig, false).unwrap();
    let lines: Vec<&str> = hennig.lines().collect();
    assert_eq!(lines[0], "xread");
    assert_eq!(lines[1], "4 9");
    assert_eq!(lines[2], "MRP_Outgroup\t0000");
    assert_eq!(lines[10], "H\t011?");
    assert_eq!(lines[11], ";");
    assert_eq!(lines[12], "proc /;");
    assert!(!hennig.contains("ccode"));
}

#[test]
fn test_nexus_charsets() {
    let nexus = two_trees().write(MatrixFormat::Nexus, false).unwrap();
    assert!(nexus.starts_with("#nexus\n\nbegin data;\n\tdimensions ntax=9 nchar=4;\n"));
    assert!(nexus.contains("\tcharset t1 = 1-3;\n\tcharset t2 = 4-4;\nend;\n"));
}

#[test]
fn test_weights() {
    let trees = [("t1", "((A,B),F,E,(G,H));"), ("t2", "(A,B,C,D,E,F);")];
    let weights = HashMap::from([("t2".to_string(), 0.25)]);
    let matrix = MrpMatrix::assemble(&trees, &SUPERSET, Some(&weights)).unwrap();
    assert_eq!(matrix.blocks()[0].weight, 1.0);
    assert_eq!(matrix.blocks()[1].weight, 0.25);

    let hennig = matrix.to_hennig(false).unwrap();
    assert!(hennig.ends_with(";\nccode +[/1 0 1 2;\nccode +[/.25 3;\nproc /;\n"));
}

#[test]
fn test_quoted_names_match_superset() {
    let trees = [("t1", "(('Anas acuta',B),C);")];
    let matrix = MrpMatrix::assemble(&trees, &[MRP_OUTGROUP, "Anas_acuta", "B", "C"], None).unwrap();
    assert_eq!(matrix.row_string(1), "11");

    let hennig = matrix.to_hennig(true).unwrap();
    assert!(hennig.contains("'Anas_acuta'\t11\n"));
}

#[test]
fn test_uninformative_tree_is_still_encoded() {
    let matrix = MrpMatrix::assemble(&[("t1", "(A);")], &[MRP_OUTGROUP, "A", "B"], None).unwrap();
    assert_eq!(matrix.num_characters(), 1);
    assert_eq!(matrix.row_string(1), "1");
    assert_eq!(matrix.row_string(2), "?");
}

// --- ERRORS ---
#[test]
fn test_input_errors() {
    let no_trees: [(&str, &str); 0] = [];
    assert!(matches!(
        MrpMatrix::assemble(&no_trees, &SUPERSET, None),
        Err(SupertreeError::MatrixInput(_))
    ));
    assert!(matches!(
        MrpMatrix::assemble(&[("t1", "((A,B),Z);")], &SUPERSET, None),
        Err(SupertreeError::MatrixInput(_))
    ));
    assert!(matches!(
        MrpMatrix::assemble(&[("t1", "(A,B);")], &["A", "B", "A"], None),
        Err(SupertreeError::MatrixInput(_))
    ));
    assert!(matches!(
        MrpMatrix::assemble(&[("broken", "((A,B),C;")], &SUPERSET, None),
        Err(SupertreeError::Parse { tree: Some(_), .. })
    ));
}

#[test]
fn test_repeated_taxon_is_rejected() {
    let result = MrpMatrix::assemble(&[("t1", "(B,(B,C),D);")], &SUPERSET, None);
    assert!(matches!(result, Err(SupertreeError::MatrixInput(message)) if message.contains("t1")));
}

#[test]
fn test_quick_api() {
    let trees = [("t1", "((A,B),C);")];
    let taxa = [MRP_OUTGROUP, "A", "B", "C"];
    let hennig = assemble(&trees, &taxa, None, "tnt", false).unwrap();
    assert!(hennig.starts_with("xread\n2 4\n"));
    assert!(matches!(
        assemble(&trees, &taxa, None, "phylip", false),
        Err(SupertreeError::MatrixFormat(_))
    ));
}

#[test]
fn test_write_file() {
    let path = std::env::temp_dir().join("mrptree_test_write_file.nex");
    two_trees().write_file(&path, MatrixFormat::Nexus, false).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, two_trees().to_nexus(false).unwrap());
    std::fs::remove_file(&path).unwrap();
}

// --- PROPERTIES ---
/// Random binary trees on the distinct taxa `T1..Tn`.
fn arb_binary_tree() -> impl Strategy<Value = (String, usize)> {
    let clade = Just("L".to_string()).prop_recursive(4, 32, 2, |inner| {
        (inner.clone(), inner).prop_map(|(left, right)| format!("({left},{right})"))
    })
    .boxed();
    (clade.clone(), clade).prop_map(|(left, right)| {
        let mut next = 0;
        let newick: String = format!("({left},{right});")
            .chars()
            .map(|c| {
                if c == 'L' {
                    next += 1;
                    format!("T{next}")
                } else {
                    c.to_string()
                }
            })
            .collect();
        (newick, next)
    })
}

proptest! {
    #[test]
    fn binary_tree_gives_one_character_per_clade((tree, num_leaves) in arb_binary_tree()) {
        let mut taxa = vec![MRP_OUTGROUP.to_string()];
        taxa.extend((1..=num_leaves).map(|n| format!("T{n}")));
        taxa.push("Absent".to_string());

        let matrix = MrpMatrix::assemble(&[("t", tree.as_str())], &taxa, None).unwrap();
        prop_assert_eq!(matrix.num_characters(), num_leaves - 1);
        prop_assert!(matrix.row(0).iter().all(|&cell| cell == MrpCell::Zero));
        prop_assert!(matrix.row(num_leaves + 1).iter().all(|&cell| cell == MrpCell::Missing));
        // The root clade holds every taxon of the tree
        for row in 1..=num_leaves {
            prop_assert_eq!(matrix.row(row)[num_leaves - 2], MrpCell::One);
        }
    }
}
