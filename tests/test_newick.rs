use mrptree::newick::tokenizer::TokenKind;
use mrptree::newick::{
    NewickParser, NewickStyle, parse_all_str, parse_str, requote_tree, strip_poly_markers,
    to_newick, tokenize, write_newick_file,
};
use mrptree::parser::{ByteParser, ParsingErrorType};
use mrptree::parse_newick_file;

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_tree() {
    let tree = parse_str("((A:1.0,B:2.0):3.0,C:4.0):0.5;").unwrap();

    // Test counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert_eq!(tree.root_degree(), 2);

    // Test relationships
    // - Root has children (internal, C)
    let root = tree.root();
    let children = root.children().unwrap();
    let internal = tree.vertex(children[0]);
    assert!(internal.is_internal());
    assert_eq!(internal.branch_length(), Some(3.0));

    // - Internal node has children (A, B)
    let grandchildren = internal.children().unwrap();
    assert_eq!(tree[grandchildren[0]].label(), Some("A"));
    assert_eq!(tree[grandchildren[1]].label(), Some("B"));
    assert_eq!(tree[children[1]].label(), Some("C"));

    assert_eq!(root.branch_length(), Some(0.5));
}

#[test]
fn test_whitespace_comments_and_newlines() {
    let newick = "(\n  'Anas acuta' [pintail] : 0.5 ,\n  (B , C)[&support=0.9]\n) ;";
    let tree = parse_str(newick).unwrap();
    assert_eq!(tree.leaf_names(), vec!["Anas acuta", "B", "C"]);
    assert_eq!(to_newick(&tree, NewickStyle::Compact), "(Anas_acuta:0.5,(B,C));");
}

#[test]
fn test_quoted_label_with_apostrophe() {
    let tree = parse_str("('Baillon''s Crake',B);").unwrap();
    assert_eq!(tree.leaf_names(), vec!["Baillon's Crake", "B"]);
    assert_eq!(tree.to_newick(NewickStyle::Compact), "('Baillon''s_Crake',B);");
}

#[test]
fn test_scientific_branch_length() {
    let tree = parse_str("(A:1.5e-3,B:2E2);").unwrap();
    let lengths: Vec<Option<f64>> = tree
        .leaf_indices()
        .into_iter()
        .map(|leaf| tree[leaf].branch_length())
        .collect();
    assert_eq!(lengths, vec![Some(0.0015), Some(200.0)]);
}

#[test]
fn test_topology_style_drops_lengths_and_labels() {
    let tree = parse_str("((A:1,B:2)95:0.1,C);").unwrap();
    assert_eq!(tree.to_newick(NewickStyle::Topology), "((A,B),C);");
    assert_eq!(tree.to_newick(NewickStyle::Spaced), "((A:1, B:2)95:0.1, C);");
}

#[test]
fn test_written_tree_reparses() {
    let tree = parse_str("(('taxa=2',B),'Cygnus sp.',('x,y',D));").unwrap();
    let written = tree.to_newick(NewickStyle::Compact);
    assert_eq!(written, "(('taxa=2',B),'Cygnus_sp.',('x,y',D));");
    let reparsed = parse_str(&written).unwrap();
    assert_eq!(reparsed.num_leaves(), 5);
}

#[test]
fn test_parse_all_and_single_parser() {
    let trees = parse_all_str("(A,B);\n[second]\n(C,(D,E));\n").unwrap();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[1].num_leaves(), 3);

    let mut byte_parser = ByteParser::for_str("(A,B);");
    let tree = NewickParser::new()
        .with_tree_name("smith_2001")
        .parse_str(&mut byte_parser)
        .unwrap();
    assert_eq!(tree.name(), Some("smith_2001"));
}

// --- TESTS PARSING ERRORS ---
#[test]
fn test_errors() {
    assert!(matches!(
        parse_str("(A,B").unwrap_err().kind(),
        ParsingErrorType::UnexpectedEOF | ParsingErrorType::InvalidNewickString(_)
    ));
    assert!(matches!(
        parse_str("(A,B)[open;").unwrap_err().kind(),
        ParsingErrorType::UnclosedComment
    ));
    assert!(matches!(
        parse_str("('A,B);").unwrap_err().kind(),
        ParsingErrorType::UnclosedQuote
    ));
    assert!(parse_str("A;").is_err());
    assert!(parse_str("").is_err());
}

// --- TESTS TOKENIZER ---
#[test]
fn test_token_spans() {
    let newick = "('Gallus gallus':1e-2,B)95;";
    let tokens = tokenize(newick).unwrap();
    let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
    assert_eq!(kinds.len(), 9);
    assert_eq!(tokens[3].kind, TokenKind::BranchLength);
    assert_eq!(&newick[tokens[3].span.clone()], "1e-2");
    assert_eq!(
        tokens[7].kind,
        TokenKind::Label {
            name: "95".to_string(),
            leaf: false
        }
    );
}

#[test]
fn test_requote_unifies_spellings() {
    let tree = "(('Gallus gallus':1,Gallus_gallus),'Anas (Mareca) strepera');";
    assert_eq!(
        requote_tree(tree),
        "((Gallus_gallus:1,Gallus_gallus),'Anas_(Mareca)_strepera');"
    );
}

#[test]
fn test_requote_keeps_malformed_input() {
    assert_eq!(requote_tree("(A,'B);"), "(A,'B);");
}

#[test]
fn test_strip_markers_only_on_leaves() {
    let stripped = strip_poly_markers("((A%1,'B c%2')x%3,A%2);").unwrap();
    assert_eq!(stripped, "((A,B_c)x%3,A);");
}

// --- TESTS FILES ---
#[test]
fn test_write_and_read_file() {
    let path = std::env::temp_dir().join("mrptree_test_write_and_read.nwk");
    write_newick_file(&path, &["((A,B),(C,D));", "((A,C),(B,D));"]).unwrap();
    let trees = parse_newick_file(&path).unwrap();
    assert_eq!(trees.len(), 2);
    assert!(!trees[0].topology_equal(&trees[1]));
    std::fs::remove_file(&path).unwrap();
}
