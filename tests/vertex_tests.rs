use mrptree::model::Vertex;
use mrptree::newick::parse_str;

// ============= Branch Length Tests =============
#[test]
fn test_branch_lengths() {
    let vertex = Vertex::new_internal(5, vec![1, 2], None, Some(1.234));
    assert_eq!(vertex.branch_length(), Some(1.234));

    let leaf = Vertex::new_leaf(0, "A".to_string(), None);
    assert_eq!(leaf.branch_length(), None);
}

// ============= Vertex Variant Consistency Tests =============
#[test]
fn test_is_x() {
    let leaf = Vertex::new_leaf(0, "A".to_string(), Some(0.5));
    assert!(leaf.is_leaf());
    assert!(!leaf.is_internal());

    let vertex = Vertex::new_internal(0, vec![1, 2], None, Some(0.5));
    assert!(vertex.is_internal());

    let root = Vertex::new_root(2, vec![0, 1], None, None);
    assert!(root.is_root());
}

#[test]
fn test_clade_labels() {
    let internal = Vertex::new_internal(0, vec![1, 2], None, Some(0.5));
    assert_eq!(internal.label(), None);

    let supported = Vertex::new_internal(0, vec![1, 2], Some("95".to_string()), None);
    assert_eq!(supported.label(), Some("95"));

    let leaf = Vertex::new_leaf(0, "Anas acuta".to_string(), None);
    assert_eq!(leaf.label(), Some("Anas acuta"));
}

#[test]
fn test_parent_unset() {
    let vertex = Vertex::new_internal(0, vec![1, 2], None, Some(0.5));
    assert_eq!(vertex.parent(), None);

    let leaf = Vertex::new_leaf(0, "A".to_string(), Some(0.5));
    assert_eq!(leaf.parent(), None);

    let root = Vertex::new_root(2, vec![42, 43], None, None);
    assert_eq!(root.parent(), None);
}

#[test]
fn test_leaf_has_no_children() {
    let leaf = Vertex::new_leaf(0, "A".to_string(), None);
    assert_eq!(leaf.children(), None);
    assert_eq!(leaf.degree(), 0);
}

#[test]
fn test_multifurcating_degree() {
    let root = Vertex::new_root(9, vec![0, 1, 2, 3], None, None);
    assert_eq!(root.degree(), 4);
    assert_eq!(root.children(), Some(&[0, 1, 2, 3][..]));
}

#[test]
fn test_parent_set_when_attached() {
    let tree = parse_str("((A,B),C);").unwrap();
    let a = tree.find_leaf("A").unwrap();
    let clade = tree[a].parent().unwrap();
    assert!(tree[clade].is_internal());
    assert_eq!(tree[clade].parent(), Some(tree.root_index()));
    assert_eq!(tree[a].index(), a);
}
