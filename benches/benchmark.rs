use criterion::{Criterion, criterion_group, criterion_main};
use mrptree::mrp::{MRP_OUTGROUP, MatrixFormat, MrpMatrix};
use mrptree::permutation::PermutationEngine;
use mrptree::substitution::{SubstitutionRequest, substitute_all};
use std::hint::black_box;

const NUM_TAXA: usize = 64;
const NUM_TREES: usize = 200;

/// Caterpillar on `T0..T{n-1}`, rotated by `offset` so trees differ.
fn caterpillar(num_taxa: usize, offset: usize) -> String {
    let mut newick = format!("T{offset}");
    for i in 1..num_taxa {
        newick = format!("({newick},T{})", (offset + i) % num_taxa);
    }
    newick.push(';');
    newick
}

fn source_trees() -> Vec<(String, String)> {
    (0..NUM_TREES)
        .map(|i| (format!("tree_{i}"), caterpillar(NUM_TAXA, i % NUM_TAXA)))
        .collect()
}

fn batch_substitution(c: &mut Criterion) {
    let trees = source_trees();
    let request = SubstitutionRequest::parse("T1 = T1a, T1b\nT2 =\nT3 = T4\n").unwrap();
    c.bench_function("substitute_all", |b| {
        b.iter(|| substitute_all(black_box(&trees), &request, true).unwrap());
    });
}

fn permutation(c: &mut Criterion) {
    // Three taxa with three placements each: 27 candidates
    let tree = "((A%1,(B%1,C%1)),(D,(A%2,B%2)),(E,(C%2,(F,A%3))),(B%3,(C%3,G)));";
    c.bench_function("permute", |b| {
        b.iter(|| PermutationEngine::new().permute(black_box(tree)).unwrap());
    });
}

fn matrix_assembly(c: &mut Criterion) {
    let trees = source_trees();
    let mut taxa = vec![MRP_OUTGROUP.to_string()];
    taxa.extend((0..NUM_TAXA).map(|i| format!("T{i}")));
    c.bench_function("assemble_hennig", |b| {
        b.iter(|| {
            MrpMatrix::assemble(black_box(&trees), &taxa, None)
                .unwrap()
                .write(MatrixFormat::Hennig, false)
                .unwrap()
        });
    });
}

criterion_group!(regression, batch_substitution, matrix_assembly);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = permutation
}
criterion_main!(regression, reporting);
