//! # Rule Engine Benchmarks
//!
//! Run with: `cargo bench -p stackwright-core`

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use stackwright_core::{
    Connection, NodeChange, Position, StackEditor, TechEdge, TechNode, fallback_catalog, template,
    validate_stack,
};
use std::hint::black_box;

/// A chain of catalog technologies, each connected to the next.
fn chain(size: usize) -> (Vec<TechNode>, Vec<TechEdge>) {
    let catalog = fallback_catalog();
    let nodes: Vec<TechNode> = (0..size)
        .map(|i| {
            let tech = &catalog[i % catalog.len()];
            TechNode::new(
                format!("n{i}"),
                tech.category,
                tech.name.clone(),
                Position::new(i as i32, 0),
            )
        })
        .collect();
    let edges = (1..size)
        .map(|i| TechEdge::new(format!("e{i}"), format!("n{}", i - 1), format!("n{i}")))
        .collect();
    (nodes, edges)
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_stack");
    for size in [5usize, 50, 500] {
        let (nodes, edges) = chain(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| validate_stack(black_box(&nodes), black_box(&edges)));
        });
    }
    group.finish();
}

fn bench_editing(c: &mut Criterion) {
    let seed = template("microservices").expect("template");

    c.bench_function("editor_move_undo_redo", |b| {
        let mut editor = StackEditor::default();
        editor.load_template(seed, Utc::now());
        let id = editor.nodes()[0].id.clone();
        b.iter(|| {
            editor
                .apply_node_changes(&[NodeChange::Move {
                    id: id.clone(),
                    position: Position::new(1, 1),
                }])
                .expect("move");
            editor.undo();
            editor.redo();
        });
    });

    c.bench_function("editor_connect", |b| {
        b.iter(|| {
            let mut editor = StackEditor::default();
            editor.load_template(seed, Utc::now());
            editor
                .connect(black_box(&Connection::new("devops-3", "backend-1")))
                .expect("connect");
        });
    });
}

criterion_group!(benches, bench_validate, bench_editing);
criterion_main!(benches);
