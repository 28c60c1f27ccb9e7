// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use dialograph::format::{serialize, validate, ImportOptions, IntegrityMode};
use dialograph::model::{Graph, NodeId, NodeKind, SequentialSource};
use dialograph::ops::{check_consistency, ApplyResult, GraphStore, Op};

// Group names (`ops.apply`, `ops.index`, `ops.import`) and case ids are kept stable so
// results stay comparable across refactors.
fn checksum_apply_result(result: &ApplyResult) -> u64 {
    let mut acc = 0u64;
    acc = acc.wrapping_mul(131).wrapping_add(result.new_rev);
    acc = acc.wrapping_mul(131).wrapping_add(result.applied as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.added.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.updated.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.removed.len() as u64);
    acc
}

/// `contexts` context nodes and `intents` intent nodes, each intent gated by one context
/// and setting the next.
fn fixture(contexts: usize, intents: usize) -> (Graph, Vec<NodeId>, Vec<NodeId>) {
    let mut store = GraphStore::new(Graph::new(), SequentialSource::new("fx-"));
    let context_ids: Vec<_> = (0..contexts)
        .map(|_| store.create_node(NodeKind::Context, None))
        .collect();
    let intent_ids: Vec<_> = (0..intents)
        .map(|_| store.create_node(NodeKind::Intent, None))
        .collect();

    for (idx, intent) in intent_ids.iter().enumerate() {
        let gate = &context_ids[idx % context_ids.len()];
        let next = &context_ids[(idx + 1) % context_ids.len()];
        store.create_edge(gate, intent).expect("gate edge");
        store.create_edge(intent, next).expect("next edge");
    }

    (store.snapshot(), context_ids, intent_ids)
}

fn connect_ops(contexts: &[NodeId], intents: &[NodeId], count: usize) -> Vec<Op> {
    // Offsets 2.. skip the pairs the fixture already joined.
    (0..count)
        .map(|idx| Op::CreateEdge {
            source: contexts[(idx + 2 + idx / intents.len()) % contexts.len()].clone(),
            target: intents[idx % intents.len()].clone(),
        })
        .collect()
}

fn benches_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops.apply");
    let (template, contexts, intents) = fixture(64, 256);

    for (case, count) in [("connect_single", 1usize), ("connect_batch_10", 10), ("connect_batch_200", 200)] {
        let ops = connect_ops(&contexts, &intents, count);
        group.throughput(Throughput::Elements(ops.len() as u64));
        group.bench_function(case, {
            let template = template.clone();
            move |b| {
                b.iter_batched(
                    || GraphStore::new(template.clone(), SequentialSource::new("bench-")),
                    |mut store| {
                        let result = store.apply(0, black_box(&ops)).expect("apply");
                        black_box(checksum_apply_result(&result))
                    },
                    BatchSize::SmallInput,
                )
            }
        });
    }

    group.throughput(Throughput::Elements(1));
    group.bench_function("delete_hub_context", {
        let template = template.clone();
        let hub = contexts[0].clone();
        move |b| {
            b.iter_batched(
                || GraphStore::new(template.clone(), SequentialSource::new("bench-")),
                |mut store| black_box(store.delete_node(black_box(&hub))),
                BatchSize::SmallInput,
            )
        }
    });

    group.bench_function("swap_context_endpoint", {
        let template = template.clone();
        let edge_id = template.edges()[0].id().clone();
        let source = contexts[contexts.len() - 1].clone();
        let target = template.edges()[0].target().clone();
        move |b| {
            b.iter_batched(
                || GraphStore::new(template.clone(), SequentialSource::new("bench-")),
                |mut store| {
                    store
                        .swap_edge_endpoint(&edge_id, black_box(&source), &target)
                        .expect("swap");
                    black_box(store.rev())
                },
                BatchSize::SmallInput,
            )
        }
    });

    group.finish();
}

fn benches_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops.index");
    let (graph, _, _) = fixture(256, 2048);

    group.throughput(Throughput::Elements(graph.edges().len() as u64));
    group.bench_function("check_consistency_large", |b| {
        b.iter(|| black_box(check_consistency(black_box(&graph)).len()))
    });

    group.finish();
}

fn benches_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops.import");
    let (graph, _, _) = fixture(256, 2048);
    let payload = serialize(&graph);

    for (case, integrity) in [
        ("trust_large", IntegrityMode::Trust),
        ("verify_large", IntegrityMode::Verify),
        ("repair_large", IntegrityMode::Repair),
    ] {
        let options = ImportOptions::default().with_integrity(integrity);
        group.throughput(Throughput::Elements(payload.nodes.len() as u64));
        group.bench_function(case, |b| {
            b.iter_batched(
                || payload.clone(),
                |payload| black_box(validate(payload, &options).expect("valid").nodes().len()),
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, benches_apply, benches_index, benches_import);
criterion_main!(benches);
