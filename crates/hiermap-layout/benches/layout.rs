//! Benchmarks for treemap and sunburst layout passes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hiermap_core::{NodeRecord, Rect, SunburstOptions, Tree, TreeKind, TreemapLayoutMode, TreemapOptions};
use hiermap_layout::{PolarLayout, RectLayout};
use std::f64::consts::{FRAC_PI_2, TAU};

/// `fanout` groups of `fanout` leaves with varied sizes.
fn two_level(fanout: usize) -> Vec<NodeRecord> {
    let groups = (0..fanout)
        .map(|g| {
            let leaves = (0..fanout)
                .map(|l| NodeRecord::leaf(&format!("g{g}-l{l}"), ((g * 7 + l * 13) % 29 + 1) as f64))
                .collect();
            NodeRecord::group(&format!("g{g}"), leaves)
        })
        .collect();
    vec![NodeRecord::group("root", groups)]
}

fn bench_squarified(c: &mut Criterion) {
    let layout = RectLayout::new(&TreemapOptions::default());
    let viewport = Rect::new(0.0, 0.0, 1280.0, 800.0);

    for fanout in [10, 32] {
        let mut tree = Tree::from_records(&two_level(fanout), TreeKind::Rect);
        let Some(root) = tree.root() else { return };
        c.bench_function(&format!("squarified_{fanout}x{fanout}"), |b| {
            b.iter(|| layout.layout(black_box(&mut tree), root, black_box(viewport), false))
        });
    }
}

fn bench_slice_and_dice(c: &mut Criterion) {
    let options = TreemapOptions {
        layout: TreemapLayoutMode::SliceAndDiceHorizontal,
        ..TreemapOptions::default()
    };
    let layout = RectLayout::new(&options);
    let viewport = Rect::new(0.0, 0.0, 1280.0, 800.0);
    let mut tree = Tree::from_records(&two_level(32), TreeKind::Rect);
    let Some(root) = tree.root() else { return };

    c.bench_function("slice_and_dice_32x32", |b| {
        b.iter(|| layout.layout(black_box(&mut tree), root, black_box(viewport), false))
    });
}

fn bench_polar(c: &mut Criterion) {
    let layout = PolarLayout::new(&SunburstOptions::default());
    let mut tree = Tree::from_records(&two_level(32), TreeKind::Polar);
    let Some(root) = tree.root() else { return };

    c.bench_function("polar_32x32", |b| {
        b.iter(|| layout.layout(black_box(&mut tree), root, black_box(400.0), -FRAC_PI_2, TAU))
    });
}

fn bench_tree_build(c: &mut Criterion) {
    let records = two_level(32);
    c.bench_function("tree_from_records_32x32", |b| {
        b.iter(|| Tree::from_records(black_box(&records), TreeKind::Rect))
    });
}

criterion_group!(
    benches,
    bench_squarified,
    bench_slice_and_dice,
    bench_polar,
    bench_tree_build,
);
criterion_main!(benches);
