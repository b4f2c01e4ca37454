//! Benchmarks for lattice generation.
//!
//! Run with: cargo bench -p bravais-mesh
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p bravais-mesh -- --save-baseline main
//! 2. After changes: cargo bench -p bravais-mesh -- --baseline main

use bravais_mesh::{
    CellParameters, GridDims, LatticeFamily, UnitCell, assign_major_axes, consolidate_nodes,
    tile, validate_mesh,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn fcc_cell(num_elems: usize) -> UnitCell {
    UnitCell::new(
        LatticeFamily::Fcc,
        &CellParameters::new().with_a(1.0),
        num_elems,
    )
    .unwrap()
}

// =============================================================================
// Unit Cell Benchmarks
// =============================================================================

fn bench_unit_cell(c: &mut Criterion) {
    let mut group = c.benchmark_group("UnitCell");

    for num_elems in [1usize, 4, 16] {
        group.bench_with_input(
            BenchmarkId::new("fcc", num_elems),
            &num_elems,
            |b, &n| b.iter(|| fcc_cell(black_box(n))),
        );
    }

    let triclinic = CellParameters::new()
        .with_a(1.0)
        .with_b(1.2)
        .with_c(1.4)
        .with_alpha(1.3)
        .with_beta(1.4)
        .with_gamma(1.5);
    group.bench_function("triclinic_4", |b| {
        b.iter(|| UnitCell::new(LatticeFamily::Triclinic, black_box(&triclinic), 4).unwrap())
    });

    group.finish();
}

// =============================================================================
// Tiling Benchmarks
// =============================================================================

fn bench_tiling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tiling");
    group.sample_size(20);

    let cell = fcc_cell(2);
    for size in [2usize, 5, 10, 20] {
        let grid = GridDims::new(size, size, size);
        group.throughput(Throughput::Elements(
            (grid.cell_count() * cell.mesh().node_count()) as u64,
        ));
        group.bench_with_input(BenchmarkId::new("fcc", size), &grid, |b, &grid| {
            b.iter(|| tile(black_box(&cell), grid).unwrap())
        });
    }

    group.finish();
}

// =============================================================================
// Consolidation Benchmarks
// =============================================================================

fn bench_consolidation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Consolidation");

    for size in [10usize, 50, 100] {
        // Every point appears twice.
        let points: Vec<_> = (0..size * size * 2)
            .map(|i| {
                let j = i / 2;
                nalgebra::Point3::new((j % size) as f64, (j / size) as f64, 0.5)
            })
            .collect();
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::new("points", points.len()), &points, |b, pts| {
            b.iter(|| consolidate_nodes(black_box(pts)))
        });
    }

    group.finish();
}

// =============================================================================
// Axes and Validation Benchmarks
// =============================================================================

fn bench_axes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Axes");

    let mesh = tile(&fcc_cell(2), GridDims::new(6, 6, 6)).unwrap();
    group.throughput(Throughput::Elements(mesh.element_count() as u64));

    group.bench_function("assign_major_axes_fcc_6", |b| {
        b.iter(|| assign_major_axes(black_box(&mesh), 0.3).unwrap())
    });
    group.bench_function("validate_fcc_6", |b| {
        b.iter(|| validate_mesh(black_box(&mesh)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_unit_cell,
    bench_tiling,
    bench_consolidation,
    bench_axes
);
criterion_main!(benches);
