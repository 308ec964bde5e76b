/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xrd_rs::crystal::{Lattice, Site, Structure};
use xrd_rs::xrd::families::PointGroup;
use xrd_rs::xrd::reciprocal::points_in_shell;
use xrd_rs::xrd::{ScatteringTable, XrdCalculator};

fn rock_salt() -> Structure {
    let lattice = Lattice::cubic(5.64).unwrap();
    let mut sites = Vec::new();
    for f in [[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]] {
        sites.push(Site::ordered("Na", f).unwrap());
        sites.push(Site::ordered("Cl", [f[0] + 0.5, f[1], f[2]]).unwrap());
    }
    Structure::new(lattice, sites).with_title("NaCl")
}

fn pattern_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Diffraction Patterns");
    let structure = rock_salt();
    let calculator = XrdCalculator::new(ScatteringTable::bundled().unwrap());

    group.bench_function("nacl_cuka_10_120", |b| {
        b.iter(|| {
            black_box(
                calculator
                    .get_pattern(black_box(&structure), (10.0, 120.0))
                    .unwrap(),
            )
        })
    });

    let refining = calculator.clone().with_symprec(0.01);
    group.bench_function("nacl_refined", |b| {
        b.iter(|| {
            black_box(
                refining
                    .get_pattern(black_box(&structure), (10.0, 120.0))
                    .unwrap(),
            )
        })
    });

    group.finish();
}

fn reciprocal_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reciprocal Lattice");
    let lattice = Lattice::from_parameters(7.1, 8.3, 9.6, 84.0, 96.0, 101.0).unwrap();
    let reciprocal = lattice.reciprocal_lattice_crystallographic();

    group.bench_function("triclinic_shell", |b| {
        b.iter(|| black_box(points_in_shell(black_box(&reciprocal), 0.1, 1.2)))
    });

    group.bench_function("point_group", |b| {
        b.iter(|| black_box(PointGroup::from_lattice(black_box(&reciprocal))))
    });

    group.finish();
}

criterion_group!(benches, pattern_benchmark, reciprocal_benchmark);
criterion_main!(benches);
