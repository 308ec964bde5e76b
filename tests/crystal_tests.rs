/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use approx::assert_relative_eq;
use xrd_rs::crystal::{
    refine_structure, space_group_number, Lattice, LatticeAdjustment, Site, Structure,
    StructureError, StructureSummary,
};

fn rock_salt() -> Structure {
    let lattice = Lattice::cubic(5.64).unwrap();
    let mut sites = Vec::new();
    for f in [[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]] {
        sites.push(Site::ordered("Na", f).unwrap());
        sites.push(Site::ordered("Cl", [f[0] + 0.5, f[1], f[2]]).unwrap());
    }
    Structure::new(lattice, sites).with_title("NaCl")
}

#[test]
fn test_lattice_geometry() {
    let lattice = Lattice::from_parameters(4.0, 5.0, 6.0, 90.0, 100.0, 90.0).unwrap();
    let [a, b, c] = lattice.lengths();
    assert_relative_eq!(a, 4.0, epsilon = 1e-12);
    assert_relative_eq!(b, 5.0, epsilon = 1e-12);
    assert_relative_eq!(c, 6.0, epsilon = 1e-12);
    assert_relative_eq!(lattice.angles()[1], 100.0, epsilon = 1e-10);
    assert_relative_eq!(
        lattice.volume(),
        120.0 * 100f64.to_radians().sin(),
        epsilon = 1e-10
    );

    let reciprocal = lattice.reciprocal_lattice_crystallographic();
    assert_relative_eq!(reciprocal.volume(), 1.0 / lattice.volume(), epsilon = 1e-12);

    let cart = lattice.frac_to_cart([0.25, 0.5, 0.75]);
    let back = lattice.cart_to_frac(cart);
    for (x, y) in back.iter().zip([0.25, 0.5, 0.75]) {
        assert_relative_eq!(*x, y, epsilon = 1e-12);
    }
}

#[test]
fn test_lattice_validation() {
    assert!(matches!(
        Lattice::from_parameters(-1.0, 5.0, 6.0, 90.0, 90.0, 90.0),
        Err(StructureError::InvalidParameters(_))
    ));
    assert!(Lattice::new([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]]).is_err());
    assert!(Lattice::from_parameters(3.0, 3.0, 3.0, 60.0, 60.0, 150.0).is_err());

    // Coplanar within rounding, at any cell size
    for a in [1.0, 5.0, 50.0] {
        assert!(Lattice::from_parameters(a, a, a, 120.0, 120.0, 120.0).is_err());
    }
}

#[test]
fn test_lattice_adjustment() {
    let structure = rock_salt();
    let adjusted = structure
        .adjusted(&LatticeAdjustment {
            c: Some(6.0),
            scale_percent: 10.0,
            ..Default::default()
        })
        .unwrap();

    let p = adjusted.lattice().parameters();
    assert_relative_eq!(p.a, 5.64 * 1.1, epsilon = 1e-10);
    assert_relative_eq!(p.c, 6.6, epsilon = 1e-10);
    assert_relative_eq!(p.gamma, 90.0, epsilon = 1e-10);
    assert_eq!(adjusted.sites(), structure.sites());

    let same = structure.adjusted(&LatticeAdjustment::default()).unwrap();
    assert_eq!(same, structure);

    let collapse = LatticeAdjustment {
        scale_percent: -100.0,
        ..Default::default()
    };
    assert!(structure.adjusted(&collapse).is_err());
}

#[test]
fn test_normalization_keeps_ordered_structures() {
    let structure = rock_salt();
    assert!(structure.is_ordered());
    assert_eq!(structure.normalized(), structure);
}

#[test]
fn test_normalization_picks_majority_species() {
    let structure = Structure::new(
        Lattice::cubic(3.6).unwrap(),
        vec![
            Site::new(
                [0.0, 0.0, 0.0],
                vec![("Fe".to_string(), 0.3), ("Ni".to_string(), 0.7)],
            )
            .unwrap(),
            Site::ordered("Al", [0.5, 0.5, 0.5]).unwrap(),
        ],
    );
    assert!(!structure.is_ordered());

    let normalized = structure.normalized();
    assert!(normalized.is_ordered());
    assert_eq!(normalized.sites()[0].species(), &[("Ni".to_string(), 1.0)]);
    assert_eq!(normalized.sites()[1], structure.sites()[1]);
    assert_eq!(normalized.lattice(), structure.lattice());
}

#[test]
fn test_site_validation() {
    assert!(Site::ordered("Xx", [0.0, 0.0, 0.0]).is_err());
    assert!(Site::new([0.0, 0.0, 0.0], vec![]).is_err());
    assert!(Site::new(
        [0.0, 0.0, 0.0],
        vec![("Fe".to_string(), 0.8), ("Ni".to_string(), 0.5)]
    )
    .is_err());
}

#[test]
fn test_formula_and_composition() {
    let structure = rock_salt();
    assert_eq!(structure.reduced_formula(), "NaCl");
    assert_eq!(structure.species_symbols(), vec!["Na", "Cl"]);
    assert_eq!(
        structure.composition(),
        vec![("Na".to_string(), 4.0), ("Cl".to_string(), 4.0)]
    );
}

#[test]
fn test_space_group_and_refinement() {
    assert_eq!(space_group_number(&rock_salt(), 0.01).unwrap(), 225);

    let a = 3.61;
    let half = a / 2.0;
    let primitive = Structure::new(
        Lattice::new([[0.0, half, half], [half, 0.0, half], [half, half, 0.0]]).unwrap(),
        vec![Site::ordered("Cu", [0.0, 0.0, 0.0]).unwrap()],
    )
    .with_title("Cu");
    assert_eq!(space_group_number(&primitive, 0.01).unwrap(), 225);

    let refined = refine_structure(&primitive, 0.01).unwrap();
    assert_eq!(refined.site_count(), 4);
    assert_eq!(refined.title(), "Cu");
    assert_relative_eq!(refined.volume(), a * a * a, max_relative = 1e-6);
    for length in refined.lattice().lengths() {
        assert_relative_eq!(length, a, max_relative = 1e-6);
    }
}

#[test]
fn test_summary() {
    let summary = StructureSummary::from_structure(&rock_salt(), 0.01);
    assert_eq!(summary.title, "NaCl");
    assert_eq!(summary.formula, "NaCl");
    assert_eq!(summary.space_group, Some(225));
    assert_eq!(summary.space_group_symbol.as_deref(), Some("Fm-3m"));
    assert_eq!(summary.site_count, 8);
    assert_relative_eq!(summary.volume, 5.64f64.powi(3), epsilon = 1e-8);

    let text = summary.to_string();
    assert!(text.contains("Summary for NaCl:"));
    assert!(text.contains("Space Group: Fm-3m (225)"));
}
