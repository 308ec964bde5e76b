/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use approx::assert_relative_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use xrd_rs::input::{self, cif, xy, InputError, RunConfig};
use xrd_rs::xrd::{Radiation, ScatteringTable, XrdCalculator};

const MAGNESIUM_CIF: &str = "data_
_cell_length_a    3.2094(2)
_cell_length_b    3.2094(2)
_cell_length_c    5.2108(3)
_cell_angle_alpha 90
_cell_angle_beta  90
_cell_angle_gamma 120
_symmetry_space_group_name_H-M 'P 63'
loop_
_symmetry_equiv_pos_as_xyz
'x, y, z'
'-y, x-y, z'
'-x+y, -x, z'
'-x, -y, z+1/2'
'y, -x+y, z+1/2'
'x-y, x, z+1/2'
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Mg1 Mg 0.33333 0.66667 0.25
";

const COPPER_CIF: &str = "data_Cu
_cell_length_a 3.615
_cell_length_b 3.615
_cell_length_c 3.615
loop_
_symmetry_equiv_pos_as_xyz
x,y,z
x,y+1/2,z+1/2
x+1/2,y,z+1/2
x+1/2,y+1/2,z
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
_atom_site_occupancy
Cu1 0 0 0 1.0
";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_hexagonal_cif_from_file() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "magnesium.cif", MAGNESIUM_CIF);

    let structure = cif::parse(&path).unwrap();
    assert_eq!(structure.title(), "magnesium");
    assert_eq!(structure.site_count(), 2);
    assert!(structure.lattice().is_hexagonal());
    assert_relative_eq!(structure.lattice().parameters().c, 5.2108, epsilon = 1e-10);

    let mut z: Vec<f64> = structure
        .sites()
        .iter()
        .map(|s| s.frac_coords()[2])
        .collect();
    z.sort_by(f64::total_cmp);
    assert_relative_eq!(z[0], 0.25, epsilon = 1e-9);
    assert_relative_eq!(z[1], 0.75, epsilon = 1e-9);

    let pattern = XrdCalculator::new(ScatteringTable::bundled().unwrap())
        .get_pattern(&structure, (20.0, 60.0))
        .unwrap();
    assert!(pattern
        .peaks
        .iter()
        .flat_map(|p| &p.families)
        .all(|f| f.indices.len() == 4));
}

#[test]
fn test_fcc_cif_from_centring_operations() {
    let structure = cif::parse_str(COPPER_CIF).unwrap();
    assert_eq!(structure.title(), "Cu");
    assert_eq!(structure.site_count(), 4);
    assert_eq!(structure.reduced_formula(), "Cu");
    assert_relative_eq!(structure.volume(), 3.615f64.powi(3), epsilon = 1e-8);
}

#[test]
fn test_read_structures_keeps_failures() {
    let dir = tempdir().unwrap();
    let good = write(dir.path(), "cu.cif", COPPER_CIF);
    let bad = write(dir.path(), "broken.cif", "data_broken\n_cell_length_a 3.0\n");
    let missing = dir.path().join("missing.cif");

    let results = input::read_structures(&[good, bad, missing]);
    assert_eq!(results.len(), 3);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(InputError::InvalidFormat(_))));
    assert!(matches!(results[2].1, Err(InputError::IoError(_))));
    assert!(results[2].0.ends_with("missing.cif"));
}

#[test]
fn test_measured_pattern_from_file() {
    let dir = tempdir().unwrap();
    let path = write(
        dir.path(),
        "scan_01.xy",
        "# Cu Ka\n2Theta,Counts\n20.0,120\n20.02,480\n20.04,240\n",
    );

    let series = xy::parse(&path).unwrap();
    assert_eq!(series.name, "scan_01");
    assert_eq!(series.points.len(), 3);
    assert_eq!(series.points[1], (20.02, 100.0));
    assert_relative_eq!(series.points[0].1, 25.0, epsilon = 1e-12);
    assert_eq!(series.two_theta_range(), Some((20.0, 20.04)));

    let empty = write(dir.path(), "empty.xy", "# nothing here\n");
    assert!(matches!(xy::parse(&empty), Err(InputError::InvalidFormat(_))));
}

#[test]
fn test_run_config_from_file() {
    let dir = tempdir().unwrap();
    let path = write(
        dir.path(),
        "run.json",
        r#"{
            "radiation": "CoKa",
            "two_theta_range": [15.0, 95.0],
            "symprec": 0.01,
            "debye_waller_factors": {"Cu": 0.55},
            "scaling_percent": 50.0,
            "background": 2.0,
            "lattice": {"scale_percent": -1.5}
        }"#,
    );

    let config = RunConfig::from_path(&path).unwrap();
    assert_eq!(config.radiation, Radiation::CoKa);
    assert_eq!(config.wavelength(), Radiation::CoKa.wavelength());
    assert_eq!(config.two_theta_range, (15.0, 95.0));
    assert_eq!(config.symprec, 0.01);

    let settings = config.overlay_settings();
    assert_eq!(settings.adjustment.scaling_percent, 50.0);
    assert_eq!(settings.adjustment.background, 2.0);
    assert_eq!(settings.lattice.scale_percent, -1.5);
    assert_eq!(settings.normalize_to, 100.0);

    assert!(matches!(
        RunConfig::from_path(dir.path().join("absent.json")),
        Err(InputError::IoError(_))
    ));
}

#[test]
fn test_custom_scattering_table_from_file() {
    let dir = tempdir().unwrap();
    let path = write(
        dir.path(),
        "table.json",
        r#"{"Cu": [[13.338, 3.583], [7.168, 0.247], [5.616, 11.397], [1.673, 64.812]]}"#,
    );

    let table = ScatteringTable::from_path(&path).unwrap();
    assert_eq!(table.len(), 1);
    assert!(table.contains("Cu"));
    assert!(!table.contains("Fe"));

    let structure = cif::parse_str(COPPER_CIF).unwrap();
    let pattern = XrdCalculator::new(std::sync::Arc::new(table))
        .get_pattern(&structure, (30.0, 100.0))
        .unwrap();
    assert_eq!(pattern.peaks[0].families[0].indices, vec![1, 1, 1]);
}
