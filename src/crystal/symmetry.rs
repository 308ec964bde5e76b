/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Space-group detection and structure refinement
//!
//! Symmetry search is delegated to `moyo`. Disordered sites are handed to it
//! as distinct atom types per distinct species/occupancy list, so a refined
//! structure keeps the full occupancy information of every site.

use moyo::base::{AngleTolerance, Cell, Lattice as MoyoLattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::{Matrix3, Vector3};

use super::errors::{Result, StructureError};
use super::lattice::Lattice;
use super::site::Site;
use super::structure::Structure;

/// Species list of each moyo atom type, indexed by type id - 1
type SpeciesKinds = Vec<Vec<(String, f64)>>;

/// Short Hermann–Mauguin symbols of the 230 space groups in their standard
/// setting, indexed by number - 1
const SPACE_GROUP_SYMBOLS: [&str; 230] = [
    "P1", "P-1", "P2", "P2_1", "C2", "Pm", "Pc", "Cm", "Cc", "P2/m", "P2_1/m", "C2/m", "P2/c",
    "P2_1/c", "C2/c", "P222", "P222_1", "P2_12_12", "P2_12_12_1", "C222_1", "C222", "F222", "I222",
    "I2_12_12_1", "Pmm2", "Pmc2_1", "Pcc2", "Pma2", "Pca2_1", "Pnc2", "Pmn2_1", "Pba2", "Pna2_1",
    "Pnn2", "Cmm2", "Cmc2_1", "Ccc2", "Amm2", "Aem2", "Ama2", "Aea2", "Fmm2", "Fdd2", "Imm2",
    "Iba2", "Ima2", "Pmmm", "Pnnn", "Pccm", "Pban", "Pmma", "Pnna", "Pmna", "Pcca", "Pbam", "Pccn",
    "Pbcm", "Pnnm", "Pmmn", "Pbcn", "Pbca", "Pnma", "Cmcm", "Cmce", "Cmmm", "Cccm", "Cmme", "Ccce",
    "Fmmm", "Fddd", "Immm", "Ibam", "Ibca", "Imma", "P4", "P4_1", "P4_2", "P4_3", "I4", "I4_1",
    "P-4", "I-4", "P4/m", "P4_2/m", "P4/n", "P4_2/n", "I4/m", "I4_1/a", "P422", "P42_12", "P4_122",
    "P4_12_12", "P4_222", "P4_22_12", "P4_322", "P4_32_12", "I422", "I4_122", "P4mm", "P4bm",
    "P4_2cm", "P4_2nm", "P4cc", "P4nc", "P4_2mc", "P4_2bc", "I4mm", "I4cm", "I4_1md", "I4_1cd",
    "P-42m", "P-42c", "P-42_1m", "P-42_1c", "P-4m2", "P-4c2", "P-4b2", "P-4n2", "I-4m2", "I-4c2",
    "I-42m", "I-42d", "P4/mmm", "P4/mcc", "P4/nbm", "P4/nnc", "P4/mbm", "P4/mnc", "P4/nmm",
    "P4/ncc", "P4_2/mmc", "P4_2/mcm", "P4_2/nbc", "P4_2/nnm", "P4_2/mbc", "P4_2/mnm", "P4_2/nmc",
    "P4_2/ncm", "I4/mmm", "I4/mcm", "I4_1/amd", "I4_1/acd", "P3", "P3_1", "P3_2", "R3", "P-3",
    "R-3", "P312", "P321", "P3_112", "P3_121", "P3_212", "P3_221", "R32", "P3m1", "P31m", "P3c1",
    "P31c", "R3m", "R3c", "P-31m", "P-31c", "P-3m1", "P-3c1", "R-3m", "R-3c", "P6", "P6_1", "P6_5",
    "P6_2", "P6_4", "P6_3", "P-6", "P6/m", "P6_3/m", "P622", "P6_122", "P6_522", "P6_222", "P6_422",
    "P6_322", "P6mm", "P6cc", "P6_3cm", "P6_3mc", "P-6m2", "P-6c2", "P-62m", "P-62c", "P6/mmm",
    "P6/mcc", "P6_3/mcm", "P6_3/mmc", "P23", "F23", "I23", "P2_13", "I2_13", "Pm-3", "Pn-3", "Fm-3",
    "Fd-3", "Im-3", "Pa-3", "Ia-3", "P432", "P4_232", "F432", "F4_132", "I432", "P4_332", "P4_132",
    "I4_132", "P-43m", "F-43m", "I-43m", "P-43n", "F-43c", "I-43d", "Pm-3m", "Pn-3n", "Pm-3n",
    "Pn-3m", "Fm-3m", "Fm-3c", "Fd-3m", "Fd-3c", "Im-3m", "Ia-3d",
];

/// Short Hermann–Mauguin symbol of a space group, e.g. "Fm-3m" for 225
pub fn space_group_symbol(number: i32) -> Option<&'static str> {
    let idx = usize::try_from(number).ok()?.checked_sub(1)?;
    SPACE_GROUP_SYMBOLS.get(idx).copied()
}

/// Build the moyo cell together with the species list behind each type id
fn to_moyo_cell(structure: &Structure) -> (Cell, SpeciesKinds) {
    let m = structure.lattice().matrix();
    let basis = Matrix3::new(
        m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
    );

    let mut kinds: SpeciesKinds = Vec::new();
    let mut positions = Vec::with_capacity(structure.site_count());
    let mut numbers = Vec::with_capacity(structure.site_count());

    for site in structure.sites() {
        let f = site.frac_coords();
        positions.push(Vector3::new(f[0], f[1], f[2]));

        let id = match kinds.iter().position(|k| k.as_slice() == site.species()) {
            Some(id) => id,
            None => {
                kinds.push(site.species().to_vec());
                kinds.len() - 1
            }
        };
        numbers.push(id as i32 + 1);
    }

    (Cell::new(MoyoLattice::new(basis), positions, numbers), kinds)
}

fn symmetry_dataset(structure: &Structure, symprec: f64) -> Result<(MoyoDataset, SpeciesKinds)> {
    if !(symprec.is_finite() && symprec > 0.0) {
        return Err(StructureError::SymmetryError(format!(
            "symmetry precision must be positive, got {}",
            symprec
        )));
    }
    if structure.is_empty() {
        return Err(StructureError::SymmetryError(
            "structure has no sites".to_string(),
        ));
    }

    let (cell, kinds) = to_moyo_cell(structure);
    let dataset = MoyoDataset::new(&cell, symprec, AngleTolerance::Default, Setting::Spglib, true)
        .map_err(|e| StructureError::SymmetryError(format!("{:?}", e)))?;
    Ok((dataset, kinds))
}

/// International space-group number of a structure
pub fn space_group_number(structure: &Structure, symprec: f64) -> Result<i32> {
    let (dataset, _) = symmetry_dataset(structure, symprec)?;
    Ok(dataset.number)
}

/// Refine a structure to its standardized conventional cell.
///
/// Fails when no consistent symmetry can be found at the given precision,
/// which for diffraction purposes means the input is not a usable periodic
/// structure.
pub fn refine_structure(structure: &Structure, symprec: f64) -> Result<Structure> {
    let (dataset, kinds) = symmetry_dataset(structure, symprec)?;
    let std_cell = dataset.std_cell;

    // moyo stores basis vectors as columns
    let basis = std_cell.lattice.basis;
    let lattice = Lattice::new([
        [basis[(0, 0)], basis[(1, 0)], basis[(2, 0)]],
        [basis[(0, 1)], basis[(1, 1)], basis[(2, 1)]],
        [basis[(0, 2)], basis[(1, 2)], basis[(2, 2)]],
    ])?;

    let mut sites = Vec::with_capacity(std_cell.positions.len());
    for (position, number) in std_cell.positions.iter().zip(std_cell.numbers.iter()) {
        let species = usize::try_from(*number - 1)
            .ok()
            .and_then(|idx| kinds.get(idx))
            .ok_or_else(|| {
                StructureError::SymmetryError(format!("unexpected atom type {}", number))
            })?;
        let frac = [
            position.x.rem_euclid(1.0),
            position.y.rem_euclid(1.0),
            position.z.rem_euclid(1.0),
        ];
        sites.push(Site::new(frac, species.clone())?);
    }

    log::debug!(
        "Refined '{}' to space group {} with {} sites",
        structure.title(),
        dataset.number,
        sites.len()
    );

    Ok(Structure::new(lattice, sites).with_title(structure.title()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bcc_iron() -> Structure {
        let lattice = Lattice::cubic(2.87).unwrap();
        let sites = vec![
            Site::ordered("Fe", [0.0, 0.0, 0.0]).unwrap(),
            Site::ordered("Fe", [0.5, 0.5, 0.5]).unwrap(),
        ];
        Structure::new(lattice, sites).with_title("Fe")
    }

    #[test]
    fn test_space_group_of_bcc() {
        assert_eq!(space_group_number(&bcc_iron(), 1e-3).unwrap(), 229);
    }

    #[test]
    fn test_refine_keeps_conventional_bcc_cell() {
        let refined = refine_structure(&bcc_iron(), 1e-3).unwrap();
        assert_eq!(refined.site_count(), 2);
        assert_relative_eq!(refined.volume(), 2.87f64.powi(3), epsilon = 1e-6);
        assert_eq!(refined.title(), "Fe");
    }

    #[test]
    fn test_space_group_symbols() {
        assert_eq!(space_group_symbol(1), Some("P1"));
        assert_eq!(space_group_symbol(14), Some("P2_1/c"));
        assert_eq!(space_group_symbol(62), Some("Pnma"));
        assert_eq!(space_group_symbol(194), Some("P6_3/mmc"));
        assert_eq!(space_group_symbol(225), Some("Fm-3m"));
        assert_eq!(space_group_symbol(230), Some("Ia-3d"));
        assert_eq!(space_group_symbol(0), None);
        assert_eq!(space_group_symbol(231), None);
    }

    #[test]
    fn test_invalid_symprec() {
        assert!(refine_structure(&bcc_iron(), 0.0).is_err());
        assert!(refine_structure(&bcc_iron(), f64::NAN).is_err());
    }
}
