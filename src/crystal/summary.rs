/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Human-readable structure summary

use serde::Serialize;
use std::fmt;

use super::lattice::LatticeParameters;
use super::structure::Structure;
use super::symmetry;

/// Overview of a structure: formula, space group, cell and size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureSummary {
    pub title: String,
    pub formula: String,
    /// `None` when the space group could not be determined
    pub space_group: Option<i32>,
    /// Short Hermann–Mauguin symbol matching `space_group`
    pub space_group_symbol: Option<String>,
    pub parameters: LatticeParameters,
    pub volume: f64,
    pub site_count: usize,
}

impl StructureSummary {
    /// Summarize the normalized form of a structure; symmetry detection
    /// failures are tolerated
    pub fn from_structure(structure: &Structure, symprec: f64) -> Self {
        let structure = structure.normalized();
        let space_group = match symmetry::space_group_number(&structure, symprec) {
            Ok(number) => Some(number),
            Err(e) => {
                log::warn!("Space group detection failed for '{}': {}", structure.title(), e);
                None
            }
        };

        Self {
            title: structure.title().to_string(),
            formula: structure.reduced_formula(),
            space_group,
            space_group_symbol: space_group
                .and_then(symmetry::space_group_symbol)
                .map(str::to_string),
            parameters: structure.lattice().parameters(),
            volume: structure.volume(),
            site_count: structure.site_count(),
        }
    }
}

impl fmt::Display for StructureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary for {}:", self.title)?;
        writeln!(f)?;
        writeln!(f, "Formula: {}", self.formula)?;
        match (&self.space_group_symbol, self.space_group) {
            (Some(symbol), Some(number)) => writeln!(f, "Space Group: {} ({})", symbol, number)?,
            (None, Some(number)) => writeln!(f, "Space Group: {}", number)?,
            _ => writeln!(f, "Space Group: unknown")?,
        }
        writeln!(f, "Lattice Parameters:")?;
        writeln!(f, "{}", self.parameters)?;
        writeln!(f, "Volume: {:.4} Å³", self.volume)?;
        write!(f, "Number of sites: {}", self.site_count)
    }
}
