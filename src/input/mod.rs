/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Input handling
//!
//! Readers for crystal structures (CIF), measured patterns (two-column
//! text) and JSON run configuration.

pub mod cif;
pub mod config;
pub mod errors;
pub mod xy;

pub use config::RunConfig;
pub use errors::{InputError, Result};

use std::path::Path;

use crate::crystal::Structure;

/// Read a structure from a CIF file
pub fn read_structure<P: AsRef<Path>>(path: P) -> Result<Structure> {
    cif::parse(path)
}

/// Read a structure for each path, keeping failures per file
pub fn read_structures<P: AsRef<Path>>(paths: &[P]) -> Vec<(String, Result<Structure>)> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            (path.display().to_string(), read_structure(path))
        })
        .collect()
}
