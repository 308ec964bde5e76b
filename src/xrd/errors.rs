/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for diffraction calculations

use thiserror::Error;

use crate::crystal::StructureError;

/// Result type for diffraction calculations
pub type Result<T> = std::result::Result<T, XrdError>;

/// Error type for diffraction-related operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XrdError {
    /// Element present in the structure but absent from the scattering table
    #[error("No scattering coefficients for {0}")]
    MissingScatteringParameters(String),

    /// Scattering parameter resource missing or malformed
    #[error("Scattering parameter table unavailable: {0}")]
    ScatteringTable(String),

    /// Unknown named radiation
    #[error("Unknown radiation: {0}")]
    UnknownRadiation(String),

    #[error("Invalid wavelength: {0} Å (must be positive and finite)")]
    InvalidWavelength(f64),

    #[error("Invalid 2θ range ({0}°, {1}°): expected 0 ≤ min < max ≤ 180")]
    InvalidRange(f64, f64),

    #[error("Invalid symmetry precision: {0} (must be non-negative)")]
    InvalidSymprec(f64),

    #[error("Invalid background level: {0} (must be non-negative)")]
    InvalidBackground(f64),

    #[error("Invalid intensity scaling: {0}")]
    InvalidScaling(f64),

    /// Propagation of error from the crystal module
    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),
}

impl XrdError {
    /// Configuration errors are not specific to a structure and will fail
    /// every calculation made with the same setup.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            XrdError::MissingScatteringParameters(_)
                | XrdError::ScatteringTable(_)
                | XrdError::UnknownRadiation(_)
        )
    }
}
