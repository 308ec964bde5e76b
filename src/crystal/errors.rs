/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for the crystal module

/// Error types for the crystal module
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructureError {
    #[error("Degenerate lattice: cell volume {0:.3e} Å³ is negligible for its edge lengths")]
    DegenerateLattice(f64),

    #[error("Invalid lattice parameters: {0}")]
    InvalidParameters(String),

    #[error("Site has no species")]
    EmptySite,

    #[error("Invalid occupancy: {0}")]
    InvalidOccupancy(String),

    #[error("Unknown element symbol: {0}")]
    UnknownElement(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Symmetry refinement failed: {0}")]
    SymmetryError(String),
}

/// Result type for crystal operations
pub type Result<T> = std::result::Result<T, StructureError>;
