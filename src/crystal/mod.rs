/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Crystal structure module
//!
//! Lattices, sites with partial occupancy, periodic structures, and symmetry
//! refinement.

pub mod database;
pub mod errors;
pub mod lattice;
pub mod site;
pub mod structure;
pub mod summary;
pub mod symmetry;
pub mod vector;

pub use errors::{Result, StructureError};
pub use lattice::{Lattice, LatticeAdjustment, LatticeParameters};
pub use site::Site;
pub use structure::Structure;
pub use summary::StructureSummary;
pub use symmetry::{refine_structure, space_group_number, space_group_symbol};
pub use vector::Vector3D;
