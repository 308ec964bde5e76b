/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! # xrd-rs
//!
//! Synthetic X-ray powder diffraction patterns from crystal structures.
//!
//! Given a periodic structure and a wavelength, the calculator enumerates the
//! reciprocal lattice inside the requested 2θ window, evaluates structure
//! factors from tabulated atomic form factors, applies the Lorentz and
//! polarization corrections and merges coincident reflections into peaks
//! labelled with their Miller families. Several patterns can be overlaid with
//! measured data after scaling and background adjustment.
//!
//! ```no_run
//! use xrd_rs::input;
//! use xrd_rs::xrd::{Radiation, ScatteringTable, XrdCalculator};
//!
//! let structure = input::read_structure("NaCl.cif").unwrap();
//! let calculator = XrdCalculator::new(ScatteringTable::bundled().unwrap())
//!     .with_radiation(Radiation::CuKa);
//! let mut pattern = calculator.get_pattern(&structure, (10.0, 90.0)).unwrap();
//! pattern.normalize(100.0);
//! for peak in &pattern.peaks {
//!     println!("{:8.3} {:8.2}", peak.two_theta, peak.intensity);
//! }
//! ```

pub mod cli;
pub mod crystal;
pub mod input;
pub mod xrd;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

pub use crystal::{Lattice, Site, Structure};
pub use xrd::{compute_pattern, DiffractionPattern, Radiation, ScatteringTable, XrdCalculator};
