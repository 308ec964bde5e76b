/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! X-ray powder diffraction
//!
//! Kinematic powder patterns from periodic structures: reciprocal-lattice
//! enumeration, structure factors with tabulated form factors, Lorentz and
//! polarization corrections, merging of coincident reflections and Miller
//! family grouping. The [`overlay`] module combines several patterns with
//! measured data for comparison.

pub mod calculator;
pub mod errors;
pub mod families;
pub mod intensity;
pub mod overlay;
pub mod pattern;
pub mod radiation;
pub mod reciprocal;
pub mod scattering_table;

pub use calculator::{compute_pattern, XrdCalculator};
pub use errors::{Result, XrdError};
pub use families::{MillerFamily, PointGroup};
pub use intensity::{Reflection, StructureFactorEngine};
pub use overlay::{ExperimentalSeries, Overlay, OverlayEntry, OverlaySettings, PatternAdjustment};
pub use pattern::{DiffractionPattern, Peak, SCALED_INTENSITY_TOL, TWO_THETA_TOL};
pub use radiation::Radiation;
pub use reciprocal::ReciprocalPoint;
pub use scattering_table::{ScatteringFactor, ScatteringTable};
