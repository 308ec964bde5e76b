/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Run configuration for pattern calculations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::Result;
use crate::crystal::LatticeAdjustment;
use crate::xrd::{OverlaySettings, PatternAdjustment, Radiation};

/// Settings for a pattern run, read from JSON. Every field is optional.
///
/// ```json
/// {
///   "radiation": "CuKa",
///   "two_theta_range": [10.0, 120.0],
///   "debye_waller_factors": {"Na": 0.5, "Cl": 0.6},
///   "scaling_percent": 80.0,
///   "lattice": {"a": 5.7, "scale_percent": 1.0}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Named source; ignored when `wavelength` is given
    pub radiation: Radiation,
    /// Explicit wavelength in Å
    pub wavelength: Option<f64>,
    /// Calculation window in degrees 2θ
    pub two_theta_range: (f64, f64),
    /// Symmetry precision for refinement, 0 disables it
    pub symprec: f64,
    /// B factors (Å²) per element symbol
    pub debye_waller_factors: HashMap<String, f64>,
    pub scaling_percent: f64,
    pub background: f64,
    /// Height of the strongest peak after normalization
    pub normalize_to: f64,
    /// Alternative scattering parameter table (JSON)
    pub scattering_table: Option<PathBuf>,
    pub lattice: LatticeAdjustment,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            radiation: Radiation::CuKa,
            wavelength: None,
            two_theta_range: (10.0, 120.0),
            symprec: 0.0,
            debye_waller_factors: HashMap::new(),
            scaling_percent: 100.0,
            background: 0.0,
            normalize_to: 100.0,
            scattering_table: None,
            lattice: LatticeAdjustment::default(),
        }
    }
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Effective wavelength in Å
    pub fn wavelength(&self) -> f64 {
        self.wavelength.unwrap_or_else(|| self.radiation.wavelength())
    }

    /// Overlay settings derived from this configuration
    pub fn overlay_settings(&self) -> OverlaySettings {
        OverlaySettings {
            two_theta_range: self.two_theta_range,
            normalize_to: self.normalize_to,
            lattice: self.lattice,
            adjustment: PatternAdjustment {
                scaling_percent: self.scaling_percent,
                background: self.background,
            },
        }
    }
}
