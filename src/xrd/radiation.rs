/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Named X-ray radiation sources and their wavelengths

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{Result, XrdError};

/// Characteristic X-ray lines of common anode materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Radiation {
    /// Weighted Cu Kα doublet
    #[default]
    CuKa,
    CuKa1,
    CuKa2,
    CuKb1,
    MoKa,
    MoKa1,
    MoKa2,
    MoKb1,
    CrKa,
    CrKa1,
    CrKa2,
    CrKb1,
    FeKa,
    FeKa1,
    FeKa2,
    FeKb1,
    CoKa,
    CoKa1,
    CoKa2,
    CoKb1,
    AgKa,
    AgKa1,
    AgKa2,
    AgKb1,
}

/// Wavelength table in Å
static WAVELENGTHS: [(Radiation, &str, f64); 24] = [
    (Radiation::CuKa, "CuKa", 1.54184),
    (Radiation::CuKa1, "CuKa1", 1.54056),
    (Radiation::CuKa2, "CuKa2", 1.54439),
    (Radiation::CuKb1, "CuKb1", 1.39222),
    (Radiation::MoKa, "MoKa", 0.71073),
    (Radiation::MoKa1, "MoKa1", 0.70930),
    (Radiation::MoKa2, "MoKa2", 0.71359),
    (Radiation::MoKb1, "MoKb1", 0.63229),
    (Radiation::CrKa, "CrKa", 2.29100),
    (Radiation::CrKa1, "CrKa1", 2.28970),
    (Radiation::CrKa2, "CrKa2", 2.29361),
    (Radiation::CrKb1, "CrKb1", 2.08487),
    (Radiation::FeKa, "FeKa", 1.93735),
    (Radiation::FeKa1, "FeKa1", 1.93604),
    (Radiation::FeKa2, "FeKa2", 1.93998),
    (Radiation::FeKb1, "FeKb1", 1.75661),
    (Radiation::CoKa, "CoKa", 1.79026),
    (Radiation::CoKa1, "CoKa1", 1.78896),
    (Radiation::CoKa2, "CoKa2", 1.79285),
    (Radiation::CoKb1, "CoKb1", 1.63079),
    (Radiation::AgKa, "AgKa", 0.560885),
    (Radiation::AgKa1, "AgKa1", 0.559421),
    (Radiation::AgKa2, "AgKa2", 0.563813),
    (Radiation::AgKb1, "AgKb1", 0.497082),
];

impl Radiation {
    fn entry(&self) -> &'static (Radiation, &'static str, f64) {
        WAVELENGTHS
            .iter()
            .find(|(r, _, _)| r == self)
            .unwrap_or(&WAVELENGTHS[0])
    }

    /// Wavelength in Å
    pub fn wavelength(&self) -> f64 {
        self.entry().2
    }

    /// Conventional name, e.g. "CuKa"
    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    /// Parse a radiation name, case-insensitively ("cuka", "CuKa1", "Cu-Ka")
    pub fn from_string(name: &str) -> Result<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        WAVELENGTHS
            .iter()
            .find(|(_, label, _)| label.to_ascii_lowercase() == key)
            .map(|(r, _, _)| *r)
            .ok_or_else(|| XrdError::UnknownRadiation(name.to_string()))
    }

    /// Every supported radiation
    pub fn all() -> impl Iterator<Item = Radiation> {
        WAVELENGTHS.iter().map(|(r, _, _)| *r)
    }
}

impl fmt::Display for Radiation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Radiation {
    type Err = XrdError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}
