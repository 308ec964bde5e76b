/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Structure factors and diffracted intensities
//!
//! For a reciprocal point G = (h, k, l) with |G| = g the Bragg angle is
//! θ = asin(λg/2) and s = sin(θ)/λ = g/2. The kinematic intensity is
//!
//! ```text
//! I = |F(hkl)|² · (1 + cos²2θ) / (sin²θ · cosθ)
//! F(hkl) = Σ occ · f(s) · exp(-B s²) · exp(2πi (hx + ky + lz))
//! ```

use num_complex::Complex64;
use std::collections::HashMap;
use std::f64::consts::PI;

use super::errors::Result;
use super::reciprocal::ReciprocalPoint;
use super::scattering_table::{ScatteringFactor, ScatteringTable};
use crate::crystal::Structure;

/// Below this cos θ a reflection is exact back-scattering, where the Lorentz
/// factor diverges
const BACKSCATTER_COS_TOL: f64 = 1e-10;

/// One species on one site, with everything needed for F(hkl)
#[derive(Debug, Clone, Copy)]
struct Scatterer<'a> {
    frac_coords: [f64; 3],
    occupancy: f64,
    factor: &'a ScatteringFactor,
    debye_waller: f64,
}

/// A single diffracted beam before merging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    pub hkl: [i32; 3],
    /// |G| in Å⁻¹
    pub g: f64,
    /// Diffraction angle in degrees
    pub two_theta: f64,
    pub intensity: f64,
}

/// Evaluates structure factors for a fixed structure and wavelength
#[derive(Debug, Clone)]
pub struct StructureFactorEngine<'a> {
    scatterers: Vec<Scatterer<'a>>,
    wavelength: f64,
}

impl<'a> StructureFactorEngine<'a> {
    /// Resolve the scattering coefficients of every species up front.
    ///
    /// Fails with `MissingScatteringParameters` if any species is absent from
    /// the table. Debye–Waller factors default to 0 for species not in
    /// `debye_waller_factors`.
    pub fn new(
        structure: &Structure,
        table: &'a ScatteringTable,
        debye_waller_factors: &HashMap<String, f64>,
        wavelength: f64,
    ) -> Result<Self> {
        let mut scatterers = Vec::with_capacity(structure.site_count());
        for site in structure.sites() {
            for (symbol, occupancy) in site.species() {
                scatterers.push(Scatterer {
                    frac_coords: site.frac_coords(),
                    occupancy: *occupancy,
                    factor: table.lookup(symbol)?,
                    debye_waller: debye_waller_factors.get(symbol).copied().unwrap_or(0.0),
                });
            }
        }

        Ok(Self {
            scatterers,
            wavelength,
        })
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// F(hkl) at s² = (sin θ / λ)²
    pub fn structure_factor(&self, hkl: [i32; 3], s2: f64) -> Complex64 {
        let [h, k, l] = hkl.map(f64::from);
        self.scatterers
            .iter()
            .map(|sc| {
                let [x, y, z] = sc.frac_coords;
                let phase = 2.0 * PI * (h * x + k * y + l * z);
                let amplitude =
                    sc.occupancy * sc.factor.form_factor(s2) * (-sc.debye_waller * s2).exp();
                Complex64::from_polar(amplitude, phase)
            })
            .sum()
    }

    /// Intensity of the beam diffracted by `point`.
    ///
    /// `None` for the origin, for points beyond the limiting sphere
    /// (λg/2 > 1) and at exact back-scattering where the Lorentz factor
    /// diverges.
    pub fn reflection(&self, point: &ReciprocalPoint) -> Option<Reflection> {
        if point.g <= 0.0 {
            return None;
        }
        let sin_theta = self.wavelength * point.g / 2.0;
        if sin_theta > 1.0 {
            return None;
        }

        let theta = sin_theta.asin();
        if theta.cos() < BACKSCATTER_COS_TOL {
            return None;
        }
        let s = point.g / 2.0;
        let s2 = s * s;

        let lp = lorentz_polarization(theta);

        let f = self.structure_factor(point.hkl, s2);
        Some(Reflection {
            hkl: point.hkl,
            g: point.g,
            two_theta: (2.0 * theta).to_degrees(),
            intensity: (f * f.conj()).re * lp,
        })
    }
}

/// Lorentz–polarization factor (1 + cos²2θ) / (sin²θ · cosθ), θ in radians
pub fn lorentz_polarization(theta: f64) -> f64 {
    let cos_2theta = (2.0 * theta).cos();
    (1.0 + cos_2theta * cos_2theta) / (theta.sin().powi(2) * theta.cos())
}
