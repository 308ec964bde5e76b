/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Powder diffraction pattern calculator

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use super::errors::{Result, XrdError};
use super::families::PointGroup;
use super::intensity::StructureFactorEngine;
use super::pattern::{DiffractionPattern, PeakAccumulator, SCALED_INTENSITY_TOL};
use super::radiation::Radiation;
use super::reciprocal::{points_in_shell, radius_for_two_theta};
use super::scattering_table::ScatteringTable;
use crate::crystal::{refine_structure, Structure};

/// Computes kinematic powder patterns.
///
/// The calculator never modifies the structures it is given. It can be
/// shared between threads; all state is read-only.
///
/// # Examples
///
/// ```no_run
/// use xrd_rs::crystal::{Lattice, Site, Structure};
/// use xrd_rs::xrd::{Radiation, ScatteringTable, XrdCalculator};
///
/// let structure = Structure::new(
///     Lattice::cubic(3.0).unwrap(),
///     vec![Site::ordered("Po", [0.0, 0.0, 0.0]).unwrap()],
/// );
/// let calculator = XrdCalculator::new(ScatteringTable::bundled().unwrap())
///     .with_radiation(Radiation::CuKa);
/// let pattern = calculator.get_pattern(&structure, (10.0, 120.0)).unwrap();
/// println!("{} peaks", pattern.len());
/// ```
#[derive(Debug, Clone)]
pub struct XrdCalculator {
    table: Arc<ScatteringTable>,
    wavelength: f64,
    symprec: f64,
    debye_waller_factors: HashMap<String, f64>,
    intensity_tol: f64,
}

impl XrdCalculator {
    /// Calculator for Cu Kα without symmetry refinement or thermal damping
    pub fn new(table: Arc<ScatteringTable>) -> Self {
        Self {
            table,
            wavelength: Radiation::default().wavelength(),
            symprec: 0.0,
            debye_waller_factors: HashMap::new(),
            intensity_tol: SCALED_INTENSITY_TOL,
        }
    }

    pub fn with_radiation(mut self, radiation: Radiation) -> Self {
        self.wavelength = radiation.wavelength();
        self
    }

    /// Wavelength in Å
    pub fn with_wavelength(mut self, wavelength: f64) -> Self {
        self.wavelength = wavelength;
        self
    }

    /// Symmetry precision for refinement; 0 disables refinement
    pub fn with_symprec(mut self, symprec: f64) -> Self {
        self.symprec = symprec;
        self
    }

    /// Debye–Waller B factors (Å²) per element symbol
    pub fn with_debye_waller_factors(mut self, factors: HashMap<String, f64>) -> Self {
        self.debye_waller_factors = factors;
        self
    }

    pub fn with_debye_waller(mut self, symbol: &str, b: f64) -> Self {
        self.debye_waller_factors.insert(symbol.to_string(), b);
        self
    }

    /// Minimum retained intensity in percent of the strongest peak
    pub fn with_intensity_tolerance(mut self, percent: f64) -> Self {
        self.intensity_tol = percent;
        self
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn symprec(&self) -> f64 {
        self.symprec
    }

    pub fn table(&self) -> &Arc<ScatteringTable> {
        &self.table
    }

    /// Check wavelength, window and symmetry precision
    pub fn validate(&self, two_theta_range: (f64, f64)) -> Result<()> {
        if !(self.wavelength.is_finite() && self.wavelength > 0.0) {
            return Err(XrdError::InvalidWavelength(self.wavelength));
        }
        let (min, max) = two_theta_range;
        if !(min.is_finite() && max.is_finite() && min >= 0.0 && min < max && max <= 180.0) {
            return Err(XrdError::InvalidRange(min, max));
        }
        if !(self.symprec.is_finite() && self.symprec >= 0.0) {
            return Err(XrdError::InvalidSymprec(self.symprec));
        }
        Ok(())
    }

    /// Pattern of `structure` within the inclusive 2θ window (degrees).
    ///
    /// The result is not normalized; see [`DiffractionPattern::normalize`].
    pub fn get_pattern(
        &self,
        structure: &Structure,
        two_theta_range: (f64, f64),
    ) -> Result<DiffractionPattern> {
        self.validate(two_theta_range)?;

        let structure = if self.symprec > 0.0 {
            Cow::Owned(refine_structure(structure, self.symprec)?)
        } else {
            Cow::Borrowed(structure)
        };

        let engine = StructureFactorEngine::new(
            &structure,
            &self.table,
            &self.debye_waller_factors,
            self.wavelength,
        )?;

        let lattice = structure.lattice();
        let reciprocal = lattice.reciprocal_lattice_crystallographic();
        let (min, max) = two_theta_range;
        let points = points_in_shell(
            &reciprocal,
            radius_for_two_theta(min, self.wavelength),
            radius_for_two_theta(max, self.wavelength),
        );

        let mut accumulator = PeakAccumulator::new();
        for point in &points {
            if let Some(reflection) = engine.reflection(point) {
                if reflection.two_theta >= min && reflection.two_theta <= max {
                    accumulator.add(&reflection);
                }
            }
        }

        log::debug!(
            "{}: {} reciprocal points, {} distinct angles",
            structure.title(),
            points.len(),
            accumulator.len()
        );

        let point_group = PointGroup::from_lattice(&reciprocal);
        Ok(accumulator.finish(&point_group, lattice.is_hexagonal(), self.intensity_tol))
    }
}

/// Pattern of `structure` for a wavelength in Å.
///
/// A `symprec` of 0 skips symmetry refinement. Debye–Waller factors default
/// to 0 for elements not listed.
pub fn compute_pattern(
    table: &Arc<ScatteringTable>,
    structure: &Structure,
    wavelength: f64,
    two_theta_range: (f64, f64),
    symprec: f64,
    debye_waller_factors: &HashMap<String, f64>,
) -> Result<DiffractionPattern> {
    XrdCalculator::new(Arc::clone(table))
        .with_wavelength(wavelength)
        .with_symprec(symprec)
        .with_debye_waller_factors(debye_waller_factors.clone())
        .get_pattern(structure, two_theta_range)
}
