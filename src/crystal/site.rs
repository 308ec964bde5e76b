/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Crystallographic site with (possibly partial) species occupancy

use super::database;
use super::errors::{Result, StructureError};

/// Slack allowed on the total occupancy of a site (CIF rounding)
pub const OCCUPANCY_TOLERANCE: f64 = 1e-3;

/// A site in the unit cell.
///
/// Species are kept in the order they were supplied; that order is what breaks
/// ties when the dominant species of a disordered site is chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Fractional coordinates in the lattice basis
    frac_coords: [f64; 3],
    /// Species symbol → occupancy, first-seen order
    species: Vec<(String, f64)>,
}

impl Site {
    /// Create a site from fractional coordinates and a species → occupancy list.
    ///
    /// Repeated symbols are merged by summing their occupancies.
    pub fn new(frac_coords: [f64; 3], species: Vec<(String, f64)>) -> Result<Self> {
        if species.is_empty() {
            return Err(StructureError::EmptySite);
        }
        if frac_coords.iter().any(|v| !v.is_finite()) {
            return Err(StructureError::InvalidCoordinates(format!(
                "{:?} is not finite",
                frac_coords
            )));
        }

        let mut merged: Vec<(String, f64)> = Vec::with_capacity(species.len());
        for (symbol, occupancy) in species {
            if database::atomic_number(&symbol).is_none() {
                return Err(StructureError::UnknownElement(symbol));
            }
            if !(occupancy.is_finite() && occupancy > 0.0 && occupancy <= 1.0 + OCCUPANCY_TOLERANCE)
            {
                return Err(StructureError::InvalidOccupancy(format!(
                    "{} has occupancy {}",
                    symbol, occupancy
                )));
            }
            match merged.iter_mut().find(|(s, _)| *s == symbol) {
                Some((_, occu)) => *occu += occupancy,
                None => merged.push((symbol, occupancy)),
            }
        }

        let total: f64 = merged.iter().map(|(_, o)| o).sum();
        if total > 1.0 + OCCUPANCY_TOLERANCE {
            return Err(StructureError::InvalidOccupancy(format!(
                "total occupancy {:.4} exceeds 1",
                total
            )));
        }

        Ok(Self {
            frac_coords,
            species: merged,
        })
    }

    /// Create a fully occupied single-species site
    pub fn ordered(symbol: &str, frac_coords: [f64; 3]) -> Result<Self> {
        Self::new(frac_coords, vec![(symbol.to_string(), 1.0)])
    }

    /// Fractional coordinates
    pub fn frac_coords(&self) -> [f64; 3] {
        self.frac_coords
    }

    /// Species and their occupancies
    pub fn species(&self) -> &[(String, f64)] {
        &self.species
    }

    /// Sum of occupancies on this site
    pub fn total_occupancy(&self) -> f64 {
        self.species.iter().map(|(_, o)| o).sum()
    }

    /// True for a single species at full occupancy
    pub fn is_ordered(&self) -> bool {
        self.species.len() == 1 && self.species[0].1 == 1.0
    }

    /// Species with the largest occupancy; the first listed wins ties
    pub fn dominant_species(&self) -> &str {
        let mut best = &self.species[0];
        for entry in &self.species[1..] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        &best.0
    }

    /// Same site collapsed to its dominant species at occupancy 1
    pub fn to_ordered(&self) -> Site {
        if self.is_ordered() {
            return self.clone();
        }
        Site {
            frac_coords: self.frac_coords,
            species: vec![(self.dominant_species().to_string(), 1.0)],
        }
    }
}
