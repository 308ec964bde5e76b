/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Periodic crystal structure: a lattice plus an ordered list of sites

use super::errors::Result;
use super::lattice::{Lattice, LatticeAdjustment};
use super::site::Site;

/// A periodic structure. Site coordinates are fractional.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// Unit cell
    lattice: Lattice,
    /// Sites in the unit cell
    sites: Vec<Site>,
    /// Title or description of the structure
    title: String,
}

impl Structure {
    /// Create a new structure
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Self {
            lattice,
            sites,
            title: String::new(),
        }
    }

    /// Builder-style title setter
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Get the title of the structure
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title of the structure
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Get the number of sites
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Cell volume in Å³
    pub fn volume(&self) -> f64 {
        self.lattice.volume()
    }

    /// True when every site holds a single species at full occupancy
    pub fn is_ordered(&self) -> bool {
        self.sites.iter().all(Site::is_ordered)
    }

    /// Collapse every site to its dominant species at occupancy 1.
    ///
    /// Lattice, site order and fractional coordinates are preserved exactly;
    /// an already ordered structure comes back unchanged.
    pub fn normalized(&self) -> Structure {
        Structure {
            lattice: self.lattice,
            sites: self.sites.iter().map(Site::to_ordered).collect(),
            title: self.title.clone(),
        }
    }

    /// Same sites (fractional coordinates) on another lattice
    pub fn with_lattice(&self, lattice: Lattice) -> Structure {
        Structure {
            lattice,
            sites: self.sites.clone(),
            title: self.title.clone(),
        }
    }

    /// Apply a cell perturbation, keeping fractional coordinates
    pub fn adjusted(&self, adjustment: &LatticeAdjustment) -> Result<Structure> {
        Ok(self.with_lattice(adjustment.apply(&self.lattice)?))
    }

    /// Distinct species symbols in first-seen order
    pub fn species_symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = Vec::new();
        for site in &self.sites {
            for (symbol, _) in site.species() {
                if !symbols.contains(&symbol.as_str()) {
                    symbols.push(symbol);
                }
            }
        }
        symbols
    }

    /// Element amounts per cell (sum of occupancies), first-seen order
    pub fn composition(&self) -> Vec<(String, f64)> {
        let mut amounts: Vec<(String, f64)> = Vec::new();
        for site in &self.sites {
            for (symbol, occupancy) in site.species() {
                match amounts.iter_mut().find(|(s, _)| s == symbol) {
                    Some((_, amount)) => *amount += occupancy,
                    None => amounts.push((symbol.clone(), *occupancy)),
                }
            }
        }
        amounts
    }

    /// Formula reduced by the greatest common divisor of integral amounts,
    /// e.g. "NaCl" for a conventional rock-salt cell.
    pub fn reduced_formula(&self) -> String {
        let composition = self.composition();
        let integral = composition
            .iter()
            .all(|(_, amount)| (amount - amount.round()).abs() < 1e-6);

        let divisor = if integral {
            composition
                .iter()
                .map(|(_, amount)| amount.round() as u64)
                .fold(0, gcd)
                .max(1) as f64
        } else {
            1.0
        };

        composition
            .iter()
            .map(|(symbol, amount)| {
                let reduced = amount / divisor;
                if (reduced - 1.0).abs() < 1e-6 {
                    symbol.clone()
                } else if integral {
                    format!("{}{}", symbol, reduced.round() as u64)
                } else {
                    let text = format!("{:.4}", reduced);
                    format!("{}{}", symbol, text.trim_end_matches('0').trim_end_matches('.'))
                }
            })
            .collect()
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
