/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Atomic scattering parameters
//!
//! Each element carries four Gaussian terms `(a_j, b_j)` used to evaluate the
//! X-ray atomic form factor
//!
//! ```text
//! f(s) = Z - 41.78214 · s² · Σ_j a_j · exp(-b_j · s²)
//! ```
//!
//! with `s = sin(θ)/λ` in Å⁻¹. The table is loaded from JSON of the form
//! `{"Fe": [[a1, b1], [a2, b2], [a3, b3], [a4, b4]], ...}`.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::errors::{Result, XrdError};
use crate::crystal::database;

/// Prefactor of the Gaussian sum in the form factor expression
pub const FORM_FACTOR_PREFACTOR: f64 = 41.78214;

static BUNDLED_JSON: &str = include_str!("../../assets/atomic_scattering_params.json");

static BUNDLED: Lazy<std::result::Result<Arc<ScatteringTable>, XrdError>> =
    Lazy::new(|| ScatteringTable::from_json_str(BUNDLED_JSON).map(Arc::new));

/// Form factor coefficients of one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatteringFactor {
    pub atomic_number: u32,
    pub coefficients: [[f64; 2]; 4],
}

impl ScatteringFactor {
    /// Atomic form factor at s² = (sin θ / λ)²
    pub fn form_factor(&self, s2: f64) -> f64 {
        let sum: f64 = self
            .coefficients
            .iter()
            .map(|[a, b]| a * (-b * s2).exp())
            .sum();
        self.atomic_number as f64 - FORM_FACTOR_PREFACTOR * s2 * sum
    }
}

/// Per-element scattering coefficients, keyed by element symbol
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatteringTable {
    entries: HashMap<String, ScatteringFactor>,
}

impl ScatteringTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON table. Every key must be a known element symbol.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<[f64; 2]>> = serde_json::from_str(json)
            .map_err(|e| XrdError::ScatteringTable(format!("invalid JSON: {}", e)))?;

        let mut table = Self::new();
        for (symbol, terms) in raw {
            let coefficients: [[f64; 2]; 4] = terms.as_slice().try_into().map_err(|_| {
                XrdError::ScatteringTable(format!(
                    "{} has {} coefficient pairs, expected 4",
                    symbol,
                    terms.len()
                ))
            })?;
            table.insert(&symbol, coefficients)?;
        }
        Ok(table)
    }

    /// Load a JSON table from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            XrdError::ScatteringTable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let table = Self::from_json_str(&json)?;
        log::debug!(
            "Loaded {} scattering entries from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Table shipped with the crate. Parsed once per process.
    pub fn bundled() -> Result<Arc<Self>> {
        match &*BUNDLED {
            Ok(table) => Ok(Arc::clone(table)),
            Err(e) => Err(e.clone()),
        }
    }

    /// Add or replace the coefficients of an element
    pub fn insert(&mut self, symbol: &str, coefficients: [[f64; 2]; 4]) -> Result<()> {
        let atomic_number = database::atomic_number(symbol)
            .ok_or_else(|| XrdError::ScatteringTable(format!("unknown element {}", symbol)))?;
        if coefficients.iter().flatten().any(|v| !v.is_finite()) {
            return Err(XrdError::ScatteringTable(format!(
                "{} has non-finite coefficients",
                symbol
            )));
        }
        self.entries.insert(
            symbol.to_string(),
            ScatteringFactor {
                atomic_number,
                coefficients,
            },
        );
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&ScatteringFactor> {
        self.entries.get(symbol)
    }

    /// Like [`get`](Self::get), but a miss is a configuration error
    pub fn lookup(&self, symbol: &str) -> Result<&ScatteringFactor> {
        self.get(symbol)
            .ok_or_else(|| XrdError::MissingScatteringParameters(symbol.to_string()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Element symbols in the table, sorted by atomic number
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<(&str, u32)> = self
            .entries
            .iter()
            .map(|(s, f)| (s.as_str(), f.atomic_number))
            .collect();
        symbols.sort_by_key(|&(_, z)| z);
        symbols.into_iter().map(|(s, _)| s).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bundled_table() {
        let table = ScatteringTable::bundled().unwrap();
        // Every element from H to U, in Z order
        assert_eq!(table.len(), 92);
        let symbols = table.symbols();
        for (z, symbol) in (1..=92).zip(&symbols) {
            assert_eq!(database::element_symbol(z), Some(*symbol));
        }
        assert_eq!(table.lookup("Fe").unwrap().atomic_number, 26);

        for symbol in [
            "Tc", "Pr", "Pm", "Sm", "Eu", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Re", "Os",
            "At", "Rn", "Fr", "Ra", "Ac", "Pa",
        ] {
            let factor = table.lookup(symbol).unwrap();
            let z = database::atomic_number(symbol).unwrap() as f64;
            assert_relative_eq!(factor.form_factor(0.0), z, epsilon = 1e-9);
            assert!(factor.form_factor(0.25) < z, "{} does not fall off", symbol);
        }

        // Same allocation on every call
        let again = ScatteringTable::bundled().unwrap();
        assert!(Arc::ptr_eq(&table, &again));
    }

    #[test]
    fn test_form_factor_limits() {
        let table = ScatteringTable::bundled().unwrap();
        let cu = table.lookup("Cu").unwrap();

        // Forward scattering counts every electron
        assert_relative_eq!(cu.form_factor(0.0), 29.0, epsilon = 1e-12);

        // Monotonically decreasing over the usual range
        let mut previous = cu.form_factor(0.0);
        for i in 1..=20 {
            let s = i as f64 * 0.05;
            let f = cu.form_factor(s * s);
            assert!(f < previous);
            previous = f;
        }
    }

    #[test]
    fn test_missing_species() {
        let table = ScatteringTable::new();
        assert!(table.is_empty());
        assert_eq!(
            table.lookup("Na"),
            Err(XrdError::MissingScatteringParameters("Na".to_string()))
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ScatteringTable::from_json_str("{\"Xx\": [[1,1],[1,1],[1,1],[1,1]]}"),
            Err(XrdError::ScatteringTable(_))
        ));
        assert!(matches!(
            ScatteringTable::from_json_str("{\"Fe\": [[1,1],[1,1]]}"),
            Err(XrdError::ScatteringTable(_))
        ));
        assert!(matches!(
            ScatteringTable::from_json_str("not json"),
            Err(XrdError::ScatteringTable(_))
        ));
    }

    #[test]
    fn test_symbols_sorted_by_z() {
        let table = ScatteringTable::from_json_str(
            r#"{"Cl": [[1,1],[1,1],[1,1],[1,1]], "Na": [[1,1],[1,1],[1,1],[1,1]]}"#,
        )
        .unwrap();
        assert_eq!(table.symbols(), vec!["Na", "Cl"]);
    }
}
