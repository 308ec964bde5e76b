/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Periodic lattice representation
//!
//! A lattice is stored as three real-space basis vectors (rows of the lattice
//! matrix, in Å). Construction always validates that the cell volume is
//! positive, so every `Lattice` value in the crate is non-degenerate.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{Result, StructureError};
use super::vector::Vector3D;

/// Smallest accepted ratio of the cell volume to |a|·|b|·|c|
pub const MIN_VOLUME_RATIO: f64 = 1e-5;

/// Conventional cell parameters: lengths in Å, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl fmt::Display for LatticeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a = {:.4} Å", self.a)?;
        writeln!(f, "  b = {:.4} Å", self.b)?;
        writeln!(f, "  c = {:.4} Å", self.c)?;
        writeln!(f, "  α = {:.4}°", self.alpha)?;
        writeln!(f, "  β = {:.4}°", self.beta)?;
        write!(f, "  γ = {:.4}°", self.gamma)
    }
}

/// A three-dimensional periodic lattice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    vectors: [Vector3D; 3],
}

impl Lattice {
    /// Create a lattice from row basis vectors `[a, b, c]`
    pub fn new(matrix: [[f64; 3]; 3]) -> Result<Self> {
        if matrix.iter().flatten().any(|v| !v.is_finite()) {
            return Err(StructureError::InvalidParameters(
                "lattice vectors must be finite".to_string(),
            ));
        }

        let vectors = [
            Vector3D::from_array(matrix[0]),
            Vector3D::from_array(matrix[1]),
            Vector3D::from_array(matrix[2]),
        ];
        let volume = vectors[0].dot(&vectors[1].cross(&vectors[2]));
        let edges: f64 = vectors.iter().map(Vector3D::length).product();
        if volume.abs() <= MIN_VOLUME_RATIO * edges {
            return Err(StructureError::DegenerateLattice(volume.abs()));
        }

        Ok(Self { vectors })
    }

    /// Create a lattice from cell parameters.
    ///
    /// Uses the CIF orientation convention: `a` along x, `b` in the xy-plane.
    pub fn from_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self> {
        for (name, length) in [("a", a), ("b", b), ("c", c)] {
            if !(length.is_finite() && length > 0.0) {
                return Err(StructureError::InvalidParameters(format!(
                    "length {} = {} must be positive",
                    name, length
                )));
            }
        }
        for (name, angle) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !(angle.is_finite() && angle > 0.0 && angle < 180.0) {
                return Err(StructureError::InvalidParameters(format!(
                    "angle {} = {}° must lie in (0°, 180°)",
                    name, angle
                )));
            }
        }

        let (cos_a, cos_b, cos_g) = (
            alpha.to_radians().cos(),
            beta.to_radians().cos(),
            gamma.to_radians().cos(),
        );
        let sin_g = gamma.to_radians().sin();

        let v_sq = 1.0 - cos_a * cos_a - cos_b * cos_b - cos_g * cos_g + 2.0 * cos_a * cos_b * cos_g;
        // v_sq is the squared volume of the cell with unit edges
        if v_sq <= MIN_VOLUME_RATIO * MIN_VOLUME_RATIO {
            return Err(StructureError::InvalidParameters(format!(
                "angles ({}°, {}°, {}°) do not form a valid cell",
                alpha, beta, gamma
            )));
        }

        Self::new([
            [a, 0.0, 0.0],
            [b * cos_g, b * sin_g, 0.0],
            [
                c * cos_b,
                c * (cos_a - cos_b * cos_g) / sin_g,
                c * v_sq.sqrt() / sin_g,
            ],
        ])
    }

    /// Create a cubic lattice
    pub fn cubic(a: f64) -> Result<Self> {
        Self::from_parameters(a, a, a, 90.0, 90.0, 90.0)
    }

    /// Create a hexagonal lattice (γ = 120°)
    pub fn hexagonal(a: f64, c: f64) -> Result<Self> {
        Self::from_parameters(a, a, c, 90.0, 90.0, 120.0)
    }

    /// Lattice vectors as rows
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        [
            self.vectors[0].to_array(),
            self.vectors[1].to_array(),
            self.vectors[2].to_array(),
        ]
    }

    /// Lattice vectors
    pub fn vectors(&self) -> &[Vector3D; 3] {
        &self.vectors
    }

    fn signed_volume(&self) -> f64 {
        self.vectors[0].dot(&self.vectors[1].cross(&self.vectors[2]))
    }

    /// Cell volume in Å³
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Lengths |a|, |b|, |c|
    pub fn lengths(&self) -> [f64; 3] {
        [
            self.vectors[0].length(),
            self.vectors[1].length(),
            self.vectors[2].length(),
        ]
    }

    /// Angles α (b,c), β (a,c), γ (a,b) in degrees
    pub fn angles(&self) -> [f64; 3] {
        [
            self.vectors[1].angle_to(&self.vectors[2]),
            self.vectors[0].angle_to(&self.vectors[2]),
            self.vectors[0].angle_to(&self.vectors[1]),
        ]
    }

    /// Cell parameters (a, b, c, α, β, γ)
    pub fn parameters(&self) -> LatticeParameters {
        let [a, b, c] = self.lengths();
        let [alpha, beta, gamma] = self.angles();
        LatticeParameters {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    /// Reciprocal lattice without the 2π factor, so that `a_i · b_j = δ_ij`
    /// and reciprocal vector lengths are 1/d.
    pub fn reciprocal_lattice_crystallographic(&self) -> Lattice {
        let inv = 1.0 / self.signed_volume();
        let [a, b, c] = self.vectors;
        Lattice {
            vectors: [b.cross(&c) * inv, c.cross(&a) * inv, a.cross(&b) * inv],
        }
    }

    /// Metric tensor G_ij = a_i · a_j
    pub fn metric_tensor(&self) -> [[f64; 3]; 3] {
        let mut g = [[0.0; 3]; 3];
        for (i, row) in g.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = self.vectors[i].dot(&self.vectors[j]);
            }
        }
        g
    }

    /// Whether the cell has hexagonal metric: two right angles, one angle
    /// near 60° or 120°, and equal lengths on the two axes that enclose it.
    pub fn is_hexagonal(&self) -> bool {
        const ANGLE_TOL: f64 = 5.0;
        const LENGTH_TOL: f64 = 0.01;

        let lengths = self.lengths();
        let angles = self.angles();

        let right: Vec<usize> = (0..3)
            .filter(|&i| (angles[i] - 90.0).abs() < ANGLE_TOL)
            .collect();
        let hex = (0..3)
            .filter(|&i| {
                (angles[i] - 60.0).abs() < ANGLE_TOL || (angles[i] - 120.0).abs() < ANGLE_TOL
            })
            .count();

        right.len() == 2 && hex == 1 && (lengths[right[0]] - lengths[right[1]]).abs() < LENGTH_TOL
    }

    /// Fractional → Cartesian coordinates
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let [a, b, c] = self.vectors;
        (a * frac[0] + b * frac[1] + c * frac[2]).to_array()
    }

    /// Cartesian → fractional coordinates
    pub fn cart_to_frac(&self, cart: [f64; 3]) -> [f64; 3] {
        let r = Vector3D::from_array(cart);
        let recip = self.reciprocal_lattice_crystallographic();
        [
            r.dot(&recip.vectors[0]),
            r.dot(&recip.vectors[1]),
            r.dot(&recip.vectors[2]),
        ]
    }

    /// Uniformly scale all lattice vectors
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        let [a, b, c] = self.vectors;
        Self::new([
            (a * factor).to_array(),
            (b * factor).to_array(),
            (c * factor).to_array(),
        ])
    }
}

/// User perturbation of the unit cell.
///
/// Each parameter that is set replaces the lattice's own value; the resulting
/// lengths are then multiplied by `1 + scale_percent / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeAdjustment {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub c: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub scale_percent: f64,
}

impl LatticeAdjustment {
    /// True when applying the adjustment leaves the lattice untouched
    pub fn is_identity(&self) -> bool {
        self.a.is_none()
            && self.b.is_none()
            && self.c.is_none()
            && self.alpha.is_none()
            && self.beta.is_none()
            && self.gamma.is_none()
            && self.scale_percent == 0.0
    }

    /// Apply the adjustment to a lattice
    pub fn apply(&self, lattice: &Lattice) -> Result<Lattice> {
        if self.is_identity() {
            return Ok(*lattice);
        }

        let p = lattice.parameters();
        let factor = 1.0 + self.scale_percent / 100.0;
        Lattice::from_parameters(
            self.a.unwrap_or(p.a) * factor,
            self.b.unwrap_or(p.b) * factor,
            self.c.unwrap_or(p.c) * factor,
            self.alpha.unwrap_or(p.alpha),
            self.beta.unwrap_or(p.beta),
            self.gamma.unwrap_or(p.gamma),
        )
    }
}
