/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Grouping of Miller indices into symmetry-equivalent families

use serde::Serialize;
use std::fmt;

use crate::crystal::Lattice;

/// Relative tolerance when comparing metric tensors
const METRIC_TOLERANCE: f64 = 1e-4;

type IntMatrix = [[i32; 3]; 3];

/// Point group of a lattice, acting on Miller indices.
///
/// Holds every integer matrix with entries in {-1, 0, 1} and determinant ±1
/// that leaves the reciprocal metric tensor invariant. For reduced cells this
/// is the full holohedry of the lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct PointGroup {
    operations: Vec<IntMatrix>,
}

impl PointGroup {
    /// Operations preserving the metric of `reciprocal`
    pub fn from_lattice(reciprocal: &Lattice) -> Self {
        let metric = reciprocal.metric_tensor();
        let scale = metric
            .iter()
            .flatten()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        let tol = METRIC_TOLERANCE * scale;

        let mut operations = Vec::new();
        for code in 0..3i32.pow(9) {
            let mut m = [[0i32; 3]; 3];
            let mut rest = code;
            for entry in m.iter_mut().flatten() {
                *entry = rest % 3 - 1;
                rest /= 3;
            }
            if determinant(&m).abs() != 1 {
                continue;
            }
            if preserves_metric(&m, &metric, tol) {
                operations.push(m);
            }
        }

        Self { operations }
    }

    /// Trivial group containing only the identity
    pub fn identity() -> Self {
        Self {
            operations: vec![[[1, 0, 0], [0, 1, 0], [0, 0, 1]]],
        }
    }

    pub fn operations(&self) -> &[IntMatrix] {
        &self.operations
    }

    /// Order of the group
    pub fn order(&self) -> usize {
        self.operations.len()
    }

    /// Distinct images of `hkl` under the group
    pub fn orbit(&self, hkl: [i32; 3]) -> Vec<[i32; 3]> {
        let mut images: Vec<[i32; 3]> = Vec::new();
        for op in &self.operations {
            let image = apply(op, hkl);
            if !images.contains(&image) {
                images.push(image);
            }
        }
        images
    }

    /// Whether some operation maps `a` onto `b`
    pub fn are_equivalent(&self, a: [i32; 3], b: [i32; 3]) -> bool {
        self.operations.iter().any(|op| apply(op, a) == b)
    }
}

fn apply(m: &IntMatrix, v: [i32; 3]) -> [i32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn determinant(m: &IntMatrix) -> i32 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Mᵀ G M = G within `tol`
fn preserves_metric(m: &IntMatrix, g: &[[f64; 3]; 3], tol: f64) -> bool {
    for i in 0..3 {
        for j in 0..3 {
            let mut value = 0.0;
            for k in 0..3 {
                for l in 0..3 {
                    value += m[k][i] as f64 * g[k][l] * m[l][j] as f64;
                }
            }
            if (value - g[i][j]).abs() > tol {
                return false;
            }
        }
    }
    true
}

/// A set of symmetry-equivalent reflections contributing to one peak
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MillerFamily {
    /// Representative indices: (h, k, l), or (h, k, i, l) with i = -h-k on
    /// hexagonal lattices
    pub indices: Vec<i32>,
    /// Number of collected members
    pub multiplicity: usize,
}

impl fmt::Display for MillerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.indices.iter().map(|i| i.to_string()).collect();
        write!(f, "({})", labels.join(" "))
    }
}

/// Display form of a Miller triple
pub fn display_indices(hkl: [i32; 3], hexagonal: bool) -> Vec<i32> {
    let [h, k, l] = hkl;
    if hexagonal {
        vec![h, k, -h - k, l]
    } else {
        vec![h, k, l]
    }
}

/// Group `hkls` into families under `point_group`.
///
/// Families appear in order of their first member; each index joins the
/// first family containing an equivalent index. The representative is the
/// lexically greatest member in display form.
pub fn group_families(
    hkls: &[[i32; 3]],
    point_group: &PointGroup,
    hexagonal: bool,
) -> Vec<MillerFamily> {
    let mut groups: Vec<Vec<[i32; 3]>> = Vec::new();
    for &hkl in hkls {
        match groups
            .iter_mut()
            .find(|members| point_group.are_equivalent(members[0], hkl))
        {
            Some(members) => members.push(hkl),
            None => groups.push(vec![hkl]),
        }
    }

    groups
        .into_iter()
        .filter_map(|members| {
            let multiplicity = members.len();
            members
                .into_iter()
                .map(|hkl| display_indices(hkl, hexagonal))
                .max()
                .map(|indices| MillerFamily {
                    indices,
                    multiplicity,
                })
        })
        .collect()
}
