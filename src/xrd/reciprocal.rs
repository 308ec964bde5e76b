/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Reciprocal-lattice point enumeration

use crate::crystal::{Lattice, Vector3D};

/// Slack on the shell bounds
pub const SHELL_TOLERANCE: f64 = 1e-8;

/// A reciprocal lattice point G = h·a* + k·b* + l·c*
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReciprocalPoint {
    /// Miller indices (h, k, l)
    pub hkl: [i32; 3],
    /// |G| in Å⁻¹ (equal to 1/d)
    pub g: f64,
    /// Position of the point in enumeration order
    pub lattice_index: usize,
}

/// Radius |G| = 2 sin(θ)/λ of the reciprocal sphere reached at angle 2θ (degrees)
pub fn radius_for_two_theta(two_theta: f64, wavelength: f64) -> f64 {
    2.0 * (two_theta / 2.0).to_radians().sin() / wavelength
}

/// All non-zero points of `reciprocal` with `r_min ≤ |G| ≤ r_max`.
///
/// `reciprocal` must be the crystallographic reciprocal lattice (no 2π).
/// The index range along axis i is bounded by `ceil(r_max · |a_i|)`, where
/// `a_i` is the real-space vector dual to the i-th reciprocal axis. The
/// returned points are sorted with [`sort_points`].
pub fn points_in_shell(reciprocal: &Lattice, r_min: f64, r_max: f64) -> Vec<ReciprocalPoint> {
    if !(r_max.is_finite() && r_max > 0.0) || r_min > r_max {
        return Vec::new();
    }

    let real = reciprocal.reciprocal_lattice_crystallographic();
    let bounds: Vec<i32> = real
        .lengths()
        .iter()
        .map(|len| (r_max * len).ceil() as i32)
        .collect();
    let [a, b, c] = *reciprocal.vectors();

    let mut points = Vec::new();
    for h in -bounds[0]..=bounds[0] {
        for k in -bounds[1]..=bounds[1] {
            for l in -bounds[2]..=bounds[2] {
                if h == 0 && k == 0 && l == 0 {
                    continue;
                }
                let g: Vector3D = a * h as f64 + b * k as f64 + c * l as f64;
                let length = g.length();
                if length >= r_min - SHELL_TOLERANCE && length <= r_max + SHELL_TOLERANCE {
                    points.push(ReciprocalPoint {
                        hkl: [h, k, l],
                        g: length,
                        lattice_index: 0,
                    });
                }
            }
        }
    }

    sort_points(&mut points);
    for (i, point) in points.iter_mut().enumerate() {
        point.lattice_index = i;
    }
    points
}

/// Resolution at which two |G| values sort as equal
const SORT_RESOLUTION: f64 = 1e-10;

/// Order by ascending |G|, then descending h, k, l.
///
/// |G| is compared on a 1e-10 Å⁻¹ grid so that rounding noise in the cell
/// vectors does not split symmetry-equivalent points.
pub fn sort_points(points: &mut [ReciprocalPoint]) {
    let key = |g: f64| (g / SORT_RESOLUTION).round() as i64;
    points.sort_by(|p, q| {
        key(p.g)
            .cmp(&key(q.g))
            .then_with(|| q.hkl[0].cmp(&p.hkl[0]))
            .then_with(|| q.hkl[1].cmp(&p.hkl[1]))
            .then_with(|| q.hkl[2].cmp(&p.hkl[2]))
    });
}
