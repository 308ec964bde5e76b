/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Diffraction patterns: peak merging, filtering and post-processing

use serde::Serialize;

use super::errors::{Result, XrdError};
use super::families::{group_families, MillerFamily, PointGroup};
use super::intensity::Reflection;

/// Reflections closer than this (degrees 2θ) belong to the same peak
pub const TWO_THETA_TOL: f64 = 1e-5;

/// Peaks at or below this percentage of the strongest one are discarded
pub const SCALED_INTENSITY_TOL: f64 = 1e-3;

/// One observable diffraction peak
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peak {
    /// Diffraction angle in degrees
    pub two_theta: f64,
    pub intensity: f64,
    /// Contributing Miller families
    pub families: Vec<MillerFamily>,
    /// Interplanar spacing in Å
    pub d_spacing: f64,
}

/// Peaks sorted by ascending 2θ
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffractionPattern {
    pub peaks: Vec<Peak>,
}

impl DiffractionPattern {
    /// Build a pattern; peaks are sorted by 2θ
    pub fn new(mut peaks: Vec<Peak>) -> Self {
        peaks.sort_by(|a, b| a.two_theta.total_cmp(&b.two_theta));
        Self { peaks }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn two_thetas(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.two_theta).collect()
    }

    pub fn intensities(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.intensity).collect()
    }

    /// Largest peak intensity, `None` for an empty pattern
    pub fn max_intensity(&self) -> Option<f64> {
        self.peaks.iter().map(|p| p.intensity).reduce(f64::max)
    }

    /// Smallest and largest 2θ
    pub fn two_theta_range(&self) -> Option<(f64, f64)> {
        match (self.peaks.first(), self.peaks.last()) {
            (Some(first), Some(last)) => Some((first.two_theta, last.two_theta)),
            _ => None,
        }
    }

    /// Rescale so that the strongest peak equals `value`.
    ///
    /// Leaves empty patterns and patterns with zero maximum untouched.
    pub fn normalize(&mut self, value: f64) {
        if let Some(max) = self.max_intensity() {
            if max > 0.0 {
                let factor = value / max;
                for peak in &mut self.peaks {
                    peak.intensity *= factor;
                }
            }
        }
    }

    /// Consuming variant of [`normalize`](Self::normalize)
    pub fn normalized(mut self, value: f64) -> Self {
        self.normalize(value);
        self
    }

    /// Multiply every intensity by `percent / 100`
    pub fn scale(&mut self, percent: f64) -> Result<()> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(XrdError::InvalidScaling(percent));
        }
        let factor = percent / 100.0;
        for peak in &mut self.peaks {
            peak.intensity *= factor;
        }
        Ok(())
    }

    /// Add a constant, non-negative offset to every intensity
    pub fn add_background(&mut self, background: f64) -> Result<()> {
        if !background.is_finite() || background < 0.0 {
            return Err(XrdError::InvalidBackground(background));
        }
        for peak in &mut self.peaks {
            peak.intensity += background;
        }
        Ok(())
    }

    /// Peaks with 2θ inside `[min, max]`
    pub fn peaks_in_range(&self, min: f64, max: f64) -> impl Iterator<Item = &Peak> {
        self.peaks
            .iter()
            .filter(move |p| p.two_theta >= min && p.two_theta <= max)
    }
}

/// Reflections sharing a 2θ value
#[derive(Debug, Clone)]
struct Bucket {
    two_theta: f64,
    intensity: f64,
    hkls: Vec<[i32; 3]>,
    d_spacing: f64,
}

/// Collects reflections into peaks.
///
/// A reflection joins the first bucket (in discovery order) whose 2θ is
/// within [`TWO_THETA_TOL`]; otherwise it opens a new bucket whose
/// d-spacing is 1/g of that reflection.
#[derive(Debug, Clone, Default)]
pub struct PeakAccumulator {
    buckets: Vec<Bucket>,
}

impl PeakAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reflection: &Reflection) {
        match self
            .buckets
            .iter_mut()
            .find(|b| (b.two_theta - reflection.two_theta).abs() < TWO_THETA_TOL)
        {
            Some(bucket) => {
                bucket.intensity += reflection.intensity;
                bucket.hkls.push(reflection.hkl);
            }
            None => self.buckets.push(Bucket {
                two_theta: reflection.two_theta,
                intensity: reflection.intensity,
                hkls: vec![reflection.hkl],
                d_spacing: 1.0 / reflection.g,
            }),
        }
    }

    /// Number of distinct peaks so far
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Group families, drop weak peaks and sort by angle.
    ///
    /// A bucket survives when `I / I_max · 100 > intensity_tol`. Without any
    /// positive intensity the result is empty.
    pub fn finish(
        self,
        point_group: &PointGroup,
        hexagonal: bool,
        intensity_tol: f64,
    ) -> DiffractionPattern {
        let max = self
            .buckets
            .iter()
            .map(|b| b.intensity)
            .fold(0.0f64, f64::max);
        if max <= 0.0 {
            return DiffractionPattern::default();
        }

        let peaks = self
            .buckets
            .into_iter()
            .filter(|b| b.intensity / max * 100.0 > intensity_tol)
            .map(|b| Peak {
                two_theta: b.two_theta,
                intensity: b.intensity,
                families: group_families(&b.hkls, point_group, hexagonal),
                d_spacing: b.d_spacing,
            })
            .collect();

        DiffractionPattern::new(peaks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reflection(hkl: [i32; 3], two_theta: f64, intensity: f64) -> Reflection {
        Reflection {
            hkl,
            g: 0.5,
            two_theta,
            intensity,
        }
    }

    fn peak(two_theta: f64, intensity: f64) -> Peak {
        Peak {
            two_theta,
            intensity,
            families: Vec::new(),
            d_spacing: 1.0,
        }
    }

    #[test]
    fn test_merge_within_tolerance() {
        let mut acc = PeakAccumulator::new();
        acc.add(&reflection([1, 0, 0], 30.0, 2.0));
        acc.add(&reflection([0, 1, 0], 30.0 + TWO_THETA_TOL / 2.0, 3.0));
        acc.add(&reflection([1, 1, 0], 40.0, 1.0));
        assert_eq!(acc.len(), 2);

        let pattern = acc.finish(&PointGroup::identity(), false, SCALED_INTENSITY_TOL);
        assert_eq!(pattern.len(), 2);
        assert_relative_eq!(pattern.peaks[0].intensity, 5.0);
        assert_eq!(pattern.peaks[0].two_theta, 30.0);
        assert_eq!(pattern.peaks[0].families.len(), 2);
        assert_relative_eq!(pattern.peaks[0].d_spacing, 2.0);
    }

    #[test]
    fn test_threshold_and_order() {
        let mut acc = PeakAccumulator::new();
        acc.add(&reflection([2, 0, 0], 50.0, 1000.0));
        acc.add(&reflection([1, 0, 0], 20.0, 0.005)); // 5e-4 %
        acc.add(&reflection([1, 1, 0], 35.0, 0.02)); // 2e-3 %
        let pattern = acc.finish(&PointGroup::identity(), false, SCALED_INTENSITY_TOL);

        assert_eq!(pattern.two_thetas(), vec![35.0, 50.0]);
    }

    #[test]
    fn test_all_zero_is_empty() {
        let mut acc = PeakAccumulator::new();
        acc.add(&reflection([1, 0, 0], 20.0, 0.0));
        assert!(acc
            .finish(&PointGroup::identity(), false, SCALED_INTENSITY_TOL)
            .is_empty());
    }

    #[test]
    fn test_normalize() {
        let mut pattern = DiffractionPattern::new(vec![peak(40.0, 4.0), peak(20.0, 2.0)]);
        assert_eq!(pattern.two_thetas(), vec![20.0, 40.0]);

        pattern.normalize(100.0);
        assert_eq!(pattern.intensities(), vec![50.0, 100.0]);

        let mut empty = DiffractionPattern::default();
        empty.normalize(100.0);
        assert!(empty.is_empty());

        let mut flat = DiffractionPattern::new(vec![peak(20.0, 0.0)]);
        flat.normalize(100.0);
        assert_eq!(flat.intensities(), vec![0.0]);
    }

    #[test]
    fn test_scale_and_background() {
        let mut pattern = DiffractionPattern::new(vec![peak(20.0, 50.0), peak(30.0, 100.0)]);
        pattern.scale(50.0).unwrap();
        pattern.add_background(10.0).unwrap();
        assert_eq!(pattern.intensities(), vec![35.0, 60.0]);

        assert!(matches!(
            pattern.add_background(-1.0),
            Err(XrdError::InvalidBackground(_))
        ));
        assert!(matches!(pattern.scale(f64::NAN), Err(XrdError::InvalidScaling(_))));
        assert_eq!(pattern.two_theta_range(), Some((20.0, 30.0)));
        assert_eq!(pattern.peaks_in_range(25.0, 40.0).count(), 1);
    }
}
