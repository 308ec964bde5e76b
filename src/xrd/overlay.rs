/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Overlay of computed patterns and measured data
//!
//! The overlay is the data behind a comparison plot: one normalized,
//! adjusted pattern per structure, an optional experimental series, and the
//! axis ranges that frame them.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::calculator::XrdCalculator;
use super::errors::{Result, XrdError};
use super::pattern::{DiffractionPattern, Peak};
use crate::crystal::{LatticeAdjustment, Structure};

/// Lowest upper y-limit of an overlay
pub const MIN_Y_LIMIT: f64 = 105.0;

/// Headroom above the tallest point
pub const Y_MARGIN: f64 = 5.0;

/// Intensity scaling and constant background for one pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternAdjustment {
    /// Percentage of the normalized intensity, 100 leaves it unchanged
    pub scaling_percent: f64,
    /// Non-negative offset added to every peak
    pub background: f64,
}

impl Default for PatternAdjustment {
    fn default() -> Self {
        Self {
            scaling_percent: 100.0,
            background: 0.0,
        }
    }
}

impl PatternAdjustment {
    pub fn validate(&self) -> Result<()> {
        if !self.scaling_percent.is_finite() || self.scaling_percent < 0.0 {
            return Err(XrdError::InvalidScaling(self.scaling_percent));
        }
        if !self.background.is_finite() || self.background < 0.0 {
            return Err(XrdError::InvalidBackground(self.background));
        }
        Ok(())
    }

    /// Scale, then add the background. Identity values are skipped.
    pub fn apply(&self, pattern: &mut DiffractionPattern) -> Result<()> {
        self.validate()?;
        if self.scaling_percent != 100.0 {
            pattern.scale(self.scaling_percent)?;
        }
        if self.background > 0.0 {
            pattern.add_background(self.background)?;
        }
        Ok(())
    }
}

/// A measured pattern as (2θ, intensity) pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperimentalSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl ExperimentalSeries {
    pub fn new(name: &str, points: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.to_string(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest 2θ
    pub fn two_theta_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |range, &(x, _)| match range {
            None => Some((x, x)),
            Some((lo, hi)) => Some((f64::min(lo, x), f64::max(hi, x))),
        })
    }

    pub fn max_intensity(&self) -> Option<f64> {
        self.points.iter().map(|&(_, y)| y).reduce(f64::max)
    }
}

/// Settings shared by every structure in an overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Calculation window in degrees
    pub two_theta_range: (f64, f64),
    /// Height of the strongest peak after normalization
    pub normalize_to: f64,
    pub lattice: LatticeAdjustment,
    pub adjustment: PatternAdjustment,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            two_theta_range: (10.0, 120.0),
            normalize_to: 100.0,
            lattice: LatticeAdjustment::default(),
            adjustment: PatternAdjustment::default(),
        }
    }
}

/// Outcome for one structure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OverlayEntry {
    Computed {
        title: String,
        pattern: DiffractionPattern,
    },
    Failed {
        title: String,
        error: String,
    },
}

impl OverlayEntry {
    pub fn title(&self) -> &str {
        match self {
            OverlayEntry::Computed { title, .. } | OverlayEntry::Failed { title, .. } => title,
        }
    }

    pub fn pattern(&self) -> Option<&DiffractionPattern> {
        match self {
            OverlayEntry::Computed { pattern, .. } => Some(pattern),
            OverlayEntry::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OverlayEntry::Failed { .. })
    }
}

/// Computed patterns of several structures plus optional measured data
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overlay {
    pub entries: Vec<OverlayEntry>,
    pub experimental: Option<ExperimentalSeries>,
}

impl Overlay {
    /// Compute one adjusted pattern per structure, in parallel.
    ///
    /// Each structure is normalized to one species per site, perturbed by
    /// `settings.lattice`, calculated, normalized to `settings.normalize_to`
    /// and finally scaled and offset by `settings.adjustment`. A failure is
    /// recorded on its own entry and does not affect the others. Entry order
    /// follows `structures`.
    pub fn compute(
        calculator: &XrdCalculator,
        structures: &[(String, Structure)],
        settings: &OverlaySettings,
    ) -> Self {
        let entries = structures
            .par_iter()
            .map(|(title, structure)| {
                match Self::compute_one(calculator, structure, settings) {
                    Ok(pattern) => OverlayEntry::Computed {
                        title: title.clone(),
                        pattern,
                    },
                    Err(e) => {
                        log::warn!("Skipping {}: {}", title, e);
                        OverlayEntry::Failed {
                            title: title.clone(),
                            error: e.to_string(),
                        }
                    }
                }
            })
            .collect();

        Self {
            entries,
            experimental: None,
        }
    }

    fn compute_one(
        calculator: &XrdCalculator,
        structure: &Structure,
        settings: &OverlaySettings,
    ) -> Result<DiffractionPattern> {
        settings.adjustment.validate()?;
        let structure = structure.normalized().adjusted(&settings.lattice)?;
        let mut pattern = calculator
            .get_pattern(&structure, settings.two_theta_range)?
            .normalized(settings.normalize_to);
        settings.adjustment.apply(&mut pattern)?;
        Ok(pattern)
    }

    pub fn with_experimental(mut self, series: ExperimentalSeries) -> Self {
        self.experimental = Some(series);
        self
    }

    /// Successfully computed patterns with their titles
    pub fn patterns(&self) -> impl Iterator<Item = (&str, &DiffractionPattern)> {
        self.entries
            .iter()
            .filter_map(|e| e.pattern().map(|p| (e.title(), p)))
    }

    /// Entries that failed
    pub fn failures(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.entries.iter().filter(|e| e.is_failed())
    }

    /// Horizontal range: the experimental data if present, otherwise the
    /// union of the pattern ranges
    pub fn x_range(&self) -> Option<(f64, f64)> {
        if let Some(range) = self
            .experimental
            .as_ref()
            .and_then(ExperimentalSeries::two_theta_range)
        {
            return Some(range);
        }

        self.patterns()
            .filter_map(|(_, p)| p.two_theta_range())
            .reduce(|(lo1, hi1), (lo2, hi2)| (lo1.min(lo2), hi1.max(hi2)))
    }

    /// Upper y-limit: max(105, tallest point + 5)
    pub fn y_limit(&self) -> f64 {
        let pattern_max = self.patterns().filter_map(|(_, p)| p.max_intensity());
        let experimental_max = self
            .experimental
            .as_ref()
            .and_then(ExperimentalSeries::max_intensity);

        match pattern_max.chain(experimental_max).reduce(f64::max) {
            Some(max) => f64::max(MIN_Y_LIMIT, max + Y_MARGIN),
            None => MIN_Y_LIMIT,
        }
    }

    /// Peaks of a pattern that fall inside [`x_range`](Self::x_range)
    pub fn visible_peaks<'a>(&self, pattern: &'a DiffractionPattern) -> Vec<&'a Peak> {
        match self.x_range() {
            Some((min, max)) => pattern.peaks_in_range(min, max).collect(),
            None => pattern.peaks.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(points: &[(f64, f64)]) -> DiffractionPattern {
        DiffractionPattern::new(
            points
                .iter()
                .map(|&(two_theta, intensity)| Peak {
                    two_theta,
                    intensity,
                    families: Vec::new(),
                    d_spacing: 1.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_adjustment_order() {
        let mut p = pattern(&[(20.0, 100.0), (30.0, 40.0)]);
        PatternAdjustment {
            scaling_percent: 50.0,
            background: 5.0,
        }
        .apply(&mut p)
        .unwrap();
        assert_eq!(p.intensities(), vec![55.0, 25.0]);

        let bad = PatternAdjustment {
            background: -2.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(XrdError::InvalidBackground(_))));
    }

    #[test]
    fn test_ranges_without_experiment() {
        let overlay = Overlay {
            entries: vec![
                OverlayEntry::Computed {
                    title: "a".into(),
                    pattern: pattern(&[(20.0, 100.0), (50.0, 30.0)]),
                },
                OverlayEntry::Failed {
                    title: "b".into(),
                    error: "boom".into(),
                },
                OverlayEntry::Computed {
                    title: "c".into(),
                    pattern: pattern(&[(15.0, 120.0), (40.0, 30.0)]),
                },
            ],
            experimental: None,
        };

        assert_eq!(overlay.x_range(), Some((15.0, 50.0)));
        assert_eq!(overlay.y_limit(), 125.0);
        assert_eq!(overlay.failures().count(), 1);
        assert_eq!(overlay.patterns().count(), 2);
    }

    #[test]
    fn test_experimental_range_clips_peaks() {
        let p = pattern(&[(20.0, 100.0), (50.0, 30.0), (80.0, 10.0)]);
        let overlay = Overlay {
            entries: vec![OverlayEntry::Computed {
                title: "a".into(),
                pattern: p.clone(),
            }],
            experimental: None,
        }
        .with_experimental(ExperimentalSeries::new(
            "measured",
            vec![(25.0, 10.0), (60.0, 100.0), (45.0, 50.0)],
        ));

        assert_eq!(overlay.x_range(), Some((25.0, 60.0)));
        assert_eq!(overlay.y_limit(), 105.0);
        let visible = overlay.visible_peaks(&p);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].two_theta, 50.0);
    }

    #[test]
    fn test_empty_overlay() {
        let overlay = Overlay::default();
        assert_eq!(overlay.x_range(), None);
        assert_eq!(overlay.y_limit(), MIN_Y_LIMIT);
    }
}
