//! Cardiac decoupling (Pa:Hr drift)
//!
//! Compares the velocity-to-heart-rate ratio of the first and second half of
//! a run. A well-conditioned aerobic system keeps the ratio stable.

use crate::error::{PaceError, Result};
use serde::{Deserialize, Serialize};

const MIN_POINTS: usize = 20;
const MIN_MOVING_VELOCITY: f64 = 0.5;
const MIN_VALID_HR: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecouplingAssessment {
    Excellent,
    Good,
    Adequate,
    Poor,
}

impl DecouplingAssessment {
    pub fn from_pct(decoupling_pct: f64) -> Self {
        if decoupling_pct < 3.0 {
            DecouplingAssessment::Excellent
        } else if decoupling_pct < 5.0 {
            DecouplingAssessment::Good
        } else if decoupling_pct < 10.0 {
            DecouplingAssessment::Adequate
        } else {
            DecouplingAssessment::Poor
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            DecouplingAssessment::Excellent => {
                "Minimal decoupling, strong aerobic fitness. Pace:HR stayed stable."
            }
            DecouplingAssessment::Good => "Slight decoupling. Aerobic system handled the effort well.",
            DecouplingAssessment::Adequate => {
                "Moderate decoupling. Aerobic fitness is developing but not yet strong for this duration."
            }
            DecouplingAssessment::Poor => {
                "Significant decoupling (>10%). Possible causes: insufficient aerobic base, dehydration, heat, or pace above aerobic threshold."
            }
        }
    }
}

/// Averages over the valid samples of one half
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HalfEfficiency {
    pub avg_velocity_mps: f64,
    pub avg_hr_bpm: f64,
    /// Mean velocity / mean HR, 0 without valid samples
    pub efficiency_ratio: f64,
    pub valid_points: usize,
}

impl HalfEfficiency {
    fn from_samples(hr: &[f64], velocity: &[f64]) -> Self {
        let (sum_v, sum_hr, count) = hr
            .iter()
            .zip(velocity)
            .filter(|(h, v)| **v > MIN_MOVING_VELOCITY && **h > MIN_VALID_HR)
            .fold((0.0, 0.0, 0usize), |(sv, sh, n), (h, v)| (sv + v, sh + h, n + 1));

        if count == 0 {
            return HalfEfficiency::default();
        }
        let avg_velocity_mps = sum_v / count as f64;
        let avg_hr_bpm = sum_hr / count as f64;
        HalfEfficiency {
            avg_velocity_mps,
            avg_hr_bpm,
            efficiency_ratio: avg_velocity_mps / avg_hr_bpm,
            valid_points: count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecouplingResult {
    pub decoupling_pct: f64,
    pub assessment: DecouplingAssessment,
    pub interpretation: String,
    pub first_half: HalfEfficiency,
    pub second_half: HalfEfficiency,
}

pub struct DecouplingCalculator;

impl DecouplingCalculator {
    /// Decoupling between run halves from aligned HR (bpm) and velocity (m/s) streams
    pub fn calculate(hr_stream: &[f64], velocity_stream: &[f64]) -> Result<DecouplingResult> {
        let available = hr_stream.len().min(velocity_stream.len());
        if available < MIN_POINTS {
            return Err(PaceError::insufficient("cardiac decoupling", MIN_POINTS, available));
        }

        let mid = available / 2;
        let first_half = HalfEfficiency::from_samples(&hr_stream[..mid], &velocity_stream[..mid]);
        let second_half =
            HalfEfficiency::from_samples(&hr_stream[mid..available], &velocity_stream[mid..available]);

        if first_half.efficiency_ratio <= 0.0 {
            return Err(PaceError::degenerate(
                "cardiac decoupling",
                "no valid samples in the first half (too many stops or missing HR)",
            ));
        }

        let decoupling_pct =
            (first_half.efficiency_ratio - second_half.efficiency_ratio) / first_half.efficiency_ratio * 100.0;
        let assessment = DecouplingAssessment::from_pct(decoupling_pct);

        tracing::debug!(decoupling_pct, ?assessment, "Cardiac decoupling calculated");

        Ok(DecouplingResult {
            decoupling_pct,
            assessment,
            interpretation: assessment.interpretation().to_string(),
            first_half,
            second_half,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_run_is_excellent() {
        let hr = vec![150.0; 40];
        let velocity = vec![3.0; 40];
        let result = DecouplingCalculator::calculate(&hr, &velocity).unwrap();
        assert!(result.decoupling_pct.abs() < 1e-9);
        assert_eq!(result.assessment, DecouplingAssessment::Excellent);
        assert_eq!(result.first_half.valid_points, 20);
    }

    #[test]
    fn test_hr_drift_is_poor() {
        let mut hr = vec![140.0; 20];
        hr.extend(vec![160.0; 20]);
        let velocity = vec![3.0; 40];
        let result = DecouplingCalculator::calculate(&hr, &velocity).unwrap();
        // 1 - 140/160 = 12.5%
        assert!((result.decoupling_pct - 12.5).abs() < 1e-9);
        assert_eq!(result.assessment, DecouplingAssessment::Poor);
    }

    #[test]
    fn test_stops_are_filtered() {
        let mut hr = vec![150.0; 40];
        let mut velocity = vec![3.0; 40];
        velocity[5] = 0.0;
        hr[30] = 0.0;
        let result = DecouplingCalculator::calculate(&hr, &velocity).unwrap();
        assert_eq!(result.first_half.valid_points, 19);
        assert_eq!(result.second_half.valid_points, 19);
        assert!(result.decoupling_pct.abs() < 1e-9);
    }

    #[test]
    fn test_too_few_points() {
        let err = DecouplingCalculator::calculate(&[150.0; 30], &[3.0; 19]).unwrap_err();
        assert_eq!(err, PaceError::insufficient("cardiac decoupling", 20, 19));
    }

    #[test]
    fn test_first_half_without_valid_samples() {
        let mut velocity = vec![0.0; 20];
        velocity.extend(vec![3.0; 20]);
        let err = DecouplingCalculator::calculate(&[150.0; 40], &velocity).unwrap_err();
        assert!(matches!(err, PaceError::DegenerateInput { .. }));
    }

    #[test]
    fn test_assessment_bands() {
        assert_eq!(DecouplingAssessment::from_pct(-2.0), DecouplingAssessment::Excellent);
        assert_eq!(DecouplingAssessment::from_pct(3.0), DecouplingAssessment::Good);
        assert_eq!(DecouplingAssessment::from_pct(7.5), DecouplingAssessment::Adequate);
        assert_eq!(DecouplingAssessment::from_pct(10.0), DecouplingAssessment::Poor);
    }
}
