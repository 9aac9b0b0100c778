//! Race time prediction
//!
//! Three models are always reported side by side:
//!
//! - **VDOT** (Daniels/Gilbert): estimate VDOT from the source result, then
//!   bisect for the time at the target distance with the same VDOT.
//! - **Riegel**: `t2 = t1 × (d2/d1)^1.06`.
//! - **Cameron**: `t2 = t1 × (d2/d1) × f(d1)/f(d2)` with
//!   `f(d) = 13.49681 − 0.048865·d + 2.438936/d^0.7905` (d in miles).
//!
//! No model is preferred over the others; disagreements are surfaced as caveats.

use crate::environment::{EnvironmentAdjuster, EnvironmentAdjustment, RaceConditions};
use crate::error::{PaceError, Result};
use crate::timefmt::{format_time, parse_time, round_seconds};
use crate::vo2max;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const METERS_PER_MILE: f64 = 1609.34;
const RIEGEL_EXPONENT: f64 = 1.06;
const BISECTION_ITERATIONS: usize = 100;
const MIN_SECONDS: f64 = 1.0;
const MAX_SECONDS: f64 = 86_400.0;

/// A named standard race distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaceDistance {
    pub name: &'static str,
    pub meters: f64,
}

/// Supported race distances, shortest first
pub static RACE_DISTANCES: [RaceDistance; 9] = [
    RaceDistance { name: "1500m", meters: 1500.0 },
    RaceDistance { name: "mile", meters: 1609.34 },
    RaceDistance { name: "3k", meters: 3000.0 },
    RaceDistance { name: "5k", meters: 5000.0 },
    RaceDistance { name: "8k", meters: 8000.0 },
    RaceDistance { name: "10k", meters: 10000.0 },
    RaceDistance { name: "15k", meters: 15000.0 },
    RaceDistance { name: "half marathon", meters: 21097.5 },
    RaceDistance { name: "marathon", meters: 42195.0 },
];

impl RaceDistance {
    /// Case-insensitive lookup in the supported table
    pub fn lookup(name: &str) -> Result<&'static RaceDistance> {
        let wanted = name.trim().to_lowercase();
        RACE_DISTANCES
            .iter()
            .find(|d| d.name == wanted)
            .ok_or_else(|| PaceError::UnknownDistance {
                name: name.to_string(),
                supported: Self::supported_names(),
            })
    }

    /// Comma-separated list of supported names
    pub fn supported_names() -> String {
        RACE_DISTANCES
            .iter()
            .map(|d| d.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn miles(&self) -> f64 {
        self.meters / METERS_PER_MILE
    }
}

/// Predictions before environmental correction, with the correction applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentAdjustedPrediction {
    pub adjustment: EnvironmentAdjustment,
    pub unadjusted_predicted_seconds: u32,
    pub unadjusted_riegel_seconds: u32,
    pub unadjusted_cameron_seconds: u32,
}

/// Result of a race time prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacePrediction {
    pub source_distance: String,
    pub source_time: String,
    pub target_distance: String,

    /// VDOT of the source result, rounded to 0.1
    pub vdot: f64,

    pub predicted_seconds: u32,
    pub predicted_time: String,

    pub riegel_seconds: u32,
    pub riegel_time: String,

    pub cameron_seconds: u32,
    pub cameron_time: String,

    /// Same-VDOT times across every supported distance, unadjusted
    pub equivalent_performances: BTreeMap<String, String>,

    pub caveats: Vec<String>,

    /// Present when race conditions changed the three predictions
    pub environment_adjusted: Option<EnvironmentAdjustedPrediction>,
}

/// Race prediction utilities
pub struct RacePredictor;

impl RacePredictor {
    /// VDOT implied by covering `distance_m` in `time_s`
    pub fn vdot_from_time(distance_m: f64, time_s: f64) -> f64 {
        vo2max::vdot_from_performance(distance_m, time_s)
    }

    /// Time in whole seconds at which `distance_m` implies `vdot`.
    ///
    /// Bisects over [1 s, 24 h] for a fixed 100 iterations.
    pub fn time_from_vdot(vdot: f64, distance_m: f64) -> u32 {
        let (mut lo, mut hi) = (MIN_SECONDS, MAX_SECONDS);
        for _ in 0..BISECTION_ITERATIONS {
            let mid = (lo + hi) / 2.0;
            if Self::vdot_from_time(distance_m, mid) < vdot {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        round_seconds((lo + hi) / 2.0)
    }

    /// Riegel endurance model
    pub fn riegel(time_s: f64, source_m: f64, target_m: f64) -> f64 {
        time_s * (target_m / source_m).powf(RIEGEL_EXPONENT)
    }

    /// Cameron model
    pub fn cameron(time_s: f64, source: &RaceDistance, target: &RaceDistance) -> f64 {
        let fatigue = |miles: f64| 13.49681 - 0.048865 * miles + 2.438936 / miles.powf(0.7905);
        time_s * (target.meters / source.meters) * (fatigue(source.miles()) / fatigue(target.miles()))
    }

    /// Same-VDOT equivalent times for every supported distance
    pub fn equivalent_performances(vdot: f64) -> BTreeMap<String, String> {
        RACE_DISTANCES
            .iter()
            .map(|d| (d.name.to_string(), format_time(Self::time_from_vdot(vdot, d.meters))))
            .collect()
    }

    /// Predict a target race time from a recent result
    pub fn predict_race_time(
        recent_race_distance: &str,
        recent_race_time: &str,
        target_distance: &str,
    ) -> Result<RacePrediction> {
        Self::predict(recent_race_distance, recent_race_time, target_distance, None)
    }

    /// Predict a target race time and correct it for race-day heat and altitude
    pub fn predict_race_time_with_conditions(
        recent_race_distance: &str,
        recent_race_time: &str,
        target_distance: &str,
        conditions: &RaceConditions,
    ) -> Result<RacePrediction> {
        Self::predict(
            recent_race_distance,
            recent_race_time,
            target_distance,
            Some(conditions),
        )
    }

    fn predict(
        recent_race_distance: &str,
        recent_race_time: &str,
        target_distance: &str,
        conditions: Option<&RaceConditions>,
    ) -> Result<RacePrediction> {
        let source = RaceDistance::lookup(recent_race_distance)?;
        let target = RaceDistance::lookup(target_distance)?;
        let time_s = parse_time(recent_race_time)?;
        if time_s == 0 {
            return Err(PaceError::degenerate(
                "race prediction",
                format!("recent race time must be positive, got {:?}", recent_race_time),
            ));
        }
        let time_s = time_s as f64;

        let vdot = vo2max::rounded_vdot(source.meters, time_s);
        let mut predicted_seconds = Self::time_from_vdot(vdot, target.meters);
        let mut riegel_seconds = round_seconds(Self::riegel(time_s, source.meters, target.meters));
        let mut cameron_seconds = round_seconds(Self::cameron(time_s, source, target));

        let caveats = Self::caveats(source, target, [predicted_seconds, riegel_seconds, cameron_seconds]);

        let environment_adjusted = match conditions {
            Some(conditions) => {
                let adjustment = EnvironmentAdjuster::combined(conditions)?;
                if adjustment.applied.is_empty() {
                    None
                } else {
                    let record = EnvironmentAdjustedPrediction {
                        unadjusted_predicted_seconds: predicted_seconds,
                        unadjusted_riegel_seconds: riegel_seconds,
                        unadjusted_cameron_seconds: cameron_seconds,
                        adjustment,
                    };
                    let factor = record.adjustment.adjustment_factor;
                    predicted_seconds = round_seconds(predicted_seconds as f64 * factor);
                    riegel_seconds = round_seconds(riegel_seconds as f64 * factor);
                    cameron_seconds = round_seconds(cameron_seconds as f64 * factor);
                    Some(record)
                }
            }
            None => None,
        };

        tracing::debug!(
            source = source.name,
            target = target.name,
            vdot,
            predicted_seconds,
            riegel_seconds,
            cameron_seconds,
            "Race time predicted"
        );

        Ok(RacePrediction {
            source_distance: recent_race_distance.to_string(),
            source_time: recent_race_time.to_string(),
            target_distance: target_distance.to_string(),
            vdot,
            predicted_seconds,
            predicted_time: format_time(predicted_seconds),
            riegel_seconds,
            riegel_time: format_time(riegel_seconds),
            cameron_seconds,
            cameron_time: format_time(cameron_seconds),
            equivalent_performances: Self::equivalent_performances(vdot),
            caveats,
            environment_adjusted,
        })
    }

    fn caveats(source: &RaceDistance, target: &RaceDistance, predictions: [u32; 3]) -> Vec<String> {
        let mut caveats = Vec::new();

        let marathon = 42195.0;
        if target.meters >= marathon && source.meters <= 10000.0 {
            caveats.push(
                "Marathon predictions from races of 10k or shorter are unreliable; \
                 endurance, fueling and long-run volume dominate at that distance."
                    .to_string(),
            );
        }

        let ratio = if target.meters >= source.meters {
            target.meters / source.meters
        } else {
            source.meters / target.meters
        };
        if ratio >= 4.0 {
            caveats.push(format!(
                "Large distance extrapolation ({:.1}x); accuracy drops as the gap between source and target grows.",
                ratio
            ));
        }

        let fastest = predictions.iter().copied().min().unwrap_or(0);
        let slowest = predictions.iter().copied().max().unwrap_or(0);
        if fastest > 0 {
            let spread_pct = (slowest - fastest) as f64 / fastest as f64 * 100.0;
            if spread_pct > 5.0 {
                caveats.push(format!(
                    "Models disagree by {:.1}% ({} to {}); treat the range as the estimate.",
                    spread_pct,
                    format_time(fastest),
                    format_time(slowest)
                ));
            }
        }

        caveats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Temperature;

    #[test]
    fn test_5k_to_10k_prediction() {
        let prediction = RacePredictor::predict_race_time("5k", "20:00", "10k").unwrap();

        assert!((prediction.vdot - 49.8).abs() <= 0.5);
        assert_eq!(prediction.riegel_seconds, 2502);
        assert!((prediction.predicted_seconds as i64 - 2488).abs() <= 30);
        assert!((prediction.cameron_seconds as i64 - 2500).abs() <= 5);
        assert_eq!(prediction.riegel_time, "41:42");
        assert_eq!(prediction.equivalent_performances.len(), RACE_DISTANCES.len());
        assert!(prediction.caveats.is_empty());
        assert!(prediction.environment_adjusted.is_none());
    }

    #[test]
    fn test_equivalent_for_source_distance_matches_input() {
        let prediction = RacePredictor::predict_race_time("10K", "40:00", "half marathon").unwrap();
        let ten_k = parse_time(&prediction.equivalent_performances["10k"]).unwrap();
        assert!((ten_k as i64 - 2400).abs() <= 5);
    }

    #[test]
    fn test_marathon_from_5k_caveats() {
        let prediction = RacePredictor::predict_race_time("5k", "20:00", "Marathon").unwrap();
        assert!(prediction.caveats.iter().any(|c| c.contains("unreliable")));
        assert!(prediction.caveats.iter().any(|c| c.contains("extrapolation")));
    }

    #[test]
    fn test_unknown_distance() {
        let err = RacePredictor::predict_race_time("50k", "4:00:00", "marathon").unwrap_err();
        match err {
            PaceError::UnknownDistance { name, supported } => {
                assert_eq!(name, "50k");
                assert!(supported.contains("half marathon"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(RacePredictor::predict_race_time("5k", "20:00", "ultra").is_err());
    }

    #[test]
    fn test_invalid_and_zero_times() {
        assert!(matches!(
            RacePredictor::predict_race_time("5k", "twenty", "10k"),
            Err(PaceError::InvalidTime { .. })
        ));
        assert!(matches!(
            RacePredictor::predict_race_time("5k", "0:00", "10k"),
            Err(PaceError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_time_from_vdot_inverts_vdot_from_time() {
        let vdot = RacePredictor::vdot_from_time(10000.0, 2700.0);
        let time = RacePredictor::time_from_vdot(vdot, 10000.0);
        assert!((time as i64 - 2700).abs() <= 1);
    }

    #[test]
    fn test_environment_adjustment_slows_predictions() {
        let conditions = RaceConditions {
            temperature: Some(Temperature::Fahrenheit(80.0)),
            dew_point: Some(Temperature::Fahrenheit(65.0)),
            altitude: None,
        };
        let plain = RacePredictor::predict_race_time("5k", "20:00", "10k").unwrap();
        let hot =
            RacePredictor::predict_race_time_with_conditions("5k", "20:00", "10k", &conditions).unwrap();

        let record = hot.environment_adjusted.as_ref().unwrap();
        assert_eq!(record.adjustment.applied, vec!["heat".to_string()]);
        assert_eq!(record.unadjusted_riegel_seconds, plain.riegel_seconds);
        assert!(hot.predicted_seconds > plain.predicted_seconds);
        assert!(hot.riegel_seconds > plain.riegel_seconds);
        assert!(hot.cameron_seconds > plain.cameron_seconds);
        assert_eq!(hot.equivalent_performances, plain.equivalent_performances);
    }

    #[test]
    fn test_empty_conditions_leave_prediction_unchanged() {
        let plain = RacePredictor::predict_race_time("5k", "20:00", "10k").unwrap();
        let same = RacePredictor::predict_race_time_with_conditions(
            "5k",
            "20:00",
            "10k",
            &RaceConditions::default(),
        )
        .unwrap();
        assert_eq!(plain, same);
    }
}
