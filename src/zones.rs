use crate::error::{PaceError, Result};
use crate::models::HrZoneBound;
use crate::timefmt::{format_pace_range, parse_time};
use crate::vo2max::pace_at_vdot_fraction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daniels training zones, declared from slowest to fastest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingZone {
    Easy,
    Marathon,
    Threshold,
    Interval,
    Repetition,
}

impl TrainingZone {
    pub const ALL: [TrainingZone; 5] = [
        TrainingZone::Easy,
        TrainingZone::Marathon,
        TrainingZone::Threshold,
        TrainingZone::Interval,
        TrainingZone::Repetition,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TrainingZone::Easy => "easy",
            TrainingZone::Marathon => "marathon",
            TrainingZone::Threshold => "threshold",
            TrainingZone::Interval => "interval",
            TrainingZone::Repetition => "repetition",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrainingZone::Easy => {
                "Recovery and base building. Conversational pace. Most of your weekly mileage."
            }
            TrainingZone::Marathon => {
                "Marathon-specific endurance. Comfortably hard, sustainable for 2+ hours."
            }
            TrainingZone::Threshold => {
                "Lactate threshold / tempo pace. Comfortably hard for 20-40 minutes."
            }
            TrainingZone::Interval => {
                "VO2max development. Hard effort, 3-5 minute repeats with equal rest."
            }
            TrainingZone::Repetition => {
                "Speed and running economy. Short, fast repeats (200m-400m) with full recovery."
            }
        }
    }
}

/// Multipliers of threshold pace, (fast, slow)
static PACE_MULTIPLIERS: [(TrainingZone, f64, f64); 5] = [
    (TrainingZone::Easy, 1.20, 1.35),
    (TrainingZone::Marathon, 1.08, 1.15),
    (TrainingZone::Threshold, 0.97, 1.03),
    (TrainingZone::Interval, 0.88, 0.93),
    (TrainingZone::Repetition, 0.80, 0.86),
];

/// Fractions of threshold heart rate, (low, high)
static THRESHOLD_HR_FRACTIONS: [(TrainingZone, f64, f64); 5] = [
    (TrainingZone::Easy, 0.65, 0.79),
    (TrainingZone::Marathon, 0.80, 0.87),
    (TrainingZone::Threshold, 0.88, 0.92),
    (TrainingZone::Interval, 0.93, 0.97),
    (TrainingZone::Repetition, 0.98, 1.00),
];

/// Fractions of heart rate reserve, (low, high)
static KARVONEN_FRACTIONS: [(TrainingZone, f64, f64); 5] = [
    (TrainingZone::Easy, 0.50, 0.70),
    (TrainingZone::Marathon, 0.70, 0.80),
    (TrainingZone::Threshold, 0.80, 0.88),
    (TrainingZone::Interval, 0.88, 0.95),
    (TrainingZone::Repetition, 0.95, 1.00),
];

/// Fractions of VO2max, (low, high)
static VDOT_FRACTIONS: [(TrainingZone, f64, f64); 5] = [
    (TrainingZone::Easy, 0.59, 0.74),
    (TrainingZone::Marathon, 0.75, 0.84),
    (TrainingZone::Threshold, 0.83, 0.88),
    (TrainingZone::Interval, 0.95, 1.00),
    (TrainingZone::Repetition, 1.05, 1.20),
];

/// How the pace columns were derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceZoneMethod {
    ThresholdPace,
    Vdot,
}

/// How the heart rate columns were derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HrZoneMethod {
    /// Percentages of threshold (lactate) heart rate
    #[default]
    ThresholdHr,
    /// Percentages of heart rate reserve
    Karvonen,
}

/// Reference values for zone calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneInputs {
    /// Threshold pace as `M:SS` per km
    pub threshold_pace_per_km: Option<String>,
    pub threshold_hr: Option<u32>,
    /// Takes precedence over threshold pace
    pub vdot: Option<f64>,
    pub max_hr: Option<u32>,
    pub resting_hr: Option<u32>,
}

/// Pace and heart rate bounds of one zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneRange {
    /// (fast, slow) in seconds per km
    pub pace_seconds_per_km: Option<(u32, u32)>,
    /// `"M:SS - M:SS"`, fast first
    pub pace_range_per_km: Option<String>,
    /// (low, high) in bpm
    pub hr_range_bpm: Option<(u32, u32)>,
    pub description: String,
}

/// A full table of training zones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneSet {
    pub zones: BTreeMap<TrainingZone, ZoneRange>,
    pub pace_method: Option<PaceZoneMethod>,
    pub hr_method: Option<HrZoneMethod>,
    /// Max HR − resting HR, for Karvonen zones
    pub heart_rate_reserve: Option<u32>,
    pub reference: ZoneInputs,
}

impl ZoneSet {
    pub fn get(&self, zone: TrainingZone) -> Option<&ZoneRange> {
        self.zones.get(&zone)
    }

    fn entry(&mut self, zone: TrainingZone) -> &mut ZoneRange {
        self.zones.entry(zone).or_insert_with(|| ZoneRange {
            description: zone.description().to_string(),
            ..ZoneRange::default()
        })
    }

    fn set_pace(&mut self, zone: TrainingZone, range: (u32, u32)) {
        let entry = self.entry(zone);
        entry.pace_seconds_per_km = Some(range);
        entry.pace_range_per_km = Some(format_pace_range(range));
    }

    fn set_hr(&mut self, zone: TrainingZone, range: (u32, u32)) {
        self.entry(zone).hr_range_bpm = Some(range);
    }

    /// Fast-end pace strictly increases repetition < interval < threshold < marathon < easy.
    /// Trivially true when the set carries no paces.
    pub fn pace_ordering_holds(&self) -> bool {
        let fast_ends: Vec<u32> = TrainingZone::ALL
            .iter()
            .rev()
            .filter_map(|zone| self.get(*zone))
            .filter_map(|range| range.pace_seconds_per_km.map(|(fast, _)| fast))
            .collect();
        fast_ends.windows(2).all(|pair| pair[0] < pair[1])
    }
}

/// Zone calculation utilities and algorithms
pub struct ZoneCalculator;

impl ZoneCalculator {
    /// Calculate Daniels training zones from whichever references are present.
    ///
    /// Pace columns come from VDOT when given, else from threshold pace.
    /// Heart rate columns come from threshold HR or from max/resting HR
    /// (Karvonen); `hr_preference` decides when both are supplied.
    pub fn calculate_training_zones(inputs: &ZoneInputs, hr_preference: HrZoneMethod) -> Result<ZoneSet> {
        let has_karvonen = inputs.max_hr.is_some() && inputs.resting_hr.is_some();
        if inputs.vdot.is_none()
            && inputs.threshold_pace_per_km.is_none()
            && inputs.threshold_hr.is_none()
            && !has_karvonen
        {
            return Err(PaceError::InputRequired {
                calculation: "training zones".to_string(),
                options: "vdot, threshold_pace_per_km, threshold_hr, or max_hr with resting_hr"
                    .to_string(),
            });
        }

        let mut set = if let Some(vdot) = inputs.vdot {
            Self::vdot_zones(vdot)?
        } else if let Some(pace) = &inputs.threshold_pace_per_km {
            Self::pace_zones(parse_time(pace)?)?
        } else {
            ZoneSet::default()
        };

        let hr_method = match (inputs.threshold_hr, has_karvonen, hr_preference) {
            (Some(_), true, HrZoneMethod::Karvonen) => Some(HrZoneMethod::Karvonen),
            (Some(_), _, _) => Some(HrZoneMethod::ThresholdHr),
            (None, true, _) => Some(HrZoneMethod::Karvonen),
            (None, false, _) => None,
        };

        let hr_set = match (hr_method, inputs.threshold_hr, inputs.max_hr, inputs.resting_hr) {
            (Some(HrZoneMethod::ThresholdHr), Some(threshold_hr), _, _) => Some(Self::hr_zones(threshold_hr)?),
            (Some(HrZoneMethod::Karvonen), _, Some(max_hr), Some(resting_hr)) => {
                Some(Self::calculate_hr_zones_karvonen(max_hr, resting_hr)?)
            }
            _ => None,
        };

        if let Some(hr_set) = hr_set {
            for (zone, range) in &hr_set.zones {
                if let Some(hr) = range.hr_range_bpm {
                    set.set_hr(*zone, hr);
                }
            }
            set.hr_method = hr_set.hr_method;
            set.heart_rate_reserve = hr_set.heart_rate_reserve;
        }

        set.reference = inputs.clone();

        tracing::debug!(
            pace_method = ?set.pace_method,
            hr_method = ?set.hr_method,
            "Training zones calculated"
        );

        Ok(set)
    }

    /// Pace zones as Daniels multipliers of threshold pace (seconds per km)
    pub fn pace_zones(threshold_secs_per_km: u32) -> Result<ZoneSet> {
        Self::validate_threshold_pace(threshold_secs_per_km)?;
        let threshold = threshold_secs_per_km as f64;

        let mut set = ZoneSet {
            pace_method: Some(PaceZoneMethod::ThresholdPace),
            ..ZoneSet::default()
        };
        for (zone, fast_mult, slow_mult) in PACE_MULTIPLIERS.iter() {
            let fast = (threshold * fast_mult) as u32;
            let slow = (threshold * slow_mult) as u32;
            set.set_pace(*zone, (fast, slow));
        }
        Ok(set)
    }

    /// Heart rate zones as percentages of threshold heart rate
    pub fn hr_zones(threshold_hr: u32) -> Result<ZoneSet> {
        Self::validate_range("threshold_hr", threshold_hr as f64, 80.0, 230.0)?;
        let threshold = threshold_hr as f64;

        let mut set = ZoneSet {
            hr_method: Some(HrZoneMethod::ThresholdHr),
            ..ZoneSet::default()
        };
        for (zone, low, high) in THRESHOLD_HR_FRACTIONS.iter() {
            let low_hr = (threshold * low) as u32;
            let high_hr = if *high >= 1.0 {
                threshold_hr
            } else {
                (threshold * high) as u32
            };
            set.set_hr(*zone, (low_hr, high_hr));
        }
        Ok(set)
    }

    /// Heart rate zones by the Karvonen (heart rate reserve) method:
    /// `target = HRR × pct + resting_hr`
    pub fn calculate_hr_zones_karvonen(max_hr: u32, resting_hr: u32) -> Result<ZoneSet> {
        Self::validate_range("max_hr", max_hr as f64, 100.0, 230.0)?;
        Self::validate_range("resting_hr", resting_hr as f64, 25.0, 120.0)?;
        if max_hr <= resting_hr {
            return Err(PaceError::degenerate(
                "Karvonen zones",
                format!(
                    "max_hr ({}) must be greater than resting_hr ({})",
                    max_hr, resting_hr
                ),
            ));
        }

        let reserve = max_hr - resting_hr;
        let target = |pct: f64| (reserve as f64 * pct + resting_hr as f64).round() as u32;

        let mut set = ZoneSet {
            hr_method: Some(HrZoneMethod::Karvonen),
            heart_rate_reserve: Some(reserve),
            ..ZoneSet::default()
        };
        for (zone, low, high) in KARVONEN_FRACTIONS.iter() {
            set.set_hr(*zone, (target(*low), target(*high)));
        }
        Ok(set)
    }

    /// Pace zones from %VO2max bands, inverting the oxygen-cost curve per bound
    pub fn vdot_zones(vdot: f64) -> Result<ZoneSet> {
        Self::validate_range("vdot", vdot, 15.0, 90.0)?;

        let mut set = ZoneSet {
            pace_method: Some(PaceZoneMethod::Vdot),
            ..ZoneSet::default()
        };
        for (zone, low, high) in VDOT_FRACTIONS.iter() {
            // Higher fraction of VO2max means a faster (smaller) pace
            let fast = pace_at_vdot_fraction(vdot, *high);
            let slow = pace_at_vdot_fraction(vdot, *low);
            set.set_pace(*zone, (fast, slow));
        }
        Ok(set)
    }

    /// 1-based index of the first zone containing `hr`
    pub fn zone_index_for_hr(hr: f64, zones: &[HrZoneBound]) -> Option<usize> {
        zones.iter().position(|zone| zone.contains(hr)).map(|idx| idx + 1)
    }

    fn validate_threshold_pace(secs_per_km: u32) -> Result<()> {
        // 2:00 to 15:00 per km
        Self::validate_range("threshold_pace_seconds_per_km", secs_per_km as f64, 120.0, 900.0)
    }

    fn validate_range(parameter: &str, value: f64, min: f64, max: f64) -> Result<()> {
        if !(min..=max).contains(&value) {
            return Err(PaceError::out_of_range(parameter, value, min, max));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ZoneInputs {
        ZoneInputs::default()
    }

    #[test]
    fn test_vdot_zones_known_values() {
        let set = ZoneCalculator::calculate_training_zones(
            &ZoneInputs {
                vdot: Some(50.0),
                ..inputs()
            },
            HrZoneMethod::default(),
        )
        .unwrap();

        assert_eq!(
            set.get(TrainingZone::Threshold).unwrap().pace_seconds_per_km,
            Some((255, 267))
        );
        assert_eq!(
            set.get(TrainingZone::Easy).unwrap().pace_seconds_per_km,
            Some((293, 351))
        );
        assert_eq!(set.pace_method, Some(PaceZoneMethod::Vdot));
        assert!(set.pace_ordering_holds());
    }

    #[test]
    fn test_pace_zones_from_threshold() {
        let set = ZoneCalculator::calculate_training_zones(
            &ZoneInputs {
                threshold_pace_per_km: Some("4:30".to_string()),
                ..inputs()
            },
            HrZoneMethod::default(),
        )
        .unwrap();

        let easy = set.get(TrainingZone::Easy).unwrap();
        assert_eq!(easy.pace_seconds_per_km, Some((324, 364)));
        assert_eq!(easy.pace_range_per_km.as_deref(), Some("5:24 - 6:04"));
        assert_eq!(
            set.get(TrainingZone::Threshold).unwrap().pace_seconds_per_km,
            Some((261, 278))
        );
        assert!(easy.hr_range_bpm.is_none());
        assert!(set.pace_ordering_holds());
    }

    #[test]
    fn test_vdot_takes_precedence_over_pace() {
        let set = ZoneCalculator::calculate_training_zones(
            &ZoneInputs {
                threshold_pace_per_km: Some("6:00".to_string()),
                vdot: Some(50.0),
                ..inputs()
            },
            HrZoneMethod::default(),
        )
        .unwrap();
        assert_eq!(set.pace_method, Some(PaceZoneMethod::Vdot));
        assert_eq!(
            set.get(TrainingZone::Threshold).unwrap().pace_seconds_per_km,
            Some((255, 267))
        );
    }

    #[test]
    fn test_hr_zones_from_threshold_hr() {
        let set = ZoneCalculator::hr_zones(170).unwrap();
        assert_eq!(set.get(TrainingZone::Easy).unwrap().hr_range_bpm, Some((110, 134)));
        assert_eq!(set.get(TrainingZone::Repetition).unwrap().hr_range_bpm, Some((166, 170)));
    }

    #[test]
    fn test_combined_pace_and_hr() {
        let set = ZoneCalculator::calculate_training_zones(
            &ZoneInputs {
                threshold_pace_per_km: Some("4:30".to_string()),
                threshold_hr: Some(170),
                ..inputs()
            },
            HrZoneMethod::default(),
        )
        .unwrap();
        let marathon = set.get(TrainingZone::Marathon).unwrap();
        assert!(marathon.pace_seconds_per_km.is_some());
        assert_eq!(marathon.hr_range_bpm, Some((136, 147)));
        assert_eq!(set.hr_method, Some(HrZoneMethod::ThresholdHr));
    }

    #[test]
    fn test_karvonen_zones() {
        let set = ZoneCalculator::calculate_hr_zones_karvonen(180, 60).unwrap();
        assert_eq!(set.heart_rate_reserve, Some(120));
        assert_eq!(set.get(TrainingZone::Easy).unwrap().hr_range_bpm, Some((120, 144)));
        assert_eq!(set.get(TrainingZone::Repetition).unwrap().hr_range_bpm, Some((174, 180)));
    }

    #[test]
    fn test_karvonen_validation() {
        assert!(matches!(
            ZoneCalculator::calculate_hr_zones_karvonen(240, 60),
            Err(PaceError::RangeError { .. })
        ));
        assert!(matches!(
            ZoneCalculator::calculate_hr_zones_karvonen(180, 20),
            Err(PaceError::RangeError { .. })
        ));
        assert!(matches!(
            ZoneCalculator::calculate_hr_zones_karvonen(110, 115),
            Err(PaceError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_karvonen_preference_when_both_supplied() {
        let zone_inputs = ZoneInputs {
            threshold_hr: Some(170),
            max_hr: Some(180),
            resting_hr: Some(60),
            ..inputs()
        };

        let default = ZoneCalculator::calculate_training_zones(&zone_inputs, HrZoneMethod::ThresholdHr).unwrap();
        assert_eq!(default.hr_method, Some(HrZoneMethod::ThresholdHr));

        let karvonen = ZoneCalculator::calculate_training_zones(&zone_inputs, HrZoneMethod::Karvonen).unwrap();
        assert_eq!(karvonen.hr_method, Some(HrZoneMethod::Karvonen));
        assert_eq!(
            karvonen.get(TrainingZone::Easy).unwrap().hr_range_bpm,
            Some((120, 144))
        );
    }

    #[test]
    fn test_no_inputs_requires_reference() {
        let err = ZoneCalculator::calculate_training_zones(&inputs(), HrZoneMethod::default()).unwrap_err();
        assert!(matches!(err, PaceError::InputRequired { .. }));
    }

    #[test]
    fn test_implausible_references_rejected() {
        assert!(ZoneCalculator::vdot_zones(5.0).is_err());
        assert!(ZoneCalculator::pace_zones(60).is_err());
        assert!(ZoneCalculator::hr_zones(300).is_err());
    }

    #[test]
    fn test_zone_index_for_hr() {
        let zones = vec![
            HrZoneBound::new(0.0, 130.0),
            HrZoneBound::new(130.0, 150.0),
            HrZoneBound::new(150.0, -1.0),
        ];
        assert_eq!(ZoneCalculator::zone_index_for_hr(120.0, &zones), Some(1));
        assert_eq!(ZoneCalculator::zone_index_for_hr(130.0, &zones), Some(2));
        assert_eq!(ZoneCalculator::zone_index_for_hr(200.0, &zones), Some(3));
        assert_eq!(ZoneCalculator::zone_index_for_hr(-5.0, &zones), None);
    }

    #[test]
    fn test_descriptions_present() {
        let set = ZoneCalculator::hr_zones(160).unwrap();
        for zone in TrainingZone::ALL {
            assert!(!set.get(zone).unwrap().description.is_empty());
        }
    }
}
