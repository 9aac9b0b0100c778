//! Single-run analysis
//!
//! Combines split pacing, heart rate drift, time in zone, cadence, workout
//! type and cardiac decoupling into one record with coaching flags and
//! caveats about how far the heart rate data can be trusted.

use crate::classifier::{WorkoutClassification, WorkoutClassifier};
use crate::decoupling::{DecouplingCalculator, DecouplingResult};
use crate::models::{Activity, AthleteZones, HrZoneBound, Streams};
use crate::stats;
use crate::zones::ZoneCalculator;
use serde::{Deserialize, Serialize};

const MIN_HR_SAMPLES: usize = 10;
const LONG_RUN_SECONDS: f64 = 5400.0;
const HEAT_CAVEAT_CELSIUS: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingGrade {
    Excellent,
    Good,
    Uneven,
    Poor,
}

impl PacingGrade {
    fn from_cv(cv_pct: f64) -> Self {
        if cv_pct < 3.0 {
            PacingGrade::Excellent
        } else if cv_pct < 5.0 {
            PacingGrade::Good
        } else if cv_pct < 8.0 {
            PacingGrade::Uneven
        } else {
            PacingGrade::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    Negative,
    Even,
    Positive,
}

impl SplitType {
    fn from_ratio(ratio: f64) -> Self {
        if ratio < 0.98 {
            SplitType::Negative
        } else if ratio < 1.02 {
            SplitType::Even
        } else {
            SplitType::Positive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingAnalysis {
    pub split_count: usize,
    pub average_split_seconds: f64,
    pub pace_cv_pct: f64,
    pub pacing_grade: PacingGrade,
    /// Second-half mean split time over first-half mean split time
    pub split_ratio: f64,
    pub split_type: SplitType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftAssessment {
    Normal,
    MildDrift,
    SignificantDrift,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrAnalysis {
    pub average_hr: f64,
    pub max_hr: f64,
    pub min_hr: f64,
    pub first_half_avg_hr: f64,
    pub second_half_avg_hr: f64,
    pub cardiac_drift_pct: f64,
    pub drift_assessment: DriftAssessment,
}

/// Time attributed to one athlete HR zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneTime {
    /// 1-based
    pub zone_index: usize,
    pub zone_range: String,
    pub time_seconds: f64,
    pub time_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CadenceAssessment {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceAnalysis {
    pub average_spm: f64,
    pub assessment: CadenceAssessment,
}

impl CadenceAnalysis {
    fn from_spm(average_spm: f64) -> Self {
        let assessment = if average_spm < 160.0 {
            CadenceAssessment::Low
        } else if average_spm < 185.0 {
            CadenceAssessment::Normal
        } else {
            CadenceAssessment::High
        };
        Self {
            average_spm,
            assessment,
        }
    }
}

/// A condition under which heart rate numbers should be read with care
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrReliabilityWarning {
    pub condition: String,
    pub detail: String,
}

impl HrReliabilityWarning {
    fn new(condition: &str, detail: String) -> Self {
        Self {
            condition: condition.to_string(),
            detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAnalysisResult {
    pub activity_id: Option<u64>,
    pub name: String,
    pub pacing: Option<PacingAnalysis>,
    pub hr_analysis: Option<HrAnalysis>,
    pub zone_distribution: Option<Vec<ZoneTime>>,
    pub cadence: Option<CadenceAnalysis>,
    pub decoupling: Option<DecouplingResult>,
    pub workout_type: WorkoutClassification,
    pub flags: Vec<String>,
    pub hr_reliability_warnings: Vec<HrReliabilityWarning>,
}

/// Running-specific analysis utilities
pub struct RunAnalyzer;

impl RunAnalyzer {
    /// Analyze one run with whatever streams and athlete zones are available
    pub fn analyze_run(
        activity: &Activity,
        streams: Option<&Streams>,
        athlete_zones: Option<&AthleteZones>,
    ) -> RunAnalysisResult {
        let pacing = Self::pacing(activity);
        let hr_stream = streams.map(|s| s.heartrate.as_slice()).unwrap_or(&[]);
        let hr_analysis = Self::hr_analysis(hr_stream);

        let zone_distribution = match (&hr_analysis, athlete_zones) {
            (Some(_), Some(zones)) if !zones.hr_zones().is_empty() => {
                let time = streams.map(|s| s.time.as_slice()).unwrap_or(&[]);
                Some(Self::time_in_zones(hr_stream, zones.hr_zones(), time))
            }
            _ => None,
        };

        let cadence = Self::cadence(activity, streams);
        let decoupling = streams.and_then(|s| DecouplingCalculator::calculate(&s.heartrate, &s.velocity).ok());
        let workout_type = WorkoutClassifier::detect_workout_type(activity);

        let flags = Self::flags(activity, pacing.as_ref(), hr_analysis.as_ref(), zone_distribution.as_deref());
        let hr_reliability_warnings = Self::assess_hr_reliability(activity, streams);

        tracing::debug!(
            activity_id = ?activity.id,
            flags = flags.len(),
            warnings = hr_reliability_warnings.len(),
            "Run analyzed"
        );

        RunAnalysisResult {
            activity_id: activity.id,
            name: activity.name.clone().unwrap_or_else(|| "Untitled".to_string()),
            pacing,
            hr_analysis,
            zone_distribution,
            cadence,
            decoupling,
            workout_type,
            flags,
            hr_reliability_warnings,
        }
    }

    fn pacing(activity: &Activity) -> Option<PacingAnalysis> {
        let split_times = activity.valid_split_times();
        if split_times.is_empty() {
            return None;
        }

        let pace_cv_pct = stats::coefficient_of_variation_pct(&split_times);
        let (first_half, second_half) = stats::half_means(&split_times);
        let split_ratio = if first_half > 0.0 {
            second_half / first_half
        } else {
            1.0
        };

        Some(PacingAnalysis {
            split_count: split_times.len(),
            average_split_seconds: stats::mean(&split_times),
            pace_cv_pct,
            pacing_grade: PacingGrade::from_cv(pace_cv_pct),
            split_ratio,
            split_type: SplitType::from_ratio(split_ratio),
        })
    }

    fn hr_analysis(hr: &[f64]) -> Option<HrAnalysis> {
        if hr.len() < MIN_HR_SAMPLES {
            return None;
        }
        let (first_half_avg_hr, second_half_avg_hr) = stats::half_means(hr);
        let cardiac_drift_pct = if first_half_avg_hr > 0.0 {
            (second_half_avg_hr - first_half_avg_hr) / first_half_avg_hr * 100.0
        } else {
            0.0
        };
        let drift_assessment = match cardiac_drift_pct.abs() {
            d if d < 3.0 => DriftAssessment::Normal,
            d if d < 5.0 => DriftAssessment::MildDrift,
            _ => DriftAssessment::SignificantDrift,
        };

        Some(HrAnalysis {
            average_hr: stats::mean(hr),
            max_hr: stats::max_value(hr),
            min_hr: stats::min_value(hr),
            first_half_avg_hr,
            second_half_avg_hr,
            cardiac_drift_pct,
            drift_assessment,
        })
    }

    /// Seconds spent in each zone.
    ///
    /// Each sample is credited with the time since the previous sample (1 s
    /// when the time stream is missing or too short) and attributed to the
    /// first zone containing it.
    pub fn time_in_zones(hr: &[f64], zones: &[HrZoneBound], time: &[f64]) -> Vec<ZoneTime> {
        if zones.is_empty() || hr.is_empty() {
            return Vec::new();
        }

        let mut zone_seconds = vec![0.0; zones.len()];
        for (i, sample) in hr.iter().enumerate() {
            let dt = if i > 0 && i < time.len() {
                (time[i] - time[i - 1]).max(0.0)
            } else {
                1.0
            };
            if let Some(zone) = ZoneCalculator::zone_index_for_hr(*sample, zones) {
                zone_seconds[zone - 1] += dt;
            }
        }

        let total: f64 = zone_seconds.iter().sum();
        zones
            .iter()
            .zip(zone_seconds)
            .enumerate()
            .map(|(idx, (zone, seconds))| ZoneTime {
                zone_index: idx + 1,
                zone_range: zone.label(),
                time_seconds: seconds,
                time_pct: if total > 0.0 { seconds / total * 100.0 } else { 0.0 },
            })
            .collect()
    }

    /// Steps per minute, doubling platform half-cycle values below 120
    fn cadence(activity: &Activity, streams: Option<&Streams>) -> Option<CadenceAnalysis> {
        let to_spm = |c: f64| if c < 120.0 { c * 2.0 } else { c };

        if let Some(avg) = activity.average_cadence.filter(|c| *c > 0.0) {
            return Some(CadenceAnalysis::from_spm(to_spm(avg)));
        }

        let spm: Vec<f64> = streams?
            .cadence
            .iter()
            .copied()
            .filter(|c| *c > 0.0)
            .map(to_spm)
            .collect();
        if spm.is_empty() {
            None
        } else {
            Some(CadenceAnalysis::from_spm(stats::mean(&spm)))
        }
    }

    fn flags(
        activity: &Activity,
        pacing: Option<&PacingAnalysis>,
        hr: Option<&HrAnalysis>,
        zones: Option<&[ZoneTime]>,
    ) -> Vec<String> {
        let mut flags = Vec::new();

        if hr.map(|h| h.cardiac_drift_pct > 5.0).unwrap_or(false) {
            flags.push(
                "High cardiac drift suggests the run was harder than intended or dehydration occurred."
                    .to_string(),
            );
        }
        if let Some(pacing) = pacing {
            if pacing.pacing_grade == PacingGrade::Poor {
                flags.push("Pacing was inconsistent. Consider more even effort distribution.".to_string());
            }
            if pacing.split_type == SplitType::Positive && pacing.split_ratio > 1.05 {
                flags.push("Significant positive split, started too fast. Practice even pacing.".to_string());
            }
        }
        if let Some(zones) = zones {
            let easy_pct: f64 = zones
                .iter()
                .filter(|z| z.zone_index <= 2)
                .map(|z| z.time_pct)
                .sum();
            if easy_pct < 50.0 && activity.is_untagged() {
                flags.push(format!(
                    "Only {:.0}% of time in zones 1-2. If this was an easy run, slow down.",
                    easy_pct
                ));
            }
        }

        flags
    }

    /// Conditions known to distort heart rate readings
    pub fn assess_hr_reliability(activity: &Activity, streams: Option<&Streams>) -> Vec<HrReliabilityWarning> {
        let mut warnings = Vec::new();

        if let Some(hr) = streams.map(|s| s.heartrate.as_slice()).filter(|hr| hr.len() > 60) {
            let early_end = 60.min(hr.len() / 4);
            let later_end = 120.min(hr.len() / 2);
            if early_end > 0 && later_end > early_end {
                let early = stats::mean(&hr[..early_end]);
                let later = stats::mean(&hr[early_end..later_end]);
                if later > 0.0 && (later - early) / later > 0.15 {
                    warnings.push(HrReliabilityWarning::new(
                        "optical_hr_lag",
                        "HR data shows >15% jump after initial minutes, likely optical sensor warm-up lag."
                            .to_string(),
                    ));
                }
            }
        }

        if activity.moving_time_s > LONG_RUN_SECONDS {
            warnings.push(HrReliabilityWarning::new(
                "long_run_cardiac_drift",
                "Run >90 min, cardiac drift is expected even at steady effort. HR zones less reliable."
                    .to_string(),
            ));
        }

        if let Some(temp) = activity.average_temp_c.filter(|t| *t > HEAT_CAVEAT_CELSIUS) {
            warnings.push(HrReliabilityWarning::new(
                "heat_elevated_hr",
                format!(
                    "Temperature {}°C, heat elevates HR 5-10% above normal for the same effort.",
                    temp
                ),
            ));
        }

        let laps = &activity.laps;
        if laps.len() >= 4 {
            let short = laps
                .iter()
                .filter(|lap| lap.moving_time_s < 300.0 && lap.distance_m > 100.0)
                .count();
            if short as f64 > laps.len() as f64 * 0.4 {
                warnings.push(HrReliabilityWarning::new(
                    "interval_hr_lag",
                    "Many laps <5 min, HR doesn't fully respond to short intervals. Use pace for intensity."
                        .to_string(),
                ));
            }
        }

        warnings
    }
}
