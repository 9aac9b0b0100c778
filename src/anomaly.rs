//! Activity data quality checks
//!
//! Flags GPS glitches, implausible heart rate signals, pace outlier splits
//! and missing channels, then folds them into a 0-10 quality score so
//! coaching logic can skip recordings that are not trustworthy.

use crate::models::{Activity, Streams};
use crate::stats;
use serde::{Deserialize, Serialize};

const MAX_RUNNING_SPEED_MPS: f64 = 7.5;
const MAX_PLAUSIBLE_HR: f64 = 250.0;
const DROPOUT_HR: f64 = 40.0;
const USABLE_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    Gps,
    Pace,
    Hr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Moderate,
    High,
}

impl AnomalySeverity {
    fn penalty(&self) -> f64 {
        match self {
            AnomalySeverity::High => 3.0,
            AnomalySeverity::Moderate => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
    pub detail: String,
}

impl Anomaly {
    fn new(kind: AnomalyKind, severity: AnomalySeverity, detail: String) -> Self {
        Self { kind, severity, detail }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub activity_id: Option<u64>,
    pub anomalies: Vec<Anomaly>,
    pub anomaly_count: usize,
    /// Absent channels: `heart_rate`, `splits`, `cadence`
    pub missing_data: Vec<String>,
    /// 10 = clean, 0 = unusable
    pub data_quality_score: f64,
    pub usable_for_coaching: bool,
}

pub struct AnomalyDetector;

impl AnomalyDetector {
    pub fn detect_anomalies(activity: &Activity, streams: Option<&Streams>) -> AnomalyReport {
        let mut anomalies = Vec::new();

        Self::check_gps(activity, &mut anomalies);
        Self::check_split_pacing(activity, &mut anomalies);

        match streams.filter(|s| s.has_heartrate()) {
            Some(streams) => Self::check_hr_stream(&streams.heartrate, &mut anomalies),
            None => Self::check_hr_summary(activity, &mut anomalies),
        }

        let missing_data = Self::missing_channels(activity, streams);

        let penalty: f64 = anomalies.iter().map(|a| a.severity.penalty()).sum::<f64>()
            + 0.5 * missing_data.len() as f64;
        let data_quality_score = (10.0 - penalty).max(0.0);
        let usable_for_coaching = data_quality_score >= USABLE_SCORE;

        if !usable_for_coaching {
            tracing::warn!(
                activity_id = ?activity.id,
                score = data_quality_score,
                "Activity data not usable for coaching"
            );
        }

        AnomalyReport {
            activity_id: activity.id,
            anomaly_count: anomalies.len(),
            anomalies,
            missing_data,
            data_quality_score,
            usable_for_coaching,
        }
    }

    fn check_gps(activity: &Activity, anomalies: &mut Vec<Anomaly>) {
        let distance = activity.distance_m;
        let moving = activity.moving_time_s;
        if distance <= 0.0 || moving <= 0.0 {
            return;
        }
        let speed = activity.average_speed();

        if speed > MAX_RUNNING_SPEED_MPS {
            anomalies.push(Anomaly::new(
                AnomalyKind::Gps,
                AnomalySeverity::High,
                format!("Average speed {:.2} m/s is impossibly fast for running.", speed),
            ));
        }
        if distance < 100.0 && moving > 300.0 {
            anomalies.push(Anomaly::new(
                AnomalyKind::Gps,
                AnomalySeverity::High,
                format!(
                    "Only {:.0}m recorded over {:.0}s, likely GPS failure.",
                    distance, moving
                ),
            ));
        }
        if speed < 1.0 && moving > 300.0 {
            anomalies.push(Anomaly::new(
                AnomalyKind::Gps,
                AnomalySeverity::Moderate,
                format!(
                    "Average speed {:.2} m/s is slower than walking over {:.0}s of moving time.",
                    speed, moving
                ),
            ));
        }
    }

    fn check_split_pacing(activity: &Activity, anomalies: &mut Vec<Anomaly>) {
        let split_times = activity.valid_split_times();
        if split_times.len() < 3 {
            return;
        }
        let avg = stats::mean(&split_times);
        if avg <= 0.0 {
            return;
        }
        for (idx, time) in split_times.iter().enumerate() {
            if (time - avg).abs() / avg > 0.5 {
                anomalies.push(Anomaly::new(
                    AnomalyKind::Pace,
                    AnomalySeverity::Moderate,
                    format!(
                        "Split {} ({:.0}s) deviates >50% from average ({:.0}s), possible GPS glitch or stop.",
                        idx + 1,
                        time,
                        avg
                    ),
                ));
            }
        }
    }

    fn check_hr_stream(hr: &[f64], anomalies: &mut Vec<Anomaly>) {
        let max_hr = stats::max_value(hr);
        let min_hr = stats::min_value(hr);

        if max_hr > MAX_PLAUSIBLE_HR {
            anomalies.push(Anomaly::new(
                AnomalyKind::Hr,
                AnomalySeverity::High,
                format!("Max HR {:.0} bpm exceeds physiological limit, sensor malfunction.", max_hr),
            ));
        }

        let low_count = hr.iter().filter(|v| **v < DROPOUT_HR).count();
        if low_count as f64 > hr.len() as f64 * 0.1 {
            anomalies.push(Anomaly::new(
                AnomalyKind::Hr,
                AnomalySeverity::High,
                format!(
                    "{}/{} HR readings below 40 bpm, sensor dropout.",
                    low_count,
                    hr.len()
                ),
            ));
        }

        if max_hr == min_hr && hr.len() > 10 {
            anomalies.push(Anomaly::new(
                AnomalyKind::Hr,
                AnomalySeverity::High,
                format!("HR is constant at {:.0} bpm, sensor stuck.", max_hr),
            ));
        } else if hr.len() > 20 && stats::population_variance(hr) < 1.0 && stats::mean(hr) > 60.0 {
            anomalies.push(Anomaly::new(
                AnomalyKind::Hr,
                AnomalySeverity::Moderate,
                "HR variance < 1 bpm², sensor may not be reading correctly.".to_string(),
            ));
        }
    }

    fn check_hr_summary(activity: &Activity, anomalies: &mut Vec<Anomaly>) {
        let Some(avg_hr) = activity.average_heartrate else {
            return;
        };
        let max_hr = activity.max_heartrate.unwrap_or(0.0);

        if max_hr > MAX_PLAUSIBLE_HR {
            anomalies.push(Anomaly::new(
                AnomalyKind::Hr,
                AnomalySeverity::High,
                format!("Max HR {:.0} bpm exceeds physiological limit.", max_hr),
            ));
        }
        if max_hr > 0.0 && avg_hr > max_hr {
            anomalies.push(Anomaly::new(
                AnomalyKind::Hr,
                AnomalySeverity::Moderate,
                format!(
                    "Average HR ({:.0}) exceeds max HR ({:.0}), data inconsistency.",
                    avg_hr, max_hr
                ),
            ));
        }
    }

    fn missing_channels(activity: &Activity, streams: Option<&Streams>) -> Vec<String> {
        let mut missing = Vec::new();
        let hr_stream = streams.map(Streams::has_heartrate).unwrap_or(false);
        if activity.average_heartrate.is_none() && !hr_stream {
            missing.push("heart_rate".to_string());
        }
        if activity.splits.is_empty() {
            missing.push("splits".to_string());
        }
        let cadence_stream = streams.map(|s| !s.cadence.is_empty()).unwrap_or(false);
        if !activity.average_cadence.map(|c| c > 0.0).unwrap_or(false) && !cadence_stream {
            missing.push("cadence".to_string());
        }
        missing
    }
}
