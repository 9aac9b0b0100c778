//! Rule-based workout type detection
//!
//! Rules live in a fixed, ordered table and the first one that matches wins.
//! The table itself is public so callers can inspect the priority order.

use crate::models::{Activity, Lap};
use crate::stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Detected workout type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Race,
    Intervals,
    Progression,
    Tempo,
    LongRun,
    Recovery,
    EasyRun,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Race => "race",
            WorkoutType::Intervals => "intervals",
            WorkoutType::Progression => "progression",
            WorkoutType::Tempo => "tempo",
            WorkoutType::LongRun => "long_run",
            WorkoutType::Recovery => "recovery",
            WorkoutType::EasyRun => "easy_run",
        }
    }
}

impl std::fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Moderate,
    High,
}

/// Work/rest breakdown of an interval session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalBreakdown {
    pub interval_count: usize,
    pub avg_work_distance_m: f64,
    pub avg_work_time_s: f64,
    pub avg_rest_time_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutClassification {
    pub detected_type: WorkoutType,
    pub confidence: Confidence,
    /// What the decision was based on, e.g. `"lap_analysis"`
    pub source: String,
    /// Numbers that triggered the rule
    pub evidence: BTreeMap<String, f64>,
    pub intervals: Option<IntervalBreakdown>,
}

impl WorkoutClassification {
    fn new(detected_type: WorkoutType, confidence: Confidence, source: &str) -> Self {
        Self {
            detected_type,
            confidence,
            source: source.to_string(),
            evidence: BTreeMap::new(),
            intervals: None,
        }
    }

    fn with_evidence(mut self, key: &str, value: f64) -> Self {
        self.evidence.insert(key.to_string(), value);
        self
    }
}

/// One entry of the rule chain
pub struct ClassificationRule {
    pub name: &'static str,
    pub evaluate: fn(&Activity) -> Option<WorkoutClassification>,
}

static RULES: [ClassificationRule; 7] = [
    ClassificationRule { name: "user_tagged_race", evaluate: race_rule },
    ClassificationRule { name: "interval_laps", evaluate: interval_rule },
    ClassificationRule { name: "progression_splits", evaluate: progression_rule },
    ClassificationRule { name: "tempo_effort", evaluate: tempo_rule },
    ClassificationRule { name: "long_run", evaluate: long_run_rule },
    ClassificationRule { name: "recovery", evaluate: recovery_rule },
    ClassificationRule { name: "default_easy", evaluate: default_rule },
];

/// Workout classification entry point
pub struct WorkoutClassifier;

impl WorkoutClassifier {
    /// The ordered rule chain, highest priority first
    pub fn rules() -> &'static [ClassificationRule] {
        &RULES
    }

    /// Classify an activity by the first matching rule
    pub fn detect_workout_type(activity: &Activity) -> WorkoutClassification {
        let classification = RULES
            .iter()
            .find_map(|rule| (rule.evaluate)(activity))
            .unwrap_or_else(|| WorkoutClassification::new(WorkoutType::EasyRun, Confidence::Low, "default"));

        tracing::debug!(
            workout_type = %classification.detected_type,
            source = %classification.source,
            "Workout classified"
        );
        classification
    }
}

fn race_rule(activity: &Activity) -> Option<WorkoutClassification> {
    activity
        .is_race_tagged()
        .then(|| WorkoutClassification::new(WorkoutType::Race, Confidence::High, "user_tagged"))
}

fn interval_rule(activity: &Activity) -> Option<WorkoutClassification> {
    if activity.laps.len() < 4 {
        return None;
    }
    let lap_speeds: Vec<f64> = activity
        .laps
        .iter()
        .filter(|lap| lap.distance_m > 100.0)
        .map(|lap| lap.average_speed)
        .collect();
    if lap_speeds.len() < 4 {
        return None;
    }

    let mean_speed = stats::mean(&lap_speeds);
    let cv = stats::coefficient_of_variation_pct(&lap_speeds);
    if cv <= 15.0 {
        return None;
    }

    let (work, rest): (Vec<&Lap>, Vec<&Lap>) = activity
        .laps
        .iter()
        .partition(|lap| lap.average_speed > mean_speed);

    let work_distances: Vec<f64> = work.iter().map(|lap| lap.distance_m).collect();
    let work_times: Vec<f64> = work.iter().map(|lap| lap.moving_time_s).collect();
    let rest_times: Vec<f64> = rest.iter().map(|lap| lap.moving_time_s).collect();

    let confidence = if cv > 25.0 {
        Confidence::High
    } else {
        Confidence::Moderate
    };

    let mut classification = WorkoutClassification::new(WorkoutType::Intervals, confidence, "lap_analysis")
        .with_evidence("lap_speed_cv_pct", cv);
    classification.intervals = Some(IntervalBreakdown {
        interval_count: work.len(),
        avg_work_distance_m: stats::mean(&work_distances),
        avg_work_time_s: stats::mean(&work_times),
        avg_rest_time_s: stats::mean(&rest_times),
    });
    Some(classification)
}

fn progression_rule(activity: &Activity) -> Option<WorkoutClassification> {
    let split_times = activity.valid_split_times();
    if split_times.len() < 4 {
        return None;
    }
    let faster = split_times.windows(2).filter(|w| w[1] < w[0]).count();
    if faster as f64 >= split_times.len() as f64 * 0.7 {
        Some(
            WorkoutClassification::new(WorkoutType::Progression, Confidence::Moderate, "split_analysis")
                .with_evidence("faster_splits", faster as f64),
        )
    } else {
        None
    }
}

fn tempo_rule(activity: &Activity) -> Option<WorkoutClassification> {
    let split_times = activity.valid_split_times();
    if split_times.len() < 3 {
        return None;
    }
    let cv = stats::coefficient_of_variation_pct(&split_times);
    let hr_pct = match (activity.average_heartrate, activity.max_heartrate) {
        (Some(avg), Some(max)) if max > 0.0 => avg / max * 100.0,
        _ => return None,
    };
    let distance_km = activity.distance_km();

    if cv < 5.0 && hr_pct > 80.0 && (3.0..=15.0).contains(&distance_km) {
        Some(
            WorkoutClassification::new(WorkoutType::Tempo, Confidence::Moderate, "pace_hr_analysis")
                .with_evidence("split_cv_pct", cv)
                .with_evidence("hr_pct_max", hr_pct),
        )
    } else {
        None
    }
}

fn long_run_rule(activity: &Activity) -> Option<WorkoutClassification> {
    (activity.distance_km() >= 15.0 || activity.moving_time_s >= 5400.0).then(|| {
        WorkoutClassification::new(WorkoutType::LongRun, Confidence::High, "distance_duration")
            .with_evidence("distance_km", activity.distance_km())
            .with_evidence("moving_time_s", activity.moving_time_s)
    })
}

fn recovery_rule(activity: &Activity) -> Option<WorkoutClassification> {
    let speed = activity.average_speed();
    (activity.distance_km() < 6.0 && speed < 2.8).then(|| {
        WorkoutClassification::new(WorkoutType::Recovery, Confidence::Moderate, "distance_pace")
            .with_evidence("average_speed_mps", speed)
    })
}

fn default_rule(_activity: &Activity) -> Option<WorkoutClassification> {
    Some(WorkoutClassification::new(WorkoutType::EasyRun, Confidence::Low, "default"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Split;

    fn split(seconds: f64) -> Split {
        Split {
            distance_m: 1000.0,
            moving_time_s: Some(seconds),
            ..Split::default()
        }
    }

    fn lap(distance_m: f64, average_speed: f64) -> Lap {
        Lap {
            distance_m,
            average_speed,
            moving_time_s: distance_m / average_speed,
        }
    }

    fn interval_session() -> Activity {
        Activity {
            distance_m: 8000.0,
            moving_time_s: 2400.0,
            laps: vec![
                lap(1000.0, 5.0),
                lap(400.0, 2.0),
                lap(1000.0, 5.0),
                lap(400.0, 2.0),
                lap(1000.0, 5.0),
                lap(400.0, 2.0),
            ],
            ..Activity::default()
        }
    }

    #[test]
    fn test_race_tag_overrides_everything() {
        let mut activity = interval_session();
        activity.workout_type = Some(1);
        activity.distance_m = 42195.0;

        let result = WorkoutClassifier::detect_workout_type(&activity);
        assert_eq!(result.detected_type, WorkoutType::Race);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.source, "user_tagged");
    }

    #[test]
    fn test_intervals_detected_from_laps() {
        let result = WorkoutClassifier::detect_workout_type(&interval_session());
        assert_eq!(result.detected_type, WorkoutType::Intervals);
        assert_eq!(result.confidence, Confidence::High);

        let breakdown = result.intervals.unwrap();
        assert_eq!(breakdown.interval_count, 3);
        assert_eq!(breakdown.avg_work_distance_m, 1000.0);
        assert_eq!(breakdown.avg_work_time_s, 200.0);
        assert_eq!(breakdown.avg_rest_time_s, 200.0);
    }

    #[test]
    fn test_short_laps_do_not_count() {
        let mut activity = interval_session();
        for lap in activity.laps.iter_mut().skip(2) {
            lap.distance_m = 50.0;
        }
        let result = WorkoutClassifier::detect_workout_type(&activity);
        assert_ne!(result.detected_type, WorkoutType::Intervals);
    }

    #[test]
    fn test_progression_run() {
        let activity = Activity {
            distance_m: 8000.0,
            moving_time_s: 2300.0,
            splits: vec![split(310.0), split(300.0), split(290.0), split(280.0), split(275.0)],
            ..Activity::default()
        };
        let result = WorkoutClassifier::detect_workout_type(&activity);
        assert_eq!(result.detected_type, WorkoutType::Progression);
        assert_eq!(result.confidence, Confidence::Moderate);
    }

    #[test]
    fn test_tempo_run() {
        let activity = Activity {
            distance_m: 8000.0,
            moving_time_s: 2000.0,
            splits: vec![split(250.0), split(252.0), split(249.0), split(251.0), split(250.0)],
            average_heartrate: Some(165.0),
            max_heartrate: Some(180.0),
            ..Activity::default()
        };
        let result = WorkoutClassifier::detect_workout_type(&activity);
        assert_eq!(result.detected_type, WorkoutType::Tempo);
        assert!(result.evidence["hr_pct_max"] > 80.0);
    }

    #[test]
    fn test_even_pace_without_hr_is_not_tempo() {
        let activity = Activity {
            distance_m: 8000.0,
            moving_time_s: 2400.0,
            splits: vec![split(300.0), split(301.0), split(299.0), split(300.0), split(300.0)],
            ..Activity::default()
        };
        let result = WorkoutClassifier::detect_workout_type(&activity);
        assert_eq!(result.detected_type, WorkoutType::EasyRun);
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_long_run_by_duration() {
        let activity = Activity {
            distance_m: 14000.0,
            moving_time_s: 5400.0,
            ..Activity::default()
        };
        assert_eq!(
            WorkoutClassifier::detect_workout_type(&activity).detected_type,
            WorkoutType::LongRun
        );
    }

    #[test]
    fn test_recovery_run() {
        let activity = Activity {
            distance_m: 5000.0,
            moving_time_s: 2000.0,
            ..Activity::default()
        };
        assert_eq!(
            WorkoutClassifier::detect_workout_type(&activity).detected_type,
            WorkoutType::Recovery
        );
    }

    #[test]
    fn test_rule_order_is_inspectable() {
        let names: Vec<&str> = WorkoutClassifier::rules().iter().map(|r| r.name).collect();
        assert_eq!(names.first(), Some(&"user_tagged_race"));
        assert_eq!(names.last(), Some(&"default_easy"));
        assert_eq!(names.len(), 7);
    }
}
