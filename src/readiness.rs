//! Race readiness scoring
//!
//! Each goal is scored on up to five independent components (0-10). A
//! component only counts when its inputs are available, and the overall
//! score is the mean of the components that were scored.

use crate::error::{PaceError, Result};
use crate::models::{BestEffort, RaceGoal, WeeklySummary};
use crate::prediction::RaceDistance;
use crate::stats;
use crate::timefmt::format_time;
use crate::vo2max;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessComponent {
    Fitness,
    Volume,
    LongRun,
    Consistency,
    LoadManagement,
}

/// Where the current VDOT came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VdotSource {
    BestEfforts,
    /// 5K-equivalent of the most recent substantial week's average pace
    WeeklyPace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessAssessment {
    pub goal: String,
    pub target_time: String,
    pub target_vdot: Option<f64>,
    pub current_vdot: Option<f64>,
    pub current_vdot_source: Option<VdotSource>,
    /// Mean of the scored components, 0 when nothing could be scored
    pub overall_score: f64,
    pub component_scores: BTreeMap<ReadinessComponent, u8>,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub assessments: Vec<ReadinessAssessment>,
}

/// Training history shared by every goal
struct TrainingHistory {
    current_vdot: Option<(f64, VdotSource)>,
    peak_weekly_km: f64,
    longest_run_km: f64,
    active_pct: Option<f64>,
}

impl TrainingHistory {
    fn new(best_efforts: &[BestEffort], weekly_summaries: &[WeeklySummary]) -> Self {
        let weekly_km: Vec<f64> = weekly_summaries.iter().map(|w| w.total_distance_km).collect();
        let longest: Vec<f64> = weekly_summaries.iter().map(|w| w.longest_run_km).collect();
        let active_pct = (!weekly_km.is_empty()).then(|| {
            weekly_km.iter().filter(|d| **d > 0.0).count() as f64 / weekly_km.len() as f64 * 100.0
        });

        Self {
            current_vdot: Self::current_vdot(best_efforts, weekly_summaries),
            peak_weekly_km: stats::max_value(&weekly_km).max(0.0),
            longest_run_km: stats::max_value(&longest).max(0.0),
            active_pct,
        }
    }

    fn current_vdot(best_efforts: &[BestEffort], weekly_summaries: &[WeeklySummary]) -> Option<(f64, VdotSource)> {
        let from_efforts: Vec<f64> = best_efforts
            .iter()
            .filter(|e| e.is_vdot_eligible())
            .map(|e| vo2max::rounded_vdot(e.distance_m, e.elapsed_time_s))
            .collect();
        if !from_efforts.is_empty() {
            return Some((stats::max_value(&from_efforts), VdotSource::BestEfforts));
        }

        weekly_summaries
            .iter()
            .rev()
            .find(|w| w.total_distance_km >= 5.0 && w.total_time_s > 0.0)
            .map(|w| {
                let speed_mps = w.total_distance_km * 1000.0 / w.total_time_s;
                let five_k_time = 5000.0 / speed_mps;
                (vo2max::rounded_vdot(5000.0, five_k_time), VdotSource::WeeklyPace)
            })
    }
}

pub struct RaceReadinessScorer;

impl RaceReadinessScorer {
    /// Score readiness for each goal. `acwr` is the current weekly ACWR, if known.
    pub fn assess(
        goals: &[RaceGoal],
        best_efforts: &[BestEffort],
        weekly_summaries: &[WeeklySummary],
        acwr: Option<f64>,
    ) -> Result<ReadinessReport> {
        if goals.is_empty() {
            return Err(PaceError::InputRequired {
                calculation: "race readiness".to_string(),
                options: "at least one race goal".to_string(),
            });
        }

        let history = TrainingHistory::new(best_efforts, weekly_summaries);
        let assessments = goals
            .iter()
            .map(|goal| Self::assess_goal(goal, &history, acwr))
            .collect();

        Ok(ReadinessReport { assessments })
    }

    fn assess_goal(goal: &RaceGoal, history: &TrainingHistory, acwr: Option<f64>) -> ReadinessAssessment {
        let mut scores = BTreeMap::new();
        let mut strengths = Vec::new();
        let mut risks = Vec::new();

        let distance = match RaceDistance::lookup(&goal.race_type) {
            Ok(distance) => Some(distance),
            Err(err) => {
                tracing::warn!(race_type = %goal.race_type, "Unknown race type in goal");
                risks.push(format!(
                    "{} Distance-based readiness could not be scored.",
                    err.user_message()
                ));
                None
            }
        };

        let target_vdot = distance
            .filter(|_| goal.target_time_seconds > 0)
            .map(|d| vo2max::rounded_vdot(d.meters, goal.target_time_seconds as f64));
        let current_vdot = history.current_vdot.map(|(vdot, _)| vdot);

        if let (Some(target), Some(current)) = (target_vdot, current_vdot) {
            let score = Self::fitness_score(current - target);
            scores.insert(ReadinessComponent::Fitness, score);
            if score >= 8 {
                strengths.push("Fitness level supports the goal time.".to_string());
            } else {
                risks.push(format!(
                    "VDOT gap of {:.1}, goal may be aggressive.",
                    target - current
                ));
            }
        }

        if let Some(race_km) = distance.map(|d| d.meters / 1000.0) {
            if history.peak_weekly_km > 0.0 {
                let score = Self::volume_score(history.peak_weekly_km / race_km);
                scores.insert(ReadinessComponent::Volume, score);
                if score >= 8 {
                    strengths.push("Weekly volume is adequate for this distance.".to_string());
                } else {
                    risks.push(format!(
                        "Peak weekly mileage ({:.1} km) may be insufficient.",
                        history.peak_weekly_km
                    ));
                }
            }

            if history.longest_run_km > 0.0 {
                let score = Self::long_run_score(history.longest_run_km / race_km);
                scores.insert(ReadinessComponent::LongRun, score);
                if score >= 7 {
                    strengths.push(format!(
                        "Longest run ({:.1} km) provides good race preparation.",
                        history.longest_run_km
                    ));
                } else {
                    risks.push(format!(
                        "Longest run ({:.1} km) is short for this race distance.",
                        history.longest_run_km
                    ));
                }
            }
        }

        if let Some(active_pct) = history.active_pct {
            let score = Self::consistency_score(active_pct);
            scores.insert(ReadinessComponent::Consistency, score);
            if score >= 7 {
                strengths.push("Consistent training pattern.".to_string());
            } else {
                risks.push("Inconsistent training, missed weeks reduce preparedness.".to_string());
            }
        }

        if let Some(acwr) = acwr {
            let score = Self::load_score(acwr);
            scores.insert(ReadinessComponent::LoadManagement, score);
            if score >= 9 {
                strengths.push("Training load is in the optimal ACWR range (0.8-1.3).".to_string());
            } else {
                risks.push(format!(
                    "ACWR of {:.2} is outside the optimal 0.8-1.3 range.",
                    acwr
                ));
            }
        }

        let overall_score = if scores.is_empty() {
            0.0
        } else {
            scores.values().map(|s| *s as f64).sum::<f64>() / scores.len() as f64
        };

        ReadinessAssessment {
            goal: goal.race_type.clone(),
            target_time: format_time(goal.target_time_seconds),
            target_vdot,
            current_vdot,
            current_vdot_source: history.current_vdot.map(|(_, source)| source),
            overall_score,
            component_scores: scores,
            strengths,
            risks,
        }
    }

    fn fitness_score(vdot_gap: f64) -> u8 {
        match vdot_gap {
            g if g >= 2.0 => 10,
            g if g >= 0.0 => 8,
            g if g >= -2.0 => 6,
            g if g >= -5.0 => 4,
            _ => 2,
        }
    }

    fn volume_score(peak_to_race: f64) -> u8 {
        match peak_to_race {
            r if r >= 2.0 => 10,
            r if r >= 1.5 => 8,
            r if r >= 1.0 => 5,
            _ => 3,
        }
    }

    fn long_run_score(longest_to_race: f64) -> u8 {
        match longest_to_race {
            r if r >= 0.75 => 10,
            r if r >= 0.5 => 7,
            r if r >= 0.35 => 4,
            _ => 2,
        }
    }

    fn consistency_score(active_pct: f64) -> u8 {
        match active_pct {
            p if p >= 90.0 => 10,
            p if p >= 75.0 => 7,
            p if p >= 50.0 => 4,
            _ => 2,
        }
    }

    fn load_score(acwr: f64) -> u8 {
        if (0.8..=1.3).contains(&acwr) {
            9
        } else if (0.6..=1.5).contains(&acwr) {
            6
        } else {
            3
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_block() -> Vec<WeeklySummary> {
        vec![
            WeeklySummary::new(40.0, 40.0 * 330.0, 14.0),
            WeeklySummary::new(45.0, 45.0 * 330.0, 16.0),
            WeeklySummary::new(50.0, 50.0 * 330.0, 18.0),
            WeeklySummary::new(44.0, 44.0 * 330.0, 12.0),
        ]
    }

    #[test]
    fn test_half_marathon_readiness() {
        let goals = vec![RaceGoal::new("half marathon", "1:45:00").unwrap()];
        let efforts = vec![BestEffort::new("10k", 10000.0, 2700.0)];
        let report = RaceReadinessScorer::assess(&goals, &efforts, &training_block(), Some(1.0)).unwrap();
        let assessment = &report.assessments[0];

        assert_eq!(assessment.target_time, "1:45:00");
        assert_eq!(assessment.current_vdot_source, Some(VdotSource::BestEfforts));
        assert_eq!(assessment.component_scores.len(), 5);
        // 50 km peak / 21.1 km race
        assert_eq!(assessment.component_scores[&ReadinessComponent::Volume], 10);
        // 18 / 21.1 = 0.85
        assert_eq!(assessment.component_scores[&ReadinessComponent::LongRun], 10);
        assert_eq!(assessment.component_scores[&ReadinessComponent::Consistency], 10);
        assert_eq!(assessment.component_scores[&ReadinessComponent::LoadManagement], 9);
        assert!(assessment.overall_score > 0.0 && assessment.overall_score <= 10.0);
    }

    #[test]
    fn test_marathon_goal_flags_volume_and_long_run() {
        let goals = vec![RaceGoal::new("marathon", "3:30:00").unwrap()];
        let report = RaceReadinessScorer::assess(&goals, &[], &training_block(), None).unwrap();
        let assessment = &report.assessments[0];

        // 50 / 42.195 = 1.18
        assert_eq!(assessment.component_scores[&ReadinessComponent::Volume], 5);
        // 18 / 42.195 = 0.43
        assert_eq!(assessment.component_scores[&ReadinessComponent::LongRun], 4);
        assert!(!assessment.component_scores.contains_key(&ReadinessComponent::LoadManagement));
        assert!(assessment.risks.iter().any(|r| r.contains("Peak weekly mileage")));
        assert!(assessment.risks.iter().any(|r| r.contains("Longest run")));
    }

    #[test]
    fn test_vdot_falls_back_to_weekly_pace() {
        let goals = vec![RaceGoal::new("10k", "50:00").unwrap()];
        let report = RaceReadinessScorer::assess(&goals, &[], &training_block(), None).unwrap();
        let assessment = &report.assessments[0];
        assert_eq!(assessment.current_vdot_source, Some(VdotSource::WeeklyPace));
        assert!(assessment.current_vdot.is_some());
        assert!(assessment.component_scores.contains_key(&ReadinessComponent::Fitness));
    }

    #[test]
    fn test_unknown_race_type_reported_as_risk() {
        let goals = vec![RaceGoal::new("ultra", "6:00:00").unwrap()];
        let report = RaceReadinessScorer::assess(&goals, &[], &training_block(), None).unwrap();
        let assessment = &report.assessments[0];
        assert!(assessment.target_vdot.is_none());
        assert!(assessment.risks.iter().any(|r| r.contains("ultra")));
        assert_eq!(assessment.component_scores.len(), 1);
    }

    #[test]
    fn test_no_goals() {
        let err = RaceReadinessScorer::assess(&[], &[], &[], None).unwrap_err();
        assert!(matches!(err, PaceError::InputRequired { .. }));
    }

    #[test]
    fn test_nothing_scorable() {
        let goals = vec![RaceGoal::new("5k", "25:00").unwrap()];
        let report = RaceReadinessScorer::assess(&goals, &[], &[], None).unwrap();
        assert_eq!(report.assessments[0].overall_score, 0.0);
        assert!(report.assessments[0].component_scores.is_empty());
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(RaceReadinessScorer::fitness_score(2.0), 10);
        assert_eq!(RaceReadinessScorer::fitness_score(-2.0), 6);
        assert_eq!(RaceReadinessScorer::fitness_score(-5.1), 2);
        assert_eq!(RaceReadinessScorer::load_score(1.4), 6);
        assert_eq!(RaceReadinessScorer::load_score(1.6), 3);
    }
}
