//! Fitness trend from best efforts and weekly volume

use crate::models::{BestEffort, WeeklySummary};
use crate::stats;
use crate::timefmt::{format_time, round_seconds};
use crate::vo2max;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VdotEstimate {
    pub distance: String,
    pub time: String,
    pub vdot: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VdotRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Stable,
    Decreasing,
}

impl TrendDirection {
    fn from_pct(change_pct: f64) -> Self {
        if change_pct > 5.0 {
            TrendDirection::Increasing
        } else if change_pct < -5.0 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    fn narrative(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "Training volume is trending upward, good progressive overload.",
            TrendDirection::Stable => "Training volume is stable.",
            TrendDirection::Decreasing => {
                "Training volume is declining, intentional taper or potential detraining."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeTrend {
    pub first_half_avg_km: f64,
    pub second_half_avg_km: f64,
    pub trend_pct: f64,
    pub trend_direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consistency {
    pub active_weeks: usize,
    pub total_weeks: usize,
    pub consistency_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessTrend {
    pub vdot_estimates: Vec<VdotEstimate>,
    /// Best VDOT across efforts
    pub current_vdot: Option<f64>,
    pub vdot_range: Option<VdotRange>,
    /// Needs at least two weeks
    pub volume_trend: Option<VolumeTrend>,
    pub consistency: Option<Consistency>,
    pub narrative: String,
}

pub struct FitnessTrendAssessor;

impl FitnessTrendAssessor {
    pub fn assess(best_efforts: &[BestEffort], weekly_summaries: &[WeeklySummary]) -> FitnessTrend {
        let vdot_estimates: Vec<VdotEstimate> = best_efforts
            .iter()
            .filter(|effort| effort.is_vdot_eligible())
            .map(|effort| VdotEstimate {
                distance: effort.distance_name.clone(),
                time: format_time(round_seconds(effort.elapsed_time_s)),
                vdot: vo2max::rounded_vdot(effort.distance_m, effort.elapsed_time_s),
            })
            .collect();

        let vdots: Vec<f64> = vdot_estimates.iter().map(|v| v.vdot).collect();
        let vdot_range = (!vdots.is_empty()).then(|| VdotRange {
            min: stats::min_value(&vdots),
            max: stats::max_value(&vdots),
        });
        let current_vdot = vdot_range.map(|range| range.max);

        let distances: Vec<f64> = weekly_summaries.iter().map(|w| w.total_distance_km).collect();
        let (volume_trend, consistency) = if distances.len() >= 2 {
            (Some(Self::volume_trend(&distances)), Some(Self::consistency(&distances)))
        } else {
            (None, None)
        };

        let mut narrative = Vec::new();
        if let Some(vdot) = current_vdot {
            narrative.push(format!("Current VDOT: {:.1} (estimated from best efforts).", vdot));
        }
        if let Some(trend) = &volume_trend {
            narrative.push(trend.trend_direction.narrative().to_string());
        }
        if let Some(consistency) = &consistency {
            let sentence = if consistency.consistency_pct >= 90.0 {
                "Excellent training consistency."
            } else if consistency.consistency_pct >= 70.0 {
                "Good consistency, but some missed weeks."
            } else {
                "Inconsistent training; consistency is the strongest predictor of improvement."
            };
            narrative.push(sentence.to_string());
        }

        tracing::debug!(?current_vdot, weeks = distances.len(), "Fitness trend assessed");

        FitnessTrend {
            vdot_estimates,
            current_vdot,
            vdot_range,
            volume_trend,
            consistency,
            narrative: narrative.join(" "),
        }
    }

    fn volume_trend(distances: &[f64]) -> VolumeTrend {
        let (first_half_avg_km, second_half_avg_km) = stats::half_means(distances);
        let trend_pct = if first_half_avg_km > 0.0 {
            (second_half_avg_km - first_half_avg_km) / first_half_avg_km * 100.0
        } else {
            0.0
        };
        VolumeTrend {
            first_half_avg_km,
            second_half_avg_km,
            trend_pct,
            trend_direction: TrendDirection::from_pct(trend_pct),
        }
    }

    fn consistency(distances: &[f64]) -> Consistency {
        let active_weeks = distances.iter().filter(|d| **d > 0.0).count();
        Consistency {
            active_weeks,
            total_weeks: distances.len(),
            consistency_pct: active_weeks as f64 / distances.len() as f64 * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weeks(distances: &[f64]) -> Vec<WeeklySummary> {
        distances
            .iter()
            .map(|d| WeeklySummary::new(*d, d * 330.0, d / 3.0))
            .collect()
    }

    #[test]
    fn test_vdot_from_best_efforts() {
        let efforts = vec![
            BestEffort::new("5k", 5000.0, 1200.0),
            BestEffort::new("10k", 10000.0, 2520.0),
            BestEffort::new("400m", 400.0, 75.0),
        ];
        let trend = FitnessTrendAssessor::assess(&efforts, &[]);

        assert_eq!(trend.vdot_estimates.len(), 2);
        assert_eq!(trend.vdot_estimates[0].time, "20:00");
        let range = trend.vdot_range.unwrap();
        assert_eq!(trend.current_vdot, Some(range.max));
        assert!(range.min < range.max);
        assert!((range.max - 49.8).abs() < 0.5);
        assert!(trend.volume_trend.is_none());
        assert!(trend.narrative.starts_with("Current VDOT"));
    }

    #[test]
    fn test_increasing_volume() {
        let trend = FitnessTrendAssessor::assess(&[], &weeks(&[30.0, 30.0, 40.0, 40.0]));
        let volume = trend.volume_trend.unwrap();
        assert_eq!(volume.first_half_avg_km, 30.0);
        assert_eq!(volume.second_half_avg_km, 40.0);
        assert_eq!(volume.trend_direction, TrendDirection::Increasing);
        assert!(trend.current_vdot.is_none());
        assert!(trend.narrative.contains("trending upward"));
    }

    #[test]
    fn test_odd_week_count_splits_low() {
        let trend = FitnessTrendAssessor::assess(&[], &weeks(&[40.0, 38.0, 40.0]));
        let volume = trend.volume_trend.unwrap();
        assert_eq!(volume.first_half_avg_km, 40.0);
        assert_eq!(volume.second_half_avg_km, 39.0);
        assert_eq!(volume.trend_direction, TrendDirection::Stable);
    }

    #[test]
    fn test_consistency() {
        let trend = FitnessTrendAssessor::assess(&[], &weeks(&[30.0, 0.0, 30.0, 0.0]));
        let consistency = trend.consistency.unwrap();
        assert_eq!(consistency.active_weeks, 2);
        assert_eq!(consistency.consistency_pct, 50.0);
        assert!(trend.narrative.contains("Inconsistent"));
    }

    #[test]
    fn test_empty_inputs() {
        let trend = FitnessTrendAssessor::assess(&[], &[]);
        assert!(trend.vdot_estimates.is_empty());
        assert!(trend.consistency.is_none());
        assert!(trend.narrative.is_empty());
    }
}
