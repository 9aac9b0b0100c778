//! Acute:chronic workload ratio (ACWR)
//!
//! Two flavours are offered:
//!
//! - **Weekly, uncoupled**: the latest week against the mean of the four
//!   weeks before it. The acute week never contributes to its own baseline.
//! - **Daily, EWMA**: exponentially weighted acute (7-day span) and chronic
//!   (28-day span) loads, with day-level spike and hard-streak detection.

use crate::error::{PaceError, Result};
use crate::stats;
use serde::{Deserialize, Serialize};

/// Load analysis constants with customizable windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Minimum weekly entries for weekly ACWR (default: 5)
    pub min_weekly_entries: usize,

    /// Weeks averaged into the chronic load (default: 4)
    pub chronic_weeks: usize,

    /// Minimum daily entries for daily ACWR (default: 28)
    pub min_daily_entries: usize,

    /// Acute EWMA span in days, decay `2/(span+1)` (default: 7)
    pub acute_span_days: u32,

    /// Chronic EWMA span in days, decay `2/(span+1)` (default: 28)
    pub chronic_span_days: u32,

    /// Days of history a spike is compared against (default: 28)
    pub spike_window_days: usize,

    /// A day is a spike above `factor × prior max` (default: 1.1)
    pub spike_factor: f64,

    /// Trailing days scanned for hard-day streaks (default: 14)
    pub streak_window_days: usize,

    /// Hard day threshold as a multiple of the median non-zero day (default: 1.5)
    pub hard_day_multiplier: f64,

    /// Streak length worth mentioning (default: 3)
    pub streak_alert_days: u32,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig {
            min_weekly_entries: 5,
            chronic_weeks: 4,
            min_daily_entries: 28,
            acute_span_days: 7,
            chronic_span_days: 28,
            spike_window_days: 28,
            spike_factor: 1.1,
            streak_window_days: 14,
            hard_day_multiplier: 1.5,
            streak_alert_days: 3,
        }
    }
}

/// Injury risk band of an ACWR value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Undertraining,
    Optimal,
    Elevated,
    High,
    InsufficientData,
}

impl RiskLevel {
    pub const UNDERTRAINING_BELOW: f64 = 0.8;
    pub const OPTIMAL_UP_TO: f64 = 1.3;
    pub const ELEVATED_UP_TO: f64 = 1.5;

    /// Step function of ACWR at 0.8 / 1.3 / 1.5
    pub fn from_acwr(acwr: f64) -> Self {
        if acwr < Self::UNDERTRAINING_BELOW {
            RiskLevel::Undertraining
        } else if acwr <= Self::OPTIMAL_UP_TO {
            RiskLevel::Optimal
        } else if acwr <= Self::ELEVATED_UP_TO {
            RiskLevel::Elevated
        } else {
            RiskLevel::High
        }
    }

    /// Risk reported when load spikes are present. Never lower than
    /// elevated for a computed ratio; a missing baseline stays missing.
    pub fn escalate_for_spikes(self) -> Self {
        match self {
            RiskLevel::Undertraining | RiskLevel::Optimal | RiskLevel::Elevated => RiskLevel::Elevated,
            RiskLevel::High => RiskLevel::High,
            RiskLevel::InsufficientData => RiskLevel::InsufficientData,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Undertraining => "undertraining",
            RiskLevel::Optimal => "optimal",
            RiskLevel::Elevated => "elevated",
            RiskLevel::High => "high",
            RiskLevel::InsufficientData => "insufficient_data",
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            RiskLevel::Undertraining => {
                "Training load is significantly below your chronic average. Risk of detraining."
            }
            RiskLevel::Optimal => {
                "Training load is in the optimal range (0.8-1.3). Good balance of stimulus and recovery."
            }
            RiskLevel::Elevated => {
                "Training load spike detected (ACWR > 1.3). Moderate injury risk, monitor recovery."
            }
            RiskLevel::High => {
                "Significant training load spike (ACWR > 1.5). High injury risk, consider reducing volume."
            }
            RiskLevel::InsufficientData => "No chronic training load to compare against.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekly (uncoupled) ACWR result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcwrResult {
    pub acwr: f64,
    /// Latest week
    pub acute_load: f64,
    /// Mean of the chronic weeks preceding the acute week
    pub chronic_load: f64,
    pub risk_level: RiskLevel,
    /// Population std dev / mean of the chronic weeks
    pub load_variability_cv: f64,
    /// `None` when the previous week is zero
    pub week_over_week_change_pct: Option<f64>,
    /// Foster monotony over the last four weeks, 0 without variation
    pub monotony: f64,
    pub strain: f64,
    pub interpretation: String,
}

/// A day whose load exceeded the prior window's maximum by the spike factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSpike {
    pub day_index: usize,
    pub load: f64,
    pub prior_max: f64,
    /// Percent above the prior max; `None` when the prior window was all rest
    pub spike_pct: Option<f64>,
}

/// Daily EWMA ACWR result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAcwrResult {
    pub acwr: f64,
    /// Acute EWMA
    pub acute_load: f64,
    /// Chronic EWMA
    pub chronic_load: f64,
    /// Risk after spike escalation
    pub risk_level: RiskLevel,
    /// Risk from the ratio alone
    pub base_risk_level: RiskLevel,
    pub spikes: Vec<LoadSpike>,
    pub longest_hard_streak_days: u32,
    pub hard_day_threshold: f64,
    pub interpretation: String,
}

/// Core ACWR calculation engine
pub struct LoadAnalyzer {
    config: LoadConfig,
}

impl LoadAnalyzer {
    /// Create new analyzer with default configuration
    pub fn new() -> Self {
        LoadAnalyzer {
            config: LoadConfig::default(),
        }
    }

    /// Create new analyzer with custom configuration
    pub fn with_config(config: LoadConfig) -> Self {
        LoadAnalyzer { config }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Weekly ACWR from weekly distances, most recent last
    pub fn calculate_acwr(&self, weekly_distances: &[f64]) -> Result<AcwrResult> {
        let chronic_weeks = self.config.chronic_weeks.max(1);
        let required = self.config.min_weekly_entries.max(chronic_weeks + 1);
        if weekly_distances.len() < required {
            return Err(PaceError::insufficient(
                "weekly ACWR",
                required,
                weekly_distances.len(),
            ));
        }
        validate_series("weekly_distances", weekly_distances)?;

        let n = weekly_distances.len();
        let acute = weekly_distances[n - 1];
        let chronic_window = &weekly_distances[n - 1 - chronic_weeks..n - 1];
        let chronic = stats::mean(chronic_window);

        let previous = weekly_distances[n - 2];
        let week_over_week_change_pct = if previous > 0.0 {
            Some((acute - previous) / previous * 100.0)
        } else {
            None
        };

        let recent = &weekly_distances[n - 4.min(n)..];
        let (monotony, strain) = monotony_and_strain(recent);

        if chronic <= 0.0 {
            tracing::debug!(acute, "No chronic load to compare against");
            let risk_level = RiskLevel::InsufficientData;
            return Ok(AcwrResult {
                acwr: 0.0,
                acute_load: acute,
                chronic_load: chronic,
                risk_level,
                load_variability_cv: 0.0,
                week_over_week_change_pct,
                monotony,
                strain,
                interpretation: risk_level.interpretation().to_string(),
            });
        }

        let acwr = acute / chronic;
        let risk_level = RiskLevel::from_acwr(acwr);
        let load_variability_cv = stats::population_std_dev(chronic_window) / chronic;

        if matches!(risk_level, RiskLevel::Elevated | RiskLevel::High) {
            tracing::warn!(acwr, acute, chronic, "Weekly load spike");
        } else {
            tracing::debug!(acwr, acute, chronic, risk = %risk_level, "Weekly ACWR calculated");
        }

        Ok(AcwrResult {
            acwr,
            acute_load: acute,
            chronic_load: chronic,
            risk_level,
            load_variability_cv,
            week_over_week_change_pct,
            monotony,
            strain,
            interpretation: risk_level.interpretation().to_string(),
        })
    }

    /// Daily ACWR from daily distances using exponentially weighted loads
    pub fn calculate_acwr_daily(&self, daily_distances: &[f64]) -> Result<DailyAcwrResult> {
        let required = self.config.min_daily_entries.max(1);
        if daily_distances.len() < required {
            return Err(PaceError::insufficient(
                "daily ACWR",
                required,
                daily_distances.len(),
            ));
        }
        validate_series("daily_distances", daily_distances)?;

        let acute_decay = 2.0 / (self.config.acute_span_days as f64 + 1.0);
        let chronic_decay = 2.0 / (self.config.chronic_span_days as f64 + 1.0);
        let acute = ewma(daily_distances, acute_decay);
        let chronic = ewma(daily_distances, chronic_decay);

        let (acwr, base_risk_level) = if chronic > 0.0 {
            let acwr = acute / chronic;
            (acwr, RiskLevel::from_acwr(acwr))
        } else {
            (0.0, RiskLevel::InsufficientData)
        };

        let spikes = self.detect_spikes(daily_distances);
        let (hard_day_threshold, longest_hard_streak_days) = self.longest_hard_streak(daily_distances);

        let risk_level = if spikes.is_empty() {
            base_risk_level
        } else {
            base_risk_level.escalate_for_spikes()
        };

        let mut interpretation = risk_level.interpretation().to_string();
        if !spikes.is_empty() {
            tracing::warn!(count = spikes.len(), "Daily load spikes detected");
            interpretation.push_str(&format!(
                " {} load spike(s) detected above {:.0}% of the prior {}-day maximum.",
                spikes.len(),
                self.config.spike_factor * 100.0,
                self.config.spike_window_days
            ));
        }
        if longest_hard_streak_days >= self.config.streak_alert_days {
            interpretation.push_str(&format!(
                " {} consecutive hard days in the last {} days; schedule recovery.",
                longest_hard_streak_days, self.config.streak_window_days
            ));
        }

        tracing::debug!(acwr, acute, chronic, risk = %risk_level, "Daily ACWR calculated");

        Ok(DailyAcwrResult {
            acwr,
            acute_load: acute,
            chronic_load: chronic,
            risk_level,
            base_risk_level,
            spikes,
            longest_hard_streak_days,
            hard_day_threshold,
            interpretation,
        })
    }

    /// Days exceeding `spike_factor ×` the max of the preceding window
    fn detect_spikes(&self, series: &[f64]) -> Vec<LoadSpike> {
        let window = self.config.spike_window_days.max(1);
        (window..series.len())
            .filter_map(|i| {
                let load = series[i];
                let prior_max = stats::max_value(&series[i - window..i]);
                if load > self.config.spike_factor * prior_max {
                    Some(LoadSpike {
                        day_index: i,
                        load,
                        prior_max,
                        spike_pct: (prior_max > 0.0).then(|| (load / prior_max - 1.0) * 100.0),
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Hard day threshold and longest run of hard days in the trailing window
    fn longest_hard_streak(&self, series: &[f64]) -> (f64, u32) {
        let active: Vec<f64> = series.iter().copied().filter(|d| *d > 0.0).collect();
        if active.is_empty() {
            return (0.0, 0);
        }
        let threshold = stats::median(&active) * self.config.hard_day_multiplier;

        let start = series.len().saturating_sub(self.config.streak_window_days);
        let mut longest = 0u32;
        let mut current = 0u32;
        for load in &series[start..] {
            if *load >= threshold {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        (threshold, longest)
    }
}

impl Default for LoadAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// EWMA seeded with the first sample
fn ewma(series: &[f64], decay: f64) -> f64 {
    series
        .iter()
        .skip(1)
        .fold(series.first().copied().unwrap_or(0.0), |acc, x| {
            decay * x + (1.0 - decay) * acc
        })
}

/// Foster monotony (mean / std dev) and strain (mean × monotony)
fn monotony_and_strain(loads: &[f64]) -> (f64, f64) {
    let mean = stats::mean(loads);
    let std = stats::population_std_dev(loads);
    if std > 0.0 {
        let monotony = mean / std;
        (monotony, mean * monotony)
    } else {
        (0.0, 0.0)
    }
}

fn validate_series(name: &str, series: &[f64]) -> Result<()> {
    match series
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        Some((idx, value)) => Err(PaceError::degenerate(
            "load series",
            format!("{}[{}] must be a non-negative distance, got {}", name, idx, value),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_acwr_excludes_acute_week() {
        let analyzer = LoadAnalyzer::new();
        let result = analyzer.calculate_acwr(&[99.0, 40.0, 40.0, 40.0, 40.0, 60.0]).unwrap();

        assert_eq!(result.chronic_load, 40.0);
        assert_eq!(result.acute_load, 60.0);
        assert!((result.acwr - 1.5).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Elevated);
        assert_eq!(result.load_variability_cv, 0.0);
        assert!((result.week_over_week_change_pct.unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_acwr_optimal() {
        let result = LoadAnalyzer::new()
            .calculate_acwr(&[30.0, 35.0, 40.0, 45.0, 40.0])
            .unwrap();
        assert!((result.chronic_load - 37.5).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Optimal);
        assert!(result.load_variability_cv > 0.0);
        assert!(result.monotony > 0.0);
        assert!((result.strain - stats::mean(&[35.0, 40.0, 45.0, 40.0]) * result.monotony).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_acwr_requires_five_weeks() {
        let err = LoadAnalyzer::new().calculate_acwr(&[30.0, 30.0, 30.0, 30.0]).unwrap_err();
        assert_eq!(
            err,
            PaceError::InsufficientData {
                calculation: "weekly ACWR".to_string(),
                required: 5,
                actual: 4,
            }
        );
    }

    #[test]
    fn test_zero_chronic_load_reports_insufficient_data() {
        let result = LoadAnalyzer::new()
            .calculate_acwr(&[0.0, 0.0, 0.0, 0.0, 20.0])
            .unwrap();
        assert_eq!(result.risk_level, RiskLevel::InsufficientData);
        assert_eq!(result.acwr, 0.0);
        assert!(result.week_over_week_change_pct.is_none());
    }

    #[test]
    fn test_negative_distance_rejected() {
        let err = LoadAnalyzer::new()
            .calculate_acwr(&[30.0, -1.0, 30.0, 30.0, 30.0])
            .unwrap_err();
        assert!(matches!(err, PaceError::DegenerateInput { .. }));
    }

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_acwr(0.79), RiskLevel::Undertraining);
        assert_eq!(RiskLevel::from_acwr(0.8), RiskLevel::Optimal);
        assert_eq!(RiskLevel::from_acwr(1.3), RiskLevel::Optimal);
        assert_eq!(RiskLevel::from_acwr(1.31), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_acwr(1.5), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_acwr(1.51), RiskLevel::High);
    }

    #[test]
    fn test_spike_escalation_never_downgrades() {
        assert_eq!(RiskLevel::Undertraining.escalate_for_spikes(), RiskLevel::Elevated);
        assert_eq!(RiskLevel::Optimal.escalate_for_spikes(), RiskLevel::Elevated);
        assert_eq!(RiskLevel::High.escalate_for_spikes(), RiskLevel::High);
        assert_eq!(
            RiskLevel::InsufficientData.escalate_for_spikes(),
            RiskLevel::InsufficientData
        );
    }

    #[test]
    fn test_daily_acwr_steady_load() {
        let series = vec![10.0; 35];
        let result = LoadAnalyzer::new().calculate_acwr_daily(&series).unwrap();
        assert!((result.acwr - 1.0).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Optimal);
        assert!(result.spikes.is_empty());
        assert_eq!(result.longest_hard_streak_days, 0);
        assert_eq!(result.hard_day_threshold, 15.0);
    }

    #[test]
    fn test_daily_acwr_single_spike() {
        let mut series = vec![10.0; 40];
        series[35] = 11.5;
        let result = LoadAnalyzer::new().calculate_acwr_daily(&series).unwrap();

        assert_eq!(result.spikes.len(), 1);
        let spike = &result.spikes[0];
        assert_eq!(spike.day_index, 35);
        assert_eq!(spike.prior_max, 10.0);
        assert!((spike.spike_pct.unwrap() - 15.0).abs() < 1e-6);
        assert_eq!(result.base_risk_level, RiskLevel::Optimal);
        assert_eq!(result.risk_level, RiskLevel::Elevated);
    }

    #[test]
    fn test_daily_acwr_spike_before_window_ignored() {
        let mut series = vec![10.0; 30];
        series[10] = 30.0;
        let result = LoadAnalyzer::new().calculate_acwr_daily(&series).unwrap();
        assert!(result.spikes.is_empty());
    }

    #[test]
    fn test_daily_acwr_hard_streak() {
        let mut series = vec![5.0; 30];
        for day in series.iter_mut().skip(25).take(4) {
            *day = 12.0;
        }
        let result = LoadAnalyzer::new().calculate_acwr_daily(&series).unwrap();
        assert_eq!(result.longest_hard_streak_days, 4);
        assert!(result.interpretation.contains("4 consecutive hard days"));
    }

    #[test]
    fn test_daily_acwr_requires_28_days() {
        let err = LoadAnalyzer::new().calculate_acwr_daily(&[5.0; 27]).unwrap_err();
        assert!(matches!(
            err,
            PaceError::InsufficientData {
                required: 28,
                actual: 27,
                ..
            }
        ));
    }

    #[test]
    fn test_daily_acwr_all_rest() {
        let result = LoadAnalyzer::new().calculate_acwr_daily(&[0.0; 28]).unwrap();
        assert_eq!(result.risk_level, RiskLevel::InsufficientData);
        assert_eq!(result.acwr, 0.0);
    }

    #[test]
    fn test_custom_config() {
        let config = LoadConfig {
            min_weekly_entries: 3,
            chronic_weeks: 2,
            ..LoadConfig::default()
        };
        let result = LoadAnalyzer::with_config(config)
            .calculate_acwr(&[20.0, 20.0, 30.0])
            .unwrap();
        assert!((result.acwr - 1.5).abs() < 1e-9);
    }
}
