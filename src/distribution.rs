//! Training intensity distribution
//!
//! Each run is classified easy / moderate / hard by the first strategy in
//! [`INTENSITY_STRATEGIES`] that has enough data, then moving time is
//! aggregated into a polarization assessment (target ~80% easy).

use crate::error::{PaceError, Result};
use crate::models::{ActivitySummary, AthleteZones};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Easy,
    Moderate,
    Hard,
    Unknown,
}

/// One way of judging a run's intensity; `None` when its inputs are missing
pub trait IntensityStrategy: Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, run: &ActivitySummary, zones: Option<&AthleteZones>) -> Option<Intensity>;
}

/// Average HR as a percentage of the run's max HR
pub struct HrPercentOfMax;

impl IntensityStrategy for HrPercentOfMax {
    fn name(&self) -> &'static str {
        "hr_pct_max"
    }

    fn classify(&self, run: &ActivitySummary, _zones: Option<&AthleteZones>) -> Option<Intensity> {
        let avg = run.average_heartrate.filter(|hr| *hr > 0.0)?;
        let max = run.max_heartrate.filter(|hr| *hr > 0.0)?;
        let pct = avg / max * 100.0;
        Some(if pct < 75.0 {
            Intensity::Easy
        } else if pct < 85.0 {
            Intensity::Moderate
        } else {
            Intensity::Hard
        })
    }
}

/// Average HR against the athlete's zone 2 and zone 3 upper bounds
pub struct HrZoneBoundaries;

impl IntensityStrategy for HrZoneBoundaries {
    fn name(&self) -> &'static str {
        "hr_zones"
    }

    fn classify(&self, run: &ActivitySummary, zones: Option<&AthleteZones>) -> Option<Intensity> {
        let avg = run.average_heartrate.filter(|hr| *hr > 0.0)?;
        let bounds = zones?.hr_zones();
        if bounds.len() < 4 {
            return None;
        }
        Some(if avg < bounds[1].upper() {
            Intensity::Easy
        } else if avg < bounds[2].upper() {
            Intensity::Moderate
        } else {
            Intensity::Hard
        })
    }
}

/// Platform relative-effort score per minute
pub struct SufferScorePerMinute;

impl IntensityStrategy for SufferScorePerMinute {
    fn name(&self) -> &'static str {
        "suffer_score"
    }

    fn classify(&self, run: &ActivitySummary, _zones: Option<&AthleteZones>) -> Option<Intensity> {
        let score = run.suffer_score?;
        if run.moving_time_s <= 0.0 {
            return None;
        }
        let per_minute = score / (run.moving_time_s / 60.0);
        Some(if per_minute < 1.5 {
            Intensity::Easy
        } else if per_minute < 3.0 {
            Intensity::Moderate
        } else {
            Intensity::Hard
        })
    }
}

/// Fallback chain, most reliable first
pub static INTENSITY_STRATEGIES: [&dyn IntensityStrategy; 3] =
    [&HrPercentOfMax, &HrZoneBoundaries, &SufferScorePerMinute];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarization {
    WellPolarized,
    Moderate,
    PoorlyPolarized,
}

impl Polarization {
    fn from_easy_pct(easy_pct: f64) -> Self {
        if easy_pct >= 75.0 {
            Polarization::WellPolarized
        } else if easy_pct >= 60.0 {
            Polarization::Moderate
        } else {
            Polarization::PoorlyPolarized
        }
    }

    fn assessment(&self, easy_pct: f64, hard_pct: f64) -> String {
        match self {
            Polarization::WellPolarized => format!(
                "Good polarization: {:.0}% easy / {:.0}% hard. Close to the 80/20 ideal.",
                easy_pct, hard_pct
            ),
            Polarization::Moderate => format!(
                "Moderate polarization: {:.0}% easy / {:.0}% hard. Too much moderate intensity, slow down your easy runs.",
                easy_pct, hard_pct
            ),
            Polarization::PoorlyPolarized => format!(
                "Poor polarization: {:.0}% easy / {:.0}% hard. Most runs are too hard. Significantly slow down easy days.",
                easy_pct, hard_pct
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunIntensity {
    pub activity_id: Option<u64>,
    pub name: String,
    pub date: Option<String>,
    pub distance_km: f64,
    pub moving_time_s: f64,
    pub intensity: Intensity,
    /// Strategy that decided, `None` for unknown
    pub method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityDistribution {
    pub easy_pct: f64,
    pub moderate_pct: f64,
    pub hard_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDistribution {
    pub run_count: usize,
    /// Moving time of classified runs
    pub total_time_s: f64,
    /// Moving time of runs no strategy could classify
    pub unclassified_time_s: f64,
    pub distribution: IntensityDistribution,
    pub polarization: Polarization,
    pub assessment: String,
    pub classifications: Vec<RunIntensity>,
}

pub struct TrainingDistributionAnalyzer;

impl TrainingDistributionAnalyzer {
    /// Classify an individual run through the strategy chain
    pub fn classify(run: &ActivitySummary, zones: Option<&AthleteZones>) -> (Intensity, Option<&'static str>) {
        INTENSITY_STRATEGIES
            .iter()
            .find_map(|strategy| strategy.classify(run, zones).map(|i| (i, Some(strategy.name()))))
            .unwrap_or((Intensity::Unknown, None))
    }

    pub fn analyze(activities: &[ActivitySummary], zones: Option<&AthleteZones>) -> Result<TrainingDistribution> {
        let runs: Vec<&ActivitySummary> = activities.iter().filter(|a| a.is_run()).collect();
        if runs.is_empty() {
            return Err(PaceError::insufficient("training distribution", 1, 0));
        }

        let (mut easy, mut moderate, mut hard, mut unknown) = (0.0, 0.0, 0.0, 0.0);
        let classifications: Vec<RunIntensity> = runs
            .iter()
            .map(|run| {
                let (intensity, method) = Self::classify(run, zones);
                let time = run.moving_time_s.max(0.0);
                match intensity {
                    Intensity::Easy => easy += time,
                    Intensity::Moderate => moderate += time,
                    Intensity::Hard => hard += time,
                    Intensity::Unknown => unknown += time,
                }
                RunIntensity {
                    activity_id: run.id,
                    name: run.name.clone().unwrap_or_default(),
                    date: run.start_date.clone(),
                    distance_km: run.distance_m / 1000.0,
                    moving_time_s: run.moving_time_s,
                    intensity,
                    method: method.map(str::to_string),
                }
            })
            .collect();

        let total = easy + moderate + hard;
        if total <= 0.0 {
            return Err(PaceError::degenerate(
                "training distribution",
                format!("no classifiable moving time across {} runs", runs.len()),
            ));
        }

        let distribution = IntensityDistribution {
            easy_pct: easy / total * 100.0,
            moderate_pct: moderate / total * 100.0,
            hard_pct: hard / total * 100.0,
        };
        let polarization = Polarization::from_easy_pct(distribution.easy_pct);
        let assessment = polarization.assessment(
            distribution.easy_pct,
            distribution.moderate_pct + distribution.hard_pct,
        );

        tracing::debug!(
            runs = runs.len(),
            easy_pct = distribution.easy_pct,
            ?polarization,
            "Training distribution analyzed"
        );

        Ok(TrainingDistribution {
            run_count: classifications.len(),
            total_time_s: total,
            unclassified_time_s: unknown,
            distribution,
            polarization,
            assessment,
            classifications,
        })
    }
}
