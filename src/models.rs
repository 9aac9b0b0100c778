//! Input records supplied by the tool-serving layer
//!
//! These mirror the shapes the fitness platform APIs hand back, with every
//! advisory field made explicitly optional. Field aliases accept the raw
//! Strava key names so callers can deserialize payloads directly.

use serde::{Deserialize, Serialize};

/// Per-kilometer split of an activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Split {
    /// Split distance in meters
    #[serde(alias = "distance")]
    pub distance_m: f64,

    /// Moving time in seconds
    #[serde(alias = "moving_time")]
    pub moving_time_s: Option<f64>,

    /// Elapsed time in seconds, used when moving time is absent
    #[serde(alias = "elapsed_time")]
    pub elapsed_time_s: Option<f64>,

    /// Average heart rate over the split
    pub average_heartrate: Option<f64>,
}

impl Split {
    /// Split duration, preferring moving time over elapsed time
    pub fn duration_s(&self) -> f64 {
        self.moving_time_s.or(self.elapsed_time_s).unwrap_or(0.0)
    }

    /// Splits shorter than 500 m (trailing partial kilometers) are ignored by pacing analysis
    pub fn is_valid(&self) -> bool {
        self.distance_m > 500.0
    }
}

/// Device or manual lap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lap {
    /// Lap distance in meters
    #[serde(alias = "distance")]
    pub distance_m: f64,

    /// Average speed in m/s
    pub average_speed: f64,

    /// Moving time in seconds
    #[serde(alias = "moving_time")]
    pub moving_time_s: f64,
}

/// Time-series streams of an activity, all sampled on the same clock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Streams {
    /// Heart rate in bpm
    pub heartrate: Vec<f64>,

    /// Smoothed velocity in m/s
    #[serde(alias = "velocity_smooth")]
    pub velocity: Vec<f64>,

    /// Cadence, either steps per minute or Strava half-cycles
    pub cadence: Vec<f64>,

    /// Seconds since activity start
    pub time: Vec<f64>,
}

impl Streams {
    pub fn has_heartrate(&self) -> bool {
        !self.heartrate.is_empty()
    }
}

/// Full activity detail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub id: Option<u64>,
    pub name: Option<String>,

    /// Total distance in meters
    #[serde(alias = "distance")]
    pub distance_m: f64,

    /// Moving time in seconds
    #[serde(alias = "moving_time")]
    pub moving_time_s: f64,

    /// Elapsed time in seconds
    #[serde(alias = "elapsed_time")]
    pub elapsed_time_s: Option<f64>,

    #[serde(alias = "splits_metric")]
    pub splits: Vec<Split>,

    pub laps: Vec<Lap>,

    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,

    /// Average cadence as reported by the platform (may be half-cycles)
    pub average_cadence: Option<f64>,

    /// Average temperature in °C
    #[serde(alias = "average_temp")]
    pub average_temp_c: Option<f64>,

    /// Platform workout tag: 0/None default, 1 race, 2 long run, 3 workout
    pub workout_type: Option<u32>,
}

impl Activity {
    /// Average moving speed in m/s, `0.0` without moving time
    pub fn average_speed(&self) -> f64 {
        if self.moving_time_s > 0.0 {
            self.distance_m / self.moving_time_s
        } else {
            0.0
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Durations of splits longer than 500 m
    pub fn valid_split_times(&self) -> Vec<f64> {
        self.splits
            .iter()
            .filter(|s| s.is_valid())
            .map(Split::duration_s)
            .collect()
    }

    pub fn is_race_tagged(&self) -> bool {
        self.workout_type == Some(1)
    }

    /// No workout tag, or the default tag
    pub fn is_untagged(&self) -> bool {
        matches!(self.workout_type, None | Some(0))
    }
}

/// One heart rate zone bound; a negative `max` means open-ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HrZoneBound {
    #[serde(default)]
    pub min: f64,
    #[serde(default = "HrZoneBound::open_max")]
    pub max: f64,
}

impl HrZoneBound {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn open_max() -> f64 {
        -1.0
    }

    pub fn is_open_ended(&self) -> bool {
        self.max < 0.0
    }

    /// Upper bound used for matching; open-ended zones stop at 999 bpm
    pub fn upper(&self) -> f64 {
        if self.is_open_ended() {
            999.0
        } else {
            self.max
        }
    }

    /// Half-open membership test `min <= hr < max`
    pub fn contains(&self, hr: f64) -> bool {
        self.min <= hr && hr < self.upper()
    }

    /// Display label such as `"120-150"` or `"170-∞"`
    pub fn label(&self) -> String {
        if self.is_open_ended() {
            format!("{}-∞", self.min)
        } else {
            format!("{}-{}", self.min, self.max)
        }
    }
}

/// Heart rate zone definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZoneSet {
    #[serde(default)]
    pub zones: Vec<HrZoneBound>,
}

/// Athlete zone definitions as supplied by the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteZones {
    #[serde(default)]
    pub heart_rate: Option<HeartRateZoneSet>,
}

impl AthleteZones {
    /// Build zones from `(min, max)` pairs, `max < 0` for open-ended
    pub fn from_bounds(bounds: &[(f64, f64)]) -> Self {
        Self {
            heart_rate: Some(HeartRateZoneSet {
                zones: bounds
                    .iter()
                    .map(|&(min, max)| HrZoneBound::new(min, max))
                    .collect(),
            }),
        }
    }

    /// Heart rate zone bounds, empty when none are defined
    pub fn hr_zones(&self) -> &[HrZoneBound] {
        self.heart_rate
            .as_ref()
            .map(|set| set.zones.as_slice())
            .unwrap_or(&[])
    }
}

/// Activity summary as returned by an activity list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivitySummary {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub start_date: Option<String>,

    /// Legacy activity type, e.g. `"Run"`
    #[serde(rename = "type")]
    pub activity_type: Option<String>,

    /// Sport type, e.g. `"TrailRun"`
    pub sport_type: Option<String>,

    #[serde(alias = "distance")]
    pub distance_m: f64,

    #[serde(alias = "moving_time")]
    pub moving_time_s: f64,

    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,

    /// Platform relative-effort score
    pub suffer_score: Option<f64>,
}

impl ActivitySummary {
    const RUN_SPORT_TYPES: [&'static str; 3] = ["Run", "TrailRun", "VirtualRun"];

    pub fn is_run(&self) -> bool {
        self.activity_type.as_deref() == Some("Run")
            || self
                .sport_type
                .as_deref()
                .map(|sport| Self::RUN_SPORT_TYPES.contains(&sport))
                .unwrap_or(false)
    }
}

/// Fastest recorded effort over a standard distance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestEffort {
    /// Display name such as `"5k"`
    #[serde(alias = "name")]
    pub distance_name: String,

    pub distance_m: f64,

    #[serde(alias = "elapsed_time")]
    pub elapsed_time_s: f64,
}

impl BestEffort {
    pub fn new(distance_name: &str, distance_m: f64, elapsed_time_s: f64) -> Self {
        Self {
            distance_name: distance_name.to_string(),
            distance_m,
            elapsed_time_s,
        }
    }

    /// Efforts of at least 1 km with a positive time are used for VDOT
    pub fn is_vdot_eligible(&self) -> bool {
        self.distance_m >= 1000.0 && self.elapsed_time_s > 0.0
    }
}

/// One calendar week of training aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklySummary {
    pub week_start: Option<String>,
    pub total_distance_km: f64,
    pub total_time_s: f64,
    pub longest_run_km: f64,
    pub run_count: u32,
}

impl WeeklySummary {
    pub fn new(total_distance_km: f64, total_time_s: f64, longest_run_km: f64) -> Self {
        Self {
            total_distance_km,
            total_time_s,
            longest_run_km,
            ..Self::default()
        }
    }
}

/// Target race and finish time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceGoal {
    /// Race distance name, e.g. `"half marathon"`
    pub race_type: String,

    /// Target finish time in seconds
    pub target_time_seconds: u32,

    #[serde(default)]
    pub race_date: Option<String>,
}

impl RaceGoal {
    /// Build a goal from a target time string such as `"1:45:00"`
    pub fn new(race_type: &str, target_time: &str) -> crate::error::Result<Self> {
        Ok(Self {
            race_type: race_type.to_string(),
            target_time_seconds: crate::timefmt::parse_time(target_time)?,
            race_date: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_deserializes_platform_keys() {
        let json = r#"{
            "id": 42,
            "distance": 10000.0,
            "moving_time": 3000,
            "splits_metric": [{"distance": 1000.0, "moving_time": 300}],
            "average_temp": 27.0,
            "workout_type": 1
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();

        assert_eq!(activity.distance_m, 10000.0);
        assert_eq!(activity.splits.len(), 1);
        assert_eq!(activity.splits[0].duration_s(), 300.0);
        assert_eq!(activity.average_temp_c, Some(27.0));
        assert!(activity.is_race_tagged());
        assert!((activity.average_speed() - 3.333).abs() < 0.01);
    }

    #[test]
    fn test_split_duration_falls_back_to_elapsed() {
        let split = Split {
            distance_m: 1000.0,
            moving_time_s: None,
            elapsed_time_s: Some(310.0),
            average_heartrate: None,
        };
        assert_eq!(split.duration_s(), 310.0);
    }

    #[test]
    fn test_zone_bound_open_ended() {
        let zones: AthleteZones =
            serde_json::from_str(r#"{"heart_rate": {"zones": [{"min": 0, "max": 120}, {"min": 170, "max": -1}]}}"#)
                .unwrap();
        let bounds = zones.hr_zones();
        assert_eq!(bounds.len(), 2);
        assert!(bounds[1].is_open_ended());
        assert!(bounds[1].contains(210.0));
        assert!(!bounds[0].contains(120.0));
        assert_eq!(bounds[1].label(), "170-∞");
    }

    #[test]
    fn test_summary_run_detection() {
        let mut summary = ActivitySummary {
            sport_type: Some("TrailRun".to_string()),
            ..ActivitySummary::default()
        };
        assert!(summary.is_run());

        summary.sport_type = Some("Ride".to_string());
        assert!(!summary.is_run());

        summary.activity_type = Some("Run".to_string());
        assert!(summary.is_run());
    }

    #[test]
    fn test_race_goal_parses_time() {
        let goal = RaceGoal::new("half marathon", "1:45:00").unwrap();
        assert_eq!(goal.target_time_seconds, 6300);
        assert!(RaceGoal::new("5k", "soon").is_err());
    }
}
