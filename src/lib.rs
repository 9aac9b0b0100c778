// Library interface for the pacers running-analysis engine
// The CLI and integration tests both go through these modules

pub mod anomaly;
pub mod classifier;
pub mod config;
pub mod decoupling;
pub mod distribution;
pub mod environment;
pub mod error;
pub mod load;
pub mod logging;
pub mod models;
pub mod prediction;
pub mod readiness;
pub mod run_analysis;
pub mod stats;
pub mod timefmt;
pub mod trend;
pub mod vo2max;
pub mod zones;

// Re-export commonly used types for convenience
pub use models::*;
pub use anomaly::{AnomalyDetector, AnomalyReport};
pub use classifier::{WorkoutClassification, WorkoutClassifier, WorkoutType};
pub use config::{AppConfig, LoadConfig, ZoneSettings};
pub use decoupling::{DecouplingCalculator, DecouplingResult};
pub use distribution::{TrainingDistribution, TrainingDistributionAnalyzer};
pub use environment::{Altitude, EnvironmentAdjuster, RaceConditions, Temperature};
pub use error::{ErrorSeverity, PaceError, Result};
pub use load::{AcwrResult, DailyAcwrResult, LoadAnalyzer, RiskLevel};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use prediction::{RaceDistance, RacePrediction, RacePredictor};
pub use readiness::{RaceReadinessScorer, ReadinessReport};
pub use run_analysis::{RunAnalysisResult, RunAnalyzer};
pub use timefmt::{format_pace, format_time, parse_time};
pub use trend::{FitnessTrend, FitnessTrendAssessor};
pub use zones::{HrZoneMethod, ZoneCalculator, ZoneInputs, ZoneSet, TrainingZone};
