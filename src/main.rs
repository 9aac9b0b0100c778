use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use pacers::anomaly::AnomalyDetector;
use pacers::classifier::WorkoutClassifier;
use pacers::config::AppConfig;
use pacers::decoupling::DecouplingCalculator;
use pacers::distribution::TrainingDistributionAnalyzer;
use pacers::environment::{Altitude, EnvironmentAdjuster, RaceConditions, Temperature};
use pacers::load::{LoadAnalyzer, RiskLevel};
use pacers::logging::init_logging;
use pacers::models::{Activity, ActivitySummary, AthleteZones, BestEffort, RaceGoal, Streams, WeeklySummary};
use pacers::prediction::RacePredictor;
use pacers::readiness::RaceReadinessScorer;
use pacers::run_analysis::RunAnalyzer;
use pacers::timefmt::{format_pace, format_time};
use pacers::trend::FitnessTrendAssessor;
use pacers::zones::{HrZoneMethod, ZoneCalculator, ZoneInputs, ZoneSet};

/// pacers - Running Training Analysis CLI
///
/// Computes training load ratios, race predictions, training zones and
/// per-run diagnostics from JSON snapshots of activity data.
#[derive(Parser)]
#[command(name = "pacers")]
#[command(version)]
#[command(about = "Running training analysis CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print results as pretty JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weekly acute:chronic workload ratio
    Acwr {
        /// Weekly distances in km, oldest first
        #[arg(value_delimiter = ',')]
        distances: Vec<f64>,

        /// JSON array of weekly distances
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Daily EWMA workload ratio with spike detection
    AcwrDaily {
        /// Daily distances in km, oldest first
        #[arg(value_delimiter = ',')]
        distances: Vec<f64>,

        /// JSON array of daily distances
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Predict a race time from a recent result
    Predict {
        /// Recent race distance (e.g. 5k, "half marathon")
        from: String,

        /// Recent race time (M:SS or H:MM:SS)
        time: String,

        /// Target race distance
        target: String,

        /// Race-day temperature
        #[arg(long)]
        temperature: Option<f64>,

        /// Race-day dew point
        #[arg(long)]
        dew_point: Option<f64>,

        /// Temperatures are in °F rather than °C
        #[arg(long)]
        fahrenheit: bool,

        /// Race altitude
        #[arg(long)]
        altitude: Option<f64>,

        /// Altitude is in meters rather than feet
        #[arg(long)]
        meters: bool,
    },

    /// Training pace and heart rate zones
    Zones {
        /// Threshold pace per km (M:SS)
        #[arg(long)]
        threshold_pace: Option<String>,

        #[arg(long)]
        threshold_hr: Option<u32>,

        #[arg(long)]
        vdot: Option<f64>,

        #[arg(long)]
        max_hr: Option<u32>,

        #[arg(long)]
        resting_hr: Option<u32>,

        /// HR method when both threshold HR and max/resting HR are given
        #[arg(long, value_enum)]
        hr_method: Option<HrMethodArg>,
    },

    /// Heart rate reserve (Karvonen) zones
    Karvonen {
        max_hr: u32,
        resting_hr: u32,
    },

    /// Pace adjustment for heat and humidity
    Heat {
        temperature: f64,

        #[arg(long)]
        dew_point: Option<f64>,

        /// Temperatures are in °F rather than °C
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Pace adjustment for altitude
    Altitude {
        altitude: f64,

        /// Altitude is in meters rather than feet
        #[arg(long)]
        meters: bool,
    },

    /// Full analysis of one run
    AnalyzeRun {
        /// Activity JSON
        activity: PathBuf,

        /// Streams JSON
        #[arg(short, long)]
        streams: Option<PathBuf>,

        /// Athlete zones JSON
        #[arg(short, long)]
        zones: Option<PathBuf>,
    },

    /// Detect the workout type of one run
    Classify {
        activity: PathBuf,
    },

    /// Data quality check of one run
    Anomalies {
        activity: PathBuf,

        #[arg(short, long)]
        streams: Option<PathBuf>,
    },

    /// Cardiac decoupling from HR and velocity streams
    Decoupling {
        /// Streams JSON with heartrate and velocity arrays
        streams: PathBuf,
    },

    /// Easy/moderate/hard distribution across runs
    Distribution {
        /// JSON array of activity summaries
        activities: PathBuf,

        #[arg(short, long)]
        zones: Option<PathBuf>,
    },

    /// VDOT, volume and consistency trend
    Trend {
        /// JSON array of best efforts
        #[arg(short, long)]
        best_efforts: Option<PathBuf>,

        /// JSON array of weekly summaries
        #[arg(short, long)]
        weekly: Option<PathBuf>,
    },

    /// Readiness for one or more race goals
    Readiness {
        /// Goal as "<race>=<time>", e.g. "half marathon=1:45:00"
        #[arg(short, long = "goal", required = true)]
        goals: Vec<String>,

        #[arg(short, long)]
        best_efforts: Option<PathBuf>,

        #[arg(short, long)]
        weekly: Option<PathBuf>,

        /// Current ACWR; computed from the weekly summaries when omitted
        #[arg(long)]
        acwr: Option<f64>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Write the active settings to the default config path
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HrMethodArg {
    ThresholdHr,
    Karvonen,
}

impl From<HrMethodArg> for HrZoneMethod {
    fn from(arg: HrMethodArg) -> Self {
        match arg {
            HrMethodArg::ThresholdHr => HrZoneMethod::ThresholdHr,
            HrMethodArg::Karvonen => HrZoneMethod::Karvonen,
        }
    }
}

#[derive(Tabled)]
struct MetricRow {
    metric: String,
    value: String,
}

fn metric(name: &str, value: impl ToString) -> MetricRow {
    MetricRow {
        metric: name.to_string(),
        value: value.to_string(),
    }
}

#[derive(Tabled)]
struct ZoneRow {
    zone: String,
    pace: String,
    heart_rate: String,
    description: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load_or_default(),
    };
    let mut log_config = config.logging.clone();
    log_config.level = log_config.level.raised_by(cli.verbose);
    init_logging(&log_config)?;

    let analyzer = LoadAnalyzer::with_config(config.load.clone());

    match cli.command {
        Commands::Acwr { distances, input } => {
            let series = distance_series(distances, input)?;
            let result = analyzer.calculate_acwr(&series)?;
            if cli.json {
                return print_json(&result);
            }
            println!("{}", "Weekly Acute:Chronic Workload Ratio".cyan().bold());
            let rows = vec![
                metric("ACWR", format!("{:.2}", result.acwr)),
                metric("Acute load (km)", format!("{:.1}", result.acute_load)),
                metric("Chronic load (km)", format!("{:.1}", result.chronic_load)),
                metric("Load variability CV", format!("{:.2}", result.load_variability_cv)),
                metric(
                    "Week over week",
                    result
                        .week_over_week_change_pct
                        .map(|pct| format!("{:+.1}%", pct))
                        .unwrap_or_else(|| "n/a".to_string()),
                ),
                metric("Monotony", format!("{:.2}", result.monotony)),
                metric("Strain", format!("{:.1}", result.strain)),
            ];
            print_table(rows);
            println!("Risk: {}", colored_risk(result.risk_level));
            println!("{}", result.interpretation);
        }

        Commands::AcwrDaily { distances, input } => {
            let series = distance_series(distances, input)?;
            let result = analyzer.calculate_acwr_daily(&series)?;
            if cli.json {
                return print_json(&result);
            }
            println!("{}", "Daily EWMA Workload Ratio".cyan().bold());
            let mut rows = vec![
                metric("ACWR", format!("{:.2}", result.acwr)),
                metric("Acute EWMA (km)", format!("{:.2}", result.acute_load)),
                metric("Chronic EWMA (km)", format!("{:.2}", result.chronic_load)),
                metric("Hard day threshold (km)", format!("{:.1}", result.hard_day_threshold)),
                metric("Longest hard streak", format!("{} days", result.longest_hard_streak_days)),
            ];
            for spike in &result.spikes {
                let pct = spike
                    .spike_pct
                    .map(|pct| format!("+{:.1}%", pct))
                    .unwrap_or_else(|| "n/a".to_string());
                rows.push(metric(
                    &format!("Spike day {}", spike.day_index),
                    format!("{:.1} km vs {:.1} km ({})", spike.load, spike.prior_max, pct),
                ));
            }
            print_table(rows);
            println!("Risk: {}", colored_risk(result.risk_level));
            println!("{}", result.interpretation);
        }

        Commands::Predict {
            from,
            time,
            target,
            temperature,
            dew_point,
            fahrenheit,
            altitude,
            meters,
        } => {
            let conditions = RaceConditions {
                temperature: temperature.map(|t| temperature_unit(t, fahrenheit)),
                dew_point: dew_point.map(|d| temperature_unit(d, fahrenheit)),
                altitude: altitude.map(|a| altitude_unit(a, meters)),
            };
            let prediction = if conditions == RaceConditions::default() {
                RacePredictor::predict_race_time(&from, &time, &target)?
            } else {
                RacePredictor::predict_race_time_with_conditions(&from, &time, &target, &conditions)?
            };
            if cli.json {
                return print_json(&prediction);
            }
            println!(
                "{}",
                format!(
                    "{} {} -> {}",
                    prediction.source_distance, prediction.source_time, prediction.target_distance
                )
                .cyan()
                .bold()
            );
            let mut rows = vec![
                metric("VDOT", format!("{:.1}", prediction.vdot)),
                metric("VDOT prediction", &prediction.predicted_time),
                metric("Riegel", &prediction.riegel_time),
                metric("Cameron", &prediction.cameron_time),
            ];
            if let Some(adjusted) = &prediction.environment_adjusted {
                rows.push(metric(
                    "Condition factor",
                    format!("{:.3} ({})", adjusted.adjustment.adjustment_factor, adjusted.adjustment.applied.join(", ")),
                ));
            }
            print_table(rows);

            println!("{}", "Equivalent performances".bold());
            let equivalents: Vec<MetricRow> = prediction
                .equivalent_performances
                .iter()
                .map(|(distance, time)| metric(distance, time))
                .collect();
            print_table(equivalents);
            for caveat in &prediction.caveats {
                println!("{} {}", "!".yellow().bold(), caveat);
            }
        }

        Commands::Zones {
            threshold_pace,
            threshold_hr,
            vdot,
            max_hr,
            resting_hr,
            hr_method,
        } => {
            let inputs = ZoneInputs {
                threshold_pace_per_km: threshold_pace,
                threshold_hr,
                vdot,
                max_hr,
                resting_hr,
            };
            let method = hr_method.map(HrZoneMethod::from).unwrap_or(config.zones.hr_method);
            let zones = ZoneCalculator::calculate_training_zones(&inputs, method)?;
            print_zone_set(&zones, cli.json)?;
        }

        Commands::Karvonen { max_hr, resting_hr } => {
            let zones = ZoneCalculator::calculate_hr_zones_karvonen(max_hr, resting_hr)?;
            print_zone_set(&zones, cli.json)?;
        }

        Commands::Heat {
            temperature,
            dew_point,
            fahrenheit,
        } => {
            let adjustment = EnvironmentAdjuster::heat_adjustment(
                temperature_unit(temperature, fahrenheit),
                dew_point.map(|d| temperature_unit(d, fahrenheit)),
            )?;
            if cli.json {
                return print_json(&adjustment);
            }
            let mut rows = vec![
                metric("Temperature", format!("{:.0}°F", adjustment.temperature_f)),
                metric("Dew point", format!("{:.0}°F", adjustment.dew_point_f)),
                metric("Combined", format!("{:.0}", adjustment.combined_value)),
                metric("Slowdown", format!("{:.1}%", adjustment.slowdown_pct)),
                metric("Risk", label(&adjustment.risk_level)),
            ];
            if adjustment.dew_point_estimated {
                rows.push(metric("Note", "dew point estimated"));
            }
            print_table(rows);
            println!("{}", adjustment.guidance);
        }

        Commands::Altitude { altitude, meters } => {
            let adjustment = EnvironmentAdjuster::altitude_adjustment(altitude_unit(altitude, meters))?;
            if cli.json {
                return print_json(&adjustment);
            }
            print_table(vec![
                metric("Altitude", format!("{:.0} ft / {:.0} m", adjustment.altitude_ft, adjustment.altitude_m)),
                metric("Slowdown", format!("{:.1}%", adjustment.slowdown_pct)),
                metric("VO2max reduction", format!("{:.1}%", adjustment.vo2max_reduction_pct)),
                metric("Acclimatization", format!("{} days", adjustment.acclimatization_days)),
            ]);
            println!("{}", adjustment.guidance);
        }

        Commands::AnalyzeRun {
            activity,
            streams,
            zones,
        } => {
            let activity: Activity = read_json(&activity)?;
            let streams: Option<Streams> = streams.as_deref().map(read_json).transpose()?;
            let zones: Option<AthleteZones> = zones.as_deref().map(read_json).transpose()?;
            let result = RunAnalyzer::analyze_run(&activity, streams.as_ref(), zones.as_ref());
            if cli.json {
                return print_json(&result);
            }
            println!("{}", format!("Run analysis: {}", result.name).cyan().bold());
            let mut rows = vec![metric("Workout type", result.workout_type.detected_type)];
            if let Some(pacing) = &result.pacing {
                rows.push(metric(
                    "Pacing",
                    format!("{} (CV {:.1}%)", label(&pacing.pacing_grade), pacing.pace_cv_pct),
                ));
                rows.push(metric("Split", format!("{} ({:.3})", label(&pacing.split_type), pacing.split_ratio)));
            }
            if let Some(hr) = &result.hr_analysis {
                rows.push(metric("Average HR", format!("{:.0} bpm", hr.average_hr)));
                rows.push(metric(
                    "Cardiac drift",
                    format!("{:+.1}% ({})", hr.cardiac_drift_pct, label(&hr.drift_assessment)),
                ));
            }
            if let Some(cadence) = &result.cadence {
                rows.push(metric(
                    "Cadence",
                    format!("{:.0} spm ({})", cadence.average_spm, label(&cadence.assessment)),
                ));
            }
            if let Some(decoupling) = &result.decoupling {
                rows.push(metric("Decoupling", format!("{:.1}%", decoupling.decoupling_pct)));
            }
            for zone in result.zone_distribution.iter().flatten() {
                rows.push(metric(
                    &format!("Zone {} ({})", zone.zone_index, zone.zone_range),
                    format!("{:.0}%", zone.time_pct),
                ));
            }
            print_table(rows);
            for flag in &result.flags {
                println!("{} {}", "!".yellow().bold(), flag);
            }
            for warning in &result.hr_reliability_warnings {
                println!("{} {}", "HR:".yellow().bold(), warning.detail);
            }
        }

        Commands::Classify { activity } => {
            let activity: Activity = read_json(&activity)?;
            let classification = WorkoutClassifier::detect_workout_type(&activity);
            if cli.json {
                return print_json(&classification);
            }
            let mut rows = vec![
                metric("Type", classification.detected_type),
                metric("Confidence", label(&classification.confidence)),
                metric("Rule", &classification.source),
            ];
            rows.extend(
                classification
                    .evidence
                    .iter()
                    .map(|(key, value)| metric(key, format!("{:.3}", value))),
            );
            print_table(rows);
        }

        Commands::Anomalies { activity, streams } => {
            let activity: Activity = read_json(&activity)?;
            let streams: Option<Streams> = streams.as_deref().map(read_json).transpose()?;
            let report = AnomalyDetector::detect_anomalies(&activity, streams.as_ref());
            if cli.json {
                return print_json(&report);
            }
            let usable = if report.usable_for_coaching {
                "usable".green()
            } else {
                "not usable".red()
            };
            println!(
                "Data quality {:.1}/10 ({})",
                report.data_quality_score, usable
            );
            let rows: Vec<MetricRow> = report
                .anomalies
                .iter()
                .map(|a| metric(&format!("{} / {}", label(&a.kind), label(&a.severity)), &a.detail))
                .collect();
            print_table(rows);
            if !report.missing_data.is_empty() {
                println!("Missing: {}", report.missing_data.join(", "));
            }
        }

        Commands::Decoupling { streams } => {
            let streams: Streams = read_json(&streams)?;
            let result = DecouplingCalculator::calculate(&streams.heartrate, &streams.velocity)?;
            if cli.json {
                return print_json(&result);
            }
            print_table(vec![
                metric("Decoupling", format!("{:.1}%", result.decoupling_pct)),
                metric("First half EF", format!("{:.5}", result.first_half.efficiency_ratio)),
                metric("Second half EF", format!("{:.5}", result.second_half.efficiency_ratio)),
                metric("Assessment", label(&result.assessment)),
            ]);
            println!("{}", result.interpretation);
        }

        Commands::Distribution { activities, zones } => {
            let activities: Vec<ActivitySummary> = read_json(&activities)?;
            let zones: Option<AthleteZones> = zones.as_deref().map(read_json).transpose()?;
            let result = TrainingDistributionAnalyzer::analyze(&activities, zones.as_ref())?;
            if cli.json {
                return print_json(&result);
            }
            print_table(vec![
                metric("Runs", result.run_count),
                metric("Easy", format!("{:.0}%", result.distribution.easy_pct)),
                metric("Moderate", format!("{:.0}%", result.distribution.moderate_pct)),
                metric("Hard", format!("{:.0}%", result.distribution.hard_pct)),
                metric("Unclassified time", format_time(result.unclassified_time_s.round() as u32)),
            ]);
            println!("{}", result.assessment);
        }

        Commands::Trend {
            best_efforts,
            weekly,
        } => {
            let efforts: Vec<BestEffort> = read_optional_json(best_efforts.as_deref())?;
            let weeks: Vec<WeeklySummary> = read_optional_json(weekly.as_deref())?;
            let trend = FitnessTrendAssessor::assess(&efforts, &weeks);
            if cli.json {
                return print_json(&trend);
            }
            let mut rows: Vec<MetricRow> = trend
                .vdot_estimates
                .iter()
                .map(|e| metric(&format!("VDOT {}", e.distance), format!("{:.1} ({})", e.vdot, e.time)))
                .collect();
            if let Some(volume) = &trend.volume_trend {
                rows.push(metric("Volume trend", format!("{:+.1}%", volume.trend_pct)));
            }
            if let Some(consistency) = &trend.consistency {
                rows.push(metric(
                    "Consistency",
                    format!("{}/{} weeks", consistency.active_weeks, consistency.total_weeks),
                ));
            }
            print_table(rows);
            println!("{}", trend.narrative);
        }

        Commands::Readiness {
            goals,
            best_efforts,
            weekly,
            acwr,
        } => {
            let goals = goals.iter().map(|g| parse_goal(g)).collect::<Result<Vec<_>>>()?;
            let efforts: Vec<BestEffort> = read_optional_json(best_efforts.as_deref())?;
            let weeks: Vec<WeeklySummary> = read_optional_json(weekly.as_deref())?;
            let acwr = match acwr {
                Some(value) => Some(value),
                None => {
                    let distances: Vec<f64> = weeks.iter().map(|w| w.total_distance_km).collect();
                    analyzer
                        .calculate_acwr(&distances)
                        .ok()
                        .filter(|result| result.risk_level != RiskLevel::InsufficientData)
                        .map(|result| result.acwr)
                }
            };
            let report = RaceReadinessScorer::assess(&goals, &efforts, &weeks, acwr)?;
            if cli.json {
                return print_json(&report);
            }
            for assessment in &report.assessments {
                println!(
                    "{}",
                    format!(
                        "{} in {}: {:.0}/100",
                        assessment.goal, assessment.target_time, assessment.overall_score
                    )
                    .cyan()
                    .bold()
                );
                let rows: Vec<MetricRow> = assessment
                    .component_scores
                    .iter()
                    .map(|(component, score)| metric(&label(component), score))
                    .collect();
                print_table(rows);
                for strength in &assessment.strengths {
                    println!("{} {}", "+".green().bold(), strength);
                }
                for risk in &assessment.risks {
                    println!("{} {}", "-".red().bold(), risk);
                }
            }
        }

        Commands::Config { init } => {
            if init {
                config.save_default()?;
                println!(
                    "{}",
                    format!("Configuration written to {}", AppConfig::default_config_path().display()).green()
                );
            } else if cli.json {
                return print_json(&config);
            } else {
                println!("{}", format!("# {}", AppConfig::default_config_path().display()).dimmed());
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

fn read_optional_json<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    path.map(read_json).transpose().map(Option::unwrap_or_default)
}

/// Inline values win over an input file
fn distance_series(inline: Vec<f64>, input: Option<PathBuf>) -> Result<Vec<f64>> {
    match (inline.is_empty(), input) {
        (false, _) => Ok(inline),
        (true, Some(path)) => read_json(&path),
        (true, None) => Err(anyhow!("Provide distances inline or with --input <FILE>")),
    }
}

fn parse_goal(goal: &str) -> Result<RaceGoal> {
    let (race, time) = goal
        .split_once('=')
        .ok_or_else(|| anyhow!("Goal '{}' must look like \"<race>=<time>\"", goal))?;
    Ok(RaceGoal::new(race.trim(), time.trim())?)
}

fn temperature_unit(value: f64, fahrenheit: bool) -> Temperature {
    if fahrenheit {
        Temperature::Fahrenheit(value)
    } else {
        Temperature::Celsius(value)
    }
}

fn altitude_unit(value: f64, meters: bool) -> Altitude {
    if meters {
        Altitude::Meters(value)
    } else {
        Altitude::Feet(value)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        return;
    }
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_zone_set(zones: &ZoneSet, json: bool) -> Result<()> {
    if json {
        return print_json(zones);
    }
    let rows: Vec<ZoneRow> = zones
        .zones
        .iter()
        .map(|(zone, range)| ZoneRow {
            zone: zone.name().to_string(),
            pace: range
                .pace_seconds_per_km
                .map(|(fast, slow)| format!("{} - {}", format_pace(fast), format_pace(slow)))
                .unwrap_or_default(),
            heart_rate: range
                .hr_range_bpm
                .map(|(low, high)| format!("{}-{} bpm", low, high))
                .unwrap_or_default(),
            description: range.description.clone(),
        })
        .collect();
    print_table(rows);
    if let Some(hrr) = zones.heart_rate_reserve {
        println!("Heart rate reserve: {} bpm", hrr);
    }
    Ok(())
}

/// snake_case wire name of a serialized enum
fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn colored_risk(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::Optimal => risk.as_str().green(),
        RiskLevel::Undertraining => risk.as_str().blue(),
        RiskLevel::Elevated => risk.as_str().yellow(),
        RiskLevel::High => risk.as_str().red().bold(),
        RiskLevel::InsufficientData => risk.as_str().dimmed(),
    }
}
