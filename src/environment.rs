//! Environmental pace corrections
//!
//! Heat uses the temperature + dew point method (°F sum); altitude uses
//! ~2% slowdown per 1,000 ft above 3,000 ft.

use crate::error::{PaceError, Result};
use serde::{Deserialize, Serialize};

const FEET_PER_METER: f64 = 3.28084;

/// Temperature in either unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Celsius(f64),
    Fahrenheit(f64),
}

impl Temperature {
    pub fn to_fahrenheit(self) -> f64 {
        match self {
            Temperature::Celsius(c) => c * 9.0 / 5.0 + 32.0,
            Temperature::Fahrenheit(f) => f,
        }
    }
}

/// Altitude in either unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Altitude {
    Feet(f64),
    Meters(f64),
}

impl Altitude {
    pub fn to_feet(self) -> f64 {
        match self {
            Altitude::Feet(ft) => ft,
            Altitude::Meters(m) => m * FEET_PER_METER,
        }
    }
}

/// Heat stress level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatRisk {
    Minimal,
    Moderate,
    High,
    Extreme,
}

impl HeatRisk {
    fn from_slowdown(slowdown_pct: f64) -> Self {
        if slowdown_pct < 1.0 {
            HeatRisk::Minimal
        } else if slowdown_pct < 3.0 {
            HeatRisk::Moderate
        } else if slowdown_pct < 6.0 {
            HeatRisk::High
        } else {
            HeatRisk::Extreme
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            HeatRisk::Minimal => "Normal training. Hydrate as usual.",
            HeatRisk::Moderate => {
                "Run by effort, not pace. Easy runs will feel harder. Add 15-30 sec/km."
            }
            HeatRisk::High => {
                "Run by heart rate or RPE only. Ignore pace targets. Shorten long runs or shift to early morning."
            }
            HeatRisk::Extreme => {
                "Consider moving workout indoors or cross-training. Heat illness risk is significant."
            }
        }
    }
}

/// Heat and humidity pace correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatAdjustment {
    pub temperature_f: f64,
    pub dew_point_f: f64,
    /// True when the dew point was not supplied and was estimated as temperature − 20 °F
    pub dew_point_estimated: bool,
    /// Temperature + dew point in °F
    pub combined_value: f64,
    pub slowdown_pct: f64,
    /// Multiplier applied to times (≥ 1.0)
    pub adjustment_factor: f64,
    pub risk_level: HeatRisk,
    pub guidance: String,
}

/// Altitude pace correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltitudeAdjustment {
    pub altitude_ft: f64,
    pub altitude_m: f64,
    pub slowdown_pct: f64,
    pub adjustment_factor: f64,
    pub vo2max_reduction_pct: f64,
    pub acclimatization_days: u32,
    pub guidance: String,
}

/// Race-day conditions for adjusting predictions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceConditions {
    pub temperature: Option<Temperature>,
    pub dew_point: Option<Temperature>,
    pub altitude: Option<Altitude>,
}

/// Combined heat × altitude correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentAdjustment {
    pub adjustment_factor: f64,
    pub heat: Option<HeatAdjustment>,
    pub altitude: Option<AltitudeAdjustment>,
    /// Names of the corrections that were applied (`"heat"`, `"altitude"`)
    pub applied: Vec<String>,
}

/// Heat and altitude adjustment calculator
pub struct EnvironmentAdjuster;

impl EnvironmentAdjuster {
    /// Calculate pace adjustment for heat and humidity.
    ///
    /// Piecewise slowdown over the °F sum of temperature and dew point:
    /// - ≤100: no effect
    /// - 100-120: 0-1%
    /// - 120-140: 1-3%
    /// - 140-160: 3-6%
    /// - >160: 6% and up
    pub fn heat_adjustment(
        temperature: Temperature,
        dew_point: Option<Temperature>,
    ) -> Result<HeatAdjustment> {
        let temp_f = temperature.to_fahrenheit();
        Self::validate_temperature("temperature_f", temp_f)?;

        let (dp_f, dew_point_estimated) = match dew_point {
            Some(dp) => {
                let dp_f = dp.to_fahrenheit();
                Self::validate_temperature("dew_point_f", dp_f)?;
                (dp_f, false)
            }
            None => (temp_f - 20.0, true),
        };

        let combined = temp_f + dp_f;
        let slowdown_pct = if combined <= 100.0 {
            0.0
        } else if combined <= 120.0 {
            (combined - 100.0) * 0.05
        } else if combined <= 140.0 {
            1.0 + (combined - 120.0) * 0.1
        } else if combined <= 160.0 {
            3.0 + (combined - 140.0) * 0.15
        } else {
            6.0 + (combined - 160.0) * 0.2
        };

        let risk_level = HeatRisk::from_slowdown(slowdown_pct);

        Ok(HeatAdjustment {
            temperature_f: temp_f,
            dew_point_f: dp_f,
            dew_point_estimated,
            combined_value: combined,
            slowdown_pct,
            adjustment_factor: 1.0 + slowdown_pct / 100.0,
            risk_level,
            guidance: risk_level.guidance().to_string(),
        })
    }

    /// Calculate pace adjustment for altitude.
    ///
    /// Performance declines ~2% per 1,000 ft above 3,000 ft; VO2max drops
    /// ~3% per 1,000 ft above 5,000 ft.
    pub fn altitude_adjustment(altitude: Altitude) -> Result<AltitudeAdjustment> {
        let alt_ft = altitude.to_feet();
        if !(-1500.0..=30000.0).contains(&alt_ft) {
            return Err(PaceError::out_of_range("altitude_ft", alt_ft, -1500.0, 30000.0));
        }

        let altitude_m = alt_ft / FEET_PER_METER;

        if alt_ft <= 3000.0 {
            return Ok(AltitudeAdjustment {
                altitude_ft: alt_ft,
                altitude_m,
                slowdown_pct: 0.0,
                adjustment_factor: 1.0,
                vo2max_reduction_pct: 0.0,
                acclimatization_days: 0,
                guidance: "No altitude adjustment needed.".to_string(),
            });
        }

        let slowdown_pct = (alt_ft - 3000.0) / 1000.0 * 2.0;
        let vo2max_reduction_pct = ((alt_ft - 5000.0) / 1000.0 * 3.0).max(0.0);
        let acclimatization_days = if alt_ft <= 5000.0 {
            2
        } else {
            2 + ((alt_ft - 5000.0) / 1000.0 * 1.5).round() as u32
        };

        let guidance = if slowdown_pct < 3.0 {
            "Mild altitude. Run by effort for the first few days. Expect slight pace slowdown."
        } else if slowdown_pct < 6.0 {
            "Moderate altitude. Run by HR/RPE, not pace. Stay hydrated. Reduce intensity for 3-5 days while acclimatizing."
        } else {
            "High altitude. Significant VO2max reduction. Cut volume by 20-30% for the first week. Avoid hard sessions for 5+ days."
        };

        Ok(AltitudeAdjustment {
            altitude_ft: alt_ft,
            altitude_m,
            slowdown_pct,
            adjustment_factor: 1.0 + slowdown_pct / 100.0,
            vo2max_reduction_pct,
            acclimatization_days,
            guidance: guidance.to_string(),
        })
    }

    /// Combine whichever corrections the conditions allow into one multiplier
    pub fn combined(conditions: &RaceConditions) -> Result<EnvironmentAdjustment> {
        let heat = conditions
            .temperature
            .map(|temp| Self::heat_adjustment(temp, conditions.dew_point))
            .transpose()?;
        let altitude = conditions
            .altitude
            .map(Self::altitude_adjustment)
            .transpose()?;

        let mut applied = Vec::new();
        let mut factor = 1.0;
        if let Some(h) = &heat {
            factor *= h.adjustment_factor;
            applied.push("heat".to_string());
        }
        if let Some(a) = &altitude {
            factor *= a.adjustment_factor;
            applied.push("altitude".to_string());
        }

        Ok(EnvironmentAdjustment {
            adjustment_factor: factor,
            heat,
            altitude,
            applied,
        })
    }

    fn validate_temperature(parameter: &str, temp_f: f64) -> Result<()> {
        if !(-80.0..=140.0).contains(&temp_f) {
            return Err(PaceError::out_of_range(parameter, temp_f, -80.0, 140.0));
        }
        Ok(())
    }
}
