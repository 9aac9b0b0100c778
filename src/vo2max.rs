//! Daniels/Gilbert oxygen-cost equations
//!
//! VDOT is the VO2max a runner would need for a race result given the
//! oxygen cost of running at that velocity and the fraction of VO2max that
//! can be sustained for that duration.
//!
//! - Oxygen cost: `vo2 = -4.60 + 0.182258·v + 0.000104·v²` (v in m/min)
//! - Sustainable fraction: `0.8 + 0.1894393·e^(-0.012778·t) + 0.2989558·e^(-0.1932605·t)` (t in min)

/// Quadratic coefficient of the oxygen-cost curve
pub const VO2_COST_A: f64 = 0.000104;
/// Linear coefficient of the oxygen-cost curve
pub const VO2_COST_B: f64 = 0.182258;
/// Constant term of the oxygen-cost curve
pub const VO2_COST_C: f64 = -4.60;

/// Oxygen cost (ml/kg/min) of running at `velocity_m_per_min`
pub fn oxygen_cost(velocity_m_per_min: f64) -> f64 {
    VO2_COST_C + VO2_COST_B * velocity_m_per_min + VO2_COST_A * velocity_m_per_min.powi(2)
}

/// Velocity (m/min) whose oxygen cost equals `vo2`, inverting the cost curve
/// with the quadratic formula `v = (−b + √(b² − 4a(c − vo2))) / 2a`
pub fn velocity_for_oxygen_cost(vo2: f64) -> f64 {
    let discriminant = VO2_COST_B.powi(2) - 4.0 * VO2_COST_A * (VO2_COST_C - vo2);
    (-VO2_COST_B + discriminant.max(0.0).sqrt()) / (2.0 * VO2_COST_A)
}

/// Fraction of VO2max sustainable for an effort of `time_min` minutes
pub fn sustainable_fraction(time_min: f64) -> f64 {
    0.8 + 0.1894393 * (-0.012778 * time_min).exp() + 0.2989558 * (-0.1932605 * time_min).exp()
}

/// VDOT implied by covering `distance_m` in `time_s`
pub fn vdot_from_performance(distance_m: f64, time_s: f64) -> f64 {
    let time_min = time_s / 60.0;
    let velocity = distance_m / time_min;
    oxygen_cost(velocity) / sustainable_fraction(time_min)
}

/// VDOT as reported to athletes, to one decimal place
pub fn rounded_vdot(distance_m: f64, time_s: f64) -> f64 {
    (vdot_from_performance(distance_m, time_s) * 10.0).round() / 10.0
}

/// Pace in whole seconds per kilometer (truncated) when running at `pct` of VDOT
pub fn pace_at_vdot_fraction(vdot: f64, pct: f64) -> u32 {
    let velocity = velocity_for_oxygen_cost(vdot * pct);
    if velocity <= 0.0 {
        return u32::MAX;
    }
    (60_000.0 / velocity) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_inversion_round_trips() {
        for v in [150.0, 200.0, 250.0, 320.0] {
            let vo2 = oxygen_cost(v);
            assert!((velocity_for_oxygen_cost(vo2) - v).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sustainable_fraction_decreases_with_duration() {
        let short = sustainable_fraction(5.0);
        let long = sustainable_fraction(180.0);
        assert!(short > long);
        assert!(long > 0.8);
    }

    #[test]
    fn test_vdot_for_20_minute_5k() {
        let vdot = vdot_from_performance(5000.0, 1200.0);
        assert!((vdot - 49.8).abs() < 0.5);
    }

    #[test]
    fn test_threshold_pace_for_vdot_50() {
        assert_eq!(pace_at_vdot_fraction(50.0, 0.88), 255);
        assert_eq!(pace_at_vdot_fraction(50.0, 0.83), 267);
    }
}
