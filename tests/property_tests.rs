use pacers::load::{LoadAnalyzer, RiskLevel};
use pacers::prediction::RacePredictor;
use pacers::stats;
use pacers::timefmt::{format_time, parse_time};
use pacers::zones::ZoneCalculator;
use proptest::prelude::*;

fn severity_rank(risk: RiskLevel) -> u8 {
    match risk {
        RiskLevel::Undertraining => 0,
        RiskLevel::Optimal => 1,
        RiskLevel::Elevated => 2,
        RiskLevel::High => 3,
        RiskLevel::InsufficientData => u8::MAX,
    }
}

proptest! {
    #[test]
    fn test_risk_level_is_monotone(a in 0.0f64..3.0, b in 0.0f64..3.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            severity_rank(RiskLevel::from_acwr(low)) <= severity_rank(RiskLevel::from_acwr(high))
        );
    }

    #[test]
    fn test_chronic_load_ignores_acute_and_older_weeks(
        weeks in prop::collection::vec(1.0f64..200.0, 5..20),
        older in prop::collection::vec(0.0f64..500.0, 0..5),
    ) {
        let analyzer = LoadAnalyzer::new();
        let n = weeks.len();
        let expected_chronic = stats::mean(&weeks[n - 5..n - 1]);

        let result = analyzer.calculate_acwr(&weeks).unwrap();
        prop_assert!((result.chronic_load - expected_chronic).abs() < 1e-9);
        prop_assert_eq!(result.acute_load, weeks[n - 1]);

        let mut extended = older.clone();
        extended.extend_from_slice(&weeks);
        let extended_result = analyzer.calculate_acwr(&extended).unwrap();
        prop_assert!((extended_result.acwr - result.acwr).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_pace_zones_ordered(threshold in 150u32..800) {
        let zones = ZoneCalculator::pace_zones(threshold).unwrap();
        prop_assert!(zones.pace_ordering_holds());
    }

    #[test]
    fn test_vdot_zones_ordered(vdot in 20.0f64..85.0) {
        let zones = ZoneCalculator::vdot_zones(vdot).unwrap();
        prop_assert!(zones.pace_ordering_holds());
    }

    #[test]
    fn test_format_then_parse_round_trip(seconds in 0u32..360_000) {
        prop_assert_eq!(parse_time(&format_time(seconds)).unwrap(), seconds);
    }

    #[test]
    fn test_parse_then_format_round_trip(h in 1u32..10, m in 0u32..60, s in 0u32..60) {
        let text = format!("{}:{:02}:{:02}", h, m, s);
        prop_assert_eq!(format_time(parse_time(&text).unwrap()), text);
    }

    #[test]
    fn test_faster_vdot_never_slower(vdot in 30.0f64..80.0, delta in 0.1f64..5.0) {
        let slower = RacePredictor::time_from_vdot(vdot, 10_000.0);
        let faster = RacePredictor::time_from_vdot(vdot + delta, 10_000.0);
        prop_assert!(faster <= slower);
    }

    #[test]
    fn test_daily_acwr_is_pure(daily in prop::collection::vec(0.0f64..30.0, 28..60)) {
        let analyzer = LoadAnalyzer::new();
        let first = analyzer.calculate_acwr_daily(&daily).unwrap();
        let second = analyzer.calculate_acwr_daily(&daily).unwrap();
        prop_assert_eq!(first, second);
    }
}
