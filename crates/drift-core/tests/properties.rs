use chrono::{DateTime, Duration, TimeZone, Utc};
use drift_core::{ConfidenceModel, PeriodSegmenter, RiskConfig, RiskScorer, WeatherObservation};
use proptest::prelude::*;

fn hours(n: usize) -> Vec<DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap();
    (0..n).map(|i| base + Duration::hours(i as i64)).collect()
}

fn optional(range: std::ops::Range<f64>) -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), Just(Some(f64::NAN)), range.prop_map(Some)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_score_within_unit_interval(
        temp in optional(-40.0..15.0),
        wind in optional(0.0..45.0),
        change in optional(-60.0..60.0),
        stability in proptest::option::of(0.0..15.0f64),
        wind_weight in 0.0..1.5f64,
    ) {
        let mut config = RiskConfig::default();
        config.wind.weight = wind_weight;
        let scorer = RiskScorer::new(config);

        let mut obs = WeatherObservation::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        obs.air_temperature = temp;
        obs.wind_speed = wind;

        let point = scorer.score(&obs, change.filter(|c| c.is_finite()), stability);
        prop_assert!((0.0..=1.0).contains(&point.score), "score {}", point.score);
        prop_assert_eq!(point.is_high_risk, point.score >= 0.6);
    }

    #[test]
    fn prop_confidence_bounded(depth in -1000.0..1000.0f64, change in -500.0..500.0f64) {
        let confidence = ConfidenceModel::default().confidence(depth, change);
        prop_assert!((0.1..=1.0).contains(&confidence), "confidence {}", confidence);
    }

    #[test]
    fn prop_confidence_bounded_for_any_model(
        baseline in prop_oneof![Just(f64::NAN), -2.0..2.0f64],
        floor in prop_oneof![Just(f64::NAN), -1.0..3.0f64],
        penalty in -1.0..1.0f64,
        change in -500.0..500.0f64,
    ) {
        let model = ConfidenceModel {
            baseline,
            floor,
            change_penalty: penalty,
            ..ConfidenceModel::default()
        };
        let confidence = model.confidence(250.0, change);
        prop_assert!((0.1..=1.0).contains(&confidence), "confidence {}", confidence);
    }

    #[test]
    fn prop_temperature_monotonic(a in -5.0..0.0f64, b in -5.0..0.0f64) {
        let scorer = RiskScorer::default();
        let (warmer, colder) = if a >= b { (a, b) } else { (b, a) };
        let warm = scorer.temperature_score(Some(warmer)).unwrap();
        let cold = scorer.temperature_score(Some(colder)).unwrap();
        prop_assert!(cold >= warm);
    }

    #[test]
    fn prop_periods_are_maximal_filtered_runs(
        mask in proptest::collection::vec(any::<bool>(), 0..60),
        min_duration in 1usize..5,
    ) {
        let scores: Vec<f64> = mask.iter().map(|&h| if h { 0.9 } else { 0.1 }).collect();
        let timestamps = hours(mask.len());
        let segmenter = PeriodSegmenter::new(min_duration).unwrap();

        let periods = segmenter.segment(&timestamps, &mask, &scores).unwrap();
        let again = segmenter.segment(&timestamps, &mask, &scores).unwrap();
        prop_assert_eq!(&periods, &again);

        let mut last_end: Option<usize> = None;
        for p in &periods {
            prop_assert!(p.duration >= min_duration);
            prop_assert_eq!(p.duration, p.end_index - p.start_index + 1);
            prop_assert!(mask[p.start_index..=p.end_index].iter().all(|&h| h));
            prop_assert!(p.start_index == 0 || !mask[p.start_index - 1]);
            prop_assert!(p.end_index + 1 == mask.len() || !mask[p.end_index + 1]);
            prop_assert!(p.start_time <= p.end_time);
            prop_assert!(p.max_risk_score >= 0.6);
            if let Some(end) = last_end {
                prop_assert!(p.start_index > end + 1);
            }
            last_end = Some(p.end_index);
        }

        // Every qualifying run is emitted
        let mut expected = 0;
        let mut run = 0;
        for &h in mask.iter().chain(std::iter::once(&false)) {
            if h {
                run += 1;
            } else {
                if run >= min_duration {
                    expected += 1;
                }
                run = 0;
            }
        }
        prop_assert_eq!(periods.len(), expected);
    }
}
