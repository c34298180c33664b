//! Measurement to Series Transform

use crate::series::{Axis, ChartData, Point, Series};
use data_validator::PlausibilityPolicy;
use storage::Measurement;
use tracing::debug;

pub const TEMPERATURE_KEY: &str = "Temperature";
pub const TEMPERATURE_COLOR: &str = "#ff7f0e";
pub const HUMIDITY_KEY: &str = "Humidity";
pub const HUMIDITY_COLOR: &str = "#2ca02c";

/// Pure, deterministic chart shaping.
///
/// The input order is never trusted: records are re-sorted ascending by
/// date, with equal dates ordered by value, so any permutation of the same
/// records yields the same output.
#[derive(Debug, Clone, Default)]
pub struct ChartTransform {
    policy: PlausibilityPolicy,
}

impl ChartTransform {
    pub fn new(policy: PlausibilityPolicy) -> Self {
        Self { policy }
    }

    pub fn transform(&self, records: &[Measurement]) -> ChartData {
        let mut retained: Vec<&Measurement> = records
            .iter()
            .filter(|r| self.policy.accepts(r))
            .collect();

        retained.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.temperature.total_cmp(&b.temperature))
                .then(a.humidity.total_cmp(&b.humidity))
        });

        if retained.len() != records.len() {
            debug!(
                "Chart transform discarded {} implausible records",
                records.len() - retained.len()
            );
        }

        let temperature = retained
            .iter()
            .map(|r| Point { x: r.date, y: r.temperature })
            .collect();
        let humidity = retained
            .iter()
            .map(|r| Point { x: r.date, y: r.humidity })
            .collect();

        ChartData {
            series: vec![
                Series::line(TEMPERATURE_KEY, TEMPERATURE_COLOR, Axis::Primary, temperature),
                Series::line(HUMIDITY_KEY, HUMIDITY_COLOR, Axis::Secondary, humidity),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_validator::PlausibilityConfig;
    use proptest::prelude::*;

    #[test]
    fn test_two_series_ascending() {
        let records = vec![
            Measurement::new(22.0, 41.0, 1_700_000_600_000),
            Measurement::new(21.5, 40.2, 1_700_000_000_000),
        ];
        let data = ChartTransform::default().transform(&records);

        assert_eq!(data.series.len(), 2);
        let temp = data.get(TEMPERATURE_KEY).unwrap();
        assert_eq!(temp.color, TEMPERATURE_COLOR);
        assert_eq!(temp.y_axis, Axis::Primary);
        assert_eq!(
            temp.values,
            vec![
                Point { x: 1_700_000_000_000, y: 21.5 },
                Point { x: 1_700_000_600_000, y: 22.0 },
            ]
        );

        let hum = data.get(HUMIDITY_KEY).unwrap();
        assert_eq!(hum.y_axis, Axis::Secondary);
        assert_eq!(hum.values[0].y, 40.2);
        assert_eq!(hum.values[1].y, 41.0);
    }

    #[test]
    fn test_empty_input_still_has_both_series() {
        let data = ChartTransform::default().transform(&[]);
        assert_eq!(data.series.len(), 2);
        assert!(data.series.iter().all(|s| s.values.is_empty()));
    }

    #[test]
    fn test_policy_discards_records() {
        let transform = ChartTransform::new(PlausibilityPolicy::new(PlausibilityConfig {
            enabled: true,
            ..Default::default()
        }));
        let records = vec![
            Measurement::new(20.0, 50.0, 1),
            Measurement::new(500.0, 50.0, 2),
            Measurement::new(21.0, 51.0, 3),
        ];
        let data = transform.transform(&records);
        for series in &data.series {
            let xs: Vec<i64> = series.values.iter().map(|p| p.x).collect();
            assert_eq!(xs, vec![1, 3]);
        }
    }

    fn records() -> impl Strategy<Value = Vec<Measurement>> {
        proptest::collection::vec(
            (0i64..50, -40.0f32..50.0, 0.0f32..100.0).prop_map(|(d, t, h)| Measurement::new(t, h, d)),
            0..60,
        )
    }

    proptest! {
        #[test]
        fn prop_permutation_invariant((original, shuffled) in records().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))) {
            let transform = ChartTransform::default();
            prop_assert_eq!(transform.transform(&original), transform.transform(&shuffled));
        }

        #[test]
        fn prop_point_counts_match_input(input in records()) {
            let data = ChartTransform::default().transform(&input);
            prop_assert_eq!(data.series.len(), 2);
            prop_assert_eq!(&data.series[0].key, TEMPERATURE_KEY);
            prop_assert_eq!(&data.series[1].key, HUMIDITY_KEY);
            for series in &data.series {
                prop_assert_eq!(series.values.len(), input.len());
                prop_assert!(series.values.windows(2).all(|w| w[0].x <= w[1].x));
            }
        }
    }
}
