//! Per-day aggregation of meter samples.

use chrono::NaiveDate;
use meter_core::models::{ChannelSet, DailyAggregate, Sample};
use tracing::debug;

// ── DailyAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups samples by calendar date.
pub struct DailyAggregator;

impl DailyAggregator {
    /// Group `samples` into one [`DailyAggregate`] per date, in first-seen
    /// order, summing every channel.
    ///
    /// Samples must be in non-decreasing timestamp order. This is not
    /// checked: a date that reappears after another date starts a new
    /// aggregate instead of extending the earlier one.
    pub fn aggregate_daily<C: ChannelSet>(samples: &[Sample<C>]) -> Vec<DailyAggregate<C>> {
        let mut days: Vec<DailyAggregate<C>> = Vec::new();
        let mut current_date: Option<NaiveDate> = None;

        for sample in samples {
            let date = sample.date();
            if current_date == Some(date) {
                if let Some(day) = days.last_mut() {
                    day.channels += sample.channels;
                    continue;
                }
            }
            current_date = Some(date);
            days.push(DailyAggregate {
                date,
                channels: sample.channels,
            });
        }

        debug!(
            "Aggregated {} samples into {} days",
            samples.len(),
            days.len()
        );
        days
    }

    /// Sum every channel across all `days` into one grand total.
    ///
    /// Each channel only ever accumulates its own values.
    pub fn period_totals<C: ChannelSet>(days: &[DailyAggregate<C>]) -> C {
        days.iter().fold(C::default(), |mut totals, day| {
            totals += day.channels;
            totals
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use meter_core::models::{ClimateReading, PhaseChannel, PhaseReadings};

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn climate(s: &str, consumption: f64) -> Sample<ClimateReading> {
        Sample::new(
            ts(s),
            ClimateReading {
                consumption,
                production: 0.0,
                temperature: 0.0,
            },
        )
    }

    fn phases(s: &str, consumption: [f64; 3], production: [f64; 3]) -> Sample<PhaseReadings> {
        Sample::new(ts(s), PhaseReadings::new(consumption, production))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_two_samples_same_day_are_summed() {
        let samples = vec![
            climate("2025-01-01T00:00:00", 1.0),
            climate("2025-01-01T12:00:00", 2.0),
        ];
        let days = DailyAggregator::aggregate_daily(&samples);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date(2025, 1, 1));
        assert!((days[0].channels.consumption - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_one_aggregate_per_distinct_date() {
        let mut samples = Vec::new();
        for day in 1..=5 {
            for hour in 0..24 {
                let s = format!("2025-03-{:02}T{:02}:00:00", day, hour);
                samples.push(phases(&s, [0.1, 0.2, 0.3], [0.0, 0.0, f64::from(day)]));
            }
        }

        let days = DailyAggregator::aggregate_daily(&samples);
        assert_eq!(days.len(), 5);
        for (i, day) in days.iter().enumerate() {
            let day_no = (i + 1) as u32;
            assert_eq!(day.date, date(2025, 3, day_no));

            // Each channel equals the sum over exactly that date's samples.
            for channel in PhaseChannel::ALL {
                let expected: f64 = samples
                    .iter()
                    .filter(|s| s.date() == day.date)
                    .map(|s| s.channels[channel])
                    .sum();
                assert!(
                    (day.channels[channel] - expected).abs() < 1e-9,
                    "{channel:?} on {}",
                    day.date
                );
            }
        }
        assert!((days[2].channels[PhaseChannel::ProductionL3] - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_samples() {
        let days = DailyAggregator::aggregate_daily::<ClimateReading>(&[]);
        assert!(days.is_empty());
    }

    #[test]
    fn test_out_of_order_input_fragments_grouping() {
        let samples = vec![
            climate("2025-01-01T00:00:00", 1.0),
            climate("2025-01-02T00:00:00", 1.0),
            climate("2025-01-01T06:00:00", 1.0),
        ];
        let days = DailyAggregator::aggregate_daily(&samples);
        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 1, 1), date(2025, 1, 2), date(2025, 1, 1)]
        );
    }

    #[test]
    fn test_period_totals_each_channel_only_sums_itself() {
        let samples = vec![
            phases("2025-10-13T00:00:00", [1.0, 2.0, 3.0], [10.0, 20.0, 30.0]),
            phases("2025-10-14T00:00:00", [1.0, 2.0, 3.0], [10.0, 20.0, 30.0]),
            phases("2025-10-15T00:00:00", [1.0, 2.0, 3.0], [10.0, 20.0, 30.0]),
        ];
        let days = DailyAggregator::aggregate_daily(&samples);
        let totals = DailyAggregator::period_totals(&days);

        for channel in PhaseChannel::ALL {
            let expected: f64 = days.iter().map(|d| d.channels[channel]).sum();
            assert!(
                (totals[channel] - expected).abs() < 1e-9,
                "grand total of {channel:?} must only contain that channel"
            );
        }
        assert_eq!(totals.consumption(), [3.0, 6.0, 9.0]);
        assert_eq!(totals.production(), [30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_period_totals_empty_is_zero() {
        let totals = DailyAggregator::period_totals::<PhaseReadings>(&[]);
        assert_eq!(totals, PhaseReadings::default());
    }
}
