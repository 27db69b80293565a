//! Channel totals and once-daily averages over a date range, a month or a
//! whole year.

use chrono::{Datelike, NaiveDate};
use meter_core::error::{ReportError, Result};
use meter_core::models::{ChannelSet, PeriodLabel, PeriodSummary, Sample};
use tracing::debug;

/// Stateless helper computing [`PeriodSummary`] values from raw samples.
pub struct PeriodReporter;

impl PeriodReporter {
    /// Summarise samples whose date lies in `start..=end`.
    pub fn range_report<C: ChannelSet>(
        samples: &[Sample<C>],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PeriodSummary<C>> {
        Self::summarize(samples, PeriodLabel::Range { start, end }, |s| {
            let date = s.date();
            date >= start && date <= end
        })
    }

    /// Summarise samples of calendar month `month` (1–12) in any year.
    pub fn month_report<C: ChannelSet>(samples: &[Sample<C>], month: u32) -> Result<PeriodSummary<C>> {
        if !(1..=12).contains(&month) {
            return Err(ReportError::InvalidMonth(month));
        }
        Self::summarize(samples, PeriodLabel::Month(month), |s| {
            s.date().month() == month
        })
    }

    /// Summarise every sample; the year label comes from the first one.
    pub fn year_report<C: ChannelSet>(samples: &[Sample<C>]) -> Result<PeriodSummary<C>> {
        let first = samples.first().ok_or(ReportError::EmptyDataset)?;
        Self::summarize(samples, PeriodLabel::Year(first.date().year()), |_| true)
    }

    /// Shared accumulation over the samples accepted by `select`.
    ///
    /// The once-daily channel is averaged over samples at exactly 00:00 only.
    /// When the channel set has such a channel but none of the selected
    /// samples is at midnight, the average is undefined and an error is
    /// returned.
    fn summarize<C: ChannelSet>(
        samples: &[Sample<C>],
        period: PeriodLabel,
        select: impl Fn(&Sample<C>) -> bool,
    ) -> Result<PeriodSummary<C>> {
        let mut totals = C::default();
        let mut selected = 0usize;
        let mut once_daily_sum = 0.0;
        let mut midnight_count = 0u32;

        for sample in samples.iter().filter(|s| select(s)) {
            selected += 1;
            totals += sample.channels;
            if sample.is_midnight() {
                if let Some(value) = sample.channels.once_daily() {
                    once_daily_sum += value;
                    midnight_count += 1;
                }
            }
        }

        debug!(
            "{}: {} samples selected, {} at midnight",
            period, selected, midnight_count
        );

        let once_daily_average = if !C::HAS_ONCE_DAILY {
            None
        } else if midnight_count == 0 {
            return Err(ReportError::NoMidnightSamples {
                period: period.to_string(),
            });
        } else {
            Some(once_daily_sum / f64::from(midnight_count))
        };

        Ok(PeriodSummary {
            period,
            totals,
            once_daily_average,
        })
    }
}
