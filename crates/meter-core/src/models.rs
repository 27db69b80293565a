use std::fmt;
use std::ops::{AddAssign, Index};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::time_utils::{format_finnish_date, month_name};

// ── Feed ──────────────────────────────────────────────────────────────────────

/// Layout of one kind of meter export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Per-phase consumption and production in Wh, `.` decimal marker.
    Phases,
    /// Total consumption, production (kWh) and ambient temperature (°C),
    /// `,` or `.` decimal marker.
    Climate,
}

impl Feed {
    /// Number of value columns following the timestamp column.
    pub fn value_columns(self) -> usize {
        match self {
            Feed::Phases => 6,
            Feed::Climate => 3,
        }
    }

    /// Divisor applied to every raw value to reach reporting units.
    pub fn divisor(self) -> f64 {
        match self {
            Feed::Phases => 1000.0,
            Feed::Climate => 1.0,
        }
    }

    /// Whether `,` is accepted as the decimal marker.
    pub fn accepts_decimal_comma(self) -> bool {
        matches!(self, Feed::Climate)
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Phases => f.write_str("phases"),
            Feed::Climate => f.write_str("climate"),
        }
    }
}

// ── ChannelSet ────────────────────────────────────────────────────────────────

/// A fixed set of named measurement channels carried by one sample.
///
/// Implementors are plain `Copy` records; adding two of them sums every
/// channel element-wise.
pub trait ChannelSet: Copy + Default + fmt::Debug + AddAssign {
    /// The export layout these channels are parsed from.
    const FEED: Feed;

    /// Whether [`ChannelSet::once_daily`] ever returns a value.
    const HAS_ONCE_DAILY: bool;

    /// Build the set from already scaled values in column order.
    ///
    /// Returns `None` when `values` does not hold exactly
    /// `FEED.value_columns()` entries.
    fn from_values(values: &[f64]) -> Option<Self>;

    /// Sum of all consumption channels.
    fn total_consumption(&self) -> f64;

    /// Sum of all production channels.
    fn total_production(&self) -> f64;

    /// The channel that is only meaningful once per day at midnight.
    fn once_daily(&self) -> Option<f64>;
}

// ── PhaseReadings ─────────────────────────────────────────────────────────────

/// Identifies one of the six per-phase channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseChannel {
    ConsumptionL1,
    ConsumptionL2,
    ConsumptionL3,
    ProductionL1,
    ProductionL2,
    ProductionL3,
}

impl PhaseChannel {
    /// Every channel in column order.
    pub const ALL: [PhaseChannel; 6] = [
        PhaseChannel::ConsumptionL1,
        PhaseChannel::ConsumptionL2,
        PhaseChannel::ConsumptionL3,
        PhaseChannel::ProductionL1,
        PhaseChannel::ProductionL2,
        PhaseChannel::ProductionL3,
    ];

    pub const CONSUMPTION: [PhaseChannel; 3] = [
        PhaseChannel::ConsumptionL1,
        PhaseChannel::ConsumptionL2,
        PhaseChannel::ConsumptionL3,
    ];

    pub const PRODUCTION: [PhaseChannel; 3] = [
        PhaseChannel::ProductionL1,
        PhaseChannel::ProductionL2,
        PhaseChannel::ProductionL3,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Consumption and production per phase, in kWh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseReadings {
    values: [f64; 6],
}

impl PhaseReadings {
    pub fn new(consumption: [f64; 3], production: [f64; 3]) -> Self {
        let [c1, c2, c3] = consumption;
        let [p1, p2, p3] = production;
        Self {
            values: [c1, c2, c3, p1, p2, p3],
        }
    }

    /// The three consumption phases, L1 first.
    pub fn consumption(&self) -> [f64; 3] {
        PhaseChannel::CONSUMPTION.map(|c| self[c])
    }

    /// The three production phases, L1 first.
    pub fn production(&self) -> [f64; 3] {
        PhaseChannel::PRODUCTION.map(|c| self[c])
    }
}

impl Index<PhaseChannel> for PhaseReadings {
    type Output = f64;

    fn index(&self, channel: PhaseChannel) -> &f64 {
        &self.values[channel.slot()]
    }
}

impl AddAssign for PhaseReadings {
    fn add_assign(&mut self, rhs: Self) {
        for channel in PhaseChannel::ALL {
            self.values[channel.slot()] += rhs[channel];
        }
    }
}

impl ChannelSet for PhaseReadings {
    const FEED: Feed = Feed::Phases;
    const HAS_ONCE_DAILY: bool = false;

    fn from_values(values: &[f64]) -> Option<Self> {
        let values: [f64; 6] = values.try_into().ok()?;
        Some(Self { values })
    }

    fn total_consumption(&self) -> f64 {
        self.consumption().iter().sum()
    }

    fn total_production(&self) -> f64 {
        self.production().iter().sum()
    }

    fn once_daily(&self) -> Option<f64> {
        None
    }
}

// ── ClimateReading ────────────────────────────────────────────────────────────

/// Whole-site consumption and production (kWh) with the ambient temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClimateReading {
    pub consumption: f64,
    pub production: f64,
    /// Average temperature of the day in °C; only meaningful at 00:00.
    pub temperature: f64,
}

impl AddAssign for ClimateReading {
    fn add_assign(&mut self, rhs: Self) {
        self.consumption += rhs.consumption;
        self.production += rhs.production;
        self.temperature += rhs.temperature;
    }
}

impl ChannelSet for ClimateReading {
    const FEED: Feed = Feed::Climate;
    const HAS_ONCE_DAILY: bool = true;

    fn from_values(values: &[f64]) -> Option<Self> {
        let [consumption, production, temperature]: [f64; 3] = values.try_into().ok()?;
        Some(Self {
            consumption,
            production,
            temperature,
        })
    }

    fn total_consumption(&self) -> f64 {
        self.consumption
    }

    fn total_production(&self) -> f64 {
        self.production
    }

    fn once_daily(&self) -> Option<f64> {
        Some(self.temperature)
    }
}

// ── Sample ────────────────────────────────────────────────────────────────────

/// One parsed row of a meter export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<C> {
    pub timestamp: NaiveDateTime,
    pub channels: C,
}

impl<C> Sample<C> {
    pub fn new(timestamp: NaiveDateTime, channels: C) -> Self {
        Self {
            timestamp,
            channels,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// `true` when the sample was taken at exactly 00:00.
    pub fn is_midnight(&self) -> bool {
        self.timestamp.hour() == 0 && self.timestamp.minute() == 0
    }
}

// ── DailyAggregate ────────────────────────────────────────────────────────────

/// Per-channel sums of every sample recorded on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyAggregate<C> {
    pub date: NaiveDate,
    pub channels: C,
}

impl<C> DailyAggregate<C> {
    /// Monday-first weekday index, `0..=6`.
    pub fn weekday_index(&self) -> usize {
        self.date.weekday().num_days_from_monday() as usize
    }
}

// ── PeriodLabel / PeriodSummary ───────────────────────────────────────────────

/// Which stretch of time a [`PeriodSummary`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodLabel {
    /// Inclusive date range.
    Range { start: NaiveDate, end: NaiveDate },
    /// A calendar month number, `1..=12`, across all years.
    Month(u32),
    /// A whole year.
    Year(i32),
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodLabel::Range { start, end } => write!(
                f,
                "the period {}-{}",
                format_finnish_date(*start),
                format_finnish_date(*end)
            ),
            PeriodLabel::Month(month) => write!(f, "the month: {}", month_name(*month)),
            PeriodLabel::Year(year) => write!(f, "the year: {}", year),
        }
    }
}

/// Channel totals and the once-daily average over one reported period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodSummary<C> {
    pub period: PeriodLabel,
    pub totals: C,
    /// Mean of the once-daily channel over midnight samples; `None` for
    /// channel sets without such a channel.
    pub once_daily_average: Option<f64>,
}

impl<C: ChannelSet> PeriodSummary<C> {
    pub fn total_consumption(&self) -> f64 {
        self.totals.total_consumption()
    }

    pub fn total_production(&self) -> f64 {
        self.totals.total_production()
    }
}
