//! Plain-text report rendering.
//!
//! Daily per-phase tables (optionally split into week blocks), the
//! period-totals footer, and the short summary block of period reports.
//! Every number uses two decimals with a decimal comma.

use meter_core::formatting::{format_kwh, format_with_unit};
use meter_core::models::{ChannelSet, DailyAggregate, PeriodSummary, PhaseReadings};
use meter_core::time_utils::{format_finnish_date, weekday_name};

const COLUMN_HEADER: &str =
    "Day           Date           Consumption [kWh]              Production [kWh]";
const COLUMN_SUBHEADER: &str =
    "            (dd.mm.yyyy)    v1       v2      v3            v1      v2      v3";

/// Width of the dashed line under the daily table header.
pub const TABLE_WIDTH: usize = 78;

const TOTALS_TITLE: &str = "Summary of the entire period by phase:";
const TOTALS_HEADER: &str = "   Consumption [kWh]              Production [kWh]";
const TOTALS_SUBHEADER: &str = "  v1       v2      v3            v1      v2      v3";
const TOTALS_WIDTH: usize = 52;

/// Title of week block `week`.
pub fn week_title(week: u32) -> String {
    format!(
        "Week {} electricity consumption and production (kWh, by phase)",
        week
    )
}

/// Title line, both column-header lines and the dashed separator, each
/// terminated by a newline.
pub fn table_header(title: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        title,
        COLUMN_HEADER,
        COLUMN_SUBHEADER,
        "-".repeat(TABLE_WIDTH)
    )
}

/// One fixed-width table row: weekday, date, the consumption triplet and,
/// after a wider gap, the production triplet.
pub fn format_row(day: &DailyAggregate<PhaseReadings>) -> String {
    let [c1, c2, c3] = day.channels.consumption().map(format_kwh);
    let [p1, p2, p3] = day.channels.production().map(format_kwh);
    format!(
        "{:<12}{:<12}{:>8}{:>8}{:>8}{:>14}{:>8}{:>8}",
        weekday_name(day.weekday_index()),
        format_finnish_date(day.date),
        c1,
        c2,
        c3,
        p1,
        p2,
        p3
    )
}

/// A single table: one header block followed by every row.
pub fn render_daily_table(title: &str, days: &[DailyAggregate<PhaseReadings>]) -> String {
    let mut out = table_header(title);
    for day in days {
        out.push_str(&format_row(day));
        out.push('\n');
    }
    out
}

/// Rows split into week blocks.
///
/// A header block titled `Week N` goes before every Monday row; `N` starts
/// at `first_week` and grows by one per Monday. Rows before the first
/// Monday get no header. A blank line separates a header block from any
/// text already emitted.
pub fn render_weekly_tables(days: &[DailyAggregate<PhaseReadings>], first_week: u32) -> String {
    let mut out = String::new();
    let mut week = first_week;

    for day in days {
        if day.weekday_index() == 0 {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&table_header(&week_title(week)));
            week += 1;
        }
        out.push_str(&format_row(day));
        out.push('\n');
    }
    out
}

/// Footer listing the grand total of every phase channel.
///
/// The first total starts at column zero; the others are right-aligned.
pub fn render_period_totals(totals: &PhaseReadings) -> String {
    let [c1, c2, c3] = totals.consumption().map(format_kwh);
    let [p1, p2, p3] = totals.production().map(format_kwh);
    format!(
        "{}\n{}\n{}\n{}\n{}{:>8}{:>8}{:>14}{:>8}{:>8}\n",
        TOTALS_TITLE,
        TOTALS_HEADER,
        TOTALS_SUBHEADER,
        "-".repeat(TOTALS_WIDTH),
        c1,
        c2,
        c3,
        p1,
        p2,
        p3
    )
}

/// Week blocks followed by a blank line and the period-totals footer.
pub fn render_weekly_report(
    days: &[DailyAggregate<PhaseReadings>],
    totals: &PhaseReadings,
    first_week: u32,
) -> String {
    let mut out = render_weekly_tables(days, first_week);
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&render_period_totals(totals));
    out
}

/// Short labelled block for a period report.
///
/// The average line is only present when the channel set has a once-daily
/// channel.
pub fn render_summary<C: ChannelSet>(summary: &PeriodSummary<C>) -> String {
    let mut out = format!("Report for {}\n", summary.period);
    out.push_str(&format!(
        "- Total consumption: {}\n",
        format_with_unit(summary.total_consumption(), "kWh")
    ));
    out.push_str(&format!(
        "- Total production: {}\n",
        format_with_unit(summary.total_production(), "kWh")
    ));
    if let Some(avg) = summary.once_daily_average {
        out.push_str(&format!(
            "- Average temperature: {}\n",
            format_with_unit(avg, "°C")
        ));
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
