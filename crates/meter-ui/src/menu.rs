//! Interactive report selection loop.
//!
//! ```text
//! MainMenu ──► DailyRange ─┐
//!          ├─► Monthly ────┼─► PostReport ──► Save (stay) / NewReport (MainMenu) / Exit
//!          └─► Yearly ─────┘
//! ```
//!
//! Every prompt re-asks until it gets a usable answer; bad input is never an
//! error. Closing the input stream ends the session like choosing Exit.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use meter_core::error::{ReportError, Result};
use meter_core::models::{ChannelSet, PeriodSummary, Sample};
use meter_core::time_utils::parse_finnish_date;
use meter_data::reporter::PeriodReporter;
use meter_data::writer::persist_report;
use tracing::{info, warn};

use crate::table_view::render_summary;

const REPORT_RULE: &str = "-----------------------------------------------------";

/// Whether the session keeps going after a menu step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Continue,
    Exit,
}

/// Report granularity picked in the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    DailyRange,
    Monthly,
    Yearly,
}

/// The menu session: owns the console streams and borrows the loaded
/// samples for its whole lifetime.
pub struct ReportMenu<'a, C, R, W> {
    samples: &'a [Sample<C>],
    output_path: PathBuf,
    supported_year: i32,
    input: R,
    out: W,
}

impl<'a, C, R, W> ReportMenu<'a, C, R, W>
where
    C: ChannelSet,
    R: BufRead,
    W: Write,
{
    /// `supported_year` is the only year accepted for typed dates; saved
    /// reports go to `output_path`.
    pub fn new(
        samples: &'a [Sample<C>],
        output_path: PathBuf,
        supported_year: i32,
        input: R,
        out: W,
    ) -> Self {
        Self {
            samples,
            output_path,
            supported_year,
            input,
            out,
        }
    }

    /// Run until the user exits or input ends.
    ///
    /// Only I/O and persistence failures are returned as errors.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let Some(kind) = self.main_menu()? else {
                return Ok(());
            };
            info!("Running {:?} report", kind);
            if self.run_flow(kind)? == Navigation::Exit {
                return Ok(());
            }
        }
    }

    /// Give back the output stream.
    pub fn into_output(self) -> W {
        self.out
    }

    // ── States ────────────────────────────────────────────────────────────────

    /// `None` means exit.
    fn main_menu(&mut self) -> Result<Option<ReportKind>> {
        loop {
            writeln!(self.out, "Choose a report type:")?;
            writeln!(self.out, "1) Daily summary for a date range")?;
            writeln!(self.out, "2) Monthly summary for one month")?;
            writeln!(self.out, "3) Full year {} summary", self.supported_year)?;
            writeln!(self.out, "4) Exit the program")?;
            let Some(choice) = self.read_line("Please type your choice (1-4) and press Enter: ")?
            else {
                return Ok(None);
            };
            match choice.parse::<u32>() {
                Ok(1) => return Ok(Some(ReportKind::DailyRange)),
                Ok(2) => return Ok(Some(ReportKind::Monthly)),
                Ok(3) => return Ok(Some(ReportKind::Yearly)),
                Ok(4) => return Ok(None),
                _ => continue,
            }
        }
    }

    fn run_flow(&mut self, kind: ReportKind) -> Result<Navigation> {
        let result = match kind {
            ReportKind::DailyRange => {
                let Some(start) = self.prompt_date("Enter start date (DD.MM.YYYY): ", None)? else {
                    return Ok(Navigation::Exit);
                };
                let Some(end) = self.prompt_date("Enter end date (DD.MM.YYYY): ", Some(start))?
                else {
                    return Ok(Navigation::Exit);
                };
                PeriodReporter::range_report(self.samples, start, end)
            }
            ReportKind::Monthly => {
                let Some(month) = self.prompt_month()? else {
                    return Ok(Navigation::Exit);
                };
                PeriodReporter::month_report(self.samples, month)
            }
            ReportKind::Yearly => PeriodReporter::year_report(self.samples),
        };

        let summary: PeriodSummary<C> = match result {
            Ok(summary) => summary,
            Err(err @ (ReportError::NoMidnightSamples { .. } | ReportError::EmptyDataset)) => {
                warn!("Report abandoned: {}", err);
                writeln!(self.out, "\nCould not create the report: {}\n", err)?;
                return Ok(Navigation::Continue);
            }
            Err(err) => return Err(err),
        };

        let report = render_summary(&summary);
        writeln!(self.out, "\n{}", REPORT_RULE)?;
        writeln!(self.out, "{}", report)?;
        self.post_report(&report)
    }

    fn post_report(&mut self, report: &str) -> Result<Navigation> {
        loop {
            writeln!(self.out, "What would you like to do next?")?;
            writeln!(
                self.out,
                "1) Write the report to the file {}",
                self.output_path.display()
            )?;
            writeln!(self.out, "2) Create a new report")?;
            writeln!(self.out, "3) Exit")?;
            let Some(choice) = self.read_line("Please type your choice (1-3) and press Enter: ")?
            else {
                return Ok(Navigation::Exit);
            };
            match choice.parse::<u32>() {
                Ok(1) => {
                    let outcome = persist_report(&self.output_path, report)?;
                    writeln!(
                        self.out,
                        "- - -\n{} {}\n- - -",
                        self.output_path.display(),
                        outcome
                    )?;
                }
                Ok(2) => return Ok(Navigation::Continue),
                Ok(3) => return Ok(Navigation::Exit),
                _ => continue,
            }
        }
    }

    // ── Prompts ───────────────────────────────────────────────────────────────

    /// Ask for a `dd.mm.yyyy` date in the supported year, not before
    /// `not_before`. `None` means input ended.
    fn prompt_date(
        &mut self,
        prompt: &str,
        not_before: Option<NaiveDate>,
    ) -> Result<Option<NaiveDate>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            let Some(date) = parse_finnish_date(&line) else {
                continue;
            };
            if date.year() != self.supported_year {
                writeln!(
                    self.out,
                    "Please enter a date in the year {}",
                    self.supported_year
                )?;
                continue;
            }
            if not_before.is_some_and(|start| date < start) {
                writeln!(self.out, "The end date cannot be before the start date")?;
                continue;
            }
            return Ok(Some(date));
        }
    }

    /// Ask for a month number 1–12. `None` means input ended.
    fn prompt_month(&mut self) -> Result<Option<u32>> {
        loop {
            let Some(line) = self.read_line("Enter month number (1-12): ")? else {
                return Ok(None);
            };
            match line.parse::<u32>() {
                Ok(month) if (1..=12).contains(&month) => return Ok(Some(month)),
                _ => continue,
            }
        }
    }

    /// Print `prompt` and read one trimmed line; `None` at end of input.
    ///
    /// Bytes that are not UTF-8 are replaced rather than rejected, so a
    /// garbled line just fails parsing and the prompt asks again.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }
}
