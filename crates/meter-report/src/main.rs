mod bootstrap;

use std::path::PathBuf;

use anyhow::{bail, Result};
use meter_core::models::{ChannelSet, ClimateReading, Feed, PhaseReadings, Sample};
use meter_core::settings::Settings;
use meter_data::aggregator::DailyAggregator;
use meter_data::reader::{expand_inputs, load_samples_from_paths};
use meter_data::writer::persist_report;
use meter_ui::menu::ReportMenu;
use meter_ui::table_view::{render_daily_table, render_weekly_report};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("meter-report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Feed: {}, Output: {}",
        settings.view,
        settings.feed,
        settings.output.display()
    );

    let files = expand_inputs(&settings.inputs)?;
    tracing::info!("Reading {} input file(s)", files.len());

    match settings.view.as_str() {
        "menu" => match settings.feed_kind() {
            Feed::Climate => run_menu::<ClimateReading>(&settings, &files)?,
            Feed::Phases => run_menu::<PhaseReadings>(&settings, &files)?,
        },

        "daily" | "weekly" => {
            if settings.feed_kind() != Feed::Phases {
                bail!("the {} view needs the phases feed", settings.view);
            }
            let samples: Vec<Sample<PhaseReadings>> = load_samples_from_paths(&files)?;
            let days = DailyAggregator::aggregate_daily(&samples);
            tracing::info!("{} samples grouped into {} days", samples.len(), days.len());

            if settings.view == "daily" {
                print!("{}", render_daily_table(&settings.title, &days));
            } else {
                let totals = DailyAggregator::period_totals(&days);
                let report = render_weekly_report(&days, &totals, settings.first_week);
                print!("{}", report);
                let outcome = persist_report(&settings.output, &report)?;
                println!("{} {}", settings.output.display(), outcome);
            }
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}

/// Load the samples for feed `C` and hand the console to the report menu.
fn run_menu<C: ChannelSet>(settings: &Settings, files: &[PathBuf]) -> Result<()> {
    let samples: Vec<Sample<C>> = load_samples_from_paths(files)?;
    tracing::info!("Loaded {} samples for the menu", samples.len());

    let stdin = std::io::stdin();
    let mut menu = ReportMenu::new(
        &samples,
        settings.output.clone(),
        settings.year,
        stdin.lock(),
        std::io::stdout(),
    );
    menu.run()?;
    Ok(())
}
