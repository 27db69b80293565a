use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::Feed;

/// Default title of the single-table daily view.
pub const DEFAULT_DAILY_TITLE: &str = "Electricity consumption and production (kWh, by phase)";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Daily, weekly, monthly and yearly electricity reports from meter exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "meter-report",
    about = "Daily, weekly, monthly and yearly electricity reports from meter exports",
    version
)]
pub struct Settings {
    /// Report view
    #[arg(long, default_value = "menu", value_parser = ["menu", "daily", "weekly"])]
    pub view: String,

    /// Input feed layout (auto picks climate for the menu, phases otherwise)
    #[arg(long, default_value = "auto", value_parser = ["auto", "phases", "climate"])]
    pub feed: String,

    /// Semicolon-separated export file or directory of them; repeat to read
    /// several in order
    #[arg(long = "input", short = 'i')]
    pub inputs: Vec<PathBuf>,

    /// File that saved reports are created in or appended to
    #[arg(long, short = 'o', default_value = "summary.txt")]
    pub output: PathBuf,

    /// Week number given to the first Monday of the weekly view (1-53)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=53))]
    pub first_week: u32,

    /// Year that dates entered in the menu must fall in
    #[arg(long, default_value = "2025")]
    pub year: i32,

    /// Title line of the daily view table
    #[arg(long, default_value = DEFAULT_DAILY_TITLE)]
    pub title: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.meter-report/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_week: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".meter-report").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, resolve `"auto"` values, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "inputs") {
            if let Some(v) = last.inputs {
                settings.inputs = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "output") {
            if let Some(v) = last.output {
                settings.output = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "year") {
            if let Some(v) = last.year {
                settings.year = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "first_week") {
            if let Some(v) = last.first_week {
                settings.first_week = v;
            }
        }

        settings = Self::resolve_auto_values(settings);

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// Resolve the `"auto"` feed and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.feed == "auto" {
            settings.feed = if settings.view == "menu" {
                "climate".to_string()
            } else {
                "phases".to_string()
            };
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// The resolved input feed layout.
    pub fn feed_kind(&self) -> Feed {
        match self.feed.as_str() {
            "climate" => Feed::Climate,
            "phases" => Feed::Phases,
            _ if self.view == "menu" => Feed::Climate,
            _ => Feed::Phases,
        }
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            view: Some(s.view.clone()),
            inputs: (!s.inputs.is_empty()).then(|| s.inputs.clone()),
            output: Some(s.output.clone()),
            year: Some(s.year),
            first_week: Some(s.first_week),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
