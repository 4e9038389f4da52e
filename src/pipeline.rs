use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::path::PathBuf;
use tracing::info;

use crate::builder::{CalendarBuilder, YearRange};
use crate::calendar::DEFAULT_NAME_PREFIX;
use crate::error::HolidayResult;
use crate::identifier::IdentifierRegistry;
use crate::persistence::{load_config_from_json, save_config_to_json, write_calendar};

/// Zone in which "today" is evaluated for the default year range.
pub const TIME_ZONE: Tz = chrono_tz::Europe::Berlin;

pub const DEFAULT_CONFIG_FILE: &str = "calendar.json";

/// Current date in [`TIME_ZONE`].
pub fn local_today() -> NaiveDate {
    Utc::now().with_timezone(&TIME_ZONE).date_naive()
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    pub years: YearRange,
    pub name_prefix: String,
}

impl GenerateOptions {
    pub fn new(
        config_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        years: YearRange,
    ) -> Self {
        Self {
            config_path: config_path.into(),
            output_dir: output_dir.into(),
            years,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenCalendar {
    pub title: String,
    pub path: PathBuf,
    pub events: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub calendars: Vec<WrittenCalendar>,
    pub new_identifiers: usize,
}

/// Loads the configuration, builds every calendar, saves the configuration with any new
/// identifiers and writes one `.ics` file per calendar.
///
/// Nothing is written unless every calendar builds.
pub fn run(options: &GenerateOptions) -> HolidayResult<GenerateSummary> {
    run_with_registry(options, IdentifierRegistry::new())
}

pub fn run_with_registry(
    options: &GenerateOptions,
    mut registry: IdentifierRegistry,
) -> HolidayResult<GenerateSummary> {
    let mut config = load_config_from_json(&options.config_path)?;
    config.validate()?;

    info!(
        from = options.years.start(),
        to = options.years.end(),
        "building calendars"
    );
    let calendars = CalendarBuilder::new(&mut registry)
        .with_name_prefix(options.name_prefix.as_str())
        .build_all(&mut config, options.years)?;

    save_config_to_json(&config, &options.config_path)?;

    let mut summary = GenerateSummary {
        calendars: Vec::with_capacity(calendars.len()),
        new_identifiers: registry.minted(),
    };
    for calendar in &calendars {
        let path = write_calendar(calendar, &options.output_dir)?;
        summary.calendars.push(WrittenCalendar {
            title: calendar.title.clone(),
            path,
            events: calendar.events.len(),
        });
    }
    info!(
        calendars = summary.calendars.len(),
        new_identifiers = summary.new_identifiers,
        "generation finished"
    );
    Ok(summary)
}
