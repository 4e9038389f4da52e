use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use std::ops::RangeInclusive;
use tracing::{debug, info};

use crate::calendar::{Calendar, DEFAULT_NAME_PREFIX};
use crate::config::{
    CalendarSpec, FixedDateSpec, HolidayConfig, MovableFeastSpec, validate_file_stem,
};
use crate::dates::{MAX_YEAR, MIN_YEAR, easter_sunday};
use crate::error::{HolidayError, HolidayResult};
use crate::event::Event;
use crate::identifier::{IdentifierRegistry, ScopeKey};

/// Years after the current one included in the default processing range.
pub const DEFAULT_YEARS_AHEAD: i32 = 2;

/// Movable-feast events are stamped as created this many years before they occur.
const CREATED_YEARS_BEFORE: i32 = 3;

/// Inclusive range of years to generate movable feasts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> HolidayResult<Self> {
        for year in [start, end] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(HolidayError::YearOutOfRange {
                    year,
                    min: MIN_YEAR,
                    max: MAX_YEAR,
                });
            }
        }
        if start > end {
            return Err(HolidayError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(year: i32) -> HolidayResult<Self> {
        Self::new(year, year)
    }

    /// The year of `today` through [`DEFAULT_YEARS_AHEAD`] years later.
    pub fn default_for(today: NaiveDate) -> HolidayResult<Self> {
        let year = today.year();
        Self::new(year, (year + DEFAULT_YEARS_AHEAD).min(MAX_YEAR))
    }

    /// Range from optional command-line bounds. A single bound spans
    /// [`DEFAULT_YEARS_AHEAD`] years from (or up to) it; no bounds means [`Self::default_for`].
    pub fn from_bounds(
        from: Option<i32>,
        to: Option<i32>,
        today: NaiveDate,
    ) -> HolidayResult<Self> {
        match (from, to) {
            (Some(from), Some(to)) => Self::new(from, to),
            (Some(from), None) => Self::new(from, from.saturating_add(DEFAULT_YEARS_AHEAD)),
            (None, Some(to)) => Self::new(to.saturating_sub(DEFAULT_YEARS_AHEAD), to),
            (None, None) => Self::default_for(today),
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn year_count(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    /// Creation date shared by all fixed-date events: 1 January of the first year.
    pub fn reference_date(&self) -> HolidayResult<NaiveDate> {
        jan_first(self.start, "fixed-date reference")
    }
}

/// Turns calendar definitions into calendars, assigning identifiers as it goes.
pub struct CalendarBuilder<'r> {
    registry: &'r mut IdentifierRegistry,
    name_prefix: String,
}

impl<'r> CalendarBuilder<'r> {
    pub fn new(registry: &'r mut IdentifierRegistry) -> Self {
        Self {
            registry,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// One non-recurring event per entry, dated relative to Easter Sunday of `year`.
    pub fn build_movable_feast_events(
        &mut self,
        calendar: &str,
        specs: &mut IndexMap<String, MovableFeastSpec>,
        year: i32,
    ) -> HolidayResult<Vec<Event>> {
        let created = jan_first(year - CREATED_YEARS_BEFORE, calendar)?;
        let easter = easter_sunday(year)?;
        debug!(calendar, year, %easter, "building movable feasts");

        let mut events = Vec::with_capacity(specs.len());
        for (title, spec) in specs.iter_mut() {
            let offset = spec.offset(calendar, title)?;
            let date = offset
                .apply(easter)
                .ok_or_else(|| HolidayError::DateOutOfRange {
                    title: title.clone(),
                })?;
            let identifier = self
                .registry
                .get_or_create(spec, ScopeKey::year(title, year));
            events.push(Event::new(created, false, date, title.as_str(), identifier));
        }
        Ok(events)
    }

    /// One yearly-recurring event per entry, first occurring in the year of `created`.
    /// A leap day first occurs in the next leap year.
    pub fn build_fixed_date_events(
        &mut self,
        calendar: &str,
        specs: &mut IndexMap<String, FixedDateSpec>,
        created: NaiveDate,
    ) -> HolidayResult<Vec<Event>> {
        let year = created.year();
        let mut events = Vec::with_capacity(specs.len());
        for (title, spec) in specs.iter_mut() {
            let month_day = spec.month_day(calendar, title)?;
            let date = month_day
                .first_on_or_after(year)
                .ok_or_else(|| HolidayError::InvalidField {
                    calendar: calendar.to_string(),
                    title: title.clone(),
                    field: "monthDay",
                    reason: format!("{month_day} does not occur between {year} and {MAX_YEAR}"),
                })?;
            if date.year() != year {
                debug!(
                    calendar,
                    title = title.as_str(),
                    %date,
                    "leap day starts in a later year"
                );
            }
            let identifier = self.registry.get_or_create(spec, ScopeKey::title(title));
            events.push(Event::new(created, true, date, title.as_str(), identifier));
        }
        Ok(events)
    }

    /// Movable feasts for every year in ascending order, then the fixed-date events.
    pub fn build_calendar(
        &mut self,
        name: &str,
        spec: &mut CalendarSpec,
        range: YearRange,
    ) -> HolidayResult<Calendar> {
        validate_file_stem(name)?;
        let mut calendar = Calendar::new(self.name_prefix.as_str(), name);
        calendar
            .events
            .reserve(spec.event_count(range.year_count()));

        for year in range.years() {
            let events = self.build_movable_feast_events(name, &mut spec.easter, year)?;
            calendar.extend(events);
        }
        let fixed = self.build_fixed_date_events(name, &mut spec.repeat, range.reference_date()?)?;
        calendar.extend(fixed);

        info!(
            calendar = name,
            events = calendar.events.len(),
            "calendar built"
        );
        Ok(calendar)
    }

    /// Builds every calendar in configuration order, stopping at the first error.
    pub fn build_all(
        &mut self,
        config: &mut HolidayConfig,
        range: YearRange,
    ) -> HolidayResult<Vec<Calendar>> {
        config
            .calendars
            .iter_mut()
            .map(|(name, spec)| self.build_calendar(name, spec, range))
            .collect()
    }
}

fn jan_first(year: i32, context: &str) -> HolidayResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| HolidayError::DateOutOfRange {
        title: context.to_string(),
    })
}
