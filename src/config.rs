use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::dates::{DayOffset, MonthDay};
use crate::error::{HolidayError, HolidayResult};
use crate::identifier::{Scope, StoredIdentifiers};

/// Prefix of the per-year identifier keys written by older configurations (`uid_2014`).
const LEGACY_YEAR_KEY_PREFIX: &str = "uid_";

/// The whole configuration file: calendar name to calendar definition, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayConfig {
    pub calendars: IndexMap<String, CalendarSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarSpec {
    /// Holidays at a fixed distance from Easter Sunday, keyed by title.
    #[serde(default)]
    pub easter: IndexMap<String, MovableFeastSpec>,
    /// Holidays on the same month and day every year, keyed by title.
    #[serde(default)]
    pub repeat: IndexMap<String, FixedDateSpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovableFeastSpec {
    #[serde(default, alias = "diff", skip_serializing_if = "Option::is_none")]
    pub offset: Option<DayOffset>,
    #[serde(default, alias = "uid", skip_serializing_if = "Option::is_none")]
    pub stored_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stored_identifiers_by_year: BTreeMap<i32, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedDateSpec {
    #[serde(default, alias = "date", skip_serializing_if = "Option::is_none")]
    pub month_day: Option<MonthDay>,
    #[serde(default, alias = "uid", skip_serializing_if = "Option::is_none")]
    pub stored_identifier: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HolidayConfig {
    /// Parses a configuration document and folds legacy identifier keys into place.
    pub fn from_json_str(input: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(input)?;
        config.migrate_legacy_identifiers();
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Moves `uid_<year>` entries into `storedIdentifiersByYear`.
    pub fn migrate_legacy_identifiers(&mut self) {
        for calendar in self.calendars.values_mut() {
            for spec in calendar.easter.values_mut() {
                spec.migrate_legacy_identifiers();
            }
        }
    }

    /// Checks every entry carries the field its kind requires and every calendar name can
    /// be used as a file name.
    pub fn validate(&self) -> HolidayResult<()> {
        for (name, calendar) in &self.calendars {
            validate_file_stem(name)?;
            for (title, spec) in &calendar.easter {
                spec.offset(name, title)?;
            }
            for (title, spec) in &calendar.repeat {
                spec.month_day(name, title)?;
            }
        }
        self.warn_on_shared_identifiers();
        Ok(())
    }

    fn warn_on_shared_identifiers(&self) {
        let mut seen: HashMap<&str, String> = HashMap::new();
        for (name, calendar) in &self.calendars {
            let movable = calendar.easter.iter().flat_map(|(title, spec)| {
                let global = spec
                    .stored_identifier
                    .iter()
                    .map(move |id| (id.as_str(), format!("{name}/{title}")));
                let yearly = spec
                    .stored_identifiers_by_year
                    .iter()
                    .map(move |(year, id)| (id.as_str(), format!("{name}/{title}_{year}")));
                global.chain(yearly)
            });
            let fixed = calendar.repeat.iter().flat_map(|(title, spec)| {
                spec.stored_identifier
                    .iter()
                    .map(move |id| (id.as_str(), format!("{name}/{title}")))
            });

            for (identifier, location) in movable.chain(fixed) {
                if let Some(previous) = seen.get(identifier) {
                    warn!(
                        %identifier,
                        first = %previous,
                        second = %location,
                        "identifier is shared by two entries"
                    );
                } else {
                    seen.insert(identifier, location);
                }
            }
        }
    }
}

impl CalendarSpec {
    pub fn event_count(&self, years: usize) -> usize {
        self.easter.len() * years + self.repeat.len()
    }
}

impl MovableFeastSpec {
    pub fn new(offset: DayOffset) -> Self {
        Self {
            offset: Some(offset),
            ..Self::default()
        }
    }

    pub fn offset(&self, calendar: &str, title: &str) -> HolidayResult<&DayOffset> {
        self.offset.as_ref().ok_or_else(|| HolidayError::MissingField {
            calendar: calendar.to_string(),
            title: title.to_string(),
            field: "offset",
        })
    }

    fn migrate_legacy_identifiers(&mut self) {
        let extra = std::mem::take(&mut self.extra);
        for (key, value) in extra {
            let year = key
                .strip_prefix(LEGACY_YEAR_KEY_PREFIX)
                .and_then(|suffix| suffix.parse::<i32>().ok());
            match (year, value) {
                (Some(year), Value::String(identifier)) => {
                    self.stored_identifiers_by_year
                        .entry(year)
                        .or_insert(identifier);
                }
                (_, value) => {
                    self.extra.insert(key, value);
                }
            }
        }
    }
}

impl FixedDateSpec {
    pub fn new(month_day: MonthDay) -> Self {
        Self {
            month_day: Some(month_day),
            ..Self::default()
        }
    }

    pub fn month_day(&self, calendar: &str, title: &str) -> HolidayResult<&MonthDay> {
        self.month_day.as_ref().ok_or_else(|| HolidayError::MissingField {
            calendar: calendar.to_string(),
            title: title.to_string(),
            field: "monthDay",
        })
    }
}

impl StoredIdentifiers for MovableFeastSpec {
    fn stored_identifier(&self, scope: Scope) -> Option<&str> {
        match scope {
            Scope::Title => self.stored_identifier.as_deref(),
            Scope::Year(year) => self.stored_identifiers_by_year.get(&year).map(String::as_str),
        }
    }

    fn store_identifier(&mut self, scope: Scope, identifier: String) {
        match scope {
            Scope::Title => self.stored_identifier = Some(identifier),
            Scope::Year(year) => {
                self.stored_identifiers_by_year.insert(year, identifier);
            }
        }
    }
}

/// Fixed-date entries recur every year under one identifier, whatever the scope.
impl StoredIdentifiers for FixedDateSpec {
    fn stored_identifier(&self, _scope: Scope) -> Option<&str> {
        self.stored_identifier.as_deref()
    }

    fn store_identifier(&mut self, _scope: Scope, identifier: String) {
        self.stored_identifier = Some(identifier);
    }
}

/// Calendar names double as output file stems.
pub fn validate_file_stem(name: &str) -> HolidayResult<()> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative path component")
    } else if name.contains(['/', '\\', '\0']) {
        Some("name contains a path separator")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(HolidayError::InvalidField {
            calendar: name.to_string(),
            title: name.to_string(),
            field: "calendar name",
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
