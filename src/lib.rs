pub mod builder;
pub mod calendar;
pub mod config;
pub mod dates;
pub mod error;
pub mod event;
pub mod ics;
pub mod identifier;
pub mod persistence;
pub mod pipeline;

pub use builder::{CalendarBuilder, YearRange};
pub use calendar::{Calendar, DEFAULT_NAME_PREFIX};
pub use config::{CalendarSpec, FixedDateSpec, HolidayConfig, MovableFeastSpec};
pub use dates::{DayOffset, MonthDay, easter_sunday};
pub use error::{FieldParseError, HolidayError, HolidayResult};
pub use event::Event;
pub use identifier::{IdentifierRegistry, Scope, ScopeKey, StoredIdentifiers};
pub use persistence::{
    load_config_from_json, resolve_output_dir, save_config_to_json, write_calendar,
};
pub use pipeline::{GenerateOptions, GenerateSummary, WrittenCalendar};
