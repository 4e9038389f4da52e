use chrono::{Days, NaiveDate};

use crate::ics::ContentLines;

const DATE_FORMAT: &str = "%Y%m%d";

/// One whole-day occurrence in a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub created: NaiveDate,
    pub recurring_yearly: bool,
    pub start: NaiveDate,
    pub title: String,
    pub identifier: String,
}

impl Event {
    pub fn new(
        created: NaiveDate,
        recurring_yearly: bool,
        start: NaiveDate,
        title: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            created,
            recurring_yearly,
            start,
            title: title.into(),
            identifier: identifier.into(),
        }
    }

    /// Exclusive end of the event: the day after `start`.
    ///
    /// Saturates at chrono's last representable date, which no computed holiday reaches.
    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// `CREATED`/`DTSTAMP` value: the creation date at a fixed midnight UTC.
    pub fn created_stamp(&self) -> String {
        format!("{}T000000Z", self.created.format(DATE_FORMAT))
    }

    pub fn to_ics(&self) -> String {
        let mut lines = ContentLines::new();
        self.write_ics(&mut lines);
        lines.finish()
    }

    pub fn write_ics(&self, lines: &mut ContentLines) {
        let stamp = self.created_stamp();
        lines
            .property("BEGIN", "VEVENT")
            .property("CREATED", &stamp)
            .property("UID", &self.identifier);
        if self.recurring_yearly {
            lines.property("RRULE", "FREQ=YEARLY");
        }
        lines
            .date("DTEND", &self.end().format(DATE_FORMAT).to_string())
            .text("SUMMARY", &self.title)
            .date("DTSTART", &self.start.format(DATE_FORMAT).to_string())
            .property("DTSTAMP", &stamp)
            .property("SEQUENCE", "0")
            .property("END", "VEVENT");
    }
}
