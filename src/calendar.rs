use crate::event::Event;
use crate::ics::{self, ContentLines};

/// Label placed in front of every calendar name.
pub const DEFAULT_NAME_PREFIX: &str = "Feiertage";

/// A named iCalendar document holding events in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub name_prefix: String,
    pub title: String,
    pub events: Vec<Event>,
}

impl Calendar {
    pub fn new(name_prefix: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            title: title.into(),
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn extend<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        self.events.extend(events);
    }

    /// Value of the `X-WR-CALNAME` line.
    pub fn display_name(&self) -> String {
        if self.name_prefix.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.name_prefix, self.title)
        }
    }

    /// File name the document is written to.
    pub fn file_name(&self) -> String {
        format!("{}.ics", self.title)
    }

    /// The document with `\n` line endings and no newline after the footer.
    pub fn to_ics(&self) -> String {
        let mut lines = ContentLines::new();
        lines
            .property("BEGIN", "VCALENDAR")
            .property("VERSION", "2.0")
            .text("X-WR-CALNAME", &self.display_name())
            .blank();
        for event in &self.events {
            event.write_ics(&mut lines);
        }
        lines.raw("END:VCALENDAR");
        lines.finish()
    }

    /// The document as written to disk, with `\r\n` line endings.
    pub fn to_ics_crlf(&self) -> String {
        ics::to_crlf(&self.to_ics())
    }
}
