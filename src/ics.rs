//! Line-oriented writer for iCalendar content.
//!
//! Lines are joined with a bare `\n`; [`to_crlf`] turns a finished document into the
//! `\r\n`-terminated form that goes to disk.

use std::borrow::Cow;

#[derive(Debug, Default)]
pub struct ContentLines {
    buf: String,
}

impl ContentLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// `NAME:value`, value written verbatim.
    pub fn property(&mut self, name: &str, value: &str) -> &mut Self {
        self.buf.push_str(name);
        self.buf.push(':');
        self.buf.push_str(value);
        self.buf.push('\n');
        self
    }

    /// `NAME:value` with the value escaped as iCalendar TEXT.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        let escaped = escape_text(value);
        self.property(name, &escaped)
    }

    /// `NAME;VALUE=DATE:value`.
    pub fn date(&mut self, name: &str, value: &str) -> &mut Self {
        self.buf.push_str(name);
        self.buf.push_str(";VALUE=DATE:");
        self.buf.push_str(value);
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Appends already rendered content unchanged.
    pub fn raw(&mut self, content: &str) -> &mut Self {
        self.buf.push_str(content);
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Escapes backslash, semicolon, comma and newlines (RFC 5545, 3.3.11).
pub fn escape_text(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', ';', ',', '\n', '\r']) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Normalizes every line ending to `\r\n`, leaving existing `\r\n` pairs alone.
pub fn to_crlf(document: &str) -> String {
    let mut out = String::with_capacity(document.len() + document.len() / 16);
    let mut previous = '\0';
    for c in document.chars() {
        if c == '\n' && previous != '\r' {
            out.push('\r');
        }
        out.push(c);
        previous = c;
    }
    out
}
