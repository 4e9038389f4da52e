use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FieldParseError, HolidayError, HolidayResult};

/// First year of the Gregorian calendar; the computus is meaningless before it.
pub const MIN_YEAR: i32 = 1583;
pub const MAX_YEAR: i32 = 9999;

/// Largest accepted distance from Easter Sunday, in days.
const MAX_OFFSET_DAYS: u64 = 36_500;

/// Date of Easter Sunday in the Gregorian calendar.
///
/// Uses the anonymous Gregorian algorithm (Meeus/Jones/Butcher), which agrees with the
/// ecclesiastical tables for every Gregorian year.
pub fn easter_sunday(year: i32) -> HolidayResult<NaiveDate> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(HolidayError::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        });
    }

    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or(HolidayError::YearOutOfRange {
        year,
        min: MIN_YEAR,
        max: MAX_YEAR,
    })
}

/// Signed whole-day distance from Easter Sunday.
///
/// Any `-` in the text makes the offset negative; the magnitude is what remains once the
/// minus signs, an optional leading `+` and an optional ISO-8601 `P...D` wrapper are removed.
/// So `"+39"`, `"39"` and `"P39D"` are equivalent, as are `"-2"` and `"-P2D"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayOffset {
    magnitude: u64,
    negative: bool,
    raw: String,
}

impl DayOffset {
    pub fn days(&self) -> i64 {
        let magnitude = self.magnitude as i64;
        if self.negative { -magnitude } else { magnitude }
    }

    /// Moves `date` by this offset. `None` if the result leaves chrono's date range.
    pub fn apply(&self, date: NaiveDate) -> Option<NaiveDate> {
        let days = Days::new(self.magnitude);
        if self.negative {
            date.checked_sub_days(days)
        } else {
            date.checked_add_days(days)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for DayOffset {
    type Err = FieldParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let negative = raw.contains('-');
        let unsigned: String = raw.chars().filter(|c| *c != '-').collect();
        let body = unsigned.trim();
        let body = body.strip_prefix('+').unwrap_or(body);
        let body = match body.strip_prefix(['P', 'p']) {
            Some(rest) => rest
                .strip_suffix(['D', 'd'])
                .ok_or_else(|| FieldParseError::new(raw, "only day durations are supported"))?,
            None => body,
        };

        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldParseError::new(
                raw,
                "offset must be a whole number of days",
            ));
        }
        let magnitude: u64 = body
            .parse()
            .map_err(|_| FieldParseError::new(raw, "offset is too large"))?;
        if magnitude > MAX_OFFSET_DAYS {
            return Err(FieldParseError::new(raw, "offset is too large"));
        }

        Ok(Self {
            magnitude,
            negative,
            raw: raw.to_string(),
        })
    }
}

impl TryFrom<String> for DayOffset {
    type Error = FieldParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayOffset> for String {
    fn from(value: DayOffset) -> Self {
        value.raw
    }
}

impl fmt::Display for DayOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Month and day of a fixed-date holiday, written `"MMDD"` (or `"MM-DD"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    month: u32,
    day: u32,
    raw: String,
}

impl MonthDay {
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The date in `year`, or `None` when the day does not exist there (29 February).
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }

    /// First occurrence in `year` or later. Only 29 February skips years, at most eight
    /// of them (1897 to 1904). `None` once the search passes [`MAX_YEAR`].
    pub fn first_on_or_after(&self, year: i32) -> Option<NaiveDate> {
        (year..=MAX_YEAR).take(9).find_map(|y| self.in_year(y))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for MonthDay {
    type Err = FieldParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits: String = match trimmed.len() {
            4 => trimmed.to_string(),
            5 if trimmed.as_bytes()[2] == b'-' => trimmed.replacen('-', "", 1),
            _ => return Err(FieldParseError::new(raw, "month-day must look like MMDD")),
        };
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldParseError::new(raw, "month-day must look like MMDD"));
        }

        let month: u32 = digits[..2]
            .parse()
            .map_err(|_| FieldParseError::new(raw, "month-day must look like MMDD"))?;
        let day: u32 = digits[2..]
            .parse()
            .map_err(|_| FieldParseError::new(raw, "month-day must look like MMDD"))?;

        // 2000 is a leap year, so 0229 passes here and is checked per year later.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(FieldParseError::new(raw, "no such day in the calendar"));
        }

        Ok(Self {
            month,
            day,
            raw: raw.to_string(),
        })
    }
}

impl TryFrom<String> for MonthDay {
    type Error = FieldParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.raw
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
