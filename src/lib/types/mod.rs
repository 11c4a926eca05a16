//! Shared data types for the content pipeline.
//! Implemented as newtypes to enforce invariants.

use std::fmt;

use serde::Serialize;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::well_known::{Rfc2822, Rfc3339},
    macros::format_description,
};

/// Publication instant of a post, normalised to UTC.
///
/// Authors usually write a bare `YYYY-MM-DD`, which is read as midnight UTC.
/// Full RFC 3339 timestamps and `YYYY-MM-DD HH:MM:SS` are accepted as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublishDate(OffsetDateTime);

impl PublishDate {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Ok(date) = Date::parse(s, format_description!("[year]-[month]-[day]")) {
            return Some(Self::from_date(date));
        }

        if let Ok(at) = OffsetDateTime::parse(s, &Rfc3339) {
            return Some(Self(at.to_offset(UtcOffset::UTC)));
        }

        PrimitiveDateTime::parse(
            s,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
        .ok()
        .map(|at| Self(at.assume_utc()))
    }

    pub fn from_date(date: Date) -> Self {
        Self(date.midnight().assume_utc())
    }

    /// Date-only rendering, `YYYY-MM-DD`.
    pub fn as_str(&self) -> String {
        format_day(self.as_date())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn as_date(&self) -> Date {
        self.0.date()
    }

    pub fn to_rfc2822(&self) -> String {
        self.0.format(&Rfc2822).unwrap_or_default()
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.format(&Rfc3339).unwrap_or_default()
    }
}

/// `YYYY-MM-DD`.
pub fn format_day(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// Post author. Constant for this site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests;
