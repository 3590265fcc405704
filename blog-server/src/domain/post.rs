use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, SubsecRound};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Store identifier of a post. Opaque to callers, rendered as a UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PostId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Business key of a post. At most one post exists per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DateKey {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl DateKey {
    pub fn new(year: i32, month: i32, day: i32) -> Result<Self, DomainError> {
        if !(1..=9999).contains(&year) {
            return Err(DomainError::Validation(format!(
                "year {year} is out of range"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(DomainError::Validation(format!(
                "month {month} is out of range"
            )));
        }
        let valid_day = u32::try_from(day)
            .ok()
            .and_then(|d| NaiveDate::from_ymd_opt(year, month as u32, d))
            .is_some();
        if !valid_day {
            return Err(DomainError::Validation(format!(
                "day {day} does not exist in {year}-{month}"
            )));
        }
        Ok(Self { year, month, day })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month() as i32,
            day: date.day() as i32,
        }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

/// A date with every segment optional.
///
/// Used as the lookup filter (absent segments match anything) and as the
/// request-side date, where absent segments default to today.
/// A segment of `0` counts as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartialDate {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
}

impl PartialDate {
    pub fn new(year: Option<i32>, month: Option<i32>, day: Option<i32>) -> Self {
        let present = |v: Option<i32>| v.filter(|v| *v != 0);
        Self {
            year: present(year),
            month: present(month),
            day: present(day),
        }
    }

    pub fn from_segments(year: i32, month: i32, day: i32) -> Self {
        Self::new(Some(year), Some(month), Some(day))
    }

    pub fn matches(&self, key: &DateKey) -> bool {
        self.year.is_none_or(|y| y == key.year)
            && self.month.is_none_or(|m| m == key.month)
            && self.day.is_none_or(|d| d == key.day)
    }

    /// Fills absent segments from `today` and validates the result.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateKey, DomainError> {
        let fallback = DateKey::from_date(today);
        DateKey::new(
            self.year.unwrap_or(fallback.year),
            self.month.unwrap_or(fallback.month),
            self.day.unwrap_or(fallback.day),
        )
    }
}

impl From<DateKey> for PartialDate {
    fn from(key: DateKey) -> Self {
        Self::new(Some(key.year), Some(key.month), Some(key.day))
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segment = |v: Option<i32>| v.map_or_else(|| "*".to_string(), |v| v.to_string());
        write!(
            f,
            "{}-{}-{}",
            segment(self.year),
            segment(self.month),
            segment(self.day)
        )
    }
}

/// Caller-supplied post before defaults are applied. Timestamps are never
/// caller-supplied.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub id: Option<PostId>,
    pub title: String,
    pub content: String,
    pub date: PartialDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", alias = "id")]
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    #[serde(rename = "createdAt", alias = "created_at", with = "iso_seconds")]
    pub created_at: DateTime<FixedOffset>,
    #[serde(rename = "updatedAt", alias = "updated_at", with = "iso_seconds")]
    pub updated_at: DateTime<FixedOffset>,
}

impl Post {
    /// Validates a draft. Missing id and date segments are filled in; both
    /// timestamps are `now`.
    pub fn from_draft(draft: PostDraft, now: DateTime<FixedOffset>) -> Result<Self, DomainError> {
        if draft.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".into()));
        }
        if draft.content.is_empty() {
            return Err(DomainError::Validation("content must not be empty".into()));
        }
        let key = draft.date.resolve(now.date_naive())?;
        let now = now.trunc_subsecs(0);

        Ok(Self {
            id: draft.id.unwrap_or_default(),
            title: draft.title,
            content: draft.content,
            year: key.year,
            month: key.month,
            day: key.day,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn key(&self) -> DateKey {
        DateKey {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }

    pub fn touch(&mut self, now: DateTime<FixedOffset>) {
        self.updated_at = now.trunc_subsecs(0);
    }
}

// ISO-8601 with offset and whole seconds, e.g. 2020-03-20T14:31:43+13:00
mod iso_seconds {
    use chrono::{DateTime, FixedOffset, SecondsFormat};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw).map_err(serde::de::Error::custom)
    }
}
