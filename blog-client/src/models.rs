use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<FixedOffset>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<FixedOffset>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}-{:02}-{:02}] {} ({})",
            self.year, self.month, self.day, self.title, self.id
        )?;
        writeln!(f, "{}", self.content)?;
        write!(
            f,
            "created {}, updated {}",
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339()
        )
    }
}

/// Body for creating or editing a post. Unset date fields are filled in by
/// the server with today's date.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<i32>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn on(mut self, year: Option<i32>, month: Option<i32>, day: Option<i32>) -> Self {
        self.year = year;
        self.month = month;
        self.day = day;
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DateSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HelloResponse {
    pub message: String,
}
