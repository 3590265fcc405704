use serde::{Deserialize, Serialize};

use crate::domain::post::{PartialDate, PostDraft, PostId};

// ======================= POSTS =======================

/// Body of `POST /new` and `PUT /edit`.
///
/// Omitted (or zero) date fields default to today; on `/edit` the resolved
/// date selects the post to change. `createdAt`/`updatedAt` in the body are
/// ignored, the server stamps both.
#[derive(Debug, Deserialize)]
pub struct PostPayload {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<PostId>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<i32>,
    #[serde(default)]
    pub day: Option<i32>,
}

impl From<PostPayload> for PostDraft {
    fn from(payload: PostPayload) -> Self {
        Self {
            id: payload.id,
            title: payload.title,
            content: payload.content,
            date: PartialDate::new(payload.year, payload.month, payload.day),
        }
    }
}

/// Body of `DELETE /delete`.
#[derive(Debug, Default, Deserialize)]
pub struct DateKeyPayload {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<i32>,
    #[serde(default)]
    pub day: Option<i32>,
}

impl From<DateKeyPayload> for PartialDate {
    fn from(payload: DateKeyPayload) -> Self {
        PartialDate::new(payload.year, payload.month, payload.day)
    }
}

// ======================= MISC =======================

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_accepts_id_alias_and_ignores_timestamps() {
        let id = PostId::new();
        let payload: PostPayload = serde_json::from_value(json!({
            "id": id.to_string(),
            "title": "t",
            "content": "c",
            "year": 2022,
            "month": 11,
            "day": 23,
            "createdAt": "2020-03-20T14:31:43+13:00",
            "updated_at": "2020-03-20T14:31:43+13:00",
        }))
        .unwrap();

        assert_eq!(payload.id, Some(id));
        assert_eq!(payload.year, Some(2022));
    }

    #[test]
    fn zero_date_fields_become_absent() {
        let payload: PostPayload = serde_json::from_value(json!({
            "title": "t",
            "content": "c",
            "year": 0,
            "month": 0,
            "day": 0,
        }))
        .unwrap();

        assert_eq!(PostDraft::from(payload).date, PartialDate::default());
    }

    #[test]
    fn malformed_id_is_rejected() {
        let result = serde_json::from_value::<PostPayload>(json!({
            "_id": "not-a-uuid",
            "title": "t",
            "content": "c",
        }));

        assert!(result.is_err());
    }

    #[test]
    fn empty_delete_body_means_today() {
        let payload: DateKeyPayload = serde_json::from_value(json!({})).unwrap();

        assert_eq!(PartialDate::from(payload), PartialDate::default());
    }
}
