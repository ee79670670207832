//! Topic models: the external `Topic` value and its persisted `TopicEntity` row.

use serde::{Deserialize, Serialize};

/// A topic a user can follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub url: String,
    pub image_url: String,
}

/// A row of the `topics` table. Primary key is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: String,
}

impl From<TopicEntity> for Topic {
    fn from(entity: TopicEntity) -> Self {
        Topic {
            id: entity.id,
            name: entity.name,
            short_description: entity.short_description,
            long_description: entity.long_description,
            url: entity.url,
            image_url: entity.image_url,
        }
    }
}

/// Result of inserting one row with insert-or-ignore semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was stored under this (positive, never reused) row id.
    Inserted(i64),
    /// A row with the same id already existed and was left untouched.
    Ignored,
}

impl InsertOutcome {
    /// Row id sentinel used for ignored rows in the numeric form.
    pub const IGNORED_ROW_ID: i64 = -1;

    /// Numeric form: the row id, or `-1` when the row was ignored.
    pub fn row_id(&self) -> i64 {
        match self {
            InsertOutcome::Inserted(id) => *id,
            InsertOutcome::Ignored => Self::IGNORED_ROW_ID,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Wire representation of an [`InsertOutcome`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcomeResponse {
    pub outcome: String,
    pub row_id: i64,
}

impl From<InsertOutcome> for InsertOutcomeResponse {
    fn from(outcome: InsertOutcome) -> Self {
        let label = match outcome {
            InsertOutcome::Inserted(_) => "inserted",
            InsertOutcome::Ignored => "ignored",
        };
        Self {
            outcome: label.to_string(),
            row_id: outcome.row_id(),
        }
    }
}

/// Request body for deleting topics by id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTopicsRequest {
    pub ids: Vec<String>,
}
