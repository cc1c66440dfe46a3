use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An action taken against a video, stored as `action` + `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", content = "details", rename_all = "snake_case")]
pub enum Event {
    VideoViewed {
        title: String,
    },
    CommentsViewed {
        count: usize,
    },
    NotesViewed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        search: Option<String>,
        count: usize,
    },
    NoteCreated {
        note_id: Uuid,
        title: String,
    },
    NoteUpdated {
        note_id: Uuid,
        title: String,
    },
    NoteDeleted {
        note_id: Uuid,
    },
    /// Demo mode, nothing is sent to YouTube.
    CommentPosted {
        comment_id: String,
        text: String,
    },
    /// Demo mode, nothing is sent to YouTube.
    CommentDeleted {
        comment_id: String,
    },
    /// Demo mode, nothing is sent to YouTube.
    VideoUpdated {
        title: String,
        description: String,
    },
}

impl Event {
    pub fn action(&self) -> &'static str {
        match self {
            Event::VideoViewed { .. } => "video_viewed",
            Event::CommentsViewed { .. } => "comments_viewed",
            Event::NotesViewed { .. } => "notes_viewed",
            Event::NoteCreated { .. } => "note_created",
            Event::NoteUpdated { .. } => "note_updated",
            Event::NoteDeleted { .. } => "note_deleted",
            Event::CommentPosted { .. } => "comment_posted",
            Event::CommentDeleted { .. } => "comment_deleted",
            Event::VideoUpdated { .. } => "video_updated",
        }
    }

    /// Splits the event into the `action` and `details` columns.
    pub fn to_columns(&self) -> serde_json::Result<(&'static str, String)> {
        let mut value = serde_json::to_value(self)?;
        let details = value
            .get_mut("details")
            .map(Value::take)
            .unwrap_or_else(|| Value::Object(Default::default()));

        Ok((self.action(), serde_json::to_string(&details)?))
    }

    pub fn from_columns(action: &str, details: &str) -> serde_json::Result<Self> {
        let details: Value = serde_json::from_str(details)?;
        serde_json::from_value(serde_json::json!({
            "action": action,
            "details": details,
        }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventLogEntry {
    pub id: Uuid,
    pub video_id: String,
    #[serde(flatten)]
    pub event: Event,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogsQuery {
    /// Maximum number of entries, newest first. Capped at 50.
    pub limit: Option<usize>,
}
