//! Simulated YouTube writes. Nothing here calls the upstream API; responses
//! are synthesized and labeled `demoMode` so the dashboard can say so.

use chrono::Utc;
use uuid::Uuid;

use crate::{Error, Result};

use super::{Comment, CommentSnippet, DeletedComment, EditedVideo, Simulated};

pub const DEMO_AUTHOR: &str = "Demo User";

pub fn post_comment(video_id: &str, text: String) -> Result<Simulated<Comment>> {
    if text.trim().is_empty() {
        return Err(Error::Validation("Comment text is required".into()));
    }

    let now = Utc::now();
    let comment = Comment {
        id: format!("demo-{}", Uuid::now_v7()),
        snippet: CommentSnippet {
            author_display_name: DEMO_AUTHOR.into(),
            author_profile_image_url: None,
            text_display: text.clone(),
            text_original: Some(text),
            like_count: 0,
            published_at: Some(now),
            updated_at: Some(now),
        },
    };

    tracing::info!(video_id, comment_id = %comment.id, "simulated comment post");

    Ok(Simulated::new(
        "Demo mode: the comment was not posted to YouTube",
        comment,
    ))
}

pub fn delete_comment(video_id: &str, comment_id: String) -> Simulated<DeletedComment> {
    tracing::info!(video_id, comment_id = %comment_id, "simulated comment delete");

    Simulated::new(
        "Demo mode: the comment was not deleted on YouTube",
        DeletedComment {
            id: comment_id,
            video_id: video_id.into(),
        },
    )
}

pub fn update_video(video_id: &str, title: String, description: String) -> Result<Simulated<EditedVideo>> {
    if title.trim().is_empty() {
        return Err(Error::Validation("Title is required".into()));
    }

    tracing::info!(video_id, "simulated video update");

    Ok(Simulated::new(
        "Demo mode: the video was not updated on YouTube",
        EditedVideo {
            id: video_id.into(),
            title,
            description,
            updated_at: Utc::now(),
        },
    ))
}
