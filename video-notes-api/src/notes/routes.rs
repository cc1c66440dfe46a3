use crate::{
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{routing::get, routing::post, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Json, Path, Query,
    },
};

use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

use super::{CreateNote, DeleteNoteResponse, FindNotesQuery, UpdateNote};

use super::handlers;

/// `GET` reads this segment as a video ID, `PUT`/`DELETE` as a note ID.
#[derive(Debug, Deserialize, JsonSchema)]
struct VideoIdPath {
    id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteIdPath {
    id: Uuid,
}

pub fn router() -> ApiRouter {
    ApiRouter::new()
        .api_route("/api/notes", post(create_note))
        .api_route(
            "/api/notes/{id}",
            get(find_notes).put(update_note).delete(delete_note),
        )
}

async fn find_notes(
    Path(VideoIdPath { id }): Path<VideoIdPath>,
    Query(FindNotesQuery { search }): Query<FindNotesQuery>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::find_notes(id, search, base).await.map(Json)
}

async fn create_note(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateNote>) -> impl IntoApiResponse {
    handlers::create_note(args, base).await.map(Json)
}

async fn update_note(
    Path(NoteIdPath { id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<UpdateNote>,
) -> impl IntoApiResponse {
    handlers::update_note(id, args, base).await.map(Json)
}

async fn delete_note(Path(NoteIdPath { id }): Path<NoteIdPath>, NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::delete_note(id, base).await.map(|note| {
        Json(DeleteNoteResponse {
            message: "Note deleted successfully".into(),
            id: note.id,
        })
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        errors::{ErrorResponse, Result},
        notes::{DeleteNoteResponse, Note},
        tests::{fake_youtube, test_server, test_server_with, youtube_client},
    };
    use serde_json::json;

    #[tokio::test]
    async fn find_notes() -> Result<()> {
        let (server, state) = test_server(super::router()).await?;

        state
            .conn
            .call(|conn| {
                conn.execute_batch(
                    r#"
                    INSERT INTO notes (video_id, title, content, created_at, updated_at) VALUES ('abc', 'first', '1', '2024-05-01 10:00:00+00:00', '2024-05-01 10:00:00+00:00');
                    INSERT INTO notes (video_id, title, content, created_at, updated_at) VALUES ('abc', 'second', '2', '2024-05-02 10:00:00+00:00', '2024-05-02 10:00:00+00:00');
                    INSERT INTO notes (video_id, title, content, created_at, updated_at) VALUES ('xyz', 'third', '3', '2024-05-03 10:00:00+00:00', '2024-05-03 10:00:00+00:00');
                    "#,
                )
                .unwrap();
                Ok(())
            })
            .await
            .unwrap();

        let response = server.get("/api/notes/abc").await;

        assert_eq!(response.status_code(), 200);
        let titles = response
            .json::<Vec<Note>>()
            .into_iter()
            .map(|note| note.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, ["second", "first"]);
        Ok(())
    }

    #[tokio::test]
    async fn search_notes() -> Result<()> {
        let (server, _) = test_server(super::router()).await?;

        for (title, tags) in [("T1", json!(["demo"])), ("T2", json!(["other"]))] {
            server
                .post("/api/notes")
                .json(&json!({ "videoId": "abc", "title": title, "content": "hello world", "tags": tags }))
                .await;
        }

        let response = server.get("/api/notes/abc").add_query_param("search", "DEM").await;

        assert_eq!(response.status_code(), 200);
        let notes = response.json::<Vec<Note>>();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "T1");
        Ok(())
    }

    #[tokio::test]
    async fn create_note() -> Result<()> {
        let (server, _) = test_server(super::router()).await?;

        let response = server
            .post("/api/notes")
            .json(&json!({
                "videoId": "abc",
                "title": "T1",
                "content": "hello world",
                "tags": ["x", "y"]
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        let note = response.json::<Note>();
        assert_eq!(note.title, "T1");
        assert_eq!(note.tags, ["x", "y"]);
        assert_eq!(note.created_at, note.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn create_note_without_tags() -> Result<()> {
        let (server, _) = test_server(super::router()).await?;

        let response = server
            .post("/api/notes")
            .json(&json!({ "videoId": "abc", "title": "T1", "content": "hello" }))
            .await;

        assert_eq!(response.status_code(), 200);
        assert!(response.json::<Note>().tags.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_note_with_malformed_body() -> Result<()> {
        let (server, _) = test_server(super::router()).await?;

        let response = server.post("/api/notes").json(&json!({ "title": "T1" })).await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<ErrorResponse>().error, "json_validation");
        Ok(())
    }

    #[tokio::test]
    async fn update_note() -> Result<()> {
        let (server, _) = test_server(super::router()).await?;

        let created = server
            .post("/api/notes")
            .json(&json!({ "videoId": "abc", "title": "T1", "content": "hello", "tags": ["x"] }))
            .await
            .json::<Note>();

        let response = server
            .put(&format!("/api/notes/{}", created.id))
            .json(&json!({ "title": "T2", "content": "bye", "tags": [] }))
            .await;

        assert_eq!(response.status_code(), 200);
        let note = response.json::<Note>();
        assert_eq!(note.title, "T2");
        assert_eq!(note.content, "bye");
        assert!(note.tags.is_empty());
        assert_eq!(note.created_at, created.created_at);
        assert!(note.updated_at >= created.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_note() -> Result<()> {
        let (server, _) = test_server(super::router()).await?;

        let response = server
            .put("/api/notes/018f6138-5b4f-722d-97c5-29b927cedbd4")
            .json(&json!({ "title": "T2", "content": "bye", "tags": [] }))
            .await;

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<ErrorResponse>().message.as_deref(), Some("Note not found"));
        Ok(())
    }

    #[tokio::test]
    async fn delete_note() -> Result<()> {
        let (server, state) = test_server(super::router()).await?;

        let created = server
            .post("/api/notes")
            .json(&json!({ "videoId": "abc", "title": "T1", "content": "hello" }))
            .await
            .json::<Note>();

        let response = server.delete(&format!("/api/notes/{}", created.id)).await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<DeleteNoteResponse>().id, created.id);

        let count = state
            .conn
            .call(|conn| {
                conn.query_row::<u32, _, _>("select count(*) from notes", [], |r| r.get(0))
                    .map_err(|e| e.into())
            })
            .await
            .unwrap();

        assert_eq!(count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_note() -> Result<()> {
        let (server, _) = test_server(super::router()).await?;

        let response = server.delete("/api/notes/018f6138-5b4f-722d-97c5-29b927cedbd4").await;

        assert_eq!(response.status_code(), 404);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_note_id() -> Result<()> {
        let (server, _) = test_server(super::router()).await?;

        let response = server.delete("/api/notes/not-a-uuid").await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<ErrorResponse>().error, "path_validation");
        Ok(())
    }

    #[tokio::test]
    async fn event_log_failure_does_not_fail_requests() -> Result<()> {
        let youtube = youtube_client(fake_youtube().await, Some("key"));
        let (server, state) = test_server_with(crate::router(), youtube).await?;

        state
            .conn
            .call(|conn| conn.execute_batch("DROP TABLE event_logs").map_err(|e| e.into()))
            .await?;

        let response = server
            .post("/api/notes")
            .json(&json!({ "videoId": "abc", "title": "T1", "content": "hello" }))
            .await;
        assert_eq!(response.status_code(), 200);
        let created = response.json::<Note>();

        let response = server.get("/api/notes/abc").await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Vec<Note>>().len(), 1);

        let response = server
            .put(&format!("/api/notes/{}", created.id))
            .json(&json!({ "title": "T2", "content": "bye", "tags": [] }))
            .await;
        assert_eq!(response.status_code(), 200);

        let response = server.delete(&format!("/api/notes/{}", created.id)).await;
        assert_eq!(response.status_code(), 200);

        let response = server.get("/api/video/abc").await;
        assert_eq!(response.status_code(), 200);

        state.events.flush().await;
        assert_eq!(state.events.failures(), 5);
        Ok(())
    }
}
