use crate::{
    ctx::BaseParams,
    events::Event,
    openapi::{
        aide::{
            axum::{
                routing::{delete, get},
                ApiRouter, IntoApiResponse,
            },
            NoApi,
        },
        Json, Path,
    },
    Result,
};

use schemars::JsonSchema;
use serde::Deserialize;

use super::{demo, Comment, CommentThread, EditedVideo, PostComment, Simulated, UpdateVideo, Video};

#[derive(Debug, Deserialize, JsonSchema)]
struct VideoIdPath {
    video_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CommentIdPath {
    video_id: String,
    comment_id: String,
}

pub fn router() -> ApiRouter {
    ApiRouter::new()
        .api_route("/api/video/{video_id}", get(get_video).put(update_video))
        .api_route("/api/comments/{video_id}", get(get_comments).post(post_comment))
        .api_route("/api/comments/{video_id}/{comment_id}", delete(delete_comment))
}

async fn get_video(
    Path(VideoIdPath { video_id }): Path<VideoIdPath>,
    NoApi(BaseParams { youtube, events, .. }): NoApi<BaseParams>,
) -> Result<Json<Video>> {
    let video = youtube.video(&video_id).await?;

    events.append(
        video_id,
        Event::VideoViewed {
            title: video.snippet.title.clone(),
        },
    );

    Ok(Json(video))
}

async fn get_comments(
    Path(VideoIdPath { video_id }): Path<VideoIdPath>,
    NoApi(BaseParams { youtube, events, .. }): NoApi<BaseParams>,
) -> Result<Json<Vec<CommentThread>>> {
    let threads = youtube.comment_threads(&video_id).await?;

    events.append(video_id, Event::CommentsViewed { count: threads.len() });

    Ok(Json(threads))
}

async fn post_comment(
    Path(VideoIdPath { video_id }): Path<VideoIdPath>,
    NoApi(BaseParams { events, .. }): NoApi<BaseParams>,
    Json(PostComment { text }): Json<PostComment>,
) -> Result<Json<Simulated<Comment>>> {
    let res = demo::post_comment(&video_id, text)?;

    events.append(
        video_id,
        Event::CommentPosted {
            comment_id: res.data.id.clone(),
            text: res.data.snippet.text_display.clone(),
        },
    );

    Ok(Json(res))
}

async fn delete_comment(
    Path(CommentIdPath { video_id, comment_id }): Path<CommentIdPath>,
    NoApi(BaseParams { events, .. }): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    let res = demo::delete_comment(&video_id, comment_id);

    events.append(
        video_id,
        Event::CommentDeleted {
            comment_id: res.data.id.clone(),
        },
    );

    Json(res)
}

async fn update_video(
    Path(VideoIdPath { video_id }): Path<VideoIdPath>,
    NoApi(BaseParams { events, .. }): NoApi<BaseParams>,
    Json(UpdateVideo { title, description }): Json<UpdateVideo>,
) -> Result<Json<Simulated<EditedVideo>>> {
    let res = demo::update_video(&video_id, title, description)?;

    events.append(
        video_id,
        Event::VideoUpdated {
            title: res.data.title.clone(),
            description: res.data.description.clone(),
        },
    );

    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use crate::{
        errors::{ErrorResponse, Result},
        events::{Event, DEFAULT_LIMIT},
        state::AppState,
        tests::{fake_youtube, test_server_with, youtube_client},
    };
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn server(api_key: Option<&str>) -> Result<(TestServer, AppState)> {
        let youtube = youtube_client(fake_youtube().await, api_key);
        test_server_with(super::router(), youtube).await
    }

    async fn logged(state: &AppState, video_id: &str) -> Result<Vec<Event>> {
        state.events.flush().await;
        Ok(state
            .events
            .query(video_id.into(), DEFAULT_LIMIT)
            .await?
            .into_iter()
            .map(|entry| entry.event)
            .collect())
    }

    #[tokio::test]
    async fn get_video() -> Result<()> {
        let (server, state) = server(Some("key")).await?;

        let response = server.get("/api/video/abc").await;

        assert_eq!(response.status_code(), 200);
        let video = response.json::<Value>();
        assert_eq!(video["id"], "abc");
        assert_eq!(video["snippet"]["title"], "A video about abc");
        assert_eq!(
            logged(&state, "abc").await?,
            [Event::VideoViewed {
                title: "A video about abc".into()
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_video() -> Result<()> {
        let (server, state) = server(Some("key")).await?;

        let response = server.get("/api/video/missing").await;

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<ErrorResponse>().error, "not_found");
        assert!(logged(&state, "missing").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_video_without_key() -> Result<()> {
        let (server, _) = server(None).await?;

        let response = server.get("/api/video/abc").await;

        assert_eq!(response.status_code(), 500);
        assert_eq!(response.json::<ErrorResponse>().error, "configuration");
        Ok(())
    }

    #[tokio::test]
    async fn get_video_upstream_failure() -> Result<()> {
        let (server, _) = server(Some("revoked")).await?;

        let response = server.get("/api/video/abc").await;

        assert_eq!(response.status_code(), 500);
        assert_eq!(response.json::<ErrorResponse>().error, "upstream");
        Ok(())
    }

    #[tokio::test]
    async fn get_comments() -> Result<()> {
        let (server, state) = server(Some("key")).await?;

        let response = server.get("/api/comments/abc").await;

        assert_eq!(response.status_code(), 200);
        let threads = response.json::<Vec<Value>>();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0]["snippet"]["topLevelComment"]["snippet"]["textDisplay"], "First!");
        assert_eq!(logged(&state, "abc").await?, [Event::CommentsViewed { count: 2 }]);
        Ok(())
    }

    #[tokio::test]
    async fn post_comment_is_simulated() -> Result<()> {
        let (server, state) = server(Some("key")).await?;

        let response = server
            .post("/api/comments/abc")
            .json(&json!({ "text": "Nice one" }))
            .await;

        assert_eq!(response.status_code(), 200);
        let body = response.json::<Value>();
        assert_eq!(body["demoMode"], true);
        assert_eq!(body["data"]["snippet"]["textDisplay"], "Nice one");

        let events = logged(&state, "abc").await?;
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Event::CommentPosted { text, .. } if text == "Nice one"));
        Ok(())
    }

    #[tokio::test]
    async fn post_blank_comment() -> Result<()> {
        let (server, state) = server(Some("key")).await?;

        let response = server.post("/api/comments/abc").json(&json!({ "text": "" })).await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<ErrorResponse>().error, "validation");
        assert!(logged(&state, "abc").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn delete_comment_is_simulated() -> Result<()> {
        let (server, state) = server(Some("key")).await?;

        let response = server.delete("/api/comments/abc/c1").await;

        assert_eq!(response.status_code(), 200);
        let body = response.json::<Value>();
        assert_eq!(body["demoMode"], true);
        assert_eq!(body["data"]["id"], "c1");
        assert_eq!(
            logged(&state, "abc").await?,
            [Event::CommentDeleted {
                comment_id: "c1".into()
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn update_video_is_simulated() -> Result<()> {
        let (server, state) = server(Some("key")).await?;

        let response = server
            .put("/api/video/abc")
            .json(&json!({ "title": "New title", "description": "New description" }))
            .await;

        assert_eq!(response.status_code(), 200);
        let body = response.json::<Value>();
        assert_eq!(body["demoMode"], true);
        assert_eq!(body["data"]["title"], "New title");
        assert_eq!(logged(&state, "abc").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_video_without_title() -> Result<()> {
        let (server, _) = server(Some("key")).await?;

        let response = server
            .put("/api/video/abc")
            .json(&json!({ "title": " ", "description": "New description" }))
            .await;

        assert_eq!(response.status_code(), 400);
        Ok(())
    }
}
