use crate::{
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{routing::get, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Json, Path, Query,
    },
};

use schemars::JsonSchema;
use serde::Deserialize;

use super::{LogsQuery, DEFAULT_LIMIT};

#[derive(Debug, Deserialize, JsonSchema)]
struct VideoIdPath {
    video_id: String,
}

pub fn router() -> ApiRouter {
    ApiRouter::new().api_route("/api/logs/{video_id}", get(get_logs))
}

async fn get_logs(
    Path(VideoIdPath { video_id }): Path<VideoIdPath>,
    Query(LogsQuery { limit }): Query<LogsQuery>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    // `limit` can narrow the page, never widen it.
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(DEFAULT_LIMIT);

    base.events.query(video_id, limit).await.map(Json)
}
