use aide::scalar::Scalar;
use axum::{
    middleware::{self},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

use rand::Rng;
use serde_json::json;

use crate::{
    config::Config,
    errors::{self, on_error, ErrorResponse},
    events::EventLog,
    openapi::{
        self,
        aide::axum::{ApiRouter, IntoApiResponse},
        OpenApi,
    },
    state::AppState,
};

pub struct AppParams {
    pub state: AppState,
    pub router: ApiRouter,
}

pub async fn create(AppParams { state, router }: AppParams) -> errors::Result<(Router, OpenApi)> {
    let mut api = OpenApi::default();

    let docs_router = axum::Router::new().route(
        "/__docs__",
        get(Scalar::new("/__docs__/spec.json")
            .with_title("Video Notes API")
            .axum_handler()),
    );

    let app = ApiRouter::new()
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .route("/__docs__/spec.json", get(serve_docs))
        .merge(docs_router)
        .merge(router)
        .finish_api_with(&mut api, |t| {
            t.title("Video Notes").default_response::<openapi::Json<ErrorResponse>>()
        })
        .layer(
            ServiceBuilder::new()
                .layer(Extension(state.conn.clone()))
                .layer(Extension(state.events.clone()))
                .layer(Extension(state.youtube.clone()))
                .layer(Extension(state.config.clone()))
                .layer(Extension(Arc::new(api.clone())))
                .layer(middleware::from_fn(on_error)),
        );

    Ok((app, api))
}

async fn version(Extension(config): Extension<Arc<Config>>) -> impl IntoResponse {
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat(Extension(events): Extension<EventLog>) -> impl IntoResponse {
    let mut rng = rand::thread_rng();
    let random: u32 = rng.gen_range(0..=10000);

    Json(json!({
        "status" : "ok",
        "random": random,
        "event_log_failures": events.failures(),
    }))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
    Json(api.as_ref()).into_response()
}
