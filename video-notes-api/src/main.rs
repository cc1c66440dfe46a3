mod config;

mod app;
mod ctx;
mod db;
mod errors;
mod events;
mod notes;
mod openapi;
mod state;
mod telemetry;
mod youtube;

use std::net::SocketAddr;

use aide::axum::ApiRouter;
use app::AppParams;
use config::Config;
pub use db::{init_db, DB};
pub use errors::{Error, Result};
use state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = Config::from_env()?;

    telemetry::setup_tracing(config.log_json);

    let conn = init_db(&config.database_url).await?;
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, conn)?;

    let (app, _) = app::create(AppParams {
        state: state.clone(),
        router: router(),
    })
    .await?;

    let app = telemetry::add_tracing_layer(app).layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    state.shutdown().await
}

pub fn router() -> ApiRouter {
    ApiRouter::new()
        .merge(youtube::router())
        .merge(notes::router())
        .merge(events::router())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(?error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(?error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
