mod client;
mod demo;
mod model;
mod routes;

pub use client::YouTube;
pub use model::*;

use crate::openapi::aide::axum::ApiRouter;

pub fn router() -> ApiRouter {
    ApiRouter::new().merge(routes::router())
}
