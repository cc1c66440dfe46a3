mod handlers;
mod model;
mod routes;
mod search;

pub use model::*;

use crate::openapi::aide::axum::ApiRouter;

pub fn router() -> ApiRouter {
    ApiRouter::new().merge(routes::router())
}
