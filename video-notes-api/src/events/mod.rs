mod event_log;
mod model;
mod routes;

pub use event_log::{EventLog, DEFAULT_LIMIT};
pub use model::*;

use crate::openapi::aide::axum::ApiRouter;

pub fn router() -> ApiRouter {
    ApiRouter::new().merge(routes::router())
}
