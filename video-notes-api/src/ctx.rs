use axum::extract::{Extension, FromRequestParts};

use crate::{events::EventLog, youtube::YouTube, DB};

/// Shared handles every handler receives, injected by `app::create` as extensions.
#[derive(Clone, FromRequestParts)]
pub struct BaseParams {
    #[from_request(via(Extension))]
    pub db: DB,
    #[from_request(via(Extension))]
    pub events: EventLog,
    #[from_request(via(Extension))]
    pub youtube: YouTube,
}

impl BaseParams {
    pub fn new(db: DB, events: EventLog, youtube: YouTube) -> Self {
        Self { db, events, youtube }
    }
}
