use std::sync::Arc;

use crate::{config::Config, db::DB, events::EventLog, youtube::YouTube};

/// Process-wide resources, created once in `main` and torn down after the server stops.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub conn: DB,
    pub events: EventLog,
    pub youtube: YouTube,
}

impl AppState {
    pub fn new(config: Config, conn: DB) -> crate::Result<Self> {
        let events = EventLog::spawn(conn.clone(), config.event_log_retention);
        let youtube = YouTube::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            conn,
            events,
            youtube,
        })
    }

    /// Drains the event log and closes the database.
    pub async fn shutdown(self) -> crate::Result<()> {
        self.events.shutdown().await;
        self.conn.close().await?;
        Ok(())
    }
}
