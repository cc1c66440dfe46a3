use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tokio::sync::{mpsc, oneshot};

use crate::{db, Error, Result, DB};

use super::{Event, EventLogEntry};

pub const DEFAULT_LIMIT: usize = 50;

/// Appends queued ahead of the writer before new ones are dropped.
pub const QUEUE_CAPACITY: usize = 1024;

enum Message {
    Append {
        video_id: String,
        event: Event,
        timestamp: DateTime<Utc>,
    },
    Flush {
        respond_to: oneshot::Sender<()>,
    },
    Shutdown {
        respond_to: oneshot::Sender<()>,
    },
}

/// Append-only action log.
///
/// Appends are best effort: they are queued to a single writer task and a
/// failed write or a full queue is only reported through `tracing` and
/// [`EventLog::failures`], never to the caller.
#[derive(Clone)]
pub struct EventLog {
    db: DB,
    sender: mpsc::Sender<Message>,
    failures: Arc<AtomicU64>,
}

impl EventLog {
    /// Starts the writer task. `retention` caps the entries kept per video, `0` keeps all.
    pub fn spawn(db: DB, retention: usize) -> Self {
        Self::with_capacity(db, retention, QUEUE_CAPACITY)
    }

    pub fn with_capacity(db: DB, retention: usize, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        let failures = Arc::new(AtomicU64::new(0));

        tokio::spawn(run_writer(db.clone(), retention, receiver, failures.clone()));

        Self { db, sender, failures }
    }

    pub fn append(&self, video_id: impl Into<String>, event: Event) {
        let action = event.action();
        let msg = Message::Append {
            video_id: video_id.into(),
            event,
            timestamp: Utc::now(),
        };

        match self.sender.try_send(msg) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(action, "event log queue is full, dropping entry");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(action, "event log is closed, dropping entry");
            }
        }
    }

    /// Most recent `limit` entries for `video_id`, newest first.
    pub async fn query(&self, video_id: String, limit: usize) -> Result<Vec<EventLogEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.db
            .call(move |conn| {
                let entries = conn
                    .prepare(
                        r#"SELECT id, video_id, action, details, timestamp FROM event_logs
                        WHERE video_id = ?
                        ORDER BY timestamp DESC, rowid DESC
                        LIMIT ?"#,
                    )?
                    .query_map(params![video_id, limit], |row| EventLogEntry::try_from(row))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(entries)
            })
            .await
            .map_err(db::Error::from)
            .map_err(Error::from)
    }

    /// Resolves once every append issued before this call has been handled.
    pub async fn flush(&self) {
        let (respond_to, receiver) = oneshot::channel();
        if self.sender.send(Message::Flush { respond_to }).await.is_ok() {
            let _ = receiver.await;
        }
    }

    /// Writes what is queued, then stops the writer. Later appends are dropped.
    pub async fn shutdown(&self) {
        let (respond_to, receiver) = oneshot::channel();
        if self.sender.send(Message::Shutdown { respond_to }).await.is_ok() {
            let _ = receiver.await;
        }
    }

    /// Appends that could not be persisted since startup.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

async fn run_writer(
    db: DB,
    retention: usize,
    mut receiver: mpsc::Receiver<Message>,
    failures: Arc<AtomicU64>,
) {
    let mut stopped = None;

    while let Some(msg) = receiver.recv().await {
        match msg {
            Message::Append {
                video_id,
                event,
                timestamp,
            } => {
                let action = event.action();
                if let Err(error) = insert_entry(&db, video_id, event, timestamp, retention).await {
                    failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(action, ?error, "failed to persist event log entry");
                }
            }
            Message::Flush { respond_to } => {
                let _ = respond_to.send(());
            }
            Message::Shutdown { respond_to } => {
                receiver.close();
                stopped = Some(respond_to);
            }
        }
    }

    tracing::debug!("event log writer stopped");
    if let Some(respond_to) = stopped {
        let _ = respond_to.send(());
    }
}

async fn insert_entry(
    db: &DB,
    video_id: String,
    event: Event,
    timestamp: DateTime<Utc>,
    retention: usize,
) -> db::Result<()> {
    let (action, details) = event.to_columns()?;
    let retention = i64::try_from(retention).unwrap_or(i64::MAX);

    db.call(move |conn| {
        conn.execute(
            "INSERT INTO event_logs (video_id, action, details, timestamp) VALUES (?, ?, ?, ?)",
            params![video_id, action, details, timestamp],
        )?;

        if retention > 0 {
            conn.execute(
                r#"DELETE FROM event_logs
                WHERE video_id = ?1 AND id NOT IN (
                    SELECT id FROM event_logs WHERE video_id = ?1
                    ORDER BY timestamp DESC, rowid DESC
                    LIMIT ?2
                )"#,
                params![video_id, retention],
            )?;
        }

        Ok(())
    })
    .await
    .map_err(db::Error::from)
}

impl<'a> TryFrom<&Row<'a>> for EventLogEntry {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        let action: String = row.get(2)?;
        let details: String = row.get(3)?;
        let event = Event::from_columns(&action, &details)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e)))?;

        Ok(Self {
            id: row.get(0)?,
            video_id: row.get(1)?,
            event,
            timestamp: row.get(4)?,
        })
    }
}
