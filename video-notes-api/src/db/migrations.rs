use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

// Timestamps are stored as rusqlite's chrono text, which sorts chronologically.
lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![
        M::up(
            r#"
            CREATE TABLE notes (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),
                video_id TEXT NOT NULL,

                title TEXT NOT NULL,
                content TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '[]', -- JSON array of strings

                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            );

            CREATE INDEX notes_video_id_created_at ON notes (video_id, created_at DESC);
        "#
        ),
        M::up(
            r#"
            CREATE TABLE event_logs (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),
                video_id TEXT NOT NULL,

                action TEXT NOT NULL, -- video_viewed | note_created | ...
                details TEXT NOT NULL DEFAULT '{}',

                timestamp DATETIME NOT NULL
            );

            CREATE INDEX event_logs_video_id_timestamp ON event_logs (video_id, timestamp DESC);
        "#
        ),
    ]);
}
