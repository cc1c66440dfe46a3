use rusqlite::{params, Row};
use uuid::Uuid;

use crate::{ctx::BaseParams, db, events::Event, Error, Result};

use super::{search::NoteFilter, CreateNote, Note, UpdateNote};

const NOTE_COLUMNS: &str = "id, video_id, title, content, tags, created_at, updated_at";

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        let tags: String = row.get(4)?;
        let tags = serde_json::from_str(&tags)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e)))?;

        Ok(Self {
            id: row.get(0)?,
            video_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            tags,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// Notes for a video, newest first, optionally narrowed by a search term.
pub async fn find_notes(video_id: String, search: Option<String>, BaseParams { db, events, .. }: BaseParams) -> Result<Vec<Note>> {
    let filter = NoteFilter::new(search.as_deref());

    let query_video_id = video_id.clone();
    let notes = db
        .call(move |conn| {
            let notes = conn
                .prepare(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE video_id = ? ORDER BY created_at DESC, rowid DESC"
                ))?
                .query_map(params![query_video_id], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(notes)
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)?;

    let notes = match &filter {
        Some(filter) => notes.into_iter().filter(|note| filter.matches(note)).collect::<Vec<_>>(),
        None => notes,
    };

    events.append(
        video_id,
        Event::NotesViewed {
            search: search.filter(|term| !term.is_empty()),
            count: notes.len(),
        },
    );

    Ok(notes)
}

pub async fn create_note(
    CreateNote {
        video_id,
        title,
        content,
        tags,
    }: CreateNote,
    BaseParams { db, events, .. }: BaseParams,
) -> Result<Note> {
    let tags = serde_json::to_string(&tags).map_err(db::Error::from)?;
    let now = chrono::Utc::now();

    let note = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"INSERT INTO notes (video_id, title, content, tags, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)
                    RETURNING {NOTE_COLUMNS}"#
                ),
                params![video_id, title, content, tags, now, now],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)?;

    events.append(
        note.video_id.clone(),
        Event::NoteCreated {
            note_id: note.id,
            title: note.title.clone(),
        },
    );

    Ok(note)
}

pub async fn update_note(
    note_id: Uuid,
    UpdateNote { title, content, tags }: UpdateNote,
    BaseParams { db, events, .. }: BaseParams,
) -> Result<Note> {
    let tags = serde_json::to_string(&tags).map_err(db::Error::from)?;

    // max() keeps updated_at from falling behind created_at if the clock steps back.
    let note = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"UPDATE notes SET title = ?, content = ?, tags = ?, updated_at = max(?, created_at)
                    WHERE id = ?
                    RETURNING {NOTE_COLUMNS}"#
                ),
                params![title, content, tags, chrono::Utc::now(), note_id],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, "Note not found"))
        .map_err(Error::from)?;

    events.append(
        note.video_id.clone(),
        Event::NoteUpdated {
            note_id: note.id,
            title: note.title.clone(),
        },
    );

    Ok(note)
}

pub async fn delete_note(note_id: Uuid, BaseParams { db, events, .. }: BaseParams) -> Result<Note> {
    let note = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"DELETE FROM notes
                    WHERE id = ?
                    RETURNING {NOTE_COLUMNS}"#
                ),
                params![note_id],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, "Note not found"))
        .map_err(Error::from)?;

    events.append(note.video_id.clone(), Event::NoteDeleted { note_id: note.id });

    Ok(note)
}
