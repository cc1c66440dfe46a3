use super::Note;

/// Case-insensitive substring match over title, content and tags.
#[derive(Debug, Clone)]
pub struct NoteFilter {
    needle: String,
}

impl NoteFilter {
    /// `None` when there is nothing to search for; an empty term means "all notes".
    pub fn new(term: Option<&str>) -> Option<Self> {
        term.filter(|term| !term.is_empty()).map(|term| Self {
            needle: term.to_lowercase(),
        })
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.contains(&note.title) || self.contains(&note.content) || note.tags.iter().any(|tag| self.contains(tag))
    }

    fn contains(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }
}
