use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Show,
    Movie,
}

impl EntryKind {
    pub const ALL: [EntryKind; 2] = [EntryKind::Show, EntryKind::Movie];

    /// Lowercase label used in feed titles and guid paths.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Show => "show",
            EntryKind::Movie => "movie",
        }
    }

    /// Only movies carry a first-seen timestamp.
    pub fn records_discovery_time(self) -> bool {
        matches!(self, EntryKind::Movie)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single catalog item. `id` is the only identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub kind: EntryKind,
    pub discovered_at: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn show(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: EntryKind::Show,
            discovered_at: None,
        }
    }

    pub fn movie(
        id: impl Into<String>,
        name: impl Into<String>,
        discovered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: EntryKind::Movie,
            discovered_at: Some(discovered_at),
        }
    }
}

/// Shows and movies kept as two independent ordered sequences.
///
/// Used for persisted state, for extracted candidates and for the novel
/// subset of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryLists {
    pub shows: Vec<Entry>,
    pub movies: Vec<Entry>,
}

impl EntryLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(&self, kind: EntryKind) -> &[Entry] {
        match kind {
            EntryKind::Show => &self.shows,
            EntryKind::Movie => &self.movies,
        }
    }

    pub fn sequence_mut(&mut self, kind: EntryKind) -> &mut Vec<Entry> {
        match kind {
            EntryKind::Show => &mut self.shows,
            EntryKind::Movie => &mut self.movies,
        }
    }

    pub fn len(&self) -> usize {
        self.shows.len() + self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty() && self.movies.is_empty()
    }

    pub fn contains_id(&self, kind: EntryKind, id: &str) -> bool {
        self.sequence(kind).iter().any(|entry| entry.id == id)
    }

    /// First id that appears twice within one sequence, if any.
    pub fn first_duplicate_id(&self) -> Option<(EntryKind, &str)> {
        EntryKind::ALL.into_iter().find_map(|kind| {
            let mut seen = std::collections::HashSet::new();
            self.sequence(kind)
                .iter()
                .find(|entry| !seen.insert(entry.id.as_str()))
                .map(|entry| (kind, entry.id.as_str()))
        })
    }
}
