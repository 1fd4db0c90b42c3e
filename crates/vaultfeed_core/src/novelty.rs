use std::collections::HashSet;

use crate::{Entry, EntryKind, EntryLists};

/// Result of comparing one run's candidates with the persisted entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoveltyOutcome {
    /// Persisted entries followed by the novel ones, per kind.
    pub merged: EntryLists,
    /// Candidates whose id was not yet known, in extraction order.
    pub novel: EntryLists,
    /// Candidates skipped because their id was already known or repeated on the page.
    pub skipped: usize,
}

/// Pure set difference of `candidates` against `stored`, keyed on `id` per kind.
///
/// Persisted entries are never modified or removed; a candidate sharing an id
/// with a stored entry is skipped even if its name differs. Repeats of an id
/// within the same candidate sequence are collapsed to the first occurrence.
pub fn diff_against_store(stored: EntryLists, candidates: EntryLists) -> NoveltyOutcome {
    let mut merged = stored;
    let mut novel = EntryLists::new();
    let mut skipped = 0;

    let EntryLists { shows, movies } = candidates;
    for (kind, sequence) in [(EntryKind::Show, shows), (EntryKind::Movie, movies)] {
        let known = merged.sequence_mut(kind);
        let mut seen: HashSet<String> = known.iter().map(|entry| entry.id.clone()).collect();
        let mut fresh: Vec<Entry> = Vec::new();
        for candidate in sequence {
            if seen.insert(candidate.id.clone()) {
                fresh.push(candidate);
            } else {
                skipped += 1;
            }
        }
        known.extend(fresh.iter().cloned());
        *novel.sequence_mut(kind) = fresh;
    }

    NoveltyOutcome {
        merged,
        novel,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_compared_independently() {
        let stored = EntryLists {
            shows: vec![Entry::show("7", "Seven")],
            movies: Vec::new(),
        };
        let now = chrono::Utc::now();
        let candidates = EntryLists {
            shows: Vec::new(),
            movies: vec![Entry::movie("7", "Seven the movie", now)],
        };

        let outcome = diff_against_store(stored, candidates);
        assert_eq!(outcome.novel.movies.len(), 1);
        assert_eq!(outcome.merged.shows.len(), 1);
        assert_eq!(outcome.merged.movies.len(), 1);
        assert_eq!(outcome.skipped, 0);
    }
}
