use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use vaultfeed_core::{Entry, EntryKind, EntryLists};

use crate::decode::DecodeError;

/// Position of each listing among the page's tables.
const SHOWS_TABLE: usize = 0;
const MOVIES_TABLE: usize = 1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("catalog page has no table #{index} ({kind} listing); found {found} table(s)")]
    MissingTable {
        index: usize,
        kind: EntryKind,
        found: usize,
    },
    #[error("catalog page could not be decoded: {0}")]
    Decode(#[from] DecodeError),
}

pub trait CatalogExtractor: Send + Sync {
    /// Turn page markup into show and movie candidates.
    ///
    /// `discovered_at` is stamped on movie candidates only.
    fn extract(&self, markup: &str, discovered_at: DateTime<Utc>) -> Result<EntryLists, ParseError>;
}

/// Reads the first table as shows and the second as movies.
///
/// In both tables the first row is a header; every following row contributes
/// `(id, name)` from its first two cells when both are non-empty after trimming.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableCatalogExtractor;

impl CatalogExtractor for TableCatalogExtractor {
    fn extract(&self, markup: &str, discovered_at: DateTime<Utc>) -> Result<EntryLists, ParseError> {
        let doc = Html::parse_document(markup);
        let query = TableQuery::new();
        let tables: Vec<ElementRef> = query.tables(&doc).collect();

        let listing = |index: usize, kind: EntryKind| -> Result<Vec<Entry>, ParseError> {
            let table = tables.get(index).ok_or(ParseError::MissingTable {
                index,
                kind,
                found: tables.len(),
            })?;
            let entries = query
                .data_rows(*table)
                .filter_map(|row| {
                    let id = TableQuery::cell_text(row, 0)?;
                    let name = TableQuery::cell_text(row, 1)?;
                    Some(match kind {
                        EntryKind::Show => Entry::show(id, name),
                        EntryKind::Movie => Entry::movie(id, name, discovered_at),
                    })
                })
                .collect();
            Ok(entries)
        };

        Ok(EntryLists {
            shows: listing(SHOWS_TABLE, EntryKind::Show)?,
            movies: listing(MOVIES_TABLE, EntryKind::Movie)?,
        })
    }
}

/// The three markup primitives extraction is built on.
struct TableQuery {
    table: Selector,
    row: Selector,
}

impl TableQuery {
    fn new() -> Self {
        Self {
            table: parse_selector("table"),
            row: parse_selector("tr"),
        }
    }

    /// All tables in document order.
    fn tables<'a>(&'a self, doc: &'a Html) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        doc.select(&self.table)
    }

    /// Rows of `table` after the header row.
    fn data_rows<'a>(&'a self, table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        table.select(&self.row).skip(1)
    }

    /// Trimmed text of the `index`th cell, or `None` when absent or blank.
    fn cell_text(row: ElementRef<'_>, index: usize) -> Option<String> {
        let cell = row.children().filter_map(ElementRef::wrap).nth(index)?;
        let text = cell.text().collect::<String>();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

fn parse_selector(css: &'static str) -> Selector {
    match Selector::parse(css) {
        Ok(selector) => selector,
        Err(err) => unreachable!("static selector {css:?} failed to parse: {err}"),
    }
}
