use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use vaultfeed_core::{Entry, EntryKind};
use vaultfeed_engine::{CatalogExtractor, ParseError, TableCatalogExtractor};

fn page(show_rows: &str, movie_rows: &str) -> String {
    format!(
        r#"<html><head><title>Catalog</title></head><body>
        <h2>Recent shows</h2>
        <table>
          <tr><th>ID</th><th>Name</th><th>Download</th></tr>
          {show_rows}
        </table>
        <h2>Recent movies</h2>
        <table>
          <thead><tr><th>ID</th><th>Name</th><th>Download</th></tr></thead>
          <tbody>{movie_rows}</tbody>
        </table>
        </body></html>"#
    )
}

#[test]
fn first_table_is_shows_and_second_is_movies() {
    let at = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    let markup = page(
        r#"<tr><td>101</td><td>Show A</td><td><a href="/download/101">get</a></td></tr>
           <tr><td>102</td><td>Show B</td><td></td></tr>"#,
        r#"<tr><td>201</td><td>Movie X</td><td></td></tr>"#,
    );

    let lists = TableCatalogExtractor.extract(&markup, at).unwrap();

    assert_eq!(
        lists.shows,
        vec![Entry::show("101", "Show A"), Entry::show("102", "Show B")]
    );
    assert_eq!(lists.movies, vec![Entry::movie("201", "Movie X", at)]);
}

#[test]
fn cells_are_trimmed_and_nested_markup_flattened() {
    let at = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    let markup = page(
        "<tr><td>\n   301 </td><td>  <b>The</b> Show &amp; Co \n</td></tr>",
        "",
    );

    let lists = TableCatalogExtractor.extract(&markup, at).unwrap();

    assert_eq!(lists.shows, vec![Entry::show("301", "The Show & Co")]);
    assert!(lists.movies.is_empty());
}

#[test]
fn rows_with_blank_id_or_name_are_dropped() {
    let at = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    let markup = page(
        r#"<tr><td> </td><td>No id</td></tr>
           <tr><td>401</td><td>   </td></tr>
           <tr><td>402</td></tr>
           <tr><td>403</td><td>Kept</td></tr>"#,
        r#"<tr><td colspan="3">Nothing this week</td></tr>"#,
    );

    let lists = TableCatalogExtractor.extract(&markup, at).unwrap();

    assert_eq!(lists.shows, vec![Entry::show("403", "Kept")]);
    assert!(lists.movies.is_empty());
}

#[test]
fn counts_follow_data_rows_per_table() {
    let at = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    let shows: String = (0..4)
        .map(|i| format!("<tr><td>s{i}</td><td>Show {i}</td></tr>"))
        .collect();
    let movies: String = (0..7)
        .map(|i| format!("<tr><td>m{i}</td><td>Movie {i}</td></tr>"))
        .collect();

    let lists = TableCatalogExtractor.extract(&page(&shows, &movies), at).unwrap();

    assert_eq!(lists.shows.len(), 4);
    assert_eq!(lists.movies.len(), 7);
    assert!(lists.shows.iter().all(|e| e.kind == EntryKind::Show && e.discovered_at.is_none()));
    assert!(lists
        .movies
        .iter()
        .all(|e| e.kind == EntryKind::Movie && e.discovered_at == Some(at)));
}

#[test]
fn repeated_ids_on_the_page_are_passed_through() {
    let at = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    let markup = page(
        "<tr><td>101</td><td>Show A</td></tr><tr><td>101</td><td>Show A</td></tr>",
        "",
    );

    let lists = TableCatalogExtractor.extract(&markup, at).unwrap();

    assert_eq!(lists.shows.len(), 2);
}

#[test]
fn single_table_is_a_parse_error() {
    let at = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    let markup = "<table><tr><th>ID</th><th>Name</th></tr><tr><td>1</td><td>A</td></tr></table>";

    let err = TableCatalogExtractor.extract(markup, at).unwrap_err();

    assert_eq!(
        err,
        ParseError::MissingTable {
            index: 1,
            kind: EntryKind::Movie,
            found: 1
        }
    );
}

#[test]
fn page_without_tables_is_a_parse_error() {
    let at = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();

    let err = TableCatalogExtractor
        .extract("<html><body><p>Maintenance</p></body></html>", at)
        .unwrap_err();

    assert!(matches!(err, ParseError::MissingTable { index: 0, found: 0, .. }));
}
