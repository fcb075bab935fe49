//! Parse a directory-index HTML page into listing entries.

use scraper::{Html, Selector};

use super::ListingEntry;

/// Extracts one entry per `<td valign="top">` cell that holds an `<a href>`.
///
/// Cells without an anchor are ignored. The parent-directory row is returned
/// like any other; callers filter it with [`ListingEntry::is_parent`].
pub(crate) fn parse_entries(html: &str) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);
    let (Ok(cell_sel), Ok(anchor_sel)) = (Selector::parse("td[valign]"), Selector::parse("a[href]"))
    else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for cell in document.select(&cell_sel) {
        let top = cell
            .value()
            .attr("valign")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("top"));
        if !top {
            continue;
        }
        let Some(anchor) = cell.select(&anchor_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let name = anchor.text().collect::<String>().trim().to_string();
        entries.push(ListingEntry::new(name, href.trim()));
    }
    entries
}
