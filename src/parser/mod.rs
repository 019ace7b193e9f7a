//! Connection status page extraction
//!
//! Turns the modem's `cmconnectionstatus.html` into a
//! [`ConnectionStatusSnapshot`]. The page holds several `.simpleTable`
//! elements; the bonded channel tables are recognised by the text of their
//! first `<strong>` heading. Extraction is layout-coupled to this device:
//! the first [`HEADER_ROWS`](columns::HEADER_ROWS) rows of each table are
//! skipped and cells are mapped by position through [`columns`].
//!
//! Extraction never fails on cell contents. Unknown tables are skipped and
//! unparsable numbers become zero.

pub mod columns;
pub mod numeric;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use crate::errors::{SourceError, SourceResult};
use crate::models::ConnectionStatusSnapshot;
use columns::{ColumnSetter, DOWNSTREAM_COLUMNS, HEADER_ROWS, UPSTREAM_COLUMNS, apply_columns};

pub const UPSTREAM_HEADING: &str = "Upstream Bonded Channels";
pub const DOWNSTREAM_HEADING: &str = "Downstream Bonded Channels";

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".simpleTable").expect("static selector"));
static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("strong").expect("static selector"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("static selector"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableKind {
    Upstream,
    Downstream,
}

impl TableKind {
    fn classify(heading: &str) -> Option<Self> {
        if heading.contains(UPSTREAM_HEADING) {
            Some(Self::Upstream)
        } else if heading.contains(DOWNSTREAM_HEADING) {
            Some(Self::Downstream)
        } else {
            None
        }
    }
}

/// Extract both bonded channel tables from a status page
pub fn extract(document: &str) -> ConnectionStatusSnapshot {
    let html = Html::parse_document(document);
    let mut snapshot = ConnectionStatusSnapshot::default();

    for table in html.select(&TABLE_SELECTOR) {
        let heading = table
            .select(&HEADING_SELECTOR)
            .next()
            .map(|strong| strong.text().collect::<String>())
            .unwrap_or_default();

        match TableKind::classify(&heading) {
            Some(TableKind::Upstream) => {
                snapshot
                    .upstream
                    .extend(extract_rows(table, &UPSTREAM_COLUMNS));
            }
            Some(TableKind::Downstream) => {
                snapshot
                    .downstream
                    .extend(extract_rows(table, &DOWNSTREAM_COLUMNS));
            }
            None => trace!("Skipping unrecognised table with heading {:?}", heading.trim()),
        }
    }

    debug!(
        upstream = snapshot.upstream.len(),
        downstream = snapshot.downstream.len(),
        "Extracted connection status"
    );
    snapshot
}

/// Extract from a raw response body
///
/// The body must be valid UTF-8; anything else is a document error and
/// aborts the poll cycle.
pub fn extract_bytes(body: &[u8]) -> SourceResult<ConnectionStatusSnapshot> {
    let document = std::str::from_utf8(body)
        .map_err(|e| SourceError::document(format!("status page is not valid UTF-8: {e}")))?;
    Ok(extract(document))
}

fn extract_rows<T: Default>(table: ElementRef<'_>, columns: &[ColumnSetter<T>]) -> Vec<T> {
    table
        .select(&ROW_SELECTOR)
        .skip(HEADER_ROWS)
        .map(|row| {
            let cells: Vec<String> = row
                .children()
                .filter_map(ElementRef::wrap)
                .map(|cell| cell.text().collect())
                .collect();
            apply_columns(columns, cells.iter().map(String::as_str))
        })
        .collect()
}
