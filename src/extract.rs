//! Pulls achievement entries out of a Steam community stats page.
//!
//! The page keeps every achievement inside `div#mainContents`, one
//! `div.achieveRow` per achievement. Each row holds the icon as an `<img>` and
//! the display name as an `<h3>`.

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::http::{parse_url, HttpError};

const CONTAINER: &str = "#mainContents";
const ROW: &str = ".achieveRow";
const IMAGE: &str = "img[src]";
const NAME: &str = "h3";

/// One achievement found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub image_url: Url,
    pub display_name: String,
}

#[derive(Debug)]
pub enum Extraction {
    /// The page had no `#mainContents` element, usually an error or login page.
    MissingContainer,

    /// The container was there but held no achievement rows.
    NoRows,

    Rows {
        /// Usable entries, in document order.
        entries: Vec<Entry>,
        skipped: Vec<SkippedRow>,
    },
}

impl Extraction {
    pub fn entries(&self) -> &[Entry] {
        match self {
            Extraction::Rows { entries, .. } => entries.as_slice(),
            _ => &[],
        }
    }

    /// Number of rows the page listed, usable or not.
    pub fn rows_found(&self) -> usize {
        match self {
            Extraction::Rows { entries, skipped } => entries.len() + skipped.len(),
            _ => 0,
        }
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        match self {
            Extraction::Rows { skipped, .. } => skipped.as_slice(),
            _ => &[],
        }
    }

    /// Logs every row that could not be turned into an entry.
    pub fn report_skipped(&self) {
        for row in self.skipped() {
            log::warn!("skipping achievement row {}: {}", row.index, row.reason);
        }
    }
}

#[derive(Debug)]
pub struct SkippedRow {
    /// Zero-based position of the row within the container.
    pub index: usize,
    pub reason: RowError,
}

#[derive(Debug, Error)]
pub enum RowError {
    #[error("row has no image with a src attribute")]
    MissingImage,

    #[error("row has no <h3> display name")]
    MissingName,

    #[error("row image has an unusable URL")]
    BadImageUrl {
        #[from]
        source: HttpError,
    },
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Extracts every achievement row from `body`. Relative image links are
/// resolved against `page_url`.
///
/// Broken markup never aborts extraction. A missing container or an empty one
/// is reported and yields no entries; rows missing their image or name are
/// skipped individually.
pub fn extract_entries(page_url: &Url, body: &str) -> Extraction {
    let document = Html::parse_document(body);

    let Some(container) = document.select(&selector(CONTAINER)).next() else {
        log::warn!("no element with id 'mainContents' found on {}", page_url);
        return Extraction::MissingContainer;
    };

    let image = selector(IMAGE);
    let name = selector(NAME);

    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for (index, row) in container.select(&selector(ROW)).enumerate() {
        match parse_row(row, &image, &name, page_url) {
            Ok(entry) => {
                log::trace!("row {}: {:?} -> {}", index, entry.display_name, entry.image_url);
                entries.push(entry);
            }
            Err(reason) => skipped.push(SkippedRow { index, reason }),
        }
    }

    if entries.is_empty() && skipped.is_empty() {
        log::warn!("no elements with class 'achieveRow' found on {}", page_url);
        return Extraction::NoRows;
    }

    log::debug!(
        "extracted {} entries ({} rows skipped)",
        entries.len(),
        skipped.len()
    );

    Extraction::Rows { entries, skipped }
}

fn parse_row(
    row: ElementRef,
    image: &Selector,
    name: &Selector,
    page_url: &Url,
) -> Result<Entry, RowError> {
    let src = row
        .select(image)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty())
        .ok_or(RowError::MissingImage)?;

    let display_name = row
        .select(name)
        .next()
        .map(|heading| heading.text().collect::<String>())
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .ok_or(RowError::MissingName)?;

    let image_url = parse_url(src, Some(page_url))?;

    Ok(Entry {
        image_url,
        display_name,
    })
}
