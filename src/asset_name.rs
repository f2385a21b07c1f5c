use thiserror::Error;

/// Extension given to every thumbnail, whatever format the source image had.
pub const THUMBNAIL_EXTENSION: &str = "jpg";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("display name {display_name:?} leaves nothing to name a file after")]
pub struct EmptyFileName {
    pub display_name: String,
}

/// Derives the thumbnail's file name from an achievement's display name.
///
/// Periods and question marks are dropped. So are path separators, the other
/// characters Windows refuses in file names, and control characters, which
/// keeps every thumbnail directly inside the output directory. Everything else
/// is kept as is. Two names that only differ in dropped characters map to the
/// same file.
pub fn thumbnail_file_name(display_name: &str) -> Result<String, EmptyFileName> {
    let stem: String = display_name
        .chars()
        .filter(|&c| !is_dropped(c))
        .collect();

    if stem.trim().is_empty() {
        return Err(EmptyFileName {
            display_name: display_name.to_owned(),
        });
    }

    Ok(format!("{}.{}", stem, THUMBNAIL_EXTENSION))
}

fn is_dropped(c: char) -> bool {
    matches!(c, '.' | '?' | '/' | '\\' | ':' | '*' | '"' | '<' | '>' | '|') || c.is_control()
}
