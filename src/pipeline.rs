use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs_err as fs;
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::asset_name::{thumbnail_file_name, EmptyFileName};
use crate::extract::Entry;
use crate::http::{HttpClient, HttpError, HttpResponse};
use crate::thumbnail::{resize_in_place, ThumbnailError, ThumbnailSize};

/// A thumbnail written to the output directory.
#[derive(Debug)]
pub struct Thumbnail {
    pub path: PathBuf,
    pub source_dimensions: (u32, u32),
}

#[derive(Debug, Error)]
pub enum EntryError {
    #[error(transparent)]
    FileName(#[from] EmptyFileName),

    #[error("could not download {url}")]
    Download { url: Url, source: HttpError },

    #[error("image could not be retrieved from {url}: HTTP {status}")]
    Status { url: Url, status: StatusCode },

    #[error("could not resize {}", .path.display())]
    Resize { path: PathBuf, source: ThumbnailError },

    #[error("could not write {}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

impl EntryError {
    /// Filesystem failures mean the output directory itself is unusable, so
    /// there is no point in trying the remaining entries.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EntryError::Io { .. }
                | EntryError::Resize {
                    source: ThumbnailError::Io { .. },
                    ..
                }
        )
    }
}

/// Downloads achievement icons into a directory and shrinks them to
/// thumbnails, one entry at a time.
pub struct Pipeline<'a> {
    client: &'a dyn HttpClient,
    output_dir: PathBuf,
    size: ThumbnailSize,

    /// File names written during this run, mapped to the display name that
    /// produced them.
    written: HashMap<String, String>,
}

impl<'a> Pipeline<'a> {
    pub fn new(client: &'a dyn HttpClient, output_dir: PathBuf, size: ThumbnailSize) -> Self {
        Self {
            client,
            output_dir,
            size,
            written: HashMap::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn process(&mut self, entry: &Entry) -> Result<Thumbnail, EntryError> {
        let file_name = thumbnail_file_name(&entry.display_name)?;
        let path = self.output_dir.join(&file_name);

        let mut response =
            self.client
                .get(&entry.image_url)
                .await
                .map_err(|source| EntryError::Download {
                    url: entry.image_url.clone(),
                    source,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EntryError::Status {
                url: entry.image_url.clone(),
                status,
            });
        }

        // Streamed into a sibling first, so a body that breaks off never
        // replaces or leaves behind a `.jpg`.
        let partial = self.output_dir.join(format!("{}.part", file_name));

        let bytes = match save_body(&mut *response, &partial).await {
            Ok(bytes) => bytes,
            Err(err) => {
                if let Err(cleanup) = fs::remove_file(&partial) {
                    log::debug!("could not remove {}: {}", partial.display(), cleanup);
                }

                return Err(match err {
                    SaveError::Body(source) => EntryError::Download {
                        url: entry.image_url.clone(),
                        source,
                    },
                    SaveError::Io(source) => EntryError::Io {
                        path: partial,
                        source,
                    },
                });
            }
        };

        fs::rename(&partial, &path).map_err(|source| EntryError::Io {
            path: path.clone(),
            source,
        })?;

        if let Some(previous) = self.written.insert(file_name.clone(), entry.display_name.clone()) {
            log::warn!(
                "{:?} and {:?} both map to {}, the later one wins",
                previous,
                entry.display_name,
                file_name
            );
        }

        log::info!("Image successfully downloaded: {}", file_name);
        log::debug!("wrote {} bytes from {}", bytes, entry.image_url);

        let source_dimensions =
            resize_in_place(&path, self.size).map_err(|source| EntryError::Resize {
                path: path.clone(),
                source,
            })?;

        Ok(Thumbnail {
            path,
            source_dimensions,
        })
    }

    /// Processes every entry in order. Failed entries are logged and skipped;
    /// only a fatal error stops the loop early.
    pub async fn run(&mut self, entries: &[Entry]) -> Result<RunSummary, EntryError> {
        let mut summary = RunSummary {
            found: entries.len(),
            ..RunSummary::default()
        };

        for entry in entries {
            match self.process(entry).await {
                Ok(thumbnail) => {
                    log::trace!(
                        "{} resized from {:?} to {}",
                        thumbnail.path.display(),
                        thumbnail.source_dimensions,
                        self.size
                    );
                    summary.saved += 1;
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    log::error!(
                        "Image could not be retrieved for {:?}: {}",
                        entry.display_name,
                        error_chain(&err)
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

enum SaveError {
    Body(HttpError),
    Io(std::io::Error),
}

/// Writes the whole response body to `path`, returning the number of bytes.
async fn save_body(response: &mut dyn HttpResponse, path: &Path) -> Result<usize, SaveError> {
    let mut file = fs::File::create(path).map_err(SaveError::Io)?;
    let mut bytes = 0;

    while let Some(chunk) = response.chunk().await.map_err(SaveError::Body)? {
        file.write_all(&chunk).map_err(SaveError::Io)?;
        bytes += chunk.len();
    }

    file.flush().map_err(SaveError::Io)?;

    Ok(bytes)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Achievements the run was expected to save.
    pub found: usize,
    pub saved: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Entries were expected but not a single one made it to disk.
    pub fn nothing_saved(&self) -> bool {
        self.found > 0 && self.saved == 0
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
