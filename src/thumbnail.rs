use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use fs_err as fs;
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
        }
    }
}

impl fmt::Display for ThumbnailSize {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid dimensions {0:?} - please pass your dimensions in the WxH format (e.g. 64x64, 128x128, etc)")]
pub struct SizeError(String);

impl FromStr for ThumbnailSize {
    type Err = SizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || SizeError(value.to_owned());

        let (width, height) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self { width, height })
    }
}

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("could not read or write the thumbnail file")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("file is not an image that could be resized")]
    Image {
        #[from]
        source: image::ImageError,
    },
}

/// Decodes the image at `path`, scales it to exactly `size` and writes it back
/// to the same path as JPEG. Returns the dimensions of the original image.
///
/// The file is only replaced once the new encoding is complete, so a payload
/// that fails to decode stays on disk as downloaded.
pub fn resize_in_place(path: &Path, size: ThumbnailSize) -> Result<(u32, u32), ThumbnailError> {
    let raw = fs::read(path)?;
    let original = image::load_from_memory(&raw)?;
    let source_dimensions = original.dimensions();

    log::debug!(
        "read image with dimensions {:?}, resizing to {}",
        source_dimensions,
        size
    );

    let resized = original.resize_exact(size.width, size.height, FilterType::CatmullRom);

    // JPEG has no alpha channel.
    let resized = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut encoded = Vec::new();
    resized.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Jpeg)?;

    fs::write(path, encoded)?;

    Ok(source_dimensions)
}
