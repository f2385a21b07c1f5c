mod download;
mod list;

use clap::Subcommand;
pub use download::*;
pub use list::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Downloads every achievement icon listed on a stats page and resizes
    /// them into thumbnails.
    Download(DownloadOptions),

    /// Prints the achievements found on a stats page, and the file each one
    /// would be saved as, without downloading anything.
    List(ListOptions),
}
