use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use reqwest::Url;

use crate::{
    extract::extract_entries,
    http::{HttpClient, ReqwestClient},
    options::Global,
    page::fetch_page,
    pipeline::{Pipeline, RunSummary},
    storage::{default_output_dir, ensure_output_dir},
    thumbnail::ThumbnailSize,
};

#[derive(Debug, Args)]
pub struct DownloadOptions {
    /// The achievements page to read, for example
    /// https://steamcommunity.com/stats/1177980/achievements
    #[clap(env("ACHIEVEMENT_THUMBS_URL"))]
    pub url: Url,

    /// The directory to put thumbnails in. Defaults to an 'achievements'
    /// directory next to this executable.
    #[clap(long)]
    pub output_dir: Option<PathBuf>,

    /// The size every thumbnail is scaled to, in the WxH format.
    #[clap(long, default_value = "64x64")]
    pub size: ThumbnailSize,
}

pub async fn download(global: Global, options: DownloadOptions) -> Result<()> {
    let client = ReqwestClient::new(global.timeout())?;

    let summary = download_with(&client, options).await?;

    if summary.nothing_saved() {
        bail!(
            "none of the {} achievements on the page could be saved",
            summary.found
        );
    }

    Ok(())
}

async fn download_with(client: &dyn HttpClient, options: DownloadOptions) -> Result<RunSummary> {
    let output_dir = match options.output_dir {
        Some(path) => path,
        None => default_output_dir()?,
    };

    ensure_output_dir(&output_dir)?;

    let page = fetch_page(client, &options.url).await?;
    let extraction = extract_entries(&page.url, &page.body);
    extraction.report_skipped();

    let mut pipeline = Pipeline::new(client, output_dir, options.size);
    let summary = pipeline.run(extraction.entries()).await?;

    let skipped_rows = extraction.skipped().len();

    log::info!(
        "Saved {} of {} achievements to {}",
        summary.saved,
        summary.found + skipped_rows,
        pipeline.output_dir().display()
    );

    if summary.failed > 0 || skipped_rows > 0 {
        log::warn!(
            "{} images could not be retrieved, {} rows could not be read",
            summary.failed,
            skipped_rows
        );
    }

    Ok(RunSummary {
        found: extraction.rows_found(),
        ..summary
    })
}
