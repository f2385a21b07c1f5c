use std::io::{self, BufWriter, Write};

use anyhow::Result;
use clap::Args;
use reqwest::Url;

use crate::{
    asset_name::thumbnail_file_name,
    extract::{extract_entries, Entry},
    http::{HttpClient, ReqwestClient},
    options::Global,
    page::fetch_page,
};

#[derive(Debug, Args)]
pub struct ListOptions {
    /// The achievements page to read.
    #[clap(env("ACHIEVEMENT_THUMBS_URL"))]
    pub url: Url,
}

pub async fn list(global: Global, options: ListOptions) -> Result<()> {
    let client = ReqwestClient::new(global.timeout())?;

    let entries = fetch_entries(&client, &options.url).await?;

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    write_listing(&mut output, &entries)?;
    output.flush()?;

    Ok(())
}

async fn fetch_entries(client: &dyn HttpClient, url: &Url) -> Result<Vec<Entry>> {
    let page = fetch_page(client, url).await?;
    let extraction = extract_entries(&page.url, &page.body);
    extraction.report_skipped();

    log::info!("Found {} achievements", extraction.entries().len());

    Ok(extraction.entries().to_vec())
}

/// One line per entry: the file it would be saved as, then its image URL,
/// separated by a tab.
fn write_listing(output: &mut impl Write, entries: &[Entry]) -> io::Result<()> {
    for entry in entries {
        let file_name = match thumbnail_file_name(&entry.display_name) {
            Ok(name) => name,
            Err(err) => {
                log::warn!("{}", err);
                continue;
            }
        };

        writeln!(output, "{}\t{}", file_name, entry.image_url)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::stub::StubClient;

    #[tokio::test]
    async fn lists_without_downloading() {
        let page = "http://x/stats/1/achievements";
        let listing = r#"<div id="mainContents">
            <div class="achieveRow"><img src="http://x/a.png"><h3>Win the Game?</h3></div>
            <div class="achieveRow"><img src="http://x/b.png"><h3>??</h3></div>
            <div class="achieveRow"><img src="http://x/c.png"><h3>100%.Complete</h3></div>
        </div>"#;
        let client = StubClient::new().with(page, 200, listing);

        let entries = fetch_entries(&client, &Url::parse(page).unwrap())
            .await
            .unwrap();

        let mut output = Vec::new();
        write_listing(&mut output, &entries).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Win the Game.jpg\thttp://x/a.png\n100%Complete.jpg\thttp://x/c.png\n"
        );
        assert_eq!(client.requests(), [page]);
    }
}
