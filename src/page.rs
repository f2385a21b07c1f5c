use anyhow::{Context, Result};
use reqwest::Url;

use crate::http::HttpClient;

/// A fetched stats page, kept only long enough to extract entries from it.
#[derive(Debug)]
pub struct Page {
    /// Where the body was finally served from; relative image links resolve
    /// against this.
    pub url: Url,
    pub body: String,
}

/// Fetches the listing page. Error pages are returned like any other page,
/// extraction will simply find nothing in them.
pub async fn fetch_page(client: &dyn HttpClient, url: &Url) -> Result<Page> {
    let response = client
        .get(url)
        .await
        .with_context(|| format!("could not fetch achievement page {}", url))?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        log::warn!("achievement page {} answered with HTTP {}", url, status);
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("could not read achievement page {}", url))?;

    log::debug!("fetched {} ({} bytes)", final_url, body.len());

    Ok(Page {
        url: final_url,
        body,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::stub::StubClient;

    #[tokio::test]
    async fn error_pages_still_return_their_body() {
        let client = StubClient::new().with("http://x/missing", 500, "<html>oops</html>");
        let url = Url::parse("http://x/missing").unwrap();

        let page = fetch_page(&client, &url).await.unwrap();

        assert_eq!(page.body, "<html>oops</html>");
        assert_eq!(page.url, url);
    }

    #[tokio::test]
    async fn unreachable_page_is_an_error() {
        let client = StubClient::new().unreachable("http://x/achievements");
        let url = Url::parse("http://x/achievements").unwrap();

        let err = fetch_page(&client, &url).await.unwrap_err();

        assert!(err.to_string().contains("could not fetch achievement page"));
    }

    #[tokio::test]
    async fn page_breaking_off_is_an_error() {
        let client = StubClient::new().cut_off("http://x/achievements", "<html><body>");
        let url = Url::parse("http://x/achievements").unwrap();

        let err = fetch_page(&client, &url).await.unwrap_err();

        assert!(err.to_string().contains("could not read achievement page"));
    }
}
