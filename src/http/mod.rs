mod reqwest_client;
#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use thiserror::Error;

pub use self::reqwest_client::ReqwestClient;

/// The subset of an HTTP client needed to pull a stats page and the images it
/// links to. Every request is a plain GET with no extra headers.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Box<dyn HttpResponse>, HttpError>;
}

#[async_trait]
pub trait HttpResponse: Send {
    fn status(&self) -> StatusCode;

    /// The URL the response was finally served from, after redirects.
    fn url(&self) -> &Url;

    /// Pulls the next piece of the body, or `None` once it has been fully read.
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>, HttpError>;

    async fn text(self: Box<Self>) -> Result<String, HttpError>;
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP request failed")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Parses a URL given on the command line or found in a page, resolving it
/// against `base` when it is relative.
pub fn parse_url(raw: &str, base: Option<&Url>) -> Result<Url, HttpError> {
    let parsed = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };

    parsed.map_err(|source| HttpError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}
