use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};

use super::{HttpClient, HttpError, HttpResponse};

pub struct ReqwestClient {
    client: Client,
}

impl fmt::Debug for ReqwestClient {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "ReqwestClient")
    }
}

impl ReqwestClient {
    /// Without a timeout, a stalled server blocks the run indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, HttpError> {
        let mut builder = Client::builder();

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<Box<dyn HttpResponse>, HttpError> {
        log::trace!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        log::trace!("{} answered with {}", url, response.status());

        Ok(Box::new(ReqwestResponse { response }))
    }
}

struct ReqwestResponse {
    response: Response,
}

#[async_trait]
impl HttpResponse for ReqwestResponse {
    fn status(&self) -> StatusCode {
        self.response.status()
    }

    fn url(&self) -> &Url {
        self.response.url()
    }

    async fn chunk(&mut self) -> Result<Option<Vec<u8>>, HttpError> {
        Ok(self.response.chunk().await?.map(|bytes| bytes.to_vec()))
    }

    async fn text(self: Box<Self>) -> Result<String, HttpError> {
        Ok(self.response.text().await?)
    }
}
