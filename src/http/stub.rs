//! In-memory `HttpClient` used by tests. Unknown URLs answer 404.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use super::{HttpClient, HttpError, HttpResponse};

#[derive(Clone)]
enum Route {
    Respond { status: StatusCode, body: Vec<u8> },

    /// The request never gets a response.
    Unreachable,

    /// A 200 whose body breaks off after `body`.
    CutOff { body: Vec<u8> },
}

#[derive(Default)]
pub struct StubClient {
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.routes.insert(
            url.to_owned(),
            Route::Respond {
                status,
                body: body.into(),
            },
        );
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.routes.insert(url.to_owned(), Route::Unreachable);
        self
    }

    pub fn cut_off(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes
            .insert(url.to_owned(), Route::CutOff { body: body.into() });
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// `reqwest::Error` cannot be built by hand, so failures are reported as an
/// unusable URL instead.
fn failure(url: &Url) -> HttpError {
    HttpError::InvalidUrl {
        url: url.to_string(),
        source: url::ParseError::EmptyHost,
    }
}

#[async_trait]
impl HttpClient for StubClient {
    async fn get(&self, url: &Url) -> Result<Box<dyn HttpResponse>, HttpError> {
        self.requests.lock().unwrap().push(url.to_string());

        let route = self.routes.get(url.as_str()).cloned().unwrap_or(Route::Respond {
            status: StatusCode::NOT_FOUND,
            body: b"not found".to_vec(),
        });

        let (status, body, breaks_off) = match route {
            Route::Respond { status, body } => (status, body, false),
            Route::Unreachable => return Err(failure(url)),
            Route::CutOff { body } => (StatusCode::OK, body, true),
        };

        // Split bodies so readers have to loop over chunks.
        let chunks = body.chunks(7).map(<[u8]>::to_vec).rev().collect();

        Ok(Box::new(StubResponse {
            url: url.clone(),
            status,
            chunks,
            breaks_off,
        }))
    }
}

struct StubResponse {
    url: Url,
    status: StatusCode,
    chunks: Vec<Vec<u8>>,
    breaks_off: bool,
}

#[async_trait]
impl HttpResponse for StubResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn url(&self) -> &Url {
        &self.url
    }

    async fn chunk(&mut self) -> Result<Option<Vec<u8>>, HttpError> {
        match self.chunks.pop() {
            Some(chunk) => Ok(Some(chunk)),
            None if self.breaks_off => Err(failure(&self.url)),
            None => Ok(None),
        }
    }

    async fn text(self: Box<Self>) -> Result<String, HttpError> {
        if self.breaks_off {
            return Err(failure(&self.url));
        }

        let bytes: Vec<u8> = self.chunks.into_iter().rev().flatten().collect();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
