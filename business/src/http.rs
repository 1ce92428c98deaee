//! HTTP client whose futures are `Send` on every target.
//!
//! `reqwest::Response` holds JS values on `wasm32` and cannot cross threads.
//! Natively the request runs inline; on the web it runs inside
//! `wasm_bindgen_futures::spawn_local` and the finished [`Response`] comes
//! back over a `flume` channel. Either way commands can box the future as
//! `Send`.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Owned, `Send` copy of a response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    /// Keys are lowercased.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request was dropped before completing")]
    Cancelled,
}

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            segments: Vec::new(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Appends one path segment. `/`, `?`, `#` and `%` inside it are
    /// percent-encoded, so it cannot retarget the request.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Appends a query pair; values are percent-encoded on send.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .insert("content-type".to_owned(), "application/json".to_owned());
        Ok(self)
    }

    /// The final URL with path segments and query pairs applied.
    pub fn url(&self) -> HttpResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.url).map_err(|err| HttpError::InvalidUrl {
            url: self.url.clone(),
            reason: err.to_string(),
        })?;
        if !self.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| HttpError::InvalidUrl {
                    url: self.url.clone(),
                    reason: "cannot be a base".to_owned(),
                })?
                .pop_if_empty()
                .extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    pub async fn send(self) -> HttpResult<Response> {
        let url = self.url()?;
        log::debug!("{:?} {url}", self.method);

        #[cfg(not(target_arch = "wasm32"))]
        {
            execute(self.method, url, self.headers, self.body).await
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (tx, rx) = flume::bounded::<HttpResult<Response>>(1);
            let Self {
                method,
                headers,
                body,
                ..
            } = self;

            wasm_bindgen_futures::spawn_local(async move {
                let result = execute(method, url, headers, body).await;
                if tx.send_async(result).await.is_err() {
                    log::debug!("Response dropped, receiver went away");
                }
            });

            rx.recv_async()
                .await
                .map_err(|_closed| HttpError::Cancelled)?
        }
    }
}

async fn execute(
    method: Method,
    url: reqwest::Url,
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
) -> HttpResult<Response> {
    let client = reqwest::Client::new();

    let mut request = match method {
        Method::Get => client.get(url),
        Method::Post => client.post(url),
        Method::Put => client.put(url),
        Method::Delete => client.delete(url),
    };
    for (name, value) in &headers {
        request = request.header(name, value);
    }
    if let Some(body) = body {
        request = request.body(body);
    }

    let response = request
        .send()
        .await
        .map_err(|err| HttpError::Transport(err.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_lowercase(), v.to_owned()))
        })
        .collect();
    let body = response
        .bytes()
        .await
        .map_err(|err| HttpError::Transport(err.to_string()))?
        .to_vec();

    Ok(Response {
        status,
        headers,
        body,
    })
}

/// Entry point for building requests.
///
/// ```ignore
/// let response = Client::get(format!("{base}/api/v1/users"))
///     .query("limit", 10)
///     .send()
///     .await?;
/// ```
pub struct Client;

impl Client {
    pub fn get(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Delete, url)
    }
}
