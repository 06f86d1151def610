use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use reqwest::header;

use crate::builder::Config;
use crate::errors::{ClientTimeoutError, ConfigurationError, Error, ErrorKind};
use crate::errors::TransportError;

pub const CONTENT_TYPE: &str = "application/json;charset=utf-8";
pub const DRIVER_HEADER: &str = "x-fauna-driver";
pub const DRIVER_NAME: &str = concat!("fauna-rust/", env!("CARGO_PKG_VERSION"));

/// A query on its way to the server.
#[derive(Clone)]
pub struct Request {
    /// Secret used to authenticate this request.
    pub secret: Arc<str>,
    /// JSON text of the query.
    pub body: Bytes,
}

/// Status and body of a server response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Bytes,
}

/// Sends queries to the server.
///
/// [`HttpTransport`] is used by default, other implementations can be
/// passed to [`Client::with_transport`](crate::Client::with_transport).
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: Request) -> Result<Response, Error>;
}

/// [`Transport`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: url::Url,
}

/// Value of the `Authorization` header for `secret`.
pub fn basic_auth(secret: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:", secret)))
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Request")
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<HttpTransport, Error> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE,
                       header::HeaderValue::from_static(CONTENT_TYPE));
        headers.insert(DRIVER_HEADER,
                       header::HeaderValue::from_static(DRIVER_NAME));
        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            ConfigurationError::with_source(e)
                .context("cannot initialize HTTP client")
        })?;
        Ok(HttpTransport {
            http,
            endpoint: config.endpoint().clone(),
        })
    }
}

fn request_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        ClientTimeoutError::with_source(e).context("request timed out")
    } else {
        TransportError::with_source(e).context("cannot send request")
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, Error> {
        log::trace!("POST {} ({} bytes)", self.endpoint, request.body.len());
        let response = self.http
            .post(self.endpoint.clone())
            .header(header::AUTHORIZATION, basic_auth(&request.secret))
            .body(request.body)
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(request_error)?;
        log::trace!("Response status {} ({} bytes)", status, body.len());
        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod test {
    use super::basic_auth;

    #[test]
    fn auth_header() {
        assert_eq!(basic_auth("secret"), "Basic c2VjcmV0Og==");
        assert_eq!(basic_auth(""), "Basic Og==");
    }
}
