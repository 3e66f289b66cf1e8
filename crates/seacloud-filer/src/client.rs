//! HTTP client for the SeaweedFS filer

use crate::{path, types::FilerQuery, FilerConfig, FilerError, Result};
use bytes::Bytes;
use reqwest::{header, multipart, Body, Client, Response, StatusCode};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, instrument};
use url::Url;

/// Raw reply from the filer
#[derive(Clone, Debug)]
pub struct RawResponse {
    /// HTTP status returned by the filer
    pub status: StatusCode,
    /// Unparsed body
    pub body: Bytes,
}

/// Outcome of a download into a sink
#[derive(Clone, Debug)]
pub enum Transfer {
    /// Body written in full; the number of bytes
    Complete(u64),
    /// Non-success reply; nothing was written
    Refused(RawResponse),
}

impl RawResponse {
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Filer HTTP client.
///
/// No retries are performed. Dropping any returned future aborts the request
/// and releases its connection.
#[derive(Clone, Debug)]
pub struct FilerClient {
    config: FilerConfig,
    base: Url,
    http: Client,
}

impl FilerClient {
    /// Create a new client with its own HTTP connection pool
    pub fn new(config: FilerConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FilerError::Config(format!("invalid user agent: {}", e)))?,
        );

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Self::with_http_client(config, http)
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_http_client(config: FilerConfig, http: Client) -> Result<Self> {
        let base = Url::parse(&config.endpoint)
            .map_err(|e| FilerError::Config(format!("invalid filer endpoint {}: {}", config.endpoint, e)))?;

        if base.cannot_be_a_base() {
            return Err(FilerError::Config(format!(
                "filer endpoint is not a base URL: {}",
                config.endpoint
            )));
        }

        Ok(Self { config, base, http })
    }

    /// Get the configuration
    pub fn config(&self) -> &FilerConfig {
        &self.config
    }

    /// GET `path` with `Accept: application/json`.
    ///
    /// Only transport failures are errors; the status is left to the caller.
    #[instrument(skip(self))]
    pub async fn get(&self, path: &str, query: &FilerQuery) -> Result<RawResponse> {
        let url = self.url(path)?;
        debug!(%url, "Sending GET request");

        let response = self
            .http
            .get(url)
            .query(&query.to_pairs())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Filer replied");

        Ok(RawResponse { status, body })
    }

    /// Upload the bytes read from `content` to `path`.
    ///
    /// With a known `size` the part is sent with that declared length, otherwise
    /// the request body is chunked. The filer's reply is returned as is; its
    /// status and JSON body are left to the caller.
    #[instrument(skip(self, content))]
    pub async fn upload<R>(&self, content: R, size: Option<u64>, path: &str) -> Result<RawResponse>
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        let url = self.url(path)?;
        debug!(%url, "Uploading file");

        let body = Body::wrap_stream(ReaderStream::new(content));
        let part = match size {
            Some(size) => multipart::Part::stream_with_length(body, size),
            None => multipart::Part::stream(body),
        };
        let part = part
            .file_name(path::leaf_name(path).to_string())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(url)
            .header(header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Filer replied to upload");

        Ok(RawResponse { status, body })
    }

    /// Stream the content at `path` into `sink`.
    ///
    /// Nothing is written unless the filer answers with a success status; a
    /// refusal is handed back with its body for the caller to interpret.
    #[instrument(skip(self, sink))]
    pub async fn download<W>(&self, path: &str, sink: &mut W) -> Result<Transfer>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut response = self.open(path).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await?;
            return Ok(Transfer::Refused(RawResponse { status, body }));
        }

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;

        debug!(bytes = written, "Download complete");
        Ok(Transfer::Complete(written))
    }

    /// GET the content at `path` and hand back the unread response, whatever its status
    #[instrument(skip(self))]
    pub async fn open(&self, path: &str) -> Result<Response> {
        let url = self.url(path)?;
        debug!(%url, "Opening content stream");

        let response = self.http.get(url).send().await?;
        debug!(status = response.status().as_u16(), "Filer replied");
        Ok(response)
    }

    /// Build the request URL for a filer path.
    ///
    /// Each segment is percent-encoded on its own, so `%` and `?` in names stay
    /// literal. A trailing slash is kept.
    fn url(&self, path: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FilerError::Config(format!("filer endpoint is not a base URL: {}", self.base)))?
            .pop_if_empty()
            .extend(path.trim_start_matches('/').split('/'));
        Ok(url)
    }
}
