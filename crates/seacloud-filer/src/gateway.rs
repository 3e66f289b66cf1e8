//! File gateway: the domain-level file API over the filer

use crate::{
    client::{FilerClient, RawResponse, Transfer},
    cursor::Cursor,
    mapper::{map_entries, map_entry},
    path,
    types::{
        Download, Entry, FileEntry, FilerQuery, ListingPage, RemoteEntry, RemoteListing,
        UploadReply,
    },
    FilerConfig, FilerError, Result,
};
use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt, TryStreamExt};
use reqwest::Response;
use std::fmt;
use tokio::io::AsyncRead;
use tracing::{debug, instrument};

/// Upper bound for the up-front buffer reservation of a download
const MAX_PREALLOCATION: u64 = 8 * 1024 * 1024;

/// File content forwarded as a stream.
///
/// The filer connection stays open until the stream is exhausted or dropped.
pub struct FileStream {
    /// The file being streamed
    pub entry: FileEntry,
    /// Content chunks
    pub body: BoxStream<'static, Result<Bytes>>,
}

impl FileStream {
    pub fn mime_type(&self) -> &str {
        &self.entry.mime_type
    }

    /// Read the remaining chunks into one buffer
    pub async fn collect(self) -> Result<Bytes> {
        let chunks: Vec<Bytes> = self.body.try_collect().await?;
        Ok(chunks.concat().into())
    }
}

impl fmt::Debug for FileStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStream")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

/// Domain-level file operations.
///
/// Cheap to clone and safe to share between request handlers; every call is a
/// self-contained round trip to the filer.
#[derive(Clone, Debug)]
pub struct FileGateway {
    client: FilerClient,
    root: String,
}

impl FileGateway {
    /// Create a gateway over an existing filer client
    pub fn new(client: FilerClient) -> Self {
        let root = client.config().root_segment().to_string();
        Self { client, root }
    }

    /// Create a gateway with its own filer client
    pub fn from_config(config: FilerConfig) -> Result<Self> {
        Ok(Self::new(FilerClient::new(config)?))
    }

    /// The underlying filer client
    pub fn client(&self) -> &FilerClient {
        &self.client
    }

    /// Fetch the metadata of one entry
    #[instrument(skip(self))]
    pub async fn get_file(&self, path: &str) -> Result<Entry> {
        let remote = self.remote_path(path);
        let raw = self.client.get(&remote, &FilerQuery::metadata()).await?;
        check_status(&raw, path)?;

        let record: RemoteEntry = serde_json::from_slice(&raw.body)?;
        Ok(map_entry(&record))
    }

    /// Download a whole file into memory.
    ///
    /// Memory use is bounded only by the file size; use [`FileGateway::stream_file`]
    /// to forward large files instead.
    #[instrument(skip(self))]
    pub async fn download_file(&self, path: &str) -> Result<Download> {
        let file = self.resolve_file(path).await?;
        let remote = self.remote_path(path);

        let mut buf = Vec::with_capacity(file.size.min(MAX_PREALLOCATION) as usize);
        let written = match self.client.download(&remote, &mut buf).await? {
            Transfer::Complete(written) => written,
            Transfer::Refused(raw) => return Err(status_error(&raw, path)),
        };
        debug!(bytes = written, mime = %file.mime_type, "Buffered download");

        Ok(Download {
            content: Bytes::from(buf),
            mime_type: file.mime_type,
        })
    }

    /// Open a file for streaming without buffering its content
    #[instrument(skip(self))]
    pub async fn stream_file(&self, path: &str) -> Result<FileStream> {
        let entry = self.resolve_file(path).await?;
        let remote = self.remote_path(path);

        let response = accept_stream(self.client.open(&remote).await?, path).await?;
        let body = response.bytes_stream().map_err(FilerError::from).boxed();

        Ok(FileStream { entry, body })
    }

    /// Store `size` bytes from `content` at `path`. Returns the stored size.
    ///
    /// Parent directories are left to the filer, which creates them on demand.
    #[instrument(skip(self, content))]
    pub async fn create_file<R>(&self, content: R, path: &str, size: u64) -> Result<u64>
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        self.store(content, path, Some(size)).await
    }

    /// Store everything read from `content` at `path` when the length is not
    /// known up front. The upload is sent chunked; the filer reports the size.
    #[instrument(skip(self, content))]
    pub async fn create_file_chunked<R>(&self, content: R, path: &str) -> Result<u64>
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        self.store(content, path, None).await
    }

    /// List one page of a directory.
    ///
    /// `cursor` is the token from the previous page, or empty for the first one.
    /// A malformed token is rejected rather than restarting the listing.
    #[instrument(skip(self))]
    pub async fn list_entries(&self, dir: &str, limit: usize, cursor: &str) -> Result<ListingPage> {
        let cursor = Cursor::decode(cursor)?;
        let remote = format!("{}/", self.remote_path(dir).trim_end_matches('/'));

        let raw = self
            .client
            .get(&remote, &FilerQuery::listing(limit, cursor.last_file_name))
            .await?;
        check_status(&raw, dir)?;

        let listing: RemoteListing = serde_json::from_slice(&raw.body)?;
        let records = listing.entries.as_deref().unwrap_or_default();
        let entries = map_entries(records);
        let cursor = next_cursor(&listing, &entries);

        debug!(
            count = entries.len(),
            more = !cursor.is_empty(),
            empty_folder = listing.empty_folder,
            "Listed directory"
        );

        Ok(ListingPage { entries, cursor })
    }

    async fn store<R>(&self, content: R, path: &str, size: Option<u64>) -> Result<u64>
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        let remote = self.remote_path(path);
        let raw = self.client.upload(content, size, &remote).await?;
        check_status(&raw, path)?;

        let reply: UploadReply = serde_json::from_slice(&raw.body)?;
        if !reply.error.is_empty() {
            return Err(FilerError::RemoteService {
                status: raw.status.as_u16(),
                path: path::normalize(path),
                message: reply.error,
            });
        }

        debug!(name = %reply.name, stored = reply.size, "File created");
        Ok(reply.size)
    }

    async fn resolve_file(&self, path: &str) -> Result<FileEntry> {
        match self.get_file(path).await? {
            Entry::File(file) => Ok(file),
            Entry::Directory(dir) => Err(FilerError::IsDirectory(dir.full_path)),
        }
    }

    fn remote_path(&self, path: &str) -> String {
        path::to_remote(&self.root, path)
    }
}

/// Error for a non-success filer reply, naming the external `path`
fn status_error(raw: &RawResponse, path: &str) -> FilerError {
    if raw.is_not_found() {
        FilerError::NotFound(path::normalize(path))
    } else {
        FilerError::remote(raw.status, &path::normalize(path), &raw.body)
    }
}

fn check_status(raw: &RawResponse, path: &str) -> Result<()> {
    if raw.is_success() {
        Ok(())
    } else {
        Err(status_error(raw, path))
    }
}

/// Pass a successful content response through; drain and map anything else
async fn accept_stream(response: Response, path: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();
    Err(status_error(&RawResponse { status, body }, path))
}

/// Token for the page after `listing`; empty once the filer reports no more pages.
fn next_cursor(listing: &RemoteListing, entries: &[Entry]) -> String {
    if !listing.should_display_load_more {
        return String::new();
    }

    let last = if listing.last_file_name.is_empty() {
        entries.last().map(Entry::name)
    } else {
        Some(listing.last_file_name.as_str())
    };

    match last {
        Some(name) if !name.is_empty() => Cursor::after(name).encode(),
        _ => String::new(),
    }
}
