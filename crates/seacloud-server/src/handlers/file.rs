//! File operation handlers

use super::success;
use crate::{ApiError, AppState};
use axum::{
    body::Body,
    extract::{multipart::Field, Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use seacloud_filer::path;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, DuplexStream};

const DEFAULT_MIME: &str = "application/octet-stream";

/// Bytes buffered between the incoming form and the filer upload
const PIPE_CAPACITY: usize = 64 * 1024;

/// Query parameters addressing one entry
#[derive(Debug, Deserialize)]
pub struct FileParams {
    pub path: String,
}

/// Query parameters for directory listings
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "root_dir")]
    pub dirpath: String,
    pub limit: Option<usize>,
    #[serde(default)]
    pub cursor: String,
}

fn root_dir() -> String {
    "/".to_string()
}

/// Reply to a successful upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub full_path: String,
    pub size: u64,
}

/// GET /api/files/metadata?path= - Entry metadata
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FileParams>,
) -> Result<Response, ApiError> {
    let entry = state.files.get_file(&params.path).await?;
    Ok(success(StatusCode::OK, entry))
}

/// GET /api/files/download?path= - File content
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FileParams>,
) -> Result<Response, ApiError> {
    if state.config.stream_downloads {
        let stream = state.files.stream_file(&params.path).await?;
        let mime = content_type(stream.mime_type());
        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime)],
            Body::from_stream(stream.body),
        )
            .into_response());
    }

    let download = state.files.download_file(&params.path).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type(&download.mime_type))],
        download.content,
    )
        .into_response())
}

/// GET /api/files/entries?dirpath=&limit=&cursor= - One page of a directory
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let limit = params.limit.unwrap_or(state.config.default_page_size);
    if limit == 0 || limit > state.config.max_page_size {
        return Err(ApiError::bad_request(format!(
            "limit must be between 1 and {}",
            state.config.max_page_size
        )));
    }

    let page = state
        .files
        .list_entries(&params.dirpath, limit, &params.cursor)
        .await?;
    Ok(success(StatusCode::OK, page))
}

/// POST /api/files - Multipart upload (`dirpath` text field, then `file` file field).
///
/// The file part is piped to the filer while it is read, so `dirpath` must
/// come first.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut dirpath = root_dir();
    let mut uploaded: Option<UploadResponse> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "dirpath" if uploaded.is_some() => {
                return Err(ApiError::bad_request("dirpath must precede the file field"));
            }
            "dirpath" => {
                dirpath = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
            }
            "file" if uploaded.is_some() => {
                return Err(ApiError::bad_request("only one file per request"));
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                validate_file_name(&file_name)?;
                let full_path = path::join(&dirpath, &file_name);

                let (writer, reader) = tokio::io::duplex(PIPE_CAPACITY);
                let (size, ()) = tokio::try_join!(
                    async {
                        state
                            .files
                            .create_file_chunked(reader, &full_path)
                            .await
                            .map_err(ApiError::from)
                    },
                    pipe_field(field, writer),
                )?;

                tracing::info!(path = %full_path, size, "File uploaded");
                uploaded = Some(UploadResponse {
                    file_name,
                    full_path,
                    size,
                });
            }
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    let uploaded = uploaded.ok_or_else(|| ApiError::bad_request("missing file field"))?;
    Ok(success(StatusCode::CREATED, uploaded))
}

/// Copy a multipart field into the upload pipe.
///
/// On a read failure the writer is dropped together with the returned error,
/// which aborts the filer request instead of ending the upload early.
async fn pipe_field(mut field: Field<'_>, mut writer: DuplexStream) -> Result<(), ApiError> {
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| ApiError::bad_request(format!("upload interrupted: {}", e)))?;
    }
    writer
        .shutdown()
        .await
        .map_err(|e| ApiError::bad_request(format!("upload interrupted: {}", e)))
}

fn validate_file_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(ApiError::bad_request(format!("invalid file name: {:?}", name)));
    }
    Ok(())
}

fn content_type(mime: &str) -> String {
    if mime.is_empty() {
        DEFAULT_MIME.to_string()
    } else {
        mime.to_string()
    }
}
