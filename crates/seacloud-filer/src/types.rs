//! Domain types and the filer's wire records

use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Directory bit of a filer mode (Go `os.ModeDir`)
pub const MODE_DIR: u32 = 1 << 31;

/// A file or directory node
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    File(FileEntry),
    Directory(DirectoryEntry),
}

/// A regular file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Leaf name
    pub name: String,
    /// Root-relative path, always starting with `/`
    pub full_path: String,
    /// Size in bytes
    pub size: u64,
    /// Permission and type bits as reported by the filer
    pub mode: u32,
    /// MIME type
    pub mime_type: String,
    /// MD5 of the content, lower-case hex
    pub md5: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modified time
    pub updated_at: DateTime<Utc>,
}

/// A directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Leaf name (empty for the root)
    pub name: String,
    /// Root-relative path, always starting with `/`
    pub full_path: String,
    /// Permission and type bits as reported by the filer
    pub mode: u32,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modified time
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => &f.name,
            Self::Directory(d) => &d.name,
        }
    }

    pub fn full_path(&self) -> &str {
        match self {
            Self::File(f) => &f.full_path,
            Self::Directory(d) => &d.full_path,
        }
    }

    pub fn mode(&self) -> u32 {
        match self {
            Self::File(f) => f.mode,
            Self::Directory(d) => d.mode,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::File(f) => f.created_at,
            Self::Directory(d) => d.created_at,
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            Self::File(f) => f.updated_at,
            Self::Directory(d) => d.updated_at,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// The file view, if this entry is a file
    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            Self::File(f) => Some(f),
            Self::Directory(_) => None,
        }
    }
}

/// One page of a directory listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage {
    /// Entries in filer order
    pub entries: Vec<Entry>,
    /// Token for the next page; empty when the listing is exhausted
    pub cursor: String,
}

impl ListingPage {
    /// Whether this is the final page
    pub fn is_last(&self) -> bool {
        self.cursor.is_empty()
    }
}

/// Buffered file content
#[derive(Clone, Debug)]
pub struct Download {
    /// File bytes
    pub content: Bytes,
    /// MIME type reported by the filer
    pub mime_type: String,
}

// ==================== Wire Records ====================

/// Entry metadata as returned by the filer (`?metadata=true` or listing rows)
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteEntry {
    pub full_path: String,
    #[serde(default)]
    pub mtime: DateTime<Utc>,
    #[serde(default)]
    pub crtime: DateTime<Utc>,
    #[serde(default)]
    pub mode: u32,
    #[serde(default)]
    pub mime: String,
    #[serde(default, deserialize_with = "deserialize_md5")]
    pub md5: Option<Vec<u8>>,
    #[serde(default)]
    pub file_size: u64,
}

impl RemoteEntry {
    pub fn is_directory(&self) -> bool {
        self.mode & MODE_DIR != 0
    }
}

/// Directory listing reply
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteListing {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub entries: Option<Vec<RemoteEntry>>,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub last_file_name: String,
    #[serde(default)]
    pub should_display_load_more: bool,
    #[serde(default)]
    pub empty_folder: bool,
}

/// Upload reply
#[derive(Clone, Debug, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub error: String,
}

/// Query parameters understood by the filer's GET endpoint
#[derive(Clone, Debug, Default)]
pub struct FilerQuery {
    /// Return entry metadata instead of content
    pub metadata: bool,
    /// Page size for directory listings
    pub limit: Option<usize>,
    /// Continue the listing strictly after this name
    pub last_file_name: Option<String>,
}

impl FilerQuery {
    pub fn metadata() -> Self {
        Self {
            metadata: true,
            ..Default::default()
        }
    }

    pub fn listing(limit: usize, last_file_name: Option<String>) -> Self {
        Self {
            metadata: false,
            limit: Some(limit),
            last_file_name,
        }
    }

    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if self.metadata {
            query.push(("metadata", "true".to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(name) = self.last_file_name.as_ref().filter(|n| !n.is_empty()) {
            query.push(("lastFileName", name.clone()));
        }
        query
    }
}

fn deserialize_md5<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    match encoded.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => general_purpose::STANDARD
            .decode(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
