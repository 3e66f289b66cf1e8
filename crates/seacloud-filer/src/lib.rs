//! # SeaCloud Filer
//!
//! File storage gateway over a SeaweedFS filer.
//!
//! The filer speaks in remote full paths, mode bits and page-boundary hints.
//! This crate turns that into:
//!
//! - **Entries**: [`Entry::File`] / [`Entry::Directory`] with root-relative paths
//! - **Listings**: pages with an opaque, stateless continuation [`Cursor`]
//! - **Content**: buffered downloads, forwarded streams and streaming uploads
//!
//! ## Example
//!
//! ```rust,ignore
//! use seacloud_filer::{FileGateway, FilerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let gateway = FileGateway::from_config(FilerConfig::new("http://localhost:8888"))?;
//!
//!     // Walk a directory page by page
//!     let mut cursor = String::new();
//!     loop {
//!         let page = gateway.list_entries("/docs", 100, &cursor).await?;
//!         for entry in &page.entries {
//!             println!("{}", entry.full_path());
//!         }
//!         if page.is_last() {
//!             break;
//!         }
//!         cursor = page.cursor;
//!     }
//!
//!     // Download a file
//!     let download = gateway.download_file("/docs/readme.txt").await?;
//!     println!("{} bytes of {}", download.content.len(), download.mime_type);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod cursor;
mod error;
mod gateway;
pub mod mapper;
pub mod path;
mod types;

pub use client::{FilerClient, RawResponse, Transfer};
pub use config::FilerConfig;
pub use cursor::Cursor;
pub use error::{FilerError, Result};
pub use gateway::{FileGateway, FileStream};
pub use types::*;
