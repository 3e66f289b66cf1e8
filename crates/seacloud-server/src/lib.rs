//! # SeaCloud Server
//!
//! HTTP gateway for SeaCloud file storage.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                  SeaCloud Server                     │
//! ├─────────────────────────────────────────────────────┤
//! │   Request ID │ Access Log │ CORS │ Compression       │
//! ├─────────────────────────────────────────────────────┤
//! │                  File Handlers                       │
//! │   (metadata, download, entries, upload)              │
//! ├─────────────────────────────────────────────────────┤
//! │                  seacloud-filer                      │
//! │       (FileGateway, cursor codec, entry mapper)      │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                 SeaweedFS filer                      │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::run_server;
pub use state::AppState;
