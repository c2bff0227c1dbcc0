//! Core types and abstractions shared by the neurapress sync clients.
//!
//! This crate defines:
//! - `IntegrationError`: the failure taxonomy and its HTTP-style classification
//! - The transient data model (`FileRequest`, `RemoteFile`, `CommitRequest`, ...)
//! - `Transport`: the narrow outbound HTTP seam, with a `reqwest` implementation
//! - Settings records carrying explicit defaults for each client
//! - The deterministic import path deriver

mod error;
mod model;
mod path;
mod settings;
mod transport;

pub use error::{classify_remote_failure, IntegrationError, Result};
pub use model::{CommitRequest, CommitResult, DraftResult, FileRequest, RemoteFile, RepoTarget};
pub use path::{derive_path, derive_path_on, slugify};
pub use settings::{
    GitHubSettings, PathSettings, WeChatSettings, DEFAULT_BRANCH, DEFAULT_DRAFT_AUTHOR,
    DEFAULT_DRAFT_TITLE, DEFAULT_FALLBACK_SLUG, GITHUB_API_URL, WECHAT_DRAFT_API_URL,
};
pub use transport::{Method, OutboundRequest, ReqwestTransport, Transport, TransportResponse};
