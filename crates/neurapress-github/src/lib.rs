//! GitHub contents API client.
//!
//! Single-file read and write against one branch, with the blob SHA as the
//! revision marker:
//! - `resolve_revision`: live SHA for a path, `None` when the file does not exist
//! - `read_file`: decoded content plus its SHA
//! - `write_file`: compare-and-swap commit, rejecting stale expected revisions

mod client;
mod contents;

pub use client::GitHubClient;
