use serde::Serialize;

/// Resolved `(owner, repository)` pair for the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    pub owner: String,
    pub repository: String,
}

/// Read request for a single file.
///
/// `owner`/`repository` override the configured target when set.
/// When both `revision` and `branch` are set, `revision` pins the read.
/// The reported branch is `branch`, else `revision`, else the default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRequest {
    pub path: String,
    pub owner: Option<String>,
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub revision: Option<String>,
}

impl FileRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// The ref to pin the read to, if any.
    pub fn pinned_ref(&self) -> Option<&str> {
        self.revision.as_deref().or(self.branch.as_deref())
    }
}

/// Decoded file content plus its live revision marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFile {
    pub content: String,
    pub revision: String,
    pub path: String,
    pub branch: String,
}

/// A request to commit new content to a single path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRequest {
    pub path: String,
    pub content: String,
    pub message: Option<String>,
    pub branch: Option<String>,
    /// Revision the caller last observed; a stale value rejects the write.
    pub expected_revision: Option<String>,
}

impl CommitRequest {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            ..Default::default()
        }
    }
}

/// Outcome of a successful commit.
///
/// `commit_id` identifies the write transaction; `file_revision` the resulting blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    pub commit_id: String,
    pub file_revision: String,
    pub path: String,
}

/// Opaque identifier of a draft created in the publishing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResult {
    pub draft_id: String,
}
