//! Revision resolution, reads and compare-and-swap writes.

use std::sync::Arc;

use neurapress_core::{
    classify_remote_failure, CommitRequest, CommitResult, FileRequest, GitHubSettings,
    IntegrationError, Method, OutboundRequest, RemoteFile, RepoTarget, Result, Transport,
    TransportResponse,
};
use tracing::{debug, instrument, warn};

use crate::contents::{
    contents_url, decode_content, encode_content, ContentsFile, ContentsRevision, ErrorBody,
    PutContentsBody, PutContentsResponse,
};

const USER_AGENT: &str = concat!("neurapress-sync/", env!("CARGO_PKG_VERSION"));

/// GitHub contents client (stateless; every call goes to the remote store).
pub struct GitHubClient {
    transport: Arc<dyn Transport>,
    settings: GitHubSettings,
}

impl GitHubClient {
    pub fn new(transport: Arc<dyn Transport>, settings: GitHubSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &GitHubSettings {
        &self.settings
    }

    fn request(&self, method: Method, url: String, token: &str) -> OutboundRequest {
        OutboundRequest::new(method, url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
    }

    /// Execute a request, classifying any non-success response.
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse> {
        let response = self.transport.execute(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let body: ErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
        warn!(
            "GitHub request failed with status {}: {}",
            response.status,
            body.message.as_deref().unwrap_or("<no message>")
        );
        Err(classify_remote_failure(
            Some(response.status),
            body.message.clone(),
            body.message,
            "GitHub request failed",
        ))
    }

    /// Live revision of `path` on `branch`, or `None` if the file does not exist.
    #[instrument(skip(self), level = "debug")]
    pub async fn resolve_revision(&self, path: &str, branch: Option<&str>) -> Result<Option<String>> {
        let token = self.settings.token()?;
        let target = self.settings.target(None, None)?;
        self.fetch_revision(token, &target, path, branch).await
    }

    async fn fetch_revision(
        &self,
        token: &str,
        target: &RepoTarget,
        path: &str,
        branch: Option<&str>,
    ) -> Result<Option<String>> {
        let branch = self.settings.branch_or_default(branch);
        let url = contents_url(&self.settings.api_base_url, target, path, Some(branch));

        match self.send(self.request(Method::Get, url, token)).await {
            Ok(response) => {
                let current: ContentsRevision = response.json()?;
                debug!("Live revision of {} on {}: {}", path, branch, current.sha);
                Ok(Some(current.sha))
            }
            Err(e) if e.is_not_found() => {
                debug!("{} does not exist on {}", path, branch);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Read and decode a file, optionally pinned to a branch or revision.
    #[instrument(skip(self, request), level = "debug", fields(path = %request.path))]
    pub async fn read_file(&self, request: &FileRequest) -> Result<RemoteFile> {
        let token = self.settings.token()?;
        let target = self
            .settings
            .target(request.owner.as_deref(), request.repository.as_deref())?;
        let url = contents_url(
            &self.settings.api_base_url,
            &target,
            &request.path,
            request.pinned_ref(),
        );

        let response = self.send(self.request(Method::Get, url, token)).await?;
        let file: ContentsFile = response.json()?;
        let content = decode_content(file.encoding.as_deref(), &file.content)?;

        debug!(
            "Read {} ({} bytes) at revision {}",
            file.path,
            content.len(),
            file.sha
        );
        Ok(RemoteFile {
            content,
            revision: file.sha,
            path: file.path,
            branch: self
                .settings
                .branch_or_default(
                    request
                        .branch
                        .as_deref()
                        .filter(|b| !b.is_empty())
                        .or(request.revision.as_deref()),
                )
                .to_string(),
        })
    }

    /// Commit `request.content` to `request.path`.
    ///
    /// The live revision is always resolved first: the contents API needs it to
    /// perform its own compare-and-swap, and a caller-supplied
    /// `expected_revision` is checked against it before anything is written.
    /// At most one write is attempted; callers own any retry.
    #[instrument(
        skip(self, request),
        level = "debug",
        fields(path = %request.path, content_len = request.content.len())
    )]
    pub async fn write_file(&self, request: &CommitRequest) -> Result<CommitResult> {
        let token = self.settings.token()?;
        let target = self.settings.target(None, None)?;
        let branch = request.branch.as_deref();

        let live = self
            .fetch_revision(token, &target, &request.path, branch)
            .await?;

        if let (Some(expected), Some(live)) = (request.expected_revision.as_deref(), live.as_deref())
        {
            if expected != live {
                warn!(
                    "Rejecting write to {}: expected revision {}, live is {}",
                    request.path, expected, live
                );
                return Err(IntegrationError::Conflict {
                    path: request.path.clone(),
                    expected: expected.to_string(),
                    live: live.to_string(),
                });
            }
        }

        let message = request
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Update {}", request.path));
        let body = PutContentsBody {
            message,
            content: encode_content(&request.content),
            sha: live.as_deref(),
            branch: self.settings.branch_or_default(branch),
        };

        let url = contents_url(&self.settings.api_base_url, &target, &request.path, None);
        let response = self
            .send(self.request(Method::Put, url, token).json_body(&body)?)
            .await?;
        let result: PutContentsResponse = response.json()?;

        debug!(
            "Committed {} as {} (blob {}, created: {})",
            result.content.path,
            result.commit.sha,
            result.content.sha,
            live.is_none()
        );
        Ok(CommitResult {
            commit_id: result.commit.sha,
            file_revision: result.content.sha,
            path: result.content.path,
        })
    }
}
