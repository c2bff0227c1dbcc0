//! Wire shapes and URL building for `/repos/{owner}/{repo}/contents/{path}`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use neurapress_core::{IntegrationError, RepoTarget, Result};
use serde::{Deserialize, Serialize};

/// The only content encoding the contents API uses for files we can decode.
pub const SUPPORTED_ENCODING: &str = "base64";

/// File entry returned by `GET .../contents/{path}`.
#[derive(Debug, Deserialize)]
pub struct ContentsFile {
    #[serde(default)]
    pub content: String,
    pub sha: String,
    pub path: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Minimal shape used when only the revision is needed.
#[derive(Debug, Deserialize)]
pub struct ContentsRevision {
    pub sha: String,
}

/// Body of `PUT .../contents/{path}`.
///
/// `sha` is omitted entirely when the file is being created.
#[derive(Debug, Serialize)]
pub struct PutContentsBody<'a> {
    pub message: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
    pub branch: &'a str,
}

/// Response of a successful `PUT`.
#[derive(Debug, Deserialize)]
pub struct PutContentsResponse {
    pub commit: CommitRef,
    pub content: ContentRef,
}

#[derive(Debug, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentRef {
    pub sha: String,
    pub path: String,
}

/// Error body returned by the API on non-success.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Build the contents URL, percent-encoding each path segment.
pub fn contents_url(base: &str, target: &RepoTarget, path: &str, git_ref: Option<&str>) -> String {
    let encoded_path = path
        .trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    let mut url = format!(
        "{}/repos/{}/{}/contents/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(&target.owner),
        urlencoding::encode(&target.repository),
        encoded_path
    );
    if let Some(git_ref) = git_ref {
        url.push_str("?ref=");
        url.push_str(&urlencoding::encode(git_ref));
    }
    url
}

pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}

/// Decode API content, which arrives base64 with embedded line breaks.
pub fn decode_content(encoding: Option<&str>, content: &str) -> Result<String> {
    match encoding {
        Some(SUPPORTED_ENCODING) => {}
        other => {
            return Err(IntegrationError::Encoding {
                encoding: other.unwrap_or("none").to_string(),
            })
        }
    }

    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| IntegrationError::MalformedResponse(format!("Invalid base64 content: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| IntegrationError::MalformedResponse(format!("Content is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> RepoTarget {
        RepoTarget {
            owner: "acme".to_string(),
            repository: "blog".to_string(),
        }
    }

    #[test]
    fn test_contents_url() {
        assert_eq!(
            contents_url("https://api.github.com/", &target(), "/2024/01/05/hello world.md", None),
            "https://api.github.com/repos/acme/blog/contents/2024/01/05/hello%20world.md"
        );
        assert_eq!(
            contents_url("http://h", &target(), "a.md", Some("feature/x")),
            "http://h/repos/acme/blog/contents/a.md?ref=feature%2Fx"
        );
    }

    #[test]
    fn test_decode_wrapped_base64() {
        // The API wraps base64 at 60 columns.
        let encoded = "5L2g5aW9\nLCB3b3Js\nZA==\n";
        assert_eq!(decode_content(Some("base64"), encoded).unwrap(), "你好, world");
    }

    #[test]
    fn test_decode_rejects_other_encodings() {
        let err = decode_content(Some("none"), "").unwrap_err();
        assert_eq!(err.status(), 422);
        assert_eq!(
            err,
            IntegrationError::Encoding {
                encoding: "none".to_string()
            }
        );
        assert!(matches!(
            decode_content(None, "abc"),
            Err(IntegrationError::Encoding { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_content(Some("base64"), "@@@"),
            Err(IntegrationError::MalformedResponse(_))
        ));
        // 0xff 0xfe is not UTF-8.
        assert!(matches!(
            decode_content(Some("base64"), "//4="),
            Err(IntegrationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_put_body_omits_absent_sha() {
        let body = PutContentsBody {
            message: "Update a.md".to_string(),
            content: encode_content("hi"),
            sha: None,
            branch: "main",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["content"], "aGk=");
        assert_eq!(json["branch"], "main");
    }
}
