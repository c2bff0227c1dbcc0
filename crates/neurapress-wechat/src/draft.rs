use std::sync::Arc;

use neurapress_core::{
    classify_remote_failure, DraftResult, IntegrationError, Method, OutboundRequest, Result,
    Transport, WeChatSettings,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Status used when the transport succeeded but the body reports failure.
const BODY_FAILURE_STATUS: u16 = 502;

/// Request body of `POST /draft/add`.
#[derive(Debug, Serialize)]
pub struct DraftPayload {
    pub articles: Vec<DraftArticle>,
}

#[derive(Debug, Serialize)]
pub struct DraftArticle {
    pub title: String,
    pub author: String,
    pub content: String,
    pub need_open_comment: u8,
    pub only_fans_can_comment: u8,
}

/// Response of `POST /draft/add`. `errcode` is absent or `0` on success.
#[derive(Debug, Default, Deserialize)]
struct DraftResponse {
    #[serde(default)]
    errcode: Option<i64>,
    #[serde(default)]
    errmsg: Option<String>,
    #[serde(default)]
    media_id: Option<String>,
}

/// Wrap trimmed HTML into a single-article draft payload.
pub fn build_draft_payload(html: &str, title: Option<&str>, settings: &WeChatSettings) -> DraftPayload {
    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&settings.default_title);
    DraftPayload {
        articles: vec![DraftArticle {
            title: title.to_string(),
            author: settings.default_author.clone(),
            content: html.trim().to_string(),
            need_open_comment: 0,
            only_fans_can_comment: 0,
        }],
    }
}

/// WeChat draft client (stateless).
pub struct WeChatClient {
    transport: Arc<dyn Transport>,
    settings: WeChatSettings,
}

impl WeChatClient {
    pub fn new(transport: Arc<dyn Transport>, settings: WeChatSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &WeChatSettings {
        &self.settings
    }

    /// Create a draft from rendered HTML.
    ///
    /// Both the transport status and the body's `errcode` must indicate success.
    /// Rejecting empty content is the caller's job.
    #[instrument(skip(self, html), level = "debug", fields(html_len = html.len()))]
    pub async fn publish_draft(&self, html: &str, title: Option<&str>) -> Result<DraftResult> {
        let token = self.settings.access_token()?;
        let payload = build_draft_payload(html, title, &self.settings);
        let url = format!(
            "{}/add?access_token={}",
            self.settings.api_base_url.trim_end_matches('/'),
            urlencoding::encode(token)
        );

        let response = self
            .transport
            .execute(OutboundRequest::new(Method::Post, url).json_body(&payload)?)
            .await?;

        let body: DraftResponse = match response.json() {
            Ok(body) => body,
            Err(e) if response.is_success() => return Err(e),
            Err(_) => DraftResponse::default(),
        };

        let body_failed = body.errcode.is_some_and(|code| code != 0);
        if !response.is_success() || body_failed {
            let status = if response.is_success() {
                BODY_FAILURE_STATUS
            } else {
                response.status
            };
            warn!(
                "WeChat draft rejected: status {}, errcode {:?}",
                response.status, body.errcode
            );
            return Err(classify_remote_failure(
                Some(status),
                body.errmsg,
                body.errcode.map(|code| code.to_string()),
                "Failed to save draft",
            ));
        }

        let draft_id = body.media_id.filter(|id| !id.is_empty()).ok_or_else(|| {
            IntegrationError::MalformedResponse("Draft response has no media_id".to_string())
        })?;

        debug!("Saved WeChat draft {}", draft_id);
        Ok(DraftResult { draft_id })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use neurapress_core::TransportResponse;
    use serde_json::{json, Value};

    use super::*;

    /// Answers every request with one canned response and records the calls.
    struct CannedTransport {
        status: u16,
        body: Vec<u8>,
        requests: Mutex<Vec<OutboundRequest>>,
    }

    impl CannedTransport {
        fn json(status: u16, body: Value) -> Arc<Self> {
            Self::raw(status, serde_json::to_vec(&body).unwrap())
        }

        fn raw(status: u16, body: Vec<u8>) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                requests: Mutex::default(),
            })
        }

        fn requests(&self) -> Vec<OutboundRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(&self, request: OutboundRequest) -> Result<TransportResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(TransportResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn settings() -> WeChatSettings {
        WeChatSettings {
            access_token: Some("wx token".to_string()),
            api_base_url: "https://wechat.test/cgi-bin/draft/".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_success_returns_media_id() {
        let transport = CannedTransport::json(200, json!({ "media_id": "MEDIA_1" }));
        let client = WeChatClient::new(transport.clone(), settings());

        let result = client
            .publish_draft("  <p>hello</p>\n", Some("Weekly"))
            .await
            .unwrap();
        assert_eq!(
            result,
            DraftResult {
                draft_id: "MEDIA_1".to_string()
            }
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(
            requests[0].url,
            "https://wechat.test/cgi-bin/draft/add?access_token=wx%20token"
        );
        let body: Value = serde_json::from_slice(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["articles"][0]["content"], "<p>hello</p>");
        assert_eq!(body["articles"][0]["title"], "Weekly");
        assert_eq!(body["articles"][0]["author"], "NeuraPress");
        assert_eq!(body["articles"][0]["need_open_comment"], 0);
    }

    #[tokio::test]
    async fn test_zero_errcode_is_success() {
        let transport =
            CannedTransport::json(200, json!({ "errcode": 0, "errmsg": "ok", "media_id": "M" }));
        let client = WeChatClient::new(transport, settings());
        assert_eq!(client.publish_draft("x", None).await.unwrap().draft_id, "M");
    }

    #[tokio::test]
    async fn test_body_level_error_on_200_is_failure() {
        let transport =
            CannedTransport::json(200, json!({ "errcode": 1, "errmsg": "system error" }));
        let client = WeChatClient::new(transport, settings());

        let err = client.publish_draft("<p>x</p>", None).await.unwrap_err();
        assert_eq!(
            err,
            IntegrationError::Remote {
                status: 502,
                message: "system error".to_string(),
                code: Some("1".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_transport_failure_status_passes_through() {
        let transport = CannedTransport::raw(503, b"<html>busy</html>".to_vec());
        let client = WeChatClient::new(transport, settings());

        let err = client.publish_draft("<p>x</p>", None).await.unwrap_err();
        assert_eq!(err.status(), 503);
        assert_eq!(err.to_string(), "Failed to save draft");
        assert_eq!(err.code(), None);
    }

    #[tokio::test]
    async fn test_missing_media_id_is_malformed() {
        let transport = CannedTransport::json(200, json!({}));
        let client = WeChatClient::new(transport, settings());

        let err = client.publish_draft("<p>x</p>", None).await.unwrap_err();
        assert!(matches!(err, IntegrationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_token_issues_no_calls() {
        let transport = CannedTransport::json(200, json!({ "media_id": "M" }));
        let client = WeChatClient::new(
            transport.clone(),
            WeChatSettings {
                access_token: None,
                ..settings()
            },
        );

        let err = client.publish_draft("<p>x</p>", None).await.unwrap_err();
        assert_eq!(err.code(), Some("WECHAT_TOKEN_MISSING"));
        assert_eq!(err.status(), 500);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_payload_defaults() {
        let settings = WeChatSettings::default();
        let payload = build_draft_payload("<p>a</p>", Some("  "), &settings);
        assert_eq!(payload.articles.len(), 1);
        assert_eq!(payload.articles[0].title, "NeuraPress Draft");
        assert_eq!(payload.articles[0].author, "NeuraPress");
        assert_eq!(payload.articles[0].only_fans_can_comment, 0);
    }
}
