use futures::FutureExt;
use futures::future::LocalBoxFuture;
use snafu::{ResultExt, ensure};

use super::ChatBackend;
use super::error::{ClientResult, DecodeResponseSnafu, HttpClientSnafu, InvalidEndpointSnafu};
use super::protocol::{SendReply, SendRequest};

pub const SEND_PATH: &str = "/api/chat/send";
pub const RESET_PATH: &str = "/api/chat/reset";

/// Backend client speaking JSON over HTTP.
///
/// One attempt per call, no timeout: a slow backend keeps the caller waiting.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatClient {
    /// Creates a client for an absolute base URL such as `https://crm.example.com`.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            InvalidEndpointSnafu {
                stage: "http-client-new",
                endpoint: base_url.clone(),
                details: "expected an absolute http(s) URL".to_string(),
            }
        );

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_message(&self, message: &str) -> ClientResult<SendReply> {
        let response = self
            .http
            .post(self.url(SEND_PATH))
            .json(&SendRequest::new(message))
            .send()
            .await
            .context(HttpClientSnafu {
                stage: "send-message-request",
            })?;

        // The body is decoded whatever the status: the backend reports
        // application errors inside the JSON payload.
        let status = response.status();
        let payload = response.text().await.context(HttpClientSnafu {
            stage: "send-message-read-body",
        })?;
        if !status.is_success() {
            tracing::debug!("chat backend answered {status} to send");
        }

        serde_json::from_str(&payload).context(DecodeResponseSnafu {
            stage: "send-message-decode",
            status: status.as_u16(),
        })
    }

    async fn post_reset(&self) -> ClientResult<()> {
        let response = self
            .http
            .post(self.url(RESET_PATH))
            .send()
            .await
            .context(HttpClientSnafu {
                stage: "reset-session-request",
            })?;
        tracing::debug!("chat backend answered {} to reset", response.status());
        Ok(())
    }
}

impl ChatBackend for HttpChatClient {
    fn send<'a>(&'a self, message: &'a str) -> LocalBoxFuture<'a, ClientResult<SendReply>> {
        self.post_message(message).boxed_local()
    }

    fn reset(&self) -> LocalBoxFuture<'_, ClientResult<()>> {
        self.post_reset().boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::ClientError;

    #[test]
    fn rejects_relative_endpoints() {
        let error = HttpChatClient::new("/api").unwrap_err();
        assert!(matches!(error, ClientError::InvalidEndpoint { .. }));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpChatClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.url(SEND_PATH), "http://localhost:5000/api/chat/send");
    }

    #[tokio::test]
    async fn send_posts_message_and_decodes_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(body_json(json!({ "message": "Bonjour" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "Salut!" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpChatClient::new(server.uri()).unwrap();
        let reply = client.send("Bonjour").await.unwrap();

        assert_eq!(reply, SendReply::with_reply("Salut!"));
    }

    #[tokio::test]
    async fn error_status_with_json_body_is_still_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "result": { "status": "error", "message": "quota exceeded" }
            })))
            .mount(&server)
            .await;

        let client = HttpChatClient::new(server.uri()).unwrap();
        let reply = client.send("Bonjour").await.unwrap();

        assert_eq!(reply, SendReply::with_error("quota exceeded"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = HttpChatClient::new(server.uri()).unwrap();
        let error = client.send("Bonjour").await.unwrap_err();

        assert!(matches!(error, ClientError::DecodeResponse { status: 502, .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_failure() {
        // Non-pooled server: dropping it actually closes the listener.
        let server = MockServer::builder().start().await;
        let uri = server.uri();
        drop(server);

        let client = HttpChatClient::new(uri).unwrap();
        let error = client.send("Bonjour").await.unwrap_err();

        assert!(matches!(error, ClientError::HttpClient { .. }));
    }

    #[tokio::test]
    async fn reset_ignores_response_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(RESET_PATH))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpChatClient::new(server.uri()).unwrap();
        client.reset().await.unwrap();
    }
}
