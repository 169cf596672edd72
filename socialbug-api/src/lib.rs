pub mod endpoints;
mod error;
mod macros;
pub mod repositories;
mod request;

pub use crate::error::ApiError;
pub use crate::request::{Endpoint, RequestData};
pub use reqwest::StatusCode;
pub use tokio_util::sync::CancellationToken;

use repositories::*;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use socialbug_session::SessionStore;
use std::sync::Arc;

/// Authenticated gateway to the REST API
///
/// The credential is read from the session store each time a request is
/// built, immediately before it is sent, so a logout between two calls is
/// always observed.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl Client {
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request, racing it against `cancel`
    ///
    /// A cancelled call resolves to [`ApiError::Cancelled`] whatever the
    /// transport does afterwards.
    pub async fn send<R>(&self, request: R, cancel: &CancellationToken) -> Result<R::Response, ApiError>
    where
        R: Endpoint,
    {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let builder = self.build(&request)?;
        tracing::debug!(method = %R::METHOD, endpoint = %request.endpoint(), "Sending request");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = Self::execute::<R::Response>(builder) => result,
        };

        match &result {
            Err(ApiError::Cancelled) => {
                tracing::debug!(endpoint = %request.endpoint(), "Request cancelled")
            }
            Err(e) => tracing::warn!(endpoint = %request.endpoint(), "Request failed: {}", e),
            Ok(_) => {}
        }
        result
    }

    /// Try each candidate in order until one is not a `404 Not Found`
    ///
    /// Success or any other failure ends the probe immediately. If every
    /// candidate is missing, the last not-found error is returned.
    pub async fn send_first_found<R, I>(
        &self,
        candidates: I,
        cancel: &CancellationToken,
    ) -> Result<R::Response, ApiError>
    where
        R: Endpoint,
        I: IntoIterator<Item = R>,
    {
        let mut last_not_found = None;

        for candidate in candidates {
            let endpoint = candidate.endpoint().into_owned();
            match self.send(candidate, cancel).await {
                Err(e) if e.is_not_found() => {
                    tracing::info!("Endpoint {} not found, trying next candidate", endpoint);
                    last_not_found = Some(e);
                }
                other => return other,
            }
        }

        Err(last_not_found
            .unwrap_or_else(|| ApiError::validation("No endpoint candidates to try")))
    }

    fn build<R: Endpoint>(&self, request: &R) -> Result<RequestBuilder, ApiError> {
        let url = format!("{}{}", self.base_url, request.endpoint());
        let mut builder = self.http.request(R::METHOD, url);

        if R::AUTHENTICATED {
            let credential = self.session.get().ok_or(ApiError::Unauthenticated)?;
            builder = builder.bearer_auth(credential.expose());
        }

        if let Some(form) = request.multipart() {
            return Ok(builder.multipart(form));
        }

        Ok(match request.data() {
            RequestData::Empty => builder,
            RequestData::Query(query) => builder.query(query),
            RequestData::Json(body) => builder.json(body),
        })
    }

    async fn execute<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        // Always drain the body, even for failures
        let body = response.text().await?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            };
            return Err(ApiError::RequestFailed { status, message });
        }

        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

pub struct Request;

impl Request {
    pub fn auth() -> AuthRepository {
        AuthRepository::new()
    }

    pub fn connections() -> ConnectionRepository {
        ConnectionRepository::new()
    }

    pub fn campaigns() -> CampaignRepository {
        CampaignRepository::new()
    }

    pub fn campaign_items(campaign_id: endpoints::CampaignId) -> CampaignItemRepository {
        CampaignItemRepository::new(campaign_id)
    }

    pub fn files() -> FileRepository {
        FileRepository::new()
    }

    pub fn posts() -> PostRepository {
        PostRepository::new()
    }

    pub fn insights() -> InsightRepository {
        InsightRepository::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::connections::Connection;
    use mockito::Server;
    use socialbug_session::MemorySessionStore;

    fn client(url: String, session: MemorySessionStore) -> Client {
        Client::new(url, Arc::new(session))
    }

    #[tokio::test]
    async fn attaches_bearer_credential() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/connections/active")
            .match_header("authorization", "Bearer tok-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": []}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client(server.url(), MemorySessionStore::with_credential("tok-1"));
        let res = client
            .send(Request::connections().active(), &CancellationToken::new())
            .await
            .unwrap();

        m.assert_async().await;
        assert!(res.content.is_empty());
    }

    #[tokio::test]
    async fn upload_part_carries_media_type() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/files/upload")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::Regex(r#"name="image"; filename="launch.png""#.to_string()),
                mockito::Matcher::Regex("(?i)content-type: image/png".to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"url": "https://cdn.example/launch.png"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client(server.url(), MemorySessionStore::with_credential("tok"));
        let res = client
            .send(
                Request::files().upload("launch.png", b"png-bytes".to_vec()),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        m.assert_async().await;
        assert_eq!(res.url.as_deref(), Some("https://cdn.example/launch.png"));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_sending() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/connections/active")
            .expect(0)
            .create_async()
            .await;

        let client = client(server.url(), MemorySessionStore::new());
        let err = client
            .send(Request::connections().active(), &CancellationToken::new())
            .await
            .unwrap_err();

        m.assert_async().await;
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn error_body_becomes_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/connections/7/disconnect")
            .with_status(409)
            .with_body("Connection already revoked")
            .create_async()
            .await;

        let client = client(server.url(), MemorySessionStore::with_credential("tok"));
        let err = client
            .send(Request::connections().disconnect(7), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(err.to_string(), "Connection already revoked");
    }

    #[tokio::test]
    async fn empty_error_body_falls_back_to_status_line() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/connections/active")
            .with_status(502)
            .create_async()
            .await;

        let client = client(server.url(), MemorySessionStore::with_credential("tok"));
        let err = client
            .send(Request::connections().active(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "502 Bad Gateway");
    }

    #[tokio::test]
    async fn undecodable_success_body_is_malformed() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/connections/active")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = client(server.url(), MemorySessionStore::with_credential("tok"));
        let err = client
            .send(Request::connections().active(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_success_body_decodes_as_ack() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/connections/3/disconnect")
            .with_status(200)
            .create_async()
            .await;

        let client = client(server.url(), MemorySessionStore::with_credential("tok"));
        let res = client
            .send(Request::connections().disconnect(3), &CancellationToken::new())
            .await;

        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/connections/active")
            .expect(0)
            .create_async()
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let client = client(server.url(), MemorySessionStore::with_credential("tok"));
        let err = client
            .send(Request::connections().active(), &cancel)
            .await
            .unwrap_err();

        m.assert_async().await;
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn fallback_only_follows_not_found() {
        let mut server = Server::new_async().await;
        let primary = server
            .mock("POST", "/campaigns")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;
        let fallback = server
            .mock("POST", "/campaigns/create")
            .with_status(201)
            .with_body(r#"{"id": 5}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client(server.url(), MemorySessionStore::with_credential("tok"));
        let candidates = Request::campaigns().create("Spring launch").candidates();
        client
            .send_first_found(candidates, &CancellationToken::new())
            .await
            .unwrap();

        primary.assert_async().await;
        fallback.assert_async().await;
    }

    #[tokio::test]
    async fn fallback_skipped_on_other_failures() {
        let mut server = Server::new_async().await;
        let primary = server
            .mock("POST", "/campaigns")
            .with_status(400)
            .with_body("name must not be blank")
            .expect(1)
            .create_async()
            .await;
        let fallback = server
            .mock("POST", "/campaigns/create")
            .expect(0)
            .create_async()
            .await;

        let client = client(server.url(), MemorySessionStore::with_credential("tok"));
        let candidates = Request::campaigns().create("").candidates();
        let err = client
            .send_first_found(candidates, &CancellationToken::new())
            .await
            .unwrap_err();

        primary.assert_async().await;
        fallback.assert_async().await;
        assert_eq!(err.to_string(), "name must not be blank");
    }

    #[test]
    fn connection_decodes_backend_shape() {
        let json = r#"{
            "id": 12,
            "platform": "INSTAGRAM",
            "username": "bugsy",
            "displayName": "Bugsy",
            "profilePictureUrl": null,
            "status": "ACTIVE",
            "expiresAt": "2024-06-01T12:00:00"
        }"#;
        let connection: Connection = serde_json::from_str(json).unwrap();
        assert_eq!(connection.id, 12);
        assert_eq!(connection.title(), "Bugsy");
        assert!(connection.expires_at.is_some());
    }
}
