use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use reqwest::Client;
use serde::de::IgnoredAny;

use crate::{
    error::{AppError, Result},
    models::MediaPayload,
};

/// Status and body returned by the messaging API, relayed to the caller as-is.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

pub struct MessagingService {
    client: Client,
    endpoint: String,
}

impl MessagingService {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a media message. The caller's token is forwarded untouched and the
    /// upstream result is returned without interpretation.
    pub async fn send_media(&self, token: &[u8], payload: &MediaPayload) -> Result<UpstreamResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("token", token)
            .json(payload)
            .send()
            .await?;

        let status = StatusCode::from_u16(response.status().as_u16()).map_err(|e| {
            AppError::InvalidUpstreamResponse(format!("Invalid upstream status: {}", e))
        })?;
        let body = response.bytes().await?;

        // Must be JSON, but is relayed byte-for-byte
        serde_json::from_slice::<IgnoredAny>(&body)
            .map_err(|e| AppError::InvalidUpstreamResponse(e.to_string()))?;

        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> MediaPayload {
        MediaPayload {
            number: "5511999999999".to_string(),
            media_type: MediaType::Image,
            file: "https://x/y.png".to_string(),
            text: None,
            doc_name: None,
            replyid: None,
            mentions: None,
            readchat: Some(false),
            readmessages: None,
            delay: None,
            forward: None,
            track_source: None,
            track_id: None,
        }
    }

    #[tokio::test]
    async fn test_send_media_forwards_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send/media"))
            .and(header("token", "tok-1"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "number": "5511999999999",
                "type": "image",
                "file": "https://x/y.png",
                "readchat": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"messageid":"m1"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let service = MessagingService::new(format!("{}/send/media", server.uri()));
        let resp = service.send_media(b"tok-1", &payload()).await.unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, Bytes::from_static(br#"{"messageid":"m1"}"#));
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid token"}"#))
            .mount(&server)
            .await;

        let service = MessagingService::new(server.uri());
        let resp = service.send_media(b"bad", &payload()).await.unwrap();
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.body, Bytes::from_static(br#"{"error":"invalid token"}"#));
    }

    #[tokio::test]
    async fn test_non_json_upstream_body_is_internal_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let service = MessagingService::new(server.uri());
        let err = service.send_media(b"tok", &payload()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUpstreamResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_internal_error() {
        // Nothing listens on port 9 locally
        let service = MessagingService::new("http://127.0.0.1:9/send/media".to_string());
        let err = service.send_media(b"tok", &payload()).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
