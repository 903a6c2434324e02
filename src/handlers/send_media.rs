use axum::{
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{field, info, Instrument, Span};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::MediaSendRequest,
    services::messaging::UpstreamResponse,
    AppState,
};

pub const TOKEN_HEADER: &str = "token";

/// Validates a media-send request and relays it to the messaging API.
///
/// `OPTIONS` short-circuits with an empty 200. Every other method is treated
/// as a send. Validation failures become 400s; anything that breaks while
/// parsing or talking to the upstream becomes a 500.
pub async fn send_media(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let span = tracing::info_span!(
        "send_media",
        request_id = %Uuid::new_v4(),
        %method,
        media_type = field::Empty,
    );

    async move {
        match dispatch(&state, &headers, body).await {
            Ok(upstream) => {
                info!(status = upstream.status.as_u16(), "Relaying upstream response");
                upstream.into_response()
            }
            Err(err) => err.into_response(),
        }
    }
    .instrument(span)
    .await
}

async fn dispatch(
    state: &AppState,
    headers: &HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<UpstreamResponse> {
    let token = headers
        .get(TOKEN_HEADER)
        .map(|v| v.as_bytes())
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingToken)?;

    let body = body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge {
            max_size: state.config.max_body_size,
        },
        _ => AppError::InvalidBody(rejection.body_text()),
    })?;

    let request = MediaSendRequest::from_json(&body)?;
    let payload = request.into_payload()?;
    Span::current().record("media_type", payload.media_type.as_str());

    state.messaging_service.send_media(token, &payload).await
}
