use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::AppError;

/// Media kinds accepted by the upstream `/send/media` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Document,
    Audio,
    MyAudio,
    Ptt,
    Sticker,
}

impl MediaType {
    pub const ALL: [MediaType; 7] = [
        MediaType::Image,
        MediaType::Video,
        MediaType::Document,
        MediaType::Audio,
        MediaType::MyAudio,
        MediaType::Ptt,
        MediaType::Sticker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Document => "document",
            MediaType::Audio => "audio",
            MediaType::MyAudio => "myaudio",
            MediaType::Ptt => "ptt",
            MediaType::Sticker => "sticker",
        }
    }

    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(MediaType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::UnsupportedMediaType(s.to_string()))
    }
}

/// Inbound body of `POST /send-media`.
///
/// Every field is optional at the wire level; required fields are enforced
/// by [`MediaSendRequest::into_payload`] so that each one gets its own error.
#[derive(Debug, Default, Deserialize)]
pub struct MediaSendRequest {
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub file: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "docName")]
    pub doc_name: Option<String>,
    pub replyid: Option<String>,
    pub mentions: Option<String>,
    pub readchat: Option<bool>,
    pub readmessages: Option<bool>,
    pub delay: Option<serde_json::Number>,
    pub forward: Option<bool>,
    pub track_source: Option<String>,
    pub track_id: Option<String>,
}

/// Outbound body sent to the messaging API. Absent options are omitted,
/// never serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaPayload {
    pub number: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "docName", skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replyid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readchat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readmessages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
}

/// Empty strings count as missing.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl MediaSendRequest {
    /// Parses a request body. Any well-formed JSON is accepted; values that
    /// are not objects carry no fields and fail required-field validation.
    pub fn from_json(body: &[u8]) -> Result<Self, AppError> {
        match serde_json::from_slice(body)? {
            value @ serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
            _ => Ok(Self::default()),
        }
    }

    /// Validates required fields in order (number, type, file) and builds the
    /// outbound payload. The first failing check wins.
    pub fn into_payload(self) -> Result<MediaPayload, AppError> {
        let number = non_empty(self.number).ok_or(AppError::MissingField("number"))?;
        let media_type: MediaType = non_empty(self.media_type)
            .ok_or(AppError::MissingField("type"))?
            .parse()?;
        let file = non_empty(self.file).ok_or(AppError::MissingFile)?;

        Ok(MediaPayload {
            number,
            media_type,
            file,
            text: non_empty(self.text),
            doc_name: non_empty(self.doc_name),
            replyid: non_empty(self.replyid),
            mentions: non_empty(self.mentions),
            // flags and delay are forwarded when present, even if false or zero
            readchat: self.readchat,
            readmessages: self.readmessages,
            delay: self.delay,
            forward: self.forward,
            track_source: non_empty(self.track_source),
            track_id: non_empty(self.track_id),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
}
