//! Scheduled trigger events
//!
//! A scheduler publishes a message whose `data` is URL-safe base64 encoded
//! JSON describing one `trigger_all` invocation. Two shapes are accepted:
//! the push envelope `{"message": {"data": ...}, "subscription": ...}` and
//! the bare message `{"data": ...}` delivered to background functions.

use crate::error::{ErrorCode, Result, TfcError};
use crate::tfcloud::filter::TagFilter;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// One published message
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PubSubMessage {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, rename = "messageId", alias = "message_id")]
    pub message_id: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Push delivery wrapper around a message
#[derive(Debug, Clone, Deserialize)]
pub struct PubSubEnvelope {
    pub message: PubSubMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IncomingEvent {
    Envelope(PubSubEnvelope),
    Message(PubSubMessage),
}

/// Parameters of one scheduled `trigger_all` invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerAllRequest {
    pub organization: String,
    /// Name of the secret holding the API token
    pub secret_name: String,
    #[serde(default)]
    pub tags_included: Vec<String>,
    #[serde(default)]
    pub tags_excluded: Vec<String>,
}

impl TriggerAllRequest {
    pub fn tag_filter(&self) -> TagFilter {
        TagFilter::new(self.tags_included.iter(), self.tags_excluded.iter())
    }

    /// Decode the base64 `data` field of a message
    pub fn from_message(message: &PubSubMessage) -> Result<Self> {
        let data = message.data.as_deref().map(str::trim).unwrap_or_default();
        if data.is_empty() {
            return Err(TfcError::event(
                ErrorCode::EVENT_INVALID_ENVELOPE,
                "message carries no data",
            ));
        }

        let bytes = URL_SAFE_LENIENT
            .decode(data)
            .or_else(|_| STANDARD_LENIENT.decode(data))
            .map_err(|e| {
                TfcError::event(ErrorCode::EVENT_INVALID_BASE64, "message data is not base64")
                    .with_source(e)
            })?;

        Self::from_json(&bytes)
    }

    /// Parse the decoded JSON payload, checking required fields
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| {
            TfcError::event(ErrorCode::EVENT_INVALID_PAYLOAD, "message data is not JSON")
                .with_source(e)
        })?;

        for field in ["organization", "secret_name"] {
            if value.get(field).is_none() {
                return Err(TfcError::event(
                    ErrorCode::EVENT_MISSING_FIELD,
                    format!("must pass a '{field}' as input"),
                ));
            }
        }

        serde_json::from_value(value).map_err(|e| {
            TfcError::event(ErrorCode::EVENT_INVALID_PAYLOAD, "invalid trigger request")
                .with_source(e)
        })
    }
}

/// Parse an incoming event body and decode the request it carries
pub fn parse_event(body: &[u8]) -> Result<TriggerAllRequest> {
    let event: IncomingEvent = serde_json::from_slice(body).map_err(|e| {
        TfcError::event(
            ErrorCode::EVENT_INVALID_ENVELOPE,
            "event is neither a push envelope nor a message",
        )
        .with_source(e)
    })?;

    let message = match event {
        IncomingEvent::Envelope(envelope) => envelope.message,
        IncomingEvent::Message(message) => message,
    };

    TriggerAllRequest::from_message(&message)
}
