//! QR payload codec
//!
//! Payload format: `{"type":"VISITOR_INVITE_V1","invitationId":"<id>","issuedAt":"<RFC 3339>"}`
//!
//! The type tag is the only integrity check. The payload carries no
//! signature, so whether the referenced invitation exists is for the
//! caller to establish through a repository lookup.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::id::InvitationId;

/// Schema tag carried by every payload
pub const PAYLOAD_TYPE: &str = "VISITOR_INVITE_V1";

/// Decoded QR payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub invitation_id: String,
    pub issued_at: String,
}

impl QrPayload {
    /// Build a payload for an invitation, issued now
    pub fn issue(invitation_id: &InvitationId) -> Self {
        Self::issue_at(invitation_id, Utc::now())
    }

    pub fn issue_at(invitation_id: &InvitationId, issued_at: DateTime<Utc>) -> Self {
        Self {
            kind: PAYLOAD_TYPE.to_string(),
            invitation_id: invitation_id.to_string(),
            issued_at: issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn invitation_id(&self) -> InvitationId {
        InvitationId::from(self.invitation_id.as_str())
    }

    /// Issuance instant, if the text is a valid RFC 3339 timestamp
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.issued_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Compact JSON text rendered into the QR code
    pub fn to_text(&self) -> String {
        // A struct of three strings always serializes
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Build a payload for an invitation
pub fn encode(invitation_id: &InvitationId) -> QrPayload {
    QrPayload::issue(invitation_id)
}

/// Validate a candidate value's shape and return the typed payload
pub fn decode_value(candidate: Value) -> Result<QrPayload> {
    if !candidate.is_object() {
        return Err(Error::InvalidPayload("payload is not an object".into()));
    }

    let payload: QrPayload = serde_json::from_value(candidate)
        .map_err(|e| Error::InvalidPayload(e.to_string()))?;

    if payload.kind != PAYLOAD_TYPE {
        return Err(Error::InvalidPayload(format!(
            "unexpected payload type '{}'",
            payload.kind
        )));
    }

    Ok(payload)
}

/// Validate scanned text
pub fn decode(text: &str) -> Result<QrPayload> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| Error::InvalidPayload(format!("not JSON: {e}")))?;
    decode_value(value)
}
