//! JSON envelope codec.
//!
//! Transport-agnostic: it knows the wire shape of requests and envelopes and
//! nothing about which adapter will serve them. Turning an unknown action into
//! a caller-facing error is the dispatcher's job, not the codec's.

use serde::Deserialize;
use serde_json::Value;

use crate::{Action, AuthPayload, DecodeError, InboundRequest, LogPayload, MailPayload, ResponseEnvelope};

/// Body written if serialising an envelope ever fails.
const FALLBACK_BODY: &[u8] = br#"{"error":true,"message":"internal error"}"#;

/// Payload members of an inbound request. `action` is read separately, first,
/// so that an unrecognised action wins over a badly shaped member.
#[derive(Deserialize)]
struct WireMembers {
    #[serde(default)]
    auth: Option<AuthPayload>,
    #[serde(default)]
    log: Option<LogPayload>,
    #[serde(default)]
    mail: Option<MailPayload>,
}

fn malformed(reason: impl ToString) -> DecodeError {
    DecodeError::Malformed {
        reason: reason.to_string(),
    }
}

/// Decodes an inbound request body.
///
/// # Errors
///
/// - [`DecodeError::Malformed`] when the body is not a JSON object, has no
///   string `action`, or a member does not have the payload shape.
/// - [`DecodeError::UnknownAction`] when `action` is not one of
///   [`Action::ALL`], whatever the members look like.
pub fn decode(bytes: &[u8]) -> Result<InboundRequest, DecodeError> {
    let mut body: Value = serde_json::from_slice(bytes).map_err(malformed)?;
    let object = body
        .as_object_mut()
        .ok_or_else(|| malformed("request body must be a JSON object"))?;

    let raw_action = match object.remove("action") {
        Some(Value::String(action)) => action,
        Some(Value::Null) | None => return Err(malformed("missing field `action`")),
        Some(_) => return Err(malformed("field `action` must be a string")),
    };
    let action = raw_action
        .parse::<Action>()
        .map_err(|unknown| DecodeError::UnknownAction { action: unknown.0 })?;

    let members: WireMembers = serde_json::from_value(body).map_err(malformed)?;
    Ok(InboundRequest {
        action,
        auth: members.auth,
        log: members.log,
        mail: members.mail,
    })
}

/// Encodes a response envelope. Never fails.
pub fn encode(envelope: &ResponseEnvelope) -> Vec<u8> {
    serde_json::to_vec(envelope).unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to serialise response envelope");
        FALLBACK_BODY.to_vec()
    })
}

/// Decodes a response envelope, enforcing its invariants.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] when the body is not an envelope or
/// violates an envelope invariant.
pub fn decode_envelope(bytes: &[u8]) -> Result<ResponseEnvelope, DecodeError> {
    serde_json::from_slice(bytes).map_err(|err| DecodeError::Malformed {
        reason: err.to_string(),
    })
}
