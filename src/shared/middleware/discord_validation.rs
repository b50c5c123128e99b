use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::shared::error::InteractionError;
use crate::shared::structs::{AppState, ApplicationPublicKey};

pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

/// Upper bound on a buffered interaction body. Anything larger is rejected
/// before the signature is checked.
pub const MAX_INTERACTION_BODY: usize = 1024 * 1024;

const SIGNATURE_LENGTH: usize = 64;

pub async fn validate_interaction(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let signature = header_value(request.headers(), SIGNATURE_HEADER);
    let timestamp = header_value(request.headers(), TIMESTAMP_HEADER);

    match buffer_request_body(request, &state.public_key, &signature, &timestamp).await {
        Ok(request) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Collects the body, verifies it and hands the same bytes back to the
/// request so the handler decodes exactly what was signed.
async fn buffer_request_body(
    request: Request,
    public_key: &ApplicationPublicKey,
    signature: &str,
    timestamp: &str,
) -> Result<Request, InteractionError> {
    require_signature_headers(signature, timestamp)?;

    let (parts, body) = request.into_parts();

    let bytes = Limited::new(body, MAX_INTERACTION_BODY)
        .collect()
        .await
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                InteractionError::Authentication(format!(
                    "body exceeds {MAX_INTERACTION_BODY} bytes and was not verified"
                ))
            } else {
                InteractionError::Authentication(format!("failed to collect body bytes: {e:?}"))
            }
        })?
        .to_bytes();

    verify_signature(public_key, signature, timestamp, &bytes)?;

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

fn require_signature_headers(signature: &str, timestamp: &str) -> Result<(), InteractionError> {
    if signature.is_empty() {
        return Err(InteractionError::Authentication(format!(
            "missing {SIGNATURE_HEADER} header"
        )));
    }

    if timestamp.is_empty() {
        return Err(InteractionError::Authentication(format!(
            "missing {TIMESTAMP_HEADER} header"
        )));
    }

    Ok(())
}

/// Checks an Ed25519 signature over `timestamp ++ body`.
///
/// `body` must be the raw bytes as received.
pub fn verify_signature(
    public_key: &ApplicationPublicKey,
    signature: &str,
    timestamp: &str,
    body: &[u8],
) -> Result<(), InteractionError> {
    require_signature_headers(signature, timestamp)?;

    let signature_bytes = hex::decode(signature).map_err(|e| {
        InteractionError::Authentication(format!("signature is not valid hex: {e}"))
    })?;

    if signature_bytes.len() != SIGNATURE_LENGTH {
        return Err(InteractionError::Authentication(format!(
            "signature must be {SIGNATURE_LENGTH} bytes, got {}",
            signature_bytes.len()
        )));
    }

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);

    match nacl::sign::verify(&signature_bytes, &message, public_key.as_bytes()) {
        Ok(true) => Ok(()),
        Ok(false) => Err(InteractionError::Authentication(
            "signature does not match the request".into(),
        )),
        Err(e) => Err(InteractionError::Authentication(format!(
            "Failed to verify: {e:?}"
        ))),
    }
}
