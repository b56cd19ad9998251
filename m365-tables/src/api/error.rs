//! Error taxonomy and classification for Graph API failures
//!
//! Structured remote errors carry a code/message pair and can be selectively
//! ignored per table; everything else (transport, auth, config) propagates
//! unchanged.

use serde::Deserialize;
use thiserror::Error;

/// Result alias for the Graph API layer.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors produced by the Graph API layer.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Credential combination could not be turned into an authorizer
    /// (malformed certificate, unreadable key, bad endpoint).
    #[error("Authentication configuration error: {0}")]
    AuthConfig(String),

    /// Token acquisition failed for an otherwise well-formed strategy.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The Azure CLI fallback exited non-zero or produced unparseable output.
    #[error("Azure CLI token resolution failed: {0}")]
    CliResolution(String),

    /// Structured Graph API error envelope.
    #[error("Graph API error: {code} - {message}")]
    Api { code: String, message: String },

    /// Remote failure without a recognizable error envelope.
    #[error("Graph API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A pushed-down qual uses an operator the translator does not support
    /// for that column type.
    #[error("Unsupported qual: {0}")]
    UnsupportedQual(String),

    /// A per-user table was queried without a user id and no default user
    /// identifier is configured.
    #[error("No user id given and no default user identifier configured")]
    MissingUserId,
}

/// Normalized code/message pair extracted from a structured remote error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    pub code: String,
    pub message: String,
}

/// Classify an error into its normalized code/message pair. Returns `None`
/// for anything that is not a structured Graph API error, including
/// transport-level failures.
pub fn classify(err: &GraphError) -> Option<NormalizedError> {
    match err {
        GraphError::Api { code, message } => Some(NormalizedError {
            code: code.clone(),
            message: message.clone(),
        }),
        _ => None,
    }
}

/// True when the classified error's code exactly matches one of `codes`, or
/// its message contains one of them as a substring. Unclassifiable errors
/// are never ignorable.
pub fn is_ignorable(err: &GraphError, codes: &[&str]) -> bool {
    let Some(normalized) = classify(err) else {
        return false;
    };
    codes
        .iter()
        .any(|c| normalized.code == *c || normalized.message.contains(c))
}

/// [`is_ignorable`] over an `anyhow` chain, as seen at table-handler seams.
pub fn is_ignorable_in(err: &anyhow::Error, codes: &[&str]) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<GraphError>())
        .any(|e| is_ignorable(e, codes))
}

/// Stable (`v1.0`) error envelope: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Deserialize)]
struct StableEnvelope {
    error: EnvelopeBody,
}

/// Beta-variant envelope: code and message at the top level.
#[derive(Debug, Deserialize)]
struct EnvelopeBody {
    code: String,
    message: String,
}

/// Decode a remote error body into a [`GraphError`]. Recognizes the stable
/// and beta envelope shapes; anything else becomes an unstructured
/// [`GraphError::Status`].
pub fn decode_error_body(status: u16, body: &str) -> GraphError {
    if let Ok(stable) = serde_json::from_str::<StableEnvelope>(body) {
        return GraphError::Api {
            code: stable.error.code,
            message: stable.error.message,
        };
    }
    if let Ok(beta) = serde_json::from_str::<EnvelopeBody>(body) {
        return GraphError::Api {
            code: beta.code,
            message: beta.message,
        };
    }
    GraphError::Status {
        status,
        body: body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_envelope_classifies() {
        let body = r#"{"error":{"code":"Request_ResourceNotFound","message":"Resource 'x' does not exist."}}"#;
        let err = decode_error_body(404, body);
        let normalized = classify(&err).unwrap();
        assert_eq!(normalized.code, "Request_ResourceNotFound");
        assert!(normalized.message.contains("does not exist"));
    }

    #[test]
    fn beta_envelope_classifies() {
        let body = r#"{"code":"ErrorItemNotFound","message":"The specified object was not found in the store."}"#;
        let err = decode_error_body(404, body);
        let normalized = classify(&err).unwrap();
        assert_eq!(normalized.code, "ErrorItemNotFound");
    }

    #[test]
    fn unstructured_body_is_not_classifiable() {
        let err = decode_error_body(502, "<html>Bad Gateway</html>");
        assert!(classify(&err).is_none());
    }

    #[test]
    fn transport_and_config_errors_are_not_classifiable() {
        assert!(classify(&GraphError::AuthConfig("bad cert".into())).is_none());
        assert!(classify(&GraphError::CliResolution("exit 1".into())).is_none());
    }

    #[test]
    fn ignorable_matches_code_exactly() {
        let err = GraphError::Api {
            code: "ResourceNotFound".into(),
            message: "no mailbox".into(),
        };
        assert!(is_ignorable(&err, &["ResourceNotFound"]));
    }

    #[test]
    fn ignorable_matches_message_substring() {
        let err = GraphError::Api {
            code: "BadRequest".into(),
            message: "inner failure: ResourceNotFound for principal".into(),
        };
        assert!(is_ignorable(&err, &["ResourceNotFound"]));
    }

    #[test]
    fn unrelated_error_is_not_ignorable() {
        let err = GraphError::Api {
            code: "Authorization_RequestDenied".into(),
            message: "Insufficient privileges".into(),
        };
        assert!(!is_ignorable(&err, &["ResourceNotFound"]));
    }

    #[test]
    fn ignorable_through_anyhow_chain() {
        let err: anyhow::Error = GraphError::Api {
            code: "ErrorItemNotFound".into(),
            message: "gone".into(),
        }
        .into();
        let err = err.context("listing mail messages");
        assert!(is_ignorable_in(&err, &["ErrorItemNotFound"]));
        assert!(!is_ignorable_in(&err, &["ResourceNotFound"]));
    }
}
