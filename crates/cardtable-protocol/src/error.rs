//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding, or interpreting wire
/// messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing required fields, or
    /// wrong data types.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The action envelope decoded fine but names an unknown action kind or
    /// carries a malformed argument bundle.
    #[error("invalid action {0}")]
    InvalidAction(String),
}
