use serde::{Deserialize, Serialize};

/// Body of the token issuance call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

/// Body of the audio synthesis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioRequest {
    pub word: String,
    pub email: String,
    pub token: String,
}

/// Envelope returned by both endpoints. On `code == 200` the message is the
/// payload (a notice for token issuance, base64 MP3 for synthesis).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteReply {
    pub code: i32,
    pub message: String,
}

impl RemoteReply {
    pub const OK: i32 = 200;
    /// Observed when the token is invalid or expired.
    pub const TOKEN_REJECTED: i32 = 500;

    pub fn is_success(&self) -> bool {
        self.code == Self::OK
    }
}
