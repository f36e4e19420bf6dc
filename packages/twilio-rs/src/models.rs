//! Response payloads from the Twilio Verify API.

use serde::Deserialize;

/// The subset of the Verification resource this client reads.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationResponse {
    pub sid: String,
    pub to: String,
    pub channel: String,
    /// `pending` until the code is checked elsewhere.
    pub status: String,
}
