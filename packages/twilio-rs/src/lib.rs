//! Minimal client for the Twilio Verify API.
//!
//! Covers the one operation the login flow needs: starting a
//! verification, which makes Twilio deliver a one-time code to a phone
//! number (SMS) or email address. Code checking is not part of this
//! client; acceptance happens in the flow that requested the dispatch.

pub mod models;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error};

use crate::models::VerificationResponse;

/// Errors from the Verify API or the transport underneath it.
#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Twilio returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

/// Account credentials and the Verify service to send through.
#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    pub service_id: String,
}

/// Handle to one Verify service. Cheap to clone; the underlying HTTP
/// client is shared.
#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Start a verification: Twilio delivers a one-time code to
    /// `recipient` and returns the verification resource.
    pub async fn send_otp(&self, recipient: &str) -> Result<VerificationResponse, TwilioError> {
        let url = format!(
            "https://verify.twilio.com/v2/Services/{}/Verifications",
            self.options.service_id
        );

        let channel = channel_for(recipient);
        let form = [("To", recipient), ("Channel", channel)];

        debug!(channel, "starting Twilio verification");
        let response = self
            .client
            .post(url)
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Twilio rejected the verification request");
            return Err(TwilioError::Api { status, body });
        }

        Ok(response.json::<VerificationResponse>().await?)
    }
}

/// Twilio can deliver to phone numbers and email addresses; the channel
/// is picked from the recipient's shape.
fn channel_for(recipient: &str) -> &'static str {
    if recipient.contains('@') {
        "email"
    } else {
        "sms"
    }
}
