use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use twilio::TwilioOptions;

/// Process configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Present when the Twilio variables are set; the shell then sends
    /// real verification codes instead of simulating dispatch.
    pub twilio: Option<TwilioOptions>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let twilio = match env::var("TWILIO_ACCOUNT_SID") {
            Ok(account_sid) => Some(TwilioOptions {
                account_sid,
                auth_token: env::var("TWILIO_AUTH_TOKEN")
                    .context("TWILIO_AUTH_TOKEN must be set when TWILIO_ACCOUNT_SID is")?,
                service_id: env::var("TWILIO_VERIFY_SERVICE_SID")
                    .context("TWILIO_VERIFY_SERVICE_SID must be set when TWILIO_ACCOUNT_SID is")?,
            }),
            Err(_) => None,
        };

        Ok(Self { twilio })
    }
}
