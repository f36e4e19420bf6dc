//! Twilio-backed OTP gateway.

use std::collections::HashMap;
use std::sync::Mutex;

use auth_flow::{async_trait, DispatchError, DispatchReceipt, OtpGateway};
use chrono::Utc;
use twilio::{TwilioError, TwilioOptions, TwilioService};

/// Sends verification codes through Twilio Verify, tracking issuance
/// per number the way the simulated gateway does.
pub struct TwilioGateway {
    service: TwilioService,
    attempts: Mutex<HashMap<String, u32>>,
}

impl TwilioGateway {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            service: TwilioService::new(options),
            attempts: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl OtpGateway for TwilioGateway {
    async fn send_code(&self, phone_number: &str) -> Result<DispatchReceipt, DispatchError> {
        self.service
            .send_otp(phone_number)
            .await
            .map_err(map_error)?;

        let attempt = {
            let mut attempts = self.attempts.lock().expect("attempt map lock poisoned");
            let count = attempts.entry(phone_number.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        Ok(DispatchReceipt {
            phone_number: phone_number.to_string(),
            attempt,
            issued_at: Utc::now(),
        })
    }
}

fn map_error(err: TwilioError) -> DispatchError {
    match err {
        TwilioError::Transport(inner) => DispatchError::Unavailable(inner.to_string()),
        TwilioError::Api { status, body } => {
            DispatchError::Rejected(format!("{status}: {body}"))
        }
    }
}
