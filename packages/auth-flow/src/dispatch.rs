//! OTP dispatch capability.
//!
//! The flow does not care how a code reaches the phone; it asks an
//! [`OtpGateway`] and moves on the resulting receipt. The bundled
//! [`SimulatedGateway`] reproduces a provider that always delivers;
//! a real backend (e.g. the Twilio Verify adapter in the host shell)
//! implements the same trait.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::DispatchError;
use crate::types::{hash_identifier, OTP_LEN};

/// Proof that a verification code went out.
///
/// Carried back to the hosting screen so it can render the code entry
/// prompt; retained by the controller for expiry checks.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReceipt {
    /// The number the code was sent to, as entered by the user.
    pub phone_number: String,
    /// How many codes have been issued to this number by this gateway.
    pub attempt: u32,
    pub issued_at: DateTime<Utc>,
}

impl DispatchReceipt {
    /// The prompt the code entry step shows.
    pub fn prompt(&self) -> String {
        format!(
            "Enter the {}-digit code sent to {}",
            OTP_LEN, self.phone_number
        )
    }
}

/// Capability for sending verification codes.
#[async_trait]
pub trait OtpGateway: Send + Sync {
    /// Dispatch a code to `phone_number`.
    ///
    /// Failures are recoverable: the flow stays in place and offers a
    /// retry.
    async fn send_code(&self, phone_number: &str) -> Result<DispatchReceipt, DispatchError>;
}

/// Gateway that records dispatches without sending anything.
///
/// Always succeeds. Tracks how many codes each number has been issued so
/// resends are visible to the host and to tests.
pub struct SimulatedGateway {
    attempts: Mutex<HashMap<String, u32>>,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self {
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Codes issued to `phone_number` so far.
    pub fn attempts_for(&self, phone_number: &str) -> u32 {
        self.attempts
            .lock()
            .expect("attempt map lock poisoned")
            .get(phone_number)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpGateway for SimulatedGateway {
    async fn send_code(&self, phone_number: &str) -> Result<DispatchReceipt, DispatchError> {
        let attempt = {
            let mut attempts = self.attempts.lock().expect("attempt map lock poisoned");
            let count = attempts.entry(phone_number.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let digest = hash_identifier(phone_number);
        info!(
            identifier = &digest[..12],
            attempt, "simulated verification code dispatched"
        );

        Ok(DispatchReceipt {
            phone_number: phone_number.to_string(),
            attempt,
            issued_at: Utc::now(),
        })
    }
}
