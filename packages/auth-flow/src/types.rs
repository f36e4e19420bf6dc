//! Domain types shared across the flow.
//!
//! Simple, serializable types; anything the hosting application persists
//! (the outcome, the audience) derives serde here.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Number of code-entry slots in the verification step.
pub const OTP_LEN: usize = 6;

/// The step a flow instance is currently showing.
///
/// Exactly one step is active at a time. `Complete` is terminal: the
/// instance is discarded after reaching it and a new one is created for
/// any subsequent login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginStep {
    /// Method selection (email / phone / social).
    Options,
    /// Email + password entry.
    Email,
    /// Phone number entry.
    Phone,
    /// Verification code entry.
    Otp,
    /// Terminal: a session outcome was emitted.
    Complete,
}

impl LoginStep {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginStep::Complete)
    }
}

impl fmt::Display for LoginStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoginStep::Options => "options",
            LoginStep::Email => "email",
            LoginStep::Phone => "phone",
            LoginStep::Otp => "otp",
            LoginStep::Complete => "complete",
        };
        write!(f, "{}", name)
    }
}

/// Which dashboard the session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Farmer,
    Buyer,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Farmer => "farmer",
            UserType::Buyer => "buyer",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Social sign-in providers the options step offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Apple,
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SocialProvider::Google => "google",
            SocialProvider::Apple => "apple",
        };
        write!(f, "{}", name)
    }
}

/// Transient credential fields for one login attempt.
///
/// Lives only inside the machine: cleared on back navigation, discarded
/// once an outcome is emitted. Never serialized, never logged.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    /// One slot per code character, each initially empty.
    pub otp_digits: [String; OTP_LEN],
}

impl Credentials {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Reset the code slots, keeping the retained phone number.
    pub fn clear_otp(&mut self) {
        self.otp_digits = Default::default();
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.phone_number.is_none()
            && self.otp_digits.iter().all(String::is_empty)
    }
}

/// Terminal success value delivered to the hosting application.
///
/// The receiver persists the session and routes to the matching
/// dashboard; this component retains nothing once it is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    pub user_type: UserType,
    pub user_id: Uuid,
}

/// Hash an identifier (phone number or email) using SHA256.
///
/// Identifiers never appear raw in log output; log sites use a prefix of
/// this digest instead.
pub fn hash_identifier(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    format!("{:x}", hasher.finalize())
}
