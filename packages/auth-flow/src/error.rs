//! Error types for the flow.
//!
//! # The Error Boundary Rule
//!
//! > **Nothing but a user-visible string crosses the observer boundary.**
//!
//! Every failure here is recoverable: the flow stays in its current step
//! and the `Display` form of the error is handed to
//! [`FlowObserver::on_error`](crate::FlowObserver::on_error). No error is
//! thrown across the component boundary and there is no failure outcome
//! event.

use thiserror::Error;

use crate::types::SocialProvider;

/// Malformed or incomplete credentials for the current step.
///
/// The `Display` strings are the exact inline messages the hosting
/// screen renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a valid email and password (min 6 chars)")]
    EmailCredentials,

    #[error("Enter a valid phone number")]
    PhoneNumber,

    #[error("Enter all 6 digits")]
    OtpIncomplete,

    /// Only produced when the flow is configured with a code
    /// time-to-live.
    #[error("Code expired, request a new one")]
    OtpExpired,
}

/// The verification code could not be sent.
///
/// Non-fatal: the flow stays in place and the user can retry or resend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Could not reach the verification service, try again")]
    Unavailable(String),

    #[error("The verification service rejected the request, try again")]
    Rejected(String),
}

impl DispatchError {
    /// Internal detail for logging; never shown to the user.
    pub fn detail(&self) -> &str {
        match self {
            DispatchError::Unavailable(detail) | DispatchError::Rejected(detail) => detail,
        }
    }
}

/// A social sign-in attempt failed before producing an identity.
///
/// Surfaced exactly like a validation error: the flow stays on the
/// options step and the user may try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthProviderError {
    #[error("Sign-in was cancelled")]
    Cancelled,

    #[error("Could not reach {provider}, try again")]
    Network {
        provider: SocialProvider,
        reason: String,
    },

    #[error("{provider} sign-in failed, try again")]
    Rejected {
        provider: SocialProvider,
        reason: String,
    },
}
