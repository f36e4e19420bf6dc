//! Flow commands - intent decided by the machine.
//!
//! A command is a request for IO (or for an observer notification). The
//! machine emits at most one per event; the controller executes it and
//! feeds any resulting fact back in.

use crate::error::ValidationError;
use crate::types::SocialProvider;

/// Actions the controller performs on the machine's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthCommand {
    /// Dispatch a verification code to the given number. `resend` is set
    /// when the code entry step asked for the code again.
    SendCode { phone_number: String, resend: bool },

    /// Run the social sign-in capability for the given provider.
    SocialSignIn { provider: SocialProvider },

    /// Mint and emit the session outcome for a completed credential path.
    EstablishSession { method: CompletedMethod },

    /// Surface a recoverable validation failure to the observer.
    SurfaceError { error: ValidationError },
}

/// Which credential path passed its guard.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletedMethod {
    Email { email: String },
    Otp { phone_number: String },
}
