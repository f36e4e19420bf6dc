//! The login flow state machine.
//!
//! The machine interprets events and decides on commands. State lives
//! inside the machine and `decide` is synchronous.
//!
//! # Key Properties
//!
//! - **State is internal**: step, credentials and the inline error are
//!   owned by the machine via `&mut self`
//! - **Pure decisions**: no IO, no async, no clock; just transitions and
//!   command emission
//! - **One event → one command**: `decide` returns `Option<AuthCommand>`
//! - **Failures hold the step**: a failed guard sets the inline error and
//!   surfaces it; the step does not advance
//!
//! # Transitions
//!
//! ```text
//! Options ──selectMethod(Email)──► Email ──submit(valid)────► Complete
//!    │                               │  └──submit(invalid)──► Email (error)
//!    │                               └──back───────────────► Options
//!    ├─selectMethod(Phone)─────────► Phone ──submit(valid)──► Otp (code sent)
//!    │                               │  └──submit(invalid)──► Phone (error)
//!    │                               └──back───────────────► Options
//!    └─selectSocial(provider)──────► Complete
//!                                   Otp ──submit(filled)────► Complete
//!                                    │ ├──submit(partial)───► Otp (error)
//!                                    │ ├──resend────────────► Otp (fresh code)
//!                                    │ └──back──────────────► Options
//! ```
//!
//! Any event not listed for the current step is a no-op, and the
//! terminal step ignores everything.

use tracing::debug;

use crate::commands::{AuthCommand, CompletedMethod};
use crate::error::ValidationError;
use crate::events::AuthFlowEvent;
use crate::types::{Credentials, LoginStep};
use crate::validate::{validate_email, validate_otp, validate_password, validate_phone};

/// Pure state machine for one login attempt.
///
/// Create one per login session; drop it once it reaches the terminal
/// step. The controller owns the IO this machine asks for.
pub struct AuthFlowMachine {
    step: LoginStep,
    credentials: Credentials,
    error: Option<ValidationError>,
}

impl AuthFlowMachine {
    pub fn new() -> Self {
        Self {
            step: LoginStep::Options,
            credentials: Credentials::default(),
            error: None,
        }
    }

    pub fn step(&self) -> LoginStep {
        self.step
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The inline error for the current step, if the last submission
    /// failed its guard.
    pub fn current_error(&self) -> Option<ValidationError> {
        self.error
    }

    /// Process an event and optionally return a command.
    ///
    /// Called synchronously and serially; at most one command per event.
    pub fn decide(&mut self, event: &AuthFlowEvent) -> Option<AuthCommand> {
        match (self.step, event) {
            // Terminal: the instance is finished.
            (LoginStep::Complete, _) => None,

            // Facts
            (LoginStep::Phone, AuthFlowEvent::CodeDispatched { .. }) => {
                self.step = LoginStep::Otp;
                None
            }
            (_, AuthFlowEvent::SessionEstablished { .. }) => {
                self.credentials.clear();
                self.error = None;
                self.step = LoginStep::Complete;
                None
            }

            // Options
            (LoginStep::Options, AuthFlowEvent::SelectMethod { method }) => match method {
                LoginStep::Email => {
                    self.error = None;
                    self.step = LoginStep::Email;
                    None
                }
                LoginStep::Phone => {
                    self.error = None;
                    self.step = LoginStep::Phone;
                    None
                }
                // Otp is only reachable through a dispatched code.
                _ => None,
            },
            (LoginStep::Options, AuthFlowEvent::SelectSocial { provider }) => {
                self.error = None;
                Some(AuthCommand::SocialSignIn {
                    provider: *provider,
                })
            }

            // Email
            (LoginStep::Email, AuthFlowEvent::SubmitEmail { email, password }) => {
                if validate_email(email) && validate_password(password) {
                    self.error = None;
                    self.credentials.email = Some(email.clone());
                    self.credentials.password = Some(password.clone());
                    Some(AuthCommand::EstablishSession {
                        method: CompletedMethod::Email {
                            email: email.clone(),
                        },
                    })
                } else {
                    self.fail(ValidationError::EmailCredentials)
                }
            }

            // Phone
            (LoginStep::Phone, AuthFlowEvent::SubmitPhone { phone_number }) => {
                if validate_phone(phone_number) {
                    self.error = None;
                    self.credentials.phone_number = Some(phone_number.clone());
                    Some(AuthCommand::SendCode {
                        phone_number: phone_number.clone(),
                        resend: false,
                    })
                } else {
                    self.fail(ValidationError::PhoneNumber)
                }
            }

            // Otp
            (LoginStep::Otp, AuthFlowEvent::SubmitOtp { digits }) => {
                self.credentials.otp_digits = digits.clone();
                if validate_otp(digits) {
                    self.error = None;
                    let phone_number = self.credentials.phone_number.clone().unwrap_or_default();
                    Some(AuthCommand::EstablishSession {
                        method: CompletedMethod::Otp { phone_number },
                    })
                } else {
                    self.fail(ValidationError::OtpIncomplete)
                }
            }
            (LoginStep::Otp, AuthFlowEvent::Resend) => {
                // The retained phone number is reused; only the code
                // entry resets.
                self.credentials.clear_otp();
                self.error = None;
                let phone_number = self.credentials.phone_number.clone()?;
                self.step = LoginStep::Phone;
                Some(AuthCommand::SendCode {
                    phone_number,
                    resend: true,
                })
            }

            // Abandonment from any credential step.
            (
                LoginStep::Email | LoginStep::Phone | LoginStep::Otp,
                AuthFlowEvent::Back,
            ) => {
                self.credentials.clear();
                self.error = None;
                self.step = LoginStep::Options;
                None
            }

            // Everything else is explicitly a no-op.
            (step, event) => {
                debug!(step = %step, role = ?event.role(), "event ignored in current step");
                None
            }
        }
    }

    fn fail(&mut self, error: ValidationError) -> Option<AuthCommand> {
        self.error = Some(error);
        Some(AuthCommand::SurfaceError { error })
    }
}

impl Default for AuthFlowMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchReceipt;
    use crate::types::{AuthOutcome, SocialProvider, UserType, OTP_LEN};
    use uuid::Uuid;

    fn otp(parts: [&str; OTP_LEN]) -> [String; OTP_LEN] {
        parts.map(str::to_string)
    }

    fn dispatched(phone_number: &str) -> AuthFlowEvent {
        AuthFlowEvent::CodeDispatched {
            receipt: DispatchReceipt {
                phone_number: phone_number.to_string(),
                attempt: 1,
                issued_at: chrono::Utc::now(),
            },
        }
    }

    fn established() -> AuthFlowEvent {
        AuthFlowEvent::SessionEstablished {
            outcome: AuthOutcome {
                user_type: UserType::Farmer,
                user_id: Uuid::new_v4(),
            },
        }
    }

    #[test]
    fn test_initial_state() {
        let machine = AuthFlowMachine::new();
        assert_eq!(machine.step(), LoginStep::Options);
        assert!(machine.credentials().is_empty());
        assert!(machine.current_error().is_none());
    }

    #[test]
    fn test_select_email_then_back_clears_credentials() {
        let mut machine = AuthFlowMachine::new();

        machine.decide(&AuthFlowEvent::SelectMethod {
            method: LoginStep::Email,
        });
        assert_eq!(machine.step(), LoginStep::Email);

        machine.decide(&AuthFlowEvent::SubmitEmail {
            email: "bad".to_string(),
            password: "short".to_string(),
        });
        assert_eq!(
            machine.current_error(),
            Some(ValidationError::EmailCredentials)
        );

        machine.decide(&AuthFlowEvent::Back);
        assert_eq!(machine.step(), LoginStep::Options);
        assert!(machine.credentials().is_empty());
        assert!(machine.current_error().is_none());
    }

    #[test]
    fn test_email_guard_failure_holds_step() {
        let mut machine = AuthFlowMachine::new();
        machine.decide(&AuthFlowEvent::SelectMethod {
            method: LoginStep::Email,
        });

        let cmd = machine.decide(&AuthFlowEvent::SubmitEmail {
            email: "bad-email".to_string(),
            password: "123456".to_string(),
        });

        assert_eq!(
            cmd,
            Some(AuthCommand::SurfaceError {
                error: ValidationError::EmailCredentials
            })
        );
        assert_eq!(machine.step(), LoginStep::Email);
    }

    #[test]
    fn test_email_guard_success_requests_session() {
        let mut machine = AuthFlowMachine::new();
        machine.decide(&AuthFlowEvent::SelectMethod {
            method: LoginStep::Email,
        });

        let cmd = machine.decide(&AuthFlowEvent::SubmitEmail {
            email: "a@b.com".to_string(),
            password: "123456".to_string(),
        });

        assert_eq!(
            cmd,
            Some(AuthCommand::EstablishSession {
                method: CompletedMethod::Email {
                    email: "a@b.com".to_string()
                }
            })
        );
    }

    #[test]
    fn test_valid_phone_requests_exactly_one_dispatch() {
        let mut machine = AuthFlowMachine::new();
        machine.decide(&AuthFlowEvent::SelectMethod {
            method: LoginStep::Phone,
        });

        let cmd = machine.decide(&AuthFlowEvent::SubmitPhone {
            phone_number: "9876543210".to_string(),
        });

        assert_eq!(
            cmd,
            Some(AuthCommand::SendCode {
                phone_number: "9876543210".to_string(),
                resend: false,
            })
        );
        // Still on the phone step until the dispatch fact lands.
        assert_eq!(machine.step(), LoginStep::Phone);

        assert_eq!(machine.decide(&dispatched("9876543210")), None);
        assert_eq!(machine.step(), LoginStep::Otp);
    }

    #[test]
    fn test_invalid_phone_holds_step() {
        let mut machine = AuthFlowMachine::new();
        machine.decide(&AuthFlowEvent::SelectMethod {
            method: LoginStep::Phone,
        });

        let cmd = machine.decide(&AuthFlowEvent::SubmitPhone {
            phone_number: "12345".to_string(),
        });

        assert_eq!(
            cmd,
            Some(AuthCommand::SurfaceError {
                error: ValidationError::PhoneNumber
            })
        );
        assert_eq!(machine.step(), LoginStep::Phone);
    }

    #[test]
    fn test_resend_keeps_phone_and_clears_digits() {
        let mut machine = AuthFlowMachine::new();
        machine.decide(&AuthFlowEvent::SelectMethod {
            method: LoginStep::Phone,
        });
        machine.decide(&AuthFlowEvent::SubmitPhone {
            phone_number: "9876543210".to_string(),
        });
        machine.decide(&dispatched("9876543210"));
        machine.decide(&AuthFlowEvent::SubmitOtp {
            digits: otp(["1", "2", "3", "", "", ""]),
        });

        let cmd = machine.decide(&AuthFlowEvent::Resend);

        assert_eq!(
            cmd,
            Some(AuthCommand::SendCode {
                phone_number: "9876543210".to_string(),
                resend: true,
            })
        );
        assert!(machine.credentials().otp_digits.iter().all(String::is_empty));
        assert_eq!(
            machine.credentials().phone_number.as_deref(),
            Some("9876543210")
        );

        // The fresh dispatch fact re-enters the code entry step.
        machine.decide(&dispatched("9876543210"));
        assert_eq!(machine.step(), LoginStep::Otp);
    }

    #[test]
    fn test_otp_submission_paths() {
        let mut machine = AuthFlowMachine::new();
        machine.decide(&AuthFlowEvent::SelectMethod {
            method: LoginStep::Phone,
        });
        machine.decide(&AuthFlowEvent::SubmitPhone {
            phone_number: "9876543210".to_string(),
        });
        machine.decide(&dispatched("9876543210"));

        let cmd = machine.decide(&AuthFlowEvent::SubmitOtp {
            digits: otp(["1", "2", "3", "", "5", "6"]),
        });
        assert_eq!(
            cmd,
            Some(AuthCommand::SurfaceError {
                error: ValidationError::OtpIncomplete
            })
        );
        assert_eq!(machine.step(), LoginStep::Otp);

        let cmd = machine.decide(&AuthFlowEvent::SubmitOtp {
            digits: otp(["1", "2", "3", "4", "5", "6"]),
        });
        assert_eq!(
            cmd,
            Some(AuthCommand::EstablishSession {
                method: CompletedMethod::Otp {
                    phone_number: "9876543210".to_string()
                }
            })
        );
    }

    #[test]
    fn test_social_selection_requests_sign_in() {
        let mut machine = AuthFlowMachine::new();

        let cmd = machine.decide(&AuthFlowEvent::SelectSocial {
            provider: SocialProvider::Google,
        });

        assert_eq!(
            cmd,
            Some(AuthCommand::SocialSignIn {
                provider: SocialProvider::Google
            })
        );
        assert_eq!(machine.step(), LoginStep::Options);
    }

    #[test]
    fn test_session_fact_is_terminal_and_discards_credentials() {
        let mut machine = AuthFlowMachine::new();
        machine.decide(&AuthFlowEvent::SelectMethod {
            method: LoginStep::Email,
        });
        machine.decide(&AuthFlowEvent::SubmitEmail {
            email: "a@b.com".to_string(),
            password: "123456".to_string(),
        });

        machine.decide(&established());
        assert_eq!(machine.step(), LoginStep::Complete);
        assert!(machine.credentials().is_empty());

        // A finished instance ignores everything.
        assert_eq!(
            machine.decide(&AuthFlowEvent::SelectMethod {
                method: LoginStep::Phone
            }),
            None
        );
        assert_eq!(machine.decide(&AuthFlowEvent::Back), None);
        assert_eq!(machine.step(), LoginStep::Complete);
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        let mut machine = AuthFlowMachine::new();

        // Submissions outside their step do nothing.
        assert_eq!(
            machine.decide(&AuthFlowEvent::SubmitPhone {
                phone_number: "9876543210".to_string()
            }),
            None
        );
        assert_eq!(machine.decide(&AuthFlowEvent::Resend), None);
        assert_eq!(machine.decide(&AuthFlowEvent::Back), None);
        assert_eq!(machine.step(), LoginStep::Options);

        // Otp is not a selectable entry point.
        assert_eq!(
            machine.decide(&AuthFlowEvent::SelectMethod {
                method: LoginStep::Otp
            }),
            None
        );
        assert_eq!(machine.step(), LoginStep::Options);
    }
}
