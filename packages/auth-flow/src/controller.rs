//! The flow controller - the runtime loop around the machine.
//!
//! One controller owns one login attempt: it feeds events to the
//! machine, executes the command the machine decides on, feeds the
//! resulting fact back in, and notifies the observer. Single-threaded
//! and event-driven; each call synchronously advances or holds state,
//! and exactly one controller exists per active login session.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::commands::{AuthCommand, CompletedMethod};
use crate::dispatch::{DispatchReceipt, OtpGateway};
use crate::error::ValidationError;
use crate::events::AuthFlowEvent;
use crate::machine::AuthFlowMachine;
use crate::observer::FlowObserver;
use crate::provider::AuthProvider;
use crate::types::{hash_identifier, AuthOutcome, LoginStep, SocialProvider, UserType, OTP_LEN};

/// Per-flow configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// The audience this shell signs users into.
    pub user_type: UserType,
    /// When set, codes older than this are rejected at submission and
    /// the user is asked to resend. Off by default.
    pub otp_ttl: Option<chrono::Duration>,
}

impl FlowConfig {
    pub fn new(user_type: UserType) -> Self {
        Self {
            user_type,
            otp_ttl: None,
        }
    }

    pub fn with_otp_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.otp_ttl = Some(ttl);
        self
    }
}

/// Orchestrates one login attempt from method selection to the session
/// outcome.
pub struct AuthFlowController {
    machine: AuthFlowMachine,
    gateway: Arc<dyn OtpGateway>,
    provider: Arc<dyn AuthProvider>,
    observer: Box<dyn FlowObserver>,
    config: FlowConfig,
    receipt: Option<DispatchReceipt>,
    emitted: bool,
}

impl AuthFlowController {
    pub fn new(
        config: FlowConfig,
        gateway: Arc<dyn OtpGateway>,
        provider: Arc<dyn AuthProvider>,
        observer: Box<dyn FlowObserver>,
    ) -> Self {
        Self {
            machine: AuthFlowMachine::new(),
            gateway,
            provider,
            observer,
            config,
            receipt: None,
            emitted: false,
        }
    }

    pub fn step(&self) -> LoginStep {
        self.machine.step()
    }

    /// The receipt for the most recent code dispatch, if any.
    pub fn receipt(&self) -> Option<&DispatchReceipt> {
        self.receipt.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.machine.step().is_terminal()
    }

    /// The inline error for the current step, if the last submission
    /// failed.
    pub fn current_error(&self) -> Option<ValidationError> {
        self.machine.current_error()
    }

    // -------------------------------------------------------------------
    // Input surface, one method per UI event
    // -------------------------------------------------------------------

    pub async fn select_method(&mut self, method: LoginStep) {
        self.handle(AuthFlowEvent::SelectMethod { method }).await;
    }

    pub async fn submit_email_form(
        &mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) {
        self.handle(AuthFlowEvent::SubmitEmail {
            email: email.into(),
            password: password.into(),
        })
        .await;
    }

    pub async fn submit_phone_form(&mut self, phone_number: impl Into<String>) {
        self.handle(AuthFlowEvent::SubmitPhone {
            phone_number: phone_number.into(),
        })
        .await;
    }

    pub async fn submit_otp_form(&mut self, digits: [String; OTP_LEN]) {
        self.handle(AuthFlowEvent::SubmitOtp { digits }).await;
    }

    pub async fn resend(&mut self) {
        self.handle(AuthFlowEvent::Resend).await;
    }

    pub async fn back(&mut self) {
        self.handle(AuthFlowEvent::Back).await;
    }

    pub async fn select_social(&mut self, provider: SocialProvider) {
        self.handle(AuthFlowEvent::SelectSocial { provider }).await;
    }

    // -------------------------------------------------------------------
    // Runtime loop
    // -------------------------------------------------------------------

    /// Advance the flow with one event.
    pub async fn handle(&mut self, event: AuthFlowEvent) {
        if self.machine.step().is_terminal() {
            debug!("flow already complete, event ignored");
            return;
        }

        // Expired codes are rejected before the machine sees the
        // submission; the machine itself has no clock.
        if matches!(event, AuthFlowEvent::SubmitOtp { .. })
            && self.machine.step() == LoginStep::Otp
            && self.receipt_expired()
        {
            self.observer
                .on_error(&ValidationError::OtpExpired.to_string());
            return;
        }

        let before = self.machine.step();
        let abandoning = matches!(event, AuthFlowEvent::Back);
        let mut redispatched = false;
        if let Some(command) = self.machine.decide(&event) {
            redispatched = self.execute(command).await;
        }
        if abandoning {
            // Abandonment discards the attempt entirely, receipt included.
            self.receipt = None;
        }

        let after = self.machine.step();
        if after.is_terminal() {
            // Completion is reported through on_success, not as a step.
            return;
        }
        if after != before || redispatched {
            let receipt = match after {
                LoginStep::Otp => self.receipt.as_ref(),
                _ => None,
            };
            self.observer.on_step_changed(after, receipt);
        }
    }

    /// Execute one command; returns true when a fresh receipt was
    /// issued.
    async fn execute(&mut self, command: AuthCommand) -> bool {
        match command {
            AuthCommand::SurfaceError { error } => {
                self.observer.on_error(&error.to_string());
                false
            }

            AuthCommand::SendCode {
                phone_number,
                resend,
            } => match self.gateway.send_code(&phone_number).await {
                Ok(receipt) => {
                    self.receipt = Some(receipt.clone());
                    self.apply_fact(AuthFlowEvent::CodeDispatched { receipt });
                    true
                }
                Err(err) => {
                    let digest = hash_identifier(&phone_number);
                    warn!(
                        identifier = &digest[..12],
                        resend,
                        detail = err.detail(),
                        "verification code dispatch failed"
                    );
                    self.observer.on_error(&err.to_string());
                    false
                }
            },

            AuthCommand::SocialSignIn { provider } => {
                match self.provider.sign_in(provider).await {
                    Ok(identity) => {
                        let outcome = AuthOutcome {
                            user_type: self.config.user_type,
                            user_id: identity.subject,
                        };
                        self.establish(outcome);
                    }
                    Err(err) => {
                        warn!(%provider, "social sign-in failed: {err}");
                        self.observer.on_error(&err.to_string());
                    }
                }
                false
            }

            AuthCommand::EstablishSession { method } => {
                // Nothing upstream authenticates these paths; the
                // identifier is minted fresh per session.
                let outcome = AuthOutcome {
                    user_type: self.config.user_type,
                    user_id: Uuid::new_v4(),
                };
                match &method {
                    CompletedMethod::Email { .. } => {
                        debug!(user_id = %outcome.user_id, "email credentials accepted")
                    }
                    CompletedMethod::Otp { phone_number } => {
                        let digest = hash_identifier(phone_number);
                        debug!(
                            user_id = %outcome.user_id,
                            identifier = &digest[..12],
                            "verification code accepted"
                        )
                    }
                }
                self.establish(outcome);
                false
            }
        }
    }

    /// Feed the session fact into the machine and deliver the outcome
    /// exactly once.
    fn establish(&mut self, outcome: AuthOutcome) {
        self.apply_fact(AuthFlowEvent::SessionEstablished {
            outcome: outcome.clone(),
        });
        if self.machine.step().is_terminal() && !self.emitted {
            self.emitted = true;
            info!(user_type = %outcome.user_type, user_id = %outcome.user_id, "login flow complete");
            self.observer.on_success(&outcome);
        }
    }

    fn apply_fact(&mut self, fact: AuthFlowEvent) {
        // Facts never produce further commands in this flow.
        let _ = self.machine.decide(&fact);
    }

    fn receipt_expired(&self) -> bool {
        match (self.config.otp_ttl, &self.receipt) {
            (Some(ttl), Some(receipt)) => Utc::now() - receipt.issued_at > ttl,
            _ => false,
        }
    }
}
