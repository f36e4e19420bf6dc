//! Flow events.
//!
//! One enum, two roles: **input** events originate at the hosting
//! screen's edge (button presses, form submissions), **fact** events are
//! produced by effects and fed back in by the controller. The machine
//! decides on both; only input events can ever produce a command.

use crate::dispatch::DispatchReceipt;
use crate::types::{AuthOutcome, LoginStep, SocialProvider, OTP_LEN};

/// The role of an event in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRole {
    /// Edge-originated (user pressed something).
    Input,
    /// Effect-produced (ground truth about what happened).
    Fact,
}

/// Everything that can happen to one flow instance.
#[derive(Debug, Clone)]
pub enum AuthFlowEvent {
    /// A login method was chosen on the options step. Only `Email` and
    /// `Phone` are selectable entry points.
    SelectMethod { method: LoginStep },

    /// Email + password form submitted.
    SubmitEmail { email: String, password: String },

    /// Phone number form submitted.
    SubmitPhone { phone_number: String },

    /// Verification code slots submitted.
    SubmitOtp { digits: [String; OTP_LEN] },

    /// "Send the code again" pressed on the code entry step.
    Resend,

    /// Back navigation: abandon the current attempt.
    Back,

    /// A social provider button pressed on the options step.
    SelectSocial { provider: SocialProvider },

    /// Fact: a verification code went out.
    CodeDispatched { receipt: DispatchReceipt },

    /// Fact: a session outcome was produced.
    SessionEstablished { outcome: AuthOutcome },
}

impl AuthFlowEvent {
    pub fn role(&self) -> EventRole {
        match self {
            AuthFlowEvent::CodeDispatched { .. } | AuthFlowEvent::SessionEstablished { .. } => {
                EventRole::Fact
            }
            _ => EventRole::Input,
        }
    }
}
