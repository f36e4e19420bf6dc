//! Observation surface for the hosting application.
//!
//! The flow never navigates, renders, or persists anything itself; it
//! reports through this trait and the host does the rest. Observers
//! cannot reach back into the machine.

use crate::dispatch::DispatchReceipt;
use crate::types::{AuthOutcome, LoginStep};

/// Callbacks the hosting screen implements.
pub trait FlowObserver: Send {
    /// The visible step changed; re-render.
    ///
    /// `receipt` is present exactly when the new step is code entry, and
    /// this fires again with a fresh receipt after every resend.
    fn on_step_changed(&mut self, step: LoginStep, receipt: Option<&DispatchReceipt>);

    /// The flow finished. Fires at most once per instance; the receiver
    /// persists the session and routes to the matching dashboard.
    fn on_success(&mut self, outcome: &AuthOutcome);

    /// A recoverable failure; render the message inline on the current
    /// step.
    fn on_error(&mut self, message: &str);
}
