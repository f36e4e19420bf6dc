//! # auth-flow
//!
//! The ILAVA login flow as a single reusable component: a pure state
//! machine that decides, capability-backed effects that execute, and an
//! observer surface that delivers the result to the hosting shell.
//!
//! ## Core Concepts
//!
//! The flow separates **facts** from **intent**:
//! - [`AuthFlowEvent`] = what the user did (input) or what an effect
//!   produced (fact)
//! - [`AuthCommand`] = intent (a request for IO decided by the machine)
//!
//! The machine never performs IO. The controller executes the command it
//! decides on, then feeds the resulting fact back in.
//!
//! ## Architecture
//!
//! ```text
//! Hosting shell (screen / CLI / web)
//!     │
//!     ▼ handle(event)
//! AuthFlowController
//!     │
//!     ├─► AuthFlowMachine.decide() ─► Some(AuthCommand) ──┐
//!     │        (pure, sync)                               │
//!     │                                                   ▼
//!     │                                     OtpGateway / AuthProvider
//!     │                                                   │
//!     ◄──────────────── fact event ◄──────────────────────┘
//!     │
//!     ▼
//! FlowObserver: on_step_changed / on_success / on_error
//! ```
//!
//! ## Key Invariants
//!
//! 1. **Exactly one step active** - transitions are explicit, no
//!    concurrent methods
//! 2. **Machines are pure** - no IO, no async, no clock; state is internal
//! 3. **Failures stay in-flow** - validation and dispatch errors re-render
//!    the current step; only a user-visible string crosses the observer
//!    boundary
//! 4. **One success per flow** - `on_success` fires at most once; the
//!    instance is finished afterwards and ignores further events
//! 5. **Credentials are transient** - cleared on abandonment and on
//!    completion, never persisted, never logged raw
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use auth_flow::{
//!     AuthFlowController, FlowConfig, LoginStep, MockProvider,
//!     SimulatedGateway, UserType,
//! };
//!
//! let mut flow = AuthFlowController::new(
//!     FlowConfig::new(UserType::Farmer),
//!     Arc::new(SimulatedGateway::new()),
//!     Arc::new(MockProvider),
//!     Box::new(MyScreenObserver::new()),
//! );
//!
//! flow.select_method(LoginStep::Phone).await;
//! flow.submit_phone_form("9876543210").await;      // -> Otp step
//! flow.submit_otp_form(code_digits).await;         // -> on_success
//! ```

mod commands;
mod controller;
mod dispatch;
mod error;
mod events;
mod machine;
mod observer;
mod provider;
mod types;

pub mod validate;

// Re-export command types
pub use commands::{AuthCommand, CompletedMethod};

// Re-export controller types (primary entry point)
pub use controller::{AuthFlowController, FlowConfig};

// Re-export dispatch types
pub use dispatch::{DispatchReceipt, OtpGateway, SimulatedGateway};

// Re-export error types
pub use error::{AuthProviderError, DispatchError, ValidationError};

// Re-export event types
pub use events::{AuthFlowEvent, EventRole};

// Re-export machine types
pub use machine::AuthFlowMachine;

// Re-export observer types
pub use observer::FlowObserver;

// Re-export provider types
pub use provider::{AuthProvider, MockProvider, ProviderIdentity};

// Re-export domain types
pub use types::{
    hash_identifier, AuthOutcome, Credentials, LoginStep, SocialProvider, UserType, OTP_LEN,
};

// Re-export commonly used external types
pub use async_trait::async_trait;
