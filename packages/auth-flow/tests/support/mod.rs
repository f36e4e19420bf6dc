//! Shared helpers for flow scenario tests: a recording observer and
//! scripted gateway/provider stubs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use auth_flow::{
    async_trait, AuthOutcome, AuthProvider, AuthProviderError, DispatchError, DispatchReceipt,
    FlowObserver, LoginStep, OtpGateway, ProviderIdentity, SocialProvider,
};
use chrono::{Duration, Utc};

// ============================================================================
// Recording observer
// ============================================================================

#[derive(Default)]
pub struct Recorded {
    pub steps: Vec<(LoginStep, Option<DispatchReceipt>)>,
    pub successes: Vec<AuthOutcome>,
    pub errors: Vec<String>,
}

/// Handle shared between the test and the observer it hands to the
/// controller.
#[derive(Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Recorded>>,
}

impl Recorder {
    pub fn observer(&self) -> Box<dyn FlowObserver> {
        Box::new(RecordingObserver {
            inner: Arc::clone(&self.inner),
        })
    }

    pub fn steps(&self) -> Vec<LoginStep> {
        self.inner
            .lock()
            .unwrap()
            .steps
            .iter()
            .map(|(step, _)| *step)
            .collect()
    }

    pub fn last_step_receipt(&self) -> Option<DispatchReceipt> {
        self.inner
            .lock()
            .unwrap()
            .steps
            .last()
            .and_then(|(_, receipt)| receipt.clone())
    }

    pub fn successes(&self) -> Vec<AuthOutcome> {
        self.inner.lock().unwrap().successes.clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.inner.lock().unwrap().errors.clone()
    }
}

struct RecordingObserver {
    inner: Arc<Mutex<Recorded>>,
}

impl FlowObserver for RecordingObserver {
    fn on_step_changed(&mut self, step: LoginStep, receipt: Option<&DispatchReceipt>) {
        self.inner
            .lock()
            .unwrap()
            .steps
            .push((step, receipt.cloned()));
    }

    fn on_success(&mut self, outcome: &AuthOutcome) {
        self.inner.lock().unwrap().successes.push(outcome.clone());
    }

    fn on_error(&mut self, message: &str) {
        self.inner.lock().unwrap().errors.push(message.to_string());
    }
}

// ============================================================================
// Scripted gateways
// ============================================================================

/// Gateway driven by a queue of per-call outcomes. An empty queue means
/// every remaining call succeeds.
pub struct ScriptedGateway {
    failures: Mutex<VecDeque<Option<DispatchError>>>,
    attempts: Mutex<u32>,
    /// Issued receipts are backdated by this much, to age codes in tests.
    pub backdate: Duration,
}

impl ScriptedGateway {
    pub fn always_ok() -> Self {
        Self {
            failures: Mutex::new(VecDeque::new()),
            attempts: Mutex::new(0),
            backdate: Duration::zero(),
        }
    }

    pub fn with_script(script: Vec<Option<DispatchError>>) -> Self {
        Self {
            failures: Mutex::new(script.into()),
            attempts: Mutex::new(0),
            backdate: Duration::zero(),
        }
    }

    pub fn backdated(by: Duration) -> Self {
        Self {
            backdate: by,
            ..Self::always_ok()
        }
    }
}

#[async_trait]
impl OtpGateway for ScriptedGateway {
    async fn send_code(&self, phone_number: &str) -> Result<DispatchReceipt, DispatchError> {
        if let Some(Some(err)) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        Ok(DispatchReceipt {
            phone_number: phone_number.to_string(),
            attempt,
            issued_at: Utc::now() - self.backdate,
        })
    }
}

pub fn unavailable() -> DispatchError {
    DispatchError::Unavailable("connection refused".to_string())
}

// ============================================================================
// Scripted provider
// ============================================================================

/// Provider that refuses every sign-in the same way.
pub struct RefusingProvider(pub AuthProviderError);

#[async_trait]
impl AuthProvider for RefusingProvider {
    async fn sign_in(
        &self,
        _provider: SocialProvider,
    ) -> Result<ProviderIdentity, AuthProviderError> {
        Err(self.0.clone())
    }
}
