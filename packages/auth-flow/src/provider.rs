//! Social sign-in capability.
//!
//! The options step offers provider buttons; what pressing one actually
//! does is behind [`AuthProvider`], so a real OAuth integration can be
//! substituted without touching the state machine. [`MockProvider`]
//! approves every attempt.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::error::AuthProviderError;
use crate::types::SocialProvider;

/// Identity returned by a provider after a successful consent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub provider: SocialProvider,
    /// Opaque subject for the signed-in account.
    pub subject: Uuid,
}

/// Capability for social sign-in.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Run the provider's sign-in and return the resulting identity.
    ///
    /// Failures (cancelled consent, network, provider rejection) are
    /// recoverable; the flow stays on the options step.
    async fn sign_in(&self, provider: SocialProvider)
        -> Result<ProviderIdentity, AuthProviderError>;
}

/// Provider that approves every sign-in with a fresh identity.
pub struct MockProvider;

#[async_trait]
impl AuthProvider for MockProvider {
    async fn sign_in(
        &self,
        provider: SocialProvider,
    ) -> Result<ProviderIdentity, AuthProviderError> {
        info!(%provider, "mock social sign-in approved");
        Ok(ProviderIdentity {
            provider,
            subject: Uuid::new_v4(),
        })
    }
}
