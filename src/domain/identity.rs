//! Identity verifier capability.

use async_trait::async_trait;

use crate::domain::entities::Principal;

/// Reasons a credential can fail verification.
///
/// These details are logged server-side only; callers always see a generic
/// "Invalid token".
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("credential is empty")]
    Empty,

    #[error("credential is malformed: {0}")]
    Malformed(String),

    #[error("credential rejected: {0}")]
    Rejected(String),

    #[error("signing key `{0}` is unknown")]
    UnknownKey(String),

    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),
}

/// Verifies bearer credentials issued by an external identity provider.
///
/// # Implementations
///
/// - [`crate::infrastructure::identity::FirebaseVerifier`] - Firebase ID tokens
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verifies a credential and returns the principal it identifies.
    ///
    /// Called once per request; implementations must not retry.
    async fn verify(&self, credential: &str) -> Result<Principal, VerifyError>;
}
