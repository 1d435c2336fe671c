//! Authentication service for bearer credential verification.

use std::sync::Arc;

use crate::domain::entities::Principal;
use crate::domain::identity::TokenVerifier;
use crate::error::AppError;

/// Service for authenticating requests via identity-provider bearer tokens.
///
/// Verification failures are never detailed to the caller: every rejected
/// credential surfaces as a generic "Invalid token", with the underlying
/// reason logged at `warn`.
pub struct AuthService<V: TokenVerifier + ?Sized> {
    verifier: Arc<V>,
}

impl<V: TokenVerifier + ?Sized> AuthService<V> {
    /// Creates a new authentication service.
    pub fn new(verifier: Arc<V>) -> Self {
        Self { verifier }
    }

    /// Verifies a raw token and returns the principal it identifies.
    ///
    /// The verifier is called exactly once; an empty token is rejected
    /// without reaching it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] with "Invalid token" if the
    /// token is empty or fails verification.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AppError> {
        if token.is_empty() {
            record_failure("empty_token");
            return Err(AppError::unauthenticated("Invalid token"));
        }

        self.verifier.verify(token).await.map_err(|e| {
            tracing::warn!(error = %e, "Token verification failed");
            record_failure("invalid_token");
            AppError::unauthenticated("Invalid token")
        })
    }

    /// Verifies a token and checks that it belongs to `expected_uid`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] if verification fails or the
    /// verified uid differs from `expected_uid`.
    pub async fn authenticate_as(
        &self,
        token: &str,
        expected_uid: &str,
    ) -> Result<Principal, AppError> {
        let principal = self.authenticate(token).await?;

        if principal.uid != expected_uid {
            tracing::warn!(
                token_uid = %principal.uid,
                claimed_uid = expected_uid,
                "Token UID mismatch"
            );
            record_failure("uid_mismatch");
            return Err(AppError::unauthenticated("Token UID does not match user ID"));
        }

        Ok(principal)
    }
}

fn record_failure(reason: &'static str) {
    metrics::counter!("auth_failures_total", "reason" => reason).increment(1);
}
