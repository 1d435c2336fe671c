//! Firebase ID token verification.
//!
//! Tokens are RS256 JWTs signed by Google. Public keys are published as a JWK
//! set and rotated regularly; the set is cached for as long as the response's
//! `Cache-Control: max-age` allows.

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::header::{CACHE_CONTROL, HeaderMap};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::entities::Principal;
use crate::domain::identity::{TokenVerifier, VerifyError};

/// JWK set of the keys signing Firebase ID tokens.
pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Used when the key response carries no usable `max-age`.
const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

struct CachedKeys {
    set: Arc<JwkSet>,
    expires_at: Instant,
}

/// Verifies Firebase ID tokens for a single project.
///
/// Checks signature, expiry, audience (`project_id`) and issuer
/// (`https://securetoken.google.com/<project_id>`). The `sub` claim becomes
/// the principal's uid and the full claim set is kept on the principal.
pub struct FirebaseVerifier {
    keys_url: String,
    validation: Validation,
    http: reqwest::Client,
    keys: RwLock<Option<CachedKeys>>,
}

impl FirebaseVerifier {
    /// Creates a verifier that fetches keys from Google on first use.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::KeyFetch`] if the HTTP client cannot be built.
    pub fn new(project_id: &str) -> Result<Self, VerifyError> {
        Self::with_keys_url(project_id, GOOGLE_JWKS_URL)
    }

    /// Creates a verifier that fetches keys from `keys_url`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::KeyFetch`] if the HTTP client cannot be built.
    pub fn with_keys_url(project_id: &str, keys_url: &str) -> Result<Self, VerifyError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| VerifyError::KeyFetch(e.to_string()))?;

        Ok(Self {
            keys_url: keys_url.to_string(),
            validation: validation_for(project_id),
            http,
            keys: RwLock::new(None),
        })
    }

    /// Creates a verifier with a fixed key set that is never refreshed.
    pub fn with_static_keys(project_id: &str, keys: JwkSet) -> Self {
        // Far enough out that the set never expires in practice.
        let expires_at = Instant::now() + Duration::from_secs(10 * 365 * 24 * 3600);

        Self {
            keys_url: String::new(),
            validation: validation_for(project_id),
            http: reqwest::Client::new(),
            keys: RwLock::new(Some(CachedKeys {
                set: Arc::new(keys),
                expires_at,
            })),
        }
    }

    async fn signing_keys(&self) -> Result<Arc<JwkSet>, VerifyError> {
        {
            let guard = self.keys.read().await;
            if let Some(cached) = guard.as_ref() {
                if cached.expires_at > Instant::now() {
                    return Ok(cached.set.clone());
                }
            }
        }

        let mut guard = self.keys.write().await;

        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.set.clone());
            }
        }

        let fresh = self.fetch_keys().await?;
        let set = fresh.set.clone();
        *guard = Some(fresh);

        Ok(set)
    }

    async fn fetch_keys(&self) -> Result<CachedKeys, VerifyError> {
        let response = self
            .http
            .get(&self.keys_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| VerifyError::KeyFetch(e.to_string()))?;

        let ttl = max_age(response.headers()).unwrap_or(DEFAULT_KEY_TTL);

        let set = response
            .json::<JwkSet>()
            .await
            .map_err(|e| VerifyError::KeyFetch(e.to_string()))?;

        tracing::debug!(
            keys = set.keys.len(),
            ttl_secs = ttl.as_secs(),
            "Refreshed identity provider signing keys"
        );

        Ok(CachedKeys {
            set: Arc::new(set),
            expires_at: Instant::now() + ttl,
        })
    }
}

#[async_trait]
impl TokenVerifier for FirebaseVerifier {
    async fn verify(&self, credential: &str) -> Result<Principal, VerifyError> {
        if credential.is_empty() {
            return Err(VerifyError::Empty);
        }

        let header =
            decode_header(credential).map_err(|e| VerifyError::Malformed(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::Malformed(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| VerifyError::Malformed("missing key id".to_string()))?;

        let keys = self.signing_keys().await?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| VerifyError::UnknownKey(kid.clone()))?;

        let key = DecodingKey::from_jwk(jwk).map_err(|e| VerifyError::KeyFetch(e.to_string()))?;

        let data = decode::<Map<String, Value>>(credential, &key, &self.validation)
            .map_err(|e| VerifyError::Rejected(e.to_string()))?;

        let uid = data
            .claims
            .get("sub")
            .and_then(Value::as_str)
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| VerifyError::Rejected("missing subject".to_string()))?
            .to_string();

        Ok(Principal::new(uid, data.claims))
    }
}

fn validation_for(project_id: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[project_id]);
    validation.set_issuer(&[format!("https://securetoken.google.com/{project_id}")]);
    validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);
    validation
}

/// Extracts `max-age` from a `Cache-Control` header.
fn max_age(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(CACHE_CONTROL)?.to_str().ok()?;

    value
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use reqwest::header::HeaderValue;
    use serde_json::json;

    const PROJECT: &str = "blog-test";
    const TEST_KEY: &[u8] = include_bytes!("../../../tests/fixtures/test_rsa_key.pem");
    const TEST_JWKS: &str = include_str!("../../../tests/fixtures/test_jwks.json");

    fn verifier() -> FirebaseVerifier {
        let keys: JwkSet = serde_json::from_str(TEST_JWKS).unwrap();
        FirebaseVerifier::with_static_keys(PROJECT, keys)
    }

    fn sign(claims: Value, kid: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        let key = EncodingKey::from_rsa_pem(TEST_KEY).unwrap();
        encode(&header, &claims, &key).unwrap()
    }

    fn claims(sub: &str) -> Value {
        let now = Utc::now().timestamp();
        json!({
            "sub": sub,
            "aud": PROJECT,
            "iss": format!("https://securetoken.google.com/{PROJECT}"),
            "iat": now,
            "exp": now + 3600,
            "email": "ada@example.com",
        })
    }

    #[tokio::test]
    async fn test_verify_valid_token() {
        let token = sign(claims("u1"), "test-kid");

        let principal = verifier().verify(&token).await.unwrap();

        assert_eq!(principal.uid, "u1");
        assert_eq!(principal.claim_str("email"), Some("ada@example.com"));
        assert!(!principal.is_admin());
    }

    #[tokio::test]
    async fn test_verify_admin_claim() {
        let mut c = claims("u1");
        c["admin"] = json!(true);
        let token = sign(c, "test-kid");

        let principal = verifier().verify(&token).await.unwrap();

        assert!(principal.is_admin());
    }

    #[tokio::test]
    async fn test_verify_rejects_empty() {
        assert!(matches!(verifier().verify("").await, Err(VerifyError::Empty)));
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage() {
        assert!(matches!(
            verifier().verify("not-a-jwt").await,
            Err(VerifyError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_unknown_kid() {
        let token = sign(claims("u1"), "rotated-away");

        assert!(matches!(
            verifier().verify(&token).await,
            Err(VerifyError::UnknownKey(kid)) if kid == "rotated-away"
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_audience() {
        let mut c = claims("u1");
        c["aud"] = json!("another-project");
        let token = sign(c, "test-kid");

        assert!(matches!(
            verifier().verify(&token).await,
            Err(VerifyError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_issuer() {
        let mut c = claims("u1");
        c["iss"] = json!("https://evil.example.com");
        let token = sign(c, "test-kid");

        assert!(matches!(
            verifier().verify(&token).await,
            Err(VerifyError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_expired() {
        let mut c = claims("u1");
        let past = Utc::now().timestamp() - 7200;
        c["iat"] = json!(past);
        c["exp"] = json!(past + 60);
        let token = sign(c, "test-kid");

        assert!(matches!(
            verifier().verify(&token).await,
            Err(VerifyError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_empty_subject() {
        let token = sign(claims(""), "test-kid");

        assert!(matches!(
            verifier().verify(&token).await,
            Err(VerifyError::Rejected(_))
        ));
    }

    #[test]
    fn test_max_age_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=21600, must-revalidate, no-transform"),
        );

        assert_eq!(max_age(&headers), Some(Duration::from_secs(21600)));
    }

    #[test]
    fn test_max_age_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(max_age(&headers), None);

        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        assert_eq!(max_age(&headers), None);
    }
}
