//! Identity provider integrations.

mod firebase;

pub use firebase::{FirebaseVerifier, GOOGLE_JWKS_URL};
