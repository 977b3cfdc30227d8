//! Session-token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the identity, issue time, and expiry.
//! Nothing is stored server-side: validity is re-derived from the signature
//! and expiry on every request. An identity that existed at issuance time
//! therefore stays valid for the life of the token even if the credential
//! entry is later removed.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::CredentialSet;

/// Authentication failures. Callers must never learn which of
/// identity/secret was wrong, or why a signature did not verify.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing bearer token")]
    MissingToken,
    #[error("malformed or unverifiable token")]
    MalformedToken,
    #[error("expired token")]
    ExpiredToken,
    #[error("token signing failed")]
    Signing,
}

/// Claims embedded in every token issued by the server.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Standard JWT subject, set to the identity.
    sub: String,
    /// Issued-at (Unix timestamp, seconds).
    iat: u64,
    /// Standard JWT expiry (Unix timestamp, seconds).
    exp: u64,
}

/// Issues and verifies session tokens against a fixed credential set.
pub struct SessionIssuer {
    credentials: CredentialSet,
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_secs: u64,
}

impl SessionIssuer {
    pub fn new(credentials: CredentialSet, signing_secret: &str, lifetime_secs: u64) -> Self {
        Self {
            credentials,
            encoding: EncodingKey::from_secret(signing_secret.as_bytes()),
            decoding: DecodingKey::from_secret(signing_secret.as_bytes()),
            lifetime_secs,
        }
    }

    /// Exchange credentials for a signed, time-limited token.
    pub fn issue(&self, identity: &str, secret: &str) -> Result<String, AuthError> {
        if !self.credentials.matches(identity, secret) {
            tracing::debug!(identity, "credential check failed");
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_at(identity, unix_now())
    }

    fn issue_at(&self, identity: &str, now: u64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: identity.to_string(),
            iat: now,
            exp: now + self.lifetime_secs,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|err| {
            tracing::error!(error = %err, "failed to sign session token");
            AuthError::Signing
        })
    }

    /// Verify a presented token and return the embedded identity.
    ///
    /// Self-contained: never consults the credential set. A token is valid
    /// iff its signature verifies under the signing secret and the current
    /// time is strictly before its expiry.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::ExpiredToken),
                _ => Err(AuthError::MalformedToken),
            },
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credential;

    fn issuer() -> SessionIssuer {
        let credentials = CredentialSet::new(vec![
            Credential {
                identity: "admin".to_string(),
                secret: "admin123".to_string(),
            },
            Credential {
                identity: "user1".to_string(),
                secret: "user123".to_string(),
            },
        ]);
        SessionIssuer::new(credentials, "test-signing-secret", 3600)
    }

    #[test]
    fn issue_then_verify_roundtrips_every_credential() {
        let issuer = issuer();
        for (identity, secret) in [("admin", "admin123"), ("user1", "user123")] {
            let token = issuer.issue(identity, secret).unwrap();
            assert_eq!(issuer.verify(&token).unwrap(), identity);
        }
    }

    #[test]
    fn wrong_secret_is_invalid_credentials() {
        let issuer = issuer();
        assert!(matches!(
            issuer.issue("user1", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        // Unknown identity yields the same error, not a distinct one.
        assert!(matches!(
            issuer.issue("nobody", "user123"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = issuer();
        // Craft a token whose lifetime ended an hour ago.
        let token = issuer.issue_at("user1", unix_now() - 7200).unwrap();
        assert!(matches!(
            issuer.verify(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let issuer = issuer();
        assert!(matches!(
            issuer.verify("not-a-jwt"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_malformed() {
        let issuer = issuer();
        let other = SessionIssuer::new(
            CredentialSet::new(vec![Credential {
                identity: "user1".to_string(),
                secret: "user123".to_string(),
            }]),
            "another-secret",
            3600,
        );
        let token = other.issue("user1", "user123").unwrap();
        assert!(matches!(
            issuer.verify(&token),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn empty_token_is_missing() {
        let issuer = issuer();
        assert!(matches!(issuer.verify("  "), Err(AuthError::MissingToken)));
    }
}
