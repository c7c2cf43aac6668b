/**
 * Share Tokens
 *
 * Signed, time-limited tokens that open a project's collaboration channel
 * with a given capability. Tokens are JWTs signed with a shared secret
 * using a fixed algorithm (HS256).
 */

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::auth::access::Capability;
use crate::backend::projects::ProjectId;

/// Share token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareClaims {
    /// Project the token opens
    pub project_id: ProjectId,
    /// User who issued the token
    pub user_id: i64,
    /// Access granted to the bearer
    pub capability: Capability,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl ShareClaims {
    pub fn new(
        project_id: ProjectId,
        user_id: i64,
        capability: Capability,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            project_id,
            user_id,
            capability,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

/// Token rejection reasons
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("share token has expired")]
    Expired,

    #[error("share token signature is invalid")]
    InvalidSignature,

    #[error("share token is malformed: {0}")]
    Malformed(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::Malformed(err),
        }
    }
}

/// Secret and algorithm used to sign and verify share tokens
#[derive(Clone)]
pub struct ShareTokenKeys {
    secret: Vec<u8>,
    algorithm: Algorithm,
}

impl ShareTokenKeys {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign claims into a token
    pub fn encode(&self, claims: &ShareClaims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(self.algorithm),
            claims,
            &EncodingKey::from_secret(&self.secret),
        )
    }

    /// Verify signature and expiry, then return the claims
    ///
    /// Expiry is checked with zero leeway.
    pub fn decode(&self, token: &str) -> Result<ShareClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<ShareClaims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for ShareTokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareTokenKeys")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Issue a share token valid for `ttl`
pub fn issue_share_token(
    keys: &ShareTokenKeys,
    project_id: ProjectId,
    user_id: i64,
    capability: Capability,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = ShareClaims::new(project_id, user_id, capability, Utc::now() + ttl);
    keys.encode(&claims)
}
