//! JWT signing and verification (HS256)

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::claims::{Claims, Role};
use super::error::AuthError;

/// Default token lifetime in seconds (24 hours)
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl JwtService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_secs,
        }
    }

    /// Issue a token for an account.
    pub fn issue(&self, account_id: Uuid, login: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp().max(0) as usize;
        let claims = Claims {
            sub: account_id,
            login: login.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_secs as usize,
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AuthError::Issue(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "JWT verification failed");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify() {
        let jwt = JwtService::new("test-secret", DEFAULT_TOKEN_TTL_SECS);
        let id = Uuid::new_v4();
        let token = jwt.issue(id, "alice", Role::Admin).unwrap();

        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.login, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECS as usize);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::new("secret-a", 3600);
        let verifier = JwtService::new("secret-b", 3600);
        let token = issuer.issue(Uuid::new_v4(), "bob", Role::User).unwrap();
        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtService::new("test-secret", 3600);
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4(),
            login: "carol".into(),
            role: Role::User,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jwt.sign(&claims).unwrap();
        assert_eq!(jwt.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_garbage_rejected() {
        let jwt = JwtService::new("test-secret", 3600);
        assert_eq!(jwt.verify("not.a.jwt"), Err(AuthError::InvalidToken));
    }
}
