//! JWT issuance and verification (HS256)

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AuthError;
use crate::config::JwtSettings;
use crate::models::Member;

/// Role claim carried by every issued token. The back-office issues
/// member-scoped tokens only.
pub const ROLE_MEMBER: &str = "Member";

/// Fixed claim set embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the member id, as a decimal string.
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Unique token id, fresh per issuance.
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly minted token together with its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at_epoch_millis: i64,
}

/// Mints and verifies session tokens.
///
/// Issuance is pure token construction; recording the token in the
/// whitelist is the login flow's responsibility, not the issuer's.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenIssuer {
    /// Build an issuer from validated settings.
    ///
    /// Key-length checks happen in [`JwtSettings::validate`] at
    /// configuration load, not here.
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            ttl: Duration::minutes(settings.token_ttl_minutes),
        }
    }

    /// Token time-to-live, shared with the whitelist entry TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a signed token for an authenticated member.
    pub fn issue(&self, member: &Member) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: member.id.to_string(),
            email: member.email.clone(),
            role: ROLE_MEMBER.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at_epoch_millis: expires_at.timestamp_millis(),
        })
    }

    /// Verify signature, expiry, issuer, and audience, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        // Strict expiry: a token is invalid the moment `exp` passes.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::InvalidToken("token expired".into()),
                ErrorKind::InvalidSignature => AuthError::InvalidToken("bad signature".into()),
                ErrorKind::InvalidIssuer => AuthError::InvalidToken("untrusted issuer".into()),
                ErrorKind::InvalidAudience => AuthError::InvalidToken("wrong audience".into()),
                _ => AuthError::InvalidToken(format!("malformed token: {}", e)),
            }
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtSettings;

    fn settings() -> JwtSettings {
        JwtSettings {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            issuer: "backoffice".to_string(),
            audience: "backoffice-api".to_string(),
            token_ttl_minutes: 60,
        }
    }

    fn member() -> Member {
        let now = Utc::now();
        Member {
            id: 7,
            email: "a@b.com".to_string(),
            password_hash: String::new(),
            company: None,
            city: None,
            country: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issue_then_verify_round_trip() {
        let issuer = TokenIssuer::new(&settings());
        let issued = issuer.issue(&member()).unwrap();

        let claims = issuer.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, ROLE_MEMBER);
        assert_eq!(claims.exp, issued.expires_at_epoch_millis / 1000);
    }

    #[test]
    fn two_issuances_never_collide() {
        let issuer = TokenIssuer::new(&settings());
        let a = issuer.issue(&member()).unwrap();
        let b = issuer.issue(&member()).unwrap();

        assert_ne!(a.token, b.token);
        let (ca, cb) = (issuer.verify(&a.token).unwrap(), issuer.verify(&b.token).unwrap());
        assert_ne!(ca.jti, cb.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issued = TokenIssuer::new(&settings()).issue(&member()).unwrap();

        let mut other = settings();
        other.secret = "ffffffffffffffffffffffffffffffff".to_string();
        let result = TokenIssuer::new(&other).verify(&issued.token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn wrong_issuer_or_audience_is_rejected() {
        let issued = TokenIssuer::new(&settings()).issue(&member()).unwrap();

        let mut other = settings();
        other.issuer = "someone-else".to_string();
        assert!(TokenIssuer::new(&other).verify(&issued.token).is_err());

        let mut other = settings();
        other.audience = "other-api".to_string();
        assert!(TokenIssuer::new(&other).verify(&issued.token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new(&settings());

        let now = Utc::now();
        let claims = Claims {
            sub: "7".to_string(),
            email: "a@b.com".to_string(),
            role: ROLE_MEMBER.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: "backoffice".to_string(),
            aud: "backoffice-api".to_string(),
            iat: (now - Duration::minutes(10)).timestamp(),
            exp: (now - Duration::seconds(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(settings().secret.as_bytes()),
        )
        .unwrap();

        let result = issuer.verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(msg)) if msg.contains("expired")));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let issuer = TokenIssuer::new(&settings());
        assert!(issuer.verify("").is_err());
        assert!(issuer.verify("not.a.jwt").is_err());
    }
}
