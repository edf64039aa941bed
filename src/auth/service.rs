//! Authentication service - login, logout, and the per-request session gate

use std::sync::Arc;

use crate::config::JwtSettings;
use crate::models::MemberSummary;
use crate::repository::MemberRepository;

use super::error::AuthError;
use super::jwt::{IssuedToken, TokenIssuer};
use super::password;
use super::store::TokenStore;

/// The verified identity handed to downstream handlers once the session
/// gate admits a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedMember {
    pub id: i64,
    pub email: String,
    pub role: String,
}

/// Composes the credential store, password verifier, token issuer, and
/// whitelist into the login/logout/gate flows.
pub struct AuthService {
    members: Arc<dyn MemberRepository>,
    tokens: Arc<dyn TokenStore>,
    issuer: TokenIssuer,
}

impl AuthService {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        tokens: Arc<dyn TokenStore>,
        settings: &JwtSettings,
    ) -> Self {
        Self {
            members,
            tokens,
            issuer: TokenIssuer::new(settings),
        }
    }

    /// Authenticate credentials and mint a session token.
    ///
    /// Unknown email and wrong password both return `InvalidCredentials` so
    /// responses never disclose whether an account exists. The whitelist is
    /// only written after the password check succeeds.
    pub async fn login(&self, email: &str, pass: &str) -> Result<IssuedToken, AuthError> {
        let member = self
            .members
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(pass, &member.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.issuer.issue(&member)?;

        // Overwrites any previous entry: the new session supersedes the old
        // one. TTL matches the token's own expiry window.
        self.tokens
            .put(member.id, &issued.token, self.issuer.ttl())
            .await
            .map_err(|e| AuthError::RegistryUnavailable(e.to_string()))?;

        tracing::info!(member_id = member.id, "member logged in");
        Ok(issued)
    }

    /// Drop the whitelist entry so the current token stops validating.
    /// Idempotent.
    pub async fn logout(&self, member_id: i64) -> Result<(), AuthError> {
        self.tokens
            .delete(member_id)
            .await
            .map_err(|e| AuthError::RegistryUnavailable(e.to_string()))?;

        tracing::info!(member_id, "member logged out");
        Ok(())
    }

    /// The session gate: signature/expiry/issuer/audience check, subject
    /// parse, then whitelist comparison. Runs before any protected handler
    /// and short-circuits with no side effects on rejection.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedMember, AuthError> {
        let claims = self.issuer.verify(token)?;

        let member_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("subject is not a member id".into()))?;

        let current = self
            .tokens
            .get(member_id)
            .await
            .map_err(|e| AuthError::RegistryUnavailable(e.to_string()))?;

        // Exact string equality against the whitelisted token; anything
        // else means this session was superseded or logged out.
        match current {
            Some(active) if active == token => Ok(AuthenticatedMember {
                id: member_id,
                email: claims.email,
                role: claims.role,
            }),
            _ => Err(AuthError::Revoked),
        }
    }

    /// Profile summary for `GET /auth/me`.
    pub async fn current_member(&self, member_id: i64) -> Result<MemberSummary, AuthError> {
        let member = self
            .members
            .find_by_id(member_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidToken("unknown member".into()))?;

        Ok(MemberSummary::from(member))
    }

    /// Mint a token without the credential check. Test seam for gate
    /// scenarios that need hand-built registry states.
    #[cfg(test)]
    pub(crate) fn issue_for(
        &self,
        member: &crate::models::Member,
    ) -> Result<IssuedToken, AuthError> {
        self.issuer.issue(member)
    }
}
