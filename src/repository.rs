//! Member data access

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::Member;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        RepositoryError::Database(e.to_string())
    }
}

/// Lookup port for member records.
///
/// The auth core only reads members; registration and profile updates live
/// elsewhere.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Case-insensitive lookup, consistent with the email uniqueness
    /// invariant.
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Member>, RepositoryError>;
}

/// Postgres-backed member repository.
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, RepositoryError> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Member>, RepositoryError> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(member)
    }
}
