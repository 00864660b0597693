//! Session repository for refresh token management.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::sessions;

/// Session repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a refresh token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Creates a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        refresh_token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
        user_agent: Option<&str>,
        ip_address: Option<&str>,
    ) -> Result<sessions::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let token_hash = Self::hash_token(refresh_token);

        sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            company_id: Set(company_id),
            refresh_token_hash: Set(token_hash),
            user_agent: Set(user_agent.map(String::from)),
            ip_address: Set(ip_address.map(String::from)),
            expires_at: Set(expires_at.into()),
            revoked_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds an unrevoked session by refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<sessions::Model>, DbErr> {
        let token_hash = Self::hash_token(refresh_token);

        sessions::Entity::find()
            .filter(sessions::Column::RefreshTokenHash.eq(token_hash))
            .filter(sessions::Column::RevokedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Revokes a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke(&self, id: Uuid) -> Result<(), DbErr> {
        let now = chrono::Utc::now().into();

        sessions::ActiveModel {
            id: Set(id),
            revoked_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(())
    }

    /// Revokes a session by refresh token. Returns whether one was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_by_token(&self, refresh_token: &str) -> Result<bool, DbErr> {
        let session = self.find_by_token(refresh_token).await?;

        if let Some(s) = session {
            self.revoke(s.id).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Cleans up expired sessions (for maintenance).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn cleanup_expired(&self) -> Result<u64, DbErr> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lt(chrono::Utc::now()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let first = SessionRepository::hash_token("refresh-token");
        let second = SessionRepository::hash_token("refresh-token");

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(SessionRepository::hash_token("other-token"), first);
    }
}
