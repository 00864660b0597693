//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Default company ID for the user.
    pub cmp: Uuid,
    /// User's role in that company.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, company_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            cmp: company_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the default company ID from claims.
    #[must_use]
    pub const fn company_id(&self) -> Uuid {
        self.cmp
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Refresh request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token obtained at login.
    pub refresh_token: String,
}

/// Authenticated user info returned with tokens.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Default company ID.
    pub company_id: Uuid,
    /// Role in the default company.
    pub role: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_accessors() {
        let user_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let claims = Claims::new(user_id, company_id, "admin", Utc::now() + Duration::minutes(15));

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.company_id(), company_id);
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }
}
