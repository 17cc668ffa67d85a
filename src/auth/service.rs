use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::db::{BlogDb, UserProfile};
use crate::error::AppError;

/// A successful login
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Login, identity lookup and password changes backed by the users table
#[derive(Clone)]
pub struct AccountService {
    db: BlogDb,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(db: BlogDb, tokens: TokenService) -> Self {
        Self { db, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Check credentials and issue a token
    ///
    /// Unknown users and wrong passwords fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let user = match self.db.find_user(username).await? {
            Some(user) if verify_password(password, &user.password) => user,
            _ => {
                warn!("Failed login for '{}'", username);
                return Err(AppError::Unauthenticated);
            }
        };

        let token = self.tokens.issue_token(&user.username)?;
        info!("User '{}' logged in", user.username);

        Ok(Session {
            token,
            user: user.profile(),
        })
    }

    /// Profile for a token subject
    pub async fn verify(&self, username: &str) -> Result<UserProfile, AppError> {
        self.db
            .find_user(username)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Replace the password after re-checking the current one
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if new_password.is_empty() {
            return Err(AppError::BadRequest(
                "New password must not be empty".to_string(),
            ));
        }

        let user = self
            .db
            .find_user(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if !verify_password(current_password, &user.password) {
            return Err(AppError::Unauthenticated);
        }

        let digest = hash_password(new_password).map_err(|e| AppError::Internal(e.to_string()))?;
        self.db.set_password(username, &digest).await?;

        info!("Password changed for '{}'", username);
        Ok(())
    }

    /// Create the admin account unless one with that name already exists
    pub async fn seed_admin(&self, username: &str, password: &str) -> Result<bool, AppError> {
        if self.db.find_user(username).await?.is_some() {
            return Ok(false);
        }

        let digest = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;
        let created = self
            .db
            .create_user_if_absent(username, &digest, "admin")
            .await?;
        if created {
            info!("Seeded admin user '{}'", username);
        }
        Ok(created)
    }
}
