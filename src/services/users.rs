//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{RegisterUser, Role, User, UserClaims, UserStatus},
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    email: EmailService,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, email: EmailService) -> Self {
        Self {
            repository,
            config,
            email,
        }
    }

    /// Register a new user. Role defaults to employee.
    pub async fn register(&self, request: RegisterUser) -> AppResult<User> {
        if self.repository.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hash_password(&request.password)?;
        let role = request.role.unwrap_or(Role::Employee);
        let user = self
            .repository
            .users
            .create(&request, &password_hash, role)
            .await?;

        // Best-effort welcome email, never blocks or fails registration
        let email = self.email.clone();
        let (to, name) = (user.email.clone(), user.name.clone());
        tokio::spawn(async move {
            if let Err(e) = email.send_welcome(&to, &name).await {
                tracing::warn!("Failed to send welcome email to {}: {}", to, e);
            }
        });

        Ok(user)
    }

    /// Authenticate by email and password, returning a JWT token and the user
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if user.status == UserStatus::Inactive {
            return Err(AppError::Authentication("Account is inactive".to_string()));
        }

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        self.repository.users.update_last_login(user.id).await?;

        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        if let Some(ref hash) = user.password {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }

        Ok(false)
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
