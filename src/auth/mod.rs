//! Admin authentication: argon2 password hashing, opaque bearer tokens held
//! in memory, and the route-guard middleware.

use crate::entities::admin_user;
use crate::errors::ServiceError;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Identity attached to the request after the guard admits it.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub username: String,
}

#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AdminAuthService {
    db: Arc<DatabaseConnection>,
    sessions: Arc<DashMap<String, Session>>,
    session_ttl: Duration,
}

impl AdminAuthService {
    pub fn new(db: Arc<DatabaseConnection>, session_ttl_secs: u64) -> Self {
        Self {
            db,
            sessions: Arc::new(DashMap::new()),
            session_ttl: Duration::seconds(session_ttl_secs as i64),
        }
    }

    fn hash_password(password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| ServiceError::InternalError(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Seeds the bootstrap admin account when no admin exists yet.
    #[instrument(skip(self, password))]
    pub async fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(), ServiceError> {
        let existing = admin_user::Entity::find().one(&*self.db).await?;
        if existing.is_some() {
            return Ok(());
        }

        let model = admin_user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(Self::hash_password(password)?),
            ..Default::default()
        };
        model.insert(&*self.db).await?;
        info!(username, "Bootstrap admin account created");
        Ok(())
    }

    /// Verifies credentials and mints a session token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let admin = admin_user::Entity::find()
            .filter(admin_user::Column::Username.eq(username))
            .one(&*self.db)
            .await?;

        let valid = admin
            .as_ref()
            .map(|a| Self::verify_password(password, &a.password_hash))
            .unwrap_or(false);
        if !valid {
            warn!(username, "Failed admin login attempt");
            return Err(ServiceError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let token = Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                username: username.to_string(),
                expires_at: Utc::now() + self.session_ttl,
            },
        );
        info!(username, "Admin logged in");
        Ok(token)
    }

    pub fn logout(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Resolves a token to an identity, evicting it when expired.
    pub fn authenticate(&self, token: &str) -> Option<AdminIdentity> {
        let session = self.sessions.get(token)?;
        if session.expires_at < Utc::now() {
            drop(session);
            self.sessions.remove(token);
            return None;
        }
        Some(AdminIdentity {
            username: session.username.clone(),
        })
    }

    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        if new_password.len() < 6 {
            return Err(ServiceError::ValidationError(
                "New password must be at least 6 characters".to_string(),
            ));
        }

        let admin = admin_user::Entity::find()
            .filter(admin_user::Column::Username.eq(username))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Admin {} not found", username)))?;

        if !Self::verify_password(current_password, &admin.password_hash) {
            return Err(ServiceError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let mut active: admin_user::ActiveModel = admin.into();
        active.password_hash = Set(Self::hash_password(new_password)?);
        active.update(&*self.db).await?;
        info!(username, "Admin password changed");
        Ok(())
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware guarding admin routes. Attaches [`AdminIdentity`] to the
/// request extensions on success.
pub async fn require_admin(
    State(auth): State<AdminAuthService>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = bearer_token(&req).ok_or_else(|| {
        ServiceError::Unauthorized("Missing bearer token".to_string())
    })?;

    let identity = auth
        .authenticate(token)
        .ok_or_else(|| ServiceError::Unauthorized("Invalid or expired session".to_string()))?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = AdminAuthService::hash_password("admin123").unwrap();
        assert!(AdminAuthService::verify_password("admin123", &hash));
        assert!(!AdminAuthService::verify_password("admin124", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!AdminAuthService::verify_password("admin123", "not-a-hash"));
    }
}
