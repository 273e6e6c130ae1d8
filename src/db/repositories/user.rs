use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tokio::task;

use crate::entities::users;
use crate::models::{Role, UserStatus};

/// User data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub role: String,
    pub status: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            name: model.name,
            role: model.role,
            status: model.status,
        }
    }
}

/// Fields for a direct user creation. All required; the handler validates.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
}

/// Partial update. `None` fields are left untouched; a `Some` password is
/// rehashed before storage.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub password: Option<String>,
}

/// A candidate record for bulk migration. Missing fields fall back to the
/// defaults the legacy frontend relied on.
#[derive(Debug, Clone)]
pub struct MigrateCandidate {
    pub username: String,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = users::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Verify password for a user. Missing users count as a mismatch so the
    /// caller reports one uniform authentication failure.
    /// Note: uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            // A malformed stored hash is a non-match, not a server error.
            let Ok(parsed_hash) = PasswordHash::new(&password_hash) else {
                return false;
            };

            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await
        .context("Password verification task panicked")?;

        Ok(is_valid)
    }

    /// Insert a new user. The caller is responsible for the duplicate check;
    /// the unique index is the final guard.
    pub async fn create(&self, new: NewUser) -> Result<User> {
        let password = new.password;
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let model = users::ActiveModel {
            username: Set(new.username),
            password_hash: Set(password_hash),
            name: Set(new.name),
            role: Set(new.role.as_str().to_string()),
            status: Set(new.status.as_str().to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert user")?;

        Ok(User::from(model))
    }

    /// Apply a partial update. Returns `None` when the id does not exist.
    pub async fn update(&self, id: i32, patch: UserPatch) -> Result<Option<User>> {
        let Some(user) = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for update")?
        else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();

        if let Some(username) = patch.username {
            active.username = Set(username);
        }
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(role) = patch.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(status) = patch.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(password) = patch.password {
            let new_hash = task::spawn_blocking(move || hash_password(&password))
                .await
                .context("Password hashing task panicked")??;
            active.password_hash = Set(new_hash);
        }

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update user")?;

        Ok(Some(User::from(updated)))
    }

    /// Delete by id. Returns `false` when nothing was deleted.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }

    /// Bulk import with skip-if-exists semantics. The whole batch runs in
    /// one transaction; duplicates are skipped silently, never an error.
    /// Returns the number of users actually inserted.
    pub async fn migrate(&self, candidates: Vec<MigrateCandidate>) -> Result<usize> {
        let txn = self.conn.begin().await?;
        let mut inserted = 0usize;

        for candidate in candidates {
            let existing = users::Entity::find()
                .filter(users::Column::Username.eq(candidate.username.as_str()))
                .one(&txn)
                .await
                .context("Failed to check for existing user during migration")?;

            if existing.is_some() {
                continue;
            }

            let password = candidate
                .password
                .unwrap_or_else(|| "change_me".to_string());
            let password_hash = task::spawn_blocking(move || hash_password(&password))
                .await
                .context("Password hashing task panicked")??;

            let name = candidate
                .name
                .unwrap_or_else(|| candidate.username.clone());
            let role = candidate.role.unwrap_or(Role::Storekeeper);
            let status = candidate.status.unwrap_or(UserStatus::Active);

            users::ActiveModel {
                username: Set(candidate.username),
                password_hash: Set(password_hash),
                name: Set(name),
                role: Set(role.as_str().to_string()),
                status: Set(status.as_str().to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to insert migrated user")?;

            inserted += 1;
        }

        txn.commit().await?;
        Ok(inserted)
    }
}

/// Hash a password using Argon2id with default params.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::PasswordVerifier;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("salah123").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();

        assert!(
            Argon2::default()
                .verify_password(b"salah123", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong-password", &parsed)
                .is_err()
        );
    }
}
