use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, NewUser, Role, User, UserPatch, normalize_email};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};

use super::parse_id;

pub const MIN_PASSWORD_LEN: usize = 8;

const ENTITY: &str = "User";

/// Self-service sign-up input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Create a customer or provider account. Admins cannot sign themselves up.
    pub async fn register(&self, input: Registration) -> Result<User, DomainError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation("Name is required".to_string()));
        }
        let email = normalize_email(&input.email)?;
        check_password_strength(&input.password)?;

        let role = input.role.unwrap_or(Role::Customer);
        if role == Role::Admin {
            return Err(DomainError::Forbidden(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.hash(&input.password)?;
        let user = User::new(NewUser {
            name,
            email,
            password_hash,
            role,
        });

        self.users.insert(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::Duplicate("Email already registered".to_string())
            }
            other => other.into(),
        })
    }

    /// Check credentials. Unknown email and wrong password look the same.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let rejected = || DomainError::Unauthorized("Invalid email or password".to_string());

        let email = email.trim().to_lowercase();
        let user = self.users.find_by_email(&email).await?.ok_or_else(rejected)?;
        if !self.verify(password, &user.password_hash)? {
            return Err(rejected());
        }
        Ok(user)
    }

    /// Load the account behind a verified token. Tokens of deleted accounts
    /// are rejected.
    pub async fn current(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("User no longer exists".to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.find_all().await?)
    }

    /// Fetch a user. Non-admins may only fetch themselves.
    pub async fn get(&self, actor: &Actor, id: &str) -> Result<User, DomainError> {
        let id = parse_id(ENTITY, id)?;
        if !actor.can_access(id) {
            return Err(DomainError::Forbidden(
                "You are not authorized to view this user".to_string(),
            ));
        }
        self.find(id).await
    }

    /// Update one's own profile. The current password must be supplied.
    ///
    /// Role changes are never applied here; see [`UserService::admin_update`].
    pub async fn update_profile(
        &self,
        actor: &Actor,
        id: &str,
        password: Option<&str>,
        mut patch: UserPatch,
    ) -> Result<User, DomainError> {
        let id = parse_id(ENTITY, id)?;
        if actor.user_id != id {
            return Err(DomainError::Forbidden(
                "You are not authorized to update this user".to_string(),
            ));
        }
        let password = password.filter(|p| !p.is_empty()).ok_or_else(|| {
            DomainError::Validation(
                "Password is required to update profile information".to_string(),
            )
        })?;

        let mut user = self.find(id).await?;
        if !self.verify(password, &user.password_hash)? {
            return Err(DomainError::Unauthorized(
                "Incorrect password. Cannot update profile information".to_string(),
            ));
        }

        patch.role = None;
        self.save_patch(&mut user, patch).await
    }

    pub async fn change_password(
        &self,
        actor: &Actor,
        id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(DomainError::Validation(
                "Both current password and new password are required".to_string(),
            ));
        }
        let id = parse_id(ENTITY, id)?;
        if actor.user_id != id {
            return Err(DomainError::Forbidden(
                "You can only change your own password".to_string(),
            ));
        }

        let mut user = self.find(id).await?;
        if !self.verify(current_password, &user.password_hash)? {
            return Err(DomainError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }
        check_password_strength(new_password)?;

        user.password_hash = self.hash(new_password)?;
        user.updated_at = chrono::Utc::now();
        self.users.update(user).await?;
        Ok(())
    }

    /// Admin edit of any user, including the role.
    pub async fn admin_update(&self, id: &str, patch: UserPatch) -> Result<User, DomainError> {
        let id = parse_id(ENTITY, id)?;
        let mut user = self.find(id).await?;
        self.save_patch(&mut user, patch).await
    }

    /// Hard delete. Returns the removed user.
    pub async fn delete(&self, id: &str) -> Result<User, DomainError> {
        let id = parse_id(ENTITY, id)?;
        let user = self.find(id).await?;
        self.users.delete(id).await?;
        Ok(user)
    }

    async fn find(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    async fn save_patch(&self, user: &mut User, mut patch: UserPatch) -> Result<User, DomainError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation("Name cannot be empty".to_string()));
            }
        }
        if let Some(email) = patch.email.take() {
            let email = normalize_email(&email)?;
            if email != user.email {
                if let Some(other) = self.users.find_by_email(&email).await? {
                    if other.id != user.id {
                        return Err(DomainError::Duplicate("Email already exists".to_string()));
                    }
                }
            }
            patch.email = Some(email);
        }

        user.apply(patch);
        self.users.update(user.clone()).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::Duplicate("Email already exists".to_string()),
            other => other.into(),
        })
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        self.passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        self.passwords
            .verify(password, hash)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

fn check_password_strength(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
