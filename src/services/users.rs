//! User directory service

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Create a new user; email must be unique, case-insensitively
    pub async fn create(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict(format!(
                "Email {} already exists",
                user.email
            )));
        }
        let created = self.repository.users.create(&user).await?;
        tracing::info!(user_id = created.id, "user created");
        Ok(created)
    }

    /// Apply a partial update; the same email-uniqueness policy as creation
    pub async fn update(&self, id: i64, update: UpdateUser) -> AppResult<User> {
        let existing = self.repository.users.get_by_id(id).await?;

        if let Some(ref email) = update.email {
            if !email.eq_ignore_ascii_case(&existing.email)
                && self.repository.users.email_exists(email, Some(id)).await?
            {
                return Err(AppError::Conflict(format!("Email {} already exists", email)));
            }
        }

        self.repository.users.update(id, &update).await
    }

    /// Delete a user
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}
