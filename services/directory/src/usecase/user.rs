use chrono::Utc;
use uuid::Uuid;

use steeple_domain::role::SystemRole;

use crate::domain::events;
use crate::domain::repository::UserRepository;
use crate::domain::types::{ProfileChanges, User};
use crate::error::DirectoryServiceError;

// ── CreateUser (first-sign-in webhook) ───────────────────────────────────────

pub struct CreateUserInput {
    /// Identity-provider uid; the service never mints user ids itself.
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: Option<String>,
}

pub struct CreateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateUserUseCase<U> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, DirectoryServiceError> {
        if self.users.find_by_id(input.id).await?.is_some() {
            return Err(DirectoryServiceError::UserAlreadyExists);
        }
        let now = Utc::now();
        let user = User {
            id: input.id,
            email: input.email,
            display_name: input.display_name,
            first_name: input.first_name,
            last_name: input.last_name,
            photo_url: input.photo_url,
            system_role: SystemRole::User,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, DirectoryServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DirectoryServiceError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the photo; `None` leaves it untouched.
    pub photo_url: Option<Option<String>>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    /// Apply a profile edit. An edit that changes no tracked field is a
    /// complete no-op (no row update and no sync event), so downstream
    /// copies are never rewritten needlessly.
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<ProfileChanges, DirectoryServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DirectoryServiceError::UserNotFound)?;

        let changes = ProfileChanges::diff(
            &user,
            input.display_name.as_deref(),
            input.first_name.as_deref(),
            input.last_name.as_deref(),
            input.email.as_deref(),
            input.photo_url.as_ref().map(|v| v.as_deref()),
        );
        if changes.is_empty() {
            return Ok(changes);
        }

        let now = Utc::now();
        let event = events::profile_updated(user_id, &changes, now);
        self.users
            .update_profile_with_outbox(user_id, &changes, now, &event)
            .await?;
        Ok(changes)
    }
}
