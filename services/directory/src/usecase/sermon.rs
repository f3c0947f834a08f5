use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::events;
use crate::domain::repository::{ChurchRepository, SermonRepository, UserRepository};
use crate::domain::types::Sermon;
use crate::error::DirectoryServiceError;

// ── CreateSermon ─────────────────────────────────────────────────────────────

pub struct CreateSermonInput {
    pub church_id: Uuid,
    pub title: String,
    /// Platform user who preached; their display name is cached on the row
    /// and kept fresh by the sync engine.
    pub speaker_user_id: Option<Uuid>,
    /// Free-form name for guest speakers without an account.
    pub guest_speaker: Option<String>,
    pub preached_at: DateTime<Utc>,
}

pub struct CreateSermonUseCase<C, U, S>
where
    C: ChurchRepository,
    U: UserRepository,
    S: SermonRepository,
{
    pub churches: C,
    pub users: U,
    pub sermons: S,
}

impl<C, U, S> CreateSermonUseCase<C, U, S>
where
    C: ChurchRepository,
    U: UserRepository,
    S: SermonRepository,
{
    pub async fn execute(&self, input: CreateSermonInput) -> Result<Sermon, DirectoryServiceError> {
        if self.churches.find_by_id(input.church_id).await?.is_none() {
            return Err(DirectoryServiceError::ChurchNotFound);
        }

        let speaker_name = match input.speaker_user_id {
            Some(speaker_id) => {
                let speaker = self
                    .users
                    .find_by_id(speaker_id)
                    .await?
                    .ok_or(DirectoryServiceError::UserNotFound)?;
                speaker.display_name
            }
            None => input
                .guest_speaker
                .ok_or(DirectoryServiceError::MissingData)?,
        };

        let sermon = Sermon {
            id: Uuid::new_v4(),
            church_id: input.church_id,
            title: input.title,
            speaker_user_id: input.speaker_user_id,
            speaker_name,
            preached_at: input.preached_at,
            created_at: Utc::now(),
        };
        let event = events::sermon_created(sermon.church_id, sermon.id);
        self.sermons.create_with_outbox(&sermon, &event).await?;
        Ok(sermon)
    }
}

// ── DeleteSermon ─────────────────────────────────────────────────────────────

pub struct DeleteSermonUseCase<S: SermonRepository> {
    pub sermons: S,
}

impl<S: SermonRepository> DeleteSermonUseCase<S> {
    pub async fn execute(&self, sermon_id: Uuid) -> Result<(), DirectoryServiceError> {
        let sermon = self
            .sermons
            .find_by_id(sermon_id)
            .await?
            .ok_or(DirectoryServiceError::SermonNotFound)?;
        let event = events::sermon_deleted(sermon.church_id, sermon.id);
        self.sermons.delete_with_outbox(sermon.id, &event).await
    }
}
