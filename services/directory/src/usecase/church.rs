use chrono::Utc;
use uuid::Uuid;

use steeple_domain::church::ChurchLevel;

use crate::domain::repository::{ChurchRepository, StatsRepository};
use crate::domain::types::{Church, ChurchStats};
use crate::error::DirectoryServiceError;

// ── CreateChurch ─────────────────────────────────────────────────────────────

pub struct CreateChurchInput {
    pub name: String,
    pub level: ChurchLevel,
    pub parent_id: Option<Uuid>,
}

pub struct CreateChurchUseCase<C: ChurchRepository> {
    pub churches: C,
}

impl<C: ChurchRepository> CreateChurchUseCase<C> {
    pub async fn execute(&self, input: CreateChurchInput) -> Result<Church, DirectoryServiceError> {
        match input.parent_id {
            Some(parent_id) => {
                let parent = self
                    .churches
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(DirectoryServiceError::ChurchNotFound)?;
                // A child sits exactly one level below its parent.
                if input.level.depth() != parent.level.depth() + 1 {
                    return Err(DirectoryServiceError::InvalidChurchLevel);
                }
            }
            None => {
                if input.level != ChurchLevel::Headquarters {
                    return Err(DirectoryServiceError::InvalidChurchLevel);
                }
            }
        }

        let now = Utc::now();
        let church = Church {
            id: Uuid::new_v4(),
            name: input.name,
            level: input.level,
            parent_id: input.parent_id,
            created_at: now,
            updated_at: now,
        };
        self.churches.create(&church).await?;
        Ok(church)
    }
}

// ── GetChurch / GetChurchStats ───────────────────────────────────────────────

pub struct GetChurchUseCase<C: ChurchRepository> {
    pub churches: C,
}

impl<C: ChurchRepository> GetChurchUseCase<C> {
    pub async fn execute(&self, church_id: Uuid) -> Result<Church, DirectoryServiceError> {
        self.churches
            .find_by_id(church_id)
            .await?
            .ok_or(DirectoryServiceError::ChurchNotFound)
    }
}

pub struct GetChurchStatsUseCase<S: StatsRepository> {
    pub stats: S,
}

impl<S: StatsRepository> GetChurchStatsUseCase<S> {
    pub async fn execute(&self, church_id: Uuid) -> Result<ChurchStats, DirectoryServiceError> {
        self.stats
            .get(church_id)
            .await?
            .ok_or(DirectoryServiceError::ChurchNotFound)
    }
}
