use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::events;
use crate::domain::repository::{ChurchRepository, EventRepository};
use crate::domain::types::ChurchEvent;
use crate::error::DirectoryServiceError;

// ── CreateEvent ──────────────────────────────────────────────────────────────

pub struct CreateEventInput {
    pub church_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
}

pub struct CreateEventUseCase<C, E>
where
    C: ChurchRepository,
    E: EventRepository,
{
    pub churches: C,
    pub events: E,
}

impl<C, E> CreateEventUseCase<C, E>
where
    C: ChurchRepository,
    E: EventRepository,
{
    pub async fn execute(
        &self,
        input: CreateEventInput,
    ) -> Result<ChurchEvent, DirectoryServiceError> {
        if self.churches.find_by_id(input.church_id).await?.is_none() {
            return Err(DirectoryServiceError::ChurchNotFound);
        }

        let event = ChurchEvent {
            id: Uuid::new_v4(),
            church_id: input.church_id,
            title: input.title,
            starts_at: input.starts_at,
            created_at: Utc::now(),
        };
        let outbox = events::event_created(event.church_id, event.id);
        self.events.create_with_outbox(&event, &outbox).await?;
        Ok(event)
    }
}

// ── DeleteEvent ──────────────────────────────────────────────────────────────

pub struct DeleteEventUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> DeleteEventUseCase<E> {
    pub async fn execute(&self, event_id: Uuid) -> Result<(), DirectoryServiceError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(DirectoryServiceError::EventNotFound)?;
        let outbox = events::event_deleted(event.church_id, event.id);
        self.events.delete_with_outbox(event.id, &outbox).await
    }
}
