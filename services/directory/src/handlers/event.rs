use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use steeple_auth_types::identity::IdentityHeaders;

use crate::domain::repository::EventRepository as _;
use crate::domain::types::ChurchEvent;
use crate::error::DirectoryServiceError;
use crate::handlers::authorize_church_manage;
use crate::state::AppState;
use crate::usecase::event::{CreateEventInput, CreateEventUseCase, DeleteEventUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub church_id: String,
    pub title: String,
    #[serde(serialize_with = "steeple_core::serde::to_rfc3339_ms")]
    pub starts_at: chrono::DateTime<chrono::Utc>,
}

impl From<ChurchEvent> for EventResponse {
    fn from(event: ChurchEvent) -> Self {
        Self {
            id: event.id.to_string(),
            church_id: event.church_id.to_string(),
            title: event.title,
            starts_at: event.starts_at,
        }
    }
}

// ── POST /churches/{churchId}/events ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub starts_at: chrono::DateTime<chrono::Utc>,
}

pub async fn create_event(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(church_id): Path<Uuid>,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), DirectoryServiceError> {
    authorize_church_manage(&state, &identity, church_id).await?;

    let usecase = CreateEventUseCase {
        churches: state.church_repo(),
        events: state.event_repo(),
    };
    let event = usecase
        .execute(CreateEventInput {
            church_id,
            title: body.title,
            starts_at: body.starts_at,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

// ── DELETE /events/{eventId} ─────────────────────────────────────────────────

pub async fn delete_event(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, DirectoryServiceError> {
    let event = state
        .event_repo()
        .find_by_id(event_id)
        .await?
        .ok_or(DirectoryServiceError::EventNotFound)?;
    authorize_church_manage(&state, &identity, event.church_id).await?;

    let usecase = DeleteEventUseCase {
        events: state.event_repo(),
    };
    usecase.execute(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
