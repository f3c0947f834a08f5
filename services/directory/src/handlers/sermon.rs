use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use steeple_auth_types::identity::IdentityHeaders;

use crate::domain::repository::SermonRepository as _;
use crate::domain::types::Sermon;
use crate::error::DirectoryServiceError;
use crate::handlers::authorize_church_manage;
use crate::state::AppState;
use crate::usecase::sermon::{CreateSermonInput, CreateSermonUseCase, DeleteSermonUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SermonResponse {
    pub id: String,
    pub church_id: String,
    pub title: String,
    pub speaker_user_id: Option<String>,
    pub speaker_name: String,
    #[serde(serialize_with = "steeple_core::serde::to_rfc3339_ms")]
    pub preached_at: chrono::DateTime<chrono::Utc>,
}

impl From<Sermon> for SermonResponse {
    fn from(sermon: Sermon) -> Self {
        Self {
            id: sermon.id.to_string(),
            church_id: sermon.church_id.to_string(),
            title: sermon.title,
            speaker_user_id: sermon.speaker_user_id.map(|id| id.to_string()),
            speaker_name: sermon.speaker_name,
            preached_at: sermon.preached_at,
        }
    }
}

// ── POST /churches/{churchId}/sermons ────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSermonRequest {
    pub title: String,
    #[serde(default)]
    pub speaker_user_id: Option<Uuid>,
    #[serde(default)]
    pub guest_speaker: Option<String>,
    pub preached_at: chrono::DateTime<chrono::Utc>,
}

pub async fn create_sermon(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(church_id): Path<Uuid>,
    Json(body): Json<CreateSermonRequest>,
) -> Result<(StatusCode, Json<SermonResponse>), DirectoryServiceError> {
    authorize_church_manage(&state, &identity, church_id).await?;

    let usecase = CreateSermonUseCase {
        churches: state.church_repo(),
        users: state.user_repo(),
        sermons: state.sermon_repo(),
    };
    let sermon = usecase
        .execute(CreateSermonInput {
            church_id,
            title: body.title,
            speaker_user_id: body.speaker_user_id,
            guest_speaker: body.guest_speaker,
            preached_at: body.preached_at,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(sermon.into())))
}

// ── DELETE /sermons/{sermonId} ───────────────────────────────────────────────

pub async fn delete_sermon(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(sermon_id): Path<Uuid>,
) -> Result<StatusCode, DirectoryServiceError> {
    let sermon = state
        .sermon_repo()
        .find_by_id(sermon_id)
        .await?
        .ok_or(DirectoryServiceError::SermonNotFound)?;
    authorize_church_manage(&state, &identity, sermon.church_id).await?;

    let usecase = DeleteSermonUseCase {
        sermons: state.sermon_repo(),
    };
    usecase.execute(sermon_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
