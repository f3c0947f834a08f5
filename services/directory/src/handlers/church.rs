use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use steeple_auth_types::identity::IdentityHeaders;
use steeple_domain::church::ChurchLevel;
use steeple_domain::role::SystemRole;

use crate::domain::types::{Church, ChurchStats};
use crate::error::DirectoryServiceError;
use crate::state::AppState;
use crate::usecase::church::{
    CreateChurchInput, CreateChurchUseCase, GetChurchStatsUseCase, GetChurchUseCase,
};
use crate::usecase::stats::RecomputeStatsUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurchResponse {
    pub id: String,
    pub name: String,
    pub level: ChurchLevel,
    pub parent_id: Option<String>,
    #[serde(serialize_with = "steeple_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Church> for ChurchResponse {
    fn from(church: Church) -> Self {
        Self {
            id: church.id.to_string(),
            name: church.name,
            level: church.level,
            parent_id: church.parent_id.map(|id| id.to_string()),
            created_at: church.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurchStatsResponse {
    pub member_count: i64,
    pub event_count: i64,
    pub sermon_count: i64,
    #[serde(serialize_with = "steeple_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ChurchStats> for ChurchStatsResponse {
    fn from(stats: ChurchStats) -> Self {
        Self {
            member_count: stats.member_count,
            event_count: stats.event_count,
            sermon_count: stats.sermon_count,
            updated_at: stats.updated_at,
        }
    }
}

// ── POST /churches ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChurchRequest {
    pub name: String,
    pub level: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

pub async fn create_church(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateChurchRequest>,
) -> Result<(StatusCode, Json<ChurchResponse>), DirectoryServiceError> {
    if identity.system_role < SystemRole::Admin {
        return Err(DirectoryServiceError::Forbidden);
    }
    let level =
        ChurchLevel::parse(&body.level).ok_or(DirectoryServiceError::InvalidChurchLevel)?;
    let usecase = CreateChurchUseCase {
        churches: state.church_repo(),
    };
    let church = usecase
        .execute(CreateChurchInput {
            name: body.name,
            level,
            parent_id: body.parent_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(church.into())))
}

// ── GET /churches/{churchId} ─────────────────────────────────────────────────

pub async fn get_church(
    State(state): State<AppState>,
    Path(church_id): Path<Uuid>,
) -> Result<Json<ChurchResponse>, DirectoryServiceError> {
    let usecase = GetChurchUseCase {
        churches: state.church_repo(),
    };
    let church = usecase.execute(church_id).await?;
    Ok(Json(church.into()))
}

// ── GET /churches/{churchId}/stats ───────────────────────────────────────────

pub async fn get_church_stats(
    State(state): State<AppState>,
    Path(church_id): Path<Uuid>,
) -> Result<Json<ChurchStatsResponse>, DirectoryServiceError> {
    let usecase = GetChurchStatsUseCase {
        stats: state.stats_repo(),
    };
    let stats = usecase.execute(church_id).await?;
    Ok(Json(stats.into()))
}

// ── POST /churches/{churchId}/stats/recompute ────────────────────────────────

pub async fn recompute_church_stats(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(church_id): Path<Uuid>,
) -> Result<Json<ChurchStatsResponse>, DirectoryServiceError> {
    if identity.system_role < SystemRole::Admin {
        return Err(DirectoryServiceError::Forbidden);
    }
    let usecase = RecomputeStatsUseCase {
        member_records: state.member_record_repo(),
        sermons: state.sermon_repo(),
        events: state.event_repo(),
        stats: state.stats_repo(),
    };
    let stats = usecase.execute(church_id).await?;
    Ok(Json(stats.into()))
}
