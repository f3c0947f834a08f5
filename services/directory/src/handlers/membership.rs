use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use steeple_auth_types::identity::IdentityHeaders;
use steeple_domain::pagination::PageRequest;
use steeple_domain::role::ChurchRole;

use crate::domain::types::{ChurchMembership, MemberRecord};
use crate::error::DirectoryServiceError;
use crate::handlers::authorize_church_manage;
use crate::state::AppState;
use crate::usecase::membership::{
    ApproveMembershipUseCase, LeaveChurchUseCase, ListPendingMembershipsUseCase,
    MyMembershipsUseCase, RejectMembershipUseCase, RequestMembershipInput,
    RequestMembershipUseCase, UpdateMemberRoleUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub church_id: String,
    pub church_name: String,
    pub role: ChurchRole,
    pub status: steeple_domain::membership::MembershipStatus,
    #[serde(serialize_with = "steeple_core::serde::to_rfc3339_ms")]
    pub joined_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "steeple_core::serde::opt_to_rfc3339_ms")]
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "steeple_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ChurchMembership> for MembershipResponse {
    fn from(m: ChurchMembership) -> Self {
        Self {
            church_id: m.church_id.to_string(),
            church_name: m.church_name,
            role: m.role,
            status: m.status,
            joined_at: m.joined_at,
            approved_at: m.approved_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecordResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub role: ChurchRole,
    pub status: steeple_domain::membership::MembershipStatus,
    pub rejection_reason: Option<String>,
    pub answers: Value,
    #[serde(serialize_with = "steeple_core::serde::to_rfc3339_ms")]
    pub joined_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "steeple_core::serde::opt_to_rfc3339_ms")]
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<MemberRecord> for MemberRecordResponse {
    fn from(r: MemberRecord) -> Self {
        Self {
            user_id: r.user_id.to_string(),
            display_name: r.display_name,
            email: r.email,
            photo_url: r.photo_url,
            role: r.role,
            status: r.status,
            rejection_reason: r.rejection_reason,
            answers: r.answers,
            joined_at: r.joined_at,
            approved_at: r.approved_at,
        }
    }
}

fn parse_role(role: &str) -> Result<ChurchRole, DirectoryServiceError> {
    ChurchRole::parse(role).ok_or(DirectoryServiceError::InvalidRole)
}

// ── POST /memberships/request ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMembershipRequest {
    pub church_id: Uuid,
    #[serde(default)]
    pub answers: Option<Value>,
}

pub async fn request_membership(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RequestMembershipRequest>,
) -> Result<(StatusCode, Json<MembershipResponse>), DirectoryServiceError> {
    let usecase = RequestMembershipUseCase {
        users: state.user_repo(),
        churches: state.church_repo(),
        memberships: state.membership_repo(),
        member_records: state.member_record_repo(),
    };
    let membership = usecase
        .execute(RequestMembershipInput {
            user_id: identity.user_id,
            church_id: body.church_id,
            answers: body.answers.unwrap_or_else(|| Value::Array(vec![])),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(membership.into())))
}

// ── GET /memberships/my ──────────────────────────────────────────────────────

pub async fn my_memberships(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<MembershipResponse>>, DirectoryServiceError> {
    let usecase = MyMembershipsUseCase {
        memberships: state.membership_repo(),
    };
    let memberships = usecase.execute(identity.user_id).await?;
    Ok(Json(memberships.into_iter().map(Into::into).collect()))
}

// ── DELETE /memberships/churches/{churchId}/leave ────────────────────────────

pub async fn leave_church(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(church_id): Path<Uuid>,
) -> Result<StatusCode, DirectoryServiceError> {
    let usecase = LeaveChurchUseCase {
        memberships: state.membership_repo(),
        member_records: state.member_record_repo(),
        claims: state.claims_gateway(),
        stats: state.stats_repo(),
    };
    usecase.execute(identity.user_id, church_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /memberships/churches/{churchId}/pending ─────────────────────────────

pub async fn pending_memberships(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(church_id): Path<Uuid>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<MemberRecordResponse>>, DirectoryServiceError> {
    authorize_church_manage(&state, &identity, church_id).await?;

    let page: PageRequest = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| DirectoryServiceError::MissingData)?
        .unwrap_or_default();

    let usecase = ListPendingMembershipsUseCase {
        member_records: state.member_record_repo(),
    };
    let records = usecase.execute(church_id, page).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

// ── PUT /memberships/churches/{churchId}/approve/{userId} ────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveMembershipRequest {
    pub role: String,
}

pub async fn approve_membership(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((church_id, user_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<ApproveMembershipRequest>,
) -> Result<StatusCode, DirectoryServiceError> {
    authorize_church_manage(&state, &identity, church_id).await?;
    let role = parse_role(&body.role)?;

    let usecase = ApproveMembershipUseCase {
        memberships: state.membership_repo(),
        member_records: state.member_record_repo(),
        claims: state.claims_gateway(),
        stats: state.stats_repo(),
    };
    usecase.execute(church_id, user_id, role).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /memberships/churches/{churchId}/reject/{userId} ─────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectMembershipRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

pub async fn reject_membership(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((church_id, user_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<RejectMembershipRequest>,
) -> Result<StatusCode, DirectoryServiceError> {
    authorize_church_manage(&state, &identity, church_id).await?;

    let usecase = RejectMembershipUseCase {
        memberships: state.membership_repo(),
        member_records: state.member_record_repo(),
    };
    usecase
        .execute(church_id, user_id, body.reason.as_deref().unwrap_or(""))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /memberships/churches/{churchId}/members/{userId}/role ───────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRoleRequest {
    pub role: String,
}

pub async fn update_member_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((church_id, user_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateMemberRoleRequest>,
) -> Result<StatusCode, DirectoryServiceError> {
    authorize_church_manage(&state, &identity, church_id).await?;
    let role = parse_role(&body.role)?;

    let usecase = UpdateMemberRoleUseCase {
        memberships: state.membership_repo(),
        member_records: state.member_record_repo(),
        claims: state.claims_gateway(),
    };
    usecase.execute(church_id, user_id, role).await?;
    Ok(StatusCode::NO_CONTENT)
}
