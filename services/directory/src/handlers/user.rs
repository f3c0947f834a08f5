use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use steeple_auth_types::identity::IdentityHeaders;
use steeple_domain::role::SystemRole;

use crate::domain::types::{User, double_option};
use crate::error::DirectoryServiceError;
use crate::state::AppState;
use crate::usecase::membership::CascadeDeleteUserUseCase;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, GetUserUseCase, UpdateProfileInput, UpdateProfileUseCase,
};

// ── Response type ────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: Option<String>,
    pub system_role: SystemRole,
    #[serde(serialize_with = "steeple_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "steeple_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
            first_name: user.first_name,
            last_name: user.last_name,
            photo_url: user.photo_url,
            system_role: user.system_role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /users (first-sign-in webhook) ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

pub async fn create_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), DirectoryServiceError> {
    // Only the gateway's service identity may mint profiles.
    if identity.system_role < SystemRole::Admin {
        return Err(DirectoryServiceError::Forbidden);
    }
    let usecase = CreateUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            id: body.id,
            email: body.email,
            display_name: body.display_name,
            first_name: body.first_name,
            last_name: body.last_name,
            photo_url: body.photo_url,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, DirectoryServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Absent leaves the photo untouched; explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub photo_url: Option<Option<String>>,
}

pub async fn update_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<StatusCode, DirectoryServiceError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            UpdateProfileInput {
                display_name: body.display_name,
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                photo_url: body.photo_url,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /users/{userId} (account-deletion cascade) ────────────────────────

pub async fn delete_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, DirectoryServiceError> {
    if identity.system_role < SystemRole::Superadmin {
        return Err(DirectoryServiceError::Forbidden);
    }
    let usecase = CascadeDeleteUserUseCase {
        users: state.user_repo(),
        memberships: state.membership_repo(),
        member_records: state.member_record_repo(),
        claims: state.claims_gateway(),
        stats: state.stats_repo(),
    };
    usecase.execute(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
