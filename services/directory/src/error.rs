use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Directory service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("church not found")]
    ChurchNotFound,
    #[error("membership not found")]
    MembershipNotFound,
    #[error("sermon not found")]
    SermonNotFound,
    #[error("event not found")]
    EventNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("membership already exists")]
    MembershipAlreadyExists,
    #[error("membership is not pending")]
    MembershipNotPending,
    #[error("membership is not approved")]
    MembershipNotApproved,
    #[error("invalid role")]
    InvalidRole,
    #[error("invalid church level")]
    InvalidChurchLevel,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl DirectoryServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ChurchNotFound => "CHURCH_NOT_FOUND",
            Self::MembershipNotFound => "MEMBERSHIP_NOT_FOUND",
            Self::SermonNotFound => "SERMON_NOT_FOUND",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::MembershipAlreadyExists => "MEMBERSHIP_ALREADY_EXISTS",
            Self::MembershipNotPending => "MEMBERSHIP_NOT_PENDING",
            Self::MembershipNotApproved => "MEMBERSHIP_NOT_APPROVED",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidChurchLevel => "INVALID_CHURCH_LEVEL",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for DirectoryServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::ChurchNotFound
            | Self::MembershipNotFound
            | Self::SermonNotFound
            | Self::EventNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists
            | Self::MembershipAlreadyExists
            | Self::MembershipNotPending
            | Self::MembershipNotApproved => StatusCode::CONFLICT,
            Self::InvalidRole | Self::InvalidChurchLevel | Self::MissingData => {
                StatusCode::BAD_REQUEST
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
