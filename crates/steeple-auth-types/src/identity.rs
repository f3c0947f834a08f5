//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use steeple_domain::role::SystemRole;

/// User identity injected by the gateway via `x-steeple-user-id` and
/// `x-steeple-system-role` headers.
///
/// Returns 401 if either header is absent or malformed. Church-scoped
/// authorization (403) is done by handlers against the claims document after
/// extraction.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub system_role: SystemRole,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get("x-steeple-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        let system_role = parts
            .headers
            .get("x-steeple-system-role")
            .and_then(|v| v.to_str().ok())
            .and_then(SystemRole::parse);

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let system_role = system_role.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self {
                user_id,
                system_role,
            })
        }
    }
}
