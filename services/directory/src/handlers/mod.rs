pub mod church;
pub mod event;
pub mod membership;
pub mod sermon;
pub mod user;

use uuid::Uuid;

use steeple_auth_types::identity::IdentityHeaders;
use steeple_domain::role::SystemRole;

use crate::domain::repository::ClaimsPort;
use crate::error::DirectoryServiceError;
use crate::state::AppState;

/// Church-scoped management authorization: system admins pass on the header
/// alone; everyone else is checked against their claims document, the
/// authorization source of truth.
pub(crate) async fn authorize_church_manage(
    state: &AppState,
    identity: &IdentityHeaders,
    church_id: Uuid,
) -> Result<(), DirectoryServiceError> {
    if identity.system_role >= SystemRole::Admin {
        return Ok(());
    }
    let claims = state.claims_port().get_claims(identity.user_id).await?;
    if claims.can_manage_church(church_id) {
        Ok(())
    } else {
        Err(DirectoryServiceError::Forbidden)
    }
}
