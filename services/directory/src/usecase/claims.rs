//! Identity & claims gateway.
//!
//! Thin synchronous wrapper giving the membership state machine one call
//! surface for per-user authorization claims on the external identity
//! provider. Invoked directly (never via the event log) so callers observe
//! failure immediately.

use uuid::Uuid;

use steeple_domain::role::ChurchRole;

use crate::domain::repository::ClaimsPort;
use crate::error::DirectoryServiceError;

pub struct ClaimsGateway<C: ClaimsPort> {
    pub port: C,
}

impl<C: ClaimsPort> ClaimsGateway<C> {
    /// Set `churchRoles[church_id] = role` on the user's claims.
    pub async fn set_church_role(
        &self,
        user_id: Uuid,
        church_id: Uuid,
        role: ChurchRole,
    ) -> Result<(), DirectoryServiceError> {
        let mut claims = self.port.get_claims(user_id).await?;
        claims.church_roles.insert(church_id, role);
        self.port.set_claims(user_id, &claims).await
    }

    /// Remove `churchRoles[church_id]` from the user's claims. Removing an
    /// absent entry is a no-op write, not an error.
    pub async fn remove_church_role(
        &self,
        user_id: Uuid,
        church_id: Uuid,
    ) -> Result<(), DirectoryServiceError> {
        let mut claims = self.port.get_claims(user_id).await?;
        claims.church_roles.remove(&church_id);
        self.port.set_claims(user_id, &claims).await
    }

    /// Drop the whole claims document (account-deletion cascade).
    pub async fn delete_all(&self, user_id: Uuid) -> Result<(), DirectoryServiceError> {
        self.port.delete_claims(user_id).await
    }
}

/// Log a claims write failure after the store-side writes already succeeded.
///
/// The operation is reported as successful to the caller; the divergence is
/// bounded (resolved on the user's next forced token refresh or by operator
/// reconciliation) and must stay operator-visible.
pub fn log_claims_divergence(user_id: Uuid, church_id: Uuid, err: &DirectoryServiceError) {
    tracing::error!(
        target: "claims_divergence",
        %user_id,
        %church_id,
        error = %err,
        "claims write failed after store writes succeeded"
    );
}
