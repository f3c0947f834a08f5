//! Mock gateway identity for integration tests.
//!
//! Services behind the gateway receive `x-steeple-user-id` +
//! `x-steeple-system-role` headers injected by the gateway. In tests,
//! `MockIdentity` injects these headers directly so no real gateway or token
//! is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use steeple_domain::role::SystemRole;

/// Configurable identity injected into test requests.
pub struct MockIdentity {
    pub user_id: Uuid,
    pub system_role: SystemRole,
}

impl MockIdentity {
    pub fn new(user_id: Uuid, system_role: SystemRole) -> Self {
        Self {
            user_id,
            system_role,
        }
    }

    /// A plain user identity with a random id.
    pub fn user() -> Self {
        Self::new(Uuid::new_v4(), SystemRole::User)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("x-steeple-user-id"),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static("x-steeple-system-role"),
            HeaderValue::from_static(self.system_role.as_str()),
        );
        map
    }
}
