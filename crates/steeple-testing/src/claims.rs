//! In-memory identity-provider claims store.
//!
//! Stands in for the external identity provider's custom-claims storage.
//! Supports failure injection so tests can verify that claims-write failures
//! are logged and swallowed rather than failing the primary operation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use steeple_auth_types::claims::Claims;

/// Shared in-memory claims store. Clone handles freely; all clones see the
/// same state.
#[derive(Clone, Default)]
pub struct InMemoryClaims {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    claims: HashMap<Uuid, Claims>,
    fail_writes: bool,
}

impl InMemoryClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims for a user, or the default document if none were ever set.
    pub fn get(&self, user_id: Uuid) -> Claims {
        self.inner
            .lock()
            .unwrap()
            .claims
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set(&self, user_id: Uuid, claims: Claims) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            anyhow::bail!("identity provider unavailable");
        }
        inner.claims.insert(user_id, claims);
        Ok(())
    }

    pub fn delete(&self, user_id: Uuid) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            anyhow::bail!("identity provider unavailable");
        }
        inner.claims.remove(&user_id);
        Ok(())
    }

    /// Make every subsequent write fail until called again with `false`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    /// Whether any claims document exists for the user.
    pub fn contains(&self, user_id: Uuid) -> bool {
        self.inner.lock().unwrap().claims.contains_key(&user_id)
    }
}
