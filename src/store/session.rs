//! Session store holding the authenticated user for this device.
//!
//! An explicit handle rather than a global: it is created at app start,
//! hydrated from the store, and passed into the services that need it.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::{
    dto::contest::AuthUser,
    store::{StateStore, StoreResult},
};

/// Handle to the persisted auth session.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn StateStore>,
    user: Arc<RwLock<Option<AuthUser>>>,
}

impl SessionStore {
    /// Hydrate the session from the store at app start.
    pub async fn load(store: Arc<dyn StateStore>) -> StoreResult<Self> {
        let user = store.load_user().await?;
        Ok(SessionStore {
            store,
            user: Arc::new(RwLock::new(user)),
        })
    }

    /// The signed-in user, if any.
    pub async fn user(&self) -> Option<AuthUser> {
        self.user.read().await.clone()
    }

    /// Whether a user is signed in.
    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    /// Install a user after login or session verification.
    pub async fn set_user(&self, user: AuthUser) -> StoreResult<()> {
        info!(user_id = %user.id, "session established");
        self.store.save_user(Some(user.clone())).await?;
        *self.user.write().await = Some(user);
        Ok(())
    }

    /// Clear the session on logout or failed verification.
    pub async fn clear(&self) -> StoreResult<()> {
        self.store.save_user(None).await?;
        *self.user.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn user() -> AuthUser {
        AuthUser {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            profile_picture: "https://example.com/a.png".into(),
        }
    }

    #[tokio::test]
    async fn session_round_trips_through_store() {
        let store = Arc::new(MemoryStore::new());
        let session = SessionStore::load(store.clone()).await.unwrap();
        assert!(!session.is_authenticated().await);

        session.set_user(user()).await.unwrap();
        assert!(session.is_authenticated().await);

        // A fresh handle hydrates the persisted user.
        let rehydrated = SessionStore::load(store).await.unwrap();
        assert_eq!(rehydrated.user().await.unwrap().id, "u1");

        rehydrated.clear().await.unwrap();
        assert!(!rehydrated.is_authenticated().await);
    }
}
