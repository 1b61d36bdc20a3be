//! Sign-in flow: Google credential exchange, session restoration at app
//! start, and logout.

use tracing::{info, warn};

use crate::{
    dto::contest::AuthUser,
    error::ClientResult,
    services::api::ApiClient,
    store::session::SessionStore,
};

/// Authentication flow over the backend session cookie and the local
/// session store.
pub struct AuthService {
    api: ApiClient,
    session: SessionStore,
}

impl AuthService {
    /// Bind the flow to a backend client and the local session.
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        AuthService { api, session }
    }

    /// Restore the session at app start by verifying the cookie with the
    /// backend.
    ///
    /// Anything short of a verified user signs the device out: the local
    /// session is cleared and the server-side session is invalidated so
    /// the stale cookie cannot linger.
    pub async fn restore(&self) -> ClientResult<Option<AuthUser>> {
        match self.api.verify_session().await {
            Ok(Some(user)) => {
                self.session.set_user(user.clone()).await?;
                Ok(Some(user))
            }
            Ok(None) => {
                self.sign_out_locally().await?;
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "session verification failed");
                self.sign_out_locally().await?;
                Ok(None)
            }
        }
    }

    /// Exchange a Google credential for a session and install the user.
    pub async fn login_with_google(&self, credential: &str) -> ClientResult<AuthUser> {
        let user = self.api.google_login(credential).await?;
        self.session.set_user(user.clone()).await?;
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// Sign out: clear the local session and invalidate the cookie.
    pub async fn logout(&self) -> ClientResult<()> {
        self.sign_out_locally().await?;
        info!("signed out");
        Ok(())
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<AuthUser> {
        self.session.user().await
    }

    async fn sign_out_locally(&self) -> ClientResult<()> {
        self.session.clear().await?;
        // Best effort: a dead backend cannot keep us signed in locally.
        if let Err(err) = self.api.logout().await {
            warn!(error = %err, "server-side logout failed");
        }
        Ok(())
    }
}
