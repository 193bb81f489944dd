use crate::session::SessionStore;

impl SessionStore {
    /// Signs out, unconditionally.
    ///
    /// The logout endpoint is called best-effort so the server can revoke
    /// the token; its outcome is only logged. Both token scopes are then
    /// dropped and the signed-out session is published, whatever the server
    /// said. Signing out can never fail, which is why this method returns
    /// nothing.
    ///
    /// # Example
    /// ```rust,ignore
    /// session.logout().await;
    /// assert!(session.user().is_none());
    /// ```
    pub async fn logout(&self) {
        let url = format!("{}/api/auth/logout", self.client.base_url);

        match self.client.get(&url, None).await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    status = response.status().as_u16(),
                    "logout endpoint rejected the call, clearing local state anyway"
                );
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(%error, "logout endpoint unreachable, clearing local state anyway");
            }
        }

        self.client.token_store.clear_all();
        self.set_user(None);
    }
}
