use crate::session::{AuthError, SessionStore};
use crate::types::User;

impl SessionStore {
    /// Resolves a previously persisted token into a signed-in user.
    ///
    /// This is the silent sign-in performed once at application startup: the
    /// verify endpoint is called with whatever token the store currently
    /// holds (the request is sent even without one, the server simply
    /// answers `401`). Whatever happens, the store stops reporting
    /// [`SessionStatus::Initializing`](crate::SessionStatus::Initializing)
    /// when this method returns.
    ///
    /// - `Ok(Some(user))`: the token is still honored, the user is published.
    /// - `Ok(None)`: the token is gone, expired, or the server could not be
    ///   understood; both token scopes are dropped and the store is signed
    ///   out. Not an error, just a cold start.
    /// - `Err(AccountBlocked)`: the account was blocked since the token was
    ///   minted; local credentials are dropped and the caller should surface
    ///   the message.
    ///
    /// # Example
    /// ```rust,ignore
    /// match session.verify_session().await? {
    ///     Some(user) => println!("welcome back, {}", user.email),
    ///     None => println!("please sign in"),
    /// }
    /// ```
    pub async fn verify_session(&self) -> Result<Option<User>, AuthError> {
        let url = format!("{}/api/auth/verify", self.client.base_url);

        let result = self.verify_against(&url).await;
        self.finish_loading();

        result
    }

    async fn verify_against(&self, url: &str) -> Result<Option<User>, AuthError> {
        let response = match self.client.get(url, None).await {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(%error, "silent verification could not reach the API");
                self.sign_out_locally();
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                status = response.status().as_u16(),
                "silent verification rejected, starting signed out"
            );
            self.sign_out_locally();
            return Ok(None);
        }

        let user = match response.json::<User>().await {
            Ok(user) => user,
            Err(error) => {
                tracing::debug!(%error, "silent verification answer could not be parsed");
                self.sign_out_locally();
                return Ok(None);
            }
        };

        if user.is_blocked {
            tracing::warn!(
                user = user.email.as_str(),
                "blocked account detected during verification, dropping local credentials"
            );
            self.sign_out_locally();
            return Err(AuthError::AccountBlocked);
        }

        self.set_user(Some(user.clone()));

        Ok(Some(user))
    }

    /// Drops both token scopes and publishes a signed-out session.
    fn sign_out_locally(&self) {
        self.client.token_store.clear_all();
        self.set_user(None);
    }
}
