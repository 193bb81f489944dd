use serde::Serialize;

use crate::error::response_message;
use crate::session::{AuthError, AuthPayload, SessionStore};
use crate::types::User;

#[derive(Clone, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl SessionStore {
    /// Signs in with an email/password combination.
    ///
    /// On success the returned bearer token is persisted into the scope
    /// `remember` selects (`true` survives restarts, `false` dies with the
    /// process) and the user is published to subscribers.
    ///
    /// A blocked account never signs in: no token is persisted, local
    /// credentials are dropped and [`AuthError::AccountBlocked`] is
    /// returned. On a server rejection, the server's own `message` is passed
    /// through as [`AuthError::Rejected`]; a rejection without one becomes
    /// [`AuthError::InvalidCredentials`].
    ///
    /// # Example
    /// ```rust,ignore
    /// let user = session.login("YOUR_EMAIL", "YOUR_PASSWORD", true).await?;
    ///
    /// println!("Signed in as {}", user.email);
    /// ```
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<User, AuthError> {
        let url = format!("{}/api/auth/login", self.client.base_url);
        let credentials = Credentials { email, password };

        let response = self.client.post_json(&url, &credentials).await?;

        if !response.status().is_success() {
            return Err(match response_message(response).await {
                Some(message) => AuthError::Rejected(message),
                None => AuthError::InvalidCredentials,
            });
        }

        let payload = response
            .json::<AuthPayload>()
            .await
            .map_err(|error| AuthError::ParseError(error.to_string()))?;

        self.complete_auth(payload, remember)
    }
}
