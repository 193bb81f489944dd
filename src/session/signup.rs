use serde::Serialize;

use crate::error::response_message;
use crate::session::{AuthError, AuthPayload, SessionStore};
use crate::types::{SignupForm, User};

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Registration<'a> {
    #[serde(flatten)]
    form: &'a SignupForm,
    auth_provider: &'static str,
}

impl SessionStore {
    /// Registers a new account through the email/password flow.
    ///
    /// The submission is tagged `authProvider: "email"` so the backend can
    /// tell it apart from the external-identity exchanges. On success the
    /// token is persisted into the scope `remember` selects and the
    /// published user is the server's record completed with the submitted
    /// email (some API versions omit it from the registration answer).
    ///
    /// Blocked accounts are refused exactly like [`login`](Self::login).
    /// A server rejection passes its `message` through as
    /// [`AuthError::Rejected`], or becomes the generic
    /// [`AuthError::RegistrationFailed`] when the body carries none.
    ///
    /// # Example
    /// ```rust,ignore
    /// use luxora_rs::SignupForm;
    ///
    /// let form = SignupForm {
    ///     email: "ada@luxora.app".to_string(),
    ///     password: "hunter2hunter2".to_string(),
    ///     full_name: Some("Ada Lovelace".to_string()),
    ///     ..SignupForm::default()
    /// };
    ///
    /// let user = session.signup(&form, false).await?;
    /// ```
    pub async fn signup(&self, form: &SignupForm, remember: bool) -> Result<User, AuthError> {
        let url = format!("{}/api/auth/register", self.client.base_url);
        let registration = Registration {
            form,
            auth_provider: "email",
        };

        let response = self.client.post_json(&url, &registration).await?;

        if !response.status().is_success() {
            return Err(match response_message(response).await {
                Some(message) => AuthError::Rejected(message),
                None => AuthError::RegistrationFailed,
            });
        }

        let mut payload = response
            .json::<AuthPayload>()
            .await
            .map_err(|error| AuthError::ParseError(error.to_string()))?;

        if payload.user.email.is_empty() {
            payload.user.email = form.email.clone();
        }

        self.complete_auth(payload, remember)
    }
}
