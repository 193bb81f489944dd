//! External identity providers and the exchange turning their identities
//! into Luxora sessions.

use core::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::error::response_message;
use crate::session::{AuthError, AuthPayload, SessionStore};
use crate::types::User;

/// The external identity backends the Luxora API accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthProvider {
    /// Google sign-in.
    Google,
    /// Twitter sign-in.
    Twitter,
}

impl AuthProvider {
    /// The `authProvider` tag this backend is registered under on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Twitter => "twitter",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity an external provider flow resolved to.
///
/// This is what the popup/redirect dance ends with: a verified email plus
/// whatever profile data the provider shares. The session store exchanges
/// it for a Luxora session through the register endpoint.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderIdentity {
    /// Verified email address.
    pub email: String,
    /// Display name, when the provider shares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Avatar URL, when the provider shares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Represents errors of an external identity flow.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The user dismissed the provider's consent flow.
    #[error("The sign-in window was closed before completing.")]
    Canceled,
    /// The provider flow failed for any other reason.
    #[error("{0}")]
    Failed(String),
}

/// An external identity flow (Google, Twitter, ...).
///
/// The flow itself - opening a consent screen, handling the redirect - is
/// the application's business; this crate only consumes its result. Register
/// an implementation per provider through
/// [`SessionStore::with_identity_provider`] and the provider sign-in
/// operations will drive it.
///
/// # Example
/// ```rust,ignore
/// use async_trait::async_trait;
/// use luxora_rs::{IdentityError, IdentityProvider, ProviderIdentity};
///
/// struct GooglePopup;
///
/// #[async_trait]
/// impl IdentityProvider for GooglePopup {
///     async fn authenticate(&self) -> Result<ProviderIdentity, IdentityError> {
///         // Open the consent screen, wait for the redirect...
///         Ok(ProviderIdentity {
///             email: "ada@gmail.com".to_string(),
///             full_name: Some("Ada Lovelace".to_string()),
///             photo_url: None,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Runs the provider's flow to completion and returns the identity it
    /// resolved to.
    async fn authenticate(&self) -> Result<ProviderIdentity, IdentityError>;
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentityExchange<'a> {
    #[serde(flatten)]
    identity: &'a ProviderIdentity,
    auth_provider: &'static str,
}

impl SessionStore {
    /// Signs in through the registered Google identity flow.
    ///
    /// The original client defaults provider sign-ins to the session scope;
    /// pass `remember: false` for the same behavior.
    ///
    /// # Example
    /// ```rust,ignore
    /// let user = session.login_with_google(false).await?;
    /// ```
    pub async fn login_with_google(&self, remember: bool) -> Result<User, AuthError> {
        self.auth_with_provider(AuthProvider::Google, remember).await
    }

    /// Registers a new account through the Google identity flow.
    ///
    /// The Luxora register endpoint upserts on the provider email, so this
    /// is the same exchange as [`login_with_google`](Self::login_with_google);
    /// both names are kept because callers read differently on a signup
    /// form than on a login form.
    pub async fn signup_with_google(&self, remember: bool) -> Result<User, AuthError> {
        self.auth_with_provider(AuthProvider::Google, remember).await
    }

    /// Signs in through the registered Twitter identity flow.
    pub async fn login_with_twitter(&self, remember: bool) -> Result<User, AuthError> {
        self.auth_with_provider(AuthProvider::Twitter, remember).await
    }

    /// Runs the provider's external flow, then exchanges the resulting
    /// identity for a Luxora session through the register endpoint.
    ///
    /// Blocked accounts are refused exactly like
    /// [`login`](SessionStore::login). Provider failures are wrapped as
    /// [`AuthError::Provider`] with the flow's own wording.
    pub(crate) async fn auth_with_provider(
        &self,
        provider: AuthProvider,
        remember: bool,
    ) -> Result<User, AuthError> {
        let Some(identity_provider) = self.identity_provider(provider) else {
            return Err(AuthError::Provider {
                provider,
                message: "no identity flow is registered for this provider".to_string(),
            });
        };

        let identity = identity_provider
            .authenticate()
            .await
            .map_err(|error| AuthError::Provider {
                provider,
                message: error.to_string(),
            })?;

        let url = format!("{}/api/auth/register", self.client.base_url);
        let exchange = IdentityExchange {
            identity: &identity,
            auth_provider: provider.as_str(),
        };

        let response = self.client.post_json(&url, &exchange).await?;

        if !response.status().is_success() {
            return Err(match response_message(response).await {
                Some(message) => AuthError::Rejected(message),
                None => AuthError::Provider {
                    provider,
                    message: "the sign-in could not be completed".to_string(),
                },
            });
        }

        let mut payload = response
            .json::<AuthPayload>()
            .await
            .map_err(|error| AuthError::ParseError(error.to_string()))?;

        if payload.user.email.is_empty() {
            payload.user.email = identity.email;
        }

        self.complete_auth(payload, remember)
    }
}
