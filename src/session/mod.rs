//! Session state: the signed-in user and the operations of its lifecycle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::token::TokenScope;
use crate::types::{User, UserPatch};
use crate::Luxora;

use self::provider::{AuthProvider, IdentityProvider};

pub(crate) mod provider;

mod admin;
mod login;
mod logout;
mod signup;
mod subscription;
mod verify;

/// Lifecycle of a [`SessionStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// The initial silent verification has not resolved yet.
    Initializing,
    /// Nobody is signed in.
    Unauthenticated,
    /// A user is signed in.
    Authenticated,
}

/// Wire shape shared by the login and register endpoints: the bearer token
/// plus the account it belongs to.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthPayload {
    pub(crate) token: String,
    pub(crate) user: User,
}

/// Represents errors of the Luxora authentication operations.
///
/// Display strings are ready to be shown to an end user. Whenever the
/// server's error body carried a `message`, it is passed through unchanged
/// as [`AuthError::Rejected`]; the fixed variants cover everything the
/// server left unexplained.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The account is flagged as blocked.
    ///
    /// By the time this is returned, both token scopes have been dropped
    /// and the published user has been cleared, whichever operation
    /// detected the flag.
    #[error("This account has been blocked. Please contact support.")]
    AccountBlocked,
    /// The login endpoint rejected the credentials without saying why.
    #[error("Invalid credentials.")]
    InvalidCredentials,
    /// The register endpoint rejected the submission without saying why.
    #[error("Registration failed. Please try again.")]
    RegistrationFailed,
    /// The server rejected the operation and said why; the message is the
    /// server's own wording, unchanged.
    #[error("{0}")]
    Rejected(String),
    /// An external identity flow failed, or none is registered for the
    /// requested provider.
    #[error("Could not sign in with {provider}: {message}")]
    Provider {
        /// Which identity backend the flow belonged to.
        provider: AuthProvider,
        /// What went wrong, as reported by the identity flow.
        message: String,
    },
    /// An HTTP error occurred while communicating with the Luxora API.
    ///
    /// This variant wraps a [`reqwest::Error`] and indicates that the
    /// request could not be completed at all: network issues, an invalid
    /// URL, a timeout, and similar failures.
    #[error("The Luxora API could not be reached: {0}")]
    HttpError(reqwest::Error),
    /// The response could not be parsed into the expected data structure.
    #[error("Could not parse the response into the expected data structure: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::HttpError(error)
    }
}

/// Holds the signed-in user and implements the authentication operations.
///
/// The store starts in the [`SessionStatus::Initializing`] state; call
/// [`verify_session`](Self::verify_session) once at startup to resolve a
/// previously persisted token into a user (or into a clean signed-out
/// state). Every way the user can change afterwards - login, registration,
/// provider sign-in, profile patches, logout - goes through this store and
/// is published to [`subscribe`](Self::subscribe)d watchers.
///
/// The store is `Send + Sync`; wrap it in an [`Arc`] and hand clones of the
/// handle to whoever needs to read or observe the session.
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use luxora_rs::{Luxora, SessionStore};
///
/// let client = Luxora::new("https://api.luxora.app");
/// let session = Arc::new(SessionStore::new(client));
///
/// session.verify_session().await?;
///
/// match session.user() {
///     Some(user) => println!("welcome back, {}", user.email),
///     None => println!("signed out"),
/// }
/// ```
pub struct SessionStore {
    pub(crate) client: Luxora,
    user_tx: watch::Sender<Option<User>>,
    loading: AtomicBool,
    providers: HashMap<AuthProvider, Arc<dyn IdentityProvider>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field(
                "user",
                &self.user_tx.borrow().as_ref().map(|user| user.email.clone()),
            )
            .field("loading", &self.is_loading())
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl SessionStore {
    /// Creates a session store on top of `client`.
    ///
    /// The store starts out loading; it reports
    /// [`SessionStatus::Initializing`] until
    /// [`verify_session`](Self::verify_session) resolves for the first
    /// time.
    #[must_use]
    pub fn new(client: Luxora) -> Self {
        let (user_tx, _) = watch::channel(None);

        Self {
            client,
            user_tx,
            loading: AtomicBool::new(true),
            providers: HashMap::new(),
        }
    }

    /// Registers the identity flow backing the provider sign-in operations
    /// ([`login_with_google`](Self::login_with_google) and friends).
    ///
    /// At most one flow per provider; registering a second one replaces the
    /// first.
    #[must_use]
    pub fn with_identity_provider(
        mut self,
        provider: AuthProvider,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        self.providers.insert(provider, identity);
        self
    }

    /// Looks up the identity flow registered for `provider`.
    pub(crate) fn identity_provider(
        &self,
        provider: AuthProvider,
    ) -> Option<Arc<dyn IdentityProvider>> {
        self.providers.get(&provider).cloned()
    }

    /// Retrieves a snapshot of the signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.user_tx.borrow().clone()
    }

    /// Subscribes to user changes.
    ///
    /// The channel publishes on login, logout, and whenever the user object
    /// is replaced, profile patches included; replacing a user with an
    /// equal-looking one still counts as a change. A failed silent
    /// verification of an already signed-out store publishes nothing. The
    /// receiver starts with the current value already marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user_tx.subscribe()
    }

    /// `true` until the initial silent verification resolves.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Derives the current lifecycle state from the loading flag and the
    /// published user.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_loading() {
            SessionStatus::Initializing
        } else if self.user_tx.borrow().is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        }
    }

    /// Applies a partial profile update to the signed-in user and publishes
    /// the patched record. Does nothing when signed out.
    pub fn update_user(&self, patch: UserPatch) {
        let Some(mut user) = self.user() else {
            return;
        };

        user.merge(patch);
        self.set_user(Some(user));
    }

    /// Publishes a new value for the signed-in user.
    ///
    /// Replacing one user object with another always notifies subscribers,
    /// even when the contents look equal; the favorites store relies on
    /// that to refetch. The one suppressed case is `None` over `None`, so
    /// repeated failed verifications of a signed-out store stay silent.
    pub(crate) fn set_user(&self, user: Option<User>) {
        if user.is_none() && self.user_tx.borrow().is_none() {
            return;
        }

        tracing::debug!(
            user = user.as_ref().map(|user| user.email.as_str()),
            "session user updated"
        );

        self.user_tx.send_replace(user);
    }

    /// Marks the initial silent verification as resolved. One-way: the
    /// store never goes back to loading.
    pub(crate) fn finish_loading(&self) {
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Persists `token` into the scope `remember` selects, leaving the
    /// other scope untouched.
    pub(crate) fn persist_token(&self, token: &str, remember: bool) {
        let scope = if remember {
            TokenScope::Remembered
        } else {
            TokenScope::Session
        };

        self.client.token_store.persist(scope, token);
    }

    /// Shared tail of every successful authentication exchange.
    ///
    /// A blocked account never becomes the session user: both token scopes
    /// are dropped, the published user is cleared and
    /// [`AuthError::AccountBlocked`] is returned. Otherwise the token is
    /// persisted first, then the user is published.
    pub(crate) fn complete_auth(
        &self,
        payload: AuthPayload,
        remember: bool,
    ) -> Result<User, AuthError> {
        if payload.user.is_blocked {
            tracing::warn!(
                user = payload.user.email.as_str(),
                "blocked account detected, dropping local credentials"
            );
            self.client.token_store.clear_all();
            self.set_user(None);

            return Err(AuthError::AccountBlocked);
        }

        self.persist_token(&payload.token, remember);
        self.set_user(Some(payload.user.clone()));

        Ok(payload.user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::token::TokenStore;

    fn test_store() -> SessionStore {
        SessionStore::new(Luxora::new("http://127.0.0.1:8090"))
    }

    fn user(email: &str) -> User {
        User {
            email: email.to_string(),
            ..User::default()
        }
    }

    #[test]
    fn store_starts_initializing() {
        let store = test_store();

        assert!(store.is_loading());
        assert_eq!(store.status(), SessionStatus::Initializing);
        assert!(store.user().is_none());
    }

    #[test]
    fn status_follows_the_published_user() {
        let store = test_store();
        store.loading.store(false, Ordering::SeqCst);

        assert_eq!(store.status(), SessionStatus::Unauthenticated);

        store.set_user(Some(user("ada@luxora.app")));
        assert_eq!(store.status(), SessionStatus::Authenticated);

        store.set_user(None);
        assert_eq!(store.status(), SessionStatus::Unauthenticated);
    }

    #[test]
    fn clearing_a_signed_out_store_stays_silent() {
        let store = test_store();
        let mut subscription = store.subscribe();

        store.set_user(None);

        assert!(!subscription.has_changed().unwrap());
    }

    #[test]
    fn replacing_a_user_with_equal_contents_still_notifies() {
        let store = test_store();
        let mut subscription = store.subscribe();

        store.set_user(Some(user("ada@luxora.app")));
        subscription.borrow_and_update();

        store.set_user(Some(user("ada@luxora.app")));

        assert!(subscription.has_changed().unwrap());
    }

    #[test]
    fn update_user_patches_and_republishes() {
        let store = test_store();
        store.set_user(Some(user("ada@luxora.app")));
        let mut subscription = store.subscribe();

        store.update_user(UserPatch {
            full_name: Some("Ada Lovelace".to_string()),
            ..UserPatch::default()
        });

        assert!(subscription.has_changed().unwrap());

        let updated = store.user().unwrap();
        assert_eq!(updated.email, "ada@luxora.app");
        assert_eq!(updated.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn update_user_without_a_session_is_a_no_op() {
        let store = test_store();
        let mut subscription = store.subscribe();

        store.update_user(UserPatch {
            full_name: Some("Nobody".to_string()),
            ..UserPatch::default()
        });

        assert!(store.user().is_none());
        assert!(!subscription.has_changed().unwrap());
    }

    #[test]
    fn complete_auth_refuses_blocked_accounts() {
        let store = test_store();
        store
            .client
            .token_store
            .persist(TokenScope::Remembered, "old-token");

        let payload = AuthPayload {
            token: "fresh-token".to_string(),
            user: User {
                is_blocked: true,
                ..user("blocked@luxora.app")
            },
        };

        let result = store.complete_auth(payload, true);

        assert!(matches!(result, Err(AuthError::AccountBlocked)));
        assert!(store.client.token_store.read().is_none());
        assert!(store.user().is_none());
    }

    #[test]
    fn complete_auth_persists_into_the_scope_remember_selects() {
        let store = test_store();

        let payload = AuthPayload {
            token: "session-token".to_string(),
            user: user("ada@luxora.app"),
        };
        store.complete_auth(payload, false).unwrap();

        assert_eq!(
            store
                .client
                .token_store
                .read_scope(TokenScope::Session)
                .as_deref(),
            Some("session-token")
        );
        assert!(store
            .client
            .token_store
            .read_scope(TokenScope::Remembered)
            .is_none());
    }
}
