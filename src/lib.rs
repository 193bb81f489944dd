//! `luxora-rs` is a Rust client for the Luxora luxury-asset marketplace REST API.
//!
//! The crate is built around three pieces: a cheap-to-clone [`Luxora`] HTTP
//! client that injects the bearer token and watches for `401` answers, a
//! [`SessionStore`] holding the signed-in user and every authentication
//! operation, and a [`FavoritesStore`] that follows the session and keeps the
//! user's favorited listings in sync.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::error::Error;
//! use std::sync::Arc;
//!
//! use luxora_rs::{FavoritesStore, Luxora, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let client = Luxora::new("https://api.luxora.app");
//!     let session = Arc::new(SessionStore::new(client.clone()));
//!     let favorites = FavoritesStore::new(client.clone(), Arc::clone(&session));
//!
//!     // Silent sign-in from a previously persisted token, if any.
//!     session.verify_session().await?;
//!
//!     let user = session.login("YOUR_EMAIL", "YOUR_PASSWORD", true).await?;
//!     println!("Signed in as {}", user.email);
//!
//!     // Picks up the login and fetches the favorites list.
//!     favorites.sync().await;
//!     println!("{} favorite listings", favorites.count());
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(dead_code)]

use std::sync::Arc;

pub use catalog::{Catalog, GeoSearchBuilder, ProductListBuilder};
pub use error::*;
pub use favorites::FavoritesStore;
pub use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
pub use session::provider::{AuthProvider, IdentityProvider, ProviderIdentity};
pub use session::{SessionStatus, SessionStore};
pub use token::{FileTokenStore, MemoryTokenStore, TokenScope, TokenStore};
pub use types::{
    AdminData, AdminStats, GeoPoint, Product, ProductPage, SignupForm, SubscriptionDetails,
    SubscriptionStatus, SubscriptionUpdate, User, UserPatch,
};

pub mod error;

pub(crate) mod catalog;
pub(crate) mod favorites;
pub(crate) mod session;
pub(crate) mod token;
pub(crate) mod types;

/// A Luxora client for sending requests to the Luxora REST API.
///
/// The client owns the base URL, a shared [`TokenStore`] and the underlying
/// `reqwest` client. Cloning is cheap and every clone shares the same token
/// store, so a token persisted through one clone is immediately visible to
/// the others. This is what lets the [`SessionStore`] and the
/// [`FavoritesStore`] each hold their own copy.
///
/// Every request sent through this client carries the stored bearer token
/// (when one exists) and runs through a `401` interceptor: an
/// `Unauthorized` answer drops the session-scoped token so the dead
/// credential is never replayed. See [`SessionStore`] for what happens to
/// the signed-in user in that case (nothing, until the next verification).
///
/// The `Debug` implementation for this struct redacts the stored token
/// to prevent accidental exposure in logs.
///
/// # Example
/// ```rust,ignore
/// use std::error::Error;
///
/// use luxora_rs::Luxora;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn Error>> {
///     let client = Luxora::new("https://api.luxora.app");
///
///     let page = client.catalog().products().category("watches").call().await?;
///
///     println!("{} listings", page.total_items);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Luxora {
    pub(crate) base_url: String,
    pub(crate) token_store: Arc<dyn TokenStore>,
    pub(crate) reqwest_client: reqwest::Client,
}

impl std::fmt::Debug for Luxora {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Luxora")
            .field("base_url", &self.base_url)
            .field(
                "token_store",
                &self.token_store.read().map(|_| "***REDACTED***"),
            )
            .field("reqwest_client", &"Client")
            .finish()
    }
}

impl Luxora {
    /// Creates a new instance of the Luxora client.
    ///
    /// Tokens are kept in a process-local [`MemoryTokenStore`]; use
    /// [`Luxora::with_token_store`] to persist the *remembered* scope across
    /// restarts.
    ///
    /// # Example
    /// ```rust,ignore
    /// let client = Luxora::new("https://api.luxora.app");
    /// // Use the client for authentication or catalog reads
    /// ```
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not a valid URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        // Validate URL format
        let trimmed_url = base_url.trim_end_matches('/');
        assert!(
            trimmed_url.starts_with("http://") || trimmed_url.starts_with("https://"),
            "Invalid base_url: must start with http:// or https://"
        );

        // Create client with sensible defaults
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: trimmed_url.to_string(),
            token_store: Arc::new(MemoryTokenStore::new()),
            reqwest_client: client,
        }
    }

    /// Creates a new Luxora client with a custom reqwest client.
    ///
    /// # Example
    /// ```rust,ignore
    /// use std::time::Duration;
    ///
    /// let reqwest_client = reqwest::Client::builder()
    ///     .timeout(Duration::from_secs(60))
    ///     .build()
    ///     .expect("Failed to build client");
    ///
    /// let client = Luxora::new_with_client("https://api.luxora.app", reqwest_client);
    /// ```
    ///
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not a valid URL.
    #[must_use]
    pub fn new_with_client(base_url: &str, client: reqwest::Client) -> Self {
        // Validate URL format
        let trimmed_url = base_url.trim_end_matches('/');
        assert!(
            trimmed_url.starts_with("http://") || trimmed_url.starts_with("https://"),
            "Invalid base_url: must start with http:// or https://"
        );

        Self {
            base_url: trimmed_url.to_string(),
            token_store: Arc::new(MemoryTokenStore::new()),
            reqwest_client: client,
        }
    }

    /// Replaces the token store backing this client.
    ///
    /// Call this right after construction, before handing clones out: clones
    /// made *before* the swap keep the previous store.
    ///
    /// # Example
    /// ```rust,ignore
    /// use std::sync::Arc;
    ///
    /// use luxora_rs::{FileTokenStore, Luxora};
    ///
    /// let client = Luxora::new("https://api.luxora.app")
    ///     .with_token_store(Arc::new(FileTokenStore::new("/var/lib/app/token")));
    /// ```
    #[must_use]
    pub fn with_token_store(mut self, token_store: Arc<dyn TokenStore>) -> Self {
        self.token_store = token_store;
        self
    }

    /// Retrieves the token requests are currently sent with, if any.
    ///
    /// The session-scoped token wins over the remembered one, matching what
    /// [`TokenStore::read`] documents.
    ///
    /// # Example
    /// ```rust,ignore
    /// let client = Luxora::new("https://api.luxora.app");
    ///
    /// // ...
    ///
    /// if let Some(token) = client.token() {
    ///     println!("Authenticated with token: {token}");
    /// } else {
    ///     println!("Not authenticated");
    /// }
    /// ```
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token_store.read()
    }

    /// Returns a handle to the token store shared by every clone of this
    /// client.
    #[must_use]
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.token_store)
    }

    /// Returns the base URL of the Luxora API this client talks to.
    ///
    /// # Example
    /// ```rust,ignore
    /// let client = Luxora::new("https://api.luxora.app");
    /// assert_eq!(client.base_url(), "https://api.luxora.app".to_string());
    /// ```
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }
}

impl Luxora {
    /// Adds an authorization token to the request, if available.
    ///
    /// This method attaches a bearer authentication token to the provided
    /// `RequestBuilder` if the token store currently holds one (session
    /// scope first, remembered scope otherwise). If no token is available,
    /// the request is returned unchanged.
    ///
    /// # Arguments
    /// * `request_builder` - A `reqwest::RequestBuilder` to which the token will be added.
    ///
    /// # Returns
    /// A `reqwest::RequestBuilder` with the authorization token, if applicable.
    pub(crate) fn with_authorization_token(
        &self,
        request_builder: RequestBuilder,
    ) -> RequestBuilder {
        if let Some(token) = self.token_store.read() {
            request_builder.bearer_auth(token)
        } else {
            request_builder
        }
    }

    /// Runs a received response through the `401` interceptor.
    ///
    /// An `Unauthorized` answer means the token this request carried is no
    /// longer honored, so the session-scoped token is dropped. The
    /// remembered-scope token and the signed-in user are deliberately left
    /// alone: remembered credentials are only discarded by an explicit
    /// logout or a blocked-account detection.
    fn intercept(&self, response: Response) -> Response {
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                url = %response.url(),
                "the API answered 401, dropping the session-scoped token"
            );
            self.token_store.clear(TokenScope::Session);
        }

        response
    }

    /// Sends a GET request to the specified endpoint.
    ///
    /// This method sends a `GET` request to the given endpoint with an
    /// `Accept` header for JSON responses, attaches query parameters if
    /// provided, and adds an authorization token if available.
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint to send the `GET` request to.
    /// * `params` - An optional vector of key-value pairs to include as query parameters.
    ///
    /// # Returns
    /// The response, already run through the `401` interceptor.
    pub(crate) async fn get(
        &self,
        endpoint: &str,
        params: Option<Vec<(&str, &str)>>,
    ) -> Result<Response, reqwest::Error> {
        let mut request_builder = self
            .reqwest_client
            .get(endpoint)
            .header("Accept", "application/json");

        if let Some(params) = params {
            request_builder = request_builder.query(&params);
        }

        let response = self.with_authorization_token(request_builder).send().await?;

        Ok(self.intercept(response))
    }

    /// Sends a POST request with a JSON body to the specified endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint to send the `POST` request to.
    /// * `params` - A reference to a serializable type to use as the JSON body of the request.
    ///
    /// # Returns
    /// The response, already run through the `401` interceptor.
    pub(crate) async fn post_json<T: Serialize + Clone + Send>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response, reqwest::Error> {
        let request_builder = self.reqwest_client.post(endpoint).json(&params);
        let response = self.with_authorization_token(request_builder).send().await?;

        Ok(self.intercept(response))
    }

    /// Sends a PUT request with a JSON body to the specified endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint to send the `PUT` request to.
    /// * `params` - A reference to a serializable type to use as the JSON body of the request.
    ///
    /// # Returns
    /// The response, already run through the `401` interceptor.
    pub(crate) async fn put_json<T: Serialize + Clone + Send>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response, reqwest::Error> {
        let request_builder = self.reqwest_client.put(endpoint).json(&params);
        let response = self.with_authorization_token(request_builder).send().await?;

        Ok(self.intercept(response))
    }

    /// Sends a POST request with a multipart form body to the specified
    /// endpoint, adding an authorization token if available.
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint to send the `POST` request to.
    /// * `form` - A `reqwest::multipart::Form` representing the form data for the request.
    ///
    /// # Returns
    /// The response, already run through the `401` interceptor.
    pub(crate) async fn post_multipart(
        &self,
        endpoint: &str,
        form: Form,
    ) -> Result<Response, reqwest::Error> {
        let request_builder = self.reqwest_client.post(endpoint).multipart(form);
        let response = self.with_authorization_token(request_builder).send().await?;

        Ok(self.intercept(response))
    }

    /// Sends a DELETE request to the specified endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint to send the `DELETE` request to.
    /// * `params` - An optional vector of key-value pairs to include as query parameters.
    ///
    /// # Returns
    /// The response, already run through the `401` interceptor.
    pub(crate) async fn delete(
        &self,
        endpoint: &str,
        params: Option<Vec<(&str, &str)>>,
    ) -> Result<Response, reqwest::Error> {
        let mut request_builder = self.reqwest_client.delete(endpoint);

        if let Some(params) = params {
            request_builder = request_builder.query(&params);
        }

        let response = self.with_authorization_token(request_builder).send().await?;

        Ok(self.intercept(response))
    }

    /// Sends a DELETE request with a JSON body to the specified endpoint.
    ///
    /// The favorites endpoints identify the account through a body payload
    /// rather than the URL, hence a `DELETE` carrying JSON.
    ///
    /// # Returns
    /// The response, already run through the `401` interceptor.
    pub(crate) async fn delete_json<T: Serialize + Clone + Send>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response, reqwest::Error> {
        let request_builder = self.reqwest_client.delete(endpoint).json(&params);
        let response = self.with_authorization_token(request_builder).send().await?;

        Ok(self.intercept(response))
    }
}
