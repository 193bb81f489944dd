//! Favorites state: the signed-in user's favorited listings.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tokio::sync::{watch, Mutex};

use crate::session::SessionStore;
use crate::types::{Product, User};
use crate::Luxora;

mod clear;
mod fetch;
mod toggle;

/// Represents errors of the favorites operations.
///
/// Unlike the session operations, favorites operations do not return these:
/// they record the latest one into the store's reactive
/// [`error`](FavoritesStore::error) field, which consumers read and
/// [`clear_error`](FavoritesStore::clear_error) after surfacing. Display
/// strings are ready to be shown to an end user.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FavoritesError {
    /// The operation requires a signed-in user and was short-circuited
    /// before any request was sent.
    #[error("Please log in to use favorites.")]
    LoginRequired,
    /// The given listing has no id, so it cannot be toggled. Short-circuited
    /// before any request is sent.
    #[error("This listing cannot be favorited.")]
    MissingProductId,
    /// The request failed; the message is the server's own wording when the
    /// error body carried one, and the operation's default otherwise.
    #[error("{0}")]
    Request(String),
}

/// Holds the signed-in user's favorited listings.
///
/// The store is built on top of a [`SessionStore`] it follows: every
/// operation is keyed by the session's user, and a user change (login,
/// logout, user switch) is the trigger to refetch the whole list. Nothing
/// happens by itself - drive the subscription either by awaiting
/// [`run`](Self::run) in a background task or by calling
/// [`sync`](Self::sync) at convenient points.
///
/// Mutations follow an apply-then-trust rule: a toggle applies the server's
/// acknowledgment locally and neither retries nor refetches, so a missed
/// acknowledgment can leave the local list behind server truth until the
/// next full fetch. That window is accepted; the list is favorites-sized
/// and every fetch replaces it wholesale.
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use luxora_rs::{FavoritesStore, Luxora, SessionStore};
///
/// let client = Luxora::new("https://api.luxora.app");
/// let session = Arc::new(SessionStore::new(client.clone()));
/// let favorites = FavoritesStore::new(client, Arc::clone(&session));
///
/// session.login("YOUR_EMAIL", "YOUR_PASSWORD", false).await?;
/// favorites.sync().await;
///
/// println!("{} favorite listings", favorites.count());
/// ```
pub struct FavoritesStore {
    pub(crate) client: Luxora,
    pub(crate) session: Arc<SessionStore>,
    user_changes: Mutex<watch::Receiver<Option<User>>>,
    favorites: RwLock<Vec<Product>>,
    error: RwLock<Option<FavoritesError>>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("count", &self.count())
            .field("error", &self.error())
            .finish()
    }
}

impl FavoritesStore {
    /// Creates a favorites store following `session`.
    ///
    /// The subscription to user changes starts here; changes published
    /// before construction are not replayed.
    #[must_use]
    pub fn new(client: Luxora, session: Arc<SessionStore>) -> Self {
        let user_changes = Mutex::new(session.subscribe());

        Self {
            client,
            session,
            user_changes,
            favorites: RwLock::new(Vec::new()),
            error: RwLock::new(None),
        }
    }

    /// Catches up with at most one pending session user change.
    ///
    /// When the session user changed since the last call (or since
    /// construction), the whole list is refetched once; several changes that
    /// piled up still cause a single fetch, keyed by the latest user. When
    /// nothing changed, nothing happens.
    pub async fn sync(&self) {
        let changed = {
            let mut user_changes = self.user_changes.lock().await;
            match user_changes.has_changed() {
                Ok(true) => {
                    user_changes.borrow_and_update();
                    true
                }
                // `Err` means the session store is gone; nothing to track.
                Ok(false) | Err(_) => false,
            }
        };

        if changed {
            self.fetch().await;
        }
    }

    /// Follows session user changes until the session store is dropped,
    /// refetching the list on every change.
    ///
    /// Meant to be spawned once:
    /// ```rust,ignore
    /// let favorites = Arc::new(FavoritesStore::new(client, session));
    ///
    /// tokio::spawn({
    ///     let favorites = Arc::clone(&favorites);
    ///     async move { favorites.run().await }
    /// });
    /// ```
    pub async fn run(&self) {
        loop {
            {
                let mut user_changes = self.user_changes.lock().await;
                if user_changes.changed().await.is_err() {
                    return;
                }
            }

            self.fetch().await;
        }
    }

    /// `true` iff some favorited listing's id equals `id`.
    ///
    /// A linear scan - the list is favorites-sized, not catalog-sized.
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|product| product.id == id)
    }

    /// Retrieves a snapshot of the favorited listings.
    #[must_use]
    pub fn favorites(&self) -> Vec<Product> {
        self.favorites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of favorited listings.
    #[must_use]
    pub fn count(&self) -> usize {
        self.favorites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Retrieves the latest recorded error, if any.
    ///
    /// Operations overwrite this on failure and clear it on success; a
    /// consumer that surfaced the error calls
    /// [`clear_error`](Self::clear_error).
    #[must_use]
    pub fn error(&self) -> Option<FavoritesError> {
        self.error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resets the error field. The list is left untouched.
    pub fn clear_error(&self) {
        self.record_error(None);
    }

    pub(crate) fn record_error(&self, error: Option<FavoritesError>) {
        if let Some(ref error) = error {
            tracing::debug!(%error, "favorites operation failed");
        }

        *self.error.write().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Replaces the whole list.
    pub(crate) fn replace(&self, favorites: Vec<Product>) {
        *self
            .favorites
            .write()
            .unwrap_or_else(PoisonError::into_inner) = favorites;
    }

    /// Appends `product` unless an entry with the same id is already
    /// present, so a re-acknowledged toggle cannot duplicate an entry.
    pub(crate) fn append(&self, product: Product) {
        let mut favorites = self
            .favorites
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if !favorites.iter().any(|existing| existing.id == product.id) {
            favorites.push(product);
        }
    }

    /// Removes the entry with the given id, if present.
    pub(crate) fn remove(&self, id: &str) {
        self.favorites
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|product| product.id != id);
    }
}
