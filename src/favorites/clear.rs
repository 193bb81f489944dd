use serde::Serialize;

use crate::error::response_message;
use crate::favorites::{FavoritesError, FavoritesStore};

#[derive(Clone, Serialize)]
struct ClearRequest<'a> {
    email: &'a str,
}

impl FavoritesStore {
    /// Removes every favorite of the signed-in user, server-side first.
    ///
    /// The local list is only emptied once the server confirmed; a failed
    /// request records an error and leaves the list untouched. Requires a
    /// signed-in session, like every mutation on this store.
    ///
    /// # Example
    /// ```rust,ignore
    /// favorites.clear_all().await;
    /// assert_eq!(favorites.count(), 0);
    /// ```
    pub async fn clear_all(&self) {
        let Some(user) = self.session.user() else {
            self.record_error(Some(FavoritesError::LoginRequired));
            return;
        };

        let url = format!("{}/api/favorites", self.client.base_url);
        let request = ClearRequest { email: &user.email };

        let response = match self.client.delete_json(&url, &request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(%error, "favorites clear could not reach the API");
                self.record_error(Some(FavoritesError::Request(
                    "Could not clear your favorites. Please try again.".to_string(),
                )));
                return;
            }
        };

        if !response.status().is_success() {
            let message = response_message(response)
                .await
                .unwrap_or_else(|| "Could not clear your favorites. Please try again.".to_string());
            self.record_error(Some(FavoritesError::Request(message)));
            return;
        }

        self.replace(Vec::new());
        self.record_error(None);
    }
}
