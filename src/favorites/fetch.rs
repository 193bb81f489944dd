use serde::{Deserialize, Serialize};

use crate::error::response_message;
use crate::favorites::{FavoritesError, FavoritesStore};
use crate::types::Product;

#[derive(Clone, Serialize)]
struct FetchRequest<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct FetchAnswer {
    #[serde(default)]
    favorites: Vec<Product>,
}

impl FavoritesStore {
    /// Fetches the signed-in user's favorites, replacing the local list
    /// wholesale.
    ///
    /// Requires a signed-in session: without one, no request is sent and
    /// [`FavoritesError::LoginRequired`] is recorded. On a failed request
    /// the previous list is preserved and the failure is recorded; on
    /// success the error field is cleared.
    ///
    /// # Example
    /// ```rust,ignore
    /// favorites.fetch().await;
    ///
    /// if let Some(error) = favorites.error() {
    ///     eprintln!("{error}");
    /// }
    /// ```
    pub async fn fetch(&self) {
        let Some(user) = self.session.user() else {
            self.record_error(Some(FavoritesError::LoginRequired));
            return;
        };

        let url = format!("{}/api/favorites", self.client.base_url);
        let request = FetchRequest { email: &user.email };

        let response = match self.client.post_json(&url, &request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(%error, "favorites fetch could not reach the API");
                self.record_error(Some(FavoritesError::Request(
                    "Could not load your favorites. Please try again.".to_string(),
                )));
                return;
            }
        };

        if !response.status().is_success() {
            let message = response_message(response)
                .await
                .unwrap_or_else(|| "Could not load your favorites. Please try again.".to_string());
            self.record_error(Some(FavoritesError::Request(message)));
            return;
        }

        match response.json::<FetchAnswer>().await {
            Ok(answer) => {
                self.replace(answer.favorites);
                self.record_error(None);
            }
            Err(error) => {
                tracing::debug!(%error, "favorites answer could not be parsed");
                self.record_error(Some(FavoritesError::Request(
                    "Could not load your favorites. Please try again.".to_string(),
                )));
            }
        }
    }
}
