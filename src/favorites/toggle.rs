use serde::{Deserialize, Serialize};

use crate::error::response_message;
use crate::favorites::{FavoritesError, FavoritesStore};
use crate::types::Product;

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest<'a> {
    email: &'a str,
    product_id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleAnswer {
    is_favorited: bool,
}

impl FavoritesStore {
    /// Toggles a listing in and out of the favorites.
    ///
    /// The server decides the direction and answers with the resulting
    /// membership; that acknowledgment is applied locally - an append
    /// (marked favorited) or a removal by id - without refetching the list.
    /// This is the apply-then-trust rule documented on the store.
    ///
    /// Requires a signed-in session and a listing with an id; either missing
    /// precondition records an error without sending a request.
    ///
    /// # Example
    /// ```rust,ignore
    /// favorites.toggle(&product).await;
    ///
    /// if favorites.is_favorite(&product.id) {
    ///     println!("saved");
    /// }
    /// ```
    pub async fn toggle(&self, product: &Product) {
        let Some(user) = self.session.user() else {
            self.record_error(Some(FavoritesError::LoginRequired));
            return;
        };

        if product.id.is_empty() {
            self.record_error(Some(FavoritesError::MissingProductId));
            return;
        }

        let url = format!("{}/api/favorites/toggle", self.client.base_url);
        let request = ToggleRequest {
            email: &user.email,
            product_id: &product.id,
        };

        let response = match self.client.post_json(&url, &request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(%error, "favorites toggle could not reach the API");
                self.record_error(Some(FavoritesError::Request(
                    "Could not update your favorites. Please try again.".to_string(),
                )));
                return;
            }
        };

        if !response.status().is_success() {
            let message = response_message(response).await.unwrap_or_else(|| {
                "Could not update your favorites. Please try again.".to_string()
            });
            self.record_error(Some(FavoritesError::Request(message)));
            return;
        }

        match response.json::<ToggleAnswer>().await {
            Ok(answer) if answer.is_favorited => {
                let mut entry = product.clone();
                entry.is_favorited = Some(true);
                self.append(entry);
                self.record_error(None);
            }
            Ok(_) => {
                self.remove(&product.id);
                self.record_error(None);
            }
            Err(error) => {
                tracing::debug!(%error, "favorites toggle answer could not be parsed");
                self.record_error(Some(FavoritesError::Request(
                    "Could not update your favorites. Please try again.".to_string(),
                )));
            }
        }
    }
}
