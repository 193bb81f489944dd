use serde::Serialize;

use crate::error::{server_error, RequestError};
use crate::session::SessionStore;
use crate::types::{SubscriptionDetails, SubscriptionStatus, SubscriptionUpdate, UserPatch};

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionChange<'a> {
    email: &'a str,
    #[serde(flatten)]
    update: &'a SubscriptionUpdate,
}

#[derive(Clone, Serialize)]
struct EmailOnly<'a> {
    email: &'a str,
}

impl SessionStore {
    /// Switches the signed-in user to another subscription plan.
    ///
    /// On success the returned billing details are merged into the published
    /// user (which notifies subscribers), and returned for the caller.
    ///
    /// # Example
    /// ```rust,ignore
    /// use luxora_rs::SubscriptionUpdate;
    ///
    /// let details = session
    ///     .update_subscription(&SubscriptionUpdate {
    ///         plan: "collector".to_string(),
    ///         period: Some("yearly".to_string()),
    ///     })
    ///     .await?;
    /// ```
    pub async fn update_subscription(
        &self,
        update: &SubscriptionUpdate,
    ) -> Result<SubscriptionDetails, RequestError> {
        let Some(user) = self.user() else {
            return Err(RequestError::NotAuthenticated);
        };

        let url = format!("{}/api/subscription", self.client.base_url);
        let change = SubscriptionChange {
            email: &user.email,
            update,
        };

        let response = self.client.put_json(&url, &change).await?;

        if !response.status().is_success() {
            return Err(server_error(response, "Could not update the subscription.").await);
        }

        let details = response
            .json::<SubscriptionDetails>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))?;

        self.apply_subscription(&details);

        Ok(details)
    }

    /// Retrieves the signed-in user's current subscription status.
    pub async fn subscription_status(&self) -> Result<SubscriptionStatus, RequestError> {
        let Some(user) = self.user() else {
            return Err(RequestError::NotAuthenticated);
        };

        let url = format!("{}/api/subscription/status", self.client.base_url);
        let response = self
            .client
            .get(&url, Some(vec![("email", user.email.as_str())]))
            .await?;

        if !response.status().is_success() {
            return Err(server_error(response, "Could not retrieve the subscription status.").await);
        }

        response
            .json::<SubscriptionStatus>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))
    }

    /// Cancels the signed-in user's subscription.
    ///
    /// The server answers with the post-cancellation billing details (the
    /// paid period usually runs out before access ends); they are merged
    /// into the published user and returned.
    pub async fn cancel_subscription(&self) -> Result<SubscriptionDetails, RequestError> {
        let Some(user) = self.user() else {
            return Err(RequestError::NotAuthenticated);
        };

        let url = format!("{}/api/subscription/cancel", self.client.base_url);
        let body = EmailOnly { email: &user.email };

        let response = self.client.post_json(&url, &body).await?;

        if !response.status().is_success() {
            return Err(server_error(response, "Could not cancel the subscription.").await);
        }

        let details = response
            .json::<SubscriptionDetails>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))?;

        self.apply_subscription(&details);

        Ok(details)
    }

    /// Reflects a confirmed subscription change on the published user.
    fn apply_subscription(&self, details: &SubscriptionDetails) {
        self.update_user(UserPatch {
            subscription: details.plan.clone(),
            subscription_details: Some(details.clone()),
            ..UserPatch::default()
        });
    }
}
