use crate::error::{server_error, RequestError};
use crate::session::SessionStore;
use crate::types::{AdminData, AdminStats, User};

impl SessionStore {
    /// Fetches the admin dashboard data: the full account list and the
    /// aggregated marketplace counters.
    ///
    /// Both endpoints are called in parallel and joined; a failure of either
    /// fails the whole operation. Authorization is the server's call (the
    /// endpoints reject non-admin accounts), this method only requires a
    /// signed-in user.
    ///
    /// # Example
    /// ```rust,ignore
    /// let data = session.fetch_admin_data().await?;
    ///
    /// println!("{} accounts, {} listings", data.users.len(), data.stats.total_products);
    /// ```
    pub async fn fetch_admin_data(&self) -> Result<AdminData, RequestError> {
        let Some(user) = self.user() else {
            return Err(RequestError::NotAuthenticated);
        };

        let (users, stats) = tokio::try_join!(
            self.fetch_admin_users(&user.email),
            self.fetch_admin_stats(&user.email),
        )?;

        Ok(AdminData { users, stats })
    }

    async fn fetch_admin_users(&self, email: &str) -> Result<Vec<User>, RequestError> {
        let url = format!("{}/api/admin/users", self.client.base_url);
        let response = self.client.get(&url, Some(vec![("email", email)])).await?;

        if !response.status().is_success() {
            return Err(server_error(response, "Could not load the account list.").await);
        }

        response
            .json::<Vec<User>>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))
    }

    async fn fetch_admin_stats(&self, email: &str) -> Result<AdminStats, RequestError> {
        let url = format!("{}/api/admin/stats", self.client.base_url);
        let response = self.client.get(&url, Some(vec![("email", email)])).await?;

        if !response.status().is_success() {
            return Err(server_error(response, "Could not load the marketplace stats.").await);
        }

        response
            .json::<AdminStats>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))
    }

    /// Deletes an account by id, as an admin.
    ///
    /// # Example
    /// ```rust,ignore
    /// session.delete_user("USER_ID").await?;
    /// ```
    pub async fn delete_user(&self, id: &str) -> Result<(), RequestError> {
        let Some(user) = self.user() else {
            return Err(RequestError::NotAuthenticated);
        };

        if id.is_empty() {
            return Err(RequestError::Invalid(
                "The account id cannot be empty.".to_string(),
            ));
        }

        let url = format!("{}/api/admin/users/{id}", self.client.base_url);
        let response = self
            .client
            .delete(&url, Some(vec![("email", user.email.as_str())]))
            .await?;

        if !response.status().is_success() {
            return Err(server_error(response, "Could not delete the account.").await);
        }

        Ok(())
    }
}
