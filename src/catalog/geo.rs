use crate::catalog::Catalog;
use crate::error::{server_error, RequestError};
use crate::types::Product;
use crate::Luxora;

/// Builds a geographic proximity search. Created by [`Catalog::geo_search`].
pub struct GeoSearchBuilder<'a> {
    client: &'a Luxora,
    lat: String,
    lng: String,
    radius_km: Option<String>,
    category: Option<&'a str>,
    limit: Option<String>,
}

impl<'a> Catalog<'a> {
    /// Find listings around a WGS 84 coordinate.
    ///
    /// # Example
    /// ```rust,ignore
    /// let nearby = client
    ///     .catalog()
    ///     .geo_search(46.2044, 6.1432)
    ///     .radius_km(25.0)
    ///     .category("estates")
    ///     .call()
    ///     .await?;
    ///
    /// println!("{} estates around Geneva", nearby.len());
    /// ```
    #[must_use]
    pub fn geo_search(&self, lat: f64, lng: f64) -> GeoSearchBuilder<'a> {
        GeoSearchBuilder {
            client: self.client,
            lat: lat.to_string(),
            lng: lng.to_string(),
            radius_km: None,
            category: None,
            limit: None,
        }
    }
}

impl<'a> GeoSearchBuilder<'a> {
    /// Search radius in kilometers *(server default applies when unset)*.
    #[must_use]
    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km.to_string());
        self
    }

    /// Only return listings of the given category slug.
    #[must_use]
    pub const fn category(mut self, category: &'a str) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the max returned listings.
    #[must_use]
    pub fn limit(mut self, limit: u16) -> Self {
        self.limit = Some(limit.to_string());
        self
    }

    /// Execute the request and return the matching listings, closest first.
    pub async fn call(self) -> Result<Vec<Product>, RequestError> {
        let url = format!("{}/api/search/geo", self.client.base_url);

        let mut query_parameters: Vec<(&str, &str)> =
            vec![("lat", self.lat.as_str()), ("lng", self.lng.as_str())];

        if let Some(radius_km) = self.radius_km.as_deref() {
            query_parameters.push(("radiusKm", radius_km));
        }

        if let Some(category) = self.category {
            query_parameters.push(("category", category));
        }

        if let Some(limit) = self.limit.as_deref() {
            query_parameters.push(("limit", limit));
        }

        let response = self.client.get(&url, Some(query_parameters)).await?;

        if !response.status().is_success() {
            return Err(server_error(response, "The map search failed. Please try again.").await);
        }

        response
            .json::<Vec<Product>>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))
    }
}
