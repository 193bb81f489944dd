use crate::catalog::Catalog;
use crate::error::{server_error, RequestError};
use crate::types::ProductPage;
use crate::Luxora;

/// Builds a paginated, filtered catalog query. Created by
/// [`Catalog::products`].
pub struct ProductListBuilder<'a> {
    client: &'a Luxora,
    page: Option<String>,
    per_page: Option<String>,
    category: Option<&'a str>,
    sort: Option<&'a str>,
    query: Option<&'a str>,
    min_price: Option<String>,
    max_price: Option<String>,
}

impl<'a> Catalog<'a> {
    /// Fetch a paginated listings page.
    ///
    /// # Example
    /// ```rust,ignore
    /// let page = client
    ///     .catalog()
    ///     .products()
    ///     .category("classic-cars")
    ///     .min_price(50_000.0)
    ///     .sort("-price")
    ///     .per_page(50)
    ///     .call()
    ///     .await?;
    ///
    /// for product in page.items {
    ///     println!("{} - {:?}", product.title, product.price);
    /// }
    /// ```
    #[must_use]
    pub const fn products(&self) -> ProductListBuilder<'a> {
        ProductListBuilder {
            client: self.client,
            page: None,
            per_page: None,
            category: None,
            sort: None,
            query: None,
            min_price: None,
            max_price: None,
        }
    }
}

impl<'a> ProductListBuilder<'a> {
    /// The page (aka. offset) of the paginated list *(defaults to 1)*.
    #[must_use]
    pub fn page(mut self, page: u16) -> Self {
        self.page = Some(page.to_string());
        self
    }

    /// Set the max returned listings per page *(defaults to 30)*.
    #[must_use]
    pub fn per_page(mut self, per_page: u16) -> Self {
        self.per_page = Some(per_page.to_string());
        self
    }

    /// Only return listings of the given category slug.
    ///
    /// # Example
    /// ```rust,ignore
    /// .category("watches")
    /// ```
    #[must_use]
    pub const fn category(mut self, category: &'a str) -> Self {
        self.category = Some(category);
        self
    }

    /// Specify the listings order attribute.
    /// Add `-`/`+` (default) in front of the attribute for DESC / ASC order.
    ///
    /// # Example
    /// ```rust,ignore
    /// .sort("-price")
    /// ```
    #[must_use]
    pub const fn sort(mut self, sort: &'a str) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Full-text search over listing titles and descriptions.
    #[must_use]
    pub const fn query(mut self, query: &'a str) -> Self {
        self.query = Some(query);
        self
    }

    /// Only return listings at or above this price.
    #[must_use]
    pub fn min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price.to_string());
        self
    }

    /// Only return listings at or below this price.
    #[must_use]
    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price.to_string());
        self
    }

    /// Execute the request and return the paginated results.
    pub async fn call(self) -> Result<ProductPage, RequestError> {
        let url = format!("{}/api/products", self.client.base_url);

        let mut query_parameters: Vec<(&str, &str)> = vec![];

        if let Some(page) = self.page.as_deref() {
            query_parameters.push(("page", page));
        }

        if let Some(per_page) = self.per_page.as_deref() {
            query_parameters.push(("perPage", per_page));
        }

        if let Some(category) = self.category {
            query_parameters.push(("category", category));
        }

        if let Some(sort) = self.sort {
            query_parameters.push(("sort", sort));
        }

        if let Some(query) = self.query {
            query_parameters.push(("q", query));
        }

        if let Some(min_price) = self.min_price.as_deref() {
            query_parameters.push(("minPrice", min_price));
        }

        if let Some(max_price) = self.max_price.as_deref() {
            query_parameters.push(("maxPrice", max_price));
        }

        let response = self.client.get(&url, Some(query_parameters)).await?;

        if !response.status().is_success() {
            return Err(server_error(response, "Could not load the listings.").await);
        }

        response
            .json::<ProductPage>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))
    }
}
