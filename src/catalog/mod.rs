//! Catalog reads: product lists, single listings, geo and image search.

use crate::error::{server_error, RequestError};
use crate::types::Product;
use crate::{Form, Luxora};

mod geo;
mod products;

pub use geo::GeoSearchBuilder;
pub use products::ProductListBuilder;

impl Luxora {
    /// Returns a handle to the catalog read operations.
    ///
    /// Catalog reads are stateless: they require no signed-in session, but
    /// ride with the bearer token when one is stored (the server may
    /// personalize results).
    ///
    /// # Example
    /// ```rust,ignore
    /// let page = client
    ///     .catalog()
    ///     .products()
    ///     .category("watches")
    ///     .sort("-price")
    ///     .call()
    ///     .await?;
    /// ```
    #[must_use]
    pub const fn catalog(&self) -> Catalog<'_> {
        Catalog { client: self }
    }
}

/// Entry point of the catalog read operations.
///
/// Borrow one through [`Luxora::catalog`].
pub struct Catalog<'a> {
    pub(crate) client: &'a Luxora,
}

impl Catalog<'_> {
    /// Fetch a single listing by id.
    ///
    /// # Example
    /// ```rust,ignore
    /// let product = client.catalog().product("PRODUCT_ID").await?;
    ///
    /// println!("{}", product.title);
    /// ```
    pub async fn product(&self, id: &str) -> Result<Product, RequestError> {
        if id.is_empty() {
            return Err(RequestError::Invalid(
                "The listing id cannot be empty.".to_string(),
            ));
        }

        let url = format!("{}/api/products/{id}", self.client.base_url);
        let response = self.client.get(&url, None).await?;

        if !response.status().is_success() {
            return Err(server_error(response, "Could not load the listing.").await);
        }

        response
            .json::<Product>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))
    }

    /// Finds listings visually similar to an uploaded image.
    ///
    /// The image rides a multipart form; [`Form`] and
    /// [`Part`](crate::Part) are re-exported so callers don't need a direct
    /// `reqwest` dependency.
    ///
    /// # Example
    /// ```rust,ignore
    /// use luxora_rs::{Form, Part};
    ///
    /// let form = Form::new().part(
    ///     "image",
    ///     Part::bytes(photo_bytes)
    ///         .file_name("watch.jpg")
    ///         .mime_str("image/jpeg")?,
    /// );
    ///
    /// let matches = client.catalog().search_by_image(form).await?;
    /// ```
    pub async fn search_by_image(&self, form: Form) -> Result<Vec<Product>, RequestError> {
        let url = format!("{}/api/search/image", self.client.base_url);
        let response = self.client.post_multipart(&url, form).await?;

        if !response.status().is_success() {
            return Err(server_error(response, "The image search failed. Please try again.").await);
        }

        response
            .json::<Vec<Product>>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))
    }
}
