use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Luxora account as returned by the authentication endpoints.
///
/// Only the fields the client reads are typed; everything else the server
/// sends rides along in [`User::extra`] untouched, so consumers can reach
/// API additions without waiting for an SDK release.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-side record id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Account email; doubles as the key most API operations are scoped by.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Server-flagged blocked state. A blocked account is never kept in
    /// session state; every operation that sees this flag de-authenticates.
    #[serde(default)]
    pub is_blocked: bool,
    /// Whether the account may call the admin endpoints.
    #[serde(default)]
    pub is_admin: bool,
    /// Prepaid valuation balance, if the account has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    /// Name of the active subscription plan, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    /// Billing details of the active subscription, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_details: Option<SubscriptionDetails>,
    /// Any additional fields the API returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Shallow-merges `patch` into this record.
    ///
    /// Only the fields the patch sets are replaced; everything else keeps
    /// its current value. Extra entries are inserted key by key.
    pub fn merge(&mut self, patch: UserPatch) {
        if let Some(full_name) = patch.full_name {
            self.full_name = Some(full_name);
        }
        if let Some(balance) = patch.balance {
            self.balance = Some(balance);
        }
        if let Some(subscription) = patch.subscription {
            self.subscription = Some(subscription);
        }
        if let Some(details) = patch.subscription_details {
            self.subscription_details = Some(details);
        }
        for (key, value) in patch.extra {
            self.extra.insert(key, value);
        }
    }
}

/// A partial [`User`] for optimistic local updates.
///
/// Used by [`SessionStore::update_user`](crate::SessionStore::update_user)
/// to reflect server-confirmed side effects (a balance deduction after a
/// valuation, for instance) without a round-trip.
#[derive(Clone, Debug, Default)]
pub struct UserPatch {
    /// Replaces [`User::full_name`] when set.
    pub full_name: Option<String>,
    /// Replaces [`User::balance`] when set.
    pub balance: Option<f64>,
    /// Replaces [`User::subscription`] when set.
    pub subscription: Option<String>,
    /// Replaces [`User::subscription_details`] when set.
    pub subscription_details: Option<SubscriptionDetails>,
    /// Entries merged into [`User::extra`].
    pub extra: Map<String, Value>,
}

/// Billing details of a subscription.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDetails {
    /// Plan identifier (for example `"collector"` or `"dealer"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Billing state as reported by the payment processor
    /// (`"active"`, `"canceled"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// End of the currently paid period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<DateTime<Utc>>,
    /// Any additional fields the API returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Point-in-time answer of the subscription status endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    /// Whether the subscription is currently active.
    #[serde(default)]
    pub active: bool,
    /// Active plan identifier, if any.
    #[serde(default)]
    pub plan: Option<String>,
    /// Next renewal date, if the subscription renews.
    #[serde(default)]
    pub renews_at: Option<DateTime<Utc>>,
}

/// Request body of a subscription change.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdate {
    /// Plan identifier to switch to.
    pub plan: String,
    /// Billing period (`"monthly"` or `"yearly"`), when the plan offers both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// Registration form for the email/password signup flow.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Country of residence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A marketplace listing.
///
/// Favorites and catalog operations only rely on [`Product::id`]; the other
/// fields are conveniences for rendering, and unknown fields ride along in
/// [`Product::extra`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-side record id.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Listing title.
    #[serde(default)]
    pub title: String,
    /// Category slug (for example `"watches"` or `"estates"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Asking price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// ISO 4217 currency code of [`Product::price`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Image URLs, primary first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Listing coordinates, when the asset is geo-searchable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Whether the current user has favorited this listing. Set locally by
    /// [`FavoritesStore::toggle`](crate::FavoritesStore::toggle) on append.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorited: Option<bool>,
    /// Any additional fields the API returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A WGS 84 coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// One page of catalog results.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// The page (aka. offset) of the paginated list *(defaults to 1)*.
    pub page: i32,
    /// The max returned listings per page *(defaults to 30)*.
    pub per_page: i32,
    /// The total amount of listings matching the query.
    pub total_items: i32,
    /// The total amount of pages matching the query.
    pub total_pages: i32,
    /// The listings of the current page.
    pub items: Vec<Product>,
}

/// Aggregated marketplace counters returned by the admin stats endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    /// Registered accounts.
    #[serde(default)]
    pub total_users: u64,
    /// Live listings.
    #[serde(default)]
    pub total_products: u64,
    /// Accounts with an active subscription.
    #[serde(default)]
    pub active_subscriptions: u64,
    /// Gross subscription revenue, when the caller may see it.
    #[serde(default)]
    pub revenue: Option<f64>,
    /// Any additional counters the API returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Combined result of the two parallel admin fetches.
#[derive(Clone, Debug)]
pub struct AdminData {
    /// Every registered account.
    pub users: Vec<User>,
    /// Aggregated counters.
    pub stats: AdminStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_deserializes_camel_case_and_keeps_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "email": "a@x.com",
            "fullName": "Ada",
            "isBlocked": false,
            "loyaltyTier": "gold"
        }))
        .expect("valid user json");

        assert_eq!(user.id.as_deref(), Some("u1"));
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.full_name.as_deref(), Some("Ada"));
        assert!(!user.is_blocked);
        assert_eq!(user.extra.get("loyaltyTier"), Some(&json!("gold")));
    }

    #[test]
    fn user_merge_is_shallow_and_partial() {
        let mut user: User = serde_json::from_value(json!({
            "email": "a@x.com",
            "fullName": "Ada",
            "balance": 100.0
        }))
        .expect("valid user json");

        user.merge(UserPatch {
            balance: Some(60.0),
            ..UserPatch::default()
        });

        assert_eq!(user.balance, Some(60.0));
        assert_eq!(user.full_name.as_deref(), Some("Ada"));
        assert_eq!(user.email, "a@x.com");
    }

    #[test]
    fn user_merge_inserts_extra_entries() {
        let mut user = User {
            email: "a@x.com".to_string(),
            ..User::default()
        };
        let mut extra = Map::new();
        extra.insert("loyaltyTier".to_string(), json!("platinum"));

        user.merge(UserPatch {
            extra,
            ..UserPatch::default()
        });

        assert_eq!(user.extra.get("loyaltyTier"), Some(&json!("platinum")));
    }

    #[test]
    fn product_uses_underscore_id_on_the_wire() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "title": "1966 GT Coupe",
            "price": 250000.0
        }))
        .expect("valid product json");

        assert_eq!(product.id, "p1");
        assert_eq!(product.price, Some(250_000.0));

        let wire = serde_json::to_value(&product).expect("serializable product");
        assert_eq!(wire.get("_id"), Some(&json!("p1")));
    }

    #[test]
    fn subscription_details_parse_rfc3339_period_end() {
        let details: SubscriptionDetails = serde_json::from_value(json!({
            "plan": "collector",
            "status": "active",
            "currentPeriodEnd": "2026-09-01T00:00:00Z"
        }))
        .expect("valid details json");

        assert_eq!(details.plan.as_deref(), Some("collector"));
        assert_eq!(
            details.current_period_end.map(|end| end.to_rfc3339()),
            Some("2026-09-01T00:00:00+00:00".to_string())
        );
    }
}
