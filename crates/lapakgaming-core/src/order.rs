//! Order drafts and outbound parameter maps.
//!
//! An [`OrderDraft`] accumulates everything the caller knows about an order.
//! Setters consume the draft and return it, so a draft is never shared
//! between two builders. Parameters are produced fresh for every call.

use serde_json::{Map, Number, Value};

use crate::error::{LapakError, Result};

/// Outbound parameters of a single API call.
pub type Params = Map<String, Value>;

/// Lower-case a country code. Codes are ISO 3166 alpha-2 such as `id`, `my`,
/// `ph`, `th`, `us`, `br` or `vn`.
#[must_use]
pub fn normalize_country_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Generate a random partner reference id suitable as an idempotency key.
#[must_use]
pub fn generate_partner_reference_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Insert a string parameter only when it is present and non-empty.
#[doc(hidden)]
pub fn insert_non_empty(params: &mut Params, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// Insert a lower-cased `country_code` parameter when one is given.
#[doc(hidden)]
pub fn insert_country_code(params: &mut Params, country_code: Option<&str>) {
    let normalized = country_code.map(normalize_country_code);
    insert_non_empty(params, "country_code", normalized.as_deref());
}

/// Accumulated state of an order or status query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    user_id: Option<String>,
    additional_id: Option<String>,
    additional_information: Option<String>,
    order_detail: Option<String>,
    quantity: Option<u32>,
    product_code: Option<String>,
    group_product: Option<String>,
    country_code: Option<String>,
    price: Option<f64>,
    partner_reference_id: Option<String>,
    callback_url: Option<String>,
    transaction_id: Option<String>,
}

impl OrderDraft {
    /// Create an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the product code and the price expected for it.
    #[must_use]
    pub fn with_product(mut self, product_code: impl Into<String>, price: Option<f64>) -> Self {
        self.product_code = Some(product_code.into());
        self.price = price;
        self
    }

    /// Set the game user.
    ///
    /// `additional_id` is the zone or server id and `additional_information`
    /// the in-game username, both only for games that need them.
    #[must_use]
    pub fn with_user(
        mut self,
        user_id: impl Into<String>,
        additional_id: Option<String>,
        additional_information: Option<String>,
    ) -> Self {
        self.user_id = Some(user_id.into());
        self.additional_id = additional_id;
        self.additional_information = additional_information;
        self
    }

    /// Set free-text order details for login top-up categories
    /// (e.g. `"Password : 123 Nickname : nick Security code : 1234"`).
    #[must_use]
    pub fn with_order_detail(mut self, order_detail: impl Into<String>) -> Self {
        self.order_detail = Some(order_detail.into());
        self
    }

    /// Set the order quantity. Zero means the default of one.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the idempotency key of the order.
    #[must_use]
    pub fn with_partner_reference_id(mut self, id: impl Into<String>) -> Self {
        self.partner_reference_id = Some(id.into());
        self
    }

    /// Set a freshly generated idempotency key.
    #[must_use]
    pub fn with_generated_partner_reference_id(self) -> Self {
        self.with_partner_reference_id(generate_partner_reference_id())
    }

    /// Set the country code. It is stored lower-cased.
    #[must_use]
    pub fn with_country_code(mut self, country_code: &str) -> Self {
        self.country_code = Some(normalize_country_code(country_code));
        self
    }

    /// Set the transaction id used by status checks.
    #[must_use]
    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    /// Set the group product, and the country code only when one is given.
    #[must_use]
    pub fn with_group_product(
        mut self,
        group_product: impl Into<String>,
        country_code: Option<&str>,
    ) -> Self {
        self.group_product = Some(group_product.into());
        if let Some(code) = country_code {
            self.country_code = Some(normalize_country_code(code));
        }
        self
    }

    /// Override the callback URL for this order.
    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Game user id.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        non_empty(self.user_id.as_deref())
    }

    /// Product code.
    #[must_use]
    pub fn product_code(&self) -> Option<&str> {
        non_empty(self.product_code.as_deref())
    }

    /// Group product code.
    #[must_use]
    pub fn group_product(&self) -> Option<&str> {
        non_empty(self.group_product.as_deref())
    }

    /// Lower-cased country code.
    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        non_empty(self.country_code.as_deref())
    }

    /// Partner reference id.
    #[must_use]
    pub fn partner_reference_id(&self) -> Option<&str> {
        non_empty(self.partner_reference_id.as_deref())
    }

    /// Transaction id.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        non_empty(self.transaction_id.as_deref())
    }

    /// Effective quantity, at least one.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }

    /// Expected price, if one was set and is non-zero.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn price(&self) -> Option<f64> {
        self.price.filter(|p| *p != 0.0 && p.is_finite())
    }

    /// Build the body of a create-order request.
    ///
    /// # Errors
    ///
    /// Returns [`LapakError::Validation`] when the user id is missing or when
    /// neither a product code nor a group product is set.
    pub fn create_order_params(&self) -> Result<Params> {
        let user_id = self
            .user_id()
            .ok_or_else(|| LapakError::validation("User ID is required for order creation."))?;

        if self.product_code().is_none() && self.group_product().is_none() {
            return Err(LapakError::validation(
                "Either product_code or group_product is required for order creation.",
            ));
        }

        let mut params = Params::new();
        params.insert("user_id".into(), Value::String(user_id.to_string()));
        params.insert("count_order".into(), Value::from(self.quantity()));
        insert_non_empty(&mut params, "product_code", self.product_code());
        insert_non_empty(&mut params, "group_product", self.group_product());
        insert_non_empty(&mut params, "additional_id", self.additional_id.as_deref());
        insert_non_empty(
            &mut params,
            "additional_information",
            self.additional_information.as_deref(),
        );
        insert_non_empty(&mut params, "orderdetail", self.order_detail.as_deref());
        insert_non_empty(&mut params, "country_code", self.country_code());
        if let Some(price) = self.price().and_then(price_value) {
            params.insert("price".into(), price);
        }
        insert_non_empty(
            &mut params,
            "partner_reference_id",
            self.partner_reference_id(),
        );
        insert_non_empty(
            &mut params,
            "override_callback_url",
            self.callback_url.as_deref(),
        );

        Ok(params)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Whole prices are sent as integers so they compare equal upstream.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn price_value(price: f64) -> Option<Value> {
    if price.fract() == 0.0 && price.abs() < i64::MAX as f64 {
        Some(Value::from(price as i64))
    } else {
        Number::from_f64(price).map(Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(params: &Params) -> Vec<&str> {
        let mut keys: Vec<&str> = params.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn missing_user_id_fails_validation() {
        let draft = OrderDraft::new().with_product("ML78_8-S2", None);
        let err = draft.create_order_params().unwrap_err();
        assert_eq!(
            err,
            LapakError::validation("User ID is required for order creation.")
        );

        let draft = OrderDraft::new()
            .with_user("", None, None)
            .with_product("ML78_8-S2", None);
        assert!(matches!(
            draft.create_order_params(),
            Err(LapakError::Validation(_))
        ));
    }

    #[test]
    fn missing_product_fails_validation() {
        let draft = OrderDraft::new().with_user("12345678", None, None);
        let err = draft.create_order_params().unwrap_err();
        assert_eq!(
            err,
            LapakError::validation(
                "Either product_code or group_product is required for order creation."
            )
        );
    }

    #[test]
    fn minimal_order_has_only_required_keys() {
        let params = OrderDraft::new()
            .with_user("12345678", None, None)
            .with_product("ML78_8-S2", None)
            .create_order_params()
            .unwrap();

        assert_eq!(
            Value::Object(params),
            json!({
                "user_id": "12345678",
                "count_order": 1,
                "product_code": "ML78_8-S2",
            })
        );
    }

    #[test]
    fn full_order_serializes_every_field() {
        let params = OrderDraft::new()
            .with_user("12345678", Some("2001".into()), Some("nick".into()))
            .with_product("ML78_8-S2", Some(15_000.0))
            .with_group_product("ML78_8", Some("MY"))
            .with_order_detail("Password : 123")
            .with_quantity(2)
            .with_partner_reference_id("R123")
            .with_callback_url("https://example.com/hook")
            .create_order_params()
            .unwrap();

        assert_eq!(
            Value::Object(params),
            json!({
                "user_id": "12345678",
                "count_order": 2,
                "product_code": "ML78_8-S2",
                "group_product": "ML78_8",
                "additional_id": "2001",
                "additional_information": "nick",
                "orderdetail": "Password : 123",
                "country_code": "my",
                "price": 15000,
                "partner_reference_id": "R123",
                "override_callback_url": "https://example.com/hook",
            })
        );
    }

    #[test]
    fn empty_optionals_are_omitted() {
        let params = OrderDraft::new()
            .with_user("12345678", Some(String::new()), None)
            .with_group_product("ML78_8", None)
            .with_order_detail("")
            .with_product("", Some(0.0))
            .with_quantity(0)
            .create_order_params()
            .unwrap();

        assert_eq!(keys(&params), vec!["count_order", "group_product", "user_id"]);
        assert_eq!(params["count_order"], json!(1));
    }

    #[test]
    fn country_code_is_lower_cased() {
        let draft = OrderDraft::new().with_country_code("ID");
        assert_eq!(draft.country_code(), Some("id"));
    }

    #[test]
    fn group_product_without_country_keeps_previous_country() {
        let draft = OrderDraft::new()
            .with_country_code("PH")
            .with_group_product("VAL1650", None);
        assert_eq!(draft.country_code(), Some("ph"));
        assert_eq!(draft.group_product(), Some("VAL1650"));

        let draft = draft.with_group_product("VAL1650", Some("TH"));
        assert_eq!(draft.country_code(), Some("th"));
    }

    #[test]
    fn fractional_price_is_kept() {
        let params = OrderDraft::new()
            .with_user("1", None, None)
            .with_product("P", Some(12.5))
            .create_order_params()
            .unwrap();
        assert_eq!(params["price"], json!(12.5));
    }

    #[test]
    fn generated_reference_ids_are_unique() {
        let a = OrderDraft::new().with_generated_partner_reference_id();
        let b = OrderDraft::new().with_generated_partner_reference_id();
        assert_eq!(a.partner_reference_id().map(str::len), Some(32));
        assert_ne!(a.partner_reference_id(), b.partner_reference_id());
    }

    #[test]
    fn insert_country_code_normalizes() {
        let mut params = Params::new();
        insert_country_code(&mut params, Some("VN"));
        insert_country_code(&mut Params::new(), None);
        assert_eq!(params["country_code"], json!("vn"));

        let mut params = Params::new();
        insert_country_code(&mut params, Some(""));
        assert!(params.is_empty());
    }

    #[test]
    fn insert_non_empty_skips_blank_values() {
        let mut params = Params::new();
        insert_non_empty(&mut params, "tid", Some("RA1"));
        insert_non_empty(&mut params, "partner_reference_id", Some(""));
        insert_non_empty(&mut params, "orderdetail", None);
        assert_eq!(keys(&params), vec!["tid"]);
    }
}
