//! LapakGaming API client.

use std::sync::Arc;

use lapakgaming_core::order::{insert_country_code, insert_non_empty};
use lapakgaming_core::{LapakConfig, LapakError, Operation, OrderDraft, Params};
use serde_json::Value;

use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, Method};

/// LapakGaming API client and order builder.
///
/// Setters consume the client and return it, so a configured order can be
/// chained straight into an action:
///
/// ```no_run
/// # use lapakgaming_client::{LapakConfig, LapakGaming};
/// # async fn example(config: LapakConfig) -> Result<(), lapakgaming_client::LapakError> {
/// let order = LapakGaming::new(config)?
///     .with_user("12345678", Some("2001".into()), None)
///     .with_product("ML78_8-S2", None)
///     .with_partner_reference_id("R123")
///     .create_order()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// Cloning is cheap. Each clone owns its own [`OrderDraft`] and shares only
/// the immutable configuration and connection pool.
#[derive(Debug, Clone)]
pub struct LapakGaming {
    transport: HttpTransport,
    retry: RetryPolicy,
    draft: OrderDraft,
}

impl LapakGaming {
    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: LapakConfig) -> Result<Self, LapakError> {
        Self::with_shared_config(Arc::new(config))
    }

    /// Create a client that shares an existing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_shared_config(config: Arc<LapakConfig>) -> Result<Self, LapakError> {
        let retry = RetryPolicy::new(config.retry_attempts());
        let transport = HttpTransport::new(config)?;
        Ok(Self {
            transport,
            retry,
            draft: OrderDraft::default(),
        })
    }

    /// Create a client from `LAPAKGAMING_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`LapakError::Config`] if required variables are missing.
    pub fn from_env() -> Result<Self, LapakError> {
        Self::new(LapakConfig::from_env()?)
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &LapakConfig {
        self.transport.config()
    }

    /// The accumulated order draft.
    #[must_use]
    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// A client with the same configuration and an empty draft.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            retry: self.retry,
            draft: OrderDraft::default(),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the whole order draft.
    #[must_use]
    pub fn with_draft(mut self, draft: OrderDraft) -> Self {
        self.draft = draft;
        self
    }

    // ── Builder ──────────────────────────────────────────────────────────

    /// Set the product code and the price expected for it.
    #[must_use]
    pub fn with_product(mut self, product_code: impl Into<String>, price: Option<f64>) -> Self {
        self.draft = self.draft.with_product(product_code, price);
        self
    }

    /// Set the game user, with optional zone/server id and username.
    #[must_use]
    pub fn with_user(
        mut self,
        user_id: impl Into<String>,
        additional_id: Option<String>,
        additional_information: Option<String>,
    ) -> Self {
        self.draft = self
            .draft
            .with_user(user_id, additional_id, additional_information);
        self
    }

    /// Set order details for login top-up categories.
    #[must_use]
    pub fn with_order_detail(mut self, order_detail: impl Into<String>) -> Self {
        self.draft = self.draft.with_order_detail(order_detail);
        self
    }

    /// Set the order quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.draft = self.draft.with_quantity(quantity);
        self
    }

    /// Set the partner reference id (idempotency key).
    #[must_use]
    pub fn with_partner_reference_id(mut self, id: impl Into<String>) -> Self {
        self.draft = self.draft.with_partner_reference_id(id);
        self
    }

    /// Set a generated partner reference id.
    #[must_use]
    pub fn with_generated_partner_reference_id(mut self) -> Self {
        self.draft = self.draft.with_generated_partner_reference_id();
        self
    }

    /// Set the country code (stored lower-cased).
    #[must_use]
    pub fn with_country_code(mut self, country_code: &str) -> Self {
        self.draft = self.draft.with_country_code(country_code);
        self
    }

    /// Set the transaction id used by [`Self::check_order_status`].
    #[must_use]
    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.draft = self.draft.with_transaction_id(transaction_id);
        self
    }

    /// Set the group product, and the country code only when given.
    #[must_use]
    pub fn with_group_product(
        mut self,
        group_product: impl Into<String>,
        country_code: Option<&str>,
    ) -> Self {
        self.draft = self.draft.with_group_product(group_product, country_code);
        self
    }

    /// Override the callback URL for this order.
    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.draft = self.draft.with_callback_url(url);
        self
    }

    // ── Catalog ──────────────────────────────────────────────────────────

    /// Get all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn get_categories(&self) -> Result<Value, LapakError> {
        self.get(Operation::Categories, Params::new()).await
    }

    /// Get products of a category (e.g. `mobile-legends`, `VAL`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn get_products_by_category(
        &self,
        category_code: &str,
        country_code: Option<&str>,
    ) -> Result<Value, LapakError> {
        let mut params = Params::new();
        params.insert("category_code".into(), category_code.into());
        insert_country_code(&mut params, country_code);
        self.get(Operation::Products, params).await
    }

    /// Get products by product code (e.g. `VAL1650-S14`, `ML78_8-S2`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn get_products_by_code(
        &self,
        product_code: &str,
        country_code: Option<&str>,
    ) -> Result<Value, LapakError> {
        let mut params = Params::new();
        params.insert("product_code".into(), product_code.into());
        insert_country_code(&mut params, country_code);
        self.get(Operation::Products, params).await
    }

    /// Get products filtered by both category and product code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn get_products_by_category_and_code(
        &self,
        category_code: &str,
        product_code: &str,
        country_code: Option<&str>,
    ) -> Result<Value, LapakError> {
        let mut params = Params::new();
        params.insert("category_code".into(), category_code.into());
        params.insert("product_code".into(), product_code.into());
        insert_country_code(&mut params, country_code);
        self.get(Operation::Products, params).await
    }

    /// Get a product by code.
    ///
    /// # Errors
    ///
    /// See [`Self::get_products_by_code`].
    #[deprecated(note = "use get_products_by_code")]
    pub async fn get_product(
        &self,
        product_code: &str,
        country_code: Option<&str>,
    ) -> Result<Value, LapakError> {
        self.get_products_by_code(product_code, country_code).await
    }

    /// Get products of a category.
    ///
    /// # Errors
    ///
    /// See [`Self::get_products_by_category`].
    #[deprecated(note = "use get_products_by_category")]
    pub async fn get_products(&self, category_code: &str) -> Result<Value, LapakError> {
        self.get_products_by_category(category_code, None).await
    }

    /// Get the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn get_all_products(&self) -> Result<Value, LapakError> {
        self.get(Operation::AllProducts, Params::new()).await
    }

    /// Get the reseller balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn get_balance(&self) -> Result<Value, LapakError> {
        self.get(Operation::Balance, Params::new()).await
    }

    // ── Orders ───────────────────────────────────────────────────────────

    /// Create an order from the accumulated draft.
    ///
    /// The order is retried on transient failures only when a partner
    /// reference id is set, since the API deduplicates on it.
    ///
    /// # Errors
    ///
    /// Returns [`LapakError::Validation`] without sending anything when the
    /// user id is missing or neither a product code nor a group product is
    /// set. Otherwise returns request and API failures.
    pub async fn create_order(&self) -> Result<Value, LapakError> {
        let params = self.draft.create_order_params()?;
        let product_code = self.draft.product_code();

        let retry = if self.draft.partner_reference_id().is_some() {
            self.retry
        } else {
            RetryPolicy::none()
        };

        tracing::info!(
            user_id = ?self.draft.user_id(),
            product_code = ?product_code,
            group_product = ?self.draft.group_product(),
            partner_reference_id = ?self.draft.partner_reference_id(),
            "Creating LapakGaming order"
        );

        retry
            .run(|| {
                self.transport
                    .send(Operation::CreateOrder, Method::Post, &params, product_code)
            })
            .await
    }

    /// Check order status by transaction id (`tid`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn check_order_status_by_tid(&self, transaction_id: &str) -> Result<Value, LapakError> {
        self.check_order_status_by(Some(transaction_id), None).await
    }

    /// Check order status by partner reference id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn check_order_status_by_ref_id(
        &self,
        partner_reference_id: &str,
    ) -> Result<Value, LapakError> {
        self.check_order_status_by(None, Some(partner_reference_id))
            .await
    }

    /// Check order status by transaction id and partner reference id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn check_order_status_by_tid_and_ref_id(
        &self,
        transaction_id: &str,
        partner_reference_id: &str,
    ) -> Result<Value, LapakError> {
        self.check_order_status_by(Some(transaction_id), Some(partner_reference_id))
            .await
    }

    /// Check order status with whichever identifiers are known.
    ///
    /// # Errors
    ///
    /// Returns [`LapakError::Validation`] when neither identifier is given.
    pub async fn check_order_status_by(
        &self,
        transaction_id: Option<&str>,
        partner_reference_id: Option<&str>,
    ) -> Result<Value, LapakError> {
        let mut params = Params::new();
        insert_non_empty(&mut params, "tid", transaction_id);
        insert_non_empty(&mut params, "partner_reference_id", partner_reference_id);

        if params.is_empty() {
            return Err(LapakError::validation(
                "Either transaction ID (tid) or partner reference ID is required to check order status.",
            ));
        }

        self.get(Operation::CheckOrder, params).await
    }

    /// Check order status by partner reference id.
    ///
    /// # Errors
    ///
    /// See [`Self::check_order_status_by_ref_id`].
    #[deprecated(note = "use check_order_status_by_ref_id")]
    pub async fn check_order_status_by_reference_id(
        &self,
        partner_reference_id: &str,
    ) -> Result<Value, LapakError> {
        self.check_order_status_by_ref_id(partner_reference_id)
            .await
    }

    /// Check order status by transaction id and partner reference id.
    ///
    /// # Errors
    ///
    /// See [`Self::check_order_status_by_tid_and_ref_id`].
    #[deprecated(note = "use check_order_status_by_tid_and_ref_id")]
    pub async fn check_order_status_by_tid_and_reference_id(
        &self,
        transaction_id: &str,
        partner_reference_id: &str,
    ) -> Result<Value, LapakError> {
        self.check_order_status_by_tid_and_ref_id(transaction_id, partner_reference_id)
            .await
    }

    /// Check order status by the given transaction id, or the one set with
    /// [`Self::with_transaction_id`].
    ///
    /// # Errors
    ///
    /// Returns [`LapakError::Validation`] when no transaction id is known.
    #[deprecated(note = "use check_order_status_by_tid or check_order_status_by")]
    pub async fn check_order_status(
        &self,
        transaction_id: Option<&str>,
    ) -> Result<Value, LapakError> {
        let tid = transaction_id
            .filter(|t| !t.is_empty())
            .or_else(|| self.draft.transaction_id())
            .ok_or_else(|| {
                LapakError::validation(
                    "Transaction ID is required. Use check_order_status_by_tid() or check_order_status_by() instead.",
                )
            })?;
        self.check_order_status_by_tid(tid).await
    }

    // ── Best products ────────────────────────────────────────────────────

    /// Get best-priced products of a category (e.g. `ML`, `VAL`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn get_best_products_by_category(
        &self,
        category_code: &str,
        country_code: Option<&str>,
    ) -> Result<Value, LapakError> {
        let mut params = Params::new();
        params.insert("category_code".into(), category_code.into());
        insert_country_code(&mut params, country_code);
        self.get(Operation::BestProducts, params).await
    }

    /// Get best-priced products of a group (e.g. `ML1288_166`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn get_best_products_by_group_code(
        &self,
        group_product_code: &str,
        country_code: Option<&str>,
    ) -> Result<Value, LapakError> {
        let mut params = Params::new();
        params.insert("group_product_code".into(), group_product_code.into());
        insert_country_code(&mut params, country_code);
        self.get(Operation::BestProductsByGroup, params).await
    }

    /// Get best-priced products filtered by category and group.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn get_best_products_by_category_and_group_code(
        &self,
        category_code: &str,
        group_product_code: &str,
        country_code: Option<&str>,
    ) -> Result<Value, LapakError> {
        let mut params = Params::new();
        params.insert("category_code".into(), category_code.into());
        params.insert("group_product_code".into(), group_product_code.into());
        insert_country_code(&mut params, country_code);
        self.get(Operation::BestProducts, params).await
    }

    /// Always fails: the endpoint needs a category or group.
    ///
    /// # Errors
    ///
    /// Always returns [`LapakError::Validation`].
    #[deprecated(note = "use get_best_products_by_category or get_best_products_by_group_code")]
    pub async fn get_best_products(&self) -> Result<Value, LapakError> {
        Err(LapakError::validation(
            "get_best_products() requires parameters. Use get_best_products_by_category() or get_best_products_by_group_code() instead.",
        ))
    }

    /// Get best-priced products of a group, falling back to the group
    /// product and country code set on the builder.
    ///
    /// # Errors
    ///
    /// Returns [`LapakError::Validation`] when no group product is known.
    #[deprecated(note = "use get_best_products_by_group_code")]
    pub async fn get_best_products_by_group(
        &self,
        group_product: Option<&str>,
        country_code: Option<&str>,
    ) -> Result<Value, LapakError> {
        let group = group_product
            .filter(|g| !g.is_empty())
            .or_else(|| self.draft.group_product())
            .ok_or_else(|| {
                LapakError::validation(
                    "Group product code is required. Use get_best_products_by_group_code() instead.",
                )
            })?;
        let country = country_code.or_else(|| self.draft.country_code());
        self.get_best_products_by_group_code(group, country).await
    }

    // ── Dispatch ─────────────────────────────────────────────────────────

    async fn get(&self, operation: Operation, params: Params) -> Result<Value, LapakError> {
        let product_code = params
            .get("product_code")
            .and_then(Value::as_str)
            .or_else(|| self.draft.product_code());

        self.retry
            .run(|| {
                self.transport
                    .send(operation, Method::Get, &params, product_code)
            })
            .await
    }
}
