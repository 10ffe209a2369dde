//! Error types for the LapakGaming SDK.

use crate::code::ApiCode;

/// Result type for LapakGaming operations.
pub type Result<T> = std::result::Result<T, LapakError>;

/// Errors that can occur when talking to the LapakGaming API.
///
/// Callers distinguish failures by matching on the variant. The rendered
/// message is for humans only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LapakError {
    /// Transport failures, HTTP status failures and other unclassified errors.
    #[error("{0}")]
    Generic(String),

    /// Required configuration is missing or malformed.
    #[error("configuration error: {}", .missing.join(", "))]
    Config {
        /// Every offending configuration key, with a reason where relevant.
        missing: Vec<String>,
    },

    /// A builder field required by the action was not set.
    #[error("{0}")]
    Validation(String),

    /// The API answered with a failure code that has no dedicated variant.
    #[error("LapakGaming API Error: {code} - {message}")]
    Api {
        /// The code from the response body.
        code: ApiCode,
        /// Description of the failure.
        message: String,
    },

    /// Invalid API key or IP address not whitelisted.
    #[error("Unauthorized: Invalid API Key or IP Address not whitelisted.")]
    Unauthorized,

    /// The requested product does not exist.
    #[error("Product not found{}", .product_code.as_deref().map(|c| format!(": {c}")).unwrap_or_default())]
    ProductNotFound {
        /// The product code that was requested, when known.
        product_code: Option<String>,
    },

    /// Reseller balance is too low.
    #[error("Insufficient balance to complete this transaction.")]
    InsufficientBalance,

    /// The submitted price does not match the current product price.
    #[error("Price does not match the current product price.")]
    PriceMismatch,
}

impl LapakError {
    /// Create a generic error.
    #[must_use]
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic(message.into())
    }

    /// Create a configuration error for a single missing key.
    #[must_use]
    pub fn config(key: impl Into<String>) -> Self {
        Self::Config {
            missing: vec![key.into()],
        }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an API error for a code without a dedicated variant.
    #[must_use]
    pub fn api(code: ApiCode, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Create an unauthorized error.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    /// Create a product-not-found error. Empty codes are dropped.
    #[must_use]
    pub fn product_not_found(product_code: Option<&str>) -> Self {
        Self::ProductNotFound {
            product_code: product_code
                .filter(|c| !c.is_empty())
                .map(ToString::to_string),
        }
    }

    /// Create an insufficient-balance error.
    #[must_use]
    pub fn insufficient_balance() -> Self {
        Self::InsufficientBalance
    }

    /// Create a price-mismatch error.
    #[must_use]
    pub fn price_mismatch() -> Self {
        Self::PriceMismatch
    }

    /// The API code this error originated from, if any.
    #[must_use]
    pub fn api_code(&self) -> Option<ApiCode> {
        match self {
            Self::Api { code, .. } => Some(code.clone()),
            Self::Unauthorized => Some(ApiCode::Unauthorized),
            Self::ProductNotFound { .. } => Some(ApiCode::ProductNotFound),
            Self::InsufficientBalance => Some(ApiCode::InsufficientBalance),
            Self::PriceMismatch => Some(ApiCode::PriceNotMatch),
            Self::Generic(_) | Self::Config { .. } | Self::Validation(_) => None,
        }
    }

    /// Whether repeating the same request could succeed.
    ///
    /// Authentication, missing product, empty user id, price and balance
    /// failures are terminal, as are local config and validation errors.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unauthorized
            | Self::ProductNotFound { .. }
            | Self::PriceMismatch
            | Self::InsufficientBalance
            | Self::Config { .. }
            | Self::Validation(_) => false,
            Self::Api { code, .. } => *code != ApiCode::UserIdEmpty,
            Self::Generic(_) => true,
        }
    }
}
