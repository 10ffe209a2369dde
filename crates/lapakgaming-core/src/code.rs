//! API status codes embedded in LapakGaming response bodies.
//!
//! A response can be HTTP 200 and still carry a failure in its top-level
//! `code` field. [`ApiCode`] is the closed table of codes the API documents,
//! and [`ApiCode::into_error`] is the only place they are turned into
//! [`LapakError`] values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LapakError;

/// A status code returned in the `code` field of a response body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApiCode {
    /// The request succeeded.
    Success,
    /// Invalid API key or IP address not whitelisted.
    Unauthorized,
    /// The requested product does not exist.
    ProductNotFound,
    /// The product is out of stock.
    ProductEmpty,
    /// The product provider does not exist.
    ProviderNotFound,
    /// The submitted price differs from the current product price.
    PriceNotMatch,
    /// The product provider is inactive.
    ProviderInactive,
    /// The transaction id is unknown.
    TidNotFound,
    /// The game user id contains whitespace.
    UserIdContainSpace,
    /// No stock record exists for the product.
    StockNotFound,
    /// The game user id is empty.
    UserIdEmpty,
    /// Reseller balance is too low for the order.
    InsufficientBalance,
    /// Transient failure on the provider side.
    SystemError,
    /// Unclassified failure on the provider side.
    UnknownError,
    /// The operation is not permitted for this reseller.
    NotAllowed,
    /// A code this SDK does not know about.
    Other(String),
}

impl ApiCode {
    /// Every documented code, in the order the API reference lists them.
    pub const KNOWN: [Self; 15] = [
        Self::Success,
        Self::Unauthorized,
        Self::ProductNotFound,
        Self::ProductEmpty,
        Self::ProviderNotFound,
        Self::PriceNotMatch,
        Self::ProviderInactive,
        Self::TidNotFound,
        Self::UserIdContainSpace,
        Self::StockNotFound,
        Self::UserIdEmpty,
        Self::InsufficientBalance,
        Self::SystemError,
        Self::UnknownError,
        Self::NotAllowed,
    ];

    /// Parse a raw code. Unknown values are kept as [`ApiCode::Other`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "SUCCESS" => Self::Success,
            "UNAUTHORIZED" => Self::Unauthorized,
            "PRODUCT_NOT_FOUND" => Self::ProductNotFound,
            "PRODUCT_EMPTY" => Self::ProductEmpty,
            "PROVIDER_NOT_FOUND" => Self::ProviderNotFound,
            "PRICE_NOT_MATCH" => Self::PriceNotMatch,
            "PROVIDER_INACTIVE" => Self::ProviderInactive,
            "TID_NOT_FOUND" => Self::TidNotFound,
            "USER_ID_CONTAIN_SPACE" => Self::UserIdContainSpace,
            "STOCK_NOT_FOUND" => Self::StockNotFound,
            "USER_ID_EMPTY" => Self::UserIdEmpty,
            "INSUFFICIENT_BALANCE" => Self::InsufficientBalance,
            "SYSTEM_ERROR" => Self::SystemError,
            "UNKNOWN_ERROR" => Self::UnknownError,
            "NOT_ALLOWED" => Self::NotAllowed,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire representation of the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::ProductEmpty => "PRODUCT_EMPTY",
            Self::ProviderNotFound => "PROVIDER_NOT_FOUND",
            Self::PriceNotMatch => "PRICE_NOT_MATCH",
            Self::ProviderInactive => "PROVIDER_INACTIVE",
            Self::TidNotFound => "TID_NOT_FOUND",
            Self::UserIdContainSpace => "USER_ID_CONTAIN_SPACE",
            Self::StockNotFound => "STOCK_NOT_FOUND",
            Self::UserIdEmpty => "USER_ID_EMPTY",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::SystemError => "SYSTEM_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::NotAllowed => "NOT_ALLOWED",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this code marks a successful response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Human-readable description for codes that map to [`LapakError::Api`].
    #[must_use]
    pub fn description(&self) -> Option<&'static str> {
        let text = match self {
            Self::ProductEmpty => "Product is currently out of stock.",
            Self::ProviderNotFound => "Product provider not found.",
            Self::ProviderInactive => "Product provider is currently inactive.",
            Self::TidNotFound => "Transaction ID not found.",
            Self::UserIdContainSpace => "User ID cannot contain spaces.",
            Self::StockNotFound => "Product stock not found.",
            Self::UserIdEmpty => "User ID cannot be empty.",
            Self::SystemError => "System error occurred. Please try again later.",
            Self::UnknownError => "Unknown error occurred. Please contact support.",
            Self::NotAllowed => "Operation not allowed.",
            Self::Success
            | Self::Unauthorized
            | Self::ProductNotFound
            | Self::PriceNotMatch
            | Self::InsufficientBalance
            | Self::Other(_) => return None,
        };
        Some(text)
    }

    /// Convert a failure code into its error.
    ///
    /// Returns `None` for [`ApiCode::Success`]. `product_code` is attached to
    /// [`LapakError::ProductNotFound`] and `message` is the body's `message`
    /// field, used only for codes without a fixed description.
    #[must_use]
    pub fn into_error(self, product_code: Option<&str>, message: Option<&str>) -> Option<LapakError> {
        let error = match self {
            Self::Success => return None,
            Self::Unauthorized => LapakError::unauthorized(),
            Self::ProductNotFound => LapakError::product_not_found(product_code),
            Self::PriceNotMatch => LapakError::price_mismatch(),
            Self::InsufficientBalance => LapakError::insufficient_balance(),
            Self::Other(_) => {
                let message = message
                    .filter(|m| !m.is_empty())
                    .unwrap_or("Unknown API error")
                    .to_string();
                LapakError::api(self, message)
            }
            known => {
                let message = known.description().unwrap_or_default().to_string();
                LapakError::api(known, message)
            }
        };
        Some(error)
    }
}

impl fmt::Display for ApiCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ApiCode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for ApiCode {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<ApiCode> for String {
    fn from(code: ApiCode) -> Self {
        code.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip_through_wire_form() {
        for code in ApiCode::KNOWN {
            assert_eq!(ApiCode::parse(code.as_str()), code);
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        let code = ApiCode::parse("MAINTENANCE");
        assert_eq!(code, ApiCode::Other("MAINTENANCE".into()));
        assert_eq!(code.as_str(), "MAINTENANCE");
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert_eq!(ApiCode::parse("success"), ApiCode::Other("success".into()));
    }

    #[test]
    fn success_produces_no_error() {
        assert!(ApiCode::Success.into_error(Some("ML78"), None).is_none());
    }

    #[test]
    fn every_failure_code_maps_to_an_error() {
        for code in ApiCode::KNOWN.into_iter().filter(|c| !c.is_success()) {
            let raw = code.as_str().to_string();
            let error = code.into_error(None, None);
            assert!(error.is_some(), "{raw} should map to an error");
        }
    }

    #[test]
    fn dedicated_variants() {
        assert!(matches!(
            ApiCode::Unauthorized.into_error(None, None),
            Some(LapakError::Unauthorized)
        ));
        assert!(matches!(
            ApiCode::PriceNotMatch.into_error(None, None),
            Some(LapakError::PriceMismatch)
        ));
        assert!(matches!(
            ApiCode::InsufficientBalance.into_error(None, None),
            Some(LapakError::InsufficientBalance)
        ));

        match ApiCode::ProductNotFound.into_error(Some("VAL1650-S14"), None) {
            Some(LapakError::ProductNotFound { product_code }) => {
                assert_eq!(product_code.as_deref(), Some("VAL1650-S14"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn described_codes_keep_their_code() {
        let cases = [
            (ApiCode::ProductEmpty, "Product is currently out of stock."),
            (ApiCode::ProviderNotFound, "Product provider not found."),
            (ApiCode::ProviderInactive, "Product provider is currently inactive."),
            (ApiCode::TidNotFound, "Transaction ID not found."),
            (ApiCode::UserIdContainSpace, "User ID cannot contain spaces."),
            (ApiCode::StockNotFound, "Product stock not found."),
            (ApiCode::UserIdEmpty, "User ID cannot be empty."),
            (ApiCode::SystemError, "System error occurred. Please try again later."),
            (ApiCode::UnknownError, "Unknown error occurred. Please contact support."),
            (ApiCode::NotAllowed, "Operation not allowed."),
        ];

        for (code, expected) in cases {
            match code.clone().into_error(None, Some("ignored")) {
                Some(LapakError::Api {
                    code: got,
                    message,
                }) => {
                    assert_eq!(got, code);
                    assert_eq!(message, expected);
                }
                other => panic!("unexpected for {code}: {other:?}"),
            }
        }
    }

    #[test]
    fn unrecognized_code_carries_body_message() {
        let error = ApiCode::parse("RATE_LIMITED").into_error(None, Some("slow down"));
        match error {
            Some(LapakError::Api { code, message }) => {
                assert_eq!(code.as_str(), "RATE_LIMITED");
                assert_eq!(message, "slow down");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let error = ApiCode::parse("RATE_LIMITED").into_error(None, None);
        assert_eq!(
            error.map(|e| e.to_string()).as_deref(),
            Some("LapakGaming API Error: RATE_LIMITED - Unknown API error")
        );
    }

    #[test]
    fn serde_uses_wire_form() {
        let json = serde_json::to_string(&ApiCode::TidNotFound).unwrap();
        assert_eq!(json, "\"TID_NOT_FOUND\"");

        let parsed: ApiCode = serde_json::from_str("\"NOT_ALLOWED\"").unwrap();
        assert_eq!(parsed, ApiCode::NotAllowed);
    }
}
