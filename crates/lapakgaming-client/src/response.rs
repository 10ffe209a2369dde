//! Response classification.
//!
//! Every response passes through [`interpret`]: first the HTTP status is
//! checked, then the `code` field of the JSON body. This is the only place
//! where raw statuses and codes become [`LapakError`] values.

use lapakgaming_core::{ApiCode, LapakError};
use reqwest::StatusCode;
use serde_json::Value;

/// Classify an HTTP response.
///
/// `product_code` is the product the request was about, attached to
/// product-not-found errors.
///
/// # Errors
///
/// Returns the error the status or body code maps to, or
/// [`LapakError::Generic`] when a successful body is not JSON. An empty
/// successful body yields [`Value::Null`].
pub fn interpret(
    status: StatusCode,
    body: &str,
    product_code: Option<&str>,
) -> Result<Value, LapakError> {
    check_status(status)?;

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let data: Value = serde_json::from_str(body)
        .map_err(|e| LapakError::generic(format!("API request failed: invalid JSON response: {e}")))?;

    check_code(&data, product_code)?;
    Ok(data)
}

/// Map a non-success HTTP status to its error.
///
/// # Errors
///
/// Returns [`LapakError::Unauthorized`] for 401 and [`LapakError::Generic`]
/// for every other non-2xx status.
pub fn check_status(status: StatusCode) -> Result<(), LapakError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(LapakError::unauthorized());
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LapakError::generic(
            "Too many requests. Please try again later.",
        ));
    }
    if status.as_u16() >= 500 {
        return Err(LapakError::generic(
            "Internal server error. Please try again later.",
        ));
    }
    if !status.is_success() {
        return Err(LapakError::generic(format!(
            "API request failed with status: {}",
            status.as_u16()
        )));
    }
    Ok(())
}

/// Map the body's `code` field to its error. A missing code or `SUCCESS`
/// passes.
///
/// # Errors
///
/// Returns the error [`ApiCode::into_error`] produces for the code.
pub fn check_code(data: &Value, product_code: Option<&str>) -> Result<(), LapakError> {
    let code = match data.get("code") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::String(code)) => ApiCode::parse(code),
        Some(other) => ApiCode::parse(&other.to_string()),
    };
    let message = data.get("message").and_then(Value::as_str);

    match code.into_error(product_code, message) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(body: &Value) -> Result<Value, LapakError> {
        interpret(StatusCode::OK, &body.to_string(), Some("ML78_8-S2"))
    }

    #[test]
    fn unauthorized_status() {
        let err = interpret(StatusCode::UNAUTHORIZED, "", None).unwrap_err();
        assert_eq!(err, LapakError::Unauthorized);
    }

    #[test]
    fn too_many_requests_status() {
        let err = interpret(StatusCode::TOO_MANY_REQUESTS, "{}", None).unwrap_err();
        assert_eq!(
            err,
            LapakError::generic("Too many requests. Please try again later.")
        );
    }

    #[test]
    fn server_error_statuses() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let err = interpret(status, "oops", None).unwrap_err();
            assert_eq!(
                err,
                LapakError::generic("Internal server error. Please try again later.")
            );
        }
    }

    #[test]
    fn other_client_error_status() {
        let err = interpret(StatusCode::NOT_FOUND, "{}", None).unwrap_err();
        assert_eq!(
            err,
            LapakError::generic("API request failed with status: 404")
        );
    }

    #[test]
    fn status_checked_before_body_code() {
        let body = json!({"code": "SUCCESS"}).to_string();
        let err = interpret(StatusCode::BAD_REQUEST, &body, None).unwrap_err();
        assert_eq!(
            err,
            LapakError::generic("API request failed with status: 400")
        );
    }

    #[test]
    fn success_code_passes_through() {
        let body = json!({"code": "SUCCESS", "data": {"balance": 150_000}});
        assert_eq!(ok(&body).unwrap(), body);
    }

    #[test]
    fn missing_code_passes_through() {
        let body = json!({"data": [{"code": "ML"}]});
        assert_eq!(ok(&body).unwrap(), body);

        let body = json!({"code": null});
        assert_eq!(ok(&body).unwrap(), body);
    }

    #[test]
    fn product_not_found_carries_product_code() {
        let err = ok(&json!({"code": "PRODUCT_NOT_FOUND"})).unwrap_err();
        assert_eq!(
            err,
            LapakError::ProductNotFound {
                product_code: Some("ML78_8-S2".into())
            }
        );
    }

    #[test]
    fn domain_codes_map_to_variants() {
        assert_eq!(
            ok(&json!({"code": "UNAUTHORIZED"})).unwrap_err(),
            LapakError::Unauthorized
        );
        assert_eq!(
            ok(&json!({"code": "PRICE_NOT_MATCH"})).unwrap_err(),
            LapakError::PriceMismatch
        );
        assert_eq!(
            ok(&json!({"code": "INSUFFICIENT_BALANCE"})).unwrap_err(),
            LapakError::InsufficientBalance
        );
        assert_eq!(
            ok(&json!({"code": "TID_NOT_FOUND"})).unwrap_err(),
            LapakError::api(ApiCode::TidNotFound, "Transaction ID not found.")
        );
        assert_eq!(
            ok(&json!({"code": "SYSTEM_ERROR", "message": "db down"})).unwrap_err(),
            LapakError::api(
                ApiCode::SystemError,
                "System error occurred. Please try again later."
            )
        );
    }

    #[test]
    fn unknown_code_keeps_raw_code_and_message() {
        let err = ok(&json!({"code": "MAINTENANCE", "message": "back at 10:00"})).unwrap_err();
        assert_eq!(
            err,
            LapakError::api(ApiCode::Other("MAINTENANCE".into()), "back at 10:00")
        );
    }

    #[test]
    fn numeric_code_is_treated_as_unknown() {
        let err = ok(&json!({"code": 500})).unwrap_err();
        assert_eq!(
            err,
            LapakError::api(ApiCode::Other("500".into()), "Unknown API error")
        );
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(interpret(StatusCode::NO_CONTENT, "", None).unwrap(), Value::Null);
        assert_eq!(interpret(StatusCode::OK, " \n", None).unwrap(), Value::Null);
    }

    #[test]
    fn empty_error_body_keeps_status_error() {
        let err = interpret(StatusCode::BAD_GATEWAY, "", None).unwrap_err();
        assert_eq!(
            err,
            LapakError::generic("Internal server error. Please try again later.")
        );
    }

    #[test]
    fn invalid_json_is_generic_error() {
        let err = interpret(StatusCode::OK, "<html>", None).unwrap_err();
        assert!(matches!(err, LapakError::Generic(msg) if msg.contains("invalid JSON")));
    }
}
