//! Core types for the LapakGaming client SDK.
//!
//! This crate holds everything that does not touch the network:
//!
//! - **Configuration**: `LapakConfig`, `Environment`, `Operation`, `ConfigSource`
//! - **Errors**: `LapakError` and the `ApiCode` table that feeds it
//! - **Orders**: `OrderDraft` and the parameter maps sent to the API
//!
//! # Partner Reference Ids
//!
//! A partner reference id is an idempotency key chosen by the reseller. The
//! API refuses a second order with the same id, so an order that carries one
//! can be resubmitted safely after a transient failure.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod code;
pub mod config;
pub mod error;
pub mod order;

pub use code::ApiCode;
pub use config::{
    ConfigSource, Endpoints, EnvSource, Environment, LapakConfig, LapakConfigBuilder, Operation,
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_TIMEOUT_SECONDS, DEVELOPMENT_BASE_URL, PRODUCTION_BASE_URL,
};
pub use error::{LapakError, Result};
pub use order::{generate_partner_reference_id, normalize_country_code, OrderDraft, Params};
