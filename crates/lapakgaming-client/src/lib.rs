//! LapakGaming Client SDK.
//!
//! This crate provides a client for the LapakGaming game top-up reseller API:
//! catalog queries, balance, order creation and order status.
//!
//! # Example
//!
//! ```no_run
//! use lapakgaming_client::{Environment, LapakConfig, LapakGaming};
//!
//! # async fn example() -> Result<(), lapakgaming_client::LapakError> {
//! let config = LapakConfig::builder()
//!     .with_api_key("your-api-key")
//!     .with_environment(Environment::Production)
//!     .build()?;
//!
//! let client = LapakGaming::new(config)?;
//!
//! // Catalog
//! let products = client.get_products_by_category("ML", Some("ID")).await?;
//! println!("{products}");
//!
//! // Place an order
//! let order = client
//!     .fresh()
//!     .with_user("12345678", Some("2001".into()), None)
//!     .with_group_product("ML78_8", Some("id"))
//!     .with_generated_partner_reference_id()
//!     .create_order()
//!     .await?;
//! println!("tid: {}", order["data"]["tid"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Errors and Retries
//!
//! Every action returns [`LapakError`]. GET actions are retried on transient
//! failures according to [`RetryPolicy`]. Order creation is retried only when
//! a partner reference id is set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
pub mod response;
pub mod retry;
pub mod transport;

pub use client::LapakGaming;
pub use retry::{RetryPolicy, DEFAULT_RETRY_DELAY};
pub use transport::{HttpTransport, Method};

pub use lapakgaming_core::{
    ApiCode, ConfigSource, Endpoints, EnvSource, Environment, LapakConfig, LapakConfigBuilder,
    LapakError, Operation, OrderDraft, Params, Result,
};
