//! Client configuration.
//!
//! [`LapakConfig`] is immutable once built. Use [`LapakConfig::builder`] for
//! programmatic setup or [`LapakConfig::from_source`] to read it from any
//! [`ConfigSource`], such as the process environment.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LapakError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default number of attempts made by the retry policy.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Base URL of the development (sandbox) API.
pub const DEVELOPMENT_BASE_URL: &str = "https://dev.lapakgaming.com";

/// Base URL of the production API.
pub const PRODUCTION_BASE_URL: &str = "https://www.lapakgaming.com";

/// API environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Sandbox environment.
    #[default]
    Development,
    /// Live environment.
    Production,
}

impl Environment {
    /// Get the environment name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = LapakError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(LapakError::config(format!("environment (unknown value {other:?})"))),
        }
    }
}

/// An API operation with its own path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// List game categories.
    Categories,
    /// Query products by category and/or product code.
    Products,
    /// List the whole catalog.
    AllProducts,
    /// Reseller balance.
    Balance,
    /// Place an order.
    CreateOrder,
    /// Query order status.
    CheckOrder,
    /// Best-priced products by category or group.
    BestProducts,
    /// Best-priced products by group product code.
    BestProductsByGroup,
}

impl Operation {
    /// All operations.
    pub const ALL: [Self; 8] = [
        Self::Categories,
        Self::Products,
        Self::AllProducts,
        Self::Balance,
        Self::CreateOrder,
        Self::CheckOrder,
        Self::BestProducts,
        Self::BestProductsByGroup,
    ];

    /// The configuration key of the operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Products => "products",
            Self::AllProducts => "all_products",
            Self::Balance => "balance",
            Self::CreateOrder => "create_order",
            Self::CheckOrder => "check_order",
            Self::BestProducts => "best_products",
            Self::BestProductsByGroup => "best_products_by_group",
        }
    }

    /// The path used when the configuration does not override it.
    #[must_use]
    pub fn default_path(&self) -> &'static str {
        match self {
            Self::Categories => "/api/category",
            Self::Products => "/api/product",
            Self::AllProducts => "/api/all-products",
            Self::Balance => "/api/balance",
            Self::CreateOrder => "/api/order",
            Self::CheckOrder => "/api/order_status",
            Self::BestProducts | Self::BestProductsByGroup => "/api/catalogue/group-products",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base URL per environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Development base URL.
    pub development: String,
    /// Production base URL.
    pub production: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            development: DEVELOPMENT_BASE_URL.to_string(),
            production: PRODUCTION_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// The base URL for an environment.
    #[must_use]
    pub fn for_environment(&self, environment: Environment) -> &str {
        match environment {
            Environment::Development => &self.development,
            Environment::Production => &self.production,
        }
    }
}

/// Immutable LapakGaming client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct LapakConfig {
    api_key: String,
    callback_url: Option<String>,
    environment: Environment,
    endpoints: Endpoints,
    api_paths: BTreeMap<Operation, String>,
    timeout_seconds: u64,
    retry_attempts: u32,
}

impl fmt::Debug for LapakConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LapakConfig")
            .field("api_key", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .field("environment", &self.environment)
            .field("endpoints", &self.endpoints)
            .field("api_paths", &self.api_paths)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}

impl LapakConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> LapakConfigBuilder {
        LapakConfigBuilder::default()
    }

    /// Load configuration from a key-value source.
    ///
    /// Recognised keys are `api_key`, `environment`, `callback_url`,
    /// `timeout`, `retry_attempts`, `endpoints.development`,
    /// `endpoints.production` and `api_paths.<operation>`.
    ///
    /// # Errors
    ///
    /// Returns [`LapakError::Config`] listing every missing or malformed key.
    pub fn from_source(source: &impl ConfigSource) -> Result<Self> {
        let mut builder = Self::builder();
        let mut invalid = Vec::new();

        if let Some(key) = source.get("api_key") {
            builder = builder.with_api_key(key);
        }
        if let Some(env) = source.get("environment") {
            builder = builder.with_environment_name(&env);
        }
        if let Some(url) = source.get("callback_url") {
            builder = builder.with_callback_url(url);
        }
        if let Some(raw) = source.get("timeout") {
            match raw.trim().parse() {
                Ok(seconds) => builder = builder.with_timeout_seconds(seconds),
                Err(_) => invalid.push(format!("timeout (not a number: {raw:?})")),
            }
        }
        if let Some(raw) = source.get("retry_attempts") {
            match raw.trim().parse() {
                Ok(attempts) => builder = builder.with_retry_attempts(attempts),
                Err(_) => invalid.push(format!("retry_attempts (not a number: {raw:?})")),
            }
        }
        if let Some(url) = source.get("endpoints.development") {
            builder = builder.with_endpoint(Environment::Development, url);
        }
        if let Some(url) = source.get("endpoints.production") {
            builder = builder.with_endpoint(Environment::Production, url);
        }
        for operation in Operation::ALL {
            if let Some(path) = source.get(&format!("api_paths.{operation}")) {
                builder = builder.with_api_path(operation, path);
            }
        }

        builder.build_with(invalid)
    }

    /// Load configuration from `LAPAKGAMING_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`LapakError::Config`] if `LAPAKGAMING_API_KEY` is unset or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvSource::default())
    }

    /// The API key sent as the bearer token.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Default callback URL registered with the reseller account.
    #[must_use]
    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    /// The selected environment.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Base URL per environment.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Base URL of the selected environment.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.endpoints.for_environment(self.environment)
    }

    /// Path of an operation.
    #[must_use]
    pub fn path(&self, operation: Operation) -> &str {
        self.api_paths
            .get(&operation)
            .map_or_else(|| operation.default_path(), String::as_str)
    }

    /// Full URL of an operation, joined without duplicate slashes.
    #[must_use]
    pub fn url(&self, operation: Operation) -> String {
        let base = self.base_url().trim_end_matches('/');
        let path = self.path(operation).trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }

    /// Per-request timeout. `None` when configured as zero, meaning requests
    /// never time out.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then_some(Duration::from_secs(self.timeout_seconds))
    }

    /// Maximum number of attempts for retried calls.
    #[must_use]
    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }
}

/// Builder for [`LapakConfig`].
#[derive(Debug, Clone, Default)]
pub struct LapakConfigBuilder {
    api_key: Option<String>,
    callback_url: Option<String>,
    environment: Environment,
    endpoints: Endpoints,
    api_paths: BTreeMap<Operation, String>,
    timeout_seconds: Option<u64>,
    retry_attempts: Option<u32>,
}

impl LapakConfigBuilder {
    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the callback URL. Empty values clear it.
    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.callback_url = (!url.trim().is_empty()).then_some(url);
        self
    }

    /// Select the environment.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Select the environment by name.
    ///
    /// Unknown names fall back to development.
    #[must_use]
    pub fn with_environment_name(self, name: &str) -> Self {
        let environment = name.parse().unwrap_or_else(|_| {
            tracing::warn!(
                environment = %name,
                "Unknown LapakGaming environment, falling back to development"
            );
            Environment::Development
        });
        self.with_environment(environment)
    }

    /// Override the base URL of an environment.
    #[must_use]
    pub fn with_endpoint(mut self, environment: Environment, url: impl Into<String>) -> Self {
        match environment {
            Environment::Development => self.endpoints.development = url.into(),
            Environment::Production => self.endpoints.production = url.into(),
        }
        self
    }

    /// Override the path of an operation.
    #[must_use]
    pub fn with_api_path(mut self, operation: Operation, path: impl Into<String>) -> Self {
        self.api_paths.insert(operation, path.into());
        self
    }

    /// Set the request timeout in seconds. Zero disables the timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Set the number of attempts for retried calls.
    #[must_use]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = Some(attempts);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LapakError::Config`] if the API key is missing or empty.
    pub fn build(self) -> Result<LapakConfig> {
        self.build_with(Vec::new())
    }

    fn build_with(self, mut missing: Vec<String>) -> Result<LapakConfig> {
        let api_key = self.api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            missing.insert(0, "api_key".to_string());
        }
        if self.endpoints.for_environment(self.environment).trim().is_empty() {
            missing.push(format!("endpoints.{}", self.environment));
        }

        match api_key {
            Some(api_key) if missing.is_empty() => Ok(LapakConfig {
                api_key,
                callback_url: self.callback_url,
                environment: self.environment,
                endpoints: self.endpoints,
                api_paths: self.api_paths,
                timeout_seconds: self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
                retry_attempts: self.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            }),
            _ => Err(LapakError::Config { missing }),
        }
    }
}

/// A source of configuration values.
pub trait ConfigSource {
    /// Look up a value by key. Keys use dotted names such as
    /// `endpoints.production`.
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

/// Reads configuration from environment variables.
///
/// A key maps to `<PREFIX>_<KEY>` upper-cased with dots replaced by
/// underscores, so `api_key` is read from `LAPAKGAMING_API_KEY`. Empty
/// variables count as unset.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::with_prefix("LAPAKGAMING")
    }
}

impl EnvSource {
    /// Use a custom variable prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The environment variable name for a key.
    #[must_use]
    pub fn var_name(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key.replace('.', "_")).to_ascii_uppercase()
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(self.var_name(key))
            .ok()
            .filter(|v| !v.is_empty())
    }
}
