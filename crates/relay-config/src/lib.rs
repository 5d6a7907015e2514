//! Configuration module for the token factory relay.
//!
//! This module provides structures and utilities for managing relay
//! configuration. It supports loading configuration from TOML files with
//! `${ENV_VAR}` / `${ENV_VAR:-default}` resolution and validates that all
//! required values are properly set before the process starts serving.
//!
//! Configuration is resolved exactly once at startup and shared read-only
//! with the relay components; nothing here is mutated afterwards.

use alloy_primitives::Address;
use regex::Regex;
use relay_types::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the relay.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Identity of this relay instance.
	pub relay: RelayConfig,
	/// Chain endpoint and factory contract settings.
	pub network: NetworkConfig,
	/// Signing account settings.
	pub account: AccountConfig,
	/// Transaction submitter tuning.
	#[serde(default)]
	pub submitter: SubmitterConfig,
	/// Receipt resolver polling policy.
	#[serde(default)]
	pub resolver: ResolverConfig,
	/// HTTP API server settings.
	#[serde(default)]
	pub api: ApiConfig,
}

/// Configuration specific to the relay instance.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
	/// Unique identifier for this relay instance.
	pub id: String,
}

/// Chain endpoint and factory contract configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
	/// HTTP(S) JSON-RPC endpoint for chain interaction.
	pub rpc_url: String,
	/// Address of the token factory contract.
	pub factory_address: Address,
}

/// Signing account configuration.
///
/// The private key is the only sensitive input the relay holds; it is
/// wrapped so it never appears in logs or serialized output.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
	/// Relay signing key, hex-encoded with optional 0x prefix.
	pub private_key: SecretString,
}

/// Transaction submitter tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitterConfig {
	/// Gas limit used when gas estimation fails.
	#[serde(default = "default_fallback_gas_limit")]
	pub fallback_gas_limit: u64,
	/// Safety multiplier applied to successful gas estimates, in percent.
	/// Must be at least 100 (a multiplier of 1.0).
	#[serde(default = "default_gas_multiplier_percent")]
	pub gas_multiplier_percent: u64,
}

impl Default for SubmitterConfig {
	fn default() -> Self {
		Self {
			fallback_gas_limit: default_fallback_gas_limit(),
			gas_multiplier_percent: default_gas_multiplier_percent(),
		}
	}
}

/// Returns the default fallback gas limit.
///
/// Conservative fixed limit for factory deployments when estimation is
/// unavailable.
fn default_fallback_gas_limit() -> u64 {
	3_000_000
}

/// Returns the default gas estimate multiplier (120 = 1.2x).
fn default_gas_multiplier_percent() -> u64 {
	120
}

/// Receipt resolver polling policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
	/// Maximum receipt fetch attempts before yielding Pending.
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	/// First backoff delay between attempts, in milliseconds.
	#[serde(default = "default_initial_backoff_ms")]
	pub initial_backoff_ms: u64,
	/// Backoff cap, in milliseconds.
	#[serde(default = "default_max_backoff_ms")]
	pub max_backoff_ms: u64,
	/// Hard deadline for the whole polling loop, in milliseconds.
	#[serde(default = "default_total_deadline_ms")]
	pub total_deadline_ms: u64,
}

impl Default for ResolverConfig {
	fn default() -> Self {
		Self {
			max_attempts: default_max_attempts(),
			initial_backoff_ms: default_initial_backoff_ms(),
			max_backoff_ms: default_max_backoff_ms(),
			total_deadline_ms: default_total_deadline_ms(),
		}
	}
}

/// Returns the default maximum receipt fetch attempts.
fn default_max_attempts() -> u32 {
	30
}

/// Returns the default initial backoff in milliseconds.
fn default_initial_backoff_ms() -> u64 {
	500
}

/// Returns the default backoff cap in milliseconds.
fn default_max_backoff_ms() -> u64 {
	8_000
}

/// Returns the default polling deadline in milliseconds.
fn default_total_deadline_ms() -> u64 {
	60_000
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default = "default_api_enabled")]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Request timeout in seconds.
	#[serde(default = "default_api_timeout")]
	pub timeout_seconds: u64,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			enabled: default_api_enabled(),
			host: default_api_host(),
			port: default_api_port(),
			timeout_seconds: default_api_timeout(),
		}
	}
}

/// Returns whether the API is enabled by default.
fn default_api_enabled() -> bool {
	true
}

/// Returns the default API host.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	3000
}

/// Returns the default API request timeout in seconds.
fn default_api_timeout() -> u64 {
	30
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable
/// VAR_NAME. Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to bound regex evaluation.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment variable references are resolved before parsing, and
	/// the result is validated; an invalid configuration is fatal.
	pub fn from_file(path: &str) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;
		Self::from_toml_str(&raw)
	}

	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
		let resolved = resolve_env_vars(raw)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}

	/// Validates the configuration.
	///
	/// - relay id and RPC URL must be non-empty
	/// - the signing key must be present
	/// - the gas multiplier must not shrink estimates
	/// - the resolver must make at least one attempt
	fn validate(&self) -> Result<(), ConfigError> {
		if self.relay.id.is_empty() {
			return Err(ConfigError::Validation("Relay ID cannot be empty".into()));
		}
		if self.network.rpc_url.is_empty() {
			return Err(ConfigError::Validation("RPC URL cannot be empty".into()));
		}
		if self.account.private_key.is_empty() {
			return Err(ConfigError::Validation(
				"Account private key cannot be empty".into(),
			));
		}
		if self.submitter.gas_multiplier_percent < 100 {
			return Err(ConfigError::Validation(
				"gas_multiplier_percent must be at least 100".into(),
			));
		}
		if self.submitter.fallback_gas_limit == 0 {
			return Err(ConfigError::Validation(
				"fallback_gas_limit cannot be zero".into(),
			));
		}
		if self.resolver.max_attempts == 0 {
			return Err(ConfigError::Validation(
				"Resolver max_attempts must be at least 1".into(),
			));
		}
		if self.resolver.total_deadline_ms == 0 {
			return Err(ConfigError::Validation(
				"Resolver total_deadline_ms cannot be zero".into(),
			));
		}
		Ok(())
	}
}
