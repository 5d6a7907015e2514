//! Main entry point for the token factory relay service.
//!
//! This binary wires the concrete implementations together: the local
//! signing account, the Alloy chain client, the transaction submitter and
//! the receipt resolver, then serves the HTTP API until interrupted.

use clap::Parser;
use relay_account::implementations::local::LocalAccount;
use relay_account::AccountService;
use relay_config::Config;
use relay_delivery::implementations::evm::alloy::AlloyChain;
use relay_delivery::{ChainInterface, SubmitterService};
use relay_resolver::{PollPolicy, ResolverService};
use std::path::PathBuf;
use std::sync::Arc;

mod server;

/// Command-line arguments for the relay service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the relay service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the submitter and resolver services
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started relay");

	let config = Config::from_file(args.config.to_str().ok_or("Invalid config path")?)?;
	tracing::info!("Loaded configuration [{}]", config.relay.id);

	let state = build_state(&config)?;

	if config.api.enabled {
		server::start_server(config.api.clone(), state).await?;
	} else {
		tracing::warn!("API server disabled, nothing to serve");
	}

	tracing::info!("Stopped relay");
	Ok(())
}

/// Builds the shared application state from configuration.
///
/// The signing key is parsed once here; a malformed key aborts startup
/// rather than failing on the first request.
fn build_state(config: &Config) -> Result<server::AppState, Box<dyn std::error::Error>> {
	let account = LocalAccount::new(&config.account.private_key)?;
	let account = Arc::new(AccountService::new(Box::new(account)));
	tracing::info!(address = %account.address(), "Relay signing account loaded");

	let chain: Arc<dyn ChainInterface> = Arc::new(AlloyChain::new(&config.network.rpc_url)?);

	let submitter = Arc::new(SubmitterService::new(
		Arc::clone(&chain),
		account,
		config.network.factory_address,
		config.submitter.fallback_gas_limit,
		config.submitter.gas_multiplier_percent,
	));

	let resolver = Arc::new(ResolverService::new(
		chain,
		config.network.factory_address,
		PollPolicy::from_millis(
			config.resolver.max_attempts,
			config.resolver.initial_backoff_ms,
			config.resolver.max_backoff_ms,
			config.resolver.total_deadline_ms,
		),
	));

	Ok(server::AppState {
		submitter,
		resolver,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_config() -> Config {
		Config::from_toml_str(
			r#"
[relay]
id = "test-relay"

[network]
rpc_url = "http://localhost:8545"
factory_address = "0x981A4465A74D467dDd3F28308B255de98F157d72"

[account]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
"#,
		)
		.expect("test config is valid")
	}

	#[test]
	fn test_args_default_values() {
		let args = Args {
			config: PathBuf::from("config.toml"),
			log_level: "info".to_string(),
		};

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_build_state_with_minimal_config() {
		let state = build_state(&test_config()).expect("state builds from valid config");
		// Dev key address, derived deterministically.
		assert_eq!(
			state.submitter.signer_address().to_string(),
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
		);
	}

	#[test]
	fn test_build_state_rejects_malformed_key() {
		let mut config = test_config();
		config.account.private_key = "not-a-key".into();
		assert!(build_state(&config).is_err());
	}
}
