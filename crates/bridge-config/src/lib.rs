//! Command-line configuration for the relayer binary (§6).
//!
//! A single long-running command plus a `version` subcommand; all other
//! configuration is CLI flags and the two environment variables below. There
//! is no TOML file and no nested/pluggable config surface to validate.

use bridge_types::{ExternalAddress, SecretString};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid value for --{flag}: {message}")]
	InvalidValue { flag: &'static str, message: String },
}

/// Top-level CLI surface. `command` is `None` for the normal run path.
#[derive(Parser, Debug)]
#[command(name = "bridge", author, version, about = "TRON <-> app-chain bridge relayer")]
pub struct Cli {
	#[command(subcommand)]
	pub command: Option<Command>,

	#[command(flatten)]
	pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print version information and exit.
	Version,
}

/// Raw flags as clap hands them back, before validation.
///
/// The chain-identifying and key flags are `Option` rather than required
/// clap args: they are flattened onto [`Cli`] unconditionally, so a required
/// `#[arg(long)]` here would also demand `--bridge-addr` and friends for
/// `bridge version`. [`Config::from_args`] enforces "required unless a
/// subcommand short-circuits the run path" instead.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
	/// Bridge contract address on the external chain, base58check.
	#[arg(long)]
	pub bridge_addr: Option<String>,

	/// External chain gRPC/HTTP endpoint.
	#[arg(long)]
	pub tron_grpc: Option<String>,

	/// App-chain gRPC/HTTP endpoint.
	#[arg(long)]
	pub fx_grpc: Option<String>,

	/// External-chain height to start scanning from; 0 defers to the
	/// app-chain's own record (§4.6 bootstrap).
	#[arg(long, default_value_t = 0)]
	pub start_block_number: u64,

	/// App-chain signing key (key A): raw hex or an armored keystore.
	#[arg(long)]
	pub fx_key: Option<String>,

	/// Password for `--fx-key`, if it is an armored keystore.
	#[arg(long, default_value = "")]
	pub fx_pwd: String,

	/// External-chain signing key (key B): raw hex or an armored keystore.
	#[arg(long)]
	pub tron_key: Option<String>,

	/// Password for `--tron-key`, if it is an armored keystore.
	#[arg(long, default_value = "")]
	pub tron_pwd: String,

	/// Denomination reported by the `fx_key_balance` metric.
	#[arg(long, default_value = "FX")]
	pub fees: String,

	/// Tracing env-filter default directive.
	#[arg(long, default_value = "info")]
	pub log_level: String,

	/// Lower bound, in blocks, for the bootstrap oracle-set-rotation scan.
	#[arg(long, default_value_t = 1_000)]
	pub bootstrap_window: u64,
}

/// Validated configuration the rest of the process is built from.
#[derive(Debug, Clone)]
pub struct Config {
	pub bridge_addr: ExternalAddress,
	pub tron_grpc: String,
	pub fx_grpc: String,
	pub start_block_number: u64,
	pub fx_key: SecretString,
	pub fx_pwd: SecretString,
	pub tron_key: SecretString,
	pub tron_pwd: SecretString,
	pub fees: String,
	pub log_level: String,
	pub bootstrap_window: u64,
	pub fx_address_prefix: String,
}

/// Name of the environment variable that overrides the app-chain address
/// human-readable prefix (default `"fx"`).
pub const FX_ADDRESS_PREFIX_ENV: &str = "FX_ADDRESS_PREFIX";
const DEFAULT_FX_ADDRESS_PREFIX: &str = "fx";

impl Config {
	/// Validates `args` and threads in the environment-derived prefix.
	///
	/// Reads `FX_ADDRESS_PREFIX` once, here, rather than mutating any global
	/// cosmos-sdk-style config state.
	pub fn from_args(args: RunArgs) -> Result<Self, ConfigError> {
		let bridge_addr_raw = required(args.bridge_addr, "bridge-addr")?;
		let tron_grpc = required(args.tron_grpc, "tron-grpc")?;
		let fx_grpc = required(args.fx_grpc, "fx-grpc")?;
		let fx_key = required(args.fx_key, "fx-key")?;
		let tron_key = required(args.tron_key, "tron-key")?;

		let bridge_addr = ExternalAddress::from_base58check(&bridge_addr_raw).map_err(|e| ConfigError::InvalidValue {
			flag: "bridge-addr",
			message: e.to_string(),
		})?;

		if fx_key.trim().is_empty() {
			return Err(ConfigError::InvalidValue { flag: "fx-key", message: "must not be empty".into() });
		}
		if tron_key.trim().is_empty() {
			return Err(ConfigError::InvalidValue { flag: "tron-key", message: "must not be empty".into() });
		}
		if args.bootstrap_window == 0 {
			return Err(ConfigError::InvalidValue { flag: "bootstrap-window", message: "must be greater than zero".into() });
		}

		let fx_address_prefix =
			std::env::var(FX_ADDRESS_PREFIX_ENV).unwrap_or_else(|_| DEFAULT_FX_ADDRESS_PREFIX.to_string());

		Ok(Config {
			bridge_addr,
			tron_grpc,
			fx_grpc,
			start_block_number: args.start_block_number,
			fx_key: SecretString::from(fx_key.as_str()),
			fx_pwd: SecretString::from(args.fx_pwd.as_str()),
			tron_key: SecretString::from(tron_key.as_str()),
			tron_pwd: SecretString::from(args.tron_pwd.as_str()),
			fees: args.fees,
			log_level: args.log_level,
			bootstrap_window: args.bootstrap_window,
			fx_address_prefix,
		})
	}
}

fn required(value: Option<String>, flag: &'static str) -> Result<String, ConfigError> {
	value.filter(|v| !v.trim().is_empty()).ok_or(ConfigError::InvalidValue { flag, message: "required".into() })
}

/// Resolves `$HOME` for the checkpoint directory (§6), failing fast if unset
/// rather than silently falling back to the current directory.
pub fn home_dir() -> Result<std::path::PathBuf, ConfigError> {
	std::env::var("HOME")
		.map(std::path::PathBuf::from)
		.map_err(|_| ConfigError::InvalidValue { flag: "$HOME", message: "environment variable not set".into() })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn valid_args() -> RunArgs {
		RunArgs {
			bridge_addr: Some(ExternalAddress([1u8; 20]).to_base58check()),
			tron_grpc: Some("https://tron.example".into()),
			fx_grpc: Some("https://fx.example".into()),
			start_block_number: 0,
			fx_key: Some("a".repeat(64)),
			fx_pwd: String::new(),
			tron_key: Some("b".repeat(64)),
			tron_pwd: String::new(),
			fees: "FX".into(),
			log_level: "info".into(),
			bootstrap_window: 1_000,
		}
	}

	#[test]
	fn accepts_a_well_formed_configuration() {
		assert!(Config::from_args(valid_args()).is_ok());
	}

	#[test]
	fn rejects_malformed_bridge_address() {
		let mut args = valid_args();
		args.bridge_addr = Some("not-base58!!".into());
		assert!(Config::from_args(args).is_err());
	}

	#[test]
	fn rejects_empty_signing_keys() {
		let mut args = valid_args();
		args.fx_key = Some(String::new());
		assert!(Config::from_args(args).is_err());
	}

	#[test]
	fn rejects_missing_required_flag() {
		let mut args = valid_args();
		args.fx_grpc = None;
		assert!(Config::from_args(args).is_err());
	}

	#[test]
	fn rejects_zero_bootstrap_window() {
		let mut args = valid_args();
		args.bootstrap_window = 0;
		assert!(Config::from_args(args).is_err());
	}
}
