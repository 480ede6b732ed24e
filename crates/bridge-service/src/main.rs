//! Entry point for the bridge relayer (§6).
//!
//! A single long-running command: load the two operator keys, construct the
//! external-chain and app-chain adapters, bootstrap the oracle and signer
//! pipelines, and run the scheduler loop alongside the metrics endpoint
//! until a fatal invariant violation terminates the process.

mod server;

use bridge_account::{AppAccount, ExternalAccount, LocalAppAccount, LocalExternalAccount};
use bridge_config::{Cli, Command, Config};
use bridge_core::{Metrics, OperatorIdentity, Scheduler};
use bridge_delivery::HttpAppChainAdapter;
use bridge_discovery::HttpExternalChainAdapter;
use bridge_storage::{checkpoint_path, FileCheckpointStore};
use clap::Parser;
use prometheus::Registry;
use std::sync::Arc;

#[tokio::main]
async fn main() {
	if let Err(err) = run().await {
		tracing::error!(error = %err, "relayer terminated");
		std::process::exit(1);
	}
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();

	if matches!(cli.command, Some(Command::Version)) {
		println!("bridge-relayer {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	let config = Config::from_args(cli.run)?;
	init_tracing(&config.log_level);
	tracing::info!(bridge_addr = %config.bridge_addr, tron_grpc = %config.tron_grpc, fx_grpc = %config.fx_grpc, "starting bridge relayer");

	let app_account: Arc<dyn AppAccount> =
		Arc::new(LocalAppAccount::load(config.fx_key.expose_secret(), &config.fx_pwd, None, &config.fx_address_prefix)?);
	let external_account: Arc<dyn ExternalAccount> =
		Arc::new(LocalExternalAccount::load(config.tron_key.expose_secret(), &config.tron_pwd, None)?);
	let identity = OperatorIdentity::new(app_account.clone(), external_account, config.bridge_addr);
	tracing::info!(bridger = %identity.bridger_addr, external = %identity.external_addr, "operator identity resolved");

	let external: Arc<dyn bridge_discovery::ExternalChainAdapter> =
		Arc::new(HttpExternalChainAdapter::new(config.tron_grpc.clone()));
	let app: Arc<dyn bridge_delivery::AppChainAdapter> =
		Arc::new(HttpAppChainAdapter::connect(config.fx_grpc.clone(), app_account).await?);

	let checkpoint = Arc::new(FileCheckpointStore::new(checkpoint_path(None)));

	let registry = Arc::new(Registry::new());
	let metrics = Arc::new(Metrics::new(&registry)?);

	let scheduler = Scheduler::bootstrap(
		identity,
		external,
		app,
		checkpoint,
		metrics,
		config.start_block_number,
		config.bootstrap_window,
		config.fees.clone(),
	)
	.await?;

	tracing::info!(addr = server::DEFAULT_METRICS_ADDR, "serving metrics");

	tokio::select! {
		result = scheduler.run() => {
			result?;
		}
		result = server::serve_metrics(registry, server::DEFAULT_METRICS_ADDR) => {
			result?;
		}
	}

	Ok(())
}

fn init_tracing(log_level: &str) {
	use tracing_subscriber::{fmt, EnvFilter};
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
	fmt().with_env_filter(env_filter).with_target(true).init();
}
