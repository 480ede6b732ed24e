//! Bootstraps both pipelines, waits for both chains to be live, then ticks
//! oracle-then-signer at a fixed interval until a fatal error terminates the
//! process (§4.8).

use crate::identity::OperatorIdentity;
use crate::metrics::Metrics;
use crate::oracle::bootstrap_height;
use crate::{OraclePipeline, SignerPipeline, TickError};
use bridge_delivery::AppChainAdapter;
use bridge_discovery::ExternalChainAdapter;
use bridge_storage::CheckpointStore;
use std::sync::Arc;
use std::time::Duration;

/// Expected app-chain block time; the scheduler ticks at this cadence (§4.8.3).
pub const TICK_INTERVAL: Duration = Duration::from_secs(6);

/// How long to wait between polls while waiting for both chains to report a
/// head at startup (§4.8.1, §9 Open Questions).
const SYNC_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct Scheduler {
	identity: OperatorIdentity,
	external: Arc<dyn ExternalChainAdapter>,
	app: Arc<dyn AppChainAdapter>,
	metrics: Arc<Metrics>,
	oracle: OraclePipeline,
	signer: SignerPipeline,
	fee_denom: String,
}

impl Scheduler {
	/// Waits for initial dual-chain sync (§4.8.1), bootstraps the oracle
	/// pipeline (§4.6), queries `gravity_id` to construct the signer
	/// pipeline, and returns a scheduler ready to [`Self::run`].
	///
	/// The "wait for a new block on both chains" condition is implemented as
	/// "both adapters have returned at least one head height since this
	/// call began" — the looser of the two readings available here, since a
	/// literal new-block wait can stall indefinitely against a quiet chain.
	pub async fn bootstrap(
		identity: OperatorIdentity,
		external: Arc<dyn ExternalChainAdapter>,
		app: Arc<dyn AppChainAdapter>,
		checkpoint: Arc<dyn CheckpointStore>,
		metrics: Arc<Metrics>,
		user_start: u64,
		bootstrap_window: u64,
		fee_denom: String,
	) -> Result<Self, TickError> {
		Self::wait_for_initial_sync(external.as_ref(), app.as_ref(), &identity).await?;

		let s = bootstrap_height(
			external.as_ref(),
			app.as_ref(),
			checkpoint.as_ref(),
			&identity.bridger_addr,
			identity.bridge_contract,
			user_start,
			bootstrap_window,
		)
		.await?;
		let oracle = OraclePipeline::new(external.clone(), app.clone(), checkpoint, metrics.clone(), s);

		let params = app.params().await?;
		let signer = SignerPipeline::new(app.clone(), metrics.clone(), params.gravity_id);

		Ok(Self { identity, external, app, metrics, oracle, signer, fee_denom })
	}

	async fn wait_for_initial_sync(
		external: &dyn ExternalChainAdapter,
		app: &dyn AppChainAdapter,
		identity: &OperatorIdentity,
	) -> Result<(), TickError> {
		loop {
			let external_head = external.head_height().await;
			let app_head = app.last_event_block(&identity.bridger_addr).await;
			match (external_head, app_head) {
				(Ok(_), Ok(_)) => return Ok(()),
				(e, a) => {
					if let Err(err) = e {
						tracing::warn!(error = %err, "waiting for external chain to report a head");
					}
					if let Err(err) = a {
						tracing::warn!(error = %err, "waiting for app-chain to report a head");
					}
					tokio::time::sleep(SYNC_POLL_INTERVAL).await;
				}
			}
		}
	}

	/// Runs the tick loop forever. A tick's transient/transactional/encoding
	/// errors are logged and swallowed; a fatal error is logged and
	/// propagated so the caller can exit the process (§4.8.4, §7).
	pub async fn run(mut self) -> Result<(), TickError> {
		let mut interval = tokio::time::interval(TICK_INTERVAL);
		loop {
			interval.tick().await;
			self.tick().await?;
		}
	}

	async fn tick(&mut self) -> Result<(), TickError> {
		if let Err(err) = self.oracle.tick(&self.identity).await {
			if is_fatal(&err) {
				return Err(err);
			}
			tracing::error!(error = %err, "oracle tick failed");
		}

		if let Err(err) = self.signer.tick(&self.identity).await {
			if is_fatal(&err) {
				return Err(err);
			}
			tracing::error!(error = %err, "signer tick failed");
		}

		self.publish_balance_metric().await;
		Ok(())
	}

	async fn publish_balance_metric(&self) {
		match self.app.balance(&self.identity.bridger_addr, &self.fee_denom).await {
			Ok(balance) => self.metrics.fx_key_balance.set(balance as f64),
			Err(err) => tracing::warn!(error = %err, "failed to refresh fx_key_balance metric"),
		}
	}
}

fn is_fatal(err: &TickError) -> bool {
	matches!(err, TickError::Fatal(_))
}
