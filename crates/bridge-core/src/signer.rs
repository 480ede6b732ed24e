//! Polls the app-chain for pending oracle-set rotations and outgoing batches,
//! signs their canonical digests with the external-chain key, and submits
//! the resulting confirm messages back to the app-chain (§4.7).

use crate::identity::OperatorIdentity;
use crate::metrics::Metrics;
use crate::TickError;
use bridge_delivery::{AppChainAdapter, OutboundMessage};
use bridge_digest::{batch_digest, checkpoint_digest};
use bridge_types::{ConfirmBatch, ConfirmMessage, OracleSetConfirm};
use std::sync::Arc;

const MAX_BATCH_MSGS: usize = 100;

pub struct SignerPipeline {
	app: Arc<dyn AppChainAdapter>,
	metrics: Arc<Metrics>,
	gravity_id: String,
}

impl SignerPipeline {
	/// `gravity_id` is queried once from app-chain parameters at signer
	/// startup (§3, `GravityId`) and treated as fixed for the process
	/// lifetime.
	pub fn new(app: Arc<dyn AppChainAdapter>, metrics: Arc<Metrics>, gravity_id: String) -> Self {
		Self { app, metrics, gravity_id }
	}

	/// Runs one scheduler tick of the signer duty (§4.7 "Per tick").
	pub async fn tick(&self, identity: &OperatorIdentity) -> Result<(), TickError> {
		let status = self.app.oracle_status(&identity.bridger_addr).await?;
		if !status.online {
			tracing::warn!(bridger = %identity.bridger_addr, "signer offline, skipping tick");
			return Ok(());
		}
		if status.external_address != identity.external_addr {
			return Err(TickError::Fatal(format!(
				"app-chain records external address {} for this bridger, but key B derives {}",
				status.external_address, identity.external_addr
			)));
		}

		self.confirm_oracle_sets(identity).await?;
		self.confirm_batch(identity).await?;
		Ok(())
	}

	async fn confirm_oracle_sets(&self, identity: &OperatorIdentity) -> Result<(), TickError> {
		let pending = self.app.pending_oracle_sets(&identity.bridger_addr).await?;
		if pending.is_empty() {
			return Ok(());
		}

		let mut confirms = Vec::with_capacity(pending.len());
		for oracle_set in &pending {
			let digest = checkpoint_digest(&self.gravity_id, oracle_set)?;
			let signature = identity.external_account.sign(digest.as_slice().try_into().expect("keccak256 output is 32 bytes")).await?;
			confirms.push(ConfirmMessage::OracleSet(OracleSetConfirm {
				nonce: oracle_set.nonce,
				external_address: identity.external_addr,
				bridger_addr: identity.bridger_addr.clone(),
				signature,
			}));
			self.metrics.update_oracle_set_sign.inc();
		}
		confirms.sort_by_key(|c| c.nonce());

		for chunk in confirms.chunks(MAX_BATCH_MSGS) {
			let messages: Vec<OutboundMessage> = chunk.iter().cloned().map(OutboundMessage::from).collect();
			let result = self.app.broadcast(&identity.bridger_addr, &messages).await?;
			if !result.is_success() {
				return Err(TickError::Transient(format!("oracle-set confirm broadcast rejected with code {}", result.code)));
			}
		}
		Ok(())
	}

	async fn confirm_batch(&self, identity: &OperatorIdentity) -> Result<(), TickError> {
		let Some(batch) = self.app.pending_batch(&identity.bridger_addr).await? else {
			return Ok(());
		};

		let digest = batch_digest(&self.gravity_id, &batch)?;
		let signature = identity.external_account.sign(digest.as_slice().try_into().expect("keccak256 output is 32 bytes")).await?;
		let confirm = ConfirmMessage::Batch(ConfirmBatch {
			batch_nonce: batch.batch_nonce,
			token_contract: batch.token_contract,
			external_address: identity.external_addr,
			bridger_addr: identity.bridger_addr.clone(),
			signature,
		});
		self.metrics.submit_batch_sign.inc();

		let result = self.app.broadcast(&identity.bridger_addr, &[OutboundMessage::from(confirm)]).await?;
		if !result.is_success() {
			return Err(TickError::Transient(format!("batch confirm broadcast rejected with code {}", result.code)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::U256;
	use bridge_account::{LocalAppAccount, LocalExternalAccount};
	use bridge_delivery::testing::FakeAppChainAdapter;
	use bridge_delivery::AppChainAdapter as _;
	use bridge_types::{BatchTransaction, ExternalAddress, OracleSetMember, OracleStatus, PendingBatch, PendingOracleSet, SecretString};
	use std::sync::Arc as StdArc;

	const TEST_KEY_HEX: &str = "c87509a1c067bbde78beb793060c4104c1f7f3f2b7c7f6c7a4a7a7a6e8c8b1a";

	fn test_identity() -> OperatorIdentity {
		let empty = SecretString::from("");
		let app_account = LocalAppAccount::load(TEST_KEY_HEX, &empty, None, "fx").unwrap();
		let external_account = LocalExternalAccount::load(TEST_KEY_HEX, &empty, None).unwrap();
		OperatorIdentity::new(StdArc::new(app_account), StdArc::new(external_account), ExternalAddress([0x11; 20]))
	}

	fn metrics() -> Arc<Metrics> {
		Arc::new(Metrics::new(&prometheus::Registry::new()).unwrap())
	}

	#[tokio::test]
	async fn skips_the_tick_when_the_signer_is_offline() {
		let identity = test_identity();
		let offline = OracleStatus { online: false, external_address: identity.external_addr };
		let app = Arc::new(FakeAppChainAdapter::new(offline, "tron"));
		let pipeline = SignerPipeline::new(app.clone(), metrics(), "tron".into());

		pipeline.tick(&identity).await.unwrap();
		assert!(app.broadcasts().is_empty());
	}

	#[tokio::test]
	async fn fatal_when_external_address_mismatches_key_b() {
		// S6: app-chain records a different external address than key B derives.
		let identity = test_identity();
		let wrong = OracleStatus { online: true, external_address: ExternalAddress([0xFF; 20]) };
		let app = Arc::new(FakeAppChainAdapter::new(wrong, "tron"));
		let pipeline = SignerPipeline::new(app.clone(), metrics(), "tron".into());

		let err = pipeline.tick(&identity).await.unwrap_err();
		assert!(matches!(err, TickError::Fatal(_)));
		assert!(app.broadcasts().is_empty());
	}

	#[tokio::test]
	async fn signs_and_submits_a_pending_batch_confirm() {
		let identity = test_identity();
		let online = OracleStatus { online: true, external_address: identity.external_addr };
		let app = Arc::new(FakeAppChainAdapter::new(online, "tron"));
		app.set_pending_batch(Some(PendingBatch {
			batch_nonce: U256::from(4u64),
			token_contract: ExternalAddress([0xAA; 20]),
			batch_timeout: U256::from(1000u64),
			fee_receive: ExternalAddress([0xBB; 20]),
			transactions: vec![BatchTransaction {
				id: U256::from(1u64),
				destination: ExternalAddress([0xCC; 20]),
				amount: U256::from(2_000_000_000u64),
				fee: U256::from(10_000_000u64),
			}],
		}));
		let pipeline = SignerPipeline::new(app.clone(), metrics(), "tron".into());

		pipeline.tick(&identity).await.unwrap();

		let broadcasts = app.broadcasts();
		assert_eq!(broadcasts.len(), 1);
		assert_eq!(broadcasts[0].len(), 1);
	}

	#[tokio::test]
	async fn oracle_set_confirms_are_sorted_by_nonce_ascending() {
		let identity = test_identity();
		let online = OracleStatus { online: true, external_address: identity.external_addr };
		let app = Arc::new(FakeAppChainAdapter::new(online, "tron"));
		let member = OracleSetMember { external_address: ExternalAddress([1u8; 20]), power: 1 };
		app.set_pending_oracle_sets(vec![
			PendingOracleSet { nonce: U256::from(9u64), height: 1, members: vec![member.clone()] },
			PendingOracleSet { nonce: U256::from(2u64), height: 1, members: vec![member] },
		]);
		let pipeline = SignerPipeline::new(app.clone(), metrics(), "tron".into());

		pipeline.tick(&identity).await.unwrap();

		let broadcasts = app.broadcasts();
		assert_eq!(broadcasts.len(), 1);
		let sent = &broadcasts[0];
		assert_eq!(sent.len(), 2);
		let nonces: Vec<U256> = sent
			.iter()
			.map(|m| match m {
				OutboundMessage::Confirm(ConfirmMessage::OracleSet(c)) => c.nonce,
				other => panic!("unexpected message: {other:?}"),
			})
			.collect();
		assert_eq!(nonces, vec![U256::from(2u64), U256::from(9u64)]);
	}

	#[tokio::test]
	async fn no_broadcast_when_nothing_is_pending() {
		let identity = test_identity();
		let online = OracleStatus { online: true, external_address: identity.external_addr };
		let app = Arc::new(FakeAppChainAdapter::new(online, "tron"));
		let pipeline = SignerPipeline::new(app.clone(), metrics(), "tron".into());

		pipeline.tick(&identity).await.unwrap();
		assert!(app.broadcasts().is_empty());
	}
}
