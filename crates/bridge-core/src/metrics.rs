//! The Prometheus gauges/counters named in §6, registered once and shared by
//! both pipelines. `bridge-service` owns the HTTP exposition; this module
//! only owns the metric handles.

use prometheus::{Gauge, IntCounter, Registry};

pub struct Metrics {
	pub sync_block_height: Gauge,
	pub query_log_block_interval: Gauge,
	pub fx_key_balance: Gauge,
	pub msg_pending_count: IntCounter,
	pub update_oracle_set_sign: IntCounter,
	pub submit_batch_sign: IntCounter,
}

impl Metrics {
	pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
		let sync_block_height = Gauge::new("sync_block_height", "highest external-chain block fully submitted")?;
		let query_log_block_interval = Gauge::new("query_log_block_interval", "blocks between checkpoint and scan end")?;
		let fx_key_balance = Gauge::new("fx_key_balance", "app-chain balance of the configured fee denom")?;
		let msg_pending_count = IntCounter::new("msg_pending_count", "claim messages flushed to the app-chain")?;
		let update_oracle_set_sign = IntCounter::new("update_oracle_set_sign", "oracle-set confirms signed")?;
		let submit_batch_sign = IntCounter::new("submit_batch_sign", "batch confirms signed")?;

		registry.register(Box::new(sync_block_height.clone()))?;
		registry.register(Box::new(query_log_block_interval.clone()))?;
		registry.register(Box::new(fx_key_balance.clone()))?;
		registry.register(Box::new(msg_pending_count.clone()))?;
		registry.register(Box::new(update_oracle_set_sign.clone()))?;
		registry.register(Box::new(submit_batch_sign.clone()))?;

		Ok(Self {
			sync_block_height,
			query_log_block_interval,
			fx_key_balance,
			msg_pending_count,
			update_oracle_set_sign,
			submit_batch_sign,
		})
	}
}
