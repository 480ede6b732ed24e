//! HTTP-backed [`ExternalChainAdapter`], talking to the external chain's
//! full-node JSON query surface.
//!
//! The exact wire schema is the out-of-scope collaborator named in §1 — this
//! implementation is written against a minimal JSON-over-HTTP shape so the
//! transport can be swapped without touching the pipeline code above it.

use crate::events::{decode_block_events, LogRecord, ReceiptResult, TransactionReceipt};
use crate::{ExternalChainAdapter, ExternalChainError};
use async_trait::async_trait;
use bridge_types::ExternalAddress;
use std::time::Duration;

pub struct HttpExternalChainAdapter {
	client: reqwest::Client,
	base_url: String,
}

impl HttpExternalChainAdapter {
	pub fn new(base_url: impl Into<String>) -> Self {
		let client = reqwest::Client::builder()
			.connect_timeout(Duration::from_secs(5))
			.timeout(Duration::from_secs(15))
			.build()
			.expect("reqwest client configuration is static and valid");
		Self { client, base_url: base_url.into() }
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{path}", self.base_url.trim_end_matches('/'))
	}

	async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value, ExternalChainError> {
		self.client
			.post(self.url(path))
			.json(&body)
			.send()
			.await
			.map_err(|e| ExternalChainError::Transient(e.to_string()))?
			.json::<serde_json::Value>()
			.await
			.map_err(|e| ExternalChainError::Malformed(e.to_string()))
	}
}

#[async_trait]
impl ExternalChainAdapter for HttpExternalChainAdapter {
	async fn head_height(&self) -> Result<u64, ExternalChainError> {
		let body = self.post_json("wallet/getnowblock", serde_json::json!({})).await?;
		body.pointer("/block_header/raw_data/number")
			.and_then(|v| v.as_u64())
			.ok_or_else(|| ExternalChainError::Malformed("missing block_header.raw_data.number".into()))
	}

	async fn block_events(
		&self,
		contract: ExternalAddress,
		height: u64,
	) -> Result<Vec<bridge_types::BridgeEvent>, ExternalChainError> {
		let body = self
			.post_json("wallet/gettransactioninfobyblocknum", serde_json::json!({ "num": height }))
			.await?;
		let receipts = parse_receipts(&body)?;
		Ok(decode_block_events(contract, &receipts))
	}
}

fn parse_receipts(body: &serde_json::Value) -> Result<Vec<TransactionReceipt>, ExternalChainError> {
	let entries = body
		.as_array()
		.ok_or_else(|| ExternalChainError::Malformed("expected a json array of transaction infos".into()))?;

	entries
		.iter()
		.map(|entry| {
			let tx_id = hex_field(entry, "id")?;
			let result = match entry.get("receipt").and_then(|r| r.get("result")).and_then(|v| v.as_str()) {
				Some("SUCCESS") => ReceiptResult::Success,
				_ => ReceiptResult::Failed,
			};
			let contract_address = entry
				.get("contract_address")
				.and_then(|v| v.as_str())
				.and_then(|s| hex_bytes::<20>(s).ok());
			let logs = entry
				.get("log")
				.and_then(|v| v.as_array())
				.map(|logs| logs.iter().map(parse_log).collect::<Result<Vec<_>, _>>())
				.transpose()?
				.unwrap_or_default();
			Ok(TransactionReceipt { tx_id, result, contract_address, logs })
		})
		.collect()
}

fn parse_log(log: &serde_json::Value) -> Result<LogRecord, ExternalChainError> {
	let address = log
		.get("address")
		.and_then(|v| v.as_str())
		.ok_or_else(|| ExternalChainError::Malformed("log missing address".into()))
		.and_then(|s| hex_bytes::<20>(s))?;
	let topics = log
		.get("topics")
		.and_then(|v| v.as_array())
		.ok_or_else(|| ExternalChainError::Malformed("log missing topics".into()))?
		.iter()
		.map(|t| t.as_str().ok_or_else(|| ExternalChainError::Malformed("topic is not a string".into())).and_then(hex_bytes::<32>))
		.collect::<Result<Vec<_>, _>>()?;
	let data = log
		.get("data")
		.and_then(|v| v.as_str())
		.map(hex::decode)
		.transpose()
		.map_err(|e| ExternalChainError::Malformed(e.to_string()))?
		.unwrap_or_default();
	Ok(LogRecord { address, topics, data })
}

fn hex_field<const N: usize>(entry: &serde_json::Value, field: &str) -> Result<[u8; N], ExternalChainError> {
	let s = entry
		.get(field)
		.and_then(|v| v.as_str())
		.ok_or_else(|| ExternalChainError::Malformed(format!("missing field {field}")))?;
	hex_bytes::<N>(s)
}

fn hex_bytes<const N: usize>(s: &str) -> Result<[u8; N], ExternalChainError> {
	let decoded = hex::decode(bridge_types::without_0x_prefix(s))
		.map_err(|e| ExternalChainError::Malformed(e.to_string()))?;
	decoded
		.try_into()
		.map_err(|v: Vec<u8>| ExternalChainError::Malformed(format!("expected {N} bytes, got {}", v.len())))
}
