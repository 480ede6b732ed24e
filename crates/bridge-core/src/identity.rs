//! The operator's two key handles and the addresses they resolve to,
//! constructed once at startup and passed by reference into both pipelines
//! (§3, §9 Design Notes).

use bridge_account::{AppAccount, ExternalAccount};
use bridge_types::{BridgerAddress, ExternalAddress};
use std::sync::Arc;

#[derive(Clone)]
pub struct OperatorIdentity {
	pub app_account: Arc<dyn AppAccount>,
	pub external_account: Arc<dyn ExternalAccount>,
	pub bridger_addr: BridgerAddress,
	pub external_addr: ExternalAddress,
	pub bridge_contract: ExternalAddress,
}

impl OperatorIdentity {
	pub fn new(app_account: Arc<dyn AppAccount>, external_account: Arc<dyn ExternalAccount>, bridge_contract: ExternalAddress) -> Self {
		let bridger_addr = app_account.address().clone();
		let external_addr = external_account.address();
		Self { app_account, external_account, bridger_addr, external_addr, bridge_contract }
	}
}
