//! Common types shared across the relayer crates: addresses, decoded bridge
//! events, the claim/confirm messages derived from them, and the chain-adapter
//! read/write shapes.

/// Address newtypes for the external chain and the app-chain.
pub mod address;
/// Shared chain-adapter read/write result shapes.
pub mod chain;
/// Claim messages reported to the app-chain from decoded external-chain events.
pub mod claim;
/// Signer-side confirmations and pending-work shapes.
pub mod confirm;
/// Bridge-contract events decoded from external-chain transaction logs.
pub mod events;
/// Zeroizing wrapper for private key material.
pub mod secret_string;
/// Small shared helpers (hex prefix handling, right-padded field encoding).
pub mod utils;

pub use address::{AddressError, BridgerAddress, ExternalAddress};
pub use chain::{BroadcastResult, ChainParams, OracleStatus};
pub use claim::{
	BridgeTokenClaim, ClaimMessage, OracleSetUpdatedClaim, SendToExternalClaim, SendToFxClaim,
	CHAIN_NAME,
};
pub use confirm::{
	BatchTransaction, ConfirmBatch, ConfirmMessage, OracleSetConfirm, OracleSetMember,
	PendingBatch, PendingOracleSet,
};
pub use events::{
	AddBridgeTokenEvent, BridgeEvent, OracleSetUpdatedEvent, SendToFxEvent,
	TransactionBatchExecutedEvent, TxHash,
};
pub use secret_string::SecretString;
pub use utils::{encode_right_padded_field, without_0x_prefix};
