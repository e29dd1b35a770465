use primitive_types::{H160, H256, U256};

use crate::statedb::StateDB;

/// Whether the account holds enough ether for the transfer.
pub type CanTransferFn = fn(&dyn StateDB, H160, U256) -> bool;
/// Move ether from one account to the other.
pub type TransferFn = fn(&mut dyn StateDB, H160, H160, U256);
/// Hash of the block with the given number.
pub type GetHashFn = Box<dyn Fn(u64) -> H256>;

/// Block-level information and transfer hooks, fixed for the lifetime of
/// one VM.
pub struct BlockContext {
	pub can_transfer: CanTransferFn,
	pub transfer: TransferFn,
	pub get_hash: GetHashFn,

	/// Provides information for COINBASE.
	pub coinbase: H160,
	/// Provides information for GASLIMIT.
	pub gas_limit: u64,
	/// Provides information for NUMBER.
	pub number: U256,
	/// Provides information for TIMESTAMP.
	pub time: u64,
	/// Provides information for DIFFICULTY.
	pub difficulty: U256,
	/// Provides information for BASEFEE.
	pub base_fee: U256,
	/// Provides information for PREVRANDAO.
	pub random: Option<H256>,
	/// ExcessBlobGas field of the header, for blob-fee computation by the
	/// embedder.
	pub excess_blob_gas: Option<u64>,
}

pub fn default_can_transfer(db: &dyn StateDB, address: H160, value: U256) -> bool {
	db.balance(address) >= value
}

pub fn default_transfer(db: &mut dyn StateDB, sender: H160, recipient: H160, value: U256) {
	db.sub_balance(sender, value);
	db.add_balance(recipient, value);
}

impl Default for BlockContext {
	fn default() -> Self {
		Self {
			can_transfer: default_can_transfer,
			transfer: default_transfer,
			get_hash: Box::new(|_| H256::zero()),
			coinbase: H160::zero(),
			gas_limit: u64::MAX,
			number: U256::zero(),
			time: 0,
			difficulty: U256::zero(),
			base_fee: U256::zero(),
			random: None,
			excess_blob_gas: None,
		}
	}
}

/// Per-transaction information.
#[derive(Clone, Debug, Default)]
pub struct TxContext {
	/// Provides information for ORIGIN.
	pub origin: H160,
	/// Provides information for GASPRICE.
	pub gas_price: U256,
	/// Provides information for BLOBHASH.
	pub blob_hashes: Vec<H256>,
}
