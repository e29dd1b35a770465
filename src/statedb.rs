use primitive_types::{H160, H256, U256};

/// A log record emitted by LOG0..LOG4.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Log {
	/// Address of the contract that generated the event.
	pub address: H160,
	/// Topics provided by the contract.
	pub topics: Vec<H256>,
	/// Data supplied by the contract, usually ABI-encoded.
	pub data: Vec<u8>,
	/// Block in which the transaction was included.
	pub block_number: u64,
}

/// The versioned account-state store the VM executes against.
///
/// Implemented by the embedder. All operations are synchronous and the VM
/// serialises its calls. Mutations performed after a [`snapshot`] must be
/// undone in full by [`revert_to_snapshot`]: balances, nonces, code,
/// storage, transient storage, access lists, refunds, logs and the
/// selfdestruct set. Snapshots nest.
///
/// [`snapshot`]: StateDB::snapshot
/// [`revert_to_snapshot`]: StateDB::revert_to_snapshot
pub trait StateDB {
	fn create_account(&mut self, address: H160);

	fn sub_balance(&mut self, address: H160, value: U256);
	fn add_balance(&mut self, address: H160, value: U256);
	fn balance(&self, address: H160) -> U256;

	fn nonce(&self, address: H160) -> u64;
	fn set_nonce(&mut self, address: H160, nonce: u64);

	fn code_hash(&self, address: H160) -> H256;
	fn code(&self, address: H160) -> Vec<u8>;
	fn set_code(&mut self, address: H160, code: Vec<u8>);
	fn code_size(&self, address: H160) -> usize;

	fn add_refund(&mut self, gas: u64);
	fn sub_refund(&mut self, gas: u64);
	fn refund(&self) -> u64;

	/// Value of the slot as of the last commit, ignoring writes made by the
	/// current transaction.
	fn committed_storage(&self, address: H160, key: H256) -> H256;
	/// Current value of the slot, including uncommitted writes.
	fn storage(&self, address: H160, key: H256) -> H256;
	fn set_storage(&mut self, address: H160, key: H256, value: H256);

	fn transient_storage(&self, address: H160, key: H256) -> H256;
	fn set_transient_storage(&mut self, address: H160, key: H256, value: H256);

	fn self_destruct(&mut self, address: H160);
	fn has_self_destructed(&self, address: H160) -> bool;
	/// EIP-6780 variant: delete the account only if it was created within
	/// the current transaction.
	fn self_destruct_6780(&mut self, address: H160);

	/// Whether the account exists in state. Also true for accounts
	/// self-destructed within this transaction.
	fn exists(&self, address: H160) -> bool;
	/// Whether the account is empty in the EIP-161 sense
	/// (balance = nonce = code = 0).
	fn is_empty(&self, address: H160) -> bool;

	fn address_in_access_list(&self, address: H160) -> bool;
	/// Returns `(address_present, slot_present)`.
	fn slot_in_access_list(&self, address: H160, slot: H256) -> (bool, bool);
	/// Safe to call even when the access-list fork is not active.
	fn add_address_to_access_list(&mut self, address: H160);
	/// Safe to call even when the access-list fork is not active.
	fn add_slot_to_access_list(&mut self, address: H160, slot: H256);

	fn snapshot(&mut self) -> usize;
	fn revert_to_snapshot(&mut self, id: usize);

	fn add_log(&mut self, log: Log);
	fn add_preimage(&mut self, hash: H256, preimage: Vec<u8>);
}
