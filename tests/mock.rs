//! In-memory `StateDB` used by the integration tests. Snapshots are whole
//! world copies, so nested revert behaves exactly like a journal without
//! needing one.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};

use embervm::{Log, StateDB, EMPTY_CODE_HASH};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MockAccount {
	pub balance: U256,
	pub nonce: u64,
	pub code: Vec<u8>,
	pub storage: BTreeMap<H256, H256>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct World {
	accounts: BTreeMap<H160, MockAccount>,
	transient: BTreeMap<(H160, H256), H256>,
	refund: u64,
	logs: Vec<Log>,
	destructed: BTreeSet<H160>,
	created: BTreeSet<H160>,
	access_addresses: BTreeSet<H160>,
	access_slots: BTreeSet<(H160, H256)>,
	preimages: BTreeMap<H256, Vec<u8>>,
}

#[derive(Clone, Debug, Default)]
pub struct MockStateDB {
	world: World,
	/// Storage as of the last commit, for `committed_storage`.
	committed: BTreeMap<(H160, H256), H256>,
	snapshots: Vec<World>,
}

impl MockStateDB {
	pub fn new() -> Self {
		Self::default()
	}

	/// Install an account before the transaction under test runs.
	pub fn seed_account(&mut self, address: H160, account: MockAccount) {
		for (key, value) in &account.storage {
			self.committed.insert((address, *key), *value);
		}
		self.world.accounts.insert(address, account);
	}

	pub fn seed_balance(&mut self, address: H160, balance: U256) {
		self.world.accounts.entry(address).or_default().balance = balance;
	}

	pub fn seed_code(&mut self, address: H160, code: Vec<u8>) {
		self.world.accounts.entry(address).or_default().code = code;
	}

	pub fn logs(&self) -> &[Log] {
		&self.world.logs
	}

	pub fn preimages(&self) -> &BTreeMap<H256, Vec<u8>> {
		&self.world.preimages
	}

	pub fn account(&self, address: H160) -> MockAccount {
		self.world.accounts.get(&address).cloned().unwrap_or_default()
	}
}

impl StateDB for MockStateDB {
	fn create_account(&mut self, address: H160) {
		self.world.accounts.entry(address).or_default();
		self.world.created.insert(address);
	}

	fn sub_balance(&mut self, address: H160, value: U256) {
		let account = self.world.accounts.entry(address).or_default();
		account.balance = account.balance.saturating_sub(value);
	}

	fn add_balance(&mut self, address: H160, value: U256) {
		let account = self.world.accounts.entry(address).or_default();
		account.balance = account.balance.saturating_add(value);
	}

	fn balance(&self, address: H160) -> U256 {
		self.world
			.accounts
			.get(&address)
			.map(|a| a.balance)
			.unwrap_or_default()
	}

	fn nonce(&self, address: H160) -> u64 {
		self.world
			.accounts
			.get(&address)
			.map(|a| a.nonce)
			.unwrap_or_default()
	}

	fn set_nonce(&mut self, address: H160, nonce: u64) {
		self.world.accounts.entry(address).or_default().nonce = nonce;
	}

	fn code_hash(&self, address: H160) -> H256 {
		match self.world.accounts.get(&address) {
			None => H256::zero(),
			Some(account) if account.code.is_empty() => EMPTY_CODE_HASH,
			Some(account) => H256::from_slice(Keccak256::digest(&account.code).as_slice()),
		}
	}

	fn code(&self, address: H160) -> Vec<u8> {
		self.world
			.accounts
			.get(&address)
			.map(|a| a.code.clone())
			.unwrap_or_default()
	}

	fn set_code(&mut self, address: H160, code: Vec<u8>) {
		self.world.accounts.entry(address).or_default().code = code;
	}

	fn code_size(&self, address: H160) -> usize {
		self.world
			.accounts
			.get(&address)
			.map(|a| a.code.len())
			.unwrap_or_default()
	}

	fn add_refund(&mut self, gas: u64) {
		self.world.refund += gas;
	}

	fn sub_refund(&mut self, gas: u64) {
		self.world.refund -= gas;
	}

	fn refund(&self) -> u64 {
		self.world.refund
	}

	fn committed_storage(&self, address: H160, key: H256) -> H256 {
		self.committed
			.get(&(address, key))
			.copied()
			.unwrap_or_default()
	}

	fn storage(&self, address: H160, key: H256) -> H256 {
		self.world
			.accounts
			.get(&address)
			.and_then(|a| a.storage.get(&key).copied())
			.unwrap_or_default()
	}

	fn set_storage(&mut self, address: H160, key: H256, value: H256) {
		let account = self.world.accounts.entry(address).or_default();
		if value.is_zero() {
			account.storage.remove(&key);
		} else {
			account.storage.insert(key, value);
		}
	}

	fn transient_storage(&self, address: H160, key: H256) -> H256 {
		self.world
			.transient
			.get(&(address, key))
			.copied()
			.unwrap_or_default()
	}

	fn set_transient_storage(&mut self, address: H160, key: H256, value: H256) {
		self.world.transient.insert((address, key), value);
	}

	fn self_destruct(&mut self, address: H160) {
		if let Some(account) = self.world.accounts.get_mut(&address) {
			account.balance = U256::zero();
		}
		self.world.destructed.insert(address);
	}

	fn has_self_destructed(&self, address: H160) -> bool {
		self.world.destructed.contains(&address)
	}

	fn self_destruct_6780(&mut self, address: H160) {
		if self.world.created.contains(&address) {
			self.self_destruct(address);
		}
	}

	fn exists(&self, address: H160) -> bool {
		self.world.accounts.contains_key(&address)
	}

	fn is_empty(&self, address: H160) -> bool {
		match self.world.accounts.get(&address) {
			None => true,
			Some(account) => {
				account.balance.is_zero() && account.nonce == 0 && account.code.is_empty()
			}
		}
	}

	fn address_in_access_list(&self, address: H160) -> bool {
		self.world.access_addresses.contains(&address)
	}

	fn slot_in_access_list(&self, address: H160, slot: H256) -> (bool, bool) {
		(
			self.world.access_addresses.contains(&address),
			self.world.access_slots.contains(&(address, slot)),
		)
	}

	fn add_address_to_access_list(&mut self, address: H160) {
		self.world.access_addresses.insert(address);
	}

	fn add_slot_to_access_list(&mut self, address: H160, slot: H256) {
		self.world.access_addresses.insert(address);
		self.world.access_slots.insert((address, slot));
	}

	fn snapshot(&mut self) -> usize {
		self.snapshots.push(self.world.clone());
		self.snapshots.len() - 1
	}

	fn revert_to_snapshot(&mut self, id: usize) {
		self.world = self.snapshots[id].clone();
		self.snapshots.truncate(id);
	}

	fn add_log(&mut self, log: Log) {
		self.world.logs.push(log);
	}

	fn add_preimage(&mut self, hash: H256, preimage: Vec<u8>) {
		self.world.preimages.entry(hash).or_insert(preimage);
	}
}

#[test]
fn snapshots_nest() {
	let mut db = MockStateDB::new();
	let addr = H160::repeat_byte(1);
	db.seed_balance(addr, U256::from(100));

	let outer = db.snapshot();
	db.add_balance(addr, U256::from(1));
	let inner = db.snapshot();
	db.add_balance(addr, U256::from(1));
	assert_eq!(db.balance(addr), U256::from(102));

	db.revert_to_snapshot(inner);
	assert_eq!(db.balance(addr), U256::from(101));
	db.revert_to_snapshot(outer);
	assert_eq!(db.balance(addr), U256::from(100));
}

#[test]
fn revert_restores_refund_logs_and_access_list() {
	let mut db = MockStateDB::new();
	let addr = H160::repeat_byte(2);

	let snapshot = db.snapshot();
	db.add_refund(100);
	db.add_address_to_access_list(addr);
	db.add_log(Log::default());
	db.set_transient_storage(addr, H256::zero(), H256::repeat_byte(9));

	db.revert_to_snapshot(snapshot);
	assert_eq!(db.refund(), 0);
	assert!(!db.address_in_access_list(addr));
	assert!(db.logs().is_empty());
	assert!(db.transient_storage(addr, H256::zero()).is_zero());
}
