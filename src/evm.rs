//! The call/create dispatcher. Entrypoints take a snapshot, route to a
//! precompile or build an interpreter frame, and either keep or roll back
//! the accumulated state mutations depending on how the frame exits.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hex_literal::hex;
use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};

use embervm_precompile::{self as precompile, PrecompiledContract};

use crate::contract::{AnalysisCache, Contract};
use crate::context::{BlockContext, TxContext};
use crate::error::Error;
use crate::interpreter::Config;
use crate::jump_table::{
	new_berlin_instruction_set, new_byzantium_instruction_set, new_cancun_instruction_set,
	new_constantinople_instruction_set, new_frontier_instruction_set,
	new_homestead_instruction_set, new_istanbul_instruction_set, new_london_instruction_set,
	new_merge_instruction_set, new_shanghai_instruction_set,
	new_spurious_dragon_instruction_set, new_tangerine_whistle_instruction_set, JumpTable,
};
use crate::opcode::Opcode;
use crate::params;
use crate::rules::Rules;
use crate::statedb::StateDB;
use crate::eips;

/// Hash of the empty byte string, the code hash of an account without code.
pub const EMPTY_CODE_HASH: H256 = H256(hex!(
	"c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
));

/// Contract address for a CREATE by `caller` at `nonce`:
/// `keccak(rlp([caller, nonce]))[12..]`.
#[must_use]
pub fn create_address(caller: H160, nonce: u64) -> H160 {
	let mut stream = rlp::RlpStream::new_list(2);
	stream.append(&caller);
	stream.append(&nonce);
	H256::from_slice(Keccak256::digest(&stream.out()).as_slice()).into()
}

/// Contract address for a CREATE2:
/// `keccak(0xff ++ caller ++ salt ++ keccak(initcode))[12..]`.
#[must_use]
pub fn create_address2(caller: H160, salt: H256, init_code_hash: H256) -> H160 {
	let mut hasher = Keccak256::new();
	hasher.update([0xff]);
	hasher.update(caller.as_bytes());
	hasher.update(salt.as_bytes());
	hasher.update(init_code_hash.as_bytes());
	H256::from_slice(hasher.finalize().as_slice()).into()
}

fn select_instruction_set(rules: &Rules) -> JumpTable {
	if rules.is_cancun {
		new_cancun_instruction_set()
	} else if rules.is_shanghai {
		new_shanghai_instruction_set()
	} else if rules.is_merge {
		new_merge_instruction_set()
	} else if rules.is_london {
		new_london_instruction_set()
	} else if rules.is_berlin {
		new_berlin_instruction_set()
	} else if rules.is_istanbul {
		new_istanbul_instruction_set()
	} else if rules.is_petersburg || rules.is_constantinople {
		new_constantinople_instruction_set()
	} else if rules.is_byzantium {
		new_byzantium_instruction_set()
	} else if rules.is_eip158 {
		new_spurious_dragon_instruction_set()
	} else if rules.is_eip150 {
		new_tangerine_whistle_instruction_set()
	} else if rules.is_homestead {
		new_homestead_instruction_set()
	} else {
		new_frontier_instruction_set()
	}
}

fn select_precompiles(rules: &Rules) -> BTreeMap<H160, Box<dyn PrecompiledContract>> {
	if rules.is_cancun {
		precompile::cancun()
	} else if rules.is_berlin {
		precompile::berlin()
	} else if rules.is_istanbul {
		precompile::istanbul()
	} else if rules.is_byzantium {
		precompile::byzantium()
	} else {
		precompile::homestead()
	}
}

/// Deduct the precompile's gas requirement and run it.
fn run_precompiled(
	p: &dyn PrecompiledContract,
	input: &[u8],
	supplied_gas: u64,
) -> (Vec<u8>, u64, Result<(), Error>) {
	let gas_cost = p.required_gas(input);
	if supplied_gas < gas_cost {
		return (Vec::new(), 0, Err(Error::OutOfGas));
	}
	let remaining = supplied_gas - gas_cost;
	match p.run(input) {
		Ok(output) => (output, remaining, Ok(())),
		Err(err) => (Vec::new(), remaining, Err(Error::Other(err.0))),
	}
}

/// The EVM facade. One instance drives one transaction's call tree to
/// completion; construct a fresh one (or [`reset`](Evm::reset)) per
/// transaction.
pub struct Evm<'a> {
	/// Block-level context.
	pub context: BlockContext,
	/// Transaction-level context.
	pub tx_context: TxContext,
	/// The account-state store all execution runs against.
	pub state: &'a mut dyn StateDB,
	/// Interpreter configuration.
	pub config: Config,

	pub(crate) rules: Rules,
	pub(crate) table: JumpTable,
	precompiles: BTreeMap<H160, Box<dyn PrecompiledContract>>,
	pub(crate) depth: usize,
	abort: Arc<AtomicBool>,
	/// Gas granted to the pending child call, set by the CALL-family
	/// dynamic gas (the 63/64 rule runs there, the opcode body consumes
	/// the result).
	pub(crate) call_gas_temp: u64,
	pub(crate) read_only: bool,
	pub(crate) return_data: Vec<u8>,
	jumpdests: AnalysisCache,
}

impl<'a> Evm<'a> {
	/// Construct a VM for one transaction.
	pub fn new(
		context: BlockContext,
		tx_context: TxContext,
		state: &'a mut dyn StateDB,
		rules: Rules,
		config: Config,
	) -> Self {
		let mut context = context;
		if config.no_base_fee && tx_context.gas_price.is_zero() {
			context.base_fee = U256::zero();
		}

		let mut table = select_instruction_set(&rules);
		let mut config = config;
		let mut activated = Vec::with_capacity(config.extra_eips.len());
		for eip in &config.extra_eips {
			// Failed activations are dropped so callers can inspect what
			// actually took effect.
			if eips::enable_eip(*eip, &mut table).is_ok() {
				activated.push(*eip);
			}
		}
		config.extra_eips = activated;

		let precompiles = select_precompiles(&rules);

		Self {
			context,
			tx_context,
			state,
			config,
			rules,
			table,
			precompiles,
			depth: 0,
			abort: Arc::new(AtomicBool::new(false)),
			call_gas_temp: 0,
			read_only: false,
			return_data: Vec::new(),
			jumpdests: AnalysisCache::default(),
		}
	}

	/// The fork rules this VM was constructed with.
	#[must_use]
	pub fn chain_rules(&self) -> &Rules {
		&self.rules
	}

	/// Reuse the VM for the next transaction. Not thread-safe.
	pub fn reset(&mut self, tx_context: TxContext, state: &'a mut dyn StateDB) {
		self.tx_context = tx_context;
		self.state = state;
		self.jumpdests = AnalysisCache::default();
		self.return_data.clear();
	}

	/// Abort any running operation. May be called concurrently and more
	/// than once; the flag is observed at JUMP/JUMPI and stays set.
	pub fn cancel(&self) {
		self.abort.store(true, Ordering::SeqCst);
	}

	/// Whether [`cancel`](Evm::cancel) has been called.
	#[must_use]
	pub fn cancelled(&self) -> bool {
		self.abort.load(Ordering::SeqCst)
	}

	/// Shared handle to the abort flag, for timers on other threads.
	#[must_use]
	pub fn cancel_signal(&self) -> Arc<AtomicBool> {
		self.abort.clone()
	}

	fn trace_start(&mut self, from: H160, to: H160, create: bool, input: &[u8], gas: u64, value: U256) {
		if let Some(tracer) = self.config.tracer.as_deref_mut() {
			tracer.capture_start(from, to, create, input, gas, value);
		}
	}

	fn trace_end(&mut self, output: &[u8], gas_used: u64, err: Option<&Error>) {
		if let Some(tracer) = self.config.tracer.as_deref_mut() {
			tracer.capture_end(output, gas_used, err);
		}
	}

	fn trace_enter(&mut self, typ: Opcode, from: H160, to: H160, input: &[u8], gas: u64, value: U256) {
		if let Some(tracer) = self.config.tracer.as_deref_mut() {
			tracer.capture_enter(typ, from, to, input, gas, value);
		}
	}

	fn trace_exit(&mut self, output: &[u8], gas_used: u64, err: Option<&Error>) {
		if let Some(tracer) = self.config.tracer.as_deref_mut() {
			tracer.capture_exit(output, gas_used, err);
		}
	}

	fn trace_frame_start(&mut self, typ: Opcode, from: H160, to: H160, create: bool, input: &[u8], gas: u64, value: U256) {
		if self.depth == 0 {
			self.trace_start(from, to, create, input, gas, value);
		} else {
			self.trace_enter(typ, from, to, input, gas, value);
		}
	}

	fn trace_frame_end(&mut self, output: &[u8], gas_used: u64, err: Option<&Error>) {
		if self.depth == 0 {
			self.trace_end(output, gas_used, err);
		} else {
			self.trace_exit(output, gas_used, err);
		}
	}

	/// Execute the contract at `addr` with the given input, transferring
	/// `value` from `caller` first.
	///
	/// Returns the output, the gas left, and the verdict. Any failure but
	/// [`Error::Reverted`] consumes all remaining gas and rolls back every
	/// state change of the call.
	pub fn call(
		&mut self,
		caller: H160,
		addr: H160,
		input: &[u8],
		gas: u64,
		value: U256,
	) -> (Vec<u8>, u64, Result<(), Error>) {
		let mut gas = gas;
		if self.depth > params::CALL_CREATE_DEPTH {
			return (Vec::new(), gas, Err(Error::Depth));
		}
		if !value.is_zero() && !(self.context.can_transfer)(&*self.state, caller, value) {
			return (Vec::new(), gas, Err(Error::InsufficientBalance));
		}
		let snapshot = self.state.snapshot();
		let is_precompile = self.precompiles.contains_key(&addr);
		let debug = self.config.tracer.is_some();

		if !self.state.exists(addr) {
			if !is_precompile && self.rules.is_eip158 && value.is_zero() {
				// Calling a non-existent account with no value is a no-op;
				// no account is created.
				if debug {
					self.trace_frame_start(Opcode::CALL, caller, addr, false, input, gas, value);
					self.trace_frame_end(&[], 0, None);
				}
				return (Vec::new(), gas, Ok(()));
			}
			self.state.create_account(addr);
		}
		(self.context.transfer)(&mut *self.state, caller, addr, value);

		if debug {
			self.trace_frame_start(Opcode::CALL, caller, addr, false, input, gas, value);
		}
		let start_gas = gas;

		let (mut ret, res) = if let Some(p) = self.precompiles.get(&addr) {
			let (ret, gas_left, res) = run_precompiled(p.as_ref(), input, gas);
			gas = gas_left;
			(ret, res)
		} else {
			let code = self.state.code(addr);
			if code.is_empty() {
				(Vec::new(), Ok(()))
			} else {
				let code_hash = self.state.code_hash(addr);
				let mut contract =
					Contract::new(caller, addr, value, gas, self.jumpdests.clone());
				contract.set_call_code(addr, code_hash, code);
				let (ret, res) = self.run(&mut contract, input, false);
				gas = contract.gas;
				(ret, res)
			}
		};

		if let Err(err) = &res {
			self.state.revert_to_snapshot(snapshot);
			if *err != Error::Reverted {
				gas = 0;
				ret = Vec::new();
			}
		}
		if debug {
			self.trace_frame_end(&ret, start_gas - gas, res.as_ref().err());
		}
		(ret, gas, res)
	}

	/// CALLCODE: execute `addr`'s code against the caller's own storage
	/// context.
	pub fn call_code(
		&mut self,
		caller: H160,
		addr: H160,
		input: &[u8],
		gas: u64,
		value: U256,
	) -> (Vec<u8>, u64, Result<(), Error>) {
		let mut gas = gas;
		if self.depth > params::CALL_CREATE_DEPTH {
			return (Vec::new(), gas, Err(Error::Depth));
		}
		if !(self.context.can_transfer)(&*self.state, caller, value) {
			return (Vec::new(), gas, Err(Error::InsufficientBalance));
		}
		let snapshot = self.state.snapshot();

		self.trace_enter(Opcode::CALLCODE, caller, addr, input, gas, value);
		let start_gas = gas;

		let (mut ret, res) = if let Some(p) = self.precompiles.get(&addr) {
			let (ret, gas_left, res) = run_precompiled(p.as_ref(), input, gas);
			gas = gas_left;
			(ret, res)
		} else {
			let code = self.state.code(addr);
			let code_hash = self.state.code_hash(addr);
			let mut contract = Contract::new(caller, caller, value, gas, self.jumpdests.clone());
			contract.set_call_code(addr, code_hash, code);
			let (ret, res) = self.run(&mut contract, input, false);
			gas = contract.gas;
			(ret, res)
		};

		if let Err(err) = &res {
			self.state.revert_to_snapshot(snapshot);
			if *err != Error::Reverted {
				gas = 0;
				ret = Vec::new();
			}
		}
		self.trace_exit(&ret, start_gas - gas, res.as_ref().err());
		(ret, gas, res)
	}

	/// DELEGATECALL: execute `addr`'s code in the parent frame's storage
	/// context, inheriting the parent's caller and value.
	pub fn delegate_call(
		&mut self,
		parent: &Contract,
		addr: H160,
		input: &[u8],
		gas: u64,
	) -> (Vec<u8>, u64, Result<(), Error>) {
		let mut gas = gas;
		if self.depth > params::CALL_CREATE_DEPTH {
			return (Vec::new(), gas, Err(Error::Depth));
		}
		let snapshot = self.state.snapshot();

		self.trace_enter(
			Opcode::DELEGATECALL,
			parent.self_address,
			addr,
			input,
			gas,
			parent.value,
		);
		let start_gas = gas;

		// Calling precompiles is allowed, even via delegatecall.
		let (mut ret, res) = if let Some(p) = self.precompiles.get(&addr) {
			let (ret, gas_left, res) = run_precompiled(p.as_ref(), input, gas);
			gas = gas_left;
			(ret, res)
		} else {
			let code = self.state.code(addr);
			let code_hash = self.state.code_hash(addr);
			let mut contract = Contract::new(
				parent.self_address,
				parent.self_address,
				parent.value,
				gas,
				self.jumpdests.clone(),
			)
			.as_delegate(parent);
			contract.set_call_code(addr, code_hash, code);
			let (ret, res) = self.run(&mut contract, input, false);
			gas = contract.gas;
			(ret, res)
		};

		if let Err(err) = &res {
			self.state.revert_to_snapshot(snapshot);
			if *err != Error::Reverted {
				gas = 0;
				ret = Vec::new();
			}
		}
		self.trace_exit(&ret, start_gas - gas, res.as_ref().err());
		(ret, gas, res)
	}

	/// STATICCALL: execute `addr`'s code with all state mutation
	/// forbidden. Any write attempt in the subtree fails with
	/// [`Error::WriteProtection`].
	pub fn static_call(
		&mut self,
		caller: H160,
		addr: H160,
		input: &[u8],
		gas: u64,
	) -> (Vec<u8>, u64, Result<(), Error>) {
		let mut gas = gas;
		if self.depth > params::CALL_CREATE_DEPTH {
			return (Vec::new(), gas, Err(Error::Depth));
		}
		let snapshot = self.state.snapshot();

		// A zero-value balance add: semantically a no-op, but it marks the
		// account touched for the EIP-161 empty-account rules.
		self.state.add_balance(addr, U256::zero());

		self.trace_enter(Opcode::STATICCALL, caller, addr, input, gas, U256::zero());
		let start_gas = gas;

		let (mut ret, res) = if let Some(p) = self.precompiles.get(&addr) {
			let (ret, gas_left, res) = run_precompiled(p.as_ref(), input, gas);
			gas = gas_left;
			(ret, res)
		} else {
			let code = self.state.code(addr);
			let code_hash = self.state.code_hash(addr);
			let mut contract =
				Contract::new(caller, addr, U256::zero(), gas, self.jumpdests.clone());
			contract.set_call_code(addr, code_hash, code);
			let (ret, res) = self.run(&mut contract, input, true);
			gas = contract.gas;
			(ret, res)
		};

		if let Err(err) = &res {
			self.state.revert_to_snapshot(snapshot);
			if *err != Error::Reverted {
				gas = 0;
				ret = Vec::new();
			}
		}
		self.trace_exit(&ret, start_gas - gas, res.as_ref().err());
		(ret, gas, res)
	}

	/// CREATE: deploy `code` as initcode, at the address derived from the
	/// caller and its nonce. Returns the initcode output, the new contract
	/// address, the gas left and the verdict.
	pub fn create(
		&mut self,
		caller: H160,
		code: Vec<u8>,
		gas: u64,
		value: U256,
	) -> (Vec<u8>, H160, u64, Result<(), Error>) {
		let contract_addr = create_address(caller, self.state.nonce(caller));
		self.create_inner(caller, code, H256::zero(), gas, value, contract_addr, Opcode::CREATE)
	}

	/// CREATE2: deploy `code` as initcode at the salt-derived address.
	pub fn create2(
		&mut self,
		caller: H160,
		code: Vec<u8>,
		gas: u64,
		endowment: U256,
		salt: H256,
	) -> (Vec<u8>, H160, u64, Result<(), Error>) {
		let code_hash = H256::from_slice(Keccak256::digest(&code).as_slice());
		let contract_addr = create_address2(caller, salt, code_hash);
		self.create_inner(caller, code, code_hash, gas, endowment, contract_addr, Opcode::CREATE2)
	}

	#[allow(clippy::too_many_arguments)]
	fn create_inner(
		&mut self,
		caller: H160,
		code: Vec<u8>,
		code_hash: H256,
		gas: u64,
		value: U256,
		address: H160,
		typ: Opcode,
	) -> (Vec<u8>, H160, u64, Result<(), Error>) {
		if self.depth > params::CALL_CREATE_DEPTH {
			return (Vec::new(), H160::zero(), gas, Err(Error::Depth));
		}
		if !(self.context.can_transfer)(&*self.state, caller, value) {
			return (Vec::new(), H160::zero(), gas, Err(Error::InsufficientBalance));
		}
		if self.rules.is_shanghai && code.len() as u64 > params::MAX_INIT_CODE_SIZE {
			return (
				Vec::new(),
				H160::zero(),
				gas,
				Err(Error::MaxInitCodeSizeExceeded),
			);
		}
		let nonce = self.state.nonce(caller);
		if nonce.checked_add(1).is_none() {
			return (Vec::new(), H160::zero(), gas, Err(Error::NonceUintOverflow));
		}
		self.state.set_nonce(caller, nonce + 1);
		if self.rules.is_berlin {
			self.state.add_address_to_access_list(address);
		}

		// Fail on an account with a nonce or real code already in place.
		let contract_hash = self.state.code_hash(address);
		if self.state.nonce(address) != 0
			|| (contract_hash != H256::zero() && contract_hash != EMPTY_CODE_HASH)
		{
			return (
				Vec::new(),
				H160::zero(),
				0,
				Err(Error::ContractAddressCollision),
			);
		}

		let snapshot = self.state.snapshot();
		self.state.create_account(address);
		if self.rules.is_eip158 {
			self.state.set_nonce(address, 1);
		}
		(self.context.transfer)(&mut *self.state, caller, address, value);

		let mut contract = Contract::new(caller, address, value, gas, self.jumpdests.clone());
		contract.set_code_optional_hash(address, code, code_hash);

		if self.config.tracer.is_some() {
			self.trace_frame_start(typ, caller, address, true, &contract.code, gas, value);
		}

		let (ret, res) = self.run(&mut contract, &[], false);

		let mut err = res;
		if err.is_ok() && self.rules.is_eip158 && ret.len() as u64 > params::MAX_CODE_SIZE {
			err = Err(Error::MaxCodeSizeExceeded);
		}
		// EIP-3541: reject code starting with the 0xEF byte.
		if err.is_ok() && !ret.is_empty() && ret[0] == 0xEF && self.rules.is_london {
			err = Err(Error::InvalidCode);
		}

		// Charge for storing the returned code; an unaffordable deposit is
		// its own failure mode handled below.
		if err.is_ok() {
			let create_data_gas = ret.len() as u64 * params::CREATE_DATA_GAS;
			if contract.use_gas(create_data_gas) {
				self.state.set_code(address, ret.clone());
			} else {
				err = Err(Error::CodeStoreOutOfGas);
			}
		}

		// Before Homestead a failed code deposit left the empty contract in
		// place and kept the gas.
		if let Err(e) = err.clone() {
			if self.rules.is_homestead || e != Error::CodeStoreOutOfGas {
				self.state.revert_to_snapshot(snapshot);
				if e != Error::Reverted {
					let remaining = contract.gas;
					contract.use_gas(remaining);
				}
			}
		}

		if self.config.tracer.is_some() {
			self.trace_frame_end(&ret, gas - contract.gas, err.as_ref().err());
		}
		(ret, address, contract.gas, err)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn create2_known_vector() {
		// Zero sender, zero salt, empty initcode.
		let addr = create_address2(
			H160::zero(),
			H256::zero(),
			H256::from_slice(Keccak256::digest([]).as_slice()),
		);
		assert_eq!(
			addr,
			H160::from_slice(&hex!("E33C0C7F7df4809055C3ebA6c09CFe4BaF1BD9e0"))
		);
	}

	#[test]
	fn empty_code_hash_constant() {
		assert_eq!(
			EMPTY_CODE_HASH,
			H256::from_slice(Keccak256::digest([]).as_slice())
		);
	}

	#[test]
	fn create_address_depends_on_nonce() {
		let a0 = create_address(H160::zero(), 0);
		let a1 = create_address(H160::zero(), 1);
		assert_ne!(a0, a1);

		// Independent derivation of the same RLP payload.
		let mut stream = rlp::RlpStream::new_list(2);
		stream.append(&H160::zero());
		stream.append(&0u64);
		let expected: H160 =
			H256::from_slice(Keccak256::digest(&stream.out()).as_slice()).into();
		assert_eq!(a0, expected);
	}
}
