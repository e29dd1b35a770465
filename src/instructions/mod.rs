//! Opcode implementations. Each handler runs after the interpreter has
//! validated stack bounds, charged gas and resized memory, so operand pops
//! and memory accesses within the declared ranges cannot fail.

pub mod arithmetic;
pub mod bitwise;

use primitive_types::{H256, U256};
use sha3::{Digest, Keccak256};

use crate::error::Error;
use crate::evm::Evm;
use crate::interpreter::{Control, ScopeContext};
use crate::opcode::Opcode;
use crate::params;
use crate::statedb::Log;
use crate::utils::{address_to_u256, h256_to_u256, u256_to_address, u256_to_h256};

/// Slice `data[start..start+size]`, right-padded with zeros past the end.
fn get_data(data: &[u8], start: u64, size: u64) -> Vec<u8> {
	let len = data.len() as u64;
	let start = start.min(len);
	let end = start.saturating_add(size).min(len);
	let mut ret = vec![0u8; size as usize];
	ret[..(end - start) as usize].copy_from_slice(&data[start as usize..end as usize]);
	ret
}

macro_rules! op2_fn {
	($name:ident, $f:path) => {
		pub(crate) fn $name(
			_pc: &mut u64,
			_evm: &mut Evm<'_>,
			_op: Opcode,
			scope: &mut ScopeContext<'_>,
		) -> Result<Control, Error> {
			let op1 = scope.stack.pop()?;
			let op2 = scope.stack.pop()?;
			scope.stack.push($f(op1, op2))?;
			Ok(Control::Continue)
		}
	};
}

macro_rules! op3_fn {
	($name:ident, $f:path) => {
		pub(crate) fn $name(
			_pc: &mut u64,
			_evm: &mut Evm<'_>,
			_op: Opcode,
			scope: &mut ScopeContext<'_>,
		) -> Result<Control, Error> {
			let op1 = scope.stack.pop()?;
			let op2 = scope.stack.pop()?;
			let op3 = scope.stack.pop()?;
			scope.stack.push($f(op1, op2, op3))?;
			Ok(Control::Continue)
		}
	};
}

fn add(op1: U256, op2: U256) -> U256 {
	op1.overflowing_add(op2).0
}

fn sub(op1: U256, op2: U256) -> U256 {
	op1.overflowing_sub(op2).0
}

fn mul(op1: U256, op2: U256) -> U256 {
	op1.overflowing_mul(op2).0
}

fn lt(op1: U256, op2: U256) -> U256 {
	if op1 < op2 { U256::one() } else { U256::zero() }
}

fn gt(op1: U256, op2: U256) -> U256 {
	if op1 > op2 { U256::one() } else { U256::zero() }
}

fn eq(op1: U256, op2: U256) -> U256 {
	if op1 == op2 { U256::one() } else { U256::zero() }
}

fn and(op1: U256, op2: U256) -> U256 {
	op1 & op2
}

fn or(op1: U256, op2: U256) -> U256 {
	op1 | op2
}

fn xor(op1: U256, op2: U256) -> U256 {
	op1 ^ op2
}

op2_fn!(op_add, add);
op2_fn!(op_sub, sub);
op2_fn!(op_mul, mul);
op2_fn!(op_div, arithmetic::div);
op2_fn!(op_sdiv, arithmetic::sdiv);
op2_fn!(op_mod, arithmetic::rem);
op2_fn!(op_smod, arithmetic::srem);
op2_fn!(op_exp, arithmetic::exp);
op2_fn!(op_signextend, arithmetic::signextend);
op3_fn!(op_addmod, arithmetic::addmod);
op3_fn!(op_mulmod, arithmetic::mulmod);

op2_fn!(op_lt, lt);
op2_fn!(op_gt, gt);
op2_fn!(op_slt, bitwise::slt);
op2_fn!(op_sgt, bitwise::sgt);
op2_fn!(op_eq, eq);
op2_fn!(op_and, and);
op2_fn!(op_or, or);
op2_fn!(op_xor, xor);
op2_fn!(op_byte, bitwise::byte);
op2_fn!(op_shl, bitwise::shl);
op2_fn!(op_shr, bitwise::shr);
op2_fn!(op_sar, bitwise::sar);

pub(crate) fn op_iszero(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let value = scope.stack.pop()?;
	scope.stack.push(if value.is_zero() {
		U256::one()
	} else {
		U256::zero()
	})?;
	Ok(Control::Continue)
}

pub(crate) fn op_not(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let value = scope.stack.pop()?;
	scope.stack.push(!value)?;
	Ok(Control::Continue)
}

pub(crate) fn op_keccak256(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let offset = scope.stack.pop()?;
	let size = scope.stack.pop()?;
	let data = scope.memory.get_ptr(offset.low_u64(), size.low_u64());

	let hash = H256::from_slice(Keccak256::digest(data).as_slice());
	if evm.config.enable_preimage_recording {
		evm.state.add_preimage(hash, data.to_vec());
	}

	scope.stack.push(h256_to_u256(hash))?;
	Ok(Control::Continue)
}

pub(crate) fn op_address(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let address = address_to_u256(scope.contract.self_address);
	scope.stack.push(address)?;
	Ok(Control::Continue)
}

pub(crate) fn op_balance(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let address = u256_to_address(scope.stack.pop()?);
	scope.stack.push(evm.state.balance(address))?;
	Ok(Control::Continue)
}

pub(crate) fn op_origin(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let origin = address_to_u256(evm.tx_context.origin);
	scope.stack.push(origin)?;
	Ok(Control::Continue)
}

pub(crate) fn op_caller(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let caller = address_to_u256(scope.contract.caller_address);
	scope.stack.push(caller)?;
	Ok(Control::Continue)
}

pub(crate) fn op_callvalue(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let value = scope.contract.value;
	scope.stack.push(value)?;
	Ok(Control::Continue)
}

pub(crate) fn op_calldataload(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let offset = scope.stack.pop()?;
	let value = if offset <= U256::from(u64::MAX) {
		let data = get_data(&scope.contract.input, offset.low_u64(), 32);
		U256::from_big_endian(&data)
	} else {
		U256::zero()
	};
	scope.stack.push(value)?;
	Ok(Control::Continue)
}

pub(crate) fn op_calldatasize(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let size = U256::from(scope.contract.input.len());
	scope.stack.push(size)?;
	Ok(Control::Continue)
}

pub(crate) fn op_calldatacopy(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let mem_offset = scope.stack.pop()?;
	let data_offset = scope.stack.pop()?;
	let length = scope.stack.pop()?;

	// Overflowing offsets were already priced in by the gas step; clamp so
	// the copy reads past the end and zero-fills.
	let data_offset64 = if data_offset > U256::from(u64::MAX) {
		u64::MAX
	} else {
		data_offset.low_u64()
	};
	let data = get_data(&scope.contract.input, data_offset64, length.low_u64());
	scope
		.memory
		.set(mem_offset.low_u64(), length.low_u64(), &data);
	Ok(Control::Continue)
}

pub(crate) fn op_codesize(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let size = U256::from(scope.contract.code.len());
	scope.stack.push(size)?;
	Ok(Control::Continue)
}

pub(crate) fn op_codecopy(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let mem_offset = scope.stack.pop()?;
	let code_offset = scope.stack.pop()?;
	let length = scope.stack.pop()?;

	let code_offset64 = if code_offset > U256::from(u64::MAX) {
		u64::MAX
	} else {
		code_offset.low_u64()
	};
	let code = get_data(&scope.contract.code, code_offset64, length.low_u64());
	scope
		.memory
		.set(mem_offset.low_u64(), length.low_u64(), &code);
	Ok(Control::Continue)
}

pub(crate) fn op_extcodesize(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let address = u256_to_address(scope.stack.pop()?);
	let size = U256::from(evm.state.code_size(address));
	scope.stack.push(size)?;
	Ok(Control::Continue)
}

pub(crate) fn op_extcodecopy(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let address = u256_to_address(scope.stack.pop()?);
	let mem_offset = scope.stack.pop()?;
	let code_offset = scope.stack.pop()?;
	let length = scope.stack.pop()?;

	let code_offset64 = if code_offset > U256::from(u64::MAX) {
		u64::MAX
	} else {
		code_offset.low_u64()
	};
	let code = get_data(&evm.state.code(address), code_offset64, length.low_u64());
	scope
		.memory
		.set(mem_offset.low_u64(), length.low_u64(), &code);
	Ok(Control::Continue)
}

pub(crate) fn op_extcodehash(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let address = u256_to_address(scope.stack.pop()?);
	let value = if evm.state.is_empty(address) {
		U256::zero()
	} else {
		h256_to_u256(evm.state.code_hash(address))
	};
	scope.stack.push(value)?;
	Ok(Control::Continue)
}

pub(crate) fn op_returndatasize(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let size = U256::from(evm.return_data.len());
	scope.stack.push(size)?;
	Ok(Control::Continue)
}

pub(crate) fn op_returndatacopy(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let mem_offset = scope.stack.pop()?;
	let data_offset = scope.stack.pop()?;
	let length = scope.stack.pop()?;

	if data_offset > U256::from(u64::MAX) {
		return Err(Error::ReturnDataOutOfBounds);
	}
	let end = data_offset
		.checked_add(length)
		.ok_or(Error::ReturnDataOutOfBounds)?;
	if end > U256::from(u64::MAX) || (evm.return_data.len() as u64) < end.low_u64() {
		return Err(Error::ReturnDataOutOfBounds);
	}
	let data = evm.return_data[data_offset.low_u64() as usize..end.low_u64() as usize].to_vec();
	scope
		.memory
		.set(mem_offset.low_u64(), length.low_u64(), &data);
	Ok(Control::Continue)
}

pub(crate) fn op_gasprice(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let gas_price = evm.tx_context.gas_price;
	scope.stack.push(gas_price)?;
	Ok(Control::Continue)
}

pub(crate) fn op_blockhash(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let num = scope.stack.pop()?;
	if num > U256::from(u64::MAX) {
		scope.stack.push(U256::zero())?;
		return Ok(Control::Continue);
	}
	let num64 = num.low_u64();
	// Only the 256 most recent block hashes are visible.
	let upper = evm.context.number.low_u64();
	let lower = if upper < 257 { 0 } else { upper - 256 };
	let value = if num64 >= lower && num64 < upper {
		h256_to_u256((evm.context.get_hash)(num64))
	} else {
		U256::zero()
	};
	scope.stack.push(value)?;
	Ok(Control::Continue)
}

pub(crate) fn op_coinbase(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let coinbase = address_to_u256(evm.context.coinbase);
	scope.stack.push(coinbase)?;
	Ok(Control::Continue)
}

pub(crate) fn op_timestamp(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let time = U256::from(evm.context.time);
	scope.stack.push(time)?;
	Ok(Control::Continue)
}

pub(crate) fn op_number(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let number = evm.context.number;
	scope.stack.push(number)?;
	Ok(Control::Continue)
}

pub(crate) fn op_difficulty(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let difficulty = evm.context.difficulty;
	scope.stack.push(difficulty)?;
	Ok(Control::Continue)
}

/// DIFFICULTY with PREVRANDAO semantics, from the Merge onwards.
pub(crate) fn op_random(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let random = h256_to_u256(evm.context.random.unwrap_or_default());
	scope.stack.push(random)?;
	Ok(Control::Continue)
}

pub(crate) fn op_gaslimit(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let gas_limit = U256::from(evm.context.gas_limit);
	scope.stack.push(gas_limit)?;
	Ok(Control::Continue)
}

pub(crate) fn op_chainid(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let chain_id = evm.rules.chain_id;
	scope.stack.push(chain_id)?;
	Ok(Control::Continue)
}

pub(crate) fn op_selfbalance(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let balance = evm.state.balance(scope.contract.self_address);
	scope.stack.push(balance)?;
	Ok(Control::Continue)
}

pub(crate) fn op_basefee(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let base_fee = evm.context.base_fee;
	scope.stack.push(base_fee)?;
	Ok(Control::Continue)
}

pub(crate) fn op_blobhash(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let index = scope.stack.pop()?;
	let value = if index < U256::from(evm.tx_context.blob_hashes.len()) {
		h256_to_u256(evm.tx_context.blob_hashes[index.low_u64() as usize])
	} else {
		U256::zero()
	};
	scope.stack.push(value)?;
	Ok(Control::Continue)
}

pub(crate) fn op_pop(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	scope.stack.pop()?;
	Ok(Control::Continue)
}

pub(crate) fn op_mload(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let offset = scope.stack.pop()?;
	let value = U256::from_big_endian(scope.memory.get_ptr(offset.low_u64(), 32));
	scope.stack.push(value)?;
	Ok(Control::Continue)
}

pub(crate) fn op_mstore(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let offset = scope.stack.pop()?;
	let value = scope.stack.pop()?;
	scope.memory.set_word(offset.low_u64(), &value);
	Ok(Control::Continue)
}

pub(crate) fn op_mstore8(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let offset = scope.stack.pop()?;
	let value = scope.stack.pop()?;
	scope.memory.set_byte(offset.low_u64(), value.low_u64() as u8);
	Ok(Control::Continue)
}

pub(crate) fn op_mcopy(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let dst = scope.stack.pop()?;
	let src = scope.stack.pop()?;
	let length = scope.stack.pop()?;
	// Ranges were overflow-checked by the memory-size computation.
	scope
		.memory
		.copy(dst.low_u64(), src.low_u64(), length.low_u64());
	Ok(Control::Continue)
}

pub(crate) fn op_sload(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let key = u256_to_h256(scope.stack.pop()?);
	let value = evm.state.storage(scope.contract.self_address, key);
	scope.stack.push(h256_to_u256(value))?;
	Ok(Control::Continue)
}

pub(crate) fn op_sstore(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	if evm.read_only {
		return Err(Error::WriteProtection);
	}
	let key = scope.stack.pop()?;
	let value = scope.stack.pop()?;
	evm.state.set_storage(
		scope.contract.self_address,
		u256_to_h256(key),
		u256_to_h256(value),
	);
	Ok(Control::Continue)
}

pub(crate) fn op_tload(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let key = u256_to_h256(scope.stack.pop()?);
	let value = evm
		.state
		.transient_storage(scope.contract.self_address, key);
	scope.stack.push(h256_to_u256(value))?;
	Ok(Control::Continue)
}

pub(crate) fn op_tstore(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	if evm.read_only {
		return Err(Error::WriteProtection);
	}
	let key = scope.stack.pop()?;
	let value = scope.stack.pop()?;
	evm.state.set_transient_storage(
		scope.contract.self_address,
		u256_to_h256(key),
		u256_to_h256(value),
	);
	Ok(Control::Continue)
}

pub(crate) fn op_jump(
	pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	if evm.cancelled() {
		return Ok(Control::Stop(Vec::new()));
	}
	let pos = scope.stack.pop()?;
	if !scope.contract.valid_jumpdest(&pos) {
		return Err(Error::InvalidJump);
	}
	// The loop increments the counter after every opcode.
	*pc = pos.low_u64().wrapping_sub(1);
	Ok(Control::Continue)
}

pub(crate) fn op_jumpi(
	pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	if evm.cancelled() {
		return Ok(Control::Stop(Vec::new()));
	}
	let pos = scope.stack.pop()?;
	let cond = scope.stack.pop()?;
	if !cond.is_zero() {
		if !scope.contract.valid_jumpdest(&pos) {
			return Err(Error::InvalidJump);
		}
		*pc = pos.low_u64().wrapping_sub(1);
	}
	Ok(Control::Continue)
}

pub(crate) fn op_jumpdest(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	_scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	Ok(Control::Continue)
}

pub(crate) fn op_pc(
	pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	scope.stack.push(U256::from(*pc))?;
	Ok(Control::Continue)
}

pub(crate) fn op_msize(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let size = U256::from(scope.memory.len());
	scope.stack.push(size)?;
	Ok(Control::Continue)
}

pub(crate) fn op_gas(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let gas = U256::from(scope.contract.gas);
	scope.stack.push(gas)?;
	Ok(Control::Continue)
}

pub(crate) fn op_push0(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	scope.stack.push(U256::zero())?;
	Ok(Control::Continue)
}

/// PUSH1..PUSH32. Immediates truncated by the end of code are zero-padded
/// on the right.
pub(crate) fn op_push(
	pc: &mut u64,
	_evm: &mut Evm<'_>,
	op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let push_byte_size = (op.0 - Opcode::PUSH1.0 + 1) as usize;
	let code_len = scope.contract.code.len();

	let start = ((*pc + 1) as usize).min(code_len);
	let end = (start + push_byte_size).min(code_len);

	let mut padded = [0u8; 32];
	padded[..end - start].copy_from_slice(&scope.contract.code[start..end]);
	let mut word = [0u8; 32];
	word[32 - push_byte_size..].copy_from_slice(&padded[..push_byte_size]);
	scope.stack.push(U256::from_big_endian(&word))?;

	*pc += push_byte_size as u64;
	Ok(Control::Continue)
}

/// DUP1..DUP16.
pub(crate) fn op_dup(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let n = (op.0 - Opcode::DUP1.0 + 1) as usize;
	scope.stack.dup(n)?;
	Ok(Control::Continue)
}

/// SWAP1..SWAP16.
pub(crate) fn op_swap(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let n = (op.0 - Opcode::SWAP1.0 + 1) as usize;
	scope.stack.swap(n)?;
	Ok(Control::Continue)
}

/// LOG0..LOG4.
pub(crate) fn op_log(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	if evm.read_only {
		return Err(Error::WriteProtection);
	}
	let size = (op.0 - Opcode::LOG0.0) as usize;
	let m_start = scope.stack.pop()?;
	let m_size = scope.stack.pop()?;
	let mut topics = Vec::with_capacity(size);
	for _ in 0..size {
		topics.push(u256_to_h256(scope.stack.pop()?));
	}

	let data = scope.memory.get_copy(m_start.low_u64(), m_size.low_u64());
	evm.state.add_log(Log {
		address: scope.contract.self_address,
		topics,
		data,
		block_number: evm.context.number.low_u64(),
	});
	Ok(Control::Continue)
}

pub(crate) fn op_create(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	if evm.read_only {
		return Err(Error::WriteProtection);
	}
	let value = scope.stack.pop()?;
	let offset = scope.stack.pop()?;
	let size = scope.stack.pop()?;
	let input = scope.memory.get_copy(offset.low_u64(), size.low_u64());

	let mut gas = scope.contract.gas;
	if evm.rules.is_eip150 {
		gas -= gas / 64;
	}
	scope.contract.use_gas(gas);

	let (ret, address, return_gas, suberr) =
		evm.create(scope.contract.self_address, input, gas, value);

	// Homestead turned code-store failures into hard errors; before that
	// the create succeeds and the address lands on the stack regardless.
	let failed = match &suberr {
		Err(Error::CodeStoreOutOfGas) => evm.rules.is_homestead,
		Err(_) => true,
		Ok(()) => false,
	};
	scope.stack.push(if failed {
		U256::zero()
	} else {
		address_to_u256(address)
	})?;
	scope.contract.gas += return_gas;

	if suberr == Err(Error::Reverted) {
		evm.return_data = ret;
	} else {
		evm.return_data.clear();
	}
	Ok(Control::Continue)
}

pub(crate) fn op_create2(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	if evm.read_only {
		return Err(Error::WriteProtection);
	}
	let endowment = scope.stack.pop()?;
	let offset = scope.stack.pop()?;
	let size = scope.stack.pop()?;
	let salt = scope.stack.pop()?;
	let input = scope.memory.get_copy(offset.low_u64(), size.low_u64());

	// CREATE2 always applies the 63/64 rule.
	let mut gas = scope.contract.gas;
	gas -= gas / 64;
	scope.contract.use_gas(gas);

	let (ret, address, return_gas, suberr) = evm.create2(
		scope.contract.self_address,
		input,
		gas,
		endowment,
		u256_to_h256(salt),
	);

	scope.stack.push(if suberr.is_err() {
		U256::zero()
	} else {
		address_to_u256(address)
	})?;
	scope.contract.gas += return_gas;

	if suberr == Err(Error::Reverted) {
		evm.return_data = ret;
	} else {
		evm.return_data.clear();
	}
	Ok(Control::Continue)
}

pub(crate) fn op_call(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	// The gas word was consumed by the dynamic-gas step; the amount granted
	// to the child sits in call_gas_temp.
	scope.stack.pop()?;
	let addr = scope.stack.pop()?;
	let value = scope.stack.pop()?;
	let in_offset = scope.stack.pop()?;
	let in_size = scope.stack.pop()?;
	let ret_offset = scope.stack.pop()?;
	let ret_size = scope.stack.pop()?;

	let mut gas = evm.call_gas_temp;
	let to = u256_to_address(addr);
	let args = scope
		.memory
		.get_copy(in_offset.low_u64(), in_size.low_u64());

	if evm.read_only && !value.is_zero() {
		return Err(Error::WriteProtection);
	}
	if !value.is_zero() {
		gas += params::CALL_STIPEND;
	}

	let (ret, return_gas, res) = evm.call(scope.contract.self_address, to, &args, gas, value);

	scope.stack.push(if res.is_err() {
		U256::zero()
	} else {
		U256::one()
	})?;
	if res.is_ok() || res == Err(Error::Reverted) {
		scope
			.memory
			.set(ret_offset.low_u64(), ret_size.low_u64(), &ret);
	}
	scope.contract.gas += return_gas;

	evm.return_data = ret;
	Ok(Control::Continue)
}

pub(crate) fn op_callcode(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	scope.stack.pop()?;
	let addr = scope.stack.pop()?;
	let value = scope.stack.pop()?;
	let in_offset = scope.stack.pop()?;
	let in_size = scope.stack.pop()?;
	let ret_offset = scope.stack.pop()?;
	let ret_size = scope.stack.pop()?;

	let mut gas = evm.call_gas_temp;
	let to = u256_to_address(addr);
	let args = scope
		.memory
		.get_copy(in_offset.low_u64(), in_size.low_u64());

	if !value.is_zero() {
		gas += params::CALL_STIPEND;
	}

	let (ret, return_gas, res) =
		evm.call_code(scope.contract.self_address, to, &args, gas, value);

	scope.stack.push(if res.is_err() {
		U256::zero()
	} else {
		U256::one()
	})?;
	if res.is_ok() || res == Err(Error::Reverted) {
		scope
			.memory
			.set(ret_offset.low_u64(), ret_size.low_u64(), &ret);
	}
	scope.contract.gas += return_gas;

	evm.return_data = ret;
	Ok(Control::Continue)
}

pub(crate) fn op_delegatecall(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	scope.stack.pop()?;
	let addr = scope.stack.pop()?;
	let in_offset = scope.stack.pop()?;
	let in_size = scope.stack.pop()?;
	let ret_offset = scope.stack.pop()?;
	let ret_size = scope.stack.pop()?;

	let gas = evm.call_gas_temp;
	let to = u256_to_address(addr);
	let args = scope
		.memory
		.get_copy(in_offset.low_u64(), in_size.low_u64());

	let (ret, return_gas, res) = evm.delegate_call(scope.contract, to, &args, gas);

	scope.stack.push(if res.is_err() {
		U256::zero()
	} else {
		U256::one()
	})?;
	if res.is_ok() || res == Err(Error::Reverted) {
		scope
			.memory
			.set(ret_offset.low_u64(), ret_size.low_u64(), &ret);
	}
	scope.contract.gas += return_gas;

	evm.return_data = ret;
	Ok(Control::Continue)
}

pub(crate) fn op_staticcall(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	scope.stack.pop()?;
	let addr = scope.stack.pop()?;
	let in_offset = scope.stack.pop()?;
	let in_size = scope.stack.pop()?;
	let ret_offset = scope.stack.pop()?;
	let ret_size = scope.stack.pop()?;

	let gas = evm.call_gas_temp;
	let to = u256_to_address(addr);
	let args = scope
		.memory
		.get_copy(in_offset.low_u64(), in_size.low_u64());

	let (ret, return_gas, res) = evm.static_call(scope.contract.self_address, to, &args, gas);

	scope.stack.push(if res.is_err() {
		U256::zero()
	} else {
		U256::one()
	})?;
	if res.is_ok() || res == Err(Error::Reverted) {
		scope
			.memory
			.set(ret_offset.low_u64(), ret_size.low_u64(), &ret);
	}
	scope.contract.gas += return_gas;

	evm.return_data = ret;
	Ok(Control::Continue)
}

pub(crate) fn op_return(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let offset = scope.stack.pop()?;
	let size = scope.stack.pop()?;
	let ret = scope.memory.get_copy(offset.low_u64(), size.low_u64());
	Ok(Control::Stop(ret))
}

pub(crate) fn op_revert(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	let offset = scope.stack.pop()?;
	let size = scope.stack.pop()?;
	let ret = scope.memory.get_copy(offset.low_u64(), size.low_u64());
	Ok(Control::Revert(ret))
}

pub(crate) fn op_stop(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	_op: Opcode,
	_scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	Ok(Control::Stop(Vec::new()))
}

pub(crate) fn op_undefined(
	_pc: &mut u64,
	_evm: &mut Evm<'_>,
	op: Opcode,
	_scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	Err(Error::InvalidOpcode(op))
}

pub(crate) fn op_selfdestruct(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	if evm.read_only {
		return Err(Error::WriteProtection);
	}
	let beneficiary = u256_to_address(scope.stack.pop()?);
	let balance = evm.state.balance(scope.contract.self_address);
	evm.state.add_balance(beneficiary, balance);
	evm.state.self_destruct(scope.contract.self_address);
	if let Some(tracer) = evm.config.tracer.as_deref_mut() {
		tracer.capture_enter(
			Opcode::SELFDESTRUCT,
			scope.contract.self_address,
			beneficiary,
			&[],
			0,
			balance,
		);
		tracer.capture_exit(&[], 0, None);
	}
	Ok(Control::Stop(Vec::new()))
}

/// SELFDESTRUCT under EIP-6780: the balance always moves, the account is
/// deleted only if it was created within this transaction.
pub(crate) fn op_selfdestruct_6780(
	_pc: &mut u64,
	evm: &mut Evm<'_>,
	_op: Opcode,
	scope: &mut ScopeContext<'_>,
) -> Result<Control, Error> {
	if evm.read_only {
		return Err(Error::WriteProtection);
	}
	let beneficiary = u256_to_address(scope.stack.pop()?);
	let balance = evm.state.balance(scope.contract.self_address);
	evm.state.sub_balance(scope.contract.self_address, balance);
	evm.state.add_balance(beneficiary, balance);
	evm.state.self_destruct_6780(scope.contract.self_address);
	if let Some(tracer) = evm.config.tracer.as_deref_mut() {
		tracer.capture_enter(
			Opcode::SELFDESTRUCT,
			scope.contract.self_address,
			beneficiary,
			&[],
			0,
			balance,
		);
		tracer.capture_exit(&[], 0, None);
	}
	Ok(Control::Stop(Vec::new()))
}
