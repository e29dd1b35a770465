//! Dynamic gas computation for opcodes whose cost depends on operands or
//! state: memory expansion, copies, storage writes, logs, calls and
//! creates.

use primitive_types::U256;

use crate::contract::Contract;
use crate::error::Error;
use crate::evm::Evm;
use crate::gas::call_gas;
use crate::memory::Memory;
use crate::params;
use crate::stack::Stack;
use crate::utils::{u256_to_address, u256_to_h256};

/// Number of 32-byte words required to hold `size` bytes.
pub(crate) fn to_word_size(size: u64) -> u64 {
	if size > u64::MAX - 31 {
		return u64::MAX / 32 + 1;
	}
	(size + 31) / 32
}

/// Quadratic memory expansion fee, charged only for the region grown beyond
/// the current length. `memory.last_gas_cost` holds the total already paid.
pub(crate) fn memory_gas_cost(memory: &mut Memory, new_mem_size: u64) -> Result<u64, Error> {
	if new_mem_size == 0 {
		return Ok(0);
	}
	// Anything above this would overflow the squaring below; it is also far
	// beyond any fundable allocation.
	if new_mem_size > 0x1FFFFFFFE0 {
		return Err(Error::GasUintOverflow);
	}
	let new_mem_size_words = to_word_size(new_mem_size);
	let new_mem_size = new_mem_size_words * 32;

	if new_mem_size > memory.len() as u64 {
		let square = new_mem_size_words * new_mem_size_words;
		let lin_coef = new_mem_size_words * params::MEMORY_GAS;
		let quad_coef = square / params::QUAD_COEFF_DIV;
		let new_total_fee = lin_coef + quad_coef;

		let fee = new_total_fee - memory.last_gas_cost;
		memory.last_gas_cost = new_total_fee;

		return Ok(fee);
	}
	Ok(0)
}

/// Expansion plus per-word copy charge for the *COPY family; `stack_pos` is
/// the position of the length operand.
fn copier_gas(
	stack_pos: usize,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let gas = memory_gas_cost(memory, memory_size)?;

	let words = stack.back(stack_pos)?;
	if words > U256::from(u64::MAX) {
		return Err(Error::GasUintOverflow);
	}
	let words = to_word_size(words.low_u64())
		.checked_mul(params::COPY_GAS)
		.ok_or(Error::GasUintOverflow)?;

	gas.checked_add(words).ok_or(Error::GasUintOverflow)
}

pub(crate) fn gas_call_data_copy(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	copier_gas(2, stack, memory, memory_size)
}

pub(crate) fn gas_code_copy(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	copier_gas(2, stack, memory, memory_size)
}

pub(crate) fn gas_mcopy(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	copier_gas(2, stack, memory, memory_size)
}

pub(crate) fn gas_ext_code_copy(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	copier_gas(3, stack, memory, memory_size)
}

pub(crate) fn gas_return_data_copy(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	copier_gas(2, stack, memory, memory_size)
}

/// SSTORE before Istanbul: the flat pre-Constantinople schedule, or the
/// EIP-1283 net schedule for the one fork window (Constantinople without
/// Petersburg) it was live in.
pub(crate) fn gas_sstore(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	let (x, y) = (stack.back(0)?, stack.back(1)?);
	let slot = u256_to_h256(x);
	let current = evm.state.storage(contract.self_address, slot);

	if evm.rules.is_petersburg || !evm.rules.is_constantinople {
		return Ok(if current.is_zero() && !y.is_zero() {
			// zero-value -> non-zero value
			params::SSTORE_SET_GAS
		} else if !current.is_zero() && y.is_zero() {
			// non-zero value -> zero-value
			evm.state.add_refund(params::SSTORE_REFUND_GAS);
			params::SSTORE_CLEAR_GAS
		} else {
			// non-zero value -> non-zero value
			params::SSTORE_RESET_GAS
		});
	}

	// EIP-1283 net gas metering.
	let value = u256_to_h256(y);
	if current == value {
		return Ok(params::NET_SSTORE_NOOP_GAS);
	}
	let original = evm.state.committed_storage(contract.self_address, slot);
	if original == current {
		if original.is_zero() {
			return Ok(params::NET_SSTORE_INIT_GAS);
		}
		if value.is_zero() {
			evm.state.add_refund(params::NET_SSTORE_CLEAR_REFUND);
		}
		return Ok(params::NET_SSTORE_CLEAN_GAS);
	}
	if !original.is_zero() {
		if current.is_zero() {
			evm.state.sub_refund(params::NET_SSTORE_CLEAR_REFUND);
		} else if value.is_zero() {
			evm.state.add_refund(params::NET_SSTORE_CLEAR_REFUND);
		}
	}
	if original == value {
		if original.is_zero() {
			evm.state.add_refund(params::NET_SSTORE_RESET_CLEAR_REFUND);
		} else {
			evm.state.add_refund(params::NET_SSTORE_RESET_REFUND);
		}
	}
	Ok(params::NET_SSTORE_DIRTY_GAS)
}

/// SSTORE under EIP-2200: net metering with the 2300-gas reentrancy sentry.
pub(crate) fn gas_sstore_eip2200(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	// The call fails outright when it cannot cover the sentry.
	if contract.gas <= params::SSTORE_SENTRY_GAS_EIP2200 {
		return Err(Error::Other("not enough gas for reentrancy sentry".into()));
	}

	let (x, y) = (stack.back(0)?, stack.back(1)?);
	let slot = u256_to_h256(x);
	let current = evm.state.storage(contract.self_address, slot);
	let value = u256_to_h256(y);

	if current == value {
		return Ok(params::SLOAD_GAS_EIP2200);
	}

	let original = evm.state.committed_storage(contract.self_address, slot);
	if original == current {
		if original.is_zero() {
			return Ok(params::SSTORE_SET_GAS_EIP2200);
		}
		if value.is_zero() {
			evm.state
				.add_refund(params::SSTORE_CLEARS_SCHEDULE_REFUND_EIP2200);
		}
		return Ok(params::SSTORE_RESET_GAS_EIP2200);
	}
	if !original.is_zero() {
		if current.is_zero() {
			evm.state
				.sub_refund(params::SSTORE_CLEARS_SCHEDULE_REFUND_EIP2200);
		} else if value.is_zero() {
			evm.state
				.add_refund(params::SSTORE_CLEARS_SCHEDULE_REFUND_EIP2200);
		}
	}
	if original == value {
		if original.is_zero() {
			evm.state
				.add_refund(params::SSTORE_SET_GAS_EIP2200 - params::SLOAD_GAS_EIP2200);
		} else {
			evm.state
				.add_refund(params::SSTORE_RESET_GAS_EIP2200 - params::SLOAD_GAS_EIP2200);
		}
	}
	Ok(params::SLOAD_GAS_EIP2200)
}

fn log_gas(
	n: u64,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let requested_size = stack.back(1)?;
	if requested_size > U256::from(u64::MAX) {
		return Err(Error::GasUintOverflow);
	}

	let gas = memory_gas_cost(memory, memory_size)?;
	let gas = gas
		.checked_add(params::LOG_GAS)
		.ok_or(Error::GasUintOverflow)?;
	let gas = gas
		.checked_add(n * params::LOG_TOPIC_GAS)
		.ok_or(Error::GasUintOverflow)?;

	let data_gas = requested_size
		.low_u64()
		.checked_mul(params::LOG_DATA_GAS)
		.ok_or(Error::GasUintOverflow)?;
	gas.checked_add(data_gas).ok_or(Error::GasUintOverflow)
}

macro_rules! gas_log_fn {
	($name:ident, $n:expr) => {
		pub(crate) fn $name(
			_evm: &mut Evm<'_>,
			_contract: &mut Contract,
			stack: &Stack,
			memory: &mut Memory,
			memory_size: u64,
		) -> Result<u64, Error> {
			log_gas($n, stack, memory, memory_size)
		}
	};
}

gas_log_fn!(gas_log0, 0);
gas_log_fn!(gas_log1, 1);
gas_log_fn!(gas_log2, 2);
gas_log_fn!(gas_log3, 3);
gas_log_fn!(gas_log4, 4);

pub(crate) fn gas_keccak256(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let gas = memory_gas_cost(memory, memory_size)?;
	let len = stack.back(1)?;
	if len > U256::from(u64::MAX) {
		return Err(Error::GasUintOverflow);
	}
	let word_gas = to_word_size(len.low_u64())
		.checked_mul(params::KECCAK256_WORD_GAS)
		.ok_or(Error::GasUintOverflow)?;
	gas.checked_add(word_gas).ok_or(Error::GasUintOverflow)
}

/// Used by the opcodes whose dynamic cost is purely memory expansion.
pub(crate) fn pure_memory_gas(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	_stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	memory_gas_cost(memory, memory_size)
}

pub(crate) use self::pure_memory_gas as gas_return;
pub(crate) use self::pure_memory_gas as gas_revert;
pub(crate) use self::pure_memory_gas as gas_mload;
pub(crate) use self::pure_memory_gas as gas_mstore;
pub(crate) use self::pure_memory_gas as gas_mstore8;
pub(crate) use self::pure_memory_gas as gas_create;

pub(crate) fn gas_create2(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let gas = memory_gas_cost(memory, memory_size)?;
	let len = stack.back(2)?;
	if len > U256::from(u64::MAX) {
		return Err(Error::GasUintOverflow);
	}
	// CREATE2 hashes the initcode, charged per word.
	let word_gas = to_word_size(len.low_u64())
		.checked_mul(params::KECCAK256_WORD_GAS)
		.ok_or(Error::GasUintOverflow)?;
	gas.checked_add(word_gas).ok_or(Error::GasUintOverflow)
}

pub(crate) fn gas_create_eip3860(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let gas = memory_gas_cost(memory, memory_size)?;
	let size = stack.back(2)?;
	if size > U256::from(u64::MAX) || size.low_u64() > params::MAX_INIT_CODE_SIZE {
		return Err(Error::GasUintOverflow);
	}
	// size <= MAX_INIT_CODE_SIZE, so this cannot overflow.
	let more_gas = params::INIT_CODE_WORD_GAS * ((size.low_u64() + 31) / 32);
	gas.checked_add(more_gas).ok_or(Error::GasUintOverflow)
}

pub(crate) fn gas_create2_eip3860(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let gas = memory_gas_cost(memory, memory_size)?;
	let size = stack.back(2)?;
	if size > U256::from(u64::MAX) || size.low_u64() > params::MAX_INIT_CODE_SIZE {
		return Err(Error::GasUintOverflow);
	}
	let more_gas =
		(params::INIT_CODE_WORD_GAS + params::KECCAK256_WORD_GAS) * ((size.low_u64() + 31) / 32);
	gas.checked_add(more_gas).ok_or(Error::GasUintOverflow)
}

fn exp_gas(exp_byte: u64, stack: &Stack) -> Result<u64, Error> {
	let exp_byte_len = (stack.back(1)?.bits() as u64 + 7) / 8;
	// No overflow check needed for the product: at most 32 * exp_byte.
	let gas = exp_byte_len * exp_byte;
	gas.checked_add(params::EXP_GAS).ok_or(Error::GasUintOverflow)
}

pub(crate) fn gas_exp_frontier(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	exp_gas(params::EXP_BYTE_FRONTIER, stack)
}

pub(crate) fn gas_exp_eip158(
	_evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	exp_gas(params::EXP_BYTE_EIP158, stack)
}

pub(crate) fn gas_call(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let mut gas: u64 = 0;
	let transfers_value = !stack.back(2)?.is_zero();
	let address = u256_to_address(stack.back(1)?);

	if evm.rules.is_eip158 {
		if transfers_value && evm.state.is_empty(address) {
			gas += params::CALL_NEW_ACCOUNT_GAS;
		}
	} else if !evm.state.exists(address) {
		gas += params::CALL_NEW_ACCOUNT_GAS;
	}
	if transfers_value {
		gas += params::CALL_VALUE_TRANSFER_GAS;
	}
	let memory_gas = memory_gas_cost(memory, memory_size)?;
	let gas = gas.checked_add(memory_gas).ok_or(Error::GasUintOverflow)?;

	evm.call_gas_temp = call_gas(evm.rules.is_eip150, contract.gas, gas, stack.back(0)?)?;
	gas.checked_add(evm.call_gas_temp)
		.ok_or(Error::GasUintOverflow)
}

pub(crate) fn gas_call_code(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let memory_gas = memory_gas_cost(memory, memory_size)?;
	let mut gas: u64 = 0;
	if !stack.back(2)?.is_zero() {
		gas += params::CALL_VALUE_TRANSFER_GAS;
	}
	let gas = gas.checked_add(memory_gas).ok_or(Error::GasUintOverflow)?;
	evm.call_gas_temp = call_gas(evm.rules.is_eip150, contract.gas, gas, stack.back(0)?)?;
	gas.checked_add(evm.call_gas_temp)
		.ok_or(Error::GasUintOverflow)
}

pub(crate) fn gas_delegate_call(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let gas = memory_gas_cost(memory, memory_size)?;
	evm.call_gas_temp = call_gas(evm.rules.is_eip150, contract.gas, gas, stack.back(0)?)?;
	gas.checked_add(evm.call_gas_temp)
		.ok_or(Error::GasUintOverflow)
}

pub(crate) fn gas_static_call(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let gas = memory_gas_cost(memory, memory_size)?;
	evm.call_gas_temp = call_gas(evm.rules.is_eip150, contract.gas, gas, stack.back(0)?)?;
	gas.checked_add(evm.call_gas_temp)
		.ok_or(Error::GasUintOverflow)
}

pub(crate) fn gas_selfdestruct(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	let mut gas: u64 = 0;
	if evm.rules.is_eip150 {
		gas = params::SELFDESTRUCT_GAS_EIP150;
		let address = u256_to_address(stack.back(0)?);

		if evm.rules.is_eip158 {
			// if empty and transfers value
			if evm.state.is_empty(address)
				&& !evm.state.balance(contract.self_address).is_zero()
			{
				gas += params::CREATE_BY_SELFDESTRUCT_GAS;
			}
		} else if !evm.state.exists(address) {
			gas += params::CREATE_BY_SELFDESTRUCT_GAS;
		}
	}

	if !evm.state.has_self_destructed(contract.self_address) {
		evm.state.add_refund(params::SELFDESTRUCT_REFUND_GAS);
	}
	Ok(gas)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn word_size_rounds_up() {
		assert_eq!(to_word_size(0), 0);
		assert_eq!(to_word_size(1), 1);
		assert_eq!(to_word_size(32), 1);
		assert_eq!(to_word_size(33), 2);
		assert_eq!(to_word_size(u64::MAX), u64::MAX / 32 + 1);
	}

	#[test]
	fn expansion_fee_is_incremental() {
		let mut memory = Memory::new();
		// 32 bytes: 3*1 + 1/512 = 3.
		assert_eq!(memory_gas_cost(&mut memory, 32).unwrap(), 3);
		memory.resize(32);
		// 64 bytes: total 3*2 + 4/512 = 6, minus the 3 already paid.
		assert_eq!(memory_gas_cost(&mut memory, 64).unwrap(), 3);
		memory.resize(64);
		// No growth, no fee.
		assert_eq!(memory_gas_cost(&mut memory, 32).unwrap(), 0);
	}

	#[test]
	fn expansion_fee_quadratic_term() {
		let mut memory = Memory::new();
		let words: u64 = 1024; // 32 KiB
		let fee = memory_gas_cost(&mut memory, words * 32).unwrap();
		assert_eq!(fee, 3 * words + words * words / 512);
	}

	#[test]
	fn oversized_memory_overflows() {
		let mut memory = Memory::new();
		assert_eq!(
			memory_gas_cost(&mut memory, 0x1FFFFFFFE0 + 1),
			Err(Error::GasUintOverflow)
		);
	}
}
