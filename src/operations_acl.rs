//! EIP-2929 warm/cold gas variants. Cold touches pay a surcharge and are
//! added to the transaction's access list; the access list itself is rolled
//! back with snapshots, so an unaffordable touch leaves no trace.

use crate::contract::Contract;
use crate::error::Error;
use crate::evm::Evm;
use crate::gas_table::{
	gas_call, gas_call_code, gas_delegate_call, gas_ext_code_copy, gas_static_call,
};
use crate::memory::Memory;
use crate::params;
use crate::stack::Stack;
use crate::utils::{u256_to_address, u256_to_h256};

type GasFn = fn(&mut Evm<'_>, &mut Contract, &Stack, &mut Memory, u64) -> Result<u64, Error>;

fn sstore_acl_gas(
	clearing_refund: u64,
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
) -> Result<u64, Error> {
	if contract.gas <= params::SSTORE_SENTRY_GAS_EIP2200 {
		return Err(Error::Other("not enough gas for reentrancy sentry".into()));
	}

	let (x, y) = (stack.back(0)?, stack.back(1)?);
	let slot = u256_to_h256(x);
	let current = evm.state.storage(contract.self_address, slot);
	let mut cost: u64 = 0;

	let (_, slot_present) = evm.state.slot_in_access_list(contract.self_address, slot);
	if !slot_present {
		cost = params::COLD_SLOAD_COST_EIP2929;
		evm.state.add_slot_to_access_list(contract.self_address, slot);
	}
	let value = u256_to_h256(y);

	if current == value {
		return Ok(cost + params::WARM_STORAGE_READ_COST_EIP2929);
	}
	let original = evm.state.committed_storage(contract.self_address, slot);
	if original == current {
		if original.is_zero() {
			return Ok(cost + params::SSTORE_SET_GAS_EIP2200);
		}
		if value.is_zero() {
			evm.state.add_refund(clearing_refund);
		}
		return Ok(
			cost + (params::SSTORE_RESET_GAS_EIP2200 - params::COLD_SLOAD_COST_EIP2929),
		);
	}
	if !original.is_zero() {
		if current.is_zero() {
			evm.state.sub_refund(clearing_refund);
		} else if value.is_zero() {
			evm.state.add_refund(clearing_refund);
		}
	}
	if original == value {
		if original.is_zero() {
			evm.state.add_refund(
				params::SSTORE_SET_GAS_EIP2200 - params::WARM_STORAGE_READ_COST_EIP2929,
			);
		} else {
			evm.state.add_refund(
				(params::SSTORE_RESET_GAS_EIP2200 - params::COLD_SLOAD_COST_EIP2929)
					- params::WARM_STORAGE_READ_COST_EIP2929,
			);
		}
	}
	Ok(cost + params::WARM_STORAGE_READ_COST_EIP2929)
}

/// SSTORE under EIP-2929, with the pre-London clearing refund.
pub(crate) fn gas_sstore_eip2929(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	sstore_acl_gas(
		params::SSTORE_CLEARS_SCHEDULE_REFUND_EIP2200,
		evm,
		contract,
		stack,
	)
}

/// SSTORE under EIP-3529: the clearing refund drops to
/// `SSTORE_RESET_GAS + ACCESS_LIST_STORAGE_KEY_COST` (4800).
pub(crate) fn gas_sstore_eip3529(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	sstore_acl_gas(
		params::SSTORE_CLEARS_SCHEDULE_REFUND_EIP3529,
		evm,
		contract,
		stack,
	)
}

pub(crate) fn gas_sload_eip2929(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	let slot = u256_to_h256(stack.peek()?);
	let (_, slot_present) = evm.state.slot_in_access_list(contract.self_address, slot);
	if !slot_present {
		evm.state.add_slot_to_access_list(contract.self_address, slot);
		return Ok(params::COLD_SLOAD_COST_EIP2929);
	}
	Ok(params::WARM_STORAGE_READ_COST_EIP2929)
}

pub(crate) fn gas_ext_code_copy_eip2929(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	// Memory expansion first, the dynamic part of the pre-2929 pricing.
	let gas = gas_ext_code_copy(evm, contract, stack, memory, memory_size)?;
	let addr = u256_to_address(stack.peek()?);
	if !evm.state.address_in_access_list(addr) {
		evm.state.add_address_to_access_list(addr);
		// Charge cold - warm; warm is already in the constant cost.
		return gas
			.checked_add(
				params::COLD_ACCOUNT_ACCESS_COST_EIP2929 - params::WARM_STORAGE_READ_COST_EIP2929,
			)
			.ok_or(Error::GasUintOverflow);
	}
	Ok(gas)
}

/// Account-touch surcharge for BALANCE, EXTCODESIZE and EXTCODEHASH.
pub(crate) fn gas_eip2929_account_check(
	evm: &mut Evm<'_>,
	_contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	let addr = u256_to_address(stack.peek()?);
	if !evm.state.address_in_access_list(addr) {
		evm.state.add_address_to_access_list(addr);
		return Ok(
			params::COLD_ACCOUNT_ACCESS_COST_EIP2929 - params::WARM_STORAGE_READ_COST_EIP2929,
		);
	}
	Ok(0)
}

fn call_variant_gas_eip2929(
	old_calculator: GasFn,
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	let addr = u256_to_address(stack.back(1)?);
	let warm_access = evm.state.address_in_access_list(addr);
	// Warm (100) is already the constant cost, so the cold charge is the
	// difference.
	let cold_cost =
		params::COLD_ACCOUNT_ACCESS_COST_EIP2929 - params::WARM_STORAGE_READ_COST_EIP2929;
	if !warm_access {
		evm.state.add_address_to_access_list(addr);
		// Deduct the difference up front so the 63/64 computation in the
		// old calculator sees the gas actually available for the call.
		if !contract.use_gas(cold_cost) {
			return Err(Error::OutOfGas);
		}
	}
	let gas = old_calculator(evm, contract, stack, memory, memory_size);
	if warm_access {
		return gas;
	}
	let gas = gas?;
	// Hand the cold charge back and fold it into the returned dynamic
	// cost, where the interpreter deducts and reports it.
	contract.gas += cold_cost;
	gas.checked_add(cold_cost).ok_or(Error::GasUintOverflow)
}

pub(crate) fn gas_call_eip2929(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	call_variant_gas_eip2929(gas_call, evm, contract, stack, memory, memory_size)
}

pub(crate) fn gas_call_code_eip2929(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	call_variant_gas_eip2929(gas_call_code, evm, contract, stack, memory, memory_size)
}

pub(crate) fn gas_delegate_call_eip2929(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	call_variant_gas_eip2929(gas_delegate_call, evm, contract, stack, memory, memory_size)
}

pub(crate) fn gas_static_call_eip2929(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	memory: &mut Memory,
	memory_size: u64,
) -> Result<u64, Error> {
	call_variant_gas_eip2929(gas_static_call, evm, contract, stack, memory, memory_size)
}

fn selfdestruct_acl_gas(
	refunds_enabled: bool,
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
) -> Result<u64, Error> {
	let mut gas: u64 = 0;
	let address = u256_to_address(stack.peek()?);
	if !evm.state.address_in_access_list(address) {
		evm.state.add_address_to_access_list(address);
		gas = params::COLD_ACCOUNT_ACCESS_COST_EIP2929;
	}
	// if empty and transfers value
	if evm.state.is_empty(address) && !evm.state.balance(contract.self_address).is_zero() {
		gas += params::CREATE_BY_SELFDESTRUCT_GAS;
	}
	if refunds_enabled && !evm.state.has_self_destructed(contract.self_address) {
		evm.state.add_refund(params::SELFDESTRUCT_REFUND_GAS);
	}
	Ok(gas)
}

pub(crate) fn gas_selfdestruct_eip2929(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	selfdestruct_acl_gas(true, evm, contract, stack)
}

/// EIP-3529 removed the SELFDESTRUCT refund.
pub(crate) fn gas_selfdestruct_eip3529(
	evm: &mut Evm<'_>,
	contract: &mut Contract,
	stack: &Stack,
	_memory: &mut Memory,
	_memory_size: u64,
) -> Result<u64, Error> {
	selfdestruct_acl_gas(false, evm, contract, stack)
}
