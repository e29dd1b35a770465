//! Activation of individual EIPs on top of a fork's baseline jump table,
//! driven by `Config::extra_eips`.

use tracing::warn;

use crate::error::Error;
use crate::gas::{GAS_FAST_STEP, GAS_FASTEST_STEP, GAS_QUICK_STEP};
use crate::gas_table;
use crate::instructions::*;
use crate::jump_table::{max_stack, min_stack, JumpTable, Operation, UNDEFINED};
use crate::memory_table;
use crate::opcode::Opcode;
use crate::operations_acl;
use crate::params;

/// Apply the named EIP's jump-table changes. Unknown or table-neutral EIPs
/// are an error so the caller can report which activations took effect.
pub(crate) fn enable_eip(eip: u64, table: &mut JumpTable) -> Result<(), Error> {
	match eip {
		1153 => enable_1153(table),
		1344 => enable_1344(table),
		1884 => enable_1884(table),
		2200 => enable_2200(table),
		2929 => enable_2929(table),
		3198 => enable_3198(table),
		3529 => enable_3529(table),
		3855 => enable_3855(table),
		3860 => enable_3860(table),
		4844 => enable_4844(table),
		5656 => enable_5656(table),
		6780 => enable_6780(table),
		_ => {
			warn!(eip, "EIP activation failed: undefined EIP");
			return Err(Error::Other(format!("undefined eip {eip}").into()));
		}
	}
	Ok(())
}

/// EIP-1153: transient storage opcodes.
fn enable_1153(table: &mut JumpTable) {
	table.0[Opcode::TLOAD.as_usize()] = Operation {
		execute: op_tload,
		constant_gas: params::WARM_STORAGE_READ_COST_EIP2929,
		min_stack: min_stack(1, 1),
		max_stack: max_stack(1, 1),
		..UNDEFINED
	};
	table.0[Opcode::TSTORE.as_usize()] = Operation {
		execute: op_tstore,
		constant_gas: params::WARM_STORAGE_READ_COST_EIP2929,
		min_stack: min_stack(2, 0),
		max_stack: max_stack(2, 0),
		..UNDEFINED
	};
}

/// EIP-1344: CHAINID opcode.
fn enable_1344(table: &mut JumpTable) {
	table.0[Opcode::CHAINID.as_usize()] = Operation {
		execute: op_chainid,
		constant_gas: GAS_QUICK_STEP,
		min_stack: min_stack(0, 1),
		max_stack: max_stack(0, 1),
		..UNDEFINED
	};
}

/// EIP-1884: trie-access repricing plus SELFBALANCE.
fn enable_1884(table: &mut JumpTable) {
	table.0[Opcode::BALANCE.as_usize()].constant_gas = params::BALANCE_GAS_EIP1884;
	table.0[Opcode::EXTCODEHASH.as_usize()].constant_gas = params::EXTCODE_HASH_GAS_EIP1884;
	table.0[Opcode::SLOAD.as_usize()].constant_gas = params::SLOAD_GAS_EIP1884;
	table.0[Opcode::SELFBALANCE.as_usize()] = Operation {
		execute: op_selfbalance,
		constant_gas: GAS_FAST_STEP,
		min_stack: min_stack(0, 1),
		max_stack: max_stack(0, 1),
		..UNDEFINED
	};
}

/// EIP-2200: net storage gas metering.
fn enable_2200(table: &mut JumpTable) {
	table.0[Opcode::SLOAD.as_usize()].constant_gas = params::SLOAD_GAS_EIP2200;
	table.0[Opcode::SSTORE.as_usize()].dynamic_gas = Some(gas_table::gas_sstore_eip2200);
}

/// EIP-2929: warm/cold state access.
fn enable_2929(table: &mut JumpTable) {
	table.0[Opcode::SSTORE.as_usize()].dynamic_gas = Some(operations_acl::gas_sstore_eip2929);

	table.0[Opcode::SLOAD.as_usize()].constant_gas = 0;
	table.0[Opcode::SLOAD.as_usize()].dynamic_gas = Some(operations_acl::gas_sload_eip2929);

	for op in [Opcode::BALANCE, Opcode::EXTCODESIZE, Opcode::EXTCODEHASH] {
		table.0[op.as_usize()].constant_gas = params::WARM_STORAGE_READ_COST_EIP2929;
		table.0[op.as_usize()].dynamic_gas = Some(operations_acl::gas_eip2929_account_check);
	}
	table.0[Opcode::EXTCODECOPY.as_usize()].constant_gas =
		params::WARM_STORAGE_READ_COST_EIP2929;
	table.0[Opcode::EXTCODECOPY.as_usize()].dynamic_gas =
		Some(operations_acl::gas_ext_code_copy_eip2929);

	table.0[Opcode::CALL.as_usize()].constant_gas = params::WARM_STORAGE_READ_COST_EIP2929;
	table.0[Opcode::CALL.as_usize()].dynamic_gas = Some(operations_acl::gas_call_eip2929);
	table.0[Opcode::CALLCODE.as_usize()].constant_gas = params::WARM_STORAGE_READ_COST_EIP2929;
	table.0[Opcode::CALLCODE.as_usize()].dynamic_gas =
		Some(operations_acl::gas_call_code_eip2929);
	table.0[Opcode::DELEGATECALL.as_usize()].constant_gas =
		params::WARM_STORAGE_READ_COST_EIP2929;
	table.0[Opcode::DELEGATECALL.as_usize()].dynamic_gas =
		Some(operations_acl::gas_delegate_call_eip2929);
	table.0[Opcode::STATICCALL.as_usize()].constant_gas =
		params::WARM_STORAGE_READ_COST_EIP2929;
	table.0[Opcode::STATICCALL.as_usize()].dynamic_gas =
		Some(operations_acl::gas_static_call_eip2929);

	table.0[Opcode::SELFDESTRUCT.as_usize()].constant_gas = params::SELFDESTRUCT_GAS_EIP150;
	table.0[Opcode::SELFDESTRUCT.as_usize()].dynamic_gas =
		Some(operations_acl::gas_selfdestruct_eip2929);
}

/// EIP-3198: BASEFEE opcode.
fn enable_3198(table: &mut JumpTable) {
	table.0[Opcode::BASEFEE.as_usize()] = Operation {
		execute: op_basefee,
		constant_gas: GAS_QUICK_STEP,
		min_stack: min_stack(0, 1),
		max_stack: max_stack(0, 1),
		..UNDEFINED
	};
}

/// EIP-3529: reduced clearing refunds, no SELFDESTRUCT refund.
fn enable_3529(table: &mut JumpTable) {
	table.0[Opcode::SSTORE.as_usize()].dynamic_gas = Some(operations_acl::gas_sstore_eip3529);
	table.0[Opcode::SELFDESTRUCT.as_usize()].dynamic_gas =
		Some(operations_acl::gas_selfdestruct_eip3529);
}

/// EIP-3855: PUSH0 opcode.
fn enable_3855(table: &mut JumpTable) {
	table.0[Opcode::PUSH0.as_usize()] = Operation {
		execute: op_push0,
		constant_gas: GAS_QUICK_STEP,
		min_stack: min_stack(0, 1),
		max_stack: max_stack(0, 1),
		..UNDEFINED
	};
}

/// EIP-3860: limit and meter initcode.
fn enable_3860(table: &mut JumpTable) {
	table.0[Opcode::CREATE.as_usize()].dynamic_gas = Some(gas_table::gas_create_eip3860);
	table.0[Opcode::CREATE2.as_usize()].dynamic_gas = Some(gas_table::gas_create2_eip3860);
}

/// EIP-4844: BLOBHASH opcode.
fn enable_4844(table: &mut JumpTable) {
	table.0[Opcode::BLOBHASH.as_usize()] = Operation {
		execute: op_blobhash,
		constant_gas: GAS_FASTEST_STEP,
		min_stack: min_stack(1, 1),
		max_stack: max_stack(1, 1),
		..UNDEFINED
	};
}

/// EIP-5656: MCOPY opcode.
fn enable_5656(table: &mut JumpTable) {
	table.0[Opcode::MCOPY.as_usize()] = Operation {
		execute: op_mcopy,
		constant_gas: GAS_FASTEST_STEP,
		dynamic_gas: Some(gas_table::gas_mcopy),
		memory_size: Some(memory_table::memory_mcopy),
		min_stack: min_stack(3, 0),
		max_stack: max_stack(3, 0),
		..UNDEFINED
	};
}

/// EIP-6780: SELFDESTRUCT only deletes accounts created in the same
/// transaction.
fn enable_6780(table: &mut JumpTable) {
	table.0[Opcode::SELFDESTRUCT.as_usize()].execute = op_selfdestruct_6780;
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::jump_table::new_london_instruction_set;

	#[test]
	fn unknown_eip_is_rejected() {
		let mut table = new_london_instruction_set();
		assert!(enable_eip(9999, &mut table).is_err());
	}

	#[test]
	fn push0_activates_on_older_fork() {
		let mut table = new_london_instruction_set();
		assert!(enable_eip(3855, &mut table).is_ok());
		assert_eq!(
			table.0[Opcode::PUSH0.as_usize()].constant_gas,
			GAS_QUICK_STEP
		);
	}
}
