//! Per-fork dispatch tables. Each of the 256 opcode bytes maps to its
//! handler, constant gas, optional dynamic-gas and memory-size functions,
//! and the stack bounds enforced before execution.

use core::ops::Index;

use crate::contract::Contract;
use crate::error::Error;
use crate::evm::Evm;
use crate::gas::{
	GAS_EXT_STEP, GAS_FAST_STEP, GAS_FASTEST_STEP, GAS_MID_STEP, GAS_QUICK_STEP, GAS_SLOW_STEP,
};
use crate::gas_table;
use crate::instructions::*;
use crate::interpreter::{Control, ScopeContext};
use crate::memory::Memory;
use crate::memory_table;
use crate::opcode::Opcode;
use crate::operations_acl;
use crate::params;
use crate::stack::Stack;

pub(crate) type ExecutionFn =
	fn(&mut u64, &mut Evm<'_>, Opcode, &mut ScopeContext<'_>) -> Result<Control, Error>;
pub(crate) type GasFn =
	fn(&mut Evm<'_>, &mut Contract, &Stack, &mut Memory, u64) -> Result<u64, Error>;
pub(crate) type MemorySizeFn = fn(&Stack) -> Result<u64, Error>;

/// One dispatch-table entry.
#[derive(Clone, Copy)]
pub struct Operation {
	pub execute: ExecutionFn,
	pub constant_gas: u64,
	pub dynamic_gas: Option<GasFn>,
	pub memory_size: Option<MemorySizeFn>,
	pub min_stack: usize,
	pub max_stack: usize,
}

/// Minimum stack depth the opcode requires: its pops.
pub(crate) const fn min_stack(pops: usize, _pushes: usize) -> usize {
	pops
}

/// Maximum stack depth the opcode tolerates so its pushes still fit.
pub(crate) const fn max_stack(pops: usize, pushes: usize) -> usize {
	params::STACK_LIMIT + pops - pushes
}

pub(crate) const UNDEFINED: Operation = Operation {
	execute: op_undefined,
	constant_gas: 0,
	dynamic_gas: None,
	memory_size: None,
	min_stack: min_stack(0, 0),
	max_stack: max_stack(0, 0),
};

/// Dispatch table for one fork.
#[derive(Clone, Copy)]
pub struct JumpTable(pub(crate) [Operation; 256]);

impl Index<usize> for JumpTable {
	type Output = Operation;

	fn index(&self, index: usize) -> &Operation {
		&self.0[index]
	}
}

impl JumpTable {
	fn set(&mut self, op: Opcode, operation: Operation) {
		self.0[op.as_usize()] = operation;
	}
}

/// The Frontier instruction set.
pub(crate) fn new_frontier_instruction_set() -> JumpTable {
	let mut table = JumpTable([UNDEFINED; 256]);

	table.set(
		Opcode::STOP,
		Operation {
			execute: op_stop,
			constant_gas: 0,
			min_stack: min_stack(0, 0),
			max_stack: max_stack(0, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::ADD,
		Operation {
			execute: op_add,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::MUL,
		Operation {
			execute: op_mul,
			constant_gas: GAS_FAST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SUB,
		Operation {
			execute: op_sub,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::DIV,
		Operation {
			execute: op_div,
			constant_gas: GAS_FAST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SDIV,
		Operation {
			execute: op_sdiv,
			constant_gas: GAS_FAST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::MOD,
		Operation {
			execute: op_mod,
			constant_gas: GAS_FAST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SMOD,
		Operation {
			execute: op_smod,
			constant_gas: GAS_FAST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::ADDMOD,
		Operation {
			execute: op_addmod,
			constant_gas: GAS_MID_STEP,
			min_stack: min_stack(3, 1),
			max_stack: max_stack(3, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::MULMOD,
		Operation {
			execute: op_mulmod,
			constant_gas: GAS_MID_STEP,
			min_stack: min_stack(3, 1),
			max_stack: max_stack(3, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::EXP,
		Operation {
			execute: op_exp,
			constant_gas: 0,
			dynamic_gas: Some(gas_table::gas_exp_frontier),
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SIGNEXTEND,
		Operation {
			execute: op_signextend,
			constant_gas: GAS_FAST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);

	table.set(
		Opcode::LT,
		Operation {
			execute: op_lt,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::GT,
		Operation {
			execute: op_gt,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SLT,
		Operation {
			execute: op_slt,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SGT,
		Operation {
			execute: op_sgt,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::EQ,
		Operation {
			execute: op_eq,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::ISZERO,
		Operation {
			execute: op_iszero,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::AND,
		Operation {
			execute: op_and,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::OR,
		Operation {
			execute: op_or,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::XOR,
		Operation {
			execute: op_xor,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::NOT,
		Operation {
			execute: op_not,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::BYTE,
		Operation {
			execute: op_byte,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);

	table.set(
		Opcode::KECCAK256,
		Operation {
			execute: op_keccak256,
			constant_gas: params::KECCAK256_GAS,
			dynamic_gas: Some(gas_table::gas_keccak256),
			memory_size: Some(memory_table::memory_keccak256),
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);

	table.set(
		Opcode::ADDRESS,
		Operation {
			execute: op_address,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::BALANCE,
		Operation {
			execute: op_balance,
			constant_gas: params::BALANCE_GAS_FRONTIER,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::ORIGIN,
		Operation {
			execute: op_origin,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CALLER,
		Operation {
			execute: op_caller,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CALLVALUE,
		Operation {
			execute: op_callvalue,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CALLDATALOAD,
		Operation {
			execute: op_calldataload,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CALLDATASIZE,
		Operation {
			execute: op_calldatasize,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CALLDATACOPY,
		Operation {
			execute: op_calldatacopy,
			constant_gas: GAS_FASTEST_STEP,
			dynamic_gas: Some(gas_table::gas_call_data_copy),
			memory_size: Some(memory_table::memory_call_data_copy),
			min_stack: min_stack(3, 0),
			max_stack: max_stack(3, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CODESIZE,
		Operation {
			execute: op_codesize,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CODECOPY,
		Operation {
			execute: op_codecopy,
			constant_gas: GAS_FASTEST_STEP,
			dynamic_gas: Some(gas_table::gas_code_copy),
			memory_size: Some(memory_table::memory_code_copy),
			min_stack: min_stack(3, 0),
			max_stack: max_stack(3, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::GASPRICE,
		Operation {
			execute: op_gasprice,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::EXTCODESIZE,
		Operation {
			execute: op_extcodesize,
			constant_gas: params::EXTCODE_SIZE_GAS_FRONTIER,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::EXTCODECOPY,
		Operation {
			execute: op_extcodecopy,
			constant_gas: params::EXTCODE_COPY_BASE_FRONTIER,
			dynamic_gas: Some(gas_table::gas_ext_code_copy),
			memory_size: Some(memory_table::memory_ext_code_copy),
			min_stack: min_stack(4, 0),
			max_stack: max_stack(4, 0),
			..UNDEFINED
		},
	);

	table.set(
		Opcode::BLOCKHASH,
		Operation {
			execute: op_blockhash,
			constant_gas: GAS_EXT_STEP,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::COINBASE,
		Operation {
			execute: op_coinbase,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::TIMESTAMP,
		Operation {
			execute: op_timestamp,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::NUMBER,
		Operation {
			execute: op_number,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::DIFFICULTY,
		Operation {
			execute: op_difficulty,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::GASLIMIT,
		Operation {
			execute: op_gaslimit,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);

	table.set(
		Opcode::POP,
		Operation {
			execute: op_pop,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(1, 0),
			max_stack: max_stack(1, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::MLOAD,
		Operation {
			execute: op_mload,
			constant_gas: GAS_FASTEST_STEP,
			dynamic_gas: Some(gas_table::gas_mload),
			memory_size: Some(memory_table::memory_mload),
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::MSTORE,
		Operation {
			execute: op_mstore,
			constant_gas: GAS_FASTEST_STEP,
			dynamic_gas: Some(gas_table::gas_mstore),
			memory_size: Some(memory_table::memory_mstore),
			min_stack: min_stack(2, 0),
			max_stack: max_stack(2, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::MSTORE8,
		Operation {
			execute: op_mstore8,
			constant_gas: GAS_FASTEST_STEP,
			dynamic_gas: Some(gas_table::gas_mstore8),
			memory_size: Some(memory_table::memory_mstore8),
			min_stack: min_stack(2, 0),
			max_stack: max_stack(2, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SLOAD,
		Operation {
			execute: op_sload,
			constant_gas: params::SLOAD_GAS_FRONTIER,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SSTORE,
		Operation {
			execute: op_sstore,
			constant_gas: 0,
			dynamic_gas: Some(gas_table::gas_sstore),
			min_stack: min_stack(2, 0),
			max_stack: max_stack(2, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::JUMP,
		Operation {
			execute: op_jump,
			constant_gas: GAS_MID_STEP,
			min_stack: min_stack(1, 0),
			max_stack: max_stack(1, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::JUMPI,
		Operation {
			execute: op_jumpi,
			constant_gas: GAS_SLOW_STEP,
			min_stack: min_stack(2, 0),
			max_stack: max_stack(2, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::PC,
		Operation {
			execute: op_pc,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::MSIZE,
		Operation {
			execute: op_msize,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::GAS,
		Operation {
			execute: op_gas,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::JUMPDEST,
		Operation {
			execute: op_jumpdest,
			constant_gas: params::JUMPDEST_GAS,
			min_stack: min_stack(0, 0),
			max_stack: max_stack(0, 0),
			..UNDEFINED
		},
	);

	for byte in Opcode::PUSH1.0..=Opcode::PUSH32.0 {
		table.set(
			Opcode(byte),
			Operation {
				execute: op_push,
				constant_gas: GAS_FASTEST_STEP,
				min_stack: min_stack(0, 1),
				max_stack: max_stack(0, 1),
				..UNDEFINED
			},
		);
	}
	for n in 1..=16usize {
		table.set(
			Opcode(Opcode::DUP1.0 + n as u8 - 1),
			Operation {
				execute: op_dup,
				constant_gas: GAS_FASTEST_STEP,
				min_stack: min_stack(n, n + 1),
				max_stack: max_stack(n, n + 1),
				..UNDEFINED
			},
		);
		table.set(
			Opcode(Opcode::SWAP1.0 + n as u8 - 1),
			Operation {
				execute: op_swap,
				constant_gas: GAS_FASTEST_STEP,
				min_stack: min_stack(n + 1, n + 1),
				max_stack: max_stack(n + 1, n + 1),
				..UNDEFINED
			},
		);
	}

	let log_gas: [GasFn; 5] = [
		gas_table::gas_log0,
		gas_table::gas_log1,
		gas_table::gas_log2,
		gas_table::gas_log3,
		gas_table::gas_log4,
	];
	for (n, gas_fn) in log_gas.into_iter().enumerate() {
		table.set(
			Opcode(Opcode::LOG0.0 + n as u8),
			Operation {
				execute: op_log,
				constant_gas: 0,
				dynamic_gas: Some(gas_fn),
				memory_size: Some(memory_table::memory_log),
				min_stack: min_stack(n + 2, 0),
				max_stack: max_stack(n + 2, 0),
				..UNDEFINED
			},
		);
	}

	table.set(
		Opcode::CREATE,
		Operation {
			execute: op_create,
			constant_gas: params::CREATE_GAS,
			dynamic_gas: Some(gas_table::gas_create),
			memory_size: Some(memory_table::memory_create),
			min_stack: min_stack(3, 1),
			max_stack: max_stack(3, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CALL,
		Operation {
			execute: op_call,
			constant_gas: params::CALL_GAS_FRONTIER,
			dynamic_gas: Some(gas_table::gas_call),
			memory_size: Some(memory_table::memory_call),
			min_stack: min_stack(7, 1),
			max_stack: max_stack(7, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CALLCODE,
		Operation {
			execute: op_callcode,
			constant_gas: params::CALL_GAS_FRONTIER,
			dynamic_gas: Some(gas_table::gas_call_code),
			memory_size: Some(memory_table::memory_call),
			min_stack: min_stack(7, 1),
			max_stack: max_stack(7, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::RETURN,
		Operation {
			execute: op_return,
			constant_gas: 0,
			dynamic_gas: Some(gas_table::gas_return),
			memory_size: Some(memory_table::memory_return),
			min_stack: min_stack(2, 0),
			max_stack: max_stack(2, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SELFDESTRUCT,
		Operation {
			execute: op_selfdestruct,
			constant_gas: 0,
			dynamic_gas: Some(gas_table::gas_selfdestruct),
			min_stack: min_stack(1, 0),
			max_stack: max_stack(1, 0),
			..UNDEFINED
		},
	);

	table
}

/// Homestead enables DELEGATECALL.
pub(crate) fn new_homestead_instruction_set() -> JumpTable {
	let mut table = new_frontier_instruction_set();
	table.set(
		Opcode::DELEGATECALL,
		Operation {
			execute: op_delegatecall,
			constant_gas: params::CALL_GAS_FRONTIER,
			dynamic_gas: Some(gas_table::gas_delegate_call),
			memory_size: Some(memory_table::memory_delegate_call),
			min_stack: min_stack(6, 1),
			max_stack: max_stack(6, 1),
			..UNDEFINED
		},
	);
	table
}

/// Tangerine Whistle repriced the state-touching opcodes (EIP-150).
pub(crate) fn new_tangerine_whistle_instruction_set() -> JumpTable {
	let mut table = new_homestead_instruction_set();
	table.0[Opcode::BALANCE.as_usize()].constant_gas = params::BALANCE_GAS_EIP150;
	table.0[Opcode::EXTCODESIZE.as_usize()].constant_gas = params::EXTCODE_SIZE_GAS_EIP150;
	table.0[Opcode::EXTCODECOPY.as_usize()].constant_gas = params::EXTCODE_COPY_BASE_EIP150;
	table.0[Opcode::SLOAD.as_usize()].constant_gas = params::SLOAD_GAS_EIP150;
	table.0[Opcode::SELFDESTRUCT.as_usize()].constant_gas = params::SELFDESTRUCT_GAS_EIP150;
	table.0[Opcode::CALL.as_usize()].constant_gas = params::CALL_GAS_EIP150;
	table.0[Opcode::CALLCODE.as_usize()].constant_gas = params::CALL_GAS_EIP150;
	table.0[Opcode::DELEGATECALL.as_usize()].constant_gas = params::CALL_GAS_EIP150;
	table
}

/// Spurious Dragon raised the per-byte EXP cost (EIP-160).
pub(crate) fn new_spurious_dragon_instruction_set() -> JumpTable {
	let mut table = new_tangerine_whistle_instruction_set();
	table.0[Opcode::EXP.as_usize()].dynamic_gas = Some(gas_table::gas_exp_eip158);
	table
}

/// Byzantium enables STATICCALL, RETURNDATASIZE, RETURNDATACOPY and REVERT.
pub(crate) fn new_byzantium_instruction_set() -> JumpTable {
	let mut table = new_spurious_dragon_instruction_set();
	table.set(
		Opcode::STATICCALL,
		Operation {
			execute: op_staticcall,
			constant_gas: params::CALL_GAS_EIP150,
			dynamic_gas: Some(gas_table::gas_static_call),
			memory_size: Some(memory_table::memory_static_call),
			min_stack: min_stack(6, 1),
			max_stack: max_stack(6, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::RETURNDATASIZE,
		Operation {
			execute: op_returndatasize,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::RETURNDATACOPY,
		Operation {
			execute: op_returndatacopy,
			constant_gas: GAS_FASTEST_STEP,
			dynamic_gas: Some(gas_table::gas_return_data_copy),
			memory_size: Some(memory_table::memory_return_data_copy),
			min_stack: min_stack(3, 0),
			max_stack: max_stack(3, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::REVERT,
		Operation {
			execute: op_revert,
			constant_gas: 0,
			dynamic_gas: Some(gas_table::gas_revert),
			memory_size: Some(memory_table::memory_revert),
			min_stack: min_stack(2, 0),
			max_stack: max_stack(2, 0),
			..UNDEFINED
		},
	);
	table
}

/// Constantinople enables the shift opcodes, EXTCODEHASH and CREATE2.
pub(crate) fn new_constantinople_instruction_set() -> JumpTable {
	let mut table = new_byzantium_instruction_set();
	table.set(
		Opcode::SHL,
		Operation {
			execute: op_shl,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SHR,
		Operation {
			execute: op_shr,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SAR,
		Operation {
			execute: op_sar,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(2, 1),
			max_stack: max_stack(2, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::EXTCODEHASH,
		Operation {
			execute: op_extcodehash,
			constant_gas: params::EXTCODE_HASH_GAS_CONSTANTINOPLE,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::CREATE2,
		Operation {
			execute: op_create2,
			constant_gas: params::CREATE2_GAS,
			dynamic_gas: Some(gas_table::gas_create2),
			memory_size: Some(memory_table::memory_create2),
			min_stack: min_stack(4, 1),
			max_stack: max_stack(4, 1),
			..UNDEFINED
		},
	);
	table
}

/// Istanbul: CHAINID, SELFBALANCE, the EIP-1884 trie repricing and
/// EIP-2200 storage metering.
pub(crate) fn new_istanbul_instruction_set() -> JumpTable {
	let mut table = new_constantinople_instruction_set();
	table.set(
		Opcode::CHAINID,
		Operation {
			execute: op_chainid,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::SELFBALANCE,
		Operation {
			execute: op_selfbalance,
			constant_gas: GAS_FAST_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.0[Opcode::BALANCE.as_usize()].constant_gas = params::BALANCE_GAS_EIP1884;
	table.0[Opcode::EXTCODEHASH.as_usize()].constant_gas = params::EXTCODE_HASH_GAS_EIP1884;
	table.0[Opcode::SLOAD.as_usize()].constant_gas = params::SLOAD_GAS_EIP1884;
	table.0[Opcode::SSTORE.as_usize()].dynamic_gas = Some(gas_table::gas_sstore_eip2200);
	table
}

/// Berlin: warm/cold account and storage access of EIP-2929.
pub(crate) fn new_berlin_instruction_set() -> JumpTable {
	let mut table = new_istanbul_instruction_set();

	for op in [Opcode::BALANCE, Opcode::EXTCODESIZE, Opcode::EXTCODEHASH] {
		table.0[op.as_usize()].constant_gas = params::WARM_STORAGE_READ_COST_EIP2929;
		table.0[op.as_usize()].dynamic_gas = Some(operations_acl::gas_eip2929_account_check);
	}
	table.0[Opcode::EXTCODECOPY.as_usize()].constant_gas =
		params::WARM_STORAGE_READ_COST_EIP2929;
	table.0[Opcode::EXTCODECOPY.as_usize()].dynamic_gas =
		Some(operations_acl::gas_ext_code_copy_eip2929);

	table.0[Opcode::SLOAD.as_usize()].constant_gas = 0;
	table.0[Opcode::SLOAD.as_usize()].dynamic_gas = Some(operations_acl::gas_sload_eip2929);
	table.0[Opcode::SSTORE.as_usize()].dynamic_gas = Some(operations_acl::gas_sstore_eip2929);

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

	table.0[Opcode::SELFDESTRUCT.as_usize()].dynamic_gas =
		Some(operations_acl::gas_selfdestruct_eip2929);
	table
}

/// London: BASEFEE and the EIP-3529 refund reduction.
pub(crate) fn new_london_instruction_set() -> JumpTable {
	let mut table = new_berlin_instruction_set();
	table.set(
		Opcode::BASEFEE,
		Operation {
			execute: op_basefee,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.0[Opcode::SSTORE.as_usize()].dynamic_gas = Some(operations_acl::gas_sstore_eip3529);
	table.0[Opcode::SELFDESTRUCT.as_usize()].dynamic_gas =
		Some(operations_acl::gas_selfdestruct_eip3529);
	table
}

/// The Merge: DIFFICULTY becomes PREVRANDAO.
pub(crate) fn new_merge_instruction_set() -> JumpTable {
	let mut table = new_london_instruction_set();
	table.0[Opcode::DIFFICULTY.as_usize()].execute = op_random;
	table
}

/// Shanghai: PUSH0 and the EIP-3860 initcode charge.
pub(crate) fn new_shanghai_instruction_set() -> JumpTable {
	let mut table = new_merge_instruction_set();
	table.set(
		Opcode::PUSH0,
		Operation {
			execute: op_push0,
			constant_gas: GAS_QUICK_STEP,
			min_stack: min_stack(0, 1),
			max_stack: max_stack(0, 1),
			..UNDEFINED
		},
	);
	table.0[Opcode::CREATE.as_usize()].dynamic_gas = Some(gas_table::gas_create_eip3860);
	table.0[Opcode::CREATE2.as_usize()].dynamic_gas = Some(gas_table::gas_create2_eip3860);
	table
}

/// Cancun: transient storage, MCOPY, BLOBHASH and EIP-6780 SELFDESTRUCT.
pub(crate) fn new_cancun_instruction_set() -> JumpTable {
	let mut table = new_shanghai_instruction_set();
	table.set(
		Opcode::TLOAD,
		Operation {
			execute: op_tload,
			constant_gas: params::WARM_STORAGE_READ_COST_EIP2929,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::TSTORE,
		Operation {
			execute: op_tstore,
			constant_gas: params::WARM_STORAGE_READ_COST_EIP2929,
			min_stack: min_stack(2, 0),
			max_stack: max_stack(2, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::MCOPY,
		Operation {
			execute: op_mcopy,
			constant_gas: GAS_FASTEST_STEP,
			dynamic_gas: Some(gas_table::gas_mcopy),
			memory_size: Some(memory_table::memory_mcopy),
			min_stack: min_stack(3, 0),
			max_stack: max_stack(3, 0),
			..UNDEFINED
		},
	);
	table.set(
		Opcode::BLOBHASH,
		Operation {
			execute: op_blobhash,
			constant_gas: GAS_FASTEST_STEP,
			min_stack: min_stack(1, 1),
			max_stack: max_stack(1, 1),
			..UNDEFINED
		},
	);
	table.0[Opcode::SELFDESTRUCT.as_usize()].execute = op_selfdestruct_6780;
	table
}
