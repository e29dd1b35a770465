//! An Ethereum Virtual Machine execution core: a stack-based bytecode
//! interpreter with per-fork gas accounting, recursive call/create dispatch
//! and transactional rollback against an injected state store.
//!
//! The entrypoint is [`Evm`]: construct one per transaction from a
//! [`BlockContext`], a [`TxContext`], a [`StateDB`] implementation and the
//! [`Rules`] of the active fork, then drive it through
//! [`call`](Evm::call) / [`create`](Evm::create) and friends. State
//! mutations accumulate in the adapter and are durable only if the
//! top-level call does not fail or revert.

mod analysis;
mod context;
mod contract;
mod eips;
mod error;
mod evm;
mod gas;
mod gas_table;
mod instructions;
mod interpreter;
mod jump_table;
mod memory;
mod memory_table;
mod opcode;
mod operations_acl;
pub mod params;
mod rules;
mod stack;
mod statedb;
mod tracer;
mod utils;

pub use crate::analysis::{code_bitmap, Bitvec};
pub use crate::context::{
	default_can_transfer, default_transfer, BlockContext, CanTransferFn, GetHashFn, TransferFn,
	TxContext,
};
pub use crate::contract::{AnalysisCache, Contract};
pub use crate::error::Error;
pub use crate::evm::{create_address, create_address2, Evm, EMPTY_CODE_HASH};
pub use crate::interpreter::{Config, ScopeContext};
pub use crate::memory::Memory;
pub use crate::opcode::Opcode;
pub use crate::rules::Rules;
pub use crate::stack::Stack;
pub use crate::statedb::{Log, StateDB};
pub use crate::tracer::Tracer;
pub use crate::utils::{h256_to_u256, u256_to_address, u256_to_h256};
