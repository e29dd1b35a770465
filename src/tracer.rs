use primitive_types::{H160, U256};

use crate::error::Error;
use crate::interpreter::ScopeContext;
use crate::opcode::Opcode;

/// Execution observer.
///
/// Callback order for one transaction:
/// `capture_tx_start → (capture_start → capture_state* →
/// (capture_enter → … → capture_exit)* → capture_end) → capture_tx_end`,
/// with `capture_fault` replacing the final `capture_state` of a frame that
/// fails. All methods default to no-ops so implementations only override
/// what they observe.
#[allow(unused_variables)]
pub trait Tracer {
	/// Transaction boundaries, driven by the embedder.
	fn capture_tx_start(&mut self, gas_limit: u64) {}
	fn capture_tx_end(&mut self, rest_gas: u64) {}

	/// Top-level call or create begins.
	fn capture_start(
		&mut self,
		from: H160,
		to: H160,
		create: bool,
		input: &[u8],
		gas: u64,
		value: U256,
	) {
	}
	/// Top-level call or create ends.
	fn capture_end(&mut self, output: &[u8], gas_used: u64, err: Option<&Error>) {}

	/// A nested frame is entered; `typ` is the opcode that caused it.
	fn capture_enter(
		&mut self,
		typ: Opcode,
		from: H160,
		to: H160,
		input: &[u8],
		gas: u64,
		value: U256,
	) {
	}
	/// A nested frame returns.
	fn capture_exit(&mut self, output: &[u8], gas_used: u64, err: Option<&Error>) {}

	/// One opcode is about to execute.
	#[allow(clippy::too_many_arguments)]
	fn capture_state(
		&mut self,
		pc: u64,
		op: Opcode,
		gas: u64,
		cost: u64,
		scope: &ScopeContext,
		return_data: &[u8],
		depth: usize,
		err: Option<&Error>,
	) {
	}
	/// Execution of the frame failed at `pc`.
	#[allow(clippy::too_many_arguments)]
	fn capture_fault(
		&mut self,
		pc: u64,
		op: Opcode,
		gas: u64,
		cost: u64,
		scope: &ScopeContext,
		depth: usize,
		err: Option<&Error>,
	) {
	}
}
