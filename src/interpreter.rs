//! The fetch-decode-execute loop.

use crate::contract::Contract;
use crate::error::Error;
use crate::evm::Evm;
use crate::gas_table::to_word_size;
use crate::memory::Memory;
use crate::stack::Stack;
use crate::tracer::Tracer;

/// Interpreter configuration options.
#[derive(Default)]
pub struct Config {
	/// Opcode-level execution observer.
	pub tracer: Option<Box<dyn Tracer>>,
	/// Forces the EIP-1559 base fee to 0 (needed for 0-price calls).
	pub no_base_fee: bool,
	/// Enables recording of KECCAK256 preimages into the state adapter.
	pub enable_preimage_recording: bool,
	/// Additional EIPs activated on top of the fork baseline.
	pub extra_eips: Vec<u64>,
}

/// Per-call execution scope: the operand stack and linear memory of the
/// frame, and the frame itself. Program counter and gas are carried
/// separately.
pub struct ScopeContext<'a> {
	pub memory: Memory,
	pub stack: Stack,
	pub contract: &'a mut Contract,
}

/// What an opcode handler asks the loop to do next.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Control {
	/// Advance to the following instruction.
	Continue,
	/// Halt successfully with the given return bytes.
	Stop(Vec<u8>),
	/// Halt reverting, preserving the payload for the caller.
	Revert(Vec<u8>),
}

impl<'a> Evm<'a> {
	/// Run the contract's code against the given input, until a halting
	/// instruction, an error, or the end of code.
	///
	/// Returns the frame's output bytes and its verdict; `contract.gas`
	/// holds whatever gas the frame did not consume. An `Error::Reverted`
	/// verdict carries the revert payload in the output.
	pub(crate) fn run(
		&mut self,
		contract: &mut Contract,
		input: &[u8],
		read_only: bool,
	) -> (Vec<u8>, Result<(), Error>) {
		self.depth += 1;

		// Propagate read-only to every child of a static frame; restore on
		// the way out only at the frame that set it.
		let set_read_only = read_only && !self.read_only;
		if set_read_only {
			self.read_only = true;
		}

		let result = self.run_loop(contract, input);

		if set_read_only {
			self.read_only = false;
		}
		self.depth -= 1;
		result
	}

	fn run_loop(
		&mut self,
		contract: &mut Contract,
		input: &[u8],
	) -> (Vec<u8>, Result<(), Error>) {
		// Every call gets fresh return data; the buffer refills on subcall
		// exit.
		self.return_data.clear();

		if contract.code.is_empty() {
			return (Vec::new(), Ok(()));
		}
		contract.input = input.to_vec();

		let mut scope = ScopeContext {
			memory: Memory::new(),
			stack: Stack::new(),
			contract,
		};
		let mut pc: u64 = 0;
		let debug = self.config.tracer.is_some();

		loop {
			let op = scope.contract.get_op(pc);
			let operation = self.table[op.as_usize()];
			let gas_copy = scope.contract.gas;
			let mut cost = operation.constant_gas;

			// Pre-flight stack bounds for the opcode's pops and pushes.
			let stack_len = scope.stack.len();
			if stack_len < operation.min_stack {
				return (
					Vec::new(),
					Err(Error::StackUnderflow {
						stack_len,
						required: operation.min_stack,
					}),
				);
			} else if stack_len > operation.max_stack {
				return (
					Vec::new(),
					Err(Error::StackOverflow {
						stack_len,
						limit: operation.max_stack,
					}),
				);
			}
			if !scope.contract.use_gas(operation.constant_gas) {
				return (Vec::new(), Err(Error::OutOfGas));
			}

			if let Some(dynamic_gas) = operation.dynamic_gas {
				// Compute how far memory must grow, overflow-checked, then
				// the operand- and state-dependent cost on top.
				let mut memory_size: u64 = 0;
				if let Some(memory_size_fn) = operation.memory_size {
					let mem_size = match memory_size_fn(&scope.stack) {
						Ok(size) => size,
						Err(err) => return (Vec::new(), Err(err)),
					};
					memory_size = match to_word_size(mem_size).checked_mul(32) {
						Some(size) => size,
						None => return (Vec::new(), Err(Error::GasUintOverflow)),
					};
				}

				let dynamic_cost = match dynamic_gas(
					self,
					scope.contract,
					&scope.stack,
					&mut scope.memory,
					memory_size,
				) {
					Ok(cost) => cost,
					Err(_) => return (Vec::new(), Err(Error::OutOfGas)),
				};
				cost += dynamic_cost;
				if !scope.contract.use_gas(dynamic_cost) {
					return (Vec::new(), Err(Error::OutOfGas));
				}

				if debug {
					self.trace_state(pc, op, gas_copy, cost, &scope, None);
				}
				if memory_size > 0 {
					scope.memory.resize(memory_size);
				}
			} else if debug {
				self.trace_state(pc, op, gas_copy, cost, &scope, None);
			}

			match (operation.execute)(&mut pc, self, op, &mut scope) {
				// Jumps park the counter one below the target, so the
				// increment must wrap for a jump to position zero.
				Ok(Control::Continue) => pc = pc.wrapping_add(1),
				Ok(Control::Stop(ret)) => return (ret, Ok(())),
				Ok(Control::Revert(ret)) => return (ret, Err(Error::Reverted)),
				Err(err) => {
					if debug {
						self.trace_fault(pc, op, gas_copy, cost, &scope, &err);
					}
					return (Vec::new(), Err(err));
				}
			}
		}
	}

	fn trace_state(
		&mut self,
		pc: u64,
		op: crate::opcode::Opcode,
		gas: u64,
		cost: u64,
		scope: &ScopeContext<'_>,
		err: Option<&Error>,
	) {
		let depth = self.depth;
		if let Some(tracer) = self.config.tracer.as_deref_mut() {
			tracer.capture_state(pc, op, gas, cost, scope, &self.return_data, depth, err);
		}
	}

	fn trace_fault(
		&mut self,
		pc: u64,
		op: crate::opcode::Opcode,
		gas: u64,
		cost: u64,
		scope: &ScopeContext<'_>,
		err: &Error,
	) {
		let depth = self.depth;
		if let Some(tracer) = self.config.tracer.as_deref_mut() {
			tracer.capture_fault(pc, op, gas, cost, scope, depth, Some(err));
		}
	}
}
