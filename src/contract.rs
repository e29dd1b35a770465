use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use primitive_types::{H160, H256, U256};

use crate::analysis::{code_bitmap, Bitvec};
use crate::opcode::Opcode;

/// Transaction-scoped cache of JUMPDEST analyses, keyed by code hash.
/// Shared by every frame of one transaction.
pub type AnalysisCache = Rc<RefCell<HashMap<H256, Rc<Bitvec>>>>;

/// One activation of executing code for one address with one gas budget.
#[derive(Clone, Debug)]
pub struct Contract {
	/// Address of the account that initiated this frame. For a delegate
	/// call this is the caller of the caller.
	pub caller_address: H160,
	/// Address whose storage and balance this frame operates on.
	pub self_address: H160,

	/// Aggregated result of JUMPDEST analysis across the transaction.
	jumpdests: AnalysisCache,
	/// Locally cached result of JUMPDEST analysis.
	analysis: Option<Rc<Bitvec>>,

	pub code: Vec<u8>,
	pub code_hash: H256,
	pub code_address: Option<H160>,
	pub input: Vec<u8>,

	pub gas: u64,
	pub value: U256,
}

impl Contract {
	/// A new frame executing on behalf of `caller` against `object`'s
	/// storage.
	#[must_use]
	pub fn new(
		caller: H160,
		object: H160,
		value: U256,
		gas: u64,
		jumpdests: AnalysisCache,
	) -> Self {
		Self {
			caller_address: caller,
			self_address: object,
			jumpdests,
			analysis: None,
			code: Vec::new(),
			code_hash: H256::zero(),
			code_address: None,
			input: Vec::new(),
			gas,
			value,
		}
	}

	/// Turn the frame into a delegate frame: the caller and value seen by
	/// the executing code are the parent's.
	#[must_use]
	pub fn as_delegate(mut self, parent: &Contract) -> Self {
		self.caller_address = parent.caller_address;
		self.value = parent.value;
		self
	}

	/// Set the code to execute together with the address and hash of the
	/// account that backs it.
	pub fn set_call_code(&mut self, addr: H160, hash: H256, code: Vec<u8>) {
		self.code = code;
		self.code_hash = hash;
		self.code_address = Some(addr);
	}

	/// Set code without a known hash. Initcode mid-construction has no hash
	/// yet, so its jump analysis stays local to this frame.
	pub fn set_code_optional_hash(&mut self, addr: H160, code: Vec<u8>, hash: H256) {
		self.code = code;
		self.code_hash = hash;
		self.code_address = Some(addr);
	}

	/// Try to deduct gas, returning whether enough was available.
	#[inline]
	pub fn use_gas(&mut self, gas: u64) -> bool {
		if self.gas < gas {
			return false;
		}
		self.gas -= gas;
		true
	}

	/// The `n`-th opcode of the code, STOP past the end.
	#[inline]
	#[must_use]
	pub fn get_op(&self, n: u64) -> Opcode {
		if n < self.code.len() as u64 {
			Opcode(self.code[n as usize])
		} else {
			Opcode::STOP
		}
	}

	/// Whether `dest` is a JUMPDEST opcode outside any PUSH immediate.
	pub fn valid_jumpdest(&mut self, dest: &U256) -> bool {
		if *dest > U256::from(u64::MAX) {
			return false;
		}
		let udest = dest.low_u64();
		// PC cannot go beyond the code length, no point analysing further.
		if udest >= self.code.len() as u64 {
			return false;
		}
		if Opcode(self.code[udest as usize]) != Opcode::JUMPDEST {
			return false;
		}
		self.is_code(udest)
	}

	/// Whether the position is an actual opcode, as opposed to the data
	/// segment following a PUSHn.
	fn is_code(&mut self, udest: u64) -> bool {
		if let Some(analysis) = &self.analysis {
			return analysis.code_segment(udest);
		}
		// Hashed code belongs to a deployed contract, so the analysis is
		// kept in the transaction-wide cache. Hashless code is initcode,
		// analysed locally only.
		if self.code_hash != H256::zero() {
			let analysis = self
				.jumpdests
				.borrow_mut()
				.entry(self.code_hash)
				.or_insert_with(|| Rc::new(code_bitmap(&self.code)))
				.clone();
			let valid = analysis.code_segment(udest);
			self.analysis = Some(analysis);
			valid
		} else {
			let analysis = Rc::new(code_bitmap(&self.code));
			let valid = analysis.code_segment(udest);
			self.analysis = Some(analysis);
			valid
		}
	}
}
