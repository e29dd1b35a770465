//! Precompiled contracts: native implementations registered at fixed low
//! addresses, grouped into the per-fork registries the VM dispatches
//! against.

mod blake2;
mod bn128;
mod kzg;
mod modexp;
mod simple;

use std::borrow::Cow;
use std::collections::BTreeMap;

use primitive_types::H160;

pub use crate::blake2::Blake2F;
pub use crate::bn128::{Bn256Add, Bn256Pairing, Bn256ScalarMul};
pub use crate::kzg::KzgPointEvaluation;
pub use crate::modexp::ModExp;
pub use crate::simple::{EcRecover, Identity, Ripemd160, Sha256};

/// Failure of a precompile run. Bubbles up as an execution error that
/// reverts the containing call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrecompileError(pub Cow<'static, str>);

impl From<&'static str> for PrecompileError {
	fn from(message: &'static str) -> Self {
		PrecompileError(message.into())
	}
}

/// A contract implemented in native code rather than bytecode.
pub trait PrecompiledContract {
	/// Gas the given input costs to run. Deducted in full before `run`.
	fn required_gas(&self, input: &[u8]) -> u64;
	/// Execute over the input, producing the raw output bytes.
	fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError>;
}

/// Address -> precompile map of one fork.
pub type Registry = BTreeMap<H160, Box<dyn PrecompiledContract>>;

const fn address(last: u8) -> H160 {
	H160([
		0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, last,
	])
}

/// `base + word * ceil(len/32)`, saturating; an unaffordable result simply
/// exhausts the call's gas.
fn linear_cost(len: u64, base: u64, word: u64) -> u64 {
	base.saturating_add(word.saturating_mul(len.saturating_add(31) / 32))
}

/// The Frontier/Homestead set: ECRECOVER, SHA256, RIPEMD160, IDENTITY.
#[must_use]
pub fn homestead() -> Registry {
	let mut registry = Registry::new();
	registry.insert(address(1), Box::new(EcRecover) as Box<dyn PrecompiledContract>);
	registry.insert(address(2), Box::new(Sha256));
	registry.insert(address(3), Box::new(Ripemd160));
	registry.insert(address(4), Box::new(Identity));
	registry
}

/// Byzantium adds MODEXP and the alt-bn128 trio.
#[must_use]
pub fn byzantium() -> Registry {
	let mut registry = homestead();
	registry.insert(address(5), Box::new(ModExp { eip2565: false }));
	registry.insert(address(6), Box::new(Bn256Add { istanbul: false }));
	registry.insert(address(7), Box::new(Bn256ScalarMul { istanbul: false }));
	registry.insert(address(8), Box::new(Bn256Pairing { istanbul: false }));
	registry
}

/// Istanbul reprices bn128 (EIP-1108) and adds BLAKE2F.
#[must_use]
pub fn istanbul() -> Registry {
	let mut registry = byzantium();
	registry.insert(address(6), Box::new(Bn256Add { istanbul: true }));
	registry.insert(address(7), Box::new(Bn256ScalarMul { istanbul: true }));
	registry.insert(address(8), Box::new(Bn256Pairing { istanbul: true }));
	registry.insert(address(9), Box::new(Blake2F));
	registry
}

/// Berlin reprices MODEXP (EIP-2565).
#[must_use]
pub fn berlin() -> Registry {
	let mut registry = istanbul();
	registry.insert(address(5), Box::new(ModExp { eip2565: true }));
	registry
}

/// Cancun adds the KZG point-evaluation precompile at 0x0a.
#[must_use]
pub fn cancun() -> Registry {
	let mut registry = berlin();
	registry.insert(address(0x0a), Box::new(KzgPointEvaluation));
	registry
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fork_registries_grow() {
		assert_eq!(homestead().len(), 4);
		assert_eq!(byzantium().len(), 8);
		assert_eq!(istanbul().len(), 9);
		assert_eq!(berlin().len(), 9);
		assert_eq!(cancun().len(), 10);
		assert!(cancun().contains_key(&address(0x0a)));
	}

	#[test]
	fn linear_cost_rounds_up_to_words() {
		assert_eq!(linear_cost(0, 15, 3), 15);
		assert_eq!(linear_cost(1, 15, 3), 18);
		assert_eq!(linear_cost(32, 15, 3), 18);
		assert_eq!(linear_cost(33, 15, 3), 21);
	}
}
