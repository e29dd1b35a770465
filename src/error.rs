use std::borrow::Cow;

use thiserror::Error;

use crate::opcode::Opcode;

/// Failure modes of EVM execution.
///
/// Any of these except [`Error::Reverted`] consumes the remaining gas of the
/// frame it occurs in and rolls the frame's state changes back. `Reverted`
/// rolls back too, but the unconsumed gas is returned to the caller and the
/// revert payload is preserved as return data.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
	/// Execution ran out of gas.
	#[error("out of gas")]
	OutOfGas,
	/// Contract creation ran out of gas while storing the returned code.
	#[error("contract creation code storage out of gas")]
	CodeStoreOutOfGas,
	/// Call depth exceeded the 1024 limit.
	#[error("max call depth exceeded")]
	Depth,
	/// A transfer was requested for more than the sender's balance.
	#[error("insufficient balance for transfer")]
	InsufficientBalance,
	/// Contract creation hit an account with non-empty nonce or code.
	#[error("contract address collision")]
	ContractAddressCollision,
	/// The REVERT opcode was executed.
	#[error("execution reverted")]
	Reverted,
	/// Initcode larger than the EIP-3860 limit.
	#[error("max initcode size exceeded")]
	MaxInitCodeSizeExceeded,
	/// Deployed code larger than the EIP-170 limit.
	#[error("max code size exceeded")]
	MaxCodeSizeExceeded,
	/// JUMP/JUMPI to a position that is not a JUMPDEST opcode.
	#[error("invalid jump destination")]
	InvalidJump,
	/// A state mutation was attempted from a read-only (STATICCALL) frame.
	#[error("write protection")]
	WriteProtection,
	/// RETURNDATACOPY reached past the end of the return data buffer.
	#[error("return data out of bounds")]
	ReturnDataOutOfBounds,
	/// 64-bit gas arithmetic overflowed.
	#[error("gas uint64 overflow")]
	GasUintOverflow,
	/// An undefined opcode byte was executed.
	#[error("invalid opcode: {0}")]
	InvalidOpcode(Opcode),
	/// Deployed code starts with the 0xEF byte reserved by EIP-3541.
	#[error("invalid code: must not begin with 0xef")]
	InvalidCode,
	/// Creation with a sender whose nonce is already at the maximum.
	#[error("nonce uint64 overflow")]
	NonceUintOverflow,
	/// The operand stack held fewer items than the opcode pops.
	#[error("stack underflow ({stack_len} <=> {required})")]
	StackUnderflow { stack_len: usize, required: usize },
	/// The opcode's pushes would grow the stack past its limit.
	#[error("stack limit reached {stack_len} ({limit})")]
	StackOverflow { stack_len: usize, limit: usize },
	/// Failures without a dedicated kind, e.g. precompile errors.
	#[error("{0}")]
	Other(Cow<'static, str>),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display() {
		assert_eq!(Error::OutOfGas.to_string(), "out of gas");
		assert_eq!(
			Error::StackUnderflow {
				stack_len: 1,
				required: 3
			}
			.to_string(),
			"stack underflow (1 <=> 3)"
		);
		assert_eq!(
			Error::InvalidOpcode(Opcode(0x0c)).to_string(),
			"invalid opcode: opcode 0xc not defined"
		);
	}
}
