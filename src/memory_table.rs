//! Per-opcode memory-range computation, feeding the expansion charge in the
//! interpreter loop. Each function returns the highest byte the opcode will
//! touch, before word alignment.

use primitive_types::U256;

use crate::error::Error;
use crate::stack::Stack;

/// Required memory size for an `offset`/`length` pair taken from the stack.
fn calc_mem_size64(off: U256, len: U256) -> Result<u64, Error> {
	// Zero-length accesses never touch memory, whatever the offset.
	if len.is_zero() {
		return Ok(0);
	}
	let end = off.checked_add(len).ok_or(Error::GasUintOverflow)?;
	if end > U256::from(u64::MAX) {
		return Err(Error::GasUintOverflow);
	}
	Ok(end.low_u64())
}

pub(crate) fn memory_keccak256(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, stack.back(1)?)
}

pub(crate) fn memory_call_data_copy(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, stack.back(2)?)
}

pub(crate) fn memory_return_data_copy(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, stack.back(2)?)
}

pub(crate) fn memory_code_copy(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, stack.back(2)?)
}

pub(crate) fn memory_ext_code_copy(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(1)?, stack.back(3)?)
}

pub(crate) fn memory_mload(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, U256::from(32))
}

pub(crate) fn memory_mstore(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, U256::from(32))
}

pub(crate) fn memory_mstore8(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, U256::one())
}

/// MCOPY touches both the read and the write range; the larger end wins.
pub(crate) fn memory_mcopy(stack: &Stack) -> Result<u64, Error> {
	let dst = calc_mem_size64(stack.back(0)?, stack.back(2)?)?;
	let src = calc_mem_size64(stack.back(1)?, stack.back(2)?)?;
	Ok(dst.max(src))
}

pub(crate) fn memory_create(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(1)?, stack.back(2)?)
}

pub(crate) fn memory_create2(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(1)?, stack.back(2)?)
}

pub(crate) fn memory_call(stack: &Stack) -> Result<u64, Error> {
	let input = calc_mem_size64(stack.back(5)?, stack.back(6)?)?;
	let ret = calc_mem_size64(stack.back(3)?, stack.back(4)?)?;
	Ok(input.max(ret))
}

pub(crate) fn memory_delegate_call(stack: &Stack) -> Result<u64, Error> {
	let input = calc_mem_size64(stack.back(4)?, stack.back(5)?)?;
	let ret = calc_mem_size64(stack.back(2)?, stack.back(3)?)?;
	Ok(input.max(ret))
}

pub(crate) fn memory_static_call(stack: &Stack) -> Result<u64, Error> {
	let input = calc_mem_size64(stack.back(4)?, stack.back(5)?)?;
	let ret = calc_mem_size64(stack.back(2)?, stack.back(3)?)?;
	Ok(input.max(ret))
}

pub(crate) fn memory_return(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, stack.back(1)?)
}

pub(crate) fn memory_revert(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, stack.back(1)?)
}

pub(crate) fn memory_log(stack: &Stack) -> Result<u64, Error> {
	calc_mem_size64(stack.back(0)?, stack.back(1)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_length_never_expands() {
		assert_eq!(calc_mem_size64(U256::MAX, U256::zero()), Ok(0));
	}

	#[test]
	fn end_past_u64_overflows() {
		assert_eq!(
			calc_mem_size64(U256::from(u64::MAX), U256::one()),
			Err(Error::GasUintOverflow)
		);
		assert_eq!(calc_mem_size64(U256::from(32), U256::from(32)), Ok(64));
	}
}
