use primitive_types::U256;

use crate::error::Error;

/// Quick-step operations: arithmetic and bit ops over values already on the
/// stack.
pub const GAS_QUICK_STEP: u64 = 2;
/// Fastest-tier operations.
pub const GAS_FASTEST_STEP: u64 = 3;
/// Fast-tier operations.
pub const GAS_FAST_STEP: u64 = 5;
/// Mid-tier operations.
pub const GAS_MID_STEP: u64 = 8;
/// Slow-tier operations.
pub const GAS_SLOW_STEP: u64 = 10;
/// Ext-tier operations, external account touches and the like.
pub const GAS_EXT_STEP: u64 = 20;

/// Gas actually granted to a child call.
///
/// With EIP-150 active, a call may receive at most 63/64 of the gas left
/// after the base costs; the stack-requested amount only applies when it is
/// lower than the cap.
pub fn call_gas(
	is_eip150: bool,
	available_gas: u64,
	base: u64,
	call_cost: U256,
) -> Result<u64, Error> {
	if is_eip150 {
		let available_gas = available_gas.checked_sub(base).ok_or(Error::OutOfGas)?;
		let gas = available_gas - available_gas / 64;
		if call_cost > U256::from(u64::MAX) || gas < call_cost.low_u64() {
			return Ok(gas);
		}
	}
	if call_cost > U256::from(u64::MAX) {
		return Err(Error::GasUintOverflow);
	}

	Ok(call_cost.low_u64())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn caps_at_63_64ths() {
		// 6400 available after base: cap is 6400 - 100 = 6300.
		assert_eq!(
			call_gas(true, 6400, 0, U256::from(u64::MAX)).unwrap(),
			6300
		);
		assert_eq!(call_gas(true, 6400, 0, U256::from(1000)).unwrap(), 1000);
	}

	#[test]
	fn pre_eip150_takes_requested_amount() {
		assert_eq!(call_gas(false, 100, 0, U256::from(5000)).unwrap(), 5000);
		assert!(matches!(
			call_gas(false, 100, 0, U256::MAX),
			Err(Error::GasUintOverflow)
		));
	}
}
