//! Comparison, byte extraction and shift helpers for the 0x10 range.

use primitive_types::U256;

use crate::utils::{I256, Sign};

#[inline]
pub fn slt(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	if op1 < op2 { U256::one() } else { U256::zero() }
}

#[inline]
pub fn sgt(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	if op1 > op2 { U256::one() } else { U256::zero() }
}

/// The `op1`-th most significant byte of `op2`, zero when out of range.
#[inline]
pub fn byte(op1: U256, op2: U256) -> U256 {
	if op1 >= U256::from(32) {
		return U256::zero();
	}
	// U256::byte indexes from the least significant end.
	U256::from(op2.byte(31 - op1.low_u64() as usize))
}

#[inline]
pub fn shl(shift: U256, value: U256) -> U256 {
	if value == U256::zero() || shift >= U256::from(256) {
		U256::zero()
	} else {
		value << shift.low_u64() as usize
	}
}

#[inline]
pub fn shr(shift: U256, value: U256) -> U256 {
	if value == U256::zero() || shift >= U256::from(256) {
		U256::zero()
	} else {
		value >> shift.low_u64() as usize
	}
}

#[inline]
pub fn sar(shift: U256, value: U256) -> U256 {
	let signed = I256::from(value);

	if signed == I256::zero() || shift >= U256::from(256) {
		match signed.0 {
			// value is 0 or >= 1, shifting to 0
			Sign::Plus | Sign::Zero => U256::zero(),
			// value < 0, shifting to -1
			Sign::Minus => I256(Sign::Minus, U256::one()).into(),
		}
	} else {
		let shift = shift.low_u64() as usize;
		match signed.0 {
			Sign::Plus | Sign::Zero => signed.1 >> shift,
			Sign::Minus => {
				let shifted = ((signed.1.overflowing_sub(U256::one()).0) >> shift)
					.overflowing_add(U256::one())
					.0;
				I256(Sign::Minus, shifted).into()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn byte_is_most_significant_first() {
		let v = U256::from_big_endian(&{
			let mut b = [0u8; 32];
			b[0] = 0xaa;
			b[31] = 0xbb;
			b
		});
		assert_eq!(byte(U256::zero(), v), U256::from(0xaa));
		assert_eq!(byte(U256::from(31), v), U256::from(0xbb));
		assert_eq!(byte(U256::from(32), v), U256::zero());
	}

	#[test]
	fn shifts_of_256_or_more() {
		assert_eq!(shl(U256::from(256), U256::one()), U256::zero());
		assert_eq!(shr(U256::from(256), U256::MAX), U256::zero());
		// Arithmetic right shift saturates to -1 for negative values.
		assert_eq!(sar(U256::from(256), U256::MAX), U256::MAX);
		assert_eq!(sar(U256::from(300), U256::from(7)), U256::zero());
	}

	#[test]
	fn sar_rounds_toward_negative_infinity() {
		// -1 >> 1 == -1
		assert_eq!(sar(U256::one(), U256::MAX), U256::MAX);
		// -4 >> 1 == -2
		let minus_four = U256::MAX - U256::from(3);
		let minus_two = U256::MAX - U256::one();
		assert_eq!(sar(U256::one(), minus_four), minus_two);
		// 4 >> 1 == 2
		assert_eq!(sar(U256::one(), U256::from(4)), U256::from(2));
	}

	#[test]
	fn signed_comparison() {
		let minus_one = U256::MAX;
		assert_eq!(slt(minus_one, U256::one()), U256::one());
		assert_eq!(sgt(U256::one(), minus_one), U256::one());
		assert_eq!(slt(U256::one(), minus_one), U256::zero());
	}
}
