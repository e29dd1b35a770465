//! Pure 256-bit arithmetic underlying the 0x00-range opcodes. Everything is
//! modular over 2^256; division by zero yields zero.

use primitive_types::{U256, U512};

use crate::utils::I256;

#[inline]
pub fn div(op1: U256, op2: U256) -> U256 {
	op1.checked_div(op2).unwrap_or_default()
}

#[inline]
pub fn sdiv(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	(op1 / op2).into()
}

#[inline]
pub fn rem(op1: U256, op2: U256) -> U256 {
	op1.checked_rem(op2).unwrap_or_default()
}

#[inline]
pub fn srem(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		let op1: I256 = op1.into();
		let op2: I256 = op2.into();
		(op1 % op2).into()
	}
}

fn u512_to_u256(v: U512) -> U256 {
	let U512(words) = v;
	U256([words[0], words[1], words[2], words[3]])
}

#[inline]
pub fn addmod(op1: U256, op2: U256, op3: U256) -> U256 {
	if op3 == U256::zero() {
		return U256::zero();
	}
	let op1 = U512::from(op1);
	let op2 = U512::from(op2);
	let op3 = U512::from(op3);
	u512_to_u256((op1 + op2) % op3)
}

#[inline]
pub fn mulmod(op1: U256, op2: U256, op3: U256) -> U256 {
	if op3 == U256::zero() {
		return U256::zero();
	}
	u512_to_u256(op1.full_mul(op2) % U512::from(op3))
}

/// Modular exponentiation by squaring.
#[inline]
pub fn exp(op1: U256, op2: U256) -> U256 {
	let mut op1 = op1;
	let mut op2 = op2;
	let mut r = U256::one();

	while op2 != U256::zero() {
		if op2 & U256::one() != U256::zero() {
			r = r.overflowing_mul(op1).0;
		}
		op2 = op2 >> 1usize;
		op1 = op1.overflowing_mul(op1).0;
	}

	r
}

/// Sign-extend `op2` viewed as an `(op1 + 1)`-byte value.
#[inline]
pub fn signextend(op1: U256, op2: U256) -> U256 {
	if op1 >= U256::from(32) {
		return op2;
	}
	let bit = op1.low_u64() as usize * 8 + 7;
	let mask = (U256::one() << bit) - U256::one();
	if op2.bit(bit) {
		op2 | !mask
	} else {
		op2 & mask
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn division_by_zero_is_zero() {
		assert_eq!(div(U256::from(7), U256::zero()), U256::zero());
		assert_eq!(sdiv(U256::from(7), U256::zero()), U256::zero());
		assert_eq!(rem(U256::from(7), U256::zero()), U256::zero());
		assert_eq!(srem(U256::from(7), U256::zero()), U256::zero());
		assert_eq!(addmod(U256::one(), U256::one(), U256::zero()), U256::zero());
		assert_eq!(mulmod(U256::one(), U256::one(), U256::zero()), U256::zero());
	}

	#[test]
	fn sdiv_min_by_minus_one() {
		let min = U256::one() << 255;
		let minus_one = U256::MAX;
		// i256::MIN / -1 wraps back to i256::MIN.
		assert_eq!(sdiv(min, minus_one), min);
	}

	#[test]
	fn addmod_mulmod_use_wide_intermediates() {
		let max = U256::MAX;
		// (max + max) % max == 0, which a 256-bit intermediate would break.
		assert_eq!(addmod(max, max, max), U256::zero());
		assert_eq!(
			addmod(max, U256::from(3), max),
			U256::from(3)
		);
		assert_eq!(mulmod(max, max, max), U256::zero());
	}

	#[test]
	fn exp_edge_cases() {
		assert_eq!(exp(U256::zero(), U256::zero()), U256::one());
		assert_eq!(exp(U256::from(2), U256::from(10)), U256::from(1024));
		assert_eq!(exp(U256::from(10), U256::zero()), U256::one());
		// 2^256 wraps to zero.
		assert_eq!(exp(U256::from(2), U256::from(256)), U256::zero());
	}

	#[test]
	fn signextend_propagates_the_sign_bit() {
		// 0xff as a one-byte value is -1.
		assert_eq!(signextend(U256::zero(), U256::from(0xff)), U256::MAX);
		// 0x7f stays positive.
		assert_eq!(
			signextend(U256::zero(), U256::from(0x7f)),
			U256::from(0x7f)
		);
		// Width >= 32 bytes is the identity.
		assert_eq!(
			signextend(U256::from(32), U256::from(0xff00)),
			U256::from(0xff00)
		);
		// Upper garbage is truncated when the sign bit is clear.
		assert_eq!(
			signextend(U256::zero(), U256::from(0x1234)),
			U256::from(0x34)
		);
	}
}
