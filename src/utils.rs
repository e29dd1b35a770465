//! Word conversions and signed 256-bit arithmetic support.

use core::cmp::Ordering;
use core::ops::{Div, Rem};

use primitive_types::{H160, H256, U256};

const SIGN_BIT_MASK: U256 = U256([
	0xffff_ffff_ffff_ffff,
	0xffff_ffff_ffff_ffff,
	0xffff_ffff_ffff_ffff,
	0x7fff_ffff_ffff_ffff,
]);

/// Convert [U256] into [H256].
#[must_use]
pub fn u256_to_h256(v: U256) -> H256 {
	let mut ret = H256::zero();
	v.to_big_endian(ret.as_bytes_mut());
	ret
}

/// Convert [H256] to [U256].
#[must_use]
pub fn h256_to_u256(v: H256) -> U256 {
	U256::from_big_endian(v.as_bytes())
}

/// Convert [U256] into [H160], taking the low 20 bytes.
#[must_use]
pub fn u256_to_address(v: U256) -> H160 {
	u256_to_h256(v).into()
}

/// Convert [H160] to [U256], zero-extended.
#[must_use]
pub fn address_to_u256(v: H160) -> U256 {
	U256::from_big_endian(v.as_bytes())
}

/// Sign of [I256].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Sign {
	Plus,
	Minus,
	Zero,
}

/// Signed 256-bit integer in sign-magnitude form, interpreting a [U256]
/// with the high bit as the sign.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct I256(pub Sign, pub U256);

impl I256 {
	/// Zero value of I256.
	#[must_use]
	pub const fn zero() -> I256 {
		I256(Sign::Zero, U256::zero())
	}

	/// Minimum value of I256.
	#[must_use]
	pub fn min_value() -> I256 {
		I256(Sign::Minus, (U256::MAX & SIGN_BIT_MASK) + U256::one())
	}
}

impl Ord for I256 {
	fn cmp(&self, other: &I256) -> Ordering {
		match (self.0, other.0) {
			(Sign::Zero, Sign::Zero) => Ordering::Equal,
			(Sign::Zero, Sign::Plus) => Ordering::Less,
			(Sign::Zero, Sign::Minus) => Ordering::Greater,
			(Sign::Minus, Sign::Zero) => Ordering::Less,
			(Sign::Minus, Sign::Plus) => Ordering::Less,
			(Sign::Minus, Sign::Minus) => self.1.cmp(&other.1).reverse(),
			(Sign::Plus, Sign::Minus) => Ordering::Greater,
			(Sign::Plus, Sign::Zero) => Ordering::Greater,
			(Sign::Plus, Sign::Plus) => self.1.cmp(&other.1),
		}
	}
}

impl PartialOrd for I256 {
	fn partial_cmp(&self, other: &I256) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Default for I256 {
	fn default() -> I256 {
		I256::zero()
	}
}

impl From<U256> for I256 {
	fn from(val: U256) -> I256 {
		if val == U256::zero() {
			I256::zero()
		} else if val & SIGN_BIT_MASK == val {
			I256(Sign::Plus, val)
		} else {
			I256(Sign::Minus, !val + U256::one())
		}
	}
}

impl From<I256> for U256 {
	fn from(value: I256) -> U256 {
		match value.0 {
			Sign::Zero => U256::zero(),
			Sign::Plus => value.1,
			Sign::Minus => !value.1 + U256::one(),
		}
	}
}

impl Div for I256 {
	type Output = I256;

	fn div(self, other: I256) -> I256 {
		if other == I256::zero() {
			return I256::zero();
		}

		if self == I256::min_value() && other.1 == U256::one() {
			return I256::min_value();
		}

		let d = (self.1 / other.1) & SIGN_BIT_MASK;

		if d == U256::zero() {
			return I256::zero();
		}

		match (self.0, other.0) {
			(Sign::Zero, Sign::Plus)
			| (Sign::Plus, Sign::Zero)
			| (Sign::Zero, Sign::Zero)
			| (Sign::Plus, Sign::Plus)
			| (Sign::Minus, Sign::Minus) => I256(Sign::Plus, d),
			(Sign::Zero, Sign::Minus)
			| (Sign::Plus, Sign::Minus)
			| (Sign::Minus, Sign::Zero)
			| (Sign::Minus, Sign::Plus) => I256(Sign::Minus, d),
		}
	}
}

impl Rem for I256 {
	type Output = I256;

	fn rem(self, other: I256) -> I256 {
		let r = (self.1 % other.1) & SIGN_BIT_MASK;

		if r == U256::zero() {
			return I256::zero();
		}

		I256(self.0, r)
	}
}

#[cfg(test)]
mod tests {
	use std::num::Wrapping;

	use super::*;

	#[test]
	fn div_i256() {
		// Sanity checks based on i8. `Wrapping` because the EVM wraps where
		// Rust would trap the overflow.
		assert_eq!(Wrapping(i8::MIN) / Wrapping(-1), Wrapping(i8::MIN));
		assert_eq!(100i8 / -1, -100i8);
		assert_eq!(100i8 / 2, 50i8);

		let one = I256(Sign::Plus, U256::one());
		let one_hundred = I256(Sign::Plus, U256::from(100));
		let fifty = I256(Sign::Plus, U256::from(50));
		let two = I256(Sign::Plus, U256::from(2));
		let neg_one_hundred = I256(Sign::Minus, U256::from(100));
		let minus_one = I256(Sign::Minus, U256::one());
		let max_value = I256(Sign::Plus, SIGN_BIT_MASK);
		let neg_max_value = I256(Sign::Minus, SIGN_BIT_MASK);

		assert_eq!(I256::min_value() / minus_one, I256::min_value());
		assert_eq!(I256::min_value() / one, I256::min_value());
		assert_eq!(max_value / one, max_value);
		assert_eq!(max_value / minus_one, neg_max_value);
		assert_eq!(one_hundred / minus_one, neg_one_hundred);
		assert_eq!(one_hundred / two, fifty);
	}

	#[test]
	fn u256_round_trip() {
		let minus_two = U256::MAX - U256::one();
		assert_eq!(U256::from(I256::from(minus_two)), minus_two);
		assert_eq!(
			I256::from(minus_two),
			I256(Sign::Minus, U256::from(2))
		);
	}

	#[test]
	fn address_conversion_takes_low_bytes() {
		let v = U256::from_big_endian(&[0xff; 32]);
		assert_eq!(u256_to_address(v), H160::from_slice(&[0xff; 20]));
		let small = U256::from(0x1234);
		let addr = u256_to_address(small);
		assert_eq!(addr.as_bytes()[18..], [0x12, 0x34]);
	}
}
