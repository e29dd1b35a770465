//! Arbitrary-precision modular exponentiation, address 0x05 (EIP-198,
//! repriced by EIP-2565 at Berlin).

use std::cmp::max;

use num::{BigUint, One, Zero};

use crate::{PrecompileError, PrecompiledContract};

const MIN_GAS_COST: u64 = 200;

/// Input layout: three 32-byte big-endian lengths, then base, exponent and
/// modulus back to back. Everything past the declared end reads as zero.
pub struct ModExp {
	pub eip2565: bool,
}

fn read_length(input: &[u8], offset: usize) -> u64 {
	let mut buf = [0u8; 32];
	let start = offset.min(input.len());
	let end = (offset + 32).min(input.len());
	buf[..end - start].copy_from_slice(&input[start..end]);
	// Lengths beyond 2^64 are unfundable anyway; clamp so the gas formula
	// saturates instead of wrapping.
	if buf[..24].iter().any(|b| *b != 0) {
		return u64::MAX;
	}
	let mut tail = [0u8; 8];
	tail.copy_from_slice(&buf[24..32]);
	u64::from_be_bytes(tail)
}

fn read_payload(input: &[u8], offset: u64, len: u64) -> Vec<u8> {
	let total = input.len() as u64;
	let start = offset.min(total);
	let end = offset.saturating_add(len).min(total);
	let mut out = vec![0u8; len as usize];
	out[..(end - start) as usize].copy_from_slice(&input[start as usize..end as usize]);
	out
}

impl ModExp {
	fn lengths(input: &[u8]) -> (u64, u64, u64) {
		(
			read_length(input, 0),
			read_length(input, 32),
			read_length(input, 64),
		)
	}

	fn multiplication_complexity(&self, base_len: u64, mod_len: u64) -> u64 {
		let max_len = max(base_len, mod_len);
		if self.eip2565 {
			let words = max_len.saturating_add(7) / 8;
			words.saturating_mul(words)
		} else if max_len <= 64 {
			max_len * max_len
		} else if max_len <= 1024 {
			max_len * max_len / 4 + 96 * max_len - 3072
		} else {
			(max_len.saturating_mul(max_len) / 16)
				.saturating_add(480u64.saturating_mul(max_len))
				.saturating_sub(199_680)
		}
	}

	fn iteration_count(exp_len: u64, exp_head: &BigUint) -> u64 {
		let iteration_count = if exp_len <= 32 && exp_head.is_zero() {
			0
		} else if exp_len <= 32 {
			exp_head.bits().saturating_sub(1)
		} else {
			8u64.saturating_mul(exp_len - 32)
				.saturating_add(exp_head.bits().saturating_sub(1))
		};
		max(iteration_count, 1)
	}
}

impl PrecompiledContract for ModExp {
	fn required_gas(&self, input: &[u8]) -> u64 {
		let (base_len, exp_len, mod_len) = Self::lengths(input);

		// First 32 bytes of the exponent feed the iteration count.
		let exp_head_len = exp_len.min(32);
		let exp_head = BigUint::from_bytes_be(&read_payload(
			input,
			96u64.saturating_add(base_len),
			exp_head_len,
		));

		let gas = self
			.multiplication_complexity(base_len, mod_len)
			.saturating_mul(Self::iteration_count(exp_len, &exp_head))
			/ if self.eip2565 { 3 } else { 20 };

		if self.eip2565 {
			max(gas, MIN_GAS_COST)
		} else {
			gas
		}
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
		let (base_len, exp_len, mod_len) = Self::lengths(input);
		// The output is always mod_len bytes, so a zero-length modulus has
		// nothing to produce, whatever the base and exponent say.
		if mod_len == 0 {
			return Ok(Vec::new());
		}
		if base_len > u32::MAX as u64 || exp_len > u32::MAX as u64 || mod_len > u32::MAX as u64 {
			return Err("modexp length overflow".into());
		}

		let base = BigUint::from_bytes_be(&read_payload(input, 96, base_len));
		let exponent = BigUint::from_bytes_be(&read_payload(input, 96 + base_len, exp_len));
		let modulus =
			BigUint::from_bytes_be(&read_payload(input, 96 + base_len + exp_len, mod_len));

		// x mod 0 is defined as 0 here.
		let result = if modulus.is_zero() || modulus.is_one() {
			BigUint::zero()
		} else {
			base.modpow(&exponent, &modulus)
		};

		// Left-pad the result to the modulus length. A zero result encodes
		// as one zero byte, which the padding must absorb, not append to.
		let bytes = if result.is_zero() {
			Vec::new()
		} else {
			result.to_bytes_be()
		};
		let mut out = vec![0u8; mod_len as usize];
		let offset = out.len() - bytes.len();
		out[offset..].copy_from_slice(&bytes);
		Ok(out)
	}
}
