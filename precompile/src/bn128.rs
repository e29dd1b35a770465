//! alt-bn128 curve operations at addresses 0x06..0x08, with the Byzantium
//! and EIP-1108 (Istanbul) price schedules.

use bn::{pairing_batch, AffineG1, AffineG2, Fq, Fq2, Group, Gt, G1, G2};
use primitive_types::U256;

use crate::{PrecompileError, PrecompiledContract};

/// Copy bytes from input to target, treating anything past the input's end
/// as zero.
fn read_input(source: &[u8], target: &mut [u8], offset: usize) {
	if source.len() <= offset {
		return;
	}
	let len = target.len().min(source.len() - offset);
	target[..len].copy_from_slice(&source[offset..][..len]);
}

fn read_fr(input: &[u8], start: usize) -> Result<bn::Fr, PrecompileError> {
	let mut buf = [0u8; 32];
	read_input(input, &mut buf, start);
	bn::Fr::from_slice(&buf).map_err(|_| "invalid field element".into())
}

fn read_point(input: &[u8], start: usize) -> Result<G1, PrecompileError> {
	let mut px_buf = [0u8; 32];
	let mut py_buf = [0u8; 32];
	read_input(input, &mut px_buf, start);
	read_input(input, &mut py_buf, start + 32);

	let px = Fq::from_slice(&px_buf).map_err(|_| "invalid point x coordinate")?;
	let py = Fq::from_slice(&py_buf).map_err(|_| "invalid point y coordinate")?;

	Ok(if px == Fq::zero() && py == Fq::zero() {
		G1::zero()
	} else {
		AffineG1::new(px, py)
			.map_err(|_| "invalid curve point")?
			.into()
	})
}

fn write_point(point: G1) -> Vec<u8> {
	let mut buf = [0u8; 64];
	if let Some(sum) = AffineG1::from_jacobian(point) {
		// Point not at infinity; infinity stays all zeroes.
		let _ = sum.x().to_big_endian(&mut buf[0..32]);
		let _ = sum.y().to_big_endian(&mut buf[32..64]);
	}
	buf.to_vec()
}

/// Curve point addition, address 0x06.
pub struct Bn256Add {
	pub istanbul: bool,
}

impl PrecompiledContract for Bn256Add {
	fn required_gas(&self, _input: &[u8]) -> u64 {
		if self.istanbul { 150 } else { 500 }
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
		let p1 = read_point(input, 0)?;
		let p2 = read_point(input, 64)?;
		Ok(write_point(p1 + p2))
	}
}

/// Scalar multiplication, address 0x07.
pub struct Bn256ScalarMul {
	pub istanbul: bool,
}

impl PrecompiledContract for Bn256ScalarMul {
	fn required_gas(&self, _input: &[u8]) -> u64 {
		if self.istanbul { 6_000 } else { 40_000 }
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
		let p = read_point(input, 0)?;
		let fr = read_fr(input, 64)?;
		Ok(write_point(p * fr))
	}
}

/// Pairing check, address 0x08. Input is a sequence of 192-byte
/// `(G1, G2)` pairs; output is one 32-byte boolean word.
pub struct Bn256Pairing {
	pub istanbul: bool,
}

impl PrecompiledContract for Bn256Pairing {
	fn required_gas(&self, input: &[u8]) -> u64 {
		let (base, per_pair) = if self.istanbul {
			(45_000, 34_000)
		} else {
			(100_000, 80_000)
		};
		base + per_pair * (input.len() as u64 / 192)
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
		let ok = if input.is_empty() {
			true
		} else {
			if input.len() % 192 > 0 {
				return Err("bad elliptic curve pairing size".into());
			}
			let elements = input.len() / 192;
			let mut pairs = Vec::with_capacity(elements);
			for idx in 0..elements {
				let offset = idx * 192;
				let a_x = Fq::from_slice(&input[offset..offset + 32])
					.map_err(|_| "invalid a argument x coordinate")?;
				let a_y = Fq::from_slice(&input[offset + 32..offset + 64])
					.map_err(|_| "invalid a argument y coordinate")?;
				let b_a_y = Fq::from_slice(&input[offset + 64..offset + 96])
					.map_err(|_| "invalid b argument imaginary coeff x coordinate")?;
				let b_a_x = Fq::from_slice(&input[offset + 96..offset + 128])
					.map_err(|_| "invalid b argument imaginary coeff y coordinate")?;
				let b_b_y = Fq::from_slice(&input[offset + 128..offset + 160])
					.map_err(|_| "invalid b argument real coeff x coordinate")?;
				let b_b_x = Fq::from_slice(&input[offset + 160..offset + 192])
					.map_err(|_| "invalid b argument real coeff y coordinate")?;

				let b_a = Fq2::new(b_a_x, b_a_y);
				let b_b = Fq2::new(b_b_x, b_b_y);
				let b = if b_a.is_zero() && b_b.is_zero() {
					G2::zero()
				} else {
					G2::from(
						AffineG2::new(b_a, b_b).map_err(|_| "invalid b argument - not on curve")?,
					)
				};
				let a = if a_x.is_zero() && a_y.is_zero() {
					G1::zero()
				} else {
					G1::from(
						AffineG1::new(a_x, a_y).map_err(|_| "invalid a argument - not on curve")?,
					)
				};
				pairs.push((a, b));
			}
			pairing_batch(&pairs) == Gt::one()
		};

		let mut buf = [0u8; 32];
		if ok {
			U256::one().to_big_endian(&mut buf);
		}
		Ok(buf.to_vec())
	}
}
