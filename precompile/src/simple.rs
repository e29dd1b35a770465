//! The four classic precompiles at addresses 0x01..0x04.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use primitive_types::H256;
use sha3::{Digest, Keccak256};

use crate::{linear_cost, PrecompileError, PrecompiledContract};

/// ECDSA public key recovery, address 0x01.
pub struct EcRecover;

impl PrecompiledContract for EcRecover {
	fn required_gas(&self, _input: &[u8]) -> u64 {
		3000
	}

	fn run(&self, i: &[u8]) -> Result<Vec<u8>, PrecompileError> {
		let mut input = [0u8; 128];
		let n = i.len().min(128);
		input[..n].copy_from_slice(&i[..n]);

		// v must be 27 or 28 over the full 32-byte word.
		if input[32..63] != [0u8; 31] || ![27, 28].contains(&input[63]) {
			return Ok(Vec::new());
		}

		let mut msg = [0u8; 32];
		let mut sig = [0u8; 64];
		msg.copy_from_slice(&input[0..32]);
		sig[0..32].copy_from_slice(&input[64..96]); // r
		sig[32..64].copy_from_slice(&input[96..128]); // s

		let recover = || -> Option<H256> {
			let mut raw_recid = input[63] - 27;
			let mut sig = Signature::from_bytes((&sig[..]).into()).ok()?;
			if let Some(normalized) = sig.normalize_s() {
				sig = normalized;
				raw_recid ^= 1;
			}
			let recid = RecoveryId::from_byte(raw_recid)?;
			let pubkey = VerifyingKey::recover_from_prehash(&msg[..], &sig, recid).ok()?;

			let mut address = H256::from_slice(
				Keccak256::digest(&pubkey.to_encoded_point(false).as_bytes()[1..]).as_slice(),
			);
			address.0[0..12].copy_from_slice(&[0u8; 12]);
			Some(address)
		};

		// Invalid signatures return empty output, not an error.
		Ok(recover()
			.map(|address| address.0.to_vec())
			.unwrap_or_default())
	}
}

/// SHA-256 hash, address 0x02.
pub struct Sha256;

impl PrecompiledContract for Sha256 {
	fn required_gas(&self, input: &[u8]) -> u64 {
		linear_cost(input.len() as u64, 60, 12)
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
		let hash = sha2::Sha256::digest(input);
		Ok(hash.to_vec())
	}
}

/// RIPEMD-160 hash, address 0x03. Output is left-padded to 32 bytes.
pub struct Ripemd160;

impl PrecompiledContract for Ripemd160 {
	fn required_gas(&self, input: &[u8]) -> u64 {
		linear_cost(input.len() as u64, 600, 120)
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
		let mut ret = vec![0u8; 32];
		let hash = ripemd::Ripemd160::digest(input);
		ret[12..32].copy_from_slice(&hash);
		Ok(ret)
	}
}

/// The identity function, address 0x04.
pub struct Identity;

impl PrecompiledContract for Identity {
	fn required_gas(&self, input: &[u8]) -> u64 {
		linear_cost(input.len() as u64, 15, 3)
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
		Ok(input.to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identity_copies_input() {
		assert_eq!(Identity.run(&[1, 2, 3]).unwrap(), vec![1, 2, 3]);
		assert_eq!(Identity.required_gas(&[0u8; 33]), 15 + 2 * 3);
	}

	#[test]
	fn sha256_of_empty() {
		let out = Sha256.run(&[]).unwrap();
		assert_eq!(
			hex::encode(out),
			"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
		);
	}

	#[test]
	fn ripemd160_is_left_padded() {
		let out = Ripemd160.run(&[]).unwrap();
		assert_eq!(out.len(), 32);
		assert_eq!(out[..12], [0u8; 12]);
		assert_eq!(
			hex::encode(&out[12..]),
			"9c1185a5c5e9fc54612808977ee8f548b2258d31"
		);
	}

	#[test]
	fn ecrecover_rejects_bad_v() {
		// v = 29
		let mut input = [0u8; 128];
		input[63] = 29;
		assert_eq!(EcRecover.run(&input).unwrap(), Vec::<u8>::new());
	}
}
