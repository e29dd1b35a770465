//! KZG point-evaluation precompile at address 0x0a (EIP-4844), over the
//! Arkworks BLS12-381 implementation.

use ark_bls12_381::{Bls12_381, Fr, G1Affine, G2Affine};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{BigInteger, One, PrimeField};
use ark_serialize::CanonicalDeserialize;
use core::ops::Neg;
use sha2::Digest;

use crate::{PrecompileError, PrecompiledContract};

/// Fixed gas cost of the point-evaluation precompile.
pub const GAS_COST: u64 = 50_000;

/// Versioned-hash version byte for KZG commitments.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// `U256(FIELD_ELEMENTS_PER_BLOB).to_be_bytes() ++ BLS_MODULUS.to_bytes32()`
pub const RETURN_VALUE: &[u8; 64] = &hex_literal::hex!(
	"0000000000000000000000000000000000000000000000000000000000001000"
	"73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001"
);

/// The trusted setup G2 point `[tau]_2` of the Ethereum KZG ceremony,
/// compressed.
const TRUSTED_SETUP_TAU_G2_BYTES: [u8; 96] = hex_literal::hex!(
	"b5bfd7dd8cdeb128843bc287230af38926187075cbfbefa81009a2ce615ac53d2914e5870cb452d2afaaab24f3499f72185cbfee53492714734429b7b38608e23926c911cceceac9a36851477ba4c60b087041de621000edc98edada20c1def2"
);

/// Input layout:
/// `| versioned_hash | z | y | commitment | proof |`
/// `|       32       | 32| 32|     48     |  48   |`
pub struct KzgPointEvaluation;

impl PrecompiledContract for KzgPointEvaluation {
	fn required_gas(&self, _input: &[u8]) -> u64 {
		GAS_COST
	}

	fn run(&self, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
		if input.len() != 192 {
			return Err("blob invalid input length".into());
		}

		// The commitment must match the versioned hash.
		let versioned_hash = &input[..32];
		let commitment = &input[96..144];
		if kzg_to_versioned_hash(commitment) != versioned_hash {
			return Err("blob mismatched version".into());
		}

		let commitment: &[u8; 48] = commitment.try_into().map_err(|_| "bad commitment")?;
		let z: &[u8; 32] = input[32..64].try_into().map_err(|_| "bad z")?;
		let y: &[u8; 32] = input[64..96].try_into().map_err(|_| "bad y")?;
		let proof: &[u8; 48] = input[144..192].try_into().map_err(|_| "bad proof")?;
		if verify_kzg_proof(commitment, z, y, proof) {
			Ok(RETURN_VALUE.to_vec())
		} else {
			Err("blob verify kzg proof failed".into())
		}
	}
}

/// `VERSIONED_HASH_VERSION_KZG ++ sha256(commitment)[1..]`
#[inline]
pub fn kzg_to_versioned_hash(commitment: &[u8]) -> [u8; 32] {
	let mut hash: [u8; 32] = sha2::Sha256::digest(commitment).into();
	hash[0] = VERSIONED_HASH_VERSION_KZG;
	hash
}

/// Verify that `commitment` opens to `y` at `z` under the ceremony setup,
/// via the pairing check `e(P - y, -G2) * e(proof, [tau]_2 - z) == 1`.
pub fn verify_kzg_proof(
	commitment: &[u8; 48],
	z: &[u8; 32],
	y: &[u8; 32],
	proof: &[u8; 48],
) -> bool {
	let Ok(commitment_point) = G1Affine::deserialize_compressed(&commitment[..]) else {
		return false;
	};
	let Ok(proof_point) = G1Affine::deserialize_compressed(&proof[..]) else {
		return false;
	};
	let Some(z_fr) = read_scalar_canonical(z) else {
		return false;
	};
	let Some(y_fr) = read_scalar_canonical(y) else {
		return false;
	};

	let Ok(tau_g2) = G2Affine::deserialize_compressed_unchecked(&TRUSTED_SETUP_TAU_G2_BYTES[..])
	else {
		return false;
	};

	let g1 = G1Affine::generator();
	let g2 = G2Affine::generator();

	// P_minus_y = commitment - [y]G1
	let y_g1 = g1.mul_bigint(y_fr.into_bigint()).into_affine();
	let p_minus_y = (commitment_point.into_group() - y_g1.into_group()).into_affine();

	// X_minus_z = [tau]G2 - [z]G2
	let z_g2 = g2.mul_bigint(z_fr.into_bigint()).into_affine();
	let x_minus_z = (tau_g2.into_group() - z_g2.into_group()).into_affine();

	let neg_g2 = g2.neg();
	Bls12_381::multi_pairing([p_minus_y, proof_point], [neg_g2, x_minus_z])
		.0
		.is_one()
}

/// Scalar field element from canonical 32-byte big-endian form.
fn read_scalar_canonical(bytes: &[u8; 32]) -> Option<Fr> {
	let fr = Fr::from_be_bytes_mod_order(bytes);
	// Reject non-canonical encodings.
	if fr.into_bigint().to_bytes_be().as_slice() != bytes {
		return None;
	}
	Some(fr)
}
