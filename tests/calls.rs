//! Inter-contract call semantics: value transfer, storage context,
//! read-only enforcement, revert propagation and return-data plumbing.

mod mock;

use primitive_types::{H160, H256, U256};

use embervm::{BlockContext, Config, Error, Evm, Rules, StateDB, TxContext};
use mock::MockStateDB;

const CALLER: H160 = H160::repeat_byte(0xca);
const PARENT: H160 = H160::repeat_byte(0xaa);
const CHILD: H160 = H160::repeat_byte(0xbb);

fn cancun_evm(db: &mut MockStateDB) -> Evm<'_> {
	Evm::new(
		BlockContext::default(),
		TxContext::default(),
		db,
		Rules::cancun(U256::one()),
		Config::default(),
	)
}

fn push20(address: H160) -> Vec<u8> {
	let mut out = vec![0x73];
	out.extend_from_slice(address.as_bytes());
	out
}

/// `[retSize, retOffset, inSize, inOffset]` zeros, then the target and a
/// 0xffff gas word, ready for one of the six-argument call opcodes.
fn call_args_prefix(target: H160) -> Vec<u8> {
	let mut code = hex::decode("6000600060006000").unwrap();
	code.extend_from_slice(&push20(target));
	code.extend_from_slice(&[0x61, 0xff, 0xff]);
	code
}

#[test]
fn call_transfers_value_and_creates_the_account() {
	let mut db = MockStateDB::new();
	db.seed_balance(CALLER, U256::from(1000));
	let mut evm = cancun_evm(&mut db);

	let (_, gas_left, res) = evm.call(CALLER, CHILD, &[], 50_000, U256::from(100));
	assert_eq!(res, Ok(()));
	assert_eq!(gas_left, 50_000);

	assert_eq!(db.balance(CALLER), U256::from(900));
	assert_eq!(db.balance(CHILD), U256::from(100));
	assert!(db.exists(CHILD));
}

#[test]
fn insufficient_balance_fails_without_consuming_gas() {
	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);

	let (_, gas_left, res) = evm.call(CALLER, CHILD, &[], 50_000, U256::from(100));
	assert_eq!(res, Err(Error::InsufficientBalance));
	assert_eq!(gas_left, 50_000);
	assert!(!db.exists(CHILD));
}

#[test]
fn zero_value_call_to_nonexistent_account_is_a_noop() {
	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);

	let (ret, gas_left, res) = evm.call(CALLER, CHILD, &[], 50_000, U256::zero());
	assert_eq!(res, Ok(()));
	assert!(ret.is_empty());
	// Gas comes back untouched and no account is created.
	assert_eq!(gas_left, 50_000);
	assert!(!db.exists(CHILD));
}

#[test]
fn static_call_rejects_storage_writes() {
	let mut db = MockStateDB::new();
	// PUSH1 1, PUSH1 0, SSTORE
	db.seed_code(CHILD, hex::decode("6001600055").unwrap());
	let mut evm = cancun_evm(&mut db);

	let (_, gas_left, res) = evm.static_call(CALLER, CHILD, &[], 50_000);
	assert_eq!(res, Err(Error::WriteProtection));
	assert_eq!(gas_left, 0);
	assert!(db.storage(CHILD, H256::zero()).is_zero());
}

#[test]
fn static_call_opcode_pushes_zero_status_on_write_attempt() {
	let mut db = MockStateDB::new();
	db.seed_code(CHILD, hex::decode("6001600055").unwrap());

	// STATICCALL(CHILD), then return the status word.
	let mut code = call_args_prefix(CHILD);
	code.push(0xfa);
	code.extend_from_slice(&hex::decode("5f5260205ff3").unwrap());
	db.seed_code(PARENT, code);

	let mut evm = cancun_evm(&mut db);
	let (ret, _, res) = evm.call(CALLER, PARENT, &[], 200_000, U256::zero());
	assert_eq!(res, Ok(()));
	assert_eq!(U256::from_big_endian(&ret), U256::zero());
	// The parent's frame survives; the child's write never lands.
	assert!(db.storage(CHILD, H256::zero()).is_zero());
}

#[test]
fn static_context_propagates_to_children() {
	let mut db = MockStateDB::new();
	// Grandchild writes storage.
	let grandchild = H160::repeat_byte(0xcc);
	db.seed_code(grandchild, hex::decode("6001600055").unwrap());

	// Child CALLs (not STATICCALLs) the grandchild and returns the status.
	let mut child_code = hex::decode("60006000600060006000").unwrap();
	child_code.extend_from_slice(&push20(grandchild));
	child_code.extend_from_slice(&[0x61, 0xff, 0xff, 0xf1]);
	child_code.extend_from_slice(&hex::decode("5f5260205ff3").unwrap());
	db.seed_code(CHILD, child_code);

	let mut evm = cancun_evm(&mut db);
	let (ret, _, res) = evm.static_call(CALLER, CHILD, &[], 200_000);
	// The child itself succeeds, its inner call reports failure.
	assert_eq!(res, Ok(()));
	assert_eq!(U256::from_big_endian(&ret), U256::zero());
	assert!(db.storage(grandchild, H256::zero()).is_zero());
}

#[test]
fn delegate_call_writes_to_the_callers_storage() {
	let mut db = MockStateDB::new();
	// Library: PUSH1 0x2a, PUSH1 0, SSTORE, STOP
	db.seed_code(CHILD, hex::decode("602a60005500").unwrap());

	let mut code = call_args_prefix(CHILD);
	code.push(0xf4);
	code.push(0x00);
	db.seed_code(PARENT, code);

	let mut evm = cancun_evm(&mut db);
	let (_, _, res) = evm.call(CALLER, PARENT, &[], 200_000, U256::zero());
	assert_eq!(res, Ok(()));

	// The write landed in the parent's storage, not the library's.
	assert_eq!(
		db.storage(PARENT, H256::zero()),
		H256::from_low_u64_be(0x2a)
	);
	assert!(db.storage(CHILD, H256::zero()).is_zero());
}

#[test]
fn call_code_runs_foreign_code_in_own_context() {
	let mut db = MockStateDB::new();
	db.seed_code(CHILD, hex::decode("602a60005500").unwrap());
	let mut evm = cancun_evm(&mut db);

	let (_, _, res) = evm.call_code(PARENT, CHILD, &[], 100_000, U256::zero());
	assert_eq!(res, Ok(()));
	assert_eq!(
		db.storage(PARENT, H256::zero()),
		H256::from_low_u64_be(0x2a)
	);
	assert!(db.storage(CHILD, H256::zero()).is_zero());
}

#[test]
fn revert_rolls_back_state_but_returns_payload_and_gas() {
	let mut db = MockStateDB::new();
	// SSTORE(0, 1), then REVERT with a 32-byte payload of 0xaa.
	db.seed_code(
		CHILD,
		hex::decode("600160005560aa60005260206000fd").unwrap(),
	);
	let mut evm = cancun_evm(&mut db);

	let (ret, gas_left, res) = evm.call(CALLER, CHILD, &[], 100_000, U256::zero());
	assert_eq!(res, Err(Error::Reverted));
	assert_eq!(U256::from_big_endian(&ret), U256::from(0xaa));
	// Only the consumed portion is lost: pushes, the cold SSTORE, the
	// MSTORE with its expansion.
	assert_eq!(gas_left, 100_000 - 22_124);
	// The store was rolled back.
	assert!(db.storage(CHILD, H256::zero()).is_zero());
}

#[test]
fn failed_subcall_leaves_parent_state_intact() {
	let mut db = MockStateDB::new();
	db.seed_balance(PARENT, U256::from(77));
	// Child burns all gas on an undefined opcode.
	db.seed_code(CHILD, vec![0x0c]);

	// Parent stores first, then CALLs the child, then stops.
	let mut code = hex::decode("6007600055").unwrap();
	code.extend_from_slice(&hex::decode("60006000600060006000").unwrap());
	code.extend_from_slice(&push20(CHILD));
	code.extend_from_slice(&[0x61, 0x02, 0x00, 0xf1, 0x00]);
	db.seed_code(PARENT, code);

	let mut evm = cancun_evm(&mut db);
	let (_, _, res) = evm.call(CALLER, PARENT, &[], 200_000, U256::zero());
	assert_eq!(res, Ok(()));

	// The parent's earlier write survives the child's failure.
	assert_eq!(db.storage(PARENT, H256::zero()), H256::from_low_u64_be(7));
	assert_eq!(db.balance(PARENT), U256::from(77));
}

#[test]
fn return_data_tracks_the_last_call() {
	let mut db = MockStateDB::new();
	// Child returns two bytes: MSTORE8(0, 0xaa), RETURN(0, 2).
	db.seed_code(CHILD, hex::decode("60aa5f5360025ff3").unwrap());

	// Parent: CALL(child), POP status, then return RETURNDATASIZE.
	let mut code = hex::decode("60006000600060006000").unwrap();
	code.extend_from_slice(&push20(CHILD));
	code.extend_from_slice(&[0x61, 0xff, 0xff, 0xf1, 0x50]);
	code.extend_from_slice(&hex::decode("3d5f5260205ff3").unwrap());
	db.seed_code(PARENT, code);

	let mut evm = cancun_evm(&mut db);
	let (ret, _, res) = evm.call(CALLER, PARENT, &[], 200_000, U256::zero());
	assert_eq!(res, Ok(()));
	assert_eq!(U256::from_big_endian(&ret), U256::from(2));
}

#[test]
fn return_data_copy_past_the_end_fails() {
	let mut db = MockStateDB::new();
	db.seed_code(CHILD, hex::decode("60aa5f5360025ff3").unwrap());

	// Parent: CALL(child), POP, then RETURNDATACOPY(0, 0, 3) with only two
	// bytes of return data.
	let mut code = hex::decode("60006000600060006000").unwrap();
	code.extend_from_slice(&push20(CHILD));
	code.extend_from_slice(&[0x61, 0xff, 0xff, 0xf1, 0x50]);
	code.extend_from_slice(&hex::decode("6003600060003e").unwrap());
	db.seed_code(PARENT, code);

	let mut evm = cancun_evm(&mut db);
	let (_, gas_left, res) = evm.call(CALLER, PARENT, &[], 200_000, U256::zero());
	assert_eq!(res, Err(Error::ReturnDataOutOfBounds));
	assert_eq!(gas_left, 0);
}

#[test]
fn identity_precompile_via_call() {
	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);

	let input = [1u8, 2, 3];
	let identity = H160::from_low_u64_be(4);
	let (ret, gas_left, res) = evm.call(CALLER, identity, &input, 1_000, U256::zero());
	assert_eq!(res, Ok(()));
	assert_eq!(ret, input.to_vec());
	// 15 base + 3 per word.
	assert_eq!(gas_left, 1_000 - 18);
}

#[test]
fn precompile_without_enough_gas_fails() {
	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);

	let sha256 = H160::from_low_u64_be(2);
	let (_, gas_left, res) = evm.call(CALLER, sha256, &[], 10, U256::zero());
	assert_eq!(res, Err(Error::OutOfGas));
	assert_eq!(gas_left, 0);
}

#[test]
fn call_value_stipend_funds_receiver_execution() {
	let mut db = MockStateDB::new();
	db.seed_balance(PARENT, U256::from(10));
	// Receiver runs a few cheap ops on the 2300 stipend alone.
	db.seed_code(CHILD, hex::decode("60016001015000").unwrap());

	// CALL with value 1 and zero forwarded gas.
	let mut code = hex::decode("60006000600060006001").unwrap();
	code.extend_from_slice(&push20(CHILD));
	code.extend_from_slice(&[0x60, 0x00, 0xf1, 0x00]);
	db.seed_code(PARENT, code);

	let mut evm = cancun_evm(&mut db);
	let (_, _, res) = evm.call(CALLER, PARENT, &[], 200_000, U256::zero());
	assert_eq!(res, Ok(()));
	assert_eq!(db.balance(CHILD), U256::one());
}
