//! Contract creation: address derivation, deployment-code validation,
//! deposit gas and the EIP-6780 selfdestruct rules.

mod mock;

use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};

use embervm::{
	create_address, create_address2, BlockContext, Config, Error, Evm, Rules, StateDB, TxContext,
};
use mock::{MockAccount, MockStateDB};

const CALLER: H160 = H160::repeat_byte(0xca);

fn evm_with_rules<'a>(db: &'a mut MockStateDB, rules: Rules) -> Evm<'a> {
	Evm::new(
		BlockContext::default(),
		TxContext::default(),
		db,
		rules,
		Config::default(),
	)
}

fn cancun_evm(db: &mut MockStateDB) -> Evm<'_> {
	evm_with_rules(db, Rules::cancun(U256::one()))
}

/// Initcode that deploys the given runtime code via CODECOPY + RETURN.
fn deploy_code(runtime: &[u8]) -> Vec<u8> {
	let len = runtime.len() as u8;
	let mut initcode = vec![
		0x60, len,  // PUSH1 len
		0x60, 0x0c, // PUSH1 offset of the payload
		0x60, 0x00, // PUSH1 0
		0x39, // CODECOPY
		0x60, len,  // PUSH1 len
		0x60, 0x00, // PUSH1 0
		0xf3, // RETURN
	];
	initcode.extend_from_slice(runtime);
	initcode
}

#[test]
fn create_deploys_returned_code() {
	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);

	let runtime = vec![0x00];
	let (_, address, _, res) = evm.create(CALLER, deploy_code(&runtime), 100_000, U256::zero());
	assert_eq!(res, Ok(()));
	assert_eq!(address, create_address(CALLER, 0));

	assert_eq!(db.code(address), runtime);
	// EIP-158: fresh contracts start at nonce 1; the creator's nonce moved.
	assert_eq!(db.nonce(address), 1);
	assert_eq!(db.nonce(CALLER), 1);
}

#[test]
fn create_address_follows_the_nonce() {
	let mut db = MockStateDB::new();
	db.seed_account(
		CALLER,
		MockAccount {
			nonce: 7,
			..MockAccount::default()
		},
	);
	let mut evm = cancun_evm(&mut db);

	let (_, address, _, res) = evm.create(CALLER, Vec::new(), 100_000, U256::zero());
	assert_eq!(res, Ok(()));
	assert_eq!(address, create_address(CALLER, 7));
	assert_eq!(db.nonce(CALLER), 8);
}

#[test]
fn create2_address_is_deterministic() {
	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);

	// Zero sender, zero salt, empty initcode.
	let (_, address, _, res) =
		evm.create2(H160::zero(), Vec::new(), 100_000, U256::zero(), H256::zero());
	assert_eq!(res, Ok(()));
	assert_eq!(
		hex::encode(address.as_bytes()),
		"e33c0c7f7df4809055c3eba6c09cfe4baf1bd9e0"
	);
	assert_eq!(
		address,
		create_address2(
			H160::zero(),
			H256::zero(),
			H256::from_slice(Keccak256::digest([]).as_slice()),
		)
	);
}

#[test]
fn create2_address_ignores_the_nonce() {
	let mut db = MockStateDB::new();
	let salt = H256::repeat_byte(5);
	let initcode = deploy_code(&[0x00]);
	let expected = create_address2(
		CALLER,
		salt,
		H256::from_slice(Keccak256::digest(&initcode).as_slice()),
	);

	let mut evm = cancun_evm(&mut db);
	let (_, address, _, res) = evm.create2(CALLER, initcode, 100_000, U256::zero(), salt);
	assert_eq!(res, Ok(()));
	assert_eq!(address, expected);
}

#[test]
fn eip3541_rejects_0xef_code() {
	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);

	let (_, _, gas_left, res) =
		evm.create(CALLER, deploy_code(&[0xef]), 100_000, U256::zero());
	assert_eq!(res, Err(Error::InvalidCode));
	assert_eq!(gas_left, 0);

	// Pre-London the same deployment goes through.
	let mut db = MockStateDB::new();
	let mut evm = evm_with_rules(&mut db, Rules::berlin(U256::one()));
	let (_, address, _, res) =
		evm.create(CALLER, deploy_code(&[0xef]), 100_000, U256::zero());
	assert_eq!(res, Ok(()));
	assert_eq!(db.code(address), vec![0xef]);
}

#[test]
fn oversized_deployment_fails() {
	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);

	// RETURN(0, 24577): one byte over the EIP-170 limit.
	let initcode = hex::decode("620060016000f3").unwrap();
	let (_, _, gas_left, res) = evm.create(CALLER, initcode, 1_000_000, U256::zero());
	assert_eq!(res, Err(Error::MaxCodeSizeExceeded));
	assert_eq!(gas_left, 0);
}

#[test]
fn initcode_size_limit_applies_from_shanghai() {
	let initcode = vec![0u8; 49153];

	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);
	let (_, _, gas_left, res) = evm.create(CALLER, initcode.clone(), 1_000_000, U256::zero());
	assert_eq!(res, Err(Error::MaxInitCodeSizeExceeded));
	assert_eq!(gas_left, 1_000_000);

	// London has no initcode bound; the empty-bodied code just runs out of
	// nothing to do and deploys nothing.
	let mut db = MockStateDB::new();
	let mut evm = evm_with_rules(&mut db, Rules::london(U256::one()));
	let (_, _, _, res) = evm.create(CALLER, initcode, 1_000_000, U256::zero());
	assert_eq!(res, Ok(()));
}

#[test]
fn code_deposit_out_of_gas() {
	let mut db = MockStateDB::new();
	let mut evm = cancun_evm(&mut db);

	// Initcode returning 32 bytes costs 18 to run; the 6400-gas deposit is
	// unaffordable.
	let initcode = hex::decode("60aa60005260206000f3").unwrap();
	let (_, address, gas_left, res) = evm.create(CALLER, initcode, 100, U256::zero());
	assert_eq!(res, Err(Error::CodeStoreOutOfGas));
	assert_eq!(gas_left, 0);
	assert!(db.code(address).is_empty());
}

#[test]
fn create_collision_fails() {
	let mut db = MockStateDB::new();
	let target = create_address(CALLER, 0);
	db.seed_account(
		target,
		MockAccount {
			nonce: 1,
			..MockAccount::default()
		},
	);
	let mut evm = cancun_evm(&mut db);

	let (_, _, gas_left, res) = evm.create(CALLER, Vec::new(), 100_000, U256::zero());
	assert_eq!(res, Err(Error::ContractAddressCollision));
	assert_eq!(gas_left, 0);
	// The sender's nonce was still consumed.
	assert_eq!(db.nonce(CALLER), 1);
}

#[test]
fn create_over_existing_code_fails() {
	let mut db = MockStateDB::new();
	let target = create_address(CALLER, 0);
	db.seed_code(target, vec![0x00]);
	let mut evm = cancun_evm(&mut db);

	let (_, _, _, res) = evm.create(CALLER, Vec::new(), 100_000, U256::zero());
	assert_eq!(res, Err(Error::ContractAddressCollision));
}

#[test]
fn nonce_overflow_is_rejected() {
	let mut db = MockStateDB::new();
	db.seed_account(
		CALLER,
		MockAccount {
			nonce: u64::MAX,
			..MockAccount::default()
		},
	);
	let mut evm = cancun_evm(&mut db);

	let (_, _, gas_left, res) = evm.create(CALLER, Vec::new(), 100_000, U256::zero());
	assert_eq!(res, Err(Error::NonceUintOverflow));
	assert_eq!(gas_left, 100_000);
}

#[test]
fn create_transfers_the_endowment() {
	let mut db = MockStateDB::new();
	db.seed_balance(CALLER, U256::from(500));
	let mut evm = cancun_evm(&mut db);

	let (_, address, _, res) = evm.create(CALLER, Vec::new(), 100_000, U256::from(123));
	assert_eq!(res, Ok(()));
	assert_eq!(db.balance(address), U256::from(123));
	assert_eq!(db.balance(CALLER), U256::from(377));
}

#[test]
fn failed_initcode_reverts_the_endowment() {
	let mut db = MockStateDB::new();
	db.seed_balance(CALLER, U256::from(500));
	let mut evm = cancun_evm(&mut db);

	// Initcode that immediately hits an undefined opcode.
	let (_, address, gas_left, res) =
		evm.create(CALLER, vec![0x0c], 100_000, U256::from(123));
	assert!(res.is_err());
	assert_eq!(gas_left, 0);
	assert_eq!(db.balance(CALLER), U256::from(500));
	assert!(db.balance(address).is_zero());
}

fn selfdestruct_code(beneficiary: H160) -> Vec<u8> {
	let mut code = vec![0x73];
	code.extend_from_slice(beneficiary.as_bytes());
	code.push(0xff);
	code
}

#[test]
fn eip6780_preexisting_contract_only_moves_balance() {
	let beneficiary = H160::repeat_byte(0xbe);
	let contract = H160::repeat_byte(0xc0);

	let mut db = MockStateDB::new();
	db.seed_account(
		contract,
		MockAccount {
			balance: U256::from(500),
			code: selfdestruct_code(beneficiary),
			..MockAccount::default()
		},
	);
	let mut evm = cancun_evm(&mut db);

	let (_, _, res) = evm.call(CALLER, contract, &[], 100_000, U256::zero());
	assert_eq!(res, Ok(()));

	assert_eq!(db.balance(beneficiary), U256::from(500));
	assert!(db.balance(contract).is_zero());
	// Not created this transaction: the account survives.
	assert!(!db.has_self_destructed(contract));
	assert!(!db.code(contract).is_empty());
}

#[test]
fn eip6780_same_tx_contract_is_destroyed() {
	let beneficiary = H160::repeat_byte(0xbe);

	let mut db = MockStateDB::new();
	db.seed_balance(CALLER, U256::from(500));
	let mut evm = cancun_evm(&mut db);

	let (_, contract, _, res) = evm.create(
		CALLER,
		deploy_code(&selfdestruct_code(beneficiary)),
		200_000,
		U256::from(100),
	);
	assert_eq!(res, Ok(()));

	let (_, _, res) = evm.call(CALLER, contract, &[], 100_000, U256::zero());
	assert_eq!(res, Ok(()));

	assert_eq!(db.balance(beneficiary), U256::from(100));
	assert!(db.has_self_destructed(contract));
}

#[test]
fn pre_cancun_selfdestruct_always_marks() {
	let beneficiary = H160::repeat_byte(0xbe);
	let contract = H160::repeat_byte(0xc0);

	let mut db = MockStateDB::new();
	db.seed_account(
		contract,
		MockAccount {
			balance: U256::from(500),
			code: selfdestruct_code(beneficiary),
			..MockAccount::default()
		},
	);
	let mut evm = evm_with_rules(&mut db, Rules::shanghai(U256::one()));

	let (_, _, res) = evm.call(CALLER, contract, &[], 100_000, U256::zero());
	assert_eq!(res, Ok(()));

	assert_eq!(db.balance(beneficiary), U256::from(500));
	assert!(db.has_self_destructed(contract));
}
