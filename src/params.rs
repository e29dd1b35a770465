//! Protocol gas schedule and limit constants, including the per-fork
//! repricings of EIP-150, EIP-1884, EIP-2200 and EIP-2929.

/// Maximum size of the operand stack.
pub const STACK_LIMIT: usize = 1024;
/// Maximum depth of the call/create stack.
pub const CALL_CREATE_DEPTH: usize = 1024;
/// Maximum bytecode to permit for a contract (EIP-170).
pub const MAX_CODE_SIZE: u64 = 24576;
/// Maximum initcode to permit in a creation (EIP-3860).
pub const MAX_INIT_CODE_SIZE: u64 = 2 * MAX_CODE_SIZE;

/// Once per KECCAK256 operation.
pub const KECCAK256_GAS: u64 = 30;
/// Once per word of the KECCAK256 operation's data.
pub const KECCAK256_WORD_GAS: u64 = 6;

/// Per LOG* operation.
pub const LOG_GAS: u64 = 375;
/// Per byte in a LOG* operation's data.
pub const LOG_DATA_GAS: u64 = 8;
/// Multiplied by the * of the LOG*.
pub const LOG_TOPIC_GAS: u64 = 375;

/// Per byte of returned initcode output stored as contract code.
pub const CREATE_DATA_GAS: u64 = 200;
/// Once per word of the initcode when creating a contract (EIP-3860).
pub const INIT_CODE_WORD_GAS: u64 = 2;

/// Times the address of the highest referenced byte in memory, rounded up
/// to a word.
pub const MEMORY_GAS: u64 = 3;
/// Divisor for the quadratic particle of the memory cost equation.
pub const QUAD_COEFF_DIV: u64 = 512;
/// Multiplied by the number of words copied (rounded up) for any *COPY
/// operation.
pub const COPY_GAS: u64 = 3;

/// Once per JUMPDEST operation.
pub const JUMPDEST_GAS: u64 = 1;

/// Cost of SLOAD before EIP-150.
pub const SLOAD_GAS_FRONTIER: u64 = 50;
/// Cost of SLOAD after EIP-150.
pub const SLOAD_GAS_EIP150: u64 = 200;
/// Cost of SLOAD after EIP-1884 (part of Istanbul).
pub const SLOAD_GAS_EIP1884: u64 = 800;

/// Once per SSTORE operation from zero to non-zero.
pub const SSTORE_SET_GAS: u64 = 20000;
/// Once per SSTORE operation if the zeroness changes from zero.
pub const SSTORE_RESET_GAS: u64 = 5000;
/// Once per SSTORE operation if the zeroness doesn't change.
pub const SSTORE_CLEAR_GAS: u64 = 5000;
/// Refund once per SSTORE operation if the zeroness changes to zero.
pub const SSTORE_REFUND_GAS: u64 = 15000;

/// Once per SSTORE operation if the value doesn't change (EIP-1283).
pub const NET_SSTORE_NOOP_GAS: u64 = 200;
/// Once per SSTORE operation from clean zero (EIP-1283).
pub const NET_SSTORE_INIT_GAS: u64 = 20000;
/// Once per SSTORE operation from clean non-zero (EIP-1283).
pub const NET_SSTORE_CLEAN_GAS: u64 = 5000;
/// Once per SSTORE operation from dirty (EIP-1283).
pub const NET_SSTORE_DIRTY_GAS: u64 = 200;
/// Refund for clearing an originally existing storage slot (EIP-1283).
pub const NET_SSTORE_CLEAR_REFUND: u64 = 15000;
/// Refund for resetting to the original non-zero value (EIP-1283).
pub const NET_SSTORE_RESET_REFUND: u64 = 4800;
/// Refund for resetting to the original zero value (EIP-1283).
pub const NET_SSTORE_RESET_CLEAR_REFUND: u64 = 19800;

/// Minimum gas required to be present for an SSTORE call, not consumed
/// (EIP-2200).
pub const SSTORE_SENTRY_GAS_EIP2200: u64 = 2300;
/// Once per SSTORE operation from clean zero to non-zero (EIP-2200).
pub const SSTORE_SET_GAS_EIP2200: u64 = 20000;
/// Once per SSTORE operation from clean non-zero to something else
/// (EIP-2200).
pub const SSTORE_RESET_GAS_EIP2200: u64 = 5000;
/// Refund for clearing an originally existing storage slot (EIP-2200).
pub const SSTORE_CLEARS_SCHEDULE_REFUND_EIP2200: u64 = 15000;
/// Cost of SLOAD under EIP-2200.
pub const SLOAD_GAS_EIP2200: u64 = 800;

/// COLD_ACCOUNT_ACCESS_COST of EIP-2929.
pub const COLD_ACCOUNT_ACCESS_COST_EIP2929: u64 = 2600;
/// COLD_SLOAD_COST of EIP-2929.
pub const COLD_SLOAD_COST_EIP2929: u64 = 2100;
/// WARM_STORAGE_READ_COST of EIP-2929.
pub const WARM_STORAGE_READ_COST_EIP2929: u64 = 100;
/// Per storage key specified in an EIP-2930 access list.
pub const TX_ACCESS_LIST_STORAGE_KEY_GAS: u64 = 1900;
/// EIP-3529: SSTORE_CLEARS_SCHEDULE redefined as
/// SSTORE_RESET_GAS - COLD_SLOAD_COST + ACCESS_LIST_STORAGE_KEY_COST.
pub const SSTORE_CLEARS_SCHEDULE_REFUND_EIP3529: u64 =
	SSTORE_RESET_GAS_EIP2200 - COLD_SLOAD_COST_EIP2929 + TX_ACCESS_LIST_STORAGE_KEY_GAS;

/// Once per EXP instruction.
pub const EXP_GAS: u64 = 10;
/// Per byte of the EXP exponent before Spurious Dragon.
pub const EXP_BYTE_FRONTIER: u64 = 10;
/// Per byte of the EXP exponent after EIP-158.
pub const EXP_BYTE_EIP158: u64 = 50;

/// Cost of BALANCE before EIP-150.
pub const BALANCE_GAS_FRONTIER: u64 = 20;
/// Cost of BALANCE after EIP-150.
pub const BALANCE_GAS_EIP150: u64 = 400;
/// Cost of BALANCE after EIP-1884.
pub const BALANCE_GAS_EIP1884: u64 = 700;

/// Cost of EXTCODESIZE before EIP-150.
pub const EXTCODE_SIZE_GAS_FRONTIER: u64 = 20;
/// Cost of EXTCODESIZE after EIP-150.
pub const EXTCODE_SIZE_GAS_EIP150: u64 = 700;
/// Static portion of EXTCODECOPY before EIP-150.
pub const EXTCODE_COPY_BASE_FRONTIER: u64 = 20;
/// Static portion of EXTCODECOPY after EIP-150.
pub const EXTCODE_COPY_BASE_EIP150: u64 = 700;
/// Cost of EXTCODEHASH as introduced in Constantinople.
pub const EXTCODE_HASH_GAS_CONSTANTINOPLE: u64 = 400;
/// Cost of EXTCODEHASH after EIP-1884.
pub const EXTCODE_HASH_GAS_EIP1884: u64 = 700;

/// Cost of a BLOCKHASH operation.
pub const BLOCKHASH_GAS: u64 = 20;

/// Once per CALL operation before EIP-150.
pub const CALL_GAS_FRONTIER: u64 = 40;
/// Static portion of gas for CALL-derivates after EIP-150.
pub const CALL_GAS_EIP150: u64 = 700;
/// Paid for CALL when the value transfer is non-zero.
pub const CALL_VALUE_TRANSFER_GAS: u64 = 9000;
/// Paid for CALL when the destination address did not exist prior.
pub const CALL_NEW_ACCOUNT_GAS: u64 = 25000;
/// Free gas given at beginning of a value-bearing call.
pub const CALL_STIPEND: u64 = 2300;

/// Once per CREATE operation.
pub const CREATE_GAS: u64 = 32000;
/// Once per CREATE2 operation.
pub const CREATE2_GAS: u64 = 32000;

/// Cost of SELFDESTRUCT post EIP-150.
pub const SELFDESTRUCT_GAS_EIP150: u64 = 5000;
/// Paid when SELFDESTRUCT sends funds to a previously non-existent account.
pub const CREATE_BY_SELFDESTRUCT_GAS: u64 = 25000;
/// Refunded following a SELFDESTRUCT operation (removed by EIP-3529).
pub const SELFDESTRUCT_REFUND_GAS: u64 = 24000;
