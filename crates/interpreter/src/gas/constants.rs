//! Gas cost constants, named per the yellow paper schedule.

/// Cost of the free operations.
pub const ZERO: u64 = 0;
/// Base tier (ADDRESS, CALLER, POP, ...).
pub const BASE: u64 = 2;
/// Very-low tier (ADD, LT, PUSH, DUP, ...).
pub const VERYLOW: u64 = 3;
/// Low tier (MUL, DIV, SIGNEXTEND, SELFBALANCE).
pub const LOW: u64 = 5;
/// Mid tier (ADDMOD, MULMOD, JUMP).
pub const MID: u64 = 8;
/// High tier (JUMPI).
pub const HIGH: u64 = 10;
/// JUMPDEST marker.
pub const JUMPDEST: u64 = 1;
/// Base cost of EXP.
pub const EXP: u64 = 10;
/// Per-byte cost of the EXP exponent after EIP-160.
pub const EXP_BYTE_EIP160: u64 = 50;
/// Per-byte cost of the EXP exponent before EIP-160.
pub const EXP_BYTE_FRONTIER: u64 = 10;
/// Base cost of KECCAK256.
pub const KECCAK256: u64 = 30;
/// Per-word cost of KECCAK256 input.
pub const KECCAK256WORD: u64 = 6;
/// Per-word cost of memory expansion (the linear part).
pub const MEMORY: u64 = 3;
/// Per-word cost of the *COPY family.
pub const COPY: u64 = 3;
/// Base cost of LOGn.
pub const LOG: u64 = 375;
/// Per-byte cost of LOG data.
pub const LOGDATA: u64 = 8;
/// Per-topic cost of LOGn.
pub const LOGTOPIC: u64 = 375;
/// Cost of BLOCKHASH.
pub const BLOCKHASH: u64 = 20;
/// Cost of CREATE/CREATE2 before dynamic parts.
pub const CREATE: u64 = 32000;
/// Per-byte cost of depositing created code.
pub const CODEDEPOSIT: u64 = 200;
/// Surcharge for calls that transfer value.
pub const CALLVALUE: u64 = 9000;
/// Stipend granted to the callee of a value transfer.
pub const CALL_STIPEND: u64 = 2300;
/// Surcharge for calls that create the target account.
pub const NEWACCOUNT: u64 = 25000;
/// SELFDESTRUCT refund, removed by EIP-3529.
pub const SELFDESTRUCT_REFUND: i64 = 24000;

/// SSTORE zero -> non-zero.
pub const SSTORE_SET: u64 = 20000;
/// SSTORE non-zero -> non-zero (or the pre-Istanbul flat reset).
pub const SSTORE_RESET: u64 = 5000;
/// SSTORE clear refund before EIP-3529.
pub const REFUND_SSTORE_CLEARS: i64 = 15000;
/// SLOAD cost under EIP-1884 (Istanbul).
pub const ISTANBUL_SLOAD_GAS: u64 = 800;

// EIP-2929 (Berlin).
/// Access-list cost per address in the transaction.
pub const ACCESS_LIST_ADDRESS: u64 = 2400;
/// Access-list cost per storage key in the transaction.
pub const ACCESS_LIST_STORAGE_KEY: u64 = 1900;
/// First (cold) SLOAD of a slot.
pub const COLD_SLOAD_COST: u64 = 2100;
/// First (cold) access of an account.
pub const COLD_ACCOUNT_ACCESS_COST: u64 = 2600;
/// Warm storage/account read.
pub const WARM_STORAGE_READ_COST: u64 = 100;
/// SSTORE reset under Berlin, net of the cold charge.
pub const WARM_SSTORE_RESET: u64 = SSTORE_RESET - COLD_SLOAD_COST;

/// EIP-3860 per-word initcode charge.
pub const INITCODE_WORD_COST: u64 = 2;

/// Base transaction stipend.
pub const TRANSACTION_BASE: u64 = 21000;
/// Creation transaction stipend from Homestead (EIP-2).
pub const TRANSACTION_CREATE_HOMESTEAD: u64 = 53000;
/// Per zero byte of calldata.
pub const TRANSACTION_ZERO_DATA: u64 = 4;
/// Per non-zero byte of calldata after EIP-2028 (Istanbul).
pub const TRANSACTION_NON_ZERO_DATA_ISTANBUL: u64 = 16;
/// Per non-zero byte of calldata before EIP-2028.
pub const TRANSACTION_NON_ZERO_DATA_FRONTIER: u64 = 68;
