//! End-to-end transaction execution tests.

use database::{BlockTag, CachePolicy, ForkDb, InMemoryDb};
use journal::SnapshotError;
use primitives::{address, hex, Address, Bytes, Env, Hardfork, TransactTo, B256, U256};
use scopevm::{Evm, Output};
use state::AccountInfo;
use tracer::{EventCollector, EventFilter, StructLogTracer, TraceEvent};

const CALLER: Address = address!("1000000000000000000000000000000000000001");
const CONTRACT: Address = address!("2000000000000000000000000000000000000002");
const OTHER: Address = address!("3000000000000000000000000000000000000003");

fn test_env(to: Address) -> Env {
    let mut env = Env::default();
    env.cfg.spec = Hardfork::Cancun;
    env.block.gas_limit = U256::MAX;
    env.block.prevrandao = Some(B256::ZERO);
    env.tx.caller = CALLER;
    env.tx.transact_to = TransactTo::Call(to);
    env.tx.gas_limit = 1_000_000;
    env
}

fn db_with_contract(code: &[u8]) -> InMemoryDb {
    let mut db = InMemoryDb::default();
    db.insert_account_info(CALLER, AccountInfo::from_balance(U256::from(10u128.pow(18))));
    db.insert_account_info(
        CONTRACT,
        AccountInfo::from_balance(U256::ZERO)
            .with_code(state::Bytecode::new_raw(Bytes::copy_from_slice(code))),
    );
    db
}

#[test]
fn arithmetic_program_returns_45() {
    // PUSH1 5; PUSH1 10; ADD; PUSH1 3; MUL; MSTORE at 0; RETURN 32 bytes.
    let code = hex::decode("6005600a0160030260005260206000f3").unwrap();
    let db = db_with_contract(&code);
    let result = Evm::new(test_env(CONTRACT), db).transact().unwrap();

    assert!(result.success, "unexpected halt: {:?}", result.reason);
    let Output::Call(output) = &result.output else {
        panic!("expected call output");
    };
    assert_eq!(output.len(), 32);
    assert_eq!(output[31], 45);
    assert!(result.logs.is_empty());
}

#[test]
fn transfer_conserves_balances() {
    let mut db = InMemoryDb::default();
    db.insert_account_info(CALLER, AccountInfo::from_balance(U256::from(1_000)));

    let mut env = test_env(OTHER);
    env.tx.value = U256::from(400);
    let result = Evm::new(env, db).transact().unwrap();

    assert!(result.success);
    // Gas price is zero, so value movement is the only balance change.
    assert_eq!(result.state[&CALLER].info.balance, U256::from(600));
    assert_eq!(result.state[&OTHER].info.balance, U256::from(400));
    let total: U256 = result
        .state
        .values()
        .map(|account| account.info.balance)
        .fold(U256::ZERO, |acc, b| acc + b);
    assert_eq!(total, U256::from(1_000));
}

#[test]
fn sstore_set_then_clear_refund_is_capped_post_london() {
    // SSTORE(0, 5); SSTORE(0, 0); STOP
    let code = hex::decode("6005600055600060005500").unwrap();
    let db = db_with_contract(&code);
    let result = Evm::new(test_env(CONTRACT), db).transact().unwrap();

    assert!(result.success);
    // 21000 intrinsic + 4 pushes + (20000 set + 2100 cold) + 100 warm noop-ish
    // store, refunded at the EIP-3529 cap of one fifth.
    let spent = 21_000 + 12 + 22_100 + 100;
    assert_eq!(result.gas_used + result.gas_refunded, spent);
    assert_eq!(result.gas_refunded, spent / 5);
    // The slot round-tripped to zero.
    let slot = &result.state[&CONTRACT].storage[&U256::ZERO];
    assert_eq!(slot.present_value, U256::ZERO);
    assert_eq!(slot.original_value, U256::ZERO);
}

#[test]
fn reverting_callee_leaves_caller_storage_intact() {
    // Callee: SSTORE(0, 1); REVERT(0, 0)
    let callee_code = hex::decode("60016000556000600060006000fd").unwrap();
    // Caller contract: SSTORE(0, 1); CALL(OTHER); STOP
    let mut caller_code = hex::decode("600160005560006000600060006000").unwrap();
    caller_code.push(0x73); // PUSH20
    caller_code.extend_from_slice(OTHER.as_slice());
    caller_code.extend_from_slice(&hex::decode("61fffff100").unwrap());

    let mut db = db_with_contract(&caller_code);
    db.insert_account_info(
        OTHER,
        AccountInfo::from_balance(U256::ZERO)
            .with_code(state::Bytecode::new_raw(callee_code.into())),
    );

    let result = Evm::new(test_env(CONTRACT), db).transact().unwrap();
    assert!(result.success);

    // The caller's own write survives.
    assert_eq!(
        result.state[&CONTRACT].storage[&U256::ZERO].present_value,
        U256::from(1)
    );
    // The callee's write was rolled back with its checkpoint.
    let callee_changed = result
        .state
        .get(&OTHER)
        .map(|account| account.storage.values().any(|slot| slot.is_changed()))
        .unwrap_or(false);
    assert!(!callee_changed);
}

#[test]
fn create_transaction_deploys_code() {
    // Initcode returning the two-byte runtime `0x6000`:
    // PUSH2 0x6000; PUSH1 0; MSTORE; PUSH1 2; PUSH1 30; RETURN
    let init_code = hex::decode("6160006000526002601ef3").unwrap();

    let mut db = InMemoryDb::default();
    db.insert_account_info(CALLER, AccountInfo::from_balance(U256::from(10u128.pow(18))));

    let mut env = test_env(CONTRACT);
    env.tx.transact_to = TransactTo::Create;
    env.tx.data = init_code.into();

    let result = Evm::new(env, db).transact().unwrap();
    assert!(result.success, "create failed: {:?}", result.reason);
    let created = result.created_address().expect("created address");
    let deployed = &result.state[&created];
    assert_eq!(deployed.info.nonce, 1);
    assert!(deployed.info.has_code());
    // Sender nonce advanced.
    assert_eq!(result.state[&CALLER].info.nonce, 1);
}

#[test]
fn snapshots_are_single_use() {
    let mut db = InMemoryDb::default();
    db.insert_account_info(OTHER, AccountInfo::from_balance(U256::ZERO));
    let mut evm = Evm::new(test_env(OTHER), db);

    evm.journal.load_account(OTHER).unwrap();
    evm.journal.set_balance(OTHER, U256::from(100));
    let snapshot = evm.snapshot();
    evm.journal.set_balance(OTHER, U256::from(200));

    evm.revert_to_snapshot(snapshot).unwrap();
    assert_eq!(evm.journal.account(OTHER).info.balance, U256::from(100));
    assert_eq!(
        evm.revert_to_snapshot(snapshot),
        Err(SnapshotError::InvalidSnapshot(snapshot))
    );
}

#[test]
fn struct_log_tracer_produces_canonical_shape() {
    let code = hex::decode("6005600a0160030260005260206000f3").unwrap();
    let db = db_with_contract(&code);
    let mut evm = Evm::with_tracer(test_env(CONTRACT), db, StructLogTracer::new());
    let result = evm.transact().unwrap();
    assert!(result.success);

    let logs = evm.tracer.logs();
    assert_eq!(logs[0].op, "PUSH1");
    assert_eq!(logs[0].pc, 0);
    assert_eq!(logs[0].depth, 1);
    assert_eq!(logs[0].gas_cost, 3);
    assert_eq!(logs.last().unwrap().op, "RETURN");

    let trace = std::mem::take(&mut evm.tracer).into_trace(
        result.gas_used,
        !result.success,
        result.output.data(),
    );
    let json = serde_json::to_value(&trace).unwrap();
    assert!(json["structLogs"].is_array());
    assert_eq!(json["structLogs"][0]["op"], "PUSH1");
    assert_eq!(json["failed"], false);
}

#[test]
fn event_collector_sees_call_boundaries() {
    let callee_code = hex::decode("00").unwrap();
    let mut caller_code = hex::decode("60006000600060006000").unwrap();
    caller_code.push(0x73);
    caller_code.extend_from_slice(OTHER.as_slice());
    caller_code.extend_from_slice(&hex::decode("61fffff100").unwrap());

    let mut db = db_with_contract(&caller_code);
    db.insert_account_info(
        OTHER,
        AccountInfo::from_balance(U256::ZERO)
            .with_code(state::Bytecode::new_raw(callee_code.into())),
    );

    let filter = EventFilter::all().with_categories([tracer::EventCategory::Call]);
    let mut evm = Evm::with_tracer(test_env(CONTRACT), db, EventCollector::buffered(filter));
    evm.transact().unwrap();

    let events = evm.tracer.take_events();
    // Root call enter/exit plus the nested pair.
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], TraceEvent::CallEnter { depth: 0, .. }));
    assert!(matches!(events[1], TraceEvent::CallEnter { depth: 1, .. }));
    assert!(matches!(events[2], TraceEvent::CallExit { depth: 1, .. }));
    assert!(matches!(events[3], TraceEvent::CallExit { depth: 0, .. }));
}

#[test]
fn fork_backend_resolves_state_through_the_pump() {
    fn proof(balance: u64) -> String {
        format!(
            r#"{{
                "nonce": "0x0",
                "balance": "0x{balance:x}",
                "codeHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
                "storageHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
                "storageProof": []
            }}"#
        )
    }

    let fork = ForkDb::new(BlockTag::Latest, CachePolicy::Lru(1024));
    let mut env = test_env(OTHER);
    env.tx.value = U256::from(250);

    let mut evm = Evm::new(env, fork);
    let result = evm
        .transact_with_fork_pump(|request| {
            assert_eq!(request.method(), "eth_getProof");
            let database::RequestKind::GetProof { address, .. } = &request.kind else {
                panic!("unexpected request kind");
            };
            Some(if *address == CALLER {
                proof(1_000)
            } else {
                proof(0)
            })
        })
        .unwrap();

    assert!(result.success);
    assert_eq!(result.state[&CALLER].info.balance, U256::from(750));
    assert_eq!(result.state[&OTHER].info.balance, U256::from(250));
}

#[test]
fn access_list_reports_warmed_state() {
    // SLOAD(7); STOP
    let code = hex::decode("60075400").unwrap();
    let db = db_with_contract(&code);
    let result = Evm::new(test_env(CONTRACT), db).transact().unwrap();
    assert!(result.success);

    let contract_entry = result
        .access_list
        .iter()
        .find(|(address, _)| *address == CONTRACT)
        .expect("contract is warm");
    assert_eq!(contract_entry.1, vec![U256::from(7)]);
}
