//! The transaction driver.
//!
//! [`Evm`] owns the environment, the journaled state and the tracer, and
//! implements the interpreter's [`Host`] trait. Nested `CALL`/`CREATE`
//! opcodes recurse through [`Host::call`]/[`Host::create`]: each nested
//! frame runs under its own journal checkpoint that commits on success and
//! replays backwards on failure.

use crate::{
    precompile::{PrecompileError, Precompiles},
    result::{EvmError, ExecutionResult, Output},
};
use bytecode::{AnalyzedBytecode, Bytecode};
use database::{Database, DatabaseCommit};
use interpreter::{
    gas::{validate_initial_tx_gas, CODEDEPOSIT},
    instruction_table, return_ok, return_revert, CallInputs, CallOutcome, CreateInputs,
    CreateOutcome, FrameInput, Gas, Host, InstructionResult, Interpreter, InterpreterResult,
    CALL_STACK_LIMIT,
};
use journal::{
    AccountLoad, Journal, SStoreResult, SelfDestructResult, SnapshotError, SnapshotId, StateLoad,
    TransferError,
};
use primitives::{
    create2_address, create_address, keccak256, Address, Bytes, Env, Hardfork, HashSet, Log,
    TransactTo, B256, MAX_CODE_SIZE, U256,
};
use state::AccountStatus;
use tracer::{NoopTracer, Tracer, TransactionOutcome};

/// The EVM: environment, journaled state, precompile set and tracer.
#[derive(Debug)]
pub struct Evm<DB: Database, TR: Tracer = NoopTracer> {
    /// Chain, block and transaction environment.
    pub env: Env,
    /// Journaled state over the backing database.
    pub journal: Journal<DB>,
    /// Registered precompiles.
    pub precompiles: Precompiles,
    /// Observer of every lifecycle transition.
    pub tracer: TR,
    /// First database error seen while a frame was running; frames halt
    /// with `StateUnavailable` and the error resurfaces from `transact`.
    db_error: Option<DB::Error>,
}

impl<DB: Database> Evm<DB> {
    /// Driver without tracing; the no-op hooks compile away.
    pub fn new(env: Env, db: DB) -> Self {
        Self::with_tracer(env, db, NoopTracer)
    }
}

impl<DB: Database, TR: Tracer> Evm<DB, TR> {
    /// Driver observed by `tracer`.
    pub fn with_tracer(env: Env, db: DB, tracer: TR) -> Self {
        let spec = env.cfg.spec;
        Self {
            env,
            journal: Journal::new(spec, db),
            precompiles: Precompiles::empty(),
            tracer,
            db_error: None,
        }
    }

    /// Installs a precompile set.
    pub fn with_precompiles(mut self, precompiles: Precompiles) -> Self {
        self.precompiles = precompiles;
        self
    }

    /// The backing database.
    pub fn db(&mut self) -> &mut DB {
        &mut self.journal.database
    }

    /// Takes a user-facing snapshot of the journal session.
    pub fn snapshot(&mut self) -> SnapshotId {
        self.journal.snapshot()
    }

    /// Reverts to a snapshot; ids are single-use.
    pub fn revert_to_snapshot(&mut self, id: SnapshotId) -> Result<(), SnapshotError> {
        self.journal.revert_to_snapshot(id)
    }

    fn stash<T>(&mut self, result: Result<T, DB::Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                if self.db_error.is_none() {
                    self.db_error = Some(error);
                }
                None
            }
        }
    }

    /// Executes the configured transaction and returns its outcome plus
    /// the touched state. State is *not* committed; see
    /// [`transact_commit`](Self::transact_commit).
    pub fn transact(&mut self) -> Result<ExecutionResult, EvmError<DB::Error>> {
        let spec = self.env.cfg.spec;
        // A fresh journal session per transaction attempt.
        let _ = self.journal.finalize();
        self.journal.set_spec(spec);
        self.db_error = None;

        self.validate_env(spec)?;

        let caller = self.env.tx.caller;
        let value = self.env.tx.value;
        let data = self.env.tx.data.clone();
        let gas_limit = self.env.tx.gas_limit;
        let is_create = self.env.tx.transact_to.is_create();
        let effective_gas_price = self.env.effective_gas_price();

        let initial_gas =
            validate_initial_tx_gas(spec, &data, is_create, &self.env.tx.access_list);
        if initial_gas > gas_limit {
            return Err(EvmError::CallGasCostMoreThanGasLimit);
        }

        // Seed transaction-level warmth (EIP-2929 / EIP-3651).
        let mut warm = HashSet::default();
        warm.insert(caller);
        if let TransactTo::Call(to) = self.env.tx.transact_to {
            warm.insert(to);
        }
        if spec.is_enabled_in(Hardfork::Shanghai) {
            warm.insert(self.env.block.coinbase);
        }
        let precompile_addresses: HashSet<Address> =
            self.precompiles.addresses().copied().collect();
        warm.extend(precompile_addresses.iter().copied());
        self.journal.warm_preloaded_addresses = warm;
        self.journal.precompiles = precompile_addresses;

        // Sender checks need the account (and its code for EIP-3607).
        let caller_load = self.journal.load_code(caller).map_err(EvmError::Database)?;
        let caller_info = caller_load.data.info.clone();
        if caller_info.has_code() && caller_info.delegated_address.is_none() {
            // EIP-3607, with the EIP-7702 delegation carve-out.
            return Err(EvmError::RejectCallerWithCode);
        }
        if let Some(tx_nonce) = self.env.tx.nonce {
            if caller_info.nonce != tx_nonce {
                return Err(EvmError::NonceMismatch {
                    state: caller_info.nonce,
                    tx: tx_nonce,
                });
            }
        }

        // Charge the full gas budget up front; unused gas flows back at
        // settlement.
        let payment = U256::from(gas_limit)
            .checked_mul(effective_gas_price)
            .ok_or(EvmError::OverflowPayment)?;
        let needed = payment
            .checked_add(value)
            .ok_or(EvmError::OverflowPayment)?;
        if caller_info.balance < needed {
            return Err(EvmError::LackOfFundForMaxFee);
        }
        self.journal
            .set_balance(caller, caller_info.balance - payment);

        // Pre-warm the EIP-2930 access list.
        let access_list = self.env.tx.access_list.clone();
        for (address, slots) in &access_list {
            self.journal
                .load_account(*address)
                .map_err(EvmError::Database)?;
            for slot in slots {
                self.journal
                    .sload(*address, *slot)
                    .map_err(EvmError::Database)?;
            }
        }

        self.tracer.transaction_start(&self.env);

        let first_frame_gas = gas_limit - initial_gas;
        let (result, created_address) = match self.env.tx.transact_to {
            TransactTo::Call(to) => {
                if self.journal.inc_nonce(caller).is_none() {
                    return Err(EvmError::NonceOverflow);
                }
                let outcome = self.call_inner(CallInputs {
                    input: data,
                    gas_limit: first_frame_gas,
                    bytecode_address: to,
                    target_address: to,
                    caller,
                    value: interpreter::CallValue::Transfer(value),
                    scheme: interpreter::CallScheme::Call,
                    is_static: false,
                });
                (outcome.result, None)
            }
            TransactTo::Create => {
                let outcome = self.create_inner(CreateInputs {
                    caller,
                    scheme: interpreter::CreateScheme::Create,
                    value,
                    init_code: data,
                    gas_limit: first_frame_gas,
                });
                let address = outcome.result.is_ok().then_some(outcome.address).flatten();
                (outcome.result, address)
            }
        };

        if result.result == InstructionResult::StateUnavailable {
            return Err(self
                .db_error
                .take()
                .map(EvmError::Database)
                .unwrap_or(EvmError::StateUnavailable));
        }

        // Transaction-level gas: everything spent, then the frame's leftover
        // erased back for successful and reverting outcomes.
        let mut tx_gas = Gas::new(gas_limit);
        let _ = tx_gas.record_cost(gas_limit);
        match result.result {
            return_ok!() => {
                tx_gas.erase_cost(result.gas.remaining());
                tx_gas.record_refund(result.gas.refunded());
            }
            return_revert!() => {
                tx_gas.erase_cost(result.gas.remaining());
            }
            _ => {}
        }
        tx_gas.set_final_refund(spec.is_enabled_in(Hardfork::London));
        let gas_refunded = tx_gas.refunded() as u64;
        let gas_used = tx_gas.spent() - gas_refunded;
        tracing::debug!(
            target: "evm",
            reason = ?result.result,
            gas_used,
            gas_refunded,
            "transaction executed"
        );

        self.settle(caller, effective_gas_price, &tx_gas)
            .map_err(EvmError::Database)?;

        let access_list = self.collect_access_list();
        let success = result.result.is_ok();
        let output = if is_create {
            Output::Create(result.output.clone(), created_address)
        } else {
            Output::Call(result.output.clone())
        };

        self.tracer.transaction_end(&TransactionOutcome {
            output: result.output.clone(),
            gas_used,
            gas_refunded,
            success,
            error: (!success).then(|| format!("{:?}", result.result)),
            created_address,
        });

        let journal_output = self.journal.finalize();
        Ok(ExecutionResult {
            success,
            reason: result.result,
            output,
            gas_used,
            gas_refunded,
            logs: journal_output.logs,
            access_list,
            state: journal_output.state,
        })
    }

    /// Environment validation that does not touch state.
    fn validate_env(&self, spec: Hardfork) -> Result<(), EvmError<DB::Error>> {
        let env = &self.env;
        if spec.is_enabled_in(Hardfork::Merge) && env.block.prevrandao.is_none() {
            return Err(EvmError::PrevrandaoNotSet);
        }
        if spec.is_enabled_in(Hardfork::London) {
            if let Some(priority_fee) = env.tx.gas_priority_fee {
                if priority_fee > env.tx.gas_price {
                    return Err(EvmError::PriorityFeeGreaterThanMaxFee);
                }
            }
            if env.effective_gas_price() < env.block.basefee {
                return Err(EvmError::GasPriceLessThanBasefee);
            }
        }
        if U256::from(env.tx.gas_limit) > env.block.gas_limit {
            return Err(EvmError::CallerGasLimitMoreThanBlock);
        }
        Ok(())
    }

    /// Returns leftover gas to the caller and pays the coinbase its share.
    fn settle(
        &mut self,
        caller: Address,
        effective_gas_price: U256,
        tx_gas: &Gas,
    ) -> Result<(), DB::Error> {
        let refunded = tx_gas.refunded() as u64;

        let caller_balance = self.journal.load_account(caller)?.data.info.balance;
        let returned = effective_gas_price * U256::from(tx_gas.remaining() + refunded);
        self.journal
            .set_balance(caller, caller_balance.saturating_add(returned));

        let coinbase = self.env.block.coinbase;
        // EIP-1559 burns the base fee; the coinbase earns the tip only.
        let coinbase_price = if self.env.cfg.spec.is_enabled_in(Hardfork::London) {
            effective_gas_price.saturating_sub(self.env.block.basefee)
        } else {
            effective_gas_price
        };
        let coinbase_balance = self.journal.load_account(coinbase)?.data.info.balance;
        let earned = coinbase_price * U256::from(tx_gas.spent() - refunded);
        self.journal
            .set_balance(coinbase, coinbase_balance.saturating_add(earned));
        Ok(())
    }

    /// The EIP-2929 warm sets accumulated by this transaction.
    fn collect_access_list(&self) -> Vec<(Address, Vec<U256>)> {
        let mut list: Vec<(Address, Vec<U256>)> = self
            .journal
            .state
            .iter()
            .filter(|(_, account)| account.status.contains(AccountStatus::Warm))
            .map(|(address, account)| {
                let mut slots: Vec<U256> = account
                    .storage
                    .iter()
                    .filter(|(_, slot)| slot.is_warm())
                    .map(|(key, _)| *key)
                    .collect();
                slots.sort_unstable();
                (*address, slots)
            })
            .collect();
        list.sort_unstable_by_key(|(address, _)| *address);
        list
    }

    /// Code that would execute at `address`, with one level of EIP-7702
    /// delegation resolved. `None` for codeless accounts.
    fn load_execution_code(
        &mut self,
        address: Address,
    ) -> Result<Option<AnalyzedBytecode>, DB::Error> {
        let account = self.journal.load_code(address)?;
        let code = account.data.info.code.clone().unwrap_or_default();
        match code {
            Bytecode::Analyzed(analyzed) => {
                Ok((analyzed.original_len() > 0).then_some(analyzed))
            }
            Bytecode::Eip7702(designator) => {
                let delegate = self.journal.load_code(designator.address())?;
                match delegate.data.info.code.clone().unwrap_or_default() {
                    Bytecode::Analyzed(analyzed) => {
                        Ok((analyzed.original_len() > 0).then_some(analyzed))
                    }
                    // Delegation does not chain.
                    Bytecode::Eip7702(_) => Ok(None),
                }
            }
        }
    }

    pub(crate) fn call_inner(&mut self, inputs: CallInputs) -> CallOutcome {
        let depth = self.journal.depth();
        self.tracer.call(&inputs, depth);
        let outcome = self.call_frame(&inputs);
        self.tracer.call_end(&inputs, &outcome, depth);
        outcome
    }

    fn call_frame(&mut self, inputs: &CallInputs) -> CallOutcome {
        let gas = Gas::new(inputs.gas_limit);
        let fail =
            |reason: InstructionResult| CallOutcome::new(InterpreterResult::new(reason, Bytes::new(), gas));

        if self.journal.depth() > CALL_STACK_LIMIT {
            return fail(InstructionResult::CallDepthExceeded);
        }

        // Resolve code before the checkpoint; the warm-up stays either way.
        let code = match self.load_execution_code(inputs.bytecode_address) {
            Ok(code) => code,
            Err(error) => {
                self.stash::<()>(Err(error));
                return fail(InstructionResult::StateUnavailable);
            }
        };

        let checkpoint = self.journal.checkpoint();

        let transfer_value = inputs.value.transfer();
        if transfer_value.is_zero() {
            // Touching the target matters for EIP-161 state clearing.
            let loaded = self.journal.load_account(inputs.target_address).map(|_| ());
            if self.stash(loaded).is_none() {
                self.journal.checkpoint_revert(checkpoint);
                return fail(InstructionResult::StateUnavailable);
            }
            self.journal.touch(inputs.target_address);
        } else {
            match self
                .journal
                .transfer(inputs.caller, inputs.target_address, transfer_value)
            {
                Err(error) => {
                    self.stash::<()>(Err(error));
                    self.journal.checkpoint_revert(checkpoint);
                    return fail(InstructionResult::StateUnavailable);
                }
                Ok(Some(_)) => {
                    self.journal.checkpoint_revert(checkpoint);
                    return fail(InstructionResult::OutOfFunds);
                }
                Ok(None) => {}
            }
        }

        if let Some(precompile) = self.precompiles.get(&inputs.bytecode_address) {
            let result = self.run_precompile(precompile, inputs, gas);
            if result.result.is_ok() {
                self.journal.checkpoint_commit();
            } else {
                self.journal.checkpoint_revert(checkpoint);
            }
            return CallOutcome::new(result);
        }

        let Some(code) = code else {
            // Calls into codeless accounts succeed immediately.
            self.journal.checkpoint_commit();
            return CallOutcome::new(InterpreterResult::new(
                InstructionResult::Stop,
                Bytes::new(),
                gas,
            ));
        };

        let mut interpreter = Interpreter::new(
            code,
            FrameInput {
                target_address: inputs.target_address,
                caller_address: inputs.caller,
                input: inputs.input.clone(),
                call_value: inputs.value.get(),
            },
            inputs.is_static,
            self.env.cfg.spec,
            inputs.gas_limit,
        );
        let table = instruction_table::<Self>();
        let result = interpreter.run(&table, self);

        if result.result.is_ok() {
            self.journal.checkpoint_commit();
        } else {
            self.journal.checkpoint_revert(checkpoint);
        }
        CallOutcome::new(result)
    }

    fn run_precompile(
        &mut self,
        precompile: crate::precompile::PrecompileFn,
        inputs: &CallInputs,
        mut gas: Gas,
    ) -> InterpreterResult {
        match precompile(&inputs.input, inputs.gas_limit) {
            Ok(output) => {
                if gas.record_cost(output.gas_used) {
                    InterpreterResult::new(InstructionResult::Return, output.output, gas)
                } else {
                    InterpreterResult::new(
                        InstructionResult::OutOfGas,
                        Bytes::new(),
                        Gas::new_spent(inputs.gas_limit),
                    )
                }
            }
            Err(PrecompileError::OutOfGas) => InterpreterResult::new(
                InstructionResult::OutOfGas,
                Bytes::new(),
                Gas::new_spent(inputs.gas_limit),
            ),
            Err(PrecompileError::InvalidInput(_)) => InterpreterResult::new(
                InstructionResult::PrecompileError,
                Bytes::new(),
                Gas::new_spent(inputs.gas_limit),
            ),
        }
    }

    pub(crate) fn create_inner(&mut self, inputs: CreateInputs) -> CreateOutcome {
        let depth = self.journal.depth();
        self.tracer.create(&inputs, depth);
        let outcome = self.create_frame(&inputs);
        self.tracer.create_end(&inputs, &outcome, depth);
        outcome
    }

    fn create_frame(&mut self, inputs: &CreateInputs) -> CreateOutcome {
        let gas = Gas::new(inputs.gas_limit);
        let fail = |reason: InstructionResult| {
            CreateOutcome::new(InterpreterResult::new(reason, Bytes::new(), gas), None)
        };

        if self.journal.depth() > CALL_STACK_LIMIT {
            return fail(InstructionResult::CallDepthExceeded);
        }
        let caller_loaded = self.journal.load_account(inputs.caller).map(|_| ());
        if self.stash(caller_loaded).is_none() {
            return fail(InstructionResult::StateUnavailable);
        }
        if self.journal.account(inputs.caller).info.balance < inputs.value {
            return fail(InstructionResult::OutOfFunds);
        }

        let Some(new_nonce) = self.journal.inc_nonce(inputs.caller) else {
            return fail(InstructionResult::NonceOverflow);
        };
        let created_address = match inputs.scheme {
            interpreter::CreateScheme::Create => create_address(inputs.caller, new_nonce - 1),
            interpreter::CreateScheme::Create2 { salt } => {
                create2_address(inputs.caller, salt, keccak256(&inputs.init_code))
            }
        };

        // Load (and warm) the target before the checkpoint.
        let target_loaded = self.journal.load_account(created_address).map(|_| ());
        if self.stash(target_loaded).is_none() {
            return fail(InstructionResult::StateUnavailable);
        }
        let checkpoint = match self.journal.create_account_checkpoint(
            inputs.caller,
            created_address,
            inputs.value,
        ) {
            Ok(checkpoint) => checkpoint,
            Err(TransferError::CreateCollision) => {
                return CreateOutcome::new(
                    InterpreterResult::new(InstructionResult::CreateCollision, Bytes::new(), gas),
                    Some(created_address),
                )
            }
            Err(_) => return fail(InstructionResult::OutOfFunds),
        };

        let mut interpreter = Interpreter::new(
            AnalyzedBytecode::new(&inputs.init_code),
            FrameInput {
                target_address: created_address,
                caller_address: inputs.caller,
                input: Bytes::new(),
                call_value: inputs.value,
            },
            false,
            self.env.cfg.spec,
            inputs.gas_limit,
        );
        let table = instruction_table::<Self>();
        let mut result = interpreter.run(&table, self);

        if !result.result.is_ok() {
            self.journal.checkpoint_revert(checkpoint);
            return CreateOutcome::new(result, Some(created_address));
        }

        let spec = self.env.cfg.spec;
        let mut code = result.output.clone();

        // EIP-3541: reject code starting with 0xEF.
        if spec.is_enabled_in(Hardfork::London) && code.first() == Some(&0xEF) {
            self.journal.checkpoint_revert(checkpoint);
            result.result = InstructionResult::CreateContractStartingWithEF;
            return CreateOutcome::new(result, Some(created_address));
        }
        // EIP-170: deployed code size cap.
        let max_code_size = self
            .env
            .cfg
            .limit_contract_code_size
            .unwrap_or(MAX_CODE_SIZE);
        if spec.is_enabled_in(Hardfork::SpuriousDragon) && code.len() > max_code_size {
            self.journal.checkpoint_revert(checkpoint);
            result.result = InstructionResult::CreateContractSizeLimit;
            return CreateOutcome::new(result, Some(created_address));
        }
        // Code deposit charge; EIP-2 turns an unpayable deposit into
        // failure instead of an empty contract.
        let deposit_cost = code.len() as u64 * CODEDEPOSIT;
        if !result.gas.record_cost(deposit_cost) {
            if spec.is_enabled_in(Hardfork::Homestead) {
                self.journal.checkpoint_revert(checkpoint);
                result.result = InstructionResult::OutOfGas;
                return CreateOutcome::new(result, Some(created_address));
            }
            code = Bytes::new();
        }

        self.journal.checkpoint_commit();
        self.journal
            .set_code(created_address, Bytecode::new_raw(code));
        CreateOutcome::new(result, Some(created_address))
    }
}

impl<DB: Database + DatabaseCommit, TR: Tracer> Evm<DB, TR> {
    /// Executes the transaction and commits the touched state to the
    /// database.
    pub fn transact_commit(&mut self) -> Result<ExecutionResult, EvmError<DB::Error>> {
        let result = self.transact()?;
        self.journal.database.commit(result.state.clone());
        Ok(result)
    }
}

impl<DB: Database, TR: Tracer> Host for Evm<DB, TR> {
    fn env(&self) -> &Env {
        &self.env
    }

    fn load_account_delegated(&mut self, address: Address) -> Option<StateLoad<AccountLoad>> {
        let result = self.journal.load_account_delegated(address);
        self.stash(result)
    }

    fn balance(&mut self, address: Address) -> Option<StateLoad<U256>> {
        let result = self
            .journal
            .load_account(address)
            .map(|load| StateLoad::new(load.data.info.balance, load.is_cold));
        self.stash(result)
    }

    fn code(&mut self, address: Address) -> Option<StateLoad<Bytes>> {
        let result = self.journal.load_code(address).map(|load| {
            let code = load
                .data
                .info
                .code
                .as_ref()
                .map(Bytecode::original_bytes)
                .unwrap_or_default();
            StateLoad::new(code, load.is_cold)
        });
        self.stash(result)
    }

    fn code_hash(&mut self, address: Address) -> Option<StateLoad<B256>> {
        let spec = self.journal.spec;
        let result = self.journal.load_code(address).map(|load| {
            // EIP-1052: non-existent accounts hash to the zero word.
            let hash = if load.data.state_clear_aware_is_empty(spec) {
                B256::ZERO
            } else {
                load.data.info.code_hash
            };
            StateLoad::new(hash, load.is_cold)
        });
        self.stash(result)
    }

    fn sload(&mut self, address: Address, key: U256) -> Option<StateLoad<U256>> {
        let depth = self.journal.depth();
        let result = self.journal.sload(address, key);
        let load = self.stash(result)?;
        self.tracer
            .storage_read(address, key, load.data, !load.is_cold, depth);
        Some(load)
    }

    fn sstore(&mut self, address: Address, key: U256, value: U256) -> Option<StateLoad<SStoreResult>> {
        let depth = self.journal.depth();
        let result = self.journal.sstore(address, key, value);
        let load = self.stash(result)?;
        self.tracer.storage_write(
            address,
            key,
            load.data.present_value,
            load.data.new_value,
            !load.is_cold,
            depth,
        );
        Some(load)
    }

    fn tload(&mut self, address: Address, key: U256) -> U256 {
        self.journal.tload(address, key)
    }

    fn tstore(&mut self, address: Address, key: U256, value: U256) {
        self.journal.tstore(address, key, value);
    }

    fn log(&mut self, log: Log) {
        let depth = self.journal.depth();
        let index = self.journal.logs.len();
        self.tracer.log(&log, depth, index);
        self.journal.log(log);
    }

    fn selfdestruct(
        &mut self,
        address: Address,
        target: Address,
    ) -> Option<StateLoad<SelfDestructResult>> {
        let depth = self.journal.depth();
        self.tracer.selfdestruct(address, target, depth);
        let result = self.journal.selfdestruct(address, target);
        self.stash(result)
    }

    fn block_hash(&mut self, number: u64) -> Option<B256> {
        let result = self.journal.database.block_hash(number);
        self.stash(result)
    }

    fn call(&mut self, inputs: CallInputs) -> CallOutcome {
        self.call_inner(inputs)
    }

    fn create(&mut self, inputs: CreateInputs) -> CreateOutcome {
        self.create_inner(inputs)
    }

    fn step(&mut self, interpreter: &mut Interpreter) {
        let depth = self.journal.depth();
        self.tracer.step(interpreter, depth);
    }

    fn step_end(&mut self, interpreter: &mut Interpreter) {
        let depth = self.journal.depth();
        self.tracer.step_end(interpreter, depth);
    }
}
