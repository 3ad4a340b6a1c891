//! Shared test fixture: an in-memory oracle app with three staked
//! validators, three data sources, and one registered majority script.

#![allow(dead_code)]

use sibyl_core::{Address, Coins, Context, Event, MemoryStore, ValAddress};
use sibyl_oracle::{
    handle_msg, DataSourceId, DataSourceMeta, ExternalId, Keeper, Msg, MsgResponse, OracleParams,
    OracleScript, OracleScriptId, OracleScriptMeta, RawReport, RequestId, Result, ScriptError,
    ValidatorSet,
};
use sibyl_oracle::script::{ExecuteEnv, PrepareEnv, ScriptResult};

pub const CHAIN_ID: &str = "sibyl-testnet";
pub const GENESIS_TIME: u64 = 1_581_589_790;

pub fn val(n: u8) -> ValAddress {
    ValAddress::from([n; 20])
}

pub fn addr(n: u8) -> Address {
    Address::from([n; 20])
}

pub struct FixedValidatorSet(pub Vec<(ValAddress, u64)>);

impl ValidatorSet for FixedValidatorSet {
    fn bonded_validators(&self) -> Vec<(ValAddress, u64)> {
        self.0.clone()
    }
}

/// Asks data sources 1-3 with the request calldata, then aggregates by
/// majority vote over the first sub-request. Calldata `fail` forces an
/// execute-phase trap.
pub struct MajorityScript;

impl OracleScript for MajorityScript {
    fn prepare(&self, env: &mut PrepareEnv) -> ScriptResult<()> {
        let calldata = env.calldata().to_vec();
        for i in 1..=3u64 {
            env.ask_external_data(ExternalId(i), DataSourceId(i), calldata.clone())?;
        }
        Ok(())
    }

    fn execute(&self, env: &mut ExecuteEnv<'_>) -> ScriptResult<Vec<u8>> {
        if env.calldata() == b"fail" {
            return Err(ScriptError::Trap("forced failure".into()));
        }
        match env.majority_answer(ExternalId(1))? {
            Some(answer) => Ok(answer),
            None => Err(ScriptError::Trap("no answer for the first sub-request".into())),
        }
    }
}

pub struct TestApp {
    pub store: MemoryStore,
    pub keeper: Keeper,
    pub height: u64,
    pub time: u64,
}

impl TestApp {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let validators = vec![(val(1), 100), (val(2), 100), (val(3), 100)];
        let mut keeper = Keeper::new(Box::new(FixedValidatorSet(validators)));
        let mut store = MemoryStore::new();
        {
            // Genesis setup predates every block, so validator activations
            // sort before any request's creation time.
            let mut ctx = Context::new(&mut store, CHAIN_ID, 1, 0);
            keeper
                .set_params(&mut ctx, &OracleParams::default())
                .unwrap();
            for n in 1..=3u8 {
                keeper
                    .add_data_source(
                        &mut ctx,
                        DataSourceMeta {
                            owner: addr(100),
                            name: format!("source-{n}"),
                            description: "test data source".into(),
                        },
                    )
                    .unwrap();
            }
            keeper
                .register_oracle_script(
                    &mut ctx,
                    OracleScriptMeta {
                        owner: addr(100),
                        name: "majority".into(),
                        description: "majority vote over the first sub-request".into(),
                    },
                    Box::new(MajorityScript),
                )
                .unwrap();
            for n in 1..=3u8 {
                keeper.activate(&mut ctx, val(n)).unwrap();
            }
        }
        Self {
            store,
            keeper,
            height: 1,
            time: GENESIS_TIME,
        }
    }

    pub fn set_block(&mut self, height: u64, time: u64) {
        self.height = height;
        self.time = time;
    }

    pub fn with_ctx<R>(&mut self, f: impl FnOnce(&Keeper, &mut Context<'_>) -> R) -> R {
        let Self {
            store,
            keeper,
            height,
            time,
        } = self;
        let mut ctx = Context::new(store, CHAIN_ID, *height, *time);
        f(keeper, &mut ctx)
    }

    /// Applies one message, returning its outcome and the emitted events.
    pub fn handle(&mut self, msg: &Msg) -> (Result<MsgResponse>, Vec<Event>) {
        self.with_ctx(|keeper, ctx| {
            let outcome = handle_msg(keeper, ctx, msg);
            (outcome, ctx.take_events())
        })
    }

    /// Runs the block-end pass and returns the emitted events.
    pub fn end_block(&mut self) -> Vec<Event> {
        self.with_ctx(|keeper, ctx| {
            keeper.end_block(ctx).unwrap();
            ctx.take_events()
        })
    }

    /// Creates a standard request and returns its id.
    pub fn create_request(&mut self, ask_count: u64, min_count: u64) -> RequestId {
        let (outcome, _) = self.handle(&request_msg(ask_count, min_count));
        match outcome.unwrap() {
            MsgResponse::RequestData { request_id } => request_id,
            other => panic!("unexpected response: {other:?}"),
        }
    }

    /// The committee selected for `request_id`.
    pub fn committee(&mut self, request_id: RequestId) -> Vec<ValAddress> {
        self.with_ctx(|keeper, ctx| {
            keeper
                .get_request(ctx, request_id)
                .unwrap()
                .requested_validators
        })
    }
}

pub fn request_msg(ask_count: u64, min_count: u64) -> Msg {
    request_msg_with_calldata(ask_count, min_count, b"calldata")
}

pub fn request_msg_with_calldata(ask_count: u64, min_count: u64, calldata: &[u8]) -> Msg {
    Msg::RequestData {
        oracle_script_id: OracleScriptId(1),
        calldata: calldata.to_vec(),
        ask_count,
        min_count,
        client_id: "app_test".into(),
        fee_limit: Coins::empty(),
        prepare_gas: 10_000,
        execute_gas: 100_000,
        sender: addr(90),
    }
}

/// A full report answering sub-requests 1-3.
pub fn report_msg(request_id: RequestId, validator: ValAddress) -> Msg {
    Msg::ReportData {
        request_id,
        raw_reports: vec![
            RawReport::new(ExternalId(1), 0, b"answer1".to_vec()),
            RawReport::new(ExternalId(2), 0, b"answer2".to_vec()),
            RawReport::new(ExternalId(3), 0, b"answer3".to_vec()),
        ],
        validator,
    }
}

/// Events of the given kind.
pub fn events_of<'a>(events: &'a [Event], kind: &str) -> Vec<&'a Event> {
    events.iter().filter(|e| e.kind == kind).collect()
}
