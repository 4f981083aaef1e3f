#![allow(dead_code)]

use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use gavel_core::{
    config::RelativeQuorumParams,
    signature::sign_digest,
    utils::crypto::public_key_address,
    CallContext, Contract, CoreConfig, CoreError, EcdsaSignature, GovernanceCore, Msg,
    RolePolicy, StrategyParams,
};
use gavel_types::{
    selector_of, ActionGuard, ActionInfo, ActionState, IGavelCore, PermissionData,
};
use k256::ecdsa::SigningKey;
use tracing_subscriber::EnvFilter;

pub const CORE: Address = Address::with_last_byte(0xc0);
pub const EXECUTOR: Address = Address::with_last_byte(0xe0);
pub const POLICY: Address = Address::with_last_byte(0xb0);
pub const COUNTER: Address = Address::with_last_byte(0x10);
pub const REVERTER: Address = Address::with_last_byte(0x11);
pub const REENTRANT: Address = Address::with_last_byte(0x12);
pub const WHOAMI: Address = Address::with_last_byte(0x13);
pub const DRIFT: Address = Address::with_last_byte(0x14);
pub const GUARD: Address = Address::with_last_byte(0x15);
pub const MEDDLER: Address = Address::with_last_byte(0x16);
pub const OUTSIDER: Address = Address::with_last_byte(0x66);

pub const APPROVER: u8 = 1;
pub const DISAPPROVER: u8 = 2;
pub const CREATOR: u8 = 3;
pub const FORCE: u8 = 4;

pub const START: u64 = 1_700_000_000;
pub const DAY: u64 = 86_400;
pub const APPROVAL_PERIOD: u64 = 2 * DAY;
pub const QUEUING_PERIOD: u64 = DAY;
pub const EXPIRATION_PERIOD: u64 = 3 * DAY;

/// `increment()`
pub const INCREMENT: [u8; 4] = [0xd0, 0x9d, 0xe0, 0x8a];

pub fn increment() -> Bytes {
    Bytes::copy_from_slice(&INCREMENT)
}

pub fn signer(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).expect("valid secret key")
}

pub fn address_of(key: &SigningKey) -> Address {
    public_key_address(key.verifying_key())
}

pub fn sign(key: &SigningKey, digest: B256) -> EcdsaSignature {
    sign_digest(key, digest).expect("signing succeeds")
}

pub fn relative_params(fixed: bool) -> StrategyParams {
    StrategyParams::RelativeQuorum(RelativeQuorumParams {
        approval_period: APPROVAL_PERIOD,
        queuing_period: QUEUING_PERIOD,
        expiration_period: EXPIRATION_PERIOD,
        is_fixed_length_approval_period: fixed,
        min_approval_pct: 6000,
        min_disapproval_pct: 6000,
        approval_role: APPROVER,
        disapproval_role: DISAPPROVER,
        force_approval_roles: vec![FORCE],
        force_disapproval_roles: vec![],
    })
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A core with three approvers and three disapprovers (quantity 1 each, 60% quorum), one creator,
/// one force approver, and the test contracts deployed.
pub struct Fixture {
    pub core: GovernanceCore<RolePolicy>,
    pub creator: SigningKey,
    pub approvers: Vec<SigningKey>,
    pub disapprovers: Vec<SigningKey>,
    pub forcer: SigningKey,
    pub outsider: SigningKey,
    /// Relative quorum whose window closes once quorum is met.
    pub strategy: Address,
    /// Relative quorum with a fixed-length window.
    pub fixed_strategy: Address,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();

        let creator = signer(1);
        let approvers: Vec<_> = (2..=4).map(signer).collect();
        let disapprovers: Vec<_> = (5..=7).map(signer).collect();
        let forcer = signer(8);
        let outsider = signer(9);

        let mut policy = RolePolicy::new();
        policy.set_role_holder(address_of(&creator), CREATOR, 1, u64::MAX);
        for key in &approvers {
            policy.set_role_holder(address_of(key), APPROVER, 1, u64::MAX);
        }
        for key in &disapprovers {
            policy.set_role_holder(address_of(key), DISAPPROVER, 1, u64::MAX);
        }
        policy.set_role_holder(address_of(&forcer), FORCE, 1, u64::MAX);

        let config = CoreConfig {
            name: "Gavel".into(),
            address: CORE,
            executor: EXECUTOR,
            policy: POLICY,
            chain_id: 31337,
            genesis_timestamp: START,
            strategies: vec![relative_params(false), relative_params(true)],
            accounts: vec![],
        };
        let strategy = config.strategies[0].deployed_address(CORE);
        let fixed_strategy = config.strategies[1].deployed_address(CORE);

        let mut core = GovernanceCore::initialize(&config, policy).expect("core initializes");
        core.deploy_contract(COUNTER, Box::new(Counter::default()))
            .expect("counter deploys");
        core.deploy_contract(REVERTER, Box::new(Reverter))
            .expect("reverter deploys");
        core.deploy_contract(WHOAMI, Box::new(Whoami))
            .expect("whoami deploys");
        core.deploy_contract(DRIFT, Box::new(DriftScript))
            .expect("drift script deploys");

        Self {
            core,
            creator,
            approvers,
            disapprovers,
            forcer,
            outsider,
            strategy,
            fixed_strategy,
        }
    }

    pub fn creator(&self) -> Address {
        address_of(&self.creator)
    }

    pub fn approver(&self, i: usize) -> Address {
        address_of(&self.approvers[i])
    }

    pub fn disapprover(&self, i: usize) -> Address {
        address_of(&self.disapprovers[i])
    }

    pub fn now(&self) -> u64 {
        self.core.block().timestamp
    }

    pub fn warp_by(&mut self, seconds: u64) {
        let now = self.now();
        self.core.warp(now + seconds);
    }

    /// Gives the creator role permission for `(target, selector, strategy)`.
    pub fn permit(&mut self, target: Address, selector: FixedBytes<4>, strategy: Address) {
        let permission = PermissionData {
            target,
            selector,
            strategy,
        }
        .permission_id();
        self.core
            .policy_mut()
            .set_role_permission(CREATOR, permission, true);
    }

    /// The `ActionInfo` the next created action will have.
    pub fn next_info(&self, strategy: Address, target: Address, value: U256, data: Bytes) -> ActionInfo {
        ActionInfo {
            id: self.core.action_count(),
            creator: self.creator(),
            creatorRole: CREATOR,
            strategy,
            target,
            value,
            data,
        }
    }

    pub fn try_create(&mut self, info: &ActionInfo) -> Result<U256, CoreError> {
        self.core.create_action(
            Msg::new(info.creator),
            info.creatorRole,
            info.strategy,
            info.target,
            info.value,
            info.data.clone(),
            "# Test action",
        )
    }

    pub fn create(&mut self, strategy: Address, target: Address, value: U256, data: Bytes) -> ActionInfo {
        self.permit(target, selector_of(&data), strategy);
        let info = self.next_info(strategy, target, value, data);
        let id = self.try_create(&info).expect("action created");
        assert_eq!(id, info.id);
        info
    }

    pub fn create_counter_action(&mut self) -> ActionInfo {
        self.create(self.strategy, COUNTER, U256::ZERO, increment())
    }

    pub fn approve(&mut self, info: &ActionInfo, i: usize) -> Result<u128, CoreError> {
        let approver = self.approver(i);
        self.core
            .cast_approval(Msg::new(approver), APPROVER, info, "lgtm")
    }

    pub fn disapprove(&mut self, info: &ActionInfo, i: usize) -> Result<u128, CoreError> {
        let disapprover = self.disapprover(i);
        self.core
            .cast_disapproval(Msg::new(disapprover), DISAPPROVER, info, "no")
    }

    pub fn queue(&mut self, info: &ActionInfo) -> Result<u64, CoreError> {
        self.core.queue_action(Msg::new(OUTSIDER), info)
    }

    /// Two approvals, queue, and wait out the timelock. Only for the non-fixed strategy.
    pub fn pass(&mut self, info: &ActionInfo) {
        self.approve(info, 0).expect("first approval");
        self.approve(info, 1).expect("second approval");
        let min_execution_time = self.queue(info).expect("queued");
        self.core.warp(min_execution_time);
    }

    pub fn execute(&mut self, info: &ActionInfo) -> Result<Bytes, CoreError> {
        self.execute_with_value(info, U256::ZERO)
    }

    pub fn execute_with_value(&mut self, info: &ActionInfo, value: U256) -> Result<Bytes, CoreError> {
        self.core
            .execute_action(Msg::new(OUTSIDER).with_value(value), info)
    }

    pub fn state(&self, info: &ActionInfo) -> ActionState {
        self.core.get_action_state(info).expect("known action")
    }

    pub fn executed(&self, info: &ActionInfo) -> bool {
        self.core.action(info.id).expect("known action").executed
    }

    /// Executes a governance action calling the core itself with `call`.
    pub fn govern<C: SolCall>(&mut self, call: C) -> Result<Bytes, CoreError> {
        let info = self.create(self.strategy, CORE, U256::ZERO, call.abi_encode().into());
        self.pass(&info);
        self.execute(&info)
    }
}

/// Counts calls and returns the new count.
#[derive(Clone, Default)]
pub struct Counter {
    pub count: u64,
}

impl Contract for Counter {
    fn call(&mut self, _ctx: &mut CallContext<'_>, _data: &[u8]) -> Result<Bytes, Bytes> {
        self.count += 1;
        Ok(U256::from(self.count).abi_encode().into())
    }
}

#[derive(Clone)]
pub struct Reverter;

impl Contract for Reverter {
    fn call(&mut self, _ctx: &mut CallContext<'_>, _data: &[u8]) -> Result<Bytes, Bytes> {
        Err(Bytes::from_static(b"boom"))
    }
}

/// Returns `(this, sender, value)`.
#[derive(Clone)]
pub struct Whoami;

impl Contract for Whoami {
    fn call(&mut self, ctx: &mut CallContext<'_>, _data: &[u8]) -> Result<Bytes, Bytes> {
        Ok((ctx.this(), ctx.sender(), ctx.value()).abi_encode().into())
    }
}

/// Rewrites the executor when it gets storage access.
#[derive(Clone)]
pub struct DriftScript;

impl Contract for DriftScript {
    fn call(&mut self, ctx: &mut CallContext<'_>, _data: &[u8]) -> Result<Bytes, Bytes> {
        if let Some(storage) = ctx.storage_mut() {
            storage.slot0_mut().executor = OUTSIDER;
        }
        Ok(Bytes::new())
    }
}

/// Calls the core with `calldata` while being executed. Returns the revert data of that call, or
/// nothing when it went through; with `revert_after` set it reverts with `b"after"` regardless.
#[derive(Clone)]
pub struct Meddler {
    pub calldata: Bytes,
    pub revert_after: bool,
}

impl Contract for Meddler {
    fn call(&mut self, ctx: &mut CallContext<'_>, _data: &[u8]) -> Result<Bytes, Bytes> {
        let output = match ctx.call(CORE, U256::ZERO, &self.calldata) {
            Ok(_) => Bytes::new(),
            Err(revert) => revert,
        };
        if self.revert_after {
            return Err(Bytes::from_static(b"after"));
        }
        Ok(output)
    }
}

/// Calls back into the core to execute `info` again.
#[derive(Clone)]
pub struct Reentrant {
    pub info: ActionInfo,
}

impl Contract for Reentrant {
    fn call(&mut self, ctx: &mut CallContext<'_>, _data: &[u8]) -> Result<Bytes, Bytes> {
        let call = IGavelCore::executeActionCall {
            actionInfo: self.info.clone(),
        };
        ctx.call(CORE, U256::ZERO, &call.abi_encode())
    }
}

#[derive(Clone, Default)]
pub struct VetoGuard {
    pub creation: bool,
    pub pre: bool,
    pub post: bool,
}

impl ActionGuard for VetoGuard {
    fn validate_action_creation(&mut self, _info: &ActionInfo) -> Result<(), String> {
        if self.creation {
            return Err("creation vetoed".into());
        }
        Ok(())
    }

    fn validate_pre_action_execution(&mut self, _info: &ActionInfo) -> Result<(), String> {
        if self.pre {
            return Err("pre-execution vetoed".into());
        }
        Ok(())
    }

    fn validate_post_action_execution(&mut self, _info: &ActionInfo) -> Result<(), String> {
        if self.post {
            return Err("post-execution vetoed".into());
        }
        Ok(())
    }
}
