mod common;

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_sol_types::{SolCall, SolValue};
use gavel_core::{
    config::AbsoluteQuorumParams, engine::constants::ABSOLUTE_QUORUM_LOGIC, CoreError, CoreEvent,
    Msg, StrategyParams,
};
use gavel_types::{ActionInfo, ActionState, IGavelCore};

use common::*;

fn whoami(result: &Bytes) -> (Address, Address, U256) {
    <(Address, Address, U256)>::abi_decode(result, true).expect("whoami output")
}

#[test]
fn value_is_forwarded_through_the_executor() {
    let mut fx = Fixture::new();
    let info = fx.create(fx.strategy, COUNTER, U256::from(5u64), increment());
    fx.pass(&info);

    assert_eq!(
        fx.execute_with_value(&info, U256::from(4u64)),
        Err(CoreError::InsufficientMsgValue)
    );
    assert!(!fx.executed(&info));
    assert_eq!(fx.core.balance_of(EXECUTOR), U256::ZERO);

    fx.execute_with_value(&info, U256::from(7u64))
        .expect("executes");
    assert_eq!(fx.core.balance_of(COUNTER), U256::from(5u64));
    assert_eq!(fx.core.balance_of(EXECUTOR), U256::from(2u64));
}

#[test]
fn target_revert_is_wrapped_and_rolled_back() {
    let mut fx = Fixture::new();
    let info = fx.create(fx.strategy, REVERTER, U256::from(3u64), increment());
    fx.pass(&info);

    assert_eq!(
        fx.execute_with_value(&info, U256::from(3u64)),
        Err(CoreError::FailedActionExecution(Bytes::from_static(b"boom")))
    );
    assert!(!fx.executed(&info));
    assert_eq!(fx.state(&info), ActionState::Queued);
    assert_eq!(fx.core.balance_of(REVERTER), U256::ZERO);
    assert_eq!(fx.core.balance_of(EXECUTOR), U256::ZERO);
}

#[test]
fn reentrant_execution_is_rejected() {
    let mut fx = Fixture::new();
    let info = fx.next_info(fx.strategy, REENTRANT, U256::ZERO, increment());
    fx.core
        .deploy_contract(REENTRANT, Box::new(Reentrant { info: info.clone() }))
        .expect("reentrant deploys");
    let created = fx.create(fx.strategy, REENTRANT, U256::ZERO, increment());
    assert_eq!(created, info);
    fx.pass(&info);

    let revert = match fx.execute(&info) {
        Err(CoreError::FailedActionExecution(revert)) => revert,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(
        CoreError::decode(&revert),
        Some(CoreError::InvalidActionState {
            expected: ActionState::Queued,
            current: ActionState::Queued,
        })
    );
    assert!(!fx.executed(&info));
    assert_eq!(fx.state(&info), ActionState::Queued);
}

#[test]
fn reentrant_cancel_is_rejected() {
    let mut fx = Fixture::new();
    let params = StrategyParams::AbsoluteQuorum(AbsoluteQuorumParams {
        approval_period: DAY,
        queuing_period: 0,
        expiration_period: DAY,
        is_fixed_length_approval_period: false,
        min_approvals: 1,
        min_disapprovals: None,
        approval_role: APPROVER,
        disapproval_role: DISAPPROVER,
        force_approval_roles: vec![],
        force_disapproval_roles: vec![],
    });
    // absolute quorum lets the creator cancel a queued action
    let strategy = fx
        .core
        .create_strategies(Msg::new(EXECUTOR), ABSOLUTE_QUORUM_LOGIC, &[params.encode()])
        .expect("strategy created")[0];

    // the meddler creates the action and is also its target
    fx.core
        .policy_mut()
        .set_role_holder(MEDDLER, CREATOR, 1, u64::MAX);
    fx.permit(MEDDLER, FixedBytes(INCREMENT), strategy);
    let info = ActionInfo {
        id: fx.core.action_count(),
        creator: MEDDLER,
        creatorRole: CREATOR,
        strategy,
        target: MEDDLER,
        value: U256::ZERO,
        data: increment(),
    };
    let calldata = IGavelCore::cancelActionCall {
        actionInfo: info.clone(),
    }
    .abi_encode();
    fx.core
        .deploy_contract(
            MEDDLER,
            Box::new(Meddler {
                calldata: calldata.into(),
                revert_after: false,
            }),
        )
        .expect("meddler deploys");
    fx.core
        .create_action(
            Msg::new(MEDDLER),
            CREATOR,
            strategy,
            MEDDLER,
            U256::ZERO,
            increment(),
            "# Cancel yourself",
        )
        .expect("action created");
    fx.approve(&info, 0).expect("approval");
    fx.queue(&info).expect("queued");

    let result = fx.execute(&info).expect("executes");
    assert_eq!(
        CoreError::decode(&result),
        Some(CoreError::CannotCancelInState(ActionState::Queued))
    );

    let action = fx.core.action(info.id).expect("known action");
    assert!(action.executed);
    assert!(!action.canceled);
    assert_eq!(fx.state(&info), ActionState::Executed);
    assert!(!fx
        .core
        .events()
        .iter()
        .any(|event| matches!(event, CoreEvent::ActionCanceled { .. })));
}

#[test]
fn reentrant_disapproval_is_rejected() {
    let mut fx = Fixture::new();
    fx.core
        .policy_mut()
        .set_role_holder(MEDDLER, DISAPPROVER, 1, u64::MAX);
    let info = fx.next_info(fx.strategy, MEDDLER, U256::ZERO, increment());
    let calldata = IGavelCore::castDisapprovalCall {
        role: DISAPPROVER,
        actionInfo: info.clone(),
        reason: "too late".into(),
    }
    .abi_encode();
    fx.core
        .deploy_contract(
            MEDDLER,
            Box::new(Meddler {
                calldata: calldata.into(),
                revert_after: false,
            }),
        )
        .expect("meddler deploys");
    let created = fx.create(fx.strategy, MEDDLER, U256::ZERO, increment());
    assert_eq!(created, info);
    fx.pass(&info);

    let result = fx.execute(&info).expect("executes");
    assert_eq!(
        CoreError::decode(&result),
        Some(CoreError::InvalidActionState {
            expected: ActionState::Queued,
            current: ActionState::Queued,
        })
    );

    let action = fx.core.action(info.id).expect("known action");
    assert!(action.executed);
    assert!(!action.canceled);
    assert_eq!(action.total_disapprovals, 0);
    assert!(!fx.core.has_disapproved(info.id, MEDDLER));
    assert_eq!(fx.state(&info), ActionState::Executed);
    assert!(!fx
        .core
        .events()
        .iter()
        .any(|event| matches!(event, CoreEvent::DisapprovalCast { .. })));
}

#[test]
fn rolled_back_execution_drops_inner_events() {
    let mut fx = Fixture::new();
    fx.core
        .policy_mut()
        .set_role_holder(MEDDLER, DISAPPROVER, 1, u64::MAX);
    let victim = fx.create_counter_action();
    let info = fx.next_info(fx.strategy, MEDDLER, U256::ZERO, increment());
    let calldata = IGavelCore::castDisapprovalCall {
        role: DISAPPROVER,
        actionInfo: victim.clone(),
        reason: "never lands".into(),
    }
    .abi_encode();
    fx.core
        .deploy_contract(
            MEDDLER,
            Box::new(Meddler {
                calldata: calldata.into(),
                revert_after: true,
            }),
        )
        .expect("meddler deploys");
    fx.create(fx.strategy, MEDDLER, U256::ZERO, increment());
    fx.pass(&victim);
    fx.pass(&info);

    let events_before = fx.core.events().len();
    assert_eq!(
        fx.execute(&info),
        Err(CoreError::FailedActionExecution(Bytes::from_static(b"after")))
    );
    // the inner disapproval succeeded before the target reverted
    assert_eq!(fx.core.events().len(), events_before);
    assert!(!fx.core.has_disapproved(victim.id, MEDDLER));
    assert_eq!(fx.core.action(victim.id).expect("known action").total_disapprovals, 0);
    assert_eq!(fx.state(&info), ActionState::Queued);
}

#[test]
fn ordinary_call_runs_in_the_target_context() {
    let mut fx = Fixture::new();
    let info = fx.create(fx.strategy, WHOAMI, U256::from(1u64), increment());
    fx.pass(&info);

    let result = fx
        .execute_with_value(&info, U256::from(1u64))
        .expect("executes");
    assert_eq!(whoami(&result), (WHOAMI, EXECUTOR, U256::from(1u64)));
}

#[test]
fn script_runs_in_the_executor_context() {
    let mut fx = Fixture::new();
    fx.core
        .authorize_script(Msg::new(EXECUTOR), WHOAMI, true)
        .expect("script authorized");
    let info = fx.create(fx.strategy, WHOAMI, U256::from(1u64), increment());
    assert!(fx.core.action(info.id).expect("known").is_script);
    fx.pass(&info);

    let result = fx
        .execute_with_value(&info, U256::from(1u64))
        .expect("executes");
    assert_eq!(whoami(&result), (EXECUTOR, CORE, U256::from(1u64)));
    // a delegate call moves no value
    assert_eq!(fx.core.balance_of(EXECUTOR), U256::from(1u64));
    assert_eq!(fx.core.balance_of(WHOAMI), U256::ZERO);
}

#[test]
fn script_flag_is_fixed_at_creation() {
    let mut fx = Fixture::new();
    let info = fx.create(fx.strategy, WHOAMI, U256::ZERO, increment());
    fx.core
        .authorize_script(Msg::new(EXECUTOR), WHOAMI, true)
        .expect("script authorized");
    fx.pass(&info);

    let result = fx.execute(&info).expect("executes");
    assert_eq!(whoami(&result).0, WHOAMI);
}

#[test]
fn script_changing_slot0_is_reverted() {
    let mut fx = Fixture::new();
    fx.core
        .authorize_script(Msg::new(EXECUTOR), DRIFT, true)
        .expect("script authorized");
    let info = fx.create(fx.strategy, DRIFT, U256::ZERO, increment());
    fx.pass(&info);

    assert_eq!(fx.execute(&info), Err(CoreError::Slot0Changed));
    assert_eq!(fx.core.executor(), EXECUTOR);
    assert!(!fx.executed(&info));
}

#[test]
fn plain_call_cannot_touch_core_storage() {
    let mut fx = Fixture::new();
    let info = fx.create(fx.strategy, DRIFT, U256::ZERO, increment());
    fx.pass(&info);

    fx.execute(&info).expect("executes");
    assert_eq!(fx.core.executor(), EXECUTOR);
}

#[test]
fn call_to_an_address_without_code_succeeds() {
    let mut fx = Fixture::new();
    let recipient = Address::with_last_byte(0x77);
    let info = fx.create(fx.strategy, recipient, U256::from(9u64), Bytes::new());
    fx.pass(&info);

    let result = fx
        .execute_with_value(&info, U256::from(9u64))
        .expect("executes");
    assert!(result.is_empty());
    assert_eq!(fx.core.balance_of(recipient), U256::from(9u64));
}

fn guard_counter(fx: &mut Fixture, guard: VetoGuard) {
    fx.core
        .deploy_guard(GUARD, Box::new(guard))
        .expect("guard deploys");
    fx.core
        .set_guard(Msg::new(EXECUTOR), COUNTER, FixedBytes(INCREMENT), GUARD)
        .expect("guard set");
}

#[test]
fn guard_can_veto_creation() {
    let mut fx = Fixture::new();
    guard_counter(
        &mut fx,
        VetoGuard {
            creation: true,
            ..VetoGuard::default()
        },
    );
    fx.permit(COUNTER, FixedBytes(INCREMENT), fx.strategy);
    let info = fx.next_info(fx.strategy, COUNTER, U256::ZERO, increment());

    assert_eq!(
        fx.try_create(&info),
        Err(CoreError::GuardRejected("creation vetoed".into()))
    );
    assert_eq!(fx.core.action_count(), U256::ZERO);
}

#[test]
fn guard_can_veto_before_execution() {
    let mut fx = Fixture::new();
    guard_counter(
        &mut fx,
        VetoGuard {
            pre: true,
            ..VetoGuard::default()
        },
    );
    let info = fx.create_counter_action();
    fx.pass(&info);

    assert_eq!(
        fx.execute(&info),
        Err(CoreError::GuardRejected("pre-execution vetoed".into()))
    );
    assert!(!fx.executed(&info));
}

#[test]
fn guard_veto_after_execution_undoes_the_call() {
    let mut fx = Fixture::new();
    guard_counter(
        &mut fx,
        VetoGuard {
            post: true,
            ..VetoGuard::default()
        },
    );
    let info = fx.create(fx.strategy, COUNTER, U256::from(3u64), increment());
    fx.pass(&info);
    let events = fx.core.events().len();

    assert_eq!(
        fx.execute_with_value(&info, U256::from(3u64)),
        Err(CoreError::GuardRejected("post-execution vetoed".into()))
    );
    assert!(!fx.executed(&info));
    assert_eq!(fx.core.balance_of(COUNTER), U256::ZERO);
    assert_eq!(fx.core.events().len(), events);
}

#[test]
fn removing_a_guard_lifts_its_veto() {
    let mut fx = Fixture::new();
    guard_counter(
        &mut fx,
        VetoGuard {
            pre: true,
            ..VetoGuard::default()
        },
    );
    let info = fx.create_counter_action();
    fx.pass(&info);
    fx.core
        .set_guard(Msg::new(EXECUTOR), COUNTER, FixedBytes(INCREMENT), Address::ZERO)
        .expect("guard removed");

    fx.execute(&info).expect("executes");
    assert_eq!(fx.core.guard(COUNTER, FixedBytes(INCREMENT)), None);
}

#[test]
fn execution_emits_the_result() {
    let mut fx = Fixture::new();
    let info = fx.create_counter_action();
    fx.pass(&info);
    let result = fx.execute(&info).expect("executes");

    assert_eq!(
        fx.core.events().last(),
        Some(&CoreEvent::ActionExecuted {
            id: info.id,
            caller: OUTSIDER,
            strategy: info.strategy,
            creator: info.creator,
            result,
        })
    );
}

#[test]
fn counter_state_survives_only_successful_calls() {
    let mut fx = Fixture::new();
    let first = fx.create_counter_action();
    let second = fx.create_counter_action();
    fx.approve(&first, 0).expect("approval");
    fx.approve(&first, 1).expect("approval");
    fx.approve(&second, 0).expect("approval");
    fx.approve(&second, 1).expect("approval");
    fx.queue(&first).expect("queued");
    fx.queue(&second).expect("queued");
    fx.warp_by(QUEUING_PERIOD);

    let one = fx.execute(&first).expect("executes");
    let two = fx.execute(&second).expect("executes");
    assert_eq!(U256::abi_decode(&one, true).expect("uint"), U256::from(1u64));
    assert_eq!(U256::abi_decode(&two, true).expect("uint"), U256::from(2u64));
}
