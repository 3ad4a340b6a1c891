//! End-to-end request lifecycle: creation, reporting, quorum, resolution,
//! and expiry.

mod common;

use common::*;
use sibyl_oracle::events::{
    ATTR_KEY_GAS_USED, ATTR_KEY_ID, ATTR_KEY_RESOLVE_STATUS, ATTR_KEY_RESULT,
    EVENT_TYPE_DEACTIVATE, EVENT_TYPE_RAW_REQUEST, EVENT_TYPE_REQUEST, EVENT_TYPE_RESOLVE,
};
use sibyl_oracle::script::{EXECUTE_BASE_GAS, REPORT_READ_GAS};
use sibyl_oracle::{Error, Msg, RawReport, RequestId, ResolveStatus};
use std::collections::BTreeSet;

#[test]
fn test_request_creation_stores_request_and_raw_requests() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let (outcome, events) = app.handle(&request_msg(3, 2));
    assert!(outcome.is_ok());

    let request = app.with_ctx(|keeper, ctx| keeper.get_request(ctx, RequestId(1)).unwrap());
    assert_eq!(request.ask_count(), 3);
    assert_eq!(request.min_count, 2);
    assert_eq!(request.request_height, 4);
    assert_eq!(request.request_time, GENESIS_TIME);
    assert_eq!(request.client_id, "app_test");
    assert_eq!(request.calldata, b"calldata");

    let unique: BTreeSet<_> = request.requested_validators.iter().collect();
    assert_eq!(unique.len(), 3);
    for validator in &request.requested_validators {
        assert!([val(1), val(2), val(3)].contains(validator));
    }

    assert_eq!(request.raw_requests.len(), 3);
    for (i, raw) in request.raw_requests.iter().enumerate() {
        assert_eq!(u64::from(raw.external_id), i as u64 + 1);
        assert_eq!(u64::from(raw.data_source_id), i as u64 + 1);
        assert_eq!(raw.calldata, b"calldata");
    }

    assert_eq!(events_of(&events, EVENT_TYPE_REQUEST).len(), 1);
    assert_eq!(events_of(&events, EVENT_TYPE_RAW_REQUEST).len(), 3);
}

#[test]
fn test_success_flow_resolves_at_quorum() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let id = app.create_request(3, 2);
    assert!(app.end_block().is_empty());

    let committee = app.committee(id);

    // First report: quorum not yet met, nothing pending, no result.
    app.set_block(6, GENESIS_TIME);
    let (outcome, _) = app.handle(&report_msg(id, committee[0]));
    assert!(outcome.is_ok());
    app.with_ctx(|keeper, ctx| {
        assert!(keeper.pending_resolve_list(ctx).is_empty());
        assert!(keeper.get_result(ctx, id).is_err());
    });
    assert!(app.end_block().is_empty());

    // Second report meets the quorum and queues the request.
    app.set_block(8, GENESIS_TIME + 5);
    let (outcome, _) = app.handle(&report_msg(id, committee[1]));
    assert!(outcome.is_ok());
    app.with_ctx(|keeper, ctx| {
        assert_eq!(keeper.pending_resolve_list(ctx), vec![id]);
        assert!(keeper.get_result(ctx, id).is_err());
    });

    let events = app.end_block();
    let resolves = events_of(&events, EVENT_TYPE_RESOLVE);
    assert_eq!(resolves.len(), 1);
    assert_eq!(resolves[0].attribute(ATTR_KEY_ID), Some("1"));
    assert_eq!(resolves[0].attribute(ATTR_KEY_RESOLVE_STATUS), Some("1"));
    assert_eq!(
        resolves[0].attribute(ATTR_KEY_RESULT),
        Some(hex::encode(b"answer1").as_str())
    );
    let expected_gas = EXECUTE_BASE_GAS + 2 * REPORT_READ_GAS;
    assert_eq!(
        resolves[0].attribute(ATTR_KEY_GAS_USED),
        Some(expected_gas.to_string().as_str())
    );

    app.with_ctx(|keeper, ctx| {
        assert!(keeper.pending_resolve_list(ctx).is_empty());
        let result = keeper.get_result(ctx, id).unwrap();
        assert_eq!(result.resolve_status, ResolveStatus::Success);
        assert_eq!(result.result, b"answer1");
        assert_eq!(result.ans_count, 2);
        assert_eq!(result.ask_count, 3);
        assert_eq!(result.min_count, 2);
        assert_eq!(result.resolve_height, 8);
        assert_eq!(result.resolve_time, GENESIS_TIME + 5);
        assert_eq!(result.gas_used, expected_gas);
        // The request record itself survives resolution.
        assert!(keeper.get_request(ctx, id).is_ok());
    });
}

#[test]
fn test_report_after_resolution_rejected() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let id = app.create_request(3, 2);
    let committee = app.committee(id);
    app.handle(&report_msg(id, committee[0])).0.unwrap();
    app.handle(&report_msg(id, committee[1])).0.unwrap();
    app.end_block();

    let (outcome, _) = app.handle(&report_msg(id, committee[2]));
    assert!(matches!(outcome, Err(Error::RequestAlreadyResolved(rid)) if rid == id));
}

#[test]
fn test_quorum_enqueues_exactly_once() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let id = app.create_request(3, 2);
    let committee = app.committee(id);

    app.handle(&report_msg(id, committee[0])).0.unwrap();
    app.handle(&report_msg(id, committee[1])).0.unwrap();
    app.handle(&report_msg(id, committee[2])).0.unwrap();

    app.with_ctx(|keeper, ctx| {
        assert_eq!(keeper.pending_resolve_list(ctx), vec![id]);
        assert_eq!(keeper.report_count(ctx, id), 3);
    });
}

#[test]
fn test_report_resubmission_overwrites_without_recount() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let id = app.create_request(3, 2);
    let committee = app.committee(id);

    app.handle(&report_msg(id, committee[0])).0.unwrap();
    let resubmission = Msg::ReportData {
        request_id: id,
        raw_reports: vec![
            RawReport::new(1u64.into(), 0, b"revised1".to_vec()),
            RawReport::new(2u64.into(), 0, b"revised2".to_vec()),
            RawReport::new(3u64.into(), 0, b"revised3".to_vec()),
        ],
        validator: committee[0],
    };
    app.handle(&resubmission).0.unwrap();

    app.with_ctx(|keeper, ctx| {
        // Still one counted report, still below quorum, nothing queued.
        assert_eq!(keeper.report_count(ctx, id), 1);
        assert!(keeper.pending_resolve_list(ctx).is_empty());
        let reports = keeper.get_reports(ctx, id).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].raw_reports[0].data, b"revised1");
    });
}

#[test]
fn test_report_validation_errors() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let id = app.create_request(3, 2);
    let committee = app.committee(id);

    let (unknown, _) = app.handle(&report_msg(RequestId(42), committee[0]));
    assert!(matches!(unknown, Err(Error::UnknownRequest(RequestId(42)))));

    let (unauthorized, _) = app.handle(&report_msg(id, val(9)));
    assert!(matches!(
        unauthorized,
        Err(Error::UnauthorizedReporter { .. })
    ));

    let mismatched = Msg::ReportData {
        request_id: id,
        raw_reports: vec![RawReport::new(1u64.into(), 0, b"only-one".to_vec())],
        validator: committee[0],
    };
    let (invalid, _) = app.handle(&mismatched);
    assert!(matches!(invalid, Err(Error::InvalidReport(_))));

    app.with_ctx(|keeper, ctx| assert_eq!(keeper.report_count(ctx, id), 0));
}

#[test]
fn test_invalid_counts_rejected_without_state_change() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);

    let (zero_min, _) = app.handle(&request_msg(3, 0));
    assert!(matches!(zero_min, Err(Error::InvalidCount { .. })));

    let (min_over_ask, _) = app.handle(&request_msg(2, 3));
    assert!(matches!(min_over_ask, Err(Error::InvalidCount { .. })));

    let (over_max, _) = app.handle(&request_msg(17, 1));
    assert!(matches!(over_max, Err(Error::InvalidAskCount { .. })));

    app.with_ctx(|keeper, ctx| assert_eq!(keeper.request_count(ctx), 0));
}

#[test]
fn test_insufficient_active_validators() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let (outcome, _) = app.handle(&request_msg(4, 1));
    assert!(matches!(
        outcome,
        Err(Error::InsufficientValidators {
            available: 3,
            requested: 4
        })
    ));
}

#[test]
fn test_script_failure_resolves_as_failure() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let (outcome, _) = app.handle(&request_msg_with_calldata(3, 2, b"fail"));
    let id = match outcome.unwrap() {
        sibyl_oracle::MsgResponse::RequestData { request_id } => request_id,
        other => panic!("unexpected response: {other:?}"),
    };
    let committee = app.committee(id);

    // Reports must match the sub-requests prepared with the `fail` calldata.
    for validator in &committee[..2] {
        app.handle(&report_msg(id, *validator)).0.unwrap();
    }
    let events = app.end_block();

    let resolves = events_of(&events, EVENT_TYPE_RESOLVE);
    assert_eq!(resolves.len(), 1);
    assert_eq!(resolves[0].attribute(ATTR_KEY_RESOLVE_STATUS), Some("2"));

    app.with_ctx(|keeper, ctx| {
        let result = keeper.get_result(ctx, id).unwrap();
        assert_eq!(result.resolve_status, ResolveStatus::Failure);
        assert!(result.result.is_empty());
    });
}

#[test]
fn test_expired_request_without_reports() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let id = app.create_request(3, 2);
    assert!(app.end_block().is_empty());

    // Height 105 is the first block past the 100-block deadline.
    app.set_block(105, GENESIS_TIME + 60);
    let events = app.end_block();

    let resolves = events_of(&events, EVENT_TYPE_RESOLVE);
    assert_eq!(resolves.len(), 1);
    assert_eq!(resolves[0].attribute(ATTR_KEY_ID), Some("1"));
    assert_eq!(resolves[0].attribute(ATTR_KEY_RESOLVE_STATUS), Some("3"));
    assert_eq!(events_of(&events, EVENT_TYPE_DEACTIVATE).len(), 3);

    app.with_ctx(|keeper, ctx| {
        let result = keeper.get_result(ctx, id).unwrap();
        assert_eq!(result.resolve_status, ResolveStatus::Expired);
        assert!(result.result.is_empty());
        assert_eq!(result.ans_count, 0);
        for n in 1..=3u8 {
            assert!(!keeper.validator_status(ctx, &val(n)).is_active);
        }
        assert_eq!(keeper.last_expired_request(ctx), 1);
    });
}

#[test]
fn test_partial_reports_still_expire() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let id = app.create_request(3, 2);
    let committee = app.committee(id);
    app.handle(&report_msg(id, committee[0])).0.unwrap();

    app.set_block(105, GENESIS_TIME + 60);
    let events = app.end_block();

    // Only the two silent committee members are deactivated.
    let deactivated: BTreeSet<String> = events_of(&events, EVENT_TYPE_DEACTIVATE)
        .iter()
        .filter_map(|e| e.attribute("validator").map(str::to_string))
        .collect();
    assert_eq!(deactivated.len(), 2);
    assert!(!deactivated.contains(&committee[0].to_string()));

    app.with_ctx(|keeper, ctx| {
        let result = keeper.get_result(ctx, id).unwrap();
        assert_eq!(result.resolve_status, ResolveStatus::Expired);
        assert_eq!(result.ans_count, 1);
        assert!(keeper.validator_status(ctx, &committee[0]).is_active);
        assert!(!keeper.validator_status(ctx, &committee[1]).is_active);
        assert!(!keeper.validator_status(ctx, &committee[2]).is_active);
    });
}

#[test]
fn test_quorum_in_final_block_beats_expiry() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let id = app.create_request(3, 2);
    let committee = app.committee(id);

    // Both reports land in the first block past the deadline; the resolve
    // pass runs before the expiry scan, so the request still succeeds.
    app.set_block(105, GENESIS_TIME + 60);
    app.handle(&report_msg(id, committee[0])).0.unwrap();
    app.handle(&report_msg(id, committee[1])).0.unwrap();
    let events = app.end_block();

    let resolves = events_of(&events, EVENT_TYPE_RESOLVE);
    assert_eq!(resolves.len(), 1);
    assert_eq!(resolves[0].attribute(ATTR_KEY_RESOLVE_STATUS), Some("1"));

    app.with_ctx(|keeper, ctx| {
        let result = keeper.get_result(ctx, id).unwrap();
        assert_eq!(result.resolve_status, ResolveStatus::Success);
    });
}

#[test]
fn test_committee_selection_is_deterministic() {
    let mut first = TestApp::new();
    let mut second = TestApp::new();
    for app in [&mut first, &mut second] {
        app.set_block(4, GENESIS_TIME);
    }
    let id_a = first.create_request(3, 2);
    let id_b = second.create_request(3, 2);
    assert_eq!(first.committee(id_a), second.committee(id_b));
}

#[test]
fn test_rolling_seed_changes_selection_input() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let before = app.with_ctx(|keeper, ctx| keeper.rolling_seed(ctx));
    app.with_ctx(|keeper, ctx| keeper.begin_block(ctx, &sibyl_core::Hash::from([7u8; 32])));
    let after = app.with_ctx(|keeper, ctx| keeper.rolling_seed(ctx));
    assert_ne!(before, after);
}

#[test]
fn test_pending_request_ids_tracks_open_obligations() {
    let mut app = TestApp::new();
    app.set_block(4, GENESIS_TIME);
    let id = app.create_request(3, 3);
    let committee = app.committee(id);

    app.with_ctx(|keeper, ctx| {
        assert_eq!(keeper.pending_request_ids(ctx, &committee[0]), vec![id]);
    });
    app.handle(&report_msg(id, committee[0])).0.unwrap();
    app.with_ctx(|keeper, ctx| {
        assert!(keeper.pending_request_ids(ctx, &committee[0]).is_empty());
        assert_eq!(keeper.pending_request_ids(ctx, &committee[1]), vec![id]);
    });
}
