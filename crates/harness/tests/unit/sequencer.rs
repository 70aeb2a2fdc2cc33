//! Test Sequencer Tests.
//!
//! Runs the full load / clock / judge / release protocol against the scripted device.

use std::io::Write;

use fpu_harness::bits::BitOrder;
use fpu_harness::config::HarnessConfig;
use fpu_harness::sequencer::signals::drive;
use fpu_harness::sequencer::{
    DebugMode, Operation, Outcome, SequencerState, TestVector, load_vectors, load_vectors_file,
};
use fpu_harness::sim::{Request, Response, ScriptedDut};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

use crate::common::harness::TestContext;

fn golden(latency: u16) -> ScriptedDut {
    ScriptedDut::with_responder(Some(latency), |op, a, b| match op {
        Operation::Add => Response::value(a.wrapping_add(b)),
        Operation::Mult => Response::value(a.wrapping_mul(b)),
    })
}

#[test]
fn test_pass_reports_cycles_and_result() {
    let mut ctx = TestContext::new(ScriptedDut::fixed(3, Response::value(0x4000)));
    let vector = TestVector::new("one plus one", Operation::Add, 0x3C00, 0x3C00, 0x4000);

    let outcome = ctx.seq.run_vector(&vector);

    assert_eq!(
        outcome,
        Outcome::Passed {
            cycles: 3,
            result: 0x4000,
            exception: 0
        }
    );
    assert_eq!(ctx.dut().clock_edges(), 3);
    assert_eq!(ctx.seq.state(), SequencerState::Idle);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(32)]
fn test_never_ready_times_out_after_exact_budget(#[case] max_cycles: u16) {
    let mut ctx = TestContext::new(ScriptedDut::never_ready());

    assert!(!ctx.run(0x3C00, 0x3C00, 0x4000, 0, max_cycles));

    assert_eq!(ctx.dut().clock_edges(), u64::from(max_cycles));
    assert_eq!(ctx.seq.stats().timeouts, 1);
    assert_eq!(ctx.seq.stats().clock_pulses, u64::from(max_cycles));
    assert_eq!(ctx.seq.state(), SequencerState::Idle);
}

#[test]
fn test_zero_budget_times_out_without_clocking() {
    let mut ctx = TestContext::new(ScriptedDut::fixed(1, Response::value(0)));
    let vector = TestVector::new("none", Operation::Add, 0, 0, 0).with_max_cycles(0);
    let outcome = ctx.seq.run_vector(&vector);
    assert_eq!(outcome, Outcome::Timeout { cycles: 0 });
    assert_eq!(ctx.dut().clock_edges(), 0);
}

#[test]
fn test_wrong_result_fails_on_first_ready_cycle() {
    let mut ctx = TestContext::new(ScriptedDut::fixed(1, Response::value(0x1234)));
    let vector = TestVector::new("wrong", Operation::Add, 1, 2, 3).with_max_cycles(16);

    let outcome = ctx.seq.run_vector(&vector);

    assert_eq!(
        outcome,
        Outcome::Mismatch {
            cycles: 1,
            expected: 3,
            result: 0x1234,
            expected_exception: None,
            exception: 0
        }
    );
    assert_eq!(ctx.dut().clock_edges(), 1);
    assert_eq!(ctx.seq.stats().result_mismatches, 1);
}

#[rstest]
#[case::unchecked(false, 0b000, true)]
#[case::checked_match(true, 0b100, true)]
#[case::checked_mismatch(true, 0b001, false)]
#[case::code_wider_than_field(true, 0x104, false)]
fn test_exception_check_is_gated(#[case] check_exc: bool, #[case] exc_code: u16, #[case] passes: bool) {
    let mut ctx = TestContext::new(ScriptedDut::fixed(2, Response::with_exception(0x7C00, 0b100)));

    let passed = ctx
        .seq
        .run_test(0x7BFF, 0x7BFF, 0x7C00, 0, 0, check_exc, exc_code, 8, "overflow", false);

    assert_eq!(passed, passes);
    if !passes {
        assert_eq!(ctx.seq.stats().exception_mismatches, 1);
    }
}

#[test]
fn test_golden_model_sees_operands_and_operation() {
    let mut ctx = TestContext::new(golden(4));

    assert!(ctx.run(3, 4, 7, 0, 8));
    assert!(ctx.run(3, 4, 12, 1, 8));
    assert!(!ctx.run(3, 4, 7, 1, 8));

    assert_eq!(
        &ctx.dut().requests()[..2],
        &[
            Request {
                op: Operation::Add,
                din1: 3,
                din2: 4,
                mode: DebugMode::OFF
            },
            Request {
                op: Operation::Mult,
                din1: 3,
                din2: 4,
                mode: DebugMode::OFF
            },
        ]
    );
    assert_eq!(ctx.dut().resets(), 3);
}

#[test]
fn test_opt_uses_only_low_bit() {
    let mut ctx = TestContext::new(golden(1));
    assert!(ctx.run(5, 6, 11, 0b10, 4));
    assert!(ctx.run(5, 6, 30, 0b11, 4));
}

#[test]
fn test_reversed_field_order_round_trips() {
    let mut config = HarnessConfig::default();
    config.order.din1 = BitOrder::Reversed;
    config.order.dout = BitOrder::Reversed;
    let dut = golden(2).field_order(config.order);
    let mut ctx = TestContext::with_config(dut, config);

    assert!(ctx.run(0x0001, 0x0100, 0x0101, 0, 4));
    assert_eq!(ctx.seq.driven().range(drive::DIN1, drive::DIN_WIDTH, BitOrder::Reversed), 0x0001);
    assert!(ctx.seq.driven().bit(drive::DIN1 + 15));
    assert!(!ctx.seq.driven().bit(drive::DIN1));
}

#[test]
fn test_release_drops_chip_select() {
    let mut ctx = TestContext::new(ScriptedDut::fixed(2, Response::value(9)));
    assert!(ctx.run(4, 5, 9, 0, 4));

    let presented = ctx.seq.bus().presented();
    assert!(!presented.bit(drive::CS));
    assert!(!presented.bit(drive::DOA));
    assert!(!presented.bit(drive::CLK));
    assert!(presented.bit(drive::RST_N));
    assert_eq!(ctx.seq.state(), SequencerState::Idle);
}

#[test]
fn test_clock_divider_follows_config() {
    let mut config = HarnessConfig::default();
    config.general.clock_divider = true;
    let mut ctx = TestContext::with_config(ScriptedDut::fixed(1, Response::value(0)), config);
    assert!(ctx.run(0, 0, 0, 0, 2));
    assert!(ctx.seq.driven().bit(drive::DIV));
}

#[test]
fn test_debug_mode_reaches_dut_and_console() {
    let mut ctx = TestContext::new(ScriptedDut::fixed(3, Response::value(1)));
    let vector = TestVector::new("debug", Operation::Add, 0, 1, 1)
        .with_debug_mode(DebugMode::ADDER)
        .verbose(true);

    assert!(ctx.seq.run_vector(&vector).is_pass());

    assert_eq!(ctx.dut().requests()[0].mode, DebugMode::ADDER);
    let console = ctx.console();
    assert!(console.contains("DEBUG="), "{console}");
    assert!(console.contains("cycle    3:"), "{console}");
}

#[test]
fn test_quiet_run_prints_only_verdict() {
    let mut ctx = TestContext::new(ScriptedDut::fixed(2, Response::value(7)));
    let vector = TestVector::new("quiet", Operation::Mult, 7, 1, 7);

    let _ = ctx.seq.run_vector(&vector);

    assert_eq!(
        ctx.console(),
        "quiet: PASS after 2 cycles (result 0x0007, exc 0b000)\n"
    );
}

#[test]
fn test_verbose_timeout_dumps_state() {
    let mut ctx = TestContext::new(ScriptedDut::never_ready());

    let passed = ctx
        .seq
        .run_test(1, 2, 3, 0, 0, false, 0, 2, "stuck", true);

    assert!(!passed);
    let console = ctx.console();
    assert!(console.contains("=== stuck: add 0x0001, 0x0002 (expect 0x0003) ==="));
    assert!(console.contains("cycle    1: DACK=1 DR=0"));
    assert!(console.contains("DUT inputs:"));
    assert!(console.contains("DUT outputs:"));
    assert!(console.ends_with("stuck: FAIL: no data-ready after 2 cycles\n"));
}

#[test]
fn test_print_dut_inputs_renders_grid() {
    let mut ctx = TestContext::new(ScriptedDut::fixed(1, Response::value(0)));
    assert!(ctx.run(0x00FF, 0, 0, 0, 1));
    let before = ctx.console().len();

    ctx.seq.print_dut_inputs().expect("write to Vec");

    let console = ctx.console();
    let dump = &console[before..];
    assert!(dump.starts_with("DUT inputs:\n   7 6 5 4 3 2 1 0\n0  1 1 1 1 1 1 1 1 \n"));
    assert_eq!(dump.lines().count(), 12);
}

#[rstest]
#[case::no_backlog(0, 4)]
#[case::adder_busy(5, 8)]
#[case::long_backlog(12, 15)]
fn test_parallel_request_completes_in_expected_cycles(#[case] busy_for: u16, #[case] needed: u16) {
    let mut ctx = TestContext::new(ScriptedDut::never_ready().busy_for(busy_for));
    assert!(ctx.seq.parallel_req_test(0x3C00, 0x4000, needed, "parallel", false));
    assert_eq!(ctx.dut().clock_edges(), u64::from(needed));

    let ops: Vec<Operation> = ctx.dut().requests().iter().map(|r| r.op).collect();
    assert_eq!(ops, vec![Operation::Add, Operation::Mult]);
    assert_eq!(ctx.seq.stats().handshake_passed, 1);
    assert_eq!(ctx.seq.state(), SequencerState::Idle);
}

#[rstest]
#[case(0, 3)]
#[case(5, 7)]
fn test_parallel_request_fails_one_cycle_short(#[case] busy_for: u16, #[case] budget: u16) {
    let mut ctx = TestContext::new(ScriptedDut::never_ready().busy_for(busy_for));
    assert!(!ctx.seq.parallel_req_test(0, 0, budget, "short", false));
    assert_eq!(ctx.dut().clock_edges(), u64::from(budget));
    assert_eq!(ctx.seq.stats().handshake_runs, 1);
    assert_eq!(ctx.seq.stats().handshake_passed, 0);
    assert!(ctx.console().starts_with("short: FAIL: handshake stalled in"));
}

#[test]
fn test_parallel_request_honours_slow_acknowledge() {
    let mut ctx = TestContext::new(ScriptedDut::never_ready().ack_after(3));
    assert!(ctx.seq.parallel_req_test(0, 0, 8, "slow ack", false));
    assert_eq!(ctx.console(), "slow ack: PASS after 8 cycles\n");
}

#[test]
fn test_run_vectors_collects_outcomes_and_stats() {
    let json = r#"[
        { "name": "add", "din1": 2, "din2": 3, "expected": 5 },
        { "name": "mul", "din1": 2, "din2": 3, "expected": 6, "op": "mult" },
        { "name": "bad", "din1": 2, "din2": 3, "expected": 7, "op": "mul", "max_cycles": 3 }
    ]"#;
    let vectors = load_vectors(json).expect("valid vectors");
    let mut ctx = TestContext::new(golden(2));

    let outcomes = ctx.seq.run_vectors(&vectors);

    let passes: Vec<bool> = outcomes.iter().map(Outcome::is_pass).collect();
    assert_eq!(passes, vec![true, true, false]);
    let stats = ctx.seq.stats();
    assert_eq!(stats.tests_run, 3);
    assert_eq!(stats.passed, 2);
    assert_eq!(stats.result_mismatches, 1);
    assert_eq!(stats.clock_pulses, 6);
    assert!(!stats.all_passed());
}

#[test]
fn test_load_vectors_defaults_and_file() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"[{{ "name": "inf * 0", "din1": 31744, "din2": 0, "expected": 32256,
             "op": "mult", "expected_exception": 1, "max_cycles": 48, "debug_mode": 5 }},
            {{ "name": "plain", "din1": 1, "din2": 1, "expected": 2 }}]"#
    )
    .expect("write vectors");

    let vectors = load_vectors_file(file.path()).expect("valid file");

    assert_eq!(
        vectors[0],
        TestVector::new("inf * 0", Operation::Mult, 31744, 0, 32256)
            .with_exception(1)
            .with_max_cycles(48)
            .with_debug_mode(DebugMode::MULT)
    );
    assert_eq!(vectors[1], TestVector::new("plain", Operation::Add, 1, 1, 2));
}

#[test]
fn test_load_vectors_rejects_bad_input() {
    assert!(load_vectors(r#"[{ "name": "x" }]"#).is_err());
    assert!(load_vectors_file("/nonexistent/vectors.json").is_err());
}

#[test]
fn test_outcome_display() {
    let mismatch = Outcome::Mismatch {
        cycles: 4,
        expected: 0x4000,
        result: 0x4000,
        expected_exception: Some(0b001),
        exception: 0b000,
    };
    assert!(mismatch.is_exception_mismatch());
    assert_eq!(
        mismatch.to_string(),
        "FAIL after 4 cycles: expected 0x4000, got 0x4000; expected exc 0b001, got 0b000"
    );
    assert_eq!(mismatch.cycles(), 4);
}
