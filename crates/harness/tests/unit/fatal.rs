//! Fail-Fast Tests.
//!
//! Out-of-range access through the infallible accessors is a programming error: it
//! reports the offending call site and halts. Under the test profile the halt is an
//! unwinding panic naming the accessor, which lets these tests observe it and check
//! that nothing was written.

use std::panic::{self, AssertUnwindSafe};

use fpu_harness::bits::{BitOrder, BitVector, REGISTER_COUNT};
use fpu_harness::common::FatalReport;
use pretty_assertions::assert_eq;

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
        .unwrap_or_default()
}

#[test]
#[should_panic(expected = "fail-fast: BitVector::bit")]
fn test_bit_past_capacity_halts() {
    let v = BitVector::new();
    let _ = v.bit(80);
}

#[test]
#[should_panic(expected = "fail-fast: BitVector::set_bit")]
fn test_set_bit_past_capacity_halts() {
    let mut v = BitVector::new();
    v.set_bit(80, true);
}

#[test]
#[should_panic(expected = "fail-fast: BitVector::range")]
fn test_range_wider_than_sixteen_halts() {
    let v = BitVector::new();
    let _ = v.range(0, 17, BitOrder::Forward);
}

#[test]
#[should_panic(expected = "fail-fast: BitVector::set_range")]
fn test_set_range_past_end_halts() {
    let mut v = BitVector::new();
    v.set_range(70, 16, 0, BitOrder::Reversed);
}

#[test]
#[should_panic(expected = "fail-fast: BitVector::set_byte")]
fn test_set_byte_past_last_register_halts() {
    let mut v = BitVector::new();
    v.set_byte(REGISTER_COUNT, 0xFF);
}

#[test]
#[should_panic(expected = "fail-fast: BitVector::grid_span")]
fn test_inverted_grid_span_halts() {
    let v = BitVector::new();
    let _ = v.grid_span(5, 4);
}

#[test]
fn test_failed_write_leaves_vector_untouched() {
    let seed = BitVector::from_bytes([0x5A; REGISTER_COUNT]);
    let mut v = seed;

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        v.set_range(72, 12, 0x0FFF, BitOrder::Forward);
    }));

    assert!(result.is_err());
    assert_eq!(v, seed);
}

#[test]
fn test_panic_message_names_only_the_function() {
    let v = BitVector::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| v.byte(12)));

    let payload = result.unwrap_err();
    assert_eq!(panic_message(payload.as_ref()), "fail-fast: BitVector::byte");
}

#[test]
fn test_report_points_at_caller() {
    let report = FatalReport::new("BitVector::byte", "register index 12 out of range");
    let text = report.to_string();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "BitVector::byte");
    assert!(lines[1].ends_with("fatal.rs"), "file was {}", lines[1]);
    assert_eq!(lines[2], report.line.to_string());
    assert_eq!(lines[3], "register index 12 out of range");
}

#[test]
fn test_report_format() {
    let report = FatalReport::new("demo", "x < 3");
    assert_eq!(report.function, "demo");
    assert_eq!(report.expression, "x < 3");
    assert_eq!(
        report.to_string(),
        format!("demo\n{}\n{}\nx < 3", report.file, report.line)
    );
}
