//! Fail-fast diagnostics.
//!
//! An out-of-range access means the harness built a malformed vector, so there is no
//! sensible way to continue exercising hardware. The report carries the originating
//! function, the caller's source location and the failing expression, one item per line.
//!
//! The full report is written once, to stderr, and flushed before the harness panics. A
//! structured `tracing` event records the same fields for subscribers; the panic message
//! names only the function. Release builds set `panic = "abort"`, so the panic halts the
//! process.

use std::fmt;
use std::io::{self, Write};
use std::panic::Location;

/// Diagnostic emitted on the fail-fast path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FatalReport {
    /// Function that detected the violation.
    pub function: &'static str,
    /// Source file of the offending call site.
    pub file: &'static str,
    /// Source line of the offending call site.
    pub line: u32,
    /// Description of the failed check.
    pub expression: String,
}

impl FatalReport {
    /// Builds a report for the caller's location.
    #[track_caller]
    pub fn new(function: &'static str, expression: impl fmt::Display) -> Self {
        let location = Location::caller();
        Self {
            function,
            file: location.file(),
            line: location.line(),
            expression: expression.to_string(),
        }
    }
}

impl fmt::Display for FatalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.function)?;
        writeln!(f, "{}", self.file)?;
        writeln!(f, "{}", self.line)?;
        write!(f, "{}", self.expression)
    }
}

/// Emits the diagnostic report for a failed check and halts.
///
/// Location information is taken from the first caller not marked `#[track_caller]`, so
/// the report points at the code that passed the bad index rather than at the accessor.
#[cold]
#[track_caller]
pub fn fail_fast(function: &'static str, expression: impl fmt::Display) -> ! {
    let report = FatalReport::new(function, expression);
    tracing::error!(
        function = report.function,
        file = report.file,
        line = report.line,
        "assertion failed: {}",
        report.expression
    );

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{report}");
    let _ = stderr.flush();
    drop(stderr);

    panic!("fail-fast: {}", report.function);
}
