use fpu_harness::config::HarnessConfig;
use fpu_harness::sequencer::TestSequencer;
use fpu_harness::sim::{ScriptedDut, SimBus};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestContext {
    pub seq: TestSequencer<SimBus<ScriptedDut>, Vec<u8>>,
}

impl TestContext {
    pub fn new(dut: ScriptedDut) -> Self {
        Self::with_config(dut, HarnessConfig::default())
    }

    pub fn with_config(dut: ScriptedDut, config: HarnessConfig) -> Self {
        init_tracing();
        let bus = SimBus::new(config.pins, dut);
        let seq = TestSequencer::with_console(bus, config, Vec::new());
        Self { seq }
    }

    /// The simulated device.
    pub fn dut(&self) -> &ScriptedDut {
        self.seq.bus().dut()
    }

    /// Everything written to the diagnostic stream so far.
    pub fn console(&self) -> String {
        String::from_utf8_lossy(self.seq.console()).into_owned()
    }

    /// `run_test` with exception checking off, debug off and quiet output.
    pub fn run(&mut self, din1: u16, din2: u16, expected: u16, opt: u16, max_cycles: u16) -> bool {
        self.seq
            .run_test(din1, din2, expected, opt, 0, false, 0, max_cycles, "ctx", false)
    }
}
