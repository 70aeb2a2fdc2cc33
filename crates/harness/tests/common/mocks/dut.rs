use fpu_harness::BitVector;
use fpu_harness::sim::Dut;
use mockall::mock;

mock! {
    pub Device {}
    impl Dut for Device {
        fn update(&mut self, inputs: &BitVector, clock_edge: bool);
        fn outputs(&self) -> BitVector;
    }
}

impl MockDevice {
    /// A mock that accepts any input and always presents `outputs`.
    pub fn presenting(outputs: BitVector) -> Self {
        let mut dut = Self::new();
        let _ = dut.expect_update().returning(|_, _| ());
        let _ = dut.expect_outputs().return_const(outputs);
        dut
    }
}

/// A device whose outputs are a fixed pattern and which records the last inputs it saw.
#[derive(Debug, Default)]
pub struct PatternDut {
    pub outputs: BitVector,
    pub inputs: BitVector,
    pub clock_edges: u64,
}

impl PatternDut {
    pub fn new(outputs: BitVector) -> Self {
        Self {
            outputs,
            ..Self::default()
        }
    }
}

impl Dut for PatternDut {
    fn update(&mut self, inputs: &BitVector, clock_edge: bool) {
        self.inputs = *inputs;
        if clock_edge {
            self.clock_edges += 1;
        }
    }

    fn outputs(&self) -> BitVector {
        self.outputs
    }
}
