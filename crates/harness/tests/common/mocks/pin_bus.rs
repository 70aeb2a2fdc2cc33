use fpu_harness::chain::PinBus;
use fpu_harness::common::{Level, Pin, PinMode};
use mockall::mock;

mock! {
    pub Bus {}
    impl PinBus for Bus {
        fn set_mode(&mut self, pin: Pin, mode: PinMode);
        fn write(&mut self, pin: Pin, level: Level);
        fn read(&mut self, pin: Pin) -> Level;
        fn pulse(&mut self, pin: Pin, first: Level);
    }
}
