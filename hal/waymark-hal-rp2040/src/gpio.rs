//! GPIO outputs

use embassy_rp::gpio::Output;
use waymark_hal::OutputPin;

/// Active-high indicator LED
pub struct StatusLed<'d> {
    pin: Output<'d>,
}

impl<'d> StatusLed<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for StatusLed<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
