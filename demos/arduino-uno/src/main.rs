#![no_std]
#![no_main]

use max7219_sevenseg::MAX7219;
use panic_halt as _;

const NUM_DIGITS: u8 = 8;

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);

    let data = pins.d11.into_output();
    let cs = pins.d10.into_output();
    let sck = pins.d13.into_output();

    let mut display: MAX7219<_, NUM_DIGITS> = MAX7219::from_pins(data, cs, sck);
    display.default_init().unwrap();

    let mut delay = arduino_hal::Delay::new();
    loop {
        display.sweep_string("HELLO", &mut delay).unwrap();
    }
}
