#![no_std]
#![no_main]

// transport layer for defmt logs
use defmt_rtt as _;
// panicking behavior
use bmp180_station as _;
use panic_probe as _;

#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

/// External crystal on the Pico
const XTAL_FREQ_HZ: u32 = 12_000_000;

#[defmt_test::tests]
mod tests {
    use bmp180_station::altitude::altitude;
    use bmp180_station::{Bmp180, OversamplingMode};

    use defmt::{assert, info};
    use embedded_hal::delay::DelayNs;
    use fugit::RateExtU32;
    use hal::{clocks, gpio, pac, Clock};
    use rp2040_hal as hal;

    type I2CPin<P> = gpio::Pin<P, gpio::FunctionI2C, gpio::PullUp>;
    type I2C = hal::I2C<pac::I2C0, (I2CPin<gpio::bank0::Gpio16>, I2CPin<gpio::bank0::Gpio17>)>;

    struct State {
        i2c: I2C,
        delay: hal::Timer,
    }

    #[init]
    fn setup() -> State {
        let mut perips = pac::Peripherals::take().unwrap();
        let mut watchdog = hal::Watchdog::new(perips.WATCHDOG);
        let clocks = clocks::init_clocks_and_plls(
            super::XTAL_FREQ_HZ,
            perips.XOSC,
            perips.CLOCKS,
            perips.PLL_SYS,
            perips.PLL_USB,
            &mut perips.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();
        info!("System clock at {}Hz", clocks.system_clock.freq().to_Hz());

        let sio = hal::Sio::new(perips.SIO);
        let pins = gpio::Pins::new(
            perips.IO_BANK0,
            perips.PADS_BANK0,
            sio.gpio_bank0,
            &mut perips.RESETS,
        );

        let mut delay = hal::Timer::new(perips.TIMER, &mut perips.RESETS, &clocks);
        delay.delay_ms(100);

        State {
            i2c: hal::I2C::i2c0(
                perips.I2C0,
                pins.gpio16.reconfigure(),
                pins.gpio17.reconfigure(),
                400.kHz(),
                &mut perips.RESETS,
                &clocks.system_clock,
            ),
            delay,
        }
    }

    #[test]
    fn make_new(state: &mut State) {
        Bmp180::new(&mut state.i2c, OversamplingMode::UltraLowPower).unwrap();
    }

    #[test]
    fn chip_id(state: &mut State) {
        let mut baro = Bmp180::new(&mut state.i2c, OversamplingMode::UltraLowPower).unwrap();
        assert!(baro.chip_id().unwrap() == 0x55);
    }

    #[test]
    fn read_temperature(state: &mut State) {
        let mut baro = Bmp180::new(&mut state.i2c, OversamplingMode::Standard).unwrap();
        let raw = baro.read_raw_temperature(&mut state.delay).unwrap();
        info!("Raw temperature: {}", raw);
        assert!(raw != 0 && raw != u16::MAX);
    }

    #[test]
    fn read_pressure(state: &mut State) {
        let mut baro =
            Bmp180::new(&mut state.i2c, OversamplingMode::UltraHighResolution).unwrap();
        let (temperature, pressure) = baro.measure(&mut state.delay).unwrap();
        info!("Reading: {} {}", temperature, pressure);

        // Anywhere a person could carry the board
        assert!(pressure.0 > 30_000 && pressure.0 < 110_000);
        info!("Altitude: {}", altitude(pressure));
    }

    #[test]
    fn reset(state: &mut State) {
        let mut baro = Bmp180::new(&mut state.i2c, OversamplingMode::UltraLowPower).unwrap();
        baro.reset().unwrap();
        state.delay.delay_ms(10);
        assert!(baro.chip_id().unwrap() == 0x55);
    }
}
