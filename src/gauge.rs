use embedded_hal::i2c::I2c;
use log::{debug, trace, warn};

use crate::capacity;
use crate::conversion::{self, Reading, VoltageUnit};
use crate::error::Error;
use crate::gauge_state::GaugeState;
use crate::raw_sample::{command_frame, ByteOrder, Channel, RawSample};
use crate::registers::{I2C_ADDR, SETUP};

pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Hardware configuration of one PB04 module. Fixed for the driver's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 7-bit I2C address
    pub address: u8,
    /// Byte order of the 2-byte sample read
    pub byte_order: ByteOrder,
    /// Setup byte sent ahead of every channel selector
    pub setup_byte: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: I2C_ADDR,
            byte_order: ByteOrder::LittleEndian,
            setup_byte: SETUP,
        }
    }
}

/// Blocking driver for the PB04 fuel gauge.
///
/// The driver owns its bus, so every transaction goes through `&mut self` and
/// two reads can never interleave. To share a bus with other devices, hand in
/// a shared-bus wrapper such as `embedded_hal_bus::i2c::RefCellDevice`.
pub struct Pb04<I2C> {
    i2c: I2C,
    config: Config,
}

impl<I2C: I2c> Pb04<I2C> {
    /// Create a driver with the default address and byte order.
    pub fn new(i2c: I2C) -> Self {
        Self::with_config(i2c, Config::default())
    }

    pub fn with_config(i2c: I2C, config: Config) -> Self {
        Self { i2c, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the driver and return the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Select `channel` and read one raw sample.
    ///
    /// This is a plain write followed by a separate 2-byte read, without a
    /// repeated start. A bus failure on the write means the read is not attempted.
    pub fn read_raw(&mut self, channel: Channel) -> Result<RawSample, I2C::Error> {
        let frame = command_frame(self.config.setup_byte, channel.selector());
        debug!("PB04: TX: {}", hex::encode(frame));

        self.i2c.write(self.config.address, &frame).map_err(|e| {
            warn!("PB04: write to {:#04x} failed: {e:?}", self.config.address);
            Error::Bus(e)
        })?;

        let mut buf = [0u8; 2];
        self.i2c.read(self.config.address, &mut buf).map_err(|e| {
            warn!("PB04: read from {:#04x} failed: {e:?}", self.config.address);
            Error::Bus(e)
        })?;

        let raw = self.config.byte_order.decode(buf);
        trace!("PB04: RX {channel:?}: {raw:#06x}");
        Ok(raw)
    }

    pub fn read_voltage(&mut self, unit: VoltageUnit) -> Result<Reading, I2C::Error> {
        let raw = self.read_raw(Channel::Voltage)?;
        Ok(conversion::to_voltage(raw, unit))
    }

    pub fn read_current(&mut self) -> Result<Reading, I2C::Error> {
        let raw = self.read_raw(Channel::Current)?;
        Ok(conversion::to_current(raw))
    }

    /// Battery voltage in the requested unit.
    pub fn get_voltage(&mut self, unit: VoltageUnit) -> Result<f64, I2C::Error> {
        Ok(self.read_voltage(unit)?.value)
    }

    /// Battery current in mA.
    pub fn get_current(&mut self) -> Result<f64, I2C::Error> {
        Ok(self.read_current()?.value)
    }

    /// Estimated remaining capacity in %.
    ///
    /// Voltage and current are read back to back, so the load is assumed
    /// steady across the two bus round trips. A result of 1 means critically
    /// low, 0 means no estimate could be made.
    pub fn get_capacity_percent(&mut self) -> Result<u8, I2C::Error> {
        let volts = self.get_voltage(VoltageUnit::Volts)?;
        let milliamps = self.get_current()?;
        Ok(capacity::estimate(volts, milliamps))
    }

    /// Read voltage and current once and derive the capacity from those two samples.
    pub fn fetch_state(&mut self) -> Result<GaugeState, I2C::Error> {
        let voltage_mv = self.get_voltage(VoltageUnit::Millivolts)?;
        let current_ma = self.get_current()?;
        let capacity_pct = capacity::estimate(voltage_mv / 1000.0, current_ma);

        let state = GaugeState {
            voltage_mv,
            current_ma,
            capacity_pct,
        };
        debug!("PB04: {state:?}");

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::Unit;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x36;

    fn select(selector: u8) -> I2cTransaction {
        I2cTransaction::write(ADDR, vec![0xD2, selector])
    }

    fn sample(bytes: [u8; 2]) -> I2cTransaction {
        I2cTransaction::read(ADDR, bytes.to_vec())
    }

    #[test]
    fn test_read_raw_voltage_little_endian() {
        let expectations = [select(0x21), sample([0x90, 0xFE])];
        let mut i2c = I2cMock::new(&expectations);

        let mut gauge = Pb04::new(i2c.clone());
        assert_eq!(gauge.read_raw(Channel::Voltage), Ok(0xFE90));

        i2c.done();
    }

    #[test]
    fn test_read_raw_current_big_endian() {
        let expectations = [select(0x23), sample([0xFC, 0x33])];
        let mut i2c = I2cMock::new(&expectations);

        let config = Config {
            byte_order: ByteOrder::BigEndian,
            ..Config::default()
        };
        let mut gauge = Pb04::with_config(i2c.clone(), config);
        assert_eq!(gauge.read_raw(Channel::Current), Ok(0xFC33));

        i2c.done();
    }

    #[test]
    fn test_custom_address_and_setup_byte() {
        let expectations = [
            I2cTransaction::write(0x37, vec![0x80, 0x21]),
            I2cTransaction::read(0x37, vec![0x00, 0xFC]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let config = Config {
            address: 0x37,
            setup_byte: 0x80,
            ..Config::default()
        };
        let mut gauge = Pb04::with_config(i2c.clone(), config);
        assert_eq!(gauge.config(), &config);
        assert_eq!(gauge.read_raw(Channel::Voltage), Ok(0xFC00));

        i2c.done();
    }

    #[test]
    fn test_write_failure_skips_read() {
        let expectations = [select(0x21).with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);

        let mut gauge = Pb04::new(i2c.clone());
        assert_eq!(gauge.read_raw(Channel::Voltage), Err(Error::Bus(ErrorKind::Other)));

        i2c.done();
    }

    #[test]
    fn test_read_failure_is_surfaced() {
        let expectations = [
            select(0x23),
            sample([0x00, 0x00]).with_error(ErrorKind::ArbitrationLoss),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut gauge = Pb04::new(i2c.clone());
        assert_eq!(gauge.get_current(), Err(Error::Bus(ErrorKind::ArbitrationLoss)));

        i2c.done();
    }

    #[test]
    fn test_get_voltage_units() {
        let expectations = [
            select(0x21),
            sample([0x90, 0xFE]),
            select(0x21),
            sample([0x90, 0xFE]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut gauge = Pb04::new(i2c.clone());
        let volts = gauge.get_voltage(VoltageUnit::Volts).unwrap();
        assert!((volts - 2.624).abs() < 1e-12);
        let reading = gauge.read_voltage(VoltageUnit::Millivolts).unwrap();
        assert_eq!(reading, Reading { value: 2624.0, unit: Unit::Millivolts });

        i2c.done();
    }

    #[test]
    fn test_get_current() {
        let expectations = [select(0x23), sample([0x33, 0xFC])];
        let mut i2c = I2cMock::new(&expectations);

        let mut gauge = Pb04::new(i2c.clone());
        assert_eq!(gauge.get_current(), Ok(50.0));

        i2c.done();
    }

    #[test]
    fn test_capacity_reads_voltage_then_current() {
        // 2.624 V at 50 mA: light-load table, above 2.55 V
        let expectations = [
            select(0x21),
            sample([0x90, 0xFE]),
            select(0x23),
            sample([0x33, 0xFC]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut gauge = Pb04::new(i2c.clone());
        assert_eq!(gauge.get_capacity_percent(), Ok(60));

        i2c.done();
    }

    #[test]
    fn test_capacity_full_under_heavy_load() {
        // 3.2 V (code 800) at 700 mA (code 700)
        let expectations = [
            select(0x21),
            sample([0x20, 0xFF]),
            select(0x23),
            sample([0xBD, 0xFE]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut gauge = Pb04::new(i2c.clone());
        assert_eq!(gauge.get_capacity_percent(), Ok(100));

        i2c.done();
    }

    #[test]
    fn test_capacity_stops_on_current_failure() {
        let expectations = [
            select(0x21),
            sample([0x90, 0xFE]),
            select(0x23).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut gauge = Pb04::new(i2c.clone());
        assert_eq!(gauge.get_capacity_percent(), Err(Error::Bus(ErrorKind::Other)));

        i2c.done();
    }

    #[test]
    fn test_fetch_state() {
        // 2.1 V (code 525) at 600 mA (code 600)
        let expectations = [
            select(0x21),
            sample([0x0D, 0xFE]),
            select(0x23),
            sample([0x59, 0xFE]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut gauge = Pb04::new(i2c.clone());
        let state = gauge.fetch_state().unwrap();
        assert_eq!(
            state,
            GaugeState {
                voltage_mv: 2100.0,
                current_ma: 600.0,
                capacity_pct: 10,
            }
        );

        i2c.done();
    }

    #[test]
    fn test_release_returns_bus() {
        let expectations: [I2cTransaction; 0] = [];
        let i2c = I2cMock::new(&expectations);

        let gauge = Pb04::new(i2c);
        let mut i2c = gauge.release();
        i2c.done();
    }
}
