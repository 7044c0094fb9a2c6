//! Read voltage, current and estimated state of charge from a PB04 battery module
//!
//! The module's fuel gauge is a MAX11646 two-channel 10-bit ADC at I2C address `0x36`.
//! Channel 0 sees the battery voltage through a 2:1 divider, channel 1 the output of a
//! current-sense amplifier. Each sample is taken by writing a setup byte and a channel
//! selector, then reading back two bytes.
//!
//! Currently the following data can be accessed:
//!
//! - Battery voltage (V or mV)
//! - Battery current (mA)
//! - Estimated state of charge (%), from a voltage table chosen by current draw
//!
//! The state of charge is an estimate. `1` means the voltage is below every
//! known breakpoint (critically low, but not empty) and `0` means no estimate
//! could be made, for instance because a reading was NaN.
//!
//! The driver is blocking and works with any [`embedded_hal::i2c::I2c`] bus.
//! Bus failures are returned as [`Error::Bus`] and never replaced with a
//! made-up reading.
//!
//! # Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
//! # let expectations = [
//! #     Transaction::write(0x36, vec![0xD2, 0x21]),
//! #     Transaction::read(0x36, vec![0x90, 0xFE]),
//! #     Transaction::write(0x36, vec![0xD2, 0x23]),
//! #     Transaction::read(0x36, vec![0x33, 0xFC]),
//! # ];
//! # let i2c = Mock::new(&expectations);
//! # let mut done = i2c.clone();
//! use pb04::Pb04;
//!
//! let mut gauge = Pb04::new(i2c);
//! let state = gauge.fetch_state().unwrap();
//! assert_eq!(state.voltage_mv, 2624.0);
//! assert_eq!(state.current_ma, 50.0);
//! assert_eq!(state.capacity_pct, 60);
//! # done.done();
//! ```

pub mod capacity;
pub mod conversion;
mod error;
mod gauge;
mod gauge_state;
pub mod raw_sample;
pub mod registers;

pub use conversion::{Reading, Unit, VoltageUnit};
pub use error::Error;
pub use gauge::{Config, Pb04, Result};
pub use gauge_state::GaugeState;
pub use raw_sample::{ByteOrder, Channel, RawSample};
