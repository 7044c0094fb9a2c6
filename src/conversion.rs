//! Calibrated conversion of raw ADC samples into physical units.
//!
//! Both channels share the same shape: the 10-bit result sits in the low two
//! bits of the high byte plus the low byte, with the unused high bits reading
//! back as ones. Each channel still carries its own offset and gain, taken
//! separately from the module's divider and sense-amplifier design, so they are
//! kept as two constant sets and two functions.

use crate::raw_sample::{split, RawSample};

/// High-byte code at which the 10-bit result is zero (unused bits set).
const HIGH_BYTE_ZERO: i32 = 252;
/// Internal reference voltage in mV.
const REFERENCE_MV: f64 = 2048.0;
/// ADC full-scale code count.
const FULL_SCALE: f64 = 1024.0;

/// Battery voltage channel calibration.
mod voltage_cal {
    pub const LOW_BYTE_OFFSET: i32 = 0;
    /// 2:1 resistor divider in front of AIN0.
    pub const DIVIDER_GAIN: f64 = 2.0;
}

/// Current-sense channel calibration.
mod current_cal {
    /// One LSB of zero offset on the sense amplifier.
    pub const LOW_BYTE_OFFSET: i32 = 1;
    pub const SENSE_NUMERATOR: f64 = 50.0;
    pub const SENSE_DENOMINATOR: f64 = 100.0;
}

/// Unit a [`Reading`] is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Volts,
    Millivolts,
    Milliamps,
}

/// Unit choice for voltage readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoltageUnit {
    #[default]
    Volts,
    Millivolts,
}

impl From<VoltageUnit> for Unit {
    fn from(unit: VoltageUnit) -> Self {
        match unit {
            VoltageUnit::Volts => Unit::Volts,
            VoltageUnit::Millivolts => Unit::Millivolts,
        }
    }
}

/// A converted sample tagged with its unit. Never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub unit: Unit,
}

fn code(high: u8, low: u8, low_offset: i32) -> i32 {
    (i32::from(high) - HIGH_BYTE_ZERO) * 256 + (i32::from(low) - low_offset)
}

/// Battery voltage in mV. 4 mV per code.
pub fn to_millivolts(raw: RawSample) -> f64 {
    let (high, low) = split(raw);
    let code = code(high, low, voltage_cal::LOW_BYTE_OFFSET);
    f64::from(code) * REFERENCE_MV * voltage_cal::DIVIDER_GAIN / FULL_SCALE
}

/// Battery current in mA. 1 mA per code.
pub fn to_milliamps(raw: RawSample) -> f64 {
    let (high, low) = split(raw);
    let code = code(high, low, current_cal::LOW_BYTE_OFFSET);
    f64::from(code) * REFERENCE_MV * current_cal::SENSE_NUMERATOR
        / FULL_SCALE
        / current_cal::SENSE_DENOMINATOR
}

pub fn to_voltage(raw: RawSample, unit: VoltageUnit) -> Reading {
    let mv = to_millivolts(raw);
    let value = match unit {
        VoltageUnit::Volts => mv / 1000.0,
        VoltageUnit::Millivolts => mv,
    };
    Reading {
        value,
        unit: unit.into(),
    }
}

pub fn to_current(raw: RawSample) -> Reading {
    Reading {
        value: to_milliamps(raw),
        unit: Unit::Milliamps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_is_four_millivolts_per_code() {
        for raw in 0..=u16::MAX {
            let (h, l) = split(raw);
            let expected = f64::from((i32::from(h) - 252) * 256 + i32::from(l)) * 4.0;
            assert_eq!(to_millivolts(raw), expected, "raw {raw:#06x}");
        }
    }

    #[test]
    fn test_current_is_one_milliamp_per_code() {
        for raw in 0..=u16::MAX {
            let (h, l) = split(raw);
            let expected = f64::from((i32::from(h) - 252) * 256 + i32::from(l) - 1);
            assert_eq!(to_milliamps(raw), expected, "raw {raw:#06x}");
        }
    }

    #[test]
    fn test_conversions_are_deterministic() {
        for raw in (0..=u16::MAX).step_by(257) {
            assert_eq!(to_millivolts(raw).to_bits(), to_millivolts(raw).to_bits());
            assert_eq!(to_milliamps(raw).to_bits(), to_milliamps(raw).to_bits());
        }
    }

    #[test]
    fn test_known_samples() {
        // 0xFE90: h = 254, l = 144, code 656
        assert_eq!(to_millivolts(0xFE90), 2624.0);
        assert_eq!(to_milliamps(0xFE90), 655.0);
        // zero point of each channel
        assert_eq!(to_millivolts(0xFC00), 0.0);
        assert_eq!(to_milliamps(0xFC01), 0.0);
        // top of the 10-bit range
        assert_eq!(to_millivolts(0xFFFF), 4092.0);
        // below the usable range the result goes negative
        assert_eq!(to_millivolts(0x0000), -258048.0);
        assert_eq!(to_milliamps(0xFC00), -1.0);
    }

    #[test]
    fn test_voltage_units() {
        let v = to_voltage(0xFE90, VoltageUnit::Volts);
        assert_eq!(v.unit, Unit::Volts);
        assert!((v.value - 2.624).abs() < 1e-12);

        let mv = to_voltage(0xFE90, VoltageUnit::Millivolts);
        assert_eq!(mv, Reading { value: 2624.0, unit: Unit::Millivolts });
    }

    #[test]
    fn test_current_unit() {
        assert_eq!(to_current(0xFC33), Reading { value: 50.0, unit: Unit::Milliamps });
    }
}
