//! State-of-charge estimation from voltage under load.
//!
//! The cell voltage sags with current draw, so the same charge level reads
//! lower at higher current. One breakpoint table is kept per current band and
//! the band is chosen from the instantaneous current.

/// Voltage at or above which the battery is reported full.
pub const FULL_CHARGE_VOLTS: f64 = 3.0;

pub const FULL: u8 = 100;
/// Below the lowest breakpoint: not empty, but close.
pub const CRITICAL_FLOOR: u8 = 1;
/// No band applies to the inputs; callers must not read this as "empty".
pub const INDETERMINATE: u8 = 0;

/// Upper bound (exclusive) of the low-current band, in mA.
pub const LOW_BAND_LIMIT_MA: f64 = 100.0;
/// Upper bound (inclusive) of the medium-current band, in mA.
pub const MEDIUM_BAND_LIMIT_MA: f64 = 500.0;

/// One step of a breakpoint table: voltages strictly above `above_volts` map
/// to `percent`, unless a higher step matched first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub above_volts: f64,
    pub percent: u8,
}

const fn bp(above_volts: f64, percent: u8) -> Breakpoint {
    Breakpoint { above_volts, percent }
}

/// Breakpoints ordered by descending voltage.
pub type BreakpointTable = [Breakpoint];

const LOW_CURRENT_TABLE: [Breakpoint; 9] = [
    bp(2.90, 90),
    bp(2.80, 80),
    bp(2.65, 70),
    bp(2.55, 60),
    bp(2.45, 50),
    bp(2.35, 40),
    bp(2.25, 30),
    bp(2.15, 20),
    bp(2.05, 10),
];

const MEDIUM_CURRENT_TABLE: [Breakpoint; 9] = [
    bp(2.85, 90),
    bp(2.75, 80),
    bp(2.60, 70),
    bp(2.50, 60),
    bp(2.40, 50),
    bp(2.30, 40),
    bp(2.20, 30),
    bp(2.10, 20),
    bp(2.02, 10),
];

const HIGH_CURRENT_TABLE: [Breakpoint; 9] = [
    bp(2.80, 90),
    bp(2.70, 80),
    bp(2.60, 70),
    bp(2.50, 60),
    bp(2.40, 50),
    bp(2.30, 40),
    bp(2.20, 30),
    bp(2.10, 20),
    bp(2.00, 10),
];

/// Current-draw band used to pick a breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentBand {
    /// Below 100 mA.
    Low,
    /// 100 mA to 500 mA, both ends included.
    Medium,
    /// Above 500 mA.
    High,
}

impl CurrentBand {
    /// Returns `None` when the current fits no band (NaN).
    pub fn from_milliamps(milliamps: f64) -> Option<Self> {
        if milliamps < LOW_BAND_LIMIT_MA {
            Some(CurrentBand::Low)
        } else if (LOW_BAND_LIMIT_MA..=MEDIUM_BAND_LIMIT_MA).contains(&milliamps) {
            Some(CurrentBand::Medium)
        } else if milliamps > MEDIUM_BAND_LIMIT_MA {
            Some(CurrentBand::High)
        } else {
            None
        }
    }

    pub fn table(self) -> &'static BreakpointTable {
        match self {
            CurrentBand::Low => &LOW_CURRENT_TABLE,
            CurrentBand::Medium => &MEDIUM_CURRENT_TABLE,
            CurrentBand::High => &HIGH_CURRENT_TABLE,
        }
    }
}

/// First-descending-match scan of `table`.
///
/// `volts` is expected already clamped to [`FULL_CHARGE_VOLTS`].
pub fn lookup(table: &BreakpointTable, volts: f64) -> u8 {
    if volts >= FULL_CHARGE_VOLTS {
        return FULL;
    }
    table
        .iter()
        .find(|step| volts > step.above_volts)
        .map_or(CRITICAL_FLOOR, |step| step.percent)
}

/// Estimate remaining capacity in percent from a voltage (V) and current (mA).
///
/// Returns [`CRITICAL_FLOOR`] below the lowest breakpoint and
/// [`INDETERMINATE`] when either input is NaN.
pub fn estimate(volts: f64, milliamps: f64) -> u8 {
    // f64::min would swallow a NaN voltage and report full charge
    if volts.is_nan() {
        return INDETERMINATE;
    }
    let volts = volts.min(FULL_CHARGE_VOLTS);

    match CurrentBand::from_milliamps(milliamps) {
        Some(band) => lookup(band.table(), volts),
        None => INDETERMINATE,
    }
}
