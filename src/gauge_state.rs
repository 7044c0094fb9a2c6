/// One snapshot of the battery, taken from a single voltage read and a single current read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeState {
    /// Battery voltage in mV
    pub voltage_mv: f64,
    /// Battery current in mA
    pub current_ma: f64,
    /// Estimated state of charge in %. 1 means critically low, 0 means no estimate.
    pub capacity_pct: u8,
}
