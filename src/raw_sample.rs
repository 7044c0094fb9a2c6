use crate::registers::{CONF_CURRENT, CONF_VOLTAGE};

/// An unsigned 16-bit ADC sample as returned by the bus read.
pub type RawSample = u16;

/// The ADC input to convert on the next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Battery voltage, behind the module's divider.
    Voltage,
    /// Current-sense amplifier output.
    Current,
}

impl Channel {
    /// The configuration byte that selects this channel.
    pub const fn selector(self) -> u8 {
        match self {
            Channel::Voltage => CONF_VOLTAGE,
            Channel::Current => CONF_CURRENT,
        }
    }
}

/// The order in which the two sample bytes arrive on the bus.
///
/// This is fixed per hardware revision; the reference module firmware reads
/// little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    pub fn decode(self, bytes: [u8; 2]) -> RawSample {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        }
    }
}

/// Build the frame written before each sample.
///
/// The frame is always exactly two bytes: the setup byte, then the channel selector.
pub const fn command_frame(setup: u8, selector: u8) -> [u8; 2] {
    [setup, selector]
}

/// Split a sample into its (high, low) bytes.
pub const fn split(raw: RawSample) -> (u8, u8) {
    ((raw >> 8) as u8, raw as u8)
}
