//! MAX11646 register bits as wired on the PB04 module.

/// 7-bit I2C address of the ADC.
pub const I2C_ADDR: u8 = 0x36;

// Setup byte (bit 7 set)
pub const REG_SETUP: u8 = 0x80;
pub const SEL2: u8 = 0x40;
pub const SEL1: u8 = 0x20;
pub const SEL0: u8 = 0x10;
pub const CLK_EXTERNAL: u8 = 0x08;
pub const BIPOLAR: u8 = 0x04;
/// Writing 1 leaves the configuration register intact.
pub const RST: u8 = 0x02;

// Configuration byte (bit 7 clear)
pub const REG_CONF: u8 = 0x00;
pub const SCAN1: u8 = 0x40;
pub const SCAN0: u8 = 0x20;
pub const CH_0: u8 = 0x00;
pub const CH_1: u8 = 0x02;
pub const SINGLE_ENDED: u8 = 0x01;

/// Setup byte written ahead of every conversion.
pub const SETUP: u8 = REG_SETUP | SEL2 | SEL0 | RST;

/// Convert channel 0 only (battery voltage divider).
pub const CONF_VOLTAGE: u8 = REG_CONF | SCAN0 | CH_0 | SINGLE_ENDED;

/// Convert channel 1 only (current-sense amplifier).
pub const CONF_CURRENT: u8 = REG_CONF | SCAN0 | CH_1 | SINGLE_ENDED;

#[test]
fn test_composed_bytes_match_wire_values() {
    assert_eq!(SETUP, 0xD2);
    assert_eq!(CONF_VOLTAGE, 0x21);
    assert_eq!(CONF_CURRENT, 0x23);
}

#[test]
fn test_setup_and_conf_are_distinguished_by_bit7() {
    assert_ne!(SETUP & REG_SETUP, 0);
    assert_eq!(CONF_VOLTAGE & REG_SETUP, 0);
    assert_eq!(CONF_CURRENT & REG_SETUP, 0);
}
