use core::fmt;

/// Errors reported by the gauge driver.
///
/// Conversions and capacity estimation cannot fail, so the only error is the
/// bus transport's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The I2C transaction failed (address NACK, arbitration loss, line fault...).
    Bus(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "I2C bus error: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for Error<E> {}

#[test]
fn test_display_names_the_bus() {
    let err: Error<&str> = Error::Bus("nack");
    assert_eq!(err.to_string(), "I2C bus error: \"nack\"");
}
