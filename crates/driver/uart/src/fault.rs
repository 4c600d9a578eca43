//! Receive fault types.

use core::fmt;

/// Hardware receive faults reported by the peripheral.
///
/// Both are fully recovered inside
/// [`service_receive`](crate::SerialPort::service_receive) by flushing the
/// hardware receive path, discarding buffered unread bytes and reopening the
/// flow-control gate; neither is surfaced to the caller as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveFault {
    /// A new byte arrived before the previous one was read from the data
    /// register; the peripheral lost data.
    Overrun,
    /// The received bits did not match the expected start/stop pattern.
    Framing,
}

impl fmt::Display for ReceiveFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overrun => f.write_str("receiver overrun"),
            Self::Framing => f.write_str("framing error"),
        }
    }
}
