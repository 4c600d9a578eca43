//! Flow-control gate state.

use core::fmt;

/// Logical state of the flow-control gate: whether the remote sender may
/// transmit.
///
/// The core deals only in logical states; a hardware backend mirroring the
/// gate onto a signal line applies whatever electrical polarity the wiring
/// requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlowState {
    /// The remote sender may transmit.
    #[default]
    Go,
    /// The remote sender must hold off.
    Stop,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Go => f.write_str("go"),
            Self::Stop => f.write_str("stop"),
        }
    }
}
