//! Port configuration, static after initialization.

/// Default transmit-buffer capacity in bytes (backing array size).
pub const DEFAULT_TX_CAPACITY: usize = 32;

/// Default receive-buffer capacity in bytes (backing array size).
pub const DEFAULT_RX_CAPACITY: usize = 64;

/// Default free-space level at which the flow-control gate reopens.
pub const DEFAULT_FLOW_SPARE_THRESHOLD: usize = 17;

/// What [`SerialPort::write`](crate::SerialPort::write) does when the
/// transmit buffer is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Spin until the transmit service routine frees a slot, then insert.
    /// The wait is unbounded and non-cancellable.
    #[default]
    Block,
    /// Drop the byte and return the [`DISCARDED`](crate::DISCARDED)
    /// sentinel; buffer occupancy is unchanged.
    Discard,
}

/// Static configuration for one serial port.
///
/// Buffer capacities are const generic parameters of
/// [`SerialPort`](crate::SerialPort); this struct carries the remaining
/// knobs. Read-only after [`initialize`](crate::SerialPort::initialize).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfig {
    /// Minimum free receive space required before reopening the gate.
    ///
    /// The receive service routine closes the gate when post-insert free
    /// space drops *below* this value; the read path reopens it when
    /// post-remove free space reaches it again. Insertions and removals
    /// move opposite ends of the same measurement, so a fixed threshold
    /// gives stable one-directional transitions without oscillation.
    pub flow_spare_threshold: usize,
    /// Transmit-buffer-full behavior.
    pub overflow_policy: OverflowPolicy,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PortConfig {
    /// Returns the default configuration: threshold
    /// [`DEFAULT_FLOW_SPARE_THRESHOLD`], policy [`OverflowPolicy::Block`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flow_spare_threshold: DEFAULT_FLOW_SPARE_THRESHOLD,
            overflow_policy: OverflowPolicy::Block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = PortConfig::default();
        assert_eq!(config.flow_spare_threshold, 17);
        assert_eq!(config.overflow_policy, OverflowPolicy::Block);
    }
}
