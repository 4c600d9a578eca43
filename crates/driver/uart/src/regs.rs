//! Register-level backends for the two supported USART peripheral
//! generations.
//!
//! Both generations expose an 8-bit register block: a data register, a
//! status register and a control register. They differ in how a receive
//! fault is cleared — generation 1 requires a receiver disable/re-enable
//! cycle, generation 2 has a dedicated write-one-to-clear error register —
//! so each gets its own [`UartHardware`] implementation, selected once at
//! construction.
//!
//! All volatile access is confined to this module; the rest of the driver
//! sees only the trait.

use bitflags::bitflags;

use crate::fault::ReceiveFault;
use crate::flow::FlowState;
use crate::hal::UartHardware;

/// Generation-1 register offsets from the peripheral base address.
mod reg_v1 {
    /// Data register (read: receive FIFO, write: transmit holding).
    pub const DATA: usize = 0;
    /// Status register (read-only).
    pub const STATUS: usize = 1;
    /// Control register.
    pub const CTRL: usize = 2;
}

/// Generation-2 register offsets from the peripheral base address.
mod reg_v2 {
    /// Data register (read: receive FIFO, write: transmit holding).
    pub const DATA: usize = 0;
    /// Status register (read-only).
    pub const STATUS: usize = 1;
    /// Control register.
    pub const CTRL: usize = 2;
    /// Error-clear register (write 1 to clear the matching status bit).
    pub const ERRCLR: usize = 3;
}

bitflags! {
    /// Status register bits, common to both generations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Transmit holding register empty.
        const TX_READY   = 1 << 0;
        /// Received byte waiting in the data register.
        const RX_PENDING = 1 << 1;
        /// Receiver overrun.
        const OVERRUN    = 1 << 2;
        /// Framing error on the last received byte.
        const FRAMING    = 1 << 3;
    }
}

bitflags! {
    /// Control register bits, common to both generations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ctrl: u8 {
        /// Receiver enable.
        const RX_ENABLE  = 1 << 0;
        /// Transmitter enable.
        const TX_ENABLE  = 1 << 1;
        /// Receive interrupt enable.
        const RX_IRQ     = 1 << 2;
        /// Transmit-register-empty interrupt enable.
        const TX_IRQ     = 1 << 3;
        /// 9-bit word mode (cleared for 8N1).
        const NINE_BIT   = 1 << 4;
        /// Parity enable (cleared for 8N1).
        const PARITY     = 1 << 5;
        /// Flow-control output line level.
        const FLOW_LINE  = 1 << 6;
    }
}

/// Reads the status register at `base + STATUS`.
///
/// # Safety
///
/// `base` must satisfy the backend constructor contract.
unsafe fn read_status(base: *mut u8, offset: usize) -> Status {
    Status::from_bits_truncate(unsafe { base.add(offset).read_volatile() })
}

fn fault_from_status(status: Status) -> Option<ReceiveFault> {
    if status.contains(Status::OVERRUN) {
        Some(ReceiveFault::Overrun)
    } else if status.contains(Status::FRAMING) {
        Some(ReceiveFault::Framing)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Generation 1
// ---------------------------------------------------------------------------

/// Generation-1 USART backend.
///
/// The fault bits are sticky: an overrun or framing error holds the receiver
/// until the receiver-enable bit is cycled, after which the two-deep receive
/// FIFO is drained by reading the data register.
///
/// The flow-control line on this generation is wired active-low, so the
/// logical gate state is inverted on write.
pub struct UsartGen1 {
    base: *mut u8,
    ctrl: Ctrl,
}

impl UsartGen1 {
    /// Creates a backend over the register block at `base`.
    ///
    /// Does not touch hardware.
    ///
    /// # Safety
    ///
    /// `base` must point at a mapped generation-1 USART register block, and
    /// the caller must guarantee exclusive access to it for the lifetime of
    /// the returned value.
    #[must_use]
    pub const unsafe fn new(base: *mut u8) -> Self {
        Self {
            base,
            ctrl: Ctrl::empty(),
        }
    }

    fn status(&self) -> Status {
        // SAFETY: `base` is valid per the constructor contract.
        unsafe { read_status(self.base, reg_v1::STATUS) }
    }

    fn write_ctrl(&mut self, ctrl: Ctrl) {
        self.ctrl = ctrl;
        // SAFETY: `base` is valid per the constructor contract.
        unsafe { self.base.add(reg_v1::CTRL).write_volatile(ctrl.bits()) };
    }

    fn update_ctrl(&mut self, set: Ctrl, clear: Ctrl) {
        self.write_ctrl((self.ctrl | set) - clear);
    }
}

impl UartHardware for UsartGen1 {
    fn configure(&mut self) {
        // 8N1: word-size and parity bits cleared.
        self.write_ctrl(Ctrl::RX_ENABLE | Ctrl::TX_ENABLE);
    }

    fn transmit_ready(&self) -> bool {
        self.status().contains(Status::TX_READY)
    }

    fn write_data(&mut self, byte: u8) {
        // SAFETY: `base` is valid per the constructor contract.
        unsafe { self.base.add(reg_v1::DATA).write_volatile(byte) };
    }

    fn read_data(&mut self) -> u8 {
        // SAFETY: `base` is valid per the constructor contract.
        unsafe { self.base.add(reg_v1::DATA).read_volatile() }
    }

    fn receive_pending(&self) -> bool {
        self.status().contains(Status::RX_PENDING)
    }

    fn receive_fault(&self) -> Option<ReceiveFault> {
        fault_from_status(self.status())
    }

    fn recover_receiver(&mut self) {
        // Cycling the receiver-enable bit clears the sticky fault bits.
        self.update_ctrl(Ctrl::empty(), Ctrl::RX_ENABLE);
        self.update_ctrl(Ctrl::RX_ENABLE, Ctrl::empty());
        // Drain the two-deep receive FIFO.
        let _ = self.read_data();
        let _ = self.read_data();
    }

    fn set_transmit_interrupt(&mut self, enabled: bool) {
        if enabled {
            self.update_ctrl(Ctrl::TX_IRQ, Ctrl::empty());
        } else {
            self.update_ctrl(Ctrl::empty(), Ctrl::TX_IRQ);
        }
    }

    fn set_receive_interrupt(&mut self, enabled: bool) {
        if enabled {
            self.update_ctrl(Ctrl::RX_IRQ, Ctrl::empty());
        } else {
            self.update_ctrl(Ctrl::empty(), Ctrl::RX_IRQ);
        }
    }

    fn set_flow_signal(&mut self, state: FlowState) {
        // Active-low line: Go drives the line low.
        match state {
            FlowState::Go => self.update_ctrl(Ctrl::empty(), Ctrl::FLOW_LINE),
            FlowState::Stop => self.update_ctrl(Ctrl::FLOW_LINE, Ctrl::empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Generation 2
// ---------------------------------------------------------------------------

/// Generation-2 USART backend.
///
/// Fault bits are cleared through the dedicated write-one-to-clear error
/// register; no receiver cycle is needed. The flow-control line is wired
/// active-high.
pub struct UsartGen2 {
    base: *mut u8,
    ctrl: Ctrl,
}

impl UsartGen2 {
    /// Creates a backend over the register block at `base`.
    ///
    /// Does not touch hardware.
    ///
    /// # Safety
    ///
    /// `base` must point at a mapped generation-2 USART register block, and
    /// the caller must guarantee exclusive access to it for the lifetime of
    /// the returned value.
    #[must_use]
    pub const unsafe fn new(base: *mut u8) -> Self {
        Self {
            base,
            ctrl: Ctrl::empty(),
        }
    }

    fn status(&self) -> Status {
        // SAFETY: `base` is valid per the constructor contract.
        unsafe { read_status(self.base, reg_v2::STATUS) }
    }

    fn write_ctrl(&mut self, ctrl: Ctrl) {
        self.ctrl = ctrl;
        // SAFETY: `base` is valid per the constructor contract.
        unsafe { self.base.add(reg_v2::CTRL).write_volatile(ctrl.bits()) };
    }

    fn update_ctrl(&mut self, set: Ctrl, clear: Ctrl) {
        self.write_ctrl((self.ctrl | set) - clear);
    }
}

impl UartHardware for UsartGen2 {
    fn configure(&mut self) {
        self.write_ctrl(Ctrl::RX_ENABLE | Ctrl::TX_ENABLE);
    }

    fn transmit_ready(&self) -> bool {
        self.status().contains(Status::TX_READY)
    }

    fn write_data(&mut self, byte: u8) {
        // SAFETY: `base` is valid per the constructor contract.
        unsafe { self.base.add(reg_v2::DATA).write_volatile(byte) };
    }

    fn read_data(&mut self) -> u8 {
        // SAFETY: `base` is valid per the constructor contract.
        unsafe { self.base.add(reg_v2::DATA).read_volatile() }
    }

    fn receive_pending(&self) -> bool {
        self.status().contains(Status::RX_PENDING)
    }

    fn receive_fault(&self) -> Option<ReceiveFault> {
        fault_from_status(self.status())
    }

    fn recover_receiver(&mut self) {
        // Acknowledge the fault, then drain whatever the FIFO still holds.
        let ack = (Status::OVERRUN | Status::FRAMING).bits();
        // SAFETY: `base` is valid per the constructor contract.
        unsafe { self.base.add(reg_v2::ERRCLR).write_volatile(ack) };
        while self.receive_pending() {
            let _ = self.read_data();
        }
    }

    fn set_transmit_interrupt(&mut self, enabled: bool) {
        if enabled {
            self.update_ctrl(Ctrl::TX_IRQ, Ctrl::empty());
        } else {
            self.update_ctrl(Ctrl::empty(), Ctrl::TX_IRQ);
        }
    }

    fn set_receive_interrupt(&mut self, enabled: bool) {
        if enabled {
            self.update_ctrl(Ctrl::RX_IRQ, Ctrl::empty());
        } else {
            self.update_ctrl(Ctrl::empty(), Ctrl::RX_IRQ);
        }
    }

    fn set_flow_signal(&mut self, state: FlowState) {
        match state {
            FlowState::Go => self.update_ctrl(Ctrl::FLOW_LINE, Ctrl::empty()),
            FlowState::Stop => self.update_ctrl(Ctrl::empty(), Ctrl::FLOW_LINE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_priority_is_overrun_first() {
        let both = Status::OVERRUN | Status::FRAMING;
        assert_eq!(fault_from_status(both), Some(ReceiveFault::Overrun));
        assert_eq!(
            fault_from_status(Status::FRAMING),
            Some(ReceiveFault::Framing)
        );
        assert_eq!(fault_from_status(Status::TX_READY), None);
    }
}
