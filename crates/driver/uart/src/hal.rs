//! Hardware abstraction boundary for the driver core.

use crate::fault::ReceiveFault;
use crate::flow::FlowState;

/// Register-level access to one UART peripheral.
///
/// The driver core talks to hardware exclusively through this trait. The two
/// supported peripheral generations each provide an implementation in
/// [`regs`](crate::regs); tests provide a simulated one. Choosing the backend
/// type at construction selects the generation once, rather than branching on
/// every interrupt.
///
/// Methods take `&mut self` where real hardware access has side effects
/// (reading a data register pops a FIFO, for instance), so simulations can
/// track state without interior mutability.
pub trait UartHardware {
    /// Programs the line for 8 data bits, no parity, one stop bit, and
    /// enables the receiver and transmitter.
    fn configure(&mut self);

    /// Returns `true` if the data register can accept a byte.
    fn transmit_ready(&self) -> bool;

    /// Writes one byte to the data register.
    ///
    /// Only call when [`transmit_ready`](Self::transmit_ready) holds.
    fn write_data(&mut self, byte: u8);

    /// Reads one byte from the data register.
    ///
    /// Only call when [`receive_pending`](Self::receive_pending) holds.
    fn read_data(&mut self) -> u8;

    /// Returns `true` if a received byte is waiting in the data register.
    fn receive_pending(&self) -> bool;

    /// Returns the pending receive fault, if the peripheral reports one.
    ///
    /// Checked before [`receive_pending`](Self::receive_pending): a fault
    /// takes priority over any byte still sitting in the hardware FIFO.
    fn receive_fault(&self) -> Option<ReceiveFault>;

    /// Clears a receive fault and flushes the hardware receive path.
    ///
    /// Generation-specific: older peripherals require a receiver
    /// disable/re-enable cycle to clear an overrun, newer ones clear on a
    /// status/data read sequence. Pending bytes in the hardware FIFO are
    /// read and discarded either way.
    fn recover_receiver(&mut self);

    /// Enables or disables the transmit-register-empty interrupt.
    fn set_transmit_interrupt(&mut self, enabled: bool);

    /// Enables or disables the receive interrupt.
    fn set_receive_interrupt(&mut self, enabled: bool);

    /// Mirrors the logical flow-control gate onto the signal line.
    ///
    /// Default is a no-op for builds without flow-control wiring; the driver
    /// operates correctly without it, at the cost of possible drop-newest
    /// receive overflow under sustained overrun.
    fn set_flow_signal(&mut self, state: FlowState) {
        let _ = state;
    }

    /// Called once per idle iteration of a blocking spin loop.
    ///
    /// Bare-metal backends emit a spin-loop hint; simulations use this to
    /// advance simulated time (e.g., making the transmitter ready after a
    /// scripted number of iterations).
    fn spin_wait(&mut self) {
        core::hint::spin_loop();
    }
}
