//! Simulated UART hardware for driver tests.
//!
//! `SimUart` is a shared-handle mock: cloning it yields a second handle onto
//! the same register state, so a test can keep injecting wire bytes and
//! inspecting outputs while the driver owns the backend. Transmit readiness
//! is scriptable (immediately, never, or after a number of spin-loop
//! iterations) to exercise the blocking paths.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use muon_uart::{FlowState, ReceiveFault, UartHardware};

#[derive(Default)]
struct State {
    /// Bytes "on the wire" from the remote, not yet read by the driver.
    wire_in: VecDeque<u8>,
    /// Bytes the driver wrote to the data register, in order.
    sent: Vec<u8>,
    tx_ready: bool,
    /// Makes the transmitter ready after this many spin iterations.
    ready_after: Option<u32>,
    spins: u32,
    fault: Option<ReceiveFault>,
    flow_line: FlowState,
    configured: bool,
    tx_irq: bool,
    rx_irq: bool,
    recoveries: u32,
}

/// A simulated UART register block.
#[derive(Clone)]
pub struct SimUart {
    state: Rc<RefCell<State>>,
}

impl Default for SimUart {
    fn default() -> Self {
        Self::new()
    }
}

impl SimUart {
    pub fn new() -> Self {
        let sim = Self {
            state: Rc::new(RefCell::new(State::default())),
        };
        sim.state.borrow_mut().tx_ready = true;
        sim
    }

    /// Places bytes on the simulated wire, pending receive service.
    pub fn inject(&self, bytes: &[u8]) {
        self.state.borrow_mut().wire_in.extend(bytes.iter().copied());
    }

    /// Raises a receive fault that stays set until the driver recovers.
    pub fn inject_fault(&self, fault: ReceiveFault) {
        self.state.borrow_mut().fault = Some(fault);
    }

    /// Everything the driver wrote to the data register, in order.
    pub fn sent(&self) -> Vec<u8> {
        self.state.borrow().sent.clone()
    }

    /// Current level of the flow-control line.
    pub fn flow_line(&self) -> FlowState {
        self.state.borrow().flow_line
    }

    pub fn set_transmit_ready(&self, ready: bool) {
        self.state.borrow_mut().tx_ready = ready;
    }

    /// Scripts the transmitter to become ready after `spins` spin-loop
    /// iterations, simulating the line draining while mainline code waits.
    pub fn transmit_ready_after(&self, spins: u32) {
        let mut state = self.state.borrow_mut();
        state.spins = 0;
        state.ready_after = Some(spins);
    }

    pub fn configured(&self) -> bool {
        self.state.borrow().configured
    }

    pub fn transmit_irq_enabled(&self) -> bool {
        self.state.borrow().tx_irq
    }

    pub fn receive_irq_enabled(&self) -> bool {
        self.state.borrow().rx_irq
    }

    /// Bytes still waiting on the wire (not yet read by the driver).
    pub fn wire_pending(&self) -> usize {
        self.state.borrow().wire_in.len()
    }

    /// Number of receiver recovery cycles the driver performed.
    pub fn recoveries(&self) -> u32 {
        self.state.borrow().recoveries
    }
}

impl UartHardware for SimUart {
    fn configure(&mut self) {
        self.state.borrow_mut().configured = true;
    }

    fn transmit_ready(&self) -> bool {
        self.state.borrow().tx_ready
    }

    fn write_data(&mut self, byte: u8) {
        self.state.borrow_mut().sent.push(byte);
    }

    fn read_data(&mut self) -> u8 {
        self.state.borrow_mut().wire_in.pop_front().unwrap_or(0)
    }

    fn receive_pending(&self) -> bool {
        !self.state.borrow().wire_in.is_empty()
    }

    fn receive_fault(&self) -> Option<ReceiveFault> {
        self.state.borrow().fault
    }

    fn recover_receiver(&mut self) {
        let mut state = self.state.borrow_mut();
        state.fault = None;
        // The hardware flush reads and discards whatever the FIFO holds.
        state.wire_in.clear();
        state.recoveries += 1;
    }

    fn set_transmit_interrupt(&mut self, enabled: bool) {
        self.state.borrow_mut().tx_irq = enabled;
    }

    fn set_receive_interrupt(&mut self, enabled: bool) {
        self.state.borrow_mut().rx_irq = enabled;
    }

    fn set_flow_signal(&mut self, state: FlowState) {
        self.state.borrow_mut().flow_line = state;
    }

    fn spin_wait(&mut self) {
        let mut state = self.state.borrow_mut();
        state.spins += 1;
        if let Some(after) = state.ready_after {
            if state.spins >= after {
                state.tx_ready = true;
            }
        }
    }
}

/// Initializes test logging; safe to call from every test.
pub fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}
