//! The buffered serial port: transmit/receive paths, flow-control gate and
//! port lifecycle.

use core::fmt;

use muon_ringbuf::RingBuf;

use crate::config::{DEFAULT_RX_CAPACITY, DEFAULT_TX_CAPACITY, OverflowPolicy, PortConfig};
use crate::flow::FlowState;
use crate::hal::UartHardware;

/// Sentinel returned by [`SerialPort::write`] when a byte was dropped under
/// [`OverflowPolicy::Discard`].
pub const DISCARDED: u8 = 0x00;

/// An interrupt-driven, buffered, full-duplex serial port.
///
/// Owns both circular buffers, the flow-control gate and the hardware
/// backend for one physical UART. `TX` and `RX` are the backing array sizes
/// of the transmit and receive buffers (usable capacity is one less each).
///
/// Mainline code calls the public operations; the target's interrupt
/// trampolines call [`service_transmit`](Self::service_transmit) and
/// [`service_receive`](Self::service_receive). Each buffer is strictly
/// single-producer/single-consumer between those two contexts — see the
/// crate docs for the concurrency contract.
pub struct SerialPort<H, const TX: usize = DEFAULT_TX_CAPACITY, const RX: usize = DEFAULT_RX_CAPACITY>
{
    hw: H,
    tx: RingBuf<u8, TX>,
    rx: RingBuf<u8, RX>,
    config: PortConfig,
    gate: FlowState,
    /// Software shadow of the transmit-interrupt enable bit; the service
    /// routine only acts while this is set.
    tx_irq_enabled: bool,
    /// Invoked synchronously with each received byte, in interrupt context.
    rx_callback: Option<fn(u8)>,
}

impl<H: UartHardware, const TX: usize, const RX: usize> SerialPort<H, TX, RX> {
    /// Creates a port around the given hardware backend.
    ///
    /// Does not touch hardware; call [`initialize`](Self::initialize) before
    /// use.
    #[must_use]
    pub const fn new(hw: H, config: PortConfig) -> Self {
        Self {
            hw,
            tx: RingBuf::new(),
            rx: RingBuf::new(),
            config,
            gate: FlowState::Go,
            tx_irq_enabled: false,
            rx_callback: None,
        }
    }

    /// Resets buffer state and arms the hardware.
    ///
    /// Clears both circular buffers, programs the line for 8N1, permanently
    /// enables the receive interrupt, leaves the transmit interrupt disabled
    /// until the first enqueue, and opens the flow-control gate.
    pub fn initialize(&mut self) {
        self.tx.clear();
        self.rx.clear();
        self.hw.configure();
        self.tx_irq_enabled = false;
        self.hw.set_transmit_interrupt(false);
        self.hw.set_receive_interrupt(true);
        self.gate = FlowState::Go;
        self.hw.set_flow_signal(FlowState::Go);
        debug!("serial port initialized (tx {}, rx {})", TX, RX);
    }

    /// Registers a callback invoked synchronously with each received byte.
    ///
    /// The callback runs in interrupt context, before the byte is committed
    /// to the receive buffer (it also sees bytes that end up dropped on
    /// overflow). It must not block and must use bounded stack.
    pub fn set_receive_callback(&mut self, callback: Option<fn(u8)>) {
        self.rx_callback = callback;
    }

    // -----------------------------------------------------------------------
    // Transmit path (mainline producer)
    // -----------------------------------------------------------------------

    /// Queues one byte for transmission.
    ///
    /// Fast path: if the transmit buffer is empty and the hardware is
    /// immediately ready, the byte bypasses the buffer and goes straight to
    /// the data register. Otherwise it is pushed into the buffer and the
    /// transmit interrupt is (re)enabled.
    ///
    /// On a full buffer the behavior follows the configured
    /// [`OverflowPolicy`]: `Block` spins until the transmit service routine
    /// frees a slot (unbounded, non-cancellable); `Discard` drops the byte.
    ///
    /// Returns the byte sent, or [`DISCARDED`] if it was dropped.
    pub fn write(&mut self, byte: u8) -> u8 {
        if self.tx.is_empty() && self.hw.transmit_ready() {
            self.hw.write_data(byte);
            return byte;
        }
        while self.tx.try_push(byte).is_err() {
            match self.config.overflow_policy {
                OverflowPolicy::Discard => {
                    trace!("transmit buffer full, discarding 0x{byte:02x}");
                    return DISCARDED;
                }
                OverflowPolicy::Block => {
                    // On the real target the transmit interrupt preempts
                    // this spin; here the loop polls the hardware and
                    // dispatches the service routine inline.
                    self.hw.spin_wait();
                    self.service_transmit();
                }
            }
        }
        self.tx_irq_enabled = true;
        self.hw.set_transmit_interrupt(true);
        byte
    }

    /// Queues a slice of bytes, applying [`write`](Self::write) per byte.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write(byte);
        }
    }

    /// Returns the number of free transmit slots.
    ///
    /// Never returns 0: a return of 1 means the buffer is full.
    #[must_use]
    pub const fn transmit_free_space(&self) -> usize {
        self.tx.spare()
    }

    /// Returns `true` if the transmit buffer is empty.
    #[must_use]
    pub const fn transmit_idle(&self) -> bool {
        self.tx.is_empty()
    }

    /// Transmit service routine; call from the transmit-interrupt trampoline.
    ///
    /// Acts only while the data register is empty and the transmit interrupt
    /// is enabled. Pops the oldest buffered byte into the data register, or
    /// — when the buffer has drained — disables the transmit interrupt so an
    /// idle transmitter does not storm.
    pub fn service_transmit(&mut self) {
        if !self.tx_irq_enabled || !self.hw.transmit_ready() {
            return;
        }
        match self.tx.pop() {
            Some(byte) => self.hw.write_data(byte),
            None => {
                self.tx_irq_enabled = false;
                self.hw.set_transmit_interrupt(false);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Receive path (mainline consumer)
    // -----------------------------------------------------------------------

    /// Pops the oldest received byte, or `None` if the buffer is empty.
    ///
    /// Reopens the flow-control gate when the post-remove free space reaches
    /// the configured threshold.
    pub fn try_read(&mut self) -> Option<u8> {
        let byte = self.rx.pop()?;
        if self.gate == FlowState::Stop && self.rx.spare() >= self.config.flow_spare_threshold {
            self.set_gate(FlowState::Go);
        }
        Some(byte)
    }

    /// Pops the oldest received byte, spinning until one arrives.
    ///
    /// Unbounded and non-cancellable: the receive interrupt must deliver a
    /// byte for this to return. Callers needing a bounded wait must check a
    /// deadline around [`try_read`](Self::try_read) instead.
    pub fn read_blocking(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.try_read() {
                return byte;
            }
            self.hw.spin_wait();
        }
    }

    /// Returns `true` if at least one received byte is buffered.
    #[must_use]
    pub const fn data_available(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Receive service routine; call from the receive-interrupt trampoline.
    ///
    /// Classifies the event into exactly one case:
    ///
    /// 1. no pending flag — no-op;
    /// 2. hardware fault — recover the receiver, discard all buffered unread
    ///    bytes and force the gate open (an errored stream is treated as
    ///    unreliable: resynchronization wins over partial delivery);
    /// 3. data — read the byte, invoke the receive callback, commit the byte
    ///    unless the buffer is full (this context cannot block, so the
    ///    overflow policy here is drop-newest), then close the gate if free
    ///    space fell below the threshold.
    pub fn service_receive(&mut self) {
        if let Some(fault) = self.hw.receive_fault() {
            debug!("{fault}, resynchronizing receive path");
            self.hw.recover_receiver();
            self.rx.clear();
            self.set_gate(FlowState::Go);
            return;
        }
        if !self.hw.receive_pending() {
            return;
        }
        let byte = self.hw.read_data();
        if let Some(callback) = self.rx_callback {
            callback(byte);
        }
        if self.rx.try_push(byte).is_err() {
            trace!("receive buffer full, dropping 0x{byte:02x}");
        }
        if self.rx.spare() < self.config.flow_spare_threshold {
            self.set_gate(FlowState::Stop);
        }
    }

    // -----------------------------------------------------------------------
    // Flow-control gate
    // -----------------------------------------------------------------------

    /// Returns the current logical flow-control gate state.
    #[must_use]
    pub const fn flow_state(&self) -> FlowState {
        self.gate
    }

    fn set_gate(&mut self, state: FlowState) {
        if self.gate != state {
            trace!("flow gate -> {state}");
        }
        self.gate = state;
        self.hw.set_flow_signal(state);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Returns a shared reference to the hardware backend.
    #[must_use]
    pub const fn hardware(&self) -> &H {
        &self.hw
    }

    /// Returns the port configuration.
    #[must_use]
    pub const fn config(&self) -> &PortConfig {
        &self.config
    }
}

impl<H: UartHardware, const TX: usize, const RX: usize> fmt::Write for SerialPort<H, TX, RX> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write(b'\r');
            }
            self.write(byte);
        }
        Ok(())
    }
}
