//! Interrupt-driven buffered UART driver core.
//!
//! Provides a [`SerialPort`] type that pairs two fixed-capacity circular
//! buffers with the interrupt service routines that drain/fill them, plus a
//! CTS-style flow-control gate tied to receive-buffer occupancy. Hardware
//! access goes through the [`UartHardware`] trait; register-level backends
//! for the two supported USART peripheral generations live in [`regs`].
//!
//! # Execution model
//!
//! The driver targets a single execution context with two interrupt sources:
//! mainline code calls the public operations, interrupt trampolines call
//! [`SerialPort::service_transmit`] and [`SerialPort::service_receive`].
//! Each circular buffer is strictly single-producer/single-consumer between
//! those two contexts. Every operation takes `&mut self`; on a preemptible
//! or multi-core target the caller must serialize access externally (e.g.,
//! a critical-section mutex), the driver itself carries no locks.
//!
//! # Flow control
//!
//! The receive service routine closes the gate when post-insert free space
//! drops below the configured threshold; the mainline read path reopens it
//! when post-remove free space reaches the threshold again. The gate is
//! mirrored to hardware through [`UartHardware::set_flow_signal`], which
//! defaults to a no-op for builds without a flow-control line.

#![no_std]

#[cfg(test)]
extern crate std;

#[macro_use]
mod log;

mod config;
mod fault;
mod flow;
mod hal;
mod port;
pub mod regs;

pub use config::{
    DEFAULT_FLOW_SPARE_THRESHOLD, DEFAULT_RX_CAPACITY, DEFAULT_TX_CAPACITY, OverflowPolicy,
    PortConfig,
};
pub use fault::ReceiveFault;
pub use flow::FlowState;
pub use hal::UartHardware;
pub use port::{DISCARDED, SerialPort};
