// SPDX-License-Identifier: MPL-2.0

//! The PC/AT binding of the IRQ redirection shim.
//!
//! This crate wires the interrupt-time logic of `irq-redirect` to the real
//! hardware: the cascaded 8259 pair behind ports 0x20/0x21 and 0xA0/0xA1,
//! the CPU interrupt flag, and the `int` instruction used to enter the
//! target line's handler chain.
//!
//! The redirection is selected when the crate is built (see [`CONFIG`]) and
//! installed once with [`install`].

#![cfg_attr(not(test), no_std)]
#![cfg(target_arch = "x86_64")]

mod config;
mod irq;
mod pic;
mod shim;
mod vector;

pub use self::{
    config::{CONFIG, TOPOLOGY},
    irq::CpuIrq,
    pic::Pic8259,
    shim::{install, redirect_stats, resync_stats},
    vector::{TARGET_VECTOR, TargetInterrupt},
};
