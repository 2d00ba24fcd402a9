// SPDX-License-Identifier: MPL-2.0

//! Redirection of one legacy PIC interrupt line onto another.
//!
//! Some peripherals are wired to an IRQ line (the _source_) other than the one
//! their driver expects (the _target_). This crate provides the interrupt-time
//! logic of a resident shim that hides the mismatch:
//!
//! - [`RedirectHandler`] runs when the source line fires. It dispatches the
//!   handler chain that software installed for the target line, then mirrors
//!   any change the chain made to the target's mask bit onto the source's
//!   mask bit, and finally forwards the End-Of-Interrupt across the cascade
//!   when the source sits on the secondary controller and the target on the
//!   primary one.
//! - [`ResyncHandler`] runs on every timer tick. It chains to the previous
//!   tick handler and then forces the source's mask bit to follow the
//!   target's, repairing drift introduced behind the shim's back.
//!
//! Both handlers protect themselves against nested invocation with a
//! [`ReentrancyGuard`]. A nested invocation is dropped, not queued.
//!
//! All hardware access goes through the [`PicPorts`] and [`LocalIrq`]
//! traits, so the algorithms can be exercised on the host. A binding to the
//! real 8259 pair lives in the `legacy-pic` crate.
//!
//! # Example
//!
//! ```ignore
//! use irq_redirect::{IrqLine, RedirectHandler, RedirectionMapping};
//!
//! let mapping = RedirectionMapping::new(IrqLine::new(9)?, IrqLine::new(3)?)?;
//! let redirect = RedirectHandler::new(mapping, ports, irq, || raise_target_vector());
//!
//! // In the source line's interrupt entry:
//! redirect.handle();
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod config;
mod controller;
mod dispatch;
mod guard;
mod install;
mod line;
mod mask;
mod redirect;
mod resync;
mod stats;
#[cfg(test)]
mod test_util;

pub use self::{
    config::{ConfigError, RegistrationMode, ResidencyMode, ShimConfig},
    controller::{LocalIrq, PicPorts},
    dispatch::{Dispatch, RawHandler},
    guard::{GuardToken, ReentrancyGuard},
    install::{InstallError, Installer, VectorHost},
    line::{Controller, IrqLine, RedirectionMapping, Topology},
    mask::CombinedMask,
    redirect::{RedirectHandler, RedirectOutcome},
    resync::{ResyncHandler, ResyncOutcome},
    stats::{Stats, StatsSnapshot},
};
