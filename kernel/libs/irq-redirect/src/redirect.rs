// SPDX-License-Identifier: MPL-2.0

//! The handler installed at the source line's vector.

use log::trace;

use crate::{
    controller::{LocalIrq, PicPorts},
    dispatch::Dispatch,
    guard::ReentrancyGuard,
    line::{Controller, RedirectionMapping},
    mask::CombinedMask,
    stats::Stats,
};

/// What one invocation of [`RedirectHandler::handle`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The handler was already running; nothing was done.
    Dropped,
    /// The target's handler chain ran.
    Completed {
        /// The mask written back, if the chain changed the mask.
        mirrored: Option<CombinedMask>,
        /// Whether End-Of-Interrupt was forwarded to both controllers.
        cascade_eoi: bool,
    },
}

/// Services a hardware interrupt on the source line as if it had arrived on
/// the target line.
///
/// Software believes its device sits on the target line, so it masks and
/// unmasks the target line. The hardware only ever fires on the source line.
/// After running the target's handler chain, this handler therefore copies
/// any mask change the chain made to the target line onto the source line:
/// masking the target quiesces the device, unmasking it wakes the device up.
pub struct RedirectHandler<P, L, D> {
    mapping: RedirectionMapping,
    ports: P,
    irq: L,
    target: D,
    guard: ReentrancyGuard,
    stats: Stats,
}

impl<P: PicPorts, L: LocalIrq, D: Dispatch> RedirectHandler<P, L, D> {
    /// Creates a redirect handler.
    ///
    /// `target` must dispatch the handler chain installed at the target
    /// line's vector.
    pub const fn new(mapping: RedirectionMapping, ports: P, irq: L, target: D) -> Self {
        Self {
            mapping,
            ports,
            irq,
            target,
            guard: ReentrancyGuard::new(),
            stats: Stats::new(),
        }
    }

    /// Handles one interrupt on the source line.
    pub fn handle(&self) -> RedirectOutcome {
        let Some(_token) = self.guard.try_enter() else {
            self.stats.count_redirect_dropped();
            trace!(
                "[irq-redirect]: dropped nested interrupt on IRQ {}",
                self.mapping.source().number()
            );
            return RedirectOutcome::Dropped;
        };

        let before = CombinedMask::read(&self.ports);
        self.target.dispatch();

        // The chain may have masked or unmasked its own line. Nothing may
        // touch the mask between reading it back and writing the mirror.
        let mirrored = self.irq.without_interrupts(|| {
            let after = CombinedMask::read(&self.ports);
            if after == before {
                return None;
            }
            let mirrored = after.mirrored(self.mapping.target(), self.mapping.source());
            mirrored.write(&self.ports);
            Some(mirrored)
        });
        if mirrored.is_some() {
            self.stats.count_mask_mirrored();
        }

        // A chain entered through a software interrupt never acknowledges the
        // secondary controller, so a source line behind the cascade would stay
        // in service forever.
        let cascade_eoi = self.mapping.crosses_to_primary();
        if cascade_eoi {
            self.ports.send_eoi(Controller::Secondary);
            self.ports.send_eoi(Controller::Primary);
            self.stats.count_cascade_eoi();
        }

        self.stats.count_redirect();
        RedirectOutcome::Completed {
            mirrored,
            cascade_eoi,
        }
    }

    /// Returns the mapping this handler serves.
    pub fn mapping(&self) -> RedirectionMapping {
        self.mapping
    }

    /// Returns the handler's reentrancy guard.
    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    /// Returns the handler's counters.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}
