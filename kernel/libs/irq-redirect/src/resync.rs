// SPDX-License-Identifier: MPL-2.0

//! The handler installed at the timer tick's vector.

use log::trace;

use crate::{
    controller::{LocalIrq, PicPorts},
    dispatch::Dispatch,
    guard::ReentrancyGuard,
    line::RedirectionMapping,
    mask::CombinedMask,
    stats::Stats,
};

/// What one invocation of [`ResyncHandler::handle`] did after chaining.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResyncOutcome {
    /// The handler was already running; the resync was skipped.
    Skipped,
    /// The source line already followed the target line.
    InSync,
    /// The target line was masked behind the shim's back; the source line
    /// has been masked too.
    Masked,
    /// The target line was unmasked behind the shim's back; the source line
    /// has been unmasked too.
    Unmasked,
}

/// Periodically forces the source line's mask bit to follow the target's.
///
/// The redirect handler only notices mask changes made by the target's
/// handler chain. Anything else that toggles the target line, without the
/// source line ever firing, leaves the two bits out of step until the next
/// tick repairs it here.
///
/// Every tick pays for two mask register reads and a guard check. The reads
/// and any corrective write form one interrupts-disabled section.
pub struct ResyncHandler<P, L, D> {
    mapping: RedirectionMapping,
    ports: P,
    irq: L,
    previous: D,
    guard: ReentrancyGuard,
    stats: Stats,
}

impl<P: PicPorts, L: LocalIrq, D: Dispatch> ResyncHandler<P, L, D> {
    /// Creates a resync handler.
    ///
    /// `previous` is the tick handler that was installed before this one; it
    /// keeps running on every tick.
    pub const fn new(mapping: RedirectionMapping, ports: P, irq: L, previous: D) -> Self {
        Self {
            mapping,
            ports,
            irq,
            previous,
            guard: ReentrancyGuard::new(),
            stats: Stats::new(),
        }
    }

    /// Handles one timer tick.
    pub fn handle(&self) -> ResyncOutcome {
        // Existing periodic services come first, and are never skipped.
        self.irq.without_interrupts(|| self.previous.dispatch());
        self.stats.count_tick();

        let Some(_token) = self.guard.try_enter() else {
            self.stats.count_tick_skipped();
            trace!("[irq-redirect]: skipped a nested resync tick");
            return ResyncOutcome::Skipped;
        };

        let source = self.mapping.source();
        let target = self.mapping.target();

        let outcome = self.irq.without_interrupts(|| {
            let mask = CombinedMask::read(&self.ports);
            let outcome = match (mask.is_masked(target), mask.is_masked(source)) {
                (true, false) => ResyncOutcome::Masked,
                (false, true) => ResyncOutcome::Unmasked,
                _ => return ResyncOutcome::InSync,
            };
            mask.mirrored(target, source).write(&self.ports);
            outcome
        });
        if outcome != ResyncOutcome::InSync {
            self.stats.count_correction();
        }

        outcome
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
