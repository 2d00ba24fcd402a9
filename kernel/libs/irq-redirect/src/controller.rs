// SPDX-License-Identifier: MPL-2.0

//! The hardware capabilities the handlers consume.

use crate::line::Controller;

/// Access to the registers of the cascaded interrupt controller pair.
///
/// Implementations are bound to fixed, platform-defined I/O ports. Register
/// accesses never fail from the software's point of view.
pub trait PicPorts {
    /// Reads the mask register of `controller` (bit set = line masked).
    fn read_mask(&self, controller: Controller) -> u8;

    /// Writes the mask register of `controller`.
    fn write_mask(&self, controller: Controller, mask: u8);

    /// Issues a non-specific End-Of-Interrupt to `controller`.
    fn send_eoi(&self, controller: Controller);
}

impl<P: PicPorts + ?Sized> PicPorts for &P {
    fn read_mask(&self, controller: Controller) -> u8 {
        (**self).read_mask(controller)
    }

    fn write_mask(&self, controller: Controller, mask: u8) {
        (**self).write_mask(controller, mask)
    }

    fn send_eoi(&self, controller: Controller) {
        (**self).send_eoi(controller)
    }
}

/// Control over maskable interrupts on the local (and only) CPU.
pub trait LocalIrq {
    /// Runs `f` with maskable interrupts disabled, then restores the
    /// interrupt flag to what it was before the call.
    ///
    /// Nested calls are fine: only the outermost one re-enables interrupts.
    fn without_interrupts<R, F: FnOnce() -> R>(&self, f: F) -> R;
}

impl<L: LocalIrq + ?Sized> LocalIrq for &L {
    fn without_interrupts<R, F: FnOnce() -> R>(&self, f: F) -> R {
        (**self).without_interrupts(f)
    }
}
