// SPDX-License-Identifier: MPL-2.0

use irq_redirect::LocalIrq;
use x86_64::instructions::interrupts;

/// The interrupt flag (`RFLAGS.IF`) of the current CPU.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuIrq;

impl LocalIrq for CpuIrq {
    fn without_interrupts<R, F: FnOnce() -> R>(&self, f: F) -> R {
        interrupts::without_interrupts(f)
    }
}
