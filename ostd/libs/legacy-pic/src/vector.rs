// SPDX-License-Identifier: MPL-2.0

use core::arch::asm;

use irq_redirect::Dispatch;

use crate::config::{CONFIG, TOPOLOGY, line_vector};

/// The vector the target line is delivered on.
pub const TARGET_VECTOR: u8 = line_vector(CONFIG.mapping().target(), &TOPOLOGY);

/// Runs the handler chain installed at [`TARGET_VECTOR`] by raising a
/// software interrupt.
///
/// The chain runs exactly as if the hardware had delivered the target line,
/// except that no controller has the line in service.
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetInterrupt;

impl Dispatch for TargetInterrupt {
    fn dispatch(&self) {
        // SAFETY: `TARGET_VECTOR` is a hardware IRQ vector. Its handler chain
        // is written to be entered through an interrupt gate and returns with
        // `iret`, preserving every register.
        unsafe { asm!("int {vector}", vector = const TARGET_VECTOR) }
    }
}
