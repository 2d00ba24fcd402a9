// SPDX-License-Identifier: MPL-2.0

use irq_redirect::{Controller, PicPorts};
use x86_64::instructions::port::{Port, PortWriteOnly};

const PRIMARY_CMD: u16 = 0x20;
const PRIMARY_DATA: u16 = 0x21;
const SECONDARY_CMD: u16 = 0xA0;
const SECONDARY_DATA: u16 = 0xA1;

/// Non-specific End-Of-Interrupt (OCW2).
const EOI: u8 = 0x20;

/// The cascaded 8259 Programmable Interrupt Controller pair of a PC/AT.
///
/// Writing to the command port issues OCW2 and OCW3, and the data port holds
/// the interrupt mask register (OCW1) once the controllers are initialized.
/// The pair is expected to be initialized already, in the BIOS layout.
pub struct Pic8259 {
    _private: (),
}

impl Pic8259 {
    /// Creates a handle to the controller pair.
    ///
    /// # Safety
    ///
    /// Port I/O on the 8259 pair is a privileged operation. The caller must
    /// make sure that nothing else reprograms the controllers (ICW1-ICW4)
    /// while the handle is in use.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    const fn data_port(controller: Controller) -> u16 {
        match controller {
            Controller::Primary => PRIMARY_DATA,
            Controller::Secondary => SECONDARY_DATA,
        }
    }

    const fn cmd_port(controller: Controller) -> u16 {
        match controller {
            Controller::Primary => PRIMARY_CMD,
            Controller::Secondary => SECONDARY_CMD,
        }
    }
}

impl PicPorts for Pic8259 {
    fn read_mask(&self, controller: Controller) -> u8 {
        let mut port = Port::<u8>::new(Self::data_port(controller));
        // SAFETY: Reading the data port of an initialized 8259 returns its
        // interrupt mask register and has no side effects.
        unsafe { port.read() }
    }

    fn write_mask(&self, controller: Controller, mask: u8) {
        let mut port = Port::<u8>::new(Self::data_port(controller));
        // SAFETY: Writing the data port of an initialized 8259 sets its
        // interrupt mask register, which only gates interrupt delivery.
        unsafe { port.write(mask) }
    }

    fn send_eoi(&self, controller: Controller) {
        let mut port = PortWriteOnly::<u8>::new(Self::cmd_port(controller));
        // SAFETY: A non-specific EOI only clears the highest-priority bit of
        // the in-service register, which the interrupt being served owns.
        unsafe { port.write(EOI) }
    }
}
