// SPDX-License-Identifier: MPL-2.0

//! A software model of the controller pair and the CPU interrupt flag.

use core::cell::{Cell, RefCell};

use crate::{
    controller::{LocalIrq, PicPorts},
    line::{Controller, IrqLine},
    mask::CombinedMask,
};

/// Something the handlers did to the machine, in program order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    ReadMask(Controller),
    WriteMask {
        controller: Controller,
        value: u8,
        irqs_enabled: bool,
    },
    Eoi(Controller),
    /// A handler chain ran; `irqs_enabled` is the interrupt flag at that time.
    Dispatch {
        name: &'static str,
        irqs_enabled: bool,
    },
}

pub(crate) struct MockMachine {
    masks: Cell<[u8; 2]>,
    irqs_enabled: Cell<bool>,
    events: RefCell<Vec<Event>>,
    /// An interrupt that arrives during the next secondary mask read.
    armed_isr: Cell<Option<IrqLine>>,
    /// An interrupt held off until interrupts are enabled again.
    pending_isr: Cell<Option<IrqLine>>,
}

impl MockMachine {
    pub(crate) fn new(mask: CombinedMask) -> Self {
        Self {
            masks: Cell::new(mask.to_bytes()),
            irqs_enabled: Cell::new(true),
            events: RefCell::new(Vec::new()),
            armed_isr: Cell::new(None),
            pending_isr: Cell::new(None),
        }
    }

    /// Leaks a machine so handlers and closures can share it for `'static`.
    pub(crate) fn leak(mask: CombinedMask) -> &'static Self {
        Box::leak(Box::new(Self::new(mask)))
    }

    /// Returns the current mask without recording a register access.
    pub(crate) fn mask(&self) -> CombinedMask {
        let [primary, secondary] = self.masks.get();
        CombinedMask::from_bytes(primary, secondary)
    }

    /// Changes the mask behind the handlers' backs, as a third party would.
    pub(crate) fn poke_mask(&self, mask: CombinedMask) {
        self.masks.set(mask.to_bytes());
    }

    /// Masks or unmasks `line` through the ports, as a driver would.
    pub(crate) fn set_line_masked(&self, line: IrqLine, masked: bool) {
        let controller = line.controller();
        let mut value = self.read_mask(controller);
        if masked {
            value |= 1 << line.bit();
        } else {
            value &= !(1 << line.bit());
        }
        self.write_mask(controller, value);
    }

    /// Arranges for an unrelated interrupt to arrive while the next combined
    /// mask read is in progress. Its handler masks `line` through the ports.
    ///
    /// If interrupts are disabled at that moment, the handler runs as soon as
    /// they are enabled again.
    pub(crate) fn interrupt_during_next_read(&self, line: IrqLine) {
        self.armed_isr.set(Some(line));
    }

    fn run_isr(&self, line: IrqLine) {
        self.set_line_masked(line, true);
    }

    pub(crate) fn irqs_enabled(&self) -> bool {
        self.irqs_enabled.get()
    }

    pub(crate) fn record_dispatch(&self, name: &'static str) {
        self.record(Event::Dispatch {
            name,
            irqs_enabled: self.irqs_enabled(),
        });
    }

    pub(crate) fn take_events(&self) -> Vec<Event> {
        self.events.take()
    }

    /// Returns whether any register access (mask read or write, EOI) was
    /// recorded.
    pub(crate) fn touched_registers(&self) -> bool {
        self.events
            .borrow()
            .iter()
            .any(|event| !matches!(event, Event::Dispatch { .. }))
    }

    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl PicPorts for MockMachine {
    fn read_mask(&self, controller: Controller) -> u8 {
        self.record(Event::ReadMask(controller));
        let value = self.masks.get()[controller.index()];

        if controller == Controller::Secondary {
            match self.armed_isr.take() {
                Some(line) if self.irqs_enabled() => self.run_isr(line),
                Some(line) => self.pending_isr.set(Some(line)),
                None => {}
            }
        }

        value
    }

    fn write_mask(&self, controller: Controller, mask: u8) {
        self.record(Event::WriteMask {
            controller,
            value: mask,
            irqs_enabled: self.irqs_enabled(),
        });
        let mut masks = self.masks.get();
        masks[controller.index()] = mask;
        self.masks.set(masks);
    }

    fn send_eoi(&self, controller: Controller) {
        self.record(Event::Eoi(controller));
    }
}

impl LocalIrq for MockMachine {
    fn without_interrupts<R, F: FnOnce() -> R>(&self, f: F) -> R {
        let was_enabled = self.irqs_enabled.replace(false);
        let result = f();
        self.irqs_enabled.set(was_enabled);

        if was_enabled {
            if let Some(line) = self.pending_isr.take() {
                self.run_isr(line);
            }
        }
        result
    }
}
