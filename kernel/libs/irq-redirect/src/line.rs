// SPDX-License-Identifier: MPL-2.0

//! IRQ lines of the cascaded 8259 pair and the fixed topology they live in.

use crate::config::ConfigError;

/// One of the two cascaded interrupt controllers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Controller {
    /// The primary (master) controller, serving IRQ 0-7.
    Primary = 0,
    /// The secondary (slave) controller, serving IRQ 8-15.
    ///
    /// Its output is cascaded into IRQ 2 of the primary controller.
    Secondary = 1,
}

impl Controller {
    /// Both controllers, in the order their mask registers are accessed.
    pub const ALL: [Controller; 2] = [Controller::Primary, Controller::Secondary];

    /// Returns the index of the controller (0 for primary, 1 for secondary).
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A hardware interrupt line, numbered 0 to 15.
///
/// Every other property of the line is a pure function of its number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IrqLine {
    number: u8,
}

impl IrqLine {
    /// The number of lines served by the cascaded controller pair.
    pub const NR_LINES: u8 = 16;

    /// The number of lines served by a single controller.
    const LINES_PER_CONTROLLER: u8 = 8;

    /// Creates an IRQ line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LineOutOfRange`] if `number` is not below 16.
    pub const fn new(number: u8) -> Result<Self, ConfigError> {
        if number >= Self::NR_LINES {
            return Err(ConfigError::LineOutOfRange(number));
        }
        Ok(Self { number })
    }

    /// Returns the line number.
    pub const fn number(&self) -> u8 {
        self.number
    }

    /// Returns the controller that serves this line.
    pub const fn controller(&self) -> Controller {
        if self.number < Self::LINES_PER_CONTROLLER {
            Controller::Primary
        } else {
            Controller::Secondary
        }
    }

    /// Returns the bit position of this line in its controller's mask register.
    pub const fn bit(&self) -> u8 {
        self.number % Self::LINES_PER_CONTROLLER
    }

    /// Returns the bit of this line in a [`CombinedMask`](crate::CombinedMask).
    pub const fn mask_bit(&self) -> u16 {
        1 << self.number
    }

    /// Returns the interrupt vector of this line in the BIOS layout.
    pub const fn vector(&self) -> u8 {
        match self.controller() {
            Controller::Primary => Topology::PC_AT.primary_vector_base + self.bit(),
            Controller::Secondary => Topology::BIOS_SECONDARY_VECTOR_BASE + self.bit(),
        }
    }

    /// Returns the interrupt vector of this line in the given topology.
    ///
    /// Returns `None` if the line lives on a secondary controller that the
    /// topology does not have.
    pub const fn vector_in(&self, topology: &Topology) -> Option<u8> {
        match self.controller() {
            Controller::Primary => Some(topology.primary_vector_base + self.bit()),
            Controller::Secondary => match topology.secondary_vector_base {
                Some(base) => Some(base + self.bit()),
                None => None,
            },
        }
    }
}

/// The platform's interrupt-controller topology.
///
/// It is fixed at build time and never changes while the shim is resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Topology {
    /// The vector that IRQ 0 is delivered on.
    pub primary_vector_base: u8,
    /// The vector that IRQ 8 is delivered on, if a secondary controller exists.
    pub secondary_vector_base: Option<u8>,
}

impl Topology {
    const BIOS_SECONDARY_VECTOR_BASE: u8 = 0x70;

    /// An AT-class machine: two cascaded controllers in the BIOS vector layout.
    pub const PC_AT: Topology = Topology {
        primary_vector_base: 0x08,
        secondary_vector_base: Some(Self::BIOS_SECONDARY_VECTOR_BASE),
    };

    /// An XT-class machine: a single controller, no IRQ 8-15.
    pub const PC_XT: Topology = Topology {
        primary_vector_base: 0x08,
        secondary_vector_base: None,
    };

    /// Returns whether the platform has a secondary controller.
    pub const fn has_secondary(&self) -> bool {
        self.secondary_vector_base.is_some()
    }

    /// Returns the vector of the periodic timer tick (IRQ 0).
    pub const fn timer_vector(&self) -> u8 {
        self.primary_vector_base
    }
}

/// The fixed association between the line the hardware fires on (the source)
/// and the line software expects (the target).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedirectionMapping {
    source: IrqLine,
    target: IrqLine,
}

impl RedirectionMapping {
    /// Creates a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SameLine`] if both lines are the same.
    pub const fn new(source: IrqLine, target: IrqLine) -> Result<Self, ConfigError> {
        if source.number == target.number {
            return Err(ConfigError::SameLine(source.number));
        }
        Ok(Self { source, target })
    }

    /// Returns the line the hardware actually fires on.
    pub const fn source(&self) -> IrqLine {
        self.source
    }

    /// Returns the line software expects the device on.
    pub const fn target(&self) -> IrqLine {
        self.target
    }

    /// Returns whether the redirection crosses from the secondary controller
    /// to the primary one.
    ///
    /// In that case the target's handler chain only acknowledges the primary
    /// controller, so the shim has to end the interrupt on both controllers
    /// itself.
    pub const fn crosses_to_primary(&self) -> bool {
        matches!(self.source.controller(), Controller::Secondary)
            && matches!(self.target.controller(), Controller::Primary)
    }
}
