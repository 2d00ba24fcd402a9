// SPDX-License-Identifier: MPL-2.0

use core::fmt;

use bit_field::BitField;

use crate::{
    controller::PicPorts,
    line::{Controller, IrqLine},
};

/// The mask state of all 16 lines, as one value.
///
/// Bit `n` is set if and only if IRQ `n` is masked. The low byte mirrors the
/// primary controller's mask register and the high byte the secondary's.
///
/// A `CombinedMask` is only ever a snapshot. The hardware may change under it,
/// so it is re-read whenever an operation needs the current state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CombinedMask(u16);

impl CombinedMask {
    /// Every line masked.
    pub const ALL_MASKED: CombinedMask = CombinedMask(u16::MAX);

    /// Every line unmasked.
    pub const ALL_UNMASKED: CombinedMask = CombinedMask(0);

    /// Creates a mask from its raw bits.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Creates a mask from the primary and secondary register values.
    pub const fn from_bytes(primary: u8, secondary: u8) -> Self {
        Self(u16::from_le_bytes([primary, secondary]))
    }

    /// Returns the raw bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns the primary and secondary register values.
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// Reads both mask registers, primary first.
    pub fn read<P: PicPorts>(ports: &P) -> Self {
        let [primary, secondary] = Controller::ALL.map(|controller| ports.read_mask(controller));
        Self::from_bytes(primary, secondary)
    }

    /// Writes both mask registers, primary first.
    ///
    /// The caller should keep interrupts disabled across the call, so that no
    /// interrupt handler observes one register updated and the other not.
    pub fn write<P: PicPorts>(self, ports: &P) {
        for (controller, value) in Controller::ALL.into_iter().zip(self.to_bytes()) {
            ports.write_mask(controller, value);
        }
    }

    /// Returns whether `line` is masked.
    pub fn is_masked(self, line: IrqLine) -> bool {
        self.0.get_bit(line.number() as usize)
    }

    /// Returns a copy with `line` masked or unmasked.
    #[must_use]
    pub fn with_masked(mut self, line: IrqLine, masked: bool) -> Self {
        self.0.set_bit(line.number() as usize, masked);
        self
    }

    /// Returns a copy in which `onto` has the same mask state as `from`.
    ///
    /// Every other bit is left as it is.
    #[must_use]
    pub fn mirrored(self, from: IrqLine, onto: IrqLine) -> Self {
        self.with_masked(onto, self.is_masked(from))
    }
}

impl fmt::Debug for CombinedMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombinedMask({:#018b})", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::{Event, MockMachine};

    fn line(number: u8) -> IrqLine {
        IrqLine::new(number).unwrap()
    }

    #[test]
    fn byte_layout() {
        let mask = CombinedMask::from_bytes(0b1000_0001, 0b0000_0010);
        assert_eq!(mask.bits(), 0b0000_0010_1000_0001);
        assert_eq!(mask.to_bytes(), [0b1000_0001, 0b0000_0010]);
        assert!(mask.is_masked(line(0)));
        assert!(mask.is_masked(line(7)));
        assert!(mask.is_masked(line(9)));
        assert!(!mask.is_masked(line(8)));
        assert!(!mask.is_masked(line(1)));
    }

    #[test]
    fn with_masked_touches_one_bit() {
        let mask = CombinedMask::from_bits(0xA5A5);
        for number in 0..IrqLine::NR_LINES {
            let line = line(number);
            for masked in [false, true] {
                let changed = mask.with_masked(line, masked);
                assert_eq!(changed.is_masked(line), masked);
                assert_eq!(changed.bits() & !line.mask_bit(), mask.bits() & !line.mask_bit());
            }
        }
    }

    #[test]
    fn mirror_copies_the_source_bit_only() {
        let masked_target = CombinedMask::from_bits(0).with_masked(line(3), true);
        let mirrored = masked_target.mirrored(line(3), line(9));
        assert_eq!(mirrored.bits(), line(3).mask_bit() | line(9).mask_bit());

        let unmasked_target = CombinedMask::ALL_MASKED.with_masked(line(3), false);
        let mirrored = unmasked_target.mirrored(line(3), line(9));
        assert_eq!(
            mirrored.bits(),
            !(line(3).mask_bit() | line(9).mask_bit())
        );
    }

    #[test]
    fn register_access_order() {
        let machine = MockMachine::new(CombinedMask::from_bytes(0x12, 0x34));

        let mask = CombinedMask::read(&machine);
        assert_eq!(mask, CombinedMask::from_bytes(0x12, 0x34));

        CombinedMask::from_bytes(0xAB, 0xCD).write(&machine);
        assert_eq!(
            machine.take_events(),
            [
                Event::ReadMask(Controller::Primary),
                Event::ReadMask(Controller::Secondary),
                Event::WriteMask {
                    controller: Controller::Primary,
                    value: 0xAB,
                    irqs_enabled: true,
                },
                Event::WriteMask {
                    controller: Controller::Secondary,
                    value: 0xCD,
                    irqs_enabled: true,
                },
            ]
        );
        assert_eq!(machine.mask(), CombinedMask::from_bytes(0xAB, 0xCD));
    }

    #[test]
    fn debug_format() {
        assert_eq!(
            format!("{:?}", CombinedMask::from_bits(0x0208)),
            "CombinedMask(0b0000001000001000)"
        );
    }
}
