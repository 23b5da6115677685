//! The decoded target of an instruction's data access.

use emu_core::Bus;

use crate::Registers;

/// Where the current instruction's operand lives.
///
/// Resolved by the addressing mode before the operation runs. Shift,
/// rotate and increment/decrement operations go through this one
/// reference whether they target memory or the accumulator, so they need
/// a single code path for both.
///
/// `Mem` carries an address, never a cached pointer: every dereference
/// goes back through the bus, so writes between dereferences stay
/// coherent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandRef {
    /// Operand is the byte at a memory address.
    Mem(u16),
    /// Operand is the accumulator itself.
    RegA,
}

impl OperandRef {
    /// Read the operand.
    pub fn read<B: Bus>(self, regs: &Registers, bus: &mut B) -> u8 {
        match self {
            Self::Mem(addr) => bus.read(addr),
            Self::RegA => regs.a,
        }
    }

    /// Write the operand. Memory writes may be dropped by the bus;
    /// accumulator writes always land.
    pub fn write<B: Bus>(self, regs: &mut Registers, bus: &mut B, value: u8) -> bool {
        match self {
            Self::Mem(addr) => bus.write(addr, value),
            Self::RegA => {
                regs.a = value;
                true
            }
        }
    }

    /// The reference one byte further on. Addresses wrap at $FFFF; the
    /// accumulator is not incrementable, so `RegA` stays put.
    #[must_use]
    pub const fn advanced(self) -> Self {
        match self {
            Self::Mem(addr) => Self::Mem(addr.wrapping_add(1)),
            Self::RegA => Self::RegA,
        }
    }
}
