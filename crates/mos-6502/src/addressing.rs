//! Addressing-mode resolution.
//!
//! Each mode is a pure function of the bytes following the opcode and the
//! X/Y registers. The resolver consumes the operand bytes (advancing PC),
//! leaves an [`OperandRef`] behind for the operation, records the branch
//! displacement for relative mode, and notes whether an indexed mode
//! crossed a page so read-class operations can charge the extra cycle.

use emu_core::Bus;

use crate::table::Mode;
use crate::{Mos6502, OperandRef};

impl Mos6502 {
    /// Read the byte at PC and advance past it.
    pub(crate) fn fetch_byte<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Read a little-endian word at PC and advance past it.
    pub(crate) fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let low = self.fetch_byte(bus);
        let high = self.fetch_byte(bus);
        u16::from_le_bytes([low, high])
    }

    /// Resolve the current instruction's operand reference.
    pub(crate) fn resolve_operand<B: Bus>(&mut self, bus: &mut B) {
        match self.instr.mode {
            Mode::Imp => self.operand = OperandRef::RegA,
            Mode::Imm => {
                // The literal byte itself is the operand.
                self.operand = OperandRef::Mem(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            Mode::Zp0 => {
                let addr = self.fetch_byte(bus);
                self.operand = OperandRef::Mem(u16::from(addr));
            }
            Mode::Zpx => {
                let base = self.fetch_byte(bus);
                self.operand = OperandRef::Mem(u16::from(base.wrapping_add(self.regs.x)));
            }
            Mode::Zpy => {
                let base = self.fetch_byte(bus);
                self.operand = OperandRef::Mem(u16::from(base.wrapping_add(self.regs.y)));
            }
            Mode::Rel => {
                self.branch_offset = self.fetch_byte(bus) as i8;
            }
            Mode::Abs => {
                let addr = self.fetch_word(bus);
                self.operand = OperandRef::Mem(addr);
            }
            Mode::Abx => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.regs.x));
                self.page_crossed = (base & 0xFF00) != (addr & 0xFF00);
                self.operand = OperandRef::Mem(addr);
            }
            Mode::Aby => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.regs.y));
                self.page_crossed = (base & 0xFF00) != (addr & 0xFF00);
                self.operand = OperandRef::Mem(addr);
            }
            Mode::Ind => {
                let ptr = self.fetch_word(bus);
                let low = bus.read(ptr);
                // Hardware bug: a pointer ending in $FF fetches its high
                // byte from the start of the same page, not the next one.
                let high_addr = if ptr & 0x00FF == 0x00FF {
                    ptr & 0xFF00
                } else {
                    ptr.wrapping_add(1)
                };
                let high = bus.read(high_addr);
                self.operand = OperandRef::Mem(u16::from_le_bytes([low, high]));
            }
            Mode::Izx => {
                let ptr = self.fetch_byte(bus).wrapping_add(self.regs.x);
                let low = bus.read(u16::from(ptr));
                let high = bus.read(u16::from(ptr.wrapping_add(1)));
                self.operand = OperandRef::Mem(u16::from_le_bytes([low, high]));
            }
            Mode::Izy => {
                let ptr = self.fetch_byte(bus);
                let low = bus.read(u16::from(ptr));
                let high = bus.read(u16::from(ptr.wrapping_add(1)));
                let base = u16::from_le_bytes([low, high]);
                let addr = base.wrapping_add(u16::from(self.regs.y));
                self.page_crossed = (base & 0xFF00) != (addr & 0xFF00);
                self.operand = OperandRef::Mem(addr);
            }
        }
    }
}
