//! The fetch/decode/execute state machine.

use std::io;

use emu_core::{Bus, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};

use crate::flags::{C, D, I, N, V, Z};
use crate::table::{Instruction, Op, INSTRUCTION_TABLE};
use crate::{OperandRef, Registers};

/// The MOS 6502 CPU.
///
/// One [`Mos6502::run_cycle`] call advances one clock. The first cycle of
/// an instruction fetches the opcode, resolves the addressing mode and
/// arms a countdown of the decode table's base cycle count; the
/// operation's side effects land atomically on the cycle the countdown
/// strikes zero, possibly stretching the countdown with branch-taken and
/// page-crossing penalties.
///
/// The CPU never owns its bus: every entry point borrows one for the call,
/// so a host can share the bus with other chips between calls.
#[derive(Debug)]
pub struct Mos6502 {
    /// Architectural registers.
    pub regs: Registers,

    /// Opcode byte of the instruction in flight.
    opcode: u8,

    /// Decoded descriptor for the instruction in flight.
    pub(crate) instr: &'static Instruction,

    /// Clocks left before the current instruction retires.
    cycles_left: u8,

    /// True while the in-flight instruction's operation has not run yet.
    op_pending: bool,

    /// Operand reference resolved by the addressing mode.
    pub(crate) operand: OperandRef,

    /// Signed displacement resolved by relative mode.
    pub(crate) branch_offset: i8,

    /// Whether the indexed addressing mode crossed a page boundary.
    pub(crate) page_crossed: bool,

    /// Clocks elapsed since construction.
    total_cycles: u64,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    /// Create a CPU with power-on register values and no instruction in
    /// flight. Call [`Mos6502::reset`] to load PC from the reset vector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            opcode: 0xEA,
            instr: &INSTRUCTION_TABLE[0xEA],
            cycles_left: 0,
            op_pending: false,
            operand: OperandRef::RegA,
            branch_offset: 0,
            page_crossed: false,
            total_cycles: 0,
        }
    }

    /// Advance one clock cycle.
    pub fn run_cycle<B: Bus>(&mut self, bus: &mut B) {
        self.total_cycles += 1;

        if self.cycles_left == 0 {
            self.fetch(bus);
        }

        self.cycles_left -= 1;
        if self.cycles_left == 0 && self.op_pending {
            self.op_pending = false;
            self.execute(bus);
        }
    }

    /// Advance until the instruction in flight (or, when idle, the next
    /// one) has fully executed. Returns the clock cycles consumed.
    pub fn run_instruction<B: Bus>(&mut self, bus: &mut B) -> u64 {
        let start = self.total_cycles;
        loop {
            self.run_cycle(bus);
            if self.instruction_complete() {
                break;
            }
        }
        self.total_cycles - start
    }

    /// True when no instruction (or interrupt entry) is in flight.
    #[must_use]
    pub fn instruction_complete(&self) -> bool {
        self.cycles_left == 0 && !self.op_pending
    }

    /// Snapshot the architectural state.
    #[must_use]
    pub fn state(&self) -> Registers {
        self.regs
    }

    /// Restore an architectural state snapshot.
    ///
    /// Does not disturb an in-flight decode; callers restore state at
    /// instruction boundaries.
    pub fn set_state(&mut self, state: Registers) {
        self.regs = state;
    }

    /// Clocks elapsed since construction.
    #[must_use]
    pub fn cycles_elapsed(&self) -> u64 {
        self.total_cycles
    }

    /// Opcode byte of the most recently fetched instruction.
    #[must_use]
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Power-on / reset entry: registers to their reset values, PC from
    /// the $FFFC/$FFFD vector, 8 cycles charged through the countdown.
    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.regs = Registers::new();
        self.regs.pc = self.read_word(bus, RESET_VECTOR);

        self.opcode = 0xEA;
        self.instr = &INSTRUCTION_TABLE[0xEA];
        self.operand = OperandRef::RegA;
        self.branch_offset = 0;
        self.page_crossed = false;
        self.op_pending = false;
        self.cycles_left = 8;
    }

    /// Maskable interrupt entry. Refused while I is set; otherwise pushes
    /// PC and status (B clear in the pushed byte), sets I, and vectors
    /// through $FFFE/$FFFF. Costs 7 cycles.
    pub fn irq<B: Bus>(&mut self, bus: &mut B) {
        if self.regs.p.is_set(I) {
            return;
        }
        self.interrupt(bus, IRQ_VECTOR);
    }

    /// Non-maskable interrupt entry: as IRQ, through $FFFA/$FFFB.
    pub fn nmi<B: Bus>(&mut self, bus: &mut B) {
        self.interrupt(bus, NMI_VECTOR);
    }

    /// Write one line of machine state for debugging.
    pub fn dump_state<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "PC=${:04X} SP=${:02X} A=${:02X} X=${:02X} Y=${:02X} P={:08b} CYC={}",
            self.regs.pc,
            self.regs.s,
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.regs.p.0,
            self.total_cycles
        )
    }

    // ========================================================================
    // Fetch/decode
    // ========================================================================

    fn fetch<B: Bus>(&mut self, bus: &mut B) {
        self.opcode = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.instr = &INSTRUCTION_TABLE[self.opcode as usize];

        self.operand = OperandRef::RegA;
        self.branch_offset = 0;
        self.page_crossed = false;

        self.resolve_operand(bus);
        self.cycles_left = self.instr.cycles;
        self.op_pending = true;
    }

    fn interrupt<B: Bus>(&mut self, bus: &mut B, vector: u16) {
        self.push(bus, (self.regs.pc >> 8) as u8);
        self.push(bus, self.regs.pc as u8);
        self.push(bus, self.regs.p.to_byte_pushed(false));
        self.regs.p.set(I);
        self.regs.pc = self.read_word(bus, vector);

        self.op_pending = false;
        self.cycles_left = 7;
    }

    // ========================================================================
    // Bus helpers
    // ========================================================================

    fn read_word<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u16 {
        let low = bus.read(addr);
        let high = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let addr = self.regs.push();
        bus.write(addr, value);
    }

    fn pop<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let addr = self.regs.pop();
        bus.read(addr)
    }

    fn operand_value<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.operand.read(&self.regs, bus)
    }

    fn write_operand<B: Bus>(&mut self, bus: &mut B, value: u8) {
        // Dropped writes are legitimate on memory-mapped regions.
        let _ = self.operand.write(&mut self.regs, bus, value);
    }

    /// Charge the indexed-addressing page-cross cycle. Only read-class
    /// operations call this; store and read-modify-write opcodes carry
    /// the penalty in their base count.
    fn charge_page_cross(&mut self) {
        if self.page_crossed {
            self.cycles_left += 1;
        }
    }

    // ========================================================================
    // Execute
    // ========================================================================

    fn execute<B: Bus>(&mut self, bus: &mut B) {
        match self.instr.op {
            // Loads and stores
            Op::Lda => {
                let m = self.operand_value(bus);
                self.regs.a = m;
                self.regs.p.update_nz(m);
                self.charge_page_cross();
            }
            Op::Ldx => {
                let m = self.operand_value(bus);
                self.regs.x = m;
                self.regs.p.update_nz(m);
                self.charge_page_cross();
            }
            Op::Ldy => {
                let m = self.operand_value(bus);
                self.regs.y = m;
                self.regs.p.update_nz(m);
                self.charge_page_cross();
            }
            Op::Sta => {
                let a = self.regs.a;
                self.write_operand(bus, a);
            }
            Op::Stx => {
                let x = self.regs.x;
                self.write_operand(bus, x);
            }
            Op::Sty => {
                let y = self.regs.y;
                self.write_operand(bus, y);
            }

            // Register transfers
            Op::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
            }
            Op::Tsx => {
                self.regs.x = self.regs.s;
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Txs => {
                // TXS does not affect flags.
                self.regs.s = self.regs.x;
            }

            // Stack
            Op::Pha => {
                let a = self.regs.a;
                self.push(bus, a);
            }
            Op::Php => {
                let p = self.regs.p.to_byte_pushed(true);
                self.push(bus, p);
            }
            Op::Pla => {
                let value = self.pop(bus);
                self.regs.a = value;
                self.regs.p.update_nz(value);
            }
            Op::Plp => {
                let value = self.pop(bus);
                self.regs.p.set_from_pull(value);
            }

            // Logic
            Op::And => {
                let m = self.operand_value(bus);
                self.regs.a &= m;
                self.regs.p.update_nz(self.regs.a);
                self.charge_page_cross();
            }
            Op::Ora => {
                let m = self.operand_value(bus);
                self.regs.a |= m;
                self.regs.p.update_nz(self.regs.a);
                self.charge_page_cross();
            }
            Op::Eor => {
                let m = self.operand_value(bus);
                self.regs.a ^= m;
                self.regs.p.update_nz(self.regs.a);
                self.charge_page_cross();
            }

            // Arithmetic
            Op::Adc => {
                let m = self.operand_value(bus);
                self.adc(m);
                self.charge_page_cross();
            }
            Op::Sbc => {
                let m = self.operand_value(bus);
                self.adc(!m);
                self.charge_page_cross();
            }

            // Shifts and rotates, through the operand reference so memory
            // and accumulator targets share one path
            Op::Asl => {
                let m = self.operand_value(bus);
                let result = self.asl(m);
                self.write_operand(bus, result);
            }
            Op::Lsr => {
                let m = self.operand_value(bus);
                let result = self.lsr(m);
                self.write_operand(bus, result);
            }
            Op::Rol => {
                let m = self.operand_value(bus);
                let result = self.rol(m);
                self.write_operand(bus, result);
            }
            Op::Ror => {
                let m = self.operand_value(bus);
                let result = self.ror(m);
                self.write_operand(bus, result);
            }

            // Compares
            Op::Cmp => {
                let m = self.operand_value(bus);
                let a = self.regs.a;
                self.compare(a, m);
                self.charge_page_cross();
            }
            Op::Cpx => {
                let m = self.operand_value(bus);
                let x = self.regs.x;
                self.compare(x, m);
            }
            Op::Cpy => {
                let m = self.operand_value(bus);
                let y = self.regs.y;
                self.compare(y, m);
            }

            Op::Bit => {
                let m = self.operand_value(bus);
                self.regs.p.set_if(Z, self.regs.a & m == 0);
                self.regs.p.set_if(V, m & 0x40 != 0);
                self.regs.p.set_if(N, m & 0x80 != 0);
            }

            // Increment/decrement
            Op::Inc => {
                let result = self.operand_value(bus).wrapping_add(1);
                self.regs.p.update_nz(result);
                self.write_operand(bus, result);
            }
            Op::Dec => {
                let result = self.operand_value(bus).wrapping_sub(1);
                self.regs.p.update_nz(result);
                self.write_operand(bus, result);
            }
            Op::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Op::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.y);
            }

            // Jumps and returns
            Op::Jmp => {
                if let OperandRef::Mem(target) = self.operand {
                    self.regs.pc = target;
                }
            }
            Op::Jsr => {
                // PC already sits past the 3-byte instruction; push the
                // address of its last byte so RTS's +1 resumes after it.
                let ret = self.regs.pc.wrapping_sub(1);
                self.push(bus, (ret >> 8) as u8);
                self.push(bus, ret as u8);
                if let OperandRef::Mem(target) = self.operand {
                    self.regs.pc = target;
                }
            }
            Op::Rts => {
                let low = self.pop(bus);
                let high = self.pop(bus);
                self.regs.pc = u16::from_le_bytes([low, high]).wrapping_add(1);
            }
            Op::Rti => {
                let p = self.pop(bus);
                self.regs.p.set_from_pull(p);
                let low = self.pop(bus);
                let high = self.pop(bus);
                self.regs.pc = u16::from_le_bytes([low, high]);
            }

            // Conditional branches
            Op::Bcc => self.branch_if(!self.regs.p.is_set(C)),
            Op::Bcs => self.branch_if(self.regs.p.is_set(C)),
            Op::Bne => self.branch_if(!self.regs.p.is_set(Z)),
            Op::Beq => self.branch_if(self.regs.p.is_set(Z)),
            Op::Bpl => self.branch_if(!self.regs.p.is_set(N)),
            Op::Bmi => self.branch_if(self.regs.p.is_set(N)),
            Op::Bvc => self.branch_if(!self.regs.p.is_set(V)),
            Op::Bvs => self.branch_if(self.regs.p.is_set(V)),

            // Flag operations
            Op::Clc => self.regs.p.clear(C),
            Op::Sec => self.regs.p.set(C),
            Op::Cli => self.regs.p.clear(I),
            Op::Sei => self.regs.p.set(I),
            Op::Cld => self.regs.p.clear(D),
            Op::Sed => self.regs.p.set(D),
            Op::Clv => self.regs.p.clear(V),

            Op::Brk => {
                // The byte after BRK is padding; skip it before pushing.
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.push(bus, (self.regs.pc >> 8) as u8);
                self.push(bus, self.regs.pc as u8);
                let p = self.regs.p.to_byte_pushed(true);
                self.push(bus, p);
                self.regs.p.set(I);
                self.regs.pc = self.read_word(bus, IRQ_VECTOR);
            }

            Op::Nop | Op::Xxx => {}
        }
    }

    // ========================================================================
    // ALU helpers
    // ========================================================================

    /// Add with carry; SBC routes through here with the operand inverted.
    /// Always binary: this core models the 2A03, which has no BCD unit.
    fn adc(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.is_set(C));
        let sum = u16::from(a) + u16::from(value) + carry;
        let result = sum as u8;

        self.regs.p.set_if(C, sum > 0xFF);
        self.regs
            .p
            .set_if(V, (a ^ result) & (value ^ result) & 0x80 != 0);
        self.regs.p.update_nz(result);
        self.regs.a = result;
    }

    fn compare(&mut self, reg: u8, value: u8) {
        let result = reg.wrapping_sub(value);
        self.regs.p.set_if(C, reg >= value);
        self.regs.p.update_nz(result);
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(C));
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(C)) << 7;
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    /// Shared body of the eight conditional branches.
    fn branch_if(&mut self, taken: bool) {
        if !taken {
            return;
        }
        let new_pc = self.regs.pc.wrapping_add(self.branch_offset as u16);
        self.cycles_left += 1;
        if (new_pc & 0xFF00) != (self.regs.pc & 0xFF00) {
            self.cycles_left += 1;
        }
        self.regs.pc = new_pc;
    }
}
