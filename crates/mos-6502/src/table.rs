//! The decode table: one immutable descriptor per opcode byte.

/// The 56 documented operations plus [`Op::Xxx`] for undocumented slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// Undocumented opcode: no architectural effect beyond its cycle cost.
    Xxx,
}

/// Addressing modes.
///
/// `Imp` covers both implied and accumulator operands - either way the
/// operand reference resolves to the A register and no operand bytes are
/// consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Implicit / accumulator.
    Imp,
    /// Immediate: the operand is the literal byte after the opcode.
    Imm,
    /// Zero page: one-byte address in page zero.
    Zp0,
    /// Zero page indexed by X, wrapping inside page zero.
    Zpx,
    /// Zero page indexed by Y, wrapping inside page zero.
    Zpy,
    /// Relative: signed one-byte branch displacement.
    Rel,
    /// Absolute: full two-byte address.
    Abs,
    /// Absolute indexed by X; reads pay a cycle on page cross.
    Abx,
    /// Absolute indexed by Y; reads pay a cycle on page cross.
    Aby,
    /// Indirect (JMP only), with the $xxFF page-boundary bug.
    Ind,
    /// Indexed indirect ($nn,X): pointer lookup wraps inside page zero.
    Izx,
    /// Indirect indexed ($nn),Y; reads pay a cycle on page cross.
    Izy,
}

/// One decode-table entry.
#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    /// Three-character mnemonic; `???` marks an undocumented opcode.
    pub mnemonic: &'static str,
    /// What the instruction does.
    pub op: Op,
    /// How it finds its operand.
    pub mode: Mode,
    /// Base cycle count before branch/page-cross penalties.
    pub cycles: u8,
}

const fn entry(mnemonic: &'static str, op: Op, mode: Mode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        op,
        mode,
        cycles,
    }
}

const fn undoc(cycles: u8) -> Instruction {
    entry("???", Op::Xxx, Mode::Imp, cycles)
}

/// Dense decode table indexed by opcode byte.
///
/// Laid out as the classic 16x16 opcode matrix, one row per high nibble.
/// Undocumented slots are `???`, which executes as a no-op; the one
/// exception is $EB, the undocumented alias of SBC immediate.
#[rustfmt::skip]
pub static INSTRUCTION_TABLE: [Instruction; 256] = [
    // $0x
    entry("BRK", Op::Brk, Mode::Imp, 7), entry("ORA", Op::Ora, Mode::Izx, 6), undoc(2), undoc(8),
    undoc(3),                            entry("ORA", Op::Ora, Mode::Zp0, 3), entry("ASL", Op::Asl, Mode::Zp0, 5), undoc(5),
    entry("PHP", Op::Php, Mode::Imp, 3), entry("ORA", Op::Ora, Mode::Imm, 2), entry("ASL", Op::Asl, Mode::Imp, 2), undoc(2),
    undoc(4),                            entry("ORA", Op::Ora, Mode::Abs, 4), entry("ASL", Op::Asl, Mode::Abs, 6), undoc(6),
    // $1x
    entry("BPL", Op::Bpl, Mode::Rel, 2), entry("ORA", Op::Ora, Mode::Izy, 5), undoc(2), undoc(8),
    undoc(4),                            entry("ORA", Op::Ora, Mode::Zpx, 4), entry("ASL", Op::Asl, Mode::Zpx, 6), undoc(6),
    entry("CLC", Op::Clc, Mode::Imp, 2), entry("ORA", Op::Ora, Mode::Aby, 4), undoc(2), undoc(7),
    undoc(4),                            entry("ORA", Op::Ora, Mode::Abx, 4), entry("ASL", Op::Asl, Mode::Abx, 7), undoc(7),
    // $2x
    entry("JSR", Op::Jsr, Mode::Abs, 6), entry("AND", Op::And, Mode::Izx, 6), undoc(2), undoc(8),
    entry("BIT", Op::Bit, Mode::Zp0, 3), entry("AND", Op::And, Mode::Zp0, 3), entry("ROL", Op::Rol, Mode::Zp0, 5), undoc(5),
    entry("PLP", Op::Plp, Mode::Imp, 4), entry("AND", Op::And, Mode::Imm, 2), entry("ROL", Op::Rol, Mode::Imp, 2), undoc(2),
    entry("BIT", Op::Bit, Mode::Abs, 4), entry("AND", Op::And, Mode::Abs, 4), entry("ROL", Op::Rol, Mode::Abs, 6), undoc(6),
    // $3x
    entry("BMI", Op::Bmi, Mode::Rel, 2), entry("AND", Op::And, Mode::Izy, 5), undoc(2), undoc(8),
    undoc(4),                            entry("AND", Op::And, Mode::Zpx, 4), entry("ROL", Op::Rol, Mode::Zpx, 6), undoc(6),
    entry("SEC", Op::Sec, Mode::Imp, 2), entry("AND", Op::And, Mode::Aby, 4), undoc(2), undoc(7),
    undoc(4),                            entry("AND", Op::And, Mode::Abx, 4), entry("ROL", Op::Rol, Mode::Abx, 7), undoc(7),
    // $4x
    entry("RTI", Op::Rti, Mode::Imp, 6), entry("EOR", Op::Eor, Mode::Izx, 6), undoc(2), undoc(8),
    undoc(3),                            entry("EOR", Op::Eor, Mode::Zp0, 3), entry("LSR", Op::Lsr, Mode::Zp0, 5), undoc(5),
    entry("PHA", Op::Pha, Mode::Imp, 3), entry("EOR", Op::Eor, Mode::Imm, 2), entry("LSR", Op::Lsr, Mode::Imp, 2), undoc(2),
    entry("JMP", Op::Jmp, Mode::Abs, 3), entry("EOR", Op::Eor, Mode::Abs, 4), entry("LSR", Op::Lsr, Mode::Abs, 6), undoc(6),
    // $5x
    entry("BVC", Op::Bvc, Mode::Rel, 2), entry("EOR", Op::Eor, Mode::Izy, 5), undoc(2), undoc(8),
    undoc(4),                            entry("EOR", Op::Eor, Mode::Zpx, 4), entry("LSR", Op::Lsr, Mode::Zpx, 6), undoc(6),
    entry("CLI", Op::Cli, Mode::Imp, 2), entry("EOR", Op::Eor, Mode::Aby, 4), undoc(2), undoc(7),
    undoc(4),                            entry("EOR", Op::Eor, Mode::Abx, 4), entry("LSR", Op::Lsr, Mode::Abx, 7), undoc(7),
    // $6x
    entry("RTS", Op::Rts, Mode::Imp, 6), entry("ADC", Op::Adc, Mode::Izx, 6), undoc(2), undoc(8),
    undoc(3),                            entry("ADC", Op::Adc, Mode::Zp0, 3), entry("ROR", Op::Ror, Mode::Zp0, 5), undoc(5),
    entry("PLA", Op::Pla, Mode::Imp, 4), entry("ADC", Op::Adc, Mode::Imm, 2), entry("ROR", Op::Ror, Mode::Imp, 2), undoc(2),
    entry("JMP", Op::Jmp, Mode::Ind, 5), entry("ADC", Op::Adc, Mode::Abs, 4), entry("ROR", Op::Ror, Mode::Abs, 6), undoc(6),
    // $7x
    entry("BVS", Op::Bvs, Mode::Rel, 2), entry("ADC", Op::Adc, Mode::Izy, 5), undoc(2), undoc(8),
    undoc(4),                            entry("ADC", Op::Adc, Mode::Zpx, 4), entry("ROR", Op::Ror, Mode::Zpx, 6), undoc(6),
    entry("SEI", Op::Sei, Mode::Imp, 2), entry("ADC", Op::Adc, Mode::Aby, 4), undoc(2), undoc(7),
    undoc(4),                            entry("ADC", Op::Adc, Mode::Abx, 4), entry("ROR", Op::Ror, Mode::Abx, 7), undoc(7),
    // $8x
    undoc(2),                            entry("STA", Op::Sta, Mode::Izx, 6), undoc(2), undoc(6),
    entry("STY", Op::Sty, Mode::Zp0, 3), entry("STA", Op::Sta, Mode::Zp0, 3), entry("STX", Op::Stx, Mode::Zp0, 3), undoc(3),
    entry("DEY", Op::Dey, Mode::Imp, 2), undoc(2),                            entry("TXA", Op::Txa, Mode::Imp, 2), undoc(2),
    entry("STY", Op::Sty, Mode::Abs, 4), entry("STA", Op::Sta, Mode::Abs, 4), entry("STX", Op::Stx, Mode::Abs, 4), undoc(4),
    // $9x
    entry("BCC", Op::Bcc, Mode::Rel, 2), entry("STA", Op::Sta, Mode::Izy, 6), undoc(2), undoc(6),
    entry("STY", Op::Sty, Mode::Zpx, 4), entry("STA", Op::Sta, Mode::Zpx, 4), entry("STX", Op::Stx, Mode::Zpy, 4), undoc(4),
    entry("TYA", Op::Tya, Mode::Imp, 2), entry("STA", Op::Sta, Mode::Aby, 5), entry("TXS", Op::Txs, Mode::Imp, 2), undoc(5),
    undoc(5),                            entry("STA", Op::Sta, Mode::Abx, 5), undoc(5),                            undoc(5),
    // $Ax
    entry("LDY", Op::Ldy, Mode::Imm, 2), entry("LDA", Op::Lda, Mode::Izx, 6), entry("LDX", Op::Ldx, Mode::Imm, 2), undoc(6),
    entry("LDY", Op::Ldy, Mode::Zp0, 3), entry("LDA", Op::Lda, Mode::Zp0, 3), entry("LDX", Op::Ldx, Mode::Zp0, 3), undoc(3),
    entry("TAY", Op::Tay, Mode::Imp, 2), entry("LDA", Op::Lda, Mode::Imm, 2), entry("TAX", Op::Tax, Mode::Imp, 2), undoc(2),
    entry("LDY", Op::Ldy, Mode::Abs, 4), entry("LDA", Op::Lda, Mode::Abs, 4), entry("LDX", Op::Ldx, Mode::Abs, 4), undoc(4),
    // $Bx
    entry("BCS", Op::Bcs, Mode::Rel, 2), entry("LDA", Op::Lda, Mode::Izy, 5), undoc(2), undoc(5),
    entry("LDY", Op::Ldy, Mode::Zpx, 4), entry("LDA", Op::Lda, Mode::Zpx, 4), entry("LDX", Op::Ldx, Mode::Zpy, 4), undoc(4),
    entry("CLV", Op::Clv, Mode::Imp, 2), entry("LDA", Op::Lda, Mode::Aby, 4), entry("TSX", Op::Tsx, Mode::Imp, 2), undoc(4),
    entry("LDY", Op::Ldy, Mode::Abx, 4), entry("LDA", Op::Lda, Mode::Abx, 4), entry("LDX", Op::Ldx, Mode::Aby, 4), undoc(4),
    // $Cx
    entry("CPY", Op::Cpy, Mode::Imm, 2), entry("CMP", Op::Cmp, Mode::Izx, 6), undoc(2), undoc(8),
    entry("CPY", Op::Cpy, Mode::Zp0, 3), entry("CMP", Op::Cmp, Mode::Zp0, 3), entry("DEC", Op::Dec, Mode::Zp0, 5), undoc(5),
    entry("INY", Op::Iny, Mode::Imp, 2), entry("CMP", Op::Cmp, Mode::Imm, 2), entry("DEX", Op::Dex, Mode::Imp, 2), undoc(2),
    entry("CPY", Op::Cpy, Mode::Abs, 4), entry("CMP", Op::Cmp, Mode::Abs, 4), entry("DEC", Op::Dec, Mode::Abs, 6), undoc(6),
    // $Dx
    entry("BNE", Op::Bne, Mode::Rel, 2), entry("CMP", Op::Cmp, Mode::Izy, 5), undoc(2), undoc(8),
    undoc(4),                            entry("CMP", Op::Cmp, Mode::Zpx, 4), entry("DEC", Op::Dec, Mode::Zpx, 6), undoc(6),
    entry("CLD", Op::Cld, Mode::Imp, 2), entry("CMP", Op::Cmp, Mode::Aby, 4), undoc(2), undoc(7),
    undoc(4),                            entry("CMP", Op::Cmp, Mode::Abx, 4), entry("DEC", Op::Dec, Mode::Abx, 7), undoc(7),
    // $Ex
    entry("CPX", Op::Cpx, Mode::Imm, 2), entry("SBC", Op::Sbc, Mode::Izx, 6), undoc(2), undoc(8),
    entry("CPX", Op::Cpx, Mode::Zp0, 3), entry("SBC", Op::Sbc, Mode::Zp0, 3), entry("INC", Op::Inc, Mode::Zp0, 5), undoc(5),
    entry("INX", Op::Inx, Mode::Imp, 2), entry("SBC", Op::Sbc, Mode::Imm, 2), entry("NOP", Op::Nop, Mode::Imp, 2), entry("???", Op::Sbc, Mode::Imm, 2),
    entry("CPX", Op::Cpx, Mode::Abs, 4), entry("SBC", Op::Sbc, Mode::Abs, 4), entry("INC", Op::Inc, Mode::Abs, 6), undoc(6),
    // $Fx
    entry("BEQ", Op::Beq, Mode::Rel, 2), entry("SBC", Op::Sbc, Mode::Izy, 5), undoc(2), undoc(8),
    undoc(4),                            entry("SBC", Op::Sbc, Mode::Zpx, 4), entry("INC", Op::Inc, Mode::Zpx, 6), undoc(6),
    entry("SED", Op::Sed, Mode::Imp, 2), entry("SBC", Op::Sbc, Mode::Aby, 4), undoc(2), undoc(7),
    undoc(4),                            entry("SBC", Op::Sbc, Mode::Abx, 4), entry("INC", Op::Inc, Mode::Abx, 7), undoc(7),
];
