//! Property-based tests for CPU invariants.
//!
//! These drive single instructions with proptest-generated register and
//! operand values and check the arithmetic and stack identities that must
//! hold for every input combination.

use emu_core::FlatBus;
use mos_6502::{flags, Mode, Mos6502, Op, INSTRUCTION_TABLE};
use proptest::prelude::*;

/// CPU with a program loaded at $0200 and PC parked there.
fn setup(program: &[u8]) -> (Mos6502, FlatBus) {
    let mut bus = FlatBus::new();
    bus.load(0x0200, program);
    let mut cpu = Mos6502::new();
    cpu.regs.pc = 0x0200;
    (cpu, bus)
}

/// Operand bytes consumed by each addressing mode.
fn operand_len(mode: Mode) -> u16 {
    match mode {
        Mode::Imp => 0,
        Mode::Imm | Mode::Zp0 | Mode::Zpx | Mode::Zpy | Mode::Rel | Mode::Izx | Mode::Izy => 1,
        Mode::Abs | Mode::Abx | Mode::Aby | Mode::Ind => 2,
    }
}

/// Documented opcodes whose PC advance is purely decode-driven (no
/// branches, jumps, calls, returns, or BRK).
fn straight_line_opcodes() -> Vec<u8> {
    INSTRUCTION_TABLE
        .iter()
        .enumerate()
        .filter(|(_, instr)| {
            instr.mnemonic != "???"
                && !matches!(
                    instr.op,
                    Op::Bcc
                        | Op::Bcs
                        | Op::Beq
                        | Op::Bmi
                        | Op::Bne
                        | Op::Bpl
                        | Op::Bvc
                        | Op::Bvs
                        | Op::Jmp
                        | Op::Jsr
                        | Op::Rts
                        | Op::Rti
                        | Op::Brk
                )
        })
        .map(|(opcode, _)| opcode as u8)
        .collect()
}

proptest! {
    /// ADC is the 16-bit sum, truncated, with the documented flag laws.
    #[test]
    fn adc_matches_the_arithmetic_model(a: u8, m: u8, carry: bool) {
        let (mut cpu, mut bus) = setup(&[0x69, m]); // ADC #m
        cpu.regs.a = a;
        cpu.regs.p.set_if(flags::C, carry);

        cpu.run_instruction(&mut bus);

        let sum = u16::from(a) + u16::from(m) + u16::from(carry);
        let result = sum as u8;
        prop_assert_eq!(cpu.regs.a, result);
        prop_assert_eq!(cpu.regs.p.is_set(flags::C), sum > 0xFF);
        prop_assert_eq!(cpu.regs.p.is_set(flags::Z), result == 0);
        prop_assert_eq!(cpu.regs.p.is_set(flags::N), result & 0x80 != 0);
        let overflow = (a ^ result) & 0x80 != 0 && (a ^ m) & 0x80 == 0;
        prop_assert_eq!(cpu.regs.p.is_set(flags::V), overflow);
    }

    /// Adding M and then subtracting it with the carry complemented
    /// restores the accumulator.
    #[test]
    fn adc_then_sbc_restores_the_accumulator(a: u8, m: u8, carry: bool) {
        let (mut cpu, mut bus) = setup(&[0x69, m, 0xE9, m]); // ADC #m; SBC #m
        cpu.regs.a = a;
        cpu.regs.p.set_if(flags::C, carry);

        cpu.run_instruction(&mut bus);
        cpu.regs.p.set_if(flags::C, !carry);
        cpu.run_instruction(&mut bus);

        prop_assert_eq!(cpu.regs.a, a);
    }

    /// ROR then ROL is the identity: ROR's carry-out is exactly the bit
    /// ROL needs back.
    #[test]
    fn ror_then_rol_restores_the_accumulator(a: u8, carry: bool) {
        let (mut cpu, mut bus) = setup(&[0x6A, 0x2A]); // ROR A; ROL A
        cpu.regs.a = a;
        cpu.regs.p.set_if(flags::C, carry);

        cpu.run_instruction(&mut bus);
        cpu.run_instruction(&mut bus);

        prop_assert_eq!(cpu.regs.a, a);
        prop_assert_eq!(cpu.regs.p.is_set(flags::C), carry, "carry round-trips too");
    }

    /// Push/pop round-trips the value and the stack pointer, for every
    /// starting SP including the wrap at $00.
    #[test]
    fn pha_pla_round_trips_for_any_stack_pointer(a: u8, s: u8) {
        let (mut cpu, mut bus) = setup(&[0x48, 0x68]); // PHA; PLA
        cpu.regs.a = a;
        cpu.regs.s = s;

        cpu.run_instruction(&mut bus);
        prop_assert_eq!(bus.peek(0x0100 | u16::from(s)), a, "stack lives in page one");
        prop_assert_eq!(cpu.regs.s, s.wrapping_sub(1));

        cpu.regs.a = !a;
        cpu.run_instruction(&mut bus);
        prop_assert_eq!(cpu.regs.a, a);
        prop_assert_eq!(cpu.regs.s, s);
    }

    /// CMP encodes the unsigned ordering of A and M in C and Z.
    #[test]
    fn cmp_encodes_unsigned_ordering(a: u8, m: u8) {
        let (mut cpu, mut bus) = setup(&[0xC9, m]); // CMP #m
        cpu.regs.a = a;

        cpu.run_instruction(&mut bus);

        prop_assert_eq!(cpu.regs.p.is_set(flags::C), a >= m);
        prop_assert_eq!(cpu.regs.p.is_set(flags::Z), a == m);
        prop_assert_eq!(
            cpu.regs.p.is_set(flags::N),
            a.wrapping_sub(m) & 0x80 != 0
        );
        prop_assert_eq!(cpu.regs.a, a, "compare never writes A");
    }

    /// Straight-line instructions advance PC by exactly one opcode byte
    /// plus their addressing mode's operand bytes, for any operands.
    #[test]
    fn pc_advances_by_decode_width(
        opcode in prop::sample::select(straight_line_opcodes()),
        operand_low: u8,
        operand_high: u8,
    ) {
        let (mut cpu, mut bus) = setup(&[opcode, operand_low, operand_high]);

        cpu.run_instruction(&mut bus);

        let width = 1 + operand_len(INSTRUCTION_TABLE[opcode as usize].mode);
        prop_assert_eq!(cpu.regs.pc, 0x0200 + width);
    }

    /// SBC agrees with ADC of the inverted operand, flags included.
    #[test]
    fn sbc_is_adc_of_the_complement(a: u8, m: u8, carry: bool) {
        let (mut sbc_cpu, mut sbc_bus) = setup(&[0xE9, m]); // SBC #m
        sbc_cpu.regs.a = a;
        sbc_cpu.regs.p.set_if(flags::C, carry);
        sbc_cpu.run_instruction(&mut sbc_bus);

        let (mut adc_cpu, mut adc_bus) = setup(&[0x69, !m]); // ADC #!m
        adc_cpu.regs.a = a;
        adc_cpu.regs.p.set_if(flags::C, carry);
        adc_cpu.run_instruction(&mut adc_bus);

        prop_assert_eq!(sbc_cpu.regs.a, adc_cpu.regs.a);
        prop_assert_eq!(sbc_cpu.regs.p, adc_cpu.regs.p);
    }
}
