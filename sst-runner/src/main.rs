//! SingleStepTests corpus runner.
//!
//! Replays the per-opcode golden traces from
//! `https://github.com/SingleStepTests/ProcessorTests` (`nes6502/v1`)
//! against the CPU core: one JSON file per opcode, each an array of
//! records with a fully specified initial state, final state, and cycle
//! trace. Undocumented opcodes (mnemonic `???`) are skipped.
//!
//! Exits 0 when every record of every documented opcode passes; the first
//! mismatch stops the run with exit code 1. Progress goes to stdout, one
//! line per opcode file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use emu_core::{Bus, FlatBus};
use mos_6502::{Mos6502, Registers, Status, INSTRUCTION_TABLE};
use serde::Deserialize;

/// One corpus record.
#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    /// Bus transactions; only the length (= cycle count) is asserted.
    cycles: Vec<(u16, u8, String)>,
}

/// Register file plus sparse RAM contents.
#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn main() {
    let mut corpus = PathBuf::from("json-tests");
    let mut verbose = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ if arg.starts_with('-') => {
                eprintln!("Usage: sst-runner [-v] [corpus-dir]");
                eprintln!("       corpus-dir defaults to json-tests/");
                eprintln!("       -v, --verbose  Print every record name");
                process::exit(1);
            }
            _ => corpus = PathBuf::from(arg),
        }
    }

    let mut total_records = 0u64;
    let mut files = 0u32;

    for opcode in 0x00..=0xFFu8 {
        let instr = &INSTRUCTION_TABLE[opcode as usize];
        if instr.mnemonic == "???" {
            continue;
        }

        match run_opcode(&corpus, opcode, verbose) {
            Ok(records) => {
                println!(
                    "[PASS] ${opcode:02X} {} - {records} records",
                    instr.mnemonic
                );
                total_records += u64::from(records);
                files += 1;
            }
            Err(e) => {
                println!("[FAIL] ${opcode:02X} {} - {e}", instr.mnemonic);
                process::exit(1);
            }
        }
    }

    println!();
    println!("Summary: {files} opcode files, {total_records} records, all passed");
}

/// Replay every record of one opcode file. Returns the record count, or
/// the first mismatch rendered as an error string.
fn run_opcode(corpus: &Path, opcode: u8, verbose: bool) -> Result<u32, String> {
    let path = corpus.join(format!("{opcode:02x}.json"));
    let data =
        fs::read_to_string(&path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let tests: Vec<TestCase> =
        serde_json::from_str(&data).map_err(|e| format!("failed to parse {}: {e}", path.display()))?;

    let mut bus = FlatBus::new();

    for test in &tests {
        if verbose {
            println!("  running {}", test.name);
        }

        let mut cpu = Mos6502::new();
        bus.clear();

        cpu.set_state(Registers {
            a: test.initial.a,
            x: test.initial.x,
            y: test.initial.y,
            s: test.initial.s,
            pc: test.initial.pc,
            p: Status(test.initial.p),
        });
        for &(addr, value) in &test.initial.ram {
            bus.write(addr, value);
        }

        let cycles = cpu.run_instruction(&mut bus);

        let mut errors = compare(&cpu, &bus, &test.final_state);
        if cycles != test.cycles.len() as u64 {
            errors.push(format!("cycles: got {cycles}, want {}", test.cycles.len()));
        }
        if !errors.is_empty() {
            return Err(format!("[{}]: {}", test.name, errors.join(", ")));
        }
    }

    Ok(tests.len() as u32)
}

/// Field-by-field comparison; every mismatch is reported, not just the first.
fn compare(cpu: &Mos6502, bus: &FlatBus, expected: &CpuState) -> Vec<String> {
    let mut errors = Vec::new();
    let regs = cpu.state();

    if regs.pc != expected.pc {
        errors.push(format!("PC: got ${:04X}, want ${:04X}", regs.pc, expected.pc));
    }
    if regs.s != expected.s {
        errors.push(format!("S: got ${:02X}, want ${:02X}", regs.s, expected.s));
    }
    if regs.a != expected.a {
        errors.push(format!("A: got ${:02X}, want ${:02X}", regs.a, expected.a));
    }
    if regs.x != expected.x {
        errors.push(format!("X: got ${:02X}, want ${:02X}", regs.x, expected.x));
    }
    if regs.y != expected.y {
        errors.push(format!("Y: got ${:02X}, want ${:02X}", regs.y, expected.y));
    }
    if regs.p.0 != expected.p {
        errors.push(format!(
            "P: got ${:02X} ({:08b}), want ${:02X} ({:08b})",
            regs.p.0, regs.p.0, expected.p, expected.p
        ));
    }

    for &(addr, want) in &expected.ram {
        let got = bus.peek(addr);
        if got != want {
            errors.push(format!("RAM[${addr:04X}]: got ${got:02X}, want ${want:02X}"));
        }
    }

    errors
}
