//! Integration test replaying the SingleStepTests 6502 corpus.
//!
//! One JSON file per opcode, 10,000 records each, comparing register and
//! memory state after every instruction. Corpus files live in
//! `json-tests/XX.json` at the workspace root; download them from
//! `https://github.com/SingleStepTests/ProcessorTests` (`nes6502/v1`).

use std::fs;
use std::path::Path;

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

fn setup(cpu: &mut Mos6502, bus: &mut FlatBus, state: &CpuState) {
    cpu.set_state(Registers {
        a: state.a,
        x: state.x,
        y: state.y,
        s: state.s,
        pc: state.pc,
        p: Status(state.p),
    });
    for &(addr, value) in &state.ram {
        bus.write(addr, value);
    }
}

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

#[test]
#[ignore = "requires the json-tests corpus — run with --ignored"]
fn run_all() {
    let corpus = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("parent of crate dir")
        .parent()
        .expect("workspace root")
        .join("json-tests");

    if !corpus.exists() {
        eprintln!("Corpus not found at {}; skipping.", corpus.display());
        return;
    }

    let mut total_pass = 0u64;
    let mut total_fail = 0u64;

    for opcode in 0x00..=0xFFu8 {
        if INSTRUCTION_TABLE[opcode as usize].mnemonic == "???" {
            continue;
        }

        let path = corpus.join(format!("{opcode:02x}.json"));
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
        let tests: Vec<TestCase> = serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()));

        let mut file_pass = 0u32;
        let mut file_fail = 0u32;
        let mut first_failures: Vec<String> = Vec::new();

        let mut bus = FlatBus::new();
        for test in &tests {
            let mut cpu = Mos6502::new();
            bus.clear();
            setup(&mut cpu, &mut bus, &test.initial);

            let cycles = cpu.run_instruction(&mut bus);

            let mut errors = compare(&cpu, &bus, &test.final_state);
            if cycles != test.cycles.len() as u64 {
                errors.push(format!(
                    "cycles: got {cycles}, want {}",
                    test.cycles.len()
                ));
            }

            if errors.is_empty() {
                file_pass += 1;
            } else {
                file_fail += 1;
                if first_failures.len() < 5 {
                    first_failures.push(format!("  FAIL [{}]: {}", test.name, errors.join(", ")));
                }
            }
        }

        let status = if file_fail == 0 { "PASS" } else { "FAIL" };
        println!(
            "Opcode ${opcode:02X}: {status} — {file_pass}/{} passed",
            file_pass + file_fail
        );
        for msg in &first_failures {
            println!("{msg}");
        }

        total_pass += u64::from(file_pass);
        total_fail += u64::from(file_fail);
    }

    println!();
    println!("Total: pass {total_pass}, fail {total_fail}");
    assert_eq!(total_fail, 0, "{total_fail} corpus records failed");
}
