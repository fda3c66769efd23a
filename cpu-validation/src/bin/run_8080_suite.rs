//! Runs the classic 8080 validation programs through the CP/M harness and
//! reports BDOS output, instruction counts, and cycle counts.
//!
//! Expected final cycle counts for the well-known suites:
//!   TST8080.COM        4,924
//!   8080PRE.COM        7,817
//!   CPUTEST.COM        255,653,383
//!   8080EXM.COM        23,803,381,171

use std::path::Path;
use std::process::ExitCode;

use cathode_core::cpu::CpuStateTrait;
use cathode_cpu_validation::CpmHarness;

// 8080EXM runs tens of billions of cycles; cap well above that.
const MAX_INSTRUCTIONS: u64 = 10_000_000_000;

fn run_one(path: &Path) -> Result<(), String> {
    let program =
        std::fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;

    println!("=== {} ===", path.display());
    let mut harness = CpmHarness::new(&program);
    harness.echo = true;

    let result = harness.run(MAX_INSTRUCTIONS);
    println!();
    println!(
        "Instructions: {}\nCycles: {}",
        harness.instructions(),
        harness.cpu.cycles
    );
    if result.is_err() {
        let s = harness.cpu.snapshot();
        eprintln!(
            "PC: {:04X}, AF: {:02X}{:02X}, BC: {:02X}{:02X}, DE: {:02X}{:02X}, HL: {:02X}{:02X}, SP: {:04X}",
            s.pc, s.a, s.f, s.b, s.c, s.d, s.e, s.h, s.l, s.sp
        );
    }
    result.map_err(|e| format!("{}: {e}", path.display()))
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: run_8080_suite <program.com>...");
        eprintln!("Example: run_8080_suite test_data/8080/TST8080.COM");
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for arg in &args[1..] {
        if let Err(e) = run_one(Path::new(arg)) {
            eprintln!("{e}");
            failed = true;
        }
        println!();
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
