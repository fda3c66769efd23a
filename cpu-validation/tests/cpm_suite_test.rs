//! The classic 8080 validation programs, run through the CP/M harness.
//!
//! The .COM images are not distributable with the source tree; point
//! I8080_TEST_ROMS at a directory containing them (default:
//! cpu-validation/test_data/8080). Each test skips silently when its
//! image is absent. The final cycle count is the authoritative pass
//! criterion alongside the program's own PASS/FAIL text.

use std::path::PathBuf;

use cathode_cpu_validation::CpmHarness;

fn rom_path(name: &str) -> Option<PathBuf> {
    let dir = std::env::var("I8080_TEST_ROMS").unwrap_or_else(|_| "test_data/8080".to_string());
    let path = PathBuf::from(dir).join(name);
    if path.exists() {
        Some(path)
    } else {
        eprintln!("{name} not found; skipping");
        None
    }
}

fn run_suite(name: &str, max_instructions: u64) -> Option<CpmHarness> {
    let path = rom_path(name)?;
    let program = std::fs::read(&path).expect("readable test ROM");
    let mut harness = CpmHarness::new(&program);
    harness
        .run(max_instructions)
        .unwrap_or_else(|e| panic!("{name}: {e}\noutput so far: {}", harness.output_string()));
    Some(harness)
}

#[test]
fn test_tst8080() {
    let Some(harness) = run_suite("TST8080.COM", 10_000) else {
        return;
    };
    assert!(
        harness.output_string().contains("CPU IS OPERATIONAL"),
        "unexpected output: {}",
        harness.output_string()
    );
    assert_eq!(harness.cpu.cycles, 4_924);
}

#[test]
fn test_8080pre() {
    let Some(harness) = run_suite("8080PRE.COM", 100_000) else {
        return;
    };
    assert!(
        harness.output_string().contains("8080 Preliminary tests complete"),
        "unexpected output: {}",
        harness.output_string()
    );
    assert_eq!(harness.cpu.cycles, 7_817);
}

#[test]
fn test_cputest() {
    let Some(harness) = run_suite("CPUTEST.COM", 100_000_000) else {
        return;
    };
    let output = harness.output_string();
    assert!(
        output.trim_end().ends_with("CPU TESTS OK"),
        "unexpected output: {output}"
    );
    assert_eq!(harness.cpu.cycles, 255_653_383);
}

/// The exhaustive suite takes hours: run with --ignored when needed.
#[test]
#[ignore]
fn test_8080exm() {
    let Some(harness) = run_suite("8080EXM.COM", 10_000_000_000) else {
        return;
    };
    let output = harness.output_string();
    assert!(
        !output.contains("ERROR"),
        "exhaustive suite reported a mismatch: {output}"
    );
    assert_eq!(harness.cpu.cycles, 23_803_381_171);
}
