//! CP/M-style harness for the classic 8080 validation programs
//! (TST8080, 8080PRE, CPUTEST, 8080EXM).
//!
//! The test programs are .COM images that run from 0x0100 and talk to the
//! world through two BDOS entry points. Instead of emulating CP/M, the
//! harness plants I/O stubs over the vectors:
//!
//! ```text
//! 0x0000: OUT 0        exit signal (JMP 0 is the CP/M warm boot)
//! 0x0005: OUT 1; RET   BDOS call (C=9 prints the $-string at DE,
//!                      C=2 prints the character in E)
//! ```

use cathode_core::core::{Bus, Memory};
use cathode_core::cpu::I8080;

const COM_LOAD_ADDR: u16 = 0x0100;

/// Unrestricted 64KB memory plus the two stub ports. BDOS calls need the
/// C and DE registers, which the bus cannot see, so OUT 1 only latches a
/// request; the harness services it between instructions.
pub struct CpmBus {
    pub mem: Memory,
    pub output: Vec<u8>,
    pub finished: bool,
    bdos_call: bool,
}

impl Bus for CpmBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.mem.read(addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.mem.write(addr, data);
    }

    fn io_write(&mut self, port: u8, _data: u8) {
        match port {
            0 => self.finished = true,
            1 => self.bdos_call = true,
            _ => {}
        }
    }
}

#[derive(Debug)]
pub enum HarnessError {
    /// HLT with interrupts disabled: the program can never finish.
    Halted { pc: u16 },
    /// The instruction budget ran out before the program exited.
    InstructionLimit(u64),
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Halted { pc } => {
                write!(f, "halted with interrupts disabled at PC 0x{pc:04X}")
            }
            Self::InstructionLimit(limit) => {
                write!(f, "no exit after {limit} instructions")
            }
        }
    }
}

impl std::error::Error for HarnessError {}

pub struct CpmHarness {
    pub cpu: I8080,
    pub bus: CpmBus,
    /// Echo BDOS output to stdout as it is produced (the exhaustive suite
    /// runs for hours; progress matters).
    pub echo: bool,
    instructions: u64,
}

impl CpmHarness {
    /// Install the BDOS stubs and load a .COM image at 0x0100.
    pub fn new(program: &[u8]) -> Self {
        let mut bus = CpmBus {
            mem: Memory::new(),
            output: Vec::new(),
            finished: false,
            bdos_call: false,
        };
        bus.mem.load(0x0000, &[0xD3, 0x00]); // OUT 0
        bus.mem.load(0x0005, &[0xD3, 0x01, 0xC9]); // OUT 1; RET
        bus.mem.load(COM_LOAD_ADDR, program);

        let mut cpu = I8080::new();
        cpu.pc = COM_LOAD_ADDR;

        Self {
            cpu,
            bus,
            echo: false,
            instructions: 0,
        }
    }

    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Captured BDOS output as text.
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.bus.output).into_owned()
    }

    /// Execute one instruction, servicing any BDOS request it raised.
    pub fn step(&mut self) {
        self.cpu.step(&mut self.bus);
        self.instructions += 1;
        if self.bus.bdos_call {
            self.bus.bdos_call = false;
            self.service_bdos();
        }
    }

    /// Run until the program exits through the warm-boot vector.
    pub fn run(&mut self, max_instructions: u64) -> Result<(), HarnessError> {
        while !self.bus.finished {
            self.step();
            if self.cpu.halted && !self.cpu.int_enabled {
                return Err(HarnessError::Halted { pc: self.cpu.pc });
            }
            if self.instructions >= max_instructions {
                return Err(HarnessError::InstructionLimit(max_instructions));
            }
        }
        Ok(())
    }

    fn service_bdos(&mut self) {
        let start = self.bus.output.len();
        match self.cpu.c {
            // C_WRITESTR: $-terminated string at DE
            9 => {
                let mut addr = self.cpu.get_de();
                loop {
                    let ch = self.bus.mem.read(addr);
                    if ch == b'$' {
                        break;
                    }
                    self.bus.output.push(ch);
                    addr = addr.wrapping_add(1);
                }
            }
            // C_WRITE: single character in E
            2 => self.bus.output.push(self.cpu.e),
            other => log::debug!("unhandled BDOS function {other}"),
        }
        if self.echo {
            use std::io::Write;
            let mut stdout = std::io::stdout();
            let _ = stdout.write_all(&self.bus.output[start..]);
            let _ = stdout.flush();
        }
    }
}
