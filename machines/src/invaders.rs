use cathode_core::core::machine::{InputButton, Machine};
use cathode_core::core::{Bus, Memory};
use cathode_core::cpu::I8080;

use crate::registry::MachineEntry;
use crate::rom_loader::{RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Space Invaders ROM definitions ("invaders" Midway set)
// ---------------------------------------------------------------------------

/// Program ROM: 8KB at 0x0000-0x1FFF (four 2KB chips).
pub static INVADERS_PROGRAM_ROM: RomRegion = RomRegion {
    size: 0x2000,
    entries: &[
        RomEntry {
            name: "invaders.h",
            size: 0x0800,
            offset: 0x0000,
            crc32: Some(0x734F_5AD8),
        },
        RomEntry {
            name: "invaders.g",
            size: 0x0800,
            offset: 0x0800,
            crc32: Some(0x6BFA_CA4A),
        },
        RomEntry {
            name: "invaders.f",
            size: 0x0800,
            offset: 0x1000,
            crc32: Some(0x0CCE_AD96),
        },
        RomEntry {
            name: "invaders.e",
            size: 0x0800,
            offset: 0x1800,
            crc32: Some(0x14E5_38B0),
        },
    ],
};

// ---------------------------------------------------------------------------
// Input button IDs
// ---------------------------------------------------------------------------
pub const INPUT_COIN: u8 = 0;
pub const INPUT_P1_START: u8 = 1;
pub const INPUT_P2_START: u8 = 2;
pub const INPUT_LEFT: u8 = 3;
pub const INPUT_RIGHT: u8 = 4;
pub const INPUT_FIRE: u8 = 5;

const INVADERS_INPUT_MAP: &[InputButton] = &[
    InputButton { id: INPUT_COIN, name: "Coin" },
    InputButton { id: INPUT_P1_START, name: "P1 Start" },
    InputButton { id: INPUT_P2_START, name: "P2 Start" },
    InputButton { id: INPUT_LEFT, name: "Left" },
    InputButton { id: INPUT_RIGHT, name: "Right" },
    InputButton { id: INPUT_FIRE, name: "Fire" },
];

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------
// CPU clock: 2 MHz, 60 Hz frame. The raster interrupt hardware fires RST 1
// halfway down the screen and RST 2 at vblank, so each frame is run as two
// half-frame cycle budgets with an interrupt injected at each boundary.

const CPU_CLOCK_HZ: u64 = 2_000_000;
const CYCLES_PER_FRAME: u64 = CPU_CLOCK_HZ / 60;
const HALF_FRAME_CYCLES: u64 = CYCLES_PER_FRAME / 2;

const RST_MID_SCREEN: u8 = 0xCF; // RST 1, vector 0x08
const RST_VBLANK: u8 = 0xD7; // RST 2, vector 0x10

// Screen dimensions after the cabinet's -90 degree monitor rotation
pub const SCREEN_WIDTH: u32 = 224;
pub const SCREEN_HEIGHT: u32 = 256;

const VRAM_BASE: usize = 0x2400;
const VRAM_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8;

/*
Memory map:
  ROM  $0000-$1FFF: invaders.h/g/f/e
  RAM  $2000-$23FF: work
       $2400-$3FFF: video
       $4000-     : mirror (writes dropped)
*/
const ROM_END: u32 = 0x2000;
const RAM_END: u32 = 0x4000;

/// Memory plus the I/O hardware on the Invaders board: two input latches
/// and the external 16-bit shift register the 8080 lacked a barrel shifter
/// for.
pub struct InvadersBus {
    pub mem: Memory,
    pub port1: u8,
    pub port2: u8,
    pub shift_msb: u8,
    pub shift_lsb: u8,
    pub shift_offset: u8,
}

impl InvadersBus {
    fn new() -> Self {
        Self {
            mem: Memory::with_layout(ROM_END, RAM_END),
            port1: 0,
            port2: 0,
            shift_msb: 0,
            shift_lsb: 0,
            shift_offset: 0,
        }
    }
}

impl Bus for InvadersBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.mem.read(addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.mem.write(addr, data);
    }

    fn io_read(&mut self, port: u8) -> u8 {
        match port {
            0 => 0xFF, // unused inputs read as pull-ups
            1 => self.port1,
            2 => self.port2,
            3 => {
                let window = ((self.shift_msb as u16) << 8) | self.shift_lsb as u16;
                (window >> (8 - self.shift_offset)) as u8
            }
            _ => 0xFF,
        }
    }

    fn io_write(&mut self, port: u8, data: u8) {
        match port {
            2 => self.shift_offset = data & 0x07,
            4 => {
                self.shift_lsb = self.shift_msb;
                self.shift_msb = data;
            }
            3 | 5 => log::trace!("sound port {port} <- {data:#04X}"),
            6 => {} // watchdog
            _ => log::debug!("unhandled output port {port} <- {data:#04X}"),
        }
    }
}

/// Space Invaders (Taito/Midway, 1978)
///
/// Hardware: Intel 8080 @ 2 MHz, 1bpp column-major video RAM displayed on
/// a rotated monochrome monitor behind a colored gel overlay.
pub struct InvadersSystem {
    pub cpu: I8080,
    pub bus: InvadersBus,

    // Interrupt schedule
    next_int: u8,
    next_int_at: u64,
}

impl InvadersSystem {
    pub fn new() -> Self {
        Self {
            cpu: I8080::new(),
            bus: InvadersBus::new(),
            next_int: RST_MID_SCREEN,
            next_int_at: 0,
        }
    }

    /// Load the 4-chip Midway ROM set into 0x0000-0x1FFF.
    pub fn load_rom_set(
        &mut self,
        rom_set: &RomSet,
        skip_checksums: bool,
    ) -> Result<(), RomLoadError> {
        let image = if skip_checksums {
            INVADERS_PROGRAM_ROM.load_skip_checksums(rom_set)?
        } else {
            INVADERS_PROGRAM_ROM.load(rom_set)?
        };
        self.bus.mem.load(0x0000, &image);
        Ok(())
    }

    /// Load a pre-assembled single-file program image at 0x0000 (composite
    /// dumps, test programs).
    pub fn load_composite(&mut self, image: &[u8]) {
        self.bus.mem.load(0x0000, image);
    }

    /// The RST opcode the next half-frame boundary will inject.
    pub fn next_interrupt(&self) -> u8 {
        self.next_int
    }
}

impl Default for InvadersSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for InvadersSystem {
    fn display_size(&self) -> (u32, u32) {
        (SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn run_frame(&mut self) {
        // Two half-frames: RST 1 at mid-screen, RST 2 at vblank. The CPU
        // drops the injection while interrupts are disabled, as the
        // hardware's pending request would be.
        for _ in 0..2 {
            self.next_int_at += HALF_FRAME_CYCLES;
            while self.cpu.cycles < self.next_int_at {
                self.cpu.step(&mut self.bus);
            }
            self.cpu.interrupt(&mut self.bus, self.next_int);
            self.next_int = if self.next_int == RST_MID_SCREEN {
                RST_VBLANK
            } else {
                RST_MID_SCREEN
            };
        }
    }

    fn render_frame(&self, buffer: &mut [u8]) {
        let vram = &self.bus.mem.as_slice()[VRAM_BASE..VRAM_BASE + VRAM_SIZE];
        rasterize(vram, buffer);
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        match button {
            INPUT_COIN => set_bit(&mut self.bus.port1, 0x01, pressed),
            INPUT_P1_START => set_bit(&mut self.bus.port1, 0x04, pressed),
            INPUT_P2_START => set_bit(&mut self.bus.port1, 0x02, pressed),
            INPUT_LEFT => {
                set_bit(&mut self.bus.port1, 0x20, pressed);
                set_bit(&mut self.bus.port2, 0x20, pressed);
            }
            INPUT_RIGHT => {
                set_bit(&mut self.bus.port1, 0x40, pressed);
                set_bit(&mut self.bus.port2, 0x40, pressed);
            }
            INPUT_FIRE => {
                set_bit(&mut self.bus.port1, 0x10, pressed);
                set_bit(&mut self.bus.port2, 0x10, pressed);
            }
            _ => {}
        }
    }

    fn input_map(&self) -> &[InputButton] {
        INVADERS_INPUT_MAP
    }

    fn reset(&mut self) {
        self.cpu = I8080::new();
        self.bus.port1 = 0;
        self.bus.port2 = 0;
        self.bus.shift_msb = 0;
        self.bus.shift_lsb = 0;
        self.bus.shift_offset = 0;
        self.next_int = RST_MID_SCREEN;
        self.next_int_at = 0;
        // ROM and RAM contents are left as loaded; the program clears its
        // own work area at boot.
    }
}

/// Active-high input bits: set on press, clear on release.
fn set_bit(reg: &mut u8, mask: u8, pressed: bool) {
    if pressed {
        *reg |= mask;
    } else {
        *reg &= !mask;
    }
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];
const GREEN: [u8; 3] = [0, 255, 0];
const RED: [u8; 3] = [255, 0, 0];
const CYAN: [u8; 3] = [0, 255, 255];

/// Convert the 1bpp video RAM into an RGB24 framebuffer.
///
/// VRAM is stored column-major: byte `i` covers screen column `i / 32`,
/// and bit `k` of that byte is the pixel `(i % 32) * 8 + k` positions up
/// from the bottom of the screen (the monitor is mounted rotated -90
/// degrees). Lit pixels take their color from the gel overlay taped over
/// the screen; unlit pixels are black.
pub fn rasterize(vram: &[u8], buffer: &mut [u8]) {
    let width = SCREEN_WIDTH as usize;
    for (i, &byte) in vram.iter().enumerate().take(VRAM_SIZE) {
        let col = i * 8 / SCREEN_HEIGHT as usize;
        let strip = i * 8 % SCREEN_HEIGHT as usize;
        for bit in 0..8 {
            let height = strip + bit; // distance from the bottom of the screen
            let color = if byte >> bit & 1 == 1 {
                overlay_color(height, col)
            } else {
                BLACK
            };
            let y = SCREEN_HEIGHT as usize - 1 - height;
            let offset = (y * width + col) * 3;
            buffer[offset..offset + 3].copy_from_slice(&color);
        }
    }
}

/// Gel overlay color for a lit pixel, in pre-rotation coordinates:
/// `height` is the distance up from the bottom edge (0-255), `col` the
/// screen column (0-223). The player/shield band is green, the UFO band
/// red, the bottom status line white at its edges, everything else cyan.
fn overlay_color(height: usize, col: usize) -> [u8; 3] {
    if height < 16 {
        if col < 16 || col > 134 { WHITE } else { GREEN }
    } else if height <= 72 {
        GREEN
    } else if (192..224).contains(&height) {
        RED
    } else {
        CYAN
    }
}

// ---------------------------------------------------------------------------
// Machine registry
// ---------------------------------------------------------------------------

fn create_machine(
    rom_set: &RomSet,
    skip_checksums: bool,
) -> Result<Box<dyn Machine>, RomLoadError> {
    let mut sys = InvadersSystem::new();
    sys.load_rom_set(rom_set, skip_checksums)?;
    Ok(Box::new(sys))
}

inventory::submit! {
    MachineEntry::new("invaders", "invaders", create_machine)
}
