use crate::core::Bus;
use crate::cpu::i8080::I8080;

impl I8080 {
    /// MOV r,r' / MOV r,M / MOV M,r — no flags. M is the byte at HL.
    /// Opcode mask: 01 ddd sss (0x76 is HLT, intercepted before dispatch)
    pub(crate) fn op_mov<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) {
        let val = match opcode & 0x07 {
            6 => bus.read(self.get_hl()),
            r => self.get_reg8(r),
        };
        match (opcode >> 3) & 0x07 {
            6 => bus.write(self.get_hl(), val),
            r => self.set_reg8(r, val),
        }
    }

    /// MVI r,d8 / MVI M,d8
    /// Opcode mask: 00 ddd 110
    pub(crate) fn op_mvi<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) {
        let val = self.fetch_byte(bus);
        match (opcode >> 3) & 0x07 {
            6 => bus.write(self.get_hl(), val),
            r => self.set_reg8(r, val),
        }
    }

    /// LXI rp,d16 — little-endian immediate into BC/DE/HL/SP.
    /// Opcode mask: 00 rr0 001
    pub(crate) fn op_lxi<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) {
        let val = self.fetch_word(bus);
        self.set_rp((opcode >> 4) & 0x03, val);
    }

    /// LDA a16
    pub(crate) fn op_lda<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        let addr = self.fetch_word(bus);
        self.a = bus.read(addr);
    }

    /// STA a16
    pub(crate) fn op_sta<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        let addr = self.fetch_word(bus);
        bus.write(addr, self.a);
    }

    /// LHLD a16 — L from addr, H from addr+1.
    pub(crate) fn op_lhld<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        let addr = self.fetch_word(bus);
        self.l = bus.read(addr);
        self.h = bus.read(addr.wrapping_add(1));
    }

    /// SHLD a16 — L to addr, H to addr+1.
    pub(crate) fn op_shld<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        let addr = self.fetch_word(bus);
        bus.write(addr, self.l);
        bus.write(addr.wrapping_add(1), self.h);
    }

    /// XCHG — swap HL and DE.
    pub(crate) fn op_xchg(&mut self) {
        std::mem::swap(&mut self.h, &mut self.d);
        std::mem::swap(&mut self.l, &mut self.e);
    }

    /// XTHL — swap HL with the word at [SP]. Both bytes are read before
    /// either is written.
    pub(crate) fn op_xthl<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        let lo = bus.read(self.sp);
        let hi = bus.read(self.sp.wrapping_add(1));
        bus.write(self.sp, self.l);
        bus.write(self.sp.wrapping_add(1), self.h);
        self.l = lo;
        self.h = hi;
    }
}
