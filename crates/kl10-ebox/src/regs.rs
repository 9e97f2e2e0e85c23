//! The architectural working registers and their bit-field taps.
//!
//! Every setter masks to the register's declared width, so out-of-range
//! values cannot be latched. Taps are named sub-ranges the muxes read:
//! byte-pointer position and size out of AR, the index field out of ARX,
//! the AC field out of VMA, sections out of PC.

use emu_core::{Word36, field};

/// Width mask for PC, VMA, VMA HELD, and ADR BREAK (23 bits: section plus
/// in-section address, word bits 13-35).
pub const ADDR_MASK: u32 = (1 << 23) - 1;

/// Width mask for FE and SC (10 bits).
pub const SC_MASK: u16 = (1 << 10) - 1;

/// The register file.
///
/// AR is one 36-bit value with independently enabled 18-bit halves; the
/// half setters exist for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    ar: u64,
    arx: u64,
    br: u64,
    brx: u64,
    mq: u64,
    pc: u32,
    vma: u32,
    vma_held: u32,
    vma_prev_sect: u8,
    adr_break: u32,
    ir: u16,
    irac: u8,
    fe: u16,
    sc: u16,
    current_block: u8,
}

impl Registers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every register.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub const fn ar(&self) -> u64 {
        self.ar
    }

    pub fn set_ar(&mut self, value: u64) {
        self.ar = value & Word36::MASK;
    }

    /// Left half of AR (bits 0-17).
    #[must_use]
    pub const fn arl(&self) -> u64 {
        self.ar >> 18
    }

    pub fn set_arl(&mut self, value: u64) {
        self.ar = (self.ar & 0o777777) | ((value & 0o777777) << 18);
    }

    /// Right half of AR (bits 18-35).
    #[must_use]
    pub const fn arr(&self) -> u64 {
        self.ar & 0o777777
    }

    pub fn set_arr(&mut self, value: u64) {
        self.ar = (self.ar & !0o777777) | (value & 0o777777);
    }

    #[must_use]
    pub const fn arx(&self) -> u64 {
        self.arx
    }

    pub fn set_arx(&mut self, value: u64) {
        self.arx = value & Word36::MASK;
    }

    #[must_use]
    pub const fn br(&self) -> u64 {
        self.br
    }

    pub fn set_br(&mut self, value: u64) {
        self.br = value & Word36::MASK;
    }

    #[must_use]
    pub const fn brx(&self) -> u64 {
        self.brx
    }

    pub fn set_brx(&mut self, value: u64) {
        self.brx = value & Word36::MASK;
    }

    #[must_use]
    pub const fn mq(&self) -> u64 {
        self.mq
    }

    pub fn set_mq(&mut self, value: u64) {
        self.mq = value & Word36::MASK;
    }

    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    pub fn set_pc(&mut self, value: u32) {
        self.pc = value & ADDR_MASK;
    }

    #[must_use]
    pub const fn vma(&self) -> u32 {
        self.vma
    }

    pub fn set_vma(&mut self, value: u32) {
        self.vma = value & ADDR_MASK;
    }

    #[must_use]
    pub const fn vma_held(&self) -> u32 {
        self.vma_held
    }

    pub fn set_vma_held(&mut self, value: u32) {
        self.vma_held = value & ADDR_MASK;
    }

    /// Previous-context section (5 bits).
    #[must_use]
    pub const fn vma_prev_sect(&self) -> u8 {
        self.vma_prev_sect
    }

    pub fn set_vma_prev_sect(&mut self, value: u8) {
        self.vma_prev_sect = value & 0o37;
    }

    #[must_use]
    pub const fn adr_break(&self) -> u32 {
        self.adr_break
    }

    pub fn set_adr_break(&mut self, value: u32) {
        self.adr_break = value & ADDR_MASK;
    }

    /// Instruction register: instruction bits 0-11 (12 bits).
    #[must_use]
    pub const fn ir(&self) -> u16 {
        self.ir
    }

    pub fn set_ir(&mut self, value: u16) {
        self.ir = value & 0o7777;
    }

    /// Opcode: IR bits 0-8.
    #[must_use]
    pub const fn opcode(&self) -> u16 {
        self.ir >> 3
    }

    /// AC field of the instruction (4 bits).
    #[must_use]
    pub const fn irac(&self) -> u8 {
        self.irac
    }

    pub fn set_irac(&mut self, value: u8) {
        self.irac = value & 0o17;
    }

    /// Floating exponent / shift assist (10 bits).
    #[must_use]
    pub const fn fe(&self) -> u16 {
        self.fe
    }

    pub fn set_fe(&mut self, value: u16) {
        self.fe = value & SC_MASK;
    }

    /// FE bit 0 (the sign of the 10-bit value).
    #[must_use]
    pub const fn fe0(&self) -> bool {
        self.fe >> 9 != 0
    }

    /// Shift count (10 bits).
    #[must_use]
    pub const fn sc(&self) -> u16 {
        self.sc
    }

    pub fn set_sc(&mut self, value: u16) {
        self.sc = value & SC_MASK;
    }

    /// AC block selector (3 bits).
    #[must_use]
    pub const fn current_block(&self) -> u8 {
        self.current_block
    }

    pub fn set_current_block(&mut self, value: u8) {
        self.current_block = value & 0o7;
    }

    // === Taps ===

    /// Byte-pointer position: AR bits 0-5.
    #[must_use]
    pub fn ar_pos(&self) -> u16 {
        field::extract(self.ar, 0, 5, 36) as u16
    }

    /// Byte-pointer size: AR bits 6-11.
    #[must_use]
    pub fn ar_size(&self) -> u16 {
        field::extract(self.ar, 6, 11, 36) as u16
    }

    /// Floating exponent: AR bits 1-8.
    #[must_use]
    pub fn ar_exp(&self) -> u16 {
        field::extract(self.ar, 1, 8, 36) as u16
    }

    /// AR bits 0-8.
    #[must_use]
    pub fn ar_00_08(&self) -> u16 {
        field::extract(self.ar, 0, 8, 36) as u16
    }

    /// AR bits 0-12.
    #[must_use]
    pub fn ar_00_12(&self) -> u16 {
        field::extract(self.ar, 0, 12, 36) as u16
    }

    /// Shift count out of a shift-class effective address: AR bit 18 is
    /// the sign, bits 28-35 the magnitude.
    #[must_use]
    pub fn ar_shift(&self) -> u16 {
        let sign = field::extract(self.ar, 18, 18, 36) as u16;
        let mag = field::extract(self.ar, 28, 35, 36) as u16;
        sign << 8 | mag
    }

    /// Index field: ARX bits 14-17.
    #[must_use]
    pub fn arx_14_17(&self) -> u8 {
        field::extract(self.arx, 14, 17, 36) as u8
    }

    /// AC address out of VMA: bits 32-35 of the word, the low 4 bits.
    #[must_use]
    pub const fn vma_32_35(&self) -> u8 {
        (self.vma & 0o17) as u8
    }

    /// PC section: word bits 13-17, the top 5 of the 23-bit value.
    #[must_use]
    pub const fn pc_13_17(&self) -> u8 {
        (self.pc >> 18) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_mask_to_declared_width() {
        let mut r = Registers::new();
        r.set_ar(u64::MAX);
        assert_eq!(r.ar(), Word36::MASK);
        r.set_pc(u32::MAX);
        assert_eq!(r.pc(), ADDR_MASK);
        r.set_fe(0o7777);
        assert_eq!(r.fe(), 0o1777);
        r.set_irac(0o37);
        assert_eq!(r.irac(), 0o17);
        r.set_current_block(0o17);
        assert_eq!(r.current_block(), 0o7);
    }

    #[test]
    fn ar_halves_load_independently() {
        let mut r = Registers::new();
        r.set_ar(0o123456654321);
        r.set_arr(0o111111);
        assert_eq!(r.ar(), 0o123456111111);
        r.set_arl(0o222222);
        assert_eq!(r.ar(), 0o222222111111);
    }

    #[test]
    fn byte_pointer_taps() {
        let mut r = Registers::new();
        // P=44, S=10 (a word-aligned 8-bit byte pointer).
        r.set_ar(0o441000000000 | 0o654321);
        assert_eq!(r.ar_pos(), 0o44);
        assert_eq!(r.ar_size(), 0o10);
    }

    #[test]
    fn shift_tap_carries_the_sign() {
        let mut r = Registers::new();
        r.set_ar(0o000000_400017);
        assert_eq!(r.ar_shift(), 0o400 | 0o17);
        r.set_ar(0o000000_000017);
        assert_eq!(r.ar_shift(), 0o17);
    }

    #[test]
    fn section_taps() {
        let mut r = Registers::new();
        r.set_pc(0o03_123456);
        assert_eq!(r.pc_13_17(), 0o3);
        r.set_vma(0o00_001234);
        assert_eq!(r.vma_32_35(), 0o14);
    }

    #[test]
    fn opcode_is_the_top_nine_bits_of_ir() {
        let mut r = Registers::new();
        r.set_ir(0o254_3);
        assert_eq!(r.opcode(), 0o254);
    }
}
