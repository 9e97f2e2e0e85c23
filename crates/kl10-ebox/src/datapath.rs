//! The combinational half of a microcycle.
//!
//! `settle` recomputes every mux, adder, and shifter output from the
//! currently latched state and the current microword. It is a pure
//! function: reading it twice in one cycle gives the same answer, and
//! nothing here writes a register. The edge commit in `ebox` consumes the
//! snapshot.

use emu_core::{Word36, Word38};

use crate::alu;
use crate::cr::{
    AdaSel, AdbSel, ArmmSel, CondFunc, DispFunc, Microword, ScadaSel, ScadbSel, ShSel, SpecFunc,
    VmaxSel, ad,
};
use crate::fm::{self, FastMemory, FmPointer};
use crate::regs::Registers;

const M36: u64 = Word36::MASK;

/// Fixed-shift wire: append one zero.
#[must_use]
pub const fn mul2(x: u64) -> u64 {
    (x << 1) & M36
}

/// Fixed-shift wire: append two zeros.
#[must_use]
pub const fn mul4(x: u64) -> u64 {
    (x << 2) & M36
}

/// Fixed-shift wire: logical right by one.
#[must_use]
pub const fn div2(x: u64) -> u64 {
    x >> 1
}

/// Fixed-shift wire: logical right by two.
#[must_use]
pub const fn div4(x: u64) -> u64 {
    x >> 2
}

/// The settled combinational outputs of one cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataPath {
    /// Fast-memory block and AC pointer selected by FMADR.
    pub fm_block: u8,
    pub fm_ac: u8,
    /// Fast-memory word at that address.
    pub fm_out: u64,

    /// AD input operands (38-bit staged).
    pub ada: u64,
    pub adb: u64,
    /// ADX input operands.
    pub adxa: u64,
    pub adxb: u64,

    /// Main adder output, carry-extended, and its carry out of bit 0.
    pub ad: Word38,
    pub ad_cout: bool,
    /// Extension adder output, 36 bits, and its carry out.
    pub adx: u64,
    pub adx_cout: bool,

    /// SCAD input operands and output (10 bits).
    pub scada: u16,
    pub scadb: u16,
    pub scad: u16,
    pub scad_cout: bool,

    /// Shifter output.
    pub sh: u64,
    /// ARMM combiner output (18 bits).
    pub armm: u64,
    /// MQ mux output.
    pub mqm: u64,
    /// The VMA HELD / PC selection feeding the AR right half.
    pub vma_held_or_pc: u32,
}

impl DataPath {
    /// The architectural 36 bits of the main adder.
    #[must_use]
    pub const fn ad36(&self) -> u64 {
        self.ad.low36().get()
    }
}

/// Settle the data path for the current microword.
#[must_use]
pub fn settle(regs: &Registers, fm: &FastMemory, cr: &Microword) -> DataPath {
    let ar = regs.ar();
    let arx = regs.arx();
    let br = regs.br();
    let brx = regs.brx();
    let mq = regs.mq();
    let magic = cr.magic();

    // Fast memory address and output.
    let pointer = FmPointer {
        irac: regs.irac(),
        xr: regs.arx_14_17(),
        vma: regs.vma_32_35(),
        magic,
    };
    let fm_block = regs.current_block();
    let fm_ac = fm::ac_pointer(cr.fmadr(), &pointer);
    let fm_out = fm.read(fm_block, fm_ac);

    // AD operand staging. The B side is 38 bits wide so BR*2 and AR*4 keep
    // their top bits; the doubled forms pull their low bits up from the
    // extension registers.
    let ada = match cr.ada() {
        None => 0,
        Some(AdaSel::Ar) => ar,
        Some(AdaSel::Arx) => arx,
        Some(AdaSel::Mq) => mq,
        Some(AdaSel::Pc) => u64::from(regs.pc()),
    };
    let adb = match cr.adb() {
        AdbSel::Fm => fm_out,
        AdbSel::Br2 => (br << 1) | (brx >> 35),
        AdbSel::Br => br,
        AdbSel::Ar4 => (ar << 2) | (arx >> 34),
    };
    let adxa = match cr.ada() {
        None | Some(AdaSel::Pc) => 0,
        Some(AdaSel::Ar | AdaSel::Arx) => arx,
        Some(AdaSel::Mq) => mq,
    };
    let adxb = match cr.adb() {
        AdbSel::Fm => 0,
        AdbSel::Br2 => mul2(brx),
        AdbSel::Br => brx,
        AdbSel::Ar4 => mul4(arx),
    };

    // The adders. ADX settles first; its carry out is the extended carry
    // the XCRY codes feed into AD. Under an XCRY code the extension half
    // performs the add that generates that carry.
    let f = cr.ad();
    let adx_code = match alu::carry_mode(f) {
        alu::Carry::Xcry => ad::A_PLUS_B,
        _ => f,
    };
    let adx_out = alu::eval(adx_code, adxa, adxb, alu::carry_in(adx_code, false), 36);
    let hi_cin = match (cr.spec(), cr.disp()) {
        (Some(SpecFunc::InhCry18), _) | (_, Some(DispFunc::DramARd)) => Some(false),
        (Some(SpecFunc::GenCry18), _) => Some(true),
        _ => None,
    };
    let ad_out = alu::eval_split(f, ada, adb, alu::carry_in(f, adx_out.cout), hi_cin, 38);

    // SCAD and its operand muxes.
    let scada = match cr.scada() {
        None => 0,
        Some(ScadaSel::Fe) => regs.fe(),
        Some(ScadaSel::ArPos) => regs.ar_pos(),
        Some(ScadaSel::ArExp) => regs.ar_exp(),
        Some(ScadaSel::Magic) => u16::from(magic),
    };
    let scadb = match cr.scadb() {
        ScadbSel::Sc => regs.sc(),
        ScadbSel::ArSize => regs.ar_size(),
        ScadbSel::Ar0Thru8 => regs.ar_00_08(),
        ScadbSel::Magic => u16::from(magic),
    };
    let scad_code = cr.scad().ad_code();
    let scad_out = alu::eval(
        scad_code,
        u64::from(scada),
        u64::from(scadb),
        alu::carry_in(scad_code, false),
        10,
    );
    let scad = scad_out.value as u16;

    // The shifter.
    let sh = match cr.sh() {
        ShSel::ShiftArArx => {
            // 36-bit window into AR!ARX starting at bit SC.
            let n = u32::from(regs.sc() & 0o77);
            let combined = (u128::from(ar) << 36) | u128::from(arx);
            let w = if n <= 36 {
                (combined >> (36 - n)) as u64
            } else {
                (combined << (n - 36)) as u64
            };
            w & M36
        }
        ShSel::Ar => ar,
        ShSel::Arx => arx,
        ShSel::ArSwap => (ar >> 18) | ((ar & 0o777777) << 18),
    };

    // ARMM: nine left bits and five section bits, 13-17.
    let left9: u64 = match cr.armm() {
        ArmmSel::Magic => u64::from(magic),
        ArmmSel::ExpSign => {
            if ar >> 35 != 0 {
                0o777
            } else {
                0
            }
        }
        ArmmSel::ScadExp => u64::from(scad) & 0o377,
        ArmmSel::ScadPos => u64::from(scad) & 0o77,
    };
    let right5: u64 = match cr.vmax() {
        VmaxSel::PcSec => u64::from(regs.pc_13_17()),
        VmaxSel::PrevSec => u64::from(regs.vma_prev_sect()),
    };
    let armm = (left9 << 9) | right5;

    // MQ mux. The multiply step shifts MQ right two with the low ADX bits
    // entering at the top (AD long); REG CTL selects through the literal.
    let ad36 = ad_out.value & M36;
    let mqm = if cr.disp() == Some(DispFunc::Mul) {
        ((adx_out.value & 0o3) << 34) | div4(mq)
    } else if cr.spec() == Some(SpecFunc::MqShift) {
        mul2(mq)
    } else if cr.cond() == Some(CondFunc::RegCtl) {
        match magic & 0o3 {
            0 => sh,
            1 => ad36,
            2 => mul2(mq),
            _ => div4(mq),
        }
    } else {
        sh
    };

    let vma_held_or_pc = if cr.cond() == Some(CondFunc::SelVmaHeld) {
        regs.vma_held()
    } else {
        regs.pc()
    };

    DataPath {
        fm_block,
        fm_ac,
        fm_out,
        ada,
        adb,
        adxa,
        adxb,
        ad: Word38::new(ad_out.value),
        ad_cout: ad_out.cout,
        adx: adx_out.value,
        adx_cout: adx_out.cout,
        scada,
        scadb,
        scad,
        scad_cout: scad_out.cout,
        sh,
        armm,
        mqm,
        vma_held_or_pc,
    }
}
