//! The EBOX: the unit graph and the clock that drives it.
//!
//! One `cycle()` is one microcycle: settle the combinational data path
//! from the latched state, commit every clocked unit from that snapshot,
//! then advance CRADR and latch the next microword. No clocked unit ever
//! reads another clocked unit's new value within the edge: every consumer
//! of a register samples the pre-edge value captured before any latch.

use emu_core::{Observable, Tickable, Value, Word36, Word84};

use crate::cr::{ArSel, ArxSel, CondFunc, MemFunc, Microword, SpecFunc, VmaSel};
use crate::datapath::{self, DataPath};
use crate::dr::DispatchWord;
use crate::error::EboxError;
use crate::flags::Flags;
use crate::fm::FastMemory;
use crate::mbox::Mbox;
use crate::regs::{ADDR_MASK, Registers};
use crate::seq::{DispatchInputs, Sequencer};
use crate::store::{Cram, Dram};

const M36: u64 = Word36::MASK;

/// The KL10 execution box.
pub struct Ebox {
    pub regs: Registers,
    pub flags: Flags,
    pub fm: FastMemory,
    pub mbox: Mbox,
    cram: Cram,
    dram: Dram,
    cr: Microword,
    dr: DispatchWord,
    seq: Sequencer,
    failure: Option<EboxError>,
    cycles: u64,
    serial: u16,
}

impl Ebox {
    /// Create an EBOX with `mem_words` of main memory, in reset state.
    #[must_use]
    pub fn new(mem_words: usize) -> Self {
        let mut ebox = Self {
            regs: Registers::new(),
            flags: Flags::new(),
            fm: FastMemory::new(),
            mbox: Mbox::new(mem_words),
            cram: Cram::new(),
            dram: Dram::new(),
            cr: Microword::default(),
            dr: DispatchWord::default(),
            seq: Sequencer::new(),
            failure: None,
            cycles: 0,
            serial: 0o1001,
        };
        ebox.reset();
        ebox
    }

    /// The machine serial number (a constant source; model B numbers are
    /// above 1000 octal). Survives reset.
    #[must_use]
    pub fn serial(&self) -> u16 {
        self.serial
    }

    pub fn set_serial(&mut self, serial: u16) {
        self.serial = serial;
    }

    /// Master reset: clear the registers and both control stores, then
    /// cycle the clock four times with zeroed CR and DR (the microcode's
    /// power-up convention). Idempotent.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.flags.reset();
        self.fm.reset();
        self.mbox.reset();
        self.cram.clear();
        self.dram.clear();
        self.cr = Microword::default();
        self.dr = DispatchWord::default();
        self.seq.reset();
        self.failure = None;
        self.cycles = 0;
        for _ in 0..4 {
            self.cycle();
        }
    }

    /// Set the run flip-flop. The machine crate's loop polls it.
    pub fn run(&mut self) {
        self.flags.run = true;
    }

    /// Clear the run flip-flop. Checked between cycles only.
    pub fn halt(&mut self) {
        self.flags.run = false;
    }

    /// Whether the run flip-flop is set and no failure has latched.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.flags.run && self.failure.is_none()
    }

    /// The fatal error that stopped the core, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&EboxError> {
        self.failure.as_ref()
    }

    /// Current microaddress.
    #[must_use]
    pub fn cradr(&self) -> u16 {
        self.seq.cradr()
    }

    /// Force the microaddress (console entry) and latch its microword.
    pub fn set_cradr(&mut self, addr: u16) {
        self.seq.set_cradr(addr);
        self.cr = Microword::new(self.cram.read(self.seq.cradr()));
    }

    /// The microword in flight.
    #[must_use]
    pub fn cr(&self) -> Microword {
        self.cr
    }

    /// The dispatch word in flight.
    #[must_use]
    pub fn dr(&self) -> DispatchWord {
        self.dr
    }

    /// Total microcycles since reset.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Arm the page-fail sentinel: the next cycle traps to 1777.
    pub fn force_page_fail(&mut self) {
        self.seq.force_page_fail();
    }

    /// Load one microword.
    pub fn load_cram(&mut self, addr: u16, word: Word84) {
        self.cram.write(addr, word);
    }

    /// Load one dispatch word.
    pub fn load_dram(&mut self, addr: u16, word: DispatchWord) {
        self.dram.write(addr, word);
    }

    /// Write one word of main memory.
    pub fn write_mem(&mut self, addr: u32, word: Word36) -> Result<(), EboxError> {
        self.mbox.write(addr, word.get())
    }

    /// Read one word of main memory.
    pub fn read_mem(&self, addr: u32) -> Result<Word36, EboxError> {
        self.mbox.read(addr).map(Word36::new)
    }

    /// One microcycle. A latched failure makes this a no-op.
    pub fn cycle(&mut self) {
        if self.failure.is_some() {
            return;
        }

        // Combinational settle, plus the pre-edge samples the sequencer
        // and the edge commit need.
        let dp = datapath::settle(&self.regs, &self.fm, &self.cr);
        let disp_inp = DispatchInputs {
            fe0: self.regs.fe0(),
            mq_34_35: (self.regs.mq() & 0o3) as u8,
        };
        let dr = self.dr;

        // Clock edge.
        if let Err(e) = self.commit(&dp) {
            self.fail(e);
            return;
        }

        // Next microaddress from pre-edge CR/DR and the settled data path.
        match self.seq.advance(&self.cr, dr, &self.flags, disp_inp) {
            Ok(next) => self.cr = Microword::new(self.cram.read(next)),
            Err(e) => {
                self.fail(e);
                return;
            }
        }
        self.cycles += 1;
    }

    fn fail(&mut self, e: EboxError) {
        eprintln!("kl10-ebox: core fault: {e}");
        self.failure = Some(e);
        self.flags.run = false;
    }

    /// Commit every clocked unit from the settled snapshot.
    fn commit(&mut self, dp: &DataPath) -> Result<(), EboxError> {
        let cr = self.cr;
        let cond = cr.cond();
        let ad36 = dp.ad36();

        // Pre-edge values. Latches below must only read these.
        let old_ar = self.regs.ar();
        let old_arx = self.regs.arx();
        let old_mq = self.regs.mq();
        let old_pc = self.regs.pc();
        let old_vma = self.regs.vma();
        let old_fe = self.regs.fe();
        let old_ir = self.regs.ir();
        let old_mb = self.mbox.mb();
        let old_ar_shift = self.regs.ar_shift();

        // Memory request. Read data lands in MB for the next cycle except
        // for the direct register loads; a bad address faults the core
        // before any register latches.
        let mut mem_ar = None;
        let mut mem_arx = None;
        match cr.mem() {
            MemFunc::Nop
            | MemFunc::ArlInd
            | MemFunc::MbWait
            | MemFunc::RegFunc
            | MemFunc::EaCalc
            | MemFunc::RestoreVma => {}
            MemFunc::ARd | MemFunc::Rw | MemFunc::Rpw | MemFunc::Fetch | MemFunc::Ifet => {
                self.mbox.request_read(old_vma)?;
            }
            MemFunc::LoadAr => mem_ar = Some(self.mbox.request_read(old_vma)?),
            MemFunc::LoadArx => mem_arx = Some(self.mbox.request_read(old_vma)?),
            MemFunc::Write | MemFunc::BWrite => self.mbox.write(old_vma, old_ar)?,
            MemFunc::AdFunc => self.mbox.write(old_vma, ad36)?,
        }

        // AR. The ARMM select feeds the halves from different sources;
        // everything else splits one 36-bit word.
        let halves = |w: u64| (w >> 18, w & 0o777777);
        let ar_in = match cr.ar() {
            ArSel::Hold => None,
            ArSel::Armm => Some((dp.armm, u64::from(dp.vma_held_or_pc) & 0o777777)),
            ArSel::Cache => Some(halves(old_mb)),
            ArSel::Ad => Some(halves(ad36)),
            ArSel::Sh => Some(halves(dp.sh)),
            ArSel::Ad2 => Some(halves(((dp.ad.get() << 1) | (dp.adx >> 35)) & M36)),
            ArSel::Adx => Some(halves(dp.adx)),
            ArSel::Ad025 => Some(halves((dp.ad.get() >> 2) & M36)),
        };
        if let Some((left, right)) = ar_in {
            let ctl = cr.ar_ctl();
            let both = !ctl.arl && !ctl.arr;
            if both || ctl.arl {
                self.regs.set_arl(left);
            }
            if both || ctl.arr {
                self.regs.set_arr(right);
            }
        }
        if let Some(word) = mem_ar {
            self.regs.set_ar(word);
        }

        // ARX.
        let arx_in = match cr.arx() {
            ArxSel::Hold => None,
            ArxSel::Cache => Some(old_mb),
            ArxSel::Ad => Some(ad36),
            ArxSel::Mq => Some(old_mq),
            ArxSel::Sh => Some(dp.sh),
            ArxSel::Adx2 => Some(((dp.adx << 1) | (old_mq >> 35)) & M36),
            ArxSel::Adx => Some(dp.adx),
            ArxSel::Adx025 => Some(((dp.adx >> 2) | ((dp.ad.get() & 0o3) << 34)) & M36),
        };
        if let Some(word) = arx_in {
            self.regs.set_arx(word);
        }
        if let Some(word) = mem_arx {
            self.regs.set_arx(word);
        }

        // Staging registers.
        if cr.br_load() {
            self.regs.set_br(old_ar);
        }
        if cr.brx_load() {
            self.regs.set_brx(old_arx);
        }
        if cr.mq_load() {
            self.regs.set_mq(dp.mqm);
        }

        // FE: load / shift right / shift left / hold, from the FE bit and
        // the FE SHRT condition. Right shifts hold the sign bit.
        match (cr.fe_load(), cond == Some(CondFunc::FeShrt)) {
            (false, false) => {}
            (true, false) => self.regs.set_fe(dp.scad),
            (false, true) => self.regs.set_fe((old_fe >> 1) | (old_fe & 0o1000)),
            (true, true) => self.regs.set_fe(old_fe << 1),
        }

        // SC through the SCM recirculation mux.
        match (cr.sc_load(), cr.spec() == Some(SpecFunc::ScmAlt)) {
            (false, false) => {}
            (true, false) => self.regs.set_sc(dp.scad),
            (false, true) => self.regs.set_sc(u16::from(cr.magic())),
            (true, true) => self.regs.set_sc(old_ar_shift),
        }

        // IR and its AC field, from AD.
        if cond == Some(CondFunc::LoadIr) {
            let word = Word36::new(ad36);
            self.regs.set_ir(word.f(0, 11) as u16);
            self.regs.set_irac(word.f(9, 12) as u8);
        }

        // Fast memory write.
        if cond == Some(CondFunc::FmWrite) {
            self.fm.write(dp.fm_block, dp.fm_ac, old_ar);
        }

        // VMA. The COND-driven loads override the VMA field; the literal
        // forms load the # value (the TRAP/MODE/AR/PI modifiers are not
        // applied; see DESIGN.md).
        let vma_next = match cond {
            Some(
                CondFunc::VmaMagic
                | CondFunc::VmaMagicTrap
                | CondFunc::VmaMagicMode
                | CondFunc::VmaMagicAr
                | CondFunc::VmaMagicPi,
            ) => Some(u32::from(cr.magic())),
            Some(CondFunc::VmaDec) => Some(old_vma.wrapping_sub(1) & ADDR_MASK),
            Some(CondFunc::VmaInc) => Some(old_vma.wrapping_add(1) & ADDR_MASK),
            _ if cr.mem() == MemFunc::RestoreVma => Some(self.regs.vma_held()),
            _ => match cr.vma() {
                VmaSel::Hold => None,
                VmaSel::Pc => {
                    if cr.spec() == Some(SpecFunc::LoadPc) {
                        // PC is loading this edge; VMA takes AD instead.
                        Some((ad36 & u64::from(ADDR_MASK)) as u32)
                    } else {
                        Some(old_pc)
                    }
                }
                VmaSel::PcPlus1 => Some((old_pc & !0o777777) | ((old_pc + 1) & 0o777777)),
                VmaSel::Ad => Some((ad36 & u64::from(ADDR_MASK)) as u32),
            },
        };
        if let Some(vma) = vma_next {
            self.regs.set_vma(vma);
        }
        if cond == Some(CondFunc::LdVmaHeld) {
            self.regs.set_vma_held(old_vma);
        }

        // PC latches from VMA.
        if cr.spec() == Some(SpecFunc::LoadPc) {
            self.regs.set_pc(old_vma);
        }

        // DR latches from the dispatch RAM addressed by the pre-edge
        // opcode, one cycle behind an IR load.
        self.dr = self.dram.read(old_ir >> 3);

        Ok(())
    }
}

impl Tickable for Ebox {
    fn tick(&mut self) {
        self.cycle();
    }
}

impl Observable for Ebox {
    fn query(&self, path: &str) -> Option<Value> {
        Some(match path {
            "cradr" => Value::U16(self.seq.cradr()),
            "cr" => Value::String(self.cr.word().to_string()),
            "dr" => Value::U32(self.dr.get()),
            "cycles" => Value::U64(self.cycles),
            "serial" => Value::U16(self.serial),
            "failure" => match &self.failure {
                Some(e) => Value::String(e.to_string()),
                None => Value::Bool(false),
            },
            "regs.ar" => Value::U64(self.regs.ar()),
            "regs.arx" => Value::U64(self.regs.arx()),
            "regs.br" => Value::U64(self.regs.br()),
            "regs.brx" => Value::U64(self.regs.brx()),
            "regs.mq" => Value::U64(self.regs.mq()),
            "regs.pc" => Value::U32(self.regs.pc()),
            "regs.vma" => Value::U32(self.regs.vma()),
            "regs.vma_held" => Value::U32(self.regs.vma_held()),
            "regs.ir" => Value::U16(self.regs.ir()),
            "regs.irac" => Value::U8(self.regs.irac()),
            "regs.fe" => Value::U16(self.regs.fe()),
            "regs.sc" => Value::U16(self.regs.sc()),
            "regs.current_block" => Value::U8(self.regs.current_block()),
            "flags.run" => Value::Bool(self.flags.run),
            "flags.user" => Value::Bool(self.flags.user),
            "flags.pi_cycle" => Value::Bool(self.flags.pi_cycle),
            _ => return None,
        })
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cradr",
            "cr",
            "dr",
            "cycles",
            "serial",
            "failure",
            "regs.ar",
            "regs.arx",
            "regs.br",
            "regs.brx",
            "regs.mq",
            "regs.pc",
            "regs.vma",
            "regs.vma_held",
            "regs.ir",
            "regs.irac",
            "regs.fe",
            "regs.sc",
            "regs.current_block",
            "flags.run",
            "flags.user",
            "flags.pi_cycle",
        ]
    }
}
