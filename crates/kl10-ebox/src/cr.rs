//! The current-microword register and its named field views.
//!
//! A microword is 84 bits. The field positions here are the model B
//! arrangement; `fields` carries the same layout as a data-driven catalog
//! under the literal vendor names. COND and SKIP share bits 60-65 (SKIP
//! codes have bit 60 set); DISP and SPEC share bits 67-71 (SPEC codes are
//! the middle value range).

use emu_core::Word84;

/// Field positions as (s, e) inclusive MSB-to-LSB bit ranges.
pub mod fld {
    pub const J: (u32, u32) = (1, 11);
    pub const AD: (u32, u32) = (12, 17);
    pub const ADA: (u32, u32) = (18, 20);
    pub const ADA_EN: (u32, u32) = (18, 18);
    pub const ADB: (u32, u32) = (22, 23);
    pub const AR: (u32, u32) = (24, 26);
    pub const ARX: (u32, u32) = (27, 29);
    pub const BR: (u32, u32) = (30, 30);
    pub const BRX: (u32, u32) = (31, 31);
    pub const MQ: (u32, u32) = (32, 32);
    pub const FMADR: (u32, u32) = (33, 35);
    pub const SCAD: (u32, u32) = (36, 38);
    pub const SCADA: (u32, u32) = (39, 41);
    pub const SCADA_EN: (u32, u32) = (39, 39);
    pub const SCADB: (u32, u32) = (42, 43);
    pub const SC: (u32, u32) = (44, 44);
    pub const FE: (u32, u32) = (45, 45);
    pub const SH: (u32, u32) = (46, 47);
    pub const ARMM: (u32, u32) = (49, 50);
    pub const VMAX: (u32, u32) = (51, 51);
    pub const VMA: (u32, u32) = (52, 53);
    pub const TIME: (u32, u32) = (54, 55);
    pub const MEM: (u32, u32) = (56, 59);
    pub const COND: (u32, u32) = (60, 65);
    pub const SKIP: (u32, u32) = (60, 65);
    pub const CALL: (u32, u32) = (66, 66);
    pub const DISP: (u32, u32) = (67, 71);
    pub const SPEC: (u32, u32) = (67, 71);
    pub const AR_CTL: (u32, u32) = (73, 74);
    pub const MARK: (u32, u32) = (75, 75);
    pub const MAGIC: (u32, u32) = (76, 83);
}

/// Named AD function codes.
///
/// Codes below 40 are arithmetic, 40 and up are boolean; see `alu` for the
/// evaluation rules. Only the codes the microcode names are listed; the
/// slice itself is total over all 64.
pub mod ad {
    pub const A: u8 = 0o00;
    pub const A_XCRY: u8 = 0o01;
    pub const XCRY_MINUS_1: u8 = 0o02;
    pub const A_PLUS_ANDCB: u8 = 0o04;
    pub const OR_PLUS_ANDCB: u8 = 0o05;
    pub const A_MINUS_B_MINUS_1: u8 = 0o06;
    pub const ANDCB_MINUS_1: u8 = 0o07;
    pub const A_PLUS_AND: u8 = 0o10;
    pub const A_PLUS_B: u8 = 0o11;
    pub const AND_PLUS_ORCB: u8 = 0o12;
    pub const AND_MINUS_1: u8 = 0o13;
    pub const A_2: u8 = 0o14;
    pub const A_PLUS_OR: u8 = 0o15;
    pub const A_PLUS_ORCB: u8 = 0o16;
    pub const A_MINUS_1: u8 = 0o17;
    pub const A_PLUS_1: u8 = 0o20;
    pub const OR_PLUS_1: u8 = 0o21;
    pub const ORCB_PLUS_1: u8 = 0o22;
    pub const A_MINUS_B: u8 = 0o26;
    pub const A_PLUS_B_PLUS_1: u8 = 0o31;
    pub const A_2_PLUS_1: u8 = 0o34;

    pub const SETCA: u8 = 0o40;
    pub const NOR: u8 = 0o41;
    pub const ANDCA: u8 = 0o42;
    pub const ZEROS: u8 = 0o43;
    pub const ORC: u8 = 0o44;
    pub const SETCB: u8 = 0o45;
    pub const XOR: u8 = 0o46;
    pub const ANDCB: u8 = 0o47;
    pub const ORCA: u8 = 0o50;
    pub const EQV: u8 = 0o51;
    pub const B: u8 = 0o52;
    pub const AND: u8 = 0o53;
    pub const ONES: u8 = 0o54;
    pub const ORCB: u8 = 0o55;
    pub const OR: u8 = 0o56;
    pub const SETA: u8 = 0o57;
}

/// ADA mux select (A input of AD). Bit 18 disables the mux to zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaSel {
    Ar,
    Arx,
    Mq,
    Pc,
}

impl AdaSel {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o3 {
            0 => Self::Ar,
            1 => Self::Arx,
            2 => Self::Mq,
            _ => Self::Pc,
        }
    }
}

/// ADB mux select (B input of AD).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdbSel {
    Fm,
    Br2,
    Br,
    Ar4,
}

impl AdbSel {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o3 {
            0 => Self::Fm,
            1 => Self::Br2,
            2 => Self::Br,
            _ => Self::Ar4,
        }
    }
}

/// AR mux select. Zero recirculates (no load).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArSel {
    Hold,
    Armm,
    Cache,
    Ad,
    Sh,
    Ad2,
    Adx,
    Ad025,
}

impl ArSel {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o7 {
            0 => Self::Hold,
            1 => Self::Armm,
            2 => Self::Cache,
            3 => Self::Ad,
            4 => Self::Sh,
            5 => Self::Ad2,
            6 => Self::Adx,
            _ => Self::Ad025,
        }
    }
}

/// ARX mux select. Zero recirculates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArxSel {
    Hold,
    Cache,
    Ad,
    Mq,
    Sh,
    Adx2,
    Adx,
    Adx025,
}

impl ArxSel {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o7 {
            0 => Self::Hold,
            1 => Self::Cache,
            2 => Self::Ad,
            3 => Self::Mq,
            4 => Self::Sh,
            5 => Self::Adx2,
            6 => Self::Adx,
            _ => Self::Adx025,
        }
    }
}

/// Fast-memory address select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmAdr {
    Ac0,
    Ac1,
    Xr,
    Vma,
    Ac2,
    Ac3,
    AcPlusMagic,
    Magic,
}

impl FmAdr {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o7 {
            0 => Self::Ac0,
            1 => Self::Ac1,
            2 => Self::Xr,
            3 => Self::Vma,
            4 => Self::Ac2,
            5 => Self::Ac3,
            6 => Self::AcPlusMagic,
            _ => Self::Magic,
        }
    }
}

/// SCAD function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScadFunc {
    A,
    AMinusBMinus1,
    APlusB,
    AMinus1,
    APlus1,
    AMinusB,
    Or,
    And,
}

impl ScadFunc {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o7 {
            0 => Self::A,
            1 => Self::AMinusBMinus1,
            2 => Self::APlusB,
            3 => Self::AMinus1,
            4 => Self::APlus1,
            5 => Self::AMinusB,
            6 => Self::Or,
            _ => Self::And,
        }
    }

    /// The equivalent AD code; SCAD shares the slice model.
    #[must_use]
    pub const fn ad_code(self) -> u8 {
        match self {
            Self::A => ad::A,
            Self::AMinusBMinus1 => ad::A_MINUS_B_MINUS_1,
            Self::APlusB => ad::A_PLUS_B,
            Self::AMinus1 => ad::A_MINUS_1,
            Self::APlus1 => ad::A_PLUS_1,
            Self::AMinusB => ad::A_MINUS_B,
            Self::Or => ad::OR,
            Self::And => ad::AND,
        }
    }
}

/// SCADA mux select. Bit 39 disables the mux to zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScadaSel {
    Fe,
    ArPos,
    ArExp,
    Magic,
}

impl ScadaSel {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o3 {
            0 => Self::Fe,
            1 => Self::ArPos,
            2 => Self::ArExp,
            _ => Self::Magic,
        }
    }
}

/// SCADB mux select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScadbSel {
    Sc,
    ArSize,
    Ar0Thru8,
    Magic,
}

impl ScadbSel {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o3 {
            0 => Self::Sc,
            1 => Self::ArSize,
            2 => Self::Ar0Thru8,
            _ => Self::Magic,
        }
    }
}

/// Shifter function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShSel {
    /// Combined AR!ARX barrel shift left by SC.
    ShiftArArx,
    Ar,
    Arx,
    /// AR with halves swapped.
    ArSwap,
}

impl ShSel {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o3 {
            0 => Self::ShiftArArx,
            1 => Self::Ar,
            2 => Self::Arx,
            _ => Self::ArSwap,
        }
    }
}

/// ARMM left-mux select (bits 0-8 of the ARMM result).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmmSel {
    Magic,
    ExpSign,
    ScadExp,
    ScadPos,
}

impl ArmmSel {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o3 {
            0 => Self::Magic,
            1 => Self::ExpSign,
            2 => Self::ScadExp,
            _ => Self::ScadPos,
        }
    }
}

/// ARMM right-mux select (bits 13-17 of the ARMM result).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmaxSel {
    PcSec,
    PrevSec,
}

/// VMA input select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmaSel {
    Hold,
    Pc,
    PcPlus1,
    Ad,
}

impl VmaSel {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o3 {
            0 => Self::Hold,
            1 => Self::Pc,
            2 => Self::PcPlus1,
            _ => Self::Ad,
        }
    }
}

/// Memory request function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemFunc {
    Nop,
    ArlInd,
    MbWait,
    RestoreVma,
    ARd,
    BWrite,
    Fetch,
    RegFunc,
    AdFunc,
    EaCalc,
    LoadAr,
    LoadArx,
    Rw,
    Rpw,
    Write,
    Ifet,
}

impl MemFunc {
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0o17 {
            0o00 => Self::Nop,
            0o01 => Self::ArlInd,
            0o02 => Self::MbWait,
            0o03 => Self::RestoreVma,
            0o04 => Self::ARd,
            0o05 => Self::BWrite,
            0o06 => Self::Fetch,
            0o07 => Self::RegFunc,
            0o10 => Self::AdFunc,
            0o11 => Self::EaCalc,
            0o12 => Self::LoadAr,
            0o13 => Self::LoadArx,
            0o14 => Self::Rw,
            0o15 => Self::Rpw,
            0o16 => Self::Write,
            _ => Self::Ifet,
        }
    }
}

/// Non-skip condition functions (COND codes 00-37 of bits 60-65).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondFunc {
    Nop,
    LoadIr,
    FmWrite,
    FeShrt,
    RegCtl,
    VmaMagic,
    VmaMagicTrap,
    VmaMagicMode,
    VmaMagicAr,
    VmaMagicPi,
    VmaDec,
    VmaInc,
    LdVmaHeld,
    SelVmaHeld,
    ArlInd,
    Diag,
}

impl CondFunc {
    /// Decode a COND value. Unassigned codes read as `None` and act as NOP.
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0o77 {
            0o00 => Some(Self::Nop),
            0o01 => Some(Self::LoadIr),
            0o02 => Some(Self::FmWrite),
            0o03 => Some(Self::FeShrt),
            0o04 => Some(Self::RegCtl),
            0o05 => Some(Self::VmaMagic),
            0o06 => Some(Self::VmaMagicTrap),
            0o07 => Some(Self::VmaMagicMode),
            0o10 => Some(Self::VmaMagicAr),
            0o11 => Some(Self::VmaMagicPi),
            0o12 => Some(Self::VmaDec),
            0o13 => Some(Self::VmaInc),
            0o14 => Some(Self::LdVmaHeld),
            0o15 => Some(Self::SelVmaHeld),
            0o16 => Some(Self::ArlInd),
            0o17 => Some(Self::Diag),
            _ => None,
        }
    }
}

/// Skip conditions (SKIP codes 40-77 of bits 60-65).
///
/// The `Not` suffix marks conditions that test the complement of the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipCond {
    Run,
    Kernel,
    User,
    Public,
    Fetch,
    RpwRef,
    PiCycle,
    EbusGrantNot,
    EbusXferNot,
    Intrpt,
    IoLegal,
    PxsXct,
    VmaSec0Not,
    AcRef,
    MtrReqNot,
    StartNot,
}

impl SkipCond {
    /// Decode a SKIP value. Unassigned codes read as `None` and test false.
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0o77 {
            0o40 => Some(Self::Run),
            0o41 => Some(Self::Kernel),
            0o42 => Some(Self::User),
            0o43 => Some(Self::Public),
            0o44 => Some(Self::Fetch),
            0o45 => Some(Self::RpwRef),
            0o46 => Some(Self::PiCycle),
            0o47 => Some(Self::EbusGrantNot),
            0o50 => Some(Self::EbusXferNot),
            0o51 => Some(Self::Intrpt),
            0o52 => Some(Self::IoLegal),
            0o53 => Some(Self::PxsXct),
            0o54 => Some(Self::VmaSec0Not),
            0o55 => Some(Self::AcRef),
            0o56 => Some(Self::MtrReqNot),
            0o57 => Some(Self::StartNot),
            _ => None,
        }
    }
}

/// Dispatch functions (DISP codes 00-07 and 30-37 of bits 67-71).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispFunc {
    Diag,
    DramJ,
    DramARd,
    Return,
    PgFail,
    Sr,
    Nicond,
    Sh0Thru3,
    Mul,
    Div,
    Signs,
    DramB,
    Byte,
    EaMod,
    Norm,
}

impl DispFunc {
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0o37 {
            0o00 => Some(Self::Diag),
            0o01 => Some(Self::DramJ),
            0o02 => Some(Self::DramARd),
            0o03 => Some(Self::Return),
            0o04 => Some(Self::PgFail),
            0o05 => Some(Self::Sr),
            0o06 => Some(Self::Nicond),
            0o07 => Some(Self::Sh0Thru3),
            0o30 => Some(Self::Mul),
            0o31 => Some(Self::Div),
            0o32 => Some(Self::Signs),
            0o33 => Some(Self::DramB),
            0o34 => Some(Self::Byte),
            0o35 => Some(Self::EaMod),
            0o36 => Some(Self::Norm),
            _ => None,
        }
    }
}

/// Special functions (SPEC codes 10-27 of bits 67-71).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFunc {
    InhCry18,
    MqShift,
    ScmAlt,
    ClrFpd,
    LoadPc,
    XcryAr0,
    GenCry18,
    StackUpdate,
    ArlInd,
    MtrCtl,
    FlagCtl,
    SaveFlags,
    SpMemCycle,
    AdLong,
}

impl SpecFunc {
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0o37 {
            0o10 => Some(Self::InhCry18),
            0o11 => Some(Self::MqShift),
            0o12 => Some(Self::ScmAlt),
            0o13 => Some(Self::ClrFpd),
            0o14 => Some(Self::LoadPc),
            0o15 => Some(Self::XcryAr0),
            0o16 => Some(Self::GenCry18),
            0o17 => Some(Self::StackUpdate),
            0o20 => Some(Self::ArlInd),
            0o21 => Some(Self::MtrCtl),
            0o22 => Some(Self::FlagCtl),
            0o23 => Some(Self::SaveFlags),
            0o24 => Some(Self::SpMemCycle),
            0o25 => Some(Self::AdLong),
            _ => None,
        }
    }
}

/// AR half-load control (bits 73-74). Both clear means a non-hold AR
/// select loads both halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArCtl {
    pub arl: bool,
    pub arr: bool,
}

/// The current-microword register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Microword(Word84);

impl Microword {
    #[must_use]
    pub const fn new(word: Word84) -> Self {
        Self(word)
    }

    /// The raw 84-bit word.
    #[must_use]
    pub const fn word(self) -> Word84 {
        self.0
    }

    fn f(self, fld: (u32, u32)) -> u64 {
        self.0.f(fld.0, fld.1)
    }

    fn set(&mut self, fld: (u32, u32), value: u64) {
        self.0 = self.0.with_f(value, fld.0, fld.1);
    }

    /// Jump address field.
    #[must_use]
    pub fn j(self) -> u16 {
        self.f(fld::J) as u16
    }

    pub fn set_j(&mut self, j: u16) {
        self.set(fld::J, u64::from(j));
    }

    /// AD function code (6 bits).
    #[must_use]
    pub fn ad(self) -> u8 {
        self.f(fld::AD) as u8
    }

    pub fn set_ad(&mut self, code: u8) {
        self.set(fld::AD, u64::from(code));
    }

    /// ADA select, or `None` when the mux is disabled to zeros.
    #[must_use]
    pub fn ada(self) -> Option<AdaSel> {
        if self.f(fld::ADA_EN) != 0 {
            None
        } else {
            Some(AdaSel::from_bits(self.f(fld::ADA) as u8))
        }
    }

    pub fn set_ada(&mut self, sel: AdaSel) {
        self.set(fld::ADA, sel as u64);
    }

    pub fn set_ada_off(&mut self) {
        self.set(fld::ADA_EN, 1);
    }

    #[must_use]
    pub fn adb(self) -> AdbSel {
        AdbSel::from_bits(self.f(fld::ADB) as u8)
    }

    pub fn set_adb(&mut self, sel: AdbSel) {
        self.set(fld::ADB, sel as u64);
    }

    #[must_use]
    pub fn ar(self) -> ArSel {
        ArSel::from_bits(self.f(fld::AR) as u8)
    }

    pub fn set_ar(&mut self, sel: ArSel) {
        self.set(fld::AR, sel as u64);
    }

    #[must_use]
    pub fn arx(self) -> ArxSel {
        ArxSel::from_bits(self.f(fld::ARX) as u8)
    }

    pub fn set_arx(&mut self, sel: ArxSel) {
        self.set(fld::ARX, sel as u64);
    }

    /// BR load enable (BR takes AR).
    #[must_use]
    pub fn br_load(self) -> bool {
        self.f(fld::BR) != 0
    }

    pub fn set_br_load(&mut self) {
        self.set(fld::BR, 1);
    }

    /// BRX load enable (BRX takes ARX).
    #[must_use]
    pub fn brx_load(self) -> bool {
        self.f(fld::BRX) != 0
    }

    pub fn set_brx_load(&mut self) {
        self.set(fld::BRX, 1);
    }

    /// MQ load enable (MQ takes MQM).
    #[must_use]
    pub fn mq_load(self) -> bool {
        self.f(fld::MQ) != 0
    }

    pub fn set_mq_load(&mut self) {
        self.set(fld::MQ, 1);
    }

    #[must_use]
    pub fn fmadr(self) -> FmAdr {
        FmAdr::from_bits(self.f(fld::FMADR) as u8)
    }

    pub fn set_fmadr(&mut self, sel: FmAdr) {
        self.set(fld::FMADR, sel as u64);
    }

    #[must_use]
    pub fn scad(self) -> ScadFunc {
        ScadFunc::from_bits(self.f(fld::SCAD) as u8)
    }

    pub fn set_scad(&mut self, func: ScadFunc) {
        self.set(fld::SCAD, func as u64);
    }

    /// SCADA select, or `None` when the mux is disabled to zeros.
    #[must_use]
    pub fn scada(self) -> Option<ScadaSel> {
        if self.f(fld::SCADA_EN) != 0 {
            None
        } else {
            Some(ScadaSel::from_bits(self.f(fld::SCADA) as u8))
        }
    }

    pub fn set_scada(&mut self, sel: ScadaSel) {
        self.set(fld::SCADA, sel as u64);
    }

    pub fn set_scada_off(&mut self) {
        self.set(fld::SCADA_EN, 1);
    }

    #[must_use]
    pub fn scadb(self) -> ScadbSel {
        ScadbSel::from_bits(self.f(fld::SCADB) as u8)
    }

    pub fn set_scadb(&mut self, sel: ScadbSel) {
        self.set(fld::SCADB, sel as u64);
    }

    /// SC load enable (SC takes SCAD rather than the SCM recirculation).
    #[must_use]
    pub fn sc_load(self) -> bool {
        self.f(fld::SC) != 0
    }

    pub fn set_sc_load(&mut self) {
        self.set(fld::SC, 1);
    }

    /// FE load enable (FE takes SCAD).
    #[must_use]
    pub fn fe_load(self) -> bool {
        self.f(fld::FE) != 0
    }

    pub fn set_fe_load(&mut self) {
        self.set(fld::FE, 1);
    }

    #[must_use]
    pub fn sh(self) -> ShSel {
        ShSel::from_bits(self.f(fld::SH) as u8)
    }

    pub fn set_sh(&mut self, sel: ShSel) {
        self.set(fld::SH, sel as u64);
    }

    #[must_use]
    pub fn armm(self) -> ArmmSel {
        ArmmSel::from_bits(self.f(fld::ARMM) as u8)
    }

    pub fn set_armm(&mut self, sel: ArmmSel) {
        self.set(fld::ARMM, sel as u64);
    }

    #[must_use]
    pub fn vmax(self) -> VmaxSel {
        if self.f(fld::VMAX) == 0 {
            VmaxSel::PcSec
        } else {
            VmaxSel::PrevSec
        }
    }

    pub fn set_vmax(&mut self, sel: VmaxSel) {
        self.set(fld::VMAX, sel as u64);
    }

    #[must_use]
    pub fn vma(self) -> VmaSel {
        VmaSel::from_bits(self.f(fld::VMA) as u8)
    }

    pub fn set_vma(&mut self, sel: VmaSel) {
        self.set(fld::VMA, sel as u64);
    }

    /// Cycle-time metadata. Functionally ignored.
    #[must_use]
    pub fn time(self) -> u8 {
        self.f(fld::TIME) as u8
    }

    #[must_use]
    pub fn mem(self) -> MemFunc {
        MemFunc::from_bits(self.f(fld::MEM) as u8)
    }

    pub fn set_mem(&mut self, func: MemFunc) {
        self.set(fld::MEM, func as u64);
    }

    /// COND function, when bits 60-65 hold a condition code.
    #[must_use]
    pub fn cond(self) -> Option<CondFunc> {
        let v = self.f(fld::COND) as u8;
        if v < 0o40 { CondFunc::from_bits(v) } else { None }
    }

    pub fn set_cond(&mut self, func: CondFunc) {
        let v = match func {
            CondFunc::Nop => 0o00,
            CondFunc::LoadIr => 0o01,
            CondFunc::FmWrite => 0o02,
            CondFunc::FeShrt => 0o03,
            CondFunc::RegCtl => 0o04,
            CondFunc::VmaMagic => 0o05,
            CondFunc::VmaMagicTrap => 0o06,
            CondFunc::VmaMagicMode => 0o07,
            CondFunc::VmaMagicAr => 0o10,
            CondFunc::VmaMagicPi => 0o11,
            CondFunc::VmaDec => 0o12,
            CondFunc::VmaInc => 0o13,
            CondFunc::LdVmaHeld => 0o14,
            CondFunc::SelVmaHeld => 0o15,
            CondFunc::ArlInd => 0o16,
            CondFunc::Diag => 0o17,
        };
        self.set(fld::COND, v);
    }

    /// SKIP condition, when bits 60-65 hold a skip code.
    #[must_use]
    pub fn skip(self) -> Option<SkipCond> {
        let v = self.f(fld::SKIP) as u8;
        if v >= 0o40 { SkipCond::from_bits(v) } else { None }
    }

    pub fn set_skip(&mut self, cond: SkipCond) {
        let v = match cond {
            SkipCond::Run => 0o40,
            SkipCond::Kernel => 0o41,
            SkipCond::User => 0o42,
            SkipCond::Public => 0o43,
            SkipCond::Fetch => 0o44,
            SkipCond::RpwRef => 0o45,
            SkipCond::PiCycle => 0o46,
            SkipCond::EbusGrantNot => 0o47,
            SkipCond::EbusXferNot => 0o50,
            SkipCond::Intrpt => 0o51,
            SkipCond::IoLegal => 0o52,
            SkipCond::PxsXct => 0o53,
            SkipCond::VmaSec0Not => 0o54,
            SkipCond::AcRef => 0o55,
            SkipCond::MtrReqNot => 0o56,
            SkipCond::StartNot => 0o57,
        };
        self.set(fld::SKIP, v);
    }

    /// Subroutine call bit: push the return address this cycle.
    #[must_use]
    pub fn call(self) -> bool {
        self.f(fld::CALL) != 0
    }

    pub fn set_call(&mut self) {
        self.set(fld::CALL, 1);
    }

    /// DISP function, when bits 67-71 hold a dispatch code.
    #[must_use]
    pub fn disp(self) -> Option<DispFunc> {
        let v = self.f(fld::DISP) as u8;
        if v < 0o10 || v >= 0o30 {
            DispFunc::from_bits(v)
        } else {
            None
        }
    }

    pub fn set_disp(&mut self, func: DispFunc) {
        let v = match func {
            DispFunc::Diag => 0o00,
            DispFunc::DramJ => 0o01,
            DispFunc::DramARd => 0o02,
            DispFunc::Return => 0o03,
            DispFunc::PgFail => 0o04,
            DispFunc::Sr => 0o05,
            DispFunc::Nicond => 0o06,
            DispFunc::Sh0Thru3 => 0o07,
            DispFunc::Mul => 0o30,
            DispFunc::Div => 0o31,
            DispFunc::Signs => 0o32,
            DispFunc::DramB => 0o33,
            DispFunc::Byte => 0o34,
            DispFunc::EaMod => 0o35,
            DispFunc::Norm => 0o36,
        };
        self.set(fld::DISP, v);
    }

    /// SPEC function, when bits 67-71 hold a special code.
    #[must_use]
    pub fn spec(self) -> Option<SpecFunc> {
        let v = self.f(fld::SPEC) as u8;
        if (0o10..0o30).contains(&v) {
            SpecFunc::from_bits(v)
        } else {
            None
        }
    }

    pub fn set_spec(&mut self, func: SpecFunc) {
        let v = match func {
            SpecFunc::InhCry18 => 0o10,
            SpecFunc::MqShift => 0o11,
            SpecFunc::ScmAlt => 0o12,
            SpecFunc::ClrFpd => 0o13,
            SpecFunc::LoadPc => 0o14,
            SpecFunc::XcryAr0 => 0o15,
            SpecFunc::GenCry18 => 0o16,
            SpecFunc::StackUpdate => 0o17,
            SpecFunc::ArlInd => 0o20,
            SpecFunc::MtrCtl => 0o21,
            SpecFunc::FlagCtl => 0o22,
            SpecFunc::SaveFlags => 0o23,
            SpecFunc::SpMemCycle => 0o24,
            SpecFunc::AdLong => 0o25,
        };
        self.set(fld::SPEC, v);
    }

    #[must_use]
    pub fn ar_ctl(self) -> ArCtl {
        let v = self.f(fld::AR_CTL);
        ArCtl {
            arl: v & 0o2 != 0,
            arr: v & 0o1 != 0,
        }
    }

    pub fn set_ar_ctl(&mut self, ctl: ArCtl) {
        self.set(
            fld::AR_CTL,
            u64::from(ctl.arl) << 1 | u64::from(ctl.arr),
        );
    }

    /// Diagnostic mark bit.
    #[must_use]
    pub fn mark(self) -> bool {
        self.f(fld::MARK) != 0
    }

    /// The # literal field.
    #[must_use]
    pub fn magic(self) -> u8 {
        self.f(fld::MAGIC) as u8
    }

    pub fn set_magic(&mut self, value: u8) {
        self.set(fld::MAGIC, u64::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_do_not_overlap_except_shared_decodes() {
        let mut cr = Microword::default();
        cr.set_j(0o1777);
        cr.set_ad(0o77);
        cr.set_ada(AdaSel::Pc);
        cr.set_adb(AdbSel::Br);
        cr.set_magic(0o345);
        assert_eq!(cr.j(), 0o1777);
        assert_eq!(cr.ad(), 0o77);
        assert_eq!(cr.ada(), Some(AdaSel::Pc));
        assert_eq!(cr.adb(), AdbSel::Br);
        assert_eq!(cr.magic(), 0o345);
    }

    #[test]
    fn ada_disable_reads_as_none() {
        let mut cr = Microword::default();
        cr.set_ada(AdaSel::Mq);
        assert_eq!(cr.ada(), Some(AdaSel::Mq));
        cr.set_ada_off();
        assert_eq!(cr.ada(), None);
    }

    #[test]
    fn cond_and_skip_share_the_field() {
        let mut cr = Microword::default();
        cr.set_cond(CondFunc::LoadIr);
        assert_eq!(cr.cond(), Some(CondFunc::LoadIr));
        assert_eq!(cr.skip(), None);

        cr.set_skip(SkipCond::Run);
        assert_eq!(cr.skip(), Some(SkipCond::Run));
        assert_eq!(cr.cond(), None);
    }

    #[test]
    fn disp_and_spec_share_the_field() {
        let mut cr = Microword::default();
        cr.set_disp(DispFunc::Return);
        assert_eq!(cr.disp(), Some(DispFunc::Return));
        assert_eq!(cr.spec(), None);

        cr.set_spec(SpecFunc::LoadPc);
        assert_eq!(cr.spec(), Some(SpecFunc::LoadPc));
        assert_eq!(cr.disp(), None);

        cr.set_disp(DispFunc::Mul);
        assert_eq!(cr.disp(), Some(DispFunc::Mul));
        assert_eq!(cr.spec(), None);
    }

    #[test]
    fn ar_ctl_bits() {
        let mut cr = Microword::default();
        cr.set_ar_ctl(ArCtl { arl: false, arr: true });
        assert_eq!(cr.ar_ctl(), ArCtl { arl: false, arr: true });
        cr.set_ar_ctl(ArCtl { arl: true, arr: true });
        assert_eq!(cr.ar_ctl(), ArCtl { arl: true, arr: true });
    }

    #[test]
    fn zero_word_is_all_nops() {
        let cr = Microword::default();
        assert_eq!(cr.j(), 0);
        assert_eq!(cr.ad(), 0);
        assert_eq!(cr.ar(), ArSel::Hold);
        assert_eq!(cr.arx(), ArxSel::Hold);
        assert_eq!(cr.mem(), MemFunc::Nop);
        assert_eq!(cr.cond(), Some(CondFunc::Nop));
        assert_eq!(cr.skip(), None);
        assert_eq!(cr.disp(), Some(DispFunc::Diag));
        assert!(!cr.call());
    }
}
