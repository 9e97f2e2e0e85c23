//! The microword and dispatch-word field catalog.
//!
//! The same layout `cr` and `dr` hard-wire, carried as data under the
//! literal vendor names so a loaded definitions file can be validated
//! against the hardware and so diagnostics can name fields the way the
//! microcode listing does. Microcode references these names directly, so
//! they must not be normalised.

/// One field of a control word: a named bit range and its symbolic values.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    /// First (most significant) bit.
    pub s: u32,
    /// Last (least significant) bit.
    pub e: u32,
    /// Symbolic values, octal-coded.
    pub values: &'static [(&'static str, u64)],
}

impl FieldDef {
    /// Width in bits.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.e - self.s + 1
    }

    /// Look up a symbolic value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<u64> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, v)| v)
    }
}

/// CRAM bits with no field assigned; loaders ignore them.
pub const CRAM_UNUSED_BITS: &[u32] = &[0, 21, 48, 72];

/// The CRAM field catalog.
pub static CRAM_FIELDS: &[FieldDef] = &[
    FieldDef { name: "J", s: 1, e: 11, values: &[] },
    FieldDef {
        name: "AD",
        s: 12,
        e: 17,
        values: &[
            ("A", 0o00),
            ("A+XCRY", 0o01),
            ("XCRY-1", 0o02),
            ("A+ANDCB", 0o04),
            ("OR+ANDCB", 0o05),
            ("A-B-1", 0o06),
            ("ANDCB-1", 0o07),
            ("A+AND", 0o10),
            ("A+B", 0o11),
            ("AND+ORCB", 0o12),
            ("AND-1", 0o13),
            ("A*2", 0o14),
            ("A+OR", 0o15),
            ("A+ORCB", 0o16),
            ("A-1", 0o17),
            ("A+1", 0o20),
            ("OR+1", 0o21),
            ("ORCB+1", 0o22),
            ("A-B", 0o26),
            ("A+B+1", 0o31),
            ("A*2+1", 0o34),
            ("SETCA", 0o40),
            ("NOR", 0o41),
            ("ANDCA", 0o42),
            ("0S", 0o43),
            ("ORC", 0o44),
            ("SETCB", 0o45),
            ("XOR", 0o46),
            ("ANDCB", 0o47),
            ("ORCA", 0o50),
            ("EQV", 0o51),
            ("B", 0o52),
            ("AND", 0o53),
            ("1S", 0o54),
            ("ORCB", 0o55),
            ("OR", 0o56),
            ("SETA", 0o57),
        ],
    },
    FieldDef {
        name: "ADA",
        s: 18,
        e: 20,
        values: &[("AR", 0), ("ARX", 1), ("MQ", 2), ("PC", 3)],
    },
    FieldDef {
        name: "ADA EN",
        s: 18,
        e: 18,
        values: &[("EN", 0), ("0S", 1)],
    },
    FieldDef {
        name: "ADB",
        s: 22,
        e: 23,
        values: &[("FM", 0), ("BR*2", 1), ("BR", 2), ("AR*4", 3)],
    },
    FieldDef {
        name: "AR",
        s: 24,
        e: 26,
        values: &[
            ("AR", 0),
            ("ARMM", 1),
            ("CACHE", 2),
            ("AD", 3),
            ("SH", 4),
            ("AD*2", 5),
            ("ADX", 6),
            ("AD*.25", 7),
        ],
    },
    FieldDef {
        name: "ARX",
        s: 27,
        e: 29,
        values: &[
            ("ARX", 0),
            ("CACHE", 1),
            ("AD", 2),
            ("MQ", 3),
            ("SH", 4),
            ("ADX*2", 5),
            ("ADX", 6),
            ("ADX*.25", 7),
        ],
    },
    FieldDef { name: "BR", s: 30, e: 30, values: &[("BR", 0), ("AR", 1)] },
    FieldDef { name: "BRX", s: 31, e: 31, values: &[("BRX", 0), ("ARX", 1)] },
    FieldDef { name: "MQ", s: 32, e: 32, values: &[("MQ", 0), ("MQM", 1)] },
    FieldDef {
        name: "FMADR",
        s: 33,
        e: 35,
        values: &[
            ("AC0", 0),
            ("AC1", 1),
            ("XR", 2),
            ("VMA", 3),
            ("AC2", 4),
            ("AC3", 5),
            ("AC+#", 6),
            ("#B#", 7),
        ],
    },
    FieldDef {
        name: "SCAD",
        s: 36,
        e: 38,
        values: &[
            ("A", 0),
            ("A-B-1", 1),
            ("A+B", 2),
            ("A-1", 3),
            ("A+1", 4),
            ("A-B", 5),
            ("OR", 6),
            ("AND", 7),
        ],
    },
    FieldDef {
        name: "SCADA",
        s: 39,
        e: 41,
        values: &[("FE", 0), ("AR0-5", 1), ("AR EXP", 2), ("#", 3)],
    },
    FieldDef {
        name: "SCADA EN",
        s: 39,
        e: 39,
        values: &[("EN", 0), ("0S", 1)],
    },
    FieldDef {
        name: "SCADB",
        s: 42,
        e: 43,
        values: &[("SC", 0), ("AR6-11", 1), ("AR0-8", 2), ("#", 3)],
    },
    FieldDef { name: "SC", s: 44, e: 44, values: &[("SCM", 0), ("SCAD", 1)] },
    FieldDef { name: "FE", s: 45, e: 45, values: &[("FE", 0), ("SCAD", 1)] },
    FieldDef {
        name: "SH",
        s: 46,
        e: 47,
        values: &[
            ("SHIFT AR!ARX", 0),
            ("AR", 1),
            ("ARX", 2),
            ("AR SWAP", 3),
        ],
    },
    FieldDef {
        name: "ARMM",
        s: 49,
        e: 50,
        values: &[("#", 0), ("EXP SIGN", 1), ("SCAD EXP", 2), ("SCAD POS", 3)],
    },
    FieldDef {
        name: "VMAX",
        s: 51,
        e: 51,
        values: &[("PC SEC", 0), ("PREV SEC", 1)],
    },
    FieldDef {
        name: "VMA",
        s: 52,
        e: 53,
        values: &[("VMA", 0), ("PC", 1), ("PC+1", 2), ("AD", 3)],
    },
    FieldDef {
        name: "TIME",
        s: 54,
        e: 55,
        values: &[("2T", 0), ("3T", 1), ("4T", 2), ("5T", 3)],
    },
    FieldDef {
        name: "MEM",
        s: 56,
        e: 59,
        values: &[
            ("NOP", 0o00),
            ("ARL IND", 0o01),
            ("MB WAIT", 0o02),
            ("RESTORE VMA", 0o03),
            ("A RD", 0o04),
            ("B WRITE", 0o05),
            ("FETCH", 0o06),
            ("REG FUNC", 0o07),
            ("AD FUNC", 0o10),
            ("EA CALC", 0o11),
            ("LOAD AR", 0o12),
            ("LOAD ARX", 0o13),
            ("RW", 0o14),
            ("RPW", 0o15),
            ("WRITE", 0o16),
            ("IFET", 0o17),
        ],
    },
    FieldDef {
        name: "COND",
        s: 60,
        e: 65,
        values: &[
            ("NOP", 0o00),
            ("LOAD IR", 0o01),
            ("FM WRITE", 0o02),
            ("FE SHRT", 0o03),
            ("REG CTL", 0o04),
            ("VMA_#", 0o05),
            ("VMA_#+TRAP", 0o06),
            ("VMA_#+MODE", 0o07),
            ("VMA_#+AR32-35", 0o10),
            ("VMA_#+PI*2", 0o11),
            ("VMA DEC", 0o12),
            ("VMA INC", 0o13),
            ("LD VMA HELD", 0o14),
            ("SEL VMA HELD", 0o15),
            ("ARL IND", 0o16),
            ("DIAG FUNC", 0o17),
        ],
    },
    FieldDef {
        name: "SKIP",
        s: 60,
        e: 65,
        values: &[
            ("RUN", 0o40),
            ("KERNEL", 0o41),
            ("USER", 0o42),
            ("PUBLIC", 0o43),
            ("FETCH", 0o44),
            ("RPW REF", 0o45),
            ("PI CYCLE", 0o46),
            ("-EBUS GRANT", 0o47),
            ("-EBUS XFER", 0o50),
            ("INTRPT", 0o51),
            ("IO LEGAL", 0o52),
            ("P!S XCT", 0o53),
            ("-VMA SEC0", 0o54),
            ("AC REF", 0o55),
            ("-MTR REQ", 0o56),
            ("-START", 0o57),
        ],
    },
    FieldDef { name: "CALL", s: 66, e: 66, values: &[("CALL", 1)] },
    FieldDef {
        name: "DISP",
        s: 67,
        e: 71,
        values: &[
            ("DIAG", 0o00),
            ("DRAM J", 0o01),
            ("DRAM A RD", 0o02),
            ("RETURN", 0o03),
            ("PG FAIL", 0o04),
            ("SR", 0o05),
            ("NICOND", 0o06),
            ("SH0-3", 0o07),
            ("MUL", 0o30),
            ("DIV", 0o31),
            ("SIGNS", 0o32),
            ("DRAM B", 0o33),
            ("BYTE", 0o34),
            ("EA MOD", 0o35),
            ("NORM", 0o36),
        ],
    },
    FieldDef {
        name: "SPEC",
        s: 67,
        e: 71,
        values: &[
            ("INH CRY18", 0o10),
            ("MQ SHIFT", 0o11),
            ("SCM ALT", 0o12),
            ("CLR FPD", 0o13),
            ("LOAD PC", 0o14),
            ("XCRY AR0", 0o15),
            ("GEN CRY18", 0o16),
            ("STACK UPDATE", 0o17),
            ("ARL IND", 0o20),
            ("MTR CTL", 0o21),
            ("FLAG CTL", 0o22),
            ("SAVE FLAGS", 0o23),
            ("SP MEM CYCLE", 0o24),
            ("AD LONG", 0o25),
        ],
    },
    FieldDef {
        name: "AR CTL",
        s: 73,
        e: 74,
        values: &[("ARR LOAD", 1), ("ARL LOAD", 2), ("AR LOAD", 3)],
    },
    FieldDef { name: "MARK", s: 75, e: 75, values: &[("MARK", 1)] },
    FieldDef { name: "#", s: 76, e: 83, values: &[] },
];

/// The DRAM field catalog.
pub static DRAM_FIELDS: &[FieldDef] = &[
    FieldDef { name: "A", s: 0, e: 2, values: &[] },
    FieldDef { name: "B", s: 3, e: 5, values: &[] },
    FieldDef { name: "P", s: 6, e: 6, values: &[] },
    FieldDef { name: "J", s: 14, e: 23, values: &[] },
];

/// Find a CRAM field by its literal name.
#[must_use]
pub fn cram_field(name: &str) -> Option<&'static FieldDef> {
    CRAM_FIELDS.iter().find(|f| f.name == name)
}

/// Find a DRAM field by its literal name.
#[must_use]
pub fn dram_field(name: &str) -> Option<&'static FieldDef> {
    DRAM_FIELDS.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cr::{ad, fld};

    #[test]
    fn names_are_unique() {
        for (i, a) in CRAM_FIELDS.iter().enumerate() {
            for b in &CRAM_FIELDS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn ranges_are_well_formed() {
        for f in CRAM_FIELDS {
            assert!(f.s <= f.e && f.e < 84, "field {}", f.name);
            for &(_, v) in f.values {
                assert!(v < (1 << f.width()), "value of {}", f.name);
            }
        }
        for f in DRAM_FIELDS {
            assert!(f.s <= f.e && f.e < 24, "field {}", f.name);
        }
    }

    #[test]
    fn catalog_matches_the_hard_wired_layout() {
        let j = cram_field("J").expect("J");
        assert_eq!((j.s, j.e), fld::J);
        let ad_f = cram_field("AD").expect("AD");
        assert_eq!((ad_f.s, ad_f.e), fld::AD);
        let magic = cram_field("#").expect("#");
        assert_eq!((magic.s, magic.e), fld::MAGIC);
        let skip = cram_field("SKIP").expect("SKIP");
        assert_eq!((skip.s, skip.e), fld::SKIP);
    }

    #[test]
    fn ad_symbols_match_the_named_codes() {
        let f = cram_field("AD").expect("AD");
        assert_eq!(f.value("A+B"), Some(u64::from(ad::A_PLUS_B)));
        assert_eq!(f.value("A+XCRY"), Some(u64::from(ad::A_XCRY)));
        assert_eq!(f.value("XCRY-1"), Some(u64::from(ad::XCRY_MINUS_1)));
        assert_eq!(f.value("ORC"), Some(u64::from(ad::ORC)));
        assert_eq!(f.value("0S"), Some(u64::from(ad::ZEROS)));
        assert_eq!(f.value("1S"), Some(u64::from(ad::ONES)));
        assert_eq!(f.value("SETCB"), Some(u64::from(ad::SETCB)));
    }

    #[test]
    fn unknown_names_read_as_none() {
        assert!(cram_field("NOT A FIELD").is_none());
        let f = cram_field("MEM").expect("MEM");
        assert!(f.value("NOT A VALUE").is_none());
    }

    #[test]
    fn dram_j_is_ten_bits() {
        let j = dram_field("J").expect("J");
        assert_eq!(j.width(), 10);
    }
}
