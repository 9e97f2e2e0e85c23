//! Parser for the vendor microcode definitions text.
//!
//! The definitions file alternates `.UCODE` and `.DCODE` sections of field
//! declarations (`NAME/=<S>` or `NAME/=<S:E>`, bit positions decimal, any
//! suffix after the `>` ignored) with indented symbolic value lines
//! (`NAME=VALUE`, octal). `.IF/FLAG`, `.IFNOT/FLAG`, and `.ENDIF/FLAG`
//! conditionals gate lines on named assembly options; an `.IF` or `.IFNOT`
//! naming the same flag as the open conditional flips it in place; the
//! vendor file relies on that acting as ELSE, not as a nested IF.
//!
//! Everything after a `;` is commentary.

use std::collections::HashMap;
use std::fmt;

use emu_core::{Word84, field};

/// Parse failure or symbol-resolution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MicError {
    /// A structurally invalid line, identified by number and text.
    Malformed { line: usize, text: String },
    /// A conditional left open at end of input.
    UnterminatedIf { flag: String },
    /// An `.ENDIF` that does not match the open conditional.
    MismatchedEndif { line: usize, flag: String },
    /// A referenced field is not in the dictionary.
    UnknownField(String),
    /// A referenced symbolic value is not declared under its field.
    UnknownValue { field: String, value: String },
}

impl fmt::Display for MicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { line, text } => {
                write!(f, "malformed definitions line {line}: {text:?}")
            }
            Self::UnterminatedIf { flag } => {
                write!(f, "conditional .IF/{flag} left open at end of input")
            }
            Self::MismatchedEndif { line, flag } => {
                write!(f, ".ENDIF/{flag} at line {line} does not match the open conditional")
            }
            Self::UnknownField(name) => write!(f, "unknown field {name:?}"),
            Self::UnknownValue { field, value } => {
                write!(f, "unknown value {value:?} for field {field:?}")
            }
        }
    }
}

impl std::error::Error for MicError {}

/// One declared field: a named bit range and its symbolic values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// First (most significant) bit.
    pub s: u32,
    /// Last (least significant) bit.
    pub e: u32,
    /// Symbolic values in declaration order.
    pub values: Vec<(String, u64)>,
}

impl FieldDecl {
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
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }
}

/// The fields of one section, indexed by literal name. Redeclaring a name
/// replaces the earlier declaration.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    /// Control-word width the bit positions are relative to.
    width: u32,
    fields: Vec<FieldDecl>,
    by_name: HashMap<String, usize>,
}

impl FieldSet {
    fn new(width: u32) -> Self {
        Self {
            width,
            fields: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    fn insert(&mut self, decl: FieldDecl) {
        if let Some(&i) = self.by_name.get(&decl.name) {
            self.fields[i] = decl;
        } else {
            self.by_name.insert(decl.name.clone(), self.fields.len());
            self.fields.push(decl);
        }
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The fields in declaration order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDecl> {
        self.fields.iter()
    }

    /// Look up a field by literal name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDecl> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Look up a field, erroring on absence.
    pub fn resolve(&self, name: &str) -> Result<&FieldDecl, MicError> {
        self.get(name)
            .ok_or_else(|| MicError::UnknownField(name.to_string()))
    }

    /// Resolve a symbolic (field, value) pair to its numeric value.
    pub fn resolve_value(&self, field: &str, value: &str) -> Result<u64, MicError> {
        let decl = self.resolve(field)?;
        decl.value(value).ok_or_else(|| MicError::UnknownValue {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// A parsed definitions file: the microword and dispatch-word dictionaries.
#[derive(Debug, Clone)]
pub struct FieldFile {
    pub ucode: FieldSet,
    pub dcode: FieldSet,
}

impl FieldFile {
    /// Deposit a symbolic microword (field, value) pair.
    pub fn deposit(&self, word: Word84, field: &str, value: &str) -> Result<Word84, MicError> {
        let raw = self.ucode.resolve_value(field, value)?;
        self.deposit_raw(word, field, raw)
    }

    /// Deposit a numeric microword field value.
    pub fn deposit_raw(&self, word: Word84, field: &str, value: u64) -> Result<Word84, MicError> {
        let decl = self.ucode.resolve(field)?;
        Ok(word.with_f(value, decl.s, decl.e))
    }

    /// Deposit a numeric dispatch-word field value.
    pub fn deposit_dram(&self, word: u32, field: &str, value: u64) -> Result<u32, MicError> {
        let decl = self.dcode.resolve(field)?;
        Ok(field::insert(u64::from(word), value, decl.s, decl.e, self.dcode.width) as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Ucode,
    Dcode,
}

struct CondFrame {
    flag: String,
    polarity: bool,
}

/// Parse a definitions text with the given assembly options asserted.
pub fn parse(text: &str, options: &[&str]) -> Result<FieldFile, MicError> {
    let mut ucode = FieldSet::new(84);
    let mut dcode = FieldSet::new(24);
    let mut section = Section::Ucode;
    let mut conds: Vec<CondFrame> = Vec::new();
    let mut current: Option<(Section, FieldDecl)> = None;

    let mut flush = |ucode: &mut FieldSet, dcode: &mut FieldSet, cur: &mut Option<(Section, FieldDecl)>| {
        if let Some((sec, decl)) = cur.take() {
            match sec {
                Section::Ucode => ucode.insert(decl),
                Section::Dcode => dcode.insert(decl),
            }
        }
    };

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split(';').next().unwrap_or("");
        if line.trim().is_empty() {
            continue;
        }

        let trimmed = line.trim_start();
        if trimmed.starts_with('.') {
            let (directive, arg) = split_directive(trimmed);
            match directive {
                ".UCODE" => {
                    flush(&mut ucode, &mut dcode, &mut current);
                    section = Section::Ucode;
                }
                ".DCODE" => {
                    flush(&mut ucode, &mut dcode, &mut current);
                    section = Section::Dcode;
                }
                ".IF" | ".IFNOT" => {
                    let polarity = directive == ".IF";
                    // Same flag as the open conditional: flip in place
                    // rather than nest. The vendor file uses this as ELSE.
                    match conds.last_mut() {
                        Some(top) if top.flag == arg => top.polarity = polarity,
                        _ => conds.push(CondFrame {
                            flag: arg.to_string(),
                            polarity,
                        }),
                    }
                }
                ".ENDIF" => match conds.pop() {
                    Some(top) if top.flag == arg || arg.is_empty() => {}
                    _ => {
                        return Err(MicError::MismatchedEndif {
                            line: line_no,
                            flag: arg.to_string(),
                        });
                    }
                },
                _ => {
                    return Err(MicError::Malformed {
                        line: line_no,
                        text: raw.to_string(),
                    });
                }
            }
            continue;
        }

        let active = conds
            .iter()
            .all(|c| options.contains(&c.flag.as_str()) == c.polarity);
        if !active {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            // Indented value line under the most recent field.
            let Some((_, decl)) = current.as_mut() else {
                return Err(MicError::Malformed {
                    line: line_no,
                    text: raw.to_string(),
                });
            };
            let Some((name, value)) = parse_value_line(trimmed) else {
                return Err(MicError::Malformed {
                    line: line_no,
                    text: raw.to_string(),
                });
            };
            decl.values.push((name, value));
        } else {
            // Field declaration line.
            let width = match section {
                Section::Ucode => 84,
                Section::Dcode => 24,
            };
            let Some(decl) = parse_field_line(trimmed, width) else {
                return Err(MicError::Malformed {
                    line: line_no,
                    text: raw.to_string(),
                });
            };
            flush(&mut ucode, &mut dcode, &mut current);
            current = Some((section, decl));
        }
    }

    flush(&mut ucode, &mut dcode, &mut current);
    if let Some(open) = conds.pop() {
        return Err(MicError::UnterminatedIf { flag: open.flag });
    }
    Ok(FieldFile { ucode, dcode })
}

/// Split a directive line into the dot-word and its argument. The vendor
/// form is `.IF/FLAG`; a whitespace separator is accepted too.
fn split_directive(line: &str) -> (&str, &str) {
    let end = line
        .find(['/', ' ', '\t'])
        .unwrap_or(line.len());
    let (word, rest) = line.split_at(end);
    (word, rest.trim_start_matches(['/', ' ', '\t']).trim_end())
}

/// Parse `NAME/=<S>` or `NAME/=<S:E>`, ignoring anything after the `>`.
fn parse_field_line(line: &str, width: u32) -> Option<FieldDecl> {
    let (name, rest) = line.split_once("/=<")?;
    let (range, _) = rest.split_once('>')?;
    let (s, e) = match range.split_once(':') {
        Some((s, e)) => (s.trim().parse().ok()?, e.trim().parse().ok()?),
        None => {
            let bit = range.trim().parse().ok()?;
            (bit, bit)
        }
    };
    let name = name.trim();
    if name.is_empty() || s > e || e >= width {
        return None;
    }
    Some(FieldDecl {
        name: name.to_string(),
        s,
        e,
        values: Vec::new(),
    })
}

/// Parse an indented `NAME=VALUE` line; the value is octal.
fn parse_value_line(line: &str) -> Option<(String, u64)> {
    let (name, value) = line.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = u64::from_str_radix(value.trim(), 8).ok()?;
    Some((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
; CRAM field definitions
.UCODE
J/=<1:11>
AD/=<12:17>D0
\tA=0
\tA+B=11
\tOR=56
COND/=<60:65>
\tNOP=0
\tLOAD IR=1
.DCODE
A/=<0:2>
J/=<14:23>
";

    #[test]
    fn parses_sections_fields_and_values() {
        let file = parse(SAMPLE, &[]).expect("parses");
        assert_eq!(file.ucode.len(), 3);
        assert_eq!(file.dcode.len(), 2);

        let ad = file.ucode.get("AD").expect("AD");
        assert_eq!((ad.s, ad.e), (12, 17));
        assert_eq!(ad.value("A+B"), Some(0o11));
        assert_eq!(ad.value("OR"), Some(0o56));

        let cond = file.ucode.get("COND").expect("COND");
        assert_eq!(cond.value("LOAD IR"), Some(1));

        let j = file.dcode.get("J").expect("dcode J");
        assert_eq!((j.s, j.e), (14, 23));
    }

    #[test]
    fn single_bit_field_form() {
        let file = parse(".UCODE\nCALL/=<66>\n", &[]).expect("parses");
        let call = file.ucode.get("CALL").expect("CALL");
        assert_eq!((call.s, call.e), (66, 66));
        assert_eq!(call.width(), 1);
    }

    #[test]
    fn conditional_blocks_follow_the_options() {
        let text = "\
.UCODE
.IF/XADDR
VMAX/=<51>
.ENDIF/XADDR
J/=<1:11>
";
        let without = parse(text, &[]).expect("parses");
        assert!(without.ucode.get("VMAX").is_none());
        let with = parse(text, &["XADDR"]).expect("parses");
        assert!(with.ucode.get("VMAX").is_some());
    }

    #[test]
    fn if_then_ifnot_same_flag_acts_as_else() {
        let text = "\
.UCODE
.IF/MODEL.B
SH/=<46:47>
.IFNOT/MODEL.B
SH/=<40:41>
.ENDIF/MODEL.B
";
        // Flag clear: the second arm wins, replacing (not nesting under)
        // the first.
        let off = parse(text, &[]).expect("parses");
        let sh = off.ucode.get("SH").expect("SH");
        assert_eq!((sh.s, sh.e), (40, 41));

        let on = parse(text, &["MODEL.B"]).expect("parses");
        let sh = on.ucode.get("SH").expect("SH");
        assert_eq!((sh.s, sh.e), (46, 47));
    }

    #[test]
    fn redeclaring_a_field_replaces_it() {
        let text = ".UCODE\nAD/=<12:17>\n\tA=0\nAD/=<10:15>\n\tB=52\n";
        let file = parse(text, &[]).expect("parses");
        let ad = file.ucode.get("AD").expect("AD");
        assert_eq!((ad.s, ad.e), (10, 15));
        assert_eq!(ad.value("B"), Some(0o52));
        assert_eq!(ad.value("A"), None);
    }

    #[test]
    fn malformed_lines_name_the_line() {
        let err = parse(".UCODE\nJ/=<1:99>\n", &[]).expect_err("range too wide");
        assert_eq!(
            err,
            MicError::Malformed {
                line: 2,
                text: "J/=<1:99>".to_string()
            }
        );

        let err = parse("\tA=0\n", &[]).expect_err("value with no field");
        assert!(matches!(err, MicError::Malformed { line: 1, .. }));

        let err = parse(".UCODE\nAD/=<12:17>\n\tA=9\n", &[]).expect_err("bad octal");
        assert!(matches!(err, MicError::Malformed { line: 3, .. }));
    }

    #[test]
    fn unterminated_and_mismatched_conditionals() {
        let err = parse(".UCODE\n.IF/SMP\nJ/=<1:11>\n", &[]).expect_err("open if");
        assert_eq!(err, MicError::UnterminatedIf { flag: "SMP".to_string() });

        let err = parse(".IF/SMP\n.ENDIF/MULTI\n", &[]).expect_err("wrong endif");
        assert!(matches!(err, MicError::MismatchedEndif { line: 2, .. }));
    }

    #[test]
    fn resolve_and_deposit() {
        let file = parse(SAMPLE, &[]).expect("parses");
        let word = file
            .deposit(Word84::ZERO, "AD", "A+B")
            .and_then(|w| file.deposit_raw(w, "J", 0o1234))
            .expect("deposits");
        assert_eq!(word.f(12, 17), 0o11);
        assert_eq!(word.f(1, 11), 0o1234);

        assert_eq!(
            file.deposit(Word84::ZERO, "NOSUCH", "A"),
            Err(MicError::UnknownField("NOSUCH".to_string()))
        );
        assert_eq!(
            file.deposit(Word84::ZERO, "AD", "NOSUCH"),
            Err(MicError::UnknownValue {
                field: "AD".to_string(),
                value: "NOSUCH".to_string()
            })
        );
    }

    #[test]
    fn dram_deposit_uses_the_24_bit_frame() {
        let file = parse(SAMPLE, &[]).expect("parses");
        let word = file.deposit_dram(0, "J", 0o1234).expect("deposits");
        assert_eq!(word, 0o1234);
        let word = file.deposit_dram(0, "A", 0o5).expect("deposits");
        assert_eq!(word >> 21, 0o5);
    }
}
