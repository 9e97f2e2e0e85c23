//! Observability trait for inspecting component state.
//!
//! The interactive debugger lives outside the core; this is the surface it
//! inspects through. Queries never affect emulation state.

use std::collections::HashMap;
use std::fmt;

/// A dynamically-typed value for state queries.
///
/// Word-sized values display in octal, the native radix of the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value (a flag or a single wire).
    Bool(bool),
    /// Small field (AC number, block number, field code).
    U8(u8),
    /// Microaddress or 10-bit count.
    U16(u16),
    /// Address-width value (PC, VMA).
    U32(u32),
    /// Architectural word.
    U64(u64),
    /// String value.
    String(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Map of string keys to values.
    Map(HashMap<String, Value>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v:o}"),
            Value::U16(v) => write!(f, "{v:04o}"),
            Value::U32(v) => write!(f, "{v:08o}"),
            Value::U64(v) => write!(f, "{:06o},,{:06o}", v >> 18, v & 0o777777),
            Value::String(v) => write!(f, "{v}"),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// A component whose state can be inspected.
///
/// Paths are hierarchical, separated by dots: `cradr`, `regs.ar`,
/// `flags.run`. Returns `None` if the path is not recognised.
pub trait Observable {
    /// Query a specific property by path.
    fn query(&self, path: &str) -> Option<Value>;

    /// List all available query paths.
    fn query_paths(&self) -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_value_displays_as_half_word_octal() {
        assert_eq!(Value::U64(0o123456654321).to_string(), "123456,,654321");
    }

    #[test]
    fn microaddress_displays_as_octal() {
        assert_eq!(Value::U16(0o1777).to_string(), "1777");
        assert_eq!(Value::U16(0o100).to_string(), "0100");
    }
}
