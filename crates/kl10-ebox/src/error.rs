//! Core error taxonomy.
//!
//! Runtime errors inside a cycle set a failure mode on the EBOX and clear
//! the run flag; they are never swallowed or retried. The data path itself
//! is total; these arise only from the sequencer stack and memory bounds.

use std::fmt;

/// A fatal core error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EboxError {
    /// The microcode return stack was pushed past its depth of four.
    StackOverflow {
        /// CRADR of the offending microword.
        cradr: u16,
    },
    /// RETURN dispatched with an empty return stack.
    StackUnderflow {
        /// CRADR of the offending microword.
        cradr: u16,
    },
    /// A memory request addressed a word outside the configured store.
    MemoryOutOfRange {
        /// The requested word address.
        addr: u32,
        /// The configured memory size in words.
        size: usize,
    },
}

impl fmt::Display for EboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackOverflow { cradr } => {
                write!(f, "microcode return stack overflow at CRADR {cradr:o}")
            }
            Self::StackUnderflow { cradr } => {
                write!(f, "microcode return stack underflow at CRADR {cradr:o}")
            }
            Self::MemoryOutOfRange { addr, size } => {
                write!(
                    f,
                    "memory reference {addr:o} outside configured {size} words"
                )
            }
        }
    }
}

impl std::error::Error for EboxError {}
