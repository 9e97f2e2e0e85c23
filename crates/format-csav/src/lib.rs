//! Decoder for CSAV (C36) memory images.
//!
//! An image is a stream of 36-bit words: IOWD-headed data blocks followed
//! by a three-word entry vector. An IOWD has a negative left half (the
//! two's-complement word count) and `addr-1` in the right half; the words
//! after it load at `addr` upward. The first word with a non-negative
//! left half starts the entry vector: start instruction, reenter, version.

use std::fmt;

use emu_core::Word36;

/// Image decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsavError {
    /// The stream ended inside a data block or the entry vector.
    Truncated { at: usize },
    /// The stream ended with no entry vector.
    MissingEntryVector,
}

impl fmt::Display for CsavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { at } => write!(f, "image truncated at word {at}"),
            Self::MissingEntryVector => write!(f, "image has no entry vector"),
        }
    }
}

impl std::error::Error for CsavError {}

/// A decoded image: load data plus the entry vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsavImage {
    /// (address, word) pairs in load order.
    pub data: Vec<(u32, Word36)>,
    /// The start instruction.
    pub start: Word36,
    /// The reenter instruction.
    pub reenter: Word36,
    /// The image version word.
    pub version: Word36,
}

/// Half-word sign bit.
const LH_SIGN: u64 = 0o400000;

/// Decode an already-word-decoded stream.
pub fn parse(words: &[u64]) -> Result<CsavImage, CsavError> {
    let mut data = Vec::new();
    let mut i = 0;
    while i < words.len() {
        let word = Word36::new(words[i]);
        if word.lh() & LH_SIGN == 0 {
            // Entry vector: start, reenter, version.
            let reenter = words.get(i + 1).ok_or(CsavError::Truncated { at: i + 1 })?;
            let version = words.get(i + 2).ok_or(CsavError::Truncated { at: i + 2 })?;
            return Ok(CsavImage {
                data,
                start: word,
                reenter: Word36::new(*reenter),
                version: Word36::new(*version),
            });
        }

        // IOWD: -count,,addr-1.
        let count = (0o1000000 - word.lh()) as usize;
        let addr = (word.rh() as u32) + 1;
        let block = words
            .get(i + 1..i + 1 + count)
            .ok_or(CsavError::Truncated { at: words.len() })?;
        for (k, &w) in block.iter().enumerate() {
            data.push((addr + k as u32, Word36::new(w)));
        }
        i += 1 + count;
    }
    Err(CsavError::MissingEntryVector)
}

/// Build an IOWD header word for `count` words loading at `addr`.
#[must_use]
pub fn iowd(count: u64, addr: u64) -> u64 {
    Word36::from_halves(0o1000000 - count, addr.wrapping_sub(1)).get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_blocks_and_entry_vector() {
        let words = [
            iowd(2, 0o1000),
            0o123456654321,
            0o000000000042,
            iowd(1, 0o4000),
            0o777777777777,
            0o254000001000, // JRST 1000, the start instruction
            0o254000001001,
            0o000007000003,
        ];
        let image = parse(&words).expect("decodes");
        assert_eq!(
            image.data,
            vec![
                (0o1000, Word36::new(0o123456654321)),
                (0o1001, Word36::new(0o42)),
                (0o4000, Word36::ONES),
            ]
        );
        assert_eq!(image.start.get(), 0o254000001000);
        assert_eq!(image.reenter.get(), 0o254000001001);
        assert_eq!(image.version.get(), 0o000007000003);
    }

    #[test]
    fn entry_vector_alone_is_a_valid_image() {
        let image = parse(&[0o254000000100, 0, 0]).expect("decodes");
        assert!(image.data.is_empty());
        assert_eq!(image.start.get(), 0o254000000100);
    }

    #[test]
    fn truncated_block_is_an_error() {
        let words = [iowd(3, 0o1000), 0o1, 0o2];
        assert_eq!(parse(&words), Err(CsavError::Truncated { at: 3 }));
    }

    #[test]
    fn truncated_entry_vector_is_an_error() {
        let words = [iowd(1, 0o1000), 0o1, 0o254000000100, 0o0];
        assert_eq!(parse(&words), Err(CsavError::Truncated { at: 4 }));
    }

    #[test]
    fn missing_entry_vector_is_an_error() {
        let words = [iowd(1, 0o1000), 0o1];
        assert_eq!(parse(&words), Err(CsavError::MissingEntryVector));
    }

    #[test]
    fn iowd_round_trip() {
        let w = Word36::new(iowd(0o100, 0o2000));
        assert_eq!(w.lh(), 0o1000000 - 0o100);
        assert_eq!(w.rh(), 0o1777);
    }
}
