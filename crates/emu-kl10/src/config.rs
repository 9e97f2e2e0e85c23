//! Machine configuration.

use kl10_ebox::mbox;

/// KL10 configuration.
#[derive(Debug, Clone)]
pub struct Kl10Config {
    /// Main memory size in words.
    pub mem_words: usize,
    /// Machine serial number (model B numbers are above 1000 octal).
    pub serial: u16,
    /// Assembly options asserted when parsing the definitions file
    /// (e.g. `MODEL.B`, `XADDR`, `KLPAGE`).
    pub options: Vec<String>,
}

impl Default for Kl10Config {
    fn default() -> Self {
        Self {
            mem_words: mbox::DEFAULT_WORDS,
            serial: 0o1001,
            options: vec!["MODEL.B".to_string(), "XADDR".to_string()],
        }
    }
}
