//! The assembled machine.

use std::collections::VecDeque;

use emu_core::Tickable;
use format_csav::CsavImage;
use format_mic::{FieldFile, MicError};
use kl10_ebox::Ebox;
use kl10_ebox::dr::DispatchWord;
use kl10_ebox::fields;

use crate::config::Kl10Config;
use crate::console::{ConsoleMailbox, ConsoleSender, console_channel};
use crate::error::Kl10Error;

/// A KL10: the EBOX plus loader and console plumbing.
pub struct Kl10 {
    pub ebox: Ebox,
    defs: Option<FieldFile>,
    options: Vec<String>,
    sender: ConsoleSender,
    mailbox: ConsoleMailbox,
    input: VecDeque<u8>,
}

impl Kl10 {
    /// Build a machine from the configuration, in reset state.
    #[must_use]
    pub fn new(config: &Kl10Config) -> Self {
        let (sender, mailbox) = console_channel();
        let mut ebox = Ebox::new(config.mem_words);
        ebox.set_serial(config.serial);
        Self {
            ebox,
            defs: None,
            options: config.options.clone(),
            sender,
            mailbox,
            input: VecDeque::new(),
        }
    }

    /// A thread-safe handle the terminal front-end sends keypresses to.
    #[must_use]
    pub fn console_sender(&self) -> ConsoleSender {
        self.sender.clone()
    }

    /// Characters drained from the console so far, oldest first.
    pub fn input(&mut self) -> &mut VecDeque<u8> {
        &mut self.input
    }

    /// The loaded field dictionary, once definitions are loaded.
    #[must_use]
    pub fn defs(&self) -> Option<&FieldFile> {
        self.defs.as_ref()
    }

    /// Parse a definitions text and validate it against the hardware
    /// field layout. Every field and symbolic value the data path knows
    /// must be present and agree; a miss is fatal at load time.
    pub fn load_definitions(&mut self, text: &str) -> Result<(), Kl10Error> {
        let options: Vec<&str> = self.options.iter().map(String::as_str).collect();
        let file = format_mic::parse(text, &options)?;

        for hw in fields::CRAM_FIELDS {
            let decl = file.ucode.resolve(hw.name)?;
            if (decl.s, decl.e) != (hw.s, hw.e) {
                return Err(Kl10Error::FieldMismatch {
                    field: hw.name.to_string(),
                    expected: (hw.s, hw.e),
                    found: (decl.s, decl.e),
                });
            }
            for &(name, value) in hw.values {
                if file.ucode.resolve_value(hw.name, name)? != value {
                    return Err(Kl10Error::Defs(MicError::UnknownValue {
                        field: hw.name.to_string(),
                        value: name.to_string(),
                    }));
                }
            }
        }
        for hw in fields::DRAM_FIELDS {
            let decl = file.dcode.resolve(hw.name)?;
            if (decl.s, decl.e) != (hw.s, hw.e) {
                return Err(Kl10Error::FieldMismatch {
                    field: hw.name.to_string(),
                    expected: (hw.s, hw.e),
                    found: (decl.s, decl.e),
                });
            }
        }

        self.defs = Some(file);
        Ok(())
    }

    /// Load a RAM dump text into the control stores.
    pub fn load_ram_text(&mut self, text: &str) -> Result<(), Kl10Error> {
        let image = format_mcr::parse(text)?;
        for (addr, word) in image.cram {
            self.ebox.load_cram(addr, word);
        }
        for (addr, word) in image.dram {
            self.ebox.load_dram(addr, DispatchWord::new(word));
        }
        Ok(())
    }

    /// Load a CSAV image into main memory. Returns the decoded image;
    /// PC is pointed at the start instruction's address as the console
    /// would. A bad image leaves memory untouched.
    pub fn load_csav(&mut self, words: &[u64]) -> Result<CsavImage, Kl10Error> {
        let image = format_csav::parse(words)?;
        for &(addr, word) in &image.data {
            self.ebox.write_mem(addr, word)?;
        }
        self.ebox.regs.set_pc(image.start.rh() as u32);
        Ok(image)
    }

    /// Run until the run flag drops, a failure latches, or `max_cycles`
    /// elapse. The console mailbox is drained between cycles only.
    /// Returns the number of cycles executed.
    pub fn run(&mut self, max_cycles: u64) -> u64 {
        self.ebox.run();
        let mut n = 0;
        while self.ebox.is_running() && n < max_cycles {
            self.mailbox.drain(&mut self.input);
            self.ebox.tick();
            n += 1;
        }
        self.mailbox.drain(&mut self.input);
        n
    }

    /// Request a stop; honored between cycles.
    pub fn halt(&mut self) {
        self.ebox.halt();
    }
}
