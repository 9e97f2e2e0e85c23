//! Top-level KL10 machine: the EBOX core wired to its file-format loaders
//! and the console input mailbox.

mod config;
mod console;
mod error;
mod kl10;

pub use config::Kl10Config;
pub use console::{ConsoleMailbox, ConsoleSender, console_channel};
pub use error::Kl10Error;
pub use kl10::Kl10;
