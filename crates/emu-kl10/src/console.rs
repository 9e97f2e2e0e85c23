//! Console input mailbox.
//!
//! Keypresses arrive from another thread (the terminal front-end) and the
//! core must never observe them mid-cycle. The sender side is cloneable
//! and thread-safe; the machine drains the mailbox only between cycles.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

/// Thread-safe sending half; clone freely across threads.
#[derive(Debug, Clone)]
pub struct ConsoleSender(Sender<u8>);

impl ConsoleSender {
    /// Queue one character. Silently dropped if the machine is gone.
    pub fn send(&self, ch: u8) {
        let _ = self.0.send(ch);
    }
}

/// Receiving half, owned by the machine.
#[derive(Debug)]
pub struct ConsoleMailbox(Receiver<u8>);

impl ConsoleMailbox {
    /// Drain everything queued so far without blocking.
    pub fn drain(&mut self, into: &mut impl Extend<u8>) {
        loop {
            match self.0.try_recv() {
                Ok(ch) => into.extend(std::iter::once(ch)),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }
}

/// Create a connected sender/mailbox pair.
#[must_use]
pub fn console_channel() -> (ConsoleSender, ConsoleMailbox) {
    let (tx, rx) = channel();
    (ConsoleSender(tx), ConsoleMailbox(rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn drains_in_order() {
        let (tx, mut rx) = console_channel();
        tx.send(b'h');
        tx.send(b'i');
        let mut buf = VecDeque::new();
        rx.drain(&mut buf);
        assert_eq!(buf, VecDeque::from([b'h', b'i']));
    }

    #[test]
    fn drain_is_non_blocking_when_empty() {
        let (_tx, mut rx) = console_channel();
        let mut buf = VecDeque::new();
        rx.drain(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn cross_thread_delivery() {
        let (tx, mut rx) = console_channel();
        let sender = tx.clone();
        std::thread::spawn(move || {
            for ch in b"start" {
                sender.send(*ch);
            }
        })
        .join()
        .expect("sender thread");
        let mut buf = Vec::new();
        rx.drain(&mut buf);
        assert_eq!(buf, b"start");
    }
}
