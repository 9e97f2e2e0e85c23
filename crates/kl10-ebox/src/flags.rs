//! CPU flags the microcode tests through the SKIP field.
//!
//! These are machine-state wires, not microword bits: mode flags, the run
//! flip-flop, and the external request lines. The external ones (EBUS,
//! interrupt, meter) are driven by collaborators outside the core through
//! plain field writes.

/// Machine flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    /// Run flip-flop. Cleared by `halt()` and by a core failure.
    pub run: bool,
    /// Kernel mode.
    pub kernel: bool,
    /// User mode.
    pub user: bool,
    /// Public mode.
    pub public: bool,
    /// An instruction fetch is in progress.
    pub fetch: bool,
    /// Current memory reference is read-pause-write.
    pub rpw_ref: bool,
    /// Priority-interrupt cycle.
    pub pi_cycle: bool,
    /// EBUS grant line.
    pub ebus_grant: bool,
    /// EBUS transfer line.
    pub ebus_xfer: bool,
    /// Interrupt request pending.
    pub intrpt: bool,
    /// I/O instructions are legal in this context.
    pub io_legal: bool,
    /// Previous-context XCT in progress.
    pub pxs_xct: bool,
    /// VMA is in section zero.
    pub vma_sec0: bool,
    /// Current memory reference resolved to fast memory.
    pub ac_ref: bool,
    /// Meter request line.
    pub mtr_req: bool,
    /// Console start request.
    pub start: bool,
}

impl Flags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every flag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
