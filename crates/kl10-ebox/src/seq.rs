//! The microprogram sequencer: CRADR computation.
//!
//! Each cycle the next control-RAM address is assembled from the J field
//! OR'd with skip and dispatch bits, except on RETURN where the popped
//! stack value is used directly. The return stack is four deep; misuse is
//! fatal. A pending page-fail forces 1777 with the current address pushed
//! so the handler can retry the faulting microword.

use std::collections::HashSet;

use crate::cr::{DispFunc, Microword, SkipCond};
use crate::dr::DispatchWord;
use crate::error::EboxError;
use crate::flags::Flags;

/// Depth of the microcode return stack.
pub const STACK_DEPTH: usize = 4;

/// Microaddress mask (11 bits).
pub const CRADR_MASK: u16 = 0o3777;

/// Data-path values the dispatch logic samples (all pre-edge).
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchInputs {
    /// FE bit 0.
    pub fe0: bool,
    /// MQ bits 34-35.
    pub mq_34_35: u8,
}

/// The control-RAM address register and its return stack.
#[derive(Debug, Clone)]
pub struct Sequencer {
    cradr: u16,
    stack: [u16; STACK_DEPTH],
    depth: usize,
    force_1777: bool,
    /// Dispatch codes already reported, keyed by (site, code).
    stubbed: HashSet<(u16, u8)>,
}

impl Sequencer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cradr: 0,
            stack: [0; STACK_DEPTH],
            depth: 0,
            force_1777: false,
            stubbed: HashSet::new(),
        }
    }

    /// Clear the address, the stack, and the page-fail sentinel.
    pub fn reset(&mut self) {
        self.cradr = 0;
        self.stack = [0; STACK_DEPTH];
        self.depth = 0;
        self.force_1777 = false;
        self.stubbed.clear();
    }

    /// The current microaddress.
    #[must_use]
    pub const fn cradr(&self) -> u16 {
        self.cradr
    }

    /// Set the microaddress directly (console / debugger entry).
    pub fn set_cradr(&mut self, addr: u16) {
        self.cradr = addr & CRADR_MASK;
    }

    /// Arm the page-fail sentinel: the next advance pushes the current
    /// address and jumps to 1777.
    pub fn force_page_fail(&mut self) {
        self.force_1777 = true;
    }

    /// Live return-stack entries, top last.
    #[must_use]
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.depth]
    }

    fn push(&mut self, addr: u16) -> Result<(), EboxError> {
        if self.depth == STACK_DEPTH {
            return Err(EboxError::StackOverflow { cradr: self.cradr });
        }
        self.stack[self.depth] = addr & CRADR_MASK;
        self.depth += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<u16, EboxError> {
        if self.depth == 0 {
            return Err(EboxError::StackUnderflow { cradr: self.cradr });
        }
        self.depth -= 1;
        Ok(self.stack[self.depth])
    }

    /// Compute and latch the next microaddress.
    ///
    /// Observes only values settled before the edge: the current CR and DR,
    /// the flags, and the sampled dispatch inputs.
    pub fn advance(
        &mut self,
        cr: &Microword,
        dr: DispatchWord,
        flags: &Flags,
        inp: DispatchInputs,
    ) -> Result<u16, EboxError> {
        if self.force_1777 {
            self.force_1777 = false;
            self.push(self.cradr)?;
            self.cradr = 0o1777;
            return Ok(self.cradr);
        }

        if cr.call() {
            self.push((self.cradr + 1) & CRADR_MASK)?;
        }

        let mut or_bits: u16 = 0;
        if let Some(skip) = cr.skip()
            && test_skip(skip, flags)
        {
            or_bits |= 1;
        }

        let mut returned = None;
        if let Some(disp) = cr.disp() {
            match disp {
                DispFunc::DramJ => or_bits |= dr.j() & 0o17,
                DispFunc::DramB => or_bits |= u16::from(dr.b() & 0o7),
                DispFunc::Return => returned = Some(self.pop()?),
                DispFunc::Mul => {
                    or_bits |= u16::from(inp.fe0) << 2 | u16::from(inp.mq_34_35 & 0o3);
                }
                // DRAM A RD only affects the AD carry chain here; DIAG is
                // a console function with no address contribution.
                DispFunc::DramARd | DispFunc::Diag => {}
                DispFunc::PgFail
                | DispFunc::Sr
                | DispFunc::Nicond
                | DispFunc::Sh0Thru3
                | DispFunc::Div
                | DispFunc::Signs
                | DispFunc::Byte
                | DispFunc::EaMod
                | DispFunc::Norm => self.log_stub(disp),
            }
        }

        self.cradr = returned.unwrap_or(or_bits | cr.j()) & CRADR_MASK;
        Ok(self.cradr)
    }

    /// Report a stubbed dispatch once per (site, code).
    fn log_stub(&mut self, disp: DispFunc) {
        if self.stubbed.insert((self.cradr, disp as u8)) {
            eprintln!(
                "kl10-ebox: dispatch {disp:?} at CRADR {:04o} is stubbed (no address bits)",
                self.cradr
            );
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate a skip condition against the flags.
fn test_skip(cond: SkipCond, f: &Flags) -> bool {
    match cond {
        SkipCond::Run => f.run,
        SkipCond::Kernel => f.kernel,
        SkipCond::User => f.user,
        SkipCond::Public => f.public,
        SkipCond::Fetch => f.fetch,
        SkipCond::RpwRef => f.rpw_ref,
        SkipCond::PiCycle => f.pi_cycle,
        SkipCond::EbusGrantNot => !f.ebus_grant,
        SkipCond::EbusXferNot => !f.ebus_xfer,
        SkipCond::Intrpt => f.intrpt,
        SkipCond::IoLegal => f.io_legal,
        SkipCond::PxsXct => f.pxs_xct,
        SkipCond::VmaSec0Not => !f.vma_sec0,
        SkipCond::AcRef => f.ac_ref,
        SkipCond::MtrReqNot => !f.mtr_req,
        SkipCond::StartNot => !f.start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cr::Microword;

    fn jump(j: u16) -> Microword {
        let mut cr = Microword::default();
        cr.set_j(j);
        cr
    }

    #[test]
    fn plain_jump_takes_the_j_field() {
        let mut seq = Sequencer::new();
        seq.set_cradr(0o100);
        let next = seq
            .advance(&jump(0o200), DispatchWord::default(), &Flags::new(), DispatchInputs::default())
            .expect("no stack use");
        assert_eq!(next, 0o200);
        assert_eq!(seq.cradr(), 0o200);
    }

    #[test]
    fn skip_condition_ors_the_low_bit() {
        let mut seq = Sequencer::new();
        let mut cr = jump(0o200);
        cr.set_skip(SkipCond::Run);

        let mut flags = Flags::new();
        let next = seq
            .advance(&cr, DispatchWord::default(), &flags, DispatchInputs::default())
            .expect("ok");
        assert_eq!(next, 0o200);

        flags.run = true;
        let next = seq
            .advance(&cr, DispatchWord::default(), &flags, DispatchInputs::default())
            .expect("ok");
        assert_eq!(next, 0o201);
    }

    #[test]
    fn negated_skips_test_the_complement() {
        let mut seq = Sequencer::new();
        let mut cr = jump(0o100);
        cr.set_skip(SkipCond::StartNot);
        let next = seq
            .advance(&cr, DispatchWord::default(), &Flags::new(), DispatchInputs::default())
            .expect("ok");
        assert_eq!(next, 0o101);
    }

    #[test]
    fn dram_j_ors_the_low_four_bits() {
        let mut seq = Sequencer::new();
        let mut cr = jump(0o240);
        cr.set_disp(DispFunc::DramJ);
        let dr = DispatchWord::from_fields(0, 0, 0o1525);
        let next = seq
            .advance(&cr, dr, &Flags::new(), DispatchInputs::default())
            .expect("ok");
        assert_eq!(next, 0o240 | (0o1525 & 0o17));
    }

    #[test]
    fn dram_b_ors_three_bits() {
        let mut seq = Sequencer::new();
        let mut cr = jump(0o240);
        cr.set_disp(DispFunc::DramB);
        let dr = DispatchWord::from_fields(0, 0o5, 0);
        let next = seq
            .advance(&cr, dr, &Flags::new(), DispatchInputs::default())
            .expect("ok");
        assert_eq!(next, 0o245);
    }

    #[test]
    fn mul_dispatch_bits() {
        let mut seq = Sequencer::new();
        let mut cr = jump(0o1000);
        cr.set_disp(DispFunc::Mul);
        let inp = DispatchInputs {
            fe0: true,
            mq_34_35: 0o2,
        };
        let next = seq
            .advance(&cr, DispatchWord::default(), &Flags::new(), inp)
            .expect("ok");
        assert_eq!(next, 0o1000 | 0o4 | 0o2);
    }

    #[test]
    fn call_then_return_comes_back_to_caller_plus_one() {
        let mut seq = Sequencer::new();
        seq.set_cradr(0o100);

        let mut call = jump(0o500);
        call.set_call();
        seq.advance(&call, DispatchWord::default(), &Flags::new(), DispatchInputs::default())
            .expect("ok");
        assert_eq!(seq.cradr(), 0o500);

        // RETURN ignores J entirely.
        let mut ret = jump(0o700);
        ret.set_disp(DispFunc::Return);
        let next = seq
            .advance(&ret, DispatchWord::default(), &Flags::new(), DispatchInputs::default())
            .expect("ok");
        assert_eq!(next, 0o101);
    }

    #[test]
    fn stack_overflow_is_fatal() {
        let mut seq = Sequencer::new();
        let mut call = jump(0o500);
        call.set_call();
        for _ in 0..STACK_DEPTH {
            seq.advance(&call, DispatchWord::default(), &Flags::new(), DispatchInputs::default())
                .expect("within depth");
        }
        let err = seq
            .advance(&call, DispatchWord::default(), &Flags::new(), DispatchInputs::default())
            .expect_err("fifth push");
        assert!(matches!(err, EboxError::StackOverflow { .. }));
    }

    #[test]
    fn return_on_empty_stack_is_fatal() {
        let mut seq = Sequencer::new();
        let mut ret = jump(0);
        ret.set_disp(DispFunc::Return);
        let err = seq
            .advance(&ret, DispatchWord::default(), &Flags::new(), DispatchInputs::default())
            .expect_err("empty stack");
        assert!(matches!(err, EboxError::StackUnderflow { .. }));
    }

    #[test]
    fn page_fail_forces_1777_and_pushes_the_faulting_address() {
        let mut seq = Sequencer::new();
        seq.set_cradr(0o432);
        seq.force_page_fail();
        let next = seq
            .advance(&jump(0o100), DispatchWord::default(), &Flags::new(), DispatchInputs::default())
            .expect("ok");
        assert_eq!(next, 0o1777);
        assert_eq!(seq.stack(), &[0o432]);

        // The sentinel is one-shot.
        let next = seq
            .advance(&jump(0o100), DispatchWord::default(), &Flags::new(), DispatchInputs::default())
            .expect("ok");
        assert_eq!(next, 0o100);
    }
}
