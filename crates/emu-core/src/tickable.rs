//! Trait for components that can be advanced by clock edges.

/// A component driven by a single global clock.
///
/// This is the core abstraction for cycle-level emulation: one call to
/// `tick()` is one clock edge. Combinational settle happens inside the
/// component; the caller only sequences edges.
pub trait Tickable {
    /// Advance the component by one clock edge.
    fn tick(&mut self);

    /// Advance the component by multiple edges.
    ///
    /// Default implementation calls `tick()` in a loop. Components may
    /// override for efficiency, but must produce identical results.
    fn tick_n(&mut self, count: u64) {
        for _ in 0..count {
            self.tick();
        }
    }
}
