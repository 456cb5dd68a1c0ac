//! Debug-only re-entrancy guard for the engines.
//!
//! Engine methods call back into caller code (comparators, hash and equality
//! functions). A callback that reaches back into the same engine would see
//! links in a half-updated state, so in debug builds entering an engine twice
//! panics. Release builds compile the guard to nothing.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-engine tracker. Engines open a section with
/// `let _g = self.reentrancy.enter();` at each public entry point.
///
/// The tracker is `Send` so engines can move between threads (e.g. inside a
/// `Locked` wrapper), but it is not `Sync`.
#[derive(Debug, Default)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
        }
    }

    /// Open a guarded section. Panics in debug builds if one is already open.
    #[inline]
    pub(crate) fn enter(&self) -> SectionGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(d == 0, "re-entrant call into a container engine");
            self.depth.set(d + 1);
            SectionGuard {
                owner: self,
                _pd: PhantomData,
            }
        }

        #[cfg(not(debug_assertions))]
        {
            SectionGuard { _pd: PhantomData }
        }
    }
}

impl Clone for DebugReentrancy {
    // A cloned engine starts outside any section.
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// Closes the section on drop.
pub(crate) struct SectionGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    _pd: PhantomData<&'a ()>,
}

impl Drop for SectionGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn sequential_sections_are_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter();
        }
        let _g = r.enter();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_section_panics_in_debug() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g1 = r.enter();
            let _g2 = r.enter();
        }));
        assert!(res.is_err(), "expected nested entry to panic in debug builds");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn clone_starts_outside_section() {
        let r = DebugReentrancy::new();
        let _g = r.enter();
        let c = r.clone();
        let _g2 = c.enter();
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_section_is_noop_in_release() {
        let r = DebugReentrancy::new();
        let _g1 = r.enter();
        let _g2 = r.enter();
    }
}
