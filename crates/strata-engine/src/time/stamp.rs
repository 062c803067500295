use std::sync::atomic::{AtomicU64, Ordering};

static CLOCK: AtomicU64 = AtomicU64::new(0);

/// Issues the next clock value.
#[inline]
fn tick() -> u64 {
    CLOCK.fetch_add(1, Ordering::SeqCst) + 1
}

/// Returns the most recently issued clock value (0 before any modification).
#[inline]
pub fn now() -> u64 {
    CLOCK.load(Ordering::SeqCst)
}

/// Last-modified marker.
///
/// A fresh stamp reads `0`, which is older than anything ever issued and
/// therefore means "never modified" / "never built".
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeStamp {
    value: u64,
}

impl TimeStamp {
    #[inline]
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Creates a stamp that is already newer than every existing stamp.
    #[inline]
    pub fn modified_now() -> Self {
        Self { value: tick() }
    }

    /// Advances this stamp past every stamp issued so far.
    #[inline]
    pub fn modified(&mut self) {
        self.value = tick();
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.value
    }

    #[inline]
    pub const fn is_set(self) -> bool {
        self.value != 0
    }
}

/// Writes `value` into `slot` and touches `stamp`, but only on change.
///
/// All parameter setters go through this so that re-setting the current value
/// never triggers a downstream recompute. Returns whether anything changed.
pub fn assign<T: PartialEq>(slot: &mut T, value: T, stamp: &mut TimeStamp) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    stamp.modified();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stamp_is_unset() {
        let s = TimeStamp::new();
        assert!(!s.is_set());
        assert_eq!(s.get(), 0);
    }

    #[test]
    fn modified_is_strictly_increasing() {
        let mut a = TimeStamp::new();
        let mut b = TimeStamp::new();
        a.modified();
        b.modified();
        assert!(b > a);
        a.modified();
        assert!(a > b);
        assert!(now() >= a.get());
    }

    #[test]
    fn assign_touches_only_on_change() {
        let mut stamp = TimeStamp::new();
        let mut value = 1.0f32;

        assert!(assign(&mut value, 2.5, &mut stamp));
        let after_change = stamp;
        assert!(after_change.is_set());

        assert!(!assign(&mut value, 2.5, &mut stamp));
        assert_eq!(stamp, after_change);
        assert_eq!(value, 2.5);
    }
}
