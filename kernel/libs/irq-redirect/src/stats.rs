// SPDX-License-Identifier: MPL-2.0

use core::sync::atomic::{AtomicUsize, Ordering};

/// Counters of what the handlers have done since installation.
///
/// Each handler owns one. The counters are only ever incremented, from
/// interrupt context, and are read for reporting.
#[derive(Debug, Default)]
pub struct Stats {
    redirects: AtomicUsize,
    redirects_dropped: AtomicUsize,
    masks_mirrored: AtomicUsize,
    cascade_eois: AtomicUsize,
    ticks: AtomicUsize,
    ticks_skipped: AtomicUsize,
    corrections: AtomicUsize,
}

/// A point-in-time copy of [`Stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Source interrupts that ran the target's handler chain.
    pub redirects: usize,
    /// Source interrupts dropped because the redirect handler was busy.
    pub redirects_dropped: usize,
    /// Target mask changes mirrored onto the source line.
    pub masks_mirrored: usize,
    /// End-Of-Interrupt pairs sent across the cascade.
    pub cascade_eois: usize,
    /// Timer ticks seen by the resync handler.
    pub ticks: usize,
    /// Timer ticks whose resync was skipped because the handler was busy.
    pub ticks_skipped: usize,
    /// Resyncs that had to change the source line's mask.
    pub corrections: usize,
}

macro_rules! impl_counters {
    ($($field:ident => $inc:ident),* $(,)?) => {
        impl Stats {
            /// Creates a set of zeroed counters.
            pub const fn new() -> Self {
                Self {
                    $($field: AtomicUsize::new(0),)*
                }
            }

            /// Reads all counters.
            pub fn snapshot(&self) -> StatsSnapshot {
                StatsSnapshot {
                    $($field: self.$field.load(Ordering::Relaxed),)*
                }
            }

            $(
                pub(crate) fn $inc(&self) {
                    self.$field.fetch_add(1, Ordering::Relaxed);
                }
            )*
        }
    };
}

impl_counters! {
    redirects => count_redirect,
    redirects_dropped => count_redirect_dropped,
    masks_mirrored => count_mask_mirrored,
    cascade_eois => count_cascade_eoi,
    ticks => count_tick,
    ticks_skipped => count_tick_skipped,
    corrections => count_correction,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counts() {
        let stats = Stats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());

        stats.count_redirect();
        stats.count_redirect();
        stats.count_cascade_eoi();
        stats.count_tick_skipped();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.redirects, 2);
        assert_eq!(snapshot.cascade_eois, 1);
        assert_eq!(snapshot.ticks_skipped, 1);
        assert_eq!(snapshot.corrections, 0);
    }
}
