// SPDX-License-Identifier: MPL-2.0

/// The shape of an entry installed at an interrupt vector.
pub type RawHandler = fn();

/// A handler chain that can be invoked synchronously.
///
/// The redirect handler holds one for the target line's vector, and the
/// resync handler holds one for the tick handler it displaced. Both are
/// captured once, at installation time.
pub trait Dispatch {
    /// Runs the chain to completion.
    fn dispatch(&self);
}

impl<F: Fn()> Dispatch for F {
    fn dispatch(&self) {
        self()
    }
}
