// SPDX-License-Identifier: MPL-2.0

//! The single resident instance of the shim.

use core::sync::atomic::{AtomicBool, Ordering};

use irq_redirect::{
    InstallError, Installer, RawHandler, RedirectHandler, ResyncHandler, StatsSnapshot,
    VectorHost,
};
use log::warn;
use spin::Once;

use crate::{
    config::{CONFIG, TOPOLOGY},
    irq::CpuIrq,
    pic::Pic8259,
    vector::TargetInterrupt,
};

// SAFETY: The shim is the only user of the controller pair once installed,
// and it never reprograms them.
static PIC: Pic8259 = unsafe { Pic8259::new() };

static REDIRECT: RedirectHandler<&Pic8259, CpuIrq, TargetInterrupt> =
    RedirectHandler::new(CONFIG.mapping(), &PIC, CpuIrq, TargetInterrupt);

static RESYNC: Once<ResyncHandler<&Pic8259, CpuIrq, RawHandler>> = Once::new();

static INSTALLED: AtomicBool = AtomicBool::new(false);

fn redirect_entry() {
    REDIRECT.handle();
}

fn resync_entry() {
    if let Some(resync) = RESYNC.get() {
        resync.handle();
    }
}

fn idle_tick() {}

/// Installs the shim, hooking the source line's vector and the timer tick.
///
/// The host's vector entries are plain functions; the host owns the
/// interrupt prologue and epilogue around them.
///
/// # Errors
///
/// Fails if the shim is already installed, or if the selected source line
/// shares its vector with the timer tick.
pub fn install<H: VectorHost + ?Sized>(host: &mut H) -> Result<(), InstallError> {
    if INSTALLED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        warn!("[irq-redirect]: refusing to install a second redirection");
        return Err(InstallError::AlreadyInstalled);
    }

    let installer = match Installer::new(host, CpuIrq, CONFIG, &TOPOLOGY) {
        Ok(installer) => installer,
        Err(err) => {
            INSTALLED.store(false, Ordering::Release);
            return Err(err);
        }
    };

    let previous = installer.previous_tick_handler().unwrap_or(idle_tick);
    RESYNC.call_once(|| ResyncHandler::new(CONFIG.mapping(), &PIC, CpuIrq, previous));

    installer.install(redirect_entry, resync_entry);
    Ok(())
}

/// Returns the redirect handler's counters.
pub fn redirect_stats() -> StatsSnapshot {
    REDIRECT.stats().snapshot()
}

/// Returns the resync handler's counters, or `None` before installation.
pub fn resync_stats() -> Option<StatsSnapshot> {
    RESYNC.get().map(|resync| resync.stats().snapshot())
}
