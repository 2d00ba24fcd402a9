// SPDX-License-Identifier: MPL-2.0

//! Hooking the handlers into the host's vector table.

use core::fmt;

use log::info;

use crate::{
    config::{ConfigError, RegistrationMode, ResidencyMode, ShimConfig},
    controller::LocalIrq,
    dispatch::RawHandler,
    line::Topology,
};

/// The host services the installer relies on.
pub trait VectorHost {
    /// Returns the handler currently installed at `vector`, if any.
    fn vector(&self, vector: u8) -> Option<RawHandler>;

    /// Installs `handler` at `vector`.
    fn set_vector(&mut self, vector: u8, handler: RawHandler);

    /// Asks the host to keep the shim resident after its setup returns.
    fn stay_resident(&mut self, mode: ResidencyMode);
}

/// The reasons an installation is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallError {
    /// A redirection is already installed.
    AlreadyInstalled,
    /// The configuration does not fit the platform.
    Config(ConfigError),
    /// The source line's vector is the timer tick's vector.
    VectorConflict(u8),
}

impl From<ConfigError> for InstallError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInstalled => write!(f, "a redirection is already installed"),
            Self::Config(err) => write!(f, "invalid configuration: {}", err),
            Self::VectorConflict(vector) => write!(
                f,
                "vector {:#04x} is shared by the source line and the timer tick",
                vector
            ),
        }
    }
}

/// Wires the redirect and resync entry points into the host's vector table.
pub struct Installer<'a, H: ?Sized, L> {
    host: &'a mut H,
    irq: L,
    config: ShimConfig,
    source_vector: u8,
    target_vector: u8,
    timer_vector: u8,
}

impl<'a, H: VectorHost + ?Sized, L: LocalIrq> Installer<'a, H, L> {
    /// Prepares an installation on a platform with the given topology.
    ///
    /// # Errors
    ///
    /// Fails if the source line has no vector on this platform, or if its
    /// vector is the timer tick's.
    pub fn new(
        host: &'a mut H,
        irq: L,
        config: ShimConfig,
        topology: &Topology,
    ) -> Result<Self, InstallError> {
        let source = config.mapping().source();
        let target = config.mapping().target();
        let source_vector = source
            .vector_in(topology)
            .ok_or(ConfigError::NoSecondaryController(source.number()))?;
        let target_vector = target
            .vector_in(topology)
            .ok_or(ConfigError::NoSecondaryController(target.number()))?;

        let timer_vector = topology.timer_vector();
        if source_vector == timer_vector {
            return Err(InstallError::VectorConflict(source_vector));
        }

        Ok(Self {
            host,
            irq,
            config,
            source_vector,
            target_vector,
            timer_vector,
        })
    }

    /// Returns the vector the redirect entry goes to.
    pub fn source_vector(&self) -> u8 {
        self.source_vector
    }

    /// Returns the vector whose handler chain the redirect entry dispatches.
    pub fn target_vector(&self) -> u8 {
        self.target_vector
    }

    /// Returns the vector the resync entry goes to.
    pub fn timer_vector(&self) -> u8 {
        self.timer_vector
    }

    /// Returns the tick handler that the resync handler will displace.
    ///
    /// It must be captured before [`install`](Self::install) overwrites it.
    pub fn previous_tick_handler(&self) -> Option<RawHandler> {
        self.host.vector(self.timer_vector)
    }

    /// Installs both entry points, then asks the host to stay resident.
    ///
    /// The handlers behind the entry points must be ready to run before this
    /// is called: the source line may fire as soon as its vector is written.
    pub fn install(self, redirect_entry: RawHandler, resync_entry: RawHandler) {
        let Self {
            host,
            irq,
            config,
            source_vector,
            target_vector,
            timer_vector,
        } = self;
        let mapping = config.mapping();

        match config.registration() {
            RegistrationMode::Direct => irq.without_interrupts(|| {
                host.set_vector(source_vector, redirect_entry);
                host.set_vector(timer_vector, resync_entry);
            }),
            RegistrationMode::OsMediated => {
                host.set_vector(source_vector, redirect_entry);
                host.set_vector(timer_vector, resync_entry);
            }
        }

        info!(
            "[irq-redirect]: IRQ {} (vector {:#04x}) now serves IRQ {} (vector {:#04x}), \
             cascade EOI {}, registration {:?}, residency {:?}",
            mapping.source().number(),
            source_vector,
            mapping.target().number(),
            target_vector,
            if mapping.crosses_to_primary() {
                "on"
            } else {
                "off"
            },
            config.registration(),
            config.residency(),
        );

        host.stay_resident(config.residency());
    }
}
