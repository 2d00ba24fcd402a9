// SPDX-License-Identifier: MPL-2.0

//! Build-time configuration of the shim.

use core::fmt;

use crate::line::{Controller, IrqLine, RedirectionMapping, Topology};

/// How the installer hooks the shim's entry points into the vector table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationMode {
    /// Edit the vector table directly, with interrupts disabled.
    Direct,
    /// Ask the host's vector services to do it.
    OsMediated,
}

/// How the shim asks the host to keep it resident once installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResidencyMode {
    /// The historical keep-resident service.
    Legacy,
    /// The current keep-resident service.
    Standard,
}

/// The reasons a configuration is rejected before installation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The line number is not in `0..16`.
    LineOutOfRange(u8),
    /// The source and the target are the same line.
    SameLine(u8),
    /// The line needs a secondary controller that the platform does not have.
    NoSecondaryController(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineOutOfRange(number) => write!(f, "IRQ {} is out of range 0-15", number),
            Self::SameLine(number) => {
                write!(f, "IRQ {} cannot be redirected onto itself", number)
            }
            Self::NoSecondaryController(number) => write!(
                f,
                "IRQ {} needs a secondary interrupt controller, which is absent",
                number
            ),
        }
    }
}

/// The complete, validated configuration of the shim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShimConfig {
    mapping: RedirectionMapping,
    registration: RegistrationMode,
    residency: ResidencyMode,
}

impl ShimConfig {
    /// IRQ 9 (secondary) redirected onto IRQ 3 (primary), registered directly
    /// and kept resident through the standard service.
    pub const DEFAULT: ShimConfig = match Self::new(
        9,
        3,
        RegistrationMode::Direct,
        ResidencyMode::Standard,
        &Topology::PC_AT,
    ) {
        Ok(config) => config,
        Err(_) => panic!("the default configuration is invalid"),
    };

    /// Validates a configuration against the platform topology.
    ///
    /// This is a `const fn` so that a bad selection can be rejected while
    /// the binary is being built.
    ///
    /// # Errors
    ///
    /// Fails if a line is out of range, if both lines are the same, or if a
    /// line lives on a secondary controller the topology lacks.
    pub const fn new(
        source: u8,
        target: u8,
        registration: RegistrationMode,
        residency: ResidencyMode,
        topology: &Topology,
    ) -> Result<Self, ConfigError> {
        let source = match IrqLine::new(source) {
            Ok(line) => line,
            Err(err) => return Err(err),
        };
        let target = match IrqLine::new(target) {
            Ok(line) => line,
            Err(err) => return Err(err),
        };

        if !topology.has_secondary() {
            if matches!(source.controller(), Controller::Secondary) {
                return Err(ConfigError::NoSecondaryController(source.number()));
            }
            if matches!(target.controller(), Controller::Secondary) {
                return Err(ConfigError::NoSecondaryController(target.number()));
            }
        }

        let mapping = match RedirectionMapping::new(source, target) {
            Ok(mapping) => mapping,
            Err(err) => return Err(err),
        };

        Ok(Self {
            mapping,
            registration,
            residency,
        })
    }

    /// Returns the source/target mapping.
    pub const fn mapping(&self) -> RedirectionMapping {
        self.mapping
    }

    /// Returns the registration mechanism.
    pub const fn registration(&self) -> RegistrationMode {
        self.registration
    }

    /// Returns the residency mechanism.
    pub const fn residency(&self) -> ResidencyMode {
        self.residency
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn config(source: u8, target: u8, topology: &Topology) -> Result<ShimConfig, ConfigError> {
        ShimConfig::new(
            source,
            target,
            RegistrationMode::OsMediated,
            ResidencyMode::Legacy,
            topology,
        )
    }

    #[test]
    fn default_crosses_the_cascade() {
        let mapping = ShimConfig::DEFAULT.mapping();
        assert_eq!(mapping.source().number(), 9);
        assert_eq!(mapping.target().number(), 3);
        assert!(mapping.crosses_to_primary());
        assert_eq!(ShimConfig::DEFAULT.registration(), RegistrationMode::Direct);
        assert_eq!(ShimConfig::DEFAULT.residency(), ResidencyMode::Standard);
    }

    #[test]
    fn rejections() {
        assert_eq!(
            config(16, 3, &Topology::PC_AT),
            Err(ConfigError::LineOutOfRange(16))
        );
        assert_eq!(
            config(3, 200, &Topology::PC_AT),
            Err(ConfigError::LineOutOfRange(200))
        );
        assert_eq!(config(5, 5, &Topology::PC_AT), Err(ConfigError::SameLine(5)));
        assert_eq!(
            config(9, 3, &Topology::PC_XT),
            Err(ConfigError::NoSecondaryController(9))
        );
        assert_eq!(
            config(3, 11, &Topology::PC_XT),
            Err(ConfigError::NoSecondaryController(11))
        );
    }

    #[test]
    fn accepted_configuration_keeps_the_knobs() {
        let config = config(3, 5, &Topology::PC_XT).unwrap();
        assert_eq!(config.mapping().source().number(), 3);
        assert_eq!(config.mapping().target().number(), 5);
        assert_eq!(config.registration(), RegistrationMode::OsMediated);
        assert_eq!(config.residency(), ResidencyMode::Legacy);
    }

    #[test]
    fn display() {
        assert_eq!(
            ConfigError::LineOutOfRange(20).to_string(),
            "IRQ 20 is out of range 0-15"
        );
        assert_eq!(
            ConfigError::NoSecondaryController(9).to_string(),
            "IRQ 9 needs a secondary interrupt controller, which is absent"
        );
    }
}
