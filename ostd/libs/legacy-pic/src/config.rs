// SPDX-License-Identifier: MPL-2.0

//! Build-time selection of the redirection.
//!
//! The following environment variables are read when the crate is built.
//! Each one falls back to [`ShimConfig::DEFAULT`] when unset.
//!
//! | Variable                    | Values               |
//! |-----------------------------|----------------------|
//! | `IRQ_REDIRECT_SOURCE`       | `0`-`15`             |
//! | `IRQ_REDIRECT_TARGET`       | `0`-`15`             |
//! | `IRQ_REDIRECT_REGISTRATION` | `direct`, `os`       |
//! | `IRQ_REDIRECT_RESIDENCY`    | `legacy`, `standard` |
//!
//! An invalid selection stops the build.

use irq_redirect::{ConfigError, IrqLine, RegistrationMode, ResidencyMode, ShimConfig, Topology};

/// The topology the shim runs on.
pub const TOPOLOGY: Topology = Topology::PC_AT;

/// The selected configuration.
pub const CONFIG: ShimConfig = match ShimConfig::new(
    parse_line(
        option_env!("IRQ_REDIRECT_SOURCE"),
        ShimConfig::DEFAULT.mapping().source().number(),
    ),
    parse_line(
        option_env!("IRQ_REDIRECT_TARGET"),
        ShimConfig::DEFAULT.mapping().target().number(),
    ),
    parse_registration(option_env!("IRQ_REDIRECT_REGISTRATION")),
    parse_residency(option_env!("IRQ_REDIRECT_RESIDENCY")),
    &TOPOLOGY,
) {
    Ok(config) => config,
    Err(ConfigError::LineOutOfRange(_)) => panic!("IRQ_REDIRECT_SOURCE/TARGET must be below 16"),
    Err(ConfigError::SameLine(_)) => panic!("IRQ_REDIRECT_SOURCE and IRQ_REDIRECT_TARGET are equal"),
    Err(ConfigError::NoSecondaryController(_)) => panic!("the selected IRQ needs a secondary PIC"),
};

/// Returns the vector `line` is delivered on in `topology`.
///
/// Only called on lines that [`CONFIG`] has already validated against the
/// topology, so the panic is unreachable after const evaluation.
pub(crate) const fn line_vector(line: IrqLine, topology: &Topology) -> u8 {
    match line.vector_in(topology) {
        Some(vector) => vector,
        None => panic!("the selected IRQ needs a secondary PIC"),
    }
}

const fn parse_line(value: Option<&str>, default: u8) -> u8 {
    let Some(value) = value else {
        return default;
    };
    let digits = value.as_bytes();
    if digits.is_empty() {
        panic!("an IRQ number must not be empty");
    }

    let mut number: u8 = 0;
    let mut i = 0;
    while i < digits.len() {
        let digit = digits[i];
        if !digit.is_ascii_digit() {
            panic!("an IRQ number must be decimal");
        }
        number = match number.checked_mul(10) {
            Some(number) => number,
            None => panic!("an IRQ number must be below 16"),
        };
        number = match number.checked_add(digit - b'0') {
            Some(number) => number,
            None => panic!("an IRQ number must be below 16"),
        };
        i += 1;
    }
    number
}

const fn parse_registration(value: Option<&str>) -> RegistrationMode {
    match value {
        None => ShimConfig::DEFAULT.registration(),
        Some(value) if str_eq(value, "direct") => RegistrationMode::Direct,
        Some(value) if str_eq(value, "os") => RegistrationMode::OsMediated,
        Some(_) => panic!("IRQ_REDIRECT_REGISTRATION must be `direct` or `os`"),
    }
}

const fn parse_residency(value: Option<&str>) -> ResidencyMode {
    match value {
        None => ShimConfig::DEFAULT.residency(),
        Some(value) if str_eq(value, "legacy") => ResidencyMode::Legacy,
        Some(value) if str_eq(value, "standard") => ResidencyMode::Standard,
        Some(_) => panic!("IRQ_REDIRECT_RESIDENCY must be `legacy` or `standard`"),
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}
