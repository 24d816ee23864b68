//! Check-level configuration
//!
//! Which categories of checks run, and what happens when one fails.
//! A process installs one [`ContractConfig`] at startup with [`init`];
//! guarded calls read it through [`global`] unless a contract carries its
//! own configuration ([`Contract::with_config`](crate::guard::Contract::with_config)).

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{ContractError, ContractKind, ContractResult};
use crate::reporter::{ViolationLog, ViolationReporter};

/// Independently toggleable check categories
///
/// `all` is a master switch: when it is off nothing is evaluated,
/// whatever the individual toggles say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckLevels {
    pub all: bool,
    pub preconditions: bool,
    pub postconditions: bool,
    pub invariants: bool,
    pub exception_guarantees: bool,
}

impl Default for CheckLevels {
    fn default() -> Self {
        Self::enabled()
    }
}

impl CheckLevels {
    /// Every category on
    pub const fn enabled() -> Self {
        Self {
            all: true,
            preconditions: true,
            postconditions: true,
            invariants: true,
            exception_guarantees: true,
        }
    }

    /// The "no contracts" level: master switch off
    pub const fn disabled() -> Self {
        Self {
            all: false,
            preconditions: false,
            postconditions: false,
            invariants: false,
            exception_guarantees: false,
        }
    }

    /// Whether checks of `kind` run
    pub fn checks(&self, kind: ContractKind) -> bool {
        self.all
            && match kind {
                ContractKind::Precondition => self.preconditions,
                ContractKind::Postcondition => self.postconditions,
                ContractKind::Invariant => self.invariants,
                ContractKind::ExceptionGuarantee => self.exception_guarantees,
            }
    }

    /// Turn one category on or off
    pub fn set(&mut self, kind: ContractKind, on: bool) {
        match kind {
            ContractKind::Precondition => self.preconditions = on,
            ContractKind::Postcondition => self.postconditions = on,
            ContractKind::Invariant => self.invariants = on,
            ContractKind::ExceptionGuarantee => self.exception_guarantees = on,
        }
    }

    /// Builder form of [`CheckLevels::set`]
    pub fn with(mut self, kind: ContractKind, on: bool) -> Self {
        self.set(kind, on);
        self
    }
}

/// What the reporter does with a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationReaction {
    /// Print diagnostics and abort the process
    Abort,
    /// Return the violation as an error to the caller
    #[default]
    Raise,
    /// Record the violation and let the call continue. Test use only:
    /// an object whose invariant broke gives no further guarantees.
    Log,
}

impl fmt::Display for ViolationReaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Raise => f.write_str("raise"),
            Self::Log => f.write_str("log"),
        }
    }
}

impl FromStr for ViolationReaction {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "raise" => Ok(Self::Raise),
            "log" => Ok(Self::Log),
            other => Err(ContractError::InvalidConfig(format!(
                "unknown violation reaction '{}' (expected abort, raise or log)",
                other
            ))),
        }
    }
}

/// Complete contract configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractConfig {
    #[serde(default)]
    pub reaction: ViolationReaction,

    #[serde(default)]
    pub checks: CheckLevels,

    /// Destination of `Log` reactions; not part of the file format
    #[serde(skip)]
    pub log: Option<Arc<ViolationLog>>,
}

impl ContractConfig {
    /// Everything on, violations raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing is evaluated and no snapshot is taken
    pub fn disabled() -> Self {
        Self {
            checks: CheckLevels::disabled(),
            ..Self::default()
        }
    }

    pub fn with_checks(mut self, checks: CheckLevels) -> Self {
        self.checks = checks;
        self
    }

    pub fn with_reaction(mut self, reaction: ViolationReaction) -> Self {
        self.reaction = reaction;
        self
    }

    /// Record `Log` reactions into `log`
    pub fn with_log(mut self, log: Arc<ViolationLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Whether checks of `kind` run
    pub fn checks(&self, kind: ContractKind) -> bool {
        self.checks.checks(kind)
    }

    /// The reporter applying this configuration's reaction
    pub fn reporter(&self) -> ViolationReporter<'_> {
        ViolationReporter::new(self.reaction, self.log.as_deref())
    }
}

static GLOBAL: OnceLock<ContractConfig> = OnceLock::new();

/// Install the process-wide configuration
///
/// Must be called before the first guarded call that relies on
/// [`global`]; afterwards the configuration is read-only.
pub fn init(config: ContractConfig) -> ContractResult<()> {
    if config.reaction == ViolationReaction::Log && !cfg!(debug_assertions) {
        warn!("Contract violations will be logged and execution continued; use only for testing");
    }
    debug!(
        "Installing contract configuration: checks={:?}, reaction={}",
        config.checks, config.reaction
    );
    GLOBAL
        .set(config)
        .map_err(|_| ContractError::AlreadyConfigured)
}

/// The process-wide configuration
///
/// Falls back to the defaults if [`init`] was never called.
#[cfg(feature = "runtime")]
pub fn global() -> &'static ContractConfig {
    GLOBAL.get_or_init(ContractConfig::default)
}

/// The process-wide configuration
///
/// Built without the `runtime` feature: contracts are compiled in but
/// never evaluated.
#[cfg(not(feature = "runtime"))]
pub fn global() -> &'static ContractConfig {
    static DISABLED: OnceLock<ContractConfig> = OnceLock::new();
    DISABLED.get_or_init(ContractConfig::disabled)
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod tests;
