//! Emission settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the bit numbering is discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitDiscovery {
    /// Every bit of every declared register, in declaration order.
    #[default]
    Declared,
    /// Only bits some operation touches, in first-seen depth-first order.
    Referenced,
}

impl fmt::Display for BitDiscovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitDiscovery::Declared => write!(f, "declared"),
            BitDiscovery::Referenced => write!(f, "referenced"),
        }
    }
}

impl FromStr for BitDiscovery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "declared" => Ok(BitDiscovery::Declared),
            "referenced" => Ok(BitDiscovery::Referenced),
            other => Err(format!(
                "unknown discovery strategy '{other}' (expected 'declared' or 'referenced')"
            )),
        }
    }
}

/// Settings for one compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Bit numbering strategy.
    pub discovery: BitDiscovery,
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Loop variable used when a for-loop declares none.
    pub default_loop_var: String,
    /// Name of the simulator object every call goes through.
    pub simulator: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            discovery: BitDiscovery::Declared,
            indent_width: 4,
            default_loop_var: "loop_num".into(),
            simulator: "sim".into(),
        }
    }
}

impl EmitConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the discovery strategy.
    #[must_use]
    pub fn with_discovery(mut self, discovery: BitDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// Set the indentation width.
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the default loop variable name.
    #[must_use]
    pub fn with_default_loop_var(mut self, name: impl Into<String>) -> Self {
        self.default_loop_var = name.into();
        self
    }

    /// Set the simulator handle name.
    #[must_use]
    pub fn with_simulator(mut self, name: impl Into<String>) -> Self {
        self.simulator = name.into();
        self
    }
}
