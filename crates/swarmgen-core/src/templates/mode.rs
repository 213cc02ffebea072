//! Generation modes: which subset of the project files a run emits.
//!
//! ```
//! use swarmgen_core::templates::GenerationMode;
//! use std::str::FromStr;
//!
//! let mode = GenerationMode::from_str("contract_only").unwrap();
//! assert_eq!(mode, GenerationMode::ContractOnly);
//! assert_eq!(mode.to_string(), "contract_only");
//! assert_eq!(GenerationMode::default(), GenerationMode::Full);
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// File subset emitted by a generation run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Complete buildable project
    #[default]
    Full,
    /// Model classes and the JSON contract only
    #[serde(alias = "contract-only")]
    #[value(name = "contract_only", alias = "contract-only")]
    ContractOnly,
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(GenerationMode::Full),
            "contract_only" | "contract-only" => Ok(GenerationMode::ContractOnly),
            _ => Err(format!("Unknown generation mode: {}", s)),
        }
    }
}

impl GenerationMode {
    /// Returns the mode identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::ContractOnly => "contract_only",
        }
    }

    /// Returns an iterator over all generation modes
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::Full, Self::ContractOnly].iter().copied()
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
