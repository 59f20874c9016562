use crate::core::ScannerClass;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Auto,
    #[serde(alias = "onDemand", alias = "on-demand")]
    OnDemand,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::OnDemand => write!(f, "on_demand"),
        }
    }
}

/// The two ways a scanner can be configured: a bare class, or a class with
/// an explicit run mode.
#[derive(Debug, Clone)]
pub enum ScannerEntry {
    Bare(ScannerClass),
    Described {
        scanner: ScannerClass,
        run_mode: Option<RunMode>,
    },
}

impl From<ScannerClass> for ScannerEntry {
    fn from(class: ScannerClass) -> Self {
        Self::Bare(class)
    }
}

impl From<(ScannerClass, RunMode)> for ScannerEntry {
    fn from((scanner, run_mode): (ScannerClass, RunMode)) -> Self {
        Self::Described {
            scanner,
            run_mode: Some(run_mode),
        }
    }
}

/// Normalized configuration for one scanner.
#[derive(Debug, Clone)]
pub struct ScannerDescriptor {
    pub class: ScannerClass,
    pub run_mode: RunMode,
}

impl ScannerDescriptor {
    pub fn new(class: ScannerClass, run_mode: RunMode) -> Self {
        Self { class, run_mode }
    }

    pub fn id(&self) -> &str {
        self.class.id()
    }

    pub fn is_auto(&self) -> bool {
        self.run_mode == RunMode::Auto
    }
}

impl From<ScannerEntry> for ScannerDescriptor {
    fn from(entry: ScannerEntry) -> Self {
        match entry {
            ScannerEntry::Bare(class) => Self::new(class, RunMode::Auto),
            ScannerEntry::Described { scanner, run_mode } => {
                Self::new(scanner, run_mode.unwrap_or_default())
            }
        }
    }
}
