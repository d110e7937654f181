//! Compute device selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device an embedding model runs on.
///
/// Selection affects throughput only; embeddings are identical across devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// General-purpose processor, always available.
    Cpu,

    /// Local accelerator (GPU or similar).
    Accelerator,

    /// Use the accelerator when the provider supports one.
    #[default]
    Auto,
}

impl Device {
    /// Resolve `Auto` against what the provider can run on.
    pub fn resolve(self, accelerator_supported: bool) -> Self {
        match self {
            Self::Auto if accelerator_supported => Self::Accelerator,
            Self::Auto => Self::Cpu,
            other => other,
        }
    }

    pub fn is_cpu(&self) -> bool {
        matches!(self, Self::Cpu)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Accelerator => "accelerator",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "accelerator" | "gpu" | "cuda" => Ok(Self::Accelerator),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown device '{other}' (expected cpu, accelerator or auto)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolution() {
        assert_eq!(Device::Auto.resolve(false), Device::Cpu);
        assert_eq!(Device::Auto.resolve(true), Device::Accelerator);
        assert_eq!(Device::Cpu.resolve(true), Device::Cpu);
        assert_eq!(Device::Accelerator.resolve(false), Device::Accelerator);
    }

    #[test]
    fn test_parse() {
        assert_eq!("CUDA".parse::<Device>().unwrap(), Device::Accelerator);
        assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
        assert!("tpu".parse::<Device>().is_err());
    }
}
