//! Environment tiers and the resource limit preset each one selects.

use serde::{Serialize, Serializer};
use std::fmt;

/// Tier label that selects the production preset. Matched exactly.
pub const PRODUCTION_LABEL: &str = "production";

/// CPU ceiling for production node pools (2 cores)
pub const PRODUCTION_CPU_MILLICORES: u32 = 2000;

/// Memory ceiling for production node pools
pub const PRODUCTION_MEMORY_MEBIBYTES: u64 = 2000;

/// CPU ceiling for every other tier (1 core)
pub const DEFAULT_CPU_MILLICORES: u32 = 1000;

/// Memory ceiling for every other tier
pub const DEFAULT_MEMORY_MEBIBYTES: u64 = 1000;

/// Deployment tier of the composite resource.
///
/// Any label other than `"production"` (including an empty or unset one)
/// falls back to [`Tier::NonProduction`]; no label is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tier {
    Production,
    #[default]
    NonProduction,
}

impl Tier {
    /// Map a free-form environment label to a tier
    pub fn from_label(label: &str) -> Self {
        if label == PRODUCTION_LABEL {
            Tier::Production
        } else {
            Tier::NonProduction
        }
    }

    /// The limit preset for this tier
    pub fn limits(&self) -> LimitPreset {
        match self {
            Tier::Production => LimitPreset {
                cpu: CpuQuantity::from_millicores(PRODUCTION_CPU_MILLICORES),
                memory: MemoryQuantity::from_mebibytes(PRODUCTION_MEMORY_MEBIBYTES),
            },
            Tier::NonProduction => LimitPreset {
                cpu: CpuQuantity::from_millicores(DEFAULT_CPU_MILLICORES),
                memory: MemoryQuantity::from_mebibytes(DEFAULT_MEMORY_MEBIBYTES),
            },
        }
    }

    /// Short name used for metric labels and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Production => "production",
            Tier::NonProduction => "non-production",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU and memory ceiling pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPreset {
    pub cpu: CpuQuantity,
    pub memory: MemoryQuantity,
}

/// CPU quantity, rendered in millicores (`"1000m"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CpuQuantity(u32);

impl CpuQuantity {
    pub fn from_millicores(millicores: u32) -> Self {
        Self(millicores)
    }
}

impl fmt::Display for CpuQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl Serialize for CpuQuantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Memory quantity, rendered in mebibytes (`"1000Mi"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemoryQuantity(u64);

impl MemoryQuantity {
    pub fn from_mebibytes(mebibytes: u64) -> Self {
        Self(mebibytes)
    }
}

impl fmt::Display for MemoryQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Mi", self.0)
    }
}

impl Serialize for MemoryQuantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_label_selects_production_preset() {
        let limits = Tier::from_label("production").limits();
        assert_eq!(limits.cpu.to_string(), "2000m");
        assert_eq!(limits.memory.to_string(), "2000Mi");
    }

    #[test]
    fn test_other_labels_fall_back_to_default_preset() {
        for label in ["", "development", "staging", "Production", " production", "prod"] {
            let tier = Tier::from_label(label);
            assert_eq!(tier, Tier::NonProduction, "label {:?}", label);

            let limits = tier.limits();
            assert_eq!(limits.cpu.to_string(), "1000m");
            assert_eq!(limits.memory.to_string(), "1000Mi");
        }
    }

    #[test]
    fn test_default_tier_is_non_production() {
        assert_eq!(Tier::default(), Tier::NonProduction);
    }

    #[test]
    fn test_quantities_serialize_as_strings() {
        let json = serde_json::to_string(&CpuQuantity::from_millicores(1500)).unwrap();
        assert_eq!(json, "\"1500m\"");

        let json = serde_json::to_string(&MemoryQuantity::from_mebibytes(512)).unwrap();
        assert_eq!(json, "\"512Mi\"");
    }
}
