//! Catalog enums shared by listed devices and trade-in submissions.

use serde::{Deserialize, Serialize};

/// Kind of device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeviceType {
    #[default]
    Smartphone,
    Laptop,
    Tablet,
    Smartwatch,
    Console,
    Other,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Smartphone => "Smartphone",
            Self::Laptop => "Laptop",
            Self::Tablet => "Tablet",
            Self::Smartwatch => "Smartwatch",
            Self::Console => "Console",
            Self::Other => "Other",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smartphone" | "phone" => Ok(Self::Smartphone),
            "laptop" => Ok(Self::Laptop),
            "tablet" => Ok(Self::Tablet),
            "smartwatch" | "watch" => Ok(Self::Smartwatch),
            "console" => Ok(Self::Console),
            "other" => Ok(Self::Other),
            _ => Err(format!("invalid device type: {s}")),
        }
    }
}

/// Cosmetic and functional grade of a device, best first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum DeviceCondition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for DeviceCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for DeviceCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            _ => Err(format!("invalid device condition: {s}")),
        }
    }
}
