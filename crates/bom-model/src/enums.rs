//! Closed value sets accepted by the teams site.
//!
//! Each set is an enum with an exact-match [`FromStr`] and an `is_valid`
//! membership check, so validation never compares against ad-hoc strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest part quantity the site accepts.
pub const MAXIMUM_QUANTITY: i64 = 999;

/// The nine systems a part may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FsukSystem {
    Brake,
    ChassisAndBody,
    Drivetrain,
    EngineAndTractive,
    GroundedLowVoltage,
    Miscellaneous,
    Steering,
    Suspension,
    WheelsAndTyres,
}

impl FsukSystem {
    pub const ALL: [FsukSystem; 9] = [
        FsukSystem::Brake,
        FsukSystem::ChassisAndBody,
        FsukSystem::Drivetrain,
        FsukSystem::EngineAndTractive,
        FsukSystem::GroundedLowVoltage,
        FsukSystem::Miscellaneous,
        FsukSystem::Steering,
        FsukSystem::Suspension,
        FsukSystem::WheelsAndTyres,
    ];

    /// Returns the name exactly as the site's system dropdown shows it.
    pub fn as_str(&self) -> &'static str {
        match self {
            FsukSystem::Brake => "Brake System",
            FsukSystem::ChassisAndBody => "Chassis and Body",
            FsukSystem::Drivetrain => "Drivetrain",
            FsukSystem::EngineAndTractive => "Engine and Tractive System",
            FsukSystem::GroundedLowVoltage => "Grounded Low Voltage System",
            FsukSystem::Miscellaneous => "Miscellaneous",
            FsukSystem::Steering => "Steering System",
            FsukSystem::Suspension => "Suspension System",
            FsukSystem::WheelsAndTyres => "Wheels and Tyres",
        }
    }

    /// Two-letter code used by the site in part numbers.
    pub fn code(&self) -> &'static str {
        match self {
            FsukSystem::Brake => "BR",
            FsukSystem::ChassisAndBody => "FR",
            FsukSystem::Drivetrain => "DT",
            FsukSystem::EngineAndTractive => "TS",
            FsukSystem::GroundedLowVoltage => "EL",
            FsukSystem::Miscellaneous => "MS",
            FsukSystem::Steering => "ST",
            FsukSystem::Suspension => "SU",
            FsukSystem::WheelsAndTyres => "WT",
        }
    }

    pub fn is_valid(value: &str) -> bool {
        value.parse::<FsukSystem>().is_ok()
    }
}

impl fmt::Display for FsukSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FsukSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FsukSystem::ALL
            .into_iter()
            .find(|system| system.as_str() == s)
            .ok_or_else(|| format!("Unknown system: {s}"))
    }
}

/// Whether a part is manufactured in-house or bought in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MakeOrBuy {
    Make,
    Buy,
}

impl MakeOrBuy {
    pub const ALL: [MakeOrBuy; 2] = [MakeOrBuy::Make, MakeOrBuy::Buy];

    pub fn as_str(&self) -> &'static str {
        match self {
            MakeOrBuy::Make => "Make",
            MakeOrBuy::Buy => "Buy",
        }
    }

    pub fn is_valid(value: &str) -> bool {
        value.parse::<MakeOrBuy>().is_ok()
    }
}

impl fmt::Display for MakeOrBuy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MakeOrBuy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Make" => Ok(MakeOrBuy::Make),
            "Buy" => Ok(MakeOrBuy::Buy),
            _ => Err(format!("Unknown make or buy value: {s}")),
        }
    }
}

/// Kind of manufacturing step recorded against a part.
///
/// The site calls these "actions".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepType {
    Material,
    Process,
    Fasteners,
    Tooling,
}

impl StepType {
    pub const ALL: [StepType; 4] = [
        StepType::Material,
        StepType::Process,
        StepType::Fasteners,
        StepType::Tooling,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Material => "Material",
            StepType::Process => "Process",
            StepType::Fasteners => "Fasteners",
            StepType::Tooling => "Tooling",
        }
    }

    pub fn is_valid(value: &str) -> bool {
        value.parse::<StepType>().is_ok()
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StepType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepType::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| format!("Unknown step type: {s}"))
    }
}

/// Formats a value set as `['A', 'B', ...]` for error messages.
pub(crate) fn format_allowed<T: fmt::Display>(values: &[T]) -> String {
    let quoted: Vec<String> = values.iter().map(|value| format!("'{value}'")).collect();
    format!("[{}]", quoted.join(", "))
}
