//! Input rows and their classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::enums::{FsukSystem, MAXIMUM_QUANTITY, MakeOrBuy, StepType};
use crate::error::RowError;

/// Identifier reported for rows that fit no kind.
pub const UNDEFINED_IDENTIFIER: &str = "Invalid row";

/// Classification of a row, decided by its first non-empty identifying field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKind {
    System,
    Assembly,
    Part,
    Step,
    Undefined,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::System => "System",
            RowKind::Assembly => "Assembly",
            RowKind::Part => "Part",
            RowKind::Step => "Step",
            RowKind::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw field mapping for one record, as produced by the importer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowData {
    pub system: String,
    pub assembly: String,
    pub part: String,
    pub make_or_buy: String,
    pub step_type: String,
    pub subtype: String,
    pub comment: String,
    pub quantity: i64,
    pub cost: f64,
    pub cost_comment: String,
    pub carbon_footprint: f64,
    pub carbon_comment: String,
}

impl Default for RowData {
    /// An empty record with the importer's defaults for missing numeric cells.
    fn default() -> Self {
        Self {
            system: String::new(),
            assembly: String::new(),
            part: String::new(),
            make_or_buy: String::new(),
            step_type: String::new(),
            subtype: String::new(),
            comment: String::new(),
            quantity: 0,
            cost: f64::NAN,
            cost_comment: String::new(),
            carbon_footprint: f64::NAN,
            carbon_comment: String::new(),
        }
    }
}

/// One immutable bill-of-materials record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    kind: RowKind,
    #[serde(flatten)]
    data: RowData,
}

impl Row {
    /// Builds a row and classifies it. Never fails.
    pub fn new(data: RowData) -> Self {
        let kind = classify(&data);
        Self { kind, data }
    }

    pub fn kind(&self) -> RowKind {
        self.kind
    }

    pub fn system(&self) -> &str {
        &self.data.system
    }

    pub fn assembly(&self) -> &str {
        &self.data.assembly
    }

    pub fn part(&self) -> &str {
        &self.data.part
    }

    pub fn make_or_buy(&self) -> &str {
        &self.data.make_or_buy
    }

    pub fn step_type(&self) -> &str {
        &self.data.step_type
    }

    pub fn subtype(&self) -> &str {
        &self.data.subtype
    }

    pub fn comment(&self) -> &str {
        &self.data.comment
    }

    pub fn quantity(&self) -> i64 {
        self.data.quantity
    }

    pub fn cost(&self) -> f64 {
        self.data.cost
    }

    pub fn cost_comment(&self) -> &str {
        &self.data.cost_comment
    }

    pub fn carbon_footprint(&self) -> f64 {
        self.data.carbon_footprint
    }

    pub fn carbon_comment(&self) -> &str {
        &self.data.carbon_comment
    }

    /// Returns true for bought-in parts.
    pub fn is_bought(&self) -> bool {
        self.data.make_or_buy == MakeOrBuy::Buy.as_str()
    }

    /// Display name used in progress and error lines.
    pub fn identifier(&self) -> String {
        match self.kind {
            RowKind::System => self.data.system.clone(),
            RowKind::Assembly => self.data.assembly.clone(),
            RowKind::Part => self.data.part.clone(),
            RowKind::Step => format!("{}: {}", self.data.step_type, self.data.subtype),
            RowKind::Undefined => UNDEFINED_IDENTIFIER.to_string(),
        }
    }

    /// Checks the row against the rules for its kind.
    ///
    /// # Errors
    ///
    /// Returns the first rule the row breaks.
    pub fn validate(&self) -> Result<(), RowError> {
        match self.kind {
            RowKind::System => self.validate_system(),
            RowKind::Assembly => self.validate_assembly(),
            RowKind::Part => self.validate_part(),
            RowKind::Step => self.validate_step(),
            RowKind::Undefined => Err(RowError::InvalidRow),
        }
    }

    fn validate_system(&self) -> Result<(), RowError> {
        if FsukSystem::is_valid(&self.data.system) {
            Ok(())
        } else {
            Err(RowError::InvalidSystem {
                value: self.data.system.clone(),
            })
        }
    }

    /// Assemblies are not validated yet; any non-empty name passes.
    fn validate_assembly(&self) -> Result<(), RowError> {
        trace!(assembly = %self.data.assembly, "assembly rules not defined; accepting");
        Ok(())
    }

    fn validate_part(&self) -> Result<(), RowError> {
        let data = &self.data;
        if !MakeOrBuy::is_valid(&data.make_or_buy) {
            return Err(RowError::InvalidMakeOrBuy {
                value: data.make_or_buy.clone(),
            });
        }
        if data.quantity < 1 {
            return Err(RowError::QuantityBelowMinimum {
                quantity: data.quantity,
            });
        }
        if data.quantity > MAXIMUM_QUANTITY {
            return Err(RowError::QuantityAboveMaximum {
                quantity: data.quantity,
            });
        }
        // NaN (a blank cell) compares false and passes.
        if data.cost < 0.0 {
            return Err(RowError::NegativeCost { cost: data.cost });
        }
        if data.carbon_footprint < 0.0 {
            return Err(RowError::NegativeCarbonFootprint {
                value: data.carbon_footprint,
            });
        }
        Ok(())
    }

    fn validate_step(&self) -> Result<(), RowError> {
        if StepType::is_valid(&self.data.step_type) {
            Ok(())
        } else {
            Err(RowError::InvalidStepType {
                value: self.data.step_type.clone(),
            })
        }
    }
}

impl From<RowData> for Row {
    fn from(data: RowData) -> Self {
        Row::new(data)
    }
}

fn classify(data: &RowData) -> RowKind {
    if !data.system.is_empty() {
        RowKind::System
    } else if !data.assembly.is_empty() {
        RowKind::Assembly
    } else if !data.part.is_empty() {
        RowKind::Part
    } else if !data.step_type.is_empty() {
        RowKind::Step
    } else {
        RowKind::Undefined
    }
}
