use thiserror::Error;

use crate::enums::{FsukSystem, MAXIMUM_QUANTITY, MakeOrBuy, StepType, format_allowed};

/// Reason a single row failed validation.
///
/// Only the first failing check of a row is ever reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("Invalid system '{value}'; must be one of {}", format_allowed(&FsukSystem::ALL))]
    InvalidSystem { value: String },

    #[error("Invalid make_or_buy '{value}'; must be one of {}", format_allowed(&MakeOrBuy::ALL))]
    InvalidMakeOrBuy { value: String },

    #[error("Invalid quantity '{quantity}'; must be greater than 0")]
    QuantityBelowMinimum { quantity: i64 },

    #[error(
        "Invalid quantity '{quantity}'; must not be greater than {max} (FSUK site limit)",
        max = MAXIMUM_QUANTITY
    )]
    QuantityAboveMaximum { quantity: i64 },

    #[error("Invalid cost '{cost}'; must not be negative")]
    NegativeCost { cost: f64 },

    #[error("Invalid carbon_footprint '{value}'; must not be negative")]
    NegativeCarbonFootprint { value: f64 },

    #[error("Invalid step_type '{value}'; must be one of {}", format_allowed(&StepType::ALL))]
    InvalidStepType { value: String },

    #[error("Invalid row")]
    InvalidRow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_system_names_every_allowed_value() {
        let message = RowError::InvalidSystem {
            value: "Electronics".to_string(),
        }
        .to_string();
        assert!(message.starts_with("Invalid system 'Electronics'"));
        for system in FsukSystem::ALL {
            assert!(message.contains(system.as_str()), "missing {system}");
        }
    }

    #[test]
    fn test_quantity_above_maximum_mentions_limit() {
        let message = RowError::QuantityAboveMaximum { quantity: 1000 }.to_string();
        assert_eq!(
            message,
            "Invalid quantity '1000'; must not be greater than 999 (FSUK site limit)"
        );
    }
}
