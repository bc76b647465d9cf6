//! Configuration validation.
//!
//! Validates config values before any data is read. Presence of the
//! input path itself is resolved by the CLI (a flag may supply it); this
//! pass rejects keys that are present but unusable.

use crate::domain::error::SalecastError;
use crate::ports::config_port::ConfigPort;

const COLUMN_KEYS: [&str; 5] = [
    "part_column",
    "period_column",
    "quantity_column",
    "total_column",
    "currency_column",
];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SalecastError> {
    validate_data_section(config)?;
    validate_forecast_section(config)?;
    Ok(())
}

fn validate_data_section(config: &dyn ConfigPort) -> Result<(), SalecastError> {
    if let Some(input) = config.get_string("data", "input") {
        if input.trim().is_empty() {
            return Err(SalecastError::ConfigInvalid {
                section: "data".to_string(),
                key: "input".to_string(),
                reason: "input path must not be empty".to_string(),
            });
        }
    }

    for key in COLUMN_KEYS {
        if let Some(value) = config.get_string("data", key) {
            if value.trim().is_empty() {
                return Err(SalecastError::ConfigInvalid {
                    section: "data".to_string(),
                    key: key.to_string(),
                    reason: "column name must not be empty".to_string(),
                });
            }
        }
    }

    Ok(())
}

fn validate_forecast_section(config: &dyn ConfigPort) -> Result<(), SalecastError> {
    if let Some(currency) = config.get_string("forecast", "currency") {
        let trimmed = currency.trim();
        if trimmed.is_empty() {
            return Err(SalecastError::ConfigInvalid {
                section: "forecast".to_string(),
                key: "currency".to_string(),
                reason: "currency must not be empty".to_string(),
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SalecastError::ConfigInvalid {
                section: "forecast".to_string(),
                key: "currency".to_string(),
                reason: "currency must be an alphabetic code".to_string(),
            });
        }
    }

    if let Some(output) = config.get_string("forecast", "output") {
        if output.trim().is_empty() {
            return Err(SalecastError::ConfigInvalid {
                section: "forecast".to_string(),
                key: "output".to_string(),
                reason: "output path must not be empty".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn full_config_validates() {
        let adapter = config(
            r#"
[data]
input = sales.tsv
part_column = PART NO
period_column = PERIOD

[forecast]
currency = INR
output = predictions.tsv
"#,
        );
        assert!(validate_config(&adapter).is_ok());
    }

    #[test]
    fn empty_config_validates_with_defaults() {
        let adapter = config("");
        assert!(validate_config(&adapter).is_ok());
    }

    #[test]
    fn empty_input_path_is_rejected() {
        let adapter = config("[data]\ninput =   \n");
        assert!(matches!(
            validate_config(&adapter),
            Err(SalecastError::ConfigInvalid { ref key, .. }) if key == "input"
        ));
    }

    #[test]
    fn empty_column_name_is_rejected() {
        let adapter = config("[data]\nquantity_column =\n");
        assert!(matches!(
            validate_config(&adapter),
            Err(SalecastError::ConfigInvalid { ref key, .. }) if key == "quantity_column"
        ));
    }

    #[test]
    fn numeric_currency_is_rejected() {
        let adapter = config("[forecast]\ncurrency = 123\n");
        assert!(matches!(
            validate_config(&adapter),
            Err(SalecastError::ConfigInvalid { ref key, .. }) if key == "currency"
        ));
    }
}
