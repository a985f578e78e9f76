use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, max = 255))]
    pub platform_name: Option<String>,

    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,

    #[validate(custom(function = "validate_fee_percent"))]
    pub platform_fee_percent: Option<Decimal>,

    pub registrations_open: Option<bool>,
}

fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_currency"))
    }
}

fn validate_fee_percent(fee: &Decimal) -> Result<(), ValidationError> {
    if *fee >= Decimal::ZERO && *fee <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        Err(ValidationError::new("fee_out_of_range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_must_be_iso_code() {
        let req = UpdateSettingsRequest {
            currency: Some("usd".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateSettingsRequest {
            currency: Some("USD".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_fee_range() {
        let req = UpdateSettingsRequest {
            platform_fee_percent: Some(Decimal::new(1015, 1)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
