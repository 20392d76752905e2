//! Supported currencies
//!
//! Accounts carry balances in exactly one currency from a fixed allow-list.
//! Parsing is the only way to obtain a [`Currency`], so every value in the
//! system is guaranteed to be on the list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Currency validation errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CurrencyError {
    #[error("unsupported currency: '{0}' (supported: USD, EUR, CAD)")]
    Unsupported(String),
}

/// A supported 3-letter currency code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Cad,
}

impl Currency {
    /// All supported currencies
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Cad];

    /// Get the canonical 3-letter code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Cad => "CAD",
        }
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "CAD" => Ok(Currency::Cad),
            other => Err(CurrencyError::Unsupported(other.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse_valid() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("CAD".parse::<Currency>().unwrap(), Currency::Cad);
    }

    #[test]
    fn test_currency_parse_rejects_unknown() {
        let err = "GBP".parse::<Currency>().unwrap_err();
        assert_eq!(err, CurrencyError::Unsupported("GBP".to_string()));
    }

    #[test]
    fn test_currency_parse_rejects_lowercase() {
        assert!("usd".parse::<Currency>().is_err());
        assert!("Usd".parse::<Currency>().is_err());
    }

    #[test]
    fn test_currency_round_trip() {
        for c in Currency::ALL {
            assert_eq!(c.as_str().parse::<Currency>().unwrap(), c);
            assert_eq!(c.to_string(), c.as_str());
        }
    }

    #[test]
    fn test_currency_serde_uppercase() {
        let json = serde_json::to_string(&Currency::Eur).unwrap();
        assert_eq!(json, "\"EUR\"");
        let back: Currency = serde_json::from_str("\"CAD\"").unwrap();
        assert_eq!(back, Currency::Cad);
        assert!(serde_json::from_str::<Currency>("\"JPY\"").is_err());
    }
}
