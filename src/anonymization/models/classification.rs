//! PII classification data models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of matched sample values kept per classification
pub const MAX_SAMPLE_VALUES: usize = 5;

/// Closed enumeration of PII types a column can be classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiType {
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
    /// National identification numbers (e.g. US Social Security Numbers)
    NationalId,
    /// Payment card numbers
    CreditCard,
    /// IPv4 addresses
    IpAddress,
    /// Passport numbers
    Passport,
    /// Driver license numbers
    DriverLicense,
    /// Bank account numbers
    BankAccount,
    /// Dates of birth
    DateOfBirth,
    /// Personal names
    Name,
}

impl PiiType {
    /// Every PII type, in declaration order
    pub const ALL: [PiiType; 10] = [
        Self::Email,
        Self::Phone,
        Self::NationalId,
        Self::CreditCard,
        Self::IpAddress,
        Self::Passport,
        Self::DriverLicense,
        Self::BankAccount,
        Self::DateOfBirth,
        Self::Name,
    ];

    /// Stable snake_case identifier, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::NationalId => "national_id",
            Self::CreditCard => "credit_card",
            Self::IpAddress => "ip_address",
            Self::Passport => "passport",
            Self::DriverLicense => "driver_license",
            Self::BankAccount => "bank_account",
            Self::DateOfBirth => "date_of_birth",
            Self::Name => "name",
        }
    }

    /// Upper-case label used in console summaries
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PiiType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "national_id" | "ssn" => Ok(Self::NationalId),
            "credit_card" => Ok(Self::CreditCard),
            "ip_address" | "ip" => Ok(Self::IpAddress),
            "passport" => Ok(Self::Passport),
            "driver_license" => Ok(Self::DriverLicense),
            "bank_account" | "account" => Ok(Self::BankAccount),
            "date_of_birth" | "dob" => Ok(Self::DateOfBirth),
            "name" => Ok(Self::Name),
            _ => Err(format!("Unknown PII type: {s}")),
        }
    }
}

/// Classification of one column as holding one PII type
///
/// Several classifications may exist for the same column; ambiguity is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiClassification {
    /// Detected PII type
    pub pii_type: PiiType,
    /// Column the classification applies to
    pub column_name: String,
    /// Total rows in the scanned table (not just the sample)
    pub row_count: usize,
    /// Up to five matching sample values
    pub sample_values: Vec<String>,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl PiiClassification {
    /// Create a classification, capping samples and clamping confidence
    pub fn new(
        pii_type: PiiType,
        column_name: impl Into<String>,
        row_count: usize,
        mut sample_values: Vec<String>,
        confidence: f64,
    ) -> Self {
        sample_values.truncate(MAX_SAMPLE_VALUES);
        Self {
            pii_type,
            column_name: column_name.into(),
            row_count,
            sample_values,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("ssn".parse::<PiiType>().unwrap(), PiiType::NationalId);
        assert_eq!("credit-card".parse::<PiiType>().unwrap(), PiiType::CreditCard);
        assert_eq!("EMAIL".parse::<PiiType>().unwrap(), PiiType::Email);
        assert!("shoe_size".parse::<PiiType>().is_err());
    }

    #[test]
    fn test_serializes_as_snake_case() {
        let json = serde_json::to_string(&PiiType::DateOfBirth).unwrap();
        assert_eq!(json, "\"date_of_birth\"");
    }

    #[test]
    fn test_samples_capped() {
        let samples = (0..8).map(|i| format!("user{i}@example.com")).collect();
        let c = PiiClassification::new(PiiType::Email, "email", 8, samples, 1.3);
        assert_eq!(c.sample_values.len(), MAX_SAMPLE_VALUES);
        assert_eq!(c.confidence, 1.0);
    }
}
