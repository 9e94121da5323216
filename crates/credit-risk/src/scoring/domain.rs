use std::fmt;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of columns in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 10;

/// Column order shared by training and inference. The target column is never part of it.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "business_type",
    "years_in_operation",
    "annual_revenue",
    "monthly_cashflow",
    "loan_amount_requested",
    "credit_score",
    "existing_loans",
    "debt_to_income_ratio",
    "collateral_value",
    "repayment_history",
];

/// Raw applicant input as submitted to the scoring endpoint.
///
/// Numeric fields accept JSON numbers or numeric strings and are coerced to their semantic
/// type while deserializing; anything else is rejected as invalid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub business_type: String,
    #[serde(deserialize_with = "deserialize_count")]
    pub years_in_operation: u32,
    #[serde(deserialize_with = "deserialize_real")]
    pub annual_revenue: f64,
    #[serde(deserialize_with = "deserialize_real")]
    pub monthly_cashflow: f64,
    #[serde(deserialize_with = "deserialize_real")]
    pub loan_amount_requested: f64,
    /// Kept as submitted so range checks see the raw value; truncated only in [`FeatureVector`].
    #[serde(deserialize_with = "deserialize_real")]
    pub credit_score: f64,
    #[serde(deserialize_with = "deserialize_count")]
    pub existing_loans: u32,
    #[serde(deserialize_with = "deserialize_real")]
    pub debt_to_income_ratio: f64,
    #[serde(deserialize_with = "deserialize_real")]
    pub collateral_value: f64,
    pub repayment_history: String,
}

/// Encoded, fixed-order model input. Built per request and consumed once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub(crate) fn from_application(
        application: &LoanApplication,
        business_code: u32,
        repayment_code: u32,
    ) -> Self {
        Self {
            values: [
                f64::from(business_code),
                f64::from(application.years_in_operation),
                application.annual_revenue,
                application.monthly_cashflow,
                application.loan_amount_requested,
                application.credit_score.trunc(),
                f64::from(application.existing_loans),
                application.debt_to_income_ratio,
                application.collateral_value,
                f64::from(repayment_code),
            ],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|name| *name == feature)
            .map(|index| self.values[index])
    }
}

/// Risk band derived from the rounded risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskCategory {
    /// Each band maps to exactly one decision.
    pub const fn decision(self) -> LoanDecision {
        match self {
            RiskCategory::Low => LoanDecision::Approve,
            RiskCategory::Moderate => LoanDecision::Review,
            RiskCategory::High => LoanDecision::Reject,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Moderate => "Moderate Risk",
            RiskCategory::High => "High Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanDecision {
    Approve,
    Review,
    Reject,
}

impl LoanDecision {
    pub const fn label(self) -> &'static str {
        match self {
            LoanDecision::Approve => "APPROVE",
            LoanDecision::Review => "REVIEW",
            LoanDecision::Reject => "REJECT",
        }
    }
}

/// Distance of the raw probability from the 0.5 decision boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
        }
    }
}

/// Rule-derived explanation attached to a score. Serialized as its human-readable summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskReason {
    #[serde(rename = "Low credit score")]
    LowCreditScore,
    #[serde(rename = "High debt-to-income ratio")]
    HighDebtToIncome,
    #[serde(rename = "Loan amount exceeds annual revenue")]
    LoanExceedsRevenue,
    #[serde(rename = "Poor repayment history")]
    PoorRepaymentHistory,
    #[serde(rename = "Strong financial profile")]
    StrongFinancialProfile,
}

impl RiskReason {
    pub const fn summary(self) -> &'static str {
        match self {
            RiskReason::LowCreditScore => "Low credit score",
            RiskReason::HighDebtToIncome => "High debt-to-income ratio",
            RiskReason::LoanExceedsRevenue => "Loan amount exceeds annual revenue",
            RiskReason::PoorRepaymentHistory => "Poor repayment history",
            RiskReason::StrongFinancialProfile => "Strong financial profile",
        }
    }
}

impl fmt::Display for RiskReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}

/// Scoring response returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub decision: LoanDecision,
    pub confidence: ConfidenceLevel,
    pub reasons: Vec<RiskReason>,
}

impl ScoreResult {
    pub fn reason_summaries(&self) -> Vec<&'static str> {
        self.reasons.iter().map(|reason| reason.summary()).collect()
    }
}

pub(crate) fn deserialize_real<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(RealVisitor)
}

pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserializer.deserialize_any(IntegerVisitor)?;
    u32::try_from(value).map_err(|_| {
        de::Error::invalid_value(Unexpected::Signed(value), &"a non-negative whole number")
    })
}

struct RealVisitor;

impl<'de> Visitor<'de> for RealVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a finite number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
        Ok(value as f64)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
        Ok(value as f64)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(E::invalid_value(Unexpected::Float(value), &self))
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
        match value.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Ok(parsed),
            _ => Err(E::invalid_value(Unexpected::Str(value), &self)),
        }
    }
}

struct IntegerVisitor;

impl<'de> Visitor<'de> for IntegerVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a whole number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        i64::try_from(value).map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    // Fractional input truncates toward zero.
    fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
        if value.is_finite() && value.abs() < i64::MAX as f64 {
            Ok(value.trunc() as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(value), &self))
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
    }
}
