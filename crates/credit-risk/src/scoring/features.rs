use serde::Deserialize;
use serde_json::Value;

use super::domain::{deserialize_count, deserialize_real, FeatureVector, LoanApplication};
use super::encoder::{EncoderError, LabelEncoder};
use super::service::ScoringError;

pub const MIN_CREDIT_SCORE: f64 = 300.0;
pub const MAX_CREDIT_SCORE: f64 = 900.0;

/// Range violations reported back to the applicant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Credit score must be between 300 and 900")]
    CreditScoreOutOfRange { found: f64 },
    #[error("Debt-to-income ratio must be between 0 and 1")]
    DebtToIncomeOutOfRange { found: f64 },
    #[error("Loan amount must be greater than 0")]
    NonPositiveLoanAmount { found: f64 },
}

/// Checks run in a fixed order; the first violation wins.
pub fn validate(application: &LoanApplication) -> Result<(), ValidationError> {
    check_credit_score(application.credit_score)?;
    check_debt_to_income(application.debt_to_income_ratio)?;
    check_loan_amount(application.loan_amount_requested)
}

fn check_credit_score(credit_score: f64) -> Result<(), ValidationError> {
    if (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&credit_score) {
        Ok(())
    } else {
        Err(ValidationError::CreditScoreOutOfRange {
            found: credit_score,
        })
    }
}

fn check_debt_to_income(ratio: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(ValidationError::DebtToIncomeOutOfRange { found: ratio })
    }
}

fn check_loan_amount(loan_amount: f64) -> Result<(), ValidationError> {
    if loan_amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveLoanAmount { found: loan_amount })
    }
}

/// Request body before coercion.
///
/// Fields stay untyped until [`ApplicationPayload::into_application`] reaches them, so a range
/// violation is reported ahead of any malformed field that follows it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationPayload {
    business_type: Value,
    years_in_operation: Value,
    annual_revenue: Value,
    monthly_cashflow: Value,
    loan_amount_requested: Value,
    credit_score: Value,
    existing_loans: Value,
    debt_to_income_ratio: Value,
    collateral_value: Value,
    repayment_history: Value,
}

impl ApplicationPayload {
    /// Parse and range-check the credit score, ratio and loan amount in that order, then
    /// coerce the remaining fields.
    pub fn into_application(self) -> Result<LoanApplication, ScoringError> {
        let credit_score = field("credit_score", self.credit_score, deserialize_real)?;
        check_credit_score(credit_score)?;
        let debt_to_income_ratio =
            field("debt_to_income_ratio", self.debt_to_income_ratio, deserialize_real)?;
        check_debt_to_income(debt_to_income_ratio)?;
        let loan_amount_requested =
            field("loan_amount_requested", self.loan_amount_requested, deserialize_real)?;
        check_loan_amount(loan_amount_requested)?;

        Ok(LoanApplication {
            business_type: field("business_type", self.business_type, String::deserialize)?,
            years_in_operation: field(
                "years_in_operation",
                self.years_in_operation,
                deserialize_count,
            )?,
            annual_revenue: field("annual_revenue", self.annual_revenue, deserialize_real)?,
            monthly_cashflow: field("monthly_cashflow", self.monthly_cashflow, deserialize_real)?,
            loan_amount_requested,
            credit_score,
            existing_loans: field("existing_loans", self.existing_loans, deserialize_count)?,
            debt_to_income_ratio,
            collateral_value: field("collateral_value", self.collateral_value, deserialize_real)?,
            repayment_history: field(
                "repayment_history",
                self.repayment_history,
                String::deserialize,
            )?,
        })
    }
}

fn field<T, F>(name: &str, value: Value, parse: F) -> Result<T, ScoringError>
where
    F: FnOnce(Value) -> Result<T, serde_json::Error>,
{
    if value.is_null() {
        return Err(ScoringError::InvalidInput(format!("missing field `{name}`")));
    }
    parse(value).map_err(|err| ScoringError::InvalidInput(format!("{name}: {err}")))
}

/// Turns applications into model input using the trained category encoders.
pub struct FeatureBuilder<'a> {
    business_encoder: &'a LabelEncoder,
    repayment_encoder: &'a LabelEncoder,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(business_encoder: &'a LabelEncoder, repayment_encoder: &'a LabelEncoder) -> Self {
        Self {
            business_encoder,
            repayment_encoder,
        }
    }

    /// Validate, then encode. Nothing is encoded when validation fails.
    pub fn build(&self, application: &LoanApplication) -> Result<FeatureVector, ScoringError> {
        validate(application)?;
        Ok(self.encode(application)?)
    }

    /// Encode without range checks. Training rows go through here.
    pub fn encode(&self, application: &LoanApplication) -> Result<FeatureVector, EncoderError> {
        let business_code = self.business_encoder.transform(&application.business_type)?;
        let repayment_code = self
            .repayment_encoder
            .transform(&application.repayment_history)?;

        Ok(FeatureVector::from_application(
            application,
            business_code,
            repayment_code,
        ))
    }
}
