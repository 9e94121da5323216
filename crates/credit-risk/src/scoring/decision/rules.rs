use super::super::domain::{LoanApplication, RiskReason};

const LOW_CREDIT_SCORE: f64 = 650.0;
const HIGH_DEBT_TO_INCOME: f64 = 0.5;
const POOR_REPAYMENT_LABEL: &str = "poor";

/// Every matching rule contributes a reason, in a fixed order. Never returns an empty list.
pub fn explain(application: &LoanApplication) -> Vec<RiskReason> {
    let mut reasons = Vec::new();

    if application.credit_score < LOW_CREDIT_SCORE {
        reasons.push(RiskReason::LowCreditScore);
    }

    if application.debt_to_income_ratio > HIGH_DEBT_TO_INCOME {
        reasons.push(RiskReason::HighDebtToIncome);
    }

    if application.loan_amount_requested > application.annual_revenue {
        reasons.push(RiskReason::LoanExceedsRevenue);
    }

    if application
        .repayment_history
        .eq_ignore_ascii_case(POOR_REPAYMENT_LABEL)
    {
        reasons.push(RiskReason::PoorRepaymentHistory);
    }

    if reasons.is_empty() {
        reasons.push(RiskReason::StrongFinancialProfile);
    }

    reasons
}
