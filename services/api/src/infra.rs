use credit_risk::scoring::LoanApplication;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Applicant used by the offline `score` command when no input file is given.
pub(crate) fn reference_application() -> LoanApplication {
    LoanApplication {
        business_type: "Retail".to_string(),
        years_in_operation: 4,
        annual_revenue: 800000.0,
        monthly_cashflow: 60000.0,
        loan_amount_requested: 250000.0,
        credit_score: 700.0,
        existing_loans: 1,
        debt_to_income_ratio: 0.35,
        collateral_value: 350000.0,
        repayment_history: "Average".to_string(),
    }
}
