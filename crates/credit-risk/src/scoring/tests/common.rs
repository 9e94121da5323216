use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::scoring::artifacts::ScoringArtifacts;
use crate::scoring::domain::{FeatureVector, LoanApplication};
use crate::scoring::encoder::LabelEncoder;
use crate::scoring::model::RiskModel;
use crate::scoring::{scoring_router, ScoringService};

pub(super) fn reference_application() -> LoanApplication {
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

pub(super) fn reference_payload() -> Value {
    json!({
        "business_type": "Retail",
        "years_in_operation": 4,
        "annual_revenue": 800000,
        "monthly_cashflow": 60000,
        "loan_amount_requested": 250000,
        "credit_score": 700,
        "existing_loans": 1,
        "debt_to_income_ratio": 0.35,
        "collateral_value": 350000,
        "repayment_history": "Average"
    })
}

pub(super) fn business_encoder() -> LabelEncoder {
    LabelEncoder::fit(
        "business_type",
        ["Agriculture", "Construction", "Manufacturing", "Retail", "Services"],
    )
    .expect("business encoder fits")
}

pub(super) fn repayment_encoder() -> LabelEncoder {
    LabelEncoder::fit("repayment_history", ["Average", "Good", "Poor"])
        .expect("repayment encoder fits")
}

/// Returns the same probability for every input.
pub(super) struct FixedModel {
    pub(super) probability: f64,
}

impl RiskModel for FixedModel {
    fn probability_of_default(&self, _features: &FeatureVector) -> f64 {
        self.probability
    }
}

/// Fixed probability that also records how often it was consulted.
pub(super) struct CountingModel {
    pub(super) probability: f64,
    pub(super) calls: Arc<AtomicUsize>,
}

impl RiskModel for CountingModel {
    fn probability_of_default(&self, _features: &FeatureVector) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.probability
    }
}

pub(super) fn build_service(probability: f64) -> ScoringService<FixedModel> {
    let artifacts = ScoringArtifacts::new(
        FixedModel { probability },
        business_encoder(),
        repayment_encoder(),
    )
    .expect("artifacts are compatible");
    ScoringService::new(Arc::new(artifacts))
}

pub(super) fn counting_service(
    probability: f64,
) -> (ScoringService<CountingModel>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let model = CountingModel {
        probability,
        calls: calls.clone(),
    };
    let artifacts = ScoringArtifacts::new(model, business_encoder(), repayment_encoder())
        .expect("artifacts are compatible");
    (ScoringService::new(Arc::new(artifacts)), calls)
}

pub(super) fn router_with_service<M>(service: ScoringService<M>) -> axum::Router
where
    M: RiskModel + 'static,
{
    scoring_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
