mod policy;
mod rules;

pub use policy::{
    categorize, confidence_for, risk_score, HIGH_RISK_THRESHOLD, MODERATE_RISK_THRESHOLD,
};
pub use rules::explain;

use super::domain::{LoanApplication, ScoreResult};

/// Stateless engine turning a default probability into a scored decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionEngine;

impl DecisionEngine {
    pub fn new() -> Self {
        Self
    }

    /// The band and its decision come from the model output; reasons come from the raw
    /// application alone and may disagree with the decision.
    pub fn decide(
        &self,
        probability_of_default: f64,
        application: &LoanApplication,
    ) -> ScoreResult {
        let risk_score = risk_score(probability_of_default);
        let risk_category = categorize(risk_score);

        ScoreResult {
            risk_score,
            risk_category,
            decision: risk_category.decision(),
            confidence: confidence_for(probability_of_default),
            reasons: explain(application),
        }
    }
}
