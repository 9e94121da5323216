use std::fmt::Write as _;
use std::sync::Arc;

use credit_risk::scoring::training::{read_dataset, train, train_and_save, TrainingOptions};
use credit_risk::scoring::{
    ArtifactStore, LoanApplication, LoanDecision, RiskCategory, RiskModel, ScoringService,
};

const HEADER: &str = "business_type,years_in_operation,annual_revenue,monthly_cashflow,\
loan_amount_requested,credit_score,existing_loans,debt_to_income_ratio,collateral_value,\
repayment_history,default_flag\n";

const BUSINESS_TYPES: [&str; 4] = ["Retail", "Services", "Manufacturing", "Agriculture"];

/// Deterministic history where credit score, leverage, and repayment separate the outcomes.
fn synthetic_history(rows: u32) -> String {
    let mut csv = String::from(HEADER);
    for index in 0..rows {
        let defaulted = index % 2 == 1;
        let spread = (index / 2) % 10;
        let business_type = BUSINESS_TYPES[(index as usize / 2) % BUSINESS_TYPES.len()];
        let years = 1 + spread;
        let revenue = 500_000 + spread * 50_000;
        let cashflow = revenue / 12;
        let loan = 150_000 + spread * 20_000;
        let existing_loans = spread % 3;
        let collateral = 200_000 + spread * 15_000;

        let (credit_score, ratio, repayment) = if defaulted {
            (
                440 + spread * 15,
                0.55 + f64::from(spread) * 0.03,
                if spread % 3 == 0 { "Average" } else { "Poor" },
            )
        } else {
            (
                690 + spread * 15,
                0.10 + f64::from(spread) * 0.03,
                if spread % 3 == 0 { "Average" } else { "Good" },
            )
        };

        writeln!(
            csv,
            "{business_type},{years},{revenue},{cashflow},{loan},{credit_score},\
{existing_loans},{ratio:.2},{collateral},{repayment},{}",
            u8::from(defaulted)
        )
        .expect("write row");
    }
    csv
}

fn reference_application() -> LoanApplication {
    serde_json::from_value(serde_json::json!({
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
    }))
    .expect("reference application deserializes")
}

#[test]
fn training_learns_separable_history() {
    let rows = read_dataset(synthetic_history(100).as_bytes()).expect("dataset parses");
    assert_eq!(rows.len(), 100);

    let (artifacts, report) = train(&rows, &TrainingOptions::default()).expect("training succeeds");

    assert_eq!(report.rows, 100);
    assert_eq!(report.holdout_rows, 20);
    assert_eq!(report.training_rows, 80);
    let accuracy = report.holdout_accuracy.expect("holdout evaluated");
    assert!(accuracy >= 0.8, "holdout accuracy {accuracy}");

    assert_eq!(
        artifacts.business_encoder.classes(),
        ["Agriculture", "Manufacturing", "Retail", "Services"]
    );
    assert_eq!(
        artifacts.repayment_encoder.classes(),
        ["Average", "Good", "Poor"]
    );
    assert_eq!(artifacts.model.metadata.training_rows, 80);
}

#[test]
fn trained_artifacts_round_trip_through_the_store() {
    let workspace = tempfile::tempdir().expect("tempdir");
    let data_path = workspace.path().join("history.csv");
    std::fs::write(&data_path, synthetic_history(60)).expect("write dataset");
    let store = ArtifactStore::new(workspace.path().join("model"));

    let report =
        train_and_save(&data_path, &store, &TrainingOptions::default()).expect("train and save");
    assert_eq!(report.holdout_rows, 12);
    assert!(store.model_path().exists());
    assert!(store.business_encoder_path().exists());
    assert!(store.repayment_encoder_path().exists());

    let rows = read_dataset(synthetic_history(60).as_bytes()).expect("dataset parses");
    let (in_memory, _) = train(&rows, &TrainingOptions::default()).expect("training succeeds");
    let loaded = store.load().expect("artifacts load");

    assert_eq!(loaded.business_encoder, in_memory.business_encoder);
    assert_eq!(loaded.repayment_encoder, in_memory.repayment_encoder);
    assert_eq!(
        loaded.model.classifier.coefficients.len(),
        in_memory.model.classifier.coefficients.len()
    );

    let service = ScoringService::new(Arc::new(loaded));
    let application = reference_application();
    let result = service.score(&application).expect("reference scores");

    let features = credit_risk::scoring::FeatureBuilder::new(
        &in_memory.business_encoder,
        &in_memory.repayment_encoder,
    )
    .build(&application)
    .expect("features build");
    let expected = in_memory.model.probability_of_default(&features) * 100.0;
    assert!((result.risk_score - expected).abs() < 0.01 + 1e-9);

    assert_eq!(result.risk_category, RiskCategory::Low);
    assert_eq!(result.decision, LoanDecision::Approve);
}

#[test]
fn scoring_is_deterministic_for_loaded_model() {
    let rows = read_dataset(synthetic_history(40).as_bytes()).expect("dataset parses");
    let (artifacts, _) = train(&rows, &TrainingOptions::default()).expect("training succeeds");
    let service = ScoringService::new(Arc::new(artifacts));

    let mut risky = reference_application();
    risky.credit_score = 450.0;
    risky.debt_to_income_ratio = 0.85;
    risky.repayment_history = "Poor".to_string();

    let first = service.score(&risky).expect("scores");
    let second = service.score(&risky).expect("scores");

    assert_eq!(first, second);
    assert_eq!(first.decision, LoanDecision::Reject);
}

#[test]
fn same_seed_yields_same_model() {
    let rows = read_dataset(synthetic_history(50).as_bytes()).expect("dataset parses");
    let options = TrainingOptions::default();

    let (first, first_report) = train(&rows, &options).expect("training succeeds");
    let (second, second_report) = train(&rows, &options).expect("training succeeds");

    assert_eq!(first.model.classifier, second.model.classifier);
    assert_eq!(first_report, second_report);
}
