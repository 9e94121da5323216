use credit_risk::scoring::artifacts::{BUSINESS_ENCODER_FILE, MODEL_FILE};
use credit_risk::scoring::training::{read_dataset, train, TrainingOptions};
use credit_risk::scoring::{ArtifactError, ArtifactStore, LabelEncoder};

const HISTORY: &str = "\
business_type,years_in_operation,annual_revenue,monthly_cashflow,loan_amount_requested,credit_score,existing_loans,debt_to_income_ratio,collateral_value,repayment_history,default_flag
Retail,4,800000,60000,250000,720,1,0.30,350000,Good,0
Services,2,300000,20000,280000,520,3,0.70,90000,Poor,1
Retail,6,950000,80000,200000,760,0,0.20,400000,Good,0
Construction,1,200000,15000,260000,480,2,0.80,50000,Poor,1
Services,8,1200000,95000,300000,700,1,0.35,500000,Average,0
Construction,3,400000,30000,420000,560,4,0.65,120000,Average,1
";

fn saved_store() -> (tempfile::TempDir, ArtifactStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ArtifactStore::new(dir.path());
    let rows = read_dataset(HISTORY.as_bytes()).expect("history parses");
    let (artifacts, _) = train(&rows, &TrainingOptions::default()).expect("training succeeds");
    store.save(&artifacts).expect("artifacts saved");
    (dir, store)
}

#[test]
fn loads_what_was_saved() {
    let (_dir, store) = saved_store();

    let artifacts = store.load().expect("artifacts load");

    assert_eq!(
        artifacts.business_encoder.classes(),
        ["Construction", "Retail", "Services"]
    );
    assert_eq!(
        artifacts.model.vocabularies.repayment_history,
        ["Average", "Good", "Poor"]
    );
}

#[test]
fn missing_artifacts_are_reported_with_their_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ArtifactStore::new(dir.path());

    match store.load() {
        Err(ArtifactError::Missing { path }) => assert!(path.ends_with(MODEL_FILE)),
        other => panic!("expected missing artifact, got {other:?}"),
    }
}

#[test]
fn encoder_vocabulary_skew_is_rejected() {
    let (_dir, store) = saved_store();
    let skewed = LabelEncoder::fit("business_type", ["Construction", "Retail", "Services", "Zoo"])
        .expect("encoder fits");
    std::fs::write(
        store.business_encoder_path(),
        serde_json::to_vec(&skewed).expect("encoder serializes"),
    )
    .expect("overwrite encoder");

    assert!(matches!(
        store.load(),
        Err(ArtifactError::VocabularyMismatch {
            feature: "business_type"
        })
    ));
}

#[test]
fn swapped_encoders_are_rejected() {
    let (_dir, store) = saved_store();
    std::fs::copy(store.repayment_encoder_path(), store.dir().join(BUSINESS_ENCODER_FILE))
        .expect("swap encoder");

    assert!(matches!(
        store.load(),
        Err(ArtifactError::EncoderFeature {
            expected: "business_type",
            ..
        })
    ));
}

#[test]
fn corrupt_model_file_is_rejected() {
    let (_dir, store) = saved_store();
    std::fs::write(store.model_path(), b"{\"feature_names\": [").expect("corrupt model");

    let err = store.load().expect_err("corrupt model rejected");
    assert!(matches!(err, ArtifactError::Json { .. }));
    assert!(err.to_string().contains(MODEL_FILE));
}

#[test]
fn reordered_feature_columns_are_rejected() {
    let (_dir, store) = saved_store();
    let raw = std::fs::read(store.model_path()).expect("read model");
    let mut model: serde_json::Value = serde_json::from_slice(&raw).expect("model json");
    let names = model["feature_names"]
        .as_array_mut()
        .expect("feature names array");
    names.swap(0, 1);
    std::fs::write(
        store.model_path(),
        serde_json::to_vec(&model).expect("model serializes"),
    )
    .expect("rewrite model");

    assert!(matches!(
        store.load(),
        Err(ArtifactError::FeatureMismatch { .. })
    ));
}
