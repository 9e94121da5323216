use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::super::domain::LoanApplication;
use super::TrainingError;

/// Name of the label column in the historical dataset.
pub const TARGET_COLUMN: &str = "default_flag";

/// One historical application with its observed outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledApplication {
    pub application: LoanApplication,
    pub defaulted: bool,
}

#[derive(Debug, Deserialize)]
struct DatasetRow {
    business_type: String,
    years_in_operation: u32,
    annual_revenue: f64,
    monthly_cashflow: f64,
    loan_amount_requested: f64,
    credit_score: f64,
    existing_loans: u32,
    debt_to_income_ratio: f64,
    collateral_value: f64,
    repayment_history: String,
    default_flag: u8,
}

pub fn read_dataset_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<LabeledApplication>, TrainingError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| TrainingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_dataset(file)
}

pub fn read_dataset<R: Read>(reader: R) -> Result<Vec<LabeledApplication>, TrainingError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<DatasetRow>().enumerate() {
        let row = record?;
        let defaulted = match row.default_flag {
            0 => false,
            1 => true,
            other => {
                return Err(TrainingError::InvalidTarget {
                    row: index + 1,
                    value: other,
                })
            }
        };

        rows.push(LabeledApplication {
            application: LoanApplication {
                business_type: row.business_type,
                years_in_operation: row.years_in_operation,
                annual_revenue: row.annual_revenue,
                monthly_cashflow: row.monthly_cashflow,
                loan_amount_requested: row.loan_amount_requested,
                credit_score: row.credit_score,
                existing_loans: row.existing_loans,
                debt_to_income_ratio: row.debt_to_income_ratio,
                collateral_value: row.collateral_value,
                repayment_history: row.repayment_history,
            },
            defaulted,
        });
    }

    if rows.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    Ok(rows)
}
