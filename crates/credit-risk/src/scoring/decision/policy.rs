use super::super::domain::{ConfidenceLevel, RiskCategory};

/// Scores below this are low risk.
pub const MODERATE_RISK_THRESHOLD: f64 = 30.0;
/// Scores at or above this are high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 60.0;

const HIGH_CONFIDENCE_LOWER: f64 = 0.2;
const HIGH_CONFIDENCE_UPPER: f64 = 0.8;
const MEDIUM_CONFIDENCE_LOWER: f64 = 0.4;
const MEDIUM_CONFIDENCE_UPPER: f64 = 0.6;

/// Probability rescaled to 0-100 and rounded to two decimals.
pub fn risk_score(probability_of_default: f64) -> f64 {
    (probability_of_default * 100.0 * 100.0).round() / 100.0
}

/// Half-open bands on the rounded score; a boundary value belongs to the band it opens.
pub fn categorize(risk_score: f64) -> RiskCategory {
    if risk_score < MODERATE_RISK_THRESHOLD {
        RiskCategory::Low
    } else if risk_score < HIGH_RISK_THRESHOLD {
        RiskCategory::Moderate
    } else {
        RiskCategory::High
    }
}

/// Evaluated on the raw probability, high band first.
pub fn confidence_for(probability_of_default: f64) -> ConfidenceLevel {
    let p = probability_of_default;
    if p < HIGH_CONFIDENCE_LOWER || p > HIGH_CONFIDENCE_UPPER {
        ConfidenceLevel::High
    } else if p < MEDIUM_CONFIDENCE_LOWER || p > MEDIUM_CONFIDENCE_UPPER {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_score_rounds_to_two_decimals() {
        assert_eq!(risk_score(0.25), 25.0);
        assert_eq!(risk_score(0.123456), 12.35);
        assert_eq!(risk_score(0.0), 0.0);
        assert_eq!(risk_score(1.0), 100.0);
    }

    #[test]
    fn band_boundaries_open_the_next_band() {
        assert_eq!(categorize(29.99), RiskCategory::Low);
        assert_eq!(categorize(30.0), RiskCategory::Moderate);
        assert_eq!(categorize(59.99), RiskCategory::Moderate);
        assert_eq!(categorize(60.0), RiskCategory::High);
        assert_eq!(categorize(100.0), RiskCategory::High);
    }

    #[test]
    fn rounding_happens_before_banding() {
        assert_eq!(categorize(risk_score(0.299996)), RiskCategory::Moderate);
    }

    #[test]
    fn confidence_bands_on_raw_probability() {
        assert_eq!(confidence_for(0.1), ConfidenceLevel::High);
        assert_eq!(confidence_for(0.2), ConfidenceLevel::Medium);
        assert_eq!(confidence_for(0.25), ConfidenceLevel::Medium);
        assert_eq!(confidence_for(0.4), ConfidenceLevel::Low);
        assert_eq!(confidence_for(0.5), ConfidenceLevel::Low);
        assert_eq!(confidence_for(0.6), ConfidenceLevel::Low);
        assert_eq!(confidence_for(0.65), ConfidenceLevel::Medium);
        assert_eq!(confidence_for(0.8), ConfidenceLevel::Medium);
        assert_eq!(confidence_for(0.95), ConfidenceLevel::High);
    }

    #[test]
    fn confidence_is_symmetric_around_one_half() {
        // Odd multiples of 0.005 never land exactly on a band edge.
        for step in 0..100u32 {
            let p = f64::from(2 * step + 1) / 200.0;
            assert_eq!(
                confidence_for(p),
                confidence_for(1.0 - p),
                "asymmetric confidence at p = {p}"
            );
        }
    }
}
