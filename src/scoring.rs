use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{AssessmentRecord, Dimension, DimensionScores, MaturityLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("assessment is missing the {0} score")]
    MissingDimension(Dimension),
}

/// Recommendation band for a single dimension score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Middle,
    High,
}

impl Band {
    pub fn for_score(score: f64) -> Self {
        if score < 2.5 {
            Band::Low
        } else if score < 4.0 {
            Band::Middle
        } else {
            Band::High
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

// Rows follow `Dimension::ALL`, columns follow `Band`.
const RECOMMENDATIONS: [[&str; 3]; 5] = [
    [
        "Legacy systems detected. Prioritize cloud migration and API modernization.",
        "Good foundation. Focus on AI integration and data analytics.",
        "Industry leader. Explore cutting-edge tech like Quantum or Edge computing.",
    ],
    [
        "Siloed teams. Implement cross-functional agile squads.",
        "Collaborative. Encourage more experimentation and psychological safety.",
        "Innovative culture. Maintain by sponsoring hackathons and external partnerships.",
    ],
    [
        "Manual & reactive. Automate core workflows immediately.",
        "Defined processes. Move towards data-driven process optimization.",
        "Optimized. focus on predictive process modeling.",
    ],
    [
        "Critical skill gaps. Initiate comprehensive upskilling programs.",
        "Specialized gaps. Hire for key roles in AI/Data.",
        "Strong talent pool. Focus on retention and leadership.",
    ],
    [
        "High Exposure. Implement robust cybersecurity frameworks immediately.",
        "Moderate Risk. Regular audits and compliance checks needed.",
        "Resilient. Focus on proactive threat hunting and zero-trust.",
    ],
];

pub fn recommendation_for(dimension: Dimension, score: f64) -> &'static str {
    RECOMMENDATIONS[dimension.index()][Band::for_score(score).index()]
}

pub fn scores_of(record: &AssessmentRecord) -> Result<DimensionScores, ScoringError> {
    let mut values = [0.0; 5];
    for dimension in Dimension::ALL {
        values[dimension.index()] = record
            .score(dimension)
            .ok_or(ScoringError::MissingDimension(dimension))?;
    }
    let [tech, culture, process, skills, risk] = values;
    Ok(DimensionScores::new(tech, culture, process, skills, risk))
}

/// Unweighted mean of the five dimension scores.
pub fn maturity_index(record: &AssessmentRecord) -> Result<f64, ScoringError> {
    Ok(index_of(&scores_of(record)?))
}

pub fn index_of(scores: &DimensionScores) -> f64 {
    let values = scores.values();
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn classify_maturity(index: f64) -> MaturityLabel {
    if index >= 4.0 {
        MaturityLabel::Advanced
    } else if index >= 3.0 {
        MaturityLabel::Established
    } else if index >= 2.0 {
        MaturityLabel::Developing
    } else {
        MaturityLabel::Nascent
    }
}

pub fn recommend(
    record: &AssessmentRecord,
) -> Result<BTreeMap<Dimension, &'static str>, ScoringError> {
    Ok(recommend_scores(&scores_of(record)?))
}

pub fn recommend_scores(scores: &DimensionScores) -> BTreeMap<Dimension, &'static str> {
    scores
        .iter()
        .map(|(dimension, score)| (dimension, recommendation_for(dimension, score)))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredAssessment {
    pub id: i64,
    pub department: String,
    pub scores: DimensionScores,
    pub index: f64,
    pub label: MaturityLabel,
}

/// Scores every record in order. Records with a missing dimension are
/// logged and skipped so one bad row cannot sink the whole view.
pub fn score_records(records: &[AssessmentRecord]) -> Vec<ScoredAssessment> {
    records
        .iter()
        .filter_map(|record| match scores_of(record) {
            Ok(scores) => {
                let index = index_of(&scores);
                Some(ScoredAssessment {
                    id: record.id,
                    department: record.department.clone(),
                    scores,
                    index,
                    label: classify_maturity(index),
                })
            }
            Err(err) => {
                warn!(
                    id = record.id,
                    department = %record.department,
                    error = %err,
                    "skipping assessment"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(scores: [Option<f64>; 5]) -> AssessmentRecord {
        let [tech_score, culture_score, process_score, skills_score, risk_score] = scores;
        AssessmentRecord {
            id: 1,
            department: "Finance".to_string(),
            tech_score,
            culture_score,
            process_score,
            skills_score,
            risk_score,
            created_at: NaiveDate::from_ymd_opt(2026, 1, 5)
                .and_then(|date| date.and_hms_opt(9, 0, 0))
                .expect("valid timestamp"),
        }
    }

    fn full(tech: f64, culture: f64, process: f64, skills: f64, risk: f64) -> AssessmentRecord {
        record([Some(tech), Some(culture), Some(process), Some(skills), Some(risk)])
    }

    #[test]
    fn index_is_arithmetic_mean() {
        let value = maturity_index(&full(4.0, 3.0, 2.0, 5.0, 1.0)).expect("complete record");
        assert!((value - 3.0).abs() < 1e-9);

        let value = maturity_index(&full(1.3, 2.7, 4.9, 3.3, 1.1)).expect("complete record");
        assert!((value - (1.3 + 2.7 + 4.9 + 3.3 + 1.1) / 5.0).abs() < 1e-9);
    }

    #[test]
    fn missing_score_is_reported() {
        let partial = record([Some(3.0), Some(3.0), None, Some(3.0), Some(3.0)]);
        assert_eq!(
            maturity_index(&partial),
            Err(ScoringError::MissingDimension(Dimension::Process))
        );
        assert!(recommend(&partial).is_err());
    }

    #[test]
    fn labels_follow_lower_inclusive_bands() {
        assert_eq!(classify_maturity(5.0), MaturityLabel::Advanced);
        assert_eq!(classify_maturity(4.0), MaturityLabel::Advanced);
        assert_eq!(classify_maturity(3.999), MaturityLabel::Established);
        assert_eq!(classify_maturity(3.0), MaturityLabel::Established);
        assert_eq!(classify_maturity(2.0), MaturityLabel::Developing);
        assert_eq!(classify_maturity(1.999), MaturityLabel::Nascent);
        assert_eq!(classify_maturity(1.0), MaturityLabel::Nascent);
    }

    #[test]
    fn labels_never_decrease_with_index() {
        let rank = |label: MaturityLabel| {
            MaturityLabel::ORDER
                .iter()
                .position(|candidate| *candidate == label)
                .expect("label in order")
        };
        let mut previous = rank(classify_maturity(1.0));
        for step in 1..=400 {
            let current = rank(classify_maturity(1.0 + step as f64 * 0.01));
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn all_two_and_a_half_is_developing_with_middle_band_copy() {
        let flat = full(2.5, 2.5, 2.5, 2.5, 2.5);
        let index = maturity_index(&flat).expect("complete record");
        assert_eq!(classify_maturity(index), MaturityLabel::Developing);

        let recs = recommend(&flat).expect("complete record");
        assert_eq!(
            recs[&Dimension::Tech],
            "Good foundation. Focus on AI integration and data analytics."
        );
        assert_eq!(
            recs[&Dimension::Risk],
            "Moderate Risk. Regular audits and compliance checks needed."
        );
    }

    #[test]
    fn recommendations_cover_every_band() {
        assert_eq!(
            recommendation_for(Dimension::Culture, 2.49),
            "Siloed teams. Implement cross-functional agile squads."
        );
        assert_eq!(
            recommendation_for(Dimension::Process, 4.0),
            "Optimized. focus on predictive process modeling."
        );
        assert_eq!(
            recommendation_for(Dimension::Skills, 3.99),
            "Specialized gaps. Hire for key roles in AI/Data."
        );
    }

    #[test]
    fn recommendations_are_deterministic_and_independent() {
        let base = full(1.5, 3.0, 4.5, 2.5, 3.9);
        let first = recommend(&base).expect("complete record");
        let second = recommend(&base).expect("complete record");
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);

        let changed = recommend(&full(4.8, 3.0, 4.5, 2.5, 3.9)).expect("complete record");
        assert_ne!(first[&Dimension::Tech], changed[&Dimension::Tech]);
        for dimension in Dimension::ALL.into_iter().skip(1) {
            assert_eq!(first[&dimension], changed[&dimension]);
        }
    }

    #[test]
    fn score_records_skips_incomplete_rows() {
        let mut incomplete = record([Some(3.0), None, Some(3.0), Some(3.0), Some(3.0)]);
        incomplete.id = 2;
        let records = vec![full(4.0, 4.0, 4.0, 4.0, 4.0), incomplete];

        let scored = score_records(&records);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].id, 1);
        assert_eq!(scored[0].label, MaturityLabel::Advanced);
    }
}
