use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Dimension {
    Tech,
    Culture,
    Process,
    Skills,
    Risk,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Tech,
        Dimension::Culture,
        Dimension::Process,
        Dimension::Skills,
        Dimension::Risk,
    ];

    /// Short key, also the CSV column name.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Tech => "Tech",
            Dimension::Culture => "Culture",
            Dimension::Process => "Process",
            Dimension::Skills => "Skills",
            Dimension::Risk => "Risk",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Tech => "Technology",
            other => other.key(),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One persisted assessment row. Score columns are nullable in the
/// table, so they stay optional until the scoring engine reads them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub id: i64,
    pub department: String,
    pub tech_score: Option<f64>,
    pub culture_score: Option<f64>,
    pub process_score: Option<f64>,
    pub skills_score: Option<f64>,
    pub risk_score: Option<f64>,
    pub created_at: NaiveDateTime,
}

impl AssessmentRecord {
    pub fn score(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::Tech => self.tech_score,
            Dimension::Culture => self.culture_score,
            Dimension::Process => self.process_score,
            Dimension::Skills => self.skills_score,
            Dimension::Risk => self.risk_score,
        }
    }
}

/// Five complete dimension scores, indexed by `Dimension::index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionScores([f64; 5]);

impl DimensionScores {
    pub fn new(tech: f64, culture: f64, process: f64, skills: f64, risk: f64) -> Self {
        Self([tech, culture, process, skills, risk])
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.0[dimension.index()]
    }

    pub fn values(&self) -> [f64; 5] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(|dimension| (dimension, self.get(dimension)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAssessment {
    pub department: String,
    pub scores: DimensionScores,
}

impl NewAssessment {
    pub fn new(department: impl Into<String>, scores: DimensionScores) -> Self {
        Self {
            department: department.into(),
            scores,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.department.trim().is_empty() {
            return Err(ValidationError::EmptyDepartment);
        }

        for (dimension, value) in self.scores.iter() {
            if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                return Err(ValidationError::ScoreOutOfRange { dimension, value });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("department name must not be empty")]
    EmptyDepartment,
    #[error("{dimension} score {value} is outside the range 1.0 to 5.0")]
    ScoreOutOfRange { dimension: Dimension, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MaturityLabel {
    Advanced,
    Established,
    Developing,
    Nascent,
}

impl MaturityLabel {
    /// Display order used by the distribution chart.
    pub const ORDER: [MaturityLabel; 4] = [
        MaturityLabel::Advanced,
        MaturityLabel::Established,
        MaturityLabel::Developing,
        MaturityLabel::Nascent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MaturityLabel::Advanced => "Advanced",
            MaturityLabel::Established => "Established",
            MaturityLabel::Developing => "Developing",
            MaturityLabel::Nascent => "Nascent",
        }
    }
}

impl fmt::Display for MaturityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_department() {
        let assessment = NewAssessment::new("   ", DimensionScores::new(3.0, 3.0, 3.0, 3.0, 3.0));
        assert_eq!(assessment.validate(), Err(ValidationError::EmptyDepartment));
    }

    #[test]
    fn rejects_scores_outside_range() {
        let assessment = NewAssessment::new("Ops", DimensionScores::new(3.0, 3.0, 5.5, 3.0, 3.0));
        assert_eq!(
            assessment.validate(),
            Err(ValidationError::ScoreOutOfRange {
                dimension: Dimension::Process,
                value: 5.5
            })
        );

        let nan = NewAssessment::new("Ops", DimensionScores::new(f64::NAN, 3.0, 3.0, 3.0, 3.0));
        assert!(matches!(
            nan.validate(),
            Err(ValidationError::ScoreOutOfRange {
                dimension: Dimension::Tech,
                ..
            })
        ));
    }

    #[test]
    fn accepts_range_bounds() {
        let assessment = NewAssessment::new("Ops", DimensionScores::new(1.0, 5.0, 1.0, 5.0, 2.5));
        assert!(assessment.validate().is_ok());
    }

    #[test]
    fn tech_title_is_spelled_out() {
        assert_eq!(Dimension::Tech.title(), "Technology");
        assert_eq!(Dimension::Risk.title(), "Risk");
        assert_eq!(Dimension::Skills.key(), "Skills");
    }
}
