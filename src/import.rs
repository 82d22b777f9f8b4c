use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::db::{Store, StoreError};
use crate::models::{Dimension, DimensionScores, NewAssessment};

pub const REQUIRED_COLUMNS: [&str; 6] =
    ["Department", "Tech", "Culture", "Process", "Skills", "Risk"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unable to open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("unable to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(
        "CSV must contain these columns: {}; missing: {}",
        REQUIRED_COLUMNS.join(", "),
        .missing.join(", ")
    )]
    MalformedImport { missing: Vec<String> },
    #[error("row on line {line} rejected: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub import_id: Uuid,
    pub inserted: usize,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Tech")]
    tech: f64,
    #[serde(rename = "Culture")]
    culture: f64,
    #[serde(rename = "Process")]
    process: f64,
    #[serde(rename = "Skills")]
    skills: f64,
    #[serde(rename = "Risk")]
    risk: f64,
}

/// Parses and validates every row before anything is persisted. Extra
/// columns are ignored; a missing required column rejects the file.
pub fn parse_assessments<R: Read>(input: R) -> Result<Vec<NewAssessment>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MalformedImport { missing });
    }

    let mut assessments = Vec::new();
    for (offset, result) in reader.deserialize::<CsvRow>().enumerate() {
        let fallback_line = offset as u64 + 2;
        let row = result.map_err(|err| ImportError::InvalidRow {
            line: err
                .position()
                .map(|position| position.line())
                .unwrap_or(fallback_line),
            reason: err.to_string(),
        })?;

        let assessment = NewAssessment::new(
            row.department,
            DimensionScores::new(row.tech, row.culture, row.process, row.skills, row.risk),
        );
        assessment.validate().map_err(|err| ImportError::InvalidRow {
            line: fallback_line,
            reason: err.to_string(),
        })?;
        assessments.push(assessment);
    }

    Ok(assessments)
}

/// Imports a CSV file in one transaction: either every row lands or none do.
pub async fn import_csv(store: &Store, csv_path: &Path) -> Result<ImportSummary, ImportError> {
    let import_id = Uuid::new_v4();
    info!(%import_id, path = %csv_path.display(), "starting assessment import");

    let file = File::open(csv_path).map_err(|source| ImportError::Io {
        path: csv_path.display().to_string(),
        source,
    })?;
    let assessments = parse_assessments(file)?;
    let ids = store.save_batch(&assessments).await?;

    info!(%import_id, rows = ids.len(), "assessment import committed");
    Ok(ImportSummary {
        import_id,
        inserted: ids.len(),
    })
}

/// Header line for a blank import template.
pub fn template_header() -> String {
    std::iter::once("Department")
        .chain(Dimension::ALL.iter().map(|dimension| dimension.key()))
        .collect::<Vec<_>>()
        .join(",")
}
