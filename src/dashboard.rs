use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{AssessmentRecord, Dimension, DimensionScores, MaturityLabel};
use crate::scoring::{self, ScoredAssessment};

pub const MIN_RANK_LIMIT: usize = 3;
pub const MAX_RANK_LIMIT: usize = 15;
pub const DEFAULT_RANK_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum RankOrder {
    /// Highest maturity index first
    Top,
    /// Lowest maturity index first
    Attention,
}

#[derive(Debug, Clone, Serialize)]
pub struct Kpis {
    pub total_assessments: usize,
    pub average_index: f64,
    pub top_department: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub department: String,
    pub index: f64,
    pub label: MaturityLabel,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapRow {
    pub department: String,
    pub scores: DimensionScores,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub kpis: Kpis,
    pub distribution: Vec<(MaturityLabel, usize)>,
    pub rankings: Vec<RankedEntry>,
    pub heatmap: Vec<HeatmapRow>,
    pub radar: Vec<HeatmapRow>,
}

/// Builds everything the dashboard view shows. Returns `None` when there
/// is nothing scorable to show.
pub fn snapshot(
    records: &[AssessmentRecord],
    order: RankOrder,
    limit: usize,
    compare: &[String],
) -> Option<Snapshot> {
    let scored = scoring::score_records(records);
    let kpis = kpis(records.len(), &scored)?;

    let selection: Vec<String> = if compare.is_empty() {
        departments(records).into_iter().take(2).collect()
    } else {
        compare.to_vec()
    };

    Some(Snapshot {
        kpis,
        distribution: distribution(&scored),
        rankings: rankings(&scored, order, limit),
        heatmap: heatmap(&scored),
        radar: radar_profiles(records, &selection),
    })
}

pub fn kpis(total_assessments: usize, scored: &[ScoredAssessment]) -> Option<Kpis> {
    let top = scored.iter().fold(None::<&ScoredAssessment>, |best, entry| match best {
        Some(current) if current.index >= entry.index => Some(current),
        _ => Some(entry),
    })?;
    let average_index = scored.iter().map(|entry| entry.index).sum::<f64>() / scored.len() as f64;

    Some(Kpis {
        total_assessments,
        average_index,
        top_department: top.department.clone(),
    })
}

/// Count per label in `MaturityLabel::ORDER`, zero-filled.
pub fn distribution(scored: &[ScoredAssessment]) -> Vec<(MaturityLabel, usize)> {
    MaturityLabel::ORDER
        .iter()
        .map(|label| {
            let count = scored.iter().filter(|entry| entry.label == *label).count();
            (*label, count)
        })
        .collect()
}

pub fn rankings(scored: &[ScoredAssessment], order: RankOrder, limit: usize) -> Vec<RankedEntry> {
    let mut sorted: Vec<&ScoredAssessment> = scored.iter().collect();
    sorted.sort_by(|a, b| {
        let ordering = a.index.partial_cmp(&b.index).unwrap_or(Ordering::Equal);
        match order {
            RankOrder::Top => ordering.reverse(),
            RankOrder::Attention => ordering,
        }
    });

    sorted
        .into_iter()
        .take(limit.clamp(MIN_RANK_LIMIT, MAX_RANK_LIMIT))
        .enumerate()
        .map(|(position, entry)| RankedEntry {
            rank: position + 1,
            department: entry.department.clone(),
            index: entry.index,
            label: entry.label,
        })
        .collect()
}

pub fn heatmap(scored: &[ScoredAssessment]) -> Vec<HeatmapRow> {
    scored
        .iter()
        .map(|entry| HeatmapRow {
            department: entry.department.clone(),
            scores: entry.scores,
        })
        .collect()
}

/// Distinct department names in first-appearance order.
pub fn departments(records: &[AssessmentRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        if !names.contains(&record.department) {
            names.push(record.department.clone());
        }
    }
    names
}

/// The most recently inserted record for a department.
pub fn current_for<'a>(
    records: &'a [AssessmentRecord],
    department: &str,
) -> Option<&'a AssessmentRecord> {
    records
        .iter()
        .filter(|record| record.department == department)
        .max_by_key(|record| record.id)
}

/// Current scores for each selected department. Unknown or incomplete
/// departments are left out.
pub fn radar_profiles(records: &[AssessmentRecord], selection: &[String]) -> Vec<HeatmapRow> {
    selection
        .iter()
        .filter_map(|department| {
            let record = current_for(records, department)?;
            let scores = scoring::scores_of(record).ok()?;
            Some(HeatmapRow {
                department: department.clone(),
                scores,
            })
        })
        .collect()
}

/// Plain-text heatmap grid, one decimal per cell.
pub fn render_heatmap(rows: &[HeatmapRow]) -> String {
    let width = rows
        .iter()
        .map(|row| row.department.chars().count())
        .max()
        .unwrap_or(0)
        .max("Department".len());

    let mut output = format!("{:<width$}", "Department");
    for dimension in Dimension::ALL {
        output.push_str(&format!(" {:>7}", dimension.key()));
    }
    output.push('\n');

    for row in rows {
        output.push_str(&format!("{:<width$}", row.department));
        for (_, value) in row.scores.iter() {
            output.push_str(&format!(" {:>7.1}", value));
        }
        output.push('\n');
    }
    output
}
