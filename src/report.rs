use std::fmt::Write;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::dashboard::{self, HeatmapRow};
use crate::models::DimensionScores;
use crate::scoring;

/// Default export file name for a department report.
pub fn default_path(department: &str) -> PathBuf {
    let stem: String = department
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    PathBuf::from(format!("{stem}_Maturity_Report.md"))
}

pub fn build_report(
    department: &str,
    scores: &DimensionScores,
    generated_at: NaiveDateTime,
    heatmap: Option<&[HeatmapRow]>,
) -> String {
    let index = scoring::index_of(scores);
    let label = scoring::classify_maturity(index);
    let recommendations = scoring::recommend_scores(scores);

    let mut output = String::new();

    let _ = writeln!(output, "# Digital Maturity Report: {}", department);
    let _ = writeln!(output, "Generated {}", generated_at.format("%Y-%m-%d %H:%M"));
    let _ = writeln!(output);
    let _ = writeln!(output, "## 1. Assessment Scores");

    for (dimension, score) in scores.iter() {
        let _ = writeln!(output, "- {}: {:.1} / 5.0", dimension.title(), score);
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Maturity index: {:.2} ({})", index, label);

    let _ = writeln!(output);
    let _ = writeln!(output, "## 2. Strategic Roadmap & Recommendations");

    for (dimension, recommendation) in recommendations.iter() {
        let _ = writeln!(output);
        let _ = writeln!(output, "### {}", dimension.title());
        let _ = writeln!(output, "- {}", recommendation);
    }

    if let Some(rows) = heatmap {
        let _ = writeln!(output);
        let _ = writeln!(output, "## 3. Dimension Heatmap");

        if rows.is_empty() {
            let _ = writeln!(output, "No scored assessments recorded.");
        } else {
            let _ = writeln!(output, "```");
            output.push_str(&dashboard::render_heatmap(rows));
            let _ = writeln!(output, "```");
        }
    }

    output
}
