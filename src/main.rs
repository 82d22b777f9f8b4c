use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};

mod config;
mod dashboard;
mod db;
mod import;
mod models;
mod report;
mod scoring;
mod telemetry;

use dashboard::RankOrder;
use db::Store;
use models::{DimensionScores, NewAssessment};

#[derive(Parser)]
#[command(name = "maturity-dashboard")]
#[command(about = "Digital maturity assessments across departments", long_about = None)]
struct Cli {
    /// SQLite file to use instead of MATURITY_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the assessment table if it does not exist
    InitDb,
    /// Record one department assessment (scores 1.0 to 5.0)
    Add {
        #[arg(long)]
        department: String,
        #[arg(long)]
        tech: f64,
        #[arg(long)]
        culture: f64,
        #[arg(long)]
        process: f64,
        #[arg(long)]
        skills: f64,
        #[arg(long)]
        risk: f64,
    },
    /// Print the CSV header expected by `import`
    Template,
    /// Import assessments from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Delete every stored assessment
    Clear,
    /// Show KPIs, distribution, rankings, heatmap and radar profiles
    Dashboard {
        #[arg(long, value_enum, default_value_t = RankOrder::Top)]
        order: RankOrder,
        #[arg(long, default_value_t = dashboard::DEFAULT_RANK_LIMIT)]
        limit: usize,
        /// Departments to compare in the radar view
        #[arg(long, value_delimiter = ',')]
        compare: Vec<String>,
        /// Emit the dashboard as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recommendations for a department
    Roadmap {
        #[arg(long)]
        department: Option<String>,
    },
    /// Export a department report as markdown
    Report {
        #[arg(long)]
        department: String,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Append a heatmap of every department
        #[arg(long)]
        with_heatmap: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::AppConfig::load();
    telemetry::init(&config.telemetry)?;

    let db_path = cli.db.unwrap_or(config.database.path);
    let store = Store::open(&db_path)
        .await
        .with_context(|| format!("failed to open assessment store at {}", db_path.display()))?;

    match cli.command {
        Commands::InitDb => {
            println!("Schema ready at {}.", db_path.display());
        }
        Commands::Add {
            department,
            tech,
            culture,
            process,
            skills,
            risk,
        } => {
            let assessment = NewAssessment::new(
                department.trim(),
                DimensionScores::new(tech, culture, process, skills, risk),
            );
            store
                .save_assessment(&assessment)
                .await
                .context("assessment not saved")?;
            println!("Saved assessment for {}.", assessment.department);
        }
        Commands::Template => {
            println!("{}", import::template_header());
        }
        Commands::Import { csv } => {
            let summary = import::import_csv(&store, &csv)
                .await
                .with_context(|| format!("import of {} failed", csv.display()))?;
            println!(
                "Successfully imported {} rows from {} (import {}).",
                summary.inserted,
                csv.display(),
                summary.import_id
            );
        }
        Commands::Clear => {
            store.clear_all().await;
            println!("All assessments cleared.");
        }
        Commands::Dashboard {
            order,
            limit,
            compare,
            json,
        } => {
            let records = store.load_all().await;
            let Some(snapshot) = dashboard::snapshot(&records, order, limit, &compare) else {
                println!("No data available.");
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }

            print_dashboard(&snapshot, order);
        }
        Commands::Roadmap { department } => {
            let records = store.load_all().await;
            let department =
                department.or_else(|| dashboard::departments(&records).into_iter().next());
            let Some(department) = department else {
                println!("No data available.");
                return Ok(());
            };
            let Some(record) = dashboard::current_for(&records, &department) else {
                bail!("no assessment recorded for {department}");
            };
            let index = scoring::maturity_index(record)
                .with_context(|| format!("cannot build roadmap for {department}"))?;
            let recommendations = scoring::recommend(record)?;

            println!(
                "Strategy for {department} (assessed {}): index {:.2}, {}",
                record.created_at.format("%Y-%m-%d"),
                index,
                scoring::classify_maturity(index)
            );
            for (dimension, recommendation) in &recommendations {
                let score = record.score(*dimension).unwrap_or_default();
                println!("- {} (score {:.1}): {}", dimension.key(), score, recommendation);
            }
        }
        Commands::Report {
            department,
            out,
            with_heatmap,
        } => {
            let records = store.load_all().await;
            let Some(record) = dashboard::current_for(&records, &department) else {
                bail!("no assessment recorded for {department}");
            };
            let scores = scoring::scores_of(record)
                .with_context(|| format!("cannot build report for {department}"))?;
            let heatmap =
                with_heatmap.then(|| dashboard::heatmap(&scoring::score_records(&records)));

            let report = report::build_report(
                &department,
                &scores,
                Utc::now().naive_utc(),
                heatmap.as_deref(),
            );
            let out = out.unwrap_or_else(|| report::default_path(&department));
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn print_dashboard(snapshot: &dashboard::Snapshot, order: RankOrder) {
    println!("Total assessments: {}", snapshot.kpis.total_assessments);
    println!("Avg maturity index: {:.2}", snapshot.kpis.average_index);
    println!("Top department: {}", snapshot.kpis.top_department);

    println!();
    println!("Distribution by maturity level:");
    for (label, count) in &snapshot.distribution {
        println!("- {label}: {count}");
    }

    println!();
    match order {
        RankOrder::Top => println!("Top performers:"),
        RankOrder::Attention => println!("Needs attention:"),
    }
    for entry in &snapshot.rankings {
        println!(
            "{}. {} {:.2} ({})",
            entry.rank, entry.department, entry.index, entry.label
        );
    }

    println!();
    println!("Dimension heatmap:");
    print!("{}", dashboard::render_heatmap(&snapshot.heatmap));

    if !snapshot.radar.is_empty() {
        println!();
        println!("Comparative profiles:");
        print!("{}", dashboard::render_heatmap(&snapshot.radar));
    }
}
