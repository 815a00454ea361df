//! Anomaly command: scan a cost series for spend spikes

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use optimizer_lib::{CostAnomalyDetector, CostPoint};

use crate::output::{color_severity, format_currency, format_timestamp, print_warning, OutputFormat};

#[derive(Args)]
pub struct AnomaliesArgs {
    /// Cost series file (array of {provider, timestamp, cost})
    #[arg(long, short)]
    pub costs: PathBuf,

    /// Z-score threshold for flagging a spike
    #[arg(long, default_value_t = 3.0)]
    pub threshold: f64,
}

/// Row for the anomalies table
#[derive(Tabled)]
struct AnomalyRow {
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Observed")]
    observed: String,
    #[tabled(rename = "Expected")]
    expected: String,
    #[tabled(rename = "Above")]
    above: String,
    #[tabled(rename = "Z-score")]
    z_score: String,
    #[tabled(rename = "Severity")]
    severity: String,
}

/// JSON record including the derived severity
#[derive(Serialize)]
struct AnomalyRecord {
    provider: String,
    timestamp: i64,
    observed: f64,
    expected: f64,
    z_score: f64,
    severity: String,
}

pub fn run(args: AnomaliesArgs, format: OutputFormat) -> Result<()> {
    let raw = std::fs::read_to_string(&args.costs)
        .with_context(|| format!("loading cost series {}", args.costs.display()))?;
    let series: Vec<CostPoint> = serde_json::from_str(&raw)?;

    let detector = CostAnomalyDetector::new(args.threshold);
    let anomalies = detector.detect(&series);

    match format {
        OutputFormat::Json => {
            let records: Vec<AnomalyRecord> = anomalies
                .iter()
                .map(|a| AnomalyRecord {
                    provider: a.provider.to_string(),
                    timestamp: a.timestamp,
                    observed: a.observed,
                    expected: a.expected,
                    z_score: a.z_score,
                    severity: format!("{:?}", a.severity()).to_lowercase(),
                })
                .collect();
            let json = serde_json::to_string_pretty(&records)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            if anomalies.is_empty() {
                print_warning("No cost anomalies detected");
                return Ok(());
            }

            println!("{}", "Cost Anomalies".bold());
            println!("{}", "=".repeat(60));

            let rows: Vec<AnomalyRow> = anomalies
                .iter()
                .map(|a| AnomalyRow {
                    provider: a.provider.to_string(),
                    date: format_timestamp(a.timestamp),
                    observed: format_currency(a.observed),
                    expected: format_currency(a.expected),
                    above: format!("+{:.1}%", a.percentage_above_expected()),
                    z_score: format!("{:.2}", a.z_score),
                    severity: color_severity(a.severity()),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!("\nTotal: {} anomalies", anomalies.len());
        }
    }

    Ok(())
}
