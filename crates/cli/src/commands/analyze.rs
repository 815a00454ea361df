//! Analysis command: run the optimization pipeline over exported data

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use tabled::Tabled;
use tokio::sync::broadcast;
use tracing::info;

use optimizer_lib::{
    pipeline, FetchConfig, FetchWindow, MetricsSource, PriceBook, ReplaySource, Report,
};

use crate::config::load_policy;
use crate::output::{
    color_action, color_confidence, format_currency, print_warning, OutputFormat,
};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Metric export file, one per provider (repeatable)
    #[arg(long, short, required = true)]
    pub samples: Vec<PathBuf>,

    /// Price table file
    #[arg(long, short)]
    pub prices: PathBuf,

    /// Policy file (defaults apply when omitted; CCO_* env vars override)
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Analysis lookback window in hours, ending now
    #[arg(long, default_value_t = 168)]
    pub lookback_hours: u64,

    /// Window start (RFC3339), used together with --to
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Window end (RFC3339), used together with --from
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Per-resource fetch timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub fetch_timeout_secs: u64,
}

/// Row for the recommendations table
#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Current")]
    current_shape: String,
    #[tabled(rename = "Recommended")]
    recommended_shape: String,
    #[tabled(rename = "Savings/mo")]
    savings: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

pub async fn run(args: AnalyzeArgs, format: OutputFormat) -> Result<()> {
    let policy = load_policy(args.policy.as_deref())?;
    let book = PriceBook::from_path(&args.prices)
        .with_context(|| format!("loading price table {}", args.prices.display()))?;

    let mut sources: Vec<Arc<dyn MetricsSource>> = Vec::with_capacity(args.samples.len());
    for path in &args.samples {
        let source = ReplaySource::from_path(path)
            .with_context(|| format!("loading metric export {}", path.display()))?;
        sources.push(Arc::new(source));
    }

    let window = resolve_window(&args)?;
    let fetch_config = FetchConfig {
        timeout: Duration::from_secs(args.fetch_timeout_secs),
    };
    info!(
        sources = sources.len(),
        price_entries = book.len(),
        window_hours = window.duration_hours(),
        "Starting analysis run"
    );

    // Ctrl-C stops issuing fetches; completed resources still get reported
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    let report = pipeline::run(
        &sources,
        window,
        &fetch_config,
        &policy,
        &book,
        shutdown_rx,
    )
    .await;

    render(&report, format)
}

fn resolve_window(args: &AnalyzeArgs) -> Result<FetchWindow> {
    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        let start = DateTime::parse_from_rfc3339(from)
            .with_context(|| format!("invalid --from timestamp {}", from))?
            .timestamp();
        let end = DateTime::parse_from_rfc3339(to)
            .with_context(|| format!("invalid --to timestamp {}", to))?
            .timestamp();
        return Ok(FetchWindow::new(start, end)?);
    }
    let end = Utc::now().timestamp();
    let start = end - args.lookback_hours as i64 * 3600;
    Ok(FetchWindow::new(start, end)?)
}

fn render(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("{}", "Cost Optimization Report".bold());
            println!("{}", "=".repeat(60));
            println!("Resources analyzed:     {}", report.recommendations.len());
            println!(
                "Generated:              {}",
                report.generated_at.format("%Y-%m-%d %H:%M:%S")
            );

            if report.partial {
                print_warning("Run was cancelled early; only completed resources are included");
            }
            if !report.missing_resources.is_empty() {
                print_warning(&format!(
                    "No samples for: {}",
                    report.missing_resources.join(", ")
                ));
            }

            if report.recommendations.is_empty() {
                print_warning("No recommendations produced");
                return Ok(());
            }

            println!();
            let rows: Vec<RecommendationRow> = report
                .recommendations
                .iter()
                .map(|r| RecommendationRow {
                    resource: r.resource_id.clone(),
                    provider: r.provider.to_string(),
                    resource_type: r.resource_type.to_string(),
                    action: color_action(r.action),
                    current_shape: r.current_shape.clone(),
                    recommended_shape: r.recommended_shape.clone().unwrap_or_else(|| "-".to_string()),
                    savings: format_currency(r.estimated_monthly_savings),
                    confidence: color_confidence(r.confidence),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            println!();
            println!(
                "{} {}",
                "Total potential savings:".bold(),
                format_currency(report.total_potential_savings).green().bold()
            );
        }
    }

    Ok(())
}
