//! `fieldlog analyze` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use fieldlog_analyzer::{AnalyzerConfig, DailySummary, analyze_daily};
use fieldlog_core::config::FieldlogConfig;
use fieldlog_core::types::SensorStatus;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// File name of the daily summary inside the report directory.
pub const SUMMARY_FILE_NAME: &str = "daily_summary.json";

/// Execute the `analyze` command.
///
/// CLI flags are applied on top of the loaded configuration, the blocking
/// engine runs on the runtime's blocking pool, and the summary is written
/// as pretty JSON before the short report is rendered.
pub async fn execute(
    args: AnalyzeArgs,
    mut config: FieldlogConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    if let Some(root) = &args.log_root {
        config.site.log_root = root.display().to_string();
    }
    if args.fallback_latest {
        config.analyzer.fallback_to_latest_file = true;
    }

    let summary = run_analysis(&config, &args.date, args.max_lines.unwrap_or(0)).await?;

    let out_path = args
        .out
        .unwrap_or_else(|| default_report_path(&config.site.outbox_dir, &summary.date));
    write_summary(&out_path, &summary).await?;
    info!(path = %out_path.display(), sensors = summary.sensors.len(), "daily summary written");

    writer.render(&AnalyzeReport::new(summary, &out_path))?;
    Ok(())
}

/// Run the engine for one date on the blocking thread pool.
pub async fn run_analysis(
    config: &FieldlogConfig,
    date: &str,
    max_lines: usize,
) -> Result<DailySummary, CliError> {
    let analyzer_config = AnalyzerConfig::from_core(config);
    let date = date.to_owned();

    info!(
        date = %date,
        log_root = %analyzer_config.log_root.display(),
        "starting daily analysis"
    );

    let summary = tokio::task::spawn_blocking(move || {
        analyze_daily(&analyzer_config, &date, max_lines)
    })
    .await
    .map_err(|e| CliError::Command(format!("analysis task failed: {e}")))??;

    Ok(summary)
}

/// `{outbox_dir}/reports/{date}/daily_summary.json`
pub fn default_report_path(outbox_dir: &str, date: &str) -> PathBuf {
    Path::new(outbox_dir)
        .join("reports")
        .join(date)
        .join(SUMMARY_FILE_NAME)
}

/// Serialize the summary as pretty JSON, creating parent directories.
pub async fn write_summary(path: &Path, summary: &DailySummary) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut json = serde_json::to_vec_pretty(summary)?;
    json.push(b'\n');
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Result of the analyze command.
///
/// JSON output carries the full summary next to the written report path.
#[derive(Serialize)]
pub struct AnalyzeReport {
    /// Where the summary file was written
    pub report_path: String,
    #[serde(flatten)]
    pub summary: DailySummary,
}

impl AnalyzeReport {
    pub fn new(summary: DailySummary, report_path: &Path) -> Self {
        Self {
            report_path: report_path.display().to_string(),
            summary,
        }
    }
}

impl Render for AnalyzeReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let summary = &self.summary;
        writeln!(
            w,
            "Daily summary {} (site: {}, device: {})",
            summary.date.bold(),
            summary.site_id,
            summary.device_id
        )?;
        writeln!(w, "Log root: {}", summary.log_root)?;
        writeln!(w, "Report: {}", self.report_path)?;
        writeln!(w)?;

        if summary.sensors.is_empty() {
            writeln!(w, "{}", "No sensor directories found.".yellow())?;
            return Ok(());
        }

        writeln!(
            w,
            "{:<14} {:<6} {:<8} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7}  Note",
            "Sensor", "Type", "Status", "Timeout", "NoResp", "Zero", "Dup", "Missing", "Delayed"
        )?;
        writeln!(w, "{}", "-".repeat(96))?;

        for sensor in &summary.sensors {
            let status = sensor.status.to_string();
            let status_colored = match sensor.status {
                SensorStatus::Error => status.red().bold(),
                SensorStatus::Warning => status.yellow(),
                SensorStatus::Normal => status.green(),
            };
            let m = &sensor.metrics;
            writeln!(
                w,
                "{:<14} {:<6} {:<8} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7}  {}",
                sensor.sensor_id,
                sensor.sensor_type.as_str(),
                status_colored,
                m.timeout,
                m.no_response,
                m.zero_data,
                m.duplicates,
                m.missing_total,
                m.delayed_samples,
                sensor.examples.note.as_deref().unwrap_or("")
            )?;
        }

        writeln!(w)?;
        if summary.top_issues.is_empty() {
            writeln!(w, "{}", "No issues found.".green())?;
        } else {
            writeln!(w, "Top issues:")?;
            for (rank, issue) in summary.top_issues.iter().enumerate() {
                writeln!(
                    w,
                    "  {}. {:<12} {:<14} {}",
                    rank + 1,
                    issue.kind.as_str(),
                    issue.sensor_id,
                    issue.count
                )?;
            }
        }

        Ok(())
    }
}
