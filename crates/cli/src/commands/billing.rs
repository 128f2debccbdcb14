//! Billing analysis and spike explanation commands

use anyhow::Result;
use colored::Colorize;
use guardian_lib::{
    anomaly::AnomalyReport, explain::ExplanationOutcome, BillingAnalysis, CostRecord,
};
use tabled::Tabled;

use crate::client::{simulation_query, ApiClient, ExplainRequest};
use crate::output::{
    format_currency, print_error, print_heading, print_json, print_success, print_table,
    print_warning, OutputFormat,
};

/// Row for the billing series table
#[derive(Tabled)]
struct CostRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Spike")]
    spike: String,
}

/// Fetch simulated billing data with its anomaly report
pub async fn fetch_billing(
    client: &ApiClient,
    days: Option<u32>,
    spike: Option<f64>,
) -> Result<BillingAnalysis> {
    let path = format!("api/v1/billing{}", simulation_query(days, spike));
    client.get(&path).await
}

/// Show the billing series and flagged spikes
pub async fn analyze(
    client: &ApiClient,
    days: Option<u32>,
    spike: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let analysis = fetch_billing(client, days, spike).await?;

    match format {
        OutputFormat::Json => print_json(&analysis)?,
        OutputFormat::Table => render_billing(&analysis),
    }

    Ok(())
}

/// Render the billing section of a report
pub fn render_billing(analysis: &BillingAnalysis) {
    print_heading("Cloud Billing Data");

    let threshold = analysis.report.threshold;
    let rows: Vec<CostRow> = analysis
        .series
        .iter()
        .map(|r| CostRow {
            date: r.date.format("%Y-%m-%d").to_string(),
            cost: format_currency(r.cost),
            spike: if r.cost > threshold {
                "▲".red().bold().to_string()
            } else {
                String::new()
            },
        })
        .collect();
    print_table(rows);
    println!();

    print_heading("Anomaly Detection (IQR Method)");
    println!("Q1:                     {}", format_currency(analysis.report.q1));
    println!("Q3:                     {}", format_currency(analysis.report.q3));
    println!(
        "Threshold:              {}",
        format_currency(threshold).bold()
    );
    println!();

    if analysis.report.has_anomalies() {
        print_warning(&format!(
            "Alert! Found {} cost spike(s).",
            analysis.report.anomalies.len()
        ));
        let baseline = analysis.report.baseline_cost(&analysis.series);
        for record in &analysis.report.anomalies {
            println!("  {}", spike_line(&analysis.report, record, baseline));
        }
    } else {
        print_success("No anomalies detected. Costs are within normal range.");
    }
}

/// One flagged day, with its rise over the baseline when one exists
fn spike_line(report: &AnomalyReport, record: &CostRecord, baseline: Option<f64>) -> String {
    let mut line = format!(
        "{}  {}",
        record.date.format("%Y-%m-%d"),
        format_currency(record.cost).red().bold()
    );
    if let Some(baseline) = baseline {
        line.push_str(&format!(
            "  (+{:.0}% over the {} baseline)",
            report.percentage_above_baseline(record, baseline),
            format_currency(baseline)
        ));
    }
    line
}

/// Render an explanation outcome
pub fn render_explanation(outcome: &ExplanationOutcome) {
    print_heading("AI Root Cause Analysis");
    if outcome.ok {
        println!("{}", outcome.text);
    } else {
        print_error(&outcome.text);
    }
}

/// Ask the server to explain the most recent spike
pub async fn explain(
    client: &ApiClient,
    days: Option<u32>,
    spike: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let analysis = fetch_billing(client, days, spike).await?;

    let Some(record) = analysis.report.latest().cloned() else {
        match format {
            OutputFormat::Json => print_json(&serde_json::Value::Null)?,
            OutputFormat::Table => {
                print_success("No anomalies detected. Nothing to explain.")
            }
        }
        return Ok(());
    };

    let request = ExplainRequest {
        baseline_cost: analysis.report.baseline_cost(&analysis.series),
        record,
    };
    let outcome: ExplanationOutcome = client.post("api/v1/explain", &request).await?;

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Table => render_explanation(&outcome),
    }

    Ok(())
}
