//! Resource hygiene commands: zombies, right-sizing and remediation

use anyhow::Result;
use colored::Colorize;
use guardian_lib::{hygiene::ZombieReport, RemediationOutcome, RemediationSession};
use tabled::Tabled;

use crate::client::{ApiClient, RecommendationList, RemediateRequest, RemediateResponse};
use crate::config::Config;
use crate::output::{
    color_issue, color_state, format_currency, print_heading, print_info, print_json,
    print_success, print_table, print_warning, OutputFormat,
};

/// Row for the inventory table
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Idle Hours")]
    idle_hours: u32,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Zombie")]
    zombie: String,
}

/// Row for the recommendations table
#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Issue")]
    issue: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Potential Savings")]
    savings: String,
}

/// Show inventory and zombie ids
pub async fn zombies(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let report: ZombieReport = client.get("api/v1/zombies").await?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => render_zombies(&report),
    }

    Ok(())
}

pub fn render_zombies(report: &ZombieReport) {
    print_heading("Resource Hygiene Check (Zombie Hunter)");

    let rows: Vec<ResourceRow> = report
        .inventory
        .iter()
        .map(|r| ResourceRow {
            id: r.id.clone(),
            state: color_state(r.state),
            idle_hours: r.idle_hours,
            tags: if r.tags.is_empty() {
                "-".dimmed().to_string()
            } else {
                r.tags
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(", ")
            },
            zombie: if report.zombie_ids.contains(&r.id) {
                "✗".red().bold().to_string()
            } else {
                String::new()
            },
        })
        .collect();
    print_table(rows);
    println!();

    if report.has_zombies() {
        print_warning(&format!(
            "Waste Detected! Found {} zombie instance(s).",
            report.zombie_ids.len()
        ));
        println!("Action Plan: stop the following instances immediately:");
        println!("IDS: {:?}", report.zombie_ids);
    } else {
        print_success("Resource Hygiene is Good. No idle zombies found.");
    }
}

/// Show right-sizing recommendations
pub async fn rightsize(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let list: RecommendationList = client.get("api/v1/recommendations").await?;

    match format {
        OutputFormat::Json => print_json(&list)?,
        OutputFormat::Table => render_recommendations(&list),
    }

    Ok(())
}

pub fn render_recommendations(list: &RecommendationList) {
    print_heading("Smart Right-Sizing Engine");

    if list.recommendations.is_empty() {
        print_success("All workloads are optimized.");
        return;
    }

    print_info("Efficiency Opportunities Found!");
    let rows: Vec<RecommendationRow> = list
        .recommendations
        .iter()
        .map(|r| RecommendationRow {
            resource: r.resource_id.clone(),
            issue: color_issue(r.issue),
            action: r.action.clone(),
            savings: r.estimated_savings.to_string(),
        })
        .collect();
    print_table(rows);
    println!(
        "\n{} {}/mo",
        "Potential Savings:".bold(),
        format_currency(list.potential_savings).green().bold()
    );
}

/// Simulate stopping zombies, carrying the session across invocations
pub async fn remediate(client: &ApiClient, reset: bool, format: OutputFormat) -> Result<()> {
    let mut config = Config::load()?;
    if reset {
        config.session = RemediationSession::new();
    }

    let response: RemediateResponse = client
        .post(
            "api/v1/remediate",
            &RemediateRequest {
                session: config.session,
            },
        )
        .await?;

    config.session = response.session;
    config.save()?;

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => match &response.outcome {
            RemediationOutcome::Stopped { resource_ids } => {
                print_success(&format!(
                    "Stopped {} zombie instance(s): {}",
                    resource_ids.len(),
                    resource_ids.join(", ")
                ));
            }
            RemediationOutcome::AlreadyRemediated => {
                print_info("Remediation already applied in this session (use --reset to start over)");
            }
            RemediationOutcome::NothingToRemediate => {
                print_success("No zombies to remediate.");
            }
        },
    }

    Ok(())
}
