//! Full dashboard report and local data generation

use std::path::Path;

use anyhow::{Context, Result};
use guardian_lib::billing::{write_csv_file, BillingGenerator, DEFAULT_SERVICE};

use super::{billing, hygiene};
use crate::client::{simulation_query, ApiClient, FullAnalysis};
use crate::output::{print_json, print_success, OutputFormat};

/// Run the complete analysis on the server and print every section
pub async fn report(
    client: &ApiClient,
    days: Option<u32>,
    spike: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let path = format!("api/v1/analysis{}", simulation_query(days, spike));
    let analysis: FullAnalysis = client.get(&path).await?;

    match format {
        OutputFormat::Json => print_json(&analysis)?,
        OutputFormat::Table => {
            billing::render_billing(&analysis.billing);
            println!();
            if let Some(explanation) = &analysis.explanation {
                billing::render_explanation(explanation);
                println!();
            }
            hygiene::render_zombies(&analysis.zombies);
            println!();
            hygiene::render_recommendations(&analysis.recommendations);
        }
    }

    Ok(())
}

/// Write a mock billing CSV locally
pub fn generate(days: u32, spike: f64, output: &Path) -> Result<()> {
    let records = BillingGenerator::new()
        .generate(days, spike)
        .context("Failed to generate billing data")?;
    write_csv_file(&records, DEFAULT_SERVICE, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_success(&format!(
        "Mock data with a hidden spike written to {} ({} days)",
        output.display(),
        records.len()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud_bills.csv");

        generate(20, 500.0, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[0], "date,cost,service");
        assert!(lines[20].ends_with(",500,EC2_Compute"));
    }

    #[test]
    fn test_generate_rejects_bad_input_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud_bills.csv");

        assert!(generate(20, -5.0, &path).is_err());
        assert!(generate(20, f64::NAN, &path).is_err());
        assert!(generate(200_000_000, 500.0, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_generate_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cloud_bills.csv");

        assert!(generate(10, 500.0, &path).is_err());
    }
}
