//! Synthetic billing data
//!
//! Generates a daily cost series with steady base usage and one injected
//! spike on the final day, and exports series as CSV.

use std::io::Write;
use std::path::Path;

use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::models::CostRecord;

/// Base daily cost range in USD (upper bound exclusive)
const BASE_COST_MIN: u32 = 100;
const BASE_COST_MAX: u32 = 120;

/// Service label written to exported rows
pub const DEFAULT_SERVICE: &str = "EC2_Compute";

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot generate {days} days ending on {end}: date out of range")]
    InvalidRange { days: u32, end: NaiveDate },

    #[error("spike must be a non-negative number, got {0}")]
    InvalidSpike(f64),
}

/// Random billing series generator
pub struct BillingGenerator {
    rng: StdRng,
}

impl BillingGenerator {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible series
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate `days` records ending on `end`, the last one set to `spike_cost`
    pub fn generate_until(
        &mut self,
        end: NaiveDate,
        days: u32,
        spike_cost: f64,
    ) -> Result<Vec<CostRecord>, BillingError> {
        if !spike_cost.is_finite() || spike_cost < 0.0 {
            return Err(BillingError::InvalidSpike(spike_cost));
        }
        if days == 0 {
            return Ok(Vec::new());
        }

        let start = end
            .checked_sub_days(Days::new(u64::from(days) - 1))
            .ok_or(BillingError::InvalidRange { days, end })?;
        let mut records = Vec::with_capacity(days as usize);
        for date in start.iter_days().take(days as usize) {
            let cost = self.rng.gen_range(BASE_COST_MIN..BASE_COST_MAX);
            records.push(CostRecord::new(date, f64::from(cost)));
        }

        if let Some(last) = records.last_mut() {
            last.cost = spike_cost;
        }

        Ok(records)
    }

    /// Generate a series ending today
    pub fn generate(&mut self, days: u32, spike_cost: f64) -> Result<Vec<CostRecord>, BillingError> {
        self.generate_until(Local::now().date_naive(), days, spike_cost)
    }
}

impl Default for BillingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Write records as `date,cost,service` CSV
pub fn export_csv<W: Write>(
    records: &[CostRecord],
    service: &str,
    writer: W,
) -> Result<(), BillingError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["date", "cost", "service"])?;
    for record in records {
        wtr.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.cost.to_string(),
            service.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write records to a CSV file, replacing any existing file
pub fn write_csv_file(
    records: &[CostRecord],
    service: &str,
    path: impl AsRef<Path>,
) -> Result<(), BillingError> {
    let file = std::fs::File::create(path.as_ref())?;
    export_csv(records, service, std::io::BufWriter::new(file))?;
    tracing::info!(
        path = %path.as_ref().display(),
        rows = records.len(),
        "Billing data exported"
    );
    Ok(())
}
