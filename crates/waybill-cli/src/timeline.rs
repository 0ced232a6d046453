//! `reconcile` and `normalize` command handlers. Neither touches the network.

use std::path::Path;

use serde::Serialize;
use waybill_core::AppConfig;
use waybill_tracker::{classify_location, reconcile_with_policy, MatchRule};

use crate::geocoder::location_tables;
use crate::shipment::read_record;

#[derive(Debug, Serialize)]
struct NormalizedRow<'a> {
    input: &'a str,
    query: String,
    rule: MatchRule,
}

pub(crate) fn run_reconcile(file: &Path) -> anyhow::Result<()> {
    let record = read_record(file)?;
    let reconciled = reconcile_with_policy(&record.timeline);
    println!("{}", serde_json::to_string_pretty(&reconciled)?);
    Ok(())
}

pub(crate) fn run_normalize(config: &AppConfig, locations: &[String]) -> anyhow::Result<()> {
    let tables = location_tables(config)?;
    let rows: Vec<NormalizedRow<'_>> = locations
        .iter()
        .map(|input| {
            let normalized = classify_location(input, &tables);
            NormalizedRow {
                input,
                query: normalized.query,
                rule: normalized.rule,
            }
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
