use anyhow::{Context, Result};
use serde::Serialize;

use super::model::Arrow;

/// Flat linkage record for file export: slot pair plus the real linkage
/// name. Neutral continuation arrows carry no linkage and are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LinkageRecord {
    pub from: usize,
    pub to: usize,
    pub linkage: &'static str,
}

pub fn linkage_records(arrows: &[Arrow]) -> Vec<LinkageRecord> {
    arrows
        .iter()
        .filter_map(|arrow| {
            arrow.linkage.map(|linkage| LinkageRecord {
                from: arrow.from,
                to: arrow.to,
                linkage: linkage.label(),
            })
        })
        .collect()
}

pub fn records_json(arrows: &[Arrow]) -> Result<String> {
    serde_json::to_string_pretty(&linkage_records(arrows))
        .context("failed to serialize linkage records")
}
