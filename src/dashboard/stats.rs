//! Summary figures for the inventory cards

use crate::core::garment::Garment;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Aggregates over every record, ignoring search and filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryStats {
    /// Number of records
    pub records: usize,
    /// Sum of quantities
    pub total_pieces: u64,
    /// Σ price × quantity
    pub total_value: f64,
    pub unique_colors: usize,
    pub paid_records: usize,
    pub unpaid_records: usize,
    pub paid_value: f64,
    pub unpaid_value: f64,
}

impl InventoryStats {
    pub fn compute(garments: &[Garment]) -> Self {
        let colors: HashSet<&str> = garments.iter().map(|g| g.color.as_str()).collect();

        garments.iter().fold(
            InventoryStats {
                records: garments.len(),
                unique_colors: colors.len(),
                ..InventoryStats::default()
            },
            |mut stats, garment| {
                let value = garment.line_value();
                stats.total_pieces += u64::from(garment.quantity);
                stats.total_value += value;
                if garment.paid {
                    stats.paid_records += 1;
                    stats.paid_value += value;
                } else {
                    stats.unpaid_records += 1;
                    stats.unpaid_value += value;
                }
                stats
            },
        )
    }
}
